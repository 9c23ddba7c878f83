//! Error types for registration, resolution and injection

use thiserror::Error;

/// Result alias used throughout the container.
pub type DiResult<T> = Result<T, DiError>;

/// A single factory or implementation producer that failed during
/// [`Container::validate`](crate::Container::validate).
#[derive(Debug, Clone)]
pub struct ValidationFailure {
	/// Rendered service key (`TypeName` or `TypeName(name)`)
	pub key: String,
	/// Rendered resolution error
	pub error: String,
}

fn render_failures(failures: &[ValidationFailure]) -> String {
	failures
		.iter()
		.map(|f| format!("  {}: {}", f.key, f.error))
		.collect::<Vec<_>>()
		.join("\n")
}

/// Errors raised by container operations.
///
/// Required-path failures (`NotRegistered`, `NamedNotRegistered`,
/// `CircularDependency`, `RequiredInjection`) are fatal to the enclosing
/// call and surface to the caller. Optional-path failures are recovered
/// locally by the injector and only logged.
#[derive(Debug, Error)]
pub enum DiError {
	/// A registration call received arguments it cannot bind
	#[error("invalid binding for {type_name}: {reason}")]
	InvalidBinding {
		/// Service type the registration was for
		type_name: &'static str,
		/// What was wrong with the call
		reason: String,
	},

	/// No binding exists for the requested type and no fallback applied
	#[error("no service registered for {0}")]
	NotRegistered(&'static str),

	/// No binding exists for the requested (type, name) pair
	#[error("no service registered for {type_name} under name {name:?}")]
	NamedNotRegistered {
		/// Service type the lookup was for
		type_name: &'static str,
		/// Binding name that was requested
		name: String,
	},

	/// Resolution re-entered a key already being resolved on this call stack
	#[error(
		"circular dependency detected: {type_name}\n  Path: {path}\nThis forms a cycle that cannot be resolved."
	)]
	CircularDependency {
		/// Name of the type that closed the cycle
		type_name: String,
		/// Resolution path (format: A -> B -> C -> A)
		path: String,
	},

	/// Resolution recursed past the depth backstop
	#[error(
		"maximum resolution depth exceeded: {0}\nThis likely indicates an extremely deep or circular dependency chain."
	)]
	MaxDepthExceeded(usize),

	/// A required member's dependency could not be resolved; the injection
	/// pass for the target aborts (members already assigned keep their values)
	#[error("required member `{member}` of {target} could not be injected")]
	RequiredInjection {
		/// Type that was being injected into
		target: &'static str,
		/// Declared member name
		member: &'static str,
		/// Underlying resolution failure
		#[source]
		source: Box<DiError>,
	},

	/// A post-injection hook reported failure (non-fatal; the hook runner
	/// logs it and keeps going)
	#[error("post-injection hook `{hook}` failed: {reason}")]
	HookFailed {
		/// Declared hook name
		hook: &'static str,
		/// What went wrong
		reason: String,
	},

	/// Aggregated report from the eager validation pass
	#[error(
		"factory validation failed for {} binding(s):\n{}",
		.failures.len(),
		render_failures(.failures)
	)]
	FactoryValidation {
		/// Every factory or implementation producer that failed
		failures: Vec<ValidationFailure>,
	},

	/// Releasing a service's resources failed during unregister/clear
	#[error("disposal of {type_name} failed: {reason}")]
	Disposal {
		/// Type whose disposal failed
		type_name: &'static str,
		/// What went wrong
		reason: String,
	},
}
