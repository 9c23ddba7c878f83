//! Injection into static service slots
//!
//! Static injection is deliberately narrow: rather than letting arbitrary
//! types receive ad-hoc static members, a process declares one explicit
//! static-services type and populates it once at startup via
//! [`Container::inject_statics`](crate::Container::inject_statics).
//!
//! ```
//! use parking_lot::RwLock;
//! use stagehand::{Container, Injectable, StaticInjectable, StaticInjectionPlan};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Telemetry;
//! impl Injectable for Telemetry {
//!     fn construct() -> Option<Self> { Some(Self::default()) }
//! }
//!
//! static TELEMETRY: RwLock<Option<Arc<Telemetry>>> = RwLock::new(None);
//!
//! struct StaticServices;
//!
//! impl StaticInjectable for StaticServices {
//!     fn members(plan: &mut StaticInjectionPlan) {
//!         plan.member(
//!             "telemetry",
//!             || TELEMETRY.read().is_some(),
//!             |dep| *TELEMETRY.write() = Some(dep),
//!         );
//!     }
//! }
//!
//! let container = Container::new();
//! container.inject_statics::<StaticServices>().unwrap();
//! assert!(TELEMETRY.read().is_some());
//! ```

use crate::container::Container;
use crate::error::DiResult;
use crate::graph;
use crate::injectable::{ExpandFn, Injectable};
use crate::key::ServiceKey;
use std::borrow::Cow;
use std::sync::Arc;

pub(crate) type StaticProbeFn = Box<dyn Fn() -> bool + Send + Sync>;
pub(crate) type StaticAssignFn =
	Box<dyn Fn(&Container, Option<&str>) -> DiResult<()> + Send + Sync>;
pub(crate) type StaticDefaultFn = Box<dyn Fn() + Send + Sync>;
pub(crate) type StaticReadFn = Box<dyn Fn() -> Option<bool> + Send + Sync>;

/// A type token whose static service slots the container can populate.
///
/// Unlike [`Injectable`], no instance exists: the probe and store closures
/// operate on writable statics the implementor owns, and no post-injection
/// hooks run.
pub trait StaticInjectable: 'static {
	/// Declare the static members to populate.
	fn members(plan: &mut StaticInjectionPlan);
}

/// One declared static member.
pub struct StaticMemberBinding {
	pub(crate) member: &'static str,
	pub(crate) dependency: ServiceKey,
	pub(crate) required: bool,
	pub(crate) priority: i32,
	pub(crate) condition: Option<StaticCondition>,
	pub(crate) probe: StaticProbeFn,
	pub(crate) assign: StaticAssignFn,
	pub(crate) apply_default: Option<StaticDefaultFn>,
	pub(crate) expand: ExpandFn,
}

pub(crate) struct StaticCondition {
	pub(crate) member: &'static str,
	pub(crate) expected: bool,
	pub(crate) read: StaticReadFn,
}

/// The declared static members of a type token.
pub struct StaticInjectionPlan {
	members: Vec<StaticMemberBinding>,
}

impl StaticInjectionPlan {
	pub fn new() -> Self {
		Self {
			members: Vec::new(),
		}
	}

	/// Declare a static slot for a concrete dependency.
	///
	/// `probe` reports whether the slot is already populated (occupied slots
	/// are never overwritten); `store` writes the resolved dependency.
	pub fn member<D, P, S>(
		&mut self,
		member: &'static str,
		probe: P,
		store: S,
	) -> StaticMemberBuilder<'_, D>
	where
		D: Injectable,
		P: Fn() -> bool + Send + Sync + 'static,
		S: Fn(Arc<D>) + Send + Sync + 'static,
	{
		let store: Arc<dyn Fn(Arc<D>) + Send + Sync> = Arc::new(store);
		let assign: StaticAssignFn = {
			let store = store.clone();
			Box::new(move |container: &Container, name: Option<&str>| {
				let dependency: Arc<D> = match name {
					Some(name) => container.resolve_named::<D>(name)?,
					None => container.resolve::<D>()?,
				};
				store(dependency);
				Ok(())
			})
		};
		self.members.push(StaticMemberBinding {
			member,
			dependency: ServiceKey::of::<D>(),
			required: true,
			priority: 0,
			condition: None,
			probe: Box::new(probe),
			assign,
			apply_default: None,
			expand: graph::static_dependencies::<D>,
		});
		let binding = self.members.last_mut().expect("member was just pushed");
		StaticMemberBuilder { binding, store }
	}

	pub(crate) fn into_members(self) -> Vec<StaticMemberBinding> {
		self.members
	}
}

impl Default for StaticInjectionPlan {
	fn default() -> Self {
		Self::new()
	}
}

/// Configures the static member declared by the preceding
/// [`member`](StaticInjectionPlan::member) call.
pub struct StaticMemberBuilder<'p, D: ?Sized + Send + Sync + 'static> {
	binding: &'p mut StaticMemberBinding,
	store: Arc<dyn Fn(Arc<D>) + Send + Sync>,
}

impl<'p, D: ?Sized + Send + Sync + 'static> StaticMemberBuilder<'p, D> {
	/// Mark the member optional (unresolved dependencies are logged, not fatal).
	pub fn optional(self) -> Self {
		self.binding.required = false;
		self
	}

	/// Resolve through a named binding instead of a type-only lookup.
	pub fn named(self, name: impl Into<Cow<'static, str>>) -> Self {
		self.binding.dependency = ServiceKey::named::<D>(name);
		self
	}

	/// Set the injection priority (higher first, declaration order on ties).
	pub fn priority(self, priority: i32) -> Self {
		self.binding.priority = priority;
		self
	}

	/// Only inject while `read` evaluates to `expected`; `None` skips with
	/// a warning.
	pub fn when(
		self,
		member: &'static str,
		read: impl Fn() -> Option<bool> + Send + Sync + 'static,
		expected: bool,
	) -> Self {
		self.binding.condition = Some(StaticCondition {
			member,
			expected,
			read: Box::new(read),
		});
		self
	}

	/// Value stored when an optional dependency cannot be resolved.
	pub fn or_default(self, value: impl Into<Arc<D>>) -> Self {
		let store = self.store.clone();
		let value: Arc<D> = value.into();
		self.binding.apply_default = Some(Box::new(move || store(value.clone())));
		self
	}
}
