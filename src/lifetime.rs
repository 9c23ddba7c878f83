//! Service lifetimes

/// Controls how instances produced for a binding are cached.
///
/// # Examples
///
/// ```
/// use stagehand::{Container, Lifetime};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Clock;
/// impl stagehand::Injectable for Clock {}
///
/// let container = Container::new();
/// container.register_factory(Lifetime::Transient, || Ok(Clock));
///
/// let a = container.resolve::<Clock>().unwrap();
/// let b = container.resolve::<Clock>().unwrap();
/// assert!(!Arc::ptr_eq(&a, &b));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
	/// One cached instance, created on first resolution and reused
	Singleton,
	/// A new instance per resolution, never cached
	Transient,
}
