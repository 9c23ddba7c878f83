//! Post-injection lifecycle hooks
//!
//! Hooks run once per instance, after its member injection pass completes.
//! They are sorted ascending by declared order (declaration order on ties)
//! and are non-fatal: a failing hook is logged and the remaining hooks
//! still run, unlike a failing required member.

use crate::error::DiResult;
use crate::injectable::Injectable;

type HookFn<T> = Box<dyn Fn(&mut T) -> DiResult<()> + Send + Sync>;

/// A declared post-injection hook on `T`.
pub struct PostInjectHook<T> {
	pub(crate) name: &'static str,
	pub(crate) order: i32,
	pub(crate) run: HookFn<T>,
}

impl<T> PostInjectHook<T> {
	/// Set the hook's order. Lower orders run first; equal orders keep
	/// declaration order.
	pub fn order(&mut self, order: i32) -> &mut Self {
		self.order = order;
		self
	}
}

/// The declared post-injection hooks of a type.
///
/// ```
/// use stagehand::{DiResult, HookSet, Injectable};
///
/// #[derive(Default)]
/// struct Cache {
///     warmed: bool,
/// }
///
/// impl Cache {
///     fn warm(&mut self) -> DiResult<()> {
///         self.warmed = true;
///         Ok(())
///     }
/// }
///
/// impl Injectable for Cache {
///     fn hooks(hooks: &mut HookSet<Self>) {
///         hooks.hook("warm", |cache| cache.warm()).order(0);
///     }
/// }
/// ```
pub struct HookSet<T> {
	hooks: Vec<PostInjectHook<T>>,
}

impl<T: 'static> HookSet<T> {
	pub fn new() -> Self {
		Self { hooks: Vec::new() }
	}

	/// Declare a hook. Defaults to order 0.
	pub fn hook(
		&mut self,
		name: &'static str,
		run: impl Fn(&mut T) -> DiResult<()> + Send + Sync + 'static,
	) -> &mut PostInjectHook<T> {
		self.hooks.push(PostInjectHook {
			name,
			order: 0,
			run: Box::new(run),
		});
		self.hooks.last_mut().expect("hook was just pushed")
	}

	/// Splice in the hooks declared by an embedded component. Spliced hooks
	/// keep their orders and take part in the same global ordering.
	pub fn embed<B, L>(&mut self, lens: L)
	where
		B: Injectable,
		L: for<'a> Fn(&'a mut T) -> &'a mut B + Send + Sync + Clone + 'static,
	{
		let mut sub = HookSet::<B>::new();
		B::hooks(&mut sub);
		for hook in sub.hooks {
			let lens = lens.clone();
			let run = hook.run;
			self.hooks.push(PostInjectHook {
				name: hook.name,
				order: hook.order,
				run: Box::new(move |parent: &mut T| run(lens(parent))),
			});
		}
	}

	pub(crate) fn into_hooks(self) -> Vec<PostInjectHook<T>> {
		self.hooks
	}
}

impl<T: 'static> Default for HookSet<T> {
	fn default() -> Self {
		Self::new()
	}
}

/// Run every declared hook of `target`, lowest order first.
pub(crate) fn run_hooks<T: Injectable>(target: &mut T) {
	let mut set = HookSet::new();
	T::hooks(&mut set);
	let mut hooks = set.into_hooks();
	hooks.sort_by_key(|hook| hook.order);

	for hook in &hooks {
		if let Err(err) = (hook.run)(target) {
			tracing::error!(
				hook = hook.name,
				ty = std::any::type_name::<T>(),
				error = %err,
				"post-injection hook failed"
			);
		}
	}
}
