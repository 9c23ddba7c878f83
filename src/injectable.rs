//! Injectable declarations
//!
//! Instead of scanning a type hierarchy at runtime, every injectable type
//! declares its own members: [`Injectable::members`] enumerates them into an
//! [`InjectionPlan`] of typed accessor closures, and [`Injectable::hooks`]
//! declares post-injection hooks. The container only ever works against
//! these declarations, so the whole surface is checked at compile time.
//!
//! With the `derive` feature the declarations are generated from field
//! attributes:
//!
//! ```rust,ignore
//! #[derive(Injectable)]
//! #[injectable(construct, hooks(warm_caches = 0))]
//! struct ShopManager {
//!     #[inject]
//!     catalog: Option<Arc<Catalog>>,
//!     #[inject(optional, priority = 10)]
//!     analytics: Option<Arc<Analytics>>,
//!     #[inject(name = "primary")]
//!     store: Option<Arc<Storefront>>,
//! }
//! ```

use crate::container::Container;
use crate::error::DiResult;
use crate::graph::{self, DependencyMeta};
use crate::hooks::HookSet;
use crate::key::ServiceKey;
use std::any::Any;
use std::borrow::Cow;
use std::sync::Arc;

pub(crate) type ProbeFn<T> = Box<dyn Fn(&mut T) -> bool + Send + Sync>;
pub(crate) type AssignFn<T> =
	Box<dyn Fn(&mut T, &Container, Option<&str>) -> DiResult<()> + Send + Sync>;
pub(crate) type DefaultFn<T> = Box<dyn Fn(&mut T) + Send + Sync>;
pub(crate) type ConditionReadFn<T> = Box<dyn Fn(&mut T) -> Option<bool> + Send + Sync>;
pub(crate) type ExpandFn = fn() -> Vec<DependencyMeta>;

type Lens<T, D> = Arc<dyn for<'a> Fn(&'a mut T) -> &'a mut Option<Arc<D>> + Send + Sync>;

/// A type whose members the container can inject.
///
/// All methods have defaults, so a plain service with no dependencies of
/// its own is declared with an empty impl:
///
/// ```
/// #[derive(Default)]
/// struct AudioEngine;
///
/// impl stagehand::Injectable for AudioEngine {}
/// ```
///
/// Types that additionally opt into [`construct`](Injectable::construct)
/// participate in implicit singleton promotion: resolving them without a
/// prior registration constructs, injects and caches one instance.
pub trait Injectable: Any + Send + Sync + Sized {
	/// Declare injectable members.
	fn members(_plan: &mut InjectionPlan<Self>) {}

	/// Declare post-injection hooks.
	fn hooks(_hooks: &mut HookSet<Self>) {}

	/// Parameterless fallback constructor.
	///
	/// Returning `Some` opts the type into implicit singleton promotion and
	/// allows it to be used with
	/// [`register_implementation`](Container::register_implementation) and
	/// [`spawn_managed`](Container::spawn_managed).
	fn construct() -> Option<Self> {
		None
	}

	/// Release resources held by this instance.
	///
	/// Invoked by [`Container::unregister`] and [`Container::clear`] for
	/// cached singletons. Errors are logged by the container and never
	/// interrupt the rest of a teardown.
	fn dispose(&self) -> DiResult<()> {
		Ok(())
	}
}

/// One declared injectable member of `T`.
pub struct MemberBinding<T> {
	pub(crate) member: &'static str,
	pub(crate) dependency: ServiceKey,
	pub(crate) required: bool,
	pub(crate) priority: i32,
	pub(crate) condition: Option<Condition<T>>,
	pub(crate) probe: ProbeFn<T>,
	pub(crate) assign: AssignFn<T>,
	pub(crate) apply_default: Option<DefaultFn<T>>,
	pub(crate) expand: ExpandFn,
}

pub(crate) struct Condition<T> {
	pub(crate) member: &'static str,
	pub(crate) expected: bool,
	pub(crate) read: ConditionReadFn<T>,
}

impl<T: 'static> MemberBinding<T> {
	/// Re-target every closure of this binding through `lens`, turning a
	/// binding on an embedded component into a binding on the outer type.
	fn relens<P: 'static>(
		self,
		lens: Arc<dyn for<'a> Fn(&'a mut P) -> &'a mut T + Send + Sync>,
	) -> MemberBinding<P> {
		let MemberBinding {
			member,
			dependency,
			required,
			priority,
			condition,
			probe,
			assign,
			apply_default,
			expand,
		} = self;

		MemberBinding {
			member,
			dependency,
			required,
			priority,
			condition: condition.map(|condition| {
				let Condition {
					member,
					expected,
					read,
				} = condition;
				let lens = lens.clone();
				Condition {
					member,
					expected,
					read: Box::new(move |parent: &mut P| read(lens(parent))),
				}
			}),
			probe: {
				let lens = lens.clone();
				Box::new(move |parent: &mut P| probe(lens(parent)))
			},
			assign: {
				let lens = lens.clone();
				Box::new(move |parent: &mut P, container: &Container, name: Option<&str>| {
					assign(lens(parent), container, name)
				})
			},
			apply_default: apply_default.map(|apply| {
				let lens = lens.clone();
				Box::new(move |parent: &mut P| apply(lens(parent))) as DefaultFn<P>
			}),
			expand,
		}
	}
}

/// The declared injectable members of a type.
///
/// Populated inside [`Injectable::members`]; members of embedded components
/// can be spliced in with [`embed`](InjectionPlan::embed) so that one
/// priority ordering covers the whole composition.
pub struct InjectionPlan<T> {
	members: Vec<MemberBinding<T>>,
}

impl<T: 'static> InjectionPlan<T> {
	pub fn new() -> Self {
		Self {
			members: Vec::new(),
		}
	}

	/// Declare a member holding a concrete dependency.
	///
	/// `lens` exposes the member slot; a member is only assigned while its
	/// slot is vacant (`None`), so pre-set values are never overwritten.
	///
	/// ```
	/// use stagehand::{Injectable, InjectionPlan};
	/// use std::sync::Arc;
	///
	/// #[derive(Default)]
	/// struct Catalog;
	/// impl Injectable for Catalog {
	///     fn construct() -> Option<Self> { Some(Self::default()) }
	/// }
	///
	/// struct Shop {
	///     catalog: Option<Arc<Catalog>>,
	/// }
	///
	/// impl Injectable for Shop {
	///     fn members(plan: &mut InjectionPlan<Self>) {
	///         plan.member("catalog", |shop: &mut Self| &mut shop.catalog);
	///     }
	/// }
	/// ```
	pub fn member<D, L>(&mut self, member: &'static str, lens: L) -> MemberBuilder<'_, T, D>
	where
		D: Injectable,
		L: for<'a> Fn(&'a mut T) -> &'a mut Option<Arc<D>> + Send + Sync + 'static,
	{
		let lens: Lens<T, D> = Arc::new(lens);
		let assign: AssignFn<T> = {
			let lens = lens.clone();
			Box::new(
				move |target: &mut T, container: &Container, name: Option<&str>| {
					let dependency: Arc<D> = match name {
						Some(name) => container.resolve_named::<D>(name)?,
						None => container.resolve::<D>()?,
					};
					*lens(target) = Some(dependency);
					Ok(())
				},
			)
		};
		self.push_member(
			member,
			ServiceKey::of::<D>(),
			graph::static_dependencies::<D>,
			lens,
			assign,
		)
	}

	/// Declare a member holding a trait-object dependency.
	///
	/// Resolves through the container's trait bindings
	/// ([`register_trait`](Container::register_trait)). Trait-object
	/// dependencies are leaves in the static dependency graph: their own
	/// members are only known once a concrete implementation is bound.
	pub fn member_trait<I, L>(&mut self, member: &'static str, lens: L) -> MemberBuilder<'_, T, I>
	where
		I: ?Sized + Send + Sync + 'static,
		L: for<'a> Fn(&'a mut T) -> &'a mut Option<Arc<I>> + Send + Sync + 'static,
	{
		let lens: Lens<T, I> = Arc::new(lens);
		let assign: AssignFn<T> = {
			let lens = lens.clone();
			Box::new(
				move |target: &mut T, container: &Container, name: Option<&str>| {
					let dependency: Arc<I> = match name {
						Some(name) => container.resolve_trait_named::<I>(name)?,
						None => container.resolve_trait::<I>()?,
					};
					*lens(target) = Some(dependency);
					Ok(())
				},
			)
		};
		self.push_member(
			member,
			ServiceKey::of::<I>(),
			graph::no_static_edges,
			lens,
			assign,
		)
	}

	/// Splice in the members declared by an embedded component.
	///
	/// Every member of `B` becomes a member of `T` through `lens`, and takes
	/// part in the same global priority ordering as `T`'s own members.
	pub fn embed<B, L>(&mut self, lens: L)
	where
		B: Injectable,
		L: for<'a> Fn(&'a mut T) -> &'a mut B + Send + Sync + Clone + 'static,
	{
		let mut sub = InjectionPlan::<B>::new();
		B::members(&mut sub);
		let lens: Arc<dyn for<'a> Fn(&'a mut T) -> &'a mut B + Send + Sync> = Arc::new(lens);
		for binding in sub.members {
			self.members.push(binding.relens(lens.clone()));
		}
	}

	fn push_member<D>(
		&mut self,
		member: &'static str,
		dependency: ServiceKey,
		expand: ExpandFn,
		lens: Lens<T, D>,
		assign: AssignFn<T>,
	) -> MemberBuilder<'_, T, D>
	where
		D: ?Sized + Send + Sync + 'static,
	{
		let probe: ProbeFn<T> = {
			let lens = lens.clone();
			Box::new(move |target: &mut T| lens(target).is_some())
		};
		self.members.push(MemberBinding {
			member,
			dependency,
			required: true,
			priority: 0,
			condition: None,
			probe,
			assign,
			apply_default: None,
			expand,
		});
		let binding = self.members.last_mut().expect("member was just pushed");
		MemberBuilder { binding, lens }
	}

	pub(crate) fn into_members(self) -> Vec<MemberBinding<T>> {
		self.members
	}

	pub(crate) fn dependency_meta(&self) -> Vec<DependencyMeta> {
		self.members
			.iter()
			.map(|member| DependencyMeta {
				key: member.dependency.clone(),
				member: member.member,
				required: member.required,
				expand: member.expand,
			})
			.collect()
	}
}

impl<T: 'static> Default for InjectionPlan<T> {
	fn default() -> Self {
		Self::new()
	}
}

/// Configures the member declared by the preceding
/// [`member`](InjectionPlan::member) call.
pub struct MemberBuilder<'p, T, D: ?Sized + Send + Sync + 'static> {
	binding: &'p mut MemberBinding<T>,
	lens: Lens<T, D>,
}

impl<'p, T: 'static, D: ?Sized + Send + Sync + 'static> MemberBuilder<'p, T, D> {
	/// Mark the member optional: an unresolved dependency is logged and the
	/// member is left at its default instead of failing the injection pass.
	pub fn optional(self) -> Self {
		self.binding.required = false;
		self
	}

	/// Resolve through a named binding instead of a type-only lookup.
	pub fn named(self, name: impl Into<Cow<'static, str>>) -> Self {
		self.binding.dependency = ServiceKey::named::<D>(name);
		self
	}

	/// Set the injection priority. Higher values are injected earlier;
	/// equal priorities keep declaration order.
	pub fn priority(self, priority: i32) -> Self {
		self.binding.priority = priority;
		self
	}

	/// Only inject while a boolean member of the target evaluates to
	/// `expected`. A reader returning `None` means the condition could not
	/// be read; the member is skipped with a warning.
	pub fn when(
		self,
		member: &'static str,
		read: impl Fn(&T) -> Option<bool> + Send + Sync + 'static,
		expected: bool,
	) -> Self {
		self.binding.condition = Some(Condition {
			member,
			expected,
			read: Box::new(move |target: &mut T| read(target)),
		});
		self
	}

	/// Value substituted when an optional dependency cannot be resolved.
	pub fn or_default(self, value: impl Into<Arc<D>>) -> Self {
		let lens = self.lens.clone();
		let value: Arc<D> = value.into();
		self.binding.apply_default = Some(Box::new(move |target: &mut T| {
			*lens(target) = Some(value.clone());
		}));
		self
	}
}
