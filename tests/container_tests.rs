//! Registration and resolution behavior of the container

use stagehand::{Container, DiError, Injectable, InjectionPlan, Lifetime, ServiceKey};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default, Debug)]
struct Catalog {
	entries: usize,
}
impl Injectable for Catalog {}

#[derive(Default)]
struct Scheduler;
impl Injectable for Scheduler {
	fn construct() -> Option<Self> {
		Some(Self::default())
	}
}

// Never constructible, never registered in most tests
#[derive(Debug)]
struct Orphan;
impl Injectable for Orphan {}

#[test]
fn registered_instance_resolves_to_the_same_object() {
	let container = Container::new();
	let registered = container
		.register_instance(Catalog { entries: 3 })
		.unwrap();

	let first = container.resolve::<Catalog>().unwrap();
	let second = container.resolve::<Catalog>().unwrap();

	assert!(Arc::ptr_eq(&registered, &first));
	assert!(Arc::ptr_eq(&first, &second));
	assert_eq!(first.entries, 3);
}

#[test]
fn singleton_factory_is_invoked_once() {
	static CALLS: AtomicUsize = AtomicUsize::new(0);

	let container = Container::new();
	container.register_factory(Lifetime::Singleton, || {
		CALLS.fetch_add(1, Ordering::SeqCst);
		Ok(Catalog { entries: 1 })
	});

	let first = container.resolve::<Catalog>().unwrap();
	let second = container.resolve::<Catalog>().unwrap();

	assert!(Arc::ptr_eq(&first, &second));
	assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn transient_factory_produces_distinct_instances() {
	let container = Container::new();
	container.register_factory(Lifetime::Transient, || Ok(Catalog::default()));

	let first = container.resolve::<Catalog>().unwrap();
	let second = container.resolve::<Catalog>().unwrap();

	assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn unregistered_type_fails_to_resolve() {
	let container = Container::new();

	let err = container.resolve::<Orphan>().unwrap_err();
	assert!(matches!(err, DiError::NotRegistered(_)));
	assert!(container.try_resolve::<Orphan>().is_none());
}

#[test]
fn constructible_type_is_promoted_to_implicit_singleton() {
	let container = Container::new();

	let first = container.resolve::<Scheduler>().unwrap();
	let second = container.resolve::<Scheduler>().unwrap();

	assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn named_bindings_use_the_composite_key() {
	let container = Container::new();
	container
		.register_named("primary", Catalog { entries: 1 })
		.unwrap();
	container
		.register_named("replica", Catalog { entries: 2 })
		.unwrap();

	let primary = container.resolve_named::<Catalog>("primary").unwrap();
	let replica = container.resolve_named::<Catalog>("replica").unwrap();
	assert_eq!(primary.entries, 1);
	assert_eq!(replica.entries, 2);

	let err = container.resolve_named::<Catalog>("missing").unwrap_err();
	assert!(matches!(err, DiError::NamedNotRegistered { .. }));
	assert!(container.try_resolve_named::<Catalog>("missing").is_none());
}

#[test]
fn empty_binding_name_is_rejected() {
	let container = Container::new();
	let err = container
		.register_named("", Catalog::default())
		.unwrap_err();
	assert!(matches!(err, DiError::InvalidBinding { .. }));
}

#[test]
fn named_lookup_does_not_fall_back_to_type_binding() {
	let container = Container::new();
	container.register_instance(Catalog { entries: 9 }).unwrap();

	let err = container.resolve_named::<Catalog>("primary").unwrap_err();
	assert!(matches!(err, DiError::NamedNotRegistered { .. }));
}

#[test]
fn re_registration_overwrites_the_previous_binding() {
	let container = Container::new();
	container.register_instance(Catalog { entries: 1 }).unwrap();
	container.register_instance(Catalog { entries: 2 }).unwrap();

	let resolved = container.resolve::<Catalog>().unwrap();
	assert_eq!(resolved.entries, 2);
}

// ---- trait bindings ----------------------------------------------------

trait Renderer: Send + Sync + std::fmt::Debug {
	fn backend(&self) -> &'static str;
}

#[derive(Debug)]
struct GlRenderer;
impl Renderer for GlRenderer {
	fn backend(&self) -> &'static str {
		"gl"
	}
}
impl Injectable for GlRenderer {}

#[derive(Debug)]
struct VkRenderer;
impl Renderer for VkRenderer {
	fn backend(&self) -> &'static str {
		"vk"
	}
}
impl Injectable for VkRenderer {}

#[test]
fn trait_bindings_resolve_by_interface_key() {
	let container = Container::new();
	container.register_trait::<dyn Renderer>(Arc::new(GlRenderer));

	let renderer = container.resolve_trait::<dyn Renderer>().unwrap();
	assert_eq!(renderer.backend(), "gl");

	container
		.register_trait_named::<dyn Renderer>("fallback", Arc::new(VkRenderer))
		.unwrap();
	let fallback = container
		.resolve_trait_named::<dyn Renderer>("fallback")
		.unwrap();
	assert_eq!(fallback.backend(), "vk");
}

#[test]
fn missing_trait_binding_fails() {
	let container = Container::new();
	let err = container.resolve_trait::<dyn Renderer>().unwrap_err();
	assert!(matches!(err, DiError::NotRegistered(_)));
	assert!(container.try_resolve_trait::<dyn Renderer>().is_none());
}

// ---- multi-binding -----------------------------------------------------

trait Spell: Send + Sync {
	fn name(&self) -> &'static str;
}

#[derive(Default)]
struct Fireball;
impl Spell for Fireball {
	fn name(&self) -> &'static str {
		"fireball"
	}
}
impl Injectable for Fireball {
	fn construct() -> Option<Self> {
		Some(Self::default())
	}
}

#[derive(Default)]
struct FrostNova;
impl Spell for FrostNova {
	fn name(&self) -> &'static str {
		"frost_nova"
	}
}
impl Injectable for FrostNova {
	fn construct() -> Option<Self> {
		Some(Self::default())
	}
}

// No parameterless constructor: resolving this implementation fails
struct Forbidden;
impl Spell for Forbidden {
	fn name(&self) -> &'static str {
		"forbidden"
	}
}
impl Injectable for Forbidden {}

#[test]
fn resolve_all_returns_implementations_in_registration_order() {
	let container = Container::new();
	container.register_implementation::<dyn Spell, Fireball, _>(Lifetime::Singleton, |arc| arc);
	container.register_implementation::<dyn Spell, FrostNova, _>(Lifetime::Singleton, |arc| arc);

	let spells = container.resolve_all::<dyn Spell>();
	let names: Vec<_> = spells.iter().map(|s| s.name()).collect();
	assert_eq!(names, vec!["fireball", "frost_nova"]);
}

#[test]
fn resolve_all_caches_singleton_implementations() {
	let container = Container::new();
	container.register_implementation::<dyn Spell, Fireball, _>(Lifetime::Singleton, |arc| arc);

	let first = container.resolve_all::<dyn Spell>();
	let second = container.resolve_all::<dyn Spell>();
	assert!(Arc::ptr_eq(&first[0], &second[0]));
}

#[test]
fn resolve_all_skips_implementations_that_fail() {
	let container = Container::new();
	container.register_implementation::<dyn Spell, Forbidden, _>(Lifetime::Singleton, |arc| arc);
	container.register_implementation::<dyn Spell, Fireball, _>(Lifetime::Singleton, |arc| arc);

	let spells = container.resolve_all::<dyn Spell>();
	let names: Vec<_> = spells.iter().map(|s| s.name()).collect();
	assert_eq!(names, vec!["fireball"]);
}

#[test]
fn resolve_all_without_bindings_is_empty() {
	let container = Container::new();
	assert!(container.resolve_all::<dyn Spell>().is_empty());
}

#[test]
fn pre_supplied_collection_is_returned_verbatim() {
	let container = Container::new();
	container
		.collection::<dyn Spell>()
		.add(FrostNova, |arc| arc)
		.unwrap()
		.add(Fireball, |arc| arc)
		.unwrap()
		.register();

	// A collection takes precedence over any implementation set
	container.register_implementation::<dyn Spell, Fireball, _>(Lifetime::Singleton, |arc| arc);

	let spells = container.resolve_all::<dyn Spell>();
	let names: Vec<_> = spells.iter().map(|s| s.name()).collect();
	assert_eq!(names, vec!["frost_nova", "fireball"]);
}

// ---- circular dependencies ---------------------------------------------

#[derive(Debug)]
struct RingA {
	next: Option<Arc<RingB>>,
}
#[derive(Debug)]
struct RingB {
	next: Option<Arc<RingC>>,
}
#[derive(Debug)]
struct RingC {
	next: Option<Arc<RingA>>,
}

impl Injectable for RingA {
	fn members(plan: &mut InjectionPlan<Self>) {
		plan.member("next", |a: &mut Self| &mut a.next);
	}
	fn construct() -> Option<Self> {
		Some(Self { next: None })
	}
}
impl Injectable for RingB {
	fn members(plan: &mut InjectionPlan<Self>) {
		plan.member("next", |b: &mut Self| &mut b.next);
	}
	fn construct() -> Option<Self> {
		Some(Self { next: None })
	}
}
impl Injectable for RingC {
	fn members(plan: &mut InjectionPlan<Self>) {
		plan.member("next", |c: &mut Self| &mut c.next);
	}
	fn construct() -> Option<Self> {
		Some(Self { next: None })
	}
}

#[test]
fn resolving_a_dependency_ring_fails_with_circular_dependency() {
	let container = Container::new();

	let err = container.resolve::<RingA>().unwrap_err();
	match err {
		DiError::CircularDependency { path, .. } => {
			assert!(path.contains("RingA"));
			assert!(path.contains("RingB"));
			assert!(path.contains("RingC"));
		}
		other => panic!("expected CircularDependency, got {other:?}"),
	}

	// A failed resolution must not poison later, acyclic resolutions
	assert!(container.resolve::<Scheduler>().is_ok());
}

#[test]
fn try_resolve_swallows_cycle_errors() {
	let container = Container::new();
	assert!(container.try_resolve::<RingA>().is_none());
}

#[test]
fn unregister_removes_the_binding() {
	let container = Container::new();
	container.register_instance(Catalog { entries: 5 }).unwrap();

	assert!(container.unregister(&ServiceKey::of::<Catalog>()));
	assert!(container.try_resolve::<Catalog>().is_none());
	// Removing again reports nothing was removed
	assert!(!container.unregister(&ServiceKey::of::<Catalog>()));
}
