//! Hooks, disposal, teardown and validation

use parking_lot::Mutex;
use stagehand::{
	Container, DiError, DiResult, HookSet, HostLifecycle, Injectable, Lifetime, ManagedHandle,
	ServiceKey,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// ---- post-injection hooks ----------------------------------------------

#[derive(Default)]
struct Stage {
	log: Vec<&'static str>,
}

impl Stage {
	fn rig(&mut self) -> DiResult<()> {
		self.log.push("rig");
		Ok(())
	}

	fn light(&mut self) -> DiResult<()> {
		self.log.push("light");
		Ok(())
	}
}

impl Injectable for Stage {
	fn hooks(hooks: &mut HookSet<Self>) {
		// Declared out of order on purpose
		hooks.hook("light", |stage| stage.light()).order(1);
		hooks.hook("rig", |stage| stage.rig()).order(0);
	}
}

#[test]
fn hooks_run_in_ascending_order() {
	let container = Container::new();
	let mut stage = Stage::default();
	container.inject(&mut stage).unwrap();

	assert_eq!(stage.log, vec!["rig", "light"]);
}

#[test]
fn a_failing_hook_does_not_stop_the_rest() {
	#[derive(Default)]
	struct Fragile {
		log: Vec<&'static str>,
	}
	impl Injectable for Fragile {
		fn hooks(hooks: &mut HookSet<Self>) {
			hooks
				.hook("explode", |_f| {
					Err(DiError::HookFailed {
						hook: "explode",
						reason: "rigging failed".to_string(),
					})
				})
				.order(0);
			hooks
				.hook("survive", |f| {
					f.log.push("survive");
					Ok(())
				})
				.order(1);
		}
	}

	let container = Container::new();
	let mut fragile = Fragile::default();
	// Hook failures are logged, not propagated
	container.inject(&mut fragile).unwrap();
	assert_eq!(fragile.log, vec!["survive"]);
}

#[test]
fn embedded_hooks_share_one_ordering() {
	#[derive(Default)]
	struct Rig {
		order: Vec<&'static str>,
	}
	impl Rig {
		fn inner(&mut self) -> DiResult<()> {
			self.order.push("inner");
			Ok(())
		}
	}
	impl Injectable for Rig {
		fn hooks(hooks: &mut HookSet<Self>) {
			hooks.hook("inner", |r| r.inner()).order(5);
		}
	}

	#[derive(Default)]
	struct Show {
		rig: Rig,
	}
	impl Injectable for Show {
		fn hooks(hooks: &mut HookSet<Self>) {
			hooks.embed(|show: &mut Self| &mut show.rig);
			hooks
				.hook("outer_first", |show| {
					show.rig.order.push("outer_first");
					Ok(())
				})
				.order(0);
			hooks
				.hook("outer_last", |show| {
					show.rig.order.push("outer_last");
					Ok(())
				})
				.order(9);
		}
	}

	let container = Container::new();
	let mut show = Show::default();
	container.inject(&mut show).unwrap();
	assert_eq!(show.rig.order, vec!["outer_first", "inner", "outer_last"]);
}

// ---- disposal ----------------------------------------------------------

#[derive(Default, Debug)]
struct Vault {
	disposals: AtomicUsize,
}

impl Vault {
	fn disposal_count(&self) -> usize {
		self.disposals.load(Ordering::SeqCst)
	}
}

impl Injectable for Vault {
	fn dispose(&self) -> DiResult<()> {
		self.disposals.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}
}

#[test]
fn unregister_disposes_the_cached_singleton_exactly_once() {
	let container = Container::new();
	let vault = container.register_instance(Vault::default()).unwrap();

	assert!(container.unregister(&ServiceKey::of::<Vault>()));
	assert_eq!(vault.disposal_count(), 1);

	let err = container.resolve::<Vault>().unwrap_err();
	assert!(matches!(err, DiError::NotRegistered(_)));
}

#[test]
fn a_failing_disposal_does_not_block_teardown() {
	#[derive(Default)]
	struct Cursed;
	impl Injectable for Cursed {
		fn dispose(&self) -> DiResult<()> {
			Err(DiError::Disposal {
				type_name: "Cursed",
				reason: "resource already gone".to_string(),
			})
		}
	}

	let container = Container::new();
	container.register_instance(Cursed).unwrap();
	let vault = container.register_instance(Vault::default()).unwrap();

	container.clear();
	// The failing disposal was logged; the healthy one still ran
	assert_eq!(vault.disposal_count(), 1);
}

#[test]
fn clear_empties_every_store() {
	#[derive(Default)]
	struct Loot;
	impl Injectable for Loot {}

	trait Relic: Send + Sync {}
	#[derive(Default)]
	struct Crown;
	impl Relic for Crown {}
	impl Injectable for Crown {
		fn construct() -> Option<Self> {
			Some(Self::default())
		}
	}

	let container = Container::new();
	container.register_instance(Vault::default()).unwrap();
	container.register_factory(Lifetime::Singleton, || Ok(Loot));
	container.register_named("royal", Vault::default()).unwrap();
	container.register_implementation::<dyn Relic, Crown, _>(Lifetime::Singleton, |arc| arc);
	container
		.collection::<dyn Relic>()
		.add(Crown::default(), |arc| arc)
		.unwrap()
		.register();

	// Materialize the factory singleton so a cache exists to dispose
	container.resolve::<Loot>().unwrap();

	container.clear();

	assert!(container.try_resolve::<Vault>().is_none());
	assert!(container.try_resolve::<Loot>().is_none());
	assert!(container.try_resolve_named::<Vault>("royal").is_none());
	assert!(container.resolve_all::<dyn Relic>().is_empty());
}

#[test]
fn clear_disposes_collection_items_and_cached_implementations() {
	trait Keeper: Send + Sync {}
	impl Keeper for Vault {}

	let container = Container::new();
	let kept = Arc::new(Mutex::new(Vec::<Arc<Vault>>::new()));

	container
		.collection::<dyn Keeper>()
		.add(Vault::default(), |arc| {
			kept.lock().push(arc.clone());
			arc
		})
		.unwrap()
		.register();

	container.clear();

	let kept = kept.lock();
	assert_eq!(kept.len(), 1);
	assert_eq!(kept[0].disposal_count(), 1);
}

// ---- managed objects ---------------------------------------------------

#[derive(Default)]
struct RecordingHost {
	spawned: Mutex<Vec<&'static str>>,
	destroyed: Mutex<Vec<&'static str>>,
}

impl HostLifecycle for RecordingHost {
	fn on_spawn(&self, handle: &ManagedHandle) {
		self.spawned.lock().push(handle.type_name());
	}

	fn on_destroy(&self, handle: &ManagedHandle) {
		self.destroyed.lock().push(handle.type_name());
	}
}

#[derive(Default)]
struct WorldSim;
impl Injectable for WorldSim {
	fn construct() -> Option<Self> {
		Some(Self::default())
	}
}

#[derive(Default)]
struct UiRoot;
impl Injectable for UiRoot {
	fn construct() -> Option<Self> {
		Some(Self::default())
	}
}

#[test]
fn managed_objects_are_destroyed_in_reverse_spawn_order() {
	let host = Arc::new(RecordingHost::default());
	let container = Container::with_host(host.clone());

	container.spawn_managed::<WorldSim>(true).unwrap();
	container.spawn_managed::<UiRoot>(false).unwrap();

	assert_eq!(host.spawned.lock().len(), 2);

	container.clear();

	let destroyed = host.destroyed.lock();
	assert_eq!(destroyed.len(), 2);
	assert!(destroyed[0].contains("UiRoot"));
	assert!(destroyed[1].contains("WorldSim"));
}

#[test]
fn managed_handles_expose_type_and_persistence() {
	struct ProbeHost {
		persistent_seen: Mutex<Vec<bool>>,
	}
	impl HostLifecycle for ProbeHost {
		fn on_spawn(&self, handle: &ManagedHandle) {
			self.persistent_seen.lock().push(handle.persistent());
			assert!(handle.downcast::<WorldSim>().is_some());
		}
	}

	let host = Arc::new(ProbeHost {
		persistent_seen: Mutex::new(Vec::new()),
	});
	let container = Container::with_host(host.clone());
	container.spawn_managed::<WorldSim>(true).unwrap();

	assert_eq!(*host.persistent_seen.lock(), vec![true]);
}

#[test]
fn unmanaged_spawn_of_non_constructible_type_fails() {
	#[derive(Debug)]
	struct Opaque;
	impl Injectable for Opaque {}

	let container = Container::new();
	let err = container.spawn_managed::<Opaque>(false).unwrap_err();
	assert!(matches!(err, DiError::InvalidBinding { .. }));
}

// ---- validation --------------------------------------------------------

#[test]
fn validate_reports_every_failing_factory() {
	#[derive(Default)]
	struct Good;
	impl Injectable for Good {}

	#[derive(Default)]
	struct BadA;
	impl Injectable for BadA {}

	#[derive(Default)]
	struct BadB;
	impl Injectable for BadB {}

	let container = Container::new();
	container.register_factory(Lifetime::Singleton, || Ok(Good));
	container.register_factory::<BadA, _>(Lifetime::Singleton, || {
		Err(DiError::InvalidBinding {
			type_name: "BadA",
			reason: "backing store unavailable".to_string(),
		})
	});
	container.register_factory::<BadB, _>(Lifetime::Transient, || {
		Err(DiError::InvalidBinding {
			type_name: "BadB",
			reason: "backing store unavailable".to_string(),
		})
	});

	match container.validate().unwrap_err() {
		DiError::FactoryValidation { failures } => {
			assert_eq!(failures.len(), 2);
		}
		other => panic!("expected FactoryValidation, got {other:?}"),
	}
}

#[test]
fn validate_warms_up_singleton_factories() {
	static CALLS: AtomicUsize = AtomicUsize::new(0);

	#[derive(Default)]
	struct Warmed;
	impl Injectable for Warmed {}

	let container = Container::new();
	container.register_factory(Lifetime::Singleton, || {
		CALLS.fetch_add(1, Ordering::SeqCst);
		Ok(Warmed)
	});

	container.validate().unwrap();
	container.resolve::<Warmed>().unwrap();

	// The resolution reused the cache built during validation
	assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn validate_passes_on_an_empty_container() {
	let container = Container::new();
	assert!(container.validate().is_ok());
}
