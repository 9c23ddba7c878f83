//! The service container
//!
//! An explicitly constructed registry: build one [`Container`] at process
//! start, hand references to the subsystems that register and resolve
//! services, and [`clear`](Container::clear) it at shutdown. There is no
//! process-global instance; tests construct their own fresh container.

use crate::cycle::ResolutionTracker;
use crate::error::{DiError, DiResult, ValidationFailure};
use crate::host::{HostLifecycle, ManagedHandle, NullHost};
use crate::injectable::Injectable;
use crate::injector;
use crate::key::ServiceKey;
use crate::lifetime::Lifetime;
use crate::registry::{
	AnyImplementationSet, Binding, CollectionSlot, FactoryFn, ImplementationEntry,
	ImplementationSet, ProducedImpl, Provider, Registry, TeardownEntry, dispose_erased,
	dispose_noop,
};
use crate::statics::StaticInjectable;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::sync::Arc;

/// A runtime service container.
///
/// Binds service types to instances or factories, resolves object graphs on
/// demand, injects declared members of already-constructed objects, and
/// tears everything down on [`clear`](Container::clear).
///
/// Designed for a single logical thread of control: no lock is held across
/// a factory, injection or hook invocation, and the in-progress resolution
/// set is one shared collection whose consistency is only guaranteed when
/// all calls come from the host's main loop.
///
/// # Examples
///
/// ```
/// use stagehand::{Container, Injectable};
///
/// #[derive(Default)]
/// struct MatchScheduler;
/// impl Injectable for MatchScheduler {
///     fn construct() -> Option<Self> { Some(Self::default()) }
/// }
///
/// let container = Container::new();
/// let first = container.resolve::<MatchScheduler>().unwrap();
/// let second = container.resolve::<MatchScheduler>().unwrap();
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// ```
pub struct Container {
	pub(crate) registry: RwLock<Registry>,
	pub(crate) tracker: ResolutionTracker,
	managed: RwLock<Vec<ManagedHandle>>,
	host: Arc<dyn HostLifecycle>,
}

impl Container {
	/// Creates a container with no host runtime attached.
	pub fn new() -> Self {
		Self::with_host(Arc::new(NullHost))
	}

	/// Creates a container wired to a host object-lifecycle system.
	pub fn with_host(host: Arc<dyn HostLifecycle>) -> Self {
		Self {
			registry: RwLock::new(Registry::default()),
			tracker: ResolutionTracker::default(),
			managed: RwLock::new(Vec::new()),
			host,
		}
	}

	// ---- registration -------------------------------------------------

	/// Binds an already-constructed instance as a singleton.
	///
	/// The instance's own declared members are injected (and its hooks run)
	/// eagerly, before it is stored, so registered singletons never carry
	/// unsatisfied dependencies. Re-registering the same type replaces the
	/// previous binding with a warning.
	pub fn register_instance<T: Injectable>(&self, instance: T) -> DiResult<Arc<T>> {
		let mut instance = instance;
		self.inject(&mut instance)?;
		let shared = Arc::new(instance);
		self.registry.write().insert_binding(
			ServiceKey::of::<T>(),
			Binding {
				lifetime: Lifetime::Singleton,
				provider: Provider::Instance(shared.clone()),
				cached: None,
				dispose: dispose_erased::<T>,
			},
		);
		Ok(shared)
	}

	/// Binds a pre-shared handle as a singleton, as-is.
	///
	/// Unlike [`register_instance`](Container::register_instance) the value
	/// is not injected: a shared handle cannot be mutated, so the caller is
	/// responsible for having wired it up.
	pub fn register_arc<T: Injectable>(&self, instance: Arc<T>) {
		self.registry.write().insert_binding(
			ServiceKey::of::<T>(),
			Binding {
				lifetime: Lifetime::Singleton,
				provider: Provider::Instance(instance),
				cached: None,
				dispose: dispose_erased::<T>,
			},
		);
	}

	/// Binds a zero-argument constructor.
	///
	/// The factory is not invoked until first resolution. Its product is
	/// member-injected before being returned; singleton products are cached,
	/// transient products are built anew per resolution.
	pub fn register_factory<T, F>(&self, lifetime: Lifetime, factory: F)
	where
		T: Injectable,
		F: Fn() -> DiResult<T> + Send + Sync + 'static,
	{
		let erased: FactoryFn = Arc::new(move |container: &Container| {
			let mut value = factory()?;
			container.inject(&mut value)?;
			Ok(Arc::new(value) as Arc<dyn Any + Send + Sync>)
		});
		self.registry.write().insert_binding(
			ServiceKey::of::<T>(),
			Binding {
				lifetime,
				provider: Provider::Factory(erased),
				cached: None,
				dispose: dispose_erased::<T>,
			},
		);
	}

	/// Binds an instance under a composite (type, name) key.
	///
	/// Fails with [`DiError::InvalidBinding`] on an empty name. Like
	/// [`register_instance`](Container::register_instance), the instance is
	/// injected eagerly.
	pub fn register_named<T: Injectable>(
		&self,
		name: impl Into<Cow<'static, str>>,
		instance: T,
	) -> DiResult<Arc<T>> {
		let name = name.into();
		if name.is_empty() {
			return Err(DiError::InvalidBinding {
				type_name: std::any::type_name::<T>(),
				reason: "binding name must not be empty".to_string(),
			});
		}
		let mut instance = instance;
		self.inject(&mut instance)?;
		let shared = Arc::new(instance);
		self.registry.write().insert_binding(
			ServiceKey::named::<T>(name),
			Binding {
				lifetime: Lifetime::Singleton,
				provider: Provider::Instance(shared.clone()),
				cached: None,
				dispose: dispose_erased::<T>,
			},
		);
		Ok(shared)
	}

	/// Binds a pre-shared handle under an interface (trait object) key.
	pub fn register_trait<I>(&self, instance: Arc<I>)
	where
		I: ?Sized + Send + Sync + 'static,
	{
		self.registry.write().insert_binding(
			ServiceKey::of::<I>(),
			Binding {
				lifetime: Lifetime::Singleton,
				provider: Provider::Instance(Arc::new(instance)),
				cached: None,
				dispose: dispose_noop,
			},
		);
	}

	/// Binds a pre-shared handle under a named interface key.
	pub fn register_trait_named<I>(
		&self,
		name: impl Into<Cow<'static, str>>,
		instance: Arc<I>,
	) -> DiResult<()>
	where
		I: ?Sized + Send + Sync + 'static,
	{
		let name = name.into();
		if name.is_empty() {
			return Err(DiError::InvalidBinding {
				type_name: std::any::type_name::<I>(),
				reason: "binding name must not be empty".to_string(),
			});
		}
		self.registry.write().insert_binding(
			ServiceKey::named::<I>(name),
			Binding {
				lifetime: Lifetime::Singleton,
				provider: Provider::Instance(Arc::new(instance)),
				cached: None,
				dispose: dispose_noop,
			},
		);
		Ok(())
	}

	/// Appends `T` to the implementation set of interface `I`.
	///
	/// Installs a deferred producer that constructs `T` through
	/// [`Injectable::construct`], injects it, and coerces it to `Arc<I>`
	/// via `coerce` (usually just `|arc| arc`). Singleton entries cache
	/// their first product; transient entries produce anew per
	/// [`resolve_all`](Container::resolve_all).
	///
	/// ```
	/// use stagehand::{Container, Injectable, Lifetime};
	///
	/// trait Spell: Send + Sync { fn power(&self) -> u32; }
	///
	/// #[derive(Default)]
	/// struct Fireball;
	/// impl Spell for Fireball { fn power(&self) -> u32 { 7 } }
	/// impl Injectable for Fireball {
	///     fn construct() -> Option<Self> { Some(Self::default()) }
	/// }
	///
	/// let container = Container::new();
	/// container.register_implementation::<dyn Spell, Fireball, _>(
	///     Lifetime::Singleton,
	///     |arc| arc,
	/// );
	///
	/// let spells = container.resolve_all::<dyn Spell>();
	/// assert_eq!(spells.len(), 1);
	/// assert_eq!(spells[0].power(), 7);
	/// ```
	pub fn register_implementation<I, T, C>(&self, lifetime: Lifetime, coerce: C)
	where
		I: ?Sized + Send + Sync + 'static,
		T: Injectable,
		C: Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static,
	{
		let produce: crate::registry::ProduceFn<I> = Box::new(move |container: &Container| {
			let _guard = container.tracker.begin(ServiceKey::of::<T>())?;
			let mut value = T::construct().ok_or_else(|| DiError::InvalidBinding {
				type_name: std::any::type_name::<T>(),
				reason: "implementation type has no parameterless constructor".to_string(),
			})?;
			container.inject(&mut value)?;
			let concrete = Arc::new(value);
			Ok(ProducedImpl {
				erased: concrete.clone(),
				dispose: dispose_erased::<T>,
				shared: coerce(concrete),
			})
		});

		let entry = ImplementationEntry {
			impl_name: std::any::type_name::<T>(),
			lifetime,
			cached: RwLock::new(None),
			produce,
		};

		let mut registry = self.registry.write();
		let slot = registry
			.implementations
			.entry(TypeId::of::<I>())
			.or_insert_with(|| Arc::new(ImplementationSet::<I>::new()));
		if let Some(set) = slot.as_any().downcast_ref::<ImplementationSet<I>>() {
			set.push(entry);
		}
	}

	/// Starts a pre-supplied collection binding for interface `I`.
	///
	/// Every added item is member-injected at registration time; the
	/// finished collection is bound as a singleton and returned verbatim by
	/// [`resolve_all`](Container::resolve_all).
	pub fn collection<I>(&self) -> CollectionBuilder<'_, I>
	where
		I: ?Sized + Send + Sync + 'static,
	{
		CollectionBuilder {
			container: self,
			items: Vec::new(),
			teardown: Vec::new(),
		}
	}

	// ---- resolution ---------------------------------------------------

	/// Resolves a service for `T`.
	///
	/// Lookup order: cached/instance binding, then factory binding (caching
	/// singleton products), then implicit fallback: a type whose
	/// [`Injectable::construct`] returns `Some` is constructed, injected,
	/// promoted to a singleton and returned. Everything else fails with
	/// [`DiError::NotRegistered`].
	pub fn resolve<T: Injectable>(&self) -> DiResult<Arc<T>> {
		let key = ServiceKey::of::<T>();
		let _guard = self.tracker.begin(key.clone())?;

		enum Hit {
			Instance(Arc<dyn Any + Send + Sync>),
			Factory(FactoryFn, Lifetime),
			Miss,
		}

		let hit = {
			let registry = self.registry.read();
			match registry.bindings.get(&key) {
				Some(binding) => match binding.cached_instance() {
					Some(instance) => Hit::Instance(instance),
					None => match &binding.provider {
						Provider::Factory(factory) => {
							Hit::Factory(factory.clone(), binding.lifetime)
						}
						Provider::Instance(instance) => Hit::Instance(instance.clone()),
					},
				},
				None => Hit::Miss,
			}
		};

		match hit {
			Hit::Instance(instance) => downcast_shared::<T>(instance),
			Hit::Factory(factory, lifetime) => {
				let produced = factory(self)?;
				if lifetime == Lifetime::Singleton {
					let mut registry = self.registry.write();
					if let Some(binding) = registry.bindings.get_mut(&key) {
						binding.cached = Some(produced.clone());
					}
				}
				downcast_shared::<T>(produced)
			}
			Hit::Miss => match T::construct() {
				Some(mut value) => {
					tracing::debug!(
						ty = std::any::type_name::<T>(),
						"promoting constructible type to implicit singleton"
					);
					self.inject(&mut value)?;
					let shared = Arc::new(value);
					self.registry.write().insert_binding(
						key,
						Binding {
							lifetime: Lifetime::Singleton,
							provider: Provider::Instance(shared.clone()),
							cached: None,
							dispose: dispose_erased::<T>,
						},
					);
					Ok(shared)
				}
				None => Err(DiError::NotRegistered(std::any::type_name::<T>())),
			},
		}
	}

	/// Resolves a service for the composite (type, name) key.
	///
	/// Named lookups have no implicit fallback; a miss is
	/// [`DiError::NamedNotRegistered`].
	pub fn resolve_named<T: Injectable>(&self, name: &str) -> DiResult<Arc<T>> {
		let key = ServiceKey::named::<T>(name.to_string());
		let _guard = self.tracker.begin(key.clone())?;

		let instance = {
			let registry = self.registry.read();
			registry
				.bindings
				.get(&key)
				.and_then(|binding| binding.cached_instance())
		};
		match instance {
			Some(instance) => downcast_shared::<T>(instance),
			None => Err(DiError::NamedNotRegistered {
				type_name: std::any::type_name::<T>(),
				name: name.to_string(),
			}),
		}
	}

	/// Resolves the handle bound for interface `I`.
	pub fn resolve_trait<I>(&self) -> DiResult<Arc<I>>
	where
		I: ?Sized + Send + Sync + 'static,
	{
		let key = ServiceKey::of::<I>();
		let instance = {
			let registry = self.registry.read();
			registry
				.bindings
				.get(&key)
				.and_then(|binding| binding.cached_instance())
		};
		match instance {
			Some(instance) => downcast_trait::<I>(instance),
			None => Err(DiError::NotRegistered(std::any::type_name::<I>())),
		}
	}

	/// Resolves the handle bound for a named interface key.
	pub fn resolve_trait_named<I>(&self, name: &str) -> DiResult<Arc<I>>
	where
		I: ?Sized + Send + Sync + 'static,
	{
		let key = ServiceKey::named::<I>(name.to_string());
		let instance = {
			let registry = self.registry.read();
			registry
				.bindings
				.get(&key)
				.and_then(|binding| binding.cached_instance())
		};
		match instance {
			Some(instance) => downcast_trait::<I>(instance),
			None => Err(DiError::NamedNotRegistered {
				type_name: std::any::type_name::<I>(),
				name: name.to_string(),
			}),
		}
	}

	/// Like [`resolve`](Container::resolve), but never fails: any
	/// resolution error (including a detected cycle) is swallowed.
	pub fn try_resolve<T: Injectable>(&self) -> Option<Arc<T>> {
		self.resolve::<T>().ok()
	}

	/// Like [`resolve_named`](Container::resolve_named), but never fails.
	pub fn try_resolve_named<T: Injectable>(&self, name: &str) -> Option<Arc<T>> {
		self.resolve_named::<T>(name).ok()
	}

	/// Like [`resolve_trait`](Container::resolve_trait), but never fails.
	pub fn try_resolve_trait<I>(&self) -> Option<Arc<I>>
	where
		I: ?Sized + Send + Sync + 'static,
	{
		self.resolve_trait::<I>().ok()
	}

	/// Resolves every implementation bound for interface `I`.
	///
	/// A pre-supplied collection is returned verbatim. Otherwise every
	/// entry of the implementation set resolves in registration order;
	/// entries that fail are skipped with a warning rather than failing the
	/// whole call. No binding at all yields an empty vector.
	pub fn resolve_all<I>(&self) -> Vec<Arc<I>>
	where
		I: ?Sized + Send + Sync + 'static,
	{
		let collection = {
			let registry = self.registry.read();
			registry
				.collections
				.get(&TypeId::of::<I>())
				.and_then(|slot| slot.items.downcast_ref::<Vec<Arc<I>>>())
				.cloned()
		};
		if let Some(items) = collection {
			return items;
		}

		let set: Option<Arc<dyn AnyImplementationSet>> = {
			let registry = self.registry.read();
			registry.implementations.get(&TypeId::of::<I>()).cloned()
		};
		let Some(set) = set else {
			return Vec::new();
		};
		let entries = match set.as_any().downcast_ref::<ImplementationSet<I>>() {
			Some(set) => set.snapshot(),
			None => return Vec::new(),
		};

		let mut resolved = Vec::with_capacity(entries.len());
		for entry in entries {
			let cached = entry.cached.read().clone();
			if let Some(cached) = cached {
				resolved.push(cached.shared);
				continue;
			}
			match (entry.produce)(self) {
				Ok(produced) => {
					resolved.push(produced.shared.clone());
					if entry.lifetime == Lifetime::Singleton {
						*entry.cached.write() = Some(produced);
					}
				}
				Err(err) => {
					tracing::warn!(
						interface = set.interface_name(),
						implementation = entry.impl_name,
						error = %err,
						"skipping implementation that failed to resolve"
					);
				}
			}
		}
		resolved
	}

	// ---- injection ----------------------------------------------------

	/// Injects the declared members of `target` and runs its hooks.
	///
	/// See [`Injectable::members`] for the declaration side. Required
	/// failures abort the pass; members already assigned keep their values.
	pub fn inject<T: Injectable>(&self, target: &mut T) -> DiResult<()> {
		injector::inject_instance(self, target)
	}

	/// Populates the static service slots declared by `T`.
	///
	/// No hooks run for type tokens.
	pub fn inject_statics<T: StaticInjectable>(&self) -> DiResult<()> {
		injector::inject_statics::<T>(self)
	}

	// ---- managed objects ----------------------------------------------

	/// Constructs a long-lived managed object through the host boundary.
	///
	/// The object is built via [`Injectable::construct`], injected, handed
	/// to the host's spawn callback and tracked for teardown by
	/// [`clear`](Container::clear). `persistent` marks it to survive host
	/// context transitions.
	pub fn spawn_managed<T: Injectable>(&self, persistent: bool) -> DiResult<Arc<T>> {
		let mut value = T::construct().ok_or_else(|| DiError::InvalidBinding {
			type_name: std::any::type_name::<T>(),
			reason: "managed type has no parameterless constructor".to_string(),
		})?;
		self.inject(&mut value)?;
		let shared = Arc::new(value);
		let handle = ManagedHandle::new::<T>(persistent, shared.clone());
		self.host.on_spawn(&handle);
		self.managed.write().push(handle);
		Ok(shared)
	}

	// ---- lifecycle ----------------------------------------------------

	/// Removes the registration for `key`, disposing a cached singleton
	/// instance if one exists. Managed objects spawned indirectly by the
	/// instance are not destroyed. Returns whether anything was removed.
	pub fn unregister(&self, key: &ServiceKey) -> bool {
		let removed = self.registry.write().bindings.remove(key);
		let mut any_removed = false;

		if let Some(binding) = removed {
			any_removed = true;
			if let Some(instance) = binding.cached_instance() {
				if let Err(err) = (binding.dispose)(&*instance) {
					tracing::error!(service = %key, error = %err, "disposal failed during unregister");
				}
			}
		}

		if key.name().is_none() {
			let slot = self.registry.write().implementations.remove(&key.type_id());
			if let Some(slot) = slot {
				any_removed = true;
				slot.dispose_cached();
			}
			let collection = self.registry.write().collections.remove(&key.type_id());
			if let Some(collection) = collection {
				any_removed = true;
				dispose_teardown(collection.teardown);
			}
		}

		any_removed
	}

	/// Full teardown.
	///
	/// Disposes every cached singleton (a failing disposal is logged and
	/// never blocks the rest), destroys every tracked managed object
	/// through the host boundary in reverse spawn order, then empties all
	/// internal stores, including the in-progress resolution set.
	pub fn clear(&self) {
		let (bindings, implementations, collections) = {
			let mut registry = self.registry.write();
			(
				std::mem::take(&mut registry.bindings),
				std::mem::take(&mut registry.implementations),
				std::mem::take(&mut registry.collections),
			)
		};

		for (key, binding) in bindings {
			if let Some(instance) = binding.cached_instance() {
				if let Err(err) = (binding.dispose)(&*instance) {
					tracing::error!(service = %key, error = %err, "disposal failed during clear");
				}
			}
		}
		for slot in implementations.into_values() {
			slot.dispose_cached();
		}
		for slot in collections.into_values() {
			dispose_teardown(slot.teardown);
		}

		let handles = std::mem::take(&mut *self.managed.write());
		for handle in handles.into_iter().rev() {
			self.host.on_destroy(&handle);
		}

		self.tracker.clear();
	}

	/// Eagerly invokes every factory binding and implementation producer,
	/// aggregating all failures into one
	/// [`DiError::FactoryValidation`] report.
	///
	/// Singleton products built during validation are cached, so a
	/// successful validation doubles as a warm-up pass.
	pub fn validate(&self) -> DiResult<()> {
		let pending: Vec<(ServiceKey, FactoryFn, Lifetime)> = {
			let registry = self.registry.read();
			registry
				.bindings
				.iter()
				.filter_map(|(key, binding)| {
					if binding.cached.is_some() {
						return None;
					}
					match &binding.provider {
						Provider::Factory(factory) => {
							Some((key.clone(), factory.clone(), binding.lifetime))
						}
						Provider::Instance(_) => None,
					}
				})
				.collect()
		};

		let mut failures = Vec::new();
		for (key, factory, lifetime) in pending {
			let outcome = self
				.tracker
				.begin(key.clone())
				.and_then(|_guard| factory(self));
			match outcome {
				Ok(produced) => {
					if lifetime == Lifetime::Singleton {
						let mut registry = self.registry.write();
						if let Some(binding) = registry.bindings.get_mut(&key) {
							binding.cached = Some(produced);
						}
					}
				}
				Err(err) => failures.push(ValidationFailure {
					key: key.to_string(),
					error: err.to_string(),
				}),
			}
		}

		let sets: Vec<Arc<dyn AnyImplementationSet>> = {
			let registry = self.registry.read();
			registry.implementations.values().cloned().collect()
		};
		for set in sets {
			failures.extend(set.validate(self));
		}

		if failures.is_empty() {
			Ok(())
		} else {
			Err(DiError::FactoryValidation { failures })
		}
	}
}

impl Default for Container {
	fn default() -> Self {
		Self::new()
	}
}

/// Builds a pre-supplied collection binding.
///
/// ```
/// use stagehand::{Container, Injectable};
///
/// trait Achievement: Send + Sync { fn id(&self) -> &'static str; }
///
/// struct FirstBlood;
/// impl Achievement for FirstBlood { fn id(&self) -> &'static str { "first_blood" } }
/// impl Injectable for FirstBlood {}
///
/// let container = Container::new();
/// container
///     .collection::<dyn Achievement>()
///     .add(FirstBlood, |arc| arc)
///     .unwrap()
///     .register();
///
/// assert_eq!(container.resolve_all::<dyn Achievement>().len(), 1);
/// ```
pub struct CollectionBuilder<'c, I: ?Sized + Send + Sync + 'static> {
	container: &'c Container,
	items: Vec<Arc<I>>,
	teardown: Vec<TeardownEntry>,
}

impl<'c, I: ?Sized + Send + Sync + 'static> CollectionBuilder<'c, I> {
	/// Injects `item`'s members, then appends it to the collection through
	/// `coerce` (usually just `|arc| arc`).
	pub fn add<T, C>(mut self, item: T, coerce: C) -> DiResult<Self>
	where
		T: Injectable,
		C: FnOnce(Arc<T>) -> Arc<I>,
	{
		let mut item = item;
		self.container.inject(&mut item)?;
		let concrete = Arc::new(item);
		self.teardown.push(TeardownEntry {
			type_name: std::any::type_name::<T>(),
			erased: concrete.clone(),
			dispose: dispose_erased::<T>,
		});
		self.items.push(coerce(concrete));
		Ok(self)
	}

	/// Installs the collection, replacing (with a warning) any previous
	/// collection bound for `I`.
	pub fn register(self) {
		let mut registry = self.container.registry.write();
		let replaced = registry
			.collections
			.insert(
				TypeId::of::<I>(),
				CollectionSlot {
					interface_name: std::any::type_name::<I>(),
					items: Box::new(self.items),
					teardown: self.teardown,
				},
			)
			.is_some();
		if replaced {
			tracing::warn!(
				interface = std::any::type_name::<I>(),
				"overwriting existing collection binding"
			);
		}
	}
}

fn downcast_shared<T: Injectable>(instance: Arc<dyn Any + Send + Sync>) -> DiResult<Arc<T>> {
	instance
		.downcast::<T>()
		.map_err(|_| DiError::InvalidBinding {
			type_name: std::any::type_name::<T>(),
			reason: "stored instance does not match the requested type".to_string(),
		})
}

fn downcast_trait<I>(instance: Arc<dyn Any + Send + Sync>) -> DiResult<Arc<I>>
where
	I: ?Sized + Send + Sync + 'static,
{
	instance
		.downcast::<Arc<I>>()
		.map(|handle| (*handle).clone())
		.map_err(|_| DiError::InvalidBinding {
			type_name: std::any::type_name::<I>(),
			reason: "stored handle does not match the requested interface".to_string(),
		})
}

fn dispose_teardown(entries: Vec<TeardownEntry>) {
	for entry in entries {
		if let Err(err) = (entry.dispose)(&*entry.erased) {
			tracing::error!(ty = entry.type_name, error = %err, "disposal failed during teardown");
		}
	}
}
