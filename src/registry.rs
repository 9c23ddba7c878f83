//! Registration storage
//!
//! Three stores back the container: keyed bindings (instances and
//! factories), per-interface implementation sets for multi-binding
//! resolution, and pre-supplied collections. Values are type-erased behind
//! `Arc<dyn Any + Send + Sync>`, with a monomorphized disposer captured at
//! registration time so teardown can release them without knowing their
//! concrete types.

use crate::container::Container;
use crate::error::{DiResult, ValidationFailure};
use crate::injectable::Injectable;
use crate::key::ServiceKey;
use crate::lifetime::Lifetime;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

pub(crate) type DisposeFn = fn(&(dyn Any + Send + Sync)) -> DiResult<()>;

/// Disposer for a binding whose concrete type is `T`.
pub(crate) fn dispose_erased<T: Injectable>(instance: &(dyn Any + Send + Sync)) -> DiResult<()> {
	match instance.downcast_ref::<T>() {
		Some(value) => value.dispose(),
		None => Ok(()),
	}
}

/// Disposer for bindings whose concrete type is not known (trait handles).
pub(crate) fn dispose_noop(_instance: &(dyn Any + Send + Sync)) -> DiResult<()> {
	Ok(())
}

pub(crate) type FactoryFn =
	Arc<dyn Fn(&Container) -> DiResult<Arc<dyn Any + Send + Sync>> + Send + Sync>;

pub(crate) enum Provider {
	/// Already-constructed instance, always a singleton
	Instance(Arc<dyn Any + Send + Sync>),
	/// Deferred constructor, invoked on first resolution
	Factory(FactoryFn),
}

pub(crate) struct Binding {
	pub(crate) lifetime: Lifetime,
	pub(crate) provider: Provider,
	/// First successful factory result, for singleton factories
	pub(crate) cached: Option<Arc<dyn Any + Send + Sync>>,
	pub(crate) dispose: DisposeFn,
}

impl Binding {
	pub(crate) fn cached_instance(&self) -> Option<Arc<dyn Any + Send + Sync>> {
		match &self.provider {
			Provider::Instance(instance) => Some(instance.clone()),
			Provider::Factory(_) => self.cached.clone(),
		}
	}
}

/// A produced implementation: the coerced handle plus the erased concrete
/// instance kept for disposal.
pub(crate) struct ProducedImpl<I: ?Sized> {
	pub(crate) shared: Arc<I>,
	pub(crate) erased: Arc<dyn Any + Send + Sync>,
	pub(crate) dispose: DisposeFn,
}

impl<I: ?Sized> Clone for ProducedImpl<I> {
	fn clone(&self) -> Self {
		Self {
			shared: self.shared.clone(),
			erased: self.erased.clone(),
			dispose: self.dispose,
		}
	}
}

pub(crate) type ProduceFn<I> =
	Box<dyn Fn(&Container) -> DiResult<ProducedImpl<I>> + Send + Sync>;

pub(crate) struct ImplementationEntry<I: ?Sized> {
	pub(crate) impl_name: &'static str,
	pub(crate) lifetime: Lifetime,
	pub(crate) cached: RwLock<Option<ProducedImpl<I>>>,
	pub(crate) produce: ProduceFn<I>,
}

/// Ordered implementations registered against one interface type.
pub(crate) struct ImplementationSet<I: ?Sized + 'static> {
	entries: RwLock<Vec<Arc<ImplementationEntry<I>>>>,
}

impl<I> ImplementationSet<I>
where
	I: ?Sized + Send + Sync + 'static,
{
	pub(crate) fn new() -> Self {
		Self {
			entries: RwLock::new(Vec::new()),
		}
	}

	pub(crate) fn push(&self, entry: ImplementationEntry<I>) {
		self.entries.write().push(Arc::new(entry));
	}

	pub(crate) fn snapshot(&self) -> Vec<Arc<ImplementationEntry<I>>> {
		self.entries.read().clone()
	}
}

/// Type-erased view of an [`ImplementationSet`], so the registry can hold
/// sets for arbitrary interface types and still validate and tear them down.
pub(crate) trait AnyImplementationSet: Any + Send + Sync {
	fn as_any(&self) -> &dyn Any;
	fn interface_name(&self) -> &'static str;
	fn validate(&self, container: &Container) -> Vec<ValidationFailure>;
	fn dispose_cached(&self);
}

impl<I> AnyImplementationSet for ImplementationSet<I>
where
	I: ?Sized + Send + Sync + 'static,
{
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn interface_name(&self) -> &'static str {
		std::any::type_name::<I>()
	}

	fn validate(&self, container: &Container) -> Vec<ValidationFailure> {
		let mut failures = Vec::new();
		for entry in self.snapshot() {
			if entry.cached.read().is_some() {
				continue;
			}
			match (entry.produce)(container) {
				Ok(produced) => {
					if entry.lifetime == Lifetime::Singleton {
						*entry.cached.write() = Some(produced);
					}
				}
				Err(err) => failures.push(ValidationFailure {
					key: format!("{} <- {}", std::any::type_name::<I>(), entry.impl_name),
					error: err.to_string(),
				}),
			}
		}
		failures
	}

	fn dispose_cached(&self) {
		for entry in self.snapshot() {
			if let Some(cached) = entry.cached.write().take() {
				if let Err(err) = (cached.dispose)(&*cached.erased) {
					tracing::error!(
						ty = entry.impl_name,
						error = %err,
						"disposal failed during teardown"
					);
				}
			}
		}
	}
}

/// One collection item kept in erased form for disposal.
pub(crate) struct TeardownEntry {
	pub(crate) type_name: &'static str,
	pub(crate) erased: Arc<dyn Any + Send + Sync>,
	pub(crate) dispose: DisposeFn,
}

/// A pre-supplied, singleton-bound collection for one interface type.
pub(crate) struct CollectionSlot {
	pub(crate) interface_name: &'static str,
	/// `Vec<Arc<I>>` behind `dyn Any`
	pub(crate) items: Box<dyn Any + Send + Sync>,
	pub(crate) teardown: Vec<TeardownEntry>,
}

#[derive(Default)]
pub(crate) struct Registry {
	pub(crate) bindings: HashMap<ServiceKey, Binding>,
	pub(crate) implementations: HashMap<TypeId, Arc<dyn AnyImplementationSet>>,
	pub(crate) collections: HashMap<TypeId, CollectionSlot>,
}

impl Registry {
	/// Insert a binding, replacing (and warning about) any previous one.
	pub(crate) fn insert_binding(&mut self, key: ServiceKey, binding: Binding) {
		if self.bindings.insert(key.clone(), binding).is_some() {
			tracing::warn!(service = %key, "overwriting existing registration");
		}
	}
}
