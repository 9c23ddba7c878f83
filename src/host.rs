//! Host runtime boundary
//!
//! Long-lived managed objects are created through the container but owned
//! by an external host runtime (a scene system, an actor registry). The
//! container notifies the host when it spawns such an object and again when
//! [`clear`](crate::Container::clear) tears it down; everything in between
//! is the host's concern.

use crate::injectable::Injectable;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// Callbacks into the host's object-lifecycle system.
///
/// The default implementations do nothing, so hosts only override what
/// they observe. [`NullHost`] is the stand-in for containers without a
/// host runtime (tests, headless tools).
pub trait HostLifecycle: Send + Sync + 'static {
	/// A managed object was constructed and injected.
	fn on_spawn(&self, _handle: &ManagedHandle) {}

	/// Destroy the managed object now (container teardown).
	fn on_destroy(&self, _handle: &ManagedHandle) {}
}

/// Host that ignores every notification.
pub struct NullHost;

impl HostLifecycle for NullHost {}

/// A container-tracked managed object.
pub struct ManagedHandle {
	type_id: TypeId,
	type_name: &'static str,
	persistent: bool,
	instance: Arc<dyn Any + Send + Sync>,
}

impl ManagedHandle {
	pub(crate) fn new<T: Injectable>(persistent: bool, instance: Arc<T>) -> Self {
		Self {
			type_id: TypeId::of::<T>(),
			type_name: std::any::type_name::<T>(),
			persistent,
			instance,
		}
	}

	/// `TypeId` of the managed object.
	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	/// Type name of the managed object.
	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	/// Whether the object was marked to persist across host context
	/// transitions.
	pub fn persistent(&self) -> bool {
		self.persistent
	}

	/// The managed instance, if it is of type `T`.
	pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
		self.instance.clone().downcast::<T>().ok()
	}
}
