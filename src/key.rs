//! Service keys for registration and lookup

use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Key under which a service is registered and looked up.
///
/// A key is a service type, optionally paired with a binding name. Two keys
/// are equal iff the type and the name (if any) match exactly; the captured
/// type name is diagnostic only.
///
/// Trait objects key directly: `ServiceKey::of::<dyn Renderer>()` is a
/// distinct key from any of its implementations.
///
/// # Examples
///
/// ```
/// use stagehand::ServiceKey;
///
/// struct Database;
///
/// let plain = ServiceKey::of::<Database>();
/// let named = ServiceKey::named::<Database>("replica");
///
/// assert_ne!(plain, named);
/// assert_eq!(named.name(), Some("replica"));
/// ```
#[derive(Debug, Clone)]
pub struct ServiceKey {
	type_id: TypeId,
	type_name: &'static str,
	name: Option<Cow<'static, str>>,
}

impl ServiceKey {
	/// Creates a type-only key for `T`.
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self {
			type_id: TypeId::of::<T>(),
			type_name: std::any::type_name::<T>(),
			name: None,
		}
	}

	/// Creates a composite (type, name) key for `T`.
	pub fn named<T: ?Sized + 'static>(name: impl Into<Cow<'static, str>>) -> Self {
		Self {
			type_id: TypeId::of::<T>(),
			type_name: std::any::type_name::<T>(),
			name: Some(name.into()),
		}
	}

	/// The `TypeId` of the keyed service type.
	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	/// Human-readable type name for diagnostics and error messages.
	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	/// The binding name, or `None` for type-only keys.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}
}

// Equality and hashing cover (type_id, name) only; type_name is display-only.
impl PartialEq for ServiceKey {
	fn eq(&self, other: &Self) -> bool {
		self.type_id == other.type_id && self.name == other.name
	}
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.type_id.hash(state);
		self.name.hash(state);
	}
}

impl fmt::Display for ServiceKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.name {
			Some(name) => write!(f, "{}({})", self.type_name, name),
			None => f.write_str(self.type_name),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Alpha;
	struct Beta;

	#[test]
	fn type_only_keys_compare_by_type() {
		assert_eq!(ServiceKey::of::<Alpha>(), ServiceKey::of::<Alpha>());
		assert_ne!(ServiceKey::of::<Alpha>(), ServiceKey::of::<Beta>());
	}

	#[test]
	fn named_keys_compare_by_type_and_name() {
		assert_eq!(
			ServiceKey::named::<Alpha>("a"),
			ServiceKey::named::<Alpha>("a")
		);
		assert_ne!(
			ServiceKey::named::<Alpha>("a"),
			ServiceKey::named::<Alpha>("b")
		);
		assert_ne!(ServiceKey::named::<Alpha>("a"), ServiceKey::of::<Alpha>());
	}

	#[test]
	fn display_includes_name() {
		let key = ServiceKey::named::<Alpha>("primary");
		let rendered = key.to_string();
		assert!(rendered.ends_with("(primary)"));
	}
}
