//! Service keys.
//!
//! A [`Service`] names a capability a caller can ask the registry for. Keys are
//! cheap to clone, hashable, and never change once built.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identity of a Rust type participating in a service key.
///
/// Equality and hashing use the [`TypeId`] only; the name is carried for display.
#[derive(Clone, Copy)]
pub struct TypeKey {
	id: TypeId,
	name: &'static str,
}

impl TypeKey {
	/// Returns the key for `T`.
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: std::any::type_name::<T>(),
		}
	}

	pub fn type_id(&self) -> TypeId {
		self.id
	}

	pub fn name(&self) -> &'static str {
		self.name
	}
}

impl PartialEq for TypeKey {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Debug for TypeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TypeKey({})", self.name)
	}
}

impl fmt::Display for TypeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

/// Named structural wrapper around another service.
///
/// Wrappers let sources express adapted services (`lazy` of T, `all` of T)
/// without runtime reflection over generic types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Wrapper(&'static str);

impl Wrapper {
	/// Deferred access to a single implementation.
	pub const LAZY: Self = Self("lazy");
	/// Every implementation of the inner service.
	pub const ALL: Self = Self("all");

	pub const fn new(name: &'static str) -> Self {
		Self(name)
	}

	pub const fn name(self) -> &'static str {
		self.0
	}
}

impl fmt::Display for Wrapper {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.0)
	}
}

/// Key identifying a requested capability.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Service {
	/// A service identified by its Rust type.
	Typed(TypeKey),
	/// A type plus a string qualifier.
	Keyed { key: Arc<str>, ty: TypeKey },
	/// A structural wrapper around another service.
	Wrapped { wrapper: Wrapper, inner: Arc<Service> },
	/// Decorators applying to a concrete runtime type.
	Decorator(TypeKey),
}

impl Service {
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self::Typed(TypeKey::of::<T>())
	}

	pub fn keyed<T: ?Sized + 'static>(key: impl Into<Arc<str>>) -> Self {
		Self::Keyed {
			key: key.into(),
			ty: TypeKey::of::<T>(),
		}
	}

	/// Wraps `self` in `wrapper`.
	pub fn wrap(self, wrapper: Wrapper) -> Self {
		Self::Wrapped {
			wrapper,
			inner: Arc::new(self),
		}
	}

	pub fn decorator_of<T: ?Sized + 'static>() -> Self {
		Self::Decorator(TypeKey::of::<T>())
	}

	/// Returns the runtime type for typed and keyed services.
	pub fn service_type(&self) -> Option<TypeKey> {
		match self {
			Self::Typed(ty) | Self::Keyed { ty, .. } => Some(*ty),
			Self::Wrapped { .. } | Self::Decorator(_) => None,
		}
	}

	/// Returns the inner service when `self` is wrapped by `wrapper`.
	pub fn unwrap_as(&self, wrapper: Wrapper) -> Option<&Service> {
		match self {
			Self::Wrapped { wrapper: w, inner } if *w == wrapper => Some(inner),
			_ => None,
		}
	}

	/// Derives the decorator key for this service's runtime type.
	pub fn decorator_key(&self) -> Option<Service> {
		self.service_type().map(Self::Decorator)
	}
}

impl fmt::Display for Service {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Typed(ty) => write!(f, "{ty}"),
			Self::Keyed { key, ty } => write!(f, "{ty} ({key:?})"),
			Self::Wrapped { wrapper, inner } => write!(f, "{wrapper}<{inner}>"),
			Self::Decorator(ty) => write!(f, "decorator<{ty}>"),
		}
	}
}
