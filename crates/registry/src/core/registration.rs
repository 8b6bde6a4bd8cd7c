//! Component registrations.
//!
//! A [`ComponentRegistration`] describes one implementation and the services it
//! satisfies. Registrations are immutable once built and shared as `Arc`.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use uuid::Uuid;

use super::error::RegistryError;
use super::service::Service;

/// Process-wide registration order counter.
static NEXT_ORDER: AtomicU64 = AtomicU64::new(1);

/// Hook run once when the owning index is torn down.
pub type ReleaseHook = Box<dyn FnOnce() + Send + 'static>;

/// Stable identity of a registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegistrationId(Uuid);

impl RegistrationId {
	fn new() -> Self {
		Self(Uuid::new_v4())
	}

	pub fn as_uuid(&self) -> Uuid {
		self.0
	}
}

impl fmt::Display for RegistrationId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}

/// Descriptor of one registered implementation.
pub struct ComponentRegistration {
	id: RegistrationId,
	order: u64,
	label: Box<str>,
	services: Box<[Service]>,
	target: Option<Arc<ComponentRegistration>>,
	adapter: bool,
	release: Mutex<Option<ReleaseHook>>,
}

impl ComponentRegistration {
	/// Starts a registration described by `label`.
	pub fn builder(label: impl Into<Box<str>>) -> RegistrationBuilder {
		RegistrationBuilder {
			label: label.into(),
			services: Vec::new(),
			target: None,
			release: None,
		}
	}

	pub fn id(&self) -> RegistrationId {
		self.id
	}

	/// Returns the registration order. Unique and increasing across the process.
	pub fn order(&self) -> u64 {
		self.order
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	/// Services this registration satisfies, in declaration order.
	pub fn services(&self) -> &[Service] {
		&self.services
	}

	pub fn provides(&self, service: &Service) -> bool {
		self.services.contains(service)
	}

	/// Returns `true` if this registration only adapts one other registration.
	pub fn is_adapter_for_individual_component(&self) -> bool {
		self.adapter
	}

	/// Returns the adapted registration for single-component adapters.
	pub fn target(&self) -> Option<&Arc<ComponentRegistration>> {
		self.target.as_ref()
	}

	/// Runs the release hook if it has not run yet. Returns whether it ran.
	pub(crate) fn release(&self) -> bool {
		let hook = self.release.lock().take();
		match hook {
			Some(hook) => {
				hook();
				true
			}
			None => false,
		}
	}
}

impl fmt::Debug for ComponentRegistration {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ComponentRegistration")
			.field("id", &self.id)
			.field("order", &self.order)
			.field("label", &self.label)
			.field("services", &self.services)
			.field("adapter", &self.adapter)
			.field("target", &self.target.as_ref().map(|t| t.id))
			.finish_non_exhaustive()
	}
}

impl fmt::Display for ComponentRegistration {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} (#{})", self.label, self.order)
	}
}

/// Builder for [`ComponentRegistration`].
pub struct RegistrationBuilder {
	label: Box<str>,
	services: Vec<Service>,
	target: Option<Arc<ComponentRegistration>>,
	release: Option<ReleaseHook>,
}

impl RegistrationBuilder {
	/// Declares a provided service. Duplicates are ignored.
	pub fn provides(mut self, service: Service) -> Self {
		if !self.services.contains(&service) {
			self.services.push(service);
		}
		self
	}

	pub fn provides_all(self, services: impl IntoIterator<Item = Service>) -> Self {
		services.into_iter().fold(self, Self::provides)
	}

	/// Marks the registration as an adapter for exactly `target`.
	pub fn adapts(mut self, target: Arc<ComponentRegistration>) -> Self {
		self.target = Some(target);
		self
	}

	pub fn on_release(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
		self.release = Some(Box::new(hook));
		self
	}

	/// Finishes the registration and assigns its order.
	///
	/// Fails when no service was declared.
	pub fn build(self) -> Result<Arc<ComponentRegistration>, RegistryError> {
		if self.services.is_empty() {
			return Err(RegistryError::InvalidArgument("registration declares no services"));
		}
		Ok(Arc::new(ComponentRegistration {
			id: RegistrationId::new(),
			order: NEXT_ORDER.fetch_add(1, Ordering::Relaxed),
			label: self.label,
			services: self.services.into_boxed_slice(),
			adapter: self.target.is_some(),
			target: self.target,
			release: Mutex::new(self.release),
		}))
	}
}
