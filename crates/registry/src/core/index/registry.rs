//! Thread-safe registry entrypoint.
//!
//! # Role
//!
//! [`ComponentRegistry`] wraps [`IndexState`] in a single reader-writer lock and exposes
//! the query surface. Queries try a fast path under a shared read lock and only escalate
//! (upgradable read, then write) when the service still needs lazy resolution.
//!
//! # Invariants
//!
//! - Fast paths never trigger resolution and never observe a half-drained list
//!   (see `invariants::test_fast_path_is_idempotent`).
//! - Decorator lists are cached once per service and never change afterwards
//!   (see `invariants::test_decorator_order_and_cache`).

use std::sync::Arc;

use arc_swap::ArcSwap;
use dashmap::DashMap;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use rustc_hash::FxBuildHasher;
use tracing::debug;

use super::info::{InitState, ServiceRegistrationInfo};
use super::state::IndexState;
use crate::core::error::RegistryError;
use crate::core::options::RegistryOptions;
use crate::core::registration::ComponentRegistration;
use crate::core::service::Service;
use crate::core::source::{RegistrationSource, SourceHandle, SourceId};

/// Ordered decorator registrations for one service.
pub type Decorators = Arc<[Arc<ComponentRegistration>]>;

/// Point-in-time view of one service's registration state.
#[derive(Debug, Clone)]
pub struct ServiceSnapshot {
	pub service: Service,
	pub state: InitState,
	/// Known implementations in insertion order.
	pub implementations: Vec<Arc<ComponentRegistration>>,
	pub default: Option<Arc<ComponentRegistration>>,
	/// How many of `implementations` came from registration sources.
	pub sourced: usize,
}

/// Lazy, thread-safe index of component registrations.
///
/// Dropping the registry runs every registration's release hook.
pub struct ComponentRegistry {
	state: RwLock<IndexState>,
	/// Published copy of the source list for lock-free enumeration.
	sources: ArcSwap<Vec<SourceHandle>>,
	decorators: DashMap<Service, Decorators, FxBuildHasher>,
}

impl ComponentRegistry {
	pub fn new() -> Self {
		Self::with_options(RegistryOptions::default())
	}

	pub fn with_options(options: RegistryOptions) -> Self {
		let state = IndexState::new(options);
		let sources = ArcSwap::new(Arc::clone(state.sources()));
		Self {
			state: RwLock::new(state),
			sources,
			decorators: DashMap::with_hasher(FxBuildHasher),
		}
	}

	pub fn options(&self) -> RegistryOptions {
		self.state.read().options()
	}

	/// Adds `registration` under every service it declares.
	///
	/// With `preserve_defaults == false` the registration becomes the default of each of
	/// its services. Adding the same registration twice creates two entries.
	pub fn add_registration(&self, registration: Arc<ComponentRegistration>, preserve_defaults: bool) {
		self.state.write().add_registration(registration, preserve_defaults, false);
	}

	/// Adds a dynamic source with priority over every source added before it.
	///
	/// Services already resolved reopen so the new source can contribute on their next query.
	pub fn add_registration_source(&self, source: Arc<dyn RegistrationSource>) -> Result<SourceId, RegistryError> {
		let mut state = self.state.write();
		let handle = state.add_source(source)?;
		self.sources.store(Arc::clone(state.sources()));
		debug!(source = %handle.id(), name = handle.name(), "registration source added");
		Ok(handle.id())
	}

	/// Returns the default implementation of `service`, if any.
	pub fn try_get_registration(&self, service: &Service) -> Result<Option<Arc<ComponentRegistration>>, RegistryError> {
		self.query(
			service,
			|info| {
				if info.is_initialized() {
					Some(info.try_get_registration().cloned())
				} else {
					info.explicit_default().map(|default| Some(Arc::clone(default)))
				}
			},
			|info| info.try_get_registration().cloned(),
		)
	}

	pub fn is_registered(&self, service: &Service) -> Result<bool, RegistryError> {
		self.query(
			service,
			|info| (info.is_initialized() || info.is_registered()).then(|| info.is_registered()),
			ServiceRegistrationInfo::is_registered,
		)
	}

	/// Returns every implementation of `service` in insertion order.
	pub fn registrations_for(&self, service: &Service) -> Result<Vec<Arc<ComponentRegistration>>, RegistryError> {
		self.query(
			service,
			|info| info.is_initialized().then(|| info.implementations().to_vec()),
			|info| info.implementations().to_vec(),
		)
	}

	/// Returns the decorators for the runtime type of `service`, earliest registered first.
	///
	/// Single-component adapters are excluded. The result is computed once per service and
	/// cached for the registry's lifetime.
	pub fn decorators_for(&self, service: &Service) -> Result<Decorators, RegistryError> {
		if let Some(cached) = self.decorators.get(service) {
			return Ok(Arc::clone(cached.value()));
		}

		let key = service
			.decorator_key()
			.ok_or(RegistryError::InvalidArgument("decorator lookup requires a typed or keyed service"))?;
		let mut decorators = self.registrations_for(&key)?;
		decorators.retain(|registration| !registration.is_adapter_for_individual_component());
		decorators.sort_by_key(|registration| registration.order());

		let entry = self.decorators.entry(service.clone()).or_insert_with(|| decorators.into());
		Ok(Arc::clone(entry.value()))
	}

	/// Snapshot of every registration added so far, in insertion order.
	pub fn registrations(&self) -> Vec<Arc<ComponentRegistration>> {
		self.state.read().registrations().to_vec()
	}

	/// Snapshot of the source list, most recently added first.
	pub fn sources(&self) -> Arc<Vec<SourceHandle>> {
		self.sources.load_full()
	}

	/// Describes the current state of `service` without resolving it.
	pub fn service_snapshot(&self, service: &Service) -> Option<ServiceSnapshot> {
		let state = self.state.read();
		let info = state.info(service)?;
		Some(ServiceSnapshot {
			service: info.service().clone(),
			state: info.state(),
			implementations: info.implementations().to_vec(),
			default: info.try_get_registration().cloned(),
			sourced: info.sourced_count(),
		})
	}

	/// Tears the registry down, running every registration's release hook.
	pub fn dispose(self) {
		drop(self);
	}

	/// Answers from `fast` when possible, otherwise resolves `service` and answers from `resolved`.
	fn query<R>(
		&self,
		service: &Service,
		fast: impl Fn(&ServiceRegistrationInfo) -> Option<R>,
		resolved: impl FnOnce(&ServiceRegistrationInfo) -> R,
	) -> Result<R, RegistryError> {
		if let Some(hit) = self.state.read().info(service).and_then(&fast) {
			return Ok(hit);
		}

		let state = self.state.upgradable_read();
		if let Some(hit) = state.info(service).and_then(&fast) {
			return Ok(hit);
		}
		let mut state = RwLockUpgradableReadGuard::upgrade(state);
		let info = state.resolve(service)?;
		Ok(resolved(info))
	}
}

impl Default for ComponentRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl Drop for ComponentRegistry {
	fn drop(&mut self) {
		let released = self.state.get_mut().release_all();
		self.decorators.clear();
		debug!(released, "component registry disposed");
	}
}
