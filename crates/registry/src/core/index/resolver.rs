use std::sync::Arc;

use super::state::IndexState;
use crate::core::error::RegistryError;
use crate::core::registration::ComponentRegistration;
use crate::core::service::Service;

/// Resolution capability handed to registration sources.
///
/// Borrows the index state held under the registry write lock, so resolving through it
/// recurses on the same lock acquisition instead of re-entering the lock.
pub struct Resolver<'a> {
	state: &'a mut IndexState,
}

impl<'a> Resolver<'a> {
	pub(crate) fn new(state: &'a mut IndexState) -> Self {
		Self { state }
	}

	/// Returns every implementation of `service`, resolving it first if needed.
	///
	/// A service whose resolution is already in flight further up the stack drains the
	/// sources still pending for it and is marked initialized immediately. Registrations
	/// that the outer, in-flight producers return later are appended to it afterwards.
	pub fn registrations_for(&mut self, service: &Service) -> Result<Vec<Arc<ComponentRegistration>>, RegistryError> {
		Ok(self.state.resolve(service)?.implementations().to_vec())
	}

	pub fn try_get_registration(&mut self, service: &Service) -> Result<Option<Arc<ComponentRegistration>>, RegistryError> {
		Ok(self.state.resolve(service)?.try_get_registration().cloned())
	}

	pub fn is_registered(&mut self, service: &Service) -> Result<bool, RegistryError> {
		Ok(self.state.resolve(service)?.is_registered())
	}
}
