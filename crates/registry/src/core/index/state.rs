//! Lock-protected index state and the lazy resolution algorithm.
//!
//! # Role
//!
//! [`IndexState`] owns the service map, the flat registration list and the ordered
//! source list. Every method takes `&self`/`&mut self`; the caller holds the matching
//! side of the registry lock.
//!
//! # Invariants
//!
//! - A source is asked at most once per service (see `invariants::test_at_most_once_synthesis`).
//!   - Enforced in: [`IndexState::resolve`] (dequeue marks consulted) and [`IndexState::absorb`]
//!     (skip / pre-seed of the other declared services).
//! - Sources are ordered most-recent-first.
//!   - Enforced in: [`IndexState::add_source`].

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use super::info::{InitState, ServiceRegistrationInfo};
use super::resolver::Resolver;
use crate::core::error::RegistryError;
use crate::core::options::{DuplicateSourcePolicy, RegistryOptions, SourceFailurePolicy};
use crate::core::registration::ComponentRegistration;
use crate::core::service::Service;
use crate::core::source::{RegistrationSource, SourceHandle, SourceId};

pub(crate) struct IndexState {
	infos: FxHashMap<Service, ServiceRegistrationInfo>,
	registrations: Vec<Arc<ComponentRegistration>>,
	/// Global source list, most recently added first.
	sources: Arc<Vec<SourceHandle>>,
	next_source_id: u64,
	options: RegistryOptions,
}

impl IndexState {
	pub(crate) fn new(options: RegistryOptions) -> Self {
		Self {
			infos: FxHashMap::default(),
			registrations: Vec::new(),
			sources: Arc::new(Vec::new()),
			next_source_id: 0,
			options,
		}
	}

	pub(crate) fn options(&self) -> RegistryOptions {
		self.options
	}

	pub(crate) fn info(&self, service: &Service) -> Option<&ServiceRegistrationInfo> {
		self.infos.get(service)
	}

	fn info_mut(&mut self, service: &Service) -> &mut ServiceRegistrationInfo {
		self.infos
			.entry(service.clone())
			.or_insert_with(|| ServiceRegistrationInfo::new(service.clone()))
	}

	pub(crate) fn registrations(&self) -> &[Arc<ComponentRegistration>] {
		&self.registrations
	}

	pub(crate) fn sources(&self) -> &Arc<Vec<SourceHandle>> {
		&self.sources
	}

	/// Adds `registration` under every service it declares and to the flat list.
	pub(crate) fn add_registration(&mut self, registration: Arc<ComponentRegistration>, preserve_defaults: bool, originated_from_source: bool) {
		for service in registration.services() {
			self.info_mut(service)
				.add_implementation(Arc::clone(&registration), preserve_defaults, originated_from_source);
		}
		self.registrations.push(registration);
	}

	/// Puts `source` at the front of the global list and offers it to every known service.
	pub(crate) fn add_source(&mut self, source: Arc<dyn RegistrationSource>) -> Result<SourceHandle, RegistryError> {
		if self.options.duplicate_sources == DuplicateSourcePolicy::Reject
			&& self.sources.iter().any(|existing| existing.is_instance(&source))
		{
			return Err(RegistryError::InvalidArgument("registration source is already registered"));
		}

		let handle = SourceHandle::new(SourceId::new(self.next_source_id), source);
		self.next_source_id += 1;

		let mut sources = Vec::with_capacity(self.sources.len() + 1);
		sources.push(handle.clone());
		sources.extend(self.sources.iter().cloned());
		self.sources = Arc::new(sources);

		for info in self.infos.values_mut() {
			info.include(&handle);
		}
		Ok(handle)
	}

	/// Resolves `service` until every pending source has been consulted.
	///
	/// Re-entrant through [`Resolver`]: a source may resolve other services (or, through a
	/// cycle, this one) while its own production is in flight.
	pub(crate) fn resolve(&mut self, service: &Service) -> Result<&ServiceRegistrationInfo, RegistryError> {
		match self.info_mut(service).state() {
			InitState::Initialized => return Ok(&*self.info_mut(service)),
			InitState::Initializing => {}
			InitState::Unqueried => {
				let sources = Arc::clone(&self.sources);
				self.info_mut(service).begin(sources.iter().cloned());
			}
		}

		while self.info_mut(service).has_pending() {
			let Some(source) = self.info_mut(service).dequeue_next() else {
				break;
			};
			trace!(service = %service, source = %source.id(), name = source.name(), "consulting registration source");

			let produced = source.produce(service, &mut Resolver::new(self));
			let produced = match produced {
				Ok(produced) => produced,
				Err(cause) => {
					warn!(service = %service, source = %source.id(), name = source.name(), error = %cause, "registration source failed");
					let source_name = source.name();
					if self.options.source_failure == SourceFailurePolicy::Retry {
						self.info_mut(service).requeue(source);
					}
					return Err(RegistryError::SourceFailed {
						source_name,
						service: service.clone(),
						cause,
					});
				}
			};

			for registration in produced {
				self.absorb(service, &source, registration);
			}
		}

		let info = self.info_mut(service);
		info.complete();
		debug!(service = %service, implementations = info.implementations().len(), "service initialized");
		Ok(&*info)
	}

	/// Records a registration produced by `source` for `service`.
	///
	/// The other services the registration declares already have their contribution
	/// from `source`, so `source` must not be consulted for them again.
	fn absorb(&mut self, service: &Service, source: &SourceHandle, registration: Arc<ComponentRegistration>) {
		self.add_registration(Arc::clone(&registration), true, true);

		let sources = Arc::clone(&self.sources);
		for additional in registration.services() {
			if additional == service {
				continue;
			}
			let info = self.info_mut(additional);
			match info.state() {
				InitState::Initialized => {}
				InitState::Initializing => {
					trace!(service = %additional, source = %source.id(), "skipping source for in-flight service");
					info.skip(source.id());
				}
				InitState::Unqueried => {
					trace!(service = %additional, source = %source.id(), "pre-seeding service without source");
					info.skip(source.id());
					info.begin(sources.iter().cloned());
				}
			}
		}
	}

	/// Runs every registration's release hook. Returns how many hooks ran.
	pub(crate) fn release_all(&mut self) -> usize {
		self.registrations
			.drain(..)
			.filter(|registration| registration.release())
			.count()
	}
}
