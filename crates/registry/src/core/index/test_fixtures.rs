#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;

use super::resolver::Resolver;
use crate::core::registration::ComponentRegistration;
use crate::core::service::Service;
use crate::core::source::{Produced, RegistrationSource, SourceHandle, SourceId};

pub(crate) struct Alpha;
pub(crate) struct Beta;
pub(crate) struct Gamma;

pub(crate) fn alpha() -> Service {
	Service::of::<Alpha>()
}

pub(crate) fn beta() -> Service {
	Service::of::<Beta>()
}

pub(crate) fn gamma() -> Service {
	Service::of::<Gamma>()
}

pub(crate) fn component(label: &str, services: impl IntoIterator<Item = Service>) -> Arc<ComponentRegistration> {
	ComponentRegistration::builder(label).provides_all(services).build().unwrap()
}

/// Source that never produces anything.
pub(crate) struct EmptySource;

impl RegistrationSource for EmptySource {
	fn registrations_for(&self, _service: &Service, _resolver: &mut Resolver<'_>) -> Produced {
		Ok(Vec::new())
	}
}

pub(crate) fn handle(id: u64) -> SourceHandle {
	SourceHandle::new(SourceId::new(id), Arc::new(EmptySource))
}

type Respond = dyn Fn(&Service, &mut Resolver<'_>) -> Produced + Send + Sync;

/// Source that records every service it is asked for.
pub(crate) struct RecordingSource {
	name: &'static str,
	calls: Mutex<Vec<Service>>,
	respond: Box<Respond>,
}

impl RecordingSource {
	pub(crate) fn new(name: &'static str, respond: impl Fn(&Service, &mut Resolver<'_>) -> Produced + Send + Sync + 'static) -> Arc<Self> {
		Arc::new(Self {
			name,
			calls: Mutex::new(Vec::new()),
			respond: Box::new(respond),
		})
	}

	pub(crate) fn calls(&self) -> Vec<Service> {
		self.calls.lock().clone()
	}

	pub(crate) fn calls_for(&self, service: &Service) -> usize {
		self.calls.lock().iter().filter(|call| *call == service).count()
	}
}

impl RegistrationSource for RecordingSource {
	fn registrations_for(&self, service: &Service, resolver: &mut Resolver<'_>) -> Produced {
		self.calls.lock().push(service.clone());
		(self.respond)(service, resolver)
	}

	fn name(&self) -> &'static str {
		self.name
	}
}
