//! Registration sources.
//!
//! A [`RegistrationSource`] produces registrations on demand for a requested
//! service. The index asks each source at most once per service.

use std::fmt;
use std::sync::Arc;

use super::error::SourceError;
use super::index::Resolver;
use super::registration::ComponentRegistration;
use super::service::Service;

/// Registrations produced by a source for one request.
pub type Produced = Result<Vec<Arc<ComponentRegistration>>, SourceError>;

/// Provider of registrations synthesized on demand.
///
/// Implementations must terminate, must not assume any call order, and must
/// resolve other services only through the `resolver` they are handed.
pub trait RegistrationSource: Send + Sync {
	/// Produces registrations satisfying `service`.
	///
	/// Returning an empty list means this source has nothing for `service`.
	fn registrations_for(&self, service: &Service, resolver: &mut Resolver<'_>) -> Produced;

	/// Name used in logs and errors.
	fn name(&self) -> &'static str {
		std::any::type_name::<Self>()
	}
}

/// Identity of a source within one index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u64);

impl SourceId {
	pub(crate) const fn new(raw: u64) -> Self {
		Self(raw)
	}

	pub fn as_u64(self) -> u64 {
		self.0
	}
}

impl fmt::Display for SourceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "source#{}", self.0)
	}
}

/// A source registered with an index, tagged with its [`SourceId`].
#[derive(Clone)]
pub struct SourceHandle {
	id: SourceId,
	source: Arc<dyn RegistrationSource>,
}

impl SourceHandle {
	pub(crate) fn new(id: SourceId, source: Arc<dyn RegistrationSource>) -> Self {
		Self { id, source }
	}

	pub fn id(&self) -> SourceId {
		self.id
	}

	pub fn source(&self) -> &Arc<dyn RegistrationSource> {
		&self.source
	}

	pub fn name(&self) -> &'static str {
		self.source.name()
	}

	/// Returns `true` if `other` is the same source instance.
	pub fn is_instance(&self, other: &Arc<dyn RegistrationSource>) -> bool {
		std::ptr::addr_eq(Arc::as_ptr(&self.source), Arc::as_ptr(other))
	}

	pub(crate) fn produce(&self, service: &Service, resolver: &mut Resolver<'_>) -> Produced {
		self.source.registrations_for(service, resolver)
	}
}

impl fmt::Debug for SourceHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SourceHandle").field("id", &self.id).field("name", &self.name()).finish()
	}
}

/// Source backed by a closure.
pub struct FnSource<F> {
	name: &'static str,
	produce: F,
}

impl<F> FnSource<F>
where
	F: Fn(&Service, &mut Resolver<'_>) -> Produced + Send + Sync,
{
	pub fn new(name: &'static str, produce: F) -> Self {
		Self { name, produce }
	}
}

impl<F> RegistrationSource for FnSource<F>
where
	F: Fn(&Service, &mut Resolver<'_>) -> Produced + Send + Sync,
{
	fn registrations_for(&self, service: &Service, resolver: &mut Resolver<'_>) -> Produced {
		(self.produce)(service, resolver)
	}

	fn name(&self) -> &'static str {
		self.name
	}
}

/// Wraps a closure as a shareable source.
pub fn source_fn<F>(name: &'static str, produce: F) -> Arc<dyn RegistrationSource>
where
	F: Fn(&Service, &mut Resolver<'_>) -> Produced + Send + Sync + 'static,
{
	Arc::new(FnSource::new(name, produce))
}
