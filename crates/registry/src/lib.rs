//! Lazy component registration index.
//!
//! A [`ComponentRegistry`] holds explicit registrations and a list of
//! [`RegistrationSource`]s that synthesize registrations on demand. Each service is
//! resolved the first time it is queried; afterwards it is answered from a shared read
//! lock without touching the sources again.
//!
//! # Modules
//!
//! - [`core`] - Services, registrations, sources and the index itself
//! - [`sources`] - Built-in collection and adapter sources (feature `builtin-sources`)
//!
//! # Example
//!
//! ```
//! use weave_registry::{ComponentRegistration, ComponentRegistry, Service, source_fn};
//!
//! struct Logger;
//!
//! let registry = ComponentRegistry::new();
//! registry
//! 	.add_registration_source(source_fn("loggers", |service, _| {
//! 		if *service == Service::of::<Logger>() {
//! 			Ok(vec![ComponentRegistration::builder("stderr").provides(service.clone()).build()?])
//! 		} else {
//! 			Ok(Vec::new())
//! 		}
//! 	}))
//! 	.unwrap();
//!
//! let default = registry.try_get_registration(&Service::of::<Logger>()).unwrap();
//! assert_eq!(default.map(|r| r.label().to_owned()).as_deref(), Some("stderr"));
//! ```

pub mod core;
#[cfg(feature = "builtin-sources")]
pub mod sources;

pub use crate::core::{
	ComponentRegistration, ComponentRegistry, Decorators, DuplicateSourcePolicy, FnSource, InitState, Produced,
	RegistrationBuilder, RegistrationId, RegistrationSource, RegistryError, RegistryOptions, ReleaseHook, Resolver,
	Service, ServiceSnapshot, SourceError, SourceFailurePolicy, SourceHandle, SourceId, TypeKey, Wrapper, source_fn,
};
#[cfg(feature = "builtin-sources")]
pub use crate::sources::{AdapterSource, CollectionSource};
