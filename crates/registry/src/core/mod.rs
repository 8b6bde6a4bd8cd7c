//! Shared registry infrastructure.

pub mod error;
pub mod index;
pub mod options;
pub mod registration;
pub mod service;
pub mod source;

pub use error::{RegistryError, SourceError};
pub use index::{ComponentRegistry, Decorators, InitState, Resolver, ServiceSnapshot};
pub use options::{DuplicateSourcePolicy, RegistryOptions, SourceFailurePolicy};
pub use registration::{ComponentRegistration, RegistrationBuilder, RegistrationId, ReleaseHook};
pub use service::{Service, TypeKey, Wrapper};
pub use source::{FnSource, Produced, RegistrationSource, SourceHandle, SourceId, source_fn};
