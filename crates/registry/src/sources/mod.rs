//! Built-in registration sources.
//!
//! - [`CollectionSource`] makes `all<T>` resolvable for every service `T`.
//! - [`AdapterSource`] wraps each implementation of `T` in a single-component adapter
//!   registered under `wrapper<T>`.

mod adapter;
mod collection;

pub use adapter::AdapterSource;
pub use collection::CollectionSource;
