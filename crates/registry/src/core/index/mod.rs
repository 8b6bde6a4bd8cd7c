#![cfg_attr(doc, allow(rustdoc::private_intra_doc_links))]
//! Lazy registration index.
//!
//! # Purpose
//!
//! The `index` subsystem answers "which registrations satisfy service S" and "which
//! decorators apply to S". Answers are computed on first demand from explicit
//! registrations and from pluggable [`crate::RegistrationSource`]s, then cached per service.
//!
//! # Mental Model
//!
//! 1. **Registration:** [`ComponentRegistry::add_registration`] files a registration under
//!    every service it declares. Nothing is resolved yet.
//! 2. **Sources:** [`ComponentRegistry::add_registration_source`] pushes a source to the
//!    front of the global list (latest wins) and offers it to every known service.
//! 3. **Resolution:** the first query for a service snapshots the source list into that
//!    service's pending queue and drains it. Each source receives a [`Resolver`] and may
//!    resolve other services while producing its answer.
//! 4. **Freeze:** once the queue is empty the service is initialized and served from the
//!    fast path until a later source reopens it.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`ComponentRegistry`] | Lock owner and public query surface. |
//! | [`Resolver`] | Recursion capability lent to sources during resolution. |
//! | [`InitState`] | Per-service lifecycle: unqueried, initializing, initialized. |
//! | [`ServiceSnapshot`] | Diagnostics view of one service. |
//!
//! # Concurrency
//!
//! - **Reads:** shared lock; fast path only.
//! - **First-time resolution:** upgradable read, re-check, upgrade to write.
//! - **Recursion:** sources resolve through the borrowed [`Resolver`], never the public API.
//!
//! # Invariants
//!
//! - Must ask each source at most once per service.
//!   - Enforced in: [`state::IndexState::resolve`], [`state::IndexState::absorb`].
//!   - Tested by: `invariants::test_at_most_once_synthesis`, `invariants::test_concurrent_first_queries`,
//!     `tests::test_inflight_service_skips_producing_source`
//!   - Failure symptom: the same component is synthesized twice.
//!
//! - Must keep the most recent non-preserving registration as default.
//!   - Enforced in: [`info::ServiceRegistrationInfo::add_implementation`].
//!   - Tested by: `invariants::test_default_stability`
//!   - Failure symptom: a later explicit registration does not override an earlier one.
//!
//! - Must return a stable list from an initialized service without consulting sources.
//!   - Enforced in: [`ComponentRegistry`] fast paths.
//!   - Tested by: `invariants::test_fast_path_is_idempotent`
//!   - Failure symptom: repeated queries re-run sources or reorder results.
//!
//! - Must order decorators by registration order and cache them.
//!   - Enforced in: [`ComponentRegistry::decorators_for`].
//!   - Tested by: `invariants::test_decorator_order_and_cache`
//!   - Failure symptom: decorators applied in the wrong order or differently per call.
//!
//! - Must let a late source contribute to already-initialized services.
//!   - Enforced in: [`info::ServiceRegistrationInfo::include`].
//!   - Tested by: `invariants::test_late_source_reopens`
//!   - Failure symptom: sources added after first use are ignored.

mod info;
mod registry;
mod resolver;
mod state;

pub use info::InitState;
pub use registry::{ComponentRegistry, Decorators, ServiceSnapshot};
pub use resolver::Resolver;

#[cfg(test)]
mod invariants;

#[cfg(test)]
pub(crate) mod test_fixtures;
