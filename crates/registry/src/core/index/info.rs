//! Per-service registration state.
//!
//! # Role
//!
//! [`ServiceRegistrationInfo`] tracks the known implementations of one service and the
//! sources still to be consulted for it. It knows nothing about locking; every mutation
//! happens while the index write lock is held.
//!
//! # Lifecycle
//!
//! `Unqueried -> Initializing -> Initialized`, once per reopening cycle. Adding a source
//! after initialization reopens the info with that source as the only pending entry.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::core::registration::ComponentRegistration;
use crate::core::service::Service;
use crate::core::source::{SourceHandle, SourceId};

/// Lifecycle state of a [`ServiceRegistrationInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
	/// Never resolved; no pending queue.
	Unqueried,
	/// Pending queue snapshotted; sources are being (or waiting to be) drained.
	Initializing,
	/// Queue drained for every source known at completion time.
	Initialized,
}

impl fmt::Display for InitState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Unqueried => write!(f, "unqueried"),
			Self::Initializing => write!(f, "initializing"),
			Self::Initialized => write!(f, "initialized"),
		}
	}
}

/// Known implementations and pending sources for one service.
pub(crate) struct ServiceRegistrationInfo {
	service: Service,
	implementations: Vec<Arc<ComponentRegistration>>,
	/// Most recent registration added without preserving defaults.
	default: Option<Arc<ComponentRegistration>>,
	/// Number of implementations that came from sources.
	sourced: usize,
	pending: VecDeque<SourceHandle>,
	/// Sources consulted or skipped for this service.
	consulted: FxHashSet<SourceId>,
	state: InitState,
}

impl ServiceRegistrationInfo {
	pub(crate) fn new(service: Service) -> Self {
		Self {
			service,
			implementations: Vec::new(),
			default: None,
			sourced: 0,
			pending: VecDeque::new(),
			consulted: FxHashSet::default(),
			state: InitState::Unqueried,
		}
	}

	pub(crate) fn service(&self) -> &Service {
		&self.service
	}

	pub(crate) fn state(&self) -> InitState {
		self.state
	}

	pub(crate) fn is_initialized(&self) -> bool {
		self.state == InitState::Initialized
	}

	/// Moves to `Initializing` with `sources` as the pending queue.
	///
	/// Sources already consulted or skipped are left out.
	pub(crate) fn begin(&mut self, sources: impl IntoIterator<Item = SourceHandle>) {
		self.pending = sources
			.into_iter()
			.filter(|source| !self.consulted.contains(&source.id()))
			.collect();
		self.state = InitState::Initializing;
	}

	pub(crate) fn has_pending(&self) -> bool {
		!self.pending.is_empty()
	}

	/// Removes the next pending source and marks it consulted.
	pub(crate) fn dequeue_next(&mut self) -> Option<SourceHandle> {
		let source = self.pending.pop_front()?;
		self.consulted.insert(source.id());
		Some(source)
	}

	/// Puts a dequeued source back at the head of the queue and forgets it was consulted.
	pub(crate) fn requeue(&mut self, source: SourceHandle) {
		self.consulted.remove(&source.id());
		self.pending.push_front(source);
	}

	/// Drops `source` from the queue without consulting it.
	pub(crate) fn skip(&mut self, source: SourceId) {
		self.pending.retain(|pending| pending.id() != source);
		self.consulted.insert(source);
	}

	/// Makes a newly added global source visible to this service.
	pub(crate) fn include(&mut self, source: &SourceHandle) {
		if self.consulted.contains(&source.id()) {
			return;
		}
		match self.state {
			InitState::Unqueried => {}
			InitState::Initializing => {
				if !self.pending.iter().any(|pending| pending.id() == source.id()) {
					self.pending.push_front(source.clone());
				}
			}
			InitState::Initialized => {
				self.pending.clear();
				self.pending.push_back(source.clone());
				self.state = InitState::Initializing;
			}
		}
	}

	pub(crate) fn complete(&mut self) {
		self.pending.clear();
		self.state = InitState::Initialized;
	}

	pub(crate) fn add_implementation(&mut self, registration: Arc<ComponentRegistration>, preserve_defaults: bool, originated_from_source: bool) {
		if !preserve_defaults {
			self.default = Some(Arc::clone(&registration));
		}
		if originated_from_source {
			self.sourced += 1;
		}
		self.implementations.push(registration);
	}

	/// Returns the explicit default only; never the first-added fallback.
	pub(crate) fn explicit_default(&self) -> Option<&Arc<ComponentRegistration>> {
		self.default.as_ref()
	}

	/// Returns the current default: the explicit default, else the first implementation.
	pub(crate) fn try_get_registration(&self) -> Option<&Arc<ComponentRegistration>> {
		self.default.as_ref().or_else(|| self.implementations.first())
	}

	pub(crate) fn implementations(&self) -> &[Arc<ComponentRegistration>] {
		&self.implementations
	}

	pub(crate) fn is_registered(&self) -> bool {
		!self.implementations.is_empty()
	}

	pub(crate) fn sourced_count(&self) -> usize {
		self.sourced
	}

	#[cfg(test)]
	pub(crate) fn pending_ids(&self) -> Vec<SourceId> {
		self.pending.iter().map(SourceHandle::id).collect()
	}
}
