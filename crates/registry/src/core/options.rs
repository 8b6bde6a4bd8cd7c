//! Registry configuration.

use serde::{Deserialize, Serialize};

use super::error::RegistryError;

/// What happens to a registration source whose production failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFailurePolicy {
	/// The source stays consulted for that service and is never asked again.
	#[default]
	Consume,
	/// The source returns to the head of the service's queue for the next query.
	Retry,
}

/// How the registry treats a source instance that is added twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateSourcePolicy {
	/// Accept; each addition is a distinct source consulted on its own.
	#[default]
	Allow,
	/// Reject with an invalid-argument error.
	Reject,
}

/// Options for a [`crate::ComponentRegistry`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryOptions {
	pub source_failure: SourceFailurePolicy,
	pub duplicate_sources: DuplicateSourcePolicy,
}

impl RegistryOptions {
	/// Parses options from a TOML document. Missing keys keep their defaults.
	pub fn from_toml(text: &str) -> Result<Self, RegistryError> {
		Ok(toml::from_str(text)?)
	}

	pub fn with_source_failure(mut self, policy: SourceFailurePolicy) -> Self {
		self.source_failure = policy;
		self
	}

	pub fn with_duplicate_sources(mut self, policy: DuplicateSourcePolicy) -> Self {
		self.duplicate_sources = policy;
		self
	}
}
