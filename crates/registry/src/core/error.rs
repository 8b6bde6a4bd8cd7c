use super::service::Service;

/// Error type returned by registration sources.
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Generic registry error.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
	/// A public operation received an argument it cannot accept; nothing was mutated.
	#[error("invalid argument: {0}")]
	InvalidArgument(&'static str),

	/// A registration source failed while producing registrations.
	#[error("registration source `{source_name}` failed for {service}")]
	SourceFailed {
		source_name: &'static str,
		service: Service,
		#[source]
		cause: SourceError,
	},

	#[error("invalid registry options: {0}")]
	Options(#[from] toml::de::Error),
}
