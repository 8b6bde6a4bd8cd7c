use crate::core::{ComponentRegistration, Produced, RegistrationSource, Resolver, Service, Wrapper};

/// Answers `all<T>` with one registration standing for the collection of `T`.
///
/// The collection is registrable even when `T` has no implementations; its elements are
/// looked up when the collection is activated, not here.
#[derive(Debug, Default, Clone, Copy)]
pub struct CollectionSource;

impl RegistrationSource for CollectionSource {
	fn registrations_for(&self, service: &Service, _resolver: &mut Resolver<'_>) -> Produced {
		let Some(element) = service.unwrap_as(Wrapper::ALL) else {
			return Ok(Vec::new());
		};
		let registration = ComponentRegistration::builder(format!("all of {element}"))
			.provides(service.clone())
			.build()?;
		Ok(vec![registration])
	}

	fn name(&self) -> &'static str {
		"collection"
	}
}
