use crate::core::{ComponentRegistration, Produced, RegistrationSource, Resolver, Service, Wrapper};

/// Answers `wrapper<T>` with one single-component adapter per implementation of `T`.
#[derive(Debug, Clone, Copy)]
pub struct AdapterSource {
	wrapper: Wrapper,
}

impl AdapterSource {
	pub const fn new(wrapper: Wrapper) -> Self {
		Self { wrapper }
	}

	/// Adapter for [`Wrapper::LAZY`].
	pub const fn lazy() -> Self {
		Self::new(Wrapper::LAZY)
	}

	pub fn wrapper(&self) -> Wrapper {
		self.wrapper
	}
}

impl RegistrationSource for AdapterSource {
	fn registrations_for(&self, service: &Service, resolver: &mut Resolver<'_>) -> Produced {
		let Some(inner) = service.unwrap_as(self.wrapper) else {
			return Ok(Vec::new());
		};
		let mut adapters = Vec::new();
		for target in resolver.registrations_for(inner)? {
			let adapter = ComponentRegistration::builder(format!("{} of {}", self.wrapper, target.label()))
				.provides(service.clone())
				.adapts(target)
				.build()?;
			adapters.push(adapter);
		}
		Ok(adapters)
	}

	fn name(&self) -> &'static str {
		"adapter"
	}
}
