use std::sync::Arc;

use proptest::prelude::*;

use super::test_fixtures::{Alpha, RecordingSource, alpha, beta, component, gamma};
use super::{ComponentRegistry, InitState};
use crate::core::registration::ComponentRegistration;
use crate::core::service::Service;

fn orders(registrations: &[Arc<ComponentRegistration>]) -> Vec<u64> {
	registrations.iter().map(|r| r.order()).collect()
}

/// Invariant: a source is asked at most once per service, across recursive chains.
///
/// `chain` answers A by resolving B, B by resolving C, and produces a registration for
/// every pair along the way; `fanout` answers every service with a registration that also
/// provides the other two.
pub(crate) fn inv_at_most_once_synthesis() {
	let registry = ComponentRegistry::new();
	let chain = RecordingSource::new("chain", |service, resolver| {
		if *service == alpha() {
			resolver.registrations_for(&beta())?;
			return Ok(vec![component("chain-ab", [alpha(), beta()])]);
		}
		if *service == beta() {
			resolver.registrations_for(&gamma())?;
			return Ok(vec![component("chain-bc", [beta(), gamma()])]);
		}
		Ok(Vec::new())
	});
	let fanout = RecordingSource::new("fanout", |service, _| {
		let mut services = vec![service.clone()];
		services.extend([alpha(), beta(), gamma()].into_iter().filter(|s| s != service));
		Ok(vec![component("fanout", services)])
	});
	registry.add_registration_source(chain.clone()).unwrap();
	registry.add_registration_source(fanout.clone()).unwrap();

	for service in [alpha(), beta(), gamma(), alpha(), gamma()] {
		registry.registrations_for(&service).unwrap();
	}

	for service in [alpha(), beta(), gamma()] {
		assert!(chain.calls_for(&service) <= 1, "chain asked twice for {service}");
		assert!(fanout.calls_for(&service) <= 1, "fanout asked twice for {service}");
	}
	assert_eq!(fanout.calls().len(), 1, "one fanout answer covers every service");
}

#[cfg_attr(test, test)]
pub(crate) fn test_at_most_once_synthesis() {
	inv_at_most_once_synthesis()
}

/// Invariant: concurrent first-time queries never synthesize twice.
pub(crate) fn inv_concurrent_first_queries() {
	let registry = ComponentRegistry::new();
	let services = [alpha(), beta(), gamma(), Service::keyed::<Alpha>("x"), Service::keyed::<Alpha>("y")];
	let source = RecordingSource::new("per-service", |service, resolver| {
		if *service == alpha() {
			resolver.registrations_for(&gamma())?;
			return Ok(vec![component("alpha+beta", [alpha(), beta()])]);
		}
		Ok(vec![component("single", [service.clone()])])
	});
	registry.add_registration_source(source.clone()).unwrap();

	let results: Vec<Vec<Vec<u64>>> = std::thread::scope(|scope| {
		let handles: Vec<_> = (0..8)
			.map(|offset| {
				let registry = &registry;
				let services = &services;
				scope.spawn(move || {
					(0..services.len())
						.map(|i| &services[(i + offset) % services.len()])
						.map(|service| orders(&registry.registrations_for(service).unwrap()))
						.collect::<Vec<_>>()
				})
			})
			.collect();
		handles.into_iter().map(|h| h.join().unwrap()).collect()
	});

	for service in &services {
		assert!(source.calls_for(service) <= 1, "source asked twice for {service}");
	}
	let settled: Vec<_> = services
		.iter()
		.map(|service| orders(&registry.registrations_for(service).unwrap()))
		.collect();
	// Registrations only ever append, so every observation is a prefix of the settled list.
	for (offset, per_thread) in results.iter().enumerate() {
		for (i, observed) in per_thread.iter().enumerate() {
			let expected = &settled[(i + offset) % services.len()];
			assert!(!observed.is_empty(), "thread {offset} saw an unresolved service");
			assert!(expected.starts_with(observed), "thread {offset} saw {observed:?}, settled {expected:?}");
		}
	}
}

#[cfg_attr(test, test)]
pub(crate) fn test_concurrent_first_queries() {
	inv_concurrent_first_queries()
}

/// Invariant: the default is the latest registration added without preserving defaults.
pub(crate) fn inv_default_stability(preserve: &[bool]) -> Result<(), TestCaseError> {
	let registry = ComponentRegistry::new();
	let added: Vec<_> = preserve
		.iter()
		.enumerate()
		.map(|(i, &keep)| {
			let registration = component(&format!("c{i}"), [alpha()]);
			registry.add_registration(Arc::clone(&registration), keep);
			(registration, keep)
		})
		.collect();

	let expected = added
		.iter()
		.filter(|(_, keep)| !keep)
		.max_by_key(|(registration, _)| registration.order())
		.or_else(|| added.first())
		.map(|(registration, _)| registration.order());
	let actual = registry.try_get_registration(&alpha()).unwrap().map(|r| r.order());
	prop_assert_eq!(actual, expected);

	let listed = orders(&registry.registrations_for(&alpha()).unwrap());
	let inserted: Vec<_> = added.iter().map(|(r, _)| r.order()).collect();
	prop_assert_eq!(listed, inserted);
	Ok(())
}

proptest! {
	#[test]
	fn test_default_stability(preserve in prop::collection::vec(any::<bool>(), 0..12)) {
		inv_default_stability(&preserve)?;
	}
}

/// Invariant: an initialized service answers from the fast path with a stable list.
pub(crate) fn inv_fast_path_is_idempotent() {
	let registry = ComponentRegistry::new();
	registry.add_registration(component("explicit", [alpha()]), false);
	let source = RecordingSource::new("dynamic", |service, _| Ok(vec![component("dynamic", [service.clone()])]));
	registry.add_registration_source(source.clone()).unwrap();

	let first = registry.registrations_for(&alpha()).unwrap();
	for _ in 0..4 {
		let again = registry.registrations_for(&alpha()).unwrap();
		assert_eq!(again.len(), first.len());
		assert!(first.iter().zip(&again).all(|(a, b)| Arc::ptr_eq(a, b)));
	}
	assert!(registry.is_registered(&alpha()).unwrap());
	assert_eq!(source.calls_for(&alpha()), 1);
	assert_eq!(registry.service_snapshot(&alpha()).unwrap().state, InitState::Initialized);
}

#[cfg_attr(test, test)]
pub(crate) fn test_fast_path_is_idempotent() {
	inv_fast_path_is_idempotent()
}

/// Invariant: decorators are sorted by registration order, exclude adapters, and are cached.
pub(crate) fn inv_decorator_order_and_cache() {
	let registry = ComponentRegistry::new();
	let decorator_key = Service::decorator_of::<Alpha>();
	let first = component("first", [decorator_key.clone()]);
	let second = component("second", [decorator_key.clone()]);
	let adapter = ComponentRegistration::builder("adapter")
		.provides(decorator_key.clone())
		.adapts(Arc::clone(&first))
		.build()
		.unwrap();
	let third = component("third", [decorator_key.clone()]);

	// Out of order on purpose: registration order, not insertion order, decides.
	registry.add_registration(Arc::clone(&third), false);
	registry.add_registration(adapter, false);
	registry.add_registration(Arc::clone(&first), false);
	registry.add_registration(Arc::clone(&second), true);

	let decorators = registry.decorators_for(&alpha()).unwrap();
	assert_eq!(orders(&decorators), vec![first.order(), second.order(), third.order()]);

	registry.add_registration(component("late", [decorator_key]), false);
	let cached = registry.decorators_for(&alpha()).unwrap();
	assert!(Arc::ptr_eq(&decorators, &cached), "decorators are cached for the registry's lifetime");
}

#[cfg_attr(test, test)]
pub(crate) fn test_decorator_order_and_cache() {
	inv_decorator_order_and_cache()
}

/// Invariant: a source added after initialization contributes once, without duplicates.
pub(crate) fn inv_late_source_reopens() {
	let registry = ComponentRegistry::new();
	let explicit = component("explicit", [alpha()]);
	registry.add_registration(Arc::clone(&explicit), false);
	assert_eq!(orders(&registry.registrations_for(&alpha()).unwrap()), vec![explicit.order()]);

	let late = RecordingSource::new("late", |service, _| Ok(vec![component("late", [service.clone()])]));
	registry.add_registration_source(late.clone()).unwrap();
	assert_eq!(registry.service_snapshot(&alpha()).unwrap().state, InitState::Initializing);

	let reopened = registry.registrations_for(&alpha()).unwrap();
	assert_eq!(reopened.len(), 2);
	assert!(Arc::ptr_eq(&reopened[0], &explicit));
	assert_eq!(reopened[1].label(), "late");

	let again = registry.registrations_for(&alpha()).unwrap();
	assert_eq!(orders(&again), orders(&reopened));
	assert_eq!(late.calls_for(&alpha()), 1);
}

#[cfg_attr(test, test)]
pub(crate) fn test_late_source_reopens() {
	inv_late_source_reopens()
}
