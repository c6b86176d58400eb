#![expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]

//! Behavioural tests for the three-tier [`LocationResolver`].

use std::cell::RefCell;
use std::sync::Arc;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use travel_time_core::test_support::{StubGeocodingApi, block_on_for_tests};
use travel_time_core::{
    ApiError, Coordinate, LocationResolver, NamedPlaces, ResolvedLocation,
};

type Outcome = Result<Option<ResolvedLocation>, ApiError>;

#[derive(Debug, Default)]
struct ResolverWorld {
    places: RefCell<NamedPlaces>,
    geocoder: RefCell<StubGeocodingApi>,
    outcome: RefCell<Option<Outcome>>,
}

impl ResolverWorld {
    fn resolved(&self) -> ResolvedLocation {
        self.outcome
            .borrow()
            .clone()
            .expect("a location should have been resolved")
            .expect("resolution should not fail")
            .expect("the location should be resolvable")
    }
}

#[fixture]
fn world() -> ResolverWorld {
    ResolverWorld::default()
}

fn coordinate(text: &str) -> Coordinate {
    text.parse().expect("step should carry a lat,lon pair")
}

#[given("a named place {name} at {coordinates}")]
fn named_place(world: &ResolverWorld, name: String, coordinates: String) {
    world.places.borrow_mut().insert(&name, coordinates);
}

#[given("a geocoder returning {position}")]
fn geocoder_returning(world: &ResolverWorld, position: String) {
    world
        .geocoder
        .replace(StubGeocodingApi::with_position(coordinate(&position)));
}

#[given("a geocoder with no results")]
fn geocoder_without_results(world: &ResolverWorld) {
    world.geocoder.replace(StubGeocodingApi::default());
}

#[when("I resolve {input}")]
fn resolve(world: &ResolverWorld, input: String) {
    let resolver = LocationResolver::new(
        Arc::new(world.places.borrow().clone()),
        Arc::new(world.geocoder.borrow().clone()),
    );
    let outcome = block_on_for_tests(resolver.resolve(&input));
    world.outcome.replace(Some(outcome));
}

#[then("the resolved coordinate is {expected}")]
fn resolved_coordinate(world: &ResolverWorld, expected: String) {
    assert_eq!(world.resolved().location, coordinate(&expected));
}

#[then("the location was not geocoded")]
fn not_geocoded(world: &ResolverWorld) {
    assert!(!world.resolved().geocoded);
}

#[then("the location was geocoded")]
fn geocoded(world: &ResolverWorld) {
    assert!(world.resolved().geocoded);
}

#[then("the geocoder was not called")]
fn geocoder_not_called(world: &ResolverWorld) {
    assert_eq!(world.geocoder.borrow().call_count(), 0);
}

#[then("the location is unresolvable")]
fn unresolvable(world: &ResolverWorld) {
    let outcome = world.outcome.borrow().clone().expect("resolution ran");
    assert_eq!(outcome, Ok(None));
}

#[scenario(path = "tests/features/location_resolver.feature", index = 0)]
fn literal_coordinates(world: ResolverWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/location_resolver.feature", index = 1)]
fn named_places(world: ResolverWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/location_resolver.feature", index = 2)]
fn geocoded_places(world: ResolverWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/location_resolver.feature", index = 3)]
fn unresolvable_places(world: ResolverWorld) {
    let _ = world;
}
