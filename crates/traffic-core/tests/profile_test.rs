use std::sync::Arc;

use test_fixtures::{make_test_profile, TestShape};
use traffic_core::{Agency, ConvexShape, Profile};

#[test]
fn constructors_set_agency() {
    let shape = TestShape::UnitCircle.shape();

    let strict = Profile::make_strict(shape);
    assert!(strict.is_strict());
    assert_eq!(strict.agency(), Agency::Strict);
    assert!(strict.queue_info().is_none());

    let autonomous = Profile::make_autonomous(shape);
    assert!(autonomous.is_autonomous());

    let queued = Profile::make_queued(shape, "lift-1").unwrap();
    assert!(queued.is_queued());
    assert_eq!(queued.queue_info().unwrap().queue_id(), "lift-1");
    assert_eq!(queued.shape(), shape);
}

#[test]
fn empty_queue_id_is_rejected() {
    let shape = TestShape::UnitBox.shape();
    assert!(Profile::make_queued(shape, "").is_err());
    assert!(Profile::make_queued(shape, "   ").is_err());
}

#[test]
fn failed_transition_leaves_agency_unchanged() {
    let profile = make_test_profile(TestShape::UnitBox);
    profile.set_to_queued("door-2").unwrap();

    assert!(profile.set_to_queued("").is_err());
    assert_eq!(profile.queue_info().unwrap().queue_id(), "door-2");
}

#[test]
fn transitions_between_agencies() {
    let profile = make_test_profile(TestShape::UnitBox);

    profile.set_to_autonomous();
    assert!(profile.is_autonomous());
    profile.set_to_queued("q").unwrap();
    assert!(profile.is_queued());
    profile.set_to_strict();
    assert!(profile.is_strict());
    assert!(profile.queue_info().is_none());
}

#[test]
fn set_shape_keeps_agency() {
    let profile = Profile::make_queued(TestShape::UnitBox.shape(), "q").unwrap();
    let wide = ConvexShape::rectangle(3.0, 1.0).unwrap();

    profile.set_shape(wide);

    assert_eq!(profile.shape(), wide);
    assert_eq!(profile.queue_info().unwrap().queue_id(), "q");
}

#[test]
fn aliases_observe_mutation() {
    let profile = make_test_profile(TestShape::UnitBox);
    let alias = Arc::clone(&profile);

    profile.set_to_autonomous();

    assert!(alias.is_autonomous());
    assert!(Profile::same(&profile, &alias));
}

#[test]
fn duplicate_is_independent() {
    let profile = make_test_profile(TestShape::UnitBox);
    let copy = profile.duplicate();

    copy.set_to_autonomous();

    assert!(!Profile::same(&profile, &copy));
    assert!(profile.is_strict());
    assert_eq!(copy.shape(), profile.shape());
}

#[test]
fn invalid_shapes_are_rejected() {
    assert!(ConvexShape::circle(0.0).is_err());
    assert!(ConvexShape::circle(f64::NAN).is_err());
    assert!(ConvexShape::rectangle(-1.0, 2.0).is_err());
    assert!(ConvexShape::rectangle(1.0, f64::INFINITY).is_err());
}
