//! Test builders and fixture loading shared by the traffic crates.
//!
//! Builders cover the common shapes, profiles, and the three-arrival
//! trajectory most tests start from. JSON fixtures live in the repository's
//! `test-fixtures/` directory.

use std::path::PathBuf;

use chrono::Utc;
use serde::de::DeserializeOwned;
use traffic_core::trajectory::{debug, TrajectoryRecord};
use traffic_core::{ConvexShape, DVec3, Duration, Profile, ProfilePtr, SegmentKey, Time, Trajectory};

/// Map name used by every builder.
pub const TEST_MAP: &str = "test_map";

/// Shapes used by test profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestShape {
    UnitBox,
    UnitCircle,
}

impl TestShape {
    pub fn shape(self) -> ConvexShape {
        match self {
            TestShape::UnitBox => ConvexShape::Box {
                width: 1.0,
                height: 1.0,
            },
            TestShape::UnitCircle => ConvexShape::Circle { radius: 1.0 },
        }
    }
}

/// A fresh strict profile with the given footprint.
pub fn make_test_profile(shape: TestShape) -> ProfilePtr {
    Profile::make_strict(shape.shape())
}

/// Three arrivals at `start`, `start + 10s`, and `start + 20s`, each with its
/// own profile.
pub struct ThreeSegments {
    pub trajectory: Trajectory,
    pub keys: [SegmentKey; 3],
    pub times: [Time; 3],
    pub profiles: [ProfilePtr; 3],
}

pub fn three_segment_trajectory(start: Time) -> ThreeSegments {
    let times = [
        start,
        start + Duration::seconds(10),
        start + Duration::seconds(20),
    ];
    let positions = [
        DVec3::new(1.0, 1.0, 1.0),
        DVec3::new(2.0, 0.0, 3.0),
        DVec3::new(4.0, 2.0, 6.0),
    ];
    let velocities = [
        DVec3::new(1.0, 1.0, 1.0),
        DVec3::new(2.0, 0.0, 3.0),
        DVec3::new(6.0, 2.0, 4.0),
    ];
    let profiles = [
        make_test_profile(TestShape::UnitBox),
        make_test_profile(TestShape::UnitBox),
        make_test_profile(TestShape::UnitBox),
    ];

    let mut trajectory = Trajectory::new(TEST_MAP);
    let mut keys = Vec::with_capacity(3);
    for i in 0..3 {
        let result = trajectory.insert(times[i], profiles[i].clone(), positions[i], velocities[i]);
        assert!(result.inserted, "fixture time {i} collided");
        keys.push(result.key);
    }

    ThreeSegments {
        trajectory,
        keys: [keys[0], keys[1], keys[2]],
        times,
        profiles,
    }
}

/// A straight-line trajectory on `map` with arrivals every `step_secs`
/// starting at `start`, moving one unit along x per arrival.
pub fn straight_line(map: &str, start: Time, arrivals: usize, step_secs: i64) -> Trajectory {
    let profile = make_test_profile(TestShape::UnitCircle);
    let mut trajectory = Trajectory::new(map);
    for i in 0..arrivals {
        trajectory.insert(
            start + Duration::seconds(step_secs * i as i64),
            profile.clone(),
            DVec3::new(i as f64, 0.0, 0.0),
            DVec3::new(1.0 / step_secs as f64, 0.0, 0.0),
        );
    }
    trajectory
}

/// The current time truncated to whole milliseconds,
/// so JSON round trips compare equal.
pub fn test_start() -> Time {
    let now = Utc::now();
    now - Duration::nanoseconds(now.timestamp_subsec_nanos() as i64 % 1_000_000)
}

/// Panic unless the trajectory passes the full consistency check.
pub fn assert_consistent(trajectory: &Trajectory) {
    if let Err(e) = debug::check_time_consistency(trajectory) {
        panic!("trajectory is inconsistent: {e}");
    }
}

/// Finish times in iteration order.
pub fn finish_times(trajectory: &Trajectory) -> Vec<Time> {
    trajectory.iter().map(|s| s.finish_time()).collect()
}

/// Root directory of the repository-level fixture folder.
fn fixtures_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    // The crate itself is also called test-fixtures; look for the data folder.
    while !path.join("test-fixtures").join("trajectories").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures/trajectories from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Absolute path of a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixture_path(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a trajectory stored as a [`TrajectoryRecord`] fixture.
pub fn load_trajectory(relative_path: &str) -> Trajectory {
    let record: TrajectoryRecord = load_fixture(relative_path);
    Trajectory::from_record(&record)
        .unwrap_or_else(|e| panic!("Fixture {relative_path} is not a valid trajectory: {e}"))
}
