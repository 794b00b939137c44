use std::collections::BTreeSet;

use proptest::prelude::*;
use test_fixtures::{make_test_profile, test_start, TestShape, TEST_MAP};
use traffic_core::trajectory::debug::check_time_consistency;
use traffic_core::{DVec3, Duration, SegmentKey, Trajectory};

fn build(offsets: &[i64]) -> (Trajectory, Vec<SegmentKey>) {
    let start = test_start();
    let profile = make_test_profile(TestShape::UnitBox);
    let mut trajectory = Trajectory::new(TEST_MAP);
    let mut keys = Vec::new();
    for &offset in offsets {
        let result = trajectory.insert(
            start + Duration::seconds(offset),
            profile.clone(),
            DVec3::splat(offset as f64),
            DVec3::ZERO,
        );
        if result.inserted {
            keys.push(result.key);
        }
    }
    (trajectory, keys)
}

proptest! {
    #[test]
    fn any_insertion_order_iterates_ascending(offsets in prop::collection::vec(-500i64..500, 0..60)) {
        let (trajectory, keys) = build(&offsets);
        let distinct: BTreeSet<i64> = offsets.iter().copied().collect();

        prop_assert_eq!(trajectory.len(), distinct.len());
        prop_assert_eq!(keys.len(), distinct.len());
        prop_assert!(check_time_consistency(&trajectory).is_ok());

        let times: Vec<_> = trajectory.iter().map(|s| s.finish_time()).collect();
        prop_assert!(times.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn retiming_keeps_order_and_handles(
        offsets in prop::collection::btree_set(0i64..200, 1..30),
        moves in prop::collection::vec((any::<prop::sample::Index>(), -300i64..300), 0..40),
    ) {
        let offsets: Vec<i64> = offsets.into_iter().collect();
        let (mut trajectory, keys) = build(&offsets);
        let start = trajectory.start_time().unwrap();

        for (index, target) in moves {
            let key = keys[index.index(keys.len())];
            let before: Vec<_> = trajectory.iter().map(|s| s.finish_time()).collect();
            let time = start + Duration::seconds(target);
            let taken = trajectory.find(time).is_some_and(|k| k != key);

            let result = trajectory.set_finish_time(key, time);

            if taken {
                prop_assert!(result.unwrap_err().is_time_conflict());
                let after: Vec<_> = trajectory.iter().map(|s| s.finish_time()).collect();
                prop_assert_eq!(before, after);
            } else {
                prop_assert!(result.is_ok());
                prop_assert_eq!(trajectory.get(key).unwrap().finish_time(), time);
            }
            prop_assert!(check_time_consistency(&trajectory).is_ok());
            prop_assert!(keys.iter().all(|k| trajectory.contains(*k)));
        }
    }

    #[test]
    fn adjusting_preserves_suffix_gaps(
        offsets in prop::collection::btree_set(0i64..1000, 2..30),
        pick in any::<prop::sample::Index>(),
        delta in 0i64..10_000,
    ) {
        let offsets: Vec<i64> = offsets.into_iter().collect();
        let (mut trajectory, keys) = build(&offsets);
        let from = pick.index(keys.len());
        let before: Vec<_> = trajectory.iter().map(|s| s.finish_time()).collect();

        trajectory.adjust_finish_times(keys[from], Duration::seconds(delta)).unwrap();

        let after: Vec<_> = trajectory.iter().map(|s| s.finish_time()).collect();
        for (i, (old, new)) in before.iter().zip(&after).enumerate() {
            let expected = if i >= from { *old + Duration::seconds(delta) } else { *old };
            prop_assert_eq!(*new, expected);
        }
        prop_assert!(check_time_consistency(&trajectory).is_ok());
    }
}
