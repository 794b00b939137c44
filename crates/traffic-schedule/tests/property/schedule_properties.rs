use std::collections::BTreeMap;

use proptest::prelude::*;
use test_fixtures::{straight_line, test_start, TEST_MAP};
use traffic_core::config::ScheduleConfig;
use traffic_schedule::{ParticipantId, Query, Schedule, Version};

#[derive(Debug, Clone)]
enum Op {
    Register(u8),
    Commit(u8),
    CommitIf(u8, u64),
    Unregister(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..4).prop_map(Op::Register),
        (0u8..4).prop_map(Op::Commit),
        ((0u8..4), (0u64..4)).prop_map(|(p, r)| Op::CommitIf(p, r)),
        (0u8..4).prop_map(Op::Unregister),
    ]
}

proptest! {
    #[test]
    fn schedule_matches_a_simple_model(
        ops in prop::collection::vec(op(), 0..60),
        max_history in 0usize..4,
    ) {
        let schedule = Schedule::new(ScheduleConfig {
            max_history_per_participant: max_history,
            ..ScheduleConfig::default()
        });
        let start = test_start();
        // participant -> (revision, retained history length)
        let mut model: BTreeMap<u8, (u64, usize)> = BTreeMap::new();
        let mut version = Version::INITIAL;

        for op in ops {
            let (p, accepted) = match op {
                Op::Register(p) => {
                    let ok = schedule
                        .register(name(p), straight_line(TEST_MAP, start, 1, 1))
                        .is_ok();
                    prop_assert_eq!(ok, !model.contains_key(&p));
                    if ok {
                        model.insert(p, (0, 0));
                    }
                    (p, ok)
                }
                Op::Commit(p) | Op::CommitIf(p, _) => {
                    let expected = match op {
                        Op::CommitIf(_, r) => Some(r),
                        _ => None,
                    };
                    let trajectory = straight_line(TEST_MAP, start, 2, 1);
                    let ok = match expected {
                        Some(r) => schedule.commit_if(name(p), r, trajectory).is_ok(),
                        None => schedule.commit(name(p), trajectory).is_ok(),
                    };
                    let should = model
                        .get(&p)
                        .is_some_and(|(rev, _)| expected.map_or(true, |r| r == *rev));
                    prop_assert_eq!(ok, should);
                    if ok {
                        if let Some((rev, kept)) = model.get_mut(&p) {
                            *rev += 1;
                            *kept = (*kept + 1).min(max_history);
                        }
                    }
                    (p, ok)
                }
                Op::Unregister(p) => {
                    let ok = schedule.unregister(&name(p)).is_ok();
                    prop_assert_eq!(ok, model.remove(&p).is_some());
                    (p, ok)
                }
            };

            if accepted {
                version = version.next();
            }
            prop_assert_eq!(schedule.version(), version);
            if let Some((rev, kept)) = model.get(&p) {
                prop_assert_eq!(schedule.get(&name(p)).unwrap().revision, *rev);
                prop_assert_eq!(schedule.history(&name(p)).unwrap().len(), *kept);
            }
        }

        prop_assert_eq!(schedule.query(&Query::all()).len(), model.len());
    }
}

fn name(p: u8) -> ParticipantId {
    ParticipantId::from(format!("agv-{p}"))
}
