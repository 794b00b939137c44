//! Concurrent commits and queries against one schedule.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use test_fixtures::{straight_line, test_start, TEST_MAP};
use traffic_core::trajectory::debug::is_time_consistent;
use traffic_schedule::{ParticipantId, Query, Schedule, Version};

const WRITERS: usize = 4;
const COMMITS_PER_WRITER: u64 = 50;

#[test]
fn readers_never_observe_a_partial_commit() {
    let schedule = Schedule::default();
    let start = test_start();
    for w in 0..WRITERS {
        schedule
            .register(
                ParticipantId::from(format!("agv-{w}")),
                straight_line(TEST_MAP, start, 1, 1),
            )
            .unwrap();
    }
    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        let mut writers = Vec::new();
        for w in 0..WRITERS {
            let schedule = &schedule;
            writers.push(scope.spawn(move || {
                let participant = ParticipantId::from(format!("agv-{w}"));
                for revision in 1..=COMMITS_PER_WRITER {
                    // Revision n always carries n + 1 arrivals.
                    let trajectory = straight_line(TEST_MAP, start, revision as usize + 1, 1);
                    schedule
                        .commit_if(participant.clone(), revision - 1, trajectory)
                        .unwrap();
                }
            }));
        }

        for _ in 0..2 {
            let schedule = &schedule;
            let done = &done;
            scope.spawn(move || {
                let mut last_seen = Version::INITIAL;
                while !done.load(Ordering::Acquire) {
                    let snapshot = schedule.snapshot();
                    assert!(snapshot.version() >= last_seen);
                    last_seen = snapshot.version();

                    let results = snapshot.query(&Query::all());
                    assert_eq!(results.len(), WRITERS);
                    for entry in results {
                        assert!(entry.committed_at <= snapshot.version());
                        assert_eq!(entry.trajectory.len() as u64, entry.revision + 1);
                        assert!(is_time_consistent(&entry.trajectory));
                    }
                }
            });
        }

        for writer in writers {
            writer.join().unwrap();
        }
        done.store(true, Ordering::Release);
    });

    let expected = Version(WRITERS as u64 * (COMMITS_PER_WRITER + 1));
    assert_eq!(schedule.version(), expected);
    for participant in schedule.participants() {
        assert_eq!(schedule.get(&participant).unwrap().revision, COMMITS_PER_WRITER);
    }
}

#[test]
fn racing_compare_and_commit_accepts_exactly_one() {
    let schedule = Schedule::default();
    let participant = ParticipantId::from("shared");
    schedule
        .register(participant.clone(), straight_line(TEST_MAP, test_start(), 1, 1))
        .unwrap();

    let successes: usize = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let schedule = &schedule;
                let participant = participant.clone();
                scope.spawn(move || {
                    let trajectory = straight_line(TEST_MAP, test_start(), i + 2, 1);
                    schedule.commit_if(participant, 0, trajectory).is_ok()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&ok| ok)
            .count()
    });

    assert_eq!(successes, 1);
    assert_eq!(schedule.get(&participant).unwrap().revision, 1);
    assert_eq!(schedule.history(&participant).unwrap().len(), 1);
}
