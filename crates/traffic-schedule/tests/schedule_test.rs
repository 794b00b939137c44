use test_fixtures::{straight_line, test_start, TEST_MAP};
use traffic_core::config::ScheduleConfig;
use traffic_core::errors::ScheduleError;
use traffic_core::{TrafficError, Trajectory};
use traffic_schedule::{ParticipantId, Query, Schedule, Version};

fn id(name: &str) -> ParticipantId {
    ParticipantId::from(name)
}

// ── Registration ──────────────────────────────────────────────────────────

#[test]
fn register_publishes_a_new_version() {
    let schedule = Schedule::default();
    assert_eq!(schedule.version(), Version::INITIAL);

    let version = schedule
        .register(id("agv-1"), straight_line(TEST_MAP, test_start(), 3, 5))
        .unwrap();

    assert_eq!(version, Version(1));
    assert_eq!(schedule.version(), version);
    let entry = schedule.get(&id("agv-1")).unwrap();
    assert_eq!(entry.revision, 0);
    assert_eq!(entry.committed_at, version);
    assert_eq!(entry.trajectory.len(), 3);
}

#[test]
fn duplicate_registration_is_rejected() {
    let schedule = Schedule::default();
    schedule.register(id("agv-1"), Trajectory::new(TEST_MAP)).unwrap();

    let err = schedule
        .register(id("agv-1"), Trajectory::new(TEST_MAP))
        .unwrap_err();

    assert!(matches!(
        err,
        TrafficError::Schedule(ScheduleError::DuplicateParticipant { .. })
    ));
    assert_eq!(schedule.version(), Version(1));
}

// ── Commits ───────────────────────────────────────────────────────────────

#[test]
fn commit_replaces_atomically_and_bumps_revision() {
    let schedule = Schedule::default();
    let start = test_start();
    schedule
        .register(id("agv-1"), straight_line(TEST_MAP, start, 2, 5))
        .unwrap();

    let version = schedule
        .commit(id("agv-1"), straight_line(TEST_MAP, start, 5, 5))
        .unwrap();

    let entry = schedule.get(&id("agv-1")).unwrap();
    assert_eq!(entry.revision, 1);
    assert_eq!(entry.committed_at, version);
    assert_eq!(entry.trajectory.len(), 5);
}

#[test]
fn commit_for_unknown_participant_fails() {
    let schedule = Schedule::default();
    let err = schedule
        .commit(id("ghost"), Trajectory::new(TEST_MAP))
        .unwrap_err();
    assert!(matches!(
        err,
        TrafficError::Schedule(ScheduleError::UnknownParticipant { .. })
    ));
    assert_eq!(schedule.version(), Version::INITIAL);
}

#[test]
fn commit_if_checks_the_revision() {
    let schedule = Schedule::default();
    schedule.register(id("agv-1"), Trajectory::new(TEST_MAP)).unwrap();
    schedule
        .commit_if(id("agv-1"), 0, Trajectory::new(TEST_MAP))
        .unwrap();

    let err = schedule
        .commit_if(id("agv-1"), 0, Trajectory::new(TEST_MAP))
        .unwrap_err();

    match err {
        TrafficError::Schedule(ScheduleError::RevisionMismatch {
            expected, actual, ..
        }) => {
            assert_eq!(expected, 0);
            assert_eq!(actual, 1);
        }
        other => panic!("expected revision mismatch, got {other:?}"),
    }
    assert_eq!(schedule.get(&id("agv-1")).unwrap().revision, 1);
}

#[test]
fn empty_trajectories_can_be_rejected_by_config() {
    let schedule = Schedule::new(ScheduleConfig {
        reject_empty_trajectories: true,
        ..ScheduleConfig::default()
    });

    let err = schedule
        .register(id("agv-1"), Trajectory::new(TEST_MAP))
        .unwrap_err();
    assert!(matches!(
        err,
        TrafficError::Schedule(ScheduleError::EmptyTrajectory { .. })
    ));

    schedule
        .register(id("agv-1"), straight_line(TEST_MAP, test_start(), 1, 1))
        .unwrap();
    assert!(schedule
        .commit(id("agv-1"), Trajectory::new(TEST_MAP))
        .is_err());
}

// ── Unregister ────────────────────────────────────────────────────────────

#[test]
fn unregister_removes_from_queries() {
    let schedule = Schedule::default();
    schedule.register(id("a"), Trajectory::new(TEST_MAP)).unwrap();
    schedule.register(id("b"), Trajectory::new(TEST_MAP)).unwrap();

    schedule.unregister(&id("a")).unwrap();

    let results = schedule.query(&Query::all());
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].participant, id("b"));
    assert_eq!(schedule.participants(), vec![id("b")]);
    assert!(schedule.unregister(&id("a")).is_err());
}

#[test]
fn participant_can_register_again_after_unregister() {
    let schedule = Schedule::default();
    schedule.register(id("a"), Trajectory::new(TEST_MAP)).unwrap();
    schedule.commit(id("a"), Trajectory::new(TEST_MAP)).unwrap();
    schedule.unregister(&id("a")).unwrap();

    schedule.register(id("a"), Trajectory::new(TEST_MAP)).unwrap();

    assert_eq!(schedule.get(&id("a")).unwrap().revision, 0);
    assert!(schedule.history(&id("a")).unwrap().is_empty());
}

// ── History ───────────────────────────────────────────────────────────────

#[test]
fn history_is_bounded_and_oldest_first() {
    let schedule = Schedule::new(ScheduleConfig {
        max_history_per_participant: 2,
        ..ScheduleConfig::default()
    });
    let start = test_start();
    schedule
        .register(id("a"), straight_line(TEST_MAP, start, 1, 1))
        .unwrap();
    for n in 2..=4 {
        schedule
            .commit(id("a"), straight_line(TEST_MAP, start, n, 1))
            .unwrap();
    }

    let history = schedule.history(&id("a")).unwrap();
    let revisions: Vec<u64> = history.iter().map(|h| h.revision).collect();
    assert_eq!(revisions, vec![1, 2]);
    assert_eq!(history[0].trajectory.len(), 2);
    assert_eq!(schedule.get(&id("a")).unwrap().revision, 3);
}

#[test]
fn zero_history_keeps_nothing() {
    let schedule = Schedule::new(ScheduleConfig {
        max_history_per_participant: 0,
        ..ScheduleConfig::default()
    });
    schedule.register(id("a"), Trajectory::new(TEST_MAP)).unwrap();
    schedule.commit(id("a"), Trajectory::new(TEST_MAP)).unwrap();

    assert!(schedule.history(&id("a")).unwrap().is_empty());
    assert!(schedule.history(&id("nobody")).is_err());
}

// ── Snapshots ─────────────────────────────────────────────────────────────

#[test]
fn snapshot_is_unaffected_by_later_commits() {
    let schedule = Schedule::default();
    let start = test_start();
    schedule
        .register(id("a"), straight_line(TEST_MAP, start, 2, 1))
        .unwrap();
    let snapshot = schedule.snapshot();

    schedule
        .commit(id("a"), straight_line(TEST_MAP, start, 7, 1))
        .unwrap();
    schedule.register(id("b"), Trajectory::new(TEST_MAP)).unwrap();

    assert_eq!(snapshot.version(), Version(1));
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.get(&id("a")).unwrap().trajectory.len(), 2);
    assert!(snapshot.get(&id("b")).is_none());
    assert_eq!(schedule.snapshot().len(), 2);
}

#[test]
fn schedule_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Schedule>();
    assert_send_sync::<traffic_schedule::ScheduleSnapshot>();
}

#[test]
fn ids_and_versions_serialize_transparently() {
    assert_eq!(serde_json::to_string(&id("agv-1")).unwrap(), "\"agv-1\"");
    assert_eq!(serde_json::to_string(&Version(42)).unwrap(), "42");
    let back: Version = serde_json::from_str("7").unwrap();
    assert_eq!(back, Version(7));
}
