//! Integration tests for api_facades crate
//!
//! Exercise a full session: allocation through every strategy, manual
//! removal, compaction, persistence and the background lifecycle thread.

use api_facades::{MemorySession, RandomTaskConfig, SessionConfig, SessionError};
use infrastructure_snapshot::{ParseIssue, SnapshotError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::sync::mpsc;
use std::time::Duration;
use usecases_memory_management::{AllocationError, FreeBlock, Strategy};

#[test]
fn test_release_then_defragment() {
    let session = MemorySession::without_lifecycle(10);
    let a = session.add_task("A", 3, 9, Strategy::FirstFit).unwrap();
    let b = session.add_task("B", 4, 9, Strategy::FirstFit).unwrap();
    assert_eq!(session.free_blocks(), vec![FreeBlock::new(7, 3)]);

    session.remove(a.id()).unwrap();
    assert_eq!(
        session.free_blocks(),
        vec![FreeBlock::new(0, 3), FreeBlock::new(7, 3)]
    );

    assert_eq!(session.defragment(), 1);
    assert_eq!(session.free_blocks(), vec![FreeBlock::new(4, 6)]);
    let slots = session.slots();
    assert!(slots[..4].iter().all(|slot| *slot == Some(b.id())));
    assert!(slots[4..].iter().all(Option::is_none));
}

#[test]
fn test_strategies_pick_different_blocks() {
    // Free blocks (0,5), (10,2), (20,8)
    let setup = || {
        let session = MemorySession::without_lifecycle(28);
        let gap_a = session.add_task("gap_a", 5, 9, Strategy::FirstFit).unwrap();
        session.add_task("wall_1", 5, 9, Strategy::FirstFit).unwrap();
        let gap_b = session.add_task("gap_b", 2, 9, Strategy::FirstFit).unwrap();
        session.add_task("wall_2", 8, 9, Strategy::FirstFit).unwrap();
        session.remove(gap_a.id());
        session.remove(gap_b.id());
        assert_eq!(
            session.free_blocks(),
            vec![FreeBlock::new(0, 5), FreeBlock::new(10, 2), FreeBlock::new(20, 8)]
        );
        session
    };

    let placed_at = |session: &MemorySession, strategy: &str| {
        let task = session.add_task_named("probe", 2, 1, strategy).unwrap();
        session.slots().iter().position(|slot| *slot == Some(task.id()))
    };

    assert_eq!(placed_at(&setup(), "first_fit"), Some(0));
    assert_eq!(placed_at(&setup(), "smallest_fit"), Some(10));
    assert_eq!(placed_at(&setup(), "largest_fit"), Some(20));
}

#[test]
fn test_failed_allocation_leaves_state_unchanged() {
    let session = MemorySession::without_lifecycle(6);
    session.add_task("A", 4, 5, Strategy::FirstFit).unwrap();
    let before = session.slots();

    let err = session.add_task("B", 3, 5, Strategy::BestFit).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Allocation(AllocationError::NoFit { requested: 3, largest_free: 2 })
    ));
    assert_eq!(session.slots(), before);
    assert_eq!(session.tasks().len(), 1);
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memory_state.txt");

    let session = MemorySession::without_lifecycle(32);
    session.add_task("alpha", 4, 7, Strategy::WorstFit).unwrap();
    session.add_task("beta", 2, 3, Strategy::BestFit).unwrap();
    session.tick();
    assert_eq!(session.save(&path).unwrap(), 2);
    assert_eq!(fs::read_to_string(&path).unwrap(), "alpha,4,6\nbeta,2,2\n");

    let restored = MemorySession::without_lifecycle(32);
    let report = restored.load(&path).unwrap();
    assert_eq!(report.loaded.len(), 2);
    let tasks = restored.tasks();
    assert_eq!(tasks[0].name(), "alpha");
    assert_eq!(tasks[0].remaining_lifetime(), 6);
    assert_eq!(restored.free_blocks(), vec![FreeBlock::new(6, 26)]);
}

#[test]
fn test_partial_load_tracks_applied_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.txt");
    fs::write(&path, "X,3,5\nY,bad,2\n").unwrap();

    let session = MemorySession::without_lifecycle(10);
    let err = session.load(&path).unwrap_err();
    match err {
        SessionError::Snapshot(SnapshotError::Parse { line, issue, .. }) => {
            assert_eq!(line, 2);
            assert!(matches!(issue, ParseIssue::NotANumber { .. }));
        }
        other => panic!("expected parse error, got {:?}", other),
    }

    // X was allocated before the failure and is now tracked, so it expires
    let tasks = session.tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].name(), "X");
    for _ in 0..5 {
        session.tick();
    }
    assert!(session.tasks().is_empty());
    assert_eq!(session.stats().free, 10);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let session = MemorySession::without_lifecycle(10);
    let err = session.load(dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, SessionError::Snapshot(ref e) if e.is_not_found()));
    assert!(session.tasks().is_empty());
}

#[test]
fn test_random_tasks_respect_config() {
    let config = SessionConfig {
        capacity: 64,
        tick_interval: None,
        default_strategy: Strategy::BestFit,
        random: RandomTaskConfig {
            size: 2..=2,
            lifetime: 1..=1,
            name_suffix: 7..=7,
        },
    };
    let session = MemorySession::new(config).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    let task = session.add_random_task(&mut rng).unwrap();
    assert_eq!(task.name(), "Task_7");
    assert_eq!(task.size(), 2);
    assert_eq!(session.tick().len(), 1);
}

#[test]
fn test_lifecycle_thread_expires_tasks() {
    let config = SessionConfig {
        capacity: 16,
        tick_interval: Some(Duration::from_millis(5)),
        ..SessionConfig::default()
    };
    let (tx, rx) = mpsc::channel::<usize>();
    let mut session = MemorySession::with_observer(
        config,
        Some(Box::new(move |expired| {
            let _ = tx.send(expired.len());
        })),
    )
    .unwrap();

    session.add_task("short", 4, 1, Strategy::FirstFit).unwrap();
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 1);
    session.shutdown();

    assert!(session.tasks().is_empty());
    assert_eq!(session.stats().free, 16);
    assert!(!session.is_lifecycle_running());
}
