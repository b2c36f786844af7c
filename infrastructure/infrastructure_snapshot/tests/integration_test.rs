//! Integration tests for infrastructure_snapshot crate
//!
//! Save/load through real files and the partial-apply behaviour on a
//! malformed line.

use entities_tasks::Task;
use infrastructure_snapshot::{
    encode, load, load_from_path, save_to_path, Field, ParseIssue, SnapshotError,
};
use std::fs;
use usecases_memory_management::{AddressSpace, FreeBlock, Strategy};

#[test]
fn test_malformed_second_line_keeps_first_applied() {
    let mut space = AddressSpace::new(10);
    let err = load("X,3,5\nY,bad,2\n", &mut space).unwrap_err();

    match &err {
        SnapshotError::Parse { line, issue, applied } => {
            assert_eq!(*line, 2);
            assert_eq!(
                *issue,
                ParseIssue::NotANumber { field: Field::Size, value: "bad".to_string() }
            );
            assert_eq!(applied.len(), 1);
            assert_eq!(applied[0].name(), "X");
            assert_eq!(space.region_of(applied[0].id()), Some(0..3));
        }
        other => panic!("expected parse error, got {:?}", other),
    }

    // Y was never allocated
    assert_eq!(space.used_count(), 3);
    assert_eq!(space.free_blocks(), vec![FreeBlock::new(3, 7)]);
    assert_eq!(err.to_string(), "malformed snapshot line 2: size 'bad' is not a number");
}

#[test]
fn test_lines_after_failure_are_not_applied() {
    let mut space = AddressSpace::new(20);
    let err = load("A,2,5\nbroken\nC,2,5\n", &mut space).unwrap_err();
    assert_eq!(err.applied().len(), 1);
    assert_eq!(space.used_count(), 2);
}

#[test]
fn test_save_and_load_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("etat.txt");

    let mut original = AddressSpace::new(16);
    let tasks = vec![
        Task::new("alpha", 4, 7).unwrap(),
        Task::new("beta", 2, 3).unwrap(),
        Task::new("gamma", 5, 11).unwrap(),
    ];
    for task in &tasks {
        original.allocate(task, Strategy::WorstFit).unwrap();
    }
    save_to_path(&tasks, &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "alpha,4,7\nbeta,2,3\ngamma,5,11\n");

    let mut restored = AddressSpace::new(16);
    let report = load_from_path(&path, &mut restored).unwrap();
    let names: Vec<_> = report.loaded.iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    assert!(report.rejected.is_empty());

    // Replayed with first-fit: laid out back to back
    assert_eq!(restored.region_of(report.loaded[0].id()), Some(0..4));
    assert_eq!(restored.region_of(report.loaded[1].id()), Some(4..6));
    assert_eq!(restored.region_of(report.loaded[2].id()), Some(6..11));
    // Lifetimes survive, identities do not
    assert_eq!(report.loaded[2].remaining_lifetime(), 11);
    assert_ne!(report.loaded[0].id(), tasks[0].id());
}

#[test]
fn test_load_reports_tasks_that_do_not_fit() {
    let mut space = AddressSpace::new(5);
    let report = load("big,4,1\nalso_big,4,1\nsmall,1,1\n", &mut space).unwrap();
    assert_eq!(report.loaded.len(), 2);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].0.name(), "also_big");
    assert_eq!(space.free_count(), 0);
}

#[test]
fn test_load_into_occupied_space_appends() {
    let mut space = AddressSpace::new(10);
    let existing = Task::new("existing", 3, 9).unwrap();
    space.allocate(&existing, Strategy::FirstFit).unwrap();

    let report = load("new,2,4\n", &mut space).unwrap();
    assert_eq!(space.region_of(report.loaded[0].id()), Some(3..5));
    assert!(space.is_allocated(existing.id()));
}

#[test]
fn test_missing_file_distinct_from_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut space = AddressSpace::new(4);
    let err = load_from_path(dir.path().join("nope.txt"), &mut space).unwrap_err();
    assert!(matches!(err, SnapshotError::NotFound { .. }));
    assert!(err.applied().is_empty());
}

#[test]
fn test_duplicate_names_round_trip() {
    let a = Task::new("same", 1, 1).unwrap();
    let b = Task::new("same", 2, 2).unwrap();
    let text = encode([&a, &b]).unwrap();
    let mut space = AddressSpace::new(3);
    let report = load(&text, &mut space).unwrap();
    assert_eq!(report.loaded.len(), 2);
    assert_ne!(report.loaded[0].id(), report.loaded[1].id());
}
