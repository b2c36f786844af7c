//! Snapshot Codec
//!
//! Encodes the tracked task list as text and replays it into an address
//! space.
//!
//! One line per task: `name,size,remaining_lifetime`. No header, no
//! escaping, and no slot assignments: a load re-allocates every task with
//! first-fit in file order.

use crate::error::{Field, ParseIssue, SnapshotError};
use entities_tasks::{Task, TaskError};
use log::{debug, warn};
use usecases_memory_management::{AddressSpace, AllocationError, Strategy};

/// Strategy used when replaying a snapshot
pub const LOAD_STRATEGY: Strategy = Strategy::FirstFit;

/// One decoded snapshot line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub name: String,
    pub size: usize,
    pub lifetime: u32,
}

impl TaskRecord {
    /// Build a fresh task (default priority) from this record
    pub fn into_task(self) -> Result<Task, TaskError> {
        Task::new(self.name, self.size, self.lifetime)
    }
}

/// Outcome of a complete load
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Tasks allocated, in file order
    pub loaded: Vec<Task>,
    /// Tasks that parsed but found no room
    pub rejected: Vec<(Task, AllocationError)>,
}

/// Encode tasks, one line each, in collection order
///
/// # Errors
///
/// [`SnapshotError::UnencodableName`] if a name contains `,`, `\n` or `\r`.
pub fn encode<'a, I>(tasks: I) -> Result<String, SnapshotError>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut out = String::new();
    for task in tasks {
        if task.name().contains(&[',', '\n', '\r'][..]) {
            return Err(SnapshotError::UnencodableName(task.name().to_string()));
        }
        out.push_str(&format!(
            "{},{},{}\n",
            task.name(),
            task.size(),
            task.remaining_lifetime()
        ));
    }
    Ok(out)
}

/// Decode a single line (`line_no` is 1-based and only used in errors)
pub fn decode_line(line_no: usize, line: &str) -> Result<TaskRecord, SnapshotError> {
    decode_fields(line.trim()).map_err(|issue| SnapshotError::Parse {
        line: line_no,
        issue,
        applied: Vec::new(),
    })
}

fn decode_fields(line: &str) -> Result<TaskRecord, ParseIssue> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 3 {
        return Err(ParseIssue::FieldCount { found: fields.len() });
    }

    let size = parse_positive(Field::Size, fields[1])?;
    let lifetime = parse_positive(Field::Lifetime, fields[2])?;

    Ok(TaskRecord {
        name: fields[0].to_string(),
        size: usize::try_from(size).map_err(|_| ParseIssue::OutOfRange { field: Field::Size, value: size })?,
        lifetime: u32::try_from(lifetime)
            .map_err(|_| ParseIssue::OutOfRange { field: Field::Lifetime, value: lifetime })?,
    })
}

fn parse_positive(field: Field, raw: &str) -> Result<i64, ParseIssue> {
    let value: i64 = raw.trim().parse().map_err(|_| ParseIssue::NotANumber {
        field,
        value: raw.to_string(),
    })?;
    if value <= 0 {
        return Err(ParseIssue::NotPositive { field, value });
    }
    Ok(value)
}

/// Decode `text` and allocate each task into `space`, in file order
///
/// Blank lines are skipped. Tasks that parse but do not fit are collected in
/// [`LoadReport::rejected`] and the load continues.
///
/// # Errors
///
/// On the first malformed line the load stops with
/// [`SnapshotError::Parse`]. Lines before it have already been allocated and
/// are returned in the error's `applied` list; the malformed line and
/// everything after it are not applied.
pub fn load(text: &str, space: &mut AddressSpace) -> Result<LoadReport, SnapshotError> {
    let mut report = LoadReport::default();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = match decode_line(index + 1, line) {
            Ok(record) => record,
            Err(SnapshotError::Parse { line, issue, .. }) => {
                warn!("snapshot line {} rejected: {}", line, issue);
                return Err(SnapshotError::Parse {
                    line,
                    issue,
                    applied: report.loaded,
                });
            }
            Err(other) => return Err(other),
        };

        let task = match record.into_task() {
            Ok(task) => task,
            Err(err) => {
                return Err(SnapshotError::Parse {
                    line: index + 1,
                    issue: ParseIssue::InvalidTask(err),
                    applied: report.loaded,
                })
            }
        };
        match space.allocate(&task, LOAD_STRATEGY) {
            Ok(placement) => {
                debug!("restored {} at [{}, {})", task.name(), placement.start, placement.end());
                report.loaded.push(task);
            }
            Err(err) => {
                warn!("snapshot task '{}' not restored: {}", task.name(), err);
                report.rejected.push((task, err));
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_lines() {
        let a = Task::new("A", 3, 5).unwrap();
        let b = Task::new("B", 4, 1).unwrap();
        assert_eq!(encode([&a, &b]).unwrap(), "A,3,5\nB,4,1\n");
        assert_eq!(encode(std::iter::empty::<&Task>()).unwrap(), "");
    }

    #[test]
    fn test_encode_rejects_comma_in_name() {
        let bad = Task::new("a,b", 1, 1).unwrap();
        assert!(matches!(
            encode([&bad]),
            Err(SnapshotError::UnencodableName(name)) if name == "a,b"
        ));
    }

    #[test]
    fn test_decode_line() {
        assert_eq!(
            decode_line(1, "job, 7 ,12\r").unwrap(),
            TaskRecord { name: "job".to_string(), size: 7, lifetime: 12 }
        );
    }

    #[test]
    fn test_decode_line_issues() {
        let issue = |line: &str| match decode_line(3, line) {
            Err(SnapshotError::Parse { line: 3, issue, applied }) => {
                assert!(applied.is_empty());
                issue
            }
            other => panic!("unexpected result {:?}", other),
        };

        assert_eq!(issue("A,3"), ParseIssue::FieldCount { found: 2 });
        assert_eq!(issue("A,3,5,9"), ParseIssue::FieldCount { found: 4 });
        assert_eq!(
            issue("A,bad,5"),
            ParseIssue::NotANumber { field: Field::Size, value: "bad".to_string() }
        );
        assert_eq!(
            issue("A,3,0"),
            ParseIssue::NotPositive { field: Field::Lifetime, value: 0 }
        );
        assert_eq!(
            issue("A,-2,4"),
            ParseIssue::NotPositive { field: Field::Size, value: -2 }
        );
        assert_eq!(
            issue("A,3,5000000000"),
            ParseIssue::OutOfRange { field: Field::Lifetime, value: 5_000_000_000 }
        );
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let mut space = AddressSpace::new(10);
        let report = load("A,3,5\n\n  \nB,2,1\n", &mut space).unwrap();
        assert_eq!(report.loaded.len(), 2);
        assert_eq!(space.used_count(), 5);
    }

    #[test]
    fn test_loaded_tasks_use_default_priority() {
        let mut space = AddressSpace::new(10);
        let report = load("A,3,5\n", &mut space).unwrap();
        assert_eq!(report.loaded[0].priority(), entities_tasks::DEFAULT_PRIORITY);
    }
}
