//! Snapshot Errors

use entities_tasks::{Task, TaskError};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Snapshot field names, for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Size,
    Lifetime,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Size => f.write_str("size"),
            Field::Lifetime => f.write_str("lifetime"),
        }
    }
}

/// What is wrong with a malformed snapshot line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIssue {
    /// Line does not have exactly three comma-separated fields
    #[error("expected 3 fields, found {found}")]
    FieldCount { found: usize },
    /// Numeric field is not an integer
    #[error("{field} '{value}' is not a number")]
    NotANumber { field: Field, value: String },
    /// Numeric field is zero or negative
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: Field, value: i64 },
    /// Numeric field does not fit the task model
    #[error("{field} {value} is out of range")]
    OutOfRange { field: Field, value: i64 },
    /// Fields decoded but do not form a valid task
    #[error("{0}")]
    InvalidTask(TaskError),
}

/// Snapshot save/load errors
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Snapshot file does not exist
    #[error("snapshot file not found: {}", path.display())]
    NotFound { path: PathBuf },
    /// Any other I/O failure
    #[error("failed to access snapshot file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A line could not be parsed; the load stopped there
    ///
    /// `applied` holds the tasks from earlier lines that were already
    /// allocated before the failure.
    #[error("malformed snapshot line {line}: {issue}")]
    Parse {
        line: usize,
        issue: ParseIssue,
        applied: Vec<Task>,
    },
    /// Task name contains a comma or line break
    #[error("task name '{0}' cannot be stored in a snapshot")]
    UnencodableName(String),
}

impl SnapshotError {
    /// Tasks already allocated when the load failed
    pub fn applied(&self) -> &[Task] {
        match self {
            SnapshotError::Parse { applied, .. } => applied,
            _ => &[],
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SnapshotError::NotFound { .. })
    }
}
