//! Infrastructure Layer: Snapshots
//!
//! Provides persistence of the tracked task list in a line-oriented text
//! format.
//!
//! ## Overview
//!
//! A snapshot stores one task per line as `name,size,remaining_lifetime`.
//! Only the task list is stored; slot assignments are rebuilt on load by
//! allocating every task with first-fit, in file order.
//!
//! ## Modules
//!
//! - **[`codec`](codec/index.html)**: Text encoding and replay into an address space
//! - **[`file`](file/index.html)**: Reading and writing snapshot files
//! - **[`error`](error/index.html)**: Error types
//!
//! ## Load Semantics
//!
//! A malformed line stops the load. Tasks from earlier lines stay allocated
//! and are handed back in [`SnapshotError::Parse`] so the caller can keep
//! tracking them. A missing file is [`SnapshotError::NotFound`], never a
//! parse error.

pub mod codec;
pub mod error;
pub mod file;

pub use codec::{decode_line, encode, load, LoadReport, TaskRecord, LOAD_STRATEGY};
pub use error::{Field, ParseIssue, SnapshotError};
pub use file::{load_from_path, read_snapshot, save_to_path, write_snapshot, DEFAULT_SNAPSHOT_FILE};
