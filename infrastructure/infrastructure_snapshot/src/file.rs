//! Snapshot Files
//!
//! Reads and writes snapshot text on disk. A missing file is reported as
//! [`SnapshotError::NotFound`], separately from other I/O failures.

use crate::codec::{self, LoadReport};
use crate::error::SnapshotError;
use entities_tasks::Task;
use log::info;
use std::fs;
use std::io;
use std::path::Path;
use usecases_memory_management::AddressSpace;

/// Default snapshot file name
pub const DEFAULT_SNAPSHOT_FILE: &str = "memory_state.txt";

/// Read snapshot text from `path`
pub fn read_snapshot<P: AsRef<Path>>(path: P) -> Result<String, SnapshotError> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => SnapshotError::NotFound {
            path: path.to_path_buf(),
        },
        _ => SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Write snapshot text to `path`, replacing any previous content
pub fn write_snapshot<P: AsRef<Path>>(path: P, text: &str) -> Result<(), SnapshotError> {
    let path = path.as_ref();
    fs::write(path, text).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Encode `tasks` and write them to `path`
pub fn save_to_path<'a, P, I>(tasks: I, path: P) -> Result<usize, SnapshotError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a Task>,
{
    let text = codec::encode(tasks)?;
    write_snapshot(&path, &text)?;
    let count = text.lines().count();
    info!("saved {} tasks to {}", count, path.as_ref().display());
    Ok(count)
}

/// Read `path` and replay it into `space`
///
/// See [`codec::load`] for partial-apply semantics on malformed lines.
pub fn load_from_path<P: AsRef<Path>>(path: P, space: &mut AddressSpace) -> Result<LoadReport, SnapshotError> {
    let text = read_snapshot(&path)?;
    let report = codec::load(&text, space)?;
    info!(
        "loaded {} tasks from {} ({} rejected)",
        report.loaded.len(),
        path.as_ref().display(),
        report.rejected.len()
    );
    Ok(report)
}
