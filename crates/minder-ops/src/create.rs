//! File and directory creation operations.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::time::SystemTime;

use minder_core::{OpError, Result};

use crate::report::TransferOutcome;

/// Create a directory and any missing parents.
///
/// An existing directory is not an error.
pub fn create_directory(path: &Path) -> Result<TransferOutcome> {
    if let Ok(metadata) = fs::metadata(path) {
        if metadata.is_dir() {
            return Ok(TransferOutcome::Skipped);
        }
        return Err(OpError::not_a_directory(path));
    }
    fs::create_dir_all(path).map_err(|e| OpError::io(path, e))?;
    tracing::debug!(path = %path.display(), "Created directory");
    Ok(TransferOutcome::Created)
}

/// Create an empty file, or bump the modification time of an existing one.
///
/// Existing content is never truncated.
pub fn touch_file(path: &Path) -> Result<TransferOutcome> {
    let existed = fs::symlink_metadata(path).is_ok();
    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| OpError::io(path, e))?;

    if existed {
        file.set_modified(SystemTime::now())
            .map_err(|e| OpError::io(path, e))?;
        tracing::debug!(path = %path.display(), "Touched file");
        return Ok(TransferOutcome::Touched);
    }
    tracing::debug!(path = %path.display(), "Created file");
    Ok(TransferOutcome::Created)
}
