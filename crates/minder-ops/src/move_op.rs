//! Move with rename fast path and cross-device copy fallback.

use std::fs;
use std::io;
use std::path::Path;

use minder_core::{OpError, Result};

use crate::report::TransferOutcome;
use crate::transfer::{TransferEngine, remove_entry};

impl TransferEngine<'_> {
    /// Move one top-level entry to its effective destination.
    pub(crate) fn move_entry(&mut self, source: &Path, target: &Path) -> Result<()> {
        if !self.clear_existing(target)? {
            return Ok(());
        }

        match self.rename(source, target) {
            Ok(()) => {
                tracing::debug!(source = %source.display(), target = %target.display(), "Renamed");
                self.report.record(target, TransferOutcome::Moved);
                Ok(())
            }
            Err(e) if e.is_cross_device() => {
                tracing::debug!(
                    source = %source.display(),
                    target = %target.display(),
                    "Rename crosses devices, falling back to copy"
                );
                self.move_by_copy(source, target)
            }
            Err(e) => Err(e),
        }
    }

    /// Copy `source` to `target`, then delete `source`.
    fn move_by_copy(&mut self, source: &Path, target: &Path) -> Result<()> {
        let metadata = fs::symlink_metadata(source).map_err(|e| OpError::io(source, e))?;
        let mark = self.report.entries.len();

        if metadata.is_symlink() && self.config.preserve_symlinks {
            self.copy_symlink(source, target)?;
        } else {
            self.copy_entry(source, target)?;
        }

        if self.report.entries[mark..]
            .iter()
            .any(|e| e.outcome == TransferOutcome::Skipped)
        {
            tracing::warn!(source = %source.display(), "Entries were skipped, keeping source");
            return Ok(());
        }

        self.report.truncate(mark);
        remove_entry(source, &metadata)?;
        self.report.record(target, TransferOutcome::Moved);
        Ok(())
    }

    /// Run the rename primitive, classifying cross-device failures.
    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        (self.renamer)(from, to).map_err(|e| {
            if cfg!(windows) || e.kind() == io::ErrorKind::CrossesDevices {
                OpError::CrossDevice {
                    from: from.to_path_buf(),
                    to: to.to_path_buf(),
                }
            } else {
                OpError::io(from, e)
            }
        })
    }
}
