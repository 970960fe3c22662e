//! Byte-level copy of files and directory trees.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use minder_core::{OpError, Result};

use crate::report::TransferOutcome;
use crate::transfer::TransferEngine;

impl TransferEngine<'_> {
    /// Copy one top-level entry. Symlinks are followed here.
    pub(crate) fn copy_entry(&mut self, source: &Path, target: &Path) -> Result<()> {
        let metadata = fs::metadata(source).map_err(|e| OpError::io(source, e))?;
        if metadata.is_dir() {
            self.copy_tree(source, target)
        } else {
            self.copy_file_checked(source, target)
        }
    }

    /// Copy a file, asking first if the target exists.
    fn copy_file_checked(&mut self, source: &Path, target: &Path) -> Result<()> {
        if !self.clear_existing(target)? {
            return Ok(());
        }
        let bytes = self.copy_one_file(source, target)?;
        tracing::debug!(source = %source.display(), target = %target.display(), bytes, "Copied file");
        self.report.record(target, TransferOutcome::Copied { bytes });
        Ok(())
    }

    /// Recreate a directory tree at `target`, pre-order, entries by name.
    ///
    /// An existing directory at `target` is merged into; an existing
    /// non-directory is a conflict.
    fn copy_tree(&mut self, source: &Path, target: &Path) -> Result<()> {
        if let Ok(existing) = fs::symlink_metadata(target) {
            if !existing.is_dir() && !self.clear_existing(target)? {
                return Ok(());
            }
        }

        let created = !target.exists();
        fs::create_dir_all(target).map_err(|e| OpError::io(target, e))?;
        if created {
            self.report.record(target, TransferOutcome::Created);
        }

        let mut entries = fs::read_dir(source)
            .map_err(|e| OpError::io(source, e))?
            .collect::<io::Result<Vec<_>>>()
            .map_err(|e| OpError::io(source, e))?;
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let dest = target.join(entry.file_name());
            let file_type = entry.file_type().map_err(|e| OpError::io(&path, e))?;

            if file_type.is_symlink() && self.config.preserve_symlinks {
                self.copy_symlink(&path, &dest)?;
            } else if file_type.is_dir() || (file_type.is_symlink() && path.is_dir()) {
                self.copy_tree(&path, &dest)?;
            } else {
                self.copy_file_checked(&path, &dest)?;
            }
        }

        if created {
            let permissions = fs::metadata(source)
                .map_err(|e| OpError::io(source, e))?
                .permissions();
            fs::set_permissions(target, permissions).map_err(|e| OpError::io(target, e))?;
        }
        Ok(())
    }

    /// Recreate a symbolic link as a link.
    #[cfg(unix)]
    pub(crate) fn copy_symlink(&mut self, source: &Path, target: &Path) -> Result<()> {
        if !self.clear_existing(target)? {
            return Ok(());
        }
        let link = fs::read_link(source).map_err(|e| OpError::io(source, e))?;
        std::os::unix::fs::symlink(&link, target).map_err(|e| OpError::io(target, e))?;
        tracing::debug!(source = %source.display(), link = %link.display(), "Recreated symlink");
        self.report.record(target, TransferOutcome::Created);
        Ok(())
    }

    #[cfg(not(unix))]
    pub(crate) fn copy_symlink(&mut self, source: &Path, target: &Path) -> Result<()> {
        self.copy_entry(source, target)
    }

    /// Stream one file's bytes into `target`, creating missing parents.
    ///
    /// The target gets the source's permission bits. Sync failures are
    /// logged only.
    pub(crate) fn copy_one_file(&self, source: &Path, target: &Path) -> Result<u64> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| OpError::io(parent, e))?;
        }

        let mut reader = File::open(source).map_err(|e| OpError::io(source, e))?;
        let permissions = reader
            .metadata()
            .map_err(|e| OpError::io(source, e))?
            .permissions();
        let mut writer = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(target)
            .map_err(|e| OpError::io(target, e))?;

        let bytes = io::copy(&mut reader, &mut writer).map_err(|e| OpError::io(target, e))?;
        writer
            .set_permissions(permissions)
            .map_err(|e| OpError::io(target, e))?;

        if self.config.fsync {
            if let Err(e) = writer.sync_all() {
                tracing::warn!(path = %target.display(), error = %e, "Failed to sync copied file");
            }
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use crate::conflict::{ConflictMode, Disposition, FixedDecision};
    use crate::spec::ResolvedSpec;
    use crate::transfer::TransferEngine;
    use minder_core::EngineConfig;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_copy_file_into_new_name() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.txt");
        fs::write(&src, "hello").unwrap();
        let config = EngineConfig::default();
        let provider = FixedDecision(Disposition::Abort);

        let mut engine = TransferEngine::new(&config, &provider);
        engine
            .copy(&ResolvedSpec::from_path(&src), &temp.path().join("b.txt"))
            .unwrap();

        assert_eq!(fs::read_to_string(temp.path().join("b.txt")).unwrap(), "hello");
        assert_eq!(engine.report().bytes_copied(), 5);
    }

    #[test]
    fn test_copy_tree_preorder() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("tree");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("b.txt"), "b").unwrap();
        fs::write(src.join("sub/a.txt"), "a").unwrap();
        let config = EngineConfig::default();
        let provider = FixedDecision(Disposition::Abort);

        let mut engine = TransferEngine::new(&config, &provider);
        engine
            .copy(&ResolvedSpec::from_path(&src), &temp.path().join("copy"))
            .unwrap();

        let paths: Vec<_> = engine
            .report()
            .entries
            .iter()
            .map(|e| e.path.strip_prefix(temp.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            paths,
            vec![
                std::path::PathBuf::from("copy"),
                "copy/b.txt".into(),
                "copy/sub".into(),
                "copy/sub/a.txt".into(),
            ]
        );
        assert_eq!(fs::read_to_string(temp.path().join("copy/sub/a.txt")).unwrap(), "a");
    }

    #[test]
    fn test_overwrite_all_replaces_without_asking() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.txt");
        let dst = temp.path().join("b.txt");
        fs::write(&src, "new").unwrap();
        fs::write(&dst, "old contents").unwrap();
        let config = EngineConfig::default();
        let provider = FixedDecision(Disposition::Abort);

        let mut engine =
            TransferEngine::new(&config, &provider).with_mode(ConflictMode::OverwriteAll);
        engine.copy(&ResolvedSpec::from_path(&src), &dst).unwrap();
        assert_eq!(fs::read_to_string(&dst).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_preserves_mode_bits() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let src = temp.path().join("run.sh");
        fs::write(&src, "#!/bin/sh").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o750)).unwrap();
        let config = EngineConfig::default();
        let provider = FixedDecision(Disposition::Abort);

        let mut engine = TransferEngine::new(&config, &provider);
        let dst = temp.path().join("copy.sh");
        engine.copy(&ResolvedSpec::from_path(&src), &dst).unwrap();

        let mode = fs::metadata(&dst).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o750);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_inside_tree_are_recreated() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("tree");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("real.txt"), "data").unwrap();
        std::os::unix::fs::symlink("real.txt", src.join("link.txt")).unwrap();
        let config = EngineConfig::default();
        let provider = FixedDecision(Disposition::Abort);

        let mut engine = TransferEngine::new(&config, &provider);
        let dst = temp.path().join("copy");
        engine.copy(&ResolvedSpec::from_path(&src), &dst).unwrap();

        let link = dst.join("link.txt");
        assert!(fs::symlink_metadata(&link).unwrap().is_symlink());
        assert_eq!(fs::read_link(&link).unwrap(), std::path::Path::new("real.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_followed_when_not_preserved() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("tree");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("real.txt"), "data").unwrap();
        std::os::unix::fs::symlink("real.txt", src.join("link.txt")).unwrap();
        let config = EngineConfig {
            preserve_symlinks: false,
            ..EngineConfig::default()
        };
        let provider = FixedDecision(Disposition::Abort);

        let mut engine = TransferEngine::new(&config, &provider);
        let dst = temp.path().join("copy");
        engine.copy(&ResolvedSpec::from_path(&src), &dst).unwrap();

        let link = dst.join("link.txt");
        assert!(!fs::symlink_metadata(&link).unwrap().is_symlink());
        assert_eq!(fs::read_to_string(&link).unwrap(), "data");
    }
}
