//! Guarded recursive removal.

use std::fs;
use std::path::{Path, PathBuf};

use minder_core::{EngineConfig, OpError, Result};

use crate::conflict::{ConflictAction, ConflictMode, ConflictSession, DecisionProvider};
use crate::report::{OperationKind, OperationReport, TransferOutcome};
use crate::resolve::{canonical_form, normalize};
use crate::spec::ResolvedSpec;
use crate::transfer::{list_children, remove_entry};

/// Paths that are never removed: the filesystem root, the empty path and
/// the home directory.
#[derive(Debug, Clone, Default)]
pub struct DangerousRoots {
    home: Option<PathBuf>,
}

impl DangerousRoots {
    /// Create a guard for the given home directory.
    pub fn new(home: Option<&Path>) -> Self {
        Self {
            home: home.map(Path::to_path_buf),
        }
    }

    /// Whether `path` is a member of the set.
    ///
    /// Compared both lexically and with symlinks resolved.
    pub fn contains(&self, path: &Path) -> bool {
        if path.as_os_str().is_empty() {
            return true;
        }
        let lexical = normalize(path);
        let canonical = canonical_form(path);
        if is_root(&lexical) || is_root(&canonical) {
            return true;
        }
        self.home.as_deref().is_some_and(|home| {
            lexical == normalize(home) || canonical == canonical_form(home)
        })
    }

    /// Fail with `DangerousPath` if `path` is a member.
    pub fn check(&self, path: &Path) -> Result<()> {
        if self.contains(path) {
            tracing::warn!(path = %path.display(), "Refused dangerous removal");
            return Err(OpError::dangerous(path));
        }
        Ok(())
    }
}

fn is_root(path: &Path) -> bool {
    path.has_root() && path.parent().is_none()
}

/// Deletes files and directory trees behind the dangerous-root guard.
pub struct RemovalEngine<'a> {
    conflicts: ConflictSession<'a>,
    guard: DangerousRoots,
    report: OperationReport,
}

impl<'a> RemovalEngine<'a> {
    /// Create an engine that asks `provider` before each deletion.
    pub fn new(config: &'a EngineConfig, provider: &'a dyn DecisionProvider) -> Self {
        Self {
            conflicts: ConflictSession::new(provider, ConflictAction::Delete, ConflictMode::Ask),
            guard: DangerousRoots::new(config.home()),
            report: OperationReport::new(OperationKind::Remove),
        }
    }

    /// Start in a fixed mode. `OverwriteAll` deletes without asking.
    pub fn with_mode(mut self, mode: ConflictMode) -> Self {
        let provider = self.conflicts.provider();
        self.conflicts = ConflictSession::new(provider, ConflictAction::Delete, mode);
        self
    }

    /// The current confirmation mode.
    pub fn mode(&self) -> ConflictMode {
        self.conflicts.mode()
    }

    /// Outcomes recorded so far. Still valid after an error.
    pub fn report(&self) -> &OperationReport {
        &self.report
    }

    /// Consume the engine, returning its report.
    pub fn into_report(self) -> OperationReport {
        self.report
    }

    /// Remove everything `spec` names.
    ///
    /// Every match is checked against the guard before the first deletion.
    pub fn remove(&mut self, spec: &ResolvedSpec) -> Result<()> {
        if spec.is_bare_dot() {
            tracing::warn!(raw = %spec.raw, "Refused dangerous removal");
            return Err(OpError::dangerous(&spec.raw));
        }
        self.guard.check(spec.path())?;

        let matches = spec.expand()?;
        for path in &matches {
            self.guard.check(path)?;
        }

        if spec.contents_only {
            for dir in &matches {
                self.remove_contents(dir)?;
            }
        } else {
            for path in &matches {
                self.remove_one(path)?;
            }
        }

        tracing::info!(spec = %spec, summary = %self.report.summary(), "Removal complete");
        Ok(())
    }

    /// Remove every child of `dir`, leaving `dir` itself in place.
    fn remove_contents(&mut self, dir: &Path) -> Result<()> {
        self.guard.check(dir)?;
        for child in list_children(dir)? {
            self.remove_one(&child)?;
        }
        Ok(())
    }

    fn remove_one(&mut self, path: &Path) -> Result<()> {
        self.guard.check(path)?;
        let metadata = fs::symlink_metadata(path).map_err(|e| OpError::io(path, e))?;

        if !self.conflicts.confirm(path, metadata.is_dir())? {
            self.report.record(path, TransferOutcome::Skipped);
            return Ok(());
        }

        remove_entry(path, &metadata)?;
        tracing::debug!(path = %path.display(), "Removed");
        self.report.record(path, TransferOutcome::Removed);
        Ok(())
    }
}

impl std::fmt::Debug for RemovalEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemovalEngine")
            .field("guard", &self.guard)
            .field("mode", &self.conflicts.mode())
            .field("report", &self.report)
            .finish_non_exhaustive()
    }
}
