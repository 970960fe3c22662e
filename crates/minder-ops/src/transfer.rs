//! Copy and move of resolved path specs.
//!
//! A transfer runs in two phases. Planning expands the source, applies the
//! destination-is-directory rule and rejects self-containment; nothing on
//! disk changes until every pair has been planned. Execution then walks the
//! pairs in order and stops at the first error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use minder_core::{EngineConfig, OpError, Result};

use crate::conflict::{ConflictAction, ConflictMode, ConflictSession, DecisionProvider};
use crate::report::{OperationKind, OperationReport, TransferOutcome};
use crate::resolve::{is_subpath, same_path};
use crate::spec::ResolvedSpec;

/// The rename primitive used by moves.
pub type RenameFn = fn(&Path, &Path) -> io::Result<()>;

/// Which transfer to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Copy,
    Move,
}

impl From<TransferKind> for OperationKind {
    fn from(kind: TransferKind) -> Self {
        match kind {
            TransferKind::Copy => OperationKind::Copy,
            TransferKind::Move => OperationKind::Move,
        }
    }
}

/// A planned (source, effective destination) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TransferPair {
    pub source: PathBuf,
    pub target: PathBuf,
}

/// The output of the planning phase.
#[derive(Debug)]
pub(crate) struct TransferPlan {
    pub pairs: Vec<TransferPair>,
    /// Destination directory to create before executing (contents mode).
    pub create_dir: Option<PathBuf>,
}

/// Copies or moves files and directory trees.
///
/// One engine serves one invocation: its conflict mode becomes sticky once
/// the user answers "all", and its report accumulates every outcome.
pub struct TransferEngine<'a> {
    pub(crate) config: &'a EngineConfig,
    pub(crate) conflicts: ConflictSession<'a>,
    pub(crate) renamer: RenameFn,
    pub(crate) report: OperationReport,
}

impl<'a> TransferEngine<'a> {
    /// Create an engine that asks `provider` about conflicts.
    pub fn new(config: &'a EngineConfig, provider: &'a dyn DecisionProvider) -> Self {
        Self {
            config,
            conflicts: ConflictSession::new(provider, ConflictAction::Overwrite, ConflictMode::Ask),
            renamer: rename,
            report: OperationReport::new(OperationKind::Copy),
        }
    }

    /// Start in a fixed conflict mode.
    pub fn with_mode(mut self, mode: ConflictMode) -> Self {
        let provider = self.conflicts.provider();
        self.conflicts = ConflictSession::new(provider, ConflictAction::Overwrite, mode);
        self
    }

    /// Replace the rename primitive.
    pub fn with_renamer(mut self, renamer: RenameFn) -> Self {
        self.renamer = renamer;
        self
    }

    /// The current conflict mode.
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

    /// Copy `src` to `dst`.
    pub fn copy(&mut self, src: &ResolvedSpec, dst: &Path) -> Result<()> {
        self.transfer(src, dst, TransferKind::Copy)
    }

    /// Move `src` to `dst`.
    pub fn move_to(&mut self, src: &ResolvedSpec, dst: &Path) -> Result<()> {
        self.transfer(src, dst, TransferKind::Move)
    }

    /// Run a copy or move.
    pub fn transfer(&mut self, src: &ResolvedSpec, dst: &Path, kind: TransferKind) -> Result<()> {
        self.transfer_all(std::slice::from_ref(src), dst, kind)
    }

    /// Run a copy or move of several sources into `dst`.
    ///
    /// More than one source requires `dst` to be an existing directory.
    /// Every source is planned before the first one is touched.
    pub fn transfer_all(
        &mut self,
        sources: &[ResolvedSpec],
        dst: &Path,
        kind: TransferKind,
    ) -> Result<()> {
        self.report.kind = kind.into();
        let plan = plan_transfer(sources, dst)?;
        tracing::debug!(
            sources = sources.len(),
            destination = %dst.display(),
            pairs = plan.pairs.len(),
            ?kind,
            "Transfer planned"
        );

        if let Some(dir) = &plan.create_dir {
            fs::create_dir_all(dir).map_err(|e| OpError::io(dir, e))?;
        }

        for pair in &plan.pairs {
            match kind {
                TransferKind::Copy => self.copy_entry(&pair.source, &pair.target)?,
                TransferKind::Move => self.move_entry(&pair.source, &pair.target)?,
            }
        }

        tracing::info!(
            sources = sources.len(),
            destination = %dst.display(),
            summary = %self.report.summary(),
            "Transfer complete"
        );
        Ok(())
    }

    /// Ask about an existing target and clear it if the answer is proceed.
    ///
    /// Returns `false` (and records a skip) when the target must be left alone.
    pub(crate) fn clear_existing(&mut self, target: &Path) -> Result<bool> {
        let Ok(metadata) = fs::symlink_metadata(target) else {
            return Ok(true);
        };
        if !self.conflicts.confirm(target, metadata.is_dir())? {
            self.report.record(target, TransferOutcome::Skipped);
            return Ok(false);
        }
        remove_entry(target, &metadata)?;
        Ok(true)
    }
}

impl std::fmt::Debug for TransferEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferEngine")
            .field("config", &self.config)
            .field("mode", &self.conflicts.mode())
            .field("report", &self.report)
            .finish_non_exhaustive()
    }
}

fn rename(from: &Path, to: &Path) -> io::Result<()> {
    fs::rename(from, to)
}

/// Expand every spec and pair each match with its effective destination.
pub(crate) fn plan_transfer(specs: &[ResolvedSpec], dst: &Path) -> Result<TransferPlan> {
    let dst_metadata = fs::metadata(dst).ok();
    let dst_is_dir = dst_metadata.as_ref().is_some_and(|m| m.is_dir());
    let fan_in = specs.len() > 1;

    let mut sources = Vec::new();
    let mut create_dir = None;
    for spec in specs {
        let matches = spec.expand()?;
        if spec.contents_only {
            if dst_metadata.is_some() && !dst_is_dir {
                return Err(OpError::not_a_directory(dst));
            }
            for dir in &matches {
                sources.extend(list_children(dir)?.into_iter().map(|child| (child, true)));
            }
            if !dst_is_dir {
                create_dir = Some(dst.to_path_buf());
            }
        } else {
            if (fan_in || matches.len() > 1) && !dst_is_dir {
                return Err(OpError::not_a_directory(dst));
            }
            sources.extend(matches.into_iter().map(|m| (m, dst_is_dir)));
        }
    }

    let mut pairs = Vec::with_capacity(sources.len());
    for (source, into_dir) in sources {
        let metadata = fs::symlink_metadata(&source).map_err(|e| OpError::io(&source, e))?;
        let target = match (into_dir, source.file_name()) {
            (true, Some(name)) => dst.join(name),
            _ => dst.to_path_buf(),
        };

        if same_path(&source, &target) {
            return Err(OpError::SameFile { path: source });
        }
        let is_dir = metadata.is_dir() || (metadata.is_symlink() && source.is_dir());
        if is_dir && is_subpath(&target, &source) {
            return Err(OpError::SelfContainment {
                from: source,
                to: target,
            });
        }
        // Clearing the target would take the source with it.
        if is_subpath(&source, &target) {
            return Err(OpError::SourceInsideDestination {
                from: source,
                to: target,
            });
        }
        pairs.push(TransferPair { source, target });
    }

    Ok(TransferPlan { pairs, create_dir })
}

/// Direct children of a directory, sorted by name.
pub(crate) fn list_children(dir: &Path) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(dir).map_err(|e| OpError::io(dir, e))?;
    if !metadata.is_dir() {
        return Err(OpError::not_a_directory(dir));
    }
    let mut children = fs::read_dir(dir)
        .map_err(|e| OpError::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()
        .map_err(|e| OpError::io(dir, e))?;
    children.sort();
    Ok(children)
}

/// Delete a file, symlink or directory tree.
pub(crate) fn remove_entry(path: &Path, metadata: &fs::Metadata) -> Result<()> {
    let result = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| OpError::io(path, e))
}
