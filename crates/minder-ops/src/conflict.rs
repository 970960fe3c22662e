//! Conflict detection and resolution for file operations.

use std::path::{Path, PathBuf};

use minder_core::{OpError, Result};
use serde::{Deserialize, Serialize};

/// What proceeding past a conflict would do to the existing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictAction {
    /// Replace an existing destination (copy/move).
    Overwrite,
    /// Delete a path (remove).
    Delete,
}

impl std::fmt::Display for ConflictAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overwrite => write!(f, "overwrite"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// A conflict awaiting a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// The existing path that would be replaced or deleted.
    pub target: PathBuf,
    /// Whether the existing path is a directory.
    pub is_dir: bool,
    /// What proceeding means.
    pub action: ConflictAction,
}

impl Conflict {
    /// Create a new conflict.
    pub fn new(target: impl Into<PathBuf>, is_dir: bool, action: ConflictAction) -> Self {
        Self {
            target: target.into(),
            is_dir,
            action,
        }
    }

    /// Create an "already exists" conflict for a transfer destination.
    pub fn existing(target: impl Into<PathBuf>, is_dir: bool) -> Self {
        Self::new(target, is_dir, ConflictAction::Overwrite)
    }

    /// Create a delete confirmation.
    pub fn deletion(target: impl Into<PathBuf>, is_dir: bool) -> Self {
        Self::new(target, is_dir, ConflictAction::Delete)
    }

    /// "file" or "directory".
    pub fn kind_label(&self) -> &'static str {
        if self.is_dir { "directory" } else { "file" }
    }
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.action {
            ConflictAction::Overwrite => write!(
                f,
                "{} already exists: {}",
                self.kind_label(),
                self.target.display()
            ),
            ConflictAction::Delete => {
                write!(f, "delete this {}? {}", self.kind_label(), self.target.display())
            }
        }
    }
}

/// An answer to a single conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Disposition {
    /// Overwrite (or delete) this entry.
    Proceed,
    /// Leave this entry alone.
    #[default]
    Skip,
    /// Proceed here and on every remaining conflict.
    ProceedAll,
    /// Skip here and on every remaining conflict.
    SkipAll,
    /// Stop the invocation before touching this entry.
    Abort,
}

/// How conflicts are settled for the rest of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConflictMode {
    /// Ask the decision provider for every conflict.
    #[default]
    Ask,
    /// Proceed without asking (overwrite, or delete for removals).
    OverwriteAll,
    /// Skip without asking.
    SkipAll,
}

/// Supplies decisions for conflicts, typically by asking a human.
///
/// Implementations may block; the engine calls this from its worker.
pub trait DecisionProvider: Send + Sync {
    /// Decide what to do with one conflicting path.
    fn decide(&self, conflict: &Conflict) -> Disposition;
}

/// A provider that always gives the same answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedDecision(pub Disposition);

impl DecisionProvider for FixedDecision {
    fn decide(&self, _conflict: &Conflict) -> Disposition {
        self.0
    }
}

impl<F> DecisionProvider for F
where
    F: Fn(&Conflict) -> Disposition + Send + Sync,
{
    fn decide(&self, conflict: &Conflict) -> Disposition {
        self(conflict)
    }
}

/// Answers one conflict query given the current mode.
///
/// The arbiter never changes the mode; that is up to whoever owns it.
#[derive(Clone, Copy)]
pub struct ConflictArbiter<'a> {
    provider: &'a dyn DecisionProvider,
}

impl<'a> ConflictArbiter<'a> {
    /// Create an arbiter around a decision provider.
    pub fn new(provider: &'a dyn DecisionProvider) -> Self {
        Self { provider }
    }

    /// The wrapped provider.
    pub fn provider(&self) -> &'a dyn DecisionProvider {
        self.provider
    }

    /// Settle a conflict. Only `Ask` reaches the provider.
    pub fn arbitrate(&self, mode: ConflictMode, conflict: &Conflict) -> Disposition {
        match mode {
            ConflictMode::OverwriteAll => Disposition::Proceed,
            ConflictMode::SkipAll => Disposition::Skip,
            ConflictMode::Ask => self.provider.decide(conflict),
        }
    }
}

impl std::fmt::Debug for ConflictArbiter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConflictArbiter").finish_non_exhaustive()
    }
}

/// Invocation-scoped conflict state: the arbiter plus the sticky mode.
///
/// Once the user answers "all", the mode switches and the provider is not
/// consulted again for the rest of the invocation.
#[derive(Debug)]
pub struct ConflictSession<'a> {
    arbiter: ConflictArbiter<'a>,
    mode: ConflictMode,
    action: ConflictAction,
}

impl<'a> ConflictSession<'a> {
    /// Create a session starting in `mode`.
    pub fn new(
        provider: &'a dyn DecisionProvider,
        action: ConflictAction,
        mode: ConflictMode,
    ) -> Self {
        Self {
            arbiter: ConflictArbiter::new(provider),
            mode,
            action,
        }
    }

    /// The current mode.
    pub fn mode(&self) -> ConflictMode {
        self.mode
    }

    /// The provider consulted in `Ask` mode.
    pub fn provider(&self) -> &'a dyn DecisionProvider {
        self.arbiter.provider()
    }

    /// Decide whether to proceed on `target`.
    ///
    /// Returns `Ok(true)` to proceed, `Ok(false)` to skip, and
    /// `Err(OpError::Aborted)` when the user stops the invocation.
    pub fn confirm(&mut self, target: &Path, is_dir: bool) -> Result<bool> {
        let conflict = Conflict::new(target, is_dir, self.action);
        let disposition = self.arbiter.arbitrate(self.mode, &conflict);
        tracing::debug!(target = %target.display(), ?disposition, mode = ?self.mode, "Conflict settled");

        match disposition {
            Disposition::Proceed => Ok(true),
            Disposition::Skip => Ok(false),
            Disposition::ProceedAll => {
                self.mode = ConflictMode::OverwriteAll;
                Ok(true)
            }
            Disposition::SkipAll => {
                self.mode = ConflictMode::SkipAll;
                Ok(false)
            }
            Disposition::Abort => Err(OpError::Aborted),
        }
    }
}
