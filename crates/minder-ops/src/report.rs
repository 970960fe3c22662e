//! Per-invocation outcome reporting.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The kind of operation an invocation performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    Copy,
    Move,
    Remove,
    CreateFile,
    CreateDirectory,
}

impl OperationKind {
    /// The shell verb for this kind.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Copy => "cp",
            Self::Move => "mv",
            Self::Remove => "rm",
            Self::CreateFile => "touch",
            Self::CreateDirectory => "mkdir",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Copy => write!(f, "Copy"),
            Self::Move => write!(f, "Move"),
            Self::Remove => write!(f, "Remove"),
            Self::CreateFile => write!(f, "Create file"),
            Self::CreateDirectory => write!(f, "Create directory"),
        }
    }
}

/// What happened to one leaf of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferOutcome {
    /// A file's bytes were copied.
    Copied { bytes: u64 },
    /// An entry was renamed into place (or moved via the copy fallback).
    Moved,
    /// An entry was deleted.
    Removed,
    /// A file or directory was created.
    Created,
    /// An existing file's modification time was updated.
    Touched,
    /// A conflict was answered with skip.
    Skipped,
}

/// One recorded outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// The path the outcome applies to.
    pub path: PathBuf,
    /// The outcome.
    pub outcome: TransferOutcome,
}

/// Outcomes of a single invocation, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationReport {
    /// The kind of operation.
    pub kind: OperationKind,
    /// Recorded outcomes.
    pub entries: Vec<ReportEntry>,
}

impl OperationReport {
    /// Create an empty report.
    pub fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    /// Record an outcome.
    pub fn record(&mut self, path: impl AsRef<Path>, outcome: TransferOutcome) {
        self.entries.push(ReportEntry {
            path: path.as_ref().to_path_buf(),
            outcome,
        });
    }

    /// Whether any entry changed the filesystem.
    pub fn mutated(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.outcome != TransferOutcome::Skipped)
    }

    /// Number of skipped entries.
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, TransferOutcome::Skipped))
    }

    /// Number of entries that changed the filesystem.
    pub fn succeeded(&self) -> usize {
        self.entries.len() - self.skipped()
    }

    /// Total bytes copied.
    pub fn bytes_copied(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| match e.outcome {
                TransferOutcome::Copied { bytes } => bytes,
                _ => 0,
            })
            .sum()
    }

    /// Drop every entry recorded after `len`.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// Get a human-readable summary of the invocation.
    pub fn summary(&self) -> String {
        let action = match self.kind {
            OperationKind::Copy => "Copied",
            OperationKind::Move => "Moved",
            OperationKind::Remove => "Removed",
            OperationKind::CreateFile | OperationKind::CreateDirectory => "Created",
        };

        let skipped = self.skipped();
        if skipped == 0 {
            format!("{} {} items", action, self.succeeded())
        } else {
            format!("{} {} items, {} skipped", action, self.succeeded(), skipped)
        }
    }

    fn count(&self, pred: impl Fn(&TransferOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut report = OperationReport::new(OperationKind::Copy);
        report.record("/a", TransferOutcome::Copied { bytes: 3 });
        report.record("/b", TransferOutcome::Copied { bytes: 4 });
        report.record("/c", TransferOutcome::Skipped);

        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.bytes_copied(), 7);
        assert_eq!(report.summary(), "Copied 2 items, 1 skipped");
    }

    #[test]
    fn test_all_skipped_is_not_a_mutation() {
        let mut report = OperationReport::new(OperationKind::Remove);
        assert!(!report.mutated());
        report.record("/x", TransferOutcome::Skipped);
        assert!(!report.mutated());
        report.record("/y", TransferOutcome::Removed);
        assert!(report.mutated());

        let mut report = OperationReport::new(OperationKind::CreateFile);
        report.record("/z", TransferOutcome::Touched);
        assert!(report.mutated());
        assert_eq!(report.summary(), "Removed 1 items, 1 skipped");
    }

    #[test]
    fn test_verbs() {
        assert_eq!(OperationKind::Move.verb(), "mv");
        assert_eq!(OperationKind::CreateDirectory.verb(), "mkdir");
    }
}
