//! File operation types.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::report::OperationKind;
use crate::spec::ResolvedSpec;

/// A file operation to be executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileOperation {
    /// Copy source specs to a destination.
    Copy {
        sources: Vec<ResolvedSpec>,
        destination: PathBuf,
    },
    /// Move source specs to a destination.
    Move {
        sources: Vec<ResolvedSpec>,
        destination: PathBuf,
    },
    /// Remove everything a spec names.
    Remove { target: ResolvedSpec },
    /// Create a file or bump its modification time.
    CreateFile { path: PathBuf },
    /// Create a directory with missing parents.
    CreateDirectory { path: PathBuf },
}

impl FileOperation {
    /// Create a copy operation.
    pub fn copy(source: ResolvedSpec, destination: impl Into<PathBuf>) -> Self {
        Self::copy_all(vec![source], destination)
    }

    /// Create a copy operation with several sources.
    pub fn copy_all(sources: Vec<ResolvedSpec>, destination: impl Into<PathBuf>) -> Self {
        Self::Copy {
            sources,
            destination: destination.into(),
        }
    }

    /// Create a move operation.
    pub fn move_to(source: ResolvedSpec, destination: impl Into<PathBuf>) -> Self {
        Self::move_all(vec![source], destination)
    }

    /// Create a move operation with several sources.
    pub fn move_all(sources: Vec<ResolvedSpec>, destination: impl Into<PathBuf>) -> Self {
        Self::Move {
            sources,
            destination: destination.into(),
        }
    }

    /// Create a remove operation.
    pub fn remove(target: ResolvedSpec) -> Self {
        Self::Remove { target }
    }

    /// Create a file creation operation.
    pub fn create_file(path: impl Into<PathBuf>) -> Self {
        Self::CreateFile { path: path.into() }
    }

    /// Create a directory creation operation.
    pub fn create_directory(path: impl Into<PathBuf>) -> Self {
        Self::CreateDirectory { path: path.into() }
    }

    /// The kind of this operation.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Copy { .. } => OperationKind::Copy,
            Self::Move { .. } => OperationKind::Move,
            Self::Remove { .. } => OperationKind::Remove,
            Self::CreateFile { .. } => OperationKind::CreateFile,
            Self::CreateDirectory { .. } => OperationKind::CreateDirectory,
        }
    }

    /// The path the operation is primarily about (first source or target).
    pub fn primary_path(&self) -> &Path {
        match self {
            Self::Copy {
                sources,
                destination,
            }
            | Self::Move {
                sources,
                destination,
            } => sources.first().map_or(destination.as_path(), ResolvedSpec::path),
            Self::Remove { target } => target.path(),
            Self::CreateFile { path } | Self::CreateDirectory { path } => path,
        }
    }
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = self.kind().verb();
        match self {
            Self::Copy {
                sources,
                destination,
            }
            | Self::Move {
                sources,
                destination,
            } => {
                write!(f, "{verb}:")?;
                for source in sources {
                    write!(f, " {source}")?;
                }
                write!(f, " to {}", destination.display())
            }
            Self::Remove { target } => write!(f, "{verb}: {target}"),
            Self::CreateFile { path } | Self::CreateDirectory { path } => {
                write!(f, "{verb}: {}", path.display())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_shell_confirmation() {
        let op = FileOperation::copy(ResolvedSpec::from_path("/a/b"), "/c/d");
        assert_eq!(op.to_string(), "cp: /a/b to /c/d");

        let op = FileOperation::move_all(
            vec![ResolvedSpec::from_path("/a"), ResolvedSpec::from_path("/b")],
            "/dir",
        );
        assert_eq!(op.to_string(), "mv: /a /b to /dir");

        let op = FileOperation::remove(ResolvedSpec::contents_of("/x"));
        assert_eq!(op.to_string(), "rm: /x/.");

        let op = FileOperation::create_directory("/tmp/new");
        assert_eq!(op.to_string(), "mkdir: /tmp/new");
    }

    #[test]
    fn test_kind_and_primary_path() {
        let op = FileOperation::move_to(ResolvedSpec::from_path("/src"), "/dst");
        assert_eq!(op.kind(), OperationKind::Move);
        assert_eq!(op.primary_path(), Path::new("/src"));
    }
}
