//! Error types for file operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for minder operations.
pub type Result<T> = std::result::Result<T, OpError>;

/// Errors that can occur while resolving, transferring or removing paths.
///
/// Every message is a single line; the shell prints it verbatim.
#[derive(Debug, Error)]
pub enum OpError {
    /// Path does not exist.
    #[error("no such file or directory: {}", path.display())]
    NotFound { path: PathBuf },

    /// Permission denied for a path.
    #[error("permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    /// A glob pattern matched nothing after dotfile filtering.
    #[error("no matches for \"{pattern}\"")]
    NoMatches { pattern: String },

    /// A glob pattern could not be parsed.
    #[error("invalid pattern \"{pattern}\": {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A directory was required but the path is something else (or missing).
    #[error("target {} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    /// Destination lies inside the source tree.
    #[error("destination is inside source: {} -> {}", from.display(), to.display())]
    SelfContainment { from: PathBuf, to: PathBuf },

    /// The entry a transfer would replace contains the source.
    #[error("source is inside destination: {} -> {}", from.display(), to.display())]
    SourceInsideDestination { from: PathBuf, to: PathBuf },

    /// Source and destination are the same entry.
    #[error("source and destination are the same: {}", path.display())]
    SameFile { path: PathBuf },

    /// Refused to remove a protected path.
    #[error("refuse to remove dangerous path: '{}'", path.display())]
    DangerousPath { path: PathBuf },

    /// Rename failed because source and destination are on different devices.
    ///
    /// Move operations recover from this internally; it only escapes when a
    /// caller renames without the fallback.
    #[error("cannot rename across devices: {} -> {}", from.display(), to.display())]
    CrossDevice { from: PathBuf, to: PathBuf },

    /// The user aborted the invocation from a conflict prompt.
    #[error("operation aborted")]
    Aborted,

    /// Generic I/O error.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OpError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create a not-found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a not-a-directory error.
    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        Self::NotADirectory { path: path.into() }
    }

    /// Create a dangerous-path error.
    pub fn dangerous(path: impl Into<PathBuf>) -> Self {
        Self::DangerousPath { path: path.into() }
    }

    /// Whether this error is the internal cross-device signal.
    pub fn is_cross_device(&self) -> bool {
        matches!(self, Self::CrossDevice { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_error_io_maps_kinds() {
        let err = OpError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, OpError::PermissionDenied { .. }));

        let err = OpError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, OpError::NotFound { .. }));

        let err = OpError::io("/test/path", std::io::Error::other("boom"));
        assert!(matches!(err, OpError::Io { .. }));
        assert_eq!(err.to_string(), "/test/path: boom");
    }

    #[test]
    fn test_messages_are_single_line() {
        let errors = [
            OpError::not_found("/a"),
            OpError::NoMatches {
                pattern: "/a/*.txt".into(),
            },
            OpError::SelfContainment {
                from: "/a".into(),
                to: "/a/b".into(),
            },
            OpError::SourceInsideDestination {
                from: "/a/a".into(),
                to: "/a".into(),
            },
            OpError::dangerous(""),
            OpError::Aborted,
        ];
        for err in errors {
            assert!(!err.to_string().contains('\n'));
        }
    }

    #[test]
    fn test_dangerous_empty_path_is_visible() {
        assert_eq!(
            OpError::dangerous("").to_string(),
            "refuse to remove dangerous path: ''"
        );
    }
}
