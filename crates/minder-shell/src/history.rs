//! Append-only command history.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::command::Verb;

/// File name used under the home directory.
pub const HISTORY_FILE_NAME: &str = ".minder_history";

/// Appends one `[pid] verb args...` line per command.
///
/// Write failures are logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct History {
    path: Option<PathBuf>,
}

impl History {
    /// Record to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A history that records nothing.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// `~/.minder_history`, falling back to the current directory.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
            .join(HISTORY_FILE_NAME)
    }

    /// The file being recorded to.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append one command.
    pub fn record(&self, verb: Verb, args: &[String]) {
        let Some(path) = &self.path else {
            return;
        };
        let entry = format_entry(std::process::id(), verb, args);

        let result = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .and_then(|mut file| file.write_all(entry.as_bytes()));
        if let Err(e) = result {
            tracing::error!(file = %path.display(), error = %e, "Failed to write history");
        }
    }
}

/// Format one history line, including the trailing newline.
pub fn format_entry(pid: u32, verb: Verb, args: &[String]) -> String {
    format!("[{pid}] {verb} {}\n", args.join(" "))
}
