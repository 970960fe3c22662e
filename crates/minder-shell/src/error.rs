//! Shell-level errors.

use std::path::PathBuf;

use minder_core::OpError;
use thiserror::Error;

use crate::command::Verb;

/// Errors surfaced by the shell.
///
/// Engine errors pass through unchanged so the dispatcher can print them
/// verbatim.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("{verb}: missing argument")]
    MissingArgument { verb: Verb },

    #[error("{verb}: extra argument \"{arg}\"")]
    ExtraArgument { verb: Verb, arg: String },

    #[error("unterminated quote: {line}")]
    UnterminatedQuote { line: String },

    #[error(transparent)]
    Op(#[from] OpError),

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for shell operations.
pub type Result<T> = std::result::Result<T, ShellError>;
