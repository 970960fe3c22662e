//! Command shell for minder.
//!
//! Parses command lines (`cd`, `mkdir`, `touch`, `cp`, `mv`, `rm`, `clear`,
//! `exit`, `help`), resolves their arguments against a [`Session`], runs
//! file operations through the engine and records each command in an
//! append-only history file.

mod command;
mod config;
mod dispatch;
mod error;
mod history;
mod prompt;
mod session;

pub use command::{Command, Verb, help_text, parse_command, tokenize};
pub use config::ShellConfig;
pub use dispatch::{Reply, Shell, start_location};
pub use error::{Result, ShellError};
pub use history::{HISTORY_FILE_NAME, History, format_entry};
pub use prompt::{Prompter, parse_answer, question};
pub use session::Session;
