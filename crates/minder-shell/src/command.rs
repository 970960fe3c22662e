//! Command line parsing.

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::{Result, ShellError};

/// A shell verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Verb {
    Cd,
    Mkdir,
    Touch,
    Cp,
    Mv,
    Rm,
    Clear,
    Exit,
    Help,
}

impl Verb {
    /// One-line usage for the help text.
    pub fn usage(&self) -> &'static str {
        match self {
            Self::Cd => "cd <dst>",
            Self::Mkdir => "mkdir <dst>",
            Self::Touch => "touch <dst>",
            Self::Cp => "cp <src>... <dst>",
            Self::Mv => "mv <src>... <dst>",
            Self::Rm => "rm <src>",
            Self::Clear => "clear",
            Self::Exit => "exit",
            Self::Help => "help",
        }
    }

    /// Number of required arguments.
    pub fn arity(&self) -> usize {
        match self {
            Self::Cp | Self::Mv => 2,
            Self::Cd | Self::Mkdir | Self::Touch | Self::Rm => 1,
            Self::Clear | Self::Exit | Self::Help => 0,
        }
    }

    /// Largest accepted argument count, `None` when unbounded.
    pub fn max_args(&self) -> Option<usize> {
        match self {
            Self::Cp | Self::Mv | Self::Help => None,
            _ => Some(self.arity()),
        }
    }
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// The verb. Unknown verbs parse as [`Verb::Help`].
    pub verb: Verb,
    /// Arguments after the verb.
    pub args: Vec<String>,
}

impl Command {
    /// Get the argument at `index`, or a missing-argument error.
    pub fn arg(&self, index: usize) -> Result<&str> {
        self.args
            .get(index)
            .map(String::as_str)
            .ok_or(ShellError::MissingArgument { verb: self.verb })
    }

    /// Check that the required arguments are present and nothing extra is.
    pub fn check_arity(&self) -> Result<()> {
        if self.args.len() < self.verb.arity() {
            return Err(ShellError::MissingArgument { verb: self.verb });
        }
        if self.verb.max_args().is_some_and(|max| self.args.len() > max) {
            return Err(ShellError::ExtraArgument {
                verb: self.verb,
                arg: self.args[self.verb.arity()].clone(),
            });
        }
        Ok(())
    }
}

/// Parse a command line. Returns `None` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let mut words = tokenize(line)?.into_iter();
    let Some(first) = words.next() else {
        return Ok(None);
    };

    let command = match first.parse::<Verb>() {
        Ok(verb) => Command {
            verb,
            args: words.collect(),
        },
        Err(_) => {
            tracing::debug!(verb = %first, "Unknown verb");
            Command {
                verb: Verb::Help,
                args: Vec::new(),
            }
        }
    };
    Ok(Some(command))
}

/// Split a line into words.
///
/// Whitespace separates words. Single quotes take everything literally;
/// double quotes allow `\"` and `\\` escapes. Backslashes outside quotes
/// are literal so Windows paths survive.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(unterminated(line)),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\')) => current.push(c),
                            Some(c) => {
                                current.push('\\');
                                current.push(c);
                            }
                            None => return Err(unterminated(line)),
                        },
                        Some(c) => current.push(c),
                        None => return Err(unterminated(line)),
                    }
                }
            }
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

fn unterminated(line: &str) -> ShellError {
    ShellError::UnterminatedQuote {
        line: line.to_string(),
    }
}

/// The help text listing every command.
pub fn help_text() -> String {
    let mut text = String::from("Usage: COMMAND [ARG...]\n\nAvailable Commands:\n");
    for verb in Verb::iter() {
        text.push_str("  ");
        text.push_str(verb.usage());
        text.push('\n');
    }
    text
}
