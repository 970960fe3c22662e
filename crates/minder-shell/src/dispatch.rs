//! Command dispatch.

use std::fs;
use std::path::PathBuf;

use minder_core::OpError;
use minder_ops::{
    FileOperation, OperationEvent, OperationExecutor, OperationReport, PathSpec, RefreshHook,
};

use crate::command::{Command, Verb, help_text, parse_command};
use crate::error::{Result, ShellError};
use crate::history::History;
use crate::prompt::Prompter;
use crate::session::Session;

/// What the terminal should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print a message.
    Message(String),
    /// Clear the screen.
    Clear,
    /// Leave the shell.
    Exit,
    /// Nothing to show.
    Silent,
}

/// Parses command lines and runs them against a session.
pub struct Shell {
    session: Session,
    history: History,
    refresh: Option<RefreshHook>,
}

impl Shell {
    /// Create a shell.
    pub fn new(session: Session, history: History) -> Self {
        Self {
            session,
            history,
            refresh: None,
        }
    }

    /// Call `hook` with the displayed directory whenever a command changes
    /// the filesystem or the location.
    pub fn with_refresh(mut self, hook: RefreshHook) -> Self {
        self.refresh = Some(hook);
        self
    }

    /// The session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run one command line.
    pub async fn execute<P: Prompter>(&mut self, line: &str, prompter: &mut P) -> Result<Reply> {
        let Some(command) = parse_command(line)? else {
            return Ok(Reply::Silent);
        };
        self.history.record(command.verb, &command.args);
        command.check_arity()?;
        tracing::debug!(verb = %command.verb, args = ?command.args, "Dispatching");

        match command.verb {
            Verb::Help => Ok(Reply::Message(help_text())),
            Verb::Exit => Ok(Reply::Exit),
            Verb::Clear => Ok(Reply::Clear),
            Verb::Cd => self.change_directory(&command),
            Verb::Mkdir => {
                let path = self.session.resolver().resolve_target(command.arg(0)?)?;
                self.run(FileOperation::create_directory(&path), prompter)
                    .await?;
                Ok(Reply::Message(format!("mkdir: {}", path.display())))
            }
            Verb::Touch => {
                let path = self.session.resolver().resolve_target(command.arg(0)?)?;
                self.run(FileOperation::create_file(&path), prompter).await?;
                Ok(Reply::Message(format!("touch: {}", path.display())))
            }
            Verb::Cp | Verb::Mv => {
                let resolver = self.session.resolver();
                let Some((target, sources)) = command.args.split_last() else {
                    return Err(ShellError::MissingArgument { verb: command.verb });
                };
                let sources = sources
                    .iter()
                    .map(|arg| PathSpec::parse(arg.as_str()).resolve(&resolver))
                    .collect::<minder_core::Result<Vec<_>>>()?;
                let destination = resolver.resolve_target(target)?;
                let operation = if command.verb == Verb::Cp {
                    FileOperation::copy_all(sources, destination)
                } else {
                    FileOperation::move_all(sources, destination)
                };
                let message = operation.to_string();
                self.run(operation, prompter).await?;
                Ok(Reply::Message(message))
            }
            Verb::Rm => {
                let target = PathSpec::parse(command.arg(0)?).resolve(&self.session.resolver())?;
                let operation = FileOperation::remove(target);
                let message = operation.to_string();
                self.run(operation, prompter).await?;
                Ok(Reply::Message(message))
            }
        }
    }

    fn change_directory(&mut self, command: &Command) -> Result<Reply> {
        let path = self.session.resolver().resolve(command.arg(0)?)?;
        fs::metadata(&path).map_err(|e| OpError::io(&path, e))?;
        self.session.set_location(&path);
        if let Some(hook) = &self.refresh {
            hook(&self.session.view_dir());
        }
        Ok(Reply::Message(format!("cd: {}", path.display())))
    }

    /// Run an operation, answering its conflicts through `prompter`.
    async fn run<P: Prompter>(
        &self,
        operation: FileOperation,
        prompter: &mut P,
    ) -> Result<OperationReport> {
        let mut executor = OperationExecutor::new(self.session.config().clone());
        if let Some(hook) = &self.refresh {
            executor = executor.with_refresh(self.session.view_dir(), hook.clone());
        }

        let mut rx = executor.start(operation);
        while let Some(event) = rx.recv().await {
            match event {
                OperationEvent::Decision(request) => {
                    let disposition = prompter.choose(request.conflict()).await;
                    request.respond(disposition);
                }
                OperationEvent::Complete(complete) => return Ok(complete.into_result()?),
            }
        }
        Err(OpError::Aborted.into())
    }
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("session", &self.session)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

/// The location the shell should start at.
///
/// An empty or missing argument means the current directory.
pub fn start_location(arg: Option<&str>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(|source| ShellError::Io {
        path: PathBuf::from("."),
        source,
    })?;
    Ok(match arg {
        Some(a) if !a.is_empty() => cwd.join(a),
        _ => cwd,
    })
}
