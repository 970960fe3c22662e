//! minder - copy, move and remove files from an interactive shell.
//!
//! Usage:
//!   minder [PATH]                 Start the shell at PATH
//!   minder [PATH] -c "cp a b"     Run commands and exit
//!   minder --help                 Show help

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

use minder_ops::{Conflict, Disposition};
use minder_shell::{
    History, Prompter, Reply, Session, Shell, ShellConfig, parse_answer, question, start_location,
};

#[derive(Parser)]
#[command(
    name = "minder",
    version,
    about = "Copy, move and remove files from an interactive shell",
    long_about = "minder runs a small file shell: cd, mkdir, touch, cp, mv and rm \
                  with glob sources, `dir/.` contents mode and interactive \
                  conflict prompts.\n\n\
                  Start it with `minder [PATH]`, or pass commands with -c."
)]
struct Cli {
    /// Starting location, a directory or a file (defaults to current directory)
    path: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// History file (defaults to ~/.minder_history)
    #[arg(long)]
    history_file: Option<PathBuf>,

    /// Log file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Run a command and exit; may be repeated
    #[arg(short = 'c', long = "command", value_name = "COMMAND")]
    commands: Vec<String>,
}

type StdinLines = Lines<BufReader<Stdin>>;

/// Asks conflict questions on the terminal.
struct TerminalPrompter<'a> {
    lines: &'a mut StdinLines,
}

impl Prompter for TerminalPrompter<'_> {
    async fn choose(&mut self, conflict: &Conflict) -> Disposition {
        loop {
            print!("{}", question(conflict));
            let _ = std::io::stdout().flush();

            match self.lines.next_line().await {
                Ok(Some(line)) => match parse_answer(conflict.action, &line) {
                    Some(disposition) => return disposition,
                    None => println!("unrecognised answer: {}", line.trim()),
                },
                Ok(None) => return Disposition::Abort,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read answer");
                    return Disposition::Abort;
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ShellConfig::load_from(path)?,
        None => ShellConfig::load()?,
    };
    if let Some(path) = cli.history_file {
        config.history_file = Some(path);
    }
    if let Some(path) = cli.log_file {
        config.log_file = Some(path);
    }

    init_logging(&config.log_path())?;

    let location = start_location(cli.path.as_deref())?;
    fs::metadata(&location).wrap_err_with(|| format!("Invalid path: {}", location.display()))?;
    tracing::info!(location = %location.display(), "Starting");

    let session = Session::new(location, config.engine.clone());
    let mut shell = Shell::new(session, History::new(config.history_path())).with_refresh(
        Arc::new(|dir: &Path| tracing::debug!(dir = %dir.display(), "Refresh")),
    );
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if !cli.commands.is_empty() {
        return run_commands(&mut shell, &cli.commands, &mut lines).await;
    }

    loop {
        print!("{}{}", shell.session().location().display(), config.prompt);
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let result = shell
            .execute(&line, &mut TerminalPrompter { lines: &mut lines })
            .await;
        match result {
            Ok(Reply::Exit) => break,
            Ok(reply) => show(reply)?,
            Err(e) => eprintln!("{e}"),
        }
    }

    tracing::info!("Exiting");
    Ok(())
}

/// Run `-c` commands in order; fails if any of them failed.
async fn run_commands(
    shell: &mut Shell,
    commands: &[String],
    lines: &mut StdinLines,
) -> Result<()> {
    let mut failed = 0;
    for command in commands {
        match shell
            .execute(command, &mut TerminalPrompter { lines: &mut *lines })
            .await
        {
            Ok(Reply::Exit) => break,
            Ok(reply) => show(reply)?,
            Err(e) => {
                eprintln!("{e}");
                failed += 1;
            }
        }
    }
    if failed > 0 {
        return Err(eyre!("{failed} command(s) failed"));
    }
    Ok(())
}

fn show(reply: Reply) -> Result<()> {
    match reply {
        Reply::Message(message) => {
            if message.ends_with('\n') {
                print!("{message}");
            } else {
                println!("{message}");
            }
        }
        Reply::Clear => execute!(std::io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?,
        Reply::Exit | Reply::Silent => {}
    }
    Ok(())
}

/// Send tracing output to a log file, falling back to `./minder.log`.
fn init_logging(path: &Path) -> Result<()> {
    let file = open_log(path)
        .or_else(|e| {
            eprintln!("cannot open log file {}: {e}", path.display());
            open_log(Path::new("minder.log"))
        })
        .wrap_err("Failed to open log file")?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("MINDER_LOG"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| eyre!(e))
}

fn open_log(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
