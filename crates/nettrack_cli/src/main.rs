//! `nettrack` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration, logging and the SQLite-backed record store.
//! - Dispatch one command, or a `shell` session of commands, to the contact
//!   service.
//!
//! # Invariants
//! - Errors are reported on stderr with a non-zero exit code.
//! - Undo history only spans one process; `shell` keeps it across commands.

mod commands;
mod dates;
mod render;
mod shell;

use clap::Parser;
use commands::{Command, CommandResult};
use log::warn;
use nettrack_core::db::open_db;
use nettrack_core::{
    init_logging_from, ContactService, KeyValueStore, RecordStore, SqliteKeyValueStore,
    TrackerConfig,
};
use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;

/// Track professional contacts, interactions and follow-ups.
#[derive(Parser, Debug)]
#[command(name = "nettrack", version, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file; overrides the configured path
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// One line of a `shell` session.
#[derive(Parser, Debug)]
#[command(name = "nettrack", no_binary_name = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CommandResult {
    if matches!(cli.command, Command::Version) {
        println!("nettrack {}", nettrack_core::core_version());
        return Ok(());
    }

    let mut config = TrackerConfig::resolve(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.storage.db_path = Some(db);
    }
    init_logging_from(&config.logging)?;

    let conn = open_db(config.db_path())?;
    let store = RecordStore::open(
        SqliteKeyValueStore::new(&conn),
        config.storage.namespace.clone(),
    )?
    .with_history_capacity(config.storage.history_capacity);
    let mut service = ContactService::new(store, config.followup.clone());

    match cli.command {
        Command::Shell => run_shell(&mut service, std::io::stdin().lock()),
        command => commands::execute(&mut service, command),
    }
}

/// Runs commands read line by line until end of input or `exit`.
///
/// A failing line is reported and the session continues.
fn run_shell<S: KeyValueStore>(
    service: &mut ContactService<S>,
    input: impl BufRead,
) -> CommandResult {
    for line in input.lines() {
        let line = line?;
        let words = match shell::split_words(&line) {
            Ok(words) => words,
            Err(err) => {
                eprintln!("error: {err}");
                continue;
            }
        };
        match words.first().map(String::as_str) {
            None => continue,
            Some("exit" | "quit") => break,
            Some(_) => {}
        }

        let parsed = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(err) => {
                let _ = err.print();
                continue;
            }
        };
        if let Err(err) = commands::execute(service, parsed.command) {
            warn!("event=cli_command module=cli status=error");
            eprintln!("error: {err}");
        }
    }
    Ok(())
}
