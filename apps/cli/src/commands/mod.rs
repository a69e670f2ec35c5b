//! Subcommand implementations.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use crate::cli::Command;

mod check;
mod run;

/// Runs `command` and maps its outcome to an exit status.
pub fn dispatch(command: &Command) -> Result<ExitCode> {
    match command {
        Command::Run(args) => run::run(args),
        Command::Check(args) => check::check(args),
    }
}

fn open(path: &Path, what: &str) -> Result<BufReader<File>> {
    let file = File::open(path)
        .with_context(|| format!("cannot open {what} file {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn today_or(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}
