//! `tessera`: evaluate rule sets from the command line.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

mod cli;
mod commands;
mod report;

fn main() -> Result<ExitCode> {
    let cli = cli::Cli::parse();
    let _log = tessera_log::init_with(cli.log.config()).context("cannot initialize logging")?;
    commands::dispatch(&cli.command)
}
