//! Command-line arguments.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tessera_log::Format;
use tessera_rules::OutputFilter;

#[derive(Debug, Parser)]
#[command(name = "tessera", version, about = "Evaluate declarative business rules against records")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate a rule set against a JSON array of records.
    Run(RunArgs),
    /// Load a rule set and report its structure and unresolved names.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Rule set document (JSON).
    #[arg(long, value_name = "PATH")]
    pub rules: PathBuf,

    /// Records to evaluate: a JSON array of objects.
    #[arg(long, value_name = "PATH")]
    pub records: PathBuf,

    /// Which results to print: failed, passed or all (also 0, 1, 2).
    #[arg(long, value_name = "FILTER")]
    pub output: Option<OutputFilter>,

    /// Field whose value labels each record in the report.
    #[arg(long, value_name = "FIELD")]
    pub label_field: Option<String>,

    /// Day used for the validity gate (defaults to today).
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// Prefix each line with the evaluation timestamp.
    #[arg(long)]
    pub timestamps: bool,

    /// Exit with status 2 when any reported rule failed.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Rule set document (JSON).
    #[arg(long, value_name = "PATH")]
    pub rules: PathBuf,

    /// Day used for the validity gate (defaults to today).
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Log filter directive, e.g. `warn` or `tessera_rules=debug`.
    #[arg(long, global = true, env = "TESSERA_LOG", value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Log format: pretty, compact or json.
    #[arg(long, global = true, env = "TESSERA_LOG_FORMAT", value_name = "FORMAT")]
    pub log_format: Option<Format>,
}

impl LogArgs {
    /// Logging configuration: environment first, then flags. Logs go to
    /// stderr at `warn` unless asked otherwise, so stdout stays the report.
    pub fn config(&self) -> tessera_log::Config {
        let mut config = tessera_log::Config::from_env();
        match &self.log_level {
            Some(level) => config.level.clone_from(level),
            None if std::env::var_os("RUST_LOG").is_none() => config.level = "warn".to_owned(),
            None => {}
        }
        if let Some(format) = self.log_format {
            config.format = format;
        }
        config
    }
}
