//! Writer and display configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where formatted events go
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
#[non_exhaustive]
pub enum WriterConfig {
    /// Write to stderr
    #[default]
    Stderr,
    /// Write to stdout
    Stdout,
    /// Write through the test harness so output is captured per test
    Test,
    /// Write to a file
    File {
        /// Path to the log file
        path: PathBuf,
        /// Append instead of truncating
        #[serde(default = "default_append")]
        append: bool,
    },
}

const fn default_append() -> bool {
    true
}

/// Display configuration
///
/// Independent toggles; they map one to one onto CLI flags and
/// environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show timestamps
    pub time: bool,
    /// Custom time format (strftime)
    pub time_format: Option<String>,
    /// Show source location (`file:line`)
    pub source: bool,
    /// Show target module
    pub target: bool,
    /// Show thread IDs
    pub thread_ids: bool,
    /// Show thread names
    pub thread_names: bool,
    /// Use ANSI colors
    pub colors: bool,
    /// Show span list in JSON
    pub span_list: bool,
    /// Flatten JSON events
    pub flatten: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            time: true,
            time_format: None,
            source: cfg!(debug_assertions),
            target: true,
            thread_ids: false,
            thread_names: false,
            colors: std::io::IsTerminal::is_terminal(&std::io::stderr()),
            span_list: true,
            flatten: true,
        }
    }
}

impl DisplayConfig {
    /// Applies boolean toggles found through `lookup`.
    pub(super) fn apply_env(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        let flag = |name: &str| lookup(name).map(|v| v != "0" && !v.eq_ignore_ascii_case("false"));
        if let Some(time) = flag(super::TIME_ENV) {
            self.time = time;
        }
        if let Some(source) = flag(super::SOURCE_ENV) {
            self.source = source;
        }
        if let Some(colors) = flag(super::COLORS_ENV) {
            self.colors = colors;
        }
    }
}
