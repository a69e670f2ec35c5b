//! Error handling for tessera-log
//!
//! Every fallible logging operation returns [`LogResult<T>`].

use std::path::PathBuf;

/// Result alias for logging operations.
pub type LogResult<T> = Result<T, LogError>;

/// Errors raised while setting up logging.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LogError {
    /// Configuration is inconsistent or incomplete.
    #[error("configuration error: {0}")]
    Config(String),

    /// Filter directive could not be parsed.
    #[error("invalid filter '{filter}': {reason}")]
    Filter {
        /// The rejected directive.
        filter: String,
        /// Parser message.
        reason: String,
    },

    /// Log file could not be opened.
    #[error("cannot open log file '{}': {source}", path.display())]
    Writer {
        /// File that was being opened.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A global subscriber is already installed.
    #[error("a global logger is already initialized")]
    AlreadyInitialized,
}

impl LogError {
    pub(crate) fn filter(filter: impl Into<String>, reason: impl ToString) -> Self {
        Self::Filter {
            filter: filter.into(),
            reason: reason.to_string(),
        }
    }
}
