//! # Tessera Log
//!
//! Logging setup shared by the Tessera crates and binaries.
//!
//! Library code only emits events through [`tracing`]; installing a
//! subscriber is left to the binary (or test) through this crate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tessera_log::prelude::*;
//!
//! fn main() -> LogResult<()> {
//!     let _guard = tessera_log::auto_init()?;
//!
//!     info!(rules = 12, "rule set loaded");
//!     Ok(())
//! }
//! ```
//!
//! ## Environment
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `TESSERA_LOG` / `RUST_LOG` | filter directive |
//! | `TESSERA_LOG_FORMAT` | `pretty`, `compact` or `json` |
//! | `TESSERA_LOG_TIME`, `TESSERA_LOG_SOURCE`, `TESSERA_LOG_COLORS` | display toggles |
//! | `TESSERA_SERVICE`, `TESSERA_ENV`, `TESSERA_VERSION` | root span fields |

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod builder;
mod config;
mod error;
mod format;
mod writer;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{
    COLORS_ENV, Config, DisplayConfig, FORMAT_ENV, Fields, Format, LEVEL_ENV, Level, SOURCE_ENV,
    TIME_ENV, WriterConfig,
};
pub use error::{LogError, LogResult};
pub use format::{DEFAULT_TIME_FORMAT, Timer};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Config, Format, Level, LogError, LogResult, debug, error, info, trace, warn,
    };

    pub use tracing::{Span, field};
}

// Re-export tracing macros
pub use tracing::{debug, error, info, instrument, span, trace, warn};

// ============================================================================
// Initialization Functions
// ============================================================================

/// Picks a configuration and installs it
///
/// Uses the environment when `TESSERA_LOG` or `RUST_LOG` is set, otherwise
/// the development preset in debug builds and the production preset in
/// release builds. If a subscriber is already installed, returns a no-op
/// guard instead of failing.
pub fn auto_init() -> LogResult<LoggerGuard> {
    if tracing::dispatcher::has_been_set() {
        return Ok(LoggerGuard::noop());
    }

    let from_env =
        std::env::var_os(LEVEL_ENV).is_some() || std::env::var_os("RUST_LOG").is_some();
    let config = if from_env {
        Config::from_env()
    } else if cfg!(debug_assertions) {
        Config::development()
    } else {
        Config::production()
    };
    init_with(config)
}

/// Initialize with default configuration
pub fn init() -> LogResult<LoggerGuard> {
    init_with(Config::default())
}

/// Initialize with custom configuration
///
/// Fails with [`LogError::AlreadyInitialized`] when called twice.
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}

/// Initialize for tests
///
/// Output is routed through the test harness. Safe to call from every test:
/// once a subscriber exists, later calls return a no-op guard.
pub fn init_test() -> LoggerGuard {
    match init_with(Config::test()) {
        Ok(guard) => guard,
        Err(_) => LoggerGuard::noop(),
    }
}
