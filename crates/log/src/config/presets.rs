//! Configuration presets for common scenarios

use super::{Config, DisplayConfig, Fields, Format, WriterConfig};

/// Filter directive; takes precedence over `RUST_LOG`.
pub const LEVEL_ENV: &str = "TESSERA_LOG";
/// Output format: `pretty`, `compact` or `json`.
pub const FORMAT_ENV: &str = "TESSERA_LOG_FORMAT";
/// Timestamp toggle.
pub const TIME_ENV: &str = "TESSERA_LOG_TIME";
/// Source location toggle.
pub const SOURCE_ENV: &str = "TESSERA_LOG_SOURCE";
/// ANSI color toggle.
pub const COLORS_ENV: &str = "TESSERA_LOG_COLORS";

impl Config {
    /// Create configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`Config::from_env`], reading variables through `lookup`.
    ///
    /// An unknown format is ignored and the default kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(level) = lookup(LEVEL_ENV).or_else(|| lookup("RUST_LOG")) {
            config.level = level;
        }

        if let Some(format) = lookup(FORMAT_ENV) {
            match format.parse::<Format>() {
                Ok(format) => config.format = format,
                Err(error) => eprintln!("tessera-log: {error}; keeping {}", config.format),
            }
        }

        config.display.apply_env(&lookup);
        config.fields = Fields::from_lookup(&lookup);

        config
    }

    /// Development configuration (pretty, debug level)
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: Format::Pretty,
            display: DisplayConfig {
                colors: true,
                source: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }

    /// Production configuration (JSON, info level)
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Json,
            display: DisplayConfig {
                colors: false,
                source: false,
                flatten: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }

    /// Test configuration: output goes through the test harness.
    #[must_use]
    pub fn test() -> Self {
        Self {
            level: "debug".to_string(),
            format: Format::Compact,
            writer: WriterConfig::Test,
            display: DisplayConfig {
                colors: false,
                time: false,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }
}
