//! Logger builder implementation

#[macro_use]
mod format;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, Format};
use crate::error::{LogError, LogResult};
use crate::writer;

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Guard that keeps the logger alive
///
/// Holds the root span carrying the global fields; dropping the guard
/// leaves that span. The installed subscriber stays in place for the rest
/// of the process.
#[derive(Debug)]
pub struct LoggerGuard {
    _root_span: Option<tracing::span::EnteredSpan>,
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Build and install the global subscriber
    ///
    /// # Errors
    ///
    /// - [`LogError::Filter`] if the level directive cannot be parsed
    /// - [`LogError::Writer`] if the log file cannot be opened
    /// - [`LogError::AlreadyInitialized`] if a global subscriber exists
    pub fn build(self) -> LogResult<LoggerGuard> {
        let filter = self.filter()?;
        let writer = writer::make_writer(&self.config.writer)?;

        match self.config.format {
            Format::Pretty => self.install_pretty(filter, writer)?,
            Format::Compact => self.install_compact(filter, writer)?,
            Format::Json => self.install_json(filter, writer)?,
        }

        let fields = &self.config.fields;
        let custom = fields.custom_json();
        let root_span = (!fields.is_empty()).then(|| {
            tracing::info_span!(
                "app",
                service = fields.service.as_deref().unwrap_or(""),
                env = fields.env.as_deref().unwrap_or(""),
                version = fields.version.as_deref().unwrap_or(""),
                custom = custom.as_deref().unwrap_or("")
            )
            .entered()
        });

        tracing::debug!(
            level = %self.config.level,
            format = %self.config.format,
            "logger initialized"
        );
        Ok(LoggerGuard {
            _root_span: root_span,
        })
    }

    fn filter(&self) -> LogResult<EnvFilter> {
        EnvFilter::try_new(&self.config.level).map_err(|e| LogError::filter(&self.config.level, e))
    }

    fn install_pretty(&self, filter: EnvFilter, writer: BoxMakeWriter) -> LogResult<()> {
        let fmt_layer = create_fmt_layer!(pretty, &self.config.display, writer);
        Registry::default()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|_| LogError::AlreadyInitialized)
    }

    fn install_compact(&self, filter: EnvFilter, writer: BoxMakeWriter) -> LogResult<()> {
        let fmt_layer = create_fmt_layer!(compact, &self.config.display, writer);
        Registry::default()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|_| LogError::AlreadyInitialized)
    }

    fn install_json(&self, filter: EnvFilter, writer: BoxMakeWriter) -> LogResult<()> {
        let fmt_layer = create_json_layer!(&self.config.display, writer);
        Registry::default()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|_| LogError::AlreadyInitialized)
    }
}

impl LoggerGuard {
    /// Guard for a logger that was set up elsewhere.
    pub(crate) const fn noop() -> Self {
        Self { _root_span: None }
    }
}
