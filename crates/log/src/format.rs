//! Event timestamps

use std::fmt;

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

/// Default strftime pattern.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

/// Local-time timer honouring the display configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    format: Option<String>,
}

impl Timer {
    /// Timer printing `format`, or nothing when `None`.
    pub fn new(format: Option<String>) -> Self {
        Self { format }
    }
}

impl FormatTime for Timer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        match &self.format {
            Some(format) => write!(w, "{}", chrono::Local::now().format(format)),
            None => Ok(()),
        }
    }
}

/// Create the timer for the given display options.
pub fn make_timer(time: bool, format: Option<&str>) -> Timer {
    Timer::new(time.then(|| format.unwrap_or(DEFAULT_TIME_FORMAT).to_owned()))
}
