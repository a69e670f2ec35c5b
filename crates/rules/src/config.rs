//! Engine configuration.

use std::fmt;
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::logic::Verdict;

/// Environment variable selecting the [`OutputFilter`].
pub const OUTPUT_ENV: &str = "TESSERA_OUTPUT";
/// Environment variable overriding the timestamp format.
pub const TIMESTAMP_FORMAT_ENV: &str = "TESSERA_TIMESTAMP_FORMAT";
/// Timestamp format used when none (or an invalid one) is configured.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Returns `true` if `format` is a usable `chrono` strftime format.
///
/// ```
/// use tessera_rules::config::is_valid_timestamp_format;
///
/// assert!(is_valid_timestamp_format("%d.%m.%Y %H:%M"));
/// assert!(!is_valid_timestamp_format("%Q"));
/// ```
pub fn is_valid_timestamp_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Which results are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFilter {
    /// Failed rules only.
    #[default]
    Failed,
    /// Passed rules only.
    Passed,
    /// Every rule.
    All,
}

impl OutputFilter {
    /// Whether a result with `verdict` is reported.
    pub const fn admits(self, verdict: Verdict) -> bool {
        match self {
            Self::Failed => verdict.is_failed(),
            Self::Passed => verdict.is_passed(),
            Self::All => true,
        }
    }

    /// Legacy numeric encoding: `0` failed, `1` passed, `2` all.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Failed),
            1 => Some(Self::Passed),
            2 => Some(Self::All),
            _ => None,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Failed => "failed",
            Self::Passed => "passed",
            Self::All => "all",
        }
    }
}

impl fmt::Display for OutputFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "failed" => Ok(Self::Failed),
            "passed" => Ok(Self::Passed),
            "all" => Ok(Self::All),
            code => code
                .parse()
                .ok()
                .and_then(Self::from_code)
                .ok_or_else(|| format!("unknown output filter `{s}`")),
        }
    }
}

/// Settings shared by every evaluation of an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Results reported by [`Evaluation::reportable`](crate::Evaluation::reportable).
    pub output: OutputFilter,
    /// `chrono` format for result timestamps in reports.
    pub timestamp_format: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            output: OutputFilter::Failed,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl EngineConfig {
    /// Reads `TESSERA_OUTPUT` and `TESSERA_TIMESTAMP_FORMAT` on top of the
    /// defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`EngineConfig::from_env`] with a custom variable source.
    ///
    /// Unrecognised values are logged and the default is kept.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(output) = lookup(OUTPUT_ENV) {
            match output.parse() {
                Ok(filter) => config.output = filter,
                Err(error) => tracing::warn!(%error, "ignoring {OUTPUT_ENV}"),
            }
        }

        if let Some(format) = lookup(TIMESTAMP_FORMAT_ENV)
            .filter(|format| !format.trim().is_empty())
        {
            config = config.with_timestamp_format(format);
        }

        config
    }

    /// Sets the output filter.
    #[must_use]
    pub const fn with_output(mut self, output: OutputFilter) -> Self {
        self.output = output;
        self
    }

    /// Sets the timestamp format. An invalid format is logged and the
    /// current one kept.
    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        let format = format.into();
        if is_valid_timestamp_format(&format) {
            self.timestamp_format = format;
        } else {
            tracing::warn!(
                %format,
                kept = %self.timestamp_format,
                "ignoring invalid timestamp format"
            );
        }
        self
    }

    /// The configured timestamp format, or [`DEFAULT_TIMESTAMP_FORMAT`] if
    /// the stored one is invalid (e.g. deserialized unchecked).
    pub fn timestamp_format(&self) -> &str {
        if is_valid_timestamp_format(&self.timestamp_format) {
            &self.timestamp_format
        } else {
            DEFAULT_TIMESTAMP_FORMAT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_report_failures() {
        let config = EngineConfig::default();
        assert_eq!(config.output, OutputFilter::Failed);
        assert_eq!(config.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
        assert_eq!(EngineConfig::from_lookup(|_| None), config);
    }

    #[test]
    fn reads_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            (OUTPUT_ENV, "ALL"),
            (TIMESTAMP_FORMAT_ENV, "%d.%m.%Y"),
        ]));
        assert_eq!(config.output, OutputFilter::All);
        assert_eq!(config.timestamp_format, "%d.%m.%Y");
    }

    #[test]
    fn invalid_timestamp_format_keeps_previous() {
        let config = EngineConfig::from_lookup(lookup(&[(TIMESTAMP_FORMAT_ENV, "%Q")]));
        assert_eq!(config.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);

        let config = EngineConfig::default()
            .with_timestamp_format("%d.%m.%Y")
            .with_timestamp_format("%Y-%");
        assert_eq!(config.timestamp_format, "%d.%m.%Y");
    }

    #[test]
    fn deserialized_invalid_format_reads_as_default() {
        let config: EngineConfig = serde_json::from_str(r#"{"timestamp_format": "%Q"}"#).unwrap();
        assert_eq!(config.timestamp_format(), DEFAULT_TIMESTAMP_FORMAT);
    }

    #[test]
    fn invalid_output_keeps_default() {
        let config = EngineConfig::from_lookup(lookup(&[(OUTPUT_ENV, "some")]));
        assert_eq!(config.output, OutputFilter::Failed);
    }

    #[test]
    fn legacy_codes_parse() {
        assert_eq!("2".parse::<OutputFilter>(), Ok(OutputFilter::All));
        assert_eq!("1".parse::<OutputFilter>(), Ok(OutputFilter::Passed));
        assert!("3".parse::<OutputFilter>().is_err());
    }

    #[test]
    fn filter_admits() {
        assert!(OutputFilter::Failed.admits(Verdict::Failed));
        assert!(!OutputFilter::Failed.admits(Verdict::Passed));
        assert!(OutputFilter::All.admits(Verdict::Passed));
    }

    #[test]
    fn deserializes_partial_config() {
        let config: EngineConfig = serde_json::from_str(r#"{"output": "passed"}"#).unwrap();
        assert_eq!(config.output, OutputFilter::Passed);
        assert_eq!(config.timestamp_format, EngineConfig::default().timestamp_format);
    }
}
