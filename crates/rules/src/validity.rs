//! Calendar validity windows for groups.

use chrono::NaiveDate;

use crate::error::ValidityParseError;
use crate::value::DATE_FORMAT;

/// Inclusive date range; a missing bound is open on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidityWindow {
    /// First valid day.
    pub from: Option<NaiveDate>,
    /// Last valid day.
    pub until: Option<NaiveDate>,
}

impl ValidityWindow {
    /// Parses both bounds of `group`'s window.
    ///
    /// Bounds are `yyyy-MM-dd`; anything after the date (a time of day) is
    /// ignored. Blank bounds count as missing.
    pub fn parse(
        group: &str,
        from: Option<&str>,
        until: Option<&str>,
    ) -> Result<Self, ValidityParseError> {
        Ok(Self {
            from: parse_bound(group, "validFrom", from)?,
            until: parse_bound(group, "validUntil", until)?,
        })
    }

    /// Whether `day` falls inside the window.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from.is_none_or(|from| from <= day) && self.until.is_none_or(|until| day <= until)
    }
}

fn parse_bound(
    group: &str,
    bound: &'static str,
    text: Option<&str>,
) -> Result<Option<NaiveDate>, ValidityParseError> {
    let Some(text) = text.map(str::trim).filter(|text| !text.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_and_remainder(text, DATE_FORMAT)
        .map(|(date, _)| Some(date))
        .map_err(|source| ValidityParseError {
            group: group.to_owned(),
            bound,
            value: text.to_owned(),
            source,
        })
}
