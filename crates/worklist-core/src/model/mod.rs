//! Records returned by the remote platform and the enums the views key on.

pub mod calendar;
pub mod item;
pub mod kpi;
pub mod roster;
pub mod team;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

pub(crate) fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

/// Parse an ISO date, tolerating a trailing time component (`2026-03-01 10:22:00`).
///
/// # Errors
///
/// Returns the chrono parse error when the first ten characters are not `YYYY-MM-DD`.
pub fn parse_iso_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
}

/// Null, missing and empty-string dates all mean "no date".
pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_iso_date(value)
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid date '{value}': {e}"))),
    }
}

/// The platform sends `null` for empty child tables.
pub(crate) fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Numeric fields sometimes arrive as `null`; treat them as zero.
pub(crate) fn nullable_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn nullable_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or_default())
}
