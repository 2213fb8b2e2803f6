//! Calendar-date helpers for product release/revision fields.
//!
//! # Responsibility
//! - Parse ISO `YYYY-MM-DD` strings as local calendar days.
//! - Derive the revision date as release date plus one calendar year.
//!
//! # Invariants
//! - No timezone conversion is ever applied.
//! - Day overflow in the target year rolls into the following month
//!   (`2024-02-29` + 1 year = `2025-03-01`).

use chrono::{Datelike, Days, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid iso date regex"));

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Date parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Input is not shaped as `YYYY-MM-DD`.
    Malformed(String),
    /// Input is shaped correctly but names no calendar day.
    OutOfRange(String),
}

impl Display for DateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(value) => write!(f, "date must be formatted as YYYY-MM-DD: `{value}`"),
            Self::OutOfRange(value) => write!(f, "date is not a valid calendar day: `{value}`"),
        }
    }
}

impl Error for DateError {}

/// Parses a `YYYY-MM-DD` string as a local calendar day.
///
/// Surrounding whitespace is ignored.
pub fn parse_local_date(value: &str) -> Result<NaiveDate, DateError> {
    let trimmed = value.trim();
    let caps = ISO_DATE_RE
        .captures(trimmed)
        .ok_or_else(|| DateError::Malformed(trimmed.to_string()))?;

    let year = caps[1]
        .parse::<i32>()
        .map_err(|_| DateError::Malformed(trimmed.to_string()))?;
    let month = caps[2]
        .parse::<u32>()
        .map_err(|_| DateError::Malformed(trimmed.to_string()))?;
    let day = caps[3]
        .parse::<u32>()
        .map_err(|_| DateError::Malformed(trimmed.to_string()))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DateError::OutOfRange(trimmed.to_string()))
}

/// Formats a calendar day as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Shifts a day by whole calendar years, rolling day overflow forward.
///
/// Returns `None` only when the result leaves chrono's supported range.
pub fn add_years_rolling(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    let year = date.year().checked_add(years)?;
    if let Some(exact) = NaiveDate::from_ymd_opt(year, date.month(), date.day()) {
        return Some(exact);
    }
    // Only Feb 29 can overflow; count the surplus days from the first of the month.
    let first = NaiveDate::from_ymd_opt(year, date.month(), 1)?;
    first.checked_add_days(Days::new(u64::from(date.day() - 1)))
}

/// Derives `date_revision` from a raw `date_release` value.
///
/// - empty (or whitespace-only) input yields an empty string;
/// - unparseable input also yields an empty string, leaving the release field
///   to report the problem;
/// - otherwise the release day plus one calendar year, as `YYYY-MM-DD`.
pub fn derive_revision_date(release: &str) -> String {
    if release.trim().is_empty() {
        return String::new();
    }
    parse_local_date(release)
        .ok()
        .and_then(|date| add_years_rolling(date, 1))
        .map(format_date)
        .unwrap_or_default()
}

/// Returns the current local calendar day.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
