//! Relative-date normalization
//!
//! Community pages render post age as a compact token such as "3d" or "8w".
//! These are converted into the absolute date the post was published,
//! truncated to midnight. Only days and weeks carry an offset; the page never
//! shows anything finer than a day or coarser than a week, so the other units
//! resolve to today.

use chrono::{DateTime, Days, Local, NaiveTime, SecondsFormat, TimeZone, Utc};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)([smhdwy])$").unwrap());

/// Errors from date normalization
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("Malformed relative date token: {0:?}")]
    MalformedToken(String),
}

/// Unit of a relative age token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Years,
}

/// A parsed `<count><unit>` token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeAge {
    pub count: u64,
    pub unit: AgeUnit,
}

impl RelativeAge {
    /// Parse a token of the form `^\d+[smhdwy]$`
    pub fn parse(token: &str) -> Result<Self, DateError> {
        let malformed = || DateError::MalformedToken(token.to_string());

        let caps = TOKEN_REGEX.captures(token).ok_or_else(malformed)?;
        let count = caps[1].parse::<u64>().map_err(|_| malformed())?;
        let unit = match &caps[2] {
            "s" => AgeUnit::Seconds,
            "m" => AgeUnit::Minutes,
            "h" => AgeUnit::Hours,
            "d" => AgeUnit::Days,
            "w" => AgeUnit::Weeks,
            "y" => AgeUnit::Years,
            _ => return Err(malformed()),
        };

        Ok(Self { count, unit })
    }

    /// Number of calendar days this age reaches back
    pub fn offset_days(&self) -> Option<u64> {
        match self.unit {
            AgeUnit::Days => Some(self.count),
            AgeUnit::Weeks => self.count.checked_mul(7),
            _ => Some(0),
        }
    }
}

/// Normalize a relative age token against the current local time
pub fn normalize(token: &str) -> Result<String, DateError> {
    normalize_at(token, &Local::now())
}

/// Normalize a relative age token against a fixed "now".
///
/// The result is midnight of the resulting day in `now`'s time zone,
/// rendered in UTC as RFC 3339 with milliseconds.
pub fn normalize_at<Tz: TimeZone>(token: &str, now: &DateTime<Tz>) -> Result<String, DateError> {
    let age = RelativeAge::parse(token)?;

    let date = age
        .offset_days()
        .and_then(|days| now.date_naive().checked_sub_days(Days::new(days)))
        .ok_or_else(|| DateError::MalformedToken(token.to_string()))?;

    let midnight = date.and_time(NaiveTime::MIN);
    let instant = now
        .timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight));

    Ok(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}
