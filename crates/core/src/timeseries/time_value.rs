use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Timestamp formats accepted for text values, tried after RFC 3339.
/// Naive forms (no offset) are interpreted as UTC; a trailing literal
/// 'Z' covers truncated forms RFC 3339 rejects, like "2024-03-01T10:00Z".
const TEXT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// A point in time as callers supply it: an actual timestamp, a plain
/// calendar date, or a string that still has to be parsed.
///
/// Text values are resolved lazily so that aggregation can skip records
/// whose timestamp turns out to be unusable instead of failing wholesale.
/// Date-only values resolve to midnight UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    /// A fully-resolved UTC instant
    Instant(DateTime<Utc>),
    /// A calendar date, resolved as midnight UTC
    Date(NaiveDate),
    /// A textual timestamp, parsed on resolution
    Text(String),
}

impl TimeValue {
    /// Resolves this value to a concrete UTC instant.
    ///
    /// Fails with [`CoreError::InvalidDate`] when a text value does not
    /// parse as any supported timestamp shape or does not name a real
    /// calendar date (e.g. "2024-02-30").
    pub fn resolve(&self) -> Result<DateTime<Utc>, CoreError> {
        match self {
            TimeValue::Instant(instant) => Ok(*instant),
            TimeValue::Date(date) => midnight_utc(*date),
            TimeValue::Text(text) => parse_timestamp(text),
        }
    }
}

impl From<DateTime<Utc>> for TimeValue {
    fn from(instant: DateTime<Utc>) -> Self {
        TimeValue::Instant(instant)
    }
}

impl From<NaiveDate> for TimeValue {
    fn from(date: NaiveDate) -> Self {
        TimeValue::Date(date)
    }
}

impl From<&str> for TimeValue {
    fn from(text: &str) -> Self {
        TimeValue::Text(text.to_string())
    }
}

impl From<String> for TimeValue {
    fn from(text: String) -> Self {
        TimeValue::Text(text)
    }
}

/// An inclusive date range. Endpoints accept anything a [`TimeValue`]
/// accepts, so "2024-03-01" strings work as well as real timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: TimeValue,
    pub end: TimeValue,
}

impl DateRange {
    pub fn new(start: impl Into<TimeValue>, end: impl Into<TimeValue>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Resolves both endpoints and checks their ordering.
    ///
    /// Returns [`CoreError::InvalidDate`] when an endpoint is unusable
    /// and [`CoreError::InvalidRange`] when start is after end.
    pub fn resolve(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), CoreError> {
        let start = self.start.resolve()?;
        let end = self.end.resolve()?;
        if start > end {
            return Err(CoreError::InvalidRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok((start, end))
    }
}

pub(crate) fn midnight_utc(date: NaiveDate) -> Result<DateTime<Utc>, CoreError> {
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| CoreError::InvalidDate(date.to_string()))
}

fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, CoreError> {
    let trimmed = text.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }

    for format in TEXT_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return midnight_utc(date);
    }

    Err(CoreError::InvalidDate(text.to_string()))
}
