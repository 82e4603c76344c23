use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc, Weekday};

use crate::errors::CoreError;
use crate::timeseries::period::Period;
use crate::timeseries::time_value::{midnight_utc, DateRange, TimeValue};

/// Canonical bucket label: "YYYY-MM-DD", "YYYY-Www" or "YYYY-MM"
/// depending on the period that produced it.
pub type BucketKey = String;

/// Returns the canonical bucket key for the bucket containing `timestamp`.
///
/// Weekly keys use the ISO week-numbering year, so 2024-12-31 maps to
/// "2025-W01" and 2021-01-01 maps to "2020-W53".
pub fn bucket_key(timestamp: &TimeValue, period: Period) -> Result<BucketKey, CoreError> {
    let instant = timestamp.resolve()?;
    Ok(key_for_date(instant.date_naive(), period))
}

/// Returns the first instant (midnight UTC) of the bucket containing
/// `timestamp`: the day itself, the Monday of the ISO week, or the
/// first of the month.
pub fn bucket_start(timestamp: &TimeValue, period: Period) -> Result<DateTime<Utc>, CoreError> {
    let instant = timestamp.resolve()?;
    let date = instant.date_naive();
    let start = start_of_bucket(date, period).ok_or_else(|| CoreError::InvalidDate(date.to_string()))?;
    midnight_utc(start)
}

/// Generates the complete ordered sequence of bucket keys covering the
/// inclusive `range`. Both endpoint buckets are included even when the
/// endpoints fall mid-bucket, and no key is ever skipped or duplicated.
pub fn generate_buckets(range: &DateRange, period: Period) -> Result<Vec<BucketKey>, CoreError> {
    let (start, end) = range.resolve()?;
    let end_date = end.date_naive();
    let start_date = start.date_naive();
    let mut current = start_of_bucket(start_date, period)
        .ok_or_else(|| CoreError::InvalidDate(start_date.to_string()))?;

    let mut keys = Vec::new();
    while current <= end_date {
        keys.push(key_for_date(current, period));
        match advance(current, period) {
            Some(next) => current = next,
            None => break,
        }
    }
    Ok(keys)
}

/// Parses a canonical bucket key back to the first instant of its bucket.
///
/// The inverse of [`bucket_key`]: only the exact canonical spelling is
/// accepted. Lenient variants ("2024-3-1", "2024-W9") and keys of the
/// wrong shape for `period` fail with [`CoreError::InvalidBucketKey`].
pub fn parse_bucket_key(key: &str, period: Period) -> Result<DateTime<Utc>, CoreError> {
    let start = match period {
        Period::Daily => parse_daily_key(key),
        Period::Weekly => parse_weekly_key(key),
        Period::Monthly => parse_monthly_key(key),
    };
    match start {
        Some(date) => midnight_utc(date),
        None => Err(CoreError::InvalidBucketKey {
            period,
            key: key.to_string(),
        }),
    }
}

// ── Internal date-level helpers (shared with aggregation) ───────────

/// Key of the bucket containing `date`. Works for any date in the
/// bucket, not just its start.
pub(crate) fn key_for_date(date: NaiveDate, period: Period) -> BucketKey {
    match period {
        Period::Daily => date.format("%Y-%m-%d").to_string(),
        Period::Weekly => {
            let iso = date.iso_week();
            format!("{:04}-W{:02}", iso.year(), iso.week())
        }
        Period::Monthly => date.format("%Y-%m").to_string(),
    }
}

/// First day of the bucket containing `date`. None only at the edge of
/// the representable date range.
pub(crate) fn start_of_bucket(date: NaiveDate, period: Period) -> Option<NaiveDate> {
    match period {
        Period::Daily => Some(date),
        Period::Weekly => {
            let days_past_monday = u64::from(date.weekday().num_days_from_monday());
            date.checked_sub_days(Days::new(days_past_monday))
        }
        Period::Monthly => NaiveDate::from_ymd_opt(date.year(), date.month(), 1),
    }
}

/// First day of the bucket after the one starting at `date`.
pub(crate) fn advance(date: NaiveDate, period: Period) -> Option<NaiveDate> {
    match period {
        Period::Daily => date.succ_opt(),
        Period::Weekly => date.checked_add_days(Days::new(7)),
        Period::Monthly => date.checked_add_months(Months::new(1)),
    }
}

// ── Strict key parsers ──────────────────────────────────────────────

fn parse_daily_key(key: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()?;
    // Round-trip check rejects lenient spellings like "2024-3-1".
    (key_for_date(date, Period::Daily) == key).then_some(date)
}

fn parse_weekly_key(key: &str) -> Option<NaiveDate> {
    let (year_part, week_part) = key.split_once("-W")?;
    if !is_zero_padded_number(year_part, 4) || !is_zero_padded_number(week_part, 2) {
        return None;
    }
    let year: i32 = year_part.parse().ok()?;
    let week: u32 = week_part.parse().ok()?;
    // Rejects week 00, weeks past 53, and W53 in 52-week ISO years.
    NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
}

fn parse_monthly_key(key: &str) -> Option<NaiveDate> {
    let (year_part, month_part) = key.split_once('-')?;
    if !is_zero_padded_number(year_part, 4) || !is_zero_padded_number(month_part, 2) {
        return None;
    }
    let year: i32 = year_part.parse().ok()?;
    let month: u32 = month_part.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn is_zero_padded_number(part: &str, width: usize) -> bool {
    part.len() == width && part.bytes().all(|b| b.is_ascii_digit())
}
