use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::timeseries::bucket::{generate_buckets, key_for_date, start_of_bucket, BucketKey};
use crate::timeseries::period::Period;
use crate::timeseries::time_value::{DateRange, TimeValue};

/// One dated amount to aggregate.
///
/// `group` carries an optional label (category name, wallet name) that
/// grouped aggregation can key on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub occurred_at: TimeValue,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl TimePoint {
    pub fn new(occurred_at: impl Into<TimeValue>, amount: f64) -> Self {
        Self {
            occurred_at: occurred_at.into(),
            amount,
            group: None,
        }
    }

    pub fn grouped(occurred_at: impl Into<TimeValue>, amount: f64, group: impl Into<String>) -> Self {
        Self {
            occurred_at: occurred_at.into(),
            amount,
            group: Some(group.into()),
        }
    }
}

/// A single chart-ready point: one bucket, one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub bucket: BucketKey,
    pub value: f64,
}

/// Aggregation result for one bucket: the sum of amounts and how many
/// records contributed to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotal {
    pub bucket: BucketKey,
    pub total: f64,
    pub count: usize,
}

/// Aggregation result for one bucket, split by group label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedTimeSeriesPoint {
    pub bucket: BucketKey,
    pub groups: BTreeMap<String, f64>,
}

/// Sums `records` into per-bucket totals, ordered chronologically.
///
/// Records whose timestamp cannot be resolved are skipped (logged, and
/// counted in a single warning) rather than failing the aggregation;
/// `count` reflects only the records that landed in the bucket. Buckets
/// with no records are absent from the output, not zero-valued.
pub fn aggregate_by_period(records: &[TimePoint], period: Period) -> Vec<PeriodTotal> {
    let mut buckets: BTreeMap<NaiveDate, PeriodTotal> = BTreeMap::new();
    let mut skipped = 0usize;

    for record in records {
        let start = match resolved_bucket_start(record, period) {
            Some(start) => start,
            None => {
                skipped += 1;
                continue;
            }
        };
        let row = buckets.entry(start).or_insert_with(|| PeriodTotal {
            bucket: key_for_date(start, period),
            total: 0.0,
            count: 0,
        });
        row.total += record.amount;
        row.count += 1;
    }

    if skipped > 0 {
        log::warn!("aggregate_by_period: skipped {skipped} record(s) with unusable timestamps");
    }
    buckets.into_values().collect()
}

/// Like [`aggregate_by_period`], but splits each bucket's total by the
/// label `group_key` derives from the record. Only observed groups
/// appear in a bucket's map; there is no zero-filling of groups.
pub fn aggregate_by_period_and_group<F>(
    records: &[TimePoint],
    period: Period,
    group_key: F,
) -> Vec<GroupedTimeSeriesPoint>
where
    F: Fn(&TimePoint) -> String,
{
    let mut buckets: BTreeMap<NaiveDate, GroupedTimeSeriesPoint> = BTreeMap::new();
    let mut skipped = 0usize;

    for record in records {
        let start = match resolved_bucket_start(record, period) {
            Some(start) => start,
            None => {
                skipped += 1;
                continue;
            }
        };
        let row = buckets.entry(start).or_insert_with(|| GroupedTimeSeriesPoint {
            bucket: key_for_date(start, period),
            groups: BTreeMap::new(),
        });
        *row.groups.entry(group_key(record)).or_insert(0.0) += record.amount;
    }

    if skipped > 0 {
        log::warn!("aggregate_by_period_and_group: skipped {skipped} record(s) with unusable timestamps");
    }
    buckets.into_values().collect()
}

/// Expands a sparse series to the full bucket sequence of `range`,
/// substituting `default_value` for buckets the series does not cover.
///
/// Input points are matched by bucket key, so their order does not
/// matter; when the input repeats a key the last value wins. The output
/// always has exactly one point per bucket of the range, in order.
pub fn fill_missing_buckets(
    range: &DateRange,
    period: Period,
    series: &[TimeSeriesPoint],
    default_value: f64,
) -> Result<Vec<TimeSeriesPoint>, CoreError> {
    let keys = generate_buckets(range, period)?;

    let mut by_key: HashMap<&str, f64> = HashMap::with_capacity(series.len());
    for point in series {
        by_key.insert(point.bucket.as_str(), point.value);
    }

    Ok(keys
        .into_iter()
        .map(|bucket| {
            let value = by_key.get(bucket.as_str()).copied().unwrap_or(default_value);
            TimeSeriesPoint { bucket, value }
        })
        .collect())
}

/// Resolves a record's timestamp to its bucket start, or None when the
/// record should be skipped.
fn resolved_bucket_start(record: &TimePoint, period: Period) -> Option<NaiveDate> {
    match record.occurred_at.resolve() {
        Ok(instant) => start_of_bucket(instant.date_naive(), period),
        Err(err) => {
            log::debug!("skipping record with unusable timestamp: {err}");
            None
        }
    }
}
