//! Period bucketing and aggregation over dated amounts.
//!
//! Ties timestamps to canonical bucket keys ("2024-03-01", "2024-W09",
//! "2024-03"), expands ranges to full bucket sequences, and folds dated
//! records into chart-ready rows. All date math is UTC.

pub mod aggregate;
pub mod bucket;
pub mod period;
pub mod time_value;

pub use aggregate::{
    aggregate_by_period, aggregate_by_period_and_group, fill_missing_buckets,
    GroupedTimeSeriesPoint, PeriodTotal, TimePoint, TimeSeriesPoint,
};
pub use bucket::{bucket_key, bucket_start, generate_buckets, parse_bucket_key, BucketKey};
pub use period::Period;
pub use time_value::{DateRange, TimeValue};
