use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timeseries::Period;

/// A recurring spending cap for one expense category.
///
/// The cap applies per bucket of the budget's period: a monthly 500
/// budget allows 500 in each calendar month, a weekly one 500 per ISO
/// week. At most one budget exists per (category, period) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier
    pub id: Uuid,

    /// The expense category this caps
    pub category_id: Uuid,

    /// Spending cap per period bucket (always positive)
    pub amount: f64,

    /// Bucket granularity the cap recurs over
    pub period: Period,
}

impl Budget {
    pub fn new(category_id: Uuid, amount: f64, period: Period) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            amount,
            period,
        }
    }
}
