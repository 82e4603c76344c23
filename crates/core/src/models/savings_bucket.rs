use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named savings goal money is set aside for ("Emergency fund",
/// "Bali trip").
///
/// Money enters and leaves a bucket only through bucket deposit and
/// withdrawal transactions, so the saved amount is derived, never
/// stored. A bucket can never hold less than zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsBucket {
    /// Unique identifier
    pub id: Uuid,

    /// Display name of the goal
    pub name: String,

    /// Amount this goal aims for (always positive)
    pub target_amount: f64,

    /// Optional date the goal should be reached by
    #[serde(default)]
    pub deadline: Option<NaiveDate>,

    /// Archived buckets refuse new transactions but keep history
    #[serde(default)]
    pub archived: bool,
}

impl SavingsBucket {
    pub fn new(name: impl Into<String>, target_amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            target_amount,
            deadline: None,
            archived: false,
        }
    }

    /// Create a bucket with a deadline attached.
    pub fn with_deadline(name: impl Into<String>, target_amount: f64, deadline: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            target_amount,
            deadline: Some(deadline),
            archived: false,
        }
    }
}
