use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Bucketing granularity for time-series operations.
///
/// Weekly buckets follow ISO 8601: weeks start on Monday and the week
/// number belongs to the ISO week-numbering year, which can differ from
/// the calendar year around January 1st.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// One bucket per calendar day, keyed "YYYY-MM-DD"
    Daily,
    /// One bucket per ISO week, keyed "YYYY-Www"
    Weekly,
    /// One bucket per calendar month, keyed "YYYY-MM"
    Monthly,
}

impl Period {
    /// Canonical lowercase token, same spelling serde uses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            other => Err(CoreError::ValidationError(format!(
                "Unknown period '{other}': expected 'daily', 'weekly' or 'monthly'"
            ))),
        }
    }
}
