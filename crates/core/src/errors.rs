use thiserror::Error;

use crate::timeseries::period::Period;

/// Unified error type for the entire sugih-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Time series ─────────────────────────────────────────────────
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange {
        start: String,
        end: String,
    },

    #[error("Invalid {period} bucket key: '{key}'")]
    InvalidBucketKey {
        period: Period,
        key: String,
    },

    // ── Snapshot ────────────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Savings bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Budget not found: {0}")]
    BudgetNotFound(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
