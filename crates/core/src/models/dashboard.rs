use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timeseries::{BucketKey, Period};

/// Summary of the whole ledger over a reporting range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Start of the reporting range (inclusive)
    pub from: DateTime<Utc>,

    /// End of the reporting range (inclusive)
    pub to: DateTime<Utc>,

    /// Sum of all wallet balances plus all bucket savings as of `to`
    pub net_worth: f64,

    /// Income recorded inside the range
    pub total_income: f64,

    /// Expenses recorded inside the range
    pub total_expense: f64,

    /// total_income - total_expense
    pub net_cashflow: f64,

    /// Number of transactions inside the range
    pub transaction_count: usize,

    /// Per-wallet balances as of `to`, archived wallets included
    pub wallet_balances: Vec<WalletBalance>,

    /// Expense categories of the range, largest spend first
    pub top_expense_categories: Vec<CategoryTotal>,

    /// Budget standing for the bucket containing `to`
    pub budget_statuses: Vec<BudgetStatus>,

    /// Savings bucket progress as of `to`
    pub bucket_progress: Vec<BucketProgress>,
}

/// Balance of a single wallet at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub wallet_id: Uuid,

    /// Wallet name, denormalized for display
    pub name: String,

    /// Wallet currency code
    pub currency: String,

    /// Derived balance; can be negative (overdraft)
    pub balance: f64,
}

/// Total spend or income of one category over a range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category_id: Uuid,

    /// Category name, denormalized for display
    pub name: String,

    /// Sum of transaction amounts in the range
    pub total: f64,
}

/// Standing of one budget inside a single period bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub budget_id: Uuid,

    pub category_id: Uuid,

    /// Category name, denormalized for display
    pub category_name: String,

    /// Bucket granularity the cap recurs over
    pub period: Period,

    /// The evaluated bucket (e.g., "2024-03" for a monthly budget)
    pub bucket: BucketKey,

    /// The spending cap for one bucket
    pub amount: f64,

    /// Spending accumulated in the bucket so far
    pub spent: f64,

    /// amount - spent; negative once the cap is blown
    pub remaining: f64,

    /// spent / amount × 100; 0 when the cap is not positive
    pub pct_used: f64,

    /// True once spent exceeds amount
    pub over_budget: bool,
}

/// Progress of one savings bucket toward its target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketProgress {
    pub bucket_id: Uuid,

    /// Bucket name, denormalized for display
    pub name: String,

    /// The goal amount
    pub target_amount: f64,

    /// Amount currently set aside (deposits minus withdrawals)
    pub saved: f64,

    /// saved / target_amount × 100; 0 when the target is not positive
    pub pct_funded: f64,

    /// Optional goal date
    pub deadline: Option<NaiveDate>,
}
