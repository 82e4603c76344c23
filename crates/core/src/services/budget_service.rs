use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::dashboard::BudgetStatus;
use crate::models::ledger::Ledger;
use crate::models::transaction::TransactionKind;
use crate::timeseries::{self, DateRange, TimePoint, TimeSeriesPoint, TimeValue};

/// Evaluates budgets against recorded spending.
///
/// Pure business logic — no I/O. Easy to test.
pub struct BudgetService;

impl BudgetService {
    pub fn new() -> Self {
        Self
    }

    /// Standing of every budget for the period bucket containing
    /// `as_of`. Spending counts expense transactions of the budget's
    /// category from the bucket start up to `as_of`.
    ///
    /// Sorted by percentage used, most stressed budget first.
    pub fn statuses(&self, ledger: &Ledger, as_of: DateTime<Utc>) -> Result<Vec<BudgetStatus>, CoreError> {
        let mut statuses = Vec::with_capacity(ledger.budgets.len());

        for budget in &ledger.budgets {
            let category = ledger
                .category(budget.category_id)
                .ok_or_else(|| CoreError::CategoryNotFound(budget.category_id.to_string()))?;

            let at = TimeValue::from(as_of);
            let window_start = timeseries::bucket_start(&at, budget.period)?;
            let bucket = timeseries::bucket_key(&at, budget.period)?;

            let spent: f64 = ledger
                .transactions
                .iter()
                .filter(|t| {
                    t.kind == TransactionKind::Expense
                        && t.category_id == Some(budget.category_id)
                        && t.occurred_at >= window_start
                        && t.occurred_at <= as_of
                })
                .map(|t| t.amount)
                .sum();

            let remaining = budget.amount - spent;
            let pct_used = if budget.amount > 0.0 {
                (spent / budget.amount) * 100.0
            } else {
                0.0
            };

            statuses.push(BudgetStatus {
                budget_id: budget.id,
                category_id: budget.category_id,
                category_name: category.name.clone(),
                period: budget.period,
                bucket,
                amount: budget.amount,
                spent,
                remaining,
                pct_used,
                over_budget: spent > budget.amount,
            });
        }

        // Most stressed budgets first
        statuses.sort_by(|a, b| {
            b.pct_used
                .partial_cmp(&a.pct_used)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(statuses)
    }

    /// Per-bucket spending against one budget over a range, zero-filled
    /// so charts show quiet periods too.
    ///
    /// Buckets at the range edges count their full spend, not just the
    /// part inside the range, so a mid-month range still reports the
    /// whole month's spending for a monthly budget.
    pub fn spending_history(
        &self,
        ledger: &Ledger,
        budget_id: Uuid,
        range: &DateRange,
    ) -> Result<Vec<TimeSeriesPoint>, CoreError> {
        let budget = ledger
            .budget(budget_id)
            .ok_or_else(|| CoreError::BudgetNotFound(budget_id.to_string()))?;

        let records: Vec<TimePoint> = ledger
            .transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Expense && t.category_id == Some(budget.category_id))
            .map(|t| TimePoint::new(t.occurred_at, t.amount))
            .collect();

        let totals = timeseries::aggregate_by_period(&records, budget.period);
        let series: Vec<TimeSeriesPoint> = totals
            .into_iter()
            .map(|row| TimeSeriesPoint {
                bucket: row.bucket,
                value: row.total,
            })
            .collect();

        timeseries::fill_missing_buckets(range, budget.period, &series, 0.0)
    }
}

impl Default for BudgetService {
    fn default() -> Self {
        Self::new()
    }
}
