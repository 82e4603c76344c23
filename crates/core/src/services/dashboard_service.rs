use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::dashboard::{BucketProgress, CategoryTotal, DashboardSummary, WalletBalance};
use crate::models::ledger::Ledger;
use crate::models::transaction::TransactionKind;
use crate::services::budget_service::BudgetService;
use crate::services::ledger_service::LedgerService;
use crate::timeseries::{
    self, DateRange, GroupedTimeSeriesPoint, Period, TimePoint, TimeSeriesPoint,
};

/// Maximum reporting range for dashboard series (10 years).
/// Keeps a typo in a range from generating millions of buckets.
pub const MAX_SERIES_RANGE_DAYS: i64 = 3650;

/// Group label for expense transactions whose category is gone.
const UNCATEGORIZED: &str = "Uncategorized";

/// Assembles dashboard read models: the overall summary, cashflow
/// series and per-category spending breakdowns.
pub struct DashboardService {
    ledger_service: LedgerService,
    budget_service: BudgetService,
}

impl DashboardService {
    pub fn new() -> Self {
        Self {
            ledger_service: LedgerService::new(),
            budget_service: BudgetService::new(),
        }
    }

    /// Full ledger summary over the inclusive range.
    ///
    /// Income/expense totals count transactions inside the range;
    /// balances, bucket progress, budget standing and net worth are
    /// evaluated as of the range end.
    pub fn summary(&self, ledger: &Ledger, range: &DateRange) -> Result<DashboardSummary, CoreError> {
        let (from, to) = range.resolve()?;

        let mut total_income = 0.0;
        let mut total_expense = 0.0;
        let mut transaction_count = 0usize;
        let mut expense_by_category: HashMap<Uuid, f64> = HashMap::new();

        for transaction in &ledger.transactions {
            if transaction.occurred_at < from || transaction.occurred_at > to {
                continue;
            }
            transaction_count += 1;
            match transaction.kind {
                TransactionKind::Income => total_income += transaction.amount,
                TransactionKind::Expense => {
                    total_expense += transaction.amount;
                    if let Some(category_id) = transaction.category_id {
                        *expense_by_category.entry(category_id).or_insert(0.0) += transaction.amount;
                    }
                }
                // Transfers and bucket moves are internal
                _ => {}
            }
        }

        let balances = self.ledger_service.wallet_balances(ledger, to);
        let mut wallet_balances: Vec<WalletBalance> = ledger
            .wallets
            .iter()
            .map(|wallet| WalletBalance {
                wallet_id: wallet.id,
                name: wallet.name.clone(),
                currency: wallet.currency.clone(),
                balance: balances.get(&wallet.id).copied().unwrap_or(0.0),
            })
            .collect();
        wallet_balances.sort_by(|a, b| b.balance.partial_cmp(&a.balance).unwrap_or(Ordering::Equal));

        let mut top_expense_categories: Vec<CategoryTotal> = expense_by_category
            .into_iter()
            .map(|(category_id, total)| CategoryTotal {
                category_id,
                name: ledger
                    .category(category_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| UNCATEGORIZED.to_string()),
                total,
            })
            .collect();
        top_expense_categories.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));

        let savings = self.ledger_service.bucket_savings(ledger, to);
        let bucket_progress: Vec<BucketProgress> = ledger
            .buckets
            .iter()
            .map(|bucket| {
                let saved = savings.get(&bucket.id).copied().unwrap_or(0.0);
                let pct_funded = if bucket.target_amount > 0.0 {
                    (saved / bucket.target_amount) * 100.0
                } else {
                    0.0
                };
                BucketProgress {
                    bucket_id: bucket.id,
                    name: bucket.name.clone(),
                    target_amount: bucket.target_amount,
                    saved,
                    pct_funded,
                    deadline: bucket.deadline,
                }
            })
            .collect();

        let budget_statuses = self.budget_service.statuses(ledger, to)?;

        Ok(DashboardSummary {
            from,
            to,
            net_worth: self.ledger_service.net_worth(ledger, to),
            total_income,
            total_expense,
            net_cashflow: total_income - total_expense,
            transaction_count,
            wallet_balances,
            top_expense_categories,
            budget_statuses,
            bucket_progress,
        })
    }

    /// Net cashflow (income minus expenses) per bucket over the range,
    /// zero-filled so the chart has no gaps.
    ///
    /// Transfers and bucket moves shift money between containers and
    /// contribute nothing.
    pub fn cashflow(
        &self,
        ledger: &Ledger,
        range: &DateRange,
        period: Period,
    ) -> Result<Vec<TimeSeriesPoint>, CoreError> {
        let (from, to) = self.bounded_range(range)?;

        let records: Vec<TimePoint> = ledger
            .transactions
            .iter()
            .filter(|t| t.occurred_at >= from && t.occurred_at <= to)
            .filter_map(|t| match t.kind {
                TransactionKind::Income => Some(TimePoint::new(t.occurred_at, t.amount)),
                TransactionKind::Expense => Some(TimePoint::new(t.occurred_at, -t.amount)),
                _ => None,
            })
            .collect();

        let totals = timeseries::aggregate_by_period(&records, period);
        let series: Vec<TimeSeriesPoint> = totals
            .into_iter()
            .map(|row| TimeSeriesPoint {
                bucket: row.bucket,
                value: row.total,
            })
            .collect();

        timeseries::fill_missing_buckets(range, period, &series, 0.0)
    }

    /// Spending per expense category per bucket over the range.
    ///
    /// Only buckets with spending appear, and each bucket lists only
    /// the categories actually spent on; there is no zero-filling.
    pub fn spending_by_category(
        &self,
        ledger: &Ledger,
        range: &DateRange,
        period: Period,
    ) -> Result<Vec<GroupedTimeSeriesPoint>, CoreError> {
        let (from, to) = self.bounded_range(range)?;

        let records: Vec<TimePoint> = ledger
            .transactions
            .iter()
            .filter(|t| {
                t.kind == TransactionKind::Expense && t.occurred_at >= from && t.occurred_at <= to
            })
            .map(|t| {
                let name = t
                    .category_id
                    .and_then(|id| ledger.category(id))
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| UNCATEGORIZED.to_string());
                TimePoint::grouped(t.occurred_at, t.amount, name)
            })
            .collect();

        Ok(timeseries::aggregate_by_period_and_group(
            &records,
            period,
            |record| record.group.clone().unwrap_or_else(|| UNCATEGORIZED.to_string()),
        ))
    }

    /// Resolve a range and refuse absurdly large ones.
    fn bounded_range(&self, range: &DateRange) -> Result<(DateTime<Utc>, DateTime<Utc>), CoreError> {
        let (from, to) = range.resolve()?;
        let days = (to - from).num_days();
        if days > MAX_SERIES_RANGE_DAYS {
            return Err(CoreError::ValidationError(format!(
                "Date range too large: {days} days (max {MAX_SERIES_RANGE_DAYS})"
            )));
        }
        Ok((from, to))
    }
}

impl Default for DashboardService {
    fn default() -> Self {
        Self::new()
    }
}
