pub mod errors;
pub mod models;
pub mod services;
pub mod timeseries;

use chrono::{DateTime, Utc};
use models::{
    budget::Budget,
    category::{Category, CategoryFlow},
    dashboard::{BudgetStatus, DashboardSummary},
    ledger::Ledger,
    savings_bucket::SavingsBucket,
    transaction::{Transaction, TransactionKind},
    wallet::{Wallet, WalletKind},
};
use services::{
    budget_service::BudgetService, dashboard_service::DashboardService,
    ledger_service::LedgerService,
};
use std::collections::HashMap;
use timeseries::{DateRange, GroupedTimeSeriesPoint, Period, TimeSeriesPoint};

use errors::CoreError;

/// Main entry point for the Sugih core library.
/// Holds the ledger state and all services needed to operate on it.
#[must_use]
pub struct Sugih {
    ledger: Ledger,
    ledger_service: LedgerService,
    budget_service: BudgetService,
    dashboard_service: DashboardService,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for Sugih {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sugih")
            .field("wallets", &self.ledger.wallets.len())
            .field("categories", &self.ledger.categories.len())
            .field("buckets", &self.ledger.buckets.len())
            .field("budgets", &self.ledger.budgets.len())
            .field("transactions", &self.ledger.transactions.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Sugih {
    /// Create a brand new empty ledger.
    pub fn create_new() -> Self {
        Self::build(Ledger::default())
    }

    /// Load an existing ledger from a JSON snapshot.
    /// The frontend decides where the snapshot lives; this library
    /// never touches the filesystem.
    pub fn load_from_json(json: &str) -> Result<Self, CoreError> {
        let ledger: Ledger = serde_json::from_str(json)?;
        Ok(Self::build(ledger))
    }

    /// Save the current ledger to a JSON snapshot string.
    /// Clears the unsaved-changes flag on success.
    pub fn save_to_json(&mut self) -> Result<String, CoreError> {
        let json = serde_json::to_string_pretty(&self.ledger)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize ledger: {e}")))?;
        self.dirty = false;
        Ok(json)
    }

    // ── Wallets ─────────────────────────────────────────────────────

    /// Add a wallet and return its id.
    pub fn add_wallet(
        &mut self,
        name: impl Into<String>,
        currency: impl Into<String>,
        kind: WalletKind,
    ) -> Result<uuid::Uuid, CoreError> {
        let wallet = Wallet::new(name, currency, kind);
        let id = wallet.id;
        self.ledger_service.register_wallet(&mut self.ledger, wallet)?;
        self.dirty = true;
        Ok(id)
    }

    pub fn rename_wallet(&mut self, wallet_id: uuid::Uuid, name: &str) -> Result<(), CoreError> {
        self.ledger_service.rename_wallet(&mut self.ledger, wallet_id, name)?;
        self.dirty = true;
        Ok(())
    }

    /// Archive a wallet. It refuses new transactions but keeps history.
    pub fn archive_wallet(&mut self, wallet_id: uuid::Uuid) -> Result<(), CoreError> {
        self.ledger_service.set_wallet_archived(&mut self.ledger, wallet_id, true)?;
        self.dirty = true;
        Ok(())
    }

    /// Bring an archived wallet back into use.
    pub fn restore_wallet(&mut self, wallet_id: uuid::Uuid) -> Result<(), CoreError> {
        self.ledger_service.set_wallet_archived(&mut self.ledger, wallet_id, false)?;
        self.dirty = true;
        Ok(())
    }

    /// Get a single wallet by its id.
    #[must_use]
    pub fn get_wallet(&self, wallet_id: uuid::Uuid) -> Option<&Wallet> {
        self.ledger.wallet(wallet_id)
    }

    /// Get all wallets, archived ones included.
    #[must_use]
    pub fn get_wallets(&self) -> &[Wallet] {
        &self.ledger.wallets
    }

    /// Balance of one wallet as of an instant.
    pub fn wallet_balance(&self, wallet_id: uuid::Uuid, as_of: DateTime<Utc>) -> Result<f64, CoreError> {
        self.ledger_service.wallet_balance(&self.ledger, wallet_id, as_of)
    }

    /// Balance of every wallet as of an instant, keyed by wallet id.
    #[must_use]
    pub fn wallet_balances(&self, as_of: DateTime<Utc>) -> HashMap<uuid::Uuid, f64> {
        self.ledger_service.wallet_balances(&self.ledger, as_of)
    }

    // ── Categories ──────────────────────────────────────────────────

    /// Add an income or expense category and return its id.
    pub fn add_category(
        &mut self,
        name: impl Into<String>,
        flow: CategoryFlow,
    ) -> Result<uuid::Uuid, CoreError> {
        let category = Category::new(name, flow);
        let id = category.id;
        self.ledger_service.register_category(&mut self.ledger, category)?;
        self.dirty = true;
        Ok(id)
    }

    pub fn rename_category(&mut self, category_id: uuid::Uuid, name: &str) -> Result<(), CoreError> {
        self.ledger_service.rename_category(&mut self.ledger, category_id, name)?;
        self.dirty = true;
        Ok(())
    }

    pub fn archive_category(&mut self, category_id: uuid::Uuid) -> Result<(), CoreError> {
        self.ledger_service.set_category_archived(&mut self.ledger, category_id, true)?;
        self.dirty = true;
        Ok(())
    }

    pub fn restore_category(&mut self, category_id: uuid::Uuid) -> Result<(), CoreError> {
        self.ledger_service.set_category_archived(&mut self.ledger, category_id, false)?;
        self.dirty = true;
        Ok(())
    }

    /// Get a single category by its id.
    #[must_use]
    pub fn get_category(&self, category_id: uuid::Uuid) -> Option<&Category> {
        self.ledger.category(category_id)
    }

    /// Get all categories, archived ones included.
    #[must_use]
    pub fn get_categories(&self) -> &[Category] {
        &self.ledger.categories
    }

    // ── Savings Buckets ─────────────────────────────────────────────

    /// Add a savings bucket and return its id.
    pub fn add_bucket(&mut self, name: impl Into<String>, target_amount: f64) -> Result<uuid::Uuid, CoreError> {
        let bucket = SavingsBucket::new(name, target_amount);
        let id = bucket.id;
        self.ledger_service.register_bucket(&mut self.ledger, bucket)?;
        self.dirty = true;
        Ok(id)
    }

    /// Add a savings bucket with a goal date attached.
    pub fn add_bucket_with_deadline(
        &mut self,
        name: impl Into<String>,
        target_amount: f64,
        deadline: chrono::NaiveDate,
    ) -> Result<uuid::Uuid, CoreError> {
        let bucket = SavingsBucket::with_deadline(name, target_amount, deadline);
        let id = bucket.id;
        self.ledger_service.register_bucket(&mut self.ledger, bucket)?;
        self.dirty = true;
        Ok(id)
    }

    /// Change a bucket's target amount.
    pub fn set_bucket_target(&mut self, bucket_id: uuid::Uuid, target_amount: f64) -> Result<(), CoreError> {
        self.ledger_service.set_bucket_target(&mut self.ledger, bucket_id, target_amount)?;
        self.dirty = true;
        Ok(())
    }

    pub fn archive_bucket(&mut self, bucket_id: uuid::Uuid) -> Result<(), CoreError> {
        self.ledger_service.set_bucket_archived(&mut self.ledger, bucket_id, true)?;
        self.dirty = true;
        Ok(())
    }

    pub fn restore_bucket(&mut self, bucket_id: uuid::Uuid) -> Result<(), CoreError> {
        self.ledger_service.set_bucket_archived(&mut self.ledger, bucket_id, false)?;
        self.dirty = true;
        Ok(())
    }

    /// Get a single savings bucket by its id.
    #[must_use]
    pub fn get_bucket(&self, bucket_id: uuid::Uuid) -> Option<&SavingsBucket> {
        self.ledger.bucket(bucket_id)
    }

    /// Get all savings buckets, archived ones included.
    #[must_use]
    pub fn get_buckets(&self) -> &[SavingsBucket] {
        &self.ledger.buckets
    }

    /// Amount saved in one bucket as of an instant.
    pub fn bucket_saved(&self, bucket_id: uuid::Uuid, as_of: DateTime<Utc>) -> Result<f64, CoreError> {
        self.ledger_service.bucket_saved(&self.ledger, bucket_id, as_of)
    }

    /// Amount saved in every bucket as of an instant, keyed by bucket id.
    #[must_use]
    pub fn bucket_savings(&self, as_of: DateTime<Utc>) -> HashMap<uuid::Uuid, f64> {
        self.ledger_service.bucket_savings(&self.ledger, as_of)
    }

    // ── Budgets ─────────────────────────────────────────────────────

    /// Create or update the budget for (category, period) and return
    /// its id. At most one budget exists per pair.
    pub fn set_budget(
        &mut self,
        category_id: uuid::Uuid,
        amount: f64,
        period: Period,
    ) -> Result<uuid::Uuid, CoreError> {
        let id = self.ledger_service.set_budget(&mut self.ledger, category_id, amount, period)?;
        self.dirty = true;
        Ok(id)
    }

    pub fn remove_budget(&mut self, budget_id: uuid::Uuid) -> Result<(), CoreError> {
        self.ledger_service.remove_budget(&mut self.ledger, budget_id)?;
        self.dirty = true;
        Ok(())
    }

    /// Get all budgets.
    #[must_use]
    pub fn get_budgets(&self) -> &[Budget] {
        &self.ledger.budgets
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Record money arriving in a wallet.
    pub fn record_income(
        &mut self,
        wallet_id: uuid::Uuid,
        category_id: uuid::Uuid,
        amount: f64,
        occurred_at: DateTime<Utc>,
    ) -> Result<uuid::Uuid, CoreError> {
        self.add_transaction(Transaction::income(wallet_id, category_id, amount, occurred_at))
    }

    /// Record money leaving a wallet.
    pub fn record_expense(
        &mut self,
        wallet_id: uuid::Uuid,
        category_id: uuid::Uuid,
        amount: f64,
        occurred_at: DateTime<Utc>,
    ) -> Result<uuid::Uuid, CoreError> {
        self.add_transaction(Transaction::expense(wallet_id, category_id, amount, occurred_at))
    }

    /// Record money moving between two wallets of the same currency.
    pub fn record_transfer(
        &mut self,
        from_wallet_id: uuid::Uuid,
        to_wallet_id: uuid::Uuid,
        amount: f64,
        occurred_at: DateTime<Utc>,
    ) -> Result<uuid::Uuid, CoreError> {
        self.add_transaction(Transaction::transfer(from_wallet_id, to_wallet_id, amount, occurred_at))
    }

    /// Record money set aside from a wallet into a savings bucket.
    pub fn record_bucket_deposit(
        &mut self,
        wallet_id: uuid::Uuid,
        bucket_id: uuid::Uuid,
        amount: f64,
        occurred_at: DateTime<Utc>,
    ) -> Result<uuid::Uuid, CoreError> {
        self.add_transaction(Transaction::bucket_deposit(wallet_id, bucket_id, amount, occurred_at))
    }

    /// Record money taken back from a savings bucket into a wallet.
    pub fn record_bucket_withdrawal(
        &mut self,
        wallet_id: uuid::Uuid,
        bucket_id: uuid::Uuid,
        amount: f64,
        occurred_at: DateTime<Utc>,
    ) -> Result<uuid::Uuid, CoreError> {
        self.add_transaction(Transaction::bucket_withdrawal(wallet_id, bucket_id, amount, occurred_at))
    }

    /// Add a pre-built transaction (e.g. one carrying a note).
    /// Validates it before committing.
    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<uuid::Uuid, CoreError> {
        let id = transaction.id;
        self.ledger_service.add_transaction(&mut self.ledger, transaction)?;
        self.dirty = true;
        Ok(id)
    }

    /// Replace a transaction's content, keeping its id.
    /// Validates the new state before committing.
    pub fn update_transaction(&mut self, transaction_id: uuid::Uuid, updated: Transaction) -> Result<(), CoreError> {
        self.ledger_service.update_transaction(&mut self.ledger, transaction_id, updated)?;
        self.dirty = true;
        Ok(())
    }

    /// Remove a transaction by its id.
    /// Validates that removal doesn't leave a bucket overdrawn.
    pub fn remove_transaction(&mut self, transaction_id: uuid::Uuid) -> Result<(), CoreError> {
        self.ledger_service.remove_transaction(&mut self.ledger, transaction_id)?;
        self.dirty = true;
        Ok(())
    }

    /// Set or clear the note on an existing transaction.
    pub fn set_transaction_note(
        &mut self,
        transaction_id: uuid::Uuid,
        note: Option<String>,
    ) -> Result<(), CoreError> {
        self.ledger_service.set_note(&mut self.ledger, transaction_id, note)?;
        self.dirty = true;
        Ok(())
    }

    /// Get a single transaction by its id.
    #[must_use]
    pub fn get_transaction(&self, transaction_id: uuid::Uuid) -> Option<&Transaction> {
        self.ledger.transaction(transaction_id)
    }

    /// Get all transactions, newest first.
    #[must_use]
    pub fn get_transactions(&self) -> Vec<&Transaction> {
        // internal storage is oldest-first; reverse for newest-first
        self.ledger.transactions.iter().rev().collect()
    }

    /// Get transactions inside an inclusive range, newest first.
    pub fn get_transactions_in_range(&self, range: &DateRange) -> Result<Vec<&Transaction>, CoreError> {
        let (from, to) = range.resolve()?;
        let mut transactions = self.ledger_service.transactions_in_range(&self.ledger, from, to);
        transactions.reverse();
        Ok(transactions)
    }

    /// Get transactions of one kind, newest first.
    #[must_use]
    pub fn get_transactions_by_kind(&self, kind: TransactionKind) -> Vec<&Transaction> {
        let mut transactions: Vec<&Transaction> = self
            .ledger
            .transactions
            .iter()
            .filter(|t| t.kind == kind)
            .collect();
        transactions.reverse();
        transactions
    }

    /// Search transactions by matching query against the note and the
    /// names of the referenced wallet and category (case-insensitive).
    #[must_use]
    pub fn search_transactions(&self, query: &str) -> Vec<&Transaction> {
        let q = query.to_lowercase();
        self.ledger
            .transactions
            .iter()
            .filter(|t| {
                t.note.as_deref().unwrap_or("").to_lowercase().contains(&q)
                    || self
                        .ledger
                        .wallet(t.wallet_id)
                        .is_some_and(|w| w.name.to_lowercase().contains(&q))
                    || t.category_id
                        .and_then(|id| self.ledger.category(id))
                        .is_some_and(|c| c.name.to_lowercase().contains(&q))
            })
            .collect()
    }

    /// Get the total number of transactions.
    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.ledger.transactions.len()
    }

    /// When the earliest transaction happened, if any.
    #[must_use]
    pub fn earliest_transaction_at(&self) -> Option<DateTime<Utc>> {
        self.ledger.transactions.first().map(|t| t.occurred_at)
    }

    /// When the most recent transaction happened, if any.
    #[must_use]
    pub fn latest_transaction_at(&self) -> Option<DateTime<Utc>> {
        self.ledger.transactions.last().map(|t| t.occurred_at)
    }

    /// Days since the first transaction (ledger age).
    #[must_use]
    pub fn ledger_age_days(&self) -> Option<i64> {
        self.earliest_transaction_at()
            .map(|at| (Utc::now() - at).num_days())
    }

    // ── Net Worth & Dashboards ──────────────────────────────────────

    /// Everything owned as of an instant: wallet balances plus money
    /// set aside in savings buckets.
    #[must_use]
    pub fn net_worth(&self, as_of: DateTime<Utc>) -> f64 {
        self.ledger_service.net_worth(&self.ledger, as_of)
    }

    /// Full ledger summary over an inclusive range.
    pub fn dashboard_summary(&self, range: &DateRange) -> Result<DashboardSummary, CoreError> {
        self.dashboard_service.summary(&self.ledger, range)
    }

    /// Net cashflow per bucket over a range, zero-filled.
    pub fn cashflow(&self, range: &DateRange, period: Period) -> Result<Vec<TimeSeriesPoint>, CoreError> {
        self.dashboard_service.cashflow(&self.ledger, range, period)
    }

    /// Spending per expense category per bucket over a range.
    pub fn spending_by_category(
        &self,
        range: &DateRange,
        period: Period,
    ) -> Result<Vec<GroupedTimeSeriesPoint>, CoreError> {
        self.dashboard_service.spending_by_category(&self.ledger, range, period)
    }

    /// Standing of every budget for the bucket containing `as_of`.
    pub fn budget_statuses(&self, as_of: DateTime<Utc>) -> Result<Vec<BudgetStatus>, CoreError> {
        self.budget_service.statuses(&self.ledger, as_of)
    }

    /// Per-bucket spending against one budget over a range, zero-filled.
    pub fn budget_spending_history(
        &self,
        budget_id: uuid::Uuid,
        range: &DateRange,
    ) -> Result<Vec<TimeSeriesPoint>, CoreError> {
        self.budget_service.spending_history(&self.ledger, budget_id, range)
    }

    // ── Bulk Operations ─────────────────────────────────────────────

    /// Add multiple transactions at once. All are validated in order;
    /// if any fails, none are added (all-or-nothing).
    /// Returns the ids of all added transactions.
    pub fn add_transactions(&mut self, transactions: Vec<Transaction>) -> Result<Vec<uuid::Uuid>, CoreError> {
        // Phase 1: Validate all transactions against a temporary ledger
        let mut temp_ledger = self.ledger.clone();
        let mut ids = Vec::with_capacity(transactions.len());

        for transaction in &transactions {
            self.ledger_service.add_transaction(&mut temp_ledger, transaction.clone())?;
            ids.push(transaction.id);
        }

        // Phase 2: All valid — apply to the real ledger
        self.ledger = temp_ledger;
        self.dirty = true;
        Ok(ids)
    }

    // ── Dirty State ─────────────────────────────────────────────────

    /// Returns `true` if the ledger has been modified since the last
    /// save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(ledger: Ledger) -> Self {
        Self {
            ledger,
            ledger_service: LedgerService::new(),
            budget_service: BudgetService::new(),
            dashboard_service: DashboardService::new(),
            dirty: false,
        }
    }
}
