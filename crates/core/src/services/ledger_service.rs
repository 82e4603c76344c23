use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::budget::Budget;
use crate::models::category::{Category, CategoryFlow};
use crate::models::ledger::Ledger;
use crate::models::posting::Account;
use crate::models::savings_bucket::SavingsBucket;
use crate::models::transaction::{Transaction, TransactionKind};
use crate::models::wallet::Wallet;
use crate::timeseries::Period;

/// Manages the ledger's entities and transactions and derives balances.
///
/// Pure business logic — no I/O. Easy to test.
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    // ── Wallets ─────────────────────────────────────────────────────

    /// Add a new wallet. Names are trimmed and must be unique across
    /// all wallets (case-insensitive); currency must be a 3-letter code.
    pub fn register_wallet(&self, ledger: &mut Ledger, mut wallet: Wallet) -> Result<(), CoreError> {
        wallet.name = Self::validated_name(&wallet.name, "Wallet")?;
        Self::validate_currency_code(&wallet.currency)?;
        if ledger
            .wallets
            .iter()
            .any(|w| w.name.eq_ignore_ascii_case(&wallet.name))
        {
            return Err(CoreError::ValidationError(format!(
                "A wallet named '{}' already exists",
                wallet.name
            )));
        }
        ledger.wallets.push(wallet);
        Ok(())
    }

    pub fn rename_wallet(&self, ledger: &mut Ledger, wallet_id: Uuid, name: &str) -> Result<(), CoreError> {
        let name = Self::validated_name(name, "Wallet")?;
        if ledger
            .wallets
            .iter()
            .any(|w| w.id != wallet_id && w.name.eq_ignore_ascii_case(&name))
        {
            return Err(CoreError::ValidationError(format!(
                "A wallet named '{name}' already exists"
            )));
        }
        let wallet = ledger
            .wallet_mut(wallet_id)
            .ok_or_else(|| CoreError::WalletNotFound(wallet_id.to_string()))?;
        wallet.name = name;
        Ok(())
    }

    /// Archive or restore a wallet. Archived wallets refuse new
    /// transactions; existing history is untouched.
    pub fn set_wallet_archived(&self, ledger: &mut Ledger, wallet_id: Uuid, archived: bool) -> Result<(), CoreError> {
        let wallet = ledger
            .wallet_mut(wallet_id)
            .ok_or_else(|| CoreError::WalletNotFound(wallet_id.to_string()))?;
        wallet.archived = archived;
        Ok(())
    }

    // ── Categories ──────────────────────────────────────────────────

    /// Add a new category. Names are trimmed and must be unique within
    /// the same flow direction (case-insensitive).
    pub fn register_category(&self, ledger: &mut Ledger, mut category: Category) -> Result<(), CoreError> {
        category.name = Self::validated_name(&category.name, "Category")?;
        if ledger
            .categories
            .iter()
            .any(|c| c.flow == category.flow && c.name.eq_ignore_ascii_case(&category.name))
        {
            return Err(CoreError::ValidationError(format!(
                "A {} category named '{}' already exists",
                category.flow, category.name
            )));
        }
        ledger.categories.push(category);
        Ok(())
    }

    pub fn rename_category(&self, ledger: &mut Ledger, category_id: Uuid, name: &str) -> Result<(), CoreError> {
        let name = Self::validated_name(name, "Category")?;
        let flow = ledger
            .category(category_id)
            .ok_or_else(|| CoreError::CategoryNotFound(category_id.to_string()))?
            .flow;
        if ledger
            .categories
            .iter()
            .any(|c| c.id != category_id && c.flow == flow && c.name.eq_ignore_ascii_case(&name))
        {
            return Err(CoreError::ValidationError(format!(
                "A {flow} category named '{name}' already exists"
            )));
        }
        let category = ledger
            .category_mut(category_id)
            .ok_or_else(|| CoreError::CategoryNotFound(category_id.to_string()))?;
        category.name = name;
        Ok(())
    }

    pub fn set_category_archived(&self, ledger: &mut Ledger, category_id: Uuid, archived: bool) -> Result<(), CoreError> {
        let category = ledger
            .category_mut(category_id)
            .ok_or_else(|| CoreError::CategoryNotFound(category_id.to_string()))?;
        category.archived = archived;
        Ok(())
    }

    // ── Savings buckets ─────────────────────────────────────────────

    /// Add a new savings bucket. Names are trimmed and must be unique
    /// (case-insensitive); the target must be positive.
    pub fn register_bucket(&self, ledger: &mut Ledger, mut bucket: SavingsBucket) -> Result<(), CoreError> {
        bucket.name = Self::validated_name(&bucket.name, "Savings bucket")?;
        if !bucket.target_amount.is_finite() || bucket.target_amount <= 0.0 {
            return Err(CoreError::ValidationError(
                "Savings bucket target must be positive".into(),
            ));
        }
        if ledger
            .buckets
            .iter()
            .any(|b| b.name.eq_ignore_ascii_case(&bucket.name))
        {
            return Err(CoreError::ValidationError(format!(
                "A savings bucket named '{}' already exists",
                bucket.name
            )));
        }
        ledger.buckets.push(bucket);
        Ok(())
    }

    pub fn set_bucket_target(&self, ledger: &mut Ledger, bucket_id: Uuid, target_amount: f64) -> Result<(), CoreError> {
        if !target_amount.is_finite() || target_amount <= 0.0 {
            return Err(CoreError::ValidationError(
                "Savings bucket target must be positive".into(),
            ));
        }
        let bucket = ledger
            .bucket_mut(bucket_id)
            .ok_or_else(|| CoreError::BucketNotFound(bucket_id.to_string()))?;
        bucket.target_amount = target_amount;
        Ok(())
    }

    pub fn set_bucket_archived(&self, ledger: &mut Ledger, bucket_id: Uuid, archived: bool) -> Result<(), CoreError> {
        let bucket = ledger
            .bucket_mut(bucket_id)
            .ok_or_else(|| CoreError::BucketNotFound(bucket_id.to_string()))?;
        bucket.archived = archived;
        Ok(())
    }

    // ── Budgets ─────────────────────────────────────────────────────

    /// Create or update the budget for (category, period); at most one
    /// exists per pair. Returns the budget's id.
    pub fn set_budget(&self, ledger: &mut Ledger, category_id: Uuid, amount: f64, period: Period) -> Result<Uuid, CoreError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::ValidationError("Budget amount must be positive".into()));
        }
        let category = ledger
            .category(category_id)
            .ok_or_else(|| CoreError::CategoryNotFound(category_id.to_string()))?;
        if category.flow != CategoryFlow::Expense {
            return Err(CoreError::ValidationError(format!(
                "Budgets apply to expense categories; '{}' labels income",
                category.name
            )));
        }
        if category.archived {
            return Err(CoreError::ValidationError(format!(
                "Category '{}' is archived",
                category.name
            )));
        }

        if let Some(existing) = ledger
            .budgets
            .iter_mut()
            .find(|b| b.category_id == category_id && b.period == period)
        {
            existing.amount = amount;
            return Ok(existing.id);
        }

        let budget = Budget::new(category_id, amount, period);
        let budget_id = budget.id;
        ledger.budgets.push(budget);
        Ok(budget_id)
    }

    pub fn remove_budget(&self, ledger: &mut Ledger, budget_id: Uuid) -> Result<(), CoreError> {
        let idx = ledger
            .budgets
            .iter()
            .position(|b| b.id == budget_id)
            .ok_or_else(|| CoreError::BudgetNotFound(budget_id.to_string()))?;
        ledger.budgets.remove(idx);
        Ok(())
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Add a new transaction to the ledger.
    /// Validates it first (e.g., can't withdraw more than a bucket holds).
    pub fn add_transaction(&self, ledger: &mut Ledger, transaction: Transaction) -> Result<(), CoreError> {
        self.validate_transaction(ledger, &transaction)?;
        Self::binary_insert(&mut ledger.transactions, transaction);
        Ok(())
    }

    /// Remove a transaction by its UUID.
    /// Revalidates later bucket withdrawals so none would overdraw.
    pub fn remove_transaction(&self, ledger: &mut Ledger, transaction_id: Uuid) -> Result<(), CoreError> {
        let idx = ledger
            .transactions
            .iter()
            .position(|t| t.id == transaction_id)
            .ok_or_else(|| CoreError::TransactionNotFound(transaction_id.to_string()))?;

        let removed = ledger.transactions.remove(idx);

        // Only deposits fund later withdrawals, so only their removal
        // can break bucket consistency.
        if removed.kind == TransactionKind::BucketDeposit {
            if let Err(e) = self.validate_bucket_consistency(ledger, removed.occurred_at) {
                // Rollback: re-insert at correct position
                Self::binary_insert(&mut ledger.transactions, removed);
                return Err(e);
            }
        }

        Ok(())
    }

    /// Replace a transaction's content, keeping its id. Validates the
    /// new state before committing and rolls back when it would leave
    /// the ledger inconsistent.
    pub fn update_transaction(&self, ledger: &mut Ledger, transaction_id: Uuid, updated: Transaction) -> Result<(), CoreError> {
        let idx = ledger
            .transactions
            .iter()
            .position(|t| t.id == transaction_id)
            .ok_or_else(|| CoreError::TransactionNotFound(transaction_id.to_string()))?;

        // Take the old transaction out, pin the id, validate, then commit
        let old = ledger.transactions.remove(idx);
        let updated = Transaction {
            id: old.id,
            ..updated
        };

        if let Err(e) = self.validate_transaction(ledger, &updated) {
            // Rollback: put the old transaction back
            Self::binary_insert(&mut ledger.transactions, old);
            return Err(e);
        }

        let check_from = updated.occurred_at.min(old.occurred_at);
        Self::binary_insert(&mut ledger.transactions, updated);

        if let Err(e) = self.validate_bucket_consistency(ledger, check_from) {
            // Rollback: swap back to the old transaction
            if let Some(new_idx) = ledger.transactions.iter().position(|t| t.id == old.id) {
                ledger.transactions.remove(new_idx);
            }
            Self::binary_insert(&mut ledger.transactions, old);
            return Err(e);
        }

        Ok(())
    }

    /// Set or clear the note on an existing transaction.
    pub fn set_note(&self, ledger: &mut Ledger, transaction_id: Uuid, note: Option<String>) -> Result<(), CoreError> {
        let transaction = ledger
            .transactions
            .iter_mut()
            .find(|t| t.id == transaction_id)
            .ok_or_else(|| CoreError::TransactionNotFound(transaction_id.to_string()))?;
        transaction.note = note;
        Ok(())
    }

    /// All transactions inside the inclusive instant range, oldest first.
    pub fn transactions_in_range<'a>(
        &self,
        ledger: &'a Ledger,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Vec<&'a Transaction> {
        ledger
            .transactions
            .iter()
            .filter(|t| t.occurred_at >= from && t.occurred_at <= to)
            .collect()
    }

    // ── Derived balances ────────────────────────────────────────────

    /// Balance of every wallet as of `as_of`, including wallets with no
    /// transactions (balance 0).
    ///
    /// Folds the wallet legs of all postings up to the instant.
    pub fn wallet_balances(&self, ledger: &Ledger, as_of: DateTime<Utc>) -> HashMap<Uuid, f64> {
        let mut balances: HashMap<Uuid, f64> = ledger.wallets.iter().map(|w| (w.id, 0.0)).collect();

        for transaction in &ledger.transactions {
            if transaction.occurred_at > as_of {
                continue; // skip future transactions
            }
            for posting in transaction.postings() {
                if let Account::Wallet(id) = posting.account {
                    *balances.entry(id).or_insert(0.0) += posting.amount;
                }
            }
        }
        balances
    }

    /// Saved amount of every savings bucket as of `as_of`.
    pub fn bucket_savings(&self, ledger: &Ledger, as_of: DateTime<Utc>) -> HashMap<Uuid, f64> {
        let mut savings: HashMap<Uuid, f64> = ledger.buckets.iter().map(|b| (b.id, 0.0)).collect();

        for transaction in &ledger.transactions {
            if transaction.occurred_at > as_of {
                continue; // skip future transactions
            }
            for posting in transaction.postings() {
                if let Account::Bucket(id) = posting.account {
                    *savings.entry(id).or_insert(0.0) += posting.amount;
                }
            }
        }
        savings
    }

    /// Balance of one wallet as of `as_of`.
    pub fn wallet_balance(&self, ledger: &Ledger, wallet_id: Uuid, as_of: DateTime<Utc>) -> Result<f64, CoreError> {
        if ledger.wallet(wallet_id).is_none() {
            return Err(CoreError::WalletNotFound(wallet_id.to_string()));
        }
        Ok(self
            .wallet_balances(ledger, as_of)
            .get(&wallet_id)
            .copied()
            .unwrap_or(0.0))
    }

    /// Saved amount of one savings bucket as of `as_of`.
    pub fn bucket_saved(&self, ledger: &Ledger, bucket_id: Uuid, as_of: DateTime<Utc>) -> Result<f64, CoreError> {
        if ledger.bucket(bucket_id).is_none() {
            return Err(CoreError::BucketNotFound(bucket_id.to_string()));
        }
        Ok(self
            .bucket_savings(ledger, as_of)
            .get(&bucket_id)
            .copied()
            .unwrap_or(0.0))
    }

    /// Everything owned as of `as_of`: wallet balances plus money set
    /// aside in savings buckets.
    pub fn net_worth(&self, ledger: &Ledger, as_of: DateTime<Utc>) -> f64 {
        let wallets: f64 = self.wallet_balances(ledger, as_of).values().sum();
        let buckets: f64 = self.bucket_savings(ledger, as_of).values().sum();
        wallets + buckets
    }

    // ── Validation ──────────────────────────────────────────────────

    /// Validate a transaction before adding it to the ledger.
    ///
    /// Rules:
    /// - Amount must be positive and finite
    /// - Referenced entities must exist and not be archived
    /// - The reference shape must match the kind (income/expense carry
    ///   a category, transfers a counter wallet, bucket moves a bucket)
    /// - A bucket withdrawal can't exceed what is saved at that date
    fn validate_transaction(&self, ledger: &Ledger, transaction: &Transaction) -> Result<(), CoreError> {
        if !transaction.amount.is_finite() || transaction.amount <= 0.0 {
            return Err(CoreError::ValidationError(
                "Transaction amount must be positive".into(),
            ));
        }

        let wallet = ledger
            .wallet(transaction.wallet_id)
            .ok_or_else(|| CoreError::WalletNotFound(transaction.wallet_id.to_string()))?;
        if wallet.archived {
            return Err(CoreError::ValidationError(format!(
                "Wallet '{}' is archived",
                wallet.name
            )));
        }

        match transaction.kind {
            TransactionKind::Income | TransactionKind::Expense => {
                if transaction.counter_wallet_id.is_some() || transaction.bucket_id.is_some() {
                    return Err(CoreError::ValidationError(format!(
                        "{} transactions reference only a wallet and a category",
                        transaction.kind
                    )));
                }
                let category_id = transaction.category_id.ok_or_else(|| {
                    CoreError::ValidationError(format!(
                        "{} transactions need a category",
                        transaction.kind
                    ))
                })?;
                let category = ledger
                    .category(category_id)
                    .ok_or_else(|| CoreError::CategoryNotFound(category_id.to_string()))?;
                if category.archived {
                    return Err(CoreError::ValidationError(format!(
                        "Category '{}' is archived",
                        category.name
                    )));
                }
                let expected = match transaction.kind {
                    TransactionKind::Income => CategoryFlow::Income,
                    _ => CategoryFlow::Expense,
                };
                if category.flow != expected {
                    return Err(CoreError::ValidationError(format!(
                        "Category '{}' labels {} and cannot label a {} transaction",
                        category.name, category.flow, transaction.kind
                    )));
                }
            }
            TransactionKind::Transfer => {
                if transaction.category_id.is_some() || transaction.bucket_id.is_some() {
                    return Err(CoreError::ValidationError(
                        "Transfer transactions reference only two wallets".into(),
                    ));
                }
                let counter_id = transaction.counter_wallet_id.ok_or_else(|| {
                    CoreError::ValidationError("Transfer transactions need a receiving wallet".into())
                })?;
                if counter_id == transaction.wallet_id {
                    return Err(CoreError::ValidationError(
                        "Cannot transfer from a wallet to itself".into(),
                    ));
                }
                let counter = ledger
                    .wallet(counter_id)
                    .ok_or_else(|| CoreError::WalletNotFound(counter_id.to_string()))?;
                if counter.archived {
                    return Err(CoreError::ValidationError(format!(
                        "Wallet '{}' is archived",
                        counter.name
                    )));
                }
                if counter.currency != wallet.currency {
                    return Err(CoreError::ValidationError(format!(
                        "Cannot transfer between {} and {} wallets without a conversion",
                        wallet.currency, counter.currency
                    )));
                }
            }
            TransactionKind::BucketDeposit | TransactionKind::BucketWithdrawal => {
                if transaction.category_id.is_some() || transaction.counter_wallet_id.is_some() {
                    return Err(CoreError::ValidationError(
                        "Bucket transactions reference only a wallet and a savings bucket".into(),
                    ));
                }
                let bucket_id = transaction.bucket_id.ok_or_else(|| {
                    CoreError::ValidationError(format!(
                        "{} transactions need a savings bucket",
                        transaction.kind
                    ))
                })?;
                let bucket = ledger
                    .bucket(bucket_id)
                    .ok_or_else(|| CoreError::BucketNotFound(bucket_id.to_string()))?;
                if bucket.archived {
                    return Err(CoreError::ValidationError(format!(
                        "Savings bucket '{}' is archived",
                        bucket.name
                    )));
                }

                // For withdrawals, check the bucket holds enough at that date
                if transaction.kind == TransactionKind::BucketWithdrawal {
                    let saved = self
                        .bucket_savings(ledger, transaction.occurred_at)
                        .get(&bucket_id)
                        .copied()
                        .unwrap_or(0.0);
                    if saved < transaction.amount {
                        return Err(CoreError::ValidationError(format!(
                            "Cannot withdraw {} from '{}' — only {:.2} is saved on {}",
                            transaction.amount,
                            bucket.name,
                            saved,
                            transaction.occurred_at.date_naive()
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Validate that no bucket withdrawal from `from` onwards would
    /// overdraw its bucket. Used after transaction removal or update.
    fn validate_bucket_consistency(&self, ledger: &Ledger, from: DateTime<Utc>) -> Result<(), CoreError> {
        // Replay bucket postings in date order, checking withdrawals
        let mut savings: HashMap<Uuid, f64> = HashMap::new();

        for transaction in &ledger.transactions {
            let bucket_id = match transaction.bucket_id {
                Some(id) => id,
                None => continue,
            };
            let saved = savings.entry(bucket_id).or_insert(0.0);
            match transaction.kind {
                TransactionKind::BucketDeposit => *saved += transaction.amount,
                TransactionKind::BucketWithdrawal => {
                    if transaction.occurred_at >= from && *saved < transaction.amount {
                        let name = ledger
                            .bucket(bucket_id)
                            .map(|b| b.name.clone())
                            .unwrap_or_else(|| bucket_id.to_string());
                        return Err(CoreError::ValidationError(format!(
                            "Removing/updating this transaction would make the withdrawal of {} \
                             from '{}' on {} invalid (only {:.2} would be saved)",
                            transaction.amount,
                            name,
                            transaction.occurred_at.date_naive(),
                            *saved,
                        )));
                    }
                    *saved -= transaction.amount;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Trimmed, non-empty entity name.
    fn validated_name(name: &str, what: &str) -> Result<String, CoreError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CoreError::ValidationError(format!(
                "{what} name cannot be empty"
            )));
        }
        Ok(trimmed.to_string())
    }

    /// Currency codes are 3 ASCII letters (ISO 4217), e.g. "IDR", "USD".
    fn validate_currency_code(code: &str) -> Result<(), CoreError> {
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::ValidationError(format!(
                "Invalid currency code '{code}': expected 3 letters like 'USD'"
            )));
        }
        Ok(())
    }

    /// Binary insert into a date-sorted Vec<Transaction> in O(log n).
    fn binary_insert(transactions: &mut Vec<Transaction>, transaction: Transaction) {
        let pos = transactions
            .binary_search_by_key(&transaction.occurred_at, |t| t.occurred_at)
            .unwrap_or_else(|pos| pos);
        transactions.insert(pos, transaction);
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}
