use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::budget::Budget;
use super::category::Category;
use super::savings_bucket::SavingsBucket;
use super::transaction::Transaction;
use super::wallet::Wallet;

/// The main data container. Everything in here gets serialized into the
/// portable JSON snapshot.
///
/// Transactions are kept sorted by `occurred_at` ascending; the ledger
/// service maintains that order on every insert. All balances and
/// summaries are derived from this container, nothing is cached.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    /// All wallets, including archived ones
    pub wallets: Vec<Wallet>,

    /// All income and expense categories
    pub categories: Vec<Category>,

    /// All savings buckets
    #[serde(default)]
    pub buckets: Vec<SavingsBucket>,

    /// All budgets
    #[serde(default)]
    pub budgets: Vec<Budget>,

    /// All transactions, sorted by date ascending
    pub transactions: Vec<Transaction>,
}

impl Ledger {
    // Lookup helpers. Return None rather than erroring so callers
    // decide which missing-id error fits their operation.

    pub fn wallet(&self, id: Uuid) -> Option<&Wallet> {
        self.wallets.iter().find(|w| w.id == id)
    }

    pub fn wallet_mut(&mut self, id: Uuid) -> Option<&mut Wallet> {
        self.wallets.iter_mut().find(|w| w.id == id)
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn category_mut(&mut self, id: Uuid) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.id == id)
    }

    pub fn bucket(&self, id: Uuid) -> Option<&SavingsBucket> {
        self.buckets.iter().find(|b| b.id == id)
    }

    pub fn bucket_mut(&mut self, id: Uuid) -> Option<&mut SavingsBucket> {
        self.buckets.iter_mut().find(|b| b.id == id)
    }

    pub fn budget(&self, id: Uuid) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.id == id)
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }
}
