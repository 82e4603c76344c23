use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::posting::{Account, Posting};

/// What a transaction does with money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money arriving in a wallet, labelled by an income category
    Income,
    /// Money leaving a wallet, labelled by an expense category
    Expense,
    /// Money moving between two wallets
    Transfer,
    /// Money set aside from a wallet into a savings bucket
    BucketDeposit,
    /// Money taken back from a savings bucket into a wallet
    BucketWithdrawal,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "Income"),
            TransactionKind::Expense => write!(f, "Expense"),
            TransactionKind::Transfer => write!(f, "Transfer"),
            TransactionKind::BucketDeposit => write!(f, "Bucket deposit"),
            TransactionKind::BucketWithdrawal => write!(f, "Bucket withdrawal"),
        }
    }
}

/// A single money movement in the ledger.
///
/// `amount` is always positive; the kind decides direction. Which of
/// the optional references must be set also depends on the kind:
/// income/expense need `category_id`, transfers need
/// `counter_wallet_id`, bucket deposits/withdrawals need `bucket_id`.
/// Validation enforces that shape before a transaction enters the
/// ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: Uuid,

    /// What this transaction does
    pub kind: TransactionKind,

    /// When the money moved (UTC)
    pub occurred_at: DateTime<Utc>,

    /// Amount moved (always positive)
    pub amount: f64,

    /// The wallet money leaves or arrives in
    pub wallet_id: Uuid,

    /// Income/expense label; set only for those kinds
    #[serde(default)]
    pub category_id: Option<Uuid>,

    /// Receiving wallet of a transfer
    #[serde(default)]
    pub counter_wallet_id: Option<Uuid>,

    /// Savings bucket of a deposit/withdrawal
    #[serde(default)]
    pub bucket_id: Option<Uuid>,

    /// Optional free-text note (merchant, reason, memo)
    #[serde(default)]
    pub note: Option<String>,
}

impl Transaction {
    pub fn income(wallet_id: Uuid, category_id: Uuid, amount: f64, occurred_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: TransactionKind::Income,
            occurred_at,
            amount,
            wallet_id,
            category_id: Some(category_id),
            counter_wallet_id: None,
            bucket_id: None,
            note: None,
        }
    }

    pub fn expense(wallet_id: Uuid, category_id: Uuid, amount: f64, occurred_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: TransactionKind::Expense,
            occurred_at,
            amount,
            wallet_id,
            category_id: Some(category_id),
            counter_wallet_id: None,
            bucket_id: None,
            note: None,
        }
    }

    pub fn transfer(wallet_id: Uuid, counter_wallet_id: Uuid, amount: f64, occurred_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: TransactionKind::Transfer,
            occurred_at,
            amount,
            wallet_id,
            category_id: None,
            counter_wallet_id: Some(counter_wallet_id),
            bucket_id: None,
            note: None,
        }
    }

    pub fn bucket_deposit(wallet_id: Uuid, bucket_id: Uuid, amount: f64, occurred_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: TransactionKind::BucketDeposit,
            occurred_at,
            amount,
            wallet_id,
            category_id: None,
            counter_wallet_id: None,
            bucket_id: Some(bucket_id),
            note: None,
        }
    }

    pub fn bucket_withdrawal(wallet_id: Uuid, bucket_id: Uuid, amount: f64, occurred_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: TransactionKind::BucketWithdrawal,
            occurred_at,
            amount,
            wallet_id,
            category_id: None,
            counter_wallet_id: None,
            bucket_id: Some(bucket_id),
            note: None,
        }
    }

    /// Attach a note, builder style.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// The double-entry legs of this transaction.
    ///
    /// For any transaction that passed validation the legs sum to zero:
    /// income credits the wallet against its category, expenses debit
    /// it, transfers and bucket moves shift money between containers.
    pub fn postings(&self) -> Vec<Posting> {
        match self.kind {
            TransactionKind::Income => {
                let mut legs = vec![Posting::new(Account::Wallet(self.wallet_id), self.amount)];
                if let Some(category_id) = self.category_id {
                    legs.push(Posting::new(Account::Category(category_id), -self.amount));
                }
                legs
            }
            TransactionKind::Expense => {
                let mut legs = vec![Posting::new(Account::Wallet(self.wallet_id), -self.amount)];
                if let Some(category_id) = self.category_id {
                    legs.push(Posting::new(Account::Category(category_id), self.amount));
                }
                legs
            }
            TransactionKind::Transfer => {
                let mut legs = vec![Posting::new(Account::Wallet(self.wallet_id), -self.amount)];
                if let Some(counter_id) = self.counter_wallet_id {
                    legs.push(Posting::new(Account::Wallet(counter_id), self.amount));
                }
                legs
            }
            TransactionKind::BucketDeposit => {
                let mut legs = vec![Posting::new(Account::Wallet(self.wallet_id), -self.amount)];
                if let Some(bucket_id) = self.bucket_id {
                    legs.push(Posting::new(Account::Bucket(bucket_id), self.amount));
                }
                legs
            }
            TransactionKind::BucketWithdrawal => {
                let mut legs = vec![Posting::new(Account::Wallet(self.wallet_id), self.amount)];
                if let Some(bucket_id) = self.bucket_id {
                    legs.push(Posting::new(Account::Bucket(bucket_id), -self.amount));
                }
                legs
            }
        }
    }
}
