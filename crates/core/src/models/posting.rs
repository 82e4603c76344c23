use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The account a posting touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Account {
    /// A wallet's balance
    Wallet(Uuid),
    /// An income or expense category total
    Category(Uuid),
    /// A savings bucket's saved amount
    Bucket(Uuid),
}

/// One signed leg of a transaction, double-entry style.
///
/// Positive amounts flow into the account, negative amounts out of it.
/// The postings of a validated transaction always sum to zero, which is
/// what makes balances pure folds over transaction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub account: Account,
    pub amount: f64,
}

impl Posting {
    pub fn new(account: Account, amount: f64) -> Self {
        Self { account, amount }
    }
}
