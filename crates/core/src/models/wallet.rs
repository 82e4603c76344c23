use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of place money sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalletKind {
    /// Physical cash
    Cash,
    /// Bank account
    Bank,
    /// E-wallet / mobile money balance
    EWallet,
    /// Anything else (prepaid cards, vouchers, ...)
    Other,
}

impl std::fmt::Display for WalletKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalletKind::Cash => write!(f, "Cash"),
            WalletKind::Bank => write!(f, "Bank"),
            WalletKind::EWallet => write!(f, "E-Wallet"),
            WalletKind::Other => write!(f, "Other"),
        }
    }
}

/// A container money flows in and out of.
///
/// Wallets are never deleted once they carry transactions; archiving
/// hides them from new activity while keeping history intact. The
/// balance is not stored, it is derived from transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    /// Unique identifier
    pub id: Uuid,

    /// Display name (e.g., "BCA Checking", "Cash in drawer")
    pub name: String,

    /// ISO 4217 currency code, uppercased (e.g., "IDR", "USD")
    pub currency: String,

    /// What kind of container this is
    pub kind: WalletKind,

    /// Archived wallets refuse new transactions but keep their history
    #[serde(default)]
    pub archived: bool,
}

impl Wallet {
    pub fn new(name: impl Into<String>, currency: impl Into<String>, kind: WalletKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            currency: currency.into().to_uppercase(),
            kind,
            archived: false,
        }
    }

    /// Convenience constructors for common wallet kinds
    pub fn cash(name: impl Into<String>, currency: impl Into<String>) -> Self {
        Self::new(name, currency, WalletKind::Cash)
    }

    pub fn bank(name: impl Into<String>, currency: impl Into<String>) -> Self {
        Self::new(name, currency, WalletKind::Bank)
    }

    pub fn e_wallet(name: impl Into<String>, currency: impl Into<String>) -> Self {
        Self::new(name, currency, WalletKind::EWallet)
    }
}
