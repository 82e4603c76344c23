use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of money a category labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryFlow {
    /// Money coming in (salary, gifts, interest)
    Income,
    /// Money going out (groceries, rent, transport)
    Expense,
}

impl std::fmt::Display for CategoryFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryFlow::Income => write!(f, "Income"),
            CategoryFlow::Expense => write!(f, "Expense"),
        }
    }
}

/// A label for income or expense transactions.
///
/// A category belongs to exactly one flow direction; "Salary" cannot
/// label an expense. Budgets attach to expense categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: Uuid,

    /// Display name (e.g., "Groceries", "Salary")
    pub name: String,

    /// Whether this labels income or expenses
    pub flow: CategoryFlow,

    /// Archived categories refuse new transactions but keep history
    #[serde(default)]
    pub archived: bool,
}

impl Category {
    pub fn new(name: impl Into<String>, flow: CategoryFlow) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            flow,
            archived: false,
        }
    }

    /// Convenience constructors for the two flows
    pub fn income(name: impl Into<String>) -> Self {
        Self::new(name, CategoryFlow::Income)
    }

    pub fn expense(name: impl Into<String>) -> Self {
        Self::new(name, CategoryFlow::Expense)
    }
}
