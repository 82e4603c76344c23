pub mod budget;
pub mod category;
pub mod ledger;
pub mod posting;
pub mod savings_bucket;
pub mod transaction;
pub mod wallet;

// Derived read models for dashboards
pub mod dashboard;
