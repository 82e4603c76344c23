pub mod budget_service;
pub mod dashboard_service;
pub mod ledger_service;
