pub mod models;
pub mod service;

pub use models::{MonthlySpendingEntry, SpendingSummary, SummaryQuery};
pub use service::SummaryAggregator;
