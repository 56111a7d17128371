use rust_decimal::Decimal;

use crate::errors::AppError;
use crate::period::Period;
use crate::store::LedgerStore;

use super::models::{MonthlySpendingEntry, SpendingSummary};

/// Read-only spending aggregates over a user's ledger.
pub struct SummaryAggregator;

impl SummaryAggregator {
    /// Per-category totals for one month, ordered by category. Categories without
    /// transactions in the month are absent.
    pub async fn monthly_spending<S: LedgerStore>(
        store: &mut S,
        user_id: i64,
        period: Period,
    ) -> Result<Vec<MonthlySpendingEntry>, AppError> {
        store.monthly_spending(user_id, period).await
    }

    /// All-time spending; zero for an empty ledger.
    pub async fn total_spending<S: LedgerStore>(
        store: &mut S,
        user_id: i64,
    ) -> Result<Decimal, AppError> {
        store.total_spending(user_id).await
    }

    pub async fn summarize<S: LedgerStore>(
        store: &mut S,
        user_id: i64,
        period: Period,
    ) -> Result<SpendingSummary, AppError> {
        let monthly_spending = Self::monthly_spending(store, user_id, period).await?;
        let total_spending = Self::total_spending(store, user_id).await?;

        Ok(SpendingSummary {
            monthly_spending,
            total_spending,
        })
    }
}
