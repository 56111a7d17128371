use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::period::Period;
use crate::store::{BudgetStore, LedgerStore};
use crate::summary::SummaryAggregator;

/// Keeps `budgets.actual_amount` equal to the ledger sum for its
/// user/category/month.
pub struct ReconciliationEngine;

impl ReconciliationEngine {
    /// Recompute the actual spend for the budget matching `(user_id, category,
    /// month of date)` and write it. Returns the written amount, or `None` when
    /// no such budget exists (nothing is written then).
    ///
    /// The budget row is locked before the aggregate is read, so when `store` is
    /// an open database transaction concurrent writers for the same budget are
    /// serialized and the last one sees every committed contribution.
    pub async fn reconcile<S>(
        store: &mut S,
        user_id: i64,
        category: &str,
        date: NaiveDate,
    ) -> Result<Option<Decimal>, AppError>
    where
        S: LedgerStore + BudgetStore,
    {
        let period = Period::of(date)?;

        let Some(budget_id) = store.lock_budget(user_id, category, period).await? else {
            debug!(
                user_id,
                category,
                month = period.month,
                year = period.year,
                "No budget to reconcile"
            );
            return Ok(None);
        };

        let actual = SummaryAggregator::monthly_spending(store, user_id, period)
            .await?
            .into_iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.total)
            .unwrap_or(Decimal::ZERO);

        store.set_actual_amount(budget_id, actual).await?;

        info!(
            user_id,
            budget_id,
            category,
            month = period.month,
            year = period.year,
            %actual,
            "Budget reconciled"
        );

        Ok(Some(actual))
    }

    /// Reconcile each distinct category/month in `touched` once.
    ///
    /// Budgets are locked in (category, year, month) order so that concurrent
    /// edits touching the same pair of budgets cannot deadlock.
    pub async fn reconcile_all<S>(
        store: &mut S,
        user_id: i64,
        touched: &[(&str, NaiveDate)],
    ) -> Result<(), AppError>
    where
        S: LedgerStore + BudgetStore,
    {
        let mut seen: Vec<(&str, Period, NaiveDate)> = Vec::with_capacity(touched.len());

        for &(category, date) in touched {
            let period = Period::of(date)?;
            if !seen.iter().any(|&(c, p, _)| c == category && p == period) {
                seen.push((category, period, date));
            }
        }
        seen.sort_by_key(|&(category, period, _)| (category, period.year, period.month));

        for (category, _, date) in seen {
            Self::reconcile(store, user_id, category, date).await?;
        }

        Ok(())
    }
}
