//! Storage seams for the ledger and budget tables.
//!
//! Components never reach for a global connection: callers pass an explicit
//! handle (a pooled connection or an open database transaction) into each
//! operation. Every method is scoped by the owning user id.

use rust_decimal::Decimal;

use crate::errors::AppError;
use crate::period::Period;
use crate::summary::MonthlySpendingEntry;
use crate::transaction::models::{NewTransaction, Transaction};

#[cfg(test)]
pub mod memory;
mod postgres;

#[allow(async_fn_in_trait)]
pub trait LedgerStore {
    async fn insert_transaction(
        &mut self,
        user_id: i64,
        new: &NewTransaction,
    ) -> Result<Transaction, AppError>;

    /// All of a user's transactions, newest first.
    async fn list_transactions(&mut self, user_id: i64) -> Result<Vec<Transaction>, AppError>;

    async fn find_transaction(
        &mut self,
        user_id: i64,
        transaction_id: i64,
    ) -> Result<Option<Transaction>, AppError>;

    /// Like [`find_transaction`](Self::find_transaction), but the row stays locked
    /// until the surrounding database transaction ends.
    async fn lock_transaction(
        &mut self,
        user_id: i64,
        transaction_id: i64,
    ) -> Result<Option<Transaction>, AppError>;

    async fn update_transaction(
        &mut self,
        user_id: i64,
        transaction_id: i64,
        new: &NewTransaction,
    ) -> Result<Option<Transaction>, AppError>;

    /// Delete and return the removed row.
    async fn delete_transaction(
        &mut self,
        user_id: i64,
        transaction_id: i64,
    ) -> Result<Option<Transaction>, AppError>;

    async fn monthly_spending(
        &mut self,
        user_id: i64,
        period: Period,
    ) -> Result<Vec<MonthlySpendingEntry>, AppError>;

    async fn total_spending(&mut self, user_id: i64) -> Result<Decimal, AppError>;
}

#[allow(async_fn_in_trait)]
pub trait BudgetStore {
    /// Find the budget for (user, category, period) and hold a write lock on it
    /// for the rest of the surrounding database transaction.
    async fn lock_budget(
        &mut self,
        user_id: i64,
        category: &str,
        period: Period,
    ) -> Result<Option<i64>, AppError>;

    async fn set_actual_amount(&mut self, budget_id: i64, actual: Decimal)
        -> Result<(), AppError>;
}
