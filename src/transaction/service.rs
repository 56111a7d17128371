use sqlx::PgPool;
use tracing::{debug, info};

use super::models::{NewTransaction, Transaction};
use crate::errors::AppError;
use crate::period::Period;
use crate::reconciliation::{EditPolicy, ReconciliationEngine};
use crate::store::{BudgetStore, LedgerStore};
use crate::summary::{SpendingSummary, SummaryAggregator};

/// Service layer for ledger writes and reads.
/// Every write runs inside one database transaction together with the budget
/// reconciliation it triggers; a failed reconciliation rolls the write back.
pub struct TransactionService;

impl TransactionService {
    /// Insert a transaction and reconcile the matching budget atomically.
    pub async fn create_transaction(
        pool: &PgPool,
        user_id: i64,
        new: NewTransaction,
    ) -> Result<Transaction, AppError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let transaction = Self::record(&mut *tx, user_id, &new).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        Ok(transaction)
    }

    /// Replace a transaction's fields. Budgets are reconciled only under
    /// [`EditPolicy::Reconcile`].
    pub async fn update_transaction(
        pool: &PgPool,
        user_id: i64,
        transaction_id: i64,
        new: NewTransaction,
        policy: EditPolicy,
    ) -> Result<Transaction, AppError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let transaction = Self::amend(&mut *tx, user_id, transaction_id, &new, policy).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        Ok(transaction)
    }

    pub async fn delete_transaction(
        pool: &PgPool,
        user_id: i64,
        transaction_id: i64,
        policy: EditPolicy,
    ) -> Result<(), AppError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        Self::remove(&mut *tx, user_id, transaction_id, policy).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        Ok(())
    }

    pub async fn list_transactions(
        pool: &PgPool,
        user_id: i64,
    ) -> Result<Vec<Transaction>, AppError> {
        let mut conn = pool
            .acquire()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        LedgerStore::list_transactions(&mut *conn, user_id).await
    }

    pub async fn get_transaction(
        pool: &PgPool,
        user_id: i64,
        transaction_id: i64,
    ) -> Result<Transaction, AppError> {
        let mut conn = pool
            .acquire()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        LedgerStore::find_transaction(&mut *conn, user_id, transaction_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))
    }

    pub async fn get_summary(
        pool: &PgPool,
        user_id: i64,
        period: Period,
    ) -> Result<SpendingSummary, AppError> {
        let mut conn = pool
            .acquire()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        SummaryAggregator::summarize(&mut *conn, user_id, period).await
    }

    /// Insert, then reconcile the budget for the new row's category and month.
    pub(crate) async fn record<S>(
        store: &mut S,
        user_id: i64,
        new: &NewTransaction,
    ) -> Result<Transaction, AppError>
    where
        S: LedgerStore + BudgetStore,
    {
        let transaction = store.insert_transaction(user_id, new).await?;

        info!(
            user_id,
            transaction_id = transaction.id,
            category = %transaction.category,
            "Transaction recorded"
        );

        ReconciliationEngine::reconcile(
            store,
            user_id,
            &transaction.category,
            transaction.transaction_date,
        )
        .await?;

        Ok(transaction)
    }

    pub(crate) async fn amend<S>(
        store: &mut S,
        user_id: i64,
        transaction_id: i64,
        new: &NewTransaction,
        policy: EditPolicy,
    ) -> Result<Transaction, AppError>
    where
        S: LedgerStore + BudgetStore,
    {
        // Locks the row so the old values stay valid until reconciliation is done
        let previous = store
            .lock_transaction(user_id, transaction_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;

        let updated = store
            .update_transaction(user_id, transaction_id, new)
            .await?
            .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;

        if policy.reconciles() {
            ReconciliationEngine::reconcile_all(
                store,
                user_id,
                &[
                    (previous.category.as_str(), previous.transaction_date),
                    (updated.category.as_str(), updated.transaction_date),
                ],
            )
            .await?;
        } else {
            debug!(user_id, transaction_id, "Edit left budgets untouched");
        }

        Ok(updated)
    }

    pub(crate) async fn remove<S>(
        store: &mut S,
        user_id: i64,
        transaction_id: i64,
        policy: EditPolicy,
    ) -> Result<Transaction, AppError>
    where
        S: LedgerStore + BudgetStore,
    {
        let removed = store
            .delete_transaction(user_id, transaction_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;

        if policy.reconciles() {
            ReconciliationEngine::reconcile(
                store,
                user_id,
                &removed.category,
                removed.transaction_date,
            )
            .await?;
        } else {
            debug!(user_id, transaction_id, "Delete left budgets untouched");
        }

        Ok(removed)
    }
}
