use rust_decimal::Decimal;
use sqlx::PgConnection;

use super::{BudgetStore, LedgerStore};
use crate::errors::AppError;
use crate::period::Period;
use crate::summary::MonthlySpendingEntry;
use crate::transaction::models::{NewTransaction, Transaction};

/// SQLSTATE numeric_value_out_of_range
const NUMERIC_OUT_OF_RANGE: &str = "22003";

const FIND_TRANSACTION_SQL: &str = r#"
    SELECT id, user_id, amount, category, transaction_date, description,
           created_at, updated_at
    FROM transactions
    WHERE id = $1 AND user_id = $2
"#;

const LOCK_TRANSACTION_SQL: &str = r#"
    SELECT id, user_id, amount, category, transaction_date, description,
           created_at, updated_at
    FROM transactions
    WHERE id = $1 AND user_id = $2
    FOR UPDATE
"#;

impl LedgerStore for PgConnection {
    async fn insert_transaction(
        &mut self,
        user_id: i64,
        new: &NewTransaction,
    ) -> Result<Transaction, AppError> {
        sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (user_id, amount, category, transaction_date, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, amount, category, transaction_date, description,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(new.amount)
        .bind(&new.category)
        .bind(new.date)
        .bind(&new.description)
        .fetch_one(&mut *self)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
    }

    async fn list_transactions(&mut self, user_id: i64) -> Result<Vec<Transaction>, AppError> {
        sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, amount, category, transaction_date, description,
                   created_at, updated_at
            FROM transactions
            WHERE user_id = $1
            ORDER BY transaction_date DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *self)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
    }

    async fn find_transaction(
        &mut self,
        user_id: i64,
        transaction_id: i64,
    ) -> Result<Option<Transaction>, AppError> {
        sqlx::query_as::<_, Transaction>(FIND_TRANSACTION_SQL)
            .bind(transaction_id)
            .bind(user_id)
            .fetch_optional(&mut *self)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))
    }

    async fn lock_transaction(
        &mut self,
        user_id: i64,
        transaction_id: i64,
    ) -> Result<Option<Transaction>, AppError> {
        sqlx::query_as::<_, Transaction>(LOCK_TRANSACTION_SQL)
            .bind(transaction_id)
            .bind(user_id)
            .fetch_optional(&mut *self)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))
    }

    async fn update_transaction(
        &mut self,
        user_id: i64,
        transaction_id: i64,
        new: &NewTransaction,
    ) -> Result<Option<Transaction>, AppError> {
        sqlx::query_as::<_, Transaction>(
            r#"
            UPDATE transactions SET
                amount = $3,
                category = $4,
                transaction_date = $5,
                description = $6,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, amount, category, transaction_date, description,
                      created_at, updated_at
            "#,
        )
        .bind(transaction_id)
        .bind(user_id)
        .bind(new.amount)
        .bind(&new.category)
        .bind(new.date)
        .bind(&new.description)
        .fetch_optional(&mut *self)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
    }

    async fn delete_transaction(
        &mut self,
        user_id: i64,
        transaction_id: i64,
    ) -> Result<Option<Transaction>, AppError> {
        sqlx::query_as::<_, Transaction>(
            r#"
            DELETE FROM transactions
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, amount, category, transaction_date, description,
                      created_at, updated_at
            "#,
        )
        .bind(transaction_id)
        .bind(user_id)
        .fetch_optional(&mut *self)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
    }

    async fn monthly_spending(
        &mut self,
        user_id: i64,
        period: Period,
    ) -> Result<Vec<MonthlySpendingEntry>, AppError> {
        let (start, end) = period.bounds()?;

        sqlx::query_as::<_, MonthlySpendingEntry>(
            r#"
            SELECT category, SUM(amount) AS total
            FROM transactions
            WHERE user_id = $1
              AND transaction_date >= $2
              AND transaction_date < $3
            GROUP BY category
            ORDER BY category
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&mut *self)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
    }

    async fn total_spending(&mut self, user_id: i64) -> Result<Decimal, AppError> {
        sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(amount), 0) FROM transactions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&mut *self)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
    }
}

impl BudgetStore for PgConnection {
    async fn lock_budget(
        &mut self,
        user_id: i64,
        category: &str,
        period: Period,
    ) -> Result<Option<i64>, AppError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id FROM budgets
            WHERE user_id = $1 AND category = $2 AND month = $3 AND year = $4
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .bind(category)
        .bind(period.month)
        .bind(period.year)
        .fetch_optional(&mut *self)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
    }

    async fn set_actual_amount(
        &mut self,
        budget_id: i64,
        actual: Decimal,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE budgets SET actual_amount = $1, updated_at = NOW() WHERE id = $2")
            .bind(actual)
            .bind(budget_id)
            .execute(&mut *self)
            .await
            .map_err(budget_write_error)?;

        Ok(())
    }
}

/// An out-of-range monthly sum is reported as a client error.
fn budget_write_error(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::Database(ref db) if db.code().as_deref() == Some(NUMERIC_OUT_OF_RANGE) => {
            AppError::validation("Monthly spending for this budget exceeds the largest supported amount")
        }
        _ => AppError::InternalError(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_read_takes_no_row_lock() {
        assert!(!FIND_TRANSACTION_SQL.contains("FOR UPDATE"));
        assert!(LOCK_TRANSACTION_SQL.trim_end().ends_with("FOR UPDATE"));
    }

    #[test]
    fn test_other_budget_write_errors_stay_internal() {
        assert!(matches!(
            budget_write_error(sqlx::Error::PoolTimedOut),
            AppError::InternalError(_)
        ));
    }
}
