use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use super::models::{Budget, NewBudget};
use crate::errors::AppError;
use crate::period::Period;

/// Service layer for budget business logic.
/// `actual_amount` is never written here; only reconciliation touches it.
pub struct BudgetService;

impl BudgetService {
    /// List all budgets for a user, newest period first.
    pub async fn list_budgets(pool: &PgPool, user_id: i64) -> Result<Vec<Budget>, AppError> {
        sqlx::query_as::<_, Budget>(
            r#"
            SELECT id, user_id, category, month, year, budgeted_amount, actual_amount,
                   created_at, updated_at
            FROM budgets
            WHERE user_id = $1
            ORDER BY year DESC, month DESC, category ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
    }

    /// All of a user's budgets for one month, by category.
    pub async fn list_budgets_for_period(
        pool: &PgPool,
        user_id: i64,
        period: Period,
    ) -> Result<Vec<Budget>, AppError> {
        sqlx::query_as::<_, Budget>(
            r#"
            SELECT id, user_id, category, month, year, budgeted_amount, actual_amount,
                   created_at, updated_at
            FROM budgets
            WHERE user_id = $1 AND month = $2 AND year = $3
            ORDER BY category ASC
            "#,
        )
        .bind(user_id)
        .bind(period.month)
        .bind(period.year)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
    }

    /// Get a budget by ID, ensuring the requesting user owns it.
    pub async fn get_budget_by_id(
        pool: &PgPool,
        budget_id: i64,
        user_id: i64,
    ) -> Result<Budget, AppError> {
        sqlx::query_as::<_, Budget>(
            r#"
            SELECT id, user_id, category, month, year, budgeted_amount, actual_amount,
                   created_at, updated_at
            FROM budgets
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(budget_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Budget not found".to_string()))
    }

    /// Create a new budget. `actual_amount` starts at zero even when the month
    /// already has spending; the next transaction in the category brings it up to date.
    pub async fn create_budget(
        pool: &PgPool,
        user_id: i64,
        new: &NewBudget,
    ) -> Result<Budget, AppError> {
        // Check for existing budget with same category/month/year
        let exists = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM budgets
            WHERE user_id = $1 AND category = $2 AND month = $3 AND year = $4
            "#,
        )
        .bind(user_id)
        .bind(&new.category)
        .bind(new.period.month)
        .bind(new.period.year)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        if exists > 0 {
            return Err(Self::duplicate(new));
        }

        let budget = sqlx::query_as::<_, Budget>(
            r#"
            INSERT INTO budgets (user_id, category, month, year, budgeted_amount)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, category, month, year, budgeted_amount, actual_amount,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&new.category)
        .bind(new.period.month)
        .bind(new.period.year)
        .bind(new.budgeted_amount)
        .fetch_one(pool)
        .await
        .map_err(|e| match AppError::from(e) {
            // Lost a race with a concurrent insert of the same budget
            AppError::Conflict(_) => Self::duplicate(new),
            other => other,
        })?;

        info!(
            user_id,
            budget_id = budget.id,
            category = %budget.category,
            month = budget.month,
            year = budget.year,
            "Budget created"
        );

        Ok(budget)
    }

    /// Change the budgeted amount. Category and period stay fixed.
    pub async fn update_budgeted_amount(
        pool: &PgPool,
        budget_id: i64,
        user_id: i64,
        budgeted_amount: Decimal,
    ) -> Result<Budget, AppError> {
        sqlx::query_as::<_, Budget>(
            r#"
            UPDATE budgets
            SET budgeted_amount = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, category, month, year, budgeted_amount, actual_amount,
                      created_at, updated_at
            "#,
        )
        .bind(budget_id)
        .bind(user_id)
        .bind(budgeted_amount)
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Budget not found".to_string()))
    }

    /// Delete a budget.
    pub async fn delete_budget(pool: &PgPool, budget_id: i64, user_id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM budgets WHERE id = $1 AND user_id = $2")
            .bind(budget_id)
            .bind(user_id)
            .execute(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Budget not found".to_string()));
        }

        Ok(())
    }

    fn duplicate(new: &NewBudget) -> AppError {
        AppError::Conflict(format!(
            "Budget for '{}' in {}/{} already exists",
            new.category, new.period.month, new.period.year
        ))
    }
}
