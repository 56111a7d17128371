use sqlx::PgPool;
use tracing::info;

use super::models::{Goal, NewGoal, UpdateGoalDto};
use crate::errors::AppError;

/// Service layer for savings goals. Goals are independent of the ledger.
pub struct GoalService;

impl GoalService {
    /// List a user's goals, soonest due first.
    pub async fn list_goals(pool: &PgPool, user_id: i64) -> Result<Vec<Goal>, AppError> {
        sqlx::query_as::<_, Goal>(
            r#"
            SELECT id, user_id, name, target_amount, current_amount, due_date,
                   created_at, updated_at
            FROM goals
            WHERE user_id = $1
            ORDER BY due_date ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
    }

    pub async fn create_goal(pool: &PgPool, user_id: i64, new: &NewGoal) -> Result<Goal, AppError> {
        let goal = sqlx::query_as::<_, Goal>(
            r#"
            INSERT INTO goals (user_id, name, target_amount, current_amount, due_date)
            VALUES ($1, $2, $3, 0, $4)
            RETURNING id, user_id, name, target_amount, current_amount, due_date,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&new.name)
        .bind(new.target_amount)
        .bind(new.due_date)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        info!(user_id, goal_id = goal.id, "Goal created");

        Ok(goal)
    }

    /// Apply a partial update; absent fields keep their stored value.
    pub async fn update_goal(
        pool: &PgPool,
        goal_id: i64,
        user_id: i64,
        dto: &UpdateGoalDto,
    ) -> Result<Goal, AppError> {
        sqlx::query_as::<_, Goal>(
            r#"
            UPDATE goals
            SET name = COALESCE($3, name),
                target_amount = COALESCE($4, target_amount),
                current_amount = COALESCE($5, current_amount),
                due_date = COALESCE($6, due_date),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, target_amount, current_amount, due_date,
                      created_at, updated_at
            "#,
        )
        .bind(goal_id)
        .bind(user_id)
        .bind(&dto.name)
        .bind(dto.target_amount)
        .bind(dto.current_amount)
        .bind(dto.due_date)
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Goal not found".to_string()))
    }

    pub async fn delete_goal(pool: &PgPool, goal_id: i64, user_id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
            .bind(goal_id)
            .bind(user_id)
            .execute(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Goal not found".to_string()));
        }

        Ok(())
    }
}
