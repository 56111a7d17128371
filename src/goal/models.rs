use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::errors::AppError;
use crate::models::check_money;
use crate::period::deserialize_optional_date;

/// Database entity for savings goals
#[derive(Debug, Clone, FromRow)]
pub struct Goal {
    pub id: i64,
    #[allow(dead_code)] // Used in SQL queries for ownership check
    pub user_id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response DTO with computed progress
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Emergency fund")]
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 5000.00)]
    pub target_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 1250.00)]
    pub current_amount: Decimal,
    pub due_date: NaiveDate,
    /// currentAmount / targetAmount as a percentage, capped at 100
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 25.0)]
    pub progress: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GoalResponse {
    pub fn from_goal(goal: Goal) -> Self {
        let progress = if goal.target_amount > Decimal::ZERO {
            (goal.current_amount * Decimal::ONE_HUNDRED / goal.target_amount)
                .min(Decimal::ONE_HUNDRED)
                .round_dp(2)
        } else {
            Decimal::ZERO
        };

        Self {
            id: goal.id,
            name: goal.name,
            target_amount: goal.target_amount,
            current_amount: goal.current_amount,
            due_date: goal.due_date,
            progress,
            created_at: goal.created_at,
            updated_at: goal.updated_at,
        }
    }
}

/// DTO for creating a goal. Progress always starts at zero.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalDto {
    #[validate(
        required(message = "Name is required"),
        length(min = 1, max = 100, message = "Name must be 1-100 characters")
    )]
    #[schema(example = "Emergency fund")]
    pub name: Option<String>,

    #[validate(required(message = "Target amount is required"))]
    #[schema(value_type = f64, example = 5000.00)]
    pub target_amount: Option<Decimal>,

    #[validate(required(message = "Due date is required"))]
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    #[schema(value_type = String, example = "2025-12-31")]
    pub due_date: Option<NaiveDate>,
}

/// Validated goal creation values
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub name: String,
    pub target_amount: Decimal,
    pub due_date: NaiveDate,
}

impl CreateGoalDto {
    pub fn into_new_goal(self) -> Result<NewGoal, AppError> {
        self.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        match (self.name, self.target_amount, self.due_date) {
            (Some(name), Some(target_amount), Some(due_date)) => {
                if target_amount <= Decimal::ZERO {
                    return Err(AppError::validation("Target amount must be positive"));
                }
                check_money("Target amount", &target_amount)?;
                Ok(NewGoal {
                    name,
                    target_amount,
                    due_date,
                })
            }
            _ => Err(AppError::validation(
                "Name, target amount, and due date are required",
            )),
        }
    }
}

/// DTO for a partial goal update; absent fields keep their value.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[schema(value_type = Option<f64>, example = 6000.00)]
    pub target_amount: Option<Decimal>,

    #[schema(value_type = Option<f64>, example = 1500.00)]
    pub current_amount: Option<Decimal>,

    #[serde(default, deserialize_with = "deserialize_optional_date")]
    #[schema(value_type = Option<String>, example = "2026-06-30")]
    pub due_date: Option<NaiveDate>,
}

impl UpdateGoalDto {
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        if self.name.is_none()
            && self.target_amount.is_none()
            && self.current_amount.is_none()
            && self.due_date.is_none()
        {
            return Err(AppError::validation("No fields to update"));
        }
        if matches!(self.target_amount, Some(t) if t <= Decimal::ZERO) {
            return Err(AppError::validation("Target amount must be positive"));
        }
        if matches!(self.current_amount, Some(c) if c < Decimal::ZERO) {
            return Err(AppError::validation("Current amount must be non-negative"));
        }
        if let Some(target) = &self.target_amount {
            check_money("Target amount", target)?;
        }
        if let Some(current) = &self.current_amount {
            check_money("Current amount", current)?;
        }
        Ok(())
    }
}

/// Response after creating a goal
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedGoalResponse {
    #[schema(example = "Goal created successfully")]
    pub message: String,
    #[schema(example = 1)]
    pub goal_id: i64,
}

/// Path parameters for goal ID
#[derive(Debug, Deserialize, IntoParams)]
pub struct GoalIdPath {
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_goal_valid() {
        let dto: CreateGoalDto = serde_json::from_value(serde_json::json!({
            "name": "Emergency fund",
            "targetAmount": 5000,
            "dueDate": "2025-12-31"
        }))
        .unwrap();

        let new = dto.into_new_goal().expect("Should be valid");
        assert_eq!(new.target_amount, Decimal::from(5000));
        assert_eq!(new.due_date, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn test_create_goal_missing_due_date() {
        let dto: CreateGoalDto = serde_json::from_value(serde_json::json!({
            "name": "Emergency fund",
            "targetAmount": 5000
        }))
        .unwrap();
        assert!(matches!(
            dto.into_new_goal(),
            Err(AppError::ValidationError(..))
        ));
    }

    #[test]
    fn test_update_goal_requires_a_field() {
        assert!(UpdateGoalDto::default().check().is_err());

        let dto = UpdateGoalDto {
            current_amount: Some(Decimal::from(10)),
            ..Default::default()
        };
        assert!(dto.check().is_ok());
    }

    #[test]
    fn test_update_goal_rejects_negative_progress() {
        let dto = UpdateGoalDto {
            current_amount: Some(Decimal::from(-1)),
            ..Default::default()
        };
        assert!(dto.check().is_err());
    }

    #[test]
    fn test_goal_amounts_limited_to_cents() {
        let dto: CreateGoalDto = serde_json::from_value(serde_json::json!({
            "name": "Bike",
            "targetAmount": "400.001",
            "dueDate": "2025-12-31"
        }))
        .unwrap();
        assert!(matches!(
            dto.into_new_goal(),
            Err(AppError::ValidationError(..))
        ));

        let dto = UpdateGoalDto {
            current_amount: Some("10.005".parse().unwrap()),
            ..Default::default()
        };
        assert!(dto.check().is_err());

        let dto = UpdateGoalDto {
            target_amount: Some(Decimal::from(10_i64.pow(13))),
            ..Default::default()
        };
        assert!(dto.check().is_err());
    }

    #[test]
    fn test_progress_is_capped() {
        let now = Utc::now();
        let goal = Goal {
            id: 1,
            user_id: 1,
            name: "Bike".to_string(),
            target_amount: Decimal::from(400),
            current_amount: Decimal::from(100),
            due_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            created_at: now,
            updated_at: now,
        };

        assert_eq!(
            GoalResponse::from_goal(goal.clone()).progress,
            Decimal::from(25)
        );

        let over = Goal {
            current_amount: Decimal::from(800),
            ..goal
        };
        assert_eq!(GoalResponse::from_goal(over).progress, Decimal::ONE_HUNDRED);
    }
}
