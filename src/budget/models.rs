use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::errors::AppError;
use crate::models::{check_money, validate_money};
use crate::period::Period;

/// Validate that a budgeted amount is non-negative and fits the money column
fn validate_budgeted_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("must be non-negative"));
    }
    validate_money(value)
}

/// Database entity for budgets
#[derive(Debug, Clone, FromRow)]
pub struct Budget {
    pub id: i64,
    #[allow(dead_code)] // Used in SQL queries for ownership check
    pub user_id: i64,
    pub category: String,
    pub month: i16,
    pub year: i16,
    pub budgeted_amount: Decimal,
    /// Written only by reconciliation
    pub actual_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response DTO with computed fields.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResponse {
    #[schema(example = 3)]
    pub id: i64,
    #[schema(example = "food")]
    pub category: String,
    #[schema(example = 6)]
    pub month: i16,
    #[schema(example = 2024)]
    pub year: i16,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 300.00)]
    pub budgeted_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 80.00)]
    pub actual_amount: Decimal,
    /// budgetedAmount - actualAmount, negative when overspent
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 220.00)]
    pub remaining_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BudgetResponse {
    pub fn from_budget(budget: Budget) -> Self {
        let remaining_amount = budget.budgeted_amount - budget.actual_amount;

        Self {
            id: budget.id,
            category: budget.category,
            month: budget.month,
            year: budget.year,
            budgeted_amount: budget.budgeted_amount,
            actual_amount: budget.actual_amount,
            remaining_amount,
            created_at: budget.created_at,
            updated_at: budget.updated_at,
        }
    }
}

/// DTO for creating a new budget
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetDto {
    #[validate(
        required(message = "Category is required"),
        length(min = 1, max = 100, message = "Category must be 1-100 characters")
    )]
    #[schema(example = "food")]
    pub category: Option<String>,

    #[validate(required(message = "Budgeted amount is required"))]
    #[schema(value_type = f64, example = 300.00)]
    pub budgeted_amount: Option<Decimal>,

    #[validate(
        required(message = "Month is required"),
        range(min = 1, max = 12, message = "Month must be between 1 and 12")
    )]
    #[schema(example = 6)]
    pub month: Option<i16>,

    #[validate(
        required(message = "Year is required"),
        range(min = 2000, max = 2100, message = "Year must be between 2000 and 2100")
    )]
    #[schema(example = 2024)]
    pub year: Option<i16>,
}

/// Validated budget creation values
#[derive(Debug, Clone)]
pub struct NewBudget {
    pub category: String,
    pub budgeted_amount: Decimal,
    pub period: Period,
}

impl CreateBudgetDto {
    pub fn into_new_budget(self) -> Result<NewBudget, AppError> {
        self.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        match (self.category, self.budgeted_amount, self.month, self.year) {
            (Some(category), Some(budgeted_amount), Some(month), Some(year)) => {
                if budgeted_amount < Decimal::ZERO {
                    return Err(AppError::validation("Budgeted amount must be non-negative"));
                }
                check_money("Budgeted amount", &budgeted_amount)?;
                Ok(NewBudget {
                    category,
                    budgeted_amount,
                    period: Period::new(month, year)?,
                })
            }
            _ => Err(AppError::validation("All fields are required")),
        }
    }
}

/// DTO for changing the budgeted amount. Category and period are fixed once created.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudgetDto {
    #[validate(custom(function = "validate_budgeted_amount"))]
    #[schema(value_type = f64, example = 350.00)]
    pub budgeted_amount: Decimal,
}

/// Response after creating a budget
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBudgetResponse {
    #[schema(example = "Budget created successfully")]
    pub message: String,
    #[schema(example = 3)]
    pub budget_id: i64,
}

/// Path parameters for budget ID
#[derive(Debug, Deserialize, IntoParams)]
pub struct BudgetIdPath {
    pub id: i64,
}

/// Query parameters for month/year lookup
#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct MonthlyBudgetsQuery {
    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: i16,

    #[validate(range(min = 2000, max = 2100, message = "Year must be between 2000 and 2100"))]
    pub year: i16,
}
