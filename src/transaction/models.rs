use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::errors::AppError;
use crate::models::check_money;
use crate::period::{deserialize_optional_date, Period};

/// Validate that amount is positive
fn validate_positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        return Err(ValidationError::new("amount_must_be_positive"));
    }
    Ok(())
}

/// Database model for transactions
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub category: String,
    pub transaction_date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated values for inserting or replacing a ledger row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    pub description: Option<String>,
}

/// Transaction information returned in responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// Unique transaction identifier
    #[schema(example = 42)]
    pub id: i64,
    /// Transaction amount (always positive)
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 50.00)]
    pub amount: Decimal,
    /// Spending category label
    #[schema(example = "food")]
    pub category: String,
    /// Calendar date of the transaction
    pub date: NaiveDate,
    /// Optional description
    #[schema(example = "Weekly groceries")]
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            amount: t.amount,
            category: t.category,
            date: t.transaction_date,
            description: t.description,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Request body for creating or replacing a transaction
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    /// Transaction amount (must be positive)
    #[validate(required(message = "Amount is required"))]
    #[schema(value_type = f64, example = 50.00)]
    pub amount: Option<Decimal>,

    /// Spending category label, matched exactly against budget categories
    #[validate(
        required(message = "Category is required"),
        length(min = 1, max = 100, message = "Category must be 1-100 characters")
    )]
    #[schema(example = "food")]
    pub category: Option<String>,

    /// Calendar date (YYYY-MM-DD or RFC 3339)
    #[validate(required(message = "Date is required"))]
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    #[schema(value_type = String, example = "2024-06-05")]
    pub date: Option<NaiveDate>,

    /// Optional description (max 255 chars)
    #[validate(length(max = 255, message = "Description cannot exceed 255 characters"))]
    #[schema(example = "Weekly groceries")]
    pub description: Option<String>,
}

impl TransactionDto {
    /// Validate the payload and turn it into ledger values.
    pub fn into_new_transaction(self) -> Result<NewTransaction, AppError> {
        self.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        match (self.amount, self.category, self.date) {
            (Some(amount), Some(category), Some(date)) => {
                validate_positive_amount(&amount)
                    .map_err(|_| AppError::validation("Amount must be positive"))?;
                check_money("Amount", &amount)?;
                // Every stored date must map to a reportable period
                Period::of(date)?;
                Ok(NewTransaction {
                    amount,
                    category,
                    date,
                    description: self.description.filter(|d| !d.is_empty()),
                })
            }
            _ => Err(AppError::validation(
                "Amount, category, and date are required",
            )),
        }
    }
}

/// Response after creating a transaction
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTransactionResponse {
    #[schema(example = "Transaction created successfully")]
    pub message: String,
    #[schema(example = 42)]
    pub transaction_id: i64,
}

/// Path parameters for transaction ID
#[derive(Debug, Deserialize, IntoParams)]
pub struct TransactionIdPath {
    /// Transaction ID
    pub id: i64,
}
