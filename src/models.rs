use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidationError;

use crate::errors::AppError;

/// Money columns are NUMERIC(14, 2)
const MONEY_SCALE: u32 = 2;
const MONEY_INTEGER_DIGITS: u32 = 12;

/// Plain acknowledgement body for updates and deletes
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Transaction updated successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Reject amounts the money columns would round or overflow.
pub fn validate_money(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.normalize().scale() > MONEY_SCALE {
        return Err(ValidationError::new("money_scale")
            .with_message("must have at most 2 decimal places".into()));
    }
    if amount.abs() >= Decimal::from(10_i64.pow(MONEY_INTEGER_DIGITS)) {
        return Err(ValidationError::new("money_range")
            .with_message("must be less than 1000000000000".into()));
    }
    Ok(())
}

/// [`validate_money`] for fields checked by hand, naming the field in the message.
pub fn check_money(field: &str, amount: &Decimal) -> Result<(), AppError> {
    validate_money(amount).map_err(|e| {
        let reason = e.message.as_deref().unwrap_or("is out of range");
        AppError::validation(format!("{field} {reason}"))
    })
}
