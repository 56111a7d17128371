use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::errors::AppError;
use crate::period::Period;

/// Spending for one category within one calendar month. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct MonthlySpendingEntry {
    /// Category label, exactly as recorded on the transactions
    #[schema(example = "food")]
    pub category: String,
    /// Sum of transaction amounts
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 80.00)]
    pub total: Decimal,
}

/// Monthly breakdown plus all-time total for a user
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpendingSummary {
    pub monthly_spending: Vec<MonthlySpendingEntry>,
    /// Sum of every transaction the user has recorded
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 1250.50)]
    pub total_spending: Decimal,
}

/// Query parameters for the spending summary; both default to the current month.
#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct SummaryQuery {
    /// Calendar year
    #[param(example = 2024)]
    pub year: Option<i16>,

    /// Calendar month, 1-12
    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    #[param(example = 6)]
    pub month: Option<i16>,
}

impl SummaryQuery {
    pub fn period(&self) -> Result<Period, AppError> {
        self.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        let current = Period::current();
        Period::new(
            self.month.unwrap_or(current.month),
            self.year.unwrap_or(current.year),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_serializes_numbers_in_camel_case() {
        let summary = SpendingSummary {
            monthly_spending: vec![MonthlySpendingEntry {
                category: "food".to_string(),
                total: Decimal::new(8000, 2),
            }],
            total_spending: Decimal::ZERO,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["monthlySpending"][0]["category"], "food");
        assert_eq!(json["monthlySpending"][0]["total"].as_f64(), Some(80.0));
        assert_eq!(json["totalSpending"].as_f64(), Some(0.0));
    }

    #[test]
    fn test_query_period_explicit() {
        let query = SummaryQuery {
            year: Some(2024),
            month: Some(6),
        };
        assert_eq!(
            query.period().unwrap(),
            Period {
                month: 6,
                year: 2024
            }
        );
    }

    #[test]
    fn test_query_period_defaults_to_current_month() {
        let query = SummaryQuery {
            year: None,
            month: None,
        };
        assert_eq!(query.period().unwrap(), Period::current());
    }

    #[test]
    fn test_query_accepts_years_outside_budget_range() {
        for year in [1999, 2101] {
            let query = SummaryQuery {
                year: Some(year),
                month: Some(6),
            };
            assert_eq!(query.period().unwrap(), Period { month: 6, year });
        }
    }

    #[test]
    fn test_query_rejects_month_out_of_range() {
        let query = SummaryQuery {
            year: Some(2024),
            month: Some(13),
        };
        assert!(matches!(query.period(), Err(AppError::ValidationError(..))));
    }
}
