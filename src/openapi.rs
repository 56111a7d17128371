use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::models::{
    AuthTokenResponse, CreateUserDto, LoginDto, LogoutResponse, RefreshTokenDto, UserResponseDto,
};
use crate::budget::models::{
    BudgetResponse, CreateBudgetDto, CreatedBudgetResponse, UpdateBudgetDto,
};
use crate::errors::ErrorResponse;
use crate::goal::models::{CreateGoalDto, CreatedGoalResponse, GoalResponse, UpdateGoalDto};
use crate::models::MessageResponse;
use crate::routes::HealthResponse;
use crate::summary::{MonthlySpendingEntry, SpendingSummary};
use crate::transaction::models::{
    CreatedTransactionResponse, TransactionDto, TransactionResponse,
};

/// Security scheme modifier for Bearer token authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT access token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation configuration
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Finance Tracker API",
        version = "1.0.0",
        description = "Personal finance tracking: transactions, monthly budgets reconciled against spending, savings goals and AI insights",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Authentication and user management"),
        (name = "Transactions", description = "Ledger entries and spending summaries"),
        (name = "Budgets", description = "Per-category monthly budgets with reconciled actual spend"),
        (name = "Goals", description = "Savings goals"),
        (name = "AI", description = "Pass-through to the AI analysis service")
    ),
    paths(
        crate::routes::health_check,
        // Auth endpoints
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::refresh,
        crate::auth::handlers::logout,
        crate::auth::handlers::me,
        // Transaction endpoints
        crate::transaction::handlers::list_transactions,
        crate::transaction::handlers::get_summary,
        crate::transaction::handlers::get_transaction,
        crate::transaction::handlers::create_transaction,
        crate::transaction::handlers::update_transaction,
        crate::transaction::handlers::delete_transaction,
        // Budget endpoints
        crate::budget::handlers::list_budgets,
        crate::budget::handlers::get_monthly_budgets,
        crate::budget::handlers::get_budget,
        crate::budget::handlers::create_budget,
        crate::budget::handlers::update_budget,
        crate::budget::handlers::delete_budget,
        // Goal endpoints
        crate::goal::handlers::list_goals,
        crate::goal::handlers::create_goal,
        crate::goal::handlers::update_goal,
        crate::goal::handlers::delete_goal,
        // AI endpoints
        crate::ai::handlers::spending_prediction,
        crate::ai::handlers::savings_recommendations,
        crate::ai::handlers::spending_insights,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            HealthResponse,
            // Auth schemas
            CreateUserDto,
            LoginDto,
            RefreshTokenDto,
            UserResponseDto,
            AuthTokenResponse,
            LogoutResponse,
            // Transaction schemas
            TransactionDto,
            TransactionResponse,
            CreatedTransactionResponse,
            MonthlySpendingEntry,
            SpendingSummary,
            // Budget schemas
            BudgetResponse,
            CreateBudgetDto,
            UpdateBudgetDto,
            CreatedBudgetResponse,
            // Goal schemas
            GoalResponse,
            CreateGoalDto,
            UpdateGoalDto,
            CreatedGoalResponse,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_core_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/transactions",
            "/transactions/summary",
            "/transactions/{id}",
            "/budgets",
            "/budgets/monthly",
            "/goals/{id}",
            "/ai/prediction",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
