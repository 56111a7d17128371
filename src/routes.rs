use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::errors::{json_error_handler, query_error_handler};
use crate::{ai, auth, budget, goal, transaction};

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: &'static str,
    #[schema(example = "connected")]
    pub database: &'static str,
}

/// Health check endpoint that verifies database connectivity
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service and database are up", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
#[get("/health")]
pub async fn health_check(pool: web::Data<PgPool>) -> impl Responder {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(HealthResponse {
            status: "healthy",
            database: "connected",
        }),
        Err(_) => HttpResponse::ServiceUnavailable().json(HealthResponse {
            status: "unhealthy",
            database: "disconnected",
        }),
    }
}

/// Everything except the rate-limited auth endpoints.
/// Specific routes are registered before the generic `{id}` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(health_check)
        // Auth endpoints without rate limiting
        .service(auth::logout)
        .service(auth::me)
        // Transaction endpoints
        .service(transaction::list_transactions)
        .service(transaction::get_summary)
        .service(transaction::get_transaction)
        .service(transaction::create_transaction)
        .service(transaction::update_transaction)
        .service(transaction::delete_transaction)
        // Budget endpoints
        .service(budget::list_budgets)
        .service(budget::get_monthly_budgets)
        .service(budget::get_budget)
        .service(budget::create_budget)
        .service(budget::update_budget)
        .service(budget::delete_budget)
        // Goal endpoints
        .service(goal::list_goals)
        .service(goal::create_goal)
        .service(goal::update_goal)
        .service(goal::delete_goal)
        // AI proxy endpoints
        .service(ai::spending_prediction)
        .service(ai::savings_recommendations)
        .service(ai::spending_insights);
}

/// Register, login and refresh. `main` wraps these in the rate limiter.
pub fn configure_auth(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::register)
        .service(auth::login)
        .service(auth::refresh);
}
