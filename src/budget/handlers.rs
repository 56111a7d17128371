use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;
use crate::models::MessageResponse;
use crate::period::Period;

use super::models::{
    BudgetIdPath, BudgetResponse, CreateBudgetDto, CreatedBudgetResponse, MonthlyBudgetsQuery,
    UpdateBudgetDto,
};
use super::service::BudgetService;

/// GET /budgets - List all budgets for the authenticated user
#[utoipa::path(
    get,
    path = "/budgets",
    tag = "Budgets",
    responses(
        (status = 200, description = "List of budgets, newest period first", body = Vec<BudgetResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/budgets")]
pub async fn list_budgets(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let budgets = BudgetService::list_budgets(pool.get_ref(), auth.user_id).await?;

    let response: Vec<BudgetResponse> = budgets
        .into_iter()
        .map(BudgetResponse::from_budget)
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

/// GET /budgets/monthly - Budgets for one month
#[utoipa::path(
    get,
    path = "/budgets/monthly",
    tag = "Budgets",
    params(MonthlyBudgetsQuery),
    responses(
        (status = 200, description = "Budgets for the month", body = Vec<BudgetResponse>),
        (status = 400, description = "Invalid month or year", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/budgets/monthly")]
pub async fn get_monthly_budgets(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    query: web::Query<MonthlyBudgetsQuery>,
) -> Result<HttpResponse, AppError> {
    query
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let period = Period::new(query.month, query.year)?;
    let budgets = BudgetService::list_budgets_for_period(pool.get_ref(), auth.user_id, period).await?;

    let response: Vec<BudgetResponse> = budgets
        .into_iter()
        .map(BudgetResponse::from_budget)
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

/// GET /budgets/{id} - Get a specific budget by ID
#[utoipa::path(
    get,
    path = "/budgets/{id}",
    tag = "Budgets",
    params(BudgetIdPath),
    responses(
        (status = 200, description = "Budget details", body = BudgetResponse),
        (status = 404, description = "Budget not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/budgets/{id}")]
pub async fn get_budget(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<BudgetIdPath>,
) -> Result<HttpResponse, AppError> {
    let budget = BudgetService::get_budget_by_id(pool.get_ref(), path.id, auth.user_id).await?;

    Ok(HttpResponse::Ok().json(BudgetResponse::from_budget(budget)))
}

/// POST /budgets - Create a budget for a category and month
#[utoipa::path(
    post,
    path = "/budgets",
    tag = "Budgets",
    request_body = CreateBudgetDto,
    responses(
        (status = 201, description = "Budget created", body = CreatedBudgetResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Budget already exists for this category and month", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/budgets")]
pub async fn create_budget(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    body: web::Json<CreateBudgetDto>,
) -> Result<HttpResponse, AppError> {
    let new = body.into_inner().into_new_budget()?;

    let budget = BudgetService::create_budget(pool.get_ref(), auth.user_id, &new).await?;

    Ok(HttpResponse::Created().json(CreatedBudgetResponse {
        message: "Budget created successfully".to_string(),
        budget_id: budget.id,
    }))
}

/// PUT /budgets/{id} - Change the budgeted amount
#[utoipa::path(
    put,
    path = "/budgets/{id}",
    tag = "Budgets",
    params(BudgetIdPath),
    request_body = UpdateBudgetDto,
    responses(
        (status = 200, description = "Budget updated", body = MessageResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Budget not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[put("/budgets/{id}")]
pub async fn update_budget(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<BudgetIdPath>,
    body: web::Json<UpdateBudgetDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    BudgetService::update_budgeted_amount(
        pool.get_ref(),
        path.id,
        auth.user_id,
        body.budgeted_amount,
    )
    .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Budget updated successfully")))
}

/// DELETE /budgets/{id} - Delete a budget
#[utoipa::path(
    delete,
    path = "/budgets/{id}",
    tag = "Budgets",
    params(BudgetIdPath),
    responses(
        (status = 200, description = "Budget deleted", body = MessageResponse),
        (status = 404, description = "Budget not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[delete("/budgets/{id}")]
pub async fn delete_budget(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<BudgetIdPath>,
) -> Result<HttpResponse, AppError> {
    BudgetService::delete_budget(pool.get_ref(), path.id, auth.user_id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Budget deleted successfully")))
}
