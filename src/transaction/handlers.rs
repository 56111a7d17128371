use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::PgPool;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;
use crate::models::MessageResponse;
use crate::reconciliation::EditPolicy;
use crate::summary::{SpendingSummary, SummaryQuery};

use super::models::{
    CreatedTransactionResponse, TransactionDto, TransactionIdPath, TransactionResponse,
};
use super::service::TransactionService;

/// GET /transactions - List the user's transactions, newest first
#[utoipa::path(
    get,
    path = "/transactions",
    tag = "Transactions",
    responses(
        (status = 200, description = "List of transactions", body = Vec<TransactionResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/transactions")]
pub async fn list_transactions(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let transactions = TransactionService::list_transactions(pool.get_ref(), auth.user_id).await?;

    let response: Vec<TransactionResponse> = transactions.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// GET /transactions/summary - Per-category spending for a month plus all-time total
#[utoipa::path(
    get,
    path = "/transactions/summary",
    tag = "Transactions",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Spending summary", body = SpendingSummary),
        (status = 400, description = "Invalid month or year", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/transactions/summary")]
pub async fn get_summary(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    query: web::Query<SummaryQuery>,
) -> Result<HttpResponse, AppError> {
    let period = query.period()?;

    let summary = TransactionService::get_summary(pool.get_ref(), auth.user_id, period).await?;

    Ok(HttpResponse::Ok().json(summary))
}

/// GET /transactions/{id} - Get a single transaction
#[utoipa::path(
    get,
    path = "/transactions/{id}",
    tag = "Transactions",
    params(TransactionIdPath),
    responses(
        (status = 200, description = "Transaction details", body = TransactionResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/transactions/{id}")]
pub async fn get_transaction(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<TransactionIdPath>,
) -> Result<HttpResponse, AppError> {
    let transaction =
        TransactionService::get_transaction(pool.get_ref(), auth.user_id, path.id).await?;

    Ok(HttpResponse::Ok().json(TransactionResponse::from(transaction)))
}

/// POST /transactions - Record a transaction and reconcile the matching budget
#[utoipa::path(
    post,
    path = "/transactions",
    tag = "Transactions",
    request_body = TransactionDto,
    responses(
        (status = 201, description = "Transaction created", body = CreatedTransactionResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/transactions")]
pub async fn create_transaction(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    body: web::Json<TransactionDto>,
) -> Result<HttpResponse, AppError> {
    let new = body.into_inner().into_new_transaction()?;

    let transaction =
        TransactionService::create_transaction(pool.get_ref(), auth.user_id, new).await?;

    Ok(HttpResponse::Created().json(CreatedTransactionResponse {
        message: "Transaction created successfully".to_string(),
        transaction_id: transaction.id,
    }))
}

/// PUT /transactions/{id} - Replace a transaction
#[utoipa::path(
    put,
    path = "/transactions/{id}",
    tag = "Transactions",
    params(TransactionIdPath),
    request_body = TransactionDto,
    responses(
        (status = 200, description = "Transaction updated", body = MessageResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[put("/transactions/{id}")]
pub async fn update_transaction(
    pool: web::Data<PgPool>,
    policy: web::Data<EditPolicy>,
    auth: AuthenticatedUser,
    path: web::Path<TransactionIdPath>,
    body: web::Json<TransactionDto>,
) -> Result<HttpResponse, AppError> {
    let new = body.into_inner().into_new_transaction()?;

    TransactionService::update_transaction(
        pool.get_ref(),
        auth.user_id,
        path.id,
        new,
        *policy.get_ref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Transaction updated successfully")))
}

/// DELETE /transactions/{id} - Delete a transaction
#[utoipa::path(
    delete,
    path = "/transactions/{id}",
    tag = "Transactions",
    params(TransactionIdPath),
    responses(
        (status = 200, description = "Transaction deleted", body = MessageResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[delete("/transactions/{id}")]
pub async fn delete_transaction(
    pool: web::Data<PgPool>,
    policy: web::Data<EditPolicy>,
    auth: AuthenticatedUser,
    path: web::Path<TransactionIdPath>,
) -> Result<HttpResponse, AppError> {
    TransactionService::delete_transaction(pool.get_ref(), auth.user_id, path.id, *policy.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Transaction deleted successfully")))
}
