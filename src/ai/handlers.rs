use actix_web::{get, web, HttpResponse};

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;

use super::client::{AiClient, AiEndpoint};

async fn proxy(
    client: &AiClient,
    endpoint: AiEndpoint,
    user_id: i64,
) -> Result<HttpResponse, AppError> {
    let (status, body) = client.forward(endpoint, user_id).await?;
    Ok(HttpResponse::build(status).json(body))
}

/// GET /ai/prediction - Spending prediction from the AI service
#[utoipa::path(
    get,
    path = "/ai/prediction",
    tag = "AI",
    responses(
        (status = 200, description = "Upstream response, passed through", body = Object),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 502, description = "AI service unavailable", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/ai/prediction")]
pub async fn spending_prediction(
    client: web::Data<AiClient>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    proxy(&client, AiEndpoint::SpendingPrediction, auth.user_id).await
}

/// GET /ai/recommendations - Savings recommendations from the AI service
#[utoipa::path(
    get,
    path = "/ai/recommendations",
    tag = "AI",
    responses(
        (status = 200, description = "Upstream response, passed through", body = Object),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 502, description = "AI service unavailable", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/ai/recommendations")]
pub async fn savings_recommendations(
    client: web::Data<AiClient>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    proxy(&client, AiEndpoint::SavingsRecommendations, auth.user_id).await
}

/// GET /ai/insights - Spending insights from the AI service
#[utoipa::path(
    get,
    path = "/ai/insights",
    tag = "AI",
    responses(
        (status = 200, description = "Upstream response, passed through", body = Object),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 502, description = "AI service unavailable", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/ai/insights")]
pub async fn spending_insights(
    client: web::Data<AiClient>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    proxy(&client, AiEndpoint::SpendingInsights, auth.user_id).await
}
