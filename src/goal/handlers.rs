use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::PgPool;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;
use crate::models::MessageResponse;

use super::models::{CreateGoalDto, CreatedGoalResponse, GoalIdPath, GoalResponse, UpdateGoalDto};
use super::service::GoalService;

/// GET /goals - List savings goals ordered by due date
#[utoipa::path(
    get,
    path = "/goals",
    tag = "Goals",
    responses(
        (status = 200, description = "List of goals", body = Vec<GoalResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/goals")]
pub async fn list_goals(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let goals = GoalService::list_goals(pool.get_ref(), auth.user_id).await?;

    let response: Vec<GoalResponse> = goals.into_iter().map(GoalResponse::from_goal).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// POST /goals - Create a savings goal
#[utoipa::path(
    post,
    path = "/goals",
    tag = "Goals",
    request_body = CreateGoalDto,
    responses(
        (status = 201, description = "Goal created", body = CreatedGoalResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/goals")]
pub async fn create_goal(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    body: web::Json<CreateGoalDto>,
) -> Result<HttpResponse, AppError> {
    let new = body.into_inner().into_new_goal()?;

    let goal = GoalService::create_goal(pool.get_ref(), auth.user_id, &new).await?;

    Ok(HttpResponse::Created().json(CreatedGoalResponse {
        message: "Goal created successfully".to_string(),
        goal_id: goal.id,
    }))
}

/// PUT /goals/{id} - Partially update a goal
#[utoipa::path(
    put,
    path = "/goals/{id}",
    tag = "Goals",
    params(GoalIdPath),
    request_body = UpdateGoalDto,
    responses(
        (status = 200, description = "Goal updated", body = MessageResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Goal not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[put("/goals/{id}")]
pub async fn update_goal(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<GoalIdPath>,
    body: web::Json<UpdateGoalDto>,
) -> Result<HttpResponse, AppError> {
    body.check()?;

    GoalService::update_goal(pool.get_ref(), path.id, auth.user_id, &body).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Goal updated successfully")))
}

/// DELETE /goals/{id} - Delete a goal
#[utoipa::path(
    delete,
    path = "/goals/{id}",
    tag = "Goals",
    params(GoalIdPath),
    responses(
        (status = 200, description = "Goal deleted", body = MessageResponse),
        (status = 404, description = "Goal not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[delete("/goals/{id}")]
pub async fn delete_goal(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<GoalIdPath>,
) -> Result<HttpResponse, AppError> {
    GoalService::delete_goal(pool.get_ref(), path.id, auth.user_id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Goal deleted successfully")))
}
