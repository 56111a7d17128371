use actix_web::{get, post, web, HttpResponse};
use secrecy::Secret;
use sqlx::PgPool;
use validator::Validate;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;

use super::jwt::{
    create_access_token, revoke_all_user_tokens, revoke_refresh_token, rotate_refresh_token,
    validate_refresh_token,
};
use super::models::{
    AuthTokenResponse, CreateUserDto, LoginDto, LogoutResponse, RefreshTokenDto, UserResponseDto,
};
use super::service::AuthService;

/// POST /auth/register - Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User registered", body = AuthTokenResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Username or email already exists", body = ErrorResponse),
        (status = 429, description = "Too many requests")
    )
)]
#[post("/auth/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    jwt_secret: web::Data<Secret<String>>,
    body: web::Json<CreateUserDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let response = AuthService::register(pool.get_ref(), jwt_secret.get_ref(), &body).await?;

    Ok(HttpResponse::Created().json(response))
}

/// POST /auth/login - Authenticate and get tokens
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = AuthTokenResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 429, description = "Too many requests")
    )
)]
#[post("/auth/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    jwt_secret: web::Data<Secret<String>>,
    body: web::Json<LoginDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let response = AuthService::login(
        pool.get_ref(),
        jwt_secret.get_ref(),
        &body.username,
        &body.password,
    )
    .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// POST /auth/refresh - Exchange a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "Auth",
    request_body = RefreshTokenDto,
    responses(
        (status = 200, description = "Tokens rotated", body = AuthTokenResponse),
        (status = 401, description = "Invalid or expired refresh token", body = ErrorResponse),
        (status = 429, description = "Too many requests")
    )
)]
#[post("/auth/refresh")]
pub async fn refresh(
    pool: web::Data<PgPool>,
    jwt_secret: web::Data<Secret<String>>,
    body: web::Json<RefreshTokenDto>,
) -> Result<HttpResponse, AppError> {
    let token_record = validate_refresh_token(pool.get_ref(), &body.refresh_token).await?;

    let user = AuthService::get_user_by_id(pool.get_ref(), token_record.user_id).await?;

    // Revoke old, create new, in one transaction
    let new_refresh_token =
        rotate_refresh_token(pool.get_ref(), token_record.id, user.id).await?;

    let access_token = create_access_token(&user, jwt_secret.get_ref())?;

    Ok(HttpResponse::Ok().json(AuthTokenResponse::new(
        access_token,
        new_refresh_token,
        &user,
    )))
}

/// POST /auth/logout - Revoke one refresh token, or all of them when no body is sent
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    request_body(content = RefreshTokenDto, description = "Refresh token to revoke; omit the body to log out everywhere"),
    responses(
        (status = 200, description = "Logged out", body = LogoutResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/auth/logout")]
pub async fn logout(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    body: Option<web::Json<RefreshTokenDto>>,
) -> Result<HttpResponse, AppError> {
    let response = match body {
        Some(refresh_body) => {
            // Tokens that are unknown, expired or foreign revoke nothing
            let revoked_sessions =
                match validate_refresh_token(pool.get_ref(), &refresh_body.refresh_token).await {
                    Ok(record) => {
                        revoke_refresh_token(pool.get_ref(), record.id, auth.user_id).await?
                    }
                    Err(AppError::Unauthorized(_)) => 0,
                    Err(e) => return Err(e),
                };
            LogoutResponse {
                message: "Logged out successfully".to_string(),
                revoked_sessions,
            }
        }
        None => LogoutResponse {
            message: "Logged out from all devices".to_string(),
            revoked_sessions: revoke_all_user_tokens(pool.get_ref(), auth.user_id).await?,
        },
    };

    Ok(HttpResponse::Ok().json(response))
}

/// GET /auth/me - Get current user info
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = UserResponseDto),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/auth/me")]
pub async fn me(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = AuthService::get_user_by_id(pool.get_ref(), auth.user_id).await?;

    Ok(HttpResponse::Ok().json(UserResponseDto::from_user(&user)))
}
