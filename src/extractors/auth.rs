use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{err, ok, Ready};
use secrecy::Secret;

use crate::auth::{decode_token, extract_token};
use crate::errors::AppError;

/// Extractor that validates the Bearer JWT and yields the caller's user id.
/// Everything downstream trusts this id for ownership scoping.
pub struct AuthenticatedUser {
    pub user_id: i64,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(jwt_secret) = req.app_data::<web::Data<Secret<String>>>() else {
            return err(AppError::InternalError(
                "JWT secret not configured".to_string(),
            ));
        };

        let token = match extract_token(req) {
            Ok(t) => t,
            Err(e) => return err(e),
        };

        match decode_token(token, jwt_secret.get_ref()) {
            Ok(claims) => ok(AuthenticatedUser {
                user_id: claims.sub,
            }),
            Err(e) => err(e),
        }
    }
}
