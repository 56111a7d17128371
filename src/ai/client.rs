use std::time::Duration;

use actix_web::http::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::AppError;

/// Analysis endpoints exposed by the AI service, keyed by user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiEndpoint {
    SpendingPrediction,
    SavingsRecommendations,
    SpendingInsights,
}

impl AiEndpoint {
    pub fn path(self, user_id: i64) -> String {
        let name = match self {
            AiEndpoint::SpendingPrediction => "spending-prediction",
            AiEndpoint::SavingsRecommendations => "savings-recommendations",
            AiEndpoint::SpendingInsights => "spending-insights",
        };
        format!("/api/ai/{name}/{user_id}")
    }
}

/// Thin HTTP client for the external AI service.
#[derive(Debug, Clone)]
pub struct AiClient {
    http: reqwest::Client,
    base_url: String,
}

impl AiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build AI client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Call the AI service and hand back its status and JSON body untouched.
    /// Transport failures and non-JSON bodies become [`AppError::Upstream`].
    pub async fn forward(
        &self,
        endpoint: AiEndpoint,
        user_id: i64,
    ) -> Result<(StatusCode, Value), AppError> {
        let url = format!("{}{}", self.base_url, endpoint.path(user_id));
        debug!(%url, "Forwarding to AI service");

        let response = self.http.get(&url).send().await.map_err(|e| {
            warn!(%url, error = %e, "AI service unreachable");
            AppError::Upstream(e.to_string())
        })?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let body = response.json::<Value>().await.map_err(|e| {
            warn!(%url, error = %e, "AI service returned a non-JSON body");
            AppError::Upstream(e.to_string())
        })?;

        Ok((status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{web, App, HttpResponse, HttpServer};

    async fn fake_ai_service() -> String {
        let server = HttpServer::new(|| {
            App::new()
                .route(
                    "/api/ai/spending-prediction/{user_id}",
                    web::get().to(|path: web::Path<i64>| async move {
                        HttpResponse::Ok().json(serde_json::json!({
                            "userId": path.into_inner(),
                            "predictedSpending": 420.5
                        }))
                    }),
                )
                .route(
                    "/api/ai/spending-insights/{user_id}",
                    web::get().to(|| async {
                        HttpResponse::NotFound().json(serde_json::json!({ "error": "no data" }))
                    }),
                )
                .route(
                    "/api/ai/savings-recommendations/{user_id}",
                    web::get().to(|| async { HttpResponse::Ok().body("not json") }),
                )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind fake AI service");

        let addr = server.addrs()[0];
        actix_rt::spawn(server.run());
        format!("http://{addr}")
    }

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(
            AiEndpoint::SpendingPrediction.path(7),
            "/api/ai/spending-prediction/7"
        );
        assert_eq!(
            AiEndpoint::SavingsRecommendations.path(7),
            "/api/ai/savings-recommendations/7"
        );
        assert_eq!(
            AiEndpoint::SpendingInsights.path(7),
            "/api/ai/spending-insights/7"
        );
    }

    #[actix_rt::test]
    async fn test_forward_passes_body_through() {
        let client = AiClient::new(fake_ai_service().await, Duration::from_secs(5)).unwrap();

        let (status, body) = client
            .forward(AiEndpoint::SpendingPrediction, 7)
            .await
            .expect("Should forward");

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["userId"], 7);
        assert_eq!(body["predictedSpending"], 420.5);
    }

    #[actix_rt::test]
    async fn test_forward_keeps_upstream_status() {
        let client = AiClient::new(fake_ai_service().await, Duration::from_secs(5)).unwrap();

        let (status, body) = client
            .forward(AiEndpoint::SpendingInsights, 7)
            .await
            .expect("Should forward");

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "no data");
    }

    #[actix_rt::test]
    async fn test_non_json_body_is_upstream_error() {
        let client = AiClient::new(fake_ai_service().await, Duration::from_secs(5)).unwrap();

        let result = client.forward(AiEndpoint::SavingsRecommendations, 7).await;
        assert!(matches!(result, Err(AppError::Upstream(_))));
    }

    #[actix_rt::test]
    async fn test_unreachable_service_is_upstream_error() {
        let client = AiClient::new("http://127.0.0.1:1/", Duration::from_secs(2)).unwrap();

        let result = client.forward(AiEndpoint::SpendingPrediction, 7).await;
        assert!(matches!(result, Err(AppError::Upstream(_))));
    }
}
