use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{http::header, web, App, HttpServer};
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::time::Duration;
use tracing::info;
use tracing_actix_web::TracingLogger;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use finance_tracker::ai::AiClient;
use finance_tracker::config::Settings;
use finance_tracker::openapi::ApiDoc;
use finance_tracker::routes;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env().map_err(io::Error::other)?;

    // Configure connection pool with production-ready settings
    let pool = PgPoolOptions::new()
        .max_connections(settings.db_max_connections)
        .min_connections(settings.db_min_connections)
        .acquire_timeout(Duration::from_secs(3))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&settings.database_url)
        .await
        .map_err(io::Error::other)?;

    if settings.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(io::Error::other)?;
        info!("Database migrations applied");
    }

    let ai_client = AiClient::new(settings.ai_service_url.clone(), settings.ai_timeout)
        .map_err(|e| io::Error::other(e.to_string()))?;

    // Rate limiting for register/login/refresh: one token per second, burst of 5
    let auth_governor_config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(5)
        .finish()
        .ok_or_else(|| io::Error::other("Invalid rate limiter configuration"))?;

    let jwt_secret = settings.jwt_secret.clone();
    let edit_policy = settings.edit_policy;
    let allowed_origins = settings.cors_allowed_origins.clone();
    let (host, port) = settings.bind_address();

    info!(
        %host,
        port,
        ?edit_policy,
        ai_service = %settings.ai_service_url,
        "Starting server"
    );

    HttpServer::new(move || {
        let allowed_origins = allowed_origins.clone();

        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                let origin_str = origin.to_str().unwrap_or("");
                allowed_origins
                    .split(',')
                    .any(|allowed| allowed.trim() == origin_str)
            })
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            // Middleware (order matters: outer to inner)
            .wrap(TracingLogger::default())
            .wrap(cors)
            // Shared state
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(jwt_secret.clone()))
            .app_data(web::Data::new(edit_policy))
            .app_data(web::Data::new(ai_client.clone()))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
            .configure(routes::configure)
            // Rate-limited auth endpoints (must be last to avoid catching all routes)
            .service(
                web::scope("")
                    .wrap(Governor::new(&auth_governor_config))
                    .configure(routes::configure_auth),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
