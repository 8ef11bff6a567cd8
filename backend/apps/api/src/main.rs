//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use auth::{AuthConfig, PgAuthRepository, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use platform::mailer::SmtpMailer;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use telemetry::{LogWriter, PgLogRepository, TelemetryState, telemetry_router, track_requests};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,telemetry=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Auth configuration
    let auth_config = match AuthConfig::from_env() {
        Ok(config) => config,
        Err(e) if cfg!(debug_assertions) => {
            tracing::warn!(error = %e, "Using a random token secret for development");
            AuthConfig::with_random_secret()
        }
        Err(e) => return Err(anyhow::anyhow!("Auth configuration failed: {e}")),
    };

    // Outbound mail
    let mailer = match (
        env::var("SMTP_RELAY"),
        env::var("SMTP_USERNAME"),
        env::var("SMTP_PASSWORD"),
        env::var("SMTP_FROM"),
    ) {
        (Ok(relay), Ok(username), Ok(password), Ok(from)) => {
            SmtpMailer::new(&relay, username, password, from)
                .map_err(|e| anyhow::anyhow!("SMTP configuration failed: {e}"))?
        }
        _ if cfg!(debug_assertions) => {
            tracing::warn!("SMTP not configured, using localhost:1025");
            SmtpMailer::unencrypted_localhost(1025, "noreply@localhost.dev".to_string())
        }
        _ => anyhow::bail!("SMTP_RELAY/SMTP_USERNAME/SMTP_PASSWORD/SMTP_FROM must be set"),
    };

    // Telemetry pipeline: bounded queue + background writer
    let log_repo = Arc::new(PgLogRepository::new(pool.clone()));
    let (writer, _writer_handle) =
        LogWriter::spawn(log_repo, telemetry::worker::DEFAULT_QUEUE_CAPACITY);
    let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
    let telemetry_state = TelemetryState::new(writer, environment);

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5173,http://127.0.0.1:5173".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router: every route transits the telemetry middleware
    let api = auth_router(PgAuthRepository::new(pool.clone()), mailer, auth_config)
        .merge(telemetry_router(PgLogRepository::new(pool)));

    let app = Router::new()
        .nest("/api", api)
        .layer(axum::middleware::from_fn_with_state(
            telemetry_state,
            track_requests,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
