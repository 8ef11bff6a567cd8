//! Auth Router

use axum::{Router, routing::post};
use std::sync::Arc;

use platform::mailer::{Mailer, SmtpMailer};

use crate::application::config::AuthConfig;
use crate::application::token::TokenIssuer;
use crate::domain::repository::{ResetTokenRepository, UserRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the auth router with the PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, mailer: SmtpMailer, config: AuthConfig) -> Router {
    auth_router_generic(repo, mailer, config)
}

/// Create an auth router for any repository and mailer implementation
pub fn auth_router_generic<R, M>(repo: R, mailer: M, config: AuthConfig) -> Router
where
    R: UserRepository + ResetTokenRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let issuer = TokenIssuer::new(&config);
    let state = AuthAppState {
        repo: Arc::new(repo),
        mailer: Arc::new(mailer),
        config: Arc::new(config),
        issuer,
    };

    Router::new()
        .route("/register", post(handlers::register::<R, M>))
        .route("/login", post(handlers::login::<R, M>))
        .route("/verify-otp", post(handlers::verify_otp::<R, M>))
        .route("/forgot-password", post(handlers::forgot_password::<R, M>))
        .route("/verify-otp-reset", post(handlers::verify_otp_reset::<R, M>))
        .route("/reset-password", post(handlers::reset_password::<R, M>))
        .with_state(state)
}
