//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::sync::Arc;

use platform::mailer::Mailer;

use crate::application::config::AuthConfig;
use crate::application::token::TokenIssuer;
use crate::application::{
    CompleteResetUseCase, LoginOutcome, LoginUseCase, RegisterUseCase, RequestResetUseCase,
    VerifyOtpUseCase, VerifyResetUseCase,
};
use crate::application::complete_reset::CompleteResetInput;
use crate::application::login::LoginInput;
use crate::application::register::RegisterInput;
use crate::application::request_reset::RequestResetInput;
use crate::application::verify_otp::VerifyOtpInput;
use crate::application::verify_reset::VerifyResetInput;
use crate::domain::repository::{ResetTokenRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
    ResetPasswordRequest, TokenResponse, VerifyOtpRequest, VerifyResetRequest,
};

/// Shared state for auth handlers
pub struct AuthAppState<R, M>
where
    R: UserRepository + ResetTokenRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub config: Arc<AuthConfig>,
    pub issuer: TokenIssuer,
}

// Manual impl: the derive would require R and M themselves to be Clone
impl<R, M> Clone for AuthAppState<R, M>
where
    R: UserRepository + ResetTokenRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            mailer: self.mailer.clone(),
            config: self.config.clone(),
            issuer: self.issuer.clone(),
        }
    }
}

/// Unwrap a JSON body, mapping axum's rejection (missing fields, bad
/// syntax) onto the validation error so clients get a 400
fn read_json<T>(body: Result<Json<T>, JsonRejection>) -> AuthResult<T> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(AuthError::Validation(rejection.body_text())),
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/register
pub async fn register<R, M>(
    State(state): State<AuthAppState<R, M>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + ResetTokenRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let req = read_json(body)?;
    let use_case = RegisterUseCase::new(state.repo.clone());

    use_case
        .execute(RegisterInput {
            username: req.username,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::ok("User registered successfully")),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/login
pub async fn login<R, M>(
    State(state): State<AuthAppState<R, M>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<Json<LoginResponse>>
where
    R: UserRepository + ResetTokenRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let req = read_json(body)?;
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.issuer.clone(),
        state.config.as_ref().clone(),
    );

    let outcome = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let response = match outcome {
        LoginOutcome::MfaChallenge { otpauth_url } => LoginResponse::MfaChallenge {
            requires_mfa: true,
            otpauth_url,
        },
        LoginOutcome::Token { token } => LoginResponse::Token {
            success: true,
            token,
        },
    };

    Ok(Json(response))
}

// ============================================================================
// TOTP Verification
// ============================================================================

/// POST /api/verify-otp
pub async fn verify_otp<R, M>(
    State(state): State<AuthAppState<R, M>>,
    body: Result<Json<VerifyOtpRequest>, JsonRejection>,
) -> AuthResult<Json<TokenResponse>>
where
    R: UserRepository + ResetTokenRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let req = read_json(body)?;
    let use_case = VerifyOtpUseCase::new(
        state.repo.clone(),
        state.issuer.clone(),
        state.config.as_ref().clone(),
    );

    let token = use_case
        .execute(VerifyOtpInput {
            email: req.email,
            code: req.token,
        })
        .await?;

    Ok(Json(TokenResponse {
        success: true,
        token,
    }))
}

// ============================================================================
// Password Reset
// ============================================================================

/// POST /api/forgot-password
pub async fn forgot_password<R, M>(
    State(state): State<AuthAppState<R, M>>,
    body: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + ResetTokenRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let req = read_json(body)?;
    let use_case = RequestResetUseCase::new(state.repo.clone(), state.mailer.clone());

    use_case
        .execute(RequestResetInput { email: req.email })
        .await?;

    Ok(Json(MessageResponse::ok("Reset code sent")))
}

/// POST /api/verify-otp-reset
pub async fn verify_otp_reset<R, M>(
    State(state): State<AuthAppState<R, M>>,
    body: Result<Json<VerifyResetRequest>, JsonRejection>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + ResetTokenRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let req = read_json(body)?;
    let use_case = VerifyResetUseCase::new(state.repo.clone());

    use_case
        .execute(VerifyResetInput {
            email: req.email,
            code: req.otp,
        })
        .await?;

    Ok(Json(MessageResponse::ok("Code verified")))
}

/// POST /api/reset-password
pub async fn reset_password<R, M>(
    State(state): State<AuthAppState<R, M>>,
    body: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + ResetTokenRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let req = read_json(body)?;
    let use_case = CompleteResetUseCase::new(state.repo.clone());

    use_case
        .execute(CompleteResetInput {
            email: req.email,
            new_password: req.new_password,
        })
        .await?;

    Ok(Json(MessageResponse::ok("Password updated")))
}
