//! Auth Error Types
//!
//! Domain-level errors with a single mapping onto the kernel's
//! [`AppError`], which in turn owns HTTP status selection and the
//! problem-details response body.

use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use thiserror::Error;

use crate::domain::value_object::email::EmailError;
use crate::domain::value_object::reset_otp::ResetOtpError;
use crate::domain::value_object::totp_secret::TotpSecretError;
use crate::domain::value_object::user_name::UserNameError;
use platform::mailer::MailerError;
use platform::password::{PasswordHashError, PasswordPolicyError};

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    // --- Accounts ---
    #[error("User not found")]
    UserNotFound,

    #[error("Username is already taken")]
    DuplicateUsername,

    #[error("Email is already registered")]
    DuplicateEmail,

    // --- Login ---
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid verification code")]
    InvalidTotpCode,

    #[error("Account has no MFA secret enrolled")]
    MfaNotEnabled,

    // --- Password reset ---
    #[error("No reset request found for this email")]
    ResetTokenNotFound,

    #[error("Reset code has already been used")]
    ResetCodeAlreadyUsed,

    #[error("Reset code has expired")]
    ResetCodeExpired,

    #[error("Reset code is incorrect")]
    ResetCodeMismatch,

    #[error("Reset code has not been verified")]
    ResetNotVerified,

    // --- Bearer tokens ---
    #[error("Token has expired")]
    TokenExpired,

    #[error("Token is malformed")]
    TokenMalformed,

    #[error("Token signature is invalid")]
    TokenInvalid,

    // --- Input / infrastructure ---
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Failed to send email: {0}")]
    Mail(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err {
            AuthError::UserNotFound | AuthError::ResetTokenNotFound => {
                AppError::not_found(message)
            }
            AuthError::InvalidCredentials
            | AuthError::InvalidTotpCode
            | AuthError::ResetCodeMismatch
            | AuthError::TokenExpired
            | AuthError::TokenMalformed
            | AuthError::TokenInvalid => AppError::unauthorized(message),
            AuthError::DuplicateUsername
            | AuthError::DuplicateEmail
            | AuthError::MfaNotEnabled
            | AuthError::ResetCodeAlreadyUsed
            | AuthError::ResetCodeExpired
            | AuthError::ResetNotVerified
            | AuthError::Validation(_) => AppError::bad_request(message),
            AuthError::Database(source) => {
                AppError::internal("Database error").with_source(source)
            }
            AuthError::Mail(_) | AuthError::Internal(_) => AppError::internal(message),
        }
    }
}

impl AuthError {
    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Mail(msg) => {
                tracing::error!(message = %msg, "Outbound mail failed");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidTotpCode => {
                tracing::warn!("Invalid TOTP code submitted");
            }
            AuthError::TokenExpired | AuthError::TokenMalformed | AuthError::TokenInvalid => {
                tracing::warn!(error = %self, "Bearer token rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

// --- Value-object and platform conversions ---

impl From<EmailError> for AuthError {
    fn from(err: EmailError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<UserNameError> for AuthError {
    fn from(err: UserNameError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<PasswordPolicyError> for AuthError {
    fn from(err: PasswordPolicyError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<ResetOtpError> for AuthError {
    fn from(err: ResetOtpError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<PasswordHashError> for AuthError {
    fn from(err: PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<TotpSecretError> for AuthError {
    fn from(err: TotpSecretError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<MailerError> for AuthError {
    fn from(err: MailerError) -> Self {
        AuthError::Mail(err.to_string())
    }
}
