//! TOTP Step-Up Use Case
//!
//! Completes a login that was answered with an MFA challenge. A valid
//! code upgrades the session to the long-lived token tier.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::TokenIssuer;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

pub struct VerifyOtpInput {
    pub email: String,
    pub code: String,
}

pub struct VerifyOtpUseCase<R> {
    repo: Arc<R>,
    issuer: TokenIssuer,
    config: AuthConfig,
}

impl<R: UserRepository> VerifyOtpUseCase<R> {
    pub fn new(repo: Arc<R>, issuer: TokenIssuer, config: AuthConfig) -> Self {
        Self {
            repo,
            issuer,
            config,
        }
    }

    /// Returns the long-lived bearer token on success
    pub async fn execute(&self, input: VerifyOtpInput) -> AuthResult<String> {
        let email = Email::new(input.email)?;

        let user = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let secret = user.mfa_secret.as_ref().ok_or(AuthError::MfaNotEnabled)?;

        if !secret.verify(&input.code) {
            return Err(AuthError::InvalidTotpCode);
        }

        let token = self.issuer.issue(&user.email, self.config.mfa_token_ttl_secs)?;
        tracing::debug!(user = %user.user_name, "TOTP verified, long token issued");
        Ok(token)
    }
}
