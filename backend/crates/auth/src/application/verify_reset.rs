//! Reset-Code Verification Use Case
//!
//! Moves a reset token from issued to verified. Expiry is checked here,
//! against the deadline stored when the code was issued; a verified code
//! stays verified even if the deadline later passes.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::entity::reset_token::ResetOtpCheck;
use crate::domain::repository::ResetTokenRepository;
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

pub struct VerifyResetInput {
    pub email: String,
    pub code: String,
}

pub struct VerifyResetUseCase<R> {
    repo: Arc<R>,
}

impl<R: ResetTokenRepository> VerifyResetUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: VerifyResetInput) -> AuthResult<()> {
        let email = Email::new(input.email)?;

        let token = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::ResetTokenNotFound)?;

        let now = Utc::now();
        match token.check(&input.code, now) {
            ResetOtpCheck::Valid => {
                // A concurrent verification may have won between the read
                // and this write; the conditional update is the arbiter.
                if !self.repo.mark_verified(&email, now).await? {
                    return Err(AuthError::ResetCodeAlreadyUsed);
                }
                tracing::debug!(email = %email, "Reset code verified");
                Ok(())
            }
            ResetOtpCheck::Mismatch => Err(AuthError::ResetCodeMismatch),
            ResetOtpCheck::Expired => Err(AuthError::ResetCodeExpired),
            ResetOtpCheck::AlreadyUsed => Err(AuthError::ResetCodeAlreadyUsed),
        }
    }
}
