//! Password-Reset Request Use Case
//!
//! Issues a six-digit single-use code, persists it (replacing any earlier
//! code for the same email), and mails it to the account address. The
//! code is persisted before the mail goes out so a delivery retry can
//! reuse it.

use std::sync::Arc;

use chrono::Utc;
use platform::mailer::Mailer;

use crate::domain::entity::ResetToken;
use crate::domain::repository::{ResetTokenRepository, UserRepository};
use crate::domain::value_object::{Email, ResetOtp};
use crate::error::{AuthError, AuthResult};

pub struct RequestResetInput {
    pub email: String,
}

pub struct RequestResetUseCase<R, M> {
    repo: Arc<R>,
    mailer: Arc<M>,
}

impl<R, M> RequestResetUseCase<R, M>
where
    R: UserRepository + ResetTokenRepository,
    M: Mailer,
{
    pub fn new(repo: Arc<R>, mailer: Arc<M>) -> Self {
        Self { repo, mailer }
    }

    pub async fn execute(&self, input: RequestResetInput) -> AuthResult<()> {
        let email = Email::new(input.email)?;

        let user = UserRepository::find_by_email(self.repo.as_ref(), &email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let otp = ResetOtp::generate();
        let token = ResetToken::issue(email.clone(), otp.clone(), Utc::now());
        self.repo.upsert(&token).await?;

        self.mailer
            .send(
                email.as_str(),
                "Password reset code",
                &reset_mail_body(user.user_name.as_str(), otp.as_str()),
            )
            .await?;

        tracing::info!(user = %user.user_name, "Reset code issued and mailed");
        Ok(())
    }
}

fn reset_mail_body(user_name: &str, code: &str) -> String {
    format!(
        "<p>Hello {user_name},</p>\
         <p>Your password reset code is <b>{code}</b>.</p>\
         <p>It expires in 10 minutes. If you did not request a reset, you can ignore this email.</p>"
    )
}
