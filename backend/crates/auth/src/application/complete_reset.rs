//! Reset Completion Use Case
//!
//! Requires a previously verified token. The new password is hashed and
//! stored, then the token is deleted so the code cannot be replayed.
//! Expiry is not re-checked here: verification already happened inside
//! the window, and the verified flag is the gate.

use std::sync::Arc;

use crate::domain::repository::{ResetTokenRepository, UserRepository};
use crate::domain::value_object::{Email, UserPassword};
use crate::error::{AuthError, AuthResult};

pub struct CompleteResetInput {
    pub email: String,
    pub new_password: String,
}

pub struct CompleteResetUseCase<R> {
    repo: Arc<R>,
}

impl<R> CompleteResetUseCase<R>
where
    R: UserRepository + ResetTokenRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: CompleteResetInput) -> AuthResult<()> {
        let email = Email::new(input.email)?;
        let password = UserPassword::new(input.new_password)?;

        let token = ResetTokenRepository::find_by_email(self.repo.as_ref(), &email)
            .await?
            .ok_or(AuthError::ResetTokenNotFound)?;

        if !token.verified {
            return Err(AuthError::ResetNotVerified);
        }

        let hash = password.hash()?;

        // Consume the token before rotating: the conditional delete lets
        // exactly one concurrent completion through.
        if !self.repo.consume_verified(&email).await? {
            return Err(AuthError::ResetTokenNotFound);
        }

        if !self.repo.update_password(&email, &hash).await? {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(email = %email, "Password reset completed");
        Ok(())
    }
}
