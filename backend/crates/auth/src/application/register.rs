//! Registration Use Case

use std::sync::Arc;

use chrono::Utc;

use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, TotpSecret, UserName, UserPassword};
use crate::error::{AuthError, AuthResult};

pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Create a new account: validate input, hash the password, enroll a
/// TOTP secret, and insert atomically.
pub struct RegisterUseCase<R> {
    repo: Arc<R>,
}

impl<R: UserRepository> RegisterUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<User> {
        let email = Email::new(input.email)?;
        let user_name = UserName::new(input.username)?;
        let password = UserPassword::new(input.password)?;

        // Early check for a friendly error; the unique index still backs
        // this up under concurrency.
        if self.repo.exists_by_user_name(&user_name).await? {
            return Err(AuthError::DuplicateUsername);
        }

        let user = User::register(
            email,
            user_name,
            password.hash()?,
            TotpSecret::generate(),
            Utc::now(),
        );

        // Conditional insert: a concurrent registration of the same email
        // loses cleanly instead of failing or overwriting.
        if !self.repo.create(&user).await? {
            return Err(AuthError::DuplicateEmail);
        }

        tracing::info!(user = %user.user_name, "Account registered");
        Ok(user)
    }
}
