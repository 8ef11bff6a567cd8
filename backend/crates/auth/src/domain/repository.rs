//! Repository Traits
//!
//! Storage is abstracted behind async traits so use cases can run against
//! Postgres in production and in-memory doubles in tests.

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::entity::{ResetToken, User};
use crate::domain::value_object::{Email, UserName};
use crate::error::AuthResult;

/// Account storage
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new account.
    ///
    /// Returns `false` when an account with the same email already exists;
    /// the conditional insert makes concurrent registrations race-free.
    async fn create(&self, user: &User) -> AuthResult<bool>;

    /// Whether any account holds this username
    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;

    /// Replace the stored password hash.
    ///
    /// Returns `false` when no account exists for the email.
    async fn update_password(&self, email: &Email, hash: &HashedPassword) -> AuthResult<bool>;
}

/// Password-reset token storage (one live token per email)
#[trait_variant::make(ResetTokenRepository: Send)]
pub trait LocalResetTokenRepository {
    /// Store a token, replacing any previous one for the same email
    async fn upsert(&self, token: &ResetToken) -> AuthResult<()>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<ResetToken>>;

    /// Flag the token as verified, but only while it is still issued and
    /// unexpired.
    ///
    /// Returns `false` when no such token exists; the conditional write
    /// is the arbiter between concurrent verifications, so at most one
    /// caller ever sees `true` for a given token.
    async fn mark_verified(&self, email: &Email, now: DateTime<Utc>) -> AuthResult<bool>;

    /// Remove the token once the reset completes, but only if it has
    /// been verified.
    ///
    /// Returns `false` when no verified token was consumed; at most one
    /// concurrent completion ever sees `true`.
    async fn consume_verified(&self, email: &Email) -> AuthResult<bool>;
}
