//! In-memory test doubles shared across use-case and handler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use platform::mailer::{Mailer, MailerError};
use platform::password::HashedPassword;

use crate::domain::entity::{ResetToken, User};
use crate::domain::repository::{ResetTokenRepository, UserRepository};
use crate::domain::value_object::{Email, TotpSecret, UserName, UserPassword};
use crate::error::AuthResult;

/// In-memory store implementing both repository traits
#[derive(Default)]
pub struct MemoryAuthStore {
    users: Mutex<HashMap<String, User>>,
    tokens: Mutex<HashMap<String, ResetToken>>,
}

impl MemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user directly, bypassing the registration flow
    pub fn seed_user(&self, user: User) {
        self.users
            .lock()
            .unwrap()
            .insert(user.email.as_str().to_string(), user);
    }

    pub fn user(&self, email: &str) -> Option<User> {
        self.users.lock().unwrap().get(email).cloned()
    }

    pub fn token(&self, email: &str) -> Option<ResetToken> {
        self.tokens.lock().unwrap().get(email).cloned()
    }
}

impl UserRepository for MemoryAuthStore {
    async fn create(&self, user: &User) -> AuthResult<bool> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(user.email.as_str()) {
            return Ok(false);
        }
        users.insert(user.email.as_str().to_string(), user.clone());
        Ok(true)
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|u| u.user_name == *user_name))
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(email.as_str()).cloned())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.user_name == *user_name)
            .cloned())
    }

    async fn update_password(&self, email: &Email, hash: &HashedPassword) -> AuthResult<bool> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(email.as_str()) {
            Some(user) => {
                user.set_password_hash(hash.clone(), chrono::Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl ResetTokenRepository for MemoryAuthStore {
    async fn upsert(&self, token: &ResetToken) -> AuthResult<()> {
        self.tokens
            .lock()
            .unwrap()
            .insert(token.email.as_str().to_string(), token.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<ResetToken>> {
        Ok(self.tokens.lock().unwrap().get(email.as_str()).cloned())
    }

    async fn mark_verified(&self, email: &Email, now: DateTime<Utc>) -> AuthResult<bool> {
        let mut tokens = self.tokens.lock().unwrap();
        match tokens.get_mut(email.as_str()) {
            Some(token) if !token.verified && !token.is_expired(now) => {
                token.verified = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn consume_verified(&self, email: &Email) -> AuthResult<bool> {
        let mut tokens = self.tokens.lock().unwrap();
        match tokens.get(email.as_str()) {
            Some(token) if token.verified => {
                tokens.remove(email.as_str());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Captured outbound email
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Mailer double that records instead of sending
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<SentMail>>,
    pub fail: Mutex<bool>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let mailer = Self::default();
        *mailer.fail.lock().unwrap() = true;
        mailer
    }

    pub fn sent_mails(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailerError> {
        if *self.fail.lock().unwrap() {
            return Err(MailerError::Transport("connection refused".to_string()));
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}

/// Build a user with a hashed password and a fresh TOTP secret
pub fn make_user(email: &str, user_name: &str, password: &str) -> User {
    let pw = UserPassword::new(password).unwrap();
    User::register(
        Email::new(email).unwrap(),
        UserName::new(user_name).unwrap(),
        pw.hash().unwrap(),
        TotpSecret::generate(),
        chrono::Utc::now(),
    )
}

/// Build a user without a TOTP secret (imported legacy row)
pub fn make_legacy_user(email: &str, user_name: &str, password: &str) -> User {
    let mut user = make_user(email, user_name, password);
    user.mfa_secret = None;
    user
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_by_user_name() {
        let store = MemoryAuthStore::new();
        store.seed_user(make_user("user@example.com", "user500", "Password1!"));

        let name = UserName::new("user500").unwrap();
        assert!(store.exists_by_user_name(&name).await.unwrap());

        let found = store.find_by_user_name(&name).await.unwrap().unwrap();
        assert_eq!(found.email.as_str(), "user@example.com");

        let missing = UserName::new("nobody").unwrap();
        assert!(store.find_by_user_name(&missing).await.unwrap().is_none());
    }
}
