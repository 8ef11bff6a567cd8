//! User Password Value Object
//!
//! Domain wrapper over the platform password primitives. Construction
//! enforces the password policy; hashing and verification delegate to
//! Argon2id in the platform crate.

use std::fmt;

use platform::password::{ClearTextPassword, HashedPassword, PasswordHashError};

pub use platform::password::PasswordPolicyError;

/// Clear-text password supplied at registration, login, or reset
pub struct UserPassword(ClearTextPassword);

impl UserPassword {
    pub fn new(raw: impl Into<String>) -> Result<Self, PasswordPolicyError> {
        Ok(Self(ClearTextPassword::new(raw.into())?))
    }

    /// Derive the Argon2id hash for storage
    pub fn hash(&self) -> Result<HashedPassword, PasswordHashError> {
        self.0.hash()
    }

    /// Check this password against a stored hash
    pub fn matches(&self, stored: &HashedPassword) -> bool {
        stored.verify(&self.0)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserPassword").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_match() {
        let password = UserPassword::new("CorrectHorse1!").unwrap();
        let stored = password.hash().unwrap();

        assert!(password.matches(&stored));

        let other = UserPassword::new("WrongStaple2?").unwrap();
        assert!(!other.matches(&stored));
    }

    #[test]
    fn test_policy_enforced() {
        assert!(UserPassword::new("").is_err());
        assert!(UserPassword::new("a".repeat(200)).is_err());
    }

    #[test]
    fn test_debug_redacted() {
        let password = UserPassword::new("TopSecret9$").unwrap();
        assert!(!format!("{password:?}").contains("TopSecret9$"));
    }
}
