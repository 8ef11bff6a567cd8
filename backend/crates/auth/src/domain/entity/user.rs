//! User Entity

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::{Email, TotpSecret, UserName, UserPassword};

/// Registered account
///
/// The email address is the primary identity; the username must also be
/// unique. `mfa_secret` is populated at registration, but rows imported
/// from older systems may lack one, in which case login skips the TOTP
/// challenge and issues a short-lived token directly.
#[derive(Debug, Clone)]
pub struct User {
    pub email: Email,
    pub user_name: UserName,
    pub password_hash: HashedPassword,
    pub mfa_secret: Option<TotpSecret>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Assemble a new account at registration time
    pub fn register(
        email: Email,
        user_name: UserName,
        password_hash: HashedPassword,
        mfa_secret: TotpSecret,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            email,
            user_name,
            password_hash,
            mfa_secret: Some(mfa_secret),
            created_at: now,
            updated_at: now,
        }
    }

    /// Constant-time check of a candidate password
    pub fn verify_password(&self, candidate: &UserPassword) -> bool {
        candidate.matches(&self.password_hash)
    }

    /// Whether login must be completed with a TOTP code
    pub fn requires_mfa(&self) -> bool {
        self.mfa_secret.is_some()
    }

    /// Replace the stored password hash
    pub fn set_password_hash(&mut self, hash: HashedPassword, now: DateTime<Utc>) {
        self.password_hash = hash;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::UserPassword;

    fn sample_user() -> User {
        let password = UserPassword::new("InitialPass1!").unwrap();
        User::register(
            Email::new("user@example.com").unwrap(),
            UserName::new("user500").unwrap(),
            password.hash().unwrap(),
            TotpSecret::generate(),
            Utc::now(),
        )
    }

    #[test]
    fn test_registered_user_requires_mfa() {
        assert!(sample_user().requires_mfa());
    }

    #[test]
    fn test_verify_password() {
        let user = sample_user();
        assert!(user.verify_password(&UserPassword::new("InitialPass1!").unwrap()));
        assert!(!user.verify_password(&UserPassword::new("OtherPass2?").unwrap()));
    }

    #[test]
    fn test_set_password_hash() {
        let mut user = sample_user();
        let new_password = UserPassword::new("RotatedPass3#").unwrap();
        let later = user.updated_at + chrono::Duration::seconds(5);

        user.set_password_hash(new_password.hash().unwrap(), later);

        assert!(user.verify_password(&new_password));
        assert!(!user.verify_password(&UserPassword::new("InitialPass1!").unwrap()));
        assert_eq!(user.updated_at, later);
    }
}
