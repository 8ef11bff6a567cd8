//! Login Use Case
//!
//! Password verification is the first factor. Accounts with an enrolled
//! TOTP secret receive a challenge instead of a token; the client must
//! follow up with the code to obtain the long-lived tier. Accounts
//! without a secret get a short-lived token directly.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::TokenIssuer;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, UserPassword};
use crate::error::{AuthError, AuthResult};

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub enum LoginOutcome {
    /// First factor accepted; a TOTP code is required next
    MfaChallenge { otpauth_url: String },
    /// No TOTP secret on file; short-lived token issued directly
    Token { token: String },
}

pub struct LoginUseCase<R> {
    repo: Arc<R>,
    issuer: TokenIssuer,
    config: AuthConfig,
}

impl<R: UserRepository> LoginUseCase<R> {
    pub fn new(repo: Arc<R>, issuer: TokenIssuer, config: AuthConfig) -> Self {
        Self {
            repo,
            issuer,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutcome> {
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let password =
            UserPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        // Unknown user and wrong password collapse into the same error so
        // the endpoint cannot be used to enumerate accounts.
        let user = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.verify_password(&password) {
            return Err(AuthError::InvalidCredentials);
        }

        match &user.mfa_secret {
            Some(secret) => {
                let otpauth_url = secret.otpauth_url(user.email.as_str())?;
                tracing::debug!(user = %user.user_name, "Password accepted, TOTP challenge issued");
                Ok(LoginOutcome::MfaChallenge { otpauth_url })
            }
            None => {
                let token = self
                    .issuer
                    .issue(&user.email, self.config.password_token_ttl_secs)?;
                tracing::debug!(user = %user.user_name, "Password-only login, short token issued");
                Ok(LoginOutcome::Token { token })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryAuthStore, make_legacy_user, make_user};

    fn usecase(store: Arc<MemoryAuthStore>) -> (LoginUseCase<MemoryAuthStore>, TokenIssuer) {
        let config = AuthConfig::with_random_secret();
        let issuer = TokenIssuer::new(&config);
        (
            LoginUseCase::new(store, issuer.clone(), config),
            issuer,
        )
    }

    fn input(email: &str, password: &str) -> LoginInput {
        LoginInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_with_mfa_returns_challenge() {
        let store = Arc::new(MemoryAuthStore::new());
        store.seed_user(make_user("user@example.com", "user500", "Password1!"));
        let (usecase, _) = usecase(store);

        let outcome = usecase
            .execute(input("user@example.com", "Password1!"))
            .await
            .unwrap();

        match outcome {
            LoginOutcome::MfaChallenge { otpauth_url } => {
                assert!(otpauth_url.starts_with("otpauth://totp/"));
            }
            other => panic!("expected challenge, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_legacy_user_gets_short_token() {
        let store = Arc::new(MemoryAuthStore::new());
        store.seed_user(make_legacy_user("old@example.com", "olduser", "Password1!"));
        let (usecase, issuer) = usecase(store);

        let outcome = usecase
            .execute(input("old@example.com", "Password1!"))
            .await
            .unwrap();

        match outcome {
            LoginOutcome::Token { token } => {
                let claims = issuer.verify(&token).unwrap();
                assert_eq!(claims.sub, "old@example.com");
                assert_eq!(claims.exp - claims.iat, 60);
            }
            other => panic!("expected token, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_registered_account_is_always_challenged() {
        // Registration enrolls a TOTP secret unconditionally, so the
        // direct-token branch must be unreachable for fresh accounts.
        let store = Arc::new(MemoryAuthStore::new());
        let register = crate::application::RegisterUseCase::new(store.clone());
        register
            .execute(crate::application::register::RegisterInput {
                username: "fresh".to_string(),
                email: "fresh@example.com".to_string(),
                password: "Password1!".to_string(),
            })
            .await
            .unwrap();
        let (usecase, _) = usecase(store);

        let outcome = usecase
            .execute(input("fresh@example.com", "Password1!"))
            .await
            .unwrap();

        assert!(matches!(outcome, LoginOutcome::MfaChallenge { .. }));
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let store = Arc::new(MemoryAuthStore::new());
        store.seed_user(make_user("user@example.com", "user500", "Password1!"));
        let (usecase, _) = usecase(store);

        let err = usecase
            .execute(input("user@example.com", "WrongPass!"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_unknown_user_indistinguishable_from_bad_password() {
        let store = Arc::new(MemoryAuthStore::new());
        let (usecase, _) = usecase(store);

        let err = usecase
            .execute(input("ghost@example.com", "Password1!"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }
}
