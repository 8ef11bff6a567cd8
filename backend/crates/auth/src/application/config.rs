//! Auth Configuration

use crate::error::{AuthError, AuthResult};

/// Token lifetime for a password-only login, in seconds
pub const PASSWORD_TOKEN_TTL_SECS: i64 = 60;

/// Token lifetime after a completed TOTP challenge, in seconds
pub const MFA_TOKEN_TTL_SECS: i64 = 600;

/// Runtime configuration for the auth module
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for signing bearer tokens
    pub token_secret: String,

    /// TTL of tokens issued on password-only authentication
    pub password_token_ttl_secs: i64,

    /// TTL of tokens issued after the TOTP step-up
    pub mfa_token_ttl_secs: i64,
}

impl AuthConfig {
    pub fn new(token_secret: impl Into<String>) -> Self {
        Self {
            token_secret: token_secret.into(),
            password_token_ttl_secs: PASSWORD_TOKEN_TTL_SECS,
            mfa_token_ttl_secs: MFA_TOKEN_TTL_SECS,
        }
    }

    /// Load from environment variables.
    ///
    /// `TOKEN_SECRET` is required; `PASSWORD_TOKEN_TTL_SECS` and
    /// `MFA_TOKEN_TTL_SECS` override the defaults when present.
    pub fn from_env() -> AuthResult<Self> {
        let token_secret = std::env::var("TOKEN_SECRET")
            .map_err(|_| AuthError::Internal("TOKEN_SECRET is not set".to_string()))?;

        let mut config = Self::new(token_secret);
        if let Some(ttl) = read_ttl("PASSWORD_TOKEN_TTL_SECS")? {
            config.password_token_ttl_secs = ttl;
        }
        if let Some(ttl) = read_ttl("MFA_TOKEN_TTL_SECS")? {
            config.mfa_token_ttl_secs = ttl;
        }
        Ok(config)
    }

    /// Configuration with a random throwaway secret (tests, local dev)
    pub fn with_random_secret() -> Self {
        let bytes = platform::crypto::random_bytes(32);
        let secret: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        Self::new(secret)
    }
}

fn read_ttl(name: &str) -> AuthResult<Option<i64>> {
    match std::env::var(name) {
        Ok(raw) => {
            let ttl: i64 = raw
                .parse()
                .map_err(|_| AuthError::Internal(format!("{name} must be an integer")))?;
            if ttl <= 0 {
                return Err(AuthError::Internal(format!("{name} must be positive")));
            }
            Ok(Some(ttl))
        }
        Err(_) => Ok(None),
    }
}
