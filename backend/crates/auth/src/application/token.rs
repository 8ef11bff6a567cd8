//! Bearer Token Issuance and Verification
//!
//! HS256-signed JWTs carrying the account email as subject. Two TTL
//! tiers exist: a short one for password-only logins and a longer one
//! once the TOTP challenge has been completed.

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind as JwtErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

/// Signed token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account email
    pub sub: String,
    /// Issued-at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

/// Signs and verifies bearer tokens
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: a 60-second tier must expire exactly on schedule
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(config.token_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.token_secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token for an account, valid for `ttl_secs` from now
    pub fn issue(&self, subject: &Email, ttl_secs: i64) -> AuthResult<String> {
        self.issue_at(subject, ttl_secs, Utc::now().timestamp())
    }

    fn issue_at(&self, subject: &Email, ttl_secs: i64, now: i64) -> AuthResult<String> {
        let claims = Claims {
            sub: subject.as_str().to_string(),
            iat: now,
            exp: now + ttl_secs,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("Token signing failed: {e}")))
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => AuthError::TokenExpired,
                JwtErrorKind::InvalidToken
                | JwtErrorKind::Base64(_)
                | JwtErrorKind::Json(_)
                | JwtErrorKind::Utf8(_) => AuthError::TokenMalformed,
                _ => AuthError::TokenInvalid,
            })
    }
}
