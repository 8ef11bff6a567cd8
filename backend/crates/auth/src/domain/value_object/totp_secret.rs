//! TOTP Secret Value Object
//!
//! RFC 6238 time-based one-time passwords: SHA-1, 6 digits, 30-second
//! step, one step of clock skew tolerance.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use totp_rs::{Algorithm, Secret, TOTP};

/// Issuer label embedded in provisioning URIs
const TOTP_ISSUER: &str = "Aegis";

const TOTP_DIGITS: usize = 6;
const TOTP_SKEW: u8 = 1;
const TOTP_STEP: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TotpSecretError {
    #[error("TOTP secret is not valid base32")]
    InvalidBase32,

    #[error("TOTP secret rejected: {0}")]
    InvalidSecret(String),
}

/// Per-account TOTP secret, stored base32-encoded
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TotpSecret(String);

impl TotpSecret {
    /// Generate a fresh 160-bit secret from the OS RNG
    pub fn generate() -> Self {
        Self(Secret::generate_secret().to_encoded().to_string())
    }

    /// Restore a secret from its stored base32 form
    pub fn from_base32(encoded: impl Into<String>) -> Result<Self, TotpSecretError> {
        let encoded = encoded.into();
        Secret::Encoded(encoded.clone())
            .to_bytes()
            .map_err(|_| TotpSecretError::InvalidBase32)?;
        Ok(Self(encoded))
    }

    pub fn as_base32(&self) -> &str {
        &self.0
    }

    /// Provisioning URI (`otpauth://totp/...`) for authenticator enrollment
    pub fn otpauth_url(&self, account: &str) -> Result<String, TotpSecretError> {
        Ok(self.totp(account)?.get_url())
    }

    /// Check a code against the current time, allowing one step of skew
    pub fn verify(&self, code: &str) -> bool {
        let Ok(totp) = self.totp("account") else {
            return false;
        };
        totp.check_current(code).unwrap_or(false)
    }

    /// Check a code at an explicit Unix timestamp
    pub fn verify_at(&self, code: &str, timestamp: u64) -> bool {
        match self.totp("account") {
            Ok(totp) => totp.check(code, timestamp),
            Err(_) => false,
        }
    }

    /// Produce the valid code for an explicit Unix timestamp
    #[cfg(test)]
    pub(crate) fn generate_at(&self, timestamp: u64) -> String {
        self.totp("account")
            .expect("secret validated at construction")
            .generate(timestamp)
    }

    fn totp(&self, account: &str) -> Result<TOTP, TotpSecretError> {
        let bytes = Secret::Encoded(self.0.clone())
            .to_bytes()
            .map_err(|_| TotpSecretError::InvalidBase32)?;
        TOTP::new(
            Algorithm::SHA1,
            TOTP_DIGITS,
            TOTP_SKEW,
            TOTP_STEP,
            bytes,
            Some(TOTP_ISSUER.to_string()),
            account.to_string(),
        )
        .map_err(|e| TotpSecretError::InvalidSecret(e.to_string()))
    }
}

// Never print the secret itself
impl std::fmt::Debug for TotpSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TotpSecret").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_roundtrip() {
        let secret = TotpSecret::generate();
        let restored = TotpSecret::from_base32(secret.as_base32()).unwrap();
        assert_eq!(secret, restored);
    }

    #[test]
    fn test_invalid_base32_rejected() {
        assert!(TotpSecret::from_base32("not base32 at all!!").is_err());
    }

    #[test]
    fn test_verify_at_accepts_valid_code() {
        let secret = TotpSecret::generate();
        let now = 1_700_000_000;
        let code = secret.generate_at(now);
        assert!(secret.verify_at(&code, now));
    }

    #[test]
    fn test_verify_at_allows_one_step_of_skew() {
        let secret = TotpSecret::generate();
        let now = 1_700_000_000;
        let code = secret.generate_at(now);
        assert!(secret.verify_at(&code, now + TOTP_STEP));
        assert!(!secret.verify_at(&code, now + 3 * TOTP_STEP));
    }

    #[test]
    fn test_verify_rejects_wrong_code() {
        let secret = TotpSecret::generate();
        let now = 1_700_000_000;
        let code = secret.generate_at(now);
        let wrong = if code == "000000" { "000001" } else { "000000" };
        assert!(!secret.verify_at(wrong, now));
    }

    #[test]
    fn test_otpauth_url_contains_issuer_and_account() {
        let secret = TotpSecret::generate();
        let url = secret.otpauth_url("user@example.com").unwrap();
        assert!(url.starts_with("otpauth://totp/"));
        assert!(url.contains("Aegis"));
        assert!(url.contains("user%40example.com"));
    }

    #[test]
    fn test_debug_redacted() {
        let secret = TotpSecret::generate();
        assert!(!format!("{secret:?}").contains(secret.as_base32()));
    }
}
