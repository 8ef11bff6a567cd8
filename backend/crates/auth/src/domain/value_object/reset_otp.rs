//! Password-Reset One-Time Code

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of digits in a reset code
pub const RESET_OTP_DIGITS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResetOtpError {
    #[error("Reset code must be exactly {RESET_OTP_DIGITS} digits")]
    InvalidFormat,
}

/// Six-digit numeric one-time code for password reset
///
/// Kept as a zero-padded string so leading zeros survive storage and
/// comparison. Comparison against user input is constant-time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResetOtp(String);

impl ResetOtp {
    /// Draw a fresh code from the OS RNG
    pub fn generate() -> Self {
        let value = platform::crypto::random_below(1_000_000);
        Self(format!("{value:06}"))
    }

    /// Parse a stored or user-supplied code
    pub fn parse(raw: impl Into<String>) -> Result<Self, ResetOtpError> {
        let raw = raw.into();
        if raw.len() != RESET_OTP_DIGITS || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ResetOtpError::InvalidFormat);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Constant-time comparison against a candidate code
    pub fn matches(&self, candidate: &str) -> bool {
        platform::crypto::constant_time_eq(self.0.as_bytes(), candidate.as_bytes())
    }
}

impl fmt::Display for ResetOtp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_six_digits() {
        for _ in 0..100 {
            let otp = ResetOtp::generate();
            assert_eq!(otp.as_str().len(), RESET_OTP_DIGITS);
            assert!(otp.as_str().bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_leading_zeros_preserved() {
        let otp = ResetOtp::parse("004217").unwrap();
        assert_eq!(otp.as_str(), "004217");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(ResetOtp::parse("12345").is_err());
        assert!(ResetOtp::parse("1234567").is_err());
        assert!(ResetOtp::parse("12a456").is_err());
        assert!(ResetOtp::parse("").is_err());
    }

    #[test]
    fn test_matches() {
        let otp = ResetOtp::parse("123456").unwrap();
        assert!(otp.matches("123456"));
        assert!(!otp.matches("123457"));
        assert!(!otp.matches("12345"));
    }
}
