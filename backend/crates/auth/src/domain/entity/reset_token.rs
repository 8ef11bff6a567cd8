//! Password-Reset Token Entity
//!
//! One token per email at most; issuing a new one replaces the old.
//! Lifecycle: issued -> verified -> consumed (row deleted). A token past
//! its expiry can no longer be verified; expiry is checked against the
//! stored deadline at verification time.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::{Email, ResetOtp};

/// How long a reset code stays valid, in seconds
pub const RESET_TOKEN_TTL_SECS: i64 = 600;

/// How long a reset code stays valid
pub fn reset_token_ttl() -> Duration {
    Duration::seconds(RESET_TOKEN_TTL_SECS)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetToken {
    pub email: Email,
    pub otp: ResetOtp,
    pub expires_at: DateTime<Utc>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl ResetToken {
    /// Issue a fresh token for an email, valid for [`reset_token_ttl`]
    pub fn issue(email: Email, otp: ResetOtp, now: DateTime<Utc>) -> Self {
        Self {
            email,
            otp,
            expires_at: now + reset_token_ttl(),
            verified: false,
            created_at: now,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Outcome of checking a candidate code at a point in time
    pub fn check(&self, candidate: &str, now: DateTime<Utc>) -> ResetOtpCheck {
        if self.verified {
            ResetOtpCheck::AlreadyUsed
        } else if self.is_expired(now) {
            ResetOtpCheck::Expired
        } else if self.otp.matches(candidate) {
            ResetOtpCheck::Valid
        } else {
            ResetOtpCheck::Mismatch
        }
    }
}

/// Result of [`ResetToken::check`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOtpCheck {
    Valid,
    Mismatch,
    Expired,
    AlreadyUsed,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_at(now: DateTime<Utc>) -> ResetToken {
        ResetToken::issue(
            Email::new("user@example.com").unwrap(),
            ResetOtp::parse("123456").unwrap(),
            now,
        )
    }

    #[test]
    fn test_valid_within_ttl() {
        let now = Utc::now();
        let token = token_at(now);
        let check = token.check("123456", now + Duration::minutes(9));
        assert_eq!(check, ResetOtpCheck::Valid);
    }

    #[test]
    fn test_mismatch() {
        let now = Utc::now();
        let token = token_at(now);
        assert_eq!(token.check("654321", now), ResetOtpCheck::Mismatch);
    }

    #[test]
    fn test_expired_after_ttl() {
        let now = Utc::now();
        let token = token_at(now);
        let later = now + reset_token_ttl() + Duration::seconds(1);
        assert_eq!(token.check("123456", later), ResetOtpCheck::Expired);
    }

    #[test]
    fn test_boundary_is_still_valid() {
        let now = Utc::now();
        let token = token_at(now);
        assert_eq!(token.check("123456", token.expires_at), ResetOtpCheck::Valid);
    }

    #[test]
    fn test_already_used() {
        let now = Utc::now();
        let mut token = token_at(now);
        token.verified = true;
        assert_eq!(token.check("123456", now), ResetOtpCheck::AlreadyUsed);
    }

    #[test]
    fn test_used_takes_precedence_over_expiry() {
        let now = Utc::now();
        let mut token = token_at(now);
        token.verified = true;
        let later = now + reset_token_ttl() + Duration::minutes(5);
        assert_eq!(token.check("123456", later), ResetOtpCheck::AlreadyUsed);
    }
}
