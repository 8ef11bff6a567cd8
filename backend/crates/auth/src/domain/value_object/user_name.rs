//! User Name Value Object

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Maximum username length in Unicode code points
const MAX_USER_NAME_LENGTH: usize = 64;

/// Username validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("Username cannot be empty")]
    Empty,

    #[error("Username must be at most {MAX_USER_NAME_LENGTH} characters")]
    TooLong,

    #[error("Username contains invalid characters")]
    InvalidCharacter,
}

/// Validated display/login name
///
/// Normalized with NFKC and trimmed; interior whitespace is allowed but
/// control characters are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    pub fn new(raw: impl Into<String>) -> Result<Self, UserNameError> {
        let normalized: String = raw.into().nfkc().collect::<String>().trim().to_string();

        if normalized.is_empty() {
            return Err(UserNameError::Empty);
        }
        if normalized.chars().count() > MAX_USER_NAME_LENGTH {
            return Err(UserNameError::TooLong);
        }
        if normalized.chars().any(|c| c.is_control()) {
            return Err(UserNameError::InvalidCharacter);
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
