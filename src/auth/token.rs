//! Opaque bearer tokens.
//!
//! A [`Token`] is never inspected by the client: presence in a scope means
//! the scope is authenticated, absence means it is not.
//!
//! # Security
//!
//! The [`Debug`] implementation masks the token value so stores, prepared
//! requests and sessions can be logged without leaking credentials.
//!
//! ```rust
//! use garage_client::Token;
//!
//! let token = Token::new("eyJhbGciOi").unwrap();
//! assert_eq!(format!("{:?}", token), "Token(*****)");
//! assert_eq!(token.bearer(), "Bearer eyJhbGciOi");
//! ```

use std::fmt;

use crate::error::ConfigError;

/// An opaque credential bound to one scope.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Creates a token from a non-empty string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyToken`] if the value is empty or blank.
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ConfigError::EmptyToken);
        }
        Ok(Self(value))
    }

    /// Returns the raw token value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `Authorization` header value for this token.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(*****)")
    }
}
