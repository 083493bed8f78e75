//! Token types for AT Protocol authentication.

use std::fmt;

/// An access token (JWT) used as the bearer for authenticated XRPC requests.
///
/// Treated as opaque and never shown in Debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    ///
    /// # Security
    ///
    /// Use only for authorization headers or persistence. Never log it.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

/// A refresh token (JWT) issued alongside the access token.
///
/// Stored with the session but not used by any operation in this crate.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken(String);

impl RefreshToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_hide_value_in_debug() {
        let access = AccessToken::new("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...");
        let refresh = RefreshToken::new("refresh_token_value_here");
        assert!(!format!("{:?}", access).contains("eyJ"));
        assert!(!format!("{:?}", refresh).contains("refresh_token_value"));
        assert!(format!("{:?}", refresh).contains("[REDACTED]"));
    }
}
