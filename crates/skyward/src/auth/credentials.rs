//! Login credentials type.

use std::fmt;

/// Login credentials for `com.atproto.server.createSession`.
///
/// Holds the identifier (handle, DID or email), the password (an app
/// password is recommended), and an optional second-factor token for
/// accounts with email two-factor authentication enabled.
///
/// # Security
///
/// The password and factor token are never exposed in Debug output.
///
/// # Example
///
/// ```
/// use skyward::Credentials;
///
/// let creds = Credentials::new("alice.bsky.social", "app-password-here")
///     .with_auth_factor_token("ABCDE-12345");
/// assert_eq!(creds.identifier(), "alice.bsky.social");
/// ```
#[derive(Clone)]
pub struct Credentials {
    identifier: String,
    password: String,
    auth_factor_token: Option<String>,
}

impl Credentials {
    /// Create new credentials.
    ///
    /// # Arguments
    ///
    /// * `identifier` - A handle (e.g., "alice.bsky.social"), DID, or email
    /// * `password` - The account password or an app password
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
            auth_factor_token: None,
        }
    }

    /// Attach the emailed second-factor token.
    pub fn with_auth_factor_token(mut self, token: impl Into<String>) -> Self {
        self.auth_factor_token = Some(token.into());
        self
    }

    /// Returns the identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    pub(crate) fn auth_factor_token(&self) -> Option<&str> {
        self.auth_factor_token.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"[REDACTED]")
            .field(
                "auth_factor_token",
                &self.auth_factor_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
