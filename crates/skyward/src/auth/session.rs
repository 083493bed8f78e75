//! The session returned by a successful login.

use std::fmt;

use super::tokens::{AccessToken, RefreshToken};

/// Identity and token pair returned by `com.atproto.server.createSession`.
///
/// A session is immutable. It is not refreshed automatically; when the
/// access token expires the caller logs in again (or restores a newer
/// session through [`Client::with_session`](crate::Client::with_session)).
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    did: String,
    handle: String,
    access_token: AccessToken,
    refresh_token: RefreshToken,
}

impl Session {
    /// Assemble a session from its parts, e.g. when restoring persisted tokens.
    pub fn new(
        did: impl Into<String>,
        handle: impl Into<String>,
        access_token: AccessToken,
        refresh_token: RefreshToken,
    ) -> Self {
        Self {
            did: did.into(),
            handle: handle.into(),
            access_token,
            refresh_token,
        }
    }

    /// The account DID; also the default repo for new records.
    pub fn did(&self) -> &str {
        &self.did
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }

    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &RefreshToken {
        &self.refresh_token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("did", &self.did)
            .field("handle", &self.handle)
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}
