//! Error types for the skyward library.
//!
//! Failures fall into three families that callers usually want to treat
//! differently: local precondition failures ([`Error::Auth`],
//! [`Error::InvalidInput`]), server-reported failures ([`Error::Protocol`]),
//! and failures of the collaborators the library drives (transport and the
//! GIF transcoder).

use std::fmt;
use thiserror::Error;

/// The unified error type for skyward operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The PDS answered with a non-2xx status.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Client-side authentication preconditions.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Input rejected before any request was made.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// GIF to video transcoding failed.
    #[error("transcoding error: {0}")]
    Transcode(#[from] TranscodeError),

    /// A successful response did not carry what the operation needs.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// Authentication preconditions checked locally.
#[derive(Debug, Error)]
pub enum AuthError {
    /// An authenticated operation was attempted before `login`.
    #[error("no active session; log in first")]
    NotLoggedIn,
}

/// An error reported by the PDS.
///
/// Built from any non-2xx XRPC response. `code` is the server's machine
/// readable error name (for example `InvalidPassword`), and `message` falls
/// back to `"HTTP <status> error"` when the body has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// XRPC error code, if the body carried one.
    pub code: Option<String>,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref code) = self.code {
            write!(f, " [{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, code: Option<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401
            || matches!(
                self.code.as_deref(),
                Some("AuthenticationRequired" | "ExpiredToken" | "InvalidToken" | "InvalidPassword")
            )
    }

    /// The server wants a second factor (emailed token) to complete login.
    pub fn is_auth_factor_required(&self) -> bool {
        self.code.as_deref() == Some("AuthFactorTokenRequired")
    }

    /// The request was rejected by rate limiting.
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429 || self.code.as_deref() == Some("RateLimitExceeded")
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// `send_images` was called with nothing to attach.
    #[error("at least one image is required")]
    NoImages,

    /// More images than a single post may carry.
    #[error("too many images: {count} (a post holds at most {max})")]
    TooManyImages { count: usize, max: usize },

    /// Aspect ratio sides must be positive.
    #[error("invalid aspect ratio {width}x{height}: both sides must be at least 1")]
    AspectRatio { width: i64, height: i64 },

    /// Invalid PDS URL.
    #[error("invalid PDS URL '{value}': {reason}")]
    PdsUrl { value: String, reason: String },
}

/// Failures of the external transcoder.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// The transcoder binary could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The transcoder ran and exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    /// Reading or writing the transient files failed.
    #[error("transient file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_error_display_includes_code() {
        let err = ProtocolError::new(401, Some("InvalidPassword".into()), "bad creds");
        assert_eq!(err.to_string(), "HTTP 401 [InvalidPassword]: bad creds");
    }

    #[test]
    fn protocol_error_display_without_code() {
        let err = ProtocolError::new(500, None, "HTTP 500 error");
        assert_eq!(err.to_string(), "HTTP 500: HTTP 500 error");
    }

    #[test]
    fn classifies_auth_factor_and_rate_limit() {
        let factor = ProtocolError::new(401, Some("AuthFactorTokenRequired".into()), "check email");
        assert!(factor.is_auth_factor_required());
        assert!(factor.is_auth_error());

        let limited = ProtocolError::new(429, Some("RateLimitExceeded".into()), "slow down");
        assert!(limited.is_rate_limited());
        assert!(!limited.is_auth_error());
    }
}
