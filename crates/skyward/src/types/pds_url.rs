//! PDS base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// PDS used when the caller supplies an empty base URL.
pub const DEFAULT_PDS: &str = "https://bsky.social";

/// Path segment every XRPC endpoint lives under.
const XRPC_SUFFIX: &str = "/xrpc";

/// Normalize a PDS base URL so it ends in `/xrpc`.
///
/// Surrounding whitespace is trimmed and an empty input becomes
/// [`DEFAULT_PDS`]. A URL already ending in `/xrpc` is returned as-is,
/// otherwise one trailing slash is dropped before the suffix is appended.
/// Applying the function twice gives the same result as applying it once.
///
/// ```
/// use skyward::types::normalize_base_url;
///
/// assert_eq!(normalize_base_url(""), "https://bsky.social/xrpc");
/// assert_eq!(normalize_base_url("https://pds.example/"), "https://pds.example/xrpc");
/// ```
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let base = if trimmed.is_empty() {
        DEFAULT_PDS
    } else {
        trimmed
    };

    if base.ends_with(XRPC_SUFFIX) {
        return base.to_string();
    }

    let base = base.strip_suffix('/').unwrap_or(base);
    format!("{}{}", base, XRPC_SUFFIX)
}

/// A validated, normalized XRPC base URL for a PDS.
///
/// The stored form always ends in `/xrpc`. The URL must be absolute, have a
/// host, and use HTTPS. Plain HTTP is accepted for loopback hosts, or for
/// any host through [`PdsUrl::new_insecure`].
///
/// # Example
///
/// ```
/// use skyward::PdsUrl;
///
/// let pds = PdsUrl::new("https://bsky.social").unwrap();
/// assert_eq!(pds.xrpc_url("com.atproto.server.createSession"),
///            "https://bsky.social/xrpc/com.atproto.server.createSession");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PdsUrl(String);

impl PdsUrl {
    /// Normalize and validate a PDS URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the normalized URL does not parse or is not
    /// an acceptable PDS endpoint.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        Self::parse(s.as_ref(), false)
    }

    /// Like [`PdsUrl::new`], but plain HTTP is accepted for any host.
    ///
    /// Meant for development or LAN servers without TLS.
    ///
    /// ```
    /// use skyward::PdsUrl;
    ///
    /// assert!(PdsUrl::new("http://pds.internal:2583").is_err());
    /// let pds = PdsUrl::new_insecure("http://pds.internal:2583").unwrap();
    /// assert_eq!(pds.as_str(), "http://pds.internal:2583/xrpc");
    /// ```
    pub fn new_insecure(s: impl AsRef<str>) -> Result<Self, Error> {
        Self::parse(s.as_ref(), true)
    }

    fn parse(original: &str, allow_http: bool) -> Result<Self, Error> {
        let normalized = normalize_base_url(original);

        let url = Url::parse(&normalized).map_err(|e| InvalidInputError::PdsUrl {
            value: original.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, original, allow_http)?;

        Ok(Self(normalized))
    }

    /// Returns whether requests go out over plain HTTP.
    pub fn is_plain_http(&self) -> bool {
        self.0.starts_with("http://")
    }

    /// Returns the XRPC endpoint URL for a given method.
    pub fn xrpc_url(&self, method: &str) -> String {
        format!("{}/{}", self.0, method)
    }

    /// Returns the normalized base (ending in `/xrpc`).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(url: &Url, original: &str, allow_http: bool) -> Result<(), Error> {
        let invalid = |reason: &str| -> Error {
            InvalidInputError::PdsUrl {
                value: original.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        if url.cannot_be_a_base() {
            return Err(invalid("must be an absolute URL"));
        }

        let Some(host) = url.host_str() else {
            return Err(invalid("must have a host"));
        };

        let is_loopback = matches!(host, "localhost" | "127.0.0.1" | "[::1]");
        match url.scheme() {
            "https" => Ok(()),
            "http" if is_loopback || allow_http => Ok(()),
            "http" => Err(invalid("must use HTTPS (HTTP allowed only for localhost)")),
            _ => Err(invalid("scheme must be http or https")),
        }
    }
}

impl Default for PdsUrl {
    fn default() -> Self {
        Self(normalize_base_url(DEFAULT_PDS))
    }
}

impl fmt::Display for PdsUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PdsUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for PdsUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PdsUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PdsUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for PdsUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_uses_default_pds() {
        assert_eq!(normalize_base_url(""), "https://bsky.social/xrpc");
        assert_eq!(normalize_base_url("   "), "https://bsky.social/xrpc");
    }

    #[test]
    fn appends_suffix_and_strips_trailing_slash() {
        assert_eq!(
            normalize_base_url("https://pds.example.com"),
            "https://pds.example.com/xrpc"
        );
        assert_eq!(
            normalize_base_url(" https://pds.example.com/ "),
            "https://pds.example.com/xrpc"
        );
        assert_eq!(
            normalize_base_url("https://pds.example.com/xrpc"),
            "https://pds.example.com/xrpc"
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            "",
            " ",
            "https://bsky.social",
            "https://bsky.social/",
            "https://bsky.social//",
            "https://bsky.social/xrpc",
            "https://bsky.social/xrpc/",
            "http://localhost:2583",
            "  https://example.com/base/  ",
        ];
        for input in inputs {
            let once = normalize_base_url(input);
            assert_eq!(normalize_base_url(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn xrpc_url_construction() {
        let pds = PdsUrl::new("https://bsky.social/").unwrap();
        assert_eq!(
            pds.xrpc_url("com.atproto.repo.uploadBlob"),
            "https://bsky.social/xrpc/com.atproto.repo.uploadBlob"
        );
    }

    #[test]
    fn default_is_bsky_social() {
        assert_eq!(PdsUrl::default(), PdsUrl::new("").unwrap());
    }

    #[test]
    fn valid_localhost_http() {
        assert!(PdsUrl::new("http://127.0.0.1:2583").is_ok());
        assert!(PdsUrl::new("http://localhost:2583").is_ok());
    }

    #[test]
    fn invalid_http_non_localhost() {
        assert!(PdsUrl::new("http://bsky.social").is_err());
    }

    #[test]
    fn insecure_accepts_http_on_any_host() {
        let pds = PdsUrl::new_insecure("http://pds.internal:2583").unwrap();
        assert_eq!(pds.as_str(), "http://pds.internal:2583/xrpc");
        assert!(pds.is_plain_http());
        assert!(!PdsUrl::new("https://bsky.social").unwrap().is_plain_http());
    }

    #[test]
    fn insecure_still_rejects_other_schemes_and_relative_urls() {
        assert!(PdsUrl::new_insecure("ftp://pds.internal").is_err());
        assert!(PdsUrl::new_insecure("/just/a/path").is_err());
    }

    #[test]
    fn invalid_relative_url() {
        assert!(PdsUrl::new("/just/a/path").is_err());
    }
}
