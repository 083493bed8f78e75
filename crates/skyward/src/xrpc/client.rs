//! XRPC HTTP client implementation.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::error::{Error, ProtocolError};
use crate::types::PdsUrl;

use super::endpoints::XrpcErrorResponse;

/// Decode an XRPC response body according to its status.
///
/// A 2xx status yields the parsed JSON body, or an empty object when the
/// body is empty or not JSON. Any other status yields a [`ProtocolError`]
/// carrying the body's `error` code and `message`; an unparsable error body
/// degrades to no code and the message `"HTTP <status> error"`.
///
/// ```
/// use skyward::xrpc::decode_response;
///
/// let err = decode_response(500, b"<html>oops</html>").unwrap_err();
/// assert_eq!(err.to_string(), "protocol error: HTTP 500: HTTP 500 error");
/// ```
pub fn decode_response(status: u16, body: &[u8]) -> Result<Value, Error> {
    if (200..300).contains(&status) {
        let value = serde_json::from_slice::<Value>(body)
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        return Ok(value);
    }

    let error_body = serde_json::from_slice::<XrpcErrorResponse>(body).unwrap_or_default();
    let message = error_body
        .message
        .unwrap_or_else(|| format!("HTTP {} error", status));

    Err(ProtocolError::new(status, error_body.error, message).into())
}

/// HTTP client for XRPC requests.
#[derive(Debug, Clone)]
pub(crate) struct XrpcClient {
    client: reqwest::Client,
    pds: PdsUrl,
}

impl XrpcClient {
    /// Create a new XRPC client for the given PDS.
    pub fn new(pds: PdsUrl) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("skyward/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, pds })
    }

    /// Returns the PDS URL this client is configured for.
    pub fn pds(&self) -> &PdsUrl {
        &self.pds
    }

    /// Make an unauthenticated XRPC procedure (POST request).
    #[instrument(skip(self, body), fields(pds = %self.pds))]
    pub async fn procedure<B, R>(&self, method: &str, body: &B) -> Result<R, Error>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.pds.xrpc_url(method);
        debug!(method, %url, "XRPC procedure");

        let response = self.client.post(&url).json(body).send().await?;

        self.handle_response(response).await
    }

    /// Make an authenticated XRPC procedure (POST request) with a JSON body.
    #[instrument(skip(self, body, token), fields(pds = %self.pds))]
    pub async fn procedure_authed<B, R>(
        &self,
        method: &str,
        body: &B,
        token: &str,
    ) -> Result<R, Error>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.pds.xrpc_url(method);
        debug!(method, "XRPC authenticated procedure");

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Make an authenticated XRPC procedure whose body is raw bytes.
    ///
    /// `content_type` is sent verbatim as the request's `Content-Type`.
    #[instrument(skip(self, data, token), fields(pds = %self.pds, size = data.len()))]
    pub async fn procedure_authed_bytes<R>(
        &self,
        method: &str,
        data: Vec<u8>,
        content_type: &str,
        token: &str,
    ) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let url = self.pds.xrpc_url(method);
        debug!(method, content_type, "XRPC authenticated binary procedure");

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle an XRPC response, parsing the body or error.
    async fn handle_response<R: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<R, Error> {
        let status = response.status().as_u16();
        trace!(status, "XRPC response");

        let body = response.bytes().await?;
        let value = decode_response(status, &body)?;

        serde_json::from_value(value).map_err(|e| Error::UnexpectedResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_creation() {
        let pds = PdsUrl::new("https://bsky.social").unwrap();
        let client = XrpcClient::new(pds.clone()).unwrap();
        assert_eq!(client.pds(), &pds);
    }

    #[test]
    fn success_body_is_parsed() {
        let value = decode_response(200, br#"{"uri":"at://x","cid":"bafy"}"#).unwrap();
        assert_eq!(value, json!({"uri": "at://x", "cid": "bafy"}));
    }

    #[test]
    fn empty_or_garbage_success_body_is_empty_object() {
        assert_eq!(decode_response(200, b"").unwrap(), json!({}));
        assert_eq!(decode_response(204, b"not json").unwrap(), json!({}));
    }

    #[test]
    fn error_body_fields_are_extracted() {
        let body = br#"{"error":"InvalidPassword","message":"bad creds"}"#;
        let Err(Error::Protocol(err)) = decode_response(401, body) else {
            panic!("expected protocol error");
        };
        assert_eq!(err.status, 401);
        assert_eq!(err.code.as_deref(), Some("InvalidPassword"));
        assert_eq!(err.message, "bad creds");
    }

    #[test]
    fn unparsable_error_body_gets_synthesized_message() {
        let Err(Error::Protocol(err)) = decode_response(500, b"Internal Server Error") else {
            panic!("expected protocol error");
        };
        assert_eq!(err.status, 500);
        assert_eq!(err.code, None);
        assert_eq!(err.message, "HTTP 500 error");
    }

    #[test]
    fn error_code_without_message() {
        let Err(Error::Protocol(err)) = decode_response(429, br#"{"error":"RateLimitExceeded"}"#)
        else {
            panic!("expected protocol error");
        };
        assert_eq!(err.code.as_deref(), Some("RateLimitExceeded"));
        assert_eq!(err.message, "HTTP 429 error");
    }

    #[test]
    fn redirect_status_is_an_error() {
        assert!(decode_response(302, b"").is_err());
    }
}
