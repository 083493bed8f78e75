//! XRPC endpoint definitions and request/response types.

use serde::{Deserialize, Serialize};

// ============================================================================
// Endpoint Names
// ============================================================================

/// com.atproto.server.createSession
pub const CREATE_SESSION: &str = "com.atproto.server.createSession";

/// com.atproto.repo.createRecord
pub const CREATE_RECORD: &str = "com.atproto.repo.createRecord";

/// com.atproto.repo.uploadBlob
pub const UPLOAD_BLOB: &str = "com.atproto.repo.uploadBlob";

/// Collection that posts are written to.
pub const POST_COLLECTION: &str = "app.bsky.feed.post";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for createSession.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateSessionRequest<'a> {
    pub identifier: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_factor_token: Option<&'a str>,
}

/// Response from createSession.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateSessionResponse {
    pub did: String,
    pub handle: String,
    pub access_jwt: String,
    pub refresh_jwt: String,
}

/// Request body for createRecord.
#[derive(Debug, Serialize)]
pub(crate) struct CreateRecordRequest<'a, R> {
    pub repo: &'a str,
    pub collection: &'a str,
    pub record: &'a R,
}

/// Response from createRecord.
#[derive(Debug, Deserialize)]
pub(crate) struct CreateRecordResponse {
    pub uri: String,
    pub cid: String,
}

/// XRPC error response format.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct XrpcErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
