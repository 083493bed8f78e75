//! Server-issued blob references.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// An opaque blob reference returned by `com.atproto.repo.uploadBlob`.
///
/// The client never inspects its shape; it is embedded verbatim into
/// image and video embeds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobRef(Value);

impl BlobRef {
    /// Wrap a raw blob value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Extract the `blob` field from a full upload response body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedResponse`] if the field is absent or null.
    pub fn from_upload_response(response: &Value) -> Result<Self, Error> {
        match response.get("blob") {
            Some(blob) if !blob.is_null() => Ok(Self(blob.clone())),
            _ => Err(Error::UnexpectedResponse(
                "upload response has no blob".to_string(),
            )),
        }
    }

    /// Returns the raw JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_blob_verbatim() {
        let response = json!({
            "blob": {
                "$type": "blob",
                "ref": {"$link": "bafkreia"},
                "mimeType": "image/png",
                "size": 1234
            }
        });
        let blob = BlobRef::from_upload_response(&response).unwrap();
        assert_eq!(blob.as_value(), &response["blob"]);
        assert_eq!(serde_json::to_value(&blob).unwrap(), response["blob"]);
    }

    #[test]
    fn missing_blob_is_unexpected() {
        let err = BlobRef::from_upload_response(&json!({})).unwrap_err();
        assert!(matches!(err, Error::UnexpectedResponse(_)));
    }
}
