//! The `app.bsky.feed.post` record.

use serde::{Deserialize, Serialize};

use super::embed::Embed;

/// A post record as sent to `com.atproto.repo.createRecord`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "$type", rename = "app.bsky.feed.post", rename_all = "camelCase")]
pub struct PostRecord {
    pub text: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub langs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<Embed>,
}

/// Assemble a post record from already-normalized metadata.
///
/// `langs` is emitted only when non-empty and `embed` only when present.
pub fn build_post_record(
    text: impl Into<String>,
    created_at: impl Into<String>,
    langs: Vec<String>,
    embed: Option<Embed>,
) -> PostRecord {
    PostRecord {
        text: text.into(),
        created_at: created_at.into(),
        langs,
        embed,
    }
}

/// Where a newly created post lives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReference {
    /// AT URI of the record.
    pub uri: String,
    /// Content identifier of the record.
    pub cid: String,
}
