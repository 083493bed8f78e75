//! Image and video embeds.

use serde::Serialize;

use crate::types::{AspectRatio, BlobRef};

/// Maximum number of images a single post may carry.
pub const MAX_IMAGES: usize = 4;

/// The media attached to a post.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "$type")]
pub enum Embed {
    #[serde(rename = "app.bsky.embed.images")]
    Images(ImagesEmbed),
    #[serde(rename = "app.bsky.embed.video")]
    Video(VideoEmbed),
}

/// Up to four images, in display order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImagesEmbed {
    pub images: Vec<ImageEntry>,
}

impl ImagesEmbed {
    /// Pair uploaded blobs with alt texts by position.
    ///
    /// `alts` should already be normalized to the blob count; a shorter list
    /// leaves the remaining images with empty alt text.
    pub fn new(blobs: Vec<BlobRef>, alts: Vec<String>) -> Self {
        let mut alts = alts.into_iter();
        let images = blobs
            .into_iter()
            .map(|image| ImageEntry {
                image,
                alt: alts.next().unwrap_or_default(),
            })
            .collect();
        Self { images }
    }
}

/// One image of an [`ImagesEmbed`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "$type", rename = "app.bsky.embed.images#image")]
pub struct ImageEntry {
    pub image: BlobRef,
    pub alt: String,
}

/// A single video.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoEmbed {
    pub video: BlobRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
}

impl VideoEmbed {
    /// Build a video embed; an empty alt text is omitted entirely.
    pub fn new(video: BlobRef, alt: &str, aspect_ratio: Option<AspectRatio>) -> Self {
        Self {
            video,
            alt: (!alt.is_empty()).then(|| alt.to_string()),
            aspect_ratio,
        }
    }
}

impl From<ImagesEmbed> for Embed {
    fn from(embed: ImagesEmbed) -> Self {
        Embed::Images(embed)
    }
}

impl From<VideoEmbed> for Embed {
    fn from(embed: VideoEmbed) -> Self {
        Embed::Video(embed)
    }
}
