//! Post records and their embeds.
//!
//! Builders here are pure: they turn caller input into the exact JSON shapes
//! of the `app.bsky.feed.post` lexicon without touching the network.

mod embed;
mod normalize;
mod post;

pub use embed::{Embed, ImageEntry, ImagesEmbed, MAX_IMAGES, VideoEmbed};
pub use normalize::{
    DEFAULT_IMAGE_MIME_TYPE, DEFAULT_LANG, Timestamp, coerce_langs, coerce_timestamp,
    normalize_alts, normalize_mime_types,
};
pub use post::{PostRecord, PostReference, build_post_record};
