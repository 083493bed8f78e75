//! skyward - Bluesky posting over the AT Protocol
//!
//! This library logs in to a PDS and creates `app.bsky.feed.post` records,
//! optionally with up to four images, a video, or an animated GIF (converted
//! to MP4 through an external transcoder).
//!
//! # Example
//!
//! ```no_run
//! use skyward::{Client, Credentials, PostOptions};
//!
//! # async fn example(photo: Vec<u8>) -> Result<(), skyward::Error> {
//! let mut client = Client::new("https://bsky.social")?;
//! client.login(Credentials::new("alice.bsky.social", "app-password")).await?;
//!
//! let post = client
//!     .send_image("Sunset", &photo, "orange sky over the sea", "image/jpeg", PostOptions::new())
//!     .await?;
//! println!("{} {}", post.uri, post.cid);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod record;
pub mod transcode;
pub mod types;
pub mod xrpc;

// Re-export primary types at crate root for convenience
pub use auth::{AccessToken, Credentials, RefreshToken, Session};
pub use client::{Client, PostOptions, VideoAttachment};
pub use error::{Error, ProtocolError};
pub use record::{Embed, PostRecord, PostReference, Timestamp};
pub use transcode::{Dimensions, FfmpegTranscoder, Transcoder};
pub use types::{AspectRatio, BlobRef, PdsUrl};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
