//! Core AT Protocol types.
//!
//! These types enforce protocol invariants at construction time,
//! ensuring invalid states are unrepresentable.

mod aspect_ratio;
mod blob;
mod pds_url;

pub use aspect_ratio::AspectRatio;
pub use blob::BlobRef;
pub use pds_url::{DEFAULT_PDS, PdsUrl, normalize_base_url};
