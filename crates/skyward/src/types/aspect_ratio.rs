//! Aspect ratio type for video embeds.

use serde::Serialize;
use std::fmt;

use crate::error::{Error, InvalidInputError};

/// Width and height of a video, as declared in `app.bsky.embed.defs#aspectRatio`.
///
/// Both sides are at least 1; anything else is rejected by [`AspectRatio::new`].
///
/// # Example
///
/// ```
/// use skyward::AspectRatio;
///
/// let ratio = AspectRatio::new(1920, 1080).unwrap();
/// assert_eq!(ratio.width(), 1920);
/// assert!(AspectRatio::new(0, 10).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "$type", rename = "app.bsky.embed.defs#aspectRatio")]
pub struct AspectRatio {
    width: u32,
    height: u32,
}

impl AspectRatio {
    /// Create an aspect ratio, rejecting non-positive sides.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::AspectRatio`] if either side is below 1
    /// or does not fit in a `u32`.
    pub fn new(width: i64, height: i64) -> Result<Self, Error> {
        let side = |v: i64| u32::try_from(v).ok().filter(|v| *v >= 1);
        match (side(width), side(height)) {
            (Some(width), Some(height)) => Ok(Self { width, height }),
            _ => Err(InvalidInputError::AspectRatio { width, height }.into()),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_non_positive_sides() {
        assert!(AspectRatio::new(0, 10).is_err());
        assert!(AspectRatio::new(10, -1).is_err());
        assert!(AspectRatio::new(-5, -5).is_err());
        assert!(AspectRatio::new(i64::from(u32::MAX) + 1, 10).is_err());
    }

    #[test]
    fn accepts_unit_sides() {
        let ratio = AspectRatio::new(1, 1).unwrap();
        assert_eq!((ratio.width(), ratio.height()), (1, 1));
    }

    #[test]
    fn serializes_with_type_tag() {
        let ratio = AspectRatio::new(640, 360).unwrap();
        assert_eq!(
            serde_json::to_value(ratio).unwrap(),
            json!({
                "$type": "app.bsky.embed.defs#aspectRatio",
                "width": 640,
                "height": 360
            })
        );
    }
}
