//! GIF to video transcoding.
//!
//! Bluesky has no animated-image embed, so GIFs are converted to MP4 and
//! posted as video. The conversion itself is delegated to a [`Transcoder`],
//! which [`FfmpegTranscoder`] implements on top of the `ffmpeg` and
//! `ffprobe` binaries.

mod ffmpeg;
mod gif;

use std::fmt;
use std::path::Path;

use async_trait::async_trait;

use crate::error::TranscodeError;
use crate::types::AspectRatio;

pub use ffmpeg::FfmpegTranscoder;
pub(crate) use gif::transcode_gif;

/// Pixel dimensions of a video stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Round both sides down to the nearest even number.
    ///
    /// H.264 with 4:2:0 chroma subsampling cannot encode odd sides.
    pub fn to_even(self) -> Self {
        Self {
            width: self.width & !1,
            height: self.height & !1,
        }
    }

    /// Convert to an aspect ratio, or `None` if either side is zero.
    pub fn aspect_ratio(self) -> Option<AspectRatio> {
        AspectRatio::new(i64::from(self.width), i64::from(self.height)).ok()
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parse `WIDTHxHEIGHT` as printed by `ffprobe -of csv=s=x:p=0`.
///
/// Returns `None` for anything unparsable or with a zero side.
pub fn parse_dimensions(s: &str) -> Option<Dimensions> {
    let line = s.lines().map(str::trim).find(|l| !l.is_empty())?;
    let (width, height) = line.split_once('x')?;
    let width: u32 = width.trim().parse().ok()?;
    let height: u32 = height.trim().parse().ok()?;
    (width > 0 && height > 0).then_some(Dimensions { width, height })
}

/// The external video transcoder the GIF pipeline drives.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Convert the animated image at `input` into an MP4 at `output`.
    ///
    /// The output must use a broadly playable pixel format and even
    /// width and height.
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError>;

    /// Report the dimensions of the first video stream of `path`, if known.
    async fn probe(&self, path: &Path) -> Option<Dimensions>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_probe_output() {
        assert_eq!(
            parse_dimensions("640x480\n"),
            Some(Dimensions {
                width: 640,
                height: 480
            })
        );
        assert_eq!(
            parse_dimensions("\n 320x240 \n"),
            Some(Dimensions {
                width: 320,
                height: 240
            })
        );
    }

    #[test]
    fn rejects_garbage_and_zero_sides() {
        assert_eq!(parse_dimensions(""), None);
        assert_eq!(parse_dimensions("N/A"), None);
        assert_eq!(parse_dimensions("640x"), None);
        assert_eq!(parse_dimensions("0x480"), None);
        assert_eq!(parse_dimensions("-2x480"), None);
    }

    #[test]
    fn rounds_down_to_even() {
        let dims = Dimensions {
            width: 401,
            height: 301,
        };
        assert_eq!(
            dims.to_even(),
            Dimensions {
                width: 400,
                height: 300
            }
        );
    }

    #[test]
    fn single_pixel_side_has_no_aspect_ratio() {
        let dims = Dimensions {
            width: 1,
            height: 300,
        }
        .to_even();
        assert_eq!(dims.aspect_ratio(), None);
    }
}
