//! `ffmpeg`/`ffprobe` backed transcoder.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::error::TranscodeError;

use super::{Dimensions, Transcoder, parse_dimensions};

/// Scale filter that truncates both sides to even numbers.
const EVEN_SCALE_FILTER: &str = "scale=trunc(iw/2)*2:trunc(ih/2)*2";

/// Transcoder that shells out to `ffmpeg` and `ffprobe`.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl FfmpegTranscoder {
    /// Use `ffmpeg` and `ffprobe` from `PATH`.
    pub fn new() -> Self {
        Self::with_binaries("ffmpeg", "ffprobe")
    }

    /// Use explicit binary locations.
    pub fn with_binaries(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    fn transcode_args(input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-y", "-loglevel", "error", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(input.into());
        args.extend(
            [
                "-movflags",
                "+faststart",
                "-pix_fmt",
                "yuv420p",
                "-vf",
                EVEN_SCALE_FILTER,
                "-c:v",
                "libx264",
                "-an",
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(output.into());
        args
    }

    fn probe_args(path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height",
            "-of",
            "csv=s=x:p=0",
        ]
        .into_iter()
        .map(OsString::from)
        .collect();
        args.push(path.into());
        args
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    #[instrument(skip(self))]
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        let program = self.ffmpeg.display().to_string();
        debug!(%program, "Transcoding GIF to MP4");

        let result = Command::new(&self.ffmpeg)
            .args(Self::transcode_args(input, output))
            .output()
            .await
            .map_err(|source| TranscodeError::Spawn {
                program: program.clone(),
                source,
            })?;

        if result.status.success() {
            Ok(())
        } else {
            Err(TranscodeError::Failed {
                program,
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            })
        }
    }

    #[instrument(skip(self))]
    async fn probe(&self, path: &Path) -> Option<Dimensions> {
        let result = Command::new(&self.ffprobe)
            .args(Self::probe_args(path))
            .output()
            .await;

        match result {
            Ok(output) if output.status.success() => {
                parse_dimensions(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(output) => {
                warn!(status = %output.status, "ffprobe failed");
                None
            }
            Err(e) => {
                warn!(error = %e, "could not run ffprobe");
                None
            }
        }
    }
}
