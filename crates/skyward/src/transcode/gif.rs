//! Transient-file plumbing around a [`Transcoder`] run.

use std::io;

use tracing::{debug, warn};

use crate::error::TranscodeError;

use super::{Dimensions, Transcoder};

const SCRATCH_PREFIX: &str = "skyward-gif-";

/// Output of a GIF conversion.
#[derive(Debug)]
pub(crate) struct TranscodedGif {
    pub video: Vec<u8>,
    /// Even-rounded stream size, when probing was requested and succeeded.
    pub dimensions: Option<Dimensions>,
}

/// Convert GIF bytes to MP4 bytes through a scratch directory.
///
/// The scratch directory and both files in it are removed on every exit
/// path. Transcoder failures propagate; probe failures leave `dimensions`
/// empty.
pub(crate) async fn transcode_gif(
    transcoder: &dyn Transcoder,
    gif: &[u8],
    probe: bool,
) -> Result<TranscodedGif, TranscodeError> {
    let scratch =
        tokio::task::spawn_blocking(|| tempfile::Builder::new().prefix(SCRATCH_PREFIX).tempdir())
            .await
            .map_err(io::Error::other)??;
    let input = scratch.path().join("input.gif");
    let output = scratch.path().join("output.mp4");

    let result = async {
        tokio::fs::write(&input, gif).await?;
        transcoder.transcode(&input, &output).await?;
        let video = tokio::fs::read(&output).await?;

        let dimensions = if probe {
            transcoder.probe(&output).await.map(Dimensions::to_even)
        } else {
            None
        };

        debug!(
            gif_size = gif.len(),
            video_size = video.len(),
            ?dimensions,
            "GIF transcoded"
        );
        Ok::<_, TranscodeError>(TranscodedGif { video, dimensions })
    }
    .await;

    let scratch_path = scratch.path().to_path_buf();
    let removed = tokio::task::spawn_blocking(move || scratch.close())
        .await
        .map_err(io::Error::other)
        .and_then(|closed| closed);
    if let Err(e) = removed {
        warn!(path = %scratch_path.display(), error = %e, "failed to remove GIF scratch directory");
    }

    result
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Copies the input to the output and remembers where it ran.
    #[derive(Default)]
    struct CopyTranscoder {
        seen: Mutex<Option<PathBuf>>,
    }

    #[async_trait]
    impl Transcoder for CopyTranscoder {
        async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
            *self.seen.lock().unwrap() = Some(input.to_path_buf());
            tokio::fs::copy(input, output).await?;
            Ok(())
        }

        async fn probe(&self, _path: &Path) -> Option<Dimensions> {
            Some(Dimensions {
                width: 641,
                height: 480,
            })
        }
    }

    #[tokio::test]
    async fn scratch_directory_is_created_and_removed() {
        let transcoder = CopyTranscoder::default();

        let out = transcode_gif(&transcoder, b"GIF89a", true).await.unwrap();
        assert_eq!(out.video, b"GIF89a");
        assert_eq!(
            out.dimensions,
            Some(Dimensions {
                width: 640,
                height: 480
            })
        );

        let input = transcoder.seen.lock().unwrap().clone().unwrap();
        let scratch = input.parent().unwrap();
        let name = scratch.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with(SCRATCH_PREFIX), "unexpected scratch dir {name}");
        assert!(!scratch.exists());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn works_on_multi_thread_runtime() {
        let out = transcode_gif(&CopyTranscoder::default(), b"GIF89a", false)
            .await
            .unwrap();
        assert_eq!(out.video, b"GIF89a");
        assert!(out.dimensions.is_none());
    }
}
