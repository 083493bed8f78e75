//! Post command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use skyward::record::DEFAULT_IMAGE_MIME_TYPE;
use skyward::{AspectRatio, PostOptions, VideoAttachment};

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct PostArgs {
    /// Post text
    pub text: String,

    /// Attach an image (repeat for up to 4)
    #[arg(long = "image", value_name = "PATH", conflicts_with_all = ["video", "gif"])]
    pub images: Vec<PathBuf>,

    /// Alt text, one per image in order; for --video/--gif the first is used
    #[arg(long = "alt", value_name = "TEXT")]
    pub alts: Vec<String>,

    /// Attach a video
    #[arg(long, value_name = "PATH", conflicts_with = "gif")]
    pub video: Option<PathBuf>,

    /// Attach an animated GIF (converted to MP4 with ffmpeg)
    #[arg(long, value_name = "PATH")]
    pub gif: Option<PathBuf>,

    /// Video aspect ratio as WIDTHxHEIGHT
    #[arg(long, value_name = "WxH", value_parser = parse_aspect_ratio)]
    pub aspect_ratio: Option<AspectRatio>,

    /// Post language (repeatable, defaults to en)
    #[arg(long = "lang", value_name = "CODE", conflicts_with = "no_lang")]
    pub langs: Vec<String>,

    /// Do not tag the post with any language
    #[arg(long)]
    pub no_lang: bool,

    /// Repo to write to (defaults to your DID)
    #[arg(long)]
    pub repo: Option<String>,

    /// Creation timestamp, passed through as-is (defaults to now)
    #[arg(long)]
    pub created_at: Option<String>,

    /// Print the post reference as JSON
    #[arg(long)]
    pub json: bool,
}

impl PostArgs {
    fn options(&self) -> PostOptions {
        let mut opts = PostOptions::new();
        if let Some(repo) = &self.repo {
            opts = opts.repo(repo);
        }
        if self.no_lang {
            opts = opts.langs(Vec::<String>::new());
        } else if !self.langs.is_empty() {
            opts = opts.langs(self.langs.iter().cloned());
        }
        if let Some(created_at) = &self.created_at {
            opts = opts.created_at(created_at.as_str());
        }
        opts
    }

    fn media_alt(&self) -> &str {
        self.alts.first().map(String::as_str).unwrap_or("")
    }
}

pub async fn run(args: PostArgs) -> Result<()> {
    let client = storage::require_client()?;
    let opts = args.options();

    let post = if !args.images.is_empty() {
        let mut images = Vec::with_capacity(args.images.len());
        let mut mime_types = Vec::with_capacity(args.images.len());
        for path in &args.images {
            let mime_type = image_mime_type(path);
            debug!(path = %path.display(), mime_type, "Attaching image");
            images.push(read(path).await?);
            mime_types.push(mime_type);
        }

        client
            .send_images(&args.text, &images, &args.alts, &mime_types, opts)
            .await
            .context("Failed to post images")?
    } else if let Some(path) = &args.video {
        let mut video = VideoAttachment::new(read(path).await?)
            .alt(args.media_alt())
            .mime_type(video_mime_type(path));
        video.aspect_ratio = args.aspect_ratio;

        client
            .send_video(&args.text, video, opts)
            .await
            .context("Failed to post video")?
    } else if let Some(path) = &args.gif {
        let gif = read(path).await?;

        client
            .send_gif(&args.text, &gif, args.media_alt(), args.aspect_ratio, opts)
            .await
            .context("Failed to post GIF")?
    } else {
        client
            .send_post(&args.text, opts)
            .await
            .context("Failed to post")?
    };

    if args.json {
        output::json(&post)?;
    } else {
        println!("{}", post.uri);
        output::success(&format!("Posted: {}", post.cid));
    }

    Ok(())
}

async fn read(path: &Path) -> Result<Vec<u8>> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    debug!(path = %path.display(), size = data.len(), "Read media file");
    Ok(data)
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

fn image_mime_type(path: &Path) -> &'static str {
    match extension(path).as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => DEFAULT_IMAGE_MIME_TYPE,
    }
}

fn video_mime_type(path: &Path) -> &'static str {
    match extension(path).as_str() {
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mpeg" | "mpg" => "video/mpeg",
        _ => "video/mp4",
    }
}

fn parse_aspect_ratio(s: &str) -> Result<AspectRatio, String> {
    let (width, height) = s
        .split_once(['x', 'X', ':'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let width: i64 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width '{}'", width))?;
    let height: i64 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height '{}'", height))?;
    AspectRatio::new(width, height).map_err(|e| e.to_string())
}
