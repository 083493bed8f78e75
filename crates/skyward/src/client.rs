//! The posting client.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::auth::{AccessToken, Credentials, RefreshToken, Session};
use crate::error::{AuthError, Error, InvalidInputError};
use crate::record::{
    Embed, ImagesEmbed, MAX_IMAGES, PostReference, Timestamp, VideoEmbed, build_post_record,
    coerce_langs, coerce_timestamp, normalize_alts, normalize_mime_types,
};
use crate::transcode::{FfmpegTranscoder, Transcoder, transcode_gif};
use crate::types::{AspectRatio, BlobRef, PdsUrl};
use crate::xrpc::{
    CREATE_RECORD, CREATE_SESSION, CreateRecordRequest, CreateRecordResponse, CreateSessionRequest,
    CreateSessionResponse, POST_COLLECTION, UPLOAD_BLOB, XrpcClient,
};

/// MIME type used for videos unless the caller says otherwise.
pub const DEFAULT_VIDEO_MIME_TYPE: &str = "video/mp4";

/// Optional metadata shared by every post operation.
///
/// ```
/// use skyward::PostOptions;
///
/// let opts = PostOptions::new()
///     .langs(["en", "ja"])
///     .created_at("2024-04-01T10:00:00.000Z");
/// ```
#[derive(Clone, Debug, Default)]
pub struct PostOptions {
    /// Target repo; defaults to the session's DID.
    pub repo: Option<String>,
    /// Post languages; `None` means `["en"]`, an empty list means none.
    pub langs: Option<Vec<String>>,
    /// Creation time; `None` means now.
    pub created_at: Option<Timestamp>,
}

impl PostOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    pub fn langs<I, S>(mut self, langs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.langs = Some(langs.into_iter().map(Into::into).collect());
        self
    }

    pub fn created_at(mut self, created_at: impl Into<Timestamp>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }
}

/// A video to attach to a post.
///
/// ```
/// use skyward::{AspectRatio, VideoAttachment};
///
/// # fn example(bytes: Vec<u8>) -> Result<(), skyward::Error> {
/// let video = VideoAttachment::new(bytes)
///     .alt("a cat falling off a sofa")
///     .aspect_ratio(AspectRatio::new(1280, 720)?);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct VideoAttachment {
    pub data: Vec<u8>,
    /// Alt text; empty means no `alt` field.
    pub alt: String,
    pub aspect_ratio: Option<AspectRatio>,
    pub mime_type: String,
}

impl VideoAttachment {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            alt: String::new(),
            aspect_ratio: None,
            mime_type: DEFAULT_VIDEO_MIME_TYPE.to_string(),
        }
    }

    pub fn alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = alt.into();
        self
    }

    pub fn aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = Some(aspect_ratio);
        self
    }

    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }
}

/// A client bound to one PDS, holding at most one session.
///
/// Every call runs sequentially: each request completes before the next one
/// starts. [`Client::login`] takes `&mut self`, so replacing the session
/// while other operations are in flight is impossible without the caller
/// adding its own synchronization (for example a `tokio::sync::Mutex`
/// around the client).
///
/// # Example
///
/// ```no_run
/// use skyward::{Client, Credentials, PostOptions};
///
/// # async fn example() -> Result<(), skyward::Error> {
/// let mut client = Client::new("https://bsky.social")?;
/// client.login(Credentials::new("alice.bsky.social", "app-password")).await?;
///
/// let post = client.send_post("Hello from Rust!", PostOptions::new()).await?;
/// println!("{}", post.uri);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    xrpc: XrpcClient,
    session: Option<Session>,
    transcoder: Arc<dyn Transcoder>,
}

impl Client {
    /// Create a client for the PDS at `base_url`.
    ///
    /// The URL is normalized to end in `/xrpc`; an empty string means
    /// `https://bsky.social`.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::for_pds(PdsUrl::new(base_url)?)
    }

    /// Create a client that may talk plain HTTP to any host.
    ///
    /// See [`PdsUrl::new_insecure`].
    pub fn new_insecure(base_url: &str) -> Result<Self, Error> {
        let pds = PdsUrl::new_insecure(base_url)?;
        if pds.is_plain_http() {
            warn!(%pds, "PDS traffic is not encrypted");
        }
        Self::for_pds(pds)
    }

    fn for_pds(pds: PdsUrl) -> Result<Self, Error> {
        Ok(Self {
            xrpc: XrpcClient::new(pds)?,
            session: None,
            transcoder: Arc::new(FfmpegTranscoder::new()),
        })
    }

    /// Create a client with a previously obtained session.
    ///
    /// The tokens are used as-is; no refresh is attempted.
    pub fn with_session(base_url: &str, session: Session) -> Result<Self, Error> {
        Ok(Self::new(base_url)?.restore_session(session))
    }

    /// Attach a previously obtained session, replacing any current one.
    pub fn restore_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Replace the transcoder used by [`Client::send_gif`].
    pub fn with_transcoder(mut self, transcoder: impl Transcoder + 'static) -> Self {
        self.transcoder = Arc::new(transcoder);
        self
    }

    /// Returns the normalized PDS URL.
    pub fn pds(&self) -> &PdsUrl {
        self.xrpc.pds()
    }

    /// Returns the current session, if logged in.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn require_session(&self) -> Result<&Session, Error> {
        self.session.as_ref().ok_or_else(|| AuthError::NotLoggedIn.into())
    }

    /// Authenticate and make the new session current.
    ///
    /// Any previous session is replaced. Rejected credentials surface as
    /// [`Error::Protocol`], e.g. with code `InvalidPassword` or
    /// `AuthFactorTokenRequired`.
    #[instrument(skip(self, credentials), fields(pds = %self.pds(), identifier = %credentials.identifier()))]
    pub async fn login(&mut self, credentials: Credentials) -> Result<&Session, Error> {
        info!("Creating new session");

        let request = CreateSessionRequest {
            identifier: credentials.identifier(),
            password: credentials.password(),
            auth_factor_token: credentials.auth_factor_token(),
        };

        let response: CreateSessionResponse =
            self.xrpc.procedure(CREATE_SESSION, &request).await?;

        debug!(did = %response.did, handle = %response.handle, "Session created");

        let session = Session::new(
            response.did,
            response.handle,
            AccessToken::new(response.access_jwt),
            RefreshToken::new(response.refresh_jwt),
        );
        let session = self.session.insert(session);
        Ok(&*session)
    }

    /// Create a text-only post.
    #[instrument(skip(self, opts))]
    pub async fn send_post(&self, text: &str, opts: PostOptions) -> Result<PostReference, Error> {
        self.send_post_with_embed(text, None, opts).await
    }

    /// Create a post carrying an already-built embed.
    ///
    /// The record goes to `opts.repo`, or the session's DID when unset.
    /// Server rejections are returned unaltered as [`Error::Protocol`].
    #[instrument(skip(self, embed, opts))]
    pub async fn send_post_with_embed(
        &self,
        text: &str,
        embed: Option<Embed>,
        opts: PostOptions,
    ) -> Result<PostReference, Error> {
        let session = self.require_session()?;
        let repo = opts.repo.as_deref().unwrap_or(session.did());

        let record = build_post_record(
            text,
            coerce_timestamp(opts.created_at),
            coerce_langs(opts.langs),
            embed,
        );

        let request = CreateRecordRequest {
            repo,
            collection: POST_COLLECTION,
            record: &record,
        };

        let response: CreateRecordResponse = self
            .xrpc
            .procedure_authed(CREATE_RECORD, &request, session.access_token().as_str())
            .await?;

        info!(uri = %response.uri, "Post created");
        Ok(PostReference {
            uri: response.uri,
            cid: response.cid,
        })
    }

    /// Upload a blob and return the full decoded response body.
    ///
    /// `content_type` is sent verbatim. There is a single attempt; retrying
    /// is up to the caller. Use [`BlobRef::from_upload_response`] to pull out
    /// the reference.
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn upload_blob(&self, data: &[u8], content_type: &str) -> Result<Value, Error> {
        let session = self.require_session()?;
        self.xrpc
            .procedure_authed_bytes(
                UPLOAD_BLOB,
                data.to_vec(),
                content_type,
                session.access_token().as_str(),
            )
            .await
    }

    /// Post a single image.
    pub async fn send_image(
        &self,
        text: &str,
        image: &[u8],
        alt: &str,
        mime_type: &str,
        opts: PostOptions,
    ) -> Result<PostReference, Error> {
        self.send_images(text, &[image], &[alt], &[mime_type], opts).await
    }

    /// Post one to four images.
    ///
    /// `alts` and `mime_types` are fitted to the image count: missing alts
    /// become empty strings, missing MIME types become `image/jpeg`, and
    /// surplus entries are dropped. Images are uploaded one after another in
    /// input order; the first failed upload aborts the post.
    #[instrument(skip_all, fields(images = images.len()))]
    pub async fn send_images<B, A, M>(
        &self,
        text: &str,
        images: &[B],
        alts: &[A],
        mime_types: &[M],
        opts: PostOptions,
    ) -> Result<PostReference, Error>
    where
        B: AsRef<[u8]>,
        A: AsRef<str>,
        M: AsRef<str>,
    {
        if images.is_empty() {
            return Err(InvalidInputError::NoImages.into());
        }
        if images.len() > MAX_IMAGES {
            return Err(InvalidInputError::TooManyImages {
                count: images.len(),
                max: MAX_IMAGES,
            }
            .into());
        }
        self.require_session()?;

        let alts = normalize_alts(alts, images.len());
        let mime_types = normalize_mime_types(mime_types, images.len());

        let mut blobs = Vec::with_capacity(images.len());
        for (index, (image, mime_type)) in images.iter().zip(&mime_types).enumerate() {
            debug!(index, %mime_type, "Uploading image");
            let response = self.upload_blob(image.as_ref(), mime_type).await?;
            blobs.push(BlobRef::from_upload_response(&response)?);
        }

        let embed = ImagesEmbed::new(blobs, alts);
        self.send_post_with_embed(text, Some(embed.into()), opts).await
    }

    /// Post one to four images with empty alt text, uploaded as `image/jpeg`.
    ///
    /// Shorthand for [`Client::send_images`] with no alts or MIME types.
    pub async fn send_images_with_defaults<B: AsRef<[u8]>>(
        &self,
        text: &str,
        images: &[B],
        opts: PostOptions,
    ) -> Result<PostReference, Error> {
        const NONE: &[&str] = &[];
        self.send_images(text, images, NONE, NONE, opts).await
    }

    /// Post a video.
    #[instrument(skip_all, fields(size = video.data.len(), mime_type = %video.mime_type))]
    pub async fn send_video(
        &self,
        text: &str,
        video: VideoAttachment,
        opts: PostOptions,
    ) -> Result<PostReference, Error> {
        let response = self.upload_blob(&video.data, &video.mime_type).await?;
        let blob = BlobRef::from_upload_response(&response)?;

        let embed = VideoEmbed::new(blob, &video.alt, video.aspect_ratio);
        self.send_post_with_embed(text, Some(embed.into()), opts).await
    }

    /// Post an animated GIF, converted to MP4 first.
    ///
    /// Without an explicit `aspect_ratio` the converted video is probed for
    /// its size; if probing fails the post simply has no aspect ratio.
    /// A failed conversion aborts the post.
    #[instrument(skip_all, fields(size = gif.len()))]
    pub async fn send_gif(
        &self,
        text: &str,
        gif: &[u8],
        alt: &str,
        aspect_ratio: Option<AspectRatio>,
        opts: PostOptions,
    ) -> Result<PostReference, Error> {
        self.require_session()?;

        let transcoded = transcode_gif(self.transcoder.as_ref(), gif, aspect_ratio.is_none()).await?;

        let aspect_ratio = aspect_ratio.or_else(|| {
            let detected = transcoded.dimensions.and_then(|d| d.aspect_ratio());
            if detected.is_none() {
                warn!("could not determine GIF dimensions; posting without aspect ratio");
            }
            detected
        });

        let mut video = VideoAttachment::new(transcoded.video).alt(alt);
        video.aspect_ratio = aspect_ratio;
        self.send_video(text, video, opts).await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("pds", self.xrpc.pds())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_normalizes_base_url() {
        let client = Client::new("https://pds.example.com/").unwrap();
        assert_eq!(client.pds().as_str(), "https://pds.example.com/xrpc");
        assert!(client.session().is_none());
    }

    #[test]
    fn insecure_client_accepts_lan_http() {
        assert!(Client::new("http://pds.internal:2583").is_err());

        let session = Session::new(
            "did:plc:lan",
            "lan.test",
            AccessToken::new("a"),
            RefreshToken::new("r"),
        );
        let client = Client::new_insecure("http://pds.internal:2583")
            .unwrap()
            .restore_session(session);
        assert_eq!(client.pds().as_str(), "http://pds.internal:2583/xrpc");
        assert_eq!(client.session().map(Session::did), Some("did:plc:lan"));
    }

    #[test]
    fn post_options_builder() {
        let opts = PostOptions::new().repo("did:plc:other").langs(["ja"]);
        assert_eq!(opts.repo.as_deref(), Some("did:plc:other"));
        assert_eq!(opts.langs, Some(vec!["ja".to_string()]));
        assert!(opts.created_at.is_none());
    }

    #[test]
    fn video_attachment_defaults_to_mp4() {
        let video = VideoAttachment::new(vec![1, 2, 3]);
        assert_eq!(video.mime_type, "video/mp4");
        assert!(video.alt.is_empty());
        assert!(video.aspect_ratio.is_none());
    }

    #[tokio::test]
    async fn send_post_requires_session() {
        let client = Client::new("https://bsky.social").unwrap();
        let err = client.send_post("hi", PostOptions::new()).await.unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::NotLoggedIn)));
    }

    #[tokio::test]
    async fn image_count_is_checked_before_session() {
        let client = Client::new("https://bsky.social").unwrap();
        let none: [&[u8]; 0] = [];
        let err = client
            .send_images("hi", &none, &[""], &[""], PostOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(InvalidInputError::NoImages)));
    }
}
