//! Streaming relay for resolved media URLs.
//!
//! Opens a streaming GET against the media host and re-exposes the body
//! as an ordered chunk stream without buffering it in memory. Dropping
//! the stream closes the upstream connection, so abandoning iteration
//! mid-body (client disconnect) releases the connection as well.

use std::pin::Pin;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tracing::debug;
use url::Url;

use crate::config::UpstreamConfig;
use crate::error::GatewayError;

/// Upper bound on a single relayed chunk.
const MAX_CHUNK_SIZE: usize = 64 * 1024; // 64 KiB

/// Fallback when the media host omits a Content-Type header.
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Attachment name used when the caller provides none.
const DEFAULT_ATTACHMENT_NAME: &str = "video";

/// Ordered media chunks pulled from the upstream connection.
pub type ByteChunks = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Open upstream media response ready to be relayed to a client.
pub struct MediaStream {
    /// Content type advertised by the media host
    pub content_type: String,
    /// Non-empty chunks in arrival order, each at most 64 KiB
    pub chunks: ByteChunks,
}

impl std::fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStream")
            .field("content_type", &self.content_type)
            .field("chunks", &"<stream>")
            .finish()
    }
}

/// Streaming proxy that relays a remote media body to clients.
///
/// Request-scoped like the resolver: each `open` call owns exactly one
/// upstream connection and never retries, since a retry would corrupt an
/// already-partially-delivered body.
#[derive(Debug, Clone)]
pub struct StreamRelay {
    client: reqwest::Client,
}

impl StreamRelay {
    /// Creates a relay whose connect phase honors the configured timeout.
    ///
    /// No overall body timeout is applied - relayed downloads may take
    /// arbitrary time.
    ///
    /// # Panics
    /// Panics if the `reqwest::Client` builder fails to build.
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .connect_timeout(config.stream_timeout)
                .user_agent(config.user_agent)
                .build()
                .expect("HTTP client creation should not fail"),
        }
    }

    /// Opens a streaming GET against `media_url`.
    ///
    /// # Errors
    /// - `GatewayError::UpstreamUnreachable` - Invalid URL or connection failure
    /// - `GatewayError::UpstreamTimeout` - Connection timed out
    /// - `GatewayError::UpstreamStatus` - Media host answered with a non-success status
    pub async fn open(&self, media_url: &str) -> Result<MediaStream, GatewayError> {
        let url = Url::parse(media_url).map_err(|e| GatewayError::UpstreamUnreachable {
            reason: format!("invalid media URL: {e}"),
        })?;
        debug!("Opening media stream for {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(GatewayError::from_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        // A mid-stream upstream failure surfaces as an error item, which
        // terminates the client response without fabricating data.
        let chunks = response
            .bytes_stream()
            .flat_map(|item| {
                let pieces: Vec<Result<Bytes, std::io::Error>> = match item {
                    Ok(chunk) => split_chunk(chunk).into_iter().map(Ok).collect(),
                    Err(e) => vec![Err(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        e.to_string(),
                    ))],
                };
                futures::stream::iter(pieces)
            })
            .boxed();

        Ok(MediaStream {
            content_type,
            chunks,
        })
    }
}

/// Splits an upstream frame into relay-sized pieces, dropping empties.
///
/// Splitting is zero-copy; frames are never coalesced, so the first
/// chunk reaches the client as soon as upstream produces it.
fn split_chunk(mut chunk: Bytes) -> Vec<Bytes> {
    let mut pieces = Vec::new();
    while chunk.len() > MAX_CHUNK_SIZE {
        pieces.push(chunk.split_to(MAX_CHUNK_SIZE));
    }
    if !chunk.is_empty() {
        pieces.push(chunk);
    }
    pieces
}

/// Builds a safe attachment filename for forced downloads.
///
/// Trims whitespace, replaces path separators, and appends `.mp4` unless
/// the name already carries a recognized video extension.
pub fn attachment_filename(requested: Option<&str>) -> String {
    let trimmed = requested
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_ATTACHMENT_NAME);

    let mut name = trimmed.replace(['/', '\\'], "-");
    if !has_video_extension(&name) {
        name.push_str(".mp4");
    }
    name
}

/// Whether the filename extension already maps to a video mime type.
fn has_video_extension(name: &str) -> bool {
    mime_guess::from_path(name)
        .first()
        .is_some_and(|mime| mime.type_() == mime_guess::mime::VIDEO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_frames_are_split_in_order() {
        let frame = Bytes::from(
            (0..(MAX_CHUNK_SIZE * 2 + 10))
                .map(|i| (i % 251) as u8)
                .collect::<Vec<_>>(),
        );
        let original = frame.clone();

        let pieces = split_chunk(frame);
        assert_eq!(pieces.len(), 3);
        assert!(pieces.iter().all(|p| p.len() <= MAX_CHUNK_SIZE));
        assert_eq!(pieces[2].len(), 10);

        let reassembled: Vec<u8> = pieces.iter().flat_map(|p| p.iter().copied()).collect();
        assert_eq!(reassembled, original);
    }

    #[test]
    fn small_frames_pass_through_untouched() {
        let pieces = split_chunk(Bytes::from_static(b"abc"));
        assert_eq!(pieces, vec![Bytes::from_static(b"abc")]);
    }

    #[test]
    fn empty_frames_are_discarded() {
        assert!(split_chunk(Bytes::new()).is_empty());
    }

    #[test]
    fn plain_names_get_an_mp4_suffix() {
        assert_eq!(attachment_filename(Some("my video")), "my video.mp4");
    }

    #[test]
    fn path_separators_are_replaced() {
        assert_eq!(attachment_filename(Some("a/b")), "a-b.mp4");
        assert_eq!(attachment_filename(Some("a\\b")), "a-b.mp4");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(attachment_filename(Some("  clip  ")), "clip.mp4");
    }

    #[test]
    fn missing_or_blank_names_get_the_default() {
        assert_eq!(attachment_filename(None), "video.mp4");
        assert_eq!(attachment_filename(Some("   ")), "video.mp4");
    }

    #[test]
    fn recognized_video_extensions_are_kept() {
        assert_eq!(attachment_filename(Some("clip.mp4")), "clip.mp4");
        assert_eq!(attachment_filename(Some("clip.webm")), "clip.webm");
    }

    #[test]
    fn non_video_extensions_still_get_mp4() {
        assert_eq!(attachment_filename(Some("notes.txt")), "notes.txt.mp4");
    }
}
