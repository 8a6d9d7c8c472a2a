//! TikTok metadata resolution via the tikwm.com API.
//!
//! Translates a source video URL into a normalized result with a direct
//! media URL, applying quality fallback chains to the upstream payload.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::error::GatewayError;

/// Title substituted when upstream omits one.
const TITLE_PLACEHOLDER: &str = "TikTok Video";

/// Fallback detail when upstream rejects a URL without a message.
const GENERIC_FAILURE: &str = "Invalid response";

/// Metadata resolver translating a TikTok URL into normalized media info.
///
/// Stateless and request-scoped: every call issues exactly one upstream
/// request, with no retries and no caching. Repeated calls for the same
/// URL may legitimately return different signed media URLs.
#[derive(Debug, Clone)]
pub struct MediaResolver {
    client: reqwest::Client,
    api_base: String,
}

/// Envelope wrapping every tikwm.com API response.
#[derive(Debug, Clone, Deserialize)]
struct UpstreamEnvelope {
    code: Option<i64>,
    msg: Option<String>,
    data: Option<UpstreamMedia>,
}

/// Per-video payload inside a successful envelope.
#[derive(Debug, Clone, Deserialize)]
struct UpstreamMedia {
    title: Option<String>,
    cover: Option<String>,
    origin_cover: Option<String>,
    dynamic_cover: Option<String>,
    hdplay: Option<String>,
    play: Option<String>,
    wmplay: Option<String>,
    author: Option<serde_json::Value>,
    duration: Option<f64>,
}

/// Normalized resolution result returned to API clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedMedia {
    /// Video title, placeholder when upstream omits one
    pub title: String,
    /// Preferred cover image, if any
    pub thumbnail_url: Option<String>,
    /// Direct media URL chosen by the quality fallback chain
    pub download_url: String,
    /// Opaque author object passed through from upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<serde_json::Value>,
    /// Duration in seconds as reported by upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl MediaResolver {
    /// Creates a resolver with the configured timeout and user agent.
    ///
    /// # Panics
    /// Panics if the `reqwest::Client` builder fails to build.
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(config.resolve_timeout)
                .user_agent(config.user_agent)
                .build()
                .expect("HTTP client creation should not fail"),
            api_base: config.api_base.clone(),
        }
    }

    /// Resolves a TikTok video URL into normalized media metadata.
    ///
    /// # Errors
    /// - `GatewayError::UpstreamTimeout` - Metadata API did not answer in time
    /// - `GatewayError::UpstreamUnreachable` - Connection to the metadata API failed
    /// - `GatewayError::UpstreamStatus` - Metadata API answered with a non-success status
    /// - `GatewayError::UpstreamMalformed` - Response body was not valid JSON
    /// - `GatewayError::ResolutionFailed` - Metadata API reported a logical failure
    /// - `GatewayError::NoDownloadableMedia` - No playable URL in the payload
    pub async fn resolve(&self, source_url: &str) -> Result<ResolvedMedia, GatewayError> {
        let request_url = format!("{}?url={}", self.api_base, urlencoding::encode(source_url));
        debug!("Requesting metadata for {source_url}");

        let response = self
            .client
            .get(&request_url)
            .send()
            .await
            .map_err(GatewayError::from_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let envelope: UpstreamEnvelope =
            response
                .json()
                .await
                .map_err(|e| GatewayError::UpstreamMalformed {
                    reason: format!("JSON decoding failed: {e}"),
                })?;

        normalize(envelope)
    }
}

/// Applies the envelope checks and field fallback chains.
fn normalize(envelope: UpstreamEnvelope) -> Result<ResolvedMedia, GatewayError> {
    if envelope.code != Some(0) {
        return Err(GatewayError::ResolutionFailed {
            message: envelope.msg.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        });
    }

    let Some(media) = envelope.data else {
        return Err(GatewayError::ResolutionFailed {
            message: envelope.msg.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        });
    };

    let title = media
        .title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| TITLE_PLACEHOLDER.to_string());

    let thumbnail_url = first_non_empty([media.cover, media.origin_cover, media.dynamic_cover]);

    // Highest quality first, watermarked copy as last resort.
    let download_url = first_non_empty([media.hdplay, media.play, media.wmplay])
        .ok_or(GatewayError::NoDownloadableMedia)?;

    Ok(ResolvedMedia {
        title,
        thumbnail_url,
        download_url,
        author: media.author,
        duration: media.duration,
    })
}

/// First candidate that is present and non-empty.
fn first_non_empty<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
}
