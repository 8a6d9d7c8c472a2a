//! Error types for gateway operations.

use thiserror::Error;

/// Errors that can occur while resolving or relaying media.
///
/// Every failure is terminal for the request that produced it; nothing
/// is retried internally.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A required request parameter was missing or empty.
    #[error("Missing required parameter: {name}")]
    MissingParameter {
        /// Name of the missing parameter
        name: &'static str,
    },

    /// The upstream service could not be reached.
    #[error("Upstream request failed: {reason}")]
    UpstreamUnreachable {
        /// The reason the connection failed
        reason: String,
    },

    /// The upstream service did not answer within the configured timeout.
    #[error("Timed out waiting for upstream")]
    UpstreamTimeout,

    /// The upstream service answered with a non-success HTTP status.
    #[error("Upstream returned HTTP {status}")]
    UpstreamStatus {
        /// Status code reported by upstream
        status: u16,
    },

    /// The upstream response body could not be decoded.
    #[error("Malformed upstream response: {reason}")]
    UpstreamMalformed {
        /// The reason decoding failed
        reason: String,
    },

    /// The upstream service reported a logical resolution failure.
    #[error("{message}")]
    ResolutionFailed {
        /// Upstream-supplied message, or a fixed fallback
        message: String,
    },

    /// Resolution succeeded but produced nothing playable.
    #[error("No downloadable media found for this URL")]
    NoDownloadableMedia,
}

impl GatewayError {
    /// Classifies an outbound request failure into timeout vs. unreachable.
    pub(crate) fn from_request_error(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            GatewayError::UpstreamTimeout
        } else {
            GatewayError::UpstreamUnreachable {
                reason: error.to_string(),
            }
        }
    }
}
