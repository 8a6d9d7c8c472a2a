//! Maps gateway errors onto client-visible JSON error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use sluice_core::GatewayError;

/// Client-visible request failure: an HTTP status plus a `{"detail": …}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl From<GatewayError> for ApiError {
    fn from(error: GatewayError) -> Self {
        Self {
            status: status_for(&error),
            detail: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

/// Picks the response status mandated by the error taxonomy.
///
/// Upstream non-success statuses pass through verbatim, falling back to
/// 502 for codes that are not representable.
fn status_for(error: &GatewayError) -> StatusCode {
    match error {
        GatewayError::MissingParameter { .. }
        | GatewayError::ResolutionFailed { .. }
        | GatewayError::NoDownloadableMedia => StatusCode::BAD_REQUEST,
        GatewayError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
        GatewayError::UpstreamStatus { status } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        GatewayError::UpstreamUnreachable { .. } | GatewayError::UpstreamMalformed { .. } => {
            StatusCode::BAD_GATEWAY
        }
    }
}
