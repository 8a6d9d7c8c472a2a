//! Streaming endpoints relaying media bytes to clients.
//!
//! Both endpoints share the relay; they differ only in whether the
//! response carries a forced-download disposition.

use std::collections::HashMap;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use sluice_core::attachment_filename;
use sluice_core::relay::MediaStream;
use tracing::{debug, warn};

use super::error::ApiError;
use super::resolve::required_param;
use crate::server::AppState;

/// GET `/api/stream` - relay the media body inline.
///
/// # Errors
/// Returns the mapped gateway error when the parameter is missing or the
/// upstream connection cannot be opened.
pub async fn api_stream(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let url = required_param(&params, "url")?;
    let media = open_relay(&state, url).await?;
    Ok(relay_response(media, None))
}

/// GET `/api/download` - relay the media body as a forced download.
///
/// # Errors
/// Returns the mapped gateway error when the parameter is missing or the
/// upstream connection cannot be opened.
pub async fn api_download(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let url = required_param(&params, "url")?;
    let filename = attachment_filename(params.get("filename").map(String::as_str));
    let media = open_relay(&state, url).await?;
    Ok(relay_response(media, Some(&filename)))
}

async fn open_relay(state: &AppState, url: &str) -> Result<MediaStream, ApiError> {
    debug!("Opening relay stream for {url}");
    state.relay.open(url).await.map_err(|error| {
        warn!("Relay open failed for {url}: {error}");
        ApiError::from(error)
    })
}

/// Assembles the streaming response, optionally in attachment mode.
fn relay_response(media: MediaStream, attachment: Option<&str>) -> Response {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, &media.content_type);

    if let Some(filename) = attachment {
        builder = builder.header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        );
    }

    builder
        .body(Body::from_stream(media.chunks))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
