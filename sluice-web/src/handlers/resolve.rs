//! Resolution endpoint translating TikTok URLs into media metadata.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Query, State};
use sluice_core::GatewayError;
use sluice_core::resolve::ResolvedMedia;
use tracing::{debug, warn};

use super::error::ApiError;
use crate::server::AppState;

/// GET `/api/tiktok` - resolve a TikTok URL into normalized metadata.
///
/// # Errors
/// Returns the mapped gateway error when the parameter is missing or
/// upstream resolution fails.
pub async fn api_resolve(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ResolvedMedia>, ApiError> {
    let url = required_param(&params, "url")?;

    debug!("Resolving media metadata for {url}");
    let resolved = state.resolver.resolve(url).await.map_err(|error| {
        warn!("Resolution failed for {url}: {error}");
        ApiError::from(error)
    })?;

    Ok(Json(resolved))
}

/// Extracts a required, non-empty query parameter.
pub(super) fn required_param<'a>(
    params: &'a HashMap<String, String>,
    name: &'static str,
) -> Result<&'a str, ApiError> {
    params
        .get(name)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::from(GatewayError::MissingParameter { name }))
}
