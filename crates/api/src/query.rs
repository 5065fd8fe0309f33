//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the handlers via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?limit=` for listings without an offset.
#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

/// `GET /feedback/space-by-location?lat=&lng=&type=`.
///
/// Kept as strings so malformed numbers surface as a 400 with our own
/// message rather than the extractor's rejection text.
#[derive(Debug, Default, Deserialize)]
pub struct LocationParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
    #[serde(rename = "type")]
    pub space_type: Option<String>,
}
