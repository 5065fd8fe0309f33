//! Limit/offset clamping shared by every paginated listing.

/// Default page size for a space's feedback history.
pub const DEFAULT_FEEDBACK_PAGE: i64 = 10;

/// Largest page of feedback rows a client may request.
pub const MAX_FEEDBACK_PAGE: i64 = 100;

/// Default number of spaces returned by the map listing.
pub const DEFAULT_SPACE_LIMIT: i64 = 100;

/// Largest number of spaces the map listing returns.
pub const MAX_SPACE_LIMIT: i64 = 500;

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
