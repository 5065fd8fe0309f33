//! Route definitions for the `/feedback` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::feedback;
use crate::state::AppState;

/// Routes mounted at `/feedback`.
///
/// ```text
/// POST /                     -> submit (requires auth)
/// GET  /categories           -> list_categories
/// GET  /spaces               -> list_spaces
/// GET  /space/{id}           -> list_space_feedback
/// GET  /space-by-location    -> space_by_location
/// GET  /mine                 -> list_mine (requires auth)
/// GET  /admin/all            -> admin_list_all (admin only)
/// GET  /admin/stats          -> admin_stats (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(feedback::submit))
        .route("/categories", get(feedback::list_categories))
        .route("/spaces", get(feedback::list_spaces))
        .route("/space/{id}", get(feedback::list_space_feedback))
        .route("/space-by-location", get(feedback::space_by_location))
        .route("/mine", get(feedback::list_mine))
        .route("/admin/all", get(feedback::admin_list_all))
        .route("/admin/stats", get(feedback::admin_stats))
}
