pub mod admin;
pub mod auth;
pub mod feedback;
pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                      signup (public)
/// /auth/signin                      signin (public)
/// /auth/verify                      verify token (requires auth)
///
/// /users/profile                    get, update own profile (requires auth)
///
/// /admin/users                      list users (admin only)
/// /admin/users/{id}/role            change role (admin only)
/// /admin/users/{id}/status          activate / deactivate (admin only)
///
/// /feedback                         submit (requires auth)
/// /feedback/categories              active categories
/// /feedback/spaces                  active spaces
/// /feedback/space/{id}              feedback for one space
/// /feedback/space-by-location       exact-match space lookup
/// /feedback/mine                    caller's own feedback (requires auth)
/// /feedback/admin/all               all feedback (admin only)
/// /feedback/admin/stats             platform totals (admin only)
///
/// /health                           service and database health
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/admin", admin::router())
        .nest("/feedback", feedback::router())
        .merge(health::router())
}
