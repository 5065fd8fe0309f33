//! User entity model and DTOs.

use crowdsense_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: DbId,
    pub email: String,
    pub username: Option<String>,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_active: bool,
    pub is_email_verified: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

/// Profile fields a user can see and edit about themselves.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Row shape for the admin user listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminUserRow {
    pub user_id: DbId,
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub role: String,
    pub created_at: Timestamp,
    pub last_login: Option<Timestamp>,
    /// `"active"` or `"inactive"`.
    pub status: String,
}

/// Outcome of [`UserRepo::change_role`](crate::repositories::UserRepo::change_role).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChange {
    Updated,
    NotFound,
    /// The target is the only remaining admin and the new role would demote it.
    LastAdmin,
}
