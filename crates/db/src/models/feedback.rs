//! Feedback entity model, DTOs, and read projections.

use crowdsense_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `feedback` table. Immutable once written.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Feedback {
    pub feedback_id: DbId,
    pub space_id: DbId,
    pub user_id: DbId,
    /// `None` means uncategorized.
    pub category_id: Option<DbId>,
    pub status: String,
    pub severity: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub user_latitude: Option<f64>,
    pub user_longitude: Option<f64>,
    pub is_anonymous: bool,
    pub device_info: serde_json::Value,
    pub created_at: Timestamp,
}

/// DTO for inserting one feedback row.
#[derive(Debug, Clone)]
pub struct CreateFeedback {
    pub space_id: DbId,
    pub user_id: DbId,
    pub category_id: Option<DbId>,
    pub status: String,
    pub severity: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub user_latitude: Option<f64>,
    pub user_longitude: Option<f64>,
    pub is_anonymous: bool,
    pub device_info: serde_json::Value,
}

/// Feedback listed under a space, with submitter and category names.
///
/// `username` is `None` for anonymous entries and for submitters without a
/// username. The email address is never exposed here.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SpaceFeedback {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub feedback: Feedback,
    pub username: Option<String>,
    pub category_name: Option<String>,
}

/// The caller's own feedback with the space it was filed against.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserFeedback {
    pub feedback_id: DbId,
    pub space_id: DbId,
    pub location: String,
    #[serde(rename = "type")]
    pub space_type: String,
    pub category_name: Option<String>,
    pub status: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

/// Admin view of a feedback row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminFeedback {
    pub feedback_id: DbId,
    pub space_id: DbId,
    pub space_name: String,
    pub username: Option<String>,
    pub category_name: Option<String>,
    pub rating: i32,
    pub comment: Option<String>,
    pub status: String,
    pub severity: String,
    pub created_at: Timestamp,
}

/// Platform-wide totals for the admin overview.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct FeedbackStats {
    pub total_spaces: i64,
    pub total_feedback: i64,
    pub total_users: i64,
}
