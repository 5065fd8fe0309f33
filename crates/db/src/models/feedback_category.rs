//! Feedback category entity model.

use crowdsense_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `feedback_categories` table. Read-only for the API.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FeedbackCategory {
    pub category_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
}
