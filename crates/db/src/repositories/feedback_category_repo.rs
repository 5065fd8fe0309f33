//! Repository for the `feedback_categories` table (read-only).

use crowdsense_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::feedback_category::FeedbackCategory;

const COLUMNS: &str = "category_id, name, description, is_active, sort_order";

pub struct FeedbackCategoryRepo;

impl FeedbackCategoryRepo {
    /// Active categories in display order.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<FeedbackCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM feedback_categories \
             WHERE is_active = true \
             ORDER BY sort_order, name"
        );
        sqlx::query_as::<_, FeedbackCategory>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<FeedbackCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM feedback_categories WHERE name = $1");
        sqlx::query_as::<_, FeedbackCategory>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Resolve already-normalized labels to category ids by exact name.
    ///
    /// Unknown names are dropped. The result follows the order of `names`.
    pub async fn resolve_ids(
        conn: &mut PgConnection,
        names: &[String],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, (DbId, String)>(
            "SELECT category_id, name FROM feedback_categories WHERE name = ANY($1)",
        )
        .bind(names)
        .fetch_all(&mut *conn)
        .await?;

        Ok(names
            .iter()
            .filter_map(|n| rows.iter().find(|(_, name)| name == n).map(|(id, _)| *id))
            .collect())
    }
}
