//! Repository for the `feedback` table.

use crowdsense_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::feedback::{
    AdminFeedback, CreateFeedback, Feedback, FeedbackStats, SpaceFeedback, UserFeedback,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "feedback_id, space_id, user_id, category_id, status, severity, rating, \
                       comment, user_latitude, user_longitude, is_anonymous, device_info, \
                       created_at";

/// Same columns qualified with the `f` alias for joins.
const F_COLUMNS: &str = "f.feedback_id, f.space_id, f.user_id, f.category_id, f.status, \
                         f.severity, f.rating, f.comment, f.user_latitude, f.user_longitude, \
                         f.is_anonymous, f.device_info, f.created_at";

/// Provides insert and read operations for feedback rows.
pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Insert one feedback row, returning it.
    ///
    /// Does not touch the space aggregate; callers pair this with
    /// [`PublicSpaceRepo::apply_new_rating`](super::PublicSpaceRepo::apply_new_rating).
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateFeedback,
    ) -> Result<Feedback, sqlx::Error> {
        let query = format!(
            "INSERT INTO feedback \
                (space_id, user_id, category_id, status, severity, rating, comment, \
                 user_latitude, user_longitude, is_anonymous, device_info) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(input.space_id)
            .bind(input.user_id)
            .bind(input.category_id)
            .bind(&input.status)
            .bind(&input.severity)
            .bind(input.rating)
            .bind(&input.comment)
            .bind(input.user_latitude)
            .bind(input.user_longitude)
            .bind(input.is_anonymous)
            .bind(&input.device_info)
            .fetch_one(&mut *conn)
            .await
    }

    /// Feedback for one space, newest first.
    pub async fn list_for_space(
        pool: &PgPool,
        space_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SpaceFeedback>, sqlx::Error> {
        let query = format!(
            "SELECT {F_COLUMNS}, \
                    CASE WHEN f.is_anonymous THEN NULL ELSE u.username END AS username, \
                    fc.name AS category_name \
             FROM feedback f \
             LEFT JOIN users u ON f.user_id = u.user_id \
             LEFT JOIN feedback_categories fc ON f.category_id = fc.category_id \
             WHERE f.space_id = $1 \
             ORDER BY f.created_at DESC, f.feedback_id \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, SpaceFeedback>(&query)
            .bind(space_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// A user's own feedback with the space it belongs to, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserFeedback>, sqlx::Error> {
        sqlx::query_as::<_, UserFeedback>(
            "SELECT f.feedback_id, f.space_id, s.name AS location, s.space_type, \
                    fc.name AS category_name, f.status, f.rating, f.comment, f.created_at \
             FROM feedback f \
             JOIN public_spaces s ON f.space_id = s.space_id \
             LEFT JOIN feedback_categories fc ON f.category_id = fc.category_id \
             WHERE f.user_id = $1 \
             ORDER BY f.created_at DESC, f.feedback_id \
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Every feedback row with space and submitter names, newest first.
    pub async fn list_all(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AdminFeedback>, sqlx::Error> {
        sqlx::query_as::<_, AdminFeedback>(
            "SELECT f.feedback_id, f.space_id, s.name AS space_name, \
                    COALESCE(u.username, u.email) AS username, \
                    fc.name AS category_name, f.rating, f.comment, f.status, f.severity, \
                    f.created_at \
             FROM feedback f \
             JOIN public_spaces s ON f.space_id = s.space_id \
             LEFT JOIN users u ON f.user_id = u.user_id \
             LEFT JOIN feedback_categories fc ON f.category_id = fc.category_id \
             ORDER BY f.created_at DESC, f.feedback_id \
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Count feedback rows filed against a space.
    pub async fn count_for_space(pool: &PgPool, space_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM feedback WHERE space_id = $1")
            .bind(space_id)
            .fetch_one(pool)
            .await
    }

    /// Totals across the platform.
    pub async fn stats(pool: &PgPool) -> Result<FeedbackStats, sqlx::Error> {
        sqlx::query_as::<_, FeedbackStats>(
            "SELECT \
                (SELECT COUNT(*) FROM public_spaces WHERE is_active = true) AS total_spaces, \
                (SELECT COUNT(*) FROM feedback) AS total_feedback, \
                (SELECT COUNT(*) FROM users) AS total_users",
        )
        .fetch_one(pool)
        .await
    }
}
