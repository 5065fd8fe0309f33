//! Repository for the `public_spaces` table.
//!
//! Holds the two write paths of the ingestion workflow: resolving a location
//! to a space (insert-once, never update) and folding a rating into the
//! space's running mean.

use crowdsense_core::space::{resolve_space_name, Coordinates, SpaceDetails, SpaceType};
use crowdsense_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::public_space::{CreatePublicSpace, PublicSpace, ResolvedSpace};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "space_id, name, space_type, latitude, longitude, address, description, \
                       total_feedback_count, avg_rating, last_feedback_at, is_active, \
                       created_at, updated_at";

/// Provides lookup, resolution, and aggregate maintenance for spaces.
pub struct PublicSpaceRepo;

impl PublicSpaceRepo {
    /// Find a space by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PublicSpace>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM public_spaces WHERE space_id = $1");
        sqlx::query_as::<_, PublicSpace>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Exact-match lookup on `(latitude, longitude, space_type)`.
    pub async fn find_by_location(
        pool: &PgPool,
        coords: &Coordinates,
        space_type: SpaceType,
    ) -> Result<Option<PublicSpace>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM public_spaces \
             WHERE latitude = $1 AND longitude = $2 AND space_type = $3"
        );
        sqlx::query_as::<_, PublicSpace>(&query)
            .bind(coords.lat)
            .bind(coords.lng)
            .bind(space_type.as_str())
            .fetch_optional(pool)
            .await
    }

    /// List active spaces, most recent feedback first, spaces without
    /// feedback last.
    pub async fn list_active(pool: &PgPool, limit: i64) -> Result<Vec<PublicSpace>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM public_spaces \
             WHERE is_active = true \
             ORDER BY last_feedback_at DESC NULLS LAST, updated_at DESC \
             LIMIT $1"
        );
        sqlx::query_as::<_, PublicSpace>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Map a location to a space id, creating the space if it does not exist.
    ///
    /// An existing space is returned untouched even if `details` differ from
    /// what was stored: the first submission for a location names it.
    /// Concurrent first submissions for the same triple converge on one row
    /// through `uq_public_spaces_location`.
    pub async fn resolve(
        conn: &mut PgConnection,
        coords: &Coordinates,
        space_type: SpaceType,
        details: &SpaceDetails,
    ) -> Result<ResolvedSpace, sqlx::Error> {
        if let Some(space_id) = Self::find_id_by_location(conn, coords, space_type).await? {
            return Ok(ResolvedSpace { space_id, created: false });
        }

        let input = CreatePublicSpace {
            name: resolve_space_name(details.name.as_deref(), space_type, coords),
            space_type,
            coordinates: *coords,
            address: details.address.clone(),
            description: details.description.clone(),
        };
        if let Some(space_id) = Self::insert_if_absent(conn, &input).await? {
            return Ok(ResolvedSpace { space_id, created: true });
        }

        // Lost the race to a concurrent insert; its row is committed by now.
        let space_id = Self::find_id_by_location(conn, coords, space_type)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        Ok(ResolvedSpace { space_id, created: false })
    }

    /// Insert a space unless one already exists for the same triple.
    ///
    /// Returns `None` when the unique constraint suppressed the insert.
    pub async fn insert_if_absent(
        conn: &mut PgConnection,
        input: &CreatePublicSpace,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO public_spaces (name, space_type, latitude, longitude, address, description) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT ON CONSTRAINT uq_public_spaces_location DO NOTHING \
             RETURNING space_id",
        )
        .bind(&input.name)
        .bind(input.space_type.as_str())
        .bind(input.coordinates.lat)
        .bind(input.coordinates.lng)
        .bind(&input.address)
        .bind(&input.description)
        .fetch_optional(&mut *conn)
        .await
    }

    /// Fold one rating into the space's running mean.
    ///
    /// Computed in a single statement against the row's current values so
    /// concurrent updates serialize on the row lock instead of overwriting
    /// each other. Returns `false` if the space does not exist.
    pub async fn apply_new_rating(
        conn: &mut PgConnection,
        space_id: DbId,
        rating: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE public_spaces SET \
                avg_rating = CASE \
                    WHEN total_feedback_count = 0 THEN $2 \
                    ELSE (avg_rating * total_feedback_count + $2) / (total_feedback_count + 1) \
                END, \
                total_feedback_count = total_feedback_count + 1, \
                last_feedback_at = NOW(), \
                updated_at = NOW() \
             WHERE space_id = $1",
        )
        .bind(space_id)
        .bind(f64::from(rating))
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_id_by_location(
        conn: &mut PgConnection,
        coords: &Coordinates,
        space_type: SpaceType,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT space_id FROM public_spaces \
             WHERE latitude = $1 AND longitude = $2 AND space_type = $3",
        )
        .bind(coords.lat)
        .bind(coords.lng)
        .bind(space_type.as_str())
        .fetch_optional(&mut *conn)
        .await
    }
}
