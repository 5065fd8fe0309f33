//! Public space entity model and DTOs.

use crowdsense_core::space::{Coordinates, SpaceType};
use crowdsense_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `public_spaces` table.
///
/// `total_feedback_count`, `avg_rating` and `last_feedback_at` are the
/// aggregate state maintained by [`PublicSpaceRepo::apply_new_rating`].
///
/// [`PublicSpaceRepo::apply_new_rating`]: crate::repositories::PublicSpaceRepo::apply_new_rating
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PublicSpace {
    pub space_id: DbId,
    pub name: String,
    pub space_type: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub description: Option<String>,
    pub total_feedback_count: i32,
    pub avg_rating: f64,
    pub last_feedback_at: Option<Timestamp>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new space. The name is already resolved.
#[derive(Debug, Clone)]
pub struct CreatePublicSpace {
    pub name: String,
    pub space_type: SpaceType,
    pub coordinates: Coordinates,
    pub address: Option<String>,
    pub description: Option<String>,
}

/// Outcome of resolving a location to a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSpace {
    pub space_id: DbId,
    /// `true` when this call inserted the row.
    pub created: bool,
}
