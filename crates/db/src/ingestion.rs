//! Feedback ingestion: one validated submission in, one or more rows out.
//!
//! The whole workflow runs in a single transaction:
//!
//! 1. Resolve the location to a space (insert if new).
//! 2. Resolve issue labels to category ids, dropping unknown labels.
//! 3. Insert one row per matched category, or a single uncategorized row.
//! 4. Fold the rating into the space aggregate, per [`AggregateMode`].
//!
//! Any failure rolls back every step; dropping the transaction on an error
//! path releases the connection back to the pool.

use crowdsense_core::feedback::{DeviceInfo, FeedbackSubmission, DEFAULT_SEVERITY, DEFAULT_STATUS};
use crowdsense_core::rating::AggregateMode;
use crowdsense_core::types::DbId;
use sqlx::PgPool;

use crate::models::feedback::{CreateFeedback, Feedback};
use crate::repositories::{FeedbackCategoryRepo, FeedbackRepo, PublicSpaceRepo};

/// Everything needed to persist one submission.
#[derive(Debug, Clone)]
pub struct FeedbackInput<'a> {
    pub user_id: DbId,
    pub submission: &'a FeedbackSubmission,
    pub device_info: &'a DeviceInfo,
}

/// What a successful submission wrote.
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub space_id: DbId,
    /// `true` when this submission created the space.
    pub space_created: bool,
    /// The inserted rows, in category order.
    pub entries: Vec<Feedback>,
    /// How many times the rating was folded into the aggregate.
    pub aggregate_updates: usize,
}

/// Persist a validated submission atomically.
pub async fn submit_feedback(
    pool: &PgPool,
    input: &FeedbackInput<'_>,
    mode: AggregateMode,
) -> Result<SubmissionReceipt, sqlx::Error> {
    let submission = input.submission;
    let device_info =
        serde_json::to_value(input.device_info).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

    let mut tx = pool.begin().await?;

    let space = PublicSpaceRepo::resolve(
        &mut *tx,
        &submission.coordinates,
        submission.space_type,
        &submission.details,
    )
    .await?;

    let category_ids = FeedbackCategoryRepo::resolve_ids(&mut *tx, &submission.issues).await?;
    let targets: Vec<Option<DbId>> = if category_ids.is_empty() {
        vec![None]
    } else {
        category_ids.into_iter().map(Some).collect()
    };

    let updates = mode.updates_for(targets.len());
    let mut entries = Vec::with_capacity(targets.len());

    for (i, category_id) in targets.into_iter().enumerate() {
        let row = CreateFeedback {
            space_id: space.space_id,
            user_id: input.user_id,
            category_id,
            status: DEFAULT_STATUS.to_string(),
            severity: DEFAULT_SEVERITY.to_string(),
            rating: submission.rating,
            comment: submission.comment.clone(),
            user_latitude: Some(submission.coordinates.lat),
            user_longitude: Some(submission.coordinates.lng),
            is_anonymous: false,
            device_info: device_info.clone(),
        };
        entries.push(FeedbackRepo::create(&mut *tx, &row).await?);

        if i < updates
            && !PublicSpaceRepo::apply_new_rating(&mut *tx, space.space_id, submission.rating)
                .await?
        {
            return Err(sqlx::Error::RowNotFound);
        }
    }

    tx.commit().await?;

    tracing::debug!(
        space_id = %space.space_id,
        space_created = space.created,
        entries = entries.len(),
        aggregate_updates = updates,
        "Feedback submission persisted"
    );

    Ok(SubmissionReceipt {
        space_id: space.space_id,
        space_created: space.created,
        entries,
        aggregate_updates: updates,
    })
}
