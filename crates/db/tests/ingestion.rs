//! Integration tests for the transactional feedback ingestion workflow.

use assert_matches::assert_matches;
use crowdsense_core::feedback::{DeviceInfo, FeedbackSubmission};
use crowdsense_core::rating::AggregateMode;
use crowdsense_core::space::{Coordinates, SpaceDetails, SpaceType};
use crowdsense_core::types::DbId;
use crowdsense_db::ingestion::{submit_feedback, FeedbackInput, SubmissionReceipt};
use crowdsense_db::models::user::CreateUser;
use crowdsense_db::repositories::{FeedbackCategoryRepo, FeedbackRepo, PublicSpaceRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_user(pool: &PgPool, email: &str) -> DbId {
    let input = CreateUser {
        email: email.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        role: "user".to_string(),
    };
    UserRepo::create(pool, &input).await.unwrap().user_id
}

fn submission(rating: i32, issues: &[&str]) -> FeedbackSubmission {
    FeedbackSubmission {
        coordinates: Coordinates::new(6.9271, 79.8612).unwrap(),
        space_type: SpaceType::Park,
        details: SpaceDetails::default(),
        rating,
        issues: issues.iter().map(|s| s.to_string()).collect(),
        comment: Some("Needs more bins".to_string()),
    }
}

async fn submit(
    pool: &PgPool,
    user_id: DbId,
    sub: &FeedbackSubmission,
    mode: AggregateMode,
) -> Result<SubmissionReceipt, sqlx::Error> {
    let device_info = DeviceInfo {
        user_agent: Some("integration-test".into()),
        platform: Some("\"Linux\"".into()),
    };
    let input = FeedbackInput {
        user_id,
        submission: sub,
        device_info: &device_info,
    };
    submit_feedback(pool, &input, mode).await
}

async fn table_count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// First feedback creates the space; a second reuses it.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_first_and_second_submission_for_new_location(pool: PgPool) {
    let user = create_user(&pool, "first@test.com").await;

    let first = submit(&pool, user, &submission(4, &[]), AggregateMode::PerEntry)
        .await
        .unwrap();
    assert!(first.space_created);
    assert_eq!(first.entries.len(), 1);

    let space = PublicSpaceRepo::find_by_id(&pool, first.space_id).await.unwrap().unwrap();
    assert_eq!(space.total_feedback_count, 1);
    assert_eq!(space.avg_rating, 4.0);

    let second = submit(&pool, user, &submission(2, &[]), AggregateMode::PerEntry)
        .await
        .unwrap();
    assert!(!second.space_created);
    assert_eq!(second.space_id, first.space_id);

    let space = PublicSpaceRepo::find_by_id(&pool, first.space_id).await.unwrap().unwrap();
    assert_eq!(space.total_feedback_count, 2);
    assert_eq!(space.avg_rating, 3.0);
    assert_eq!(table_count(&pool, "public_spaces").await, 1);
}

/// Two matched categories produce two rows and, per entry, two aggregate folds.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_multi_category_fan_out_counts_each_entry(pool: PgPool) {
    let user = create_user(&pool, "fanout@test.com").await;

    let receipt = submit(
        &pool,
        user,
        &submission(5, &["cleanliness", "safety"]),
        AggregateMode::PerEntry,
    )
    .await
    .unwrap();

    assert_eq!(receipt.entries.len(), 2);
    assert_eq!(receipt.aggregate_updates, 2);
    assert_eq!(FeedbackRepo::count_for_space(&pool, receipt.space_id).await.unwrap(), 2);

    let cleanliness = FeedbackCategoryRepo::find_by_name(&pool, "cleanliness")
        .await
        .unwrap()
        .unwrap();
    let safety = FeedbackCategoryRepo::find_by_name(&pool, "safety").await.unwrap().unwrap();
    assert_eq!(receipt.entries[0].category_id, Some(cleanliness.category_id));
    assert_eq!(receipt.entries[1].category_id, Some(safety.category_id));
    for entry in &receipt.entries {
        assert_eq!(entry.rating, 5);
        assert_eq!(entry.comment.as_deref(), Some("Needs more bins"));
        assert_eq!(entry.status, "mixed");
        assert_eq!(entry.severity, "medium");
        assert_eq!(entry.user_latitude, Some(6.9271));
        assert_eq!(entry.device_info["userAgent"], "integration-test");
    }

    let space = PublicSpaceRepo::find_by_id(&pool, receipt.space_id).await.unwrap().unwrap();
    assert_eq!(space.total_feedback_count, 2);
    assert_eq!(space.avg_rating, 5.0);
}

/// With per-submission folding the count moves by one regardless of fan-out.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_per_submission_mode_folds_once(pool: PgPool) {
    let user = create_user(&pool, "once@test.com").await;

    let receipt = submit(
        &pool,
        user,
        &submission(3, &["cleanliness", "safety", "crowding"]),
        AggregateMode::PerSubmission,
    )
    .await
    .unwrap();

    assert_eq!(receipt.entries.len(), 3);
    assert_eq!(receipt.aggregate_updates, 1);
    let space = PublicSpaceRepo::find_by_id(&pool, receipt.space_id).await.unwrap().unwrap();
    assert_eq!(space.total_feedback_count, 1);
    assert_eq!(space.avg_rating, 3.0);
}

/// Unknown labels are dropped silently and yield one uncategorized row.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unmatched_issue_falls_back_to_uncategorized(pool: PgPool) {
    let user = create_user(&pool, "unmatched@test.com").await;

    let receipt = submit(&pool, user, &submission(2, &["nonexistent_tag"]), AggregateMode::PerEntry)
        .await
        .unwrap();

    assert_eq!(receipt.entries.len(), 1);
    assert_eq!(receipt.entries[0].category_id, None);
}

/// A mix of known and unknown labels keeps only the known ones.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_partial_match_keeps_known_categories(pool: PgPool) {
    let user = create_user(&pool, "partial@test.com").await;

    let receipt = submit(
        &pool,
        user,
        &submission(1, &["bogus", "maintenance"]),
        AggregateMode::PerEntry,
    )
    .await
    .unwrap();

    assert_eq!(receipt.entries.len(), 1);
    assert!(receipt.entries[0].category_id.is_some());
}

/// A failure after the space insert rolls the whole submission back.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_insert_rolls_back_space_creation(pool: PgPool) {
    // No such user: the feedback insert violates the foreign key.
    let ghost = uuid::Uuid::new_v4();

    let result = submit(&pool, ghost, &submission(4, &["safety"]), AggregateMode::PerEntry).await;

    assert_matches!(
        result,
        Err(sqlx::Error::Database(ref e)) if e.code().as_deref() == Some("23503")
    );
    assert_eq!(table_count(&pool, "public_spaces").await, 0);
    assert_eq!(table_count(&pool, "feedback").await, 0);
}

/// Concurrent first submissions for the same location converge on one space.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_first_submissions_share_one_space(pool: PgPool) {
    let user = create_user(&pool, "race@test.com").await;
    let a = submission(5, &[]);
    let b = submission(1, &[]);

    let (ra, rb) = tokio::join!(
        submit(&pool, user, &a, AggregateMode::PerEntry),
        submit(&pool, user, &b, AggregateMode::PerEntry),
    );
    let (ra, rb) = (ra.unwrap(), rb.unwrap());

    assert_eq!(ra.space_id, rb.space_id);
    assert_eq!(table_count(&pool, "public_spaces").await, 1);

    let space = PublicSpaceRepo::find_by_id(&pool, ra.space_id).await.unwrap().unwrap();
    assert_eq!(space.total_feedback_count, 2);
    assert_eq!(space.avg_rating, 3.0);
}
