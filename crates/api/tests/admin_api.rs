//! HTTP-level integration tests for the `/api/admin` user management endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get_auth, put_json_auth, user_with_token};
use crowdsense_db::repositories::UserRepo;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_admin_is_forbidden(pool: PgPool) {
    let (_user, token) = user_with_token(&pool, "user@test.com", "user").await;

    let response = get_auth(build_test_app(pool), "/api/admin/users", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["message"], "Admin access required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_users_reports_status(pool: PgPool) {
    let (_admin, token) = user_with_token(&pool, "admin@test.com", "admin").await;
    let (user, _) = user_with_token(&pool, "sleepy@test.com", "user").await;
    UserRepo::update_status(&pool, user.user_id, false)
        .await
        .unwrap();

    let response = get_auth(build_test_app(pool), "/api/admin/users", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    let sleepy = rows
        .iter()
        .find(|r| r["email"] == "sleepy@test.com")
        .unwrap();
    assert_eq!(sleepy["status"], "inactive");
    assert_eq!(sleepy["firstName"], "Test");
    assert!(sleepy["last_login"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_role_change_promotes_user(pool: PgPool) {
    let (_admin, token) = user_with_token(&pool, "admin@test.com", "admin").await;
    let (user, _) = user_with_token(&pool, "rising@test.com", "user").await;

    let response = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/admin/users/{}/role", user.user_id),
        json!({ "role": "admin" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["message"].is_string());

    let reloaded = UserRepo::find_by_id(&pool, user.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.role, "admin");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_role_change_validates_input(pool: PgPool) {
    let (admin, token) = user_with_token(&pool, "admin@test.com", "admin").await;

    let response = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/admin/users/{}/role", admin.user_id),
        json!({ "role": "superuser" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Invalid role");

    let response = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/admin/users/{}/role", Uuid::new_v4()),
        json!({ "role": "user" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_last_admin_cannot_be_demoted(pool: PgPool) {
    let (admin, token) = user_with_token(&pool, "solo@test.com", "admin").await;

    let response = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/admin/users/{}/role", admin.user_id),
        json!({ "role": "user" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Cannot change role: This is the last admin user"
    );

    // With a second admin present the demotion goes through.
    user_with_token(&pool, "backup@test.com", "admin").await;
    let response = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/admin/users/{}/role", admin.user_id),
        json!({ "role": "user" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_change_deactivates_and_reactivates(pool: PgPool) {
    let (_admin, token) = user_with_token(&pool, "admin@test.com", "admin").await;
    let (user, user_token) = user_with_token(&pool, "flaky@test.com", "user").await;
    let uri = format!("/api/admin/users/{}/status", user.user_id);

    let response = put_json_auth(
        build_test_app(pool.clone()),
        &uri,
        json!({ "isActive": false }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(build_test_app(pool.clone()), "/api/auth/verify", &user_token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = put_json_auth(
        build_test_app(pool.clone()),
        &uri,
        json!({ "isActive": true }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(build_test_app(pool.clone()), "/api/auth/verify", &user_token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_change_for_unknown_user_is_404(pool: PgPool) {
    let (_admin, token) = user_with_token(&pool, "admin@test.com", "admin").await;

    let response = put_json_auth(
        build_test_app(pool),
        &format!("/api/admin/users/{}/status", Uuid::new_v4()),
        json!({ "isActive": false }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
