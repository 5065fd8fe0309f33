//! Handlers for the `/users` resource (own profile).

use axum::extract::State;
use axum::Json;
use crowdsense_core::error::CoreError;
use crowdsense_db::models::user::UserProfile;
use crowdsense_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `PUT /users/profile`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// `{ "user": ... }` envelope for profile responses.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}

/// GET /api/users/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ProfileResponse>> {
    let user = UserRepo::get_profile(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    Ok(Json(ProfileResponse { user }))
}

/// PUT /api/users/profile
///
/// Both names are required; email and role cannot be changed here.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let first_name = input.first_name.as_deref().map(str::trim).unwrap_or("");
    let last_name = input.last_name.as_deref().map(str::trim).unwrap_or("");
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "First name and last name are required".into(),
        )));
    }

    let user = UserRepo::update_profile(&state.pool, auth.user_id, first_name, last_name)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    Ok(Json(ProfileResponse { user }))
}
