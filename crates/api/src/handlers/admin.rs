//! Handlers for the `/admin` resource (user management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::State;
use axum::Json;
use crowdsense_core::error::CoreError;
use crowdsense_core::roles::validate_role;
use crowdsense_core::types::DbId;
use crowdsense_db::models::user::{AdminUserRow, RoleChange};
use crowdsense_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `PUT /admin/users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

/// Request body for `PUT /admin/users/{id}/status`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/admin/users
///
/// List every user, newest first.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<AdminUserRow>>> {
    let users = UserRepo::list_for_admin(&state.pool).await?;
    Ok(Json(users))
}

/// PUT /api/admin/users/{id}/role
///
/// Change a user's role. The last remaining admin cannot be demoted.
pub async fn update_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(user_id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateRoleRequest>,
) -> AppResult<Json<MessageResponse>> {
    validate_role(&input.role)?;

    match UserRepo::change_role(&state.pool, user_id, &input.role).await? {
        RoleChange::Updated => {}
        RoleChange::NotFound => {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "User",
                id: user_id,
            }));
        }
        RoleChange::LastAdmin => {
            return Err(AppError::Core(CoreError::Validation(
                "Cannot change role: This is the last admin user".into(),
            )));
        }
    }

    tracing::info!(
        admin_id = %admin.user_id,
        user_id = %user_id,
        role = %input.role,
        "User role updated"
    );

    Ok(Json(MessageResponse {
        message: "User role updated successfully".into(),
    }))
}

/// PUT /api/admin/users/{id}/status
///
/// Activate or deactivate an account. Deactivated users cannot sign in and
/// their existing tokens stop working.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(user_id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateStatusRequest>,
) -> AppResult<Json<MessageResponse>> {
    if !UserRepo::update_status(&state.pool, user_id, input.is_active).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }));
    }

    tracing::info!(
        admin_id = %admin.user_id,
        user_id = %user_id,
        is_active = input.is_active,
        "User status updated"
    );

    let message = if input.is_active {
        "User activated successfully"
    } else {
        "User deactivated successfully"
    };
    Ok(Json(MessageResponse {
        message: message.into(),
    }))
}
