//! Handlers for the `/auth` resource (signup, signin, verify).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use crowdsense_core::error::CoreError;
use crowdsense_core::roles::ROLE_USER;
use crowdsense_core::types::DbId;
use crowdsense_db::models::user::CreateUser;
use crowdsense_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Minimum password length enforced on signup.
const MIN_PASSWORD_LENGTH: usize = 8;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
}

/// Request body for `POST /auth/signin`.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response returned by signup and signin.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: UserInfo,
}

/// Response for `GET /auth/verify`.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub user: UserInfo,
}

/// Public user info embedded in auth responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/signup
///
/// Register a new account with the `user` role and sign it in.
pub async fn signup(
    State(state): State<AppState>,
    AppJson(mut input): AppJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input.email = input.email.trim().to_lowercase();
    input.first_name = input.first_name.trim().to_string();
    input.last_name = input.last_name.trim().to_string();

    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(first_message(&e))))?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    let hashed = hash_password(&input.password)
        .map_err(|e| CoreError::Internal(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email,
            password_hash: hashed,
            first_name: input.first_name,
            last_name: input.last_name,
            role: ROLE_USER.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = %user.user_id, "User signed up");

    let token = issue_token(&state, user.user_id, &user.email, &user.role)?;
    let response = AuthResponse {
        success: true,
        token,
        user: UserInfo {
            id: user.user_id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
        },
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/signin
///
/// Authenticate with email + password and return an access token.
pub async fn signin(
    State(state): State<AppState>,
    AppJson(input): AppJson<SigninRequest>,
) -> AppResult<Json<AuthResponse>> {
    // 1. Find user by email (case-insensitive).
    let user = UserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;

    // 2. Verify password.
    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| CoreError::Internal(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_CREDENTIALS.into(),
        )));
    }

    // 3. Check if the account is active.
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    // 4. Stamp last_login_at and issue the token.
    UserRepo::record_login(&state.pool, user.user_id).await?;
    let token = issue_token(&state, user.user_id, &user.email, &user.role)?;

    Ok(Json(AuthResponse {
        success: true,
        token,
        user: UserInfo {
            id: user.user_id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
        },
    }))
}

/// GET /api/auth/verify
///
/// Confirm the bearer token is still good and return the current user.
pub async fn verify(auth: AuthUser) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        success: true,
        user: UserInfo {
            id: auth.user_id,
            email: auth.email,
            first_name: auth.first_name,
            last_name: auth.last_name,
            role: auth.role,
        },
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn issue_token(state: &AppState, user_id: DbId, email: &str, role: &str) -> AppResult<String> {
    generate_access_token(user_id, email, role, &state.config.jwt)
        .map_err(|e| CoreError::Internal(format!("Token generation error: {e}")).into())
}

/// Pick one message out of a validation report, stable across runs.
fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid request".to_string())
}
