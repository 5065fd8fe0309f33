//! Handlers for the `/feedback` resource.
//!
//! Reads are public; submitting requires a signed-in user and the
//! `/feedback/admin/*` views require the `admin` role.

use axum::extract::State;
use axum::http::header::{AsHeaderName, USER_AGENT};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use crowdsense_core::error::CoreError;
use crowdsense_core::feedback::{DeviceInfo, SubmitFeedbackRequest};
use crowdsense_core::pagination::{
    clamp_limit, clamp_offset, DEFAULT_FEEDBACK_PAGE, DEFAULT_SPACE_LIMIT, MAX_FEEDBACK_PAGE,
    MAX_SPACE_LIMIT,
};
use crowdsense_core::space::{Coordinates, SpaceType};
use crowdsense_core::types::DbId;
use crowdsense_db::ingestion::{submit_feedback, FeedbackInput};
use crowdsense_db::models::feedback::{AdminFeedback, FeedbackStats, SpaceFeedback, UserFeedback};
use crowdsense_db::models::feedback_category::FeedbackCategory;
use crowdsense_db::models::public_space::PublicSpace;
use crowdsense_db::repositories::{FeedbackCategoryRepo, FeedbackRepo, PublicSpaceRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{LimitParams, LocationParams, PaginationParams};
use crate::state::AppState;

/// Client-hint header carrying the submitter's OS platform.
const SEC_CH_UA_PLATFORM: &str = "sec-ch-ua-platform";

/// Response body for a successful submission.
#[derive(Debug, Serialize)]
pub struct SubmitFeedbackResponse {
    pub message: &'static str,
    pub space_id: DbId,
    /// Number of feedback rows written.
    pub entries: usize,
}

/// POST /api/feedback
///
/// Validate a submission, resolve its space, and write one row per matched
/// issue category (or one uncategorized row). Nothing is written on a
/// validation failure.
pub async fn submit(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    AppJson(input): AppJson<SubmitFeedbackRequest>,
) -> AppResult<(StatusCode, Json<SubmitFeedbackResponse>)> {
    let submission = input.validate()?;
    let device_info = device_info_from(&headers);

    let receipt = submit_feedback(
        &state.pool,
        &FeedbackInput {
            user_id: auth.user_id,
            submission: &submission,
            device_info: &device_info,
        },
        state.config.aggregate_mode,
    )
    .await?;

    tracing::info!(
        user_id = %auth.user_id,
        space_id = %receipt.space_id,
        space_created = receipt.space_created,
        entries = receipt.entries.len(),
        "Feedback submitted"
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitFeedbackResponse {
            message: "Feedback submitted successfully",
            space_id: receipt.space_id,
            entries: receipt.entries.len(),
        }),
    ))
}

/// GET /api/feedback/categories
///
/// Active categories ordered by `sort_order`.
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<FeedbackCategory>>> {
    let categories = FeedbackCategoryRepo::list_active(&state.pool).await?;
    Ok(Json(categories))
}

/// GET /api/feedback/spaces?limit=
///
/// Active spaces, most recently reviewed first.
pub async fn list_spaces(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<LimitParams>,
) -> AppResult<Json<Vec<PublicSpace>>> {
    let limit = clamp_limit(params.limit, DEFAULT_SPACE_LIMIT, MAX_SPACE_LIMIT);
    let spaces = PublicSpaceRepo::list_active(&state.pool, limit).await?;
    Ok(Json(spaces))
}

/// GET /api/feedback/space/{space_id}?limit=&offset=
///
/// Feedback for one space, newest first. An unknown space yields an empty list.
pub async fn list_space_feedback(
    State(state): State<AppState>,
    AppPath(space_id): AppPath<DbId>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<Vec<SpaceFeedback>>> {
    let limit = clamp_limit(params.limit, DEFAULT_FEEDBACK_PAGE, MAX_FEEDBACK_PAGE);
    let offset = clamp_offset(params.offset);
    let rows = FeedbackRepo::list_for_space(&state.pool, space_id, limit, offset).await?;
    Ok(Json(rows))
}

/// GET /api/feedback/space-by-location?lat=&lng=&type=
///
/// Exact-match lookup on the `(lat, lng, type)` triple.
pub async fn space_by_location(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<LocationParams>,
) -> AppResult<Json<PublicSpace>> {
    let (Some(lat), Some(lng), Some(space_type)) = (params.lat, params.lng, params.space_type)
    else {
        return Err(AppError::BadRequest(
            "Latitude, longitude, and space type are required".into(),
        ));
    };

    let coords = match (lat.trim().parse::<f64>(), lng.trim().parse::<f64>()) {
        (Ok(lat), Ok(lng)) => Coordinates::new(lat, lng)?,
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "Invalid coordinates.".into(),
            )))
        }
    };
    let space_type: SpaceType = space_type.parse()?;

    let space = PublicSpaceRepo::find_by_location(&state.pool, &coords, space_type)
        .await?
        .ok_or_else(|| AppError::NotFound("Space not found".into()))?;

    Ok(Json(space))
}

/// GET /api/feedback/mine?limit=&offset=
///
/// The caller's own feedback, newest first.
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<Vec<UserFeedback>>> {
    let limit = clamp_limit(params.limit, DEFAULT_FEEDBACK_PAGE, MAX_FEEDBACK_PAGE);
    let offset = clamp_offset(params.offset);
    let rows = FeedbackRepo::list_for_user(&state.pool, auth.user_id, limit, offset).await?;
    Ok(Json(rows))
}

/// GET /api/feedback/admin/all?limit=&offset=
pub async fn admin_list_all(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<Vec<AdminFeedback>>> {
    let limit = clamp_limit(params.limit, DEFAULT_FEEDBACK_PAGE, MAX_FEEDBACK_PAGE);
    let offset = clamp_offset(params.offset);
    let rows = FeedbackRepo::list_all(&state.pool, limit, offset).await?;
    Ok(Json(rows))
}

/// GET /api/feedback/admin/stats
pub async fn admin_stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<FeedbackStats>> {
    let stats = FeedbackRepo::stats(&state.pool).await?;
    Ok(Json(stats))
}

/// Build the device metadata recorded with each row from request headers.
///
/// Non-UTF-8 and empty values are dropped. Client hints arrive quoted
/// (`"Windows"`), so surrounding quotes are stripped.
pub fn device_info_from(headers: &HeaderMap) -> DeviceInfo {
    DeviceInfo {
        user_agent: header_text(headers, USER_AGENT),
        platform: header_text(headers, SEC_CH_UA_PLATFORM),
    }
}

fn header_text<K: AsHeaderName>(headers: &HeaderMap, key: K) -> Option<String> {
    headers
        .get(key)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().trim_matches('"').trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn device_info_reads_user_agent_and_platform() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
        headers.insert(SEC_CH_UA_PLATFORM, HeaderValue::from_static("\"Android\""));

        let info = device_info_from(&headers);
        assert_eq!(info.user_agent.as_deref(), Some("Mozilla/5.0"));
        assert_eq!(info.platform.as_deref(), Some("Android"));
    }

    #[test]
    fn device_info_skips_missing_and_blank_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("   "));

        assert_eq!(device_info_from(&headers), DeviceInfo::default());
    }
}
