//! Validation for feedback submissions.
//!
//! Clients send loosely shaped JSON. [`SubmitFeedbackRequest`] captures it
//! with the fields that need type checks still as raw JSON values, and
//! [`SubmitFeedbackRequest::validate`] turns it into a strongly typed
//! [`FeedbackSubmission`]. Nothing is written unless validation passes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::rating::{RATING_MAX, RATING_MIN};
use crate::space::{Coordinates, SpaceDetails, SpaceType};

/// Status tag stored on new feedback rows.
pub const DEFAULT_STATUS: &str = "mixed";

/// Severity tag stored on new feedback rows.
pub const DEFAULT_SEVERITY: &str = "medium";

const MSG_LOCATION: &str = "Invalid location data. Must include coordinates and space type.";
const MSG_COORDINATES: &str = "Invalid coordinates.";
const MSG_RATING: &str = "Rating must be an integer between 1 and 5.";
const MSG_ISSUES: &str = "Issues must be an array of strings.";

/// Raw body of `POST /api/feedback`.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitFeedbackRequest {
    pub location: Option<LocationPayload>,
    pub rating: Option<Value>,
    pub issues: Option<Value>,
    pub comments: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPayload {
    pub coordinates: Option<CoordinatesPayload>,
    pub space_type: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CoordinatesPayload {
    pub lat: Option<Value>,
    pub lng: Option<Value>,
}

/// A submission that passed every check.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackSubmission {
    pub coordinates: Coordinates,
    pub space_type: SpaceType,
    pub details: SpaceDetails,
    pub rating: i32,
    /// Lowercased issue labels, duplicates removed, first occurrence order.
    pub issues: Vec<String>,
    pub comment: Option<String>,
}

/// Client metadata recorded alongside each feedback row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(rename = "userAgent", skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl SubmitFeedbackRequest {
    /// Check every rule in order: location shape, coordinates, rating,
    /// issues, space type. The first failure is returned.
    pub fn validate(self) -> Result<FeedbackSubmission, CoreError> {
        let location = self.location.ok_or_else(|| invalid(MSG_LOCATION))?;
        let (coords, space_type) = match (location.coordinates, location.space_type) {
            (Some(c), Some(t)) if !t.is_empty() => (c, t),
            _ => return Err(invalid(MSG_LOCATION)),
        };

        let lat = coords.lat.as_ref().and_then(Value::as_f64);
        let lng = coords.lng.as_ref().and_then(Value::as_f64);
        let coordinates = match (lat, lng) {
            (Some(lat), Some(lng)) => Coordinates::new(lat, lng)?,
            _ => return Err(invalid(MSG_COORDINATES)),
        };

        let rating = parse_rating(self.rating.as_ref())?;
        let issues = parse_issues(self.issues)?;
        let space_type: SpaceType = space_type.parse()?;

        Ok(FeedbackSubmission {
            coordinates,
            space_type,
            details: SpaceDetails {
                name: location.name,
                address: non_blank(location.address),
                description: non_blank(location.description),
            },
            rating,
            issues,
            comment: self.comments,
        })
    }
}

/// Accept JSON integers, and floats with no fractional part, in `1..=5`.
pub fn parse_rating(value: Option<&Value>) -> Result<i32, CoreError> {
    let n = match value {
        Some(Value::Number(n)) => n,
        _ => return Err(invalid(MSG_RATING)),
    };
    let whole = match n.as_i64() {
        Some(i) => i,
        None => match n.as_f64() {
            Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() <= i64::MAX as f64 => f as i64,
            _ => return Err(invalid(MSG_RATING)),
        },
    };
    if (RATING_MIN..=RATING_MAX).contains(&whole) {
        Ok(whole as i32)
    } else {
        Err(invalid(MSG_RATING))
    }
}

/// `null` or absent means no issues; anything else must be an array of strings.
pub fn parse_issues(value: Option<Value>) -> Result<Vec<String>, CoreError> {
    let items = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(invalid(MSG_ISSUES)),
    };

    let mut labels = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(s) => labels.push(s),
            _ => return Err(invalid(MSG_ISSUES)),
        }
    }
    Ok(normalize_issues(&labels))
}

/// Lowercase each label and drop repeats.
pub fn normalize_issues<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        let lower = label.as_ref().to_lowercase();
        if !out.contains(&lower) {
            out.push(lower);
        }
    }
    out
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

fn invalid(msg: &str) -> CoreError {
    CoreError::Validation(msg.to_string())
}
