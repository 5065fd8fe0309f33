//! Public space categories and coordinate rules.
//!
//! A space is identified by the exact `(latitude, longitude, space_type)`
//! triple. No proximity matching is performed: two points that differ in the
//! last decimal place are different spaces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// The fixed set of space categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceType {
    Toilet,
    Park,
    Station,
    BusStop,
    Mall,
    Other,
}

impl SpaceType {
    pub const ALL: [SpaceType; 6] = [
        SpaceType::Toilet,
        SpaceType::Park,
        SpaceType::Station,
        SpaceType::BusStop,
        SpaceType::Mall,
        SpaceType::Other,
    ];

    /// The value stored in `public_spaces.space_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            SpaceType::Toilet => "toilet",
            SpaceType::Park => "park",
            SpaceType::Station => "station",
            SpaceType::BusStop => "bus_stop",
            SpaceType::Mall => "mall",
            SpaceType::Other => "other",
        }
    }
}

impl fmt::Display for SpaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpaceType {
    type Err = CoreError;

    /// Exact, case-sensitive match against the stored names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpaceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::Validation("Invalid space type.".into()))
    }
}

/// A WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Build a point, rejecting anything outside the valid degree ranges.
    ///
    /// Bounds are inclusive: `lat = 90` and `lng = -180` are accepted.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoreError> {
        let coords = Self { lat, lng };
        coords.validate()?;
        Ok(coords)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let lat_ok = self.lat.is_finite() && (MIN_LATITUDE..=MAX_LATITUDE).contains(&self.lat);
        let lng_ok = self.lng.is_finite() && (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&self.lng);
        if lat_ok && lng_ok {
            Ok(())
        } else {
            Err(CoreError::Validation("Invalid coordinates.".into()))
        }
    }
}

/// Descriptive fields applied only when a space is first created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpaceDetails {
    pub name: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
}

/// Name given to a space created without an explicit one,
/// e.g. `"park at 6.9271, 79.8612"`.
pub fn default_space_name(space_type: SpaceType, coords: &Coordinates) -> String {
    format!(
        "{space_type} at {}, {}",
        format_degrees(coords.lat),
        format_degrees(coords.lng)
    )
}

/// Shortest round-trip text for a coordinate. Negative zero prints as `0`
/// and magnitudes below `1e-6` switch to exponent form (`1e-7`).
fn format_degrees(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value.abs() < 1e-6 {
        format!("{value:e}")
    } else {
        value.to_string()
    }
}

/// Pick the supplied name when it has content, otherwise the default.
pub fn resolve_space_name(
    name: Option<&str>,
    space_type: SpaceType,
    coords: &Coordinates,
) -> String {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => default_space_name(space_type, coords),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn boundary_coordinates_accepted() {
        assert!(Coordinates::new(90.0, 0.0).is_ok());
        assert!(Coordinates::new(-90.0, 0.0).is_ok());
        assert!(Coordinates::new(0.0, 180.0).is_ok());
        assert!(Coordinates::new(0.0, -180.0).is_ok());
    }

    #[test]
    fn out_of_range_coordinates_rejected() {
        assert_matches!(Coordinates::new(90.0001, 0.0), Err(CoreError::Validation(_)));
        assert_matches!(Coordinates::new(-90.0001, 0.0), Err(CoreError::Validation(_)));
        assert_matches!(Coordinates::new(0.0, 180.5), Err(CoreError::Validation(_)));
        assert_matches!(Coordinates::new(f64::NAN, 0.0), Err(CoreError::Validation(_)));
    }

    #[test]
    fn space_type_round_trips_through_str() {
        for t in SpaceType::ALL {
            assert_eq!(t.as_str().parse::<SpaceType>().unwrap(), t);
        }
    }

    #[test]
    fn space_type_rejects_unknown_and_wrong_case() {
        assert!("beach".parse::<SpaceType>().is_err());
        assert!("Park".parse::<SpaceType>().is_err());
        assert!("bus-stop".parse::<SpaceType>().is_err());
    }

    #[test]
    fn space_type_serde_uses_snake_case() {
        let json = serde_json::to_string(&SpaceType::BusStop).unwrap();
        assert_eq!(json, "\"bus_stop\"");
    }

    #[test]
    fn default_name_formats_coordinates() {
        let coords = Coordinates::new(6.9271, 79.8612).unwrap();
        assert_eq!(
            default_space_name(SpaceType::Park, &coords),
            "park at 6.9271, 79.8612"
        );

        let whole = Coordinates::new(90.0, -180.0).unwrap();
        assert_eq!(
            default_space_name(SpaceType::BusStop, &whole),
            "bus_stop at 90, -180"
        );
    }

    #[test]
    fn default_name_normalises_zero_and_tiny_values() {
        let origin = Coordinates::new(-0.0, 0.0).unwrap();
        assert_eq!(default_space_name(SpaceType::Park, &origin), "park at 0, 0");

        let tiny = Coordinates::new(1e-7, -2.5e-8).unwrap();
        assert_eq!(
            default_space_name(SpaceType::Park, &tiny),
            "park at 1e-7, -2.5e-8"
        );

        let small = Coordinates::new(0.000001, 0.5).unwrap();
        assert_eq!(
            default_space_name(SpaceType::Park, &small),
            "park at 0.000001, 0.5"
        );
    }

    #[test]
    fn blank_name_falls_back_to_default() {
        let coords = Coordinates::new(1.5, 2.5).unwrap();
        assert_eq!(
            resolve_space_name(Some("  "), SpaceType::Mall, &coords),
            "mall at 1.5, 2.5"
        );
        assert_eq!(
            resolve_space_name(Some("City Mall"), SpaceType::Mall, &coords),
            "City Mall"
        );
    }
}
