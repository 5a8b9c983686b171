//! Geographic type definitions

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Valid latitude range (WGS84)
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Errors for geographic values that fall outside WGS84 bounds.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),
}

/// Returns `true` when both values are finite and inside WGS84 bounds.
#[inline]
pub fn is_valid_coordinate(lat: f64, lon: f64) -> bool {
    lat.is_finite()
        && lon.is_finite()
        && (MIN_LAT..=MAX_LAT).contains(&lat)
        && (MIN_LON..=MAX_LON).contains(&lon)
}

/// Checks a latitude/longitude pair, reporting the first offending axis.
pub fn check_coordinate(lat: f64, lon: f64) -> Result<(), GeoError> {
    if !lat.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(GeoError::InvalidLatitude(lat));
    }
    if !lon.is_finite() || !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(GeoError::InvalidLongitude(lon));
    }
    Ok(())
}

/// A map camera center in the order map engines expect: longitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    /// Longitude in degrees (-180 to 180)
    pub lon: f64,
    /// Latitude in degrees (-90 to 90)
    pub lat: f64,
}

impl LngLat {
    /// Create a center from longitude and latitude.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Create a center from a latitude/longitude pair, validating bounds.
    pub fn from_lat_lon(lat: f64, lon: f64) -> Result<Self, GeoError> {
        check_coordinate(lat, lon)?;
        Ok(Self { lon, lat })
    }

    /// Whether this center lies inside WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        is_valid_coordinate(self.lat, self.lon)
    }

    /// `[lon, lat]` array as used by GeoJSON and the map engine.
    pub fn to_array(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl From<[f64; 2]> for LngLat {
    fn from(pair: [f64; 2]) -> Self {
        Self {
            lon: pair[0],
            lat: pair[1],
        }
    }
}

impl fmt::Display for LngLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Visible map viewport, recorded when a gesture settles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    /// Northeast corner
    pub ne: LngLat,
    /// Southwest corner
    pub sw: LngLat,
}

impl MapBounds {
    pub fn new(ne: LngLat, sw: LngLat) -> Self {
        Self { ne, sw }
    }

    /// Corners must be valid and the northeast corner must not be south of
    /// the southwest one. Longitudes may wrap across the antimeridian.
    pub fn is_valid(&self) -> bool {
        self.ne.is_valid() && self.sw.is_valid() && self.ne.lat >= self.sw.lat
    }

    /// Whether a point falls inside these bounds, honoring antimeridian wrap.
    pub fn contains(&self, point: LngLat) -> bool {
        if point.lat < self.sw.lat || point.lat > self.ne.lat {
            return false;
        }
        if self.sw.lon <= self.ne.lon {
            point.lon >= self.sw.lon && point.lon <= self.ne.lon
        } else {
            point.lon >= self.sw.lon || point.lon <= self.ne.lon
        }
    }
}

/// A single fix from the device location service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPosition {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Fix time in milliseconds on the event loop clock
    pub timestamp_ms: u64,
    /// Horizontal accuracy radius in metres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_m: Option<f64>,
    /// Device-reported speed in metres per second
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_mps: Option<f64>,
    /// Device compass heading in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading_deg: Option<f64>,
}

impl GeoPosition {
    /// Create a fix, rejecting coordinates outside WGS84 bounds.
    pub fn new(latitude: f64, longitude: f64, timestamp_ms: u64) -> Result<Self, GeoError> {
        check_coordinate(latitude, longitude)?;
        Ok(Self {
            latitude,
            longitude,
            timestamp_ms,
            accuracy_m: None,
            speed_mps: None,
            heading_deg: None,
        })
    }

    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }

    pub fn with_speed(mut self, speed_mps: f64) -> Self {
        self.speed_mps = Some(speed_mps);
        self
    }

    pub fn with_heading(mut self, heading_deg: f64) -> Self {
        self.heading_deg = Some(heading_deg);
        self
    }

    /// Whether the fix satisfies the coordinate invariant.
    ///
    /// Fixes built with [`GeoPosition::new`] always do; deserialized fixes
    /// must be checked.
    pub fn is_valid(&self) -> bool {
        is_valid_coordinate(self.latitude, self.longitude)
    }

    /// Camera center for this fix.
    pub fn center(&self) -> LngLat {
        LngLat::new(self.longitude, self.latitude)
    }

    /// Same place as another fix (timestamps and metadata ignored).
    pub fn same_place(&self, other: &GeoPosition) -> bool {
        self.latitude == other.latitude && self.longitude == other.longitude
    }
}

impl fmt::Display for GeoPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.6}, {:.6}) @{}ms",
            self.latitude, self.longitude, self.timestamp_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_rejects_out_of_range() {
        assert!(matches!(
            GeoPosition::new(90.5, 0.0, 0),
            Err(GeoError::InvalidLatitude(_))
        ));
        assert!(matches!(
            GeoPosition::new(0.0, -180.1, 0),
            Err(GeoError::InvalidLongitude(_))
        ));
        assert!(matches!(
            GeoPosition::new(f64::NAN, 0.0, 0),
            Err(GeoError::InvalidLatitude(_))
        ));
    }

    #[test]
    fn test_position_accepts_poles_and_antimeridian() {
        assert!(GeoPosition::new(90.0, 180.0, 0).is_ok());
        assert!(GeoPosition::new(-90.0, -180.0, 0).is_ok());
    }

    #[test]
    fn test_position_center_is_lon_first() {
        let fix = GeoPosition::new(41.0, 29.0, 10).unwrap();
        assert_eq!(fix.center().to_array(), [29.0, 41.0]);
    }

    #[test]
    fn test_position_deserializes_camel_case() {
        let json = r#"{"latitude": 41.0, "longitude": 29.0, "timestampMs": 1500, "speedMps": 2.5}"#;
        let fix: GeoPosition = serde_json::from_str(json).unwrap();
        assert_eq!(fix.timestamp_ms, 1500);
        assert_eq!(fix.speed_mps, Some(2.5));
        assert_eq!(fix.accuracy_m, None);
        assert!(fix.is_valid());
    }

    #[test]
    fn test_deserialized_position_can_be_invalid() {
        let json = r#"{"latitude": 123.0, "longitude": 29.0, "timestampMs": 0}"#;
        let fix: GeoPosition = serde_json::from_str(json).unwrap();
        assert!(!fix.is_valid());
    }

    #[test]
    fn test_bounds_contains_with_wrap() {
        let bounds = MapBounds::new(LngLat::new(-170.0, 10.0), LngLat::new(170.0, -10.0));
        assert!(bounds.contains(LngLat::new(175.0, 0.0)));
        assert!(bounds.contains(LngLat::new(-175.0, 0.0)));
        assert!(!bounds.contains(LngLat::new(0.0, 0.0)));
    }

    #[test]
    fn test_bounds_validity() {
        let ok = MapBounds::new(LngLat::new(30.0, 42.0), LngLat::new(28.0, 40.0));
        assert!(ok.is_valid());
        let flipped = MapBounds::new(LngLat::new(30.0, 40.0), LngLat::new(28.0, 42.0));
        assert!(!flipped.is_valid());
    }
}
