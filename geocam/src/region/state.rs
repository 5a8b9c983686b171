//! Raw region-change payloads from the map engine.
//!
//! Two shapes are accepted:
//!
//! ```json
//! { "properties": { "center": [29.0, 41.0], "zoom": 12.5,
//!                   "bounds": { "ne": [29.1, 41.1], "sw": [28.9, 40.9] },
//!                   "isUserInteraction": true } }
//!
//! { "latitude": 41.0, "longitude": 29.0, "zoom": 12.5 }
//! ```
//!
//! The structured center may also be a GeoJSON point
//! (`{"coordinates": [lon, lat]}`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::{LngLat, MapBounds};

/// Region payload that could not be decoded.
#[derive(Debug, Error)]
pub enum RegionStateError {
    #[error("Malformed region state: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A center given either as `[lon, lat]` or as a GeoJSON point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCenter {
    Pair([f64; 2]),
    Point { coordinates: [f64; 2] },
}

impl RawCenter {
    fn lng_lat(&self) -> LngLat {
        match self {
            RawCenter::Pair(pair) => LngLat::from(*pair),
            RawCenter::Point { coordinates } => LngLat::from(*coordinates),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawBounds {
    pub ne: [f64; 2],
    pub sw: [f64; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionProperties {
    #[serde(default)]
    pub center: Option<RawCenter>,
    #[serde(default)]
    pub zoom: Option<f64>,
    #[serde(default)]
    pub bounds: Option<RawBounds>,
    #[serde(default)]
    pub is_user_interaction: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatRegion {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub zoom: Option<f64>,
    #[serde(default)]
    pub is_user_interaction: Option<bool>,
}

/// Region payload as delivered by either map engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRegionState {
    Structured { properties: RegionProperties },
    Flat(FlatRegion),
}

impl RawRegionState {
    /// Flat payload with just a center.
    pub fn at(center: LngLat) -> Self {
        RawRegionState::Flat(FlatRegion {
            latitude: center.lat,
            longitude: center.lon,
            zoom: None,
            is_user_interaction: None,
        })
    }

    pub fn from_json(value: &serde_json::Value) -> Result<Self, RegionStateError> {
        Ok(serde_json::from_value(value.clone())?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, RegionStateError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Normalize into a [`RegionSnapshot`], discarding values outside
    /// WGS84 bounds.
    pub fn snapshot(&self) -> RegionSnapshot {
        let (center, zoom, bounds, user) = match self {
            RawRegionState::Structured { properties } => (
                properties.center.map(|c| c.lng_lat()),
                properties.zoom,
                properties
                    .bounds
                    .map(|b| MapBounds::new(LngLat::from(b.ne), LngLat::from(b.sw))),
                properties.is_user_interaction,
            ),
            RawRegionState::Flat(flat) => (
                Some(LngLat::new(flat.longitude, flat.latitude)),
                flat.zoom,
                None,
                flat.is_user_interaction,
            ),
        };

        let center = match center {
            Some(c) if c.is_valid() => Some(c),
            Some(c) => {
                tracing::warn!(center = %c, "Discarding region center outside WGS84 bounds");
                None
            }
            None => None,
        };

        RegionSnapshot {
            center,
            zoom: zoom.filter(|z| z.is_finite() && *z >= 0.0),
            bounds: bounds.filter(MapBounds::is_valid),
            user_gesture: user.unwrap_or(false),
        }
    }
}

/// Normalized view of a region callback.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RegionSnapshot {
    pub center: Option<LngLat>,
    pub zoom: Option<f64>,
    pub bounds: Option<MapBounds>,
    /// The change was caused by a touch gesture rather than a camera
    /// animation. Absent flags count as not user-driven.
    pub user_gesture: bool,
}
