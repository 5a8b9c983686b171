//! Coordinate entry type definitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::TextParseError;
use super::field::FieldKind;
use crate::geo::LngLat;

/// Human-entry coordinate formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordinateFormat {
    /// Decimal degrees, e.g. `40.446195`
    #[serde(rename = "DD", alias = "dd")]
    Dd,
    /// Degrees, minutes, seconds, e.g. `40° 26' 46.302" N`
    #[serde(rename = "DMS", alias = "dms")]
    Dms,
    /// Degrees and decimal minutes, e.g. `40° 26.7717' N`
    #[serde(rename = "DDM", alias = "ddm", alias = "DM")]
    Ddm,
}

impl CoordinateFormat {
    /// All formats in the order the entry form presents them.
    pub const ALL: [CoordinateFormat; 3] = [
        CoordinateFormat::Dd,
        CoordinateFormat::Dms,
        CoordinateFormat::Ddm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinateFormat::Dd => "DD",
            CoordinateFormat::Dms => "DMS",
            CoordinateFormat::Ddm => "DDM",
        }
    }

    /// Fields that must be filled before a coordinate can be submitted.
    pub fn required_fields(&self) -> &'static [FieldId] {
        match self {
            CoordinateFormat::Dd => &[FieldId::LatDegrees, FieldId::LonDegrees],
            CoordinateFormat::Dms => &[
                FieldId::LatDegrees,
                FieldId::LatMinutes,
                FieldId::LatSeconds,
                FieldId::LonDegrees,
                FieldId::LonMinutes,
                FieldId::LonSeconds,
            ],
            CoordinateFormat::Ddm => &[
                FieldId::LatDegrees,
                FieldId::LatMinutes,
                FieldId::LonDegrees,
                FieldId::LonMinutes,
            ],
        }
    }

    /// Validation rules for a field in this format, or `None` when the
    /// format does not use the field.
    pub fn field_kind(&self, field: FieldId) -> Option<FieldKind> {
        use FieldId::*;
        match (self, field) {
            (CoordinateFormat::Dd, LatDegrees) => Some(FieldKind::DecimalLatitude),
            (CoordinateFormat::Dd, LonDegrees) => Some(FieldKind::DecimalLongitude),
            (CoordinateFormat::Dd, _) => None,
            (_, LatDegrees) => Some(FieldKind::LatitudeDegrees),
            (_, LonDegrees) => Some(FieldKind::LongitudeDegrees),
            (_, LatMinutes | LonMinutes) => Some(FieldKind::Minutes),
            (CoordinateFormat::Dms, LatSeconds | LonSeconds) => Some(FieldKind::Seconds),
            (CoordinateFormat::Ddm, LatSeconds | LonSeconds) => None,
        }
    }
}

impl fmt::Display for CoordinateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CoordinateFormat {
    type Err = TextParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dd" | "decimal" => Ok(CoordinateFormat::Dd),
            "dms" => Ok(CoordinateFormat::Dms),
            "ddm" | "dm" => Ok(CoordinateFormat::Ddm),
            other => Err(TextParseError::UnknownFormat(other.to_string())),
        }
    }
}

/// Latitude hemisphere toggle (N/S).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LatHemisphere {
    #[default]
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South,
}

impl LatHemisphere {
    /// Hemisphere of a signed latitude (zero is north).
    pub fn of(latitude: f64) -> Self {
        if latitude < 0.0 {
            LatHemisphere::South
        } else {
            LatHemisphere::North
        }
    }

    pub fn sign(&self) -> f64 {
        match self {
            LatHemisphere::North => 1.0,
            LatHemisphere::South => -1.0,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            LatHemisphere::North => 'N',
            LatHemisphere::South => 'S',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'N' => Some(LatHemisphere::North),
            'S' => Some(LatHemisphere::South),
            _ => None,
        }
    }

    /// The other hemisphere (the form's N/S button).
    pub fn toggle(self) -> Self {
        match self {
            LatHemisphere::North => LatHemisphere::South,
            LatHemisphere::South => LatHemisphere::North,
        }
    }
}

/// Longitude hemisphere toggle (E/W).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LonHemisphere {
    #[default]
    #[serde(rename = "E")]
    East,
    #[serde(rename = "W")]
    West,
}

impl LonHemisphere {
    /// Hemisphere of a signed longitude (zero is east).
    pub fn of(longitude: f64) -> Self {
        if longitude < 0.0 {
            LonHemisphere::West
        } else {
            LonHemisphere::East
        }
    }

    pub fn sign(&self) -> f64 {
        match self {
            LonHemisphere::East => 1.0,
            LonHemisphere::West => -1.0,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            LonHemisphere::East => 'E',
            LonHemisphere::West => 'W',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'E' => Some(LonHemisphere::East),
            'W' => Some(LonHemisphere::West),
            _ => None,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            LonHemisphere::East => LonHemisphere::West,
            LonHemisphere::West => LonHemisphere::East,
        }
    }
}

/// Identifies one text box of the coordinate entry form.
///
/// In DD format the decimal value lives in the `*Degrees` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldId {
    LatDegrees,
    LatMinutes,
    LatSeconds,
    LonDegrees,
    LonMinutes,
    LonSeconds,
}

impl FieldId {
    pub fn is_latitude(&self) -> bool {
        matches!(
            self,
            FieldId::LatDegrees | FieldId::LatMinutes | FieldId::LatSeconds
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::LatDegrees => "latitude degrees",
            FieldId::LatMinutes => "latitude minutes",
            FieldId::LatSeconds => "latitude seconds",
            FieldId::LonDegrees => "longitude degrees",
            FieldId::LonMinutes => "longitude minutes",
            FieldId::LonSeconds => "longitude seconds",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw text of one axis (latitude or longitude).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisFields {
    pub degrees: String,
    #[serde(default)]
    pub minutes: String,
    #[serde(default)]
    pub seconds: String,
}

impl AxisFields {
    pub fn new(
        degrees: impl Into<String>,
        minutes: impl Into<String>,
        seconds: impl Into<String>,
    ) -> Self {
        Self {
            degrees: degrees.into(),
            minutes: minutes.into(),
            seconds: seconds.into(),
        }
    }

    /// Axis holding a single decimal value (DD format).
    pub fn decimal(value: impl Into<String>) -> Self {
        Self::new(value, "", "")
    }
}

/// Complete state of the coordinate entry form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSet {
    pub lat: AxisFields,
    pub lon: AxisFields,
    #[serde(default)]
    pub lat_hemisphere: LatHemisphere,
    #[serde(default)]
    pub lon_hemisphere: LonHemisphere,
}

impl FieldSet {
    /// Decimal-degree entry with unsigned values and explicit hemispheres.
    pub fn dd(
        lat: impl Into<String>,
        lat_hemisphere: LatHemisphere,
        lon: impl Into<String>,
        lon_hemisphere: LonHemisphere,
    ) -> Self {
        Self {
            lat: AxisFields::decimal(lat),
            lon: AxisFields::decimal(lon),
            lat_hemisphere,
            lon_hemisphere,
        }
    }

    /// Degrees-minutes-seconds entry.
    pub fn dms(
        lat: (&str, &str, &str),
        lat_hemisphere: LatHemisphere,
        lon: (&str, &str, &str),
        lon_hemisphere: LonHemisphere,
    ) -> Self {
        Self {
            lat: AxisFields::new(lat.0, lat.1, lat.2),
            lon: AxisFields::new(lon.0, lon.1, lon.2),
            lat_hemisphere,
            lon_hemisphere,
        }
    }

    /// Degrees-decimal-minutes entry.
    pub fn ddm(
        lat: (&str, &str),
        lat_hemisphere: LatHemisphere,
        lon: (&str, &str),
        lon_hemisphere: LonHemisphere,
    ) -> Self {
        Self {
            lat: AxisFields::new(lat.0, lat.1, ""),
            lon: AxisFields::new(lon.0, lon.1, ""),
            lat_hemisphere,
            lon_hemisphere,
        }
    }

    /// Text of one field.
    pub fn get(&self, field: FieldId) -> &str {
        match field {
            FieldId::LatDegrees => &self.lat.degrees,
            FieldId::LatMinutes => &self.lat.minutes,
            FieldId::LatSeconds => &self.lat.seconds,
            FieldId::LonDegrees => &self.lon.degrees,
            FieldId::LonMinutes => &self.lon.minutes,
            FieldId::LonSeconds => &self.lon.seconds,
        }
    }

    /// Replace the text of one field.
    pub fn set(&mut self, field: FieldId, text: impl Into<String>) {
        let slot = match field {
            FieldId::LatDegrees => &mut self.lat.degrees,
            FieldId::LatMinutes => &mut self.lat.minutes,
            FieldId::LatSeconds => &mut self.lat.seconds,
            FieldId::LonDegrees => &mut self.lon.degrees,
            FieldId::LonMinutes => &mut self.lon.minutes,
            FieldId::LonSeconds => &mut self.lon.seconds,
        };
        *slot = text.into();
    }

    /// Empty every text field, keeping the hemisphere toggles.
    pub fn clear(&mut self) {
        self.lat = AxisFields::default();
        self.lon = AxisFields::default();
    }
}

/// A fully specified, range-checked coordinate in signed decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParsedCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl ParsedCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Camera center for this coordinate.
    pub fn center(&self) -> LngLat {
        LngLat::new(self.longitude, self.latitude)
    }
}

impl fmt::Display for ParsedCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}
