//! Free-text coordinate parsing and rendering.
//!
//! Accepts a latitude and a longitude separated by a comma, or by whitespace
//! when the latitude ends in a hemisphere letter:
//!
//! - `40.446195, -79.948862`
//! - `40°26'46.302"N, 79°56'55.903"W`
//! - `40 26 46.302 N 79 56 55.903 W`
//! - `40° 26.7717' N, 79° 56.93172' W`
//!
//! Each axis carries either a leading minus sign or a hemisphere letter.

use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::error::{TextParseError, ValidationError};
use super::types::{CoordinateFormat, FieldSet, LatHemisphere, LonHemisphere, ParsedCoordinate};
use crate::geo::check_coordinate;

/// Decimal degrees: `-79.948862`, `40.5°N`, `.5`
fn dd_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<sign>[+-])?(?P<deg>\d+(?:\.\d*)?|\.\d+)\s*°?\s*(?P<hemi>[NSEW])?$")
            .unwrap()
    })
}

/// Degrees, minutes, seconds: `40° 26' 46.302" N`, `40 26 46.302 N`
fn dms_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"^(?P<sign>[+-])?(?P<deg>\d+)(?:\s*°\s*|\s+)(?P<min>\d+(?:\.\d*)?)(?:\s*['′]\s*|\s+)(?P<sec>\d+(?:\.\d*)?)\s*(?:"|″|'')?\s*(?P<hemi>[NSEW])?$"#,
        )
        .unwrap()
    })
}

/// Degrees and decimal minutes: `40° 26.7717' N`, `40 26.7717 N`
fn ddm_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?P<sign>[+-])?(?P<deg>\d+)(?:\s*°\s*|\s+)(?P<min>\d+(?:\.\d*)?)\s*['′]?\s*(?P<hemi>[NSEW])?$",
        )
        .unwrap()
    })
}

fn pattern_for(format: CoordinateFormat) -> &'static Regex {
    match format {
        CoordinateFormat::Dd => dd_pattern(),
        CoordinateFormat::Dms => dms_pattern(),
        CoordinateFormat::Ddm => ddm_pattern(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn name(&self) -> &'static str {
        match self {
            Axis::Latitude => "latitude",
            Axis::Longitude => "longitude",
        }
    }

    fn max_degrees(&self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }

    fn hemisphere_sign(&self, letter: char) -> Result<f64, TextParseError> {
        let sign = match self {
            Axis::Latitude => LatHemisphere::from_char(letter).map(|h| h.sign()),
            Axis::Longitude => LonHemisphere::from_char(letter).map(|h| h.sign()),
        };
        sign.ok_or(TextParseError::InvalidHemisphere {
            axis: self.name(),
            found: letter,
        })
    }
}

/// Split text into its latitude and longitude parts (upper-cased).
fn split_axes(text: &str) -> Result<(String, String), TextParseError> {
    let text = text.trim().to_uppercase();
    if text.is_empty() {
        return Err(TextParseError::Empty);
    }

    let (lat, lon) = if let Some((lat, lon)) = text.split_once(',') {
        (lat.trim().to_string(), lon.trim().to_string())
    } else if let Some(index) = text.find(|c: char| c == 'N' || c == 'S') {
        let (lat, lon) = text.split_at(index + 1);
        (lat.trim().to_string(), lon.trim().to_string())
    } else {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        match tokens.as_slice() {
            [lat, lon] => (lat.to_string(), lon.to_string()),
            _ => return Err(TextParseError::MissingAxis),
        }
    };

    if lat.is_empty() || lon.is_empty() || lon.contains(',') {
        return Err(TextParseError::MissingAxis);
    }
    Ok((lat, lon))
}

fn component(caps: &Captures<'_>, name: &str) -> f64 {
    caps.name(name)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0)
}

fn parse_axis(part: &str, format: CoordinateFormat, axis: Axis) -> Result<f64, TextParseError> {
    let caps = pattern_for(format)
        .captures(part)
        .ok_or(TextParseError::NoMatch(format))?;

    let degrees = component(&caps, "deg");
    let minutes = component(&caps, "min");
    let seconds = component(&caps, "sec");

    if degrees > axis.max_degrees() {
        return Err(TextParseError::ComponentOutOfRange {
            component: "degrees",
            value: degrees,
        });
    }
    if minutes >= 60.0 {
        return Err(TextParseError::ComponentOutOfRange {
            component: "minutes",
            value: minutes,
        });
    }
    if seconds >= 60.0 {
        return Err(TextParseError::ComponentOutOfRange {
            component: "seconds",
            value: seconds,
        });
    }

    let negative = caps.name("sign").is_some_and(|m| m.as_str() == "-");
    let letter = caps.name("hemi").and_then(|m| m.as_str().chars().next());
    let sign = match (negative, letter) {
        (true, Some(_)) => return Err(TextParseError::SignAndHemisphere),
        (true, None) => -1.0,
        (false, Some(letter)) => axis.hemisphere_sign(letter)?,
        (false, None) => 1.0,
    };

    Ok(sign * (degrees + minutes / 60.0 + seconds / 3600.0))
}

/// Parse text in a known format.
pub fn parse_text(text: &str, format: CoordinateFormat) -> Result<ParsedCoordinate, TextParseError> {
    let (lat_part, lon_part) = split_axes(text)?;
    let latitude = parse_axis(&lat_part, format, Axis::Latitude)?;
    let longitude = parse_axis(&lon_part, format, Axis::Longitude)?;
    check_coordinate(latitude, longitude)?;
    Ok(ParsedCoordinate::new(latitude, longitude))
}

/// Parse signed or hemisphere-suffixed decimal degrees.
pub fn parse_dd_text(text: &str) -> Result<ParsedCoordinate, TextParseError> {
    parse_text(text, CoordinateFormat::Dd)
}

/// Parse degrees-minutes-seconds text.
pub fn parse_dms_text(text: &str) -> Result<ParsedCoordinate, TextParseError> {
    parse_text(text, CoordinateFormat::Dms)
}

/// Parse degrees-decimal-minutes text.
pub fn parse_ddm_text(text: &str) -> Result<ParsedCoordinate, TextParseError> {
    parse_text(text, CoordinateFormat::Ddm)
}

/// Guess the format from the shape of the text.
///
/// Only the shape is checked; a detected format may still fail to parse
/// because of out-of-range components.
pub fn detect_format(text: &str) -> Option<CoordinateFormat> {
    let (lat, lon) = split_axes(text).ok()?;
    CoordinateFormat::ALL.into_iter().find(|format| {
        let pattern = pattern_for(*format);
        pattern.is_match(&lat) && pattern.is_match(&lon)
    })
}

/// Detect the format and parse.
pub fn parse_auto(text: &str) -> Result<(CoordinateFormat, ParsedCoordinate), TextParseError> {
    if text.trim().is_empty() {
        return Err(TextParseError::Empty);
    }
    let format = detect_format(text).ok_or(TextParseError::Unrecognized)?;
    let coordinate = parse_text(text, format)?;
    Ok((format, coordinate))
}

/// Render a coordinate as display text in the given format.
pub fn format_text(
    latitude: f64,
    longitude: f64,
    format: CoordinateFormat,
) -> Result<String, ValidationError> {
    let fields = super::format(latitude, longitude, format)?;
    Ok(render_fields(&fields, format))
}

/// Canonical text for a field set; this is what the free-text parser reads
/// when converting form input.
pub(crate) fn render_fields(fields: &FieldSet, format: CoordinateFormat) -> String {
    let lat = &fields.lat;
    let lon = &fields.lon;
    let lat_h = fields.lat_hemisphere;
    let lon_h = fields.lon_hemisphere;

    match format {
        CoordinateFormat::Dd => {
            let lat_sign = if lat_h == LatHemisphere::South { "-" } else { "" };
            let lon_sign = if lon_h == LonHemisphere::West { "-" } else { "" };
            format!(
                "{}{}, {}{}",
                lat_sign,
                lat.degrees.trim(),
                lon_sign,
                lon.degrees.trim()
            )
        }
        CoordinateFormat::Dms => format!(
            "{}° {}' {}\" {}, {}° {}' {}\" {}",
            lat.degrees.trim(),
            lat.minutes.trim(),
            lat.seconds.trim(),
            lat_h.as_char(),
            lon.degrees.trim(),
            lon.minutes.trim(),
            lon.seconds.trim(),
            lon_h.as_char()
        ),
        CoordinateFormat::Ddm => format!(
            "{}° {}' {}, {}° {}' {}",
            lat.degrees.trim(),
            lat.minutes.trim(),
            lat_h.as_char(),
            lon.degrees.trim(),
            lon.minutes.trim(),
            lon_h.as_char()
        ),
    }
}
