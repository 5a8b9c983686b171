//! Coordinate conversion module
//!
//! Converts between the coordinate entry form (DD, DMS and DDM field sets
//! with hemisphere toggles) and signed decimal degrees, and validates form
//! input one field at a time.

mod error;
mod field;
pub mod text;
mod types;

pub use error::{FieldError, TextParseError, ValidationError};
pub use field::{sanitize_field, validate_field, validate_fields, FieldKind, FieldReport};
pub use text::{detect_format, format_text, parse_auto};
pub use types::{
    AxisFields, CoordinateFormat, FieldId, FieldSet, LatHemisphere, LonHemisphere,
    ParsedCoordinate,
};

use crate::geo::check_coordinate;

/// Converts a field set into signed decimal degrees.
///
/// Every required field must be present and valid. The fields are rendered
/// as canonical text and read back by the free-text parser; if that fails
/// the value is computed directly from the field values. The result is
/// checked against WGS84 bounds either way, so `90° 30' N` is rejected.
pub fn parse(fields: &FieldSet, format: CoordinateFormat) -> Result<ParsedCoordinate, ValidationError> {
    let report = validate_fields(fields, format);
    if let Some((field, error)) = report.errors().next() {
        return Err(ValidationError::InvalidField {
            field,
            error: error.clone(),
        });
    }
    if let Some(&field) = report.missing().first() {
        return Err(ValidationError::MissingField(field));
    }

    let canonical = text::render_fields(fields, format);
    let coordinate = match text::parse_text(&canonical, format) {
        Ok(coordinate) => coordinate,
        Err(e) => {
            tracing::debug!(
                format = %format,
                text = %canonical,
                error = %e,
                "Text conversion failed, using field arithmetic"
            );
            from_field_values(&report, fields)
        }
    };

    check_coordinate(coordinate.latitude, coordinate.longitude)?;
    Ok(coordinate)
}

fn from_field_values(report: &FieldReport, fields: &FieldSet) -> ParsedCoordinate {
    let axis = |degrees: FieldId, minutes: FieldId, seconds: FieldId| {
        report.value(degrees).unwrap_or(0.0)
            + report.value(minutes).unwrap_or(0.0) / 60.0
            + report.value(seconds).unwrap_or(0.0) / 3600.0
    };

    let lat = axis(FieldId::LatDegrees, FieldId::LatMinutes, FieldId::LatSeconds);
    let lon = axis(FieldId::LonDegrees, FieldId::LonMinutes, FieldId::LonSeconds);

    ParsedCoordinate::new(
        lat * fields.lat_hemisphere.sign(),
        lon * fields.lon_hemisphere.sign(),
    )
}

/// Converts signed decimal degrees into a field set for the given format.
///
/// DD values keep 6 decimals, DMS seconds 3 and DDM minutes 5. A value that
/// rounds up to 60 carries into the next unit so the output always passes
/// field validation.
pub fn format(
    latitude: f64,
    longitude: f64,
    format: CoordinateFormat,
) -> Result<FieldSet, ValidationError> {
    check_coordinate(latitude, longitude)?;

    let (lat, lon) = match format {
        CoordinateFormat::Dd => (
            AxisFields::decimal(format!("{:.6}", latitude.abs())),
            AxisFields::decimal(format!("{:.6}", longitude.abs())),
        ),
        CoordinateFormat::Dms => (dms_axis(latitude.abs()), dms_axis(longitude.abs())),
        CoordinateFormat::Ddm => (ddm_axis(latitude.abs()), ddm_axis(longitude.abs())),
    };

    Ok(FieldSet {
        lat,
        lon,
        lat_hemisphere: LatHemisphere::of(latitude),
        lon_hemisphere: LonHemisphere::of(longitude),
    })
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn dms_axis(value: f64) -> AxisFields {
    let mut degrees = value.floor();
    let minutes_f = (value - degrees) * 60.0;
    let mut minutes = minutes_f.floor();
    let mut seconds = round_to((minutes_f - minutes) * 60.0, 3);

    if seconds >= 60.0 {
        seconds = 0.0;
        minutes += 1.0;
    }
    if minutes >= 60.0 {
        minutes = 0.0;
        degrees += 1.0;
    }

    AxisFields::new(
        format!("{}", degrees as u32),
        format!("{}", minutes as u32),
        format!("{:.3}", seconds),
    )
}

fn ddm_axis(value: f64) -> AxisFields {
    let mut degrees = value.floor();
    let mut minutes = round_to((value - degrees) * 60.0, 5);

    if minutes >= 60.0 {
        minutes = 0.0;
        degrees += 1.0;
    }

    AxisFields::new(
        format!("{}", degrees as u32),
        format!("{:.5}", minutes),
        "",
    )
}
