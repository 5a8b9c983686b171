//! Coordinate entry errors

use thiserror::Error;

use super::types::{CoordinateFormat, FieldId};
use crate::geo::GeoError;

/// Problem with the text of a single form field.
///
/// The `Display` output is the message shown beneath the field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("Only digits and a decimal point are allowed (found '{0}')")]
    InvalidCharacter(char),

    #[error("Only one decimal point is allowed")]
    MultipleDecimalPoints,

    #[error("At most {max} digits before the decimal point")]
    TooManyIntegerDigits { max: usize },

    #[error("At most {max} digits after the decimal point")]
    TooManyFractionDigits { max: usize },

    #[error("Whole degrees only")]
    FractionNotAllowed,

    #[error("Not a number")]
    NotANumber,

    #[error("{label} must be between {range}")]
    OutOfRange {
        label: &'static str,
        range: &'static str,
    },
}

/// Why a field set could not be turned into a coordinate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(FieldId),

    #[error("{field}: {error}")]
    InvalidField { field: FieldId, error: FieldError },

    #[error("Latitude {0} is outside -90..90")]
    LatitudeOutOfRange(f64),

    #[error("Longitude {0} is outside -180..180")]
    LongitudeOutOfRange(f64),
}

impl From<GeoError> for ValidationError {
    fn from(err: GeoError) -> Self {
        match err {
            GeoError::InvalidLatitude(v) => ValidationError::LatitudeOutOfRange(v),
            GeoError::InvalidLongitude(v) => ValidationError::LongitudeOutOfRange(v),
        }
    }
}

/// Failure to read a coordinate from free text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TextParseError {
    #[error("Empty coordinate text")]
    Empty,

    #[error("Expected a latitude and a longitude")]
    MissingAxis,

    #[error("Text is not in {0} format")]
    NoMatch(CoordinateFormat),

    #[error("Unrecognized coordinate format")]
    Unrecognized,

    #[error("Hemisphere '{found}' is not valid for {axis}")]
    InvalidHemisphere { axis: &'static str, found: char },

    #[error("Use either a minus sign or a hemisphere letter, not both")]
    SignAndHemisphere,

    #[error("{component} out of range: {value}")]
    ComponentOutOfRange { component: &'static str, value: f64 },

    #[error(transparent)]
    Geo(#[from] GeoError),

    #[error("Unknown coordinate format: {0}")]
    UnknownFormat(String),
}
