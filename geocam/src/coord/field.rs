//! Per-field validation and keystroke sanitizing for the coordinate form.

use std::collections::BTreeMap;

use super::error::FieldError;
use super::types::{CoordinateFormat, FieldId, FieldSet};

/// Validation rules applied to one text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Unsigned decimal latitude (DD format)
    DecimalLatitude,
    /// Unsigned decimal longitude (DD format)
    DecimalLongitude,
    /// Whole latitude degrees (DMS/DDM)
    LatitudeDegrees,
    /// Whole longitude degrees (DMS/DDM)
    LongitudeDegrees,
    Minutes,
    Seconds,
}

#[derive(Debug, Clone, Copy)]
struct FieldLimits {
    integer_digits: usize,
    fraction_digits: usize,
    max: f64,
    max_inclusive: bool,
    label: &'static str,
    range: &'static str,
}

impl FieldKind {
    fn limits(&self) -> FieldLimits {
        match self {
            FieldKind::DecimalLatitude => FieldLimits {
                integer_digits: 2,
                fraction_digits: 6,
                max: 90.0,
                max_inclusive: true,
                label: "Latitude",
                range: "0 and 90",
            },
            FieldKind::DecimalLongitude => FieldLimits {
                integer_digits: 3,
                fraction_digits: 6,
                max: 180.0,
                max_inclusive: true,
                label: "Longitude",
                range: "0 and 180",
            },
            FieldKind::LatitudeDegrees => FieldLimits {
                integer_digits: 2,
                fraction_digits: 0,
                max: 90.0,
                max_inclusive: true,
                label: "Degrees",
                range: "0 and 90",
            },
            FieldKind::LongitudeDegrees => FieldLimits {
                integer_digits: 3,
                fraction_digits: 0,
                max: 180.0,
                max_inclusive: true,
                label: "Degrees",
                range: "0 and 180",
            },
            FieldKind::Minutes => FieldLimits {
                integer_digits: 2,
                fraction_digits: 6,
                max: 60.0,
                max_inclusive: false,
                label: "Minutes",
                range: "0 and 59.999999",
            },
            FieldKind::Seconds => FieldLimits {
                integer_digits: 2,
                fraction_digits: 6,
                max: 60.0,
                max_inclusive: false,
                label: "Seconds",
                range: "0 and 59.999999",
            },
        }
    }

    pub fn max_integer_digits(&self) -> usize {
        self.limits().integer_digits
    }

    pub fn max_fraction_digits(&self) -> usize {
        self.limits().fraction_digits
    }

    /// Whether the field accepts a decimal point at all.
    pub fn accepts_fraction(&self) -> bool {
        self.limits().fraction_digits > 0
    }
}

/// Validate the text of a single field.
///
/// Empty (or whitespace-only) text is "not yet entered" and returns
/// `Ok(None)` so a half-filled form shows no errors.
pub fn validate_field(kind: FieldKind, text: &str) -> Result<Option<f64>, FieldError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    if let Some(bad) = text.chars().find(|c| !c.is_ascii_digit() && *c != '.') {
        return Err(FieldError::InvalidCharacter(bad));
    }

    let limits = kind.limits();
    let mut parts = text.splitn(2, '.');
    let integer = parts.next().unwrap_or("");
    let fraction = parts.next();

    if let Some(fraction) = fraction {
        if fraction.contains('.') {
            return Err(FieldError::MultipleDecimalPoints);
        }
        if limits.fraction_digits == 0 {
            return Err(FieldError::FractionNotAllowed);
        }
        if fraction.len() > limits.fraction_digits {
            return Err(FieldError::TooManyFractionDigits {
                max: limits.fraction_digits,
            });
        }
    }

    if integer.len() > limits.integer_digits {
        return Err(FieldError::TooManyIntegerDigits {
            max: limits.integer_digits,
        });
    }

    let value: f64 = text.parse().map_err(|_| FieldError::NotANumber)?;

    let over = if limits.max_inclusive {
        value > limits.max
    } else {
        value >= limits.max
    };
    if over {
        return Err(FieldError::OutOfRange {
            label: limits.label,
            range: limits.range,
        });
    }

    Ok(Some(value))
}

/// Keystroke filter for a field.
///
/// Drops everything but digits and `.`, keeps the first decimal point only,
/// and truncates integer and fraction digits to the kind's limits. Fields
/// without a fractional part lose everything from the first `.` on.
pub fn sanitize_field(kind: FieldKind, raw: &str) -> String {
    let limits = kind.limits();
    let mut integer = String::new();
    let mut fraction = String::new();
    let mut seen_point = false;

    for c in raw.chars() {
        if c == '.' {
            if limits.fraction_digits == 0 {
                break;
            }
            seen_point = true;
            continue;
        }
        if !c.is_ascii_digit() {
            continue;
        }
        if seen_point {
            if fraction.len() < limits.fraction_digits {
                fraction.push(c);
            }
        } else if integer.len() < limits.integer_digits {
            integer.push(c);
        }
    }

    if seen_point {
        format!("{}.{}", integer, fraction)
    } else {
        integer
    }
}

/// Validation result for every field a format requires.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldReport {
    format: CoordinateFormat,
    values: BTreeMap<FieldId, f64>,
    errors: BTreeMap<FieldId, FieldError>,
    missing: Vec<FieldId>,
}

impl FieldReport {
    pub fn format(&self) -> CoordinateFormat {
        self.format
    }

    /// True when every required field is present and valid (submit enabled).
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty() && self.missing.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn value(&self, field: FieldId) -> Option<f64> {
        self.values.get(&field).copied()
    }

    pub fn error(&self, field: FieldId) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    pub fn errors(&self) -> impl Iterator<Item = (FieldId, &FieldError)> {
        self.errors.iter().map(|(id, err)| (*id, err))
    }

    /// Required fields that are still empty, in form order.
    pub fn missing(&self) -> &[FieldId] {
        &self.missing
    }

    /// First error on the latitude or longitude row; the form shows one
    /// message per row.
    pub fn axis_error(&self, latitude: bool) -> Option<&FieldError> {
        self.errors
            .iter()
            .find(|(id, _)| id.is_latitude() == latitude)
            .map(|(_, err)| err)
    }
}

/// Validate all fields the format requires.
pub fn validate_fields(fields: &FieldSet, format: CoordinateFormat) -> FieldReport {
    let mut report = FieldReport {
        format,
        values: BTreeMap::new(),
        errors: BTreeMap::new(),
        missing: Vec::new(),
    };

    for &field in format.required_fields() {
        let Some(kind) = format.field_kind(field) else {
            continue;
        };
        match validate_field(kind, fields.get(field)) {
            Ok(Some(value)) => {
                report.values.insert(field, value);
            }
            Ok(None) => report.missing.push(field),
            Err(err) => {
                report.errors.insert(field, err);
            }
        }
    }

    report
}
