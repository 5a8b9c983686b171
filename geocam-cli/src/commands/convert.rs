//! Coordinate conversion commands.

use geocam::coord::{self, format_text, parse_auto, CoordinateFormat};

use super::common::FormatArg;
use crate::error::CliError;

/// Detect the format of `text` and render it in every format (or only `to`).
pub fn convert_report(text: &str, to: Option<FormatArg>) -> Result<String, CliError> {
    let (detected, coordinate) = parse_auto(text)?;
    let targets: Vec<CoordinateFormat> = match to {
        Some(format) => vec![format.into()],
        None => CoordinateFormat::ALL.to_vec(),
    };

    let mut lines = vec![
        format!("Detected: {}", detected),
        format!("Decimal:  {}", coordinate),
    ];
    for format in targets {
        let rendered = format_text(coordinate.latitude, coordinate.longitude, format)?;
        lines.push(format!("{:<4}      {}", format.as_str(), rendered));
    }
    Ok(lines.join("\n"))
}

/// Show the entry form fields for a decimal coordinate.
pub fn format_report(latitude: f64, longitude: f64, format: FormatArg) -> Result<String, CliError> {
    let format = CoordinateFormat::from(format);
    let fields = coord::format(latitude, longitude, format)?;

    let mut lines = vec![format!("Format: {}", format)];
    for field in format.required_fields() {
        lines.push(format!("  {:<18} {}", field.as_str(), fields.get(*field)));
    }
    let hemispheres = format!(
        "{} {}",
        fields.lat_hemisphere.as_char(),
        fields.lon_hemisphere.as_char()
    );
    lines.push(format!("  {:<18} {}", "hemispheres", hemispheres));
    lines.push(format!("  {:<18} {}", "text", format_text(latitude, longitude, format)?));
    Ok(lines.join("\n"))
}

pub fn run_convert(text: &str, to: Option<FormatArg>) -> Result<(), CliError> {
    println!("{}", convert_report(text, to)?);
    Ok(())
}

pub fn run_format(latitude: f64, longitude: f64, format: FormatArg) -> Result<(), CliError> {
    println!("{}", format_report(latitude, longitude, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_convert_dms_text() {
        let report = convert_report(r#"40° 26' 46.302" N, 79° 56' 55.903" W"#, None).unwrap();
        assert!(report.starts_with("Detected: DMS"));
        assert!(report.contains("40.446195"));
        assert!(report.contains("-79.948862"));
        assert_eq!(report.lines().count(), 5);
    }

    #[test]
    fn test_convert_single_target() {
        let report = convert_report("-12.5, 130.25", Some(FormatArg::Ddm)).unwrap();
        assert!(report.contains("12° 30.00000' S"));
        assert_eq!(report.lines().count(), 3);
    }

    #[test]
    fn test_convert_garbage() {
        let err = convert_report("somewhere near the pier", None).unwrap_err();
        assert!(matches!(err, CliError::InvalidCoordinate(_)));
    }

    #[test]
    fn test_format_fields() {
        let report = format_report(40.446195, -79.948862, FormatArg::Dms).unwrap();
        assert!(report.contains("latitude degrees"));
        assert!(report.contains("N W"));
    }

    #[test]
    fn test_format_out_of_range() {
        assert!(format_report(91.0, 0.0, FormatArg::Dd).is_err());
    }

    mod property_tests {
        use super::*;

        proptest! {
            #[test]
            fn format_report_accepts_valid_coordinates(
                lat in -90.0f64..=90.0,
                lon in -180.0f64..=180.0,
            ) {
                for format in [FormatArg::Dd, FormatArg::Dms, FormatArg::Ddm] {
                    prop_assert!(format_report(lat, lon, format).is_ok());
                }
            }
        }
    }
}
