//! Bearing math and compass naming.
//!
//! Bearings are degrees clockwise from true north in `[0, 360)`, so 0 = North
//! and 90 = East.

/// 16-point compass rose, starting at north.
const COMPASS_16: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// 8-point compass rose, starting at north.
const COMPASS_8: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Initial great-circle bearing (forward azimuth) from one point to another.
///
/// `θ = atan2(sin Δλ · cos φ2, cos φ1 · sin φ2 − sin φ1 · cos φ2 · cos Δλ)`
pub fn initial_bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();

    normalize_degrees(y.atan2(x).to_degrees())
}

/// Normalize an angle to `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let normalized = ((angle % 360.0) + 360.0) % 360.0;
    // -1e-17 % 360 + 360 rounds to exactly 360.0
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Smallest absolute difference between two bearings.
///
/// Handles wraparound (350° to 10° is 20°, not 340°).
pub fn angular_difference(a: f64, b: f64) -> f64 {
    let diff = (normalize_degrees(a) - normalize_degrees(b)).abs();
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

/// 16-point compass name for a bearing (e.g. 22.5° → "NNE").
pub fn compass_point(degrees: f64) -> &'static str {
    let index = (normalize_degrees(degrees) / 22.5).round() as usize % 16;
    COMPASS_16[index]
}

/// 8-point compass name for a bearing (e.g. 45° → "NE").
pub fn cardinal_point(degrees: f64) -> &'static str {
    let index = (normalize_degrees(degrees) / 45.0).round() as usize % 8;
    COMPASS_8[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_east() {
        let b = initial_bearing(0.0, 0.0, 0.0, 1.0);
        assert!((b - 90.0).abs() < 1e-9, "got {}", b);
    }

    #[test]
    fn test_due_north() {
        let b = initial_bearing(0.0, 0.0, 1.0, 0.0);
        assert!(b.abs() < 1e-9, "got {}", b);
    }

    #[test]
    fn test_due_south_and_west() {
        assert!((initial_bearing(1.0, 0.0, 0.0, 0.0) - 180.0).abs() < 1e-9);
        assert!((initial_bearing(0.0, 1.0, 0.0, 0.0) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_degrees() {
        assert!((normalize_degrees(0.0) - 0.0).abs() < 0.001);
        assert!((normalize_degrees(360.0) - 0.0).abs() < 0.001);
        assert!((normalize_degrees(-90.0) - 270.0).abs() < 0.001);
        assert!((normalize_degrees(450.0) - 90.0).abs() < 0.001);
        assert!((normalize_degrees(-450.0) - 270.0).abs() < 0.001);
        assert!(normalize_degrees(-1e-17) < 360.0);
    }

    #[test]
    fn test_angular_difference_wraps() {
        assert!((angular_difference(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((angular_difference(10.0, 350.0) - 20.0).abs() < 1e-9);
        assert!((angular_difference(90.0, 270.0) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_compass_points() {
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(22.5), "NNE");
        assert_eq!(compass_point(90.0), "E");
        assert_eq!(compass_point(355.0), "N");
        assert_eq!(compass_point(200.0), "SSW");
        assert_eq!(cardinal_point(44.0), "NE");
        assert_eq!(cardinal_point(-90.0), "W");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_bearing_in_range(
                lat1 in -89.0..89.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -89.0..89.0_f64,
                lon2 in -180.0..180.0_f64
            ) {
                let b = initial_bearing(lat1, lon1, lat2, lon2);
                prop_assert!((0.0..360.0).contains(&b), "bearing {} out of range", b);
            }

            #[test]
            fn test_normalize_in_range(angle in -10_000.0..10_000.0_f64) {
                let n = normalize_degrees(angle);
                prop_assert!((0.0..360.0).contains(&n));
            }
        }
    }
}
