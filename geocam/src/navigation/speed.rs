//! Speed over ground.

use crate::geo::{haversine_m, GeoPosition};

/// Knots per metre-per-second.
const KNOTS_PER_MPS: f64 = 1.943_84;

/// Metres-per-second per knot.
const MPS_PER_KNOT: f64 = 0.514_444;

pub fn mps_to_knots(mps: f64) -> f64 {
    mps * KNOTS_PER_MPS
}

pub fn knots_to_mps(knots: f64) -> f64 {
    knots * MPS_PER_KNOT
}

/// Speed between two fixes in knots, rounded to 0.1 kt.
///
/// Returns 0 when the fixes are not in chronological order or share a
/// timestamp.
pub fn speed_over_ground_knots(previous: &GeoPosition, current: &GeoPosition) -> f64 {
    if current.timestamp_ms <= previous.timestamp_ms {
        return 0.0;
    }
    let elapsed_s = (current.timestamp_ms - previous.timestamp_ms) as f64 / 1000.0;
    let meters = haversine_m(
        previous.latitude,
        previous.longitude,
        current.latitude,
        current.longitude,
    );
    (mps_to_knots(meters / elapsed_s) * 10.0).round() / 10.0
}
