//! Geographic primitives
//!
//! Positions, camera centers and viewport bounds, plus the distance and
//! bearing math the camera controller and course estimator share.

mod bearing;
mod distance;
mod types;

pub use bearing::{
    angular_difference, cardinal_point, compass_point, initial_bearing, normalize_degrees,
};
pub use distance::{
    distance_m, distance_nm, haversine_m, DistanceMemo, EARTH_RADIUS_M, METERS_PER_NAUTICAL_MILE,
};
pub use types::{
    check_coordinate, is_valid_coordinate, GeoError, GeoPosition, LngLat, MapBounds, MAX_LAT,
    MAX_LON, MIN_LAT, MIN_LON,
};
