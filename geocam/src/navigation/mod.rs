//! Navigation readouts derived from consecutive position fixes.
//!
//! Course over ground (COG) is the bearing actually travelled between two
//! fixes, as opposed to the device compass heading. Speed over ground (SOG)
//! is reported in knots.

mod cog;
mod speed;

pub use cog::{CogConfig, CourseOverGroundEstimator, DEFAULT_COG_MIN_INTERVAL_MS};
pub use speed::{knots_to_mps, mps_to_knots, speed_over_ground_knots};

pub use crate::geo::{cardinal_point, compass_point};
