//! Camera controller tunables.
//!
//! # Example Configuration (INI)
//!
//! ```ini
//! [camera]
//! min_distance_m = 10
//! min_interval_ms = 700
//! fast_distance_m = 50
//! default_animation_ms = 600
//! max_zoom = 22
//! ```

use super::command::DEFAULT_ANIMATION_MS;
use super::throttle::ThrottlePolicy;

/// Moves shorter than this are dropped unless they change the view.
pub const DEFAULT_MIN_DISTANCE_M: f64 = 10.0;

/// Minimum spacing between applied commands.
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 700;

/// Inside the interval, moves shorter than this are dropped.
pub const DEFAULT_FAST_DISTANCE_M: f64 = 50.0;

/// Configuration for [`SmartCameraController`](super::SmartCameraController).
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub min_distance_m: f64,
    pub min_interval_ms: u64,
    pub fast_distance_m: f64,

    /// Animation for follow-mode and cluster moves.
    pub default_animation_ms: u32,

    /// Animation for long jumps (coordinate entry, spot focus, locate).
    pub fly_animation_ms: u32,

    /// Animation for the 2D/3D toggle.
    pub pitch_animation_ms: u32,

    /// Highest zoom the map engine supports.
    pub max_zoom: f64,

    /// Zoom used when navigating to an entered coordinate.
    pub navigate_zoom: f64,

    /// Zoom used when focusing a fishing spot.
    pub focus_zoom: f64,

    /// Zoom used on locate when the current zoom is unknown.
    pub locate_zoom: f64,

    /// Zoom levels added when a cluster is tapped.
    pub cluster_zoom_step: f64,

    /// Capacity of the distance memo (0 disables it).
    pub distance_memo_capacity: usize,

    /// Lifetime of a memoized distance.
    pub distance_memo_ttl_ms: u64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_distance_m: DEFAULT_MIN_DISTANCE_M,
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
            fast_distance_m: DEFAULT_FAST_DISTANCE_M,
            default_animation_ms: DEFAULT_ANIMATION_MS,
            fly_animation_ms: 1_000,
            pitch_animation_ms: 300,
            max_zoom: 22.0,
            navigate_zoom: 16.0,
            focus_zoom: 14.0,
            locate_zoom: 14.0,
            cluster_zoom_step: 2.0,
            distance_memo_capacity: 8,
            distance_memo_ttl_ms: 5_000,
        }
    }
}

impl CameraConfig {
    /// The throttle thresholds in this configuration.
    pub fn throttle_policy(&self) -> ThrottlePolicy {
        ThrottlePolicy {
            min_distance_m: self.min_distance_m,
            min_interval_ms: self.min_interval_ms,
            fast_distance_m: self.fast_distance_m,
        }
    }
}
