//! Camera request throttling.
//!
//! GPS fixes arrive several times a second and most of them move the camera
//! by less than the map can show. The policy drops those requests while
//! letting anything that changes the view (zoom, pitch, heading) through.
//!
//! Evaluation order for a request:
//!
//! 1. Empty request: drop.
//! 2. Moves less than `min_distance_m` without view parameters: drop.
//! 3. Inside `min_interval_ms` of the last applied command, moves less
//!    than `fast_distance_m` without view parameters: drop. Before the
//!    first applied command there is no interval to be inside of.
//! 4. Otherwise allow.

use std::fmt;

use super::command::CameraCommand;
use super::config::{DEFAULT_FAST_DISTANCE_M, DEFAULT_MIN_DISTANCE_M, DEFAULT_MIN_INTERVAL_MS};
use crate::geo::LngLat;

/// What the camera was last told to do.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThrottleState {
    /// Center of the last applied command (or the last settled region).
    pub last_applied_center: Option<LngLat>,
    /// When the last command was applied, `None` until the first one.
    pub last_applied_at_ms: Option<u64>,
    /// When the last applied animation finishes.
    pub animating_until_ms: u64,
}

impl ThrottleState {
    /// Record an applied command.
    pub fn record(&mut self, command: &CameraCommand, now_ms: u64) {
        if let Some(center) = command.center {
            self.last_applied_center = Some(center);
        }
        self.last_applied_at_ms = Some(now_ms);
        self.animating_until_ms = now_ms.saturating_add(u64::from(command.animation_duration_ms));
    }

    /// Advisory: an applied animation is still running.
    pub fn is_animating(&self, now_ms: u64) -> bool {
        now_ms < self.animating_until_ms
    }

    /// Time since the last applied command, `None` if nothing was applied.
    pub fn since_last_applied(&self, now_ms: u64) -> Option<u64> {
        self.last_applied_at_ms.map(|at| now_ms.saturating_sub(at))
    }
}

/// Result of evaluating a request against the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    Allow,
    /// Too close to the last applied center.
    DropNearby,
    /// Too soon after the last applied command for such a short move.
    DropThrottled,
    /// Nothing to do.
    DropEmpty,
}

impl ThrottleDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThrottleDecision::Allow => "allow",
            ThrottleDecision::DropNearby => "drop-nearby",
            ThrottleDecision::DropThrottled => "drop-throttled",
            ThrottleDecision::DropEmpty => "drop-empty",
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, ThrottleDecision::Allow)
    }
}

impl fmt::Display for ThrottleDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Distance and interval thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrottlePolicy {
    pub min_distance_m: f64,
    pub min_interval_ms: u64,
    pub fast_distance_m: f64,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            min_distance_m: DEFAULT_MIN_DISTANCE_M,
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
            fast_distance_m: DEFAULT_FAST_DISTANCE_M,
        }
    }
}

impl ThrottlePolicy {
    /// Decide whether `command` should reach the sink.
    ///
    /// `distance_m` is the distance from the last applied center to the
    /// command's center, or `None` when either is unknown (treated as
    /// arbitrarily far).
    pub fn decide(
        &self,
        state: &ThrottleState,
        command: &CameraCommand,
        distance_m: Option<f64>,
        now_ms: u64,
    ) -> ThrottleDecision {
        if command.is_empty() {
            return ThrottleDecision::DropEmpty;
        }

        let view_change = command.has_view_params();
        let distance = distance_m.unwrap_or(f64::INFINITY);

        if distance < self.min_distance_m && !view_change {
            return ThrottleDecision::DropNearby;
        }

        let inside_interval = state
            .since_last_applied(now_ms)
            .is_some_and(|elapsed| elapsed < self.min_interval_ms);
        if inside_interval && distance < self.fast_distance_m && !view_change {
            return ThrottleDecision::DropThrottled;
        }

        ThrottleDecision::Allow
    }
}
