//! Smart camera controller.
//!
//! Owns the throttle state, follow mode and location subscription for one
//! map screen and decides which camera requests reach the map engine.

use std::fmt;

use super::command::{AnimationMode, CameraCommand};
use super::config::CameraConfig;
use super::follow::FollowMode;
use super::sink::CameraSink;
use super::throttle::{ThrottleDecision, ThrottlePolicy, ThrottleState};
use crate::geo::{check_coordinate, DistanceMemo, GeoError, GeoPosition, LngLat, MapBounds};
use crate::location::LocationTracker;
use crate::region::RegionSnapshot;

/// What happened to a camera request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
    /// Forwarded to the sink.
    Applied,
    /// Too close to the current center.
    DroppedNearby,
    /// Too soon after the previous command for such a short move.
    DroppedThrottled,
    /// Nothing to move.
    DroppedEmpty,
    /// No map is attached; the request is discarded, not queued.
    SinkDetached,
    /// The controller has been torn down.
    Stopped,
    /// A position fix arrived while not following.
    IgnoredByFollowMode,
}

impl RequestOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestOutcome::Applied => "applied",
            RequestOutcome::DroppedNearby => "dropped-nearby",
            RequestOutcome::DroppedThrottled => "dropped-throttled",
            RequestOutcome::DroppedEmpty => "dropped-empty",
            RequestOutcome::SinkDetached => "sink-detached",
            RequestOutcome::Stopped => "stopped",
            RequestOutcome::IgnoredByFollowMode => "ignored-by-follow-mode",
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, RequestOutcome::Applied)
    }
}

impl fmt::Display for RequestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<ThrottleDecision> for RequestOutcome {
    fn from(decision: ThrottleDecision) -> Self {
        match decision {
            ThrottleDecision::Allow => RequestOutcome::Applied,
            ThrottleDecision::DropNearby => RequestOutcome::DroppedNearby,
            ThrottleDecision::DropThrottled => RequestOutcome::DroppedThrottled,
            ThrottleDecision::DropEmpty => RequestOutcome::DroppedEmpty,
        }
    }
}

/// Running totals of request outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CameraStats {
    pub applied: u64,
    pub dropped_nearby: u64,
    pub dropped_throttled: u64,
    pub dropped_empty: u64,
    pub sink_detached: u64,
    pub stopped: u64,
    pub ignored: u64,
}

impl CameraStats {
    fn record(&mut self, outcome: RequestOutcome) {
        let counter = match outcome {
            RequestOutcome::Applied => &mut self.applied,
            RequestOutcome::DroppedNearby => &mut self.dropped_nearby,
            RequestOutcome::DroppedThrottled => &mut self.dropped_throttled,
            RequestOutcome::DroppedEmpty => &mut self.dropped_empty,
            RequestOutcome::SinkDetached => &mut self.sink_detached,
            RequestOutcome::Stopped => &mut self.stopped,
            RequestOutcome::IgnoredByFollowMode => &mut self.ignored,
        };
        *counter += 1;
    }

    /// Requests that did not reach the sink.
    pub fn dropped(&self) -> u64 {
        self.dropped_nearby
            + self.dropped_throttled
            + self.dropped_empty
            + self.sink_detached
            + self.stopped
            + self.ignored
    }
}

/// Decides when and how to move the map camera.
pub struct SmartCameraController {
    config: CameraConfig,
    policy: ThrottlePolicy,
    throttle: ThrottleState,
    follow: FollowMode,
    sink: Option<Box<dyn CameraSink>>,
    distances: DistanceMemo,
    tracker: Option<LocationTracker>,
    zoom: Option<f64>,
    bounds: Option<MapBounds>,
    last_position: Option<GeoPosition>,
    fallback_center: Option<LngLat>,
    stats: CameraStats,
}

impl SmartCameraController {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            policy: config.throttle_policy(),
            distances: DistanceMemo::new(config.distance_memo_capacity, config.distance_memo_ttl_ms),
            config,
            throttle: ThrottleState::default(),
            follow: FollowMode::Idle,
            sink: None,
            tracker: None,
            zoom: None,
            bounds: None,
            last_position: None,
            fallback_center: None,
            stats: CameraStats::default(),
        }
    }

    /// Use `tracker` for follow mode.
    pub fn with_location(mut self, tracker: LocationTracker) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────
    // Sink lifecycle
    // ─────────────────────────────────────────────────────────────────────

    pub fn attach_sink(&mut self, sink: Box<dyn CameraSink>) {
        self.sink = Some(sink);
        tracing::debug!("Camera sink attached");
    }

    pub fn detach_sink(&mut self) -> Option<Box<dyn CameraSink>> {
        let sink = self.sink.take();
        if sink.is_some() {
            tracing::debug!("Camera sink detached");
        }
        sink
    }

    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// Center used to resync the map when nothing has been applied yet.
    pub fn set_fallback_center(&mut self, center: LngLat) {
        self.fallback_center = Some(center);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Requests
    // ─────────────────────────────────────────────────────────────────────

    /// Evaluate a request against the throttle policy and forward it if
    /// allowed.
    pub fn request(&mut self, command: CameraCommand, now_ms: u64) -> RequestOutcome {
        if self.follow.is_stopped() {
            return self.finish(&command, RequestOutcome::Stopped);
        }
        if self.sink.is_none() {
            return self.finish(&command, RequestOutcome::SinkDetached);
        }

        let distance = match (self.throttle.last_applied_center, command.center) {
            (Some(from), Some(to)) => Some(self.distances.distance_m(from, to)),
            _ => None,
        };

        let decision = self
            .policy
            .decide(&self.throttle, &command, distance, now_ms);
        if decision.is_allowed() {
            self.apply(&command, now_ms);
        } else {
            tracing::debug!(
                decision = %decision,
                distance_m = distance,
                since_last_ms = self.throttle.since_last_applied(now_ms),
                "Camera request dropped"
            );
        }
        self.finish(&command, decision.into())
    }

    fn apply(&mut self, command: &CameraCommand, now_ms: u64) {
        if let Some(sink) = &self.sink {
            sink.set_camera(command);
        }
        self.throttle.record(command, now_ms);
        if let Some(zoom) = command.zoom {
            self.zoom = Some(zoom);
        }
    }

    fn finish(&mut self, command: &CameraCommand, outcome: RequestOutcome) -> RequestOutcome {
        self.stats.record(outcome);
        tracing::trace!(outcome = %outcome, command = %command, "Camera request");
        outcome
    }

    fn set_follow(&mut self, next: FollowMode, reason: &'static str) {
        if next != self.follow {
            tracing::info!(from = %self.follow, to = %next, reason, "Follow mode changed");
            self.follow = next;
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Follow mode
    // ─────────────────────────────────────────────────────────────────────

    /// The locate button was pressed: start following and center on the
    /// current position if one is known.
    pub fn on_locate_pressed(&mut self, now_ms: u64) -> Option<RequestOutcome> {
        if self.follow.is_stopped() {
            return Some(self.finish(&CameraCommand::default(), RequestOutcome::Stopped));
        }

        self.set_follow(self.follow.on_locate_pressed(), "locate pressed");
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.start();
        }

        let known = self
            .last_position
            .or_else(|| self.tracker.as_ref().and_then(LocationTracker::last_known))?;
        self.last_position = Some(known);

        let mut command = CameraCommand::to(known.center())
            .with_mode(AnimationMode::Fly)
            .with_duration(self.config.fly_animation_ms);
        if self.zoom.is_none() {
            command = command.with_zoom(self.config.locate_zoom);
        }
        Some(self.request(command, now_ms))
    }

    /// A position fix arrived. Moves the camera only while following.
    ///
    /// Returns `None` for fixes outside WGS84 bounds.
    pub fn on_position(&mut self, fix: &GeoPosition, now_ms: u64) -> Option<RequestOutcome> {
        if !fix.is_valid() {
            tracing::warn!(fix = %fix, "Ignoring fix outside WGS84 bounds");
            return None;
        }

        let command = CameraCommand::to(fix.center()).with_duration(self.config.default_animation_ms);
        match self.follow {
            FollowMode::Stopped => Some(self.finish(&command, RequestOutcome::Stopped)),
            FollowMode::Following => {
                self.last_position = Some(*fix);
                Some(self.request(command, now_ms))
            }
            FollowMode::Idle | FollowMode::ManualOverride => {
                self.last_position = Some(*fix);
                Some(self.finish(&command, RequestOutcome::IgnoredByFollowMode))
            }
        }
    }

    /// Fixes queued on the location subscription since the last call.
    pub fn take_location_fixes(&mut self) -> Vec<GeoPosition> {
        self.tracker
            .as_mut()
            .map(LocationTracker::drain)
            .unwrap_or_default()
    }

    /// The user started dragging or pinching the map.
    pub fn on_user_gesture(&mut self) {
        self.set_follow(self.follow.on_user_gesture(), "user gesture");
    }

    // ─────────────────────────────────────────────────────────────────────
    // Explicit navigation
    // ─────────────────────────────────────────────────────────────────────

    fn navigate(&mut self, command: CameraCommand, reason: &'static str, now_ms: u64) -> RequestOutcome {
        if self.follow.is_stopped() {
            return self.finish(&command, RequestOutcome::Stopped);
        }
        self.set_follow(self.follow.on_explicit_navigation(), reason);
        self.request(command, now_ms)
    }

    /// Fly to an entered coordinate.
    pub fn navigate_to(&mut self, lat: f64, lon: f64, now_ms: u64) -> Result<RequestOutcome, GeoError> {
        let center = LngLat::from_lat_lon(lat, lon)?;
        let command = CameraCommand::to(center)
            .with_zoom(self.config.navigate_zoom)
            .with_mode(AnimationMode::Fly)
            .with_duration(self.config.fly_animation_ms);
        Ok(self.navigate(command, "coordinate entry", now_ms))
    }

    /// Fly to a fishing spot.
    pub fn focus_spot(&mut self, center: LngLat, now_ms: u64) -> Result<RequestOutcome, GeoError> {
        check_coordinate(center.lat, center.lon)?;
        let command = CameraCommand::to(center)
            .with_zoom(self.config.focus_zoom)
            .with_mode(AnimationMode::Fly)
            .with_duration(self.config.fly_animation_ms);
        Ok(self.navigate(command, "spot focus", now_ms))
    }

    /// Zoom into a tapped cluster.
    pub fn on_cluster_tap(&mut self, center: LngLat, now_ms: u64) -> Result<RequestOutcome, GeoError> {
        check_coordinate(center.lat, center.lon)?;
        let current = self.zoom.unwrap_or(self.config.locate_zoom);
        let zoom = (current + self.config.cluster_zoom_step).min(self.config.max_zoom);
        let command = CameraCommand::to(center)
            .with_zoom(zoom)
            .with_duration(self.config.default_animation_ms);
        Ok(self.navigate(command, "cluster tap", now_ms))
    }

    /// Tilt the camera (2D/3D toggle).
    pub fn set_pitch(&mut self, pitch: f64, now_ms: u64) -> RequestOutcome {
        let command = CameraCommand::default()
            .with_pitch(pitch)
            .with_duration(self.config.pitch_animation_ms);
        self.request(command, now_ms)
    }

    /// Jump to the first known position without animation.
    pub fn center_initially(&mut self, center: LngLat, zoom: Option<f64>, now_ms: u64) -> RequestOutcome {
        if self.fallback_center.is_none() {
            self.fallback_center = Some(center);
        }
        let mut command = CameraCommand::to(center).with_duration(0);
        if let Some(zoom) = zoom {
            command = command.with_zoom(zoom);
        }
        self.request(command, now_ms)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Map lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// The map finished loading. Re-applies the last known center and zoom
    /// without animation; a resync is never throttled.
    pub fn on_map_ready(&mut self, now_ms: u64) -> Option<RequestOutcome> {
        let center = self
            .throttle
            .last_applied_center
            .or(self.fallback_center)
            .or_else(|| self.last_position.map(|p| p.center()));

        let command = CameraCommand {
            center,
            zoom: self.zoom,
            ..CameraCommand::default()
        }
        .with_duration(0);

        if self.follow.is_stopped() {
            return Some(self.finish(&command, RequestOutcome::Stopped));
        }
        if command.is_empty() {
            return None;
        }
        if self.sink.is_none() {
            return Some(self.finish(&command, RequestOutcome::SinkDetached));
        }

        tracing::debug!(command = %command, "Resyncing camera on map ready");
        self.apply(&command, now_ms);
        Some(self.finish(&command, RequestOutcome::Applied))
    }

    /// The map settled after a gesture or animation.
    pub fn on_region_settled(&mut self, snapshot: &RegionSnapshot) {
        if let Some(center) = snapshot.center {
            self.throttle.last_applied_center = Some(center);
        }
        if let Some(zoom) = snapshot.zoom {
            self.zoom = Some(zoom);
        }
        if let Some(bounds) = snapshot.bounds {
            self.bounds = Some(bounds);
        }
    }

    /// The map screen is going away. Stops location updates; every later
    /// request returns [`RequestOutcome::Stopped`].
    pub fn teardown(&mut self) {
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.stop();
        }
        self.set_follow(FollowMode::Stopped, "teardown");
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn follow_mode(&self) -> FollowMode {
        self.follow
    }

    /// Advisory: the last applied animation is still running.
    pub fn is_animating(&self, now_ms: u64) -> bool {
        self.throttle.is_animating(now_ms)
    }

    pub fn throttle_state(&self) -> &ThrottleState {
        &self.throttle
    }

    pub fn zoom(&self) -> Option<f64> {
        self.zoom
    }

    pub fn bounds(&self) -> Option<MapBounds> {
        self.bounds
    }

    pub fn last_position(&self) -> Option<GeoPosition> {
        self.last_position
    }

    pub fn is_tracking(&self) -> bool {
        self.tracker.as_ref().is_some_and(LocationTracker::is_active)
    }

    pub fn stats(&self) -> CameraStats {
        self.stats
    }
}

impl fmt::Debug for SmartCameraController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmartCameraController")
            .field("follow", &self.follow)
            .field("throttle", &self.throttle)
            .field("zoom", &self.zoom)
            .field("has_sink", &self.sink.is_some())
            .field("tracker", &self.tracker)
            .field("stats", &self.stats)
            .finish()
    }
}
