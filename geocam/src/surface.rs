//! Per-screen wiring of the camera, crosshair and course components.
//!
//! A [`MapSurface`] is what a map screen holds for its lifetime. The host
//! forwards map engine callbacks, location fixes and form submissions to
//! it; every method takes the event loop's current time.
//!
//! ```text
//! LocationFeed ─► pump_location ─► COG estimator
//!                                └► SmartCameraController ─► CameraSink
//! region callbacks ─► RegionChangeThrottler ─► crosshair events
//!                         │ user gesture        │ settle
//!                         └──► follow override  └──► controller state
//! coordinate form ─► coord::parse ─► navigate_to
//! SmartLocator ─► center_on_device ─► center_initially
//! ```

use crate::camera::{CameraConfig, CameraSink, RequestOutcome, SmartCameraController};
use crate::config::GeocamConfig;
use crate::coord::{self, text, CoordinateFormat, FieldSet, TextParseError, ValidationError};
use crate::geo::GeoPosition;
use crate::location::{LocateOutcome, LocationTracker, SmartLocator};
use crate::navigation::{
    mps_to_knots, speed_over_ground_knots, CogConfig, CourseOverGroundEstimator,
};
use crate::region::{
    CrosshairConfig, CrosshairEvent, RawRegionState, RegionChangeThrottler, RegionSnapshot,
    RegionStateError,
};

/// One map screen's geospatial state.
#[derive(Debug)]
pub struct MapSurface {
    camera: SmartCameraController,
    crosshair: RegionChangeThrottler,
    cog: CourseOverGroundEstimator,
    last_fix: Option<GeoPosition>,
    speed_knots: Option<f64>,
}

impl MapSurface {
    pub fn new(camera: CameraConfig, crosshair: CrosshairConfig, cog: CogConfig) -> Self {
        Self {
            camera: SmartCameraController::new(camera),
            crosshair: RegionChangeThrottler::new(crosshair),
            cog: CourseOverGroundEstimator::new(cog),
            last_fix: None,
            speed_knots: None,
        }
    }

    pub fn from_config(config: &GeocamConfig) -> Self {
        Self::new(config.camera.clone(), config.crosshair, config.cog)
    }

    /// Follow the device location through `tracker`.
    pub fn with_location(mut self, tracker: LocationTracker) -> Self {
        self.camera = self.camera.with_location(tracker);
        self
    }

    pub fn attach_sink(&mut self, sink: Box<dyn CameraSink>) {
        self.camera.attach_sink(sink);
    }

    pub fn detach_sink(&mut self) -> Option<Box<dyn CameraSink>> {
        self.camera.detach_sink()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Map engine callbacks
    // ─────────────────────────────────────────────────────────────────────

    pub fn on_map_ready(&mut self, now_ms: u64) -> Option<RequestOutcome> {
        self.camera.on_map_ready(now_ms)
    }

    /// Continuous region change while the map moves.
    ///
    /// A user gesture overrides follow mode immediately; the crosshair
    /// update waits for the next frame.
    pub fn on_region_is_changing(&mut self, state: &RawRegionState, now_ms: u64) -> RegionSnapshot {
        let snapshot = self.crosshair.on_region_is_changing(state, now_ms);
        if snapshot.user_gesture {
            self.camera.on_user_gesture();
        }
        snapshot
    }

    pub fn on_region_is_changing_json(
        &mut self,
        value: &serde_json::Value,
        now_ms: u64,
    ) -> Result<RegionSnapshot, RegionStateError> {
        let state = RawRegionState::from_json(value)?;
        Ok(self.on_region_is_changing(&state, now_ms))
    }

    /// The map settled. Center, zoom and bounds go to the controller at once.
    pub fn on_region_did_change(&mut self, state: &RawRegionState, now_ms: u64) -> RegionSnapshot {
        let snapshot = self.crosshair.on_region_did_change(state, now_ms);
        self.camera.on_region_settled(&snapshot);
        snapshot
    }

    pub fn on_region_did_change_json(
        &mut self,
        value: &serde_json::Value,
        now_ms: u64,
    ) -> Result<RegionSnapshot, RegionStateError> {
        let state = RawRegionState::from_json(value)?;
        Ok(self.on_region_did_change(&state, now_ms))
    }

    /// Fire due crosshair timers.
    pub fn advance(&mut self, now_ms: u64) -> Vec<CrosshairEvent> {
        self.crosshair.advance(now_ms)
    }

    /// When [`advance`](Self::advance) next has work to do.
    pub fn next_deadline(&self) -> Option<u64> {
        self.crosshair.next_deadline()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Location
    // ─────────────────────────────────────────────────────────────────────

    pub fn on_locate_pressed(&mut self, now_ms: u64) -> Option<RequestOutcome> {
        self.camera.on_locate_pressed(now_ms)
    }

    /// Center the map once on the device position, for the first frame.
    ///
    /// A found position goes through `center_initially` (with the locate
    /// zoom if no zoom is known yet) and becomes the resync fallback. When
    /// every step of the lookup fails the camera and follow mode are left
    /// as they are.
    pub async fn center_on_device(
        &mut self,
        locator: &SmartLocator,
        now_ms: u64,
    ) -> (LocateOutcome, Option<RequestOutcome>) {
        let outcome = locator.locate(now_ms).await;

        let Some(position) = outcome.position else {
            tracing::warn!(
                failures = outcome.failures.len(),
                "Device position unavailable, camera left in place"
            );
            return (outcome, None);
        };

        let zoom = match self.camera.zoom() {
            Some(_) => None,
            None => Some(self.camera.config().locate_zoom),
        };
        let applied = self.camera.center_initially(position.center(), zoom, now_ms);
        tracing::debug!(
            source = ?outcome.source,
            outcome = %applied,
            "Centered on device position"
        );
        (outcome, Some(applied))
    }

    /// Process every fix queued on the location subscription.
    pub fn pump_location(&mut self, now_ms: u64) -> Vec<RequestOutcome> {
        self.camera
            .take_location_fixes()
            .iter()
            .filter_map(|fix| self.on_fix(fix, now_ms))
            .collect()
    }

    /// Process one fix: course, speed, then follow mode.
    pub fn on_fix(&mut self, fix: &GeoPosition, now_ms: u64) -> Option<RequestOutcome> {
        if !fix.is_valid() {
            tracing::warn!(fix = %fix, "Ignoring fix outside WGS84 bounds");
            return None;
        }

        self.cog.update(fix);
        let speed = match (fix.speed_mps, self.last_fix) {
            (Some(mps), _) => Some(mps_to_knots(mps)),
            (None, Some(previous)) if fix.timestamp_ms > previous.timestamp_ms => {
                Some(speed_over_ground_knots(&previous, fix))
            }
            _ => self.speed_knots,
        };
        self.speed_knots = speed;
        self.last_fix = Some(*fix);

        self.camera.on_position(fix, now_ms)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Coordinate entry
    // ─────────────────────────────────────────────────────────────────────

    /// Parse the coordinate form and fly there.
    pub fn submit_coordinates(
        &mut self,
        fields: &FieldSet,
        format: CoordinateFormat,
        now_ms: u64,
    ) -> Result<RequestOutcome, ValidationError> {
        let parsed = coord::parse(fields, format)?;
        tracing::debug!(format = %format, coordinate = %parsed, "Coordinate submitted");
        Ok(self
            .camera
            .navigate_to(parsed.latitude, parsed.longitude, now_ms)?)
    }

    /// Parse pasted coordinate text in any supported format and fly there.
    pub fn submit_text(
        &mut self,
        input: &str,
        now_ms: u64,
    ) -> Result<(CoordinateFormat, RequestOutcome), TextParseError> {
        let (format, parsed) = text::parse_auto(input)?;
        let outcome = self
            .camera
            .navigate_to(parsed.latitude, parsed.longitude, now_ms)?;
        Ok((format, outcome))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lifecycle and accessors
    // ─────────────────────────────────────────────────────────────────────

    /// The screen is unmounting.
    pub fn teardown(&mut self) {
        self.crosshair.cancel_all();
        self.camera.teardown();
        self.cog.reset();
        tracing::info!("Map surface torn down");
    }

    pub fn camera(&self) -> &SmartCameraController {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut SmartCameraController {
        &mut self.camera
    }

    pub fn crosshair(&self) -> &RegionChangeThrottler {
        &self.crosshair
    }

    /// Course over ground in degrees.
    pub fn course(&self) -> Option<f64> {
        self.cog.course()
    }

    /// Speed over ground in knots, from the fix or derived from the last two.
    pub fn speed_knots(&self) -> Option<f64> {
        self.speed_knots
    }
}

impl Default for MapSurface {
    fn default() -> Self {
        Self::from_config(&GeocamConfig::default())
    }
}
