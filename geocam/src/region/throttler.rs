//! Crosshair readout throttling for continuous map gestures.
//!
//! While the user drags the map the engine reports the region many times
//! per frame. Only the newest center matters, and it only needs to reach
//! the screen once per animation frame. Each event overwrites the pending
//! coordinate and moves the single frame callback to the next frame
//! boundary; the callback applies the pending coordinate if its generation
//! is still current. After an apply the crosshair stays visible until
//! `hide_after_ms` passes without another apply.
//!
//! The throttler owns no clock. A driver calls [`advance`] with the current
//! time (or sleeps until [`next_deadline`]) and renders the returned events.
//!
//! [`advance`]: RegionChangeThrottler::advance
//! [`next_deadline`]: RegionChangeThrottler::next_deadline
//!
//! # Example Configuration (INI)
//!
//! ```ini
//! [crosshair]
//! frame_interval_ms = 16
//! hide_after_ms = 2000
//! ```

use super::scheduler::{next_frame_boundary, TimerSlot};
use super::state::{RawRegionState, RegionSnapshot};
use crate::geo::LngLat;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Animation frame interval (about 60 fps).
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

/// How long the crosshair stays visible after the last update.
pub const DEFAULT_HIDE_AFTER_MS: u64 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrosshairConfig {
    pub frame_interval_ms: u64,
    pub hide_after_ms: u64,
}

impl Default for CrosshairConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            hide_after_ms: DEFAULT_HIDE_AFTER_MS,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

/// Newest coordinate waiting for the next frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingCrosshairCoordinate {
    pub lat: f64,
    pub lon: f64,
    pub captured_at_ms: u64,
    pub generation: u64,
}

/// Visible crosshair changes produced by [`RegionChangeThrottler::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrosshairEvent {
    /// The crosshair is visible and reads `coordinate`.
    Shown { coordinate: LngLat, at_ms: u64 },
    /// The crosshair was hidden after inactivity.
    Hidden { at_ms: u64 },
}

impl CrosshairEvent {
    pub fn at_ms(&self) -> u64 {
        match self {
            CrosshairEvent::Shown { at_ms, .. } | CrosshairEvent::Hidden { at_ms } => *at_ms,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Throttler
// ─────────────────────────────────────────────────────────────────────────────

/// Rate-limits region-change callbacks into crosshair updates.
#[derive(Debug, Clone, Default)]
pub struct RegionChangeThrottler {
    config: CrosshairConfig,
    pending: Option<PendingCrosshairCoordinate>,
    frame: TimerSlot,
    hide: TimerSlot,
    displayed: Option<LngLat>,
    visible: bool,
    received: u64,
    applied: u64,
}

impl RegionChangeThrottler {
    pub fn new(config: CrosshairConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &CrosshairConfig {
        &self.config
    }

    /// Handle a region-is-changing callback. Returns the decoded snapshot
    /// so the caller can react to user gestures.
    pub fn on_region_is_changing(&mut self, state: &RawRegionState, now_ms: u64) -> RegionSnapshot {
        let snapshot = state.snapshot();
        self.submit(&snapshot, now_ms);
        snapshot
    }

    /// Handle a region-did-change (settle) callback.
    ///
    /// Zoom and bounds are returned right away; the center still goes
    /// through the frame path so the readout stays consistent.
    pub fn on_region_did_change(&mut self, state: &RawRegionState, now_ms: u64) -> RegionSnapshot {
        let snapshot = state.snapshot();
        self.submit(&snapshot, now_ms);
        tracing::debug!(
            zoom = snapshot.zoom,
            has_bounds = snapshot.bounds.is_some(),
            "Region settled"
        );
        snapshot
    }

    fn submit(&mut self, snapshot: &RegionSnapshot, now_ms: u64) {
        self.received += 1;
        let Some(center) = snapshot.center else {
            return;
        };

        let due = next_frame_boundary(now_ms, self.config.frame_interval_ms);
        let generation = self.frame.schedule(due);
        self.pending = Some(PendingCrosshairCoordinate {
            lat: center.lat,
            lon: center.lon,
            captured_at_ms: now_ms,
            generation,
        });
        tracing::trace!(generation, due, "Crosshair frame scheduled");
    }

    /// Fire every timer due at or before `now_ms`, in time order.
    pub fn advance(&mut self, now_ms: u64) -> Vec<CrosshairEvent> {
        let mut events = Vec::new();

        loop {
            let frame_due = self.frame.due_at().filter(|due| *due <= now_ms);
            let hide_due = self.hide.due_at().filter(|due| *due <= now_ms);

            match (frame_due, hide_due) {
                (Some(frame), Some(hide)) if hide < frame => self.fire_hide(now_ms, &mut events),
                (Some(_), _) => self.fire_frame(now_ms, &mut events),
                (None, Some(_)) => self.fire_hide(now_ms, &mut events),
                (None, None) => break,
            }
        }

        events
    }

    fn fire_frame(&mut self, now_ms: u64, events: &mut Vec<CrosshairEvent>) {
        let Some((generation, at_ms)) = self.frame.fire(now_ms) else {
            return;
        };
        let pending = match self.pending {
            Some(pending) if pending.generation == generation => pending,
            _ => {
                tracing::trace!(generation, "Stale crosshair frame ignored");
                return;
            }
        };
        self.pending = None;

        let coordinate = LngLat::new(pending.lon, pending.lat);
        self.displayed = Some(coordinate);
        self.visible = true;
        self.applied += 1;
        self.hide.schedule(at_ms.saturating_add(self.config.hide_after_ms));
        events.push(CrosshairEvent::Shown { coordinate, at_ms });
    }

    fn fire_hide(&mut self, now_ms: u64, events: &mut Vec<CrosshairEvent>) {
        if let Some((_, at_ms)) = self.hide.fire(now_ms) {
            self.visible = false;
            events.push(CrosshairEvent::Hidden { at_ms });
        }
    }

    /// Earliest time a timer is due.
    pub fn next_deadline(&self) -> Option<u64> {
        match (self.frame.due_at(), self.hide.due_at()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Cancel all timers and forget the pending coordinate (unmount).
    pub fn cancel_all(&mut self) {
        self.frame.cancel();
        self.hide.cancel();
        self.pending = None;
        self.visible = false;
    }

    pub fn pending(&self) -> Option<&PendingCrosshairCoordinate> {
        self.pending.as_ref()
    }

    /// Coordinate currently shown by the crosshair readout.
    pub fn displayed(&self) -> Option<LngLat> {
        self.displayed
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// (events received, coordinates applied)
    pub fn stats(&self) -> (u64, u64) {
        (self.received, self.applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(lon: f64, lat: f64) -> RawRegionState {
        RawRegionState::at(LngLat::new(lon, lat))
    }

    #[test]
    fn test_single_event_applies_at_next_frame() {
        let mut throttler = RegionChangeThrottler::default();
        throttler.on_region_is_changing(&at(29.0, 41.0), 5);

        assert!(throttler.advance(15).is_empty());
        let events = throttler.advance(16);
        assert_eq!(
            events,
            vec![CrosshairEvent::Shown {
                coordinate: LngLat::new(29.0, 41.0),
                at_ms: 16
            }]
        );
        assert!(throttler.is_visible());
        assert!(throttler.pending().is_none());
    }

    #[test]
    fn test_burst_within_frame_applies_newest_once() {
        let mut throttler = RegionChangeThrottler::default();
        for (i, t) in [1u64, 4, 9, 14].into_iter().enumerate() {
            throttler.on_region_is_changing(&at(29.0 + i as f64 * 0.001, 41.0), t);
        }

        let events = throttler.advance(20);
        assert_eq!(events.len(), 1);
        assert_eq!(throttler.displayed(), Some(LngLat::new(29.0 + 3.0 * 0.001, 41.0)));
        assert_eq!(throttler.stats(), (4, 1));
    }

    #[test]
    fn test_two_hundred_events_in_one_second() {
        let mut throttler = RegionChangeThrottler::default();
        let mut applies = 0;

        for i in 0..200u64 {
            let now = i * 5;
            applies += throttler
                .advance(now)
                .iter()
                .filter(|e| matches!(e, CrosshairEvent::Shown { .. }))
                .count();
            throttler.on_region_is_changing(&at(29.0 + i as f64 * 1e-5, 41.0), now);
        }
        applies += throttler
            .advance(1_000 + DEFAULT_FRAME_INTERVAL_MS)
            .iter()
            .filter(|e| matches!(e, CrosshairEvent::Shown { .. }))
            .count();

        assert!(applies <= 63, "too many applies: {}", applies);
        assert!(applies >= 50, "frames were starved: {}", applies);
        assert_eq!(throttler.displayed(), Some(LngLat::new(29.0 + 199.0 * 1e-5, 41.0)));
    }

    #[test]
    fn test_hides_after_inactivity() {
        let mut throttler = RegionChangeThrottler::default();
        throttler.on_region_is_changing(&at(29.0, 41.0), 0);
        throttler.advance(16);

        assert!(throttler.advance(2_015).is_empty());
        assert_eq!(
            throttler.advance(2_016),
            vec![CrosshairEvent::Hidden { at_ms: 2_016 }]
        );
        assert!(!throttler.is_visible());
        assert_eq!(throttler.next_deadline(), None);
    }

    #[test]
    fn test_new_apply_postpones_hide() {
        let mut throttler = RegionChangeThrottler::default();
        throttler.on_region_is_changing(&at(29.0, 41.0), 0);
        throttler.advance(16);
        throttler.on_region_is_changing(&at(29.1, 41.0), 1_500);

        let events = throttler.advance(2_100);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], CrosshairEvent::Shown { at_ms: 1_504, .. }));
        assert_eq!(throttler.next_deadline(), Some(3_504));
    }

    #[test]
    fn test_advance_orders_timers() {
        let mut throttler = RegionChangeThrottler::default();
        throttler.on_region_is_changing(&at(29.0, 41.0), 0);
        throttler.advance(16);
        throttler.on_region_is_changing(&at(29.1, 41.0), 2_500);

        // Hide (2016) fires before the new frame (2512)
        let events = throttler.advance(3_000);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], CrosshairEvent::Hidden { at_ms: 2_016 }));
        assert!(matches!(events[1], CrosshairEvent::Shown { at_ms: 2_512, .. }));
        assert!(throttler.is_visible());
    }

    #[test]
    fn test_end_of_clock_does_not_overflow() {
        let mut throttler = RegionChangeThrottler::default();
        throttler.on_region_is_changing(&at(29.0, 41.0), u64::MAX - 5);
        assert_eq!(throttler.next_deadline(), Some(u64::MAX));

        let events = throttler.advance(u64::MAX);
        assert!(matches!(events.first(), Some(CrosshairEvent::Shown { .. })));
        assert_eq!(throttler.displayed(), Some(LngLat::new(29.0, 41.0)));
    }

    #[test]
    fn test_settle_returns_zoom_immediately() {
        let mut throttler = RegionChangeThrottler::default();
        let state = RawRegionState::from_json(&serde_json::json!({
            "properties": { "center": [29.0, 41.0], "zoom": 11.0 }
        }))
        .unwrap();

        let snapshot = throttler.on_region_did_change(&state, 100);
        assert_eq!(snapshot.zoom, Some(11.0));
        assert!(throttler.displayed().is_none());
        throttler.advance(112);
        assert_eq!(throttler.displayed(), Some(LngLat::new(29.0, 41.0)));
    }

    #[test]
    fn test_event_without_center_schedules_nothing() {
        let mut throttler = RegionChangeThrottler::default();
        let state = RawRegionState::from_json(&serde_json::json!({
            "properties": { "zoom": 4.0 }
        }))
        .unwrap();
        throttler.on_region_is_changing(&state, 0);
        assert_eq!(throttler.next_deadline(), None);
        assert_eq!(throttler.stats(), (1, 0));
    }

    #[test]
    fn test_cancel_all() {
        let mut throttler = RegionChangeThrottler::default();
        throttler.on_region_is_changing(&at(29.0, 41.0), 0);
        throttler.cancel_all();
        assert!(throttler.advance(10_000).is_empty());
        assert!(throttler.pending().is_none());
    }
}
