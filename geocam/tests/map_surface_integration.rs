//! Integration tests for the map surface.
//!
//! These tests drive a [`MapSurface`] the way a map screen would:
//! - location fixes → course estimate → follow-mode camera commands
//! - region callbacks → crosshair frames and follow overrides
//! - coordinate entry → navigation
//!
//! Run with: `cargo test --test map_surface_integration`

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use geocam::camera::{AnimationMode, CameraCommand, FollowMode, RecordingSink, RequestOutcome};
use geocam::coord::{CoordinateFormat, FieldSet, LatHemisphere, LonHemisphere};
use geocam::geo::{GeoPosition, LngLat};
use geocam::location::{
    LocationFeed, LocationHub, LocationSource, LocationTracker, LocatorConfig, SmartLocator,
};
use geocam::region::{CrosshairEvent, RawRegionState};
use geocam::{GeocamConfig, MapSurface};

// ============================================================================
// Helper Functions
// ============================================================================

/// A surface following `hub`, with a recording sink attached.
fn tracked_surface(hub: &LocationHub) -> (MapSurface, RecordingSink) {
    let feed: Arc<dyn LocationFeed> = Arc::new(hub.clone());
    let sink = RecordingSink::new();
    let mut surface =
        MapSurface::from_config(&GeocamConfig::default()).with_location(LocationTracker::new(feed));
    surface.attach_sink(Box::new(sink.clone()));
    (surface, sink)
}

fn fix(lat: f64, lon: f64, ts: u64) -> GeoPosition {
    GeoPosition::new(lat, lon, ts).unwrap()
}

/// Boat track heading east from the Bosphorus at roughly 8 knots.
fn eastbound_track() -> Vec<GeoPosition> {
    (0..10)
        .map(|i| fix(41.0, 29.0 + i as f64 * 0.0005, i * 10_000))
        .collect()
}

// ============================================================================
// Camera throttling
// ============================================================================

#[test]
fn test_nearby_request_suppressed() {
    let mut surface = MapSurface::default();
    let sink = RecordingSink::new();
    surface.attach_sink(Box::new(sink.clone()));

    surface.on_region_did_change(&RawRegionState::at(LngLat::new(29.0, 41.0)), 0);
    let outcome = surface
        .camera_mut()
        .request(CameraCommand::to(LngLat::new(29.00003, 41.00003)), 10_000);

    assert_eq!(outcome, RequestOutcome::DroppedNearby);
    assert_eq!(sink.len(), 0);
}

#[test]
fn test_zoom_request_overrides_interval() {
    let mut surface = MapSurface::default();
    let sink = RecordingSink::new();
    surface.attach_sink(Box::new(sink.clone()));

    let camera = surface.camera_mut();
    camera.request(CameraCommand::to(LngLat::new(29.0, 41.0)), 1_000);
    camera.request(
        CameraCommand::to(LngLat::new(29.0, 41.0)).with_zoom(15.0),
        1_100,
    );

    assert_eq!(sink.len(), 2);
    assert_eq!(sink.commands()[1].zoom, Some(15.0));
}

// ============================================================================
// Follow mode
// ============================================================================

#[test]
fn test_follow_mode_end_to_end() {
    let hub = LocationHub::new();
    let (mut surface, sink) = tracked_surface(&hub);

    hub.publish(fix(41.0, 29.0, 0));
    assert_eq!(surface.on_locate_pressed(0), Some(RequestOutcome::Applied));
    assert_eq!(surface.camera().follow_mode(), FollowMode::Following);
    assert_eq!(hub.subscriber_count(), 1);

    let first = sink.last().unwrap();
    assert_eq!(first.animation_mode, AnimationMode::Fly);
    assert_eq!(first.zoom, Some(14.0));

    let mut outcomes = Vec::new();
    for position in eastbound_track().into_iter().skip(1) {
        hub.publish(position);
        outcomes.extend(surface.pump_location(position.timestamp_ms));
    }
    assert_eq!(outcomes.len(), 9);
    assert!(outcomes.iter().all(RequestOutcome::is_applied));

    // Course is due east and each follow command is a center-only ease
    let course = surface.course().unwrap();
    assert!((course - 90.0).abs() < 0.1, "got {}", course);
    let follow = sink.last().unwrap();
    assert_eq!(follow.zoom, None);
    assert_eq!(follow.animation_mode, AnimationMode::Ease);
    assert_eq!(follow.animation_duration_ms, 600);

    // The user drags the map: the next fix no longer moves the camera
    let drag = json!({
        "properties": {"center": [29.01, 41.0], "zoom": 14.0, "isUserInteraction": true}
    });
    surface.on_region_is_changing_json(&drag, 95_000).unwrap();
    assert_eq!(surface.camera().follow_mode(), FollowMode::ManualOverride);

    let before = sink.len();
    hub.publish(fix(41.0, 29.006, 100_000));
    let outcomes = surface.pump_location(100_000);
    assert_eq!(outcomes, vec![RequestOutcome::IgnoredByFollowMode]);
    assert_eq!(sink.len(), before);

    // Locate again resumes following
    surface.on_locate_pressed(101_000);
    assert_eq!(surface.camera().follow_mode(), FollowMode::Following);
}

#[test]
fn test_jitter_while_anchored_is_suppressed() {
    let hub = LocationHub::new();
    let (mut surface, sink) = tracked_surface(&hub);

    surface.on_locate_pressed(0);
    hub.publish(fix(41.0, 29.0, 1_000));
    surface.pump_location(1_000);
    assert_eq!(sink.len(), 1);

    // GPS wander of a few metres around an anchored boat
    for i in 0..20u64 {
        let wobble = if i % 2 == 0 { 0.00002 } else { -0.00002 };
        hub.publish(fix(41.0 + wobble, 29.0 - wobble, 2_000 + i * 1_000));
    }
    let outcomes = surface.pump_location(30_000);
    assert!(outcomes
        .iter()
        .all(|o| *o == RequestOutcome::DroppedNearby));
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_teardown_unsubscribes() {
    let hub = LocationHub::new();
    let (mut surface, sink) = tracked_surface(&hub);

    surface.on_locate_pressed(0);
    assert_eq!(hub.subscriber_count(), 1);

    surface.teardown();
    assert_eq!(hub.subscriber_count(), 0);
    assert_eq!(hub.publish(fix(41.0, 29.0, 1_000)), 0);
    assert!(surface.pump_location(1_000).is_empty());
    assert_eq!(
        surface.submit_text("41.0, 29.0", 2_000).unwrap().1,
        RequestOutcome::Stopped
    );
    assert!(sink.is_empty());
}

// ============================================================================
// Map lifecycle
// ============================================================================

#[test]
fn test_requests_before_map_ready_are_not_queued() {
    let mut surface = MapSurface::default();
    let fields = FieldSet::dd("40.446195", LatHemisphere::North, "79.948862", LonHemisphere::West);
    let outcome = surface
        .submit_coordinates(&fields, CoordinateFormat::Dd, 0)
        .unwrap();
    assert_eq!(outcome, RequestOutcome::SinkDetached);

    let sink = RecordingSink::new();
    surface.attach_sink(Box::new(sink.clone()));
    assert!(sink.is_empty());

    // Nothing was applied, so the resync uses the fallback center
    surface.camera_mut().set_fallback_center(LngLat::new(28.97, 41.01));
    assert_eq!(surface.on_map_ready(10), Some(RequestOutcome::Applied));
    let resync = sink.last().unwrap();
    assert_eq!(resync.center, Some(LngLat::new(28.97, 41.01)));
    assert_eq!(resync.animation_duration_ms, 0);
}

#[test]
fn test_settle_feeds_controller() {
    let mut surface = MapSurface::default();
    let settle = json!({
        "properties": {
            "center": {"coordinates": [29.0, 41.0]},
            "zoom": 12.0,
            "bounds": {"ne": [29.1, 41.1], "sw": [28.9, 40.9]}
        }
    });
    let snapshot = surface.on_region_did_change_json(&settle, 0).unwrap();
    assert_eq!(snapshot.zoom, Some(12.0));

    let camera = surface.camera();
    assert_eq!(camera.zoom(), Some(12.0));
    assert!(camera.bounds().unwrap().contains(LngLat::new(29.0, 41.0)));

    // The settle center still reaches the crosshair on the next frame
    let events = surface.advance(16);
    assert!(matches!(
        events.as_slice(),
        [CrosshairEvent::Shown { at_ms: 16, .. }]
    ));
}

// ============================================================================
// Crosshair throttling
// ============================================================================

#[test]
fn test_drag_burst_is_throttled_per_frame() {
    let mut surface = MapSurface::default();
    let mut shown = 0usize;

    for i in 0..200u64 {
        let now = i * 5;
        shown += surface
            .advance(now)
            .iter()
            .filter(|e| matches!(e, CrosshairEvent::Shown { .. }))
            .count();
        let lon = 29.0 + i as f64 * 0.0001;
        let drag = json!({"latitude": 41.0, "longitude": lon, "isUserInteraction": true});
        surface.on_region_is_changing_json(&drag, now).unwrap();
    }
    shown += surface
        .advance(1_016)
        .iter()
        .filter(|e| matches!(e, CrosshairEvent::Shown { .. }))
        .count();

    assert!(shown <= 63, "applied {} times", shown);
    assert!(shown >= 50, "applied {} times", shown);

    // The readout ends on the newest coordinate
    let last = surface.crosshair().displayed().unwrap();
    assert!((last.lon - (29.0 + 199.0 * 0.0001)).abs() < 1e-9);

    // Then hides after two seconds of quiet
    let hidden = surface.advance(5_000);
    assert!(matches!(hidden.as_slice(), [CrosshairEvent::Hidden { .. }]));
}

// ============================================================================
// Coordinate entry
// ============================================================================

#[test]
fn test_dms_entry_navigates() {
    let mut surface = MapSurface::default();
    let sink = RecordingSink::new();
    surface.attach_sink(Box::new(sink.clone()));

    let fields = FieldSet::dms(
        ("40", "26", "46.302"),
        LatHemisphere::North,
        ("79", "56", "55.903"),
        LonHemisphere::West,
    );
    let outcome = surface
        .submit_coordinates(&fields, CoordinateFormat::Dms, 0)
        .unwrap();
    assert_eq!(outcome, RequestOutcome::Applied);

    let command = sink.last().unwrap();
    let center = command.center.unwrap();
    assert!((center.lat - 40.446195).abs() < 1e-5);
    assert!((center.lon - -79.948862).abs() < 1e-5);
    assert_eq!(command.zoom, Some(16.0));
    assert_eq!(command.animation_mode, AnimationMode::Fly);
}

#[test]
fn test_out_of_range_entry_rejected() {
    let mut surface = MapSurface::default();
    let sink = RecordingSink::new();
    surface.attach_sink(Box::new(sink.clone()));

    let fields = FieldSet::ddm(("91", "0"), LatHemisphere::North, ("10", "0"), LonHemisphere::East);
    assert!(surface
        .submit_coordinates(&fields, CoordinateFormat::Ddm, 0)
        .is_err());

    let fields = FieldSet::dms(
        ("10", "0", "60"),
        LatHemisphere::North,
        ("10", "0", "0"),
        LonHemisphere::East,
    );
    assert!(surface
        .submit_coordinates(&fields, CoordinateFormat::Dms, 0)
        .is_err());
    assert!(sink.is_empty());
}

// ============================================================================
// One-shot location
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_locator_waits_for_live_fix() {
    let hub = LocationHub::new();
    let locator = SmartLocator::new(Arc::new(hub.clone()), LocatorConfig::default());

    let publisher = hub.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        publisher.publish(GeoPosition::new(41.0, 29.0, 1_000).unwrap());
    });

    let outcome = locator.locate(1_000).await;
    assert!(outcome.is_found());
    assert_eq!(outcome.source, Some(LocationSource::LowAccuracy));
    assert_eq!(outcome.failures.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_locator_prefers_fresh_cache() {
    let hub = LocationHub::new();
    hub.publish(fix(41.0, 29.0, 0));
    let locator = SmartLocator::new(Arc::new(hub), LocatorConfig::default());

    let outcome = locator.locate(60_000).await;
    assert_eq!(outcome.source, Some(LocationSource::LastKnown));
    assert!(outcome.failures.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_center_on_device_applies_found_position() {
    let hub = LocationHub::new();
    hub.publish(fix(41.0, 29.0, 0));
    let locator = SmartLocator::new(Arc::new(hub), LocatorConfig::default());

    let sink = RecordingSink::new();
    let mut surface = MapSurface::default();
    surface.attach_sink(Box::new(sink.clone()));

    let (outcome, applied) = surface.center_on_device(&locator, 60_000).await;
    assert_eq!(outcome.source, Some(LocationSource::LastKnown));
    assert_eq!(applied, Some(RequestOutcome::Applied));

    let commands = sink.commands();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].center, Some(LngLat::new(29.0, 41.0)));
    assert_eq!(commands[0].zoom, Some(14.0));
    assert_eq!(commands[0].animation_duration_ms, 0);
    assert_eq!(surface.camera().follow_mode(), FollowMode::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_center_on_device_failure_leaves_camera_alone() {
    // No fix is ever published, so both live lookups time out
    let hub = LocationHub::new();
    let locator = SmartLocator::new(Arc::new(hub), LocatorConfig::default());

    let sink = RecordingSink::new();
    let mut surface = MapSurface::default();
    surface.attach_sink(Box::new(sink.clone()));

    let (outcome, applied) = surface.center_on_device(&locator, 0).await;
    assert!(!outcome.is_found());
    assert_eq!(outcome.failures.len(), 3);
    assert_eq!(applied, None);
    assert!(sink.is_empty());
    assert_eq!(surface.camera().follow_mode(), FollowMode::Idle);
    assert_eq!(surface.camera().throttle_state().last_applied_center, None);
}
