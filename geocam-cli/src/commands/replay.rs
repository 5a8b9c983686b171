//! Replay a recorded map session through a [`MapSurface`].
//!
//! A script is a JSON document with a time-ordered list of events:
//!
//! ```json
//! {
//!   "events": [
//!     { "at": 0,    "type": "mapReady" },
//!     { "at": 0,    "type": "locate" },
//!     { "at": 1000, "type": "fix", "latitude": 41.0, "longitude": 29.0 },
//!     { "at": 1500, "type": "regionChanging",
//!       "region": { "latitude": 41.0, "longitude": 29.01, "isUserInteraction": true } },
//!     { "at": 2500, "type": "regionSettled",
//!       "region": { "properties": { "center": [29.01, 41.0], "zoom": 13 } } },
//!     { "at": 3000, "type": "navigate", "text": "40.446195, -79.948862" }
//!   ]
//! }
//! ```
//!
//! Camera commands go to a [`TracingSink`], so they appear in the log.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use geocam::camera::{FollowMode, TracingSink};
use geocam::geo::{GeoPosition, LngLat};
use geocam::location::{LocationFeed, LocationHub, LocationTracker};
use geocam::region::{CrosshairEvent, RawRegionState};
use geocam::{GeocamConfig, MapSurface};

use crate::error::CliError;

/// A recorded session.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    pub events: Vec<ReplayEvent>,
}

/// One event and the time it happened.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayEvent {
    #[serde(rename = "at")]
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: ReplayAction,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ReplayAction {
    MapReady,
    Locate,
    #[serde(rename_all = "camelCase")]
    Fix {
        latitude: f64,
        longitude: f64,
        #[serde(default)]
        speed_mps: Option<f64>,
    },
    RegionChanging {
        region: RawRegionState,
    },
    RegionSettled {
        region: RawRegionState,
    },
    Navigate {
        text: String,
    },
    Spot {
        latitude: f64,
        longitude: f64,
    },
    ClusterTap {
        latitude: f64,
        longitude: f64,
    },
    Pitch {
        pitch: f64,
    },
    Teardown,
}

impl ReplayScript {
    pub fn from_json_str(text: &str) -> Result<Self, CliError> {
        serde_json::from_str(text).map_err(|e| CliError::Replay(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CliError::Replay(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }
}

/// What happened during a replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySummary {
    pub events: usize,
    pub applied: u64,
    pub dropped: u64,
    pub crosshair_updates: usize,
    pub crosshair_hides: usize,
    pub rejected: Vec<String>,
    pub follow_mode: FollowMode,
    pub course: Option<f64>,
    pub speed_knots: Option<f64>,
}

impl fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Replay Summary")?;
        writeln!(f, "==============")?;
        writeln!(f, "  Events:            {}", self.events)?;
        writeln!(f, "  Camera applied:    {}", self.applied)?;
        writeln!(f, "  Camera dropped:    {}", self.dropped)?;
        writeln!(f, "  Crosshair updates: {}", self.crosshair_updates)?;
        writeln!(f, "  Crosshair hides:   {}", self.crosshair_hides)?;
        writeln!(f, "  Follow mode:       {}", self.follow_mode)?;
        match self.course {
            Some(course) => writeln!(f, "  Course:            {:.1}°", course)?,
            None => writeln!(f, "  Course:            unknown")?,
        }
        match self.speed_knots {
            Some(speed) => writeln!(f, "  Speed:             {:.1} kt", speed)?,
            None => writeln!(f, "  Speed:             unknown")?,
        }
        if !self.rejected.is_empty() {
            writeln!(f, "  Rejected:")?;
            for reason in &self.rejected {
                writeln!(f, "    - {}", reason)?;
            }
        }
        Ok(())
    }
}

#[derive(Default)]
struct CrosshairTally {
    shown: usize,
    hidden: usize,
}

impl CrosshairTally {
    fn add(&mut self, events: Vec<CrosshairEvent>) {
        for event in events {
            match event {
                CrosshairEvent::Shown { .. } => self.shown += 1,
                CrosshairEvent::Hidden { .. } => self.hidden += 1,
            }
        }
    }
}

/// Run `script` through a fresh surface.
pub fn run_script(script: &ReplayScript, config: &GeocamConfig) -> ReplaySummary {
    let hub = LocationHub::new();
    let feed: Arc<dyn LocationFeed> = Arc::new(hub.clone());
    let mut surface = MapSurface::from_config(config).with_location(LocationTracker::new(feed));
    surface.attach_sink(Box::new(TracingSink));

    let mut crosshair = CrosshairTally::default();
    let mut rejected = Vec::new();

    for event in &script.events {
        let now = event.at_ms;
        crosshair.add(surface.advance(now));

        match &event.action {
            ReplayAction::MapReady => {
                surface.on_map_ready(now);
            }
            ReplayAction::Locate => {
                surface.on_locate_pressed(now);
            }
            ReplayAction::Fix {
                latitude,
                longitude,
                speed_mps,
            } => match GeoPosition::new(*latitude, *longitude, now) {
                Ok(fix) => {
                    let fix = match speed_mps {
                        Some(speed) => fix.with_speed(*speed),
                        None => fix,
                    };
                    hub.publish(fix);
                    surface.pump_location(now);
                }
                Err(e) => rejected.push(format!("fix at {} ms: {}", now, e)),
            },
            ReplayAction::RegionChanging { region } => {
                surface.on_region_is_changing(region, now);
            }
            ReplayAction::RegionSettled { region } => {
                surface.on_region_did_change(region, now);
            }
            ReplayAction::Navigate { text } => {
                if let Err(e) = surface.submit_text(text, now) {
                    rejected.push(format!("navigate at {} ms: {}", now, e));
                }
            }
            ReplayAction::Spot {
                latitude,
                longitude,
            } => {
                let center = LngLat::new(*longitude, *latitude);
                if let Err(e) = surface.camera_mut().focus_spot(center, now) {
                    rejected.push(format!("spot at {} ms: {}", now, e));
                }
            }
            ReplayAction::ClusterTap {
                latitude,
                longitude,
            } => {
                let center = LngLat::new(*longitude, *latitude);
                if let Err(e) = surface.camera_mut().on_cluster_tap(center, now) {
                    rejected.push(format!("cluster tap at {} ms: {}", now, e));
                }
            }
            ReplayAction::Pitch { pitch } => {
                surface.camera_mut().set_pitch(*pitch, now);
            }
            ReplayAction::Teardown => surface.teardown(),
        }
    }

    while let Some(deadline) = surface.next_deadline() {
        crosshair.add(surface.advance(deadline));
    }

    let stats = surface.camera().stats();
    ReplaySummary {
        events: script.events.len(),
        applied: stats.applied,
        dropped: stats.dropped(),
        crosshair_updates: crosshair.shown,
        crosshair_hides: crosshair.hidden,
        rejected,
        follow_mode: surface.camera().follow_mode(),
        course: surface.course(),
        speed_knots: surface.speed_knots(),
    }
}

pub fn run(path: &Path, config: &GeocamConfig) -> Result<(), CliError> {
    let script = ReplayScript::load(path)?;
    tracing::info!(path = %path.display(), events = script.events.len(), "Replaying session");
    let summary = run_script(&script, config);
    print!("{}", summary);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SESSION: &str = r#"{
        "events": [
            { "at": 0, "type": "mapReady" },
            { "at": 0, "type": "locate" },
            { "at": 1000, "type": "fix", "latitude": 41.0, "longitude": 29.0 },
            { "at": 11000, "type": "fix", "latitude": 41.0, "longitude": 29.0005 },
            { "at": 11200, "type": "fix", "latitude": 41.00001, "longitude": 29.0005 },
            { "at": 12000, "type": "regionChanging",
              "region": { "latitude": 41.0, "longitude": 29.01, "isUserInteraction": true } },
            { "at": 12005, "type": "regionChanging",
              "region": { "latitude": 41.0, "longitude": 29.02, "isUserInteraction": true } },
            { "at": 13000, "type": "regionSettled",
              "region": { "properties": { "center": [29.02, 41.0], "zoom": 13 } } },
            { "at": 21000, "type": "fix", "latitude": 41.0, "longitude": 29.001 },
            { "at": 22000, "type": "navigate", "text": "not a coordinate" },
            { "at": 23000, "type": "pitch", "pitch": 60 }
        ]
    }"#;

    #[test]
    fn test_replay_session() {
        let script = ReplayScript::from_json_str(SESSION).unwrap();
        let summary = run_script(&script, &GeocamConfig::default());

        assert_eq!(summary.events, 11);
        // Two follow moves and the pitch change
        assert_eq!(summary.applied, 3);
        // Jitter fix, post-gesture fix
        assert_eq!(summary.dropped, 2);
        assert_eq!(summary.crosshair_updates, 2);
        assert_eq!(summary.crosshair_hides, 1);
        assert_eq!(summary.follow_mode, FollowMode::ManualOverride);
        assert_eq!(summary.rejected.len(), 1);

        let course = summary.course.unwrap();
        assert!((course - 90.0).abs() < 0.1);
    }

    #[test]
    fn test_summary_display() {
        let script = ReplayScript::from_json_str(r#"{"events": [{"at": 0, "type": "teardown"}]}"#)
            .unwrap();
        let text = run_script(&script, &GeocamConfig::default()).to_string();
        assert!(text.contains("Follow mode:       Stopped"));
        assert!(text.contains("Course:            unknown"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SESSION.as_bytes()).unwrap();
        let script = ReplayScript::load(file.path()).unwrap();
        assert_eq!(script.events.len(), 11);
    }

    #[test]
    fn test_unknown_event_type() {
        let err = ReplayScript::from_json_str(r#"{"events": [{"at": 0, "type": "explode"}]}"#)
            .unwrap_err();
        assert!(matches!(err, CliError::Replay(_)));
    }
}
