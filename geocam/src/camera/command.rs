//! Camera commands sent to the map engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::LngLat;

/// Default animation length for camera moves.
pub const DEFAULT_ANIMATION_MS: u32 = 600;

/// How the map engine animates to the new camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationMode {
    /// Short linear ease, used for small corrections.
    #[default]
    Ease,
    /// Zoom-out/zoom-in arc, used for long jumps.
    Fly,
}

impl AnimationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationMode::Ease => "ease",
            AnimationMode::Fly => "fly",
        }
    }
}

impl fmt::Display for AnimationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A requested camera move.
///
/// Unset fields leave that part of the camera unchanged. A command with no
/// center and no view parameters is empty and never reaches the map engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraCommand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<LngLat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(default = "default_duration")]
    pub animation_duration_ms: u32,
    #[serde(default)]
    pub animation_mode: AnimationMode,
}

fn default_duration() -> u32 {
    DEFAULT_ANIMATION_MS
}

impl Default for CameraCommand {
    fn default() -> Self {
        Self {
            center: None,
            zoom: None,
            pitch: None,
            heading: None,
            animation_duration_ms: DEFAULT_ANIMATION_MS,
            animation_mode: AnimationMode::Ease,
        }
    }
}

impl CameraCommand {
    /// Move the center only, with the default ease.
    pub fn to(center: LngLat) -> Self {
        Self {
            center: Some(center),
            ..Self::default()
        }
    }

    pub fn with_center(mut self, center: LngLat) -> Self {
        self.center = Some(center);
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn with_pitch(mut self, pitch: f64) -> Self {
        self.pitch = Some(pitch);
        self
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = Some(heading);
        self
    }

    pub fn with_duration(mut self, duration_ms: u32) -> Self {
        self.animation_duration_ms = duration_ms;
        self
    }

    pub fn with_mode(mut self, mode: AnimationMode) -> Self {
        self.animation_mode = mode;
        self
    }

    /// Zoom, pitch or heading is set. Such commands change the view even
    /// when the center barely moves, so the distance policy never drops them.
    pub fn has_view_params(&self) -> bool {
        self.zoom.is_some() || self.pitch.is_some() || self.heading.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.center.is_none() && !self.has_view_params()
    }
}

impl fmt::Display for CameraCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}ms", self.animation_mode, self.animation_duration_ms)?;
        if let Some(center) = self.center {
            write!(f, " center={}", center)?;
        }
        if let Some(zoom) = self.zoom {
            write!(f, " zoom={:.1}", zoom)?;
        }
        if let Some(pitch) = self.pitch {
            write!(f, " pitch={:.0}", pitch)?;
        }
        if let Some(heading) = self.heading {
            write!(f, " heading={:.0}", heading)?;
        }
        Ok(())
    }
}
