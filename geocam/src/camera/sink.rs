//! Camera sink abstraction.
//!
//! The controller never talks to a map engine directly. It hands approved
//! commands to a [`CameraSink`], which may be a native map view, a recorder
//! used by tests, or a logger used by the replay tool.
//!
//! # Implementors
//!
//! - `RecordingSink` - keeps every command in a shared log
//! - `TracingSink` - logs every command and discards it

use std::sync::Arc;

use parking_lot::Mutex;

use super::command::CameraCommand;

/// Receives camera commands. Fire-and-forget: the sink reports nothing
/// back and commands are never retried.
pub trait CameraSink: Send + Sync {
    fn set_camera(&self, command: &CameraCommand);
}

/// Sink that records every command it receives.
///
/// Clones share the same log, so a test can keep one handle while the
/// controller owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    commands: Arc<Mutex<Vec<CameraCommand>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all commands received so far.
    pub fn commands(&self) -> Vec<CameraCommand> {
        self.commands.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.commands.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.lock().is_empty()
    }

    pub fn last(&self) -> Option<CameraCommand> {
        self.commands.lock().last().copied()
    }

    pub fn clear(&self) {
        self.commands.lock().clear();
    }
}

impl CameraSink for RecordingSink {
    fn set_camera(&self, command: &CameraCommand) {
        self.commands.lock().push(*command);
    }
}

/// Sink that logs commands at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl CameraSink for TracingSink {
    fn set_camera(&self, command: &CameraCommand) {
        tracing::info!(
            mode = %command.animation_mode,
            duration_ms = command.animation_duration_ms,
            lon = command.center.map(|c| c.lon),
            lat = command.center.map(|c| c.lat),
            zoom = command.zoom,
            pitch = command.pitch,
            heading = command.heading,
            "Camera command"
        );
    }
}
