//! Map camera coordination
//!
//! The [`SmartCameraController`] turns camera requests from the UI, the
//! location feed and coordinate entry into at most one command per
//! meaningful move. Requests pass through a [`ThrottlePolicy`] and the
//! [`FollowMode`] state machine before reaching a [`CameraSink`].
//!
//! ```text
//! request ──► follow mode ──► throttle policy ──► CameraSink::set_camera
//!                 │                  │
//!                 ▼                  ▼
//!            ignored/stopped   dropped (nearby/throttled/empty)
//! ```

mod command;
mod config;
mod controller;
mod follow;
mod sink;
mod throttle;

pub use command::{AnimationMode, CameraCommand, DEFAULT_ANIMATION_MS};
pub use config::{
    CameraConfig, DEFAULT_FAST_DISTANCE_M, DEFAULT_MIN_DISTANCE_M, DEFAULT_MIN_INTERVAL_MS,
};
pub use controller::{CameraStats, RequestOutcome, SmartCameraController};
pub use follow::FollowMode;
pub use sink::{CameraSink, RecordingSink, TracingSink};
pub use throttle::{ThrottleDecision, ThrottlePolicy, ThrottleState};
