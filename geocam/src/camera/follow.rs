//! Follow-mode state machine.
//!
//! ```text
//! Idle           --locate pressed-------> Following
//! ManualOverride --locate pressed-------> Following
//! Following      --user gesture---------> ManualOverride
//! Following      --explicit navigation--> ManualOverride
//! any            --teardown-------------> Stopped
//! ```
//!
//! `Stopped` is terminal.

use std::fmt;

/// Whether the camera tracks the device position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FollowMode {
    /// Not following; the locate button has not been pressed.
    #[default]
    Idle,
    /// Every accepted fix re-centers the camera.
    Following,
    /// The user moved the map away; fixes no longer move the camera.
    ManualOverride,
    /// The map screen is gone.
    Stopped,
}

impl FollowMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FollowMode::Idle => "Idle",
            FollowMode::Following => "Following",
            FollowMode::ManualOverride => "ManualOverride",
            FollowMode::Stopped => "Stopped",
        }
    }

    pub fn is_following(&self) -> bool {
        matches!(self, FollowMode::Following)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, FollowMode::Stopped)
    }

    /// Mode after the locate button is pressed.
    pub fn on_locate_pressed(self) -> Self {
        match self {
            FollowMode::Stopped => FollowMode::Stopped,
            _ => FollowMode::Following,
        }
    }

    /// Mode after the user starts dragging or pinching the map.
    pub fn on_user_gesture(self) -> Self {
        match self {
            FollowMode::Following => FollowMode::ManualOverride,
            other => other,
        }
    }

    /// Mode after a one-shot navigation (coordinate entry, spot, cluster).
    pub fn on_explicit_navigation(self) -> Self {
        match self {
            FollowMode::Following => FollowMode::ManualOverride,
            other => other,
        }
    }
}

impl fmt::Display for FollowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_starts_following() {
        assert_eq!(FollowMode::Idle.on_locate_pressed(), FollowMode::Following);
        assert_eq!(
            FollowMode::ManualOverride.on_locate_pressed(),
            FollowMode::Following
        );
        assert_eq!(FollowMode::Following.on_locate_pressed(), FollowMode::Following);
    }

    #[test]
    fn test_gesture_overrides_following_only() {
        assert_eq!(
            FollowMode::Following.on_user_gesture(),
            FollowMode::ManualOverride
        );
        assert_eq!(FollowMode::Idle.on_user_gesture(), FollowMode::Idle);
    }

    #[test]
    fn test_explicit_navigation() {
        assert_eq!(
            FollowMode::Following.on_explicit_navigation(),
            FollowMode::ManualOverride
        );
        assert_eq!(FollowMode::Idle.on_explicit_navigation(), FollowMode::Idle);
    }

    #[test]
    fn test_stopped_is_terminal() {
        let mode = FollowMode::Stopped;
        assert_eq!(mode.on_locate_pressed(), FollowMode::Stopped);
        assert_eq!(mode.on_user_gesture(), FollowMode::Stopped);
        assert_eq!(mode.on_explicit_navigation(), FollowMode::Stopped);
        assert!(mode.is_stopped());
    }

    #[test]
    fn test_display() {
        assert_eq!(FollowMode::ManualOverride.to_string(), "ManualOverride");
        assert_eq!(FollowMode::default(), FollowMode::Idle);
    }
}
