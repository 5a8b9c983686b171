//! Map region callbacks: payload decoding and crosshair throttling.

mod scheduler;
mod state;
mod throttler;

pub use scheduler::{next_frame_boundary, TimerSlot};
pub use state::{
    FlatRegion, RawBounds, RawCenter, RawRegionState, RegionProperties, RegionSnapshot,
    RegionStateError,
};
pub use throttler::{
    CrosshairConfig, CrosshairEvent, PendingCrosshairCoordinate, RegionChangeThrottler,
    DEFAULT_FRAME_INTERVAL_MS, DEFAULT_HIDE_AFTER_MS,
};
