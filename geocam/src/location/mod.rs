//! Device location: continuous feed and one-shot lookup.

mod feed;
mod smart;

pub use feed::{LocationFeed, LocationHub, LocationSubscription, LocationTracker};
pub use smart::{
    Accuracy, BoxFuture, LocateOutcome, LocationError, LocationSource, LocatorConfig,
    PositionSource, SmartLocator,
};
