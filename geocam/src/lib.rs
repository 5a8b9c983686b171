//! geocam - coordinate entry, GPS course and map camera coordination
//!
//! The geospatial core of a fishing-spot map: converting coordinates typed
//! by anglers in DD, DMS or DDM, estimating course over ground from GPS
//! fixes, and deciding when a noisy stream of fixes and gestures should
//! actually move the map camera.
//!
//! # Modules
//!
//! - [`geo`] positions, distances and bearings
//! - [`coord`] coordinate form parsing, validation and formatting
//! - [`navigation`] course and speed over ground
//! - [`camera`] throttled camera control and follow mode
//! - [`region`] map region callbacks and crosshair throttling
//! - [`location`] location feed and one-shot lookup
//! - [`surface`] per-screen wiring of the above
//!
//! # Example
//!
//! ```
//! use geocam::camera::RecordingSink;
//! use geocam::coord::{CoordinateFormat, FieldSet, LatHemisphere, LonHemisphere};
//! use geocam::surface::MapSurface;
//!
//! let sink = RecordingSink::new();
//! let mut surface = MapSurface::default();
//! surface.attach_sink(Box::new(sink.clone()));
//!
//! let fields = FieldSet::ddm(
//!     ("40", "26.7717"),
//!     LatHemisphere::North,
//!     ("79", "56.93172"),
//!     LonHemisphere::West,
//! );
//! surface
//!     .submit_coordinates(&fields, CoordinateFormat::Ddm, 0)
//!     .unwrap();
//! assert_eq!(sink.len(), 1);
//! ```

pub mod camera;
pub mod config;
pub mod coord;
pub mod geo;
pub mod location;
pub mod logging;
pub mod navigation;
pub mod region;
pub mod surface;

pub use camera::{CameraCommand, CameraSink, FollowMode, RequestOutcome, SmartCameraController};
pub use config::{ConfigError, GeocamConfig, LoggingConfig};
pub use coord::{CoordinateFormat, FieldSet, ParsedCoordinate, ValidationError};
pub use geo::{GeoError, GeoPosition, LngLat, MapBounds};
pub use navigation::CourseOverGroundEstimator;
pub use region::{RawRegionState, RegionChangeThrottler, RegionSnapshot};
pub use surface::MapSurface;
