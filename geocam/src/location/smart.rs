//! One-shot "where am I" lookup with a fallback chain.
//!
//! The chain is tried in order and stops at the first success:
//!
//! 1. The cached fix, if younger than `max_age_ms`
//! 2. A low-accuracy (network) fix within `low_accuracy_timeout_ms`
//! 3. A high-accuracy (GPS) fix within `high_accuracy_timeout_ms`
//!
//! Failures along the way are collected in the outcome rather than
//! returned as errors, so the caller can show the position together with
//! any warnings. A permission error ends the chain early.
//!
//! # Example Configuration (INI)
//!
//! ```ini
//! [location]
//! max_age_ms = 300000
//! low_accuracy_timeout_ms = 5000
//! high_accuracy_timeout_ms = 20000
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use super::feed::{LocationFeed, LocationHub};
use crate::geo::GeoPosition;

/// Boxed future used by [`PositionSource`] to stay dyn-compatible.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Requested fix quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accuracy {
    Low,
    High,
}

impl Accuracy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Accuracy::Low => "low",
            Accuracy::High => "high",
        }
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors from position lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("No {accuracy}-accuracy fix within {timeout_ms} ms")]
    Timeout { accuracy: Accuracy, timeout_ms: u64 },

    #[error("Location unavailable: {0}")]
    Unavailable(String),

    #[error("Cached fix is {age_ms} ms old")]
    Stale { age_ms: u64 },

    #[error("No cached fix")]
    NoCachedFix,
}

/// Where a located position came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationSource {
    LastKnown,
    LowAccuracy,
    HighAccuracy,
}

impl LocationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationSource::LastKnown => "last-known",
            LocationSource::LowAccuracy => "low-accuracy",
            LocationSource::HighAccuracy => "high-accuracy",
        }
    }
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Device positioning service.
pub trait PositionSource: Send + Sync {
    /// Cached fix, returned without waiting.
    fn cached_position(&self) -> Option<GeoPosition>;

    /// Request a fresh fix. The locator applies its own timeout.
    fn current_position(&self, accuracy: Accuracy) -> BoxFuture<'_, Result<GeoPosition, LocationError>>;
}

/// The hub answers with its last published fix, or waits for the next one.
impl PositionSource for LocationHub {
    fn cached_position(&self) -> Option<GeoPosition> {
        self.last_known()
    }

    fn current_position(&self, _accuracy: Accuracy) -> BoxFuture<'_, Result<GeoPosition, LocationError>> {
        let mut subscription = self.subscribe();
        Box::pin(async move {
            subscription
                .recv()
                .await
                .ok_or_else(|| LocationError::Unavailable("location feed closed".to_string()))
        })
    }
}

/// Timeouts and cache age for [`SmartLocator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatorConfig {
    pub max_age_ms: u64,
    pub low_accuracy_timeout_ms: u64,
    pub high_accuracy_timeout_ms: u64,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            max_age_ms: 300_000,
            low_accuracy_timeout_ms: 5_000,
            high_accuracy_timeout_ms: 20_000,
        }
    }
}

/// Result of a lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct LocateOutcome {
    pub position: Option<GeoPosition>,
    pub source: Option<LocationSource>,
    /// Every step that failed before the result, in order.
    pub failures: Vec<(LocationSource, LocationError)>,
}

impl LocateOutcome {
    pub fn is_found(&self) -> bool {
        self.position.is_some()
    }
}

/// Runs the fallback chain against a [`PositionSource`].
pub struct SmartLocator {
    source: Arc<dyn PositionSource>,
    config: LocatorConfig,
}

impl SmartLocator {
    pub fn new(source: Arc<dyn PositionSource>, config: LocatorConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Find the device position. `now_ms` dates the cached fix.
    pub async fn locate(&self, now_ms: u64) -> LocateOutcome {
        let mut failures = Vec::new();

        match self.source.cached_position() {
            Some(fix) if fix.is_valid() => {
                let age_ms = now_ms.saturating_sub(fix.timestamp_ms);
                if age_ms <= self.config.max_age_ms {
                    tracing::debug!(age_ms, "Using cached position");
                    return LocateOutcome {
                        position: Some(fix),
                        source: Some(LocationSource::LastKnown),
                        failures,
                    };
                }
                failures.push((LocationSource::LastKnown, LocationError::Stale { age_ms }));
            }
            _ => failures.push((LocationSource::LastKnown, LocationError::NoCachedFix)),
        }

        let steps = [
            (
                LocationSource::LowAccuracy,
                Accuracy::Low,
                self.config.low_accuracy_timeout_ms,
            ),
            (
                LocationSource::HighAccuracy,
                Accuracy::High,
                self.config.high_accuracy_timeout_ms,
            ),
        ];

        for (source, accuracy, timeout_ms) in steps {
            match self.request(accuracy, timeout_ms).await {
                Ok(fix) => {
                    tracing::info!(source = %source, fix = %fix, "Position located");
                    return LocateOutcome {
                        position: Some(fix),
                        source: Some(source),
                        failures,
                    };
                }
                Err(e) => {
                    tracing::warn!(source = %source, error = %e, "Position lookup failed");
                    let denied = e == LocationError::PermissionDenied;
                    failures.push((source, e));
                    if denied {
                        break;
                    }
                }
            }
        }

        LocateOutcome {
            position: None,
            source: None,
            failures,
        }
    }

    async fn request(&self, accuracy: Accuracy, timeout_ms: u64) -> Result<GeoPosition, LocationError> {
        let lookup = self.source.current_position(accuracy);
        let fix = tokio::time::timeout(Duration::from_millis(timeout_ms), lookup)
            .await
            .map_err(|_| LocationError::Timeout {
                accuracy,
                timeout_ms,
            })??;

        if !fix.is_valid() {
            return Err(LocationError::Unavailable(format!(
                "fix outside WGS84 bounds: {}",
                fix
            )));
        }
        Ok(fix)
    }
}

impl fmt::Debug for SmartLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmartLocator")
            .field("config", &self.config)
            .finish()
    }
}
