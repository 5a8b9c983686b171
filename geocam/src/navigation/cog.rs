//! Course-over-ground estimation.
//!
//! The estimator keeps the last fix it computed from and derives the bearing
//! to each new fix. Fixes that cannot yield a meaningful bearing (same place,
//! too close in time, out of order) leave both the course and the stored fix
//! untouched, so a slow drift still produces a course once enough time has
//! passed.
//!
//! ```text
//! no fix --first fix--> seeded --fix after min_interval--> course known
//! ```

use crate::geo::{initial_bearing, GeoPosition};

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Minimum time between the fixes a course is computed from.
pub const DEFAULT_COG_MIN_INTERVAL_MS: u64 = 500;

/// Tunables for [`CourseOverGroundEstimator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CogConfig {
    /// Fixes closer together than this are skipped.
    pub min_interval_ms: u64,
}

impl Default for CogConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: DEFAULT_COG_MIN_INTERVAL_MS,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Estimator
// ─────────────────────────────────────────────────────────────────────────────

/// Derives course over ground from consecutive fixes.
#[derive(Debug, Clone, Default)]
pub struct CourseOverGroundEstimator {
    config: CogConfig,
    previous: Option<GeoPosition>,
    course: Option<f64>,
}

impl CourseOverGroundEstimator {
    pub fn new(config: CogConfig) -> Self {
        Self {
            config,
            previous: None,
            course: None,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(CogConfig::default())
    }

    pub fn config(&self) -> &CogConfig {
        &self.config
    }

    /// Feed a fix and return the current course in degrees `[0, 360)`.
    ///
    /// Returns `None` until two usable fixes have been seen.
    pub fn update(&mut self, fix: &GeoPosition) -> Option<f64> {
        if !fix.is_valid() {
            tracing::warn!(fix = %fix, "Ignoring fix outside WGS84 bounds");
            return self.course;
        }

        let Some(previous) = self.previous else {
            self.previous = Some(*fix);
            return self.course;
        };

        if fix.same_place(&previous) {
            return self.course;
        }
        if fix.timestamp_ms < previous.timestamp_ms {
            tracing::trace!(
                previous_ms = previous.timestamp_ms,
                fix_ms = fix.timestamp_ms,
                "Skipping out-of-order fix"
            );
            return self.course;
        }
        if fix.timestamp_ms - previous.timestamp_ms < self.config.min_interval_ms {
            return self.course;
        }

        let course = initial_bearing(
            previous.latitude,
            previous.longitude,
            fix.latitude,
            fix.longitude,
        );
        tracing::trace!(course, "Course over ground updated");

        self.course = Some(course);
        self.previous = Some(*fix);
        self.course
    }

    /// Last computed course, if any.
    pub fn course(&self) -> Option<f64> {
        self.course
    }

    /// The fix the next course will be measured from.
    pub fn reference_fix(&self) -> Option<&GeoPosition> {
        self.previous.as_ref()
    }

    /// Forget all fixes (e.g. when following stops).
    pub fn reset(&mut self) {
        self.previous = None;
        self.course = None;
    }
}
