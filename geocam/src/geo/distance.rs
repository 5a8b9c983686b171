//! Great-circle distance between coordinates.
//!
//! The camera controller asks for the distance between the last applied
//! center and every incoming request, often with identical arguments while a
//! fix is re-published. [`DistanceMemo`] keeps a small bounded set of recent
//! results in a moka cache so those repeats are free, without any
//! process-wide cache.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::sync::Cache;

use super::types::LngLat;

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Metres per international nautical mile.
pub const METERS_PER_NAUTICAL_MILE: f64 = 1_852.0;

/// Default number of memoized distances.
const DEFAULT_MEMO_CAPACITY: usize = 8;

/// Default lifetime of a memoized distance.
const DEFAULT_MEMO_TTL_MS: u64 = 5_000;

/// Haversine distance in metres between two latitude/longitude pairs.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi * 0.5).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda * 0.5).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Haversine distance in metres between two camera centers.
#[inline]
pub fn distance_m(from: LngLat, to: LngLat) -> f64 {
    haversine_m(from.lat, from.lon, to.lat, to.lon)
}

/// Haversine distance in nautical miles.
#[inline]
pub fn distance_nm(from: LngLat, to: LngLat) -> f64 {
    distance_m(from, to) / METERS_PER_NAUTICAL_MILE
}

type MemoKey = [u64; 4];

/// Bounded memo of recent distance computations, backed by moka.
///
/// Entries are keyed on the exact bit patterns of both endpoints, so a hit
/// always returns the value a fresh computation would. moka evicts by
/// capacity (TinyLFU) and drops entries after `ttl_ms` so a surface left
/// idle releases its memo.
pub struct DistanceMemo {
    /// `None` when memoization is disabled (capacity zero)
    cache: Option<Cache<MemoKey, f64>>,
    capacity: u64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for DistanceMemo {
    fn default() -> Self {
        Self::new(DEFAULT_MEMO_CAPACITY, DEFAULT_MEMO_TTL_MS)
    }
}

impl fmt::Debug for DistanceMemo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistanceMemo")
            .field("capacity", &self.capacity)
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

impl DistanceMemo {
    /// Create a memo. A capacity of zero disables memoization.
    pub fn new(capacity: usize, ttl_ms: u64) -> Self {
        let capacity = capacity as u64;
        let cache = (capacity > 0).then(|| {
            Cache::builder()
                .max_capacity(capacity)
                .time_to_live(Duration::from_millis(ttl_ms.max(1)))
                .build()
        });

        Self {
            cache,
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Distance in metres, served from the memo when a live entry exists.
    pub fn distance_m(&self, from: LngLat, to: LngLat) -> f64 {
        let Some(cache) = &self.cache else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return distance_m(from, to);
        };

        let key = [
            from.lon.to_bits(),
            from.lat.to_bits(),
            to.lon.to_bits(),
            to.lat.to_bits(),
        ];

        if let Some(meters) = cache.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return meters;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let meters = distance_m(from, to);
        cache.insert(key, meters);
        meters
    }

    /// Number of entries currently held, after pending evictions run.
    pub fn len(&self) -> u64 {
        match &self.cache {
            Some(cache) => {
                cache.run_pending_tasks();
                cache.entry_count()
            }
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (hits, misses) since creation.
    pub fn stats(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }

    pub fn clear(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }
}
