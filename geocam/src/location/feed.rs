//! Location feed and subscription lifecycle.
//!
//! A [`LocationHub`] fans position fixes out to any number of subscribers.
//! Publishers may run on another task; subscribers drain their channel on
//! the event loop. A [`LocationSubscription`] unsubscribes exactly once,
//! either explicitly or when dropped.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::geo::GeoPosition;

/// Source of continuous position updates.
pub trait LocationFeed: Send + Sync {
    /// Start receiving fixes.
    fn subscribe(&self) -> LocationSubscription;

    /// Most recent fix seen by the feed, if any.
    fn last_known(&self) -> Option<GeoPosition>;
}

type Detach = Box<dyn FnOnce() + Send + Sync>;

/// Receiving end of a feed subscription.
pub struct LocationSubscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<GeoPosition>,
    detach: Option<Detach>,
}

impl LocationSubscription {
    /// Wrap a receiver. `detach` runs once, on the first unsubscribe or on
    /// drop.
    pub fn new(
        id: u64,
        rx: mpsc::UnboundedReceiver<GeoPosition>,
        detach: impl FnOnce() + Send + Sync + 'static,
    ) -> Self {
        Self {
            id,
            rx,
            detach: Some(Box::new(detach)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.detach.is_some()
    }

    /// Next queued fix without waiting.
    pub fn try_recv(&mut self) -> Option<GeoPosition> {
        self.rx.try_recv().ok()
    }

    /// All queued fixes, oldest first.
    pub fn drain(&mut self) -> Vec<GeoPosition> {
        let mut fixes = Vec::new();
        while let Ok(fix) = self.rx.try_recv() {
            fixes.push(fix);
        }
        fixes
    }

    /// Wait for the next fix. `None` once the feed is gone or the
    /// subscription has been cancelled and drained.
    pub async fn recv(&mut self) -> Option<GeoPosition> {
        self.rx.recv().await
    }

    /// Stop receiving fixes. Safe to call more than once.
    pub fn unsubscribe(&mut self) {
        if let Some(detach) = self.detach.take() {
            self.rx.close();
            detach();
            tracing::debug!(subscription = self.id, "Location subscription closed");
        }
    }
}

impl Drop for LocationSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for LocationSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationSubscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

struct Subscriber {
    id: u64,
    tx: mpsc::UnboundedSender<GeoPosition>,
}

#[derive(Default)]
struct HubInner {
    subscribers: Mutex<Vec<Subscriber>>,
    last_known: Mutex<Option<GeoPosition>>,
    next_id: AtomicU64,
}

/// In-process location feed.
///
/// Cloning yields another handle to the same hub.
#[derive(Clone, Default)]
pub struct LocationHub {
    inner: Arc<HubInner>,
}

impl LocationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a fix to every subscriber. Returns how many received it.
    ///
    /// Fixes outside WGS84 bounds are rejected. Closed subscribers are
    /// pruned.
    pub fn publish(&self, fix: GeoPosition) -> usize {
        if !fix.is_valid() {
            tracing::warn!(fix = %fix, "Rejecting fix outside WGS84 bounds");
            return 0;
        }

        *self.inner.last_known.lock() = Some(fix);

        let mut subscribers = self.inner.subscribers.lock();
        subscribers.retain(|s| s.tx.send(fix).is_ok());
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }
}

impl LocationFeed for LocationHub {
    fn subscribe(&self) -> LocationSubscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.subscribers.lock().push(Subscriber { id, tx });

        let hub = Arc::downgrade(&self.inner);
        LocationSubscription::new(id, rx, move || {
            if let Some(hub) = hub.upgrade() {
                hub.subscribers.lock().retain(|s| s.id != id);
            }
        })
    }

    fn last_known(&self) -> Option<GeoPosition> {
        *self.inner.last_known.lock()
    }
}

impl fmt::Debug for LocationHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationHub")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Start/stop wrapper around a feed subscription.
///
/// Starting while active and stopping while inactive are no-ops.
pub struct LocationTracker {
    feed: Arc<dyn LocationFeed>,
    subscription: Option<LocationSubscription>,
}

impl LocationTracker {
    pub fn new(feed: Arc<dyn LocationFeed>) -> Self {
        Self {
            feed,
            subscription: None,
        }
    }

    /// Subscribe if not already subscribed. Returns `true` if this call
    /// started the subscription.
    pub fn start(&mut self) -> bool {
        if self.subscription.is_some() {
            return false;
        }
        let subscription = self.feed.subscribe();
        tracing::info!(subscription = subscription.id(), "Location tracking started");
        self.subscription = Some(subscription);
        true
    }

    /// Unsubscribe if subscribed. Returns `true` if this call stopped it.
    pub fn stop(&mut self) -> bool {
        match self.subscription.take() {
            Some(mut subscription) => {
                subscription.unsubscribe();
                tracing::info!(subscription = subscription.id(), "Location tracking stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// Queued fixes, oldest first. Empty when not tracking.
    pub fn drain(&mut self) -> Vec<GeoPosition> {
        self.subscription
            .as_mut()
            .map(LocationSubscription::drain)
            .unwrap_or_default()
    }

    pub fn last_known(&self) -> Option<GeoPosition> {
        self.feed.last_known()
    }
}

impl fmt::Debug for LocationTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationTracker")
            .field("subscription", &self.subscription)
            .finish()
    }
}
