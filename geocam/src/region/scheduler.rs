//! Single-shot timer slots with generation tokens.
//!
//! A slot holds at most one scheduled callback. Scheduling again replaces
//! the previous callback and bumps the generation, so anything captured
//! with an older generation can tell it is stale when it fires.

/// One cancel-and-reschedule timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerSlot {
    generation: u64,
    due_at_ms: Option<u64>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any scheduled callback with one due at `due_at_ms`.
    /// Returns the new generation.
    pub fn schedule(&mut self, due_at_ms: u64) -> u64 {
        self.generation += 1;
        self.due_at_ms = Some(due_at_ms);
        self.generation
    }

    /// Drop the scheduled callback, if any.
    pub fn cancel(&mut self) {
        if self.due_at_ms.take().is_some() {
            self.generation += 1;
        }
    }

    pub fn due_at(&self) -> Option<u64> {
        self.due_at_ms
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_scheduled(&self) -> bool {
        self.due_at_ms.is_some()
    }

    /// Fire the callback if it is due. Returns `(generation, due_at_ms)`.
    pub fn fire(&mut self, now_ms: u64) -> Option<(u64, u64)> {
        match self.due_at_ms {
            Some(due) if due <= now_ms => {
                self.due_at_ms = None;
                Some((self.generation, due))
            }
            _ => None,
        }
    }
}

/// Next animation-frame boundary strictly after `now_ms`, saturating at
/// `u64::MAX` at the end of the clock.
pub fn next_frame_boundary(now_ms: u64, frame_interval_ms: u64) -> u64 {
    let frame = frame_interval_ms.max(1);
    (now_ms / frame).saturating_add(1).saturating_mul(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_boundary_saturates() {
        assert_eq!(next_frame_boundary(u64::MAX - 5, 16), u64::MAX);
        assert_eq!(next_frame_boundary(u64::MAX, 1), u64::MAX);
        assert_eq!(next_frame_boundary(5, 16), 16);
    }

    #[test]
    fn test_reschedule_bumps_generation() {
        let mut slot = TimerSlot::new();
        let first = slot.schedule(100);
        let second = slot.schedule(120);
        assert!(second > first);
        assert_eq!(slot.due_at(), Some(120));
        assert_eq!(slot.fire(110), None);
        assert_eq!(slot.fire(120), Some((second, 120)));
        assert!(!slot.is_scheduled());
    }

    #[test]
    fn test_cancel() {
        let mut slot = TimerSlot::new();
        let generation = slot.schedule(10);
        slot.cancel();
        assert_eq!(slot.fire(1_000), None);
        assert_ne!(slot.generation(), generation);

        // Cancelling an idle slot changes nothing
        let before = slot.generation();
        slot.cancel();
        assert_eq!(slot.generation(), before);
    }

    #[test]
    fn test_frame_boundary() {
        assert_eq!(next_frame_boundary(0, 16), 16);
        assert_eq!(next_frame_boundary(15, 16), 16);
        assert_eq!(next_frame_boundary(16, 16), 32);
        assert_eq!(next_frame_boundary(5, 0), 6);
    }
}
