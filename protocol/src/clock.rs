//! # Time Sources
//!
//! Blocks carry an integer timestamp in seconds. The factory asks a
//! [`Clock`] for it; tests and reproducible runs swap in a [`ManualClock`].
//!
//! Timestamps are informative only: the validator never orders blocks by
//! time. Still, [`SystemClock`] never goes backwards between calls, so a
//! wall-clock step during a run cannot make a child look older than its
//! parent.

use std::sync::atomic::{AtomicU64, Ordering};

/// A source of integer seconds. Must not block.
pub trait Clock: Send + Sync {
    /// Current time in whole seconds since the Unix epoch.
    fn now_secs(&self) -> u64;
}

/// Wall clock backed by `chrono`, clamped to be non-decreasing.
#[derive(Debug, Default)]
pub struct SystemClock {
    high_water: AtomicU64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now_secs(&self) -> u64 {
        // Pre-epoch wall clocks clamp to zero.
        let wall = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0);
        let prev = self.high_water.fetch_max(wall, Ordering::AcqRel);
        prev.max(wall)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// A clock frozen at `secs`.
    pub fn at(secs: u64) -> Self {
        Self {
            now: AtomicU64::new(secs),
        }
    }

    /// Jump to `secs`. Going backwards is allowed; callers own the consequences.
    pub fn set(&self, secs: u64) {
        self.now.store(secs, Ordering::Release);
    }

    /// Move forward by `secs`, saturating at `u64::MAX`.
    pub fn advance(&self, secs: u64) {
        let _ = self
            .now
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |t| {
                Some(t.saturating_add(secs))
            });
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_secs(&self) -> u64 {
        (**self).now_secs()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now_secs(&self) -> u64 {
        (**self).now_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock::new().now_secs() > 1_577_836_800);
    }

    #[test]
    fn system_clock_never_decreases() {
        let clock = SystemClock::new();
        let mut last = clock.now_secs();
        for _ in 0..1_000 {
            let now = clock.now_secs();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn system_clock_holds_high_water_mark() {
        let clock = SystemClock::new();
        let future = clock.now_secs() + 10_000;
        clock.high_water.store(future, Ordering::Release);
        assert_eq!(clock.now_secs(), future);
    }

    #[test]
    fn manual_clock_moves_only_on_request() {
        let clock = ManualClock::at(100);
        assert_eq!(clock.now_secs(), 100);
        assert_eq!(clock.now_secs(), 100);

        clock.advance(5);
        assert_eq!(clock.now_secs(), 105);

        clock.set(42);
        assert_eq!(clock.now_secs(), 42);

        clock.set(u64::MAX - 1);
        clock.advance(10);
        assert_eq!(clock.now_secs(), u64::MAX);
    }

    #[test]
    fn clock_through_reference_and_arc() {
        let clock = std::sync::Arc::new(ManualClock::at(9));
        let by_ref: &ManualClock = &clock;
        assert_eq!(by_ref.now_secs(), 9);
        assert_eq!(clock.now_secs(), 9);
    }
}
