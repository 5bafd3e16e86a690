//! Time source supplied by the execution environment.

use core::cell::Cell;

use crate::types::Timestamp;

/// Supplies `currentTime()` to ledger calls
pub trait Clock {
    /// Current time in seconds
    fn now(&self) -> Timestamp;
}

/// Wall clock, seconds since the UNIX epoch
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Manually driven clock for simulations and tests
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Cell<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self { now: Cell::new(start) }
    }

    /// Move forward by `seconds`
    pub fn advance(&self, seconds: u64) {
        self.now.set(self.now.get().saturating_add(seconds));
    }

    /// Jump to `timestamp` (may move backwards; the ledger rejects that)
    pub fn set(&self, timestamp: Timestamp) {
        self.now.set(timestamp);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
