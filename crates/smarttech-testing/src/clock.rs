//! Simulated clock for TTL and expiry tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use smarttech_domain::clock::Clock;

/// Fixed epoch used by default: 2027-01-15T08:00:00Z.
pub const DEFAULT_NOW: u64 = 1_800_000_000;

/// Clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn at(now: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(now)),
        }
    }

    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::at(DEFAULT_NOW)
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
