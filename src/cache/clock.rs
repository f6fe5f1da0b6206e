//! Clock Module
//!
//! Source of the current time in Unix-epoch seconds, used both to stamp
//! expirations on write and to compare against them on read.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

// == Clock Trait ==
/// Source of "now" for stamping and checking expirations.
pub trait Clock: Send + Sync {
    /// Current time in Unix-epoch seconds.
    fn now(&self) -> f64;
}

// == System Clock ==
/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }
}

// == Manual Clock ==
/// Clock that only moves when told to. Useful for exercising expiry in tests.
#[derive(Debug)]
pub struct ManualClock {
    bits: AtomicU64,
}

impl ManualClock {
    pub fn new(now: f64) -> Self {
        Self {
            bits: AtomicU64::new(now.to_bits()),
        }
    }

    pub fn set(&self, now: f64) {
        self.bits.store(now.to_bits(), Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: f64) {
        self.set(self.now() + seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}
