//! Simulated backend latency.

use rand::Rng;
use std::time::Duration;

/// Uniform delay window applied once per public service call.
///
/// The zero window (the default) never sleeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Latency {
    min_ms: u64,
    max_ms: u64,
}

impl Latency {
    pub const NONE: Self = Self {
        min_ms: 0,
        max_ms: 0,
    };

    /// Builds a window; reversed bounds are swapped.
    pub fn between_ms(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: min_ms.max(max_ms),
        }
    }

    pub fn is_none(&self) -> bool {
        self.max_ms == 0
    }

    /// Draws one delay from the window.
    pub fn sample(&self) -> Duration {
        if self.min_ms == self.max_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rand::thread_rng().gen_range(self.min_ms..=self.max_ms))
    }

    /// Blocks the current thread for one sampled delay.
    pub fn pause(&self) {
        if !self.is_none() {
            std::thread::sleep(self.sample());
        }
    }
}
