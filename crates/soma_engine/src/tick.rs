//! Decay tick cadence.
//!
//! The decay rates are tuned against a 5-second reference tick; because all
//! decay is time-normalized, changing the cadence changes resolution, not
//! simulation speed.

use soma_core::SomaConfig;
use std::time::Duration;

/// Configuration for the repeating decay tick.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// How often the scheduler fires (default: 5s).
    pub interval: Duration,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
        }
    }
}

impl TickConfig {
    /// Fine-grained ticking for real-time applications.
    pub fn fast() -> Self {
        Self {
            interval: Duration::from_secs(1),
        }
    }

    /// Coarse ticking for resource-constrained environments.
    pub fn slow() -> Self {
        Self {
            interval: Duration::from_secs(10),
        }
    }

    /// Very fast ticking for tests.
    pub fn testing() -> Self {
        Self {
            interval: Duration::from_millis(10),
        }
    }

    pub fn from_config(config: &SomaConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.tick_interval_ms),
        }
    }
}
