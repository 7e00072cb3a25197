//! High-level runtime engine settings
//!
//! Step cadence, time dilation, collision toggle and worker pool size
//! used when building and running a `Chamber`

use std::time::Duration;

pub const DEFAULT_UPDATE_RATE: f64 = 60.0;
pub const DEFAULT_THREAD_COUNT: usize = 100;

#[derive(Debug, Clone)]
pub struct Engine {
    pub update_rate: f64, // physics steps per wall-clock second
    pub simulation_rate: f64, // simulated seconds per wall-clock second
    pub allow_collision: bool, // merge overlapping particles
    pub thread_count: usize, // force task workers, independent of particle count
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            update_rate: DEFAULT_UPDATE_RATE,
            simulation_rate: 1.0,
            allow_collision: true,
            thread_count: DEFAULT_THREAD_COUNT,
        }
    }
}

/// Rates must be finite and strictly positive to be accepted
pub fn valid_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

/// An update rate must also give a step period that fits in a `Duration`
pub fn valid_update_rate(rate: f64) -> bool {
    valid_rate(rate) && Duration::try_from_secs_f64(rate.recip()).is_ok()
}
