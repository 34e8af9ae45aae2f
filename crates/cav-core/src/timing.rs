//! Opt-in wall-clock timing of simulation runs.
//!
//! Enabled programmatically or with the `CAV_TIMING` environment variable.
//! When disabled, [`Timer::start`] skips the clock read and the timer
//! reports nothing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);

pub fn enable_timing() {
    ENABLED.store(true, Ordering::Relaxed);
}

pub fn disable_timing() {
    ENABLED.store(false, Ordering::Relaxed);
}

/// Check if timing is enabled.
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed) || std::env::var_os("CAV_TIMING").is_some()
}

/// Measures one interval when timing is enabled.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Option<Instant>,
}

impl Timer {
    pub fn start() -> Self {
        Self::start_if(is_enabled())
    }

    /// Start only if `enabled`, ignoring the global switch.
    pub fn start_if(enabled: bool) -> Self {
        Self {
            start: enabled.then(Instant::now),
        }
    }

    pub fn is_running(&self) -> bool {
        self.start.is_some()
    }

    /// Elapsed seconds, or `None` if timing was off when started.
    pub fn stop(self) -> Option<f64> {
        self.start.map(|t| t.elapsed().as_secs_f64())
    }
}

/// Per-step cost summary.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepStats {
    count: u64,
    total_s: f64,
    max_s: f64,
}

impl StepStats {
    pub fn record(&mut self, duration_s: f64) {
        self.count += 1;
        self.total_s += duration_s;
        self.max_s = self.max_s.max(duration_s);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn total_seconds(&self) -> f64 {
        self.total_s
    }

    pub fn max_seconds(&self) -> f64 {
        self.max_s
    }

    pub fn mean_seconds(&self) -> f64 {
        if self.count > 0 {
            self.total_s / self.count as f64
        } else {
            0.0
        }
    }
}
