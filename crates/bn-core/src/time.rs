//! Simulation time model.
//!
//! # Design
//!
//! Host simulations of cell populations advance in fixed steps of `dt`
//! simulated minutes.  The canonical time unit is the integer step counter;
//! continuous time is derived from it:
//!
//!   current_time = step * dt
//!
//! Deriving the time instead of accumulating `+= dt` keeps long runs free of
//! floating-point drift.  Network countdowns are continuous durations in the
//! same unit as `dt`.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Step counter plus the step length it maps to.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated time per step.
    pub dt: f64,
    /// Number of completed steps.
    pub step: u64,
}

impl SimClock {
    pub fn new(dt: f64) -> Self {
        Self { dt, step: 0 }
    }

    /// Advance the clock by one step.
    #[inline]
    pub fn advance(&mut self) {
        self.step += 1;
    }

    /// Simulated time elapsed since step 0.
    #[inline]
    pub fn current_time(&self) -> f64 {
        self.step as f64 * self.dt
    }

    /// How many steps span `duration`?  Rounds up.
    #[inline]
    pub fn steps_for(&self, duration: f64) -> u64 {
        if duration <= 0.0 {
            return 0;
        }
        (duration / self.dt).ceil() as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} (t = {:.2})", self.step, self.current_time())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Typically loaded from a JSON file by the application crate (with the
/// `serde` feature) and passed to the population builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Simulated time per step.  Must be finite and positive.
    pub dt: f64,

    /// Total simulated time.  The run stops after `total_steps()` steps.
    pub total_time: f64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,

    /// Emit a snapshot every N steps.  0 disables snapshots.
    pub output_interval_steps: u64,
}

impl SimConfig {
    /// Reject non-finite or non-positive step lengths and negative run times.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(CoreError::Config(format!(
                "dt must be finite and positive, got {}",
                self.dt
            )));
        }
        if !self.total_time.is_finite() || self.total_time < 0.0 {
            return Err(CoreError::Config(format!(
                "total_time must be finite and non-negative, got {}",
                self.total_time
            )));
        }
        Ok(())
    }

    /// Number of steps in the run (rounds up).
    #[inline]
    pub fn total_steps(&self) -> u64 {
        self.make_clock().steps_for(self.total_time)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.dt)
    }
}
