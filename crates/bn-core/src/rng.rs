//! Deterministic per-cell RNG.
//!
//! # Determinism strategy
//!
//! Each cell gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (cell_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive cell IDs uniformly across the seed space.
//! Cells never share RNG state, so update jitter is uncorrelated between
//! cells and no generator is contended when cells run on worker threads.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::CellId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── UniformSource ─────────────────────────────────────────────────────────────

/// A uniform sampler over the symmetric interval `[-1, 1]`.
///
/// Network update schedules draw their jitter from this trait rather than a
/// process-wide generator so tests can script the draws and parallel cells
/// never serialize on a shared RNG.
pub trait UniformSource {
    /// Next value, uniformly distributed in `[-1, 1]`.
    fn uniform_11(&mut self) -> f64;
}

// ── CellRng ───────────────────────────────────────────────────────────────────

/// Per-cell deterministic RNG.
///
/// Create one per cell at population build; store in a parallel `Vec<CellRng>`
/// next to the networks.  Not `Sync`: each worker must hold its own slice.
#[derive(Clone)]
pub struct CellRng(SmallRng);

impl CellRng {
    /// Seed deterministically from the run's global seed and a cell ID.
    pub fn new(global_seed: u64, cell: CellId) -> Self {
        let seed = global_seed ^ (cell.0 as u64).wrapping_mul(MIXING_CONSTANT);
        CellRng(SmallRng::seed_from_u64(seed))
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}

impl UniformSource for CellRng {
    #[inline]
    fn uniform_11(&mut self) -> f64 {
        self.0.gen_range(-1.0..=1.0)
    }
}
