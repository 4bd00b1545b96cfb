//! Simulation context implementing LayoutContext for deterministic rounds.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use robogrid_env::LayoutContext;
use std::sync::Arc;

/// Simulation context backed by a master seed.
///
/// Each round gets its own ChaCha8 stream derived from the master seed and
/// the round index, so a round can be replayed without replaying the rounds
/// before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimContext {
    /// Master seed for this simulation
    seed: u64,
}

impl SimContext {
    /// Creates a new SimContext with the given seed.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Creates an Arc-wrapped context for sharing.
    pub fn shared(seed: u64) -> Arc<Self> {
        Arc::new(Self::new(seed))
    }

    /// Seed of the stream used for `round`.
    pub fn round_seed(&self, round: u64) -> u64 {
        self.seed.wrapping_mul(0x517cc1b727220a95) ^ round
    }
}

impl LayoutContext for SimContext {
    type Rng = ChaCha8Rng;

    fn round_rng(&self, round: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.round_seed(round))
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}
