//! Core layout context trait for RoboGrid rounds.

use rand::RngCore;

/// The source of randomness for grid layouts.
///
/// This trait abstracts where entropy comes from so that the same round
/// logic can run against live entropy in production and against a seeded
/// stream in simulation.
///
/// # Implementations
///
/// - **Production**: `EntropyContext` - fresh `StdRng` from OS entropy
/// - **Simulation**: `SimContext` - `ChaCha8Rng` derived from a master seed
///
/// # Determinism
///
/// A seeded implementation must return the same stream for the same
/// `round`, independent of which other rounds were requested before it.
pub trait LayoutContext: Send + Sync + 'static {
    /// Generator handed to `OccupancyGrid::generate`.
    type Rng: RngCore;

    /// Returns the random stream for one round.
    ///
    /// # Arguments
    /// * `round` - Zero-based round index within a run
    fn round_rng(&self, round: u64) -> Self::Rng;

    /// Returns the context's seed (for logging/debugging).
    ///
    /// In production, returns 0 (not seeded).
    fn seed(&self) -> u64;
}
