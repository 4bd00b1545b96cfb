//! Production implementation of LayoutContext using OS entropy.

use crate::LayoutContext;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Production context backed by OS entropy.
///
/// Every round gets an independently seeded `StdRng`, so layouts are not
/// reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntropyContext;

impl EntropyContext {
    /// Creates a new EntropyContext.
    pub fn new() -> Self {
        Self
    }

    /// Creates an Arc-wrapped context for sharing across threads.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl LayoutContext for EntropyContext {
    type Rng = StdRng;

    fn round_rng(&self, _round: u64) -> StdRng {
        StdRng::from_entropy()
    }

    fn seed(&self) -> u64 {
        // Production is not seeded
        0
    }
}
