//! SimWorld - the round state container.

use crate::context::SimContext;
use crate::error::SimError;
use crate::oracle::Oracle;

use robogrid_core::{GridConfig, OccupancyGrid, RunMatch, RunScanner, ScanOutcome, ScanRequest, DEFAULT_RUN_LENGTH};
use robogrid_env::LayoutContext;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Configuration for a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Master seed for determinism
    pub seed: u64,

    /// Layout of every generated grid
    pub grid: GridConfig,

    /// Run length searched for in every scan
    pub run_length: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            grid: GridConfig::default(),
            run_length: DEFAULT_RUN_LENGTH,
        }
    }
}

/// One scan of one layout, with the oracle's answer alongside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    /// Round the layout belongs to
    pub round: u64,

    /// Rows and run length that were scanned
    pub request: ScanRequest,

    /// Layout that was scanned
    pub grid: OccupancyGrid,

    /// Whether cells were planted on top of the generated layout
    pub planted: bool,

    /// Scanner trace and verdict
    pub outcome: ScanOutcome,

    /// Verdict computed independently by the oracle
    pub expected: Option<RunMatch>,
}

impl RoundReport {
    /// Returns true if the scanner agrees with the oracle.
    pub fn matches_oracle(&self) -> bool {
        self.outcome.result == self.expected
    }
}

/// The SimWorld - owns the current layout and produces new ones per round.
pub struct SimWorld {
    /// Configuration
    pub config: SimConfig,

    /// Seeded randomness
    pub context: Arc<SimContext>,

    /// Ground truth oracle
    pub oracle: Oracle,

    /// Current layout
    grid: OccupancyGrid,

    /// Whether the current layout has planted cells
    planted: bool,

    /// Current round index
    round: u64,
}

impl SimWorld {
    /// Creates a SimWorld and generates the round 0 layout.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        let context = SimContext::shared(config.seed);
        let grid = Self::layout(&context, &config.grid, 0)?;

        Ok(Self {
            config,
            context,
            oracle: Oracle::new(config.grid),
            grid,
            planted: false,
            round: 0,
        })
    }

    fn layout(context: &SimContext, grid: &GridConfig, round: u64) -> Result<OccupancyGrid, SimError> {
        let mut rng = context.round_rng(round);
        Ok(OccupancyGrid::from_config(grid, &mut rng)?)
    }

    /// Advances to the next round with a fresh layout.
    ///
    /// Returns the retired layout, which stays valid for whoever still
    /// needs it (e.g. to fade it out).
    pub fn reroll(&mut self) -> Result<OccupancyGrid, SimError> {
        let round = self.round + 1;
        let fresh = Self::layout(&self.context, &self.config.grid, round)?;

        debug!(round, occupied = fresh.occupied_count(), "rerolled layout");
        self.round = round;
        self.planted = false;
        Ok(std::mem::replace(&mut self.grid, fresh))
    }

    /// Replaces the current layout with a copy that has `cells` occupied.
    pub fn plant(&mut self, cells: &[(usize, usize)]) -> Result<(), SimError> {
        self.grid = self.grid.with_occupied(cells)?;
        self.planted = true;
        debug!(round = self.round, cells = cells.len(), "planted cells");
        Ok(())
    }

    /// Scans rows `[row_start, row_start + row_count)` of the current layout.
    pub fn scan(&self, row_start: usize, row_count: usize) -> Result<RoundReport, SimError> {
        let request = ScanRequest::new(row_start, row_count, self.config.run_length);
        let outcome = RunScanner::scan_request(&self.grid, &request)?;
        let expected = self
            .oracle
            .first_run(&self.grid, row_start..row_start + row_count, request.run_length);

        Ok(RoundReport {
            round: self.round,
            request,
            grid: self.grid.clone(),
            planted: self.planted,
            outcome,
            expected,
        })
    }

    /// Current layout.
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// Current round index.
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Whether the current layout has planted cells.
    pub fn is_planted(&self) -> bool {
        self.planted
    }
}
