//! Scenario runner - executes round scripts and checks them against the oracle.

use crate::error::SimError;
use crate::oracle::Oracle;
use crate::scenarios::{ScenarioId, PLANTED_RUN};
use crate::world::{RoundReport, SimConfig, SimWorld};

use robogrid_core::{GridConfig, DEFAULT_RUN_LENGTH};
use tracing::{debug, info, warn};

/// Fresh layouts scanned by the reroll script.
pub const REROLL_ROUNDS: usize = 3;

/// Rows scanned closely before the rest of the grid is swept.
const HEAD_ROWS: usize = 2;

/// Results from running a scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,

    /// Seed used
    pub seed: u64,

    /// Whether every scan agreed with the oracle and the scenario's expectations held
    pub passed: bool,

    /// Every scan, in the order it ran
    pub rounds: Vec<RoundReport>,

    /// Failure message if any
    pub failure_reason: Option<String>,

    /// Metrics collected during run
    pub metrics: ScenarioMetrics,
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScenarioMetrics {
    /// Scans performed
    pub scans: usize,

    /// Scans that found a run
    pub runs_found: usize,

    /// Total trace events
    pub events: usize,

    /// Rows that received a verdict
    pub rows_scanned: usize,

    /// Windows started
    pub windows_tried: usize,

    /// Cells read
    pub cells_checked: usize,
}

impl ScenarioMetrics {
    fn record(&mut self, report: &RoundReport) {
        let stats = report.outcome.stats();
        self.scans += 1;
        self.runs_found += usize::from(report.outcome.found());
        self.events += report.outcome.trace.len();
        self.rows_scanned += stats.rows_scanned;
        self.windows_tried += stats.windows_tried;
        self.cells_checked += stats.cells_checked;
    }
}

/// Runs round scripts.
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    /// Configuration seed
    seed: u64,

    /// Layout of generated grids
    grid: GridConfig,

    /// Run length searched for
    run_length: usize,
}

impl ScenarioRunner {
    /// Creates a new scenario runner with the reference layout.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            grid: GridConfig::default(),
            run_length: DEFAULT_RUN_LENGTH,
        }
    }

    /// Sets the grid layout.
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    /// Sets the run length.
    pub fn with_run_length(mut self, run_length: usize) -> Self {
        self.run_length = run_length;
        self
    }

    /// Returns the world configuration this runner uses.
    pub fn config(&self) -> SimConfig {
        SimConfig {
            seed: self.seed,
            grid: self.grid,
            run_length: self.run_length,
        }
    }

    /// Runs a scenario and returns the result.
    ///
    /// # Errors
    /// Invalid grid or scan parameters. A scan that disagrees with the oracle
    /// is not an error; it is reported through `passed`.
    pub fn run(&self, scenario: ScenarioId) -> Result<ScenarioResult, SimError> {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);

        let mut world = SimWorld::new(self.config())?;
        let mut rounds = Vec::new();

        match scenario {
            ScenarioId::Walkthrough => self.run_walkthrough(&mut world, &mut rounds)?,
            ScenarioId::Reroll => self.run_reroll(&mut world, &mut rounds)?,
            ScenarioId::Planted => self.run_planted(&mut world, &mut rounds)?,
            ScenarioId::Showcase => {
                self.run_walkthrough(&mut world, &mut rounds)?;
                self.run_reroll(&mut world, &mut rounds)?;
                self.run_planted(&mut world, &mut rounds)?;
            }
        }

        let result = self.evaluate(scenario, &world.oracle, rounds);
        if result.passed {
            info!(
                "{} (seed={}) passed: {} scans, {} runs found",
                scenario.name(),
                self.seed,
                result.metrics.scans,
                result.metrics.runs_found
            );
        } else {
            warn!(
                "{} (seed={}) failed: {}",
                scenario.name(),
                self.seed,
                result.failure_reason.as_deref().unwrap_or("unknown")
            );
        }
        Ok(result)
    }

    /// Scans the head rows of the first layout, then the remaining rows.
    fn run_walkthrough(&self, world: &mut SimWorld, rounds: &mut Vec<RoundReport>) -> Result<(), SimError> {
        let height = world.grid().height();
        let head = HEAD_ROWS.min(height);

        rounds.push(world.scan(0, head)?);
        rounds.push(world.scan(head, height - head)?);
        Ok(())
    }

    /// Generates fresh layouts and sweeps each one.
    fn run_reroll(&self, world: &mut SimWorld, rounds: &mut Vec<RoundReport>) -> Result<(), SimError> {
        for _ in 0..REROLL_ROUNDS {
            world.reroll()?;
            let height = world.grid().height();
            rounds.push(world.scan(0, height)?);
        }
        Ok(())
    }

    /// Generates a fresh layout, plants a run and scans the head rows.
    fn run_planted(&self, world: &mut SimWorld, rounds: &mut Vec<RoundReport>) -> Result<(), SimError> {
        world.reroll()?;
        world.plant(&PLANTED_RUN)?;
        let head = HEAD_ROWS.min(world.grid().height());
        rounds.push(world.scan(0, head)?);
        Ok(())
    }

    fn evaluate(&self, scenario: ScenarioId, oracle: &Oracle, rounds: Vec<RoundReport>) -> ScenarioResult {
        let mut metrics = ScenarioMetrics::default();
        let mut failure_reason = None;

        for report in &rounds {
            metrics.record(report);
            debug!(
                round = report.round,
                row_start = report.request.row_start,
                row_count = report.request.row_count,
                found = ?report.outcome.result,
                "round scanned"
            );

            if failure_reason.is_some() {
                continue;
            }
            if !report.matches_oracle() {
                failure_reason = Some(format!(
                    "round {}: scanner found {:?}, oracle expected {:?}",
                    report.round, report.outcome.result, report.expected
                ));
            } else if !report.planted {
                let violations = oracle.separator_violations(&report.grid);
                if !violations.is_empty() {
                    failure_reason = Some(format!(
                        "round {}: separator cells occupied {:?}",
                        report.round, violations
                    ));
                }
            }
        }

        if failure_reason.is_none()
            && scenario.expects_match()
            && !rounds.last().map_or(false, |r| r.outcome.found())
        {
            failure_reason = Some("planted run was not found".to_string());
        }

        ScenarioResult {
            scenario,
            seed: self.seed,
            passed: failure_reason.is_none(),
            rounds,
            failure_reason,
            metrics,
        }
    }
}
