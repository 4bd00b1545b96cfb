//! JSON trace exporter for renderers.
//!
//! Exports every scan of a scenario run, with its layout and full event
//! trace, so an external animation tool can replay it without linking
//! against this crate.

use crate::error::SimError;
use crate::runner::ScenarioResult;
use crate::world::RoundReport;

use robogrid_core::{RunMatch, ScanEvent};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A single scan of a single layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTrace {
    /// Round index the layout belongs to
    pub round: u64,

    /// First scanned row
    pub row_start: usize,

    /// Number of scanned rows
    pub row_count: usize,

    /// Window width
    pub run_length: usize,

    /// Layout, one array per row
    pub rows: Vec<Vec<bool>>,

    /// Whether cells were planted on top of the generated layout
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub planted: bool,

    /// Events in trace order
    pub events: Vec<ScanEvent>,

    /// Verdict
    pub result: Option<RunMatch>,
}

impl RoundTrace {
    /// Builds a trace from a round report.
    pub fn from_report(report: &RoundReport) -> Self {
        Self {
            round: report.round,
            row_start: report.request.row_start,
            row_count: report.request.row_count,
            run_length: report.request.run_length,
            rows: report.grid.rows().map(<[bool]>::to_vec).collect(),
            planted: report.planted,
            events: report.outcome.trace.clone(),
            result: report.outcome.result,
        }
    }
}

/// Complete scenario export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceExport {
    /// Scenario name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// All scans
    pub rounds: Vec<RoundTrace>,

    /// Final results
    pub passed: bool,

    /// Failure message if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl TraceExport {
    /// Creates an empty export container.
    pub fn new(scenario: &str, seed: u64) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            rounds: Vec::new(),
            passed: false,
            failure_reason: None,
        }
    }

    /// Builds an export from a finished scenario run.
    pub fn from_result(result: &ScenarioResult) -> Self {
        let mut export = Self::new(result.scenario.name(), result.seed);
        for report in &result.rounds {
            export.add_round(RoundTrace::from_report(report));
        }
        export.finalize(result.passed, result.failure_reason.clone());
        export
    }

    /// Adds a round.
    pub fn add_round(&mut self, round: RoundTrace) {
        self.rounds.push(round);
    }

    /// Finalizes the export.
    pub fn finalize(&mut self, passed: bool, failure_reason: Option<String>) {
        self.passed = passed;
        self.failure_reason = failure_reason;
    }

    /// Total events across all rounds.
    pub fn event_count(&self) -> usize {
        self.rounds.iter().map(|r| r.events.len()).sum()
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        let json = self.to_json()?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
