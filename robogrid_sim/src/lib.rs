//! RoboGrid Deterministic Round Harness
//!
//! This crate replays the robot-search rounds in a controlled environment
//! where every layout is derived from a single 64-bit seed and every scan
//! is cross-checked against an independent oracle.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    ScenarioRunner                    │
//! │   walkthrough │ reroll │ planted │ showcase          │
//! └──────────────────────────┬───────────────────────────┘
//!                            │
//! ┌──────────────────────────▼───────────────────────────┐
//! │                       SimWorld                       │
//! │  SimContext(seed) ──round_rng──► OccupancyGrid       │
//! │                                      │               │
//! │                               RunScanner::scan       │
//! │                                      │               │
//! │  Oracle ─────── expected ──────► RoundReport         │
//! └──────────────────────────┬───────────────────────────┘
//!                            │
//!                      TraceExport (JSON)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use robogrid_sim::{ScenarioRunner, TraceExport};
//! use robogrid_sim::scenarios::ScenarioId;
//!
//! let result = ScenarioRunner::new(42).run(ScenarioId::Showcase)?;
//! TraceExport::from_result(&result).write_to_file("showcase.json")?;
//! ```

mod context;
mod error;
mod exporter;
mod oracle;
mod runner;
mod world;
pub mod scenarios;

pub use context::SimContext;
pub use error::SimError;
pub use exporter::{RoundTrace, TraceExport};
pub use oracle::Oracle;
pub use runner::{ScenarioMetrics, ScenarioResult, ScenarioRunner, REROLL_ROUNDS};
pub use world::{RoundReport, SimConfig, SimWorld};
