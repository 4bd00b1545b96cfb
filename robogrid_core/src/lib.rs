//! RoboGrid Core - Occupancy Grids and Traced Run Scanning
//!
//! This library answers one question: where is the first row holding
//! `run_length` robots side by side?
//! 1. **Layout**: `OccupancyGrid` generates a random robot layout from an
//!    injected RNG, with separator columns that are never occupied
//! 2. **Search**: `RunScanner` slides a window along each row, abandoning a
//!    window at its first empty cell and the scan at its first match
//! 3. **Trace**: every read and verdict is emitted as a `ScanEvent` so a
//!    renderer or a test can replay the search step by step

pub mod error;
pub mod occupancy_grid;
pub mod run_scanner;
pub mod scan_event;

// Re-export key types for convenience
pub use error::ScanError;
pub use occupancy_grid::{GridConfig, OccupancyGrid};
pub use run_scanner::{RunMatch, RunScanner, ScanEvents, ScanOutcome, ScanRequest, ScanStats, DEFAULT_RUN_LENGTH};
pub use scan_event::{ScanEvent, TraceSink};
