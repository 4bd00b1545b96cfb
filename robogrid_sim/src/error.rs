//! Error types for the simulation harness.

use robogrid_core::ScanError;
use thiserror::Error;

/// Errors that can occur while running or exporting scenarios.
#[derive(Debug, Error)]
pub enum SimError {
    /// Grid or scan parameters rejected by the core
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Trace export could not be written
    #[error("Export error: {0}")]
    Export(#[from] std::io::Error),

    /// Trace export could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
