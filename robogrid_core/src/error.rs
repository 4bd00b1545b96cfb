//! Error types for grid construction and scanning.

use thiserror::Error;

/// Errors raised by [`OccupancyGrid`](crate::OccupancyGrid) and
/// [`RunScanner`](crate::RunScanner).
///
/// Both variants are caller programming errors. They are reported before any
/// generation or scanning work starts and are never retried. Not finding a run
/// is a normal outcome and is not represented here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// Invalid static parameters (dimensions, block layout, run length, row range)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Coordinate outside the grid extent
    #[error("Cell ({column}, {row}) is outside a {width}x{height} grid")]
    OutOfBounds {
        column: usize,
        row: usize,
        width: usize,
        height: usize,
    },
}

impl ScanError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Creates an out-of-bounds error for the given cell and grid extent.
    pub fn out_of_bounds(column: usize, row: usize, width: usize, height: usize) -> Self {
        Self::OutOfBounds {
            column,
            row,
            width,
            height,
        }
    }

    /// Returns true for configuration errors.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::ConfigurationError(_))
    }
}
