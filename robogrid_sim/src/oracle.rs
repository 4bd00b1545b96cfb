//! Ground truth oracle for simulation.
//!
//! The Oracle answers the same questions as the scanner by looking at the
//! grid directly, without any event bookkeeping:
//! - Which row and window hold the first full run
//! - How long the longest run in a row is
//! - Whether generation left any separator occupied

use robogrid_core::{GridConfig, OccupancyGrid, RunMatch};
use std::ops::Range;

/// The Oracle - independent reference answers for a grid.
#[derive(Debug, Clone)]
pub struct Oracle {
    /// Layout the grids were generated with
    config: GridConfig,
}

impl Oracle {
    /// Creates an Oracle for grids generated with `config`.
    pub fn new(config: GridConfig) -> Self {
        Self { config }
    }

    /// Returns the layout this oracle checks against.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// First `(row, window_start)` in `rows` whose window of `run_length`
    /// cells is fully occupied.
    pub fn first_run(&self, grid: &OccupancyGrid, rows: Range<usize>, run_length: usize) -> Option<RunMatch> {
        if run_length == 0 {
            return None;
        }

        rows.filter_map(|row| grid.row(row).map(|cells| (row, cells)))
            .find_map(|(row, cells)| {
                cells
                    .windows(run_length)
                    .position(|window| window.iter().all(|&occupied| occupied))
                    .map(|window_start| RunMatch { row, window_start })
            })
    }

    /// Length of the longest contiguous occupied run in `row`.
    pub fn max_run(grid: &OccupancyGrid, row: usize) -> usize {
        grid.row(row).map_or(0, |cells| {
            cells
                .split(|&occupied| !occupied)
                .map(<[bool]>::len)
                .max()
                .unwrap_or(0)
        })
    }

    /// Longest contiguous occupied run anywhere in the grid.
    pub fn longest_run(grid: &OccupancyGrid) -> usize {
        (0..grid.height())
            .map(|row| Self::max_run(grid, row))
            .max()
            .unwrap_or(0)
    }

    /// Occupied cells sitting on separator columns, as `(column, row)`.
    pub fn separator_violations(&self, grid: &OccupancyGrid) -> Vec<(usize, usize)> {
        grid.occupied_cells()
            .into_iter()
            .filter(|&(column, _)| self.config.is_separator(column))
            .collect()
    }
}
