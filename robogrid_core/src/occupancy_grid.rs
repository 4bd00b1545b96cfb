//! The occupancy grid: which cells currently hold a robot.
//!
//! Rows are partitioned into blocks of `block_size` columns. The first
//! `candidates_per_block` columns of every block are filled at random, the
//! rest of the block is a separator that is never occupied by generation.
//!
//! ```text
//! column:   0 1 2 3 4 5 6 7 8 9
//! role:     c c c | c c c | c c      (block_size = 4, candidates = 3)
//! ```

use crate::error::ScanError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Grid width of the reference layout.
pub const DEFAULT_WIDTH: usize = 10;

/// Grid height of the reference layout.
pub const DEFAULT_HEIGHT: usize = 10;

/// Block width of the reference layout (three candidates plus one separator).
pub const DEFAULT_BLOCK_SIZE: usize = 4;

/// Randomised columns per block in the reference layout.
pub const DEFAULT_CANDIDATES_PER_BLOCK: usize = 3;

/// Static layout parameters for grid generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of columns
    pub width: usize,

    /// Number of rows
    pub height: usize,

    /// Columns per block, separators included
    pub block_size: usize,

    /// Leading columns of each block that are randomised
    pub candidates_per_block: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            block_size: DEFAULT_BLOCK_SIZE,
            candidates_per_block: DEFAULT_CANDIDATES_PER_BLOCK,
        }
    }
}

impl GridConfig {
    /// Creates a config with the given dimensions and the reference block layout.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Sets the block layout.
    pub fn with_blocks(mut self, block_size: usize, candidates_per_block: usize) -> Self {
        self.block_size = block_size;
        self.candidates_per_block = candidates_per_block;
        self
    }

    /// Checks the parameters without generating anything.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.width == 0 || self.height == 0 {
            return Err(ScanError::config(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.block_size < self.candidates_per_block + 1 {
            return Err(ScanError::config(format!(
                "block size {} leaves no room for a separator after {} candidates",
                self.block_size, self.candidates_per_block
            )));
        }
        Ok(())
    }

    /// Returns true if generation always leaves this column empty.
    pub fn is_separator(&self, column: usize) -> bool {
        column
            .checked_rem(self.block_size)
            .map_or(false, |offset| offset >= self.candidates_per_block)
    }

    /// Columns eligible for random occupancy, ascending.
    pub fn candidate_columns(&self) -> Vec<usize> {
        (0..self.width).filter(|&c| !self.is_separator(c)).collect()
    }

    /// Columns forced empty by generation, ascending.
    pub fn separator_columns(&self) -> Vec<usize> {
        (0..self.width).filter(|&c| self.is_separator(c)).collect()
    }
}

/// A fixed-size, immutable 2-D occupancy matrix.
///
/// Cells are stored densely in row-major order, so every coordinate in range
/// has an explicit value. There are no mutating methods: a new round means a
/// new grid, which keeps an older layout intact for anyone still holding it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Generates a random layout.
    ///
    /// One boolean is drawn from `rng` per candidate cell, row by row, block by
    /// block, left to right. Columns past `width` are skipped without drawing.
    ///
    /// # Errors
    /// `ConfigurationError` for zero dimensions or a block too small to hold a
    /// separator.
    pub fn generate<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        block_size: usize,
        candidates_per_block: usize,
        rng: &mut R,
    ) -> Result<Self, ScanError> {
        let config = GridConfig {
            width,
            height,
            block_size,
            candidates_per_block,
        };
        Self::from_config(&config, rng)
    }

    /// Generates a random layout from a [`GridConfig`].
    pub fn from_config<R: Rng + ?Sized>(config: &GridConfig, rng: &mut R) -> Result<Self, ScanError> {
        config.validate()?;

        let GridConfig {
            width,
            height,
            block_size,
            candidates_per_block,
        } = *config;

        let mut cells = vec![false; width * height];
        for row in 0..height {
            for block_start in (0..width).step_by(block_size) {
                for offset in 0..candidates_per_block {
                    let column = block_start + offset;
                    if column >= width {
                        break;
                    }
                    cells[row * width + column] = rng.gen::<bool>();
                }
            }
        }

        let grid = Self {
            width,
            height,
            cells,
        };
        debug!(
            width,
            height,
            occupied = grid.occupied_count(),
            "generated occupancy grid"
        );
        Ok(grid)
    }

    /// Builds a grid from an explicit layout, one `Vec` per row.
    ///
    /// # Errors
    /// `ConfigurationError` if there are no rows, the rows are empty, or the
    /// rows differ in length.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, ScanError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(ScanError::config("explicit layout has no cells"));
        }
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(ScanError::config(format!(
                "row {} has {} cells, expected {}",
                index,
                row.len(),
                width
            )));
        }

        Ok(Self {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Returns a copy of this grid with the given `(column, row)` cells occupied.
    ///
    /// Planted cells may sit on separator columns.
    ///
    /// # Errors
    /// `OutOfBounds` for the first coordinate outside the grid.
    pub fn with_occupied(&self, cells: &[(usize, usize)]) -> Result<Self, ScanError> {
        let mut planted = self.clone();
        for &(column, row) in cells {
            let index = self.index(column, row)?;
            planted.cells[index] = true;
        }
        Ok(planted)
    }

    /// Returns whether the cell is occupied.
    ///
    /// # Errors
    /// `OutOfBounds` if either coordinate is outside the grid.
    pub fn get(&self, column: usize, row: usize) -> Result<bool, ScanError> {
        self.index(column, row).map(|i| self.cells[i])
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns one row, or `None` past the last row.
    pub fn row(&self, row: usize) -> Option<&[bool]> {
        if row >= self.height {
            return None;
        }
        let start = row * self.width;
        Some(&self.cells[start..start + self.width])
    }

    /// Iterates rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells.chunks(self.width)
    }

    /// All occupied cells as `(column, row)`, row-major.
    pub fn occupied_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, occupied)| **occupied)
            .map(|(i, _)| (i % self.width, i / self.width))
            .collect()
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Unchecked read for coordinates already validated by the caller.
    pub(crate) fn occupied(&self, column: usize, row: usize) -> bool {
        self.cells[row * self.width + column]
    }

    fn index(&self, column: usize, row: usize) -> Result<usize, ScanError> {
        if column >= self.width || row >= self.height {
            return Err(ScanError::out_of_bounds(column, row, self.width, self.height));
        }
        Ok(row * self.width + column)
    }
}

/// Renders `#` for occupied and `.` for empty, one line per row.
impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for &cell in row {
                write!(f, "{}", if cell { '#' } else { '.' })?;
            }
        }
        Ok(())
    }
}

/// Parses the [`Display`](fmt::Display) form. Blank lines and surrounding
/// whitespace are ignored.
impl FromStr for OccupancyGrid {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .map(|c| match c {
                        '#' => Ok(true),
                        '.' => Ok(false),
                        other => Err(ScanError::config(format!("unexpected cell '{}'", other))),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(rows)
    }
}
