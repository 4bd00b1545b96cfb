//! Row-wise sliding-window search for a contiguous run of occupied cells.
//!
//! Each row is swept left to right with a window of `run_length` columns.
//! Inside a window cells are checked left to right and the window is
//! abandoned at the first empty cell. The first window that is fully
//! occupied resolves its row, and the first resolved row ends the scan.
//!
//! ```text
//! row 0:  [# # # .] # # . . # #     start 0 misses at column 3
//!          # [# # . #] # . . # #    start 1 misses at column 3
//!          ...
//! ```
//!
//! Every read and verdict is reported as a [`ScanEvent`], so a renderer can
//! replay the search step by step and a test can assert on it directly.

use crate::error::ScanError;
use crate::occupancy_grid::{OccupancyGrid, DEFAULT_HEIGHT};
use crate::scan_event::{ScanEvent, TraceSink};
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;
use tracing::debug;

/// Run length searched for in the reference scenario.
pub const DEFAULT_RUN_LENGTH: usize = 4;

/// Where a fully occupied window was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunMatch {
    pub row: usize,
    pub window_start: usize,
}

/// Row range and run length for one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    /// First row to scan
    pub row_start: usize,

    /// Number of rows to scan
    pub row_count: usize,

    /// Width of the window that must be fully occupied
    pub run_length: usize,
}

impl Default for ScanRequest {
    fn default() -> Self {
        Self {
            row_start: 0,
            row_count: DEFAULT_HEIGHT,
            run_length: DEFAULT_RUN_LENGTH,
        }
    }
}

impl ScanRequest {
    /// Creates a request.
    pub fn new(row_start: usize, row_count: usize, run_length: usize) -> Self {
        Self {
            row_start,
            row_count,
            run_length,
        }
    }

    /// Covers every row of `grid`.
    pub fn all_rows(grid: &OccupancyGrid, run_length: usize) -> Self {
        Self::new(0, grid.height(), run_length)
    }

    /// Sets the row range.
    pub fn with_rows(mut self, row_start: usize, row_count: usize) -> Self {
        self.row_start = row_start;
        self.row_count = row_count;
        self
    }

    /// Sets the run length.
    pub fn with_run_length(mut self, run_length: usize) -> Self {
        self.run_length = run_length;
        self
    }
}

/// Counters derived from a trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub rows_scanned: usize,
    pub windows_tried: usize,
    pub cells_checked: usize,
}

impl ScanStats {
    /// Tallies a trace.
    pub fn from_trace(trace: &[ScanEvent]) -> Self {
        trace.iter().fold(Self::default(), |mut stats, event| {
            match event {
                ScanEvent::WindowStarted { .. } => stats.windows_tried += 1,
                ScanEvent::CellChecked { .. } => stats.cells_checked += 1,
                ScanEvent::RowResult { .. } => stats.rows_scanned += 1,
                ScanEvent::WindowResult { .. } => {}
            }
            stats
        })
    }
}

/// Complete trace plus verdict of one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub trace: Vec<ScanEvent>,
    pub result: Option<RunMatch>,
}

impl ScanOutcome {
    /// Returns true if a run was found.
    pub fn found(&self) -> bool {
        self.result.is_some()
    }

    /// Counters for the trace.
    pub fn stats(&self) -> ScanStats {
        ScanStats::from_trace(&self.trace)
    }
}

/// Position of the scan state machine. Each variant produces exactly one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    StartWindow {
        row: usize,
        start: usize,
    },
    CheckCell {
        row: usize,
        start: usize,
        offset: usize,
        matched: usize,
    },
    CloseWindow {
        row: usize,
        start: usize,
        matched: usize,
    },
    CloseRow {
        row: usize,
        matched_start: Option<usize>,
    },
    Done,
}

/// Lazy trace of a scan.
///
/// Events are computed on demand, so a consumer that only wants a prefix can
/// stop pulling. [`result`](Self::result) is meaningful once the iterator has
/// returned `None`.
#[derive(Debug, Clone)]
pub struct ScanEvents<'a> {
    grid: &'a OccupancyGrid,
    run_length: usize,
    row_end: usize,
    last_start: usize,
    cursor: Cursor,
    result: Option<RunMatch>,
}

impl<'a> ScanEvents<'a> {
    fn new(grid: &'a OccupancyGrid, row_start: usize, row_end: usize, run_length: usize) -> Self {
        let cursor = if row_start < row_end {
            Cursor::StartWindow {
                row: row_start,
                start: 0,
            }
        } else {
            Cursor::Done
        };

        Self {
            grid,
            run_length,
            row_end,
            last_start: grid.width() - run_length,
            cursor,
            result: None,
        }
    }

    /// Verdict of the scan so far.
    pub fn result(&self) -> Option<RunMatch> {
        self.result
    }

    /// Returns true once every event has been produced.
    pub fn is_finished(&self) -> bool {
        self.cursor == Cursor::Done
    }
}

impl Iterator for ScanEvents<'_> {
    type Item = ScanEvent;

    fn next(&mut self) -> Option<ScanEvent> {
        let (event, next) = match self.cursor {
            Cursor::StartWindow { row, start } => (
                ScanEvent::WindowStarted {
                    row,
                    window_start: start,
                    window_width: self.run_length,
                },
                Cursor::CheckCell {
                    row,
                    start,
                    offset: 0,
                    matched: 0,
                },
            ),

            Cursor::CheckCell {
                row,
                start,
                offset,
                matched,
            } => {
                let column = start + offset;
                let occupied = self.grid.occupied(column, row);
                let next = if !occupied {
                    Cursor::CloseWindow { row, start, matched }
                } else if offset + 1 == self.run_length {
                    Cursor::CloseWindow {
                        row,
                        start,
                        matched: matched + 1,
                    }
                } else {
                    Cursor::CheckCell {
                        row,
                        start,
                        offset: offset + 1,
                        matched: matched + 1,
                    }
                };
                (
                    ScanEvent::CellChecked {
                        row,
                        column,
                        occupied,
                    },
                    next,
                )
            }

            Cursor::CloseWindow { row, start, matched } => {
                let success = matched == self.run_length;
                let next = if success {
                    Cursor::CloseRow {
                        row,
                        matched_start: Some(start),
                    }
                } else if start < self.last_start {
                    Cursor::StartWindow {
                        row,
                        start: start + 1,
                    }
                } else {
                    Cursor::CloseRow {
                        row,
                        matched_start: None,
                    }
                };
                (
                    ScanEvent::WindowResult {
                        row,
                        window_start: start,
                        success,
                        matched_count: matched,
                    },
                    next,
                )
            }

            Cursor::CloseRow { row, matched_start } => {
                let next = match matched_start {
                    Some(window_start) => {
                        self.result = Some(RunMatch { row, window_start });
                        Cursor::Done
                    }
                    None if row + 1 < self.row_end => Cursor::StartWindow {
                        row: row + 1,
                        start: 0,
                    },
                    None => Cursor::Done,
                };
                (
                    ScanEvent::RowResult {
                        row,
                        success: matched_start.is_some(),
                    },
                    next,
                )
            }

            Cursor::Done => return None,
        };

        self.cursor = next;
        Some(event)
    }
}

impl FusedIterator for ScanEvents<'_> {}

/// Sliding-window run search over an [`OccupancyGrid`].
///
/// Stateless; every call is a pure function of the grid and parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunScanner;

impl RunScanner {
    /// Scans rows `[row_start, row_start + row_count)` for `run_length`
    /// contiguous occupied cells and returns the full trace and verdict.
    ///
    /// # Errors
    /// `ConfigurationError` if the row range leaves the grid or `run_length`
    /// is outside `1..=grid.width()`. Nothing is scanned in that case.
    pub fn scan(
        grid: &OccupancyGrid,
        row_start: usize,
        row_count: usize,
        run_length: usize,
    ) -> Result<ScanOutcome, ScanError> {
        let mut events = Self::events(grid, row_start, row_count, run_length)?;
        let trace: Vec<ScanEvent> = events.by_ref().collect();
        let result = events.result();

        debug!(
            row_start,
            row_count,
            run_length,
            events = trace.len(),
            found = ?result,
            "scan finished"
        );
        Ok(ScanOutcome { trace, result })
    }

    /// Same as [`scan`](Self::scan), parameters taken from a [`ScanRequest`].
    pub fn scan_request(grid: &OccupancyGrid, request: &ScanRequest) -> Result<ScanOutcome, ScanError> {
        Self::scan(grid, request.row_start, request.row_count, request.run_length)
    }

    /// Returns the trace as a lazy iterator.
    pub fn events(
        grid: &OccupancyGrid,
        row_start: usize,
        row_count: usize,
        run_length: usize,
    ) -> Result<ScanEvents<'_>, ScanError> {
        let row_end = validate(grid, row_start, row_count, run_length)?;
        Ok(ScanEvents::new(grid, row_start, row_end, run_length))
    }

    /// Pushes every event into `sink` and returns the verdict.
    pub fn scan_into<S: TraceSink + ?Sized>(
        grid: &OccupancyGrid,
        row_start: usize,
        row_count: usize,
        run_length: usize,
        sink: &mut S,
    ) -> Result<Option<RunMatch>, ScanError> {
        let mut events = Self::events(grid, row_start, row_count, run_length)?;
        for event in events.by_ref() {
            sink.record(event);
        }
        Ok(events.result())
    }
}

/// Checks scan parameters and returns the exclusive end row.
fn validate(
    grid: &OccupancyGrid,
    row_start: usize,
    row_count: usize,
    run_length: usize,
) -> Result<usize, ScanError> {
    if run_length == 0 || run_length > grid.width() {
        return Err(ScanError::config(format!(
            "run length {} must be between 1 and the grid width {}",
            run_length,
            grid.width()
        )));
    }

    row_start
        .checked_add(row_count)
        .filter(|&end| end <= grid.height())
        .ok_or_else(|| {
            ScanError::config(format!(
                "rows {}+{} exceed the grid height {}",
                row_start,
                row_count,
                grid.height()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occupancy_grid::GridConfig;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn grid(text: &str) -> OccupancyGrid {
        text.parse().unwrap()
    }

    /// `(window_start, matched_count, success, cells_checked)` per window.
    fn windows(trace: &[ScanEvent]) -> Vec<(usize, usize, bool, usize)> {
        let mut out = Vec::new();
        let mut checked = 0;
        for event in trace {
            match *event {
                ScanEvent::WindowStarted { .. } => checked = 0,
                ScanEvent::CellChecked { .. } => checked += 1,
                ScanEvent::WindowResult {
                    window_start,
                    success,
                    matched_count,
                    ..
                } => out.push((window_start, matched_count, success, checked)),
                ScanEvent::RowResult { .. } => {}
            }
        }
        out
    }

    #[test]
    fn test_mixed_row_has_no_run() {
        let grid = grid("###.##..##");
        let outcome = RunScanner::scan(&grid, 0, 1, 4).unwrap();

        assert_eq!(
            windows(&outcome.trace),
            vec![
                (0, 3, false, 4),
                (1, 2, false, 3),
                (2, 1, false, 2),
                (3, 0, false, 1),
                (4, 2, false, 3),
                (5, 1, false, 2),
                (6, 0, false, 1),
            ]
        );
        assert_eq!(
            outcome.trace.last(),
            Some(&ScanEvent::RowResult { row: 0, success: false })
        );
        assert_eq!(outcome.result, None);
        assert_eq!(outcome.trace.len(), 31);
    }

    #[test]
    fn test_mixed_row_first_window_events() {
        let grid = grid("###.##..##");
        let outcome = RunScanner::scan(&grid, 0, 1, 4).unwrap();

        assert_eq!(
            outcome.trace[..7],
            [
                ScanEvent::WindowStarted {
                    row: 0,
                    window_start: 0,
                    window_width: 4
                },
                ScanEvent::CellChecked {
                    row: 0,
                    column: 0,
                    occupied: true
                },
                ScanEvent::CellChecked {
                    row: 0,
                    column: 1,
                    occupied: true
                },
                ScanEvent::CellChecked {
                    row: 0,
                    column: 2,
                    occupied: true
                },
                ScanEvent::CellChecked {
                    row: 0,
                    column: 3,
                    occupied: false
                },
                ScanEvent::WindowResult {
                    row: 0,
                    window_start: 0,
                    success: false,
                    matched_count: 3
                },
                ScanEvent::WindowStarted {
                    row: 0,
                    window_start: 1,
                    window_width: 4
                },
            ]
        );
    }

    #[test]
    fn test_separators_block_every_four_window() {
        let grid = grid("###.###.##");
        let outcome = RunScanner::scan(&grid, 0, 1, 4).unwrap();

        let found = windows(&outcome.trace);
        assert_eq!(found[4], (4, 3, false, 4));
        assert!(found.iter().all(|&(_, _, success, _)| !success));
        assert_eq!(outcome.result, None);
    }

    #[test]
    fn test_row_stops_at_first_full_window() {
        let grid = grid("..######..");
        let outcome = RunScanner::scan(&grid, 0, 1, 4).unwrap();

        assert_eq!(
            windows(&outcome.trace),
            vec![(0, 0, false, 1), (1, 0, false, 1), (2, 4, true, 4)]
        );
        assert_eq!(
            outcome.result,
            Some(RunMatch {
                row: 0,
                window_start: 2
            })
        );
        assert_eq!(
            outcome.trace.last(),
            Some(&ScanEvent::RowResult { row: 0, success: true })
        );
    }

    #[test]
    fn test_scan_stops_at_first_resolved_row() {
        let grid = grid(
            "..........
             ####......
             ##########",
        );
        let outcome = RunScanner::scan(&grid, 0, 3, 4).unwrap();

        assert_eq!(
            outcome.result,
            Some(RunMatch {
                row: 1,
                window_start: 0
            })
        );
        assert!(outcome.trace.iter().all(|e| e.row() <= 1));

        let stats = outcome.stats();
        assert_eq!(stats.rows_scanned, 2);
        assert_eq!(stats.windows_tried, 7 + 1);
        assert_eq!(stats.cells_checked, 7 + 4);
    }

    #[test]
    fn test_row_range_is_respected() {
        let grid = grid(
            "####......
             ..........
             ##########",
        );
        let outcome = RunScanner::scan(&grid, 1, 1, 4).unwrap();

        assert!(outcome.trace.iter().all(|e| e.row() == 1));
        assert_eq!(outcome.result, None);

        let outcome = RunScanner::scan_request(&grid, &ScanRequest::new(1, 2, 4)).unwrap();
        assert_eq!(
            outcome.result,
            Some(RunMatch {
                row: 2,
                window_start: 0
            })
        );
    }

    #[test]
    fn test_empty_row_range() {
        let grid = grid("####");
        let outcome = RunScanner::scan(&grid, 1, 0, 4).unwrap();
        assert!(outcome.trace.is_empty());
        assert_eq!(outcome.result, None);
    }

    #[test]
    fn test_run_as_wide_as_grid() {
        let grid = grid("#####\n##.##");
        let outcome = RunScanner::scan(&grid, 0, 2, 5).unwrap();
        assert_eq!(outcome.stats().windows_tried, 1);
        assert_eq!(
            outcome.result,
            Some(RunMatch {
                row: 0,
                window_start: 0
            })
        );

        let outcome = RunScanner::scan(&grid, 1, 1, 5).unwrap();
        assert_eq!(windows(&outcome.trace), vec![(0, 2, false, 3)]);
    }

    #[test]
    fn test_configuration_errors() {
        let grid = grid("####\n####");

        assert!(RunScanner::scan(&grid, 0, 2, 0).unwrap_err().is_configuration());
        assert!(RunScanner::scan(&grid, 0, 2, 5).unwrap_err().is_configuration());
        assert!(RunScanner::scan(&grid, 1, 2, 4).unwrap_err().is_configuration());
        assert!(RunScanner::scan(&grid, 3, 0, 4).unwrap_err().is_configuration());
        assert!(RunScanner::scan(&grid, 1, usize::MAX, 4)
            .unwrap_err()
            .is_configuration());
        assert!(RunScanner::events(&grid, 0, 2, 0).is_err());
    }

    #[test]
    fn test_lazy_trace_can_stop_early() {
        let grid = grid("####");
        let mut events = RunScanner::events(&grid, 0, 1, 4).unwrap();

        let prefix: Vec<_> = events.by_ref().take(2).collect();
        assert_eq!(prefix.len(), 2);
        assert!(!events.is_finished());
        assert_eq!(events.result(), None);

        assert_eq!(events.by_ref().count(), 5);
        assert!(events.is_finished());
        assert_eq!(
            events.result(),
            Some(RunMatch {
                row: 0,
                window_start: 0
            })
        );
        assert_eq!(events.next(), None);
    }

    #[test]
    fn test_scan_into_matches_scan() {
        let grid = grid("#.##.###\n.####...");
        let outcome = RunScanner::scan(&grid, 0, 2, 3).unwrap();

        let mut sink = Vec::new();
        let result = RunScanner::scan_into(&grid, 0, 2, 3, &mut sink).unwrap();

        assert_eq!(sink, outcome.trace);
        assert_eq!(result, outcome.result);
        assert_eq!(
            result,
            Some(RunMatch {
                row: 0,
                window_start: 5
            })
        );
    }

    #[test]
    fn test_scan_is_deterministic() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let grid = OccupancyGrid::from_config(&GridConfig::default(), &mut rng).unwrap();

        let first = RunScanner::scan(&grid, 0, 10, 3).unwrap();
        let second = RunScanner::scan(&grid, 0, 10, 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reference_layout_never_holds_a_four_run() {
        let config = GridConfig::default();
        let mut found_three = 0;

        for seed in 0..500 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let grid = OccupancyGrid::from_config(&config, &mut rng).unwrap();

            for run_length in 4..=config.width {
                let outcome = RunScanner::scan(&grid, 0, config.height, run_length).unwrap();
                assert_eq!(outcome.result, None, "seed {} run {}", seed, run_length);
            }
            if RunScanner::scan(&grid, 0, config.height, 3).unwrap().found() {
                found_three += 1;
            }
        }

        // Three in a row fits inside a block, so it does show up.
        assert!(found_three > 0);
    }

    /// Walks a trace and asserts every ordering and short-circuit law.
    fn check_trace_laws(
        grid: &OccupancyGrid,
        row_start: usize,
        row_count: usize,
        run_length: usize,
        outcome: &ScanOutcome,
    ) {
        let trace = &outcome.trace;
        let last_start = grid.width() - run_length;
        let mut i = 0;
        let mut row = row_start;
        let mut found = None;

        while i < trace.len() {
            let mut row_success = false;
            let mut start = 0;

            loop {
                match trace[i] {
                    ScanEvent::WindowStarted {
                        row: r,
                        window_start,
                        window_width,
                    } => {
                        assert_eq!((r, window_start, window_width), (row, start, run_length));
                    }
                    other => panic!("expected window start, got {:?}", other),
                }
                i += 1;

                let mut checked = 0;
                let mut matched = 0;
                while let ScanEvent::CellChecked {
                    row: r,
                    column,
                    occupied,
                } = trace[i]
                {
                    assert_eq!(r, row);
                    assert_eq!(column, start + checked);
                    assert_eq!(occupied, grid.get(column, row).unwrap());
                    checked += 1;
                    i += 1;
                    if !occupied {
                        break;
                    }
                    matched += 1;
                }

                match trace[i] {
                    ScanEvent::WindowResult {
                        row: r,
                        window_start,
                        success,
                        matched_count,
                    } => {
                        assert_eq!((r, window_start), (row, start));
                        assert_eq!(matched_count, matched);
                        assert_eq!(success, matched == run_length);
                        if success {
                            assert_eq!(checked, run_length);
                        } else {
                            assert_eq!(checked, matched_count + 1);
                        }
                        row_success = success;
                    }
                    other => panic!("expected window result, got {:?}", other),
                }
                i += 1;

                if row_success {
                    found = Some(RunMatch {
                        row,
                        window_start: start,
                    });
                    break;
                }
                if start == last_start {
                    break;
                }
                start += 1;
            }

            assert_eq!(
                trace[i],
                ScanEvent::RowResult {
                    row,
                    success: row_success
                }
            );
            i += 1;
            row += 1;
            if row_success {
                break;
            }
        }

        assert_eq!(i, trace.len(), "events after the scan concluded");
        if found.is_none() {
            assert_eq!(row, row_start + row_count, "rows skipped without a match");
        }
        assert_eq!(outcome.result, found);

        let expected = (row_start..row_start + row_count).find_map(|r| {
            grid.row(r)
                .unwrap()
                .windows(run_length)
                .position(|w| w.iter().all(|&c| c))
                .map(|window_start| RunMatch { row: r, window_start })
        });
        assert_eq!(outcome.result, expected);
    }

    fn scan_case() -> impl Strategy<Value = (OccupancyGrid, usize, usize, usize)> {
        (1usize..=12, 1usize..=6)
            .prop_flat_map(|(width, height)| {
                proptest::collection::vec(proptest::collection::vec(any::<bool>(), width), height)
            })
            .prop_map(|rows| OccupancyGrid::from_rows(rows).unwrap())
            .prop_flat_map(|grid| {
                let width = grid.width();
                let height = grid.height();
                (Just(grid), 0..=height, 1..=width).prop_flat_map(move |(grid, row_start, run_length)| {
                    (Just(grid), Just(row_start), 0..=(height - row_start), Just(run_length))
                })
            })
    }

    proptest! {
        #[test]
        fn prop_trace_obeys_scan_laws((grid, row_start, row_count, run_length) in scan_case()) {
            let outcome = RunScanner::scan(&grid, row_start, row_count, run_length).unwrap();
            check_trace_laws(&grid, row_start, row_count, run_length, &outcome);
        }

        #[test]
        fn prop_scan_is_repeatable((grid, row_start, row_count, run_length) in scan_case()) {
            let first = RunScanner::scan(&grid, row_start, row_count, run_length).unwrap();
            let second = RunScanner::scan(&grid, row_start, row_count, run_length).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_generated_separators_stay_empty(seed in any::<u64>(), width in 1usize..16, height in 1usize..8) {
            let config = GridConfig::new(width, height);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let grid = OccupancyGrid::from_config(&config, &mut rng).unwrap();
            for (column, _) in grid.occupied_cells() {
                prop_assert!(!config.is_separator(column));
            }
        }
    }
}
