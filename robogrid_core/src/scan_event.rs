//! Trace records emitted by the run scanner.

use serde::{Deserialize, Serialize};

/// One observable step of a scan.
///
/// Events carry no timestamps. Their order in the trace is the only
/// sequencing guarantee a consumer gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanEvent {
    /// A window of `window_width` columns starting at `window_start` is about to be checked
    WindowStarted {
        row: usize,
        window_start: usize,
        window_width: usize,
    },

    /// A single cell was read
    CellChecked {
        row: usize,
        column: usize,
        occupied: bool,
    },

    /// A window concluded; `matched_count` occupied cells were seen before it ended
    WindowResult {
        row: usize,
        window_start: usize,
        success: bool,
        matched_count: usize,
    },

    /// A row concluded
    RowResult { row: usize, success: bool },
}

impl ScanEvent {
    /// Row this event belongs to.
    pub fn row(&self) -> usize {
        match *self {
            ScanEvent::WindowStarted { row, .. }
            | ScanEvent::CellChecked { row, .. }
            | ScanEvent::WindowResult { row, .. }
            | ScanEvent::RowResult { row, .. } => row,
        }
    }

    /// Short name of the event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ScanEvent::WindowStarted { .. } => "window_started",
            ScanEvent::CellChecked { .. } => "cell_checked",
            ScanEvent::WindowResult { .. } => "window_result",
            ScanEvent::RowResult { .. } => "row_result",
        }
    }
}

/// Receives scan events as they are produced.
///
/// Implemented by renderers and recorders that want push-style delivery
/// instead of iterating [`ScanEvents`](crate::ScanEvents).
pub trait TraceSink {
    /// Called once per event, in trace order.
    fn record(&mut self, event: ScanEvent);
}

impl TraceSink for Vec<ScanEvent> {
    fn record(&mut self, event: ScanEvent) {
        self.push(event);
    }
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    fn record(&mut self, event: ScanEvent) {
        (**self).record(event);
    }
}
