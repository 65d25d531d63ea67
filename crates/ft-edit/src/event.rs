//! Notifications emitted by editing sessions to companion views.
//!
//! Sessions queue these instead of calling listeners back directly; the
//! host drains the queue after each operation and forwards to whatever
//! panels it keeps in sync. Cross-view synchronization goes the other way
//! through the explicit `update_from_*` entry points, which never emit, so
//! no echo suppression is needed.

/// One notification from an editing session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorEvent {
    /// The cursor entered a different track.
    TrackChanged(usize),
    /// The cursor entered a different order row.
    OrderChanged(usize),
    /// The cursor step moved; carries the last valid step of the current
    /// order so range widgets can rescale.
    StepChanged { step: usize, last_step: usize },
    /// Horizontal move landed on this flat column index (track * 5 + field).
    ColumnChanged(usize),
}
