//! Two-state edit-entry toggle shared by the single-cell setters.

/// Tracks whether the immediately preceding edit targeted the same
/// position. The first edit at a position leaves the cursor in place so a
/// multi-keystroke value (second hex digit of an effect value, say) can be
/// completed; the next edit at the same position advances.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EntryToggle<P: Copy + PartialEq> {
    count: u8,
    pos: Option<P>,
}

impl<P: Copy + PartialEq> EntryToggle<P> {
    pub fn new() -> Self {
        Self {
            count: 0,
            pos: None,
        }
    }

    /// Record an edit at `pos`. Returns true when the cursor should
    /// auto-advance afterwards.
    pub fn note_edit(&mut self, pos: P) -> bool {
        self.count = if self.count == 1 && self.pos == Some(pos) {
            0
        } else {
            1
        };
        self.pos = Some(pos);
        self.count == 0
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.pos = None;
    }
}
