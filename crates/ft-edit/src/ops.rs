//! Undoable edit operations and the undo stack.
//!
//! Every mutating session operation returns the [`EditOp`]s describing what
//! it did, carrying the prior values read before the mutation. One tagged
//! variant with a generic apply/invert replaces a command class per
//! editable field.

use ft_ir::{CellValue, OutOfRangeError, Song, Step};

/// A single undoable mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOp {
    /// One cell overwritten.
    SetCell {
        track: usize,
        order: usize,
        step: usize,
        old: CellValue,
        new: CellValue,
    },
    /// One whole step overwritten.
    SetStep {
        track: usize,
        order: usize,
        step: usize,
        old: Step,
        new: Step,
    },
    /// Every step of one pattern overwritten (step insertion/removal).
    SetPatternSteps {
        track: usize,
        order: usize,
        old: Vec<Step>,
        new: Vec<Step>,
    },
    /// One order row repointed at another pattern.
    SetOrderPattern {
        track: usize,
        row: usize,
        old: u8,
        new: u8,
    },
    /// An order row inserted across all tracks, one pattern number per
    /// track.
    InsertOrder { row: usize, patterns: Vec<u8> },
    /// An order row removed across all tracks.
    DeleteOrder { row: usize, patterns: Vec<u8> },
}

impl EditOp {
    /// Apply this operation to the score.
    pub fn apply(&self, song: &mut Song) -> Result<(), OutOfRangeError> {
        match self {
            EditOp::SetCell {
                track,
                order,
                step,
                new,
                ..
            } => {
                song.set_cell_value(*track, *order, *step, *new)?;
            }
            EditOp::SetStep {
                track,
                order,
                step,
                new,
                ..
            } => {
                song.set_step(*track, *order, *step, *new)?;
            }
            EditOp::SetPatternSteps {
                track, order, new, ..
            } => {
                song.set_pattern_steps(*track, *order, new)?;
            }
            EditOp::SetOrderPattern {
                track, row, new, ..
            } => {
                song.set_order_pattern(*track, *row, *new)?;
            }
            EditOp::InsertOrder { row, patterns } => {
                song.insert_order_at(*row, patterns)?;
            }
            EditOp::DeleteOrder { row, .. } => {
                song.delete_order(*row)?;
            }
        }
        Ok(())
    }

    /// The operation that undoes this one.
    pub fn inverted(self) -> EditOp {
        match self {
            EditOp::SetCell {
                track,
                order,
                step,
                old,
                new,
            } => EditOp::SetCell {
                track,
                order,
                step,
                old: new,
                new: old,
            },
            EditOp::SetStep {
                track,
                order,
                step,
                old,
                new,
            } => EditOp::SetStep {
                track,
                order,
                step,
                old: new,
                new: old,
            },
            EditOp::SetPatternSteps {
                track,
                order,
                old,
                new,
            } => EditOp::SetPatternSteps {
                track,
                order,
                old: new,
                new: old,
            },
            EditOp::SetOrderPattern {
                track,
                row,
                old,
                new,
            } => EditOp::SetOrderPattern {
                track,
                row,
                old: new,
                new: old,
            },
            EditOp::InsertOrder { row, patterns } => EditOp::DeleteOrder { row, patterns },
            EditOp::DeleteOrder { row, patterns } => EditOp::InsertOrder { row, patterns },
        }
    }
}

/// One undoable entry: the ops of a single user action.
#[derive(Clone, Debug)]
struct UndoEntry {
    forward: Vec<EditOp>,
}

/// Undo/redo stack over [`EditOp`] batches.
#[derive(Default)]
pub struct UndoStack {
    entries: Vec<UndoEntry>,
    position: usize,
}

impl UndoStack {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            position: 0,
        }
    }

    /// Record the ops of one user action as a single undo entry. Empty
    /// batches (no-op actions) are not recorded.
    pub fn push(&mut self, forward: Vec<EditOp>) {
        if forward.is_empty() {
            return;
        }
        // Truncate any redo history beyond the current position.
        self.entries.truncate(self.position);
        self.entries.push(UndoEntry { forward });
        self.position = self.entries.len();
    }

    /// Undo: returns the inverse ops to apply (already reversed so earlier
    /// writes are undone last), or None if nothing to undo.
    pub fn undo(&mut self) -> Option<Vec<EditOp>> {
        if self.position == 0 {
            return None;
        }
        self.position -= 1;
        Some(
            self.entries[self.position]
                .forward
                .iter()
                .rev()
                .cloned()
                .map(EditOp::inverted)
                .collect(),
        )
    }

    /// Redo: returns the forward ops to apply, or None if nothing to redo.
    pub fn redo(&mut self) -> Option<&[EditOp]> {
        if self.position >= self.entries.len() {
            return None;
        }
        let ops = &self.entries[self.position].forward;
        self.position += 1;
        Some(ops)
    }

    pub fn can_undo(&self) -> bool {
        self.position > 0
    }

    pub fn can_redo(&self) -> bool {
        self.position < self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft_ir::{Note, SoundSource};

    fn test_song() -> Song {
        Song::with_tracks("ops", &[(SoundSource::Fm, 0)], 4)
    }

    fn set_tone(step: usize, old: Note, new: Note) -> EditOp {
        EditOp::SetCell {
            track: 0,
            order: 0,
            step,
            old: CellValue::Tone(old),
            new: CellValue::Tone(new),
        }
    }

    #[test]
    fn apply_then_inverted_restores_cell() {
        let mut song = test_song();
        let op = set_tone(2, Note::None, Note::On(60));
        op.apply(&mut song).unwrap();
        assert_eq!(
            song.cell_value(0, ft_ir::CellField::Tone, 0, 2),
            Ok(CellValue::Tone(Note::On(60)))
        );
        op.inverted().apply(&mut song).unwrap();
        assert_eq!(
            song.cell_value(0, ft_ir::CellField::Tone, 0, 2),
            Ok(CellValue::Tone(Note::None))
        );
    }

    #[test]
    fn order_ops_invert_into_each_other() {
        let mut song = test_song();
        let op = EditOp::InsertOrder {
            row: 1,
            patterns: vec![0],
        };
        op.apply(&mut song).unwrap();
        assert_eq!(song.order_count(), 2);
        op.inverted().apply(&mut song).unwrap();
        assert_eq!(song.order_count(), 1);
    }

    #[test]
    fn undo_returns_inverses_in_reverse_order() {
        let mut stack = UndoStack::new();
        stack.push(vec![
            set_tone(0, Note::None, Note::On(60)),
            set_tone(1, Note::None, Note::On(62)),
        ]);

        let undone = stack.undo().unwrap();
        assert_eq!(undone.len(), 2);
        assert_eq!(undone[0], set_tone(1, Note::On(62), Note::None));
        assert_eq!(undone[1], set_tone(0, Note::On(60), Note::None));
        assert!(stack.can_redo());
    }

    #[test]
    fn undo_at_bottom_returns_none() {
        let mut stack = UndoStack::new();
        assert!(stack.undo().is_none());
    }

    #[test]
    fn new_entry_after_undo_truncates_redo() {
        let mut stack = UndoStack::new();
        stack.push(vec![set_tone(0, Note::None, Note::On(60))]);
        stack.push(vec![set_tone(1, Note::None, Note::On(62))]);

        stack.undo();
        assert!(stack.can_redo());

        stack.push(vec![set_tone(2, Note::None, Note::On(64))]);
        assert!(!stack.can_redo());
    }

    #[test]
    fn empty_batches_are_not_recorded() {
        let mut stack = UndoStack::new();
        stack.push(Vec::new());
        assert!(!stack.can_undo());
    }
}
