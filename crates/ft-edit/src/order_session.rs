//! Interactive editing session over the order list.
//!
//! Order-list motion never carries: both axes clamp at their ends. Row
//! structure edits go through [`Song`] and come back as [`EditOp`]s for the
//! host's undo stack, like the pattern session's.

use log::debug;

use ft_ir::{OutOfRangeError, Song};

use crate::entry::EntryToggle;
use crate::event::EditorEvent;
use crate::ops::EditOp;
use crate::position::OrderPosition;
use crate::selection::OrderSelection;

pub struct OrderEditSession {
    cursor: OrderPosition,
    toggle: EntryToggle<OrderPosition>,
    selection: Option<OrderSelection>,
    shift_anchor: Option<OrderPosition>,
    events: Vec<EditorEvent>,
}

impl Default for OrderEditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderEditSession {
    pub fn new() -> Self {
        Self {
            cursor: OrderPosition::new(0, 0),
            toggle: EntryToggle::new(),
            selection: None,
            shift_anchor: None,
            events: Vec::new(),
        }
    }

    pub fn cursor(&self) -> OrderPosition {
        self.cursor
    }

    pub fn selection(&self) -> Option<OrderSelection> {
        self.selection
    }

    pub fn is_selected_cell(&self, pos: &OrderPosition) -> bool {
        self.selection.is_some_and(|sel| sel.contains(pos))
    }

    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        core::mem::take(&mut self.events)
    }

    // --- Cursor motion ---

    /// Move `n` tracks right (negative = left), clamping at the edges.
    pub fn move_cursor_right(&mut self, song: &Song, n: i32) {
        let track = (self.cursor.track as i64 + n as i64)
            .clamp(0, song.track_count() as i64 - 1) as usize;
        if track != self.cursor.track {
            self.cursor.track = track;
            self.events.push(EditorEvent::TrackChanged(track));
        }
    }

    /// Move `n` rows down (negative = up), clamping at the edges.
    pub fn move_cursor_down(&mut self, song: &Song, n: i32) {
        let row = (self.cursor.row as i64 + n as i64)
            .clamp(0, song.order_count() as i64 - 1) as usize;
        if row != self.cursor.row {
            self.cursor.row = row;
            self.events.push(EditorEvent::OrderChanged(row));
        }
    }

    /// Follow a cursor move made in the pattern view. Emits nothing.
    pub fn update_from_pattern(&mut self, song: &Song, track: usize, order: usize) {
        self.cursor.track = track.min(song.track_count().saturating_sub(1));
        self.cursor.row = order.min(song.order_count().saturating_sub(1));
    }

    // --- Selection ---

    pub fn press_shift(&mut self) {
        if self.shift_anchor.is_none() {
            self.shift_anchor = Some(self.cursor);
        }
    }

    pub fn release_shift(&mut self) {
        self.shift_anchor = None;
    }

    pub fn select_to_cursor(&mut self) {
        if let Some(anchor) = self.shift_anchor {
            self.selection = Some(OrderSelection::normalize(anchor, self.cursor));
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // --- Entry ---

    /// Enter a pattern number at the cursor. Advances to the next row on
    /// the second entry at the same cell, like pattern-grid value entry.
    pub fn set_cell_order_num(
        &mut self,
        song: &mut Song,
        pattern: u8,
    ) -> Result<Vec<EditOp>, OutOfRangeError> {
        let old = song.set_order_pattern(self.cursor.track, self.cursor.row, pattern)?;
        let op = EditOp::SetOrderPattern {
            track: self.cursor.track,
            row: self.cursor.row,
            old,
            new: pattern,
        };
        if self.toggle.note_edit(self.cursor) {
            self.move_cursor_down(song, 1);
        }
        Ok(vec![op])
    }

    /// Insert a blank row below the cursor and move onto it.
    pub fn insert_order_below(&mut self, song: &mut Song) -> Result<Vec<EditOp>, OutOfRangeError> {
        let row = song.insert_order_below(self.cursor.row)?;
        debug!("inserted order row {row}");
        self.toggle.reset();
        self.move_cursor_down(song, 1);
        Ok(vec![EditOp::InsertOrder {
            row,
            patterns: vec![0; song.track_count()],
        }])
    }

    /// Delete the cursor's row. The last remaining row stays.
    pub fn delete_order(&mut self, song: &mut Song) -> Result<Vec<EditOp>, OutOfRangeError> {
        if song.order_count() == 1 {
            return Ok(Vec::new());
        }
        let row = self.cursor.row;
        let patterns = song.delete_order(row)?;
        self.selection = None;
        self.shift_anchor = None;
        self.toggle.reset();
        if self.cursor.row >= song.order_count() {
            self.cursor.row = song.order_count() - 1;
            self.events.push(EditorEvent::OrderChanged(self.cursor.row));
        }
        Ok(vec![EditOp::DeleteOrder { row, patterns }])
    }

    /// Pull the session back into the song's current shape.
    pub fn clamp_to_song(&mut self, song: &Song) {
        self.cursor.track = self.cursor.track.min(song.track_count().saturating_sub(1));
        self.cursor.row = self.cursor.row.min(song.order_count().saturating_sub(1));
        self.selection = None;
        self.shift_anchor = None;
        self.toggle.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft_ir::SoundSource;

    fn test_song() -> Song {
        Song::with_tracks(
            "orders",
            &[(SoundSource::Fm, 0), (SoundSource::Fm, 1)],
            4,
        )
    }

    #[test]
    fn motion_clamps_and_reports_changes() {
        let mut song = test_song();
        song.insert_order_below(0).unwrap();
        let mut session = OrderEditSession::new();

        session.move_cursor_right(&song, 5);
        assert_eq!(session.cursor(), OrderPosition::new(1, 0));
        session.move_cursor_down(&song, -3);
        assert_eq!(session.cursor(), OrderPosition::new(1, 0));
        session.move_cursor_down(&song, 1);
        assert_eq!(
            session.drain_events(),
            vec![EditorEvent::TrackChanged(1), EditorEvent::OrderChanged(1)]
        );

        // Clamped moves emit nothing.
        session.move_cursor_down(&song, 9);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn order_num_entry_advances_on_second_keystroke() {
        let mut song = test_song();
        song.insert_order_below(0).unwrap();
        let mut session = OrderEditSession::new();

        session.set_cell_order_num(&mut song, 1).unwrap();
        assert_eq!(session.cursor().row, 0);
        let ops = session.set_cell_order_num(&mut song, 18).unwrap();
        assert_eq!(session.cursor().row, 1);
        assert_eq!(
            ops,
            vec![EditOp::SetOrderPattern {
                track: 0,
                row: 0,
                old: 1,
                new: 18
            }]
        );
        assert_eq!(song.track(0).order_list(), &[18, 0]);
    }

    #[test]
    fn insert_below_moves_onto_the_new_row() {
        let mut song = test_song();
        let mut session = OrderEditSession::new();

        let ops = session.insert_order_below(&mut song).unwrap();
        assert_eq!(song.order_count(), 2);
        assert_eq!(session.cursor().row, 1);
        assert_eq!(
            ops,
            vec![EditOp::InsertOrder {
                row: 1,
                patterns: vec![0, 0]
            }]
        );
    }

    #[test]
    fn delete_keeps_the_last_row() {
        let mut song = test_song();
        let mut session = OrderEditSession::new();
        assert!(session.delete_order(&mut song).unwrap().is_empty());

        song.insert_order_below(0).unwrap();
        song.set_order_pattern(0, 1, 7).unwrap();
        session.move_cursor_down(&song, 1);
        let ops = session.delete_order(&mut song).unwrap();
        assert_eq!(song.order_count(), 1);
        assert_eq!(session.cursor().row, 0);
        assert_eq!(
            ops,
            vec![EditOp::DeleteOrder {
                row: 1,
                patterns: vec![7, 0]
            }]
        );
    }

    #[test]
    fn shift_motion_builds_a_selection() {
        let mut song = test_song();
        song.insert_order_below(0).unwrap();
        let mut session = OrderEditSession::new();

        session.press_shift();
        session.move_cursor_right(&song, 1);
        session.move_cursor_down(&song, 1);
        session.select_to_cursor();
        session.release_shift();

        let sel = session.selection().unwrap();
        assert_eq!(sel.top_left(), OrderPosition::new(0, 0));
        assert_eq!(sel.bottom_right(), OrderPosition::new(1, 1));
        assert!(session.is_selected_cell(&OrderPosition::new(1, 0)));
    }

    #[test]
    fn update_from_pattern_is_silent() {
        let mut song = test_song();
        song.insert_order_below(0).unwrap();
        let mut session = OrderEditSession::new();
        session.update_from_pattern(&song, 1, 1);
        assert_eq!(session.cursor(), OrderPosition::new(1, 1));
        assert!(session.drain_events().is_empty());
    }
}
