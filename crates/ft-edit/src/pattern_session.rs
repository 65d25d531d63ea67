//! Interactive editing session over the pattern grid.
//!
//! The session owns the cursor, the selection, and the entry toggle, and
//! routes every mutation through [`Song`]'s score surface. Mutating methods
//! return the [`EditOp`]s they performed so the host can feed its undo
//! stack; the store is written before any session state changes, so a
//! failed write leaves the cursor and toggle untouched.

use log::debug;

use ft_ir::{CellValue, Note, OutOfRangeError, Song, FIELDS_PER_TRACK};

use crate::clipboard::{copy_cells, paste_cells, ClipTag, ClipboardChannel, PatternClip};
use crate::entry::EntryToggle;
use crate::event::EditorEvent;
use crate::navigation::{clamp_position, column_distance, move_down, move_right, step_distance};
use crate::ops::EditOp;
use crate::position::PatternPosition;
use crate::selection::PatternSelection;

/// Highest octave accepted by key entry.
const MAX_OCTAVE: u8 = 7;

/// How far the last select-all press reached.
#[derive(Clone, Copy, PartialEq, Eq)]
enum SelectAllState {
    None,
    Track,
    AllTracks,
}

pub struct PatternEditSession {
    cursor: PatternPosition,
    toggle: EntryToggle<PatternPosition>,
    selection: Option<PatternSelection>,
    shift_anchor: Option<PatternPosition>,
    select_all_state: SelectAllState,
    selected_instrument: Option<u8>,
    events: Vec<EditorEvent>,
}

impl Default for PatternEditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternEditSession {
    pub fn new() -> Self {
        Self {
            cursor: PatternPosition::new(0, 0, 0, 0),
            toggle: EntryToggle::new(),
            selection: None,
            shift_anchor: None,
            select_all_state: SelectAllState::None,
            selected_instrument: None,
            events: Vec::new(),
        }
    }

    pub fn cursor(&self) -> PatternPosition {
        self.cursor
    }

    pub fn selection(&self) -> Option<PatternSelection> {
        self.selection
    }

    pub fn is_selected_cell(&self, pos: &PatternPosition) -> bool {
        self.selection.is_some_and(|sel| sel.contains(pos))
    }

    /// Instrument stamped onto every key-on, if one is picked.
    pub fn selected_instrument(&self) -> Option<u8> {
        self.selected_instrument
    }

    pub fn set_selected_instrument(&mut self, instrument: Option<u8>) {
        self.selected_instrument = instrument;
    }

    /// Take the notifications queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        core::mem::take(&mut self.events)
    }

    // --- Cursor motion ---

    /// Move `n` columns right (negative = left).
    pub fn move_cursor_right(&mut self, song: &Song, n: i32) {
        let next = move_right(song, self.cursor, n);
        if next.track != self.cursor.track {
            self.events.push(EditorEvent::TrackChanged(next.track));
        }
        self.cursor = next;
        self.events
            .push(EditorEvent::ColumnChanged(next.column_index()));
    }

    /// Move `n` steps down (negative = up).
    pub fn move_cursor_down(&mut self, song: &Song, n: i32) {
        let next = move_down(song, self.cursor, n);
        if next.order != self.cursor.order {
            debug!(
                "cursor carried from order {} to order {}",
                self.cursor.order, next.order
            );
            self.events.push(EditorEvent::OrderChanged(next.order));
        }
        self.cursor = next;
        let last_step = song.pattern_len(next.track, next.order).unwrap_or(1) - 1;
        self.events.push(EditorEvent::StepChanged {
            step: next.step,
            last_step,
        });
    }

    /// Jump to the tone column of another track.
    pub fn jump_to_track(&mut self, song: &Song, track: usize) {
        let d = column_distance(self.cursor.track, self.cursor.field, track, 0);
        self.move_cursor_right(song, d);
    }

    /// Jump to step 0 of another order row.
    pub fn jump_to_order(&mut self, song: &Song, order: usize) {
        let d = step_distance(
            song,
            self.cursor.track,
            self.cursor.order,
            self.cursor.step,
            order,
            0,
        );
        self.move_cursor_down(song, d);
    }

    /// Jump to an arbitrary cell; both axes move relatively so boundary
    /// behavior matches single-key motion.
    pub fn jump_to(&mut self, song: &Song, target: PatternPosition) {
        self.jump_to_track(song, target.track);
        self.move_cursor_right(song, target.field as i32);
        let d = step_distance(
            song,
            self.cursor.track,
            self.cursor.order,
            self.cursor.step,
            target.order,
            target.step,
        );
        self.move_cursor_down(song, d);
    }

    /// Follow a cursor move made in the order-list view. Emits nothing.
    pub fn update_from_order_list(&mut self, song: &Song, track: usize, order: usize) {
        self.cursor = clamp_position(song, self.cursor.with_columns(track, self.cursor.field));
        self.cursor = clamp_position(song, self.cursor.with_rows(order, self.cursor.step));
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

    /// Extend the selection from the shift anchor to the cursor. No-op when
    /// shift is not held.
    pub fn select_to_cursor(&mut self) {
        if let Some(anchor) = self.shift_anchor {
            self.selection = Some(PatternSelection::normalize(anchor, self.cursor));
            self.select_all_state = SelectAllState::None;
        }
    }

    pub fn set_selection(&mut self, selection: PatternSelection) {
        self.selection = Some(selection);
        self.select_all_state = SelectAllState::None;
    }

    /// First press selects the cursor's track across the current order;
    /// pressing again widens to every track.
    pub fn select_all(&mut self, song: &Song) {
        let last_step = song
            .pattern_len(self.cursor.track, self.cursor.order)
            .unwrap_or(1)
            - 1;
        let (state, begin, end) = match self.select_all_state {
            SelectAllState::Track => (
                SelectAllState::AllTracks,
                PatternPosition::new(0, 0, self.cursor.order, 0),
                PatternPosition::new(
                    song.track_count() - 1,
                    FIELDS_PER_TRACK - 1,
                    self.cursor.order,
                    last_step,
                ),
            ),
            _ => (
                SelectAllState::Track,
                PatternPosition::new(self.cursor.track, 0, self.cursor.order, 0),
                PatternPosition::new(
                    self.cursor.track,
                    FIELDS_PER_TRACK - 1,
                    self.cursor.order,
                    last_step,
                ),
            ),
        };
        self.selection = Some(PatternSelection::normalize(begin, end));
        self.select_all_state = state;
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.select_all_state = SelectAllState::None;
    }

    // --- Step entry ---

    /// Enter a note at the cursor, stamping the picked instrument if any.
    /// Out-of-range octave or semitone is ignored. Always advances.
    pub fn set_step_key_on(
        &mut self,
        song: &mut Song,
        octave: u8,
        semitone: u8,
    ) -> Result<Vec<EditOp>, OutOfRangeError> {
        if octave >= MAX_OCTAVE || semitone >= 12 {
            return Ok(Vec::new());
        }
        let mut ops = Vec::new();
        let note = Note::from_octave_semitone(octave, semitone);
        ops.push(self.write_cell(song, CellValue::Tone(note))?);
        if let Some(inst) = self.selected_instrument {
            ops.push(self.write_cell(song, CellValue::Instrument(Some(inst)))?);
        }
        self.toggle.reset();
        self.move_cursor_down(song, 1);
        Ok(ops)
    }

    /// Enter a key-off at the cursor. Always advances.
    pub fn set_step_key_off(&mut self, song: &mut Song) -> Result<Vec<EditOp>, OutOfRangeError> {
        let op = self.write_cell(song, CellValue::Tone(Note::Off))?;
        self.toggle.reset();
        self.move_cursor_down(song, 1);
        Ok(vec![op])
    }

    /// Clear the tone cell. Always advances.
    pub fn erase_step_note(&mut self, song: &mut Song) -> Result<Vec<EditOp>, OutOfRangeError> {
        let op = self.write_cell(song, CellValue::Tone(Note::None))?;
        self.toggle.reset();
        self.move_cursor_down(song, 1);
        Ok(vec![op])
    }

    /// Enter an instrument number. Advances on the second entry at the same
    /// position, leaving room for the second digit of a two-digit value.
    pub fn set_step_instrument(
        &mut self,
        song: &mut Song,
        instrument: u8,
    ) -> Result<Vec<EditOp>, OutOfRangeError> {
        let op = self.write_cell(song, CellValue::Instrument(Some(instrument)))?;
        self.selected_instrument = Some(instrument);
        self.entry_advance(song);
        Ok(vec![op])
    }

    pub fn erase_step_instrument(
        &mut self,
        song: &mut Song,
    ) -> Result<Vec<EditOp>, OutOfRangeError> {
        let op = self.write_cell(song, CellValue::Instrument(None))?;
        self.toggle.reset();
        self.move_cursor_down(song, 1);
        Ok(vec![op])
    }

    /// Enter a volume value, toggle-gated like instrument entry.
    pub fn set_step_volume(
        &mut self,
        song: &mut Song,
        volume: u8,
    ) -> Result<Vec<EditOp>, OutOfRangeError> {
        let op = self.write_cell(song, CellValue::Volume(Some(volume)))?;
        self.entry_advance(song);
        Ok(vec![op])
    }

    pub fn erase_step_volume(&mut self, song: &mut Song) -> Result<Vec<EditOp>, OutOfRangeError> {
        let op = self.write_cell(song, CellValue::Volume(None))?;
        self.toggle.reset();
        self.move_cursor_down(song, 1);
        Ok(vec![op])
    }

    /// Enter an effect letter, toggle-gated. Non-alphanumeric characters
    /// are ignored; letters are stored uppercase.
    pub fn set_step_effect_id(
        &mut self,
        song: &mut Song,
        id: char,
    ) -> Result<Vec<EditOp>, OutOfRangeError> {
        if !id.is_ascii_alphanumeric() {
            return Ok(Vec::new());
        }
        let op = self.write_cell(song, CellValue::EffectId(Some(id.to_ascii_uppercase())))?;
        self.entry_advance(song);
        Ok(vec![op])
    }

    /// Clear both the effect letter and its value. Always advances.
    pub fn erase_step_effect(&mut self, song: &mut Song) -> Result<Vec<EditOp>, OutOfRangeError> {
        let id = self.write_cell(song, CellValue::EffectId(None))?;
        let value = self.write_cell(song, CellValue::EffectValue(None))?;
        self.toggle.reset();
        self.move_cursor_down(song, 1);
        Ok(vec![id, value])
    }

    /// Enter an effect value, toggle-gated.
    pub fn set_step_effect_value(
        &mut self,
        song: &mut Song,
        value: u8,
    ) -> Result<Vec<EditOp>, OutOfRangeError> {
        let op = self.write_cell(song, CellValue::EffectValue(Some(value)))?;
        self.entry_advance(song);
        Ok(vec![op])
    }

    pub fn erase_step_effect_value(
        &mut self,
        song: &mut Song,
    ) -> Result<Vec<EditOp>, OutOfRangeError> {
        let op = self.write_cell(song, CellValue::EffectValue(None))?;
        self.toggle.reset();
        self.move_cursor_down(song, 1);
        Ok(vec![op])
    }

    /// Insert a blank step at the cursor, shifting the rest of the pattern
    /// down. Advances onto the inserted blank's successor.
    pub fn insert_step(&mut self, song: &mut Song) -> Result<Vec<EditOp>, OutOfRangeError> {
        let (track, order) = (self.cursor.track, self.cursor.order);
        let (old, new) = song.insert_step(track, order, self.cursor.step)?;
        self.toggle.reset();
        self.move_cursor_down(song, 1);
        Ok(vec![EditOp::SetPatternSteps {
            track,
            order,
            old,
            new,
        }])
    }

    /// Delete the step above the cursor, shifting the rest up and pulling
    /// the cursor with it. No-op at step 0.
    pub fn delete_previous_step(
        &mut self,
        song: &mut Song,
    ) -> Result<Vec<EditOp>, OutOfRangeError> {
        if self.cursor.step == 0 {
            return Ok(Vec::new());
        }
        let (track, order) = (self.cursor.track, self.cursor.order);
        let (old, new) = song.delete_previous_step(track, order, self.cursor.step)?;
        self.toggle.reset();
        self.move_cursor_down(song, -1);
        Ok(vec![EditOp::SetPatternSteps {
            track,
            order,
            old,
            new,
        }])
    }

    // --- Clipboard ---

    /// Serialize the selection onto the channel. No-op without a selection.
    pub fn copy_selection(
        &self,
        song: &Song,
        channel: &mut dyn ClipboardChannel,
    ) -> Result<(), OutOfRangeError> {
        if let Some(sel) = self.selection {
            let clip = copy_cells(song, &sel)?;
            channel.set_text(clip.encode());
        }
        Ok(())
    }

    /// Copy with the cut tag, then erase the selected cells.
    pub fn cut_selection(
        &mut self,
        song: &mut Song,
        channel: &mut dyn ClipboardChannel,
    ) -> Result<Vec<EditOp>, OutOfRangeError> {
        let Some(sel) = self.selection else {
            return Ok(Vec::new());
        };
        let mut clip = copy_cells(song, &sel)?;
        clip.tag = ClipTag::Cut;
        channel.set_text(clip.encode());

        let tl = sel.top_left();
        let br = sel.bottom_right();
        let erased = song.erase_cells(
            tl.track, tl.field, tl.order, tl.step, br.track, br.field, br.order, br.step,
        )?;
        Ok(erased
            .into_iter()
            .map(|cell| EditOp::SetCell {
                track: cell.track,
                order: cell.order,
                step: cell.step,
                old: cell.old,
                new: CellValue::empty(cell.field),
            })
            .collect())
    }

    /// Clear the selected cells without touching the clipboard.
    pub fn erase_selection(&mut self, song: &mut Song) -> Result<Vec<EditOp>, OutOfRangeError> {
        let Some(sel) = self.selection else {
            return Ok(Vec::new());
        };
        let tl = sel.top_left();
        let br = sel.bottom_right();
        let erased = song.erase_cells(
            tl.track, tl.field, tl.order, tl.step, br.track, br.field, br.order, br.step,
        )?;
        Ok(erased
            .into_iter()
            .map(|cell| EditOp::SetCell {
                track: cell.track,
                order: cell.order,
                step: cell.step,
                old: cell.old,
                new: CellValue::empty(cell.field),
            })
            .collect())
    }

    /// Paste the channel's clip at the cursor.
    pub fn paste_from(
        &mut self,
        song: &mut Song,
        channel: &dyn ClipboardChannel,
    ) -> Result<Vec<EditOp>, crate::clipboard::PasteError> {
        let clip = PatternClip::decode(&channel.text())?;
        Ok(paste_cells(song, self.cursor, &clip)?)
    }

    /// Pull the session back into the song's current shape after an order
    /// row was inserted or deleted, or a pattern resized.
    pub fn clamp_to_song(&mut self, song: &Song) {
        self.cursor = clamp_position(song, self.cursor);
        self.selection = None;
        self.shift_anchor = None;
        self.select_all_state = SelectAllState::None;
        self.toggle.reset();
    }

    fn write_cell(
        &mut self,
        song: &mut Song,
        new: CellValue,
    ) -> Result<EditOp, OutOfRangeError> {
        let old = song.set_cell_value(self.cursor.track, self.cursor.order, self.cursor.step, new)?;
        Ok(EditOp::SetCell {
            track: self.cursor.track,
            order: self.cursor.order,
            step: self.cursor.step,
            old,
            new,
        })
    }

    fn entry_advance(&mut self, song: &Song) {
        if self.toggle.note_edit(self.cursor) {
            self.move_cursor_down(song, 1);
        }
    }
}
