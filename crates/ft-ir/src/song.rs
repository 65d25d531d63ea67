//! Song: owns the tracks and exposes the score query/mutation surface.

use alloc::vec::Vec;
use arrayvec::ArrayString;

use crate::pattern::{CellField, CellValue, Step};
use crate::track::{SoundSource, Track, TrackAttribute};
use crate::OutOfRangeError;

/// Default pattern length for new songs.
pub const DEFAULT_PATTERN_LEN: usize = 64;

/// A cell cleared by [`Song::erase_cells`], with its prior value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErasedCell {
    pub track: usize,
    pub field: CellField,
    pub order: usize,
    pub step: usize,
    pub old: CellValue,
}

/// A complete song: transport metadata plus the per-channel tracks.
///
/// The track layout is fixed by the module style at creation; editing
/// operations mutate patterns and order lists in place. Order rows are
/// inserted and deleted across all tracks at once, so the order count is
/// uniform.
#[derive(Clone, Debug)]
pub struct Song {
    title: ArrayString<32>,
    uses_tempo: bool,
    tempo: u32,
    groove: usize,
    speed: u32,
    default_pattern_len: usize,
    tracks: Vec<Track>,
}

impl Song {
    /// Standard module style: 6 FM + 3 SSG + 6 rhythm tracks.
    pub fn new(title: &str) -> Self {
        let mut layout = Vec::new();
        for ch in 0..6 {
            layout.push((SoundSource::Fm, ch));
        }
        for ch in 0..3 {
            layout.push((SoundSource::Ssg, ch));
        }
        for ch in 0..6 {
            layout.push((SoundSource::Drum, ch));
        }
        Self::with_tracks(title, &layout, DEFAULT_PATTERN_LEN)
    }

    /// Create a song with an explicit track layout.
    pub fn with_tracks(
        title: &str,
        layout: &[(SoundSource, usize)],
        default_pattern_len: usize,
    ) -> Self {
        let mut t = ArrayString::new();
        let _ = t.try_push_str(title);
        let tracks = layout
            .iter()
            .enumerate()
            .map(|(num, &(source, ch))| Track::new(num, source, ch, default_pattern_len))
            .collect();
        Self {
            title: t,
            uses_tempo: true,
            tempo: 150,
            groove: 0,
            speed: 6,
            default_pattern_len,
            tracks,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tempo(&self) -> u32 {
        self.tempo
    }

    pub fn set_tempo(&mut self, tempo: u32) {
        self.tempo = tempo;
    }

    pub fn groove(&self) -> usize {
        self.groove
    }

    pub fn set_groove(&mut self, groove: usize) {
        self.groove = groove;
    }

    pub fn toggle_tempo_or_groove(&mut self, uses_tempo: bool) {
        self.uses_tempo = uses_tempo;
    }

    pub fn uses_tempo(&self) -> bool {
        self.uses_tempo
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: u32) {
        self.speed = speed;
    }

    pub fn default_pattern_len(&self) -> usize {
        self.default_pattern_len
    }

    pub fn track_attributes(&self) -> Vec<TrackAttribute> {
        self.tracks.iter().map(Track::attribute).collect()
    }

    pub fn track(&self, num: usize) -> &Track {
        &self.tracks[num]
    }

    // --- Score query surface ---

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Order count, uniform across tracks.
    pub fn order_count(&self) -> usize {
        self.tracks.first().map_or(0, Track::order_count)
    }

    /// Length of the pattern referenced by `(track, order)`.
    pub fn pattern_len(&self, track: usize, order: usize) -> Result<usize, OutOfRangeError> {
        self.check_order(track, order)?;
        Ok(self.tracks[track].pattern_from_order(order).len())
    }

    /// Read one step.
    pub fn step(
        &self,
        track: usize,
        order: usize,
        step: usize,
    ) -> Result<&Step, OutOfRangeError> {
        self.check_step(track, order, step)?;
        Ok(self.tracks[track].pattern_from_order(order).step(step))
    }

    /// Read one cell.
    pub fn cell_value(
        &self,
        track: usize,
        field: CellField,
        order: usize,
        step: usize,
    ) -> Result<CellValue, OutOfRangeError> {
        Ok(self.step(track, order, step)?.cell(field))
    }

    /// Write one cell, returning the prior value. Read-old then mutate, so
    /// the undo collaborator can snapshot the old value cheaply.
    pub fn set_cell_value(
        &mut self,
        track: usize,
        order: usize,
        step: usize,
        value: CellValue,
    ) -> Result<CellValue, OutOfRangeError> {
        self.check_step(track, order, step)?;
        Ok(self.tracks[track]
            .pattern_from_order_mut(order)
            .step_mut(step)
            .set_cell(value))
    }

    /// Replace a whole step, returning the prior step.
    pub fn set_step(
        &mut self,
        track: usize,
        order: usize,
        step: usize,
        value: Step,
    ) -> Result<Step, OutOfRangeError> {
        self.check_step(track, order, step)?;
        let slot = self.tracks[track]
            .pattern_from_order_mut(order)
            .step_mut(step);
        Ok(core::mem::replace(slot, value))
    }

    /// Clear every cell in a rectangular range. Columns span the flat
    /// `track * 5 + field` axis from `(begin_track, begin_field)` to
    /// `(end_track, end_field)`; rows run from `(begin_order, begin_step)`
    /// to `(end_order, end_step)`, walking order boundaries with the same
    /// carry as cursor motion. Returns the prior values.
    #[allow(clippy::too_many_arguments)]
    pub fn erase_cells(
        &mut self,
        begin_track: usize,
        begin_field: usize,
        begin_order: usize,
        begin_step: usize,
        end_track: usize,
        end_field: usize,
        end_order: usize,
        end_step: usize,
    ) -> Result<Vec<ErasedCell>, OutOfRangeError> {
        self.check_step(begin_track, begin_order, begin_step)?;
        self.check_step(end_track, end_order, end_step)?;

        let begin_col = begin_track * crate::FIELDS_PER_TRACK + begin_field;
        let end_col = end_track * crate::FIELDS_PER_TRACK + end_field;
        if begin_col > end_col || (begin_order, begin_step) > (end_order, end_step) {
            return Err(OutOfRangeError);
        }

        let mut erased = Vec::new();
        let (mut order, mut step) = (begin_order, begin_step);
        loop {
            for col in begin_col..=end_col {
                let track = col / crate::FIELDS_PER_TRACK;
                let field = CellField::ALL[col % crate::FIELDS_PER_TRACK];
                // Tracks at the same order row may reference shorter patterns.
                if step >= self.tracks[track].pattern_from_order(order).len() {
                    continue;
                }
                let old = self.tracks[track]
                    .pattern_from_order_mut(order)
                    .step_mut(step)
                    .erase_cell(field);
                erased.push(ErasedCell {
                    track,
                    field,
                    order,
                    step,
                    old,
                });
            }
            if (order, step) >= (end_order, end_step) {
                break;
            }
            step += 1;
            // Carry on the longest pattern in the spanned tracks, so a row
            // that only exists in a longer sibling is still reached.
            let row_len = (begin_track..=end_track)
                .map(|track| self.tracks[track].pattern_from_order(order).len())
                .max()
                .unwrap_or(1);
            if step >= row_len {
                order += 1;
                step = 0;
                if order >= self.order_count() {
                    break;
                }
            }
        }
        Ok(erased)
    }

    /// Insert a blank step at the cursor row, shifting the rest of the
    /// pattern down. Returns the pattern's steps before and after.
    pub fn insert_step(
        &mut self,
        track: usize,
        order: usize,
        step: usize,
    ) -> Result<(Vec<Step>, Vec<Step>), OutOfRangeError> {
        self.check_step(track, order, step)?;
        let pattern = self.tracks[track].pattern_from_order_mut(order);
        let old = pattern.steps().to_vec();
        pattern.insert_step(step);
        Ok((old, pattern.steps().to_vec()))
    }

    /// Delete the step above the cursor row, shifting the rest up. Returns
    /// the pattern's steps before and after.
    pub fn delete_previous_step(
        &mut self,
        track: usize,
        order: usize,
        step: usize,
    ) -> Result<(Vec<Step>, Vec<Step>), OutOfRangeError> {
        self.check_step(track, order, step)?;
        if step == 0 {
            return Err(OutOfRangeError);
        }
        let pattern = self.tracks[track].pattern_from_order_mut(order);
        let old = pattern.steps().to_vec();
        pattern.delete_previous_step(step);
        Ok((old, pattern.steps().to_vec()))
    }

    /// Overwrite every step of the pattern referenced by `(track, order)`.
    pub fn set_pattern_steps(
        &mut self,
        track: usize,
        order: usize,
        steps: &[Step],
    ) -> Result<(), OutOfRangeError> {
        self.check_order(track, order)?;
        let pattern = self.tracks[track].pattern_from_order_mut(order);
        if steps.len() != pattern.len() {
            return Err(OutOfRangeError);
        }
        pattern.set_steps(steps);
        Ok(())
    }

    /// Resize the pattern referenced at order `row` on every track, so the
    /// row keeps one consistent length across the grid.
    pub fn set_pattern_len(&mut self, row: usize, len: usize) -> Result<(), OutOfRangeError> {
        if row >= self.order_count() || len == 0 {
            return Err(OutOfRangeError);
        }
        for track in &mut self.tracks {
            track.pattern_from_order_mut(row).resize(len);
        }
        Ok(())
    }

    // --- Order list surface ---

    /// Point an order row of one track at a pattern, returning the prior
    /// pattern number.
    pub fn set_order_pattern(
        &mut self,
        track: usize,
        row: usize,
        pattern: u8,
    ) -> Result<u8, OutOfRangeError> {
        self.check_order(track, row)?;
        Ok(self.tracks[track].register_pattern_to_order(row, pattern))
    }

    /// Insert an order row at `row` across all tracks, one pattern number
    /// per track.
    pub fn insert_order_at(&mut self, row: usize, patterns: &[u8]) -> Result<(), OutOfRangeError> {
        if row > self.order_count() || patterns.len() != self.tracks.len() {
            return Err(OutOfRangeError);
        }
        for (track, &pattern) in self.tracks.iter_mut().zip(patterns) {
            track.insert_order(row, pattern);
        }
        Ok(())
    }

    /// Insert a blank order row (pattern 0 on every track) below `row`,
    /// returning the new row's index.
    pub fn insert_order_below(&mut self, row: usize) -> Result<usize, OutOfRangeError> {
        if row >= self.order_count() {
            return Err(OutOfRangeError);
        }
        let patterns = alloc::vec![0u8; self.tracks.len()];
        self.insert_order_at(row + 1, &patterns)?;
        Ok(row + 1)
    }

    /// Delete an order row across all tracks, returning the pattern numbers
    /// it referenced. An order list always keeps at least one row.
    pub fn delete_order(&mut self, row: usize) -> Result<Vec<u8>, OutOfRangeError> {
        if row >= self.order_count() || self.order_count() == 1 {
            return Err(OutOfRangeError);
        }
        Ok(self
            .tracks
            .iter_mut()
            .map(|track| track.delete_order(row))
            .collect())
    }

    fn check_order(&self, track: usize, order: usize) -> Result<(), OutOfRangeError> {
        if track < self.tracks.len() && order < self.tracks[track].order_count() {
            Ok(())
        } else {
            Err(OutOfRangeError)
        }
    }

    fn check_step(&self, track: usize, order: usize, step: usize) -> Result<(), OutOfRangeError> {
        self.check_order(track, order)?;
        if step < self.tracks[track].pattern_from_order(order).len() {
            Ok(())
        } else {
            Err(OutOfRangeError)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Note;

    fn two_track_song() -> Song {
        Song::with_tracks(
            "test",
            &[(SoundSource::Fm, 0), (SoundSource::Fm, 1)],
            4,
        )
    }

    #[test]
    fn standard_style_has_fifteen_tracks() {
        let song = Song::new("demo");
        assert_eq!(song.track_count(), 15);
        assert_eq!(song.order_count(), 1);
        assert_eq!(song.pattern_len(0, 0), Ok(DEFAULT_PATTERN_LEN));
    }

    #[test]
    fn set_cell_value_returns_prior() {
        let mut song = two_track_song();
        let old = song
            .set_cell_value(0, 0, 2, CellValue::Tone(Note::On(48)))
            .unwrap();
        assert_eq!(old, CellValue::Tone(Note::None));
        let old = song
            .set_cell_value(0, 0, 2, CellValue::Tone(Note::Off))
            .unwrap();
        assert_eq!(old, CellValue::Tone(Note::On(48)));
    }

    #[test]
    fn out_of_range_access_is_an_error() {
        let song = two_track_song();
        assert!(song.cell_value(2, CellField::Tone, 0, 0).is_err());
        assert!(song.cell_value(0, CellField::Tone, 1, 0).is_err());
        assert!(song.cell_value(0, CellField::Tone, 0, 4).is_err());
    }

    #[test]
    fn erase_cells_reports_prior_values() {
        let mut song = two_track_song();
        song.set_cell_value(0, 0, 0, CellValue::Instrument(Some(5)))
            .unwrap();
        song.set_cell_value(1, 0, 1, CellValue::Volume(Some(10)))
            .unwrap();

        // Full width of both tracks, steps 0-1.
        let erased = song.erase_cells(0, 0, 0, 0, 1, 4, 0, 1).unwrap();
        assert_eq!(erased.len(), 20);
        assert!(erased.iter().any(|cell| {
            cell.track == 0 && cell.step == 0 && cell.old == CellValue::Instrument(Some(5))
        }));
        assert_eq!(
            song.cell_value(1, CellField::Volume, 0, 1),
            Ok(CellValue::Volume(None))
        );
    }

    #[test]
    fn erase_cells_walks_order_boundary() {
        let mut song = two_track_song();
        song.insert_order_below(0).unwrap();
        song.set_cell_value(0, 1, 0, CellValue::Instrument(Some(9)))
            .unwrap();

        // Tone+instrument columns of track 0, from (order 0, step 3) to
        // (order 1, step 0).
        let erased = song.erase_cells(0, 0, 0, 3, 0, 1, 1, 0).unwrap();
        assert_eq!(erased.len(), 4);
        assert_eq!(
            song.cell_value(0, CellField::Instrument, 1, 0),
            Ok(CellValue::Instrument(None))
        );
    }

    #[test]
    fn erase_cells_reaches_rows_past_a_shorter_sibling_track() {
        let mut song = two_track_song();
        // Row 0: length 8 on track 1, length 4 on track 0 (its order row is
        // repointed at a fresh default-length pattern).
        song.set_pattern_len(0, 8).unwrap();
        song.set_order_pattern(0, 0, 1).unwrap();
        assert_eq!(song.pattern_len(0, 0), Ok(4));
        assert_eq!(song.pattern_len(1, 0), Ok(8));
        song.set_cell_value(1, 0, 6, CellValue::Volume(Some(11)))
            .unwrap();

        // Full width of both tracks, from step 2 to track 1's step 6.
        let erased = song.erase_cells(0, 0, 0, 2, 1, 4, 0, 6).unwrap();
        // Five rows of ten columns, minus track 0's missing steps 4-6.
        assert_eq!(erased.len(), 35);
        assert!(erased.iter().any(|cell| {
            cell.track == 1 && cell.step == 6 && cell.old == CellValue::Volume(Some(11))
        }));
        assert_eq!(
            song.cell_value(1, CellField::Volume, 0, 6),
            Ok(CellValue::Volume(None))
        );
    }

    #[test]
    fn insert_order_below_extends_all_tracks() {
        let mut song = two_track_song();
        let new_row = song.insert_order_below(0).unwrap();
        assert_eq!(new_row, 1);
        assert_eq!(song.order_count(), 2);
        assert_eq!(song.track(0).order_list(), &[0, 0]);
        assert_eq!(song.track(1).order_list(), &[0, 0]);
    }

    #[test]
    fn delete_order_refuses_last_row() {
        let mut song = two_track_song();
        assert!(song.delete_order(0).is_err());
        song.insert_order_below(0).unwrap();
        song.set_order_pattern(0, 1, 3).unwrap();
        let removed = song.delete_order(1).unwrap();
        assert_eq!(removed, alloc::vec![3, 0]);
        assert_eq!(song.order_count(), 1);
    }

    #[test]
    fn insert_step_reports_before_and_after() {
        let mut song = two_track_song();
        song.set_cell_value(0, 0, 0, CellValue::Tone(Note::On(60)))
            .unwrap();
        let (old, new) = song.insert_step(0, 0, 0).unwrap();
        assert_eq!(old[0].note, Note::On(60));
        assert_eq!(new[0].note, Note::None);
        assert_eq!(new[1].note, Note::On(60));
    }

    #[test]
    fn delete_previous_step_at_top_is_an_error() {
        let mut song = two_track_song();
        assert!(song.delete_previous_step(0, 0, 0).is_err());
    }
}
