//! Pattern and step cell types.

use alloc::vec::Vec;

/// A tone cell value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Note {
    /// No note entered
    #[default]
    None,
    /// Note on with note number (octave * 12 + semitone)
    On(u8),
    /// Key off
    Off,
}

impl Note {
    /// Create a note from octave and semitone (0-11).
    pub const fn from_octave_semitone(octave: u8, semitone: u8) -> Self {
        Note::On(octave * 12 + semitone)
    }

    /// Get the octave if this is a note on.
    pub const fn octave(self) -> Option<u8> {
        match self {
            Note::On(n) => Some(n / 12),
            _ => None,
        }
    }

    /// Get the semitone (0-11) if this is a note on.
    pub const fn semitone(self) -> Option<u8> {
        match self {
            Note::On(n) => Some(n % 12),
            _ => None,
        }
    }
}

/// Number of cell fields per track column.
pub const FIELDS_PER_TRACK: usize = 5;

/// Which of the five cells of a step a column addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum CellField {
    Tone,
    Instrument,
    Volume,
    EffectId,
    EffectValue,
}

impl CellField {
    /// All fields in display order.
    pub const ALL: [CellField; FIELDS_PER_TRACK] = [
        CellField::Tone,
        CellField::Instrument,
        CellField::Volume,
        CellField::EffectId,
        CellField::EffectValue,
    ];

    /// Index of this field within a track column (tone = 0 .. effect value = 4).
    pub const fn index(self) -> usize {
        match self {
            CellField::Tone => 0,
            CellField::Instrument => 1,
            CellField::Volume => 2,
            CellField::EffectId => 3,
            CellField::EffectValue => 4,
        }
    }

    /// Field for a column index within a track.
    pub fn from_index(idx: usize) -> Option<CellField> {
        CellField::ALL.get(idx).copied()
    }
}

/// A dynamically typed view of one cell, used by the generic query surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellValue {
    Tone(Note),
    Instrument(Option<u8>),
    Volume(Option<u8>),
    EffectId(Option<char>),
    EffectValue(Option<u8>),
}

impl CellValue {
    /// The field this value belongs to.
    pub const fn field(&self) -> CellField {
        match self {
            CellValue::Tone(_) => CellField::Tone,
            CellValue::Instrument(_) => CellField::Instrument,
            CellValue::Volume(_) => CellField::Volume,
            CellValue::EffectId(_) => CellField::EffectId,
            CellValue::EffectValue(_) => CellField::EffectValue,
        }
    }

    /// The empty value of a field.
    pub const fn empty(field: CellField) -> CellValue {
        match field {
            CellField::Tone => CellValue::Tone(Note::None),
            CellField::Instrument => CellValue::Instrument(None),
            CellField::Volume => CellValue::Volume(None),
            CellField::EffectId => CellValue::EffectId(None),
            CellField::EffectValue => CellValue::EffectValue(None),
        }
    }
}

/// A single step in a pattern: five cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Step {
    pub note: Note,
    pub instrument: Option<u8>,
    pub volume: Option<u8>,
    /// Single-letter effect identifier.
    pub effect_id: Option<char>,
    pub effect_value: Option<u8>,
}

impl Step {
    /// Create an empty step.
    pub const fn empty() -> Self {
        Self {
            note: Note::None,
            instrument: None,
            volume: None,
            effect_id: None,
            effect_value: None,
        }
    }

    /// Returns true if every cell is empty.
    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }

    /// Read one cell.
    pub fn cell(&self, field: CellField) -> CellValue {
        match field {
            CellField::Tone => CellValue::Tone(self.note),
            CellField::Instrument => CellValue::Instrument(self.instrument),
            CellField::Volume => CellValue::Volume(self.volume),
            CellField::EffectId => CellValue::EffectId(self.effect_id),
            CellField::EffectValue => CellValue::EffectValue(self.effect_value),
        }
    }

    /// Write one cell, returning the prior value so callers can snapshot it.
    pub fn set_cell(&mut self, value: CellValue) -> CellValue {
        let old = self.cell(value.field());
        match value {
            CellValue::Tone(n) => self.note = n,
            CellValue::Instrument(i) => self.instrument = i,
            CellValue::Volume(v) => self.volume = v,
            CellValue::EffectId(id) => self.effect_id = id,
            CellValue::EffectValue(v) => self.effect_value = v,
        }
        old
    }

    /// Clear one cell, returning the prior value.
    pub fn erase_cell(&mut self, field: CellField) -> CellValue {
        self.set_cell(CellValue::empty(field))
    }
}

/// A reusable block of steps, referenced by order entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    steps: Vec<Step>,
}

impl Pattern {
    /// Create a pattern of `len` empty steps.
    pub fn new(len: usize) -> Self {
        Self {
            steps: alloc::vec![Step::empty(); len],
        }
    }

    /// Step count (the pattern's length).
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, idx: usize) -> &Step {
        debug_assert!(idx < self.steps.len());
        &self.steps[idx]
    }

    pub fn step_mut(&mut self, idx: usize) -> &mut Step {
        debug_assert!(idx < self.steps.len());
        &mut self.steps[idx]
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Overwrite all steps. The replacement must match the pattern length.
    pub fn set_steps(&mut self, steps: &[Step]) {
        debug_assert_eq!(steps.len(), self.steps.len());
        self.steps.copy_from_slice(steps);
    }

    /// Returns true if no step holds any data.
    pub fn is_unused(&self) -> bool {
        self.steps.iter().all(Step::is_empty)
    }

    /// Change the step count, truncating or padding with empty steps.
    pub fn resize(&mut self, len: usize) {
        self.steps.resize(len, Step::empty());
    }

    /// Insert a blank step at `idx`, shifting later steps down. The pattern
    /// length is fixed, so the last step falls off.
    pub fn insert_step(&mut self, idx: usize) {
        debug_assert!(idx < self.steps.len());
        self.steps.pop();
        self.steps.insert(idx, Step::empty());
    }

    /// Remove the step above `idx`, shifting later steps up and appending a
    /// blank step to keep the length fixed. Returns the removed step.
    pub fn delete_previous_step(&mut self, idx: usize) -> Step {
        debug_assert!(0 < idx && idx < self.steps.len());
        let removed = self.steps.remove(idx - 1);
        self.steps.push(Step::empty());
        removed
    }
}
