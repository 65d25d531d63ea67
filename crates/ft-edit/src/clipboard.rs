//! Text clipboard codec for rectangular pattern ranges.
//!
//! A copied rectangle survives a round trip through an uninterpreted
//! external text buffer:
//!
//! ```text
//! PATTERN_COPY:<startColumn>,<width>,<height>,<cell0>,...,<cellN-1>
//! ```
//!
//! Cells are emitted row-major. Tone cells render as the note number with
//! `-1`/`-2` for empty/key-off; instrument, volume, and effect value as the
//! integer or `-1` for empty; effect IDs as the literal letter or `--`.
//! Cut uses the `PATTERN_CUT` tag with an identical body.

use log::debug;
use thiserror::Error;

use ft_ir::{CellField, CellValue, Note, OutOfRangeError, Song, FIELDS_PER_TRACK};

use crate::navigation::column_distance;
use crate::ops::EditOp;
use crate::position::PatternPosition;
use crate::selection::PatternSelection;

/// Clipboard text that could not be parsed as a pattern clip.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The text does not start with `PATTERN_COPY:` or `PATTERN_CUT:`.
    #[error("clipboard text is not a pattern clip")]
    MissingTag,
    /// The start column / width / height header is malformed.
    #[error("malformed pattern clip header")]
    BadHeader,
}

/// A paste failed before any cell was written.
#[derive(Debug, Error)]
pub enum PasteError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    OutOfRange(#[from] OutOfRangeError),
}

/// Upper bound on the cells a clip header may declare.
const MAX_CLIP_CELLS: usize = 1 << 20;

/// Which operation produced a clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipTag {
    Copy,
    Cut,
}

impl ClipTag {
    const fn prefix(self) -> &'static str {
        match self {
            ClipTag::Copy => "PATTERN_COPY",
            ClipTag::Cut => "PATTERN_CUT",
        }
    }
}

/// A parsed rectangular cell range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternClip {
    pub tag: ClipTag,
    /// `field` of the rectangle's top-left corner.
    pub start_field: usize,
    /// Columns spanned + 1.
    pub width: usize,
    /// Rows spanned + 1.
    pub height: usize,
    /// Row-major cell texts. May hold fewer than `width * height` entries
    /// when the source text was truncated; missing cells are skipped on
    /// paste.
    pub cells: Vec<String>,
}

impl PatternClip {
    /// Parse clipboard text. Rejects foreign text without touching any
    /// score state.
    pub fn decode(text: &str) -> Result<PatternClip, DecodeError> {
        let (tag, body) = if let Some(rest) = text.strip_prefix("PATTERN_COPY:") {
            (ClipTag::Copy, rest)
        } else if let Some(rest) = text.strip_prefix("PATTERN_CUT:") {
            (ClipTag::Cut, rest)
        } else {
            debug!("rejecting clipboard text without a pattern clip tag");
            return Err(DecodeError::MissingTag);
        };

        let mut tokens = Tokenizer::new(body);
        let start_field = parse_header_int(tokens.next())?;
        let width = parse_header_int(tokens.next())?;
        let height = parse_header_int(tokens.next())?;
        // The header comes from an uninterpreted external buffer; its
        // dimensions bound allocation and the paste loop, so cap them
        // before trusting them.
        let total = width.checked_mul(height).ok_or(DecodeError::BadHeader)?;
        if start_field >= FIELDS_PER_TRACK || width == 0 || height == 0 || total > MAX_CLIP_CELLS {
            return Err(DecodeError::BadHeader);
        }

        let mut cells = Vec::new();
        for _ in 0..total {
            match tokens.next() {
                Some(cell) => cells.push(cell.to_string()),
                // Truncated input is tolerated; the header still bounds the
                // paste loop.
                None => break,
            }
        }

        Ok(PatternClip {
            tag,
            start_field,
            width,
            height,
            cells,
        })
    }

    /// Render the clip back to clipboard text.
    pub fn encode(&self) -> String {
        let mut out = format!(
            "{}:{},{},{}",
            self.tag.prefix(),
            self.start_field,
            self.width,
            self.height
        );
        for cell in &self.cells {
            out.push(',');
            out.push_str(cell);
        }
        out
    }

    /// Cell text at `(row, col)`, if the clip carries it.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.cells.get(row * self.width + col).map(String::as_str)
    }
}

fn parse_header_int(token: Option<&str>) -> Result<usize, DecodeError> {
    token
        .and_then(|t| t.parse().ok())
        .ok_or(DecodeError::BadHeader)
}

/// Incremental tokenizer over the `,` delimiter. End of input terminates
/// the final token, so a missing trailing comma is accepted.
struct Tokenizer<'a> {
    rest: &'a str,
}

impl<'a> Tokenizer<'a> {
    fn new(body: &'a str) -> Self {
        Self { rest: body }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        match self.rest.find(',') {
            Some(i) => {
                let token = &self.rest[..i];
                self.rest = &self.rest[i + 1..];
                Some(token)
            }
            None => {
                let token = self.rest;
                self.rest = "";
                Some(token)
            }
        }
    }
}

/// Longest pattern referenced at `order` across the spanned tracks. Rows
/// carry on this length so a row that only exists in a longer sibling
/// track is still reached.
fn row_len(
    song: &Song,
    begin_track: usize,
    end_track: usize,
    order: usize,
) -> Result<usize, OutOfRangeError> {
    let mut len = 1;
    for track in begin_track..=end_track {
        len = len.max(song.pattern_len(track, order)?);
    }
    Ok(len)
}

/// Serialize the selected rectangle, row-major. Cells on rows a shorter
/// sibling track does not have render as their empty sentinel.
pub fn copy_cells(song: &Song, sel: &PatternSelection) -> Result<PatternClip, OutOfRangeError> {
    let tl = sel.top_left();
    let br = sel.bottom_right();
    if tl.step >= song.pattern_len(tl.track, tl.order)?
        || br.step >= song.pattern_len(br.track, br.order)?
    {
        return Err(OutOfRangeError);
    }
    let width = (1 + column_distance(tl.track, tl.field, br.track, br.field)) as usize;

    let mut cells = Vec::new();
    let mut height = 0;
    let (mut order, mut step) = (tl.order, tl.step);
    loop {
        for col in tl.column_index()..tl.column_index() + width {
            let track = col / FIELDS_PER_TRACK;
            let field = CellField::ALL[col % FIELDS_PER_TRACK];
            let value = if step < song.pattern_len(track, order)? {
                song.cell_value(track, field, order, step)?
            } else {
                CellValue::empty(field)
            };
            cells.push(render_cell(value));
        }
        height += 1;
        if (order, step) >= (br.order, br.step) {
            break;
        }
        step += 1;
        if step >= row_len(song, tl.track, br.track, order)? {
            order += 1;
            step = 0;
            if order >= song.order_count() {
                break;
            }
        }
    }

    Ok(PatternClip {
        tag: ClipTag::Copy,
        start_field: tl.field,
        width,
        height,
        cells,
    })
}

/// Write a parsed clip into the score, row-major from the destination.
/// Horizontal overflow carries into later tracks exactly as cursor motion
/// does; columns past the last track and rows past a destination pattern's
/// end are dropped. Returns the ops describing every cell written.
pub fn paste_cells(
    song: &mut Song,
    dest: PatternPosition,
    clip: &PatternClip,
) -> Result<Vec<EditOp>, OutOfRangeError> {
    // Validate the anchor before writing anything.
    if dest.step >= song.pattern_len(dest.track, dest.order)? {
        return Err(OutOfRangeError);
    }

    let total_columns = song.track_count() * FIELDS_PER_TRACK;
    let mut ops = Vec::new();
    for row in 0..clip.height {
        let step = dest.step + row;
        for col in 0..clip.width {
            let flat = dest.track * FIELDS_PER_TRACK + clip.start_field + col;
            if flat >= total_columns {
                break;
            }
            let track = flat / FIELDS_PER_TRACK;
            let field = CellField::ALL[flat % FIELDS_PER_TRACK];
            if step >= song.pattern_len(track, dest.order)? {
                continue;
            }
            let Some(text) = clip.cell(row, col) else {
                continue;
            };
            let Some(new) = parse_cell(field, text) else {
                continue;
            };
            let old = song.set_cell_value(track, dest.order, step, new)?;
            ops.push(EditOp::SetCell {
                track,
                order: dest.order,
                step,
                old,
                new,
            });
        }
    }
    Ok(ops)
}

/// Render one cell per its semantic type.
fn render_cell(value: CellValue) -> String {
    match value {
        CellValue::Tone(Note::None) => "-1".to_string(),
        CellValue::Tone(Note::Off) => "-2".to_string(),
        CellValue::Tone(Note::On(n)) => n.to_string(),
        CellValue::Instrument(v) | CellValue::Volume(v) | CellValue::EffectValue(v) => {
            v.map_or_else(|| "-1".to_string(), |v| v.to_string())
        }
        CellValue::EffectId(None) => "--".to_string(),
        CellValue::EffectId(Some(id)) => id.to_string(),
    }
}

/// Parse one cell text for a field. Returns None for values that cannot be
/// stored; paste skips those cells.
fn parse_cell(field: CellField, text: &str) -> Option<CellValue> {
    match field {
        CellField::Tone => match text.parse::<i32>().ok()? {
            -1 => Some(CellValue::Tone(Note::None)),
            -2 => Some(CellValue::Tone(Note::Off)),
            n if (0..=i32::from(u8::MAX)).contains(&n) => Some(CellValue::Tone(Note::On(n as u8))),
            _ => None,
        },
        CellField::Instrument => parse_int_cell(text).map(CellValue::Instrument),
        CellField::Volume => parse_int_cell(text).map(CellValue::Volume),
        CellField::EffectValue => parse_int_cell(text).map(CellValue::EffectValue),
        CellField::EffectId => {
            if text == "--" {
                return Some(CellValue::EffectId(None));
            }
            let mut chars = text.chars();
            let id = chars.next()?;
            if chars.next().is_none() && id.is_ascii_alphanumeric() {
                Some(CellValue::EffectId(Some(id.to_ascii_uppercase())))
            } else {
                None
            }
        }
    }
}

fn parse_int_cell(text: &str) -> Option<Option<u8>> {
    match text.parse::<i32>().ok()? {
        -1 => Some(None),
        n if (0..=i32::from(u8::MAX)).contains(&n) => Some(Some(n as u8)),
        _ => None,
    }
}

/// An opaque last-write-wins text channel (the host's system clipboard).
pub trait ClipboardChannel {
    fn text(&self) -> String;
    fn set_text(&mut self, text: String);
}

/// In-memory channel for tests and headless hosts.
#[derive(Default)]
pub struct LocalClipboard {
    text: String,
}

impl LocalClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardChannel for LocalClipboard {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }
}
