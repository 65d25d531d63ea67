//! End-to-end editing flow: enter notes, select, cut, paste, undo, redo.

use ft_edit::{
    ClipboardChannel, EditOp, LocalClipboard, OrderEditSession, PatternEditSession,
    PatternPosition, UndoStack,
};
use ft_ir::{CellField, CellValue, Note, Song, SoundSource};

fn apply_all(song: &mut Song, ops: &[EditOp]) {
    for op in ops {
        op.apply(song).unwrap();
    }
}

#[test]
fn edit_cut_paste_undo_round_trip() {
    let mut song = Song::with_tracks(
        "integration",
        &[(SoundSource::Fm, 0), (SoundSource::Fm, 1)],
        8,
    );
    let mut patterns = PatternEditSession::new();
    let mut stack = UndoStack::new();
    let mut clipboard = LocalClipboard::new();

    // Enter two notes on track 0; key entry advances a step each time.
    patterns.set_selected_instrument(Some(2));
    let ops = patterns.set_step_key_on(&mut song, 4, 0).unwrap();
    stack.push(ops);
    let ops = patterns.set_step_key_on(&mut song, 4, 7).unwrap();
    stack.push(ops);
    assert_eq!(patterns.cursor().step, 2);

    // Select the tone+instrument columns of those two steps and cut.
    patterns.jump_to(&song, PatternPosition::new(0, 0, 0, 0));
    patterns.press_shift();
    patterns.move_cursor_right(&song, 1);
    patterns.move_cursor_down(&song, 1);
    patterns.select_to_cursor();
    patterns.release_shift();
    let ops = patterns.cut_selection(&mut song, &mut clipboard).unwrap();
    stack.push(ops);
    assert!(clipboard.text().starts_with("PATTERN_CUT:0,2,2,"));
    assert_eq!(
        song.cell_value(0, CellField::Tone, 0, 0),
        Ok(CellValue::Tone(Note::None))
    );

    // Paste onto track 1, two steps down.
    patterns.jump_to(&song, PatternPosition::new(1, 0, 0, 2));
    let ops = patterns.paste_from(&mut song, &clipboard).unwrap();
    stack.push(ops);
    assert_eq!(
        song.cell_value(1, CellField::Tone, 0, 2),
        Ok(CellValue::Tone(Note::On(48)))
    );
    assert_eq!(
        song.cell_value(1, CellField::Instrument, 0, 3),
        Ok(CellValue::Instrument(Some(2)))
    );

    // Undo the paste, then the cut: the original notes come back.
    let undone = stack.undo().unwrap();
    apply_all(&mut song, &undone);
    assert_eq!(
        song.cell_value(1, CellField::Tone, 0, 2),
        Ok(CellValue::Tone(Note::None))
    );
    let undone = stack.undo().unwrap();
    apply_all(&mut song, &undone);
    assert_eq!(
        song.cell_value(0, CellField::Tone, 0, 0),
        Ok(CellValue::Tone(Note::On(48)))
    );
    assert_eq!(
        song.cell_value(0, CellField::Instrument, 0, 1),
        Ok(CellValue::Instrument(Some(2)))
    );

    // Redo the cut.
    let redone = stack.redo().unwrap().to_vec();
    apply_all(&mut song, &redone);
    assert_eq!(
        song.cell_value(0, CellField::Tone, 0, 0),
        Ok(CellValue::Tone(Note::None))
    );
}

#[test]
fn order_edits_keep_both_views_in_sync() {
    let mut song = Song::with_tracks(
        "sync",
        &[(SoundSource::Fm, 0), (SoundSource::Fm, 1)],
        4,
    );
    let mut patterns = PatternEditSession::new();
    let mut orders = OrderEditSession::new();
    let mut stack = UndoStack::new();

    // Insert a row below and point it at pattern 1 on track 0.
    let ops = orders.insert_order_below(&mut song).unwrap();
    stack.push(ops);
    let ops = orders.set_cell_order_num(&mut song, 1).unwrap();
    stack.push(ops);
    assert_eq!(song.track(0).order_list(), &[0, 1]);

    // The pattern view follows the order cursor without echoing events.
    let cursor = orders.cursor();
    patterns.update_from_order_list(&song, cursor.track, cursor.row);
    assert_eq!(patterns.cursor().order, 1);
    assert!(patterns.drain_events().is_empty());

    // Undo both order edits; the pattern view is clamped back in range.
    while let Some(ops) = stack.undo() {
        for op in &ops {
            op.apply(&mut song).unwrap();
        }
    }
    assert_eq!(song.order_count(), 1);
    assert_eq!(song.track(0).order_list(), &[0]);
    patterns.clamp_to_song(&song);
    orders.clamp_to_song(&song);
    assert_eq!(patterns.cursor().order, 0);
    assert_eq!(orders.cursor().row, 0);
}
