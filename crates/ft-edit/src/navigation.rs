//! Cursor movement arithmetic.
//!
//! The horizontal axis is one flat sequence of `track_count * 5` columns
//! with saturating boundaries. The vertical axis carries across order rows,
//! re-querying the pattern length at every carry because each order may
//! reference a pattern of a different length. These functions are pure over
//! `(Song, position)`; the sessions layer event emission on top.

use ft_ir::{Song, FIELDS_PER_TRACK};

use crate::position::PatternPosition;

/// Pattern length at `(track, order)`. Positions passed into this module
/// are kept in range by the sessions, so a stale lookup only happens on a
/// misuse and degrades to a one-step order.
fn order_len(song: &Song, track: usize, order: usize) -> usize {
    song.pattern_len(track, order).unwrap_or(1)
}

/// Move `n` columns right (negative = left), carrying across track
/// boundaries and saturating at column 0 of track 0 and column 4 of the
/// last track.
pub fn move_right(song: &Song, pos: PatternPosition, n: i32) -> PatternPosition {
    let mut track = pos.track;
    let mut field = pos.field as i64 + n as i64;
    if n > 0 {
        loop {
            if field < FIELDS_PER_TRACK as i64 {
                break;
            } else if track == song.track_count() - 1 {
                field = FIELDS_PER_TRACK as i64 - 1;
                break;
            } else {
                field -= FIELDS_PER_TRACK as i64;
                track += 1;
            }
        }
    } else {
        loop {
            if field >= 0 {
                break;
            } else if track == 0 {
                field = 0;
                break;
            } else {
                track -= 1;
                field += FIELDS_PER_TRACK as i64;
            }
        }
    }
    pos.with_columns(track, field as usize)
}

/// Move `n` steps down (negative = up), carrying the excess into adjacent
/// orders and saturating at step 0 of order 0 and the last step of the
/// last order.
pub fn move_down(song: &Song, pos: PatternPosition, n: i32) -> PatternPosition {
    let mut order = pos.order;
    let mut tmp = pos.step as i64 + n as i64;
    if n > 0 {
        loop {
            let dif = tmp - order_len(song, pos.track, order) as i64;
            if dif < 0 {
                break;
            } else if order == song.order_count() - 1 {
                tmp = tmp - dif - 1; // last step
                break;
            } else {
                order += 1;
                tmp = dif;
            }
        }
    } else {
        loop {
            if tmp >= 0 {
                break;
            } else if order == 0 {
                tmp = 0;
                break;
            } else {
                order -= 1;
                tmp += order_len(song, pos.track, order) as i64;
            }
        }
    }
    pos.with_rows(order, tmp as usize)
}

/// Signed distance between two columns on the flat horizontal axis.
pub fn column_distance(
    begin_track: usize,
    begin_field: usize,
    end_track: usize,
    end_field: usize,
) -> i32 {
    (end_track * FIELDS_PER_TRACK + end_field) as i32
        - (begin_track * FIELDS_PER_TRACK + begin_field) as i32
}

/// Signed distance between two `(order, step)` rows, summing the pattern
/// lengths walked in the order-advancing direction. Converts absolute jump
/// targets into relative moves for [`move_down`].
pub fn step_distance(
    song: &Song,
    track: usize,
    begin_order: usize,
    begin_step: usize,
    end_order: usize,
    end_step: usize,
) -> i32 {
    let (mut start_order, start_step, stop_order, stop_step, forward) = if end_order >= begin_order
    {
        (end_order, end_step, begin_order, begin_step, true)
    } else {
        (begin_order, begin_step, end_order, end_step, false)
    };

    let mut d: i64 = 0;
    let mut start_step = start_step as i64;
    loop {
        if start_order == stop_order {
            d += start_step - stop_step as i64;
            break;
        } else {
            d += start_step;
            start_order -= 1;
            start_step = order_len(song, track, start_order) as i64;
        }
    }

    if forward {
        d as i32
    } else {
        -(d as i32)
    }
}

/// Clamp a position back into the song's current shape after a destructive
/// edit (order insertion/deletion, pattern resize).
pub fn clamp_position(song: &Song, pos: PatternPosition) -> PatternPosition {
    let track = pos.track.min(song.track_count().saturating_sub(1));
    let field = pos.field.min(FIELDS_PER_TRACK - 1);
    let order = pos.order.min(song.order_count().saturating_sub(1));
    let step = pos.step.min(order_len(song, track, order) - 1);
    PatternPosition::new(track, field, order, step)
}
