//! Rectangular selection algebra.

use core::cmp::Ordering;

use crate::position::{OrderPosition, PatternPosition};

/// A canonical selection rectangle over the pattern grid:
/// `top_left <= bottom_right` under both the column and the row order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternSelection {
    top_left: PatternPosition,
    bottom_right: PatternPosition,
}

impl PatternSelection {
    /// Canonicalize two arbitrary corners. The column swap and the row swap
    /// are independent, so the rectangle is correct even when the anchor
    /// sits top-right or bottom-left of the head.
    pub fn normalize(start: PatternPosition, end: PatternPosition) -> Self {
        let (left, right) = match start.compare_columns(&end) {
            Ordering::Greater => (end, start),
            _ => (start, end),
        };
        let (above, below) = match start.compare_rows(&end) {
            Ordering::Greater => (end, start),
            _ => (start, end),
        };
        Self {
            top_left: PatternPosition::new(left.track, left.field, above.order, above.step),
            bottom_right: PatternPosition::new(right.track, right.field, below.order, below.step),
        }
    }

    pub fn top_left(&self) -> PatternPosition {
        self.top_left
    }

    pub fn bottom_right(&self) -> PatternPosition {
        self.bottom_right
    }

    /// Non-strict containment on both axes.
    pub fn contains(&self, pos: &PatternPosition) -> bool {
        self.top_left.compare_columns(pos) != Ordering::Greater
            && self.bottom_right.compare_columns(pos) != Ordering::Less
            && self.top_left.compare_rows(pos) != Ordering::Greater
            && self.bottom_right.compare_rows(pos) != Ordering::Less
    }
}

/// A canonical selection rectangle over the order list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderSelection {
    top_left: OrderPosition,
    bottom_right: OrderPosition,
}

impl OrderSelection {
    pub fn normalize(start: OrderPosition, end: OrderPosition) -> Self {
        let (left, right) = if start.track > end.track {
            (end.track, start.track)
        } else {
            (start.track, end.track)
        };
        let (above, below) = if start.row > end.row {
            (end.row, start.row)
        } else {
            (start.row, end.row)
        };
        Self {
            top_left: OrderPosition::new(left, above),
            bottom_right: OrderPosition::new(right, below),
        }
    }

    pub fn top_left(&self) -> OrderPosition {
        self.top_left
    }

    pub fn bottom_right(&self) -> OrderPosition {
        self.bottom_right
    }

    pub fn contains(&self, pos: &OrderPosition) -> bool {
        self.top_left.track <= pos.track
            && pos.track <= self.bottom_right.track
            && self.top_left.row <= pos.row
            && pos.row <= self.bottom_right.row
    }
}
