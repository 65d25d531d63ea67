//! Cell coordinates in the order-list and pattern grids.

use core::cmp::Ordering;

use ft_ir::FIELDS_PER_TRACK;

/// One row of the order list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderPosition {
    pub track: usize,
    pub row: usize,
}

impl OrderPosition {
    pub const fn new(track: usize, row: usize) -> Self {
        Self { track, row }
    }
}

/// One cell of the pattern grid.
///
/// `field` selects a cell within the track column (tone = 0, instrument = 1,
/// volume = 2, effect ID = 3, effect value = 4). Columns are totally ordered
/// by `track * 5 + field`; rows by `(order, step)`, which matches cumulative
/// step count since a step index is always within its pattern's length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternPosition {
    pub track: usize,
    pub field: usize,
    pub order: usize,
    pub step: usize,
}

impl PatternPosition {
    pub const fn new(track: usize, field: usize, order: usize, step: usize) -> Self {
        Self {
            track,
            field,
            order,
            step,
        }
    }

    /// Flat column index across all tracks.
    pub const fn column_index(&self) -> usize {
        self.track * FIELDS_PER_TRACK + self.field
    }

    pub fn compare_columns(&self, other: &PatternPosition) -> Ordering {
        self.column_index().cmp(&other.column_index())
    }

    pub fn compare_rows(&self, other: &PatternPosition) -> Ordering {
        (self.order, self.step).cmp(&(other.order, other.step))
    }

    /// Same position with the column components replaced.
    pub const fn with_columns(self, track: usize, field: usize) -> Self {
        Self {
            track,
            field,
            ..self
        }
    }

    /// Same position with the row components replaced.
    pub const fn with_rows(self, order: usize, step: usize) -> Self {
        Self {
            order,
            step,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_order_is_flat_track_field() {
        let a = PatternPosition::new(0, 4, 0, 0);
        let b = PatternPosition::new(1, 0, 0, 0);
        assert_eq!(a.column_index(), 4);
        assert_eq!(b.column_index(), 5);
        assert_eq!(a.compare_columns(&b), Ordering::Less);
    }

    #[test]
    fn row_order_is_order_then_step() {
        let a = PatternPosition::new(0, 0, 0, 63);
        let b = PatternPosition::new(5, 3, 1, 0);
        assert_eq!(a.compare_rows(&b), Ordering::Less);
        assert_eq!(b.compare_rows(&a), Ordering::Greater);
        // Row equality ignores columns.
        let c = PatternPosition::new(2, 1, 0, 63);
        assert_eq!(a.compare_rows(&c), Ordering::Equal);
    }
}
