//! Track: one channel lane with its order list and pattern pool.

use alloc::vec::Vec;

use crate::pattern::Pattern;

/// Maximum number of patterns a track can pool.
pub const MAX_PATTERNS: usize = 256;

/// Which chip a track drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundSource {
    Fm,
    Ssg,
    Drum,
}

/// Identity of a track: number, chip, and channel within the chip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackAttribute {
    pub number: usize,
    pub source: SoundSource,
    pub channel_in_source: usize,
}

/// One row of a track's order list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderData {
    pub attribute: TrackAttribute,
    pub row: usize,
    pub pattern: u8,
}

/// One channel lane: an order list mapping order rows to pattern numbers,
/// plus the pool of patterns those rows reference.
#[derive(Clone, Debug)]
pub struct Track {
    attribute: TrackAttribute,
    order: Vec<u8>,
    patterns: Vec<Pattern>,
    default_pattern_len: usize,
}

impl Track {
    /// Create a track with a one-row order list referencing pattern 0.
    pub fn new(
        number: usize,
        source: SoundSource,
        channel_in_source: usize,
        default_pattern_len: usize,
    ) -> Self {
        Self {
            attribute: TrackAttribute {
                number,
                source,
                channel_in_source,
            },
            order: alloc::vec![0],
            patterns: alloc::vec![Pattern::new(default_pattern_len)],
            default_pattern_len,
        }
    }

    pub fn attribute(&self) -> TrackAttribute {
        self.attribute
    }

    pub fn order_list(&self) -> &[u8] {
        &self.order
    }

    pub fn order_count(&self) -> usize {
        self.order.len()
    }

    pub fn order_data(&self, row: usize) -> OrderData {
        debug_assert!(row < self.order.len());
        OrderData {
            attribute: self.attribute,
            row,
            pattern: self.order[row],
        }
    }

    pub fn pattern(&self, num: u8) -> &Pattern {
        debug_assert!((num as usize) < self.patterns.len());
        &self.patterns[num as usize]
    }

    pub fn pattern_mut(&mut self, num: u8) -> &mut Pattern {
        debug_assert!((num as usize) < self.patterns.len());
        &mut self.patterns[num as usize]
    }

    /// Pattern referenced by an order row.
    pub fn pattern_from_order(&self, row: usize) -> &Pattern {
        self.pattern(self.order[row])
    }

    pub fn pattern_from_order_mut(&mut self, row: usize) -> &mut Pattern {
        let num = self.order[row];
        self.pattern_mut(num)
    }

    /// Point an order row at a pattern, growing the pool on demand so the
    /// referenced pattern always exists.
    pub fn register_pattern_to_order(&mut self, row: usize, pattern: u8) -> u8 {
        debug_assert!(row < self.order.len());
        while self.patterns.len() <= pattern as usize {
            self.patterns.push(Pattern::new(self.default_pattern_len));
        }
        let old = self.order[row];
        self.order[row] = pattern;
        old
    }

    /// Insert an order row referencing `pattern` at `row`, shifting later
    /// rows down.
    pub fn insert_order(&mut self, row: usize, pattern: u8) {
        debug_assert!(row <= self.order.len());
        while self.patterns.len() <= pattern as usize {
            self.patterns.push(Pattern::new(self.default_pattern_len));
        }
        self.order.insert(row, pattern);
    }

    /// Remove an order row, returning the pattern number it referenced.
    /// The pattern itself stays in the pool.
    pub fn delete_order(&mut self, row: usize) -> u8 {
        debug_assert!(row < self.order.len());
        self.order.remove(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_track_has_one_order_row() {
        let track = Track::new(0, SoundSource::Fm, 0, 64);
        assert_eq!(track.order_list(), &[0]);
        assert_eq!(track.pattern_from_order(0).len(), 64);
    }

    #[test]
    fn register_grows_pattern_pool() {
        let mut track = Track::new(0, SoundSource::Ssg, 1, 16);
        let old = track.register_pattern_to_order(0, 7);
        assert_eq!(old, 0);
        assert_eq!(track.order_list(), &[7]);
        assert_eq!(track.pattern_from_order(0).len(), 16);
    }

    #[test]
    fn insert_and_delete_order_rows() {
        let mut track = Track::new(0, SoundSource::Fm, 0, 8);
        track.insert_order(1, 3);
        track.insert_order(1, 5);
        assert_eq!(track.order_list(), &[0, 5, 3]);

        let removed = track.delete_order(1);
        assert_eq!(removed, 5);
        assert_eq!(track.order_list(), &[0, 3]);
        // Pattern 5 survives in the pool.
        assert_eq!(track.pattern(5).len(), 8);
    }

    #[test]
    fn order_data_reports_row_and_pattern() {
        let mut track = Track::new(2, SoundSource::Drum, 4, 8);
        track.register_pattern_to_order(0, 2);
        let data = track.order_data(0);
        assert_eq!(data.row, 0);
        assert_eq!(data.pattern, 2);
        assert_eq!(data.attribute.number, 2);
    }
}
