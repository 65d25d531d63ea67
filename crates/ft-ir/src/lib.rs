//! Score data model for the ferrotracker editor.
//!
//! This crate owns the persistent musical data: songs, tracks, order
//! lists, and patterns of five-cell steps. The editing session crate
//! (`ft-edit`) drives everything through the query/mutation surface on
//! [`Song`] and never touches storage directly.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod pattern;
mod song;
mod track;

pub use pattern::{CellField, CellValue, Note, Pattern, Step, FIELDS_PER_TRACK};
pub use song::{ErasedCell, Song, DEFAULT_PATTERN_LEN};
pub use track::{OrderData, SoundSource, Track, TrackAttribute, MAX_PATTERNS};

/// A query or mutation addressed a coordinate outside the score's current
/// shape (stale track/order/step after an external edit).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutOfRangeError;

impl core::fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("position is outside the score's current shape")
    }
}

impl core::error::Error for OutOfRangeError {}
