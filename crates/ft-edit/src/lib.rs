//! Grid editing engine for the tracker: cursor navigation, rectangular
//! selection, step/order entry, and the text clipboard codec.
//!
//! The crate is UI-free. A host owns a [`Song`](ft_ir::Song) plus one
//! [`PatternEditSession`] and one [`OrderEditSession`], forwards input to
//! them, applies the returned [`EditOp`]s to its [`UndoStack`], and drains
//! [`EditorEvent`]s to keep companion views in sync.

mod clipboard;
mod entry;
mod event;
mod navigation;
mod ops;
mod order_session;
mod pattern_session;
mod position;
mod selection;

pub use clipboard::{
    copy_cells, paste_cells, ClipTag, ClipboardChannel, DecodeError, LocalClipboard, PasteError,
    PatternClip,
};
pub use event::EditorEvent;
pub use navigation::{clamp_position, column_distance, move_down, move_right, step_distance};
pub use ops::{EditOp, UndoStack};
pub use order_session::OrderEditSession;
pub use pattern_session::PatternEditSession;
pub use position::{OrderPosition, PatternPosition};
pub use selection::{OrderSelection, PatternSelection};
