//! Core surface types: cursor extents, edit tagging, and marker handles.
//!
//! All offsets are in Unicode scalar values (chars), not bytes.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Cursor and selection extent as char offsets.
///
/// `head` is where the caret is; `from`/`to` are the ordered bounds of the
/// selection. A collapsed selection has all three equal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorExtent {
    /// Caret position.
    pub head: usize,
    /// Selection start (lower bound).
    pub from: usize,
    /// Selection end (upper bound).
    pub to: usize,
}

impl CursorExtent {
    /// Create an extent with an explicit selection.
    pub fn new(head: usize, from: usize, to: usize) -> Self {
        Self { head, from, to }
    }

    /// Create a collapsed extent (caret only, no selection).
    pub fn collapsed(offset: usize) -> Self {
        Self {
            head: offset,
            from: offset,
            to: offset,
        }
    }

    /// Check if the selection is collapsed.
    pub fn is_collapsed(&self) -> bool {
        self.from == self.to
    }

    /// Selection length in chars.
    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    /// Check if the selection is empty (same as collapsed).
    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }
}

/// Who authored a range edit.
///
/// The surface's own bookkeeping (undo grouping, input handling) treats
/// `Remote` edits differently from user keystrokes; the tag rides along on
/// every `replace_range` call and on the resulting change notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOrigin {
    /// Typed or otherwise produced by the local user.
    User,
    /// Applied by the sync layer on behalf of a replicated change.
    Remote,
}

/// Payload of a content-change notification.
#[derive(Clone, Copy, Debug)]
pub struct ContentChange {
    /// Origin of the edit that produced this change.
    pub origin: EditOrigin,
}

/// Handle to a rendered marker, valid until cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MarkerId(pub u64);

/// Visual style for a marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerStyle {
    /// RGBA color.
    pub color: u32,
    /// Optional hover title (e.g. the owning peer's identity).
    pub title: Option<SmolStr>,
}

impl MarkerStyle {
    /// Style with a color and no title.
    pub fn color(color: u32) -> Self {
        Self { color, title: None }
    }
}
