//! The editable text surface contract.
//!
//! The surface owns the text the user edits, the cursor, and any rendered
//! markers. Synchronization layers mutate it only through this trait (never
//! by wholesale replacement outside of `set_content` at bind time) so undo
//! history and rendering stay consistent.
//!
//! Mutators take `&self`: implementations are expected to use interior
//! mutability, and must release internal borrows before emitting change
//! notifications so handlers can re-enter the surface.

use std::ops::Range;

use crate::event::Notifier;
use crate::types::{ContentChange, CursorExtent, EditOrigin, MarkerId, MarkerStyle};

/// An editable text surface. All offsets are char offsets.
pub trait TextSurface {
    /// Full content as a string.
    fn content(&self) -> String;

    /// Total length in chars.
    fn len_chars(&self) -> usize;

    /// Replace the entire content. Bind-time only; emits a `Remote`-tagged
    /// change notification.
    fn set_content(&self, text: &str);

    /// Replace `char_range` with `text`, tagged with its origin.
    /// Out-of-bounds ranges are clamped to the current length.
    fn replace_range(&self, char_range: Range<usize>, text: &str, origin: EditOrigin);

    /// Current cursor/selection extent.
    fn cursor(&self) -> CursorExtent;

    /// Move the caret and collapse the selection. Emits cursor activity.
    fn set_cursor(&self, head: usize) {
        self.set_selection(CursorExtent::collapsed(head));
    }

    /// Set the full cursor/selection extent. Emits cursor activity.
    fn set_selection(&self, extent: CursorExtent);

    /// Content-change notifications, fired after every edit.
    fn content_changes(&self) -> &Notifier<ContentChange>;

    /// Cursor-activity notifications, fired after every cursor move.
    fn cursor_activity(&self) -> &Notifier<CursorExtent>;

    /// Draw a zero-width marker at `char_offset` (e.g. a remote caret).
    fn set_point_marker(&self, char_offset: usize, style: MarkerStyle) -> MarkerId;

    /// Draw a highlighted range marker over `char_range`.
    fn set_range_marker(&self, char_range: Range<usize>, style: MarkerStyle) -> MarkerId;

    /// Remove a previously drawn marker. Unknown ids are ignored.
    fn clear_marker(&self, id: MarkerId);
}
