//! Ropey-backed reference implementation of `TextSurface`.
//!
//! Suitable for tests and for embedders without a GUI toolkit. Markers are
//! kept in an inspectable map rather than rendered.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::Range;

use ropey::Rope;

use crate::event::Notifier;
use crate::surface::TextSurface;
use crate::types::{ContentChange, CursorExtent, EditOrigin, MarkerId, MarkerStyle};

/// Where a marker is anchored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkerKind {
    /// Zero-width marker at a char offset.
    Point { char_offset: usize },
    /// Highlighted char range.
    Range { char_range: Range<usize> },
}

/// A recorded marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub style: MarkerStyle,
}

struct RopeInner {
    rope: Rope,
    cursor: CursorExtent,
    next_marker_id: u64,
    markers: HashMap<MarkerId, Marker>,
}

/// In-memory text surface backed by a rope.
pub struct RopeSurface {
    inner: RefCell<RopeInner>,
    content_changes: Notifier<ContentChange>,
    cursor_activity: Notifier<CursorExtent>,
}

impl RopeSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::from_str("")
    }

    /// Create a surface with initial content.
    pub fn from_str(text: &str) -> Self {
        Self {
            inner: RefCell::new(RopeInner {
                rope: Rope::from_str(text),
                cursor: CursorExtent::default(),
                next_marker_id: 0,
                markers: HashMap::new(),
            }),
            content_changes: Notifier::new(),
            cursor_activity: Notifier::new(),
        }
    }

    /// Snapshot of all live markers, for inspection.
    pub fn markers(&self) -> Vec<(MarkerId, Marker)> {
        let inner = self.inner.borrow();
        let mut markers: Vec<_> = inner
            .markers
            .iter()
            .map(|(id, m)| (*id, m.clone()))
            .collect();
        markers.sort_by_key(|(id, _)| id.0);
        markers
    }

    /// Number of live markers.
    pub fn marker_count(&self) -> usize {
        self.inner.borrow().markers.len()
    }
}

impl Default for RopeSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSurface for RopeSurface {
    fn content(&self) -> String {
        self.inner.borrow().rope.to_string()
    }

    fn len_chars(&self) -> usize {
        self.inner.borrow().rope.len_chars()
    }

    fn set_content(&self, text: &str) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.rope = Rope::from_str(text);
            let len = inner.rope.len_chars();
            let head = inner.cursor.head.min(len);
            inner.cursor = CursorExtent::collapsed(head);
        }
        self.content_changes.emit(&ContentChange {
            origin: EditOrigin::Remote,
        });
    }

    fn replace_range(&self, char_range: Range<usize>, text: &str, origin: EditOrigin) {
        {
            let mut inner = self.inner.borrow_mut();
            let len = inner.rope.len_chars();
            let start = char_range.start.min(len);
            let end = char_range.end.min(len).max(start);
            if (start, end) != (char_range.start, char_range.end) {
                tracing::trace!(?char_range, len, "edit range clamped to document bounds");
            }
            inner.rope.remove(start..end);
            inner.rope.insert(start, text);
        }
        // Borrow released first: handlers may re-enter the surface.
        self.content_changes.emit(&ContentChange { origin });
    }

    fn cursor(&self) -> CursorExtent {
        self.inner.borrow().cursor
    }

    fn set_selection(&self, extent: CursorExtent) {
        let clamped = {
            let mut inner = self.inner.borrow_mut();
            let len = inner.rope.len_chars();
            let clamped = CursorExtent {
                head: extent.head.min(len),
                from: extent.from.min(len),
                to: extent.to.min(len),
            };
            inner.cursor = clamped;
            clamped
        };
        self.cursor_activity.emit(&clamped);
    }

    fn content_changes(&self) -> &Notifier<ContentChange> {
        &self.content_changes
    }

    fn cursor_activity(&self) -> &Notifier<CursorExtent> {
        &self.cursor_activity
    }

    fn set_point_marker(&self, char_offset: usize, style: MarkerStyle) -> MarkerId {
        let mut inner = self.inner.borrow_mut();
        let id = MarkerId(inner.next_marker_id);
        inner.next_marker_id += 1;
        inner.markers.insert(
            id,
            Marker {
                kind: MarkerKind::Point { char_offset },
                style,
            },
        );
        id
    }

    fn set_range_marker(&self, char_range: Range<usize>, style: MarkerStyle) -> MarkerId {
        let mut inner = self.inner.borrow_mut();
        let id = MarkerId(inner.next_marker_id);
        inner.next_marker_id += 1;
        inner.markers.insert(
            id,
            Marker {
                kind: MarkerKind::Range { char_range },
                style,
            },
        );
        id
    }

    fn clear_marker(&self, id: MarkerId) {
        self.inner.borrow_mut().markers.remove(&id);
    }
}
