//! Bidirectional sync between a text surface and a replicated sequence.
//!
//! Each observed change on one side is converted into the minimal ordered
//! set of single-character insert/delete operations against the other side.
//! Diffing always operates on full snapshots; no incremental diff state is
//! carried between passes. The `SyncGuard` serializes the two directions:
//! mutations a running pass applies fire change notifications back at the
//! bridge, and those are ignored while the guard is held.

use std::cell::RefCell;
use std::rc::Rc;

use tandem_editor_core::{
    ContentChange, EditOrigin, SpanKind, Subscription, TextSurface, diff_spans,
};

use crate::guard::{SyncDirection, SyncGuard};
use crate::sequence::ReplicatedSequence;

/// Outcome of a local-to-remote diff walk.
enum WalkOutcome {
    Clean,
    /// The sequence rejected an index mid-walk; re-reconcile from its
    /// current value.
    Reconcile,
}

struct BridgeInner<S, Q> {
    surface: Rc<S>,
    sequence: Rc<Q>,
    guard: SyncGuard,
    subs: RefCell<Vec<Subscription>>,
}

/// Keeps a `TextSurface` and a `ReplicatedSequence` eventually identical.
pub struct SyncBridge<S, Q>
where
    S: TextSurface + 'static,
    Q: ReplicatedSequence + 'static,
{
    inner: Rc<BridgeInner<S, Q>>,
}

impl<S, Q> SyncBridge<S, Q>
where
    S: TextSurface + 'static,
    Q: ReplicatedSequence + 'static,
{
    /// Bind a surface to a sequence: seed the surface with the sequence's
    /// current value, then subscribe both directions.
    pub fn bind(surface: Rc<S>, sequence: Rc<Q>) -> Self {
        surface.set_content(&sequence.value());

        let inner = Rc::new(BridgeInner {
            surface,
            sequence,
            guard: SyncGuard::new(),
            subs: RefCell::new(Vec::new()),
        });

        let weak = Rc::downgrade(&inner);
        let surface_sub = inner.surface.content_changes().subscribe(move |change| {
            if let Some(inner) = weak.upgrade() {
                inner.on_surface_change(change);
            }
        });

        let weak = Rc::downgrade(&inner);
        let sequence_sub = inner.sequence.changes().subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.sync_remote_to_local();
            }
        });

        inner.subs.borrow_mut().extend([surface_sub, sequence_sub]);
        Self { inner }
    }

    /// Revoke both subscriptions. Idempotent; no handler fires afterwards.
    pub fn unbind(&self) {
        self.inner.subs.borrow_mut().clear();
    }

    /// Check if the bridge is still bound.
    pub fn is_bound(&self) -> bool {
        !self.inner.subs.borrow().is_empty()
    }

    /// Force a full reconciliation from the sequence's current value.
    pub fn reconcile(&self) {
        self.inner.sync_remote_to_local();
    }
}

impl<S, Q> BridgeInner<S, Q>
where
    S: TextSurface + 'static,
    Q: ReplicatedSequence + 'static,
{
    fn on_surface_change(&self, _change: &ContentChange) {
        if !self.guard.try_begin(SyncDirection::LocalToRemote) {
            return;
        }
        let outcome = self.push_local_edits();
        self.guard.finish();

        if let WalkOutcome::Reconcile = outcome {
            // The sequence moved under us; its current value is
            // authoritative. Runs with the guard released so the
            // remote-to-local pass can start.
            self.sync_remote_to_local();
        }
    }

    /// Push surface edits into the sequence as per-char operations.
    fn push_local_edits(&self) -> WalkOutcome {
        let base = self.sequence.value();
        let current = self.surface.content();

        let mut pos = 0usize;
        for span in diff_spans(&base, &current) {
            match span.kind {
                SpanKind::Equal => pos += span.len,
                SpanKind::Delete => {
                    // Highest index first, so earlier removals do not shift
                    // the indices of the ones still pending.
                    for i in (0..span.len).rev() {
                        if let Err(err) = self.sequence.remove_at(pos + i) {
                            tracing::warn!(index = pos + i, %err, "sequence removal failed");
                            return WalkOutcome::Reconcile;
                        }
                    }
                }
                SpanKind::Insert => {
                    for ch in span.text.chars() {
                        if let Err(err) = self.sequence.insert_at(pos, ch) {
                            tracing::warn!(index = pos, %err, "sequence insert failed");
                            return WalkOutcome::Reconcile;
                        }
                        pos += 1;
                    }
                }
            }
        }
        WalkOutcome::Clean
    }

    fn sync_remote_to_local(&self) {
        if !self.guard.try_begin(SyncDirection::RemoteToLocal) {
            return;
        }
        self.pull_remote_value();
        self.guard.finish();
    }

    /// Pull the sequence's value into the surface, preserving the cursor's
    /// logical position across the applied spans.
    fn pull_remote_value(&self) {
        let old_text = self.surface.content();
        let new_text = self.sequence.value();
        if old_text == new_text {
            return;
        }

        let mut cursor_pos = self.surface.cursor().head;
        let mut pos = 0usize;
        for span in diff_spans(&old_text, &new_text) {
            match span.kind {
                SpanKind::Equal => pos += span.len,
                SpanKind::Delete => {
                    self.surface
                        .replace_range(pos..pos + span.len, "", EditOrigin::Remote);
                    if pos < cursor_pos {
                        // Stay attached to the same logical character; if it
                        // was deleted, land at the deletion point.
                        cursor_pos = cursor_pos.saturating_sub(span.len).max(pos);
                    }
                }
                SpanKind::Insert => {
                    self.surface
                        .replace_range(pos..pos, &span.text, EditOrigin::Remote);
                    if pos < cursor_pos {
                        cursor_pos += span.len;
                    }
                    pos += span.len;
                }
            }
        }
        self.surface.set_cursor(cursor_pos);
    }
}
