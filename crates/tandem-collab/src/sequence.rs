//! The replicated character sequence contract and engines.
//!
//! The sequence is a logically shared, conflict-free ordered list of
//! characters owned by the replication engine; replicas given the same set
//! of operations converge to the same value. The bridge observes and
//! mutates it only through this trait.

use std::cell::RefCell;

use loro::{LoroDoc, LoroText, VersionVector};
use tandem_editor_core::Notifier;

use crate::error::SequenceError;

/// Fired after any successful mutation of the sequence, from any replica
/// (including this one).
#[derive(Clone, Copy, Debug, Default)]
pub struct SequenceChanged;

/// A replicated ordered sequence of characters.
///
/// Mutators take `&self` (interior mutability); each successful mutation
/// emits on `changes()` before the mutator returns.
pub trait ReplicatedSequence {
    /// Current materialized value.
    fn value(&self) -> String;

    /// Length in chars.
    fn len(&self) -> usize;

    /// Check if empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert one char at `index` (0..=len).
    fn insert_at(&self, index: usize, ch: char) -> Result<(), SequenceError>;

    /// Remove the char at `index` (0..len).
    fn remove_at(&self, index: usize) -> Result<(), SequenceError>;

    /// Change notifications.
    fn changes(&self) -> &Notifier<SequenceChanged>;
}

/// In-memory sequence for tests and single-process hosting.
pub struct VecSequence {
    chars: RefCell<Vec<char>>,
    changes: Notifier<SequenceChanged>,
}

impl VecSequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::from_str("")
    }

    /// Create a sequence with initial content.
    pub fn from_str(text: &str) -> Self {
        Self {
            chars: RefCell::new(text.chars().collect()),
            changes: Notifier::new(),
        }
    }
}

impl Default for VecSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplicatedSequence for VecSequence {
    fn value(&self) -> String {
        self.chars.borrow().iter().collect()
    }

    fn len(&self) -> usize {
        self.chars.borrow().len()
    }

    fn insert_at(&self, index: usize, ch: char) -> Result<(), SequenceError> {
        {
            let mut chars = self.chars.borrow_mut();
            if index > chars.len() {
                return Err(SequenceError::OutOfRange {
                    index,
                    len: chars.len(),
                });
            }
            chars.insert(index, ch);
        }
        self.changes.emit(&SequenceChanged);
        Ok(())
    }

    fn remove_at(&self, index: usize) -> Result<(), SequenceError> {
        {
            let mut chars = self.chars.borrow_mut();
            if index >= chars.len() {
                return Err(SequenceError::OutOfRange {
                    index,
                    len: chars.len(),
                });
            }
            chars.remove(index);
        }
        self.changes.emit(&SequenceChanged);
        Ok(())
    }

    fn changes(&self) -> &Notifier<SequenceChanged> {
        &self.changes
    }
}

/// Loro-backed sequence adapter.
///
/// Wraps a `LoroDoc` with a text container. Remote updates arrive through
/// `import`, which fires the same change notification as a local mutation,
/// so the bridge reconciles both the same way.
pub struct LoroSequence {
    doc: LoroDoc,
    text: LoroText,
    changes: Notifier<SequenceChanged>,
}

impl LoroSequence {
    /// Create a new empty sequence.
    pub fn new() -> Self {
        let doc = LoroDoc::new();
        let text = doc.get_text("content");
        Self {
            doc,
            text,
            changes: Notifier::new(),
        }
    }

    /// Create a sequence from an existing Loro snapshot.
    pub fn from_snapshot(snapshot: &[u8]) -> Result<Self, SequenceError> {
        let doc = LoroDoc::new();
        doc.import(snapshot)?;
        let text = doc.get_text("content");
        Ok(Self {
            doc,
            text,
            changes: Notifier::new(),
        })
    }

    /// Get the underlying Loro document.
    pub fn doc(&self) -> &LoroDoc {
        &self.doc
    }

    /// Export full snapshot.
    pub fn export_snapshot(&self) -> Result<Vec<u8>, SequenceError> {
        self.doc
            .export(loro::ExportMode::Snapshot)
            .map_err(|e| SequenceError::Backend(e.to_string().into()))
    }

    /// Export updates since given version. Returns None if nothing changed.
    pub fn export_updates_since(&self, version: &VersionVector) -> Option<Vec<u8>> {
        use std::borrow::Cow;

        let current_vv = self.doc.oplog_vv();
        if *version == current_vv {
            return None;
        }

        let updates = self
            .doc
            .export(loro::ExportMode::Updates {
                from: Cow::Owned(version.clone()),
            })
            .ok()?;

        if updates.is_empty() {
            return None;
        }

        Some(updates)
    }

    /// Import remote changes and notify observers.
    pub fn import(&self, data: &[u8]) -> Result<(), SequenceError> {
        self.doc.import(data)?;
        self.changes.emit(&SequenceChanged);
        Ok(())
    }

    /// Get current version vector.
    pub fn version(&self) -> VersionVector {
        self.doc.oplog_vv()
    }
}

impl Default for LoroSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplicatedSequence for LoroSequence {
    fn value(&self) -> String {
        self.text.to_string()
    }

    fn len(&self) -> usize {
        self.text.len_unicode()
    }

    fn insert_at(&self, index: usize, ch: char) -> Result<(), SequenceError> {
        if index > self.text.len_unicode() {
            return Err(SequenceError::OutOfRange {
                index,
                len: self.text.len_unicode(),
            });
        }
        let mut buf = [0u8; 4];
        self.text.insert(index, ch.encode_utf8(&mut buf))?;
        self.changes.emit(&SequenceChanged);
        Ok(())
    }

    fn remove_at(&self, index: usize) -> Result<(), SequenceError> {
        if index >= self.text.len_unicode() {
            return Err(SequenceError::OutOfRange {
                index,
                len: self.text.len_unicode(),
            });
        }
        self.text.delete(index, 1)?;
        self.changes.emit(&SequenceChanged);
        Ok(())
    }

    fn changes(&self) -> &Notifier<SequenceChanged> {
        &self.changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn change_counter(seq: &impl ReplicatedSequence) -> (Rc<Cell<usize>>, tandem_editor_core::Subscription) {
        let count = Rc::new(Cell::new(0usize));
        let count2 = count.clone();
        let sub = seq.changes().subscribe(move |_| count2.set(count2.get() + 1));
        (count, sub)
    }

    #[test]
    fn test_vec_sequence_basics() {
        let seq = VecSequence::from_str("ac");
        let (count, _sub) = change_counter(&seq);

        seq.insert_at(1, 'b').unwrap();
        assert_eq!(seq.value(), "abc");
        seq.remove_at(0).unwrap();
        assert_eq!(seq.value(), "bc");
        assert_eq!(seq.len(), 2);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_vec_sequence_out_of_range() {
        let seq = VecSequence::from_str("ab");
        let (count, _sub) = change_counter(&seq);

        assert_eq!(
            seq.insert_at(3, 'x'),
            Err(SequenceError::OutOfRange { index: 3, len: 2 })
        );
        assert_eq!(
            seq.remove_at(2),
            Err(SequenceError::OutOfRange { index: 2, len: 2 })
        );
        // Failed mutations must not notify.
        assert_eq!(count.get(), 0);
        assert_eq!(seq.value(), "ab");
    }

    #[test]
    fn test_loro_sequence_basics() {
        let seq = LoroSequence::new();
        let (count, _sub) = change_counter(&seq);

        seq.insert_at(0, 'h').unwrap();
        seq.insert_at(1, 'i').unwrap();
        assert_eq!(seq.value(), "hi");
        seq.remove_at(0).unwrap();
        assert_eq!(seq.value(), "i");
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_loro_sequence_bounds() {
        let seq = LoroSequence::new();
        assert!(matches!(
            seq.remove_at(0),
            Err(SequenceError::OutOfRange { .. })
        ));
        assert!(matches!(
            seq.insert_at(1, 'x'),
            Err(SequenceError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_loro_snapshot_roundtrip() {
        let seq = LoroSequence::new();
        for (i, ch) in "snapshot".chars().enumerate() {
            seq.insert_at(i, ch).unwrap();
        }

        let snapshot = seq.export_snapshot().unwrap();
        let restored = LoroSequence::from_snapshot(&snapshot).unwrap();
        assert_eq!(restored.value(), "snapshot");
    }

    #[test]
    fn test_loro_update_exchange() {
        let a = LoroSequence::new();
        let b = LoroSequence::new();

        let base = b.version();
        a.insert_at(0, 'x').unwrap();
        a.insert_at(1, 'y').unwrap();

        let updates = a.export_updates_since(&base).expect("has updates");
        let (count, _sub) = change_counter(&b);
        b.import(&updates).unwrap();

        assert_eq!(b.value(), "xy");
        assert_eq!(count.get(), 1);

        // Nothing new to export once versions match.
        assert!(a.export_updates_since(&a.version()).is_none());
    }
}
