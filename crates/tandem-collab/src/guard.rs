//! Reentrancy guard for synchronization passes.
//!
//! Applying a diff to one side of the bridge fires that side's change
//! notification back at us; the guard makes the running pass the single
//! source of truth for that instant. It is an explicit state machine:
//! `Idle -> LocalToRemote -> Idle` and `Idle -> RemoteToLocal -> Idle`, with
//! attempted transitions from a non-idle state rejected rather than racing.

use std::cell::Cell;

/// Direction of an in-flight synchronization pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncDirection {
    /// Surface edits being pushed into the replicated sequence.
    LocalToRemote,
    /// Sequence state being pulled into the surface.
    RemoteToLocal,
}

/// Per-document mutual exclusion for sync passes.
#[derive(Debug, Default)]
pub struct SyncGuard {
    active: Cell<Option<SyncDirection>>,
}

impl SyncGuard {
    /// Create an idle guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// The direction currently in flight, if any.
    pub fn active(&self) -> Option<SyncDirection> {
        self.active.get()
    }

    /// Check if no pass is in flight.
    pub fn is_idle(&self) -> bool {
        self.active.get().is_none()
    }

    /// Try to start a pass. Returns false (and changes nothing) if a pass in
    /// either direction is already in flight.
    #[must_use]
    pub fn try_begin(&self, direction: SyncDirection) -> bool {
        if self.active.get().is_some() {
            return false;
        }
        self.active.set(Some(direction));
        true
    }

    /// End the in-flight pass.
    pub fn finish(&self) {
        self.active.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        let guard = SyncGuard::new();
        assert!(guard.is_idle());
        assert_eq!(guard.active(), None);
    }

    #[test]
    fn test_begin_and_finish() {
        let guard = SyncGuard::new();
        assert!(guard.try_begin(SyncDirection::LocalToRemote));
        assert_eq!(guard.active(), Some(SyncDirection::LocalToRemote));
        guard.finish();
        assert!(guard.is_idle());
    }

    #[test]
    fn test_rejects_while_held() {
        let guard = SyncGuard::new();
        assert!(guard.try_begin(SyncDirection::RemoteToLocal));

        // Same and opposite directions are both rejected.
        assert!(!guard.try_begin(SyncDirection::RemoteToLocal));
        assert!(!guard.try_begin(SyncDirection::LocalToRemote));
        assert_eq!(guard.active(), Some(SyncDirection::RemoteToLocal));

        guard.finish();
        assert!(guard.try_begin(SyncDirection::LocalToRemote));
    }
}
