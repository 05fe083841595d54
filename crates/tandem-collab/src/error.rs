//! Error types for the sync core.

use smol_str::SmolStr;
use thiserror::Error;

use crate::binding::DocKind;

/// Errors surfaced to the embedder.
///
/// Content-level faults are not represented here: an out-of-range sequence
/// mutation is self-healed by re-diffing against authoritative state, and a
/// malformed gossip payload is dropped.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CollabError {
    /// The document kind cannot be synchronized. Fatal at bind time; this is
    /// a programming error, not a runtime condition.
    #[error("unsupported document kind: {0:?}")]
    UnsupportedDocKind(DocKind),
}

/// Errors from a replicated sequence mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// The index is no longer valid, typically because of a concurrent
    /// remote mutation.
    #[error("index {index} out of range for sequence of length {len}")]
    OutOfRange { index: usize, len: usize },

    /// The replication engine rejected the operation.
    #[error("sequence backend error: {0}")]
    Backend(SmolStr),
}

impl From<loro::LoroError> for SequenceError {
    fn from(e: loro::LoroError) -> Self {
        SequenceError::Backend(e.to_string().into())
    }
}
