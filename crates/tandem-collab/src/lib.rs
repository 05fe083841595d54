//! tandem-collab: collaborative editing sync core.
//!
//! This crate provides:
//! - `SyncBridge`: keeps a `TextSurface` and a `ReplicatedSequence`
//!   textually identical, in both directions, without feedback loops
//! - `PresenceChannel`: debounced cursor gossip and remote cursor markers
//! - `EditorBinding`: one-call session binding with idempotent teardown
//! - Sequence engines: `VecSequence` (in-memory) and `LoroSequence`
//!   (Loro CRDT adapter)
//! - `GossipHub`: in-process gossip fabric for tests and single-process use

mod binding;
mod bridge;
mod color;
mod error;
mod gossip;
mod guard;
mod messages;
mod presence;
mod sequence;

pub use binding::{DocKind, EditorBinding};
pub use bridge::SyncBridge;
pub use color::peer_color;
pub use error::{CollabError, SequenceError};
pub use gossip::{GossipEnvelope, GossipHub, GossipTopic, LocalTopic, PeerId};
pub use guard::{SyncDirection, SyncGuard};
pub use messages::PresenceMessage;
pub use presence::{CURSOR_DEBOUNCE_MS, PresenceChannel, PresenceConfig};
pub use sequence::{LoroSequence, ReplicatedSequence, SequenceChanged, VecSequence};

// Re-export Loro types that consumers need
pub use loro::{ExportMode, LoroDoc, LoroText, VersionVector};
