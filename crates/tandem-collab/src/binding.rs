//! One-call binding of a document session.
//!
//! Composes the sync bridge and the presence channel over the same surface,
//! with a single idempotent teardown.

use std::rc::Rc;

use tandem_editor_core::TextSurface;
use web_time::Instant;

use crate::bridge::SyncBridge;
use crate::error::CollabError;
use crate::gossip::{GossipTopic, PeerId};
use crate::presence::{PresenceChannel, PresenceConfig};
use crate::sequence::ReplicatedSequence;

/// The kind of document being bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocKind {
    /// Plain-text/markdown content; synchronized per character.
    Markdown,
    /// Structured rich text; not synchronizable by this core.
    RichText,
}

/// A bound editing session: sync bridge plus presence channel.
pub struct EditorBinding<S, Q, G>
where
    S: TextSurface + 'static,
    Q: ReplicatedSequence + 'static,
    G: GossipTopic + 'static,
{
    bridge: SyncBridge<S, Q>,
    presence: PresenceChannel<S, G>,
}

impl<S, Q, G> EditorBinding<S, Q, G>
where
    S: TextSurface + 'static,
    Q: ReplicatedSequence + 'static,
    G: GossipTopic + 'static,
{
    /// Bind a surface to a replicated sequence and a presence topic.
    ///
    /// Binding an unsupported `DocKind` is a programming error and fails
    /// immediately.
    pub fn bind(
        kind: DocKind,
        surface: Rc<S>,
        sequence: Rc<Q>,
        topic: Rc<G>,
        local_id: PeerId,
        config: PresenceConfig,
    ) -> Result<Self, CollabError> {
        match kind {
            DocKind::Markdown => {}
            other => return Err(CollabError::UnsupportedDocKind(other)),
        }

        let bridge = SyncBridge::bind(surface.clone(), sequence);
        let presence = PresenceChannel::new(surface, topic, local_id, config);
        Ok(Self { bridge, presence })
    }

    /// The sync bridge half.
    pub fn bridge(&self) -> &SyncBridge<S, Q> {
        &self.bridge
    }

    /// The presence half.
    pub fn presence(&self) -> &PresenceChannel<S, G> {
        &self.presence
    }

    /// Pump the presence debounce timer.
    pub fn tick(&self, now: Instant) {
        self.presence.tick(now);
    }

    /// Tear the whole session down. Idempotent; no handler fires afterwards.
    pub fn unbind(&self) {
        self.bridge.unbind();
        self.presence.detach();
    }
}
