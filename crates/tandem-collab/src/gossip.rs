//! Gossip topic contract and an in-process fabric.
//!
//! A gossip topic distributes ephemeral payloads to all current peers with
//! no delivery guarantees. Real deployments back this with a P2P swarm; the
//! `GossipHub` here wires peers together inside one process for tests and
//! single-process hosting. Like a real swarm, broadcasts are delivered to
//! every joined peer including the sender, so receivers must do their own
//! loopback suppression.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use smol_str::SmolStr;
use tandem_editor_core::Notifier;

/// Peer identity on the gossip fabric.
pub type PeerId = SmolStr;

/// A received gossip payload with its sender.
#[derive(Clone, Debug)]
pub struct GossipEnvelope {
    /// Opaque payload bytes.
    pub payload: Vec<u8>,
    /// Identity of the sending peer.
    pub sender: PeerId,
}

/// A joined gossip topic.
pub trait GossipTopic {
    /// Fire-and-forget broadcast to all current peers.
    fn broadcast(&self, payload: Vec<u8>);

    /// Incoming message notifications.
    fn messages(&self) -> &Notifier<GossipEnvelope>;
}

/// In-process gossip fabric connecting `LocalTopic` peers.
pub struct GossipHub {
    peers: RefCell<Vec<Weak<LocalTopic>>>,
}

impl GossipHub {
    /// Create an empty hub.
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            peers: RefCell::new(Vec::new()),
        })
    }

    /// Join the hub under a peer identity.
    pub fn join(self: &Rc<Self>, peer: impl Into<PeerId>) -> Rc<LocalTopic> {
        let topic = Rc::new(LocalTopic {
            hub: Rc::downgrade(self),
            peer: peer.into(),
            messages: Notifier::new(),
        });
        self.peers.borrow_mut().push(Rc::downgrade(&topic));
        topic
    }

    fn deliver(&self, envelope: &GossipEnvelope) {
        let topics: Vec<Rc<LocalTopic>> = {
            let mut peers = self.peers.borrow_mut();
            peers.retain(|p| p.strong_count() > 0);
            peers.iter().filter_map(Weak::upgrade).collect()
        };
        for topic in topics {
            topic.messages.emit(envelope);
        }
    }
}

/// One peer's handle on a `GossipHub` topic.
pub struct LocalTopic {
    hub: Weak<GossipHub>,
    peer: PeerId,
    messages: Notifier<GossipEnvelope>,
}

impl LocalTopic {
    /// The identity this topic was joined under.
    pub fn peer_id(&self) -> &PeerId {
        &self.peer
    }
}

impl GossipTopic for LocalTopic {
    fn broadcast(&self, payload: Vec<u8>) {
        if let Some(hub) = self.hub.upgrade() {
            hub.deliver(&GossipEnvelope {
                payload,
                sender: self.peer.clone(),
            });
        }
    }

    fn messages(&self) -> &Notifier<GossipEnvelope> {
        &self.messages
    }
}
