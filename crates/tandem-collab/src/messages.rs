//! Wire format for presence gossip.

use serde::{Deserialize, Serialize};
use tandem_editor_core::CursorExtent;

/// Messages exchanged between peers over the presence gossip topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresenceMessage {
    /// Cursor/selection extent update.
    Cursor {
        /// The sender's current extent.
        extent: CursorExtent,
    },
}

impl PresenceMessage {
    /// Serialize message to postcard bytes for wire transmission.
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_stdvec(self)
    }

    /// Deserialize message from postcard bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}
