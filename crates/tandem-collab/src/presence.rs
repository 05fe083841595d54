//! Presence gossip channel: debounced cursor broadcast and remote markers.
//!
//! Cursor movement is high-frequency and low-value per event, so local
//! activity is coalesced by a restartable debounce window before it is
//! broadcast. Incoming extents are rendered as a caret marker plus a
//! selection-range marker, replacing whatever was previously drawn for that
//! sender. Markers are never proactively expired: peer-departure cleanup is
//! an extension point fed by an external membership signal.
//!
//! The core is single-threaded, so the channel owns the debounce deadline
//! and the host pumps `tick(now)` from its timer loop.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use tandem_editor_core::{CursorExtent, MarkerId, MarkerStyle, Subscription, TextSurface};
use web_time::Instant;

use crate::color::peer_color;
use crate::gossip::{GossipEnvelope, GossipTopic, PeerId};
use crate::messages::PresenceMessage;

/// Default debounce window for cursor-activity broadcasts (ms).
pub const CURSOR_DEBOUNCE_MS: u64 = 2000;

/// Tunables for the presence channel.
#[derive(Clone, Debug)]
pub struct PresenceConfig {
    /// Debounce window; restarts on every new cursor activity.
    pub cursor_debounce: Duration,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            cursor_debounce: Duration::from_millis(CURSOR_DEBOUNCE_MS),
        }
    }
}

struct PeerMarkers {
    caret: MarkerId,
    selection: MarkerId,
}

struct PresenceState {
    markers: HashMap<PeerId, PeerMarkers>,
    /// Coalesced extent and the deadline at which to broadcast it.
    pending: Option<(CursorExtent, Instant)>,
}

struct PresenceInner<S, G> {
    surface: Rc<S>,
    topic: Rc<G>,
    local_id: PeerId,
    config: PresenceConfig,
    state: RefCell<PresenceState>,
    subs: RefCell<Vec<Subscription>>,
}

/// Broadcasts the local cursor extent and renders remote ones.
pub struct PresenceChannel<S, G>
where
    S: TextSurface + 'static,
    G: GossipTopic + 'static,
{
    inner: Rc<PresenceInner<S, G>>,
}

impl<S, G> PresenceChannel<S, G>
where
    S: TextSurface + 'static,
    G: GossipTopic + 'static,
{
    /// Attach to a surface and a gossip topic under the local identity.
    pub fn new(surface: Rc<S>, topic: Rc<G>, local_id: PeerId, config: PresenceConfig) -> Self {
        let inner = Rc::new(PresenceInner {
            surface,
            topic,
            local_id,
            config,
            state: RefCell::new(PresenceState {
                markers: HashMap::new(),
                pending: None,
            }),
            subs: RefCell::new(Vec::new()),
        });

        let weak = Rc::downgrade(&inner);
        let activity_sub = inner.surface.cursor_activity().subscribe(move |extent| {
            if let Some(inner) = weak.upgrade() {
                inner.note_activity(*extent);
            }
        });

        let weak = Rc::downgrade(&inner);
        let message_sub = inner.topic.messages().subscribe(move |envelope| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_message(envelope);
            }
        });

        inner.subs.borrow_mut().extend([activity_sub, message_sub]);
        Self { inner }
    }

    /// Broadcast the coalesced extent if its debounce deadline has passed.
    /// Call from the host's timer loop.
    pub fn tick(&self, now: Instant) {
        self.inner.flush_due(now);
    }

    /// Revoke subscriptions and drop any pending broadcast. Idempotent; no
    /// handler fires afterwards.
    pub fn detach(&self) {
        self.inner.subs.borrow_mut().clear();
        self.inner.state.borrow_mut().pending = None;
    }

    /// Peers that currently have markers drawn, in no particular order.
    pub fn peers(&self) -> Vec<PeerId> {
        self.inner.state.borrow().markers.keys().cloned().collect()
    }
}

impl<S, G> PresenceInner<S, G>
where
    S: TextSurface + 'static,
    G: GossipTopic + 'static,
{
    fn note_activity(&self, extent: CursorExtent) {
        let deadline = Instant::now() + self.config.cursor_debounce;
        self.state.borrow_mut().pending = Some((extent, deadline));
    }

    fn flush_due(&self, now: Instant) {
        let due = {
            let mut state = self.state.borrow_mut();
            match state.pending {
                Some((extent, deadline)) if now >= deadline => {
                    state.pending = None;
                    Some(extent)
                }
                _ => None,
            }
        };

        if let Some(extent) = due {
            match (PresenceMessage::Cursor { extent }).to_bytes() {
                Ok(bytes) => self.topic.broadcast(bytes),
                Err(err) => tracing::warn!(%err, "failed to encode cursor broadcast"),
            }
        }
    }

    fn handle_message(&self, envelope: &GossipEnvelope) {
        if envelope.sender == self.local_id {
            return;
        }

        let message = match PresenceMessage::from_bytes(&envelope.payload) {
            Ok(message) => message,
            Err(err) => {
                // Best-effort channel: a malformed payload costs at most a
                // stale marker.
                tracing::debug!(sender = %envelope.sender, %err, "ignoring malformed presence payload");
                return;
            }
        };

        let PresenceMessage::Cursor { extent } = message;
        self.render_peer_cursor(&envelope.sender, extent);
    }

    fn render_peer_cursor(&self, sender: &PeerId, extent: CursorExtent) {
        let previous = self.state.borrow_mut().markers.remove(sender);
        if let Some(previous) = previous {
            self.surface.clear_marker(previous.caret);
            self.surface.clear_marker(previous.selection);
        }

        let color = peer_color(sender);
        let caret = self
            .surface
            .set_point_marker(extent.head, MarkerStyle::color(color));
        let selection = self.surface.set_range_marker(
            extent.from..extent.to,
            MarkerStyle {
                color,
                title: Some(sender.clone()),
            },
        );

        self.state
            .borrow_mut()
            .markers
            .insert(sender.clone(), PeerMarkers { caret, selection });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gossip::GossipHub;
    use std::cell::Cell;
    use tandem_editor_core::RopeSurface;

    fn channel_on(
        hub: &Rc<GossipHub>,
        peer: &str,
        text: &str,
    ) -> (Rc<RopeSurface>, Rc<crate::gossip::LocalTopic>, PresenceChannel<RopeSurface, crate::gossip::LocalTopic>) {
        let surface = Rc::new(RopeSurface::from_str(text));
        let topic = hub.join(peer);
        let channel = PresenceChannel::new(
            surface.clone(),
            topic.clone(),
            peer.into(),
            PresenceConfig::default(),
        );
        (surface, topic, channel)
    }

    fn past_deadline() -> Instant {
        Instant::now() + Duration::from_millis(CURSOR_DEBOUNCE_MS + 500)
    }

    #[test]
    fn test_debounce_coalesces_to_one_broadcast() {
        let hub = GossipHub::new();
        let (surface_a, topic_a, channel_a) = channel_on(&hub, "alice", "hello world");
        let (_surface_b, _topic_b, _channel_b) = channel_on(&hub, "bob", "hello world");

        let broadcasts = Rc::new(Cell::new(0usize));
        let broadcasts2 = broadcasts.clone();
        let _count_sub = topic_a
            .messages()
            .subscribe(move |_| broadcasts2.set(broadcasts2.get() + 1));

        // Rapid cursor movement: only the last extent survives the window.
        surface_a.set_cursor(1);
        surface_a.set_cursor(2);
        surface_a.set_cursor(5);

        // Before the deadline nothing goes out.
        channel_a.tick(Instant::now());
        assert_eq!(broadcasts.get(), 0);

        channel_a.tick(past_deadline());
        assert_eq!(broadcasts.get(), 1);

        // Nothing pending afterwards.
        channel_a.tick(past_deadline());
        assert_eq!(broadcasts.get(), 1);
    }

    #[test]
    fn test_broadcast_carries_last_extent() {
        let hub = GossipHub::new();
        let (surface_a, _topic_a, channel_a) = channel_on(&hub, "alice", "hello world");
        let (surface_b, _topic_b, _channel_b) = channel_on(&hub, "bob", "hello world");

        surface_a.set_cursor(1);
        surface_a.set_selection(CursorExtent::new(7, 3, 7));
        channel_a.tick(past_deadline());

        let markers = surface_b.markers();
        assert_eq!(markers.len(), 2);
        let kinds: Vec<_> = markers.into_iter().map(|(_, m)| m.kind).collect();
        assert!(kinds.contains(&tandem_editor_core::MarkerKind::Point { char_offset: 7 }));
        assert!(kinds.contains(&tandem_editor_core::MarkerKind::Range { char_range: 3..7 }));
    }

    #[test]
    fn test_loopback_suppressed() {
        let hub = GossipHub::new();
        let (surface_a, _topic_a, channel_a) = channel_on(&hub, "alice", "text");

        surface_a.set_cursor(2);
        channel_a.tick(past_deadline());

        // Alice receives her own envelope from the hub but draws nothing.
        assert_eq!(surface_a.marker_count(), 0);
        assert!(channel_a.peers().is_empty());
    }

    #[test]
    fn test_markers_replaced_per_sender() {
        let hub = GossipHub::new();
        let (surface_a, _topic_a, channel_a) = channel_on(&hub, "alice", "0123456789");
        let (surface_b, _topic_b, channel_b) = channel_on(&hub, "bob", "0123456789");

        surface_a.set_cursor(3);
        channel_a.tick(past_deadline());
        assert_eq!(surface_b.marker_count(), 2);

        surface_a.set_cursor(8);
        channel_a.tick(past_deadline());

        // Still exactly one marker pair for alice.
        assert_eq!(surface_b.marker_count(), 2);
        assert_eq!(channel_b.peers(), vec![PeerId::from("alice")]);
        let kinds: Vec<_> = surface_b.markers().into_iter().map(|(_, m)| m.kind).collect();
        assert!(kinds.contains(&tandem_editor_core::MarkerKind::Point { char_offset: 8 }));
    }

    #[test]
    fn test_malformed_payload_ignored() {
        let hub = GossipHub::new();
        let (surface_b, _topic_b, _channel_b) = channel_on(&hub, "bob", "text");
        let mallory = hub.join("mallory");

        mallory.broadcast(vec![0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(surface_b.marker_count(), 0);
    }

    #[test]
    fn test_detach_cancels_pending_and_unsubscribes() {
        let hub = GossipHub::new();
        let (surface_a, topic_a, channel_a) = channel_on(&hub, "alice", "text");

        let broadcasts = Rc::new(Cell::new(0usize));
        let broadcasts2 = broadcasts.clone();
        let _count_sub = topic_a
            .messages()
            .subscribe(move |_| broadcasts2.set(broadcasts2.get() + 1));

        surface_a.set_cursor(1);
        channel_a.detach();
        channel_a.detach();
        channel_a.tick(past_deadline());
        assert_eq!(broadcasts.get(), 0);
    }

    #[test]
    fn test_marker_colors_stable_per_peer() {
        let hub = GossipHub::new();
        let (surface_a, _topic_a, channel_a) = channel_on(&hub, "alice", "0123456789");
        let (surface_b, _topic_b, _channel_b) = channel_on(&hub, "bob", "0123456789");

        surface_a.set_cursor(1);
        channel_a.tick(past_deadline());
        let first: Vec<u32> = surface_b.markers().iter().map(|(_, m)| m.style.color).collect();

        surface_a.set_cursor(4);
        channel_a.tick(past_deadline());
        let second: Vec<u32> = surface_b.markers().iter().map(|(_, m)| m.style.color).collect();

        assert_eq!(first, second);
        assert_eq!(first[0], crate::color::peer_color("alice"));
    }
}
