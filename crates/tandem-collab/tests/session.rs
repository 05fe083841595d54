//! End-to-end session tests: two editors sharing one document.

use std::rc::Rc;
use std::time::Duration;

use tandem_collab::{
    CURSOR_DEBOUNCE_MS, DocKind, EditorBinding, GossipHub, PeerId, PresenceConfig,
    ReplicatedSequence, SyncBridge, VecSequence,
};
use tandem_editor_core::{CursorExtent, EditOrigin, RopeSurface, TextSurface};
use web_time::Instant;

fn past_deadline() -> Instant {
    Instant::now() + Duration::from_millis(CURSOR_DEBOUNCE_MS + 500)
}

/// Two surfaces bound to the same in-process sequence behave like two
/// replicas with instant delivery: an edit on either side shows up on the
/// other.
#[test]
fn two_editors_converge_through_shared_sequence() {
    let sequence = Rc::new(VecSequence::from_str("# Notes\n"));
    let alice = Rc::new(RopeSurface::new());
    let bob = Rc::new(RopeSurface::new());

    let _bridge_a = SyncBridge::bind(alice.clone(), sequence.clone());
    let _bridge_b = SyncBridge::bind(bob.clone(), sequence.clone());

    assert_eq!(alice.content(), "# Notes\n");
    assert_eq!(bob.content(), "# Notes\n");

    let end = alice.len_chars();
    alice.replace_range(end..end, "alice was here\n", EditOrigin::User);
    assert_eq!(bob.content(), "# Notes\nalice was here\n");

    bob.replace_range(0..1, "##", EditOrigin::User);
    assert_eq!(alice.content(), "## Notes\nalice was here\n");
    assert_eq!(alice.content(), sequence.value());
}

#[test]
fn remote_typing_does_not_displace_local_cursor() {
    let sequence = Rc::new(VecSequence::from_str("alpha beta"));
    let alice = Rc::new(RopeSurface::new());
    let bob = Rc::new(RopeSurface::new());
    let _bridge_a = SyncBridge::bind(alice.clone(), sequence.clone());
    let _bridge_b = SyncBridge::bind(bob.clone(), sequence.clone());

    // Alice is editing at the end while Bob types at the start.
    alice.set_cursor(10);
    bob.replace_range(0..0, ">> ", EditOrigin::User);

    assert_eq!(alice.content(), ">> alpha beta");
    assert_eq!(alice.cursor().head, 13);
}

#[test]
fn full_binding_session_with_presence() {
    let hub = GossipHub::new();
    let sequence = Rc::new(VecSequence::from_str("draft"));

    let alice_surface = Rc::new(RopeSurface::new());
    let alice = EditorBinding::bind(
        DocKind::Markdown,
        alice_surface.clone(),
        sequence.clone(),
        hub.join("alice"),
        "alice".into(),
        PresenceConfig::default(),
    )
    .unwrap();

    let bob_surface = Rc::new(RopeSurface::new());
    let bob = EditorBinding::bind(
        DocKind::Markdown,
        bob_surface.clone(),
        sequence.clone(),
        hub.join("bob"),
        "bob".into(),
        PresenceConfig::default(),
    )
    .unwrap();

    // Content syncs both ways.
    alice_surface.replace_range(5..5, "!", EditOrigin::User);
    assert_eq!(bob_surface.content(), "draft!");

    // Alice selects a word; after the debounce window Bob sees her markers.
    alice_surface.set_selection(CursorExtent::new(5, 0, 5));
    alice.tick(past_deadline());

    assert_eq!(bob_surface.marker_count(), 2);
    assert_eq!(bob.presence().peers(), vec![PeerId::from("alice")]);
    // Loopback: Alice draws nothing for herself.
    assert_eq!(alice_surface.marker_count(), 0);

    // Teardown stops both halves.
    alice.unbind();
    alice_surface.replace_range(0..0, "x", EditOrigin::User);
    assert_eq!(sequence.value(), "draft!");

    bob.unbind();
}
