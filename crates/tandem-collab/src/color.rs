//! Deterministic per-peer display colors.
//!
//! The color is a pure function of the peer identity: the same peer gets
//! the same color for the whole session on every replica, and distinct
//! peers land on distinct hues with high probability. Saturation and
//! lightness are fixed at readable, pastel-ish values.

/// Derive a stable RGBA color from a peer identity.
pub fn peer_color(peer: &str) -> u32 {
    let hash = blake3::hash(peer.as_bytes());
    let bytes = hash.as_bytes();
    let hue = (u16::from_le_bytes([bytes[0], bytes[1]]) % 360) as f32;
    hsl_to_rgba(hue, 0.62, 0.58)
}

/// Convert HSL (h in degrees, s/l in 0..=1) to packed RGBA with full alpha.
fn hsl_to_rgba(h: f32, s: f32, l: f32) -> u32 {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h as u32 {
        0..60 => (c, x, 0.0),
        60..120 => (x, c, 0.0),
        120..180 => (0.0, c, x),
        180..240 => (0.0, x, c),
        240..300 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let to_byte = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u32;
    (to_byte(r) << 24) | (to_byte(g) << 16) | (to_byte(b) << 8) | 0xFF
}
