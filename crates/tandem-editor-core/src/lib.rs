//! tandem-editor-core: framework-agnostic editor surface primitives.
//!
//! This crate provides:
//! - `TextSurface` trait for the editable text surface
//! - `RopeSurface` - ropey-backed implementation
//! - `diff_spans` - span-diff primitive over full string snapshots
//! - `Notifier<T>` - typed notification channels with revocable subscriptions

pub mod diff;
pub mod event;
pub mod rope;
pub mod surface;
pub mod types;

pub use diff::{DiffSpan, SpanKind, diff_spans};
pub use event::{Notifier, Subscription};
pub use rope::{Marker, MarkerKind, RopeSurface};
pub use smol_str::SmolStr;
pub use surface::TextSurface;
pub use types::{ContentChange, CursorExtent, EditOrigin, MarkerId, MarkerStyle};
