//! Span-diff primitive over full string snapshots.
//!
//! Compares two complete snapshots and produces an ordered list of
//! equal/delete/insert spans transforming the first into the second. The
//! strategy is common-prefix/common-suffix trimming with a delete+insert
//! middle: O(n) per comparison, no state carried between passes, and the
//! spans apply cleanly left to right. This trades span minimality for
//! obvious correctness, which is the right call for editor-scale documents
//! re-diffed on every change.
//!
//! All span lengths are in Unicode scalar values (chars).

use smol_str::SmolStr;

/// What a span does to the old snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpanKind {
    /// Text present in both snapshots.
    Equal,
    /// Text present only in the old snapshot.
    Delete,
    /// Text present only in the new snapshot.
    Insert,
}

/// One span of a diff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffSpan {
    /// Operation kind.
    pub kind: SpanKind,
    /// The span's text.
    pub text: SmolStr,
    /// Length of `text` in chars.
    pub len: usize,
}

/// Diff `old` against `new`, producing ordered spans.
///
/// Identical snapshots produce a single `Equal` span (or nothing, if both
/// are empty). Delete and insert spans for the same region appear with the
/// delete first.
pub fn diff_spans(old: &str, new: &str) -> Vec<DiffSpan> {
    let old_chars: Vec<char> = old.chars().collect();
    let new_chars: Vec<char> = new.chars().collect();

    let mut prefix = 0;
    while prefix < old_chars.len()
        && prefix < new_chars.len()
        && old_chars[prefix] == new_chars[prefix]
    {
        prefix += 1;
    }

    let mut suffix = 0;
    while suffix < old_chars.len() - prefix
        && suffix < new_chars.len() - prefix
        && old_chars[old_chars.len() - 1 - suffix] == new_chars[new_chars.len() - 1 - suffix]
    {
        suffix += 1;
    }

    let mut spans = Vec::with_capacity(4);
    push_span(&mut spans, SpanKind::Equal, &old_chars[..prefix]);
    push_span(
        &mut spans,
        SpanKind::Delete,
        &old_chars[prefix..old_chars.len() - suffix],
    );
    push_span(
        &mut spans,
        SpanKind::Insert,
        &new_chars[prefix..new_chars.len() - suffix],
    );
    push_span(&mut spans, SpanKind::Equal, &old_chars[old_chars.len() - suffix..]);
    spans
}

fn push_span(spans: &mut Vec<DiffSpan>, kind: SpanKind, chars: &[char]) {
    if chars.is_empty() {
        return;
    }
    spans.push(DiffSpan {
        kind,
        text: chars.iter().collect::<String>().into(),
        len: chars.len(),
    });
}
