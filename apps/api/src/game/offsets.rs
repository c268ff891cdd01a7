//! Offset annotation — places each reported error's `original_text` in the article.
//!
//! Errors are placed greedily in input order. Each one claims the leftmost
//! occurrence of its text that does not overlap a span claimed by an earlier
//! error; if no such occurrence exists it gets the `(-1, -1)` sentinel and
//! claims nothing. Spans are measured in `char`s from the start of the article.
//!
//! Worst case is O(errors × article length) substring probes. Articles are
//! capped at about 1000 words and carry tens of errors, so the search is left
//! unbounded.

use std::ops::Range;

use tracing::warn;

use crate::models::{ErrorDescriptor, ErrorRecord};

/// Attaches non-overlapping spans to `descriptors`, preserving their order.
pub fn annotate(article: &str, descriptors: Vec<ErrorDescriptor>) -> Vec<ErrorRecord> {
    let mut claimed: Vec<Range<usize>> = Vec::with_capacity(descriptors.len());

    descriptors
        .into_iter()
        .map(|descriptor| match claim_span(article, &descriptor.original_text, &claimed) {
            Some(span) => {
                let start = char_offset(article, span.start);
                let end = start + descriptor.original_text.chars().count();
                claimed.push(span);
                ErrorRecord::located(descriptor, start, end)
            }
            None => {
                warn!(
                    "Could not place error {:?}: {:?}",
                    descriptor.id, descriptor.original_text
                );
                ErrorRecord::unlocated(descriptor)
            }
        })
        .collect()
}

/// Finds the leftmost byte range of `needle` in `haystack` that overlaps
/// none of `claimed`. Empty needles never match.
fn claim_span(haystack: &str, needle: &str, claimed: &[Range<usize>]) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }

    let mut from = 0;
    while let Some(found) = haystack[from..].find(needle) {
        let start = from + found;
        let candidate = start..start + needle.len();
        if !claimed.iter().any(|c| overlaps(&candidate, c)) {
            return Some(candidate);
        }
        // Resume one character past this occurrence's start.
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

/// A candidate overlaps a claimed span if it starts inside it, ends inside it,
/// or contains it entirely.
fn overlaps(candidate: &Range<usize>, claimed: &Range<usize>) -> bool {
    let starts_inside = candidate.start >= claimed.start && candidate.start < claimed.end;
    let ends_inside = candidate.end > claimed.start && candidate.end <= claimed.end;
    let contains = candidate.start <= claimed.start && candidate.end >= claimed.end;
    starts_inside || ends_inside || contains
}

/// Converts a byte index on a char boundary into a char index.
fn char_offset(text: &str, byte_index: usize) -> usize {
    text[..byte_index].chars().count()
}
