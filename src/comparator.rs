//! Comparator Module
//!
//! Total orderings over keys, plus two advisory key-shortening hooks used
//! by index structures to store shorter boundary keys.

use std::cmp::Ordering;

use crate::slice::Slice;

/// Ordering over keys.
///
/// The shortening hooks may leave their input unchanged; doing nothing is a
/// correct implementation.
pub trait Comparator: Send + Sync {
    /// Three-way comparison of `a` and `b`
    fn compare(&self, a: Slice<'_>, b: Slice<'_>) -> Ordering;

    /// Identifier persisted alongside data ordered by this comparator.
    /// Must change whenever the ordering of any two keys changes.
    fn name(&self) -> &'static str;

    /// If `start < limit`, shorten `start` to some key in `[start, limit)`.
    fn find_shortest_separator(&self, start: &mut Vec<u8>, limit: Slice<'_>);

    /// Shorten `key` to some key `>= key`.
    fn find_short_successor(&self, key: &mut Vec<u8>);
}

/// Lexicographic ordering on unsigned bytes
#[derive(Debug, Default, Clone, Copy)]
pub struct BytewiseComparator;

impl Comparator for BytewiseComparator {
    fn compare(&self, a: Slice<'_>, b: Slice<'_>) -> Ordering {
        a.compare(&b)
    }

    fn name(&self) -> &'static str {
        "leveldb.BytewiseComparator"
    }

    fn find_shortest_separator(&self, start: &mut Vec<u8>, limit: Slice<'_>) {
        let min_length = start.len().min(limit.size());
        let diff_index = start
            .iter()
            .zip(limit.iter())
            .take_while(|(a, b)| a == b)
            .count();

        if diff_index >= min_length {
            // One key is a prefix of the other
            return;
        }

        let diff_byte = start[diff_index];
        if diff_byte < 0xff && diff_byte + 1 < limit[diff_index] {
            start[diff_index] += 1;
            start.truncate(diff_index + 1);
            debug_assert_eq!(self.compare(Slice::from(&*start), limit), Ordering::Less);
        }
    }

    fn find_short_successor(&self, key: &mut Vec<u8>) {
        if let Some(i) = key.iter().position(|&byte| byte != 0xff) {
            key[i] += 1;
            key.truncate(i + 1);
        }
        // All 0xff: leave unchanged
    }
}

static BYTEWISE: BytewiseComparator = BytewiseComparator;

/// Shared bytewise comparator instance
pub fn bytewise_comparator() -> &'static dyn Comparator {
    &BYTEWISE
}
