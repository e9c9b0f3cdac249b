//! Slice Module
//!
//! A non-owning, immutable view over a byte range.
//!
//! `Slice` is the common currency between the arena's callers, status
//! messages, and comparators. It never owns data; the borrow checker ties
//! it to whatever buffer it was created from.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

use bytes::Bytes;

/// Borrowed `(pointer, length)` view over bytes
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slice<'a> {
    data: &'a [u8],
}

impl<'a> Slice<'a> {
    /// Create a slice referring to `data`
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Create an empty slice
    pub const fn empty() -> Self {
        Self { data: &[] }
    }

    /// The referenced bytes
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Length of the referenced data in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Drop the first `n` bytes from this view.
    ///
    /// # Panics
    /// Panics if `n` exceeds the slice length.
    pub fn remove_prefix(&mut self, n: usize) {
        assert!(
            n <= self.size(),
            "remove_prefix({}) past end of slice of length {}",
            n,
            self.size()
        );
        self.data = &self.data[n..];
    }

    /// Whether `prefix` is a prefix of this slice
    pub fn starts_with(&self, prefix: Slice<'_>) -> bool {
        self.data.starts_with(prefix.data)
    }

    /// Three-way bytewise comparison
    pub fn compare(&self, other: &Slice<'_>) -> Ordering {
        self.data.cmp(other.data)
    }

    /// Owned copy of the referenced bytes
    pub fn to_vec(&self) -> Vec<u8> {
        self.data.to_vec()
    }

    /// Owned, cheaply clonable copy of the referenced bytes
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(self.data)
    }

    /// Render as text, replacing invalid UTF-8 sequences
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.data).into_owned()
    }
}

impl Deref for Slice<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.data
    }
}

impl AsRef<[u8]> for Slice<'_> {
    fn as_ref(&self) -> &[u8] {
        self.data
    }
}

impl fmt::Debug for Slice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slice(\"{}\")", self.data.escape_ascii())
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl<'a> From<&'a [u8]> for Slice<'a> {
    fn from(data: &'a [u8]) -> Self {
        Self::new(data)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Slice<'a> {
    fn from(data: &'a [u8; N]) -> Self {
        Self::new(data)
    }
}

impl<'a> From<&'a Vec<u8>> for Slice<'a> {
    fn from(data: &'a Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl<'a> From<&'a str> for Slice<'a> {
    fn from(s: &'a str) -> Self {
        Self::new(s.as_bytes())
    }
}

impl<'a> From<&'a String> for Slice<'a> {
    fn from(s: &'a String) -> Self {
        Self::new(s.as_bytes())
    }
}

impl<'a> From<&'a Bytes> for Slice<'a> {
    fn from(b: &'a Bytes) -> Self {
        Self::new(b.as_ref())
    }
}
