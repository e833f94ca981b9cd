//! Page identifier type.

use std::fmt;

/// Identifies a B-tree page by its relative record number (RRN): the
/// page's position within the index file's page array.
///
/// Page numbers are signed so that `-1` can serve as the NIL sentinel,
/// meaning "no child / empty subtree". The on-disk representation is a
/// little-endian `i32`, fixed for the lifetime of an index file.
///
/// # Example
/// ```
/// use rosterdb::PageRrn;
///
/// let rrn = PageRrn::new(42);
/// assert!(!rrn.is_nil());
/// assert!(PageRrn::NIL.is_nil());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageRrn(pub i32);

impl PageRrn {
    /// Sentinel meaning "no child / empty subtree".
    pub const NIL: PageRrn = PageRrn(-1);

    /// Create a new PageRrn.
    #[inline]
    pub fn new(rrn: i32) -> Self {
        PageRrn(rrn)
    }

    /// Check whether this is the NIL sentinel.
    #[inline]
    pub fn is_nil(&self) -> bool {
        *self == Self::NIL
    }
}

impl fmt::Display for PageRrn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            write!(f, "Page(NIL)")
        } else {
            write!(f, "Page({})", self.0)
        }
    }
}
