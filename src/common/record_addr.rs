//! Record address type.

use std::fmt;

/// Logical address of a record in the record file: the byte offset of
/// the record's length prefix.
///
/// Signed so that `-1` can mark unused address slots in a B-tree page.
/// On disk it is a little-endian `i64`. The index never interprets the
/// payload behind an address; it only hands the address back to the
/// record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordAddr(pub i64);

impl RecordAddr {
    /// Sentinel meaning "no record" (unused page slot).
    pub const NIL: RecordAddr = RecordAddr(-1);

    /// Create a new RecordAddr.
    #[inline]
    pub fn new(offset: i64) -> Self {
        RecordAddr(offset)
    }

    /// Check whether this is the NIL sentinel.
    #[inline]
    pub fn is_nil(&self) -> bool {
        *self == Self::NIL
    }
}

impl fmt::Display for RecordAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            write!(f, "Record(NIL)")
        } else {
            write!(f, "Record(@{})", self.0)
        }
    }
}
