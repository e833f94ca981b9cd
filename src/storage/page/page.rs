//! Page - the fixed-size unit of index file I/O.
//!
//! A [`Page`] is a raw 64-byte array holding one serialized B-tree node
//! plus a CRC32 trailer. The [`IndexFile`] reads and writes whole pages;
//! the node layout within a page is defined by `BTreeNode`.
//!
//! [`IndexFile`]: crate::storage::IndexFile

use crate::common::config::PAGE_SIZE;

/// Byte offset of the CRC32 trailer: the last 4 bytes of every page.
const CHECKSUM_OFFSET: usize = PAGE_SIZE - 4;

/// A page of index data (64 bytes).
///
/// # Memory Layout
/// Bytes `[0, 60)` hold the serialized node; bytes `[60, 64)` hold a
/// CRC32 checksum of the node bytes, little-endian. The checksum is
/// stored by [`Page::update_checksum`] and verified on every read from
/// disk; a mismatch is reported as a corrupt page, not silently ignored.
#[derive(Clone)]
pub struct Page {
    data: [u8; PAGE_SIZE],
}

impl Page {
    /// Create a new zeroed page.
    #[inline]
    pub fn new() -> Self {
        Self {
            data: [0u8; PAGE_SIZE],
        }
    }

    /// Get immutable slice of page data.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Get mutable slice of page data.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Get the size of a page.
    #[inline]
    pub const fn size() -> usize {
        PAGE_SIZE
    }

    /// Compute and store the checksum in the trailer.
    ///
    /// Call this after all modifications to the page are complete.
    pub fn update_checksum(&mut self) {
        let checksum = Self::compute_checksum(&self.data);
        self.data[CHECKSUM_OFFSET..].copy_from_slice(&checksum.to_le_bytes());
    }

    /// Verify the stored checksum matches the page contents.
    pub fn verify_checksum(&self) -> bool {
        let stored = u32::from_le_bytes([
            self.data[CHECKSUM_OFFSET],
            self.data[CHECKSUM_OFFSET + 1],
            self.data[CHECKSUM_OFFSET + 2],
            self.data[CHECKSUM_OFFSET + 3],
        ]);
        stored == Self::compute_checksum(&self.data)
    }

    /// CRC32 over the node bytes (everything before the trailer).
    fn compute_checksum(page_data: &[u8]) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&page_data[..CHECKSUM_OFFSET]);
        hasher.finalize()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
