//! Index file header.
//!
//! A single fixed-size record at file offset 0 holding the root page
//! number and two monotonic operation counters. It is rewritten on
//! every successful insert (counters always; the root additionally when
//! a new root is created).

use crate::common::config::HEADER_SIZE;
use crate::common::PageRrn;

/// Metadata stored at the beginning of the index file.
///
/// # Layout (12 bytes, little-endian)
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       4     root_page (i32, NIL = -1 when the tree is empty)
/// 4       4     insert_count (u32)
/// 8       4     search_count (u32)
/// ```
///
/// The counters are consumed by the external caller to advance a
/// fixture cursor; the engine itself never branches on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexHeader {
    /// Root page of the tree, or NIL if the tree is empty.
    pub root_page: PageRrn,
    /// Number of insert attempts, duplicates included.
    pub insert_count: u32,
    /// Number of search operations.
    pub search_count: u32,
}

impl IndexHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = HEADER_SIZE;

    /// Offset of each field within the header.
    pub const OFFSET_ROOT: usize = 0;
    pub const OFFSET_INSERT_COUNT: usize = 4;
    pub const OFFSET_SEARCH_COUNT: usize = 8;

    /// Header of a freshly created index: empty tree, zeroed counters.
    pub fn new() -> Self {
        Self {
            root_page: PageRrn::NIL,
            insert_count: 0,
            search_count: 0,
        }
    }

    /// Read a header from the beginning of a byte slice.
    ///
    /// # Panics
    /// Panics if `data.len() < IndexHeader::SIZE`.
    pub fn from_bytes(data: &[u8]) -> Self {
        assert!(data.len() >= Self::SIZE, "buffer too small for IndexHeader");

        let root = i32::from_le_bytes([
            data[Self::OFFSET_ROOT],
            data[Self::OFFSET_ROOT + 1],
            data[Self::OFFSET_ROOT + 2],
            data[Self::OFFSET_ROOT + 3],
        ]);
        let insert_count = u32::from_le_bytes([
            data[Self::OFFSET_INSERT_COUNT],
            data[Self::OFFSET_INSERT_COUNT + 1],
            data[Self::OFFSET_INSERT_COUNT + 2],
            data[Self::OFFSET_INSERT_COUNT + 3],
        ]);
        let search_count = u32::from_le_bytes([
            data[Self::OFFSET_SEARCH_COUNT],
            data[Self::OFFSET_SEARCH_COUNT + 1],
            data[Self::OFFSET_SEARCH_COUNT + 2],
            data[Self::OFFSET_SEARCH_COUNT + 3],
        ]);

        Self {
            root_page: PageRrn::new(root),
            insert_count,
            search_count,
        }
    }

    /// Write this header to the beginning of a byte slice.
    ///
    /// # Panics
    /// Panics if `data.len() < IndexHeader::SIZE`.
    pub fn write_to(&self, data: &mut [u8]) {
        assert!(data.len() >= Self::SIZE, "buffer too small for IndexHeader");

        data[Self::OFFSET_ROOT..Self::OFFSET_ROOT + 4]
            .copy_from_slice(&self.root_page.0.to_le_bytes());
        data[Self::OFFSET_INSERT_COUNT..Self::OFFSET_INSERT_COUNT + 4]
            .copy_from_slice(&self.insert_count.to_le_bytes());
        data[Self::OFFSET_SEARCH_COUNT..Self::OFFSET_SEARCH_COUNT + 4]
            .copy_from_slice(&self.search_count.to_le_bytes());
    }
}

impl Default for IndexHeader {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
