//! Configuration constants for rosterdb.

/// Maximum number of keys per B-tree page (order-4 tree).
pub const MAX_KEYS: usize = 3;

/// Maximum number of children per B-tree page.
pub const MAX_CHILDREN: usize = MAX_KEYS + 1;

/// Width of the student identifier component of a key, in bytes.
pub const STUDENT_ID_LEN: usize = 3;

/// Width of the course code component of a key, in bytes.
pub const COURSE_CODE_LEN: usize = 3;

/// Total key width: student identifier concatenated with course code.
pub const KEY_LEN: usize = STUDENT_ID_LEN + COURSE_CODE_LEN;

/// Fill byte for unused key slots in a page.
///
/// Key components are restricted to ASCII alphanumeric bytes, so `0x00`
/// never collides with a real key. Tests verify that every slot at index
/// >= `key_count` holds only sentinel bytes.
pub const KEY_SENTINEL: u8 = 0x00;

/// Size of a B-tree page on disk, in bytes.
///
/// Derived from the node layout (see `BTreeNode`):
/// ```text
/// key_count (2) + keys (3×6) + children (4×4) + record_addr (3×8) + checksum (4) = 64
/// ```
pub const PAGE_SIZE: usize = 64;

/// Size of the index file header, in bytes.
///
/// `root_page: i32` + `insert_count: u32` + `search_count: u32`.
pub const HEADER_SIZE: usize = 12;
