//! B-tree node: the typed view of a page.
//!
//! A node holds up to `MAX_KEYS` keys in strictly ascending order, one
//! record address per key, and `MAX_KEYS + 1` child pointers. The
//! page-local operations live here — slot search, ordered insertion,
//! and the split arithmetic — while all I/O and recursion stay in
//! [`BTree`](super::BTree).

use crate::common::config::{KEY_LEN, KEY_SENTINEL, MAX_CHILDREN, MAX_KEYS};
use crate::common::{IndexKey, PageRrn, RecordAddr};
use crate::storage::page::Page;

/// Outcome of searching for a key within one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotSearch {
    /// The key sits at this slot index.
    Found(usize),
    /// The key is not in this node; descend into this child index.
    /// The index is also where an ordered insertion would place the key.
    Descend(usize),
}

/// A B-tree node.
///
/// # Layout (60 bytes, little-endian; the page trailer holds a CRC32)
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       2     key_count (u16)
/// 2       18    keys[3]          6 bytes each, unused slots sentinel-filled
/// 20      16    children[4]      i32 page numbers, NIL = -1
/// 36      24    record_addr[3]   i64 record offsets, NIL = -1
/// ```
///
/// Invariants (checked by [`BTree::check_invariants`](super::BTree::check_invariants)):
/// - `keys[0..key_count)` strictly ascending
/// - a leaf has every child NIL; a non-leaf has `children[0..=key_count]`
///   all populated
/// - slots at index `>= key_count` hold the sentinel key and NIL
///   children/addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BTreeNode {
    key_count: usize,
    keys: [[u8; KEY_LEN]; MAX_KEYS],
    children: [PageRrn; MAX_CHILDREN],
    record_addrs: [RecordAddr; MAX_KEYS],
}

impl BTreeNode {
    /// Serialized size of a node, excluding the page checksum trailer.
    pub const SIZE: usize = 60;

    /// Offset of each field within a page.
    pub const OFFSET_KEY_COUNT: usize = 0;
    pub const OFFSET_KEYS: usize = 2;
    pub const OFFSET_CHILDREN: usize = 2 + MAX_KEYS * KEY_LEN;
    pub const OFFSET_RECORD_ADDRS: usize = Self::OFFSET_CHILDREN + MAX_CHILDREN * 4;

    /// Create an empty leaf node.
    pub fn new() -> Self {
        Self {
            key_count: 0,
            keys: [[KEY_SENTINEL; KEY_LEN]; MAX_KEYS],
            children: [PageRrn::NIL; MAX_CHILDREN],
            record_addrs: [RecordAddr::NIL; MAX_KEYS],
        }
    }

    /// Build a one-key root from a promotion: the previous root (or NIL
    /// for the very first insert) on the left, the split sibling (or
    /// NIL) on the right. This is the only way the tree grows in height.
    pub fn new_root(key: &IndexKey, addr: RecordAddr, left: PageRrn, right: PageRrn) -> Self {
        let mut node = Self::new();
        node.keys[0] = *key.as_bytes();
        node.record_addrs[0] = addr;
        node.children[0] = left;
        node.children[1] = right;
        node.key_count = 1;
        node
    }

    /// Number of populated keys.
    #[inline]
    pub fn key_count(&self) -> usize {
        self.key_count
    }

    /// A node is full when every key slot is populated.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.key_count == MAX_KEYS
    }

    /// A leaf has no children at all.
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(PageRrn::is_nil)
    }

    /// Key stored at slot `i` (`i < key_count`).
    pub fn key_at(&self, i: usize) -> IndexKey {
        debug_assert!(i < self.key_count);
        IndexKey::from_bytes(self.keys[i])
    }

    /// Record address stored at slot `i` (`i < key_count`).
    pub fn addr_at(&self, i: usize) -> RecordAddr {
        debug_assert!(i < self.key_count);
        self.record_addrs[i]
    }

    /// Child pointer at index `i` (`i <= key_count`).
    pub fn child(&self, i: usize) -> PageRrn {
        debug_assert!(i < MAX_CHILDREN);
        self.children[i]
    }

    /// Search for `key` within this node.
    ///
    /// Linear scan, stopping at the first slot whose key is `>= key`.
    /// O(MAX_KEYS), deterministic; MAX_KEYS is a small compile-time
    /// constant so nothing fancier is warranted.
    pub fn search(&self, key: &IndexKey) -> SlotSearch {
        let bytes = key.as_bytes();
        let mut pos = 0;
        while pos < self.key_count && bytes > &self.keys[pos] {
            pos += 1;
        }
        if pos < self.key_count && bytes == &self.keys[pos] {
            SlotSearch::Found(pos)
        } else {
            SlotSearch::Descend(pos)
        }
    }

    /// Ordered insertion into a node with room.
    ///
    /// Shifts keys, addresses, and children right from the insertion
    /// point; the new right-child pointer lands immediately after the
    /// new key, preserving "children[i] holds keys < keys[i]".
    ///
    /// # Panics
    /// Panics if the node is already full; callers split instead.
    pub fn insert_entry(&mut self, key: &IndexKey, addr: RecordAddr, right_child: PageRrn) {
        assert!(!self.is_full(), "insert_entry on a full node");

        let bytes = key.as_bytes();
        let mut j = self.key_count;
        while j > 0 && bytes < &self.keys[j - 1] {
            self.keys[j] = self.keys[j - 1];
            self.record_addrs[j] = self.record_addrs[j - 1];
            self.children[j + 1] = self.children[j];
            j -= 1;
        }
        self.keys[j] = *bytes;
        self.record_addrs[j] = addr;
        self.children[j + 1] = right_child;
        self.key_count += 1;
    }

    /// Split this (full) node around an incoming entry.
    ///
    /// Merges the `MAX_KEYS` resident entries with the incoming one
    /// into working arrays of `MAX_KEYS + 1` keys and `MAX_KEYS + 2`
    /// children, then partitions at the midpoint
    /// `mid = (MAX_KEYS + 1) / 2`: entries below `mid` stay here (this
    /// node becomes the left half), entries above `mid` move to the
    /// returned right sibling, and the entry at `mid` is promoted — it
    /// is stored in neither half.
    ///
    /// Returns `(right_sibling, promoted_key, promoted_addr)`. The
    /// caller allocates a page for the sibling and propagates the
    /// promotion.
    ///
    /// # Panics
    /// Panics if the node is not full.
    pub fn split_entry(
        &mut self,
        key: &IndexKey,
        addr: RecordAddr,
        right_child: PageRrn,
    ) -> (BTreeNode, IndexKey, RecordAddr) {
        assert!(self.is_full(), "split_entry on a node with room");

        const WORK_KEYS: usize = MAX_KEYS + 1;
        let mid = WORK_KEYS / 2;

        // Working page: all resident entries plus the incoming one.
        let mut work_keys = [[KEY_SENTINEL; KEY_LEN]; WORK_KEYS];
        let mut work_addrs = [RecordAddr::NIL; WORK_KEYS];
        let mut work_children = [PageRrn::NIL; WORK_KEYS + 1];

        work_keys[..MAX_KEYS].copy_from_slice(&self.keys);
        work_addrs[..MAX_KEYS].copy_from_slice(&self.record_addrs);
        work_children[..MAX_CHILDREN].copy_from_slice(&self.children);

        let bytes = key.as_bytes();
        let mut j = MAX_KEYS;
        while j > 0 && bytes < &work_keys[j - 1] {
            work_keys[j] = work_keys[j - 1];
            work_addrs[j] = work_addrs[j - 1];
            work_children[j + 1] = work_children[j];
            j -= 1;
        }
        work_keys[j] = *bytes;
        work_addrs[j] = addr;
        work_children[j + 1] = right_child;

        // Left half stays in place.
        let mut left = BTreeNode::new();
        left.keys[..mid].copy_from_slice(&work_keys[..mid]);
        left.record_addrs[..mid].copy_from_slice(&work_addrs[..mid]);
        left.children[..=mid].copy_from_slice(&work_children[..=mid]);
        left.key_count = mid;

        // Right half goes to a fresh sibling.
        let right_len = WORK_KEYS - mid - 1;
        let mut right = BTreeNode::new();
        right.keys[..right_len].copy_from_slice(&work_keys[mid + 1..]);
        right.record_addrs[..right_len].copy_from_slice(&work_addrs[mid + 1..]);
        right.children[..=right_len].copy_from_slice(&work_children[mid + 1..]);
        right.key_count = right_len;

        let promo_key = IndexKey::from_bytes(work_keys[mid]);
        let promo_addr = work_addrs[mid];

        *self = left;
        (right, promo_key, promo_addr)
    }

    /// Read a node from the beginning of a page's byte slice.
    ///
    /// # Panics
    /// Panics if `data.len() < BTreeNode::SIZE`.
    pub fn from_bytes(data: &[u8]) -> Self {
        assert!(data.len() >= Self::SIZE, "buffer too small for BTreeNode");

        let key_count = u16::from_le_bytes([
            data[Self::OFFSET_KEY_COUNT],
            data[Self::OFFSET_KEY_COUNT + 1],
        ]) as usize;

        let mut keys = [[KEY_SENTINEL; KEY_LEN]; MAX_KEYS];
        for (i, slot) in keys.iter_mut().enumerate() {
            let at = Self::OFFSET_KEYS + i * KEY_LEN;
            slot.copy_from_slice(&data[at..at + KEY_LEN]);
        }

        let mut children = [PageRrn::NIL; MAX_CHILDREN];
        for (i, child) in children.iter_mut().enumerate() {
            let at = Self::OFFSET_CHILDREN + i * 4;
            *child = PageRrn::new(i32::from_le_bytes([
                data[at],
                data[at + 1],
                data[at + 2],
                data[at + 3],
            ]));
        }

        let mut record_addrs = [RecordAddr::NIL; MAX_KEYS];
        for (i, addr) in record_addrs.iter_mut().enumerate() {
            let at = Self::OFFSET_RECORD_ADDRS + i * 8;
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&data[at..at + 8]);
            *addr = RecordAddr::new(i64::from_le_bytes(buf));
        }

        Self {
            key_count: key_count.min(MAX_KEYS),
            keys,
            children,
            record_addrs,
        }
    }

    /// Write this node to the beginning of a page's byte slice.
    ///
    /// # Panics
    /// Panics if `data.len() < BTreeNode::SIZE`.
    pub fn write_to(&self, data: &mut [u8]) {
        assert!(data.len() >= Self::SIZE, "buffer too small for BTreeNode");

        data[Self::OFFSET_KEY_COUNT..Self::OFFSET_KEY_COUNT + 2]
            .copy_from_slice(&(self.key_count as u16).to_le_bytes());

        for (i, slot) in self.keys.iter().enumerate() {
            let at = Self::OFFSET_KEYS + i * KEY_LEN;
            data[at..at + KEY_LEN].copy_from_slice(slot);
        }
        for (i, child) in self.children.iter().enumerate() {
            let at = Self::OFFSET_CHILDREN + i * 4;
            data[at..at + 4].copy_from_slice(&child.0.to_le_bytes());
        }
        for (i, addr) in self.record_addrs.iter().enumerate() {
            let at = Self::OFFSET_RECORD_ADDRS + i * 8;
            data[at..at + 8].copy_from_slice(&addr.0.to_le_bytes());
        }
    }

    /// Serialize into a fresh page (checksum not yet stamped).
    pub fn to_page(&self) -> Page {
        let mut page = Page::new();
        self.write_to(page.as_mut_slice());
        page
    }

    /// Deserialize from a page read off disk.
    pub fn from_page(page: &Page) -> Self {
        Self::from_bytes(page.as_slice())
    }

    /// Raw key slot bytes, for invariant checks.
    pub(crate) fn raw_key(&self, i: usize) -> &[u8; KEY_LEN] {
        &self.keys[i]
    }
}

impl Default for BTreeNode {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
