//! B-tree engine: recursive search, insert with split-and-promote, and
//! in-order traversal over pages in an [`IndexFile`].
//!
//! The tree is order-4: at most 3 keys and 4 children per page. Each
//! key carries the record-file address of its payload; the engine never
//! interprets the payload itself.
//!
//! # Insert outcome propagation
//! Each level of the recursive insert reports one of three outcomes to
//! its caller:
//! - **Duplicate** — the key already exists somewhere on the path; the
//!   whole operation aborts with no page written at any level.
//! - **Absorbed** — the key landed in a page with room; nothing above
//!   this level changes.
//! - **Promoted** — a full page split; the caller receives the middle
//!   key, its record address, and the new right sibling, and must place
//!   that entry into itself, recursing the same three-way outcome one
//!   level up. A promotion escaping the root creates a new root.
//!
//! Inserting into an empty subtree reuses the promotion channel: the
//! NIL base case promotes the incoming key with a NIL right child, and
//! the caller places it at the correct leaf position.

mod node;

use std::path::Path;

use crate::common::config::{KEY_LEN, KEY_SENTINEL, MAX_CHILDREN, MAX_KEYS};
use crate::common::{IndexKey, PageRrn, RecordAddr, Result};
use crate::storage::{IndexFile, IndexHeader};

pub use node::{BTreeNode, SlotSearch};

/// Result of an insert operation, as seen by the caller.
///
/// A duplicate is a normal outcome, not an error: the tree and the
/// record store are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The key was placed in the tree.
    Inserted,
    /// The key was already present; nothing was written.
    Duplicate,
}

/// A successful key lookup: where the key lives and what it points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit {
    /// Page holding the key.
    pub page: PageRrn,
    /// Slot index within the page.
    pub pos: usize,
    /// Record-file address stored with the key.
    pub addr: RecordAddr,
}

/// Entry travelling up the tree after a split (or from the NIL base
/// case of an empty subtree).
struct Promotion {
    key: IndexKey,
    addr: RecordAddr,
    right: PageRrn,
}

/// Per-level outcome of the recursive insert.
enum InsertStep {
    Duplicate,
    Absorbed,
    Promoted(Promotion),
}

/// The disk-resident order-4 B-tree index.
///
/// Owns the index file handle for the session; every operation re-reads
/// the pages it needs, so there is no page cache to invalidate. The
/// design is single-writer, single-reader: no locking of any kind.
pub struct BTree {
    file: IndexFile,
}

impl BTree {
    /// Create a new, empty index.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            file: IndexFile::create(path)?,
        })
    }

    /// Open an existing index.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            file: IndexFile::open(path)?,
        })
    }

    /// Open an existing index, or create if it doesn't exist.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            file: IndexFile::open_or_create(path)?,
        })
    }

    /// Current root page, or NIL if the tree is empty.
    pub fn root(&mut self) -> Result<PageRrn> {
        Ok(self.file.read_header()?.root_page)
    }

    /// Number of pages in the index file. Pages are never freed, so
    /// this only grows.
    pub fn page_count(&self) -> u32 {
        self.file.page_count()
    }

    pub(crate) fn read_header(&mut self) -> Result<IndexHeader> {
        self.file.read_header()
    }

    pub(crate) fn write_header(&mut self, header: &IndexHeader) -> Result<()> {
        self.file.write_header(header)
    }

    /// Look up a key.
    ///
    /// O(tree height) page reads; NIL root means an empty tree.
    pub fn search(&mut self, key: &IndexKey) -> Result<Option<SearchHit>> {
        let root = self.root()?;
        self.search_rec(root, key)
    }

    fn search_rec(&mut self, rrn: PageRrn, key: &IndexKey) -> Result<Option<SearchHit>> {
        if rrn.is_nil() {
            return Ok(None);
        }
        let node = self.load_node(rrn)?;
        match node.search(key) {
            SlotSearch::Found(pos) => Ok(Some(SearchHit {
                page: rrn,
                pos,
                addr: node.addr_at(pos),
            })),
            SlotSearch::Descend(pos) => self.search_rec(node.child(pos), key),
        }
    }

    /// Insert `(key, addr)` into the tree.
    ///
    /// A promotion escaping the outermost call creates a new one-key
    /// root with the previous root as left child, and rewrites the
    /// header's root pointer. On [`InsertOutcome::Duplicate`] no page
    /// has been written.
    pub fn insert(&mut self, key: &IndexKey, addr: RecordAddr) -> Result<InsertOutcome> {
        let mut header = self.file.read_header()?;

        match self.insert_rec(header.root_page, key, addr)? {
            InsertStep::Duplicate => Ok(InsertOutcome::Duplicate),
            InsertStep::Absorbed => Ok(InsertOutcome::Inserted),
            InsertStep::Promoted(promo) => {
                let new_root = self.file.allocate_page()?;
                let root_node =
                    BTreeNode::new_root(&promo.key, promo.addr, header.root_page, promo.right);
                self.store_node(new_root, &root_node)?;

                header.root_page = new_root;
                self.file.write_header(&header)?;
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    /// Insert into the subtree rooted at `rrn`.
    fn insert_rec(&mut self, rrn: PageRrn, key: &IndexKey, addr: RecordAddr) -> Result<InsertStep> {
        if rrn.is_nil() {
            // Empty subtree: hand the entry back up for placement.
            return Ok(InsertStep::Promoted(Promotion {
                key: *key,
                addr,
                right: PageRrn::NIL,
            }));
        }

        let mut node = self.load_node(rrn)?;
        let pos = match node.search(key) {
            SlotSearch::Found(_) => return Ok(InsertStep::Duplicate),
            SlotSearch::Descend(pos) => pos,
        };

        let promo = match self.insert_rec(node.child(pos), key, addr)? {
            InsertStep::Duplicate => return Ok(InsertStep::Duplicate),
            InsertStep::Absorbed => return Ok(InsertStep::Absorbed),
            InsertStep::Promoted(promo) => promo,
        };

        if !node.is_full() {
            node.insert_entry(&promo.key, promo.addr, promo.right);
            self.store_node(rrn, &node)?;
            return Ok(InsertStep::Absorbed);
        }

        // Overflow: split around the promoted entry. The original rrn
        // keeps the left half in place; the right half lands on a
        // freshly allocated page.
        let (right_node, up_key, up_addr) = node.split_entry(&promo.key, promo.addr, promo.right);
        let right_rrn = self.file.allocate_page()?;
        self.store_node(rrn, &node)?;
        self.store_node(right_rrn, &right_node)?;

        Ok(InsertStep::Promoted(Promotion {
            key: up_key,
            addr: up_addr,
            right: right_rrn,
        }))
    }

    /// In-order traversal: every stored `(key, addr)` pair in ascending
    /// key order. The only read path touching every page, O(N) pages.
    pub fn scan(&mut self) -> Result<Vec<(IndexKey, RecordAddr)>> {
        let root = self.root()?;
        let mut out = Vec::new();
        self.scan_rec(root, &mut out)?;
        Ok(out)
    }

    fn scan_rec(&mut self, rrn: PageRrn, out: &mut Vec<(IndexKey, RecordAddr)>) -> Result<()> {
        if rrn.is_nil() {
            return Ok(());
        }
        let node = self.load_node(rrn)?;
        for i in 0..node.key_count() {
            self.scan_rec(node.child(i), out)?;
            out.push((node.key_at(i), node.addr_at(i)));
        }
        self.scan_rec(node.child(node.key_count()), out)
    }

    /// Walk the whole tree and verify its structural invariants:
    /// strictly ascending keys within each page, global key ordering
    /// across subtrees, child population (non-leaf pages have exactly
    /// `key_count + 1` children, leaves none), and sentinel fill of
    /// unused slots.
    ///
    /// # Panics
    /// Panics with a description of the violated invariant. Intended
    /// for tests and diagnostics; I/O problems are returned as errors.
    pub fn check_invariants(&mut self) -> Result<()> {
        let root = self.root()?;
        if root.is_nil() {
            return Ok(());
        }
        self.check_node(root, None, None)
    }

    fn check_node(
        &mut self,
        rrn: PageRrn,
        lower: Option<IndexKey>,
        upper: Option<IndexKey>,
    ) -> Result<()> {
        let node = self.load_node(rrn)?;
        assert!(node.key_count() >= 1, "{rrn} has no keys");

        for i in 0..node.key_count() {
            let key = node.key_at(i);
            if i > 0 {
                assert!(node.key_at(i - 1) < key, "{rrn} keys not strictly ascending");
            }
            if let Some(lo) = lower {
                assert!(key > lo, "{rrn} violates subtree lower bound");
            }
            if let Some(hi) = upper {
                assert!(key < hi, "{rrn} violates subtree upper bound");
            }
            assert!(
                !node.addr_at(i).is_nil(),
                "{rrn} slot {i} has no record address"
            );
        }
        for i in node.key_count()..MAX_KEYS {
            assert_eq!(
                node.raw_key(i),
                &[KEY_SENTINEL; KEY_LEN],
                "{rrn} unused slot {i} not sentinel-filled"
            );
        }

        if node.is_leaf() {
            return Ok(());
        }
        for i in 0..=node.key_count() {
            assert!(!node.child(i).is_nil(), "{rrn} non-leaf missing child {i}");
        }
        for i in node.key_count() + 1..MAX_CHILDREN {
            assert!(node.child(i).is_nil(), "{rrn} stray child pointer {i}");
        }

        for i in 0..=node.key_count() {
            let lo = if i == 0 { lower } else { Some(node.key_at(i - 1)) };
            let hi = if i == node.key_count() {
                upper
            } else {
                Some(node.key_at(i))
            };
            self.check_node(node.child(i), lo, hi)?;
        }
        Ok(())
    }

    fn load_node(&mut self, rrn: PageRrn) -> Result<BTreeNode> {
        let page = self.file.read_page(rrn)?;
        Ok(BTreeNode::from_page(&page))
    }

    fn store_node(&mut self, rrn: PageRrn, node: &BTreeNode) -> Result<()> {
        let mut page = node.to_page();
        self.file.write_page(rrn, &mut page)
    }
}

// ============================================================================
// TESTS
// ============================================================================
