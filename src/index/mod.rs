//! Index structures.
//!
//! - [`btree`] - the disk-resident order-4 B-tree

pub mod btree;

pub use btree::{BTree, InsertOutcome, SearchHit};
