//! rosterdb - a disk-resident order-4 B-tree index over an append-only
//! student record file.
//!
//! # Architecture
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        rosterdb                          │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌──────────────────────────────────────────────────┐   │
//! │  │              Engine (engine.rs)                   │   │
//! │  │   insert / search / list  +  operation counters   │   │
//! │  └──────────────────────────────────────────────────┘   │
//! │               ↓                        ↓                 │
//! │  ┌─────────────────────────┐  ┌────────────────────┐   │
//! │  │   B-Tree (index/btree)  │  │ StudentRecord codec │   │
//! │  │  search / insert+split  │  │    (records.rs)     │   │
//! │  │  promote / traverse     │  └────────────────────┘   │
//! │  └─────────────────────────┘           ↓                │
//! │               ↓                        ↓                 │
//! │  ┌──────────────────────────────────────────────────┐   │
//! │  │           Storage Layer (storage/)                │   │
//! │  │  IndexFile + IndexHeader + Page │ RecordFile      │   │
//! │  └──────────────────────────────────────────────────┘   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (PageRrn, RecordAddr, IndexKey, Error, config)
//! - [`storage`] - Disk I/O: index file, header, pages, record file
//! - [`index`] - The order-4 B-tree engine
//! - [`records`] - The student record payload codec
//! - [`engine`] - The session-owning Engine tying it all together
//!
//! # Design constraints
//! Single-threaded, single-process: exactly one [`Engine`] owns both
//! files for their lifetime. There is no deletion and no free list —
//! index pages are only ever allocated, never reused — and no
//! write-ahead log: a crash between the page writes of one split leaves
//! the index in an undefined state.
//!
//! # Quick Start
//! ```no_run
//! use rosterdb::{Engine, StudentRecord};
//!
//! let mut engine = Engine::create("roster.idx", "roster.dat").unwrap();
//! engine
//!     .insert(&StudentRecord {
//!         student_id: "001".into(),
//!         course_code: "MAT".into(),
//!         name: "Ana Souza".into(),
//!         course_name: "Mathematics".into(),
//!         grade: 8.5,
//!         attendance: 0.93,
//!     })
//!     .unwrap();
//!
//! let hit = engine.search("001", "MAT").unwrap();
//! assert!(hit.is_some());
//! ```

pub mod common;
pub mod engine;
pub mod index;
pub mod records;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::config::{KEY_LEN, MAX_KEYS, PAGE_SIZE};
pub use common::{Error, IndexKey, PageRrn, RecordAddr, Result};

pub use engine::Engine;
pub use index::btree::{BTree, InsertOutcome, SearchHit};
pub use records::StudentRecord;
pub use storage::{IndexFile, IndexHeader, RecordFile};
