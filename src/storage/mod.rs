//! Storage layer - disk I/O and file formats.
//!
//! This module handles persistent storage:
//! - [`IndexFile`] - header + page I/O for the B-tree index
//! - [`IndexHeader`] - root pointer and operation counters
//! - [`RecordFile`] - append-only record payload storage
//! - [`page`] - the raw fixed-size page

mod index_file;
mod index_header;
pub mod page;
mod record_file;

pub use index_file::IndexFile;
pub use index_header::IndexHeader;
pub use record_file::RecordFile;
