//! Common types and utilities shared across rosterdb.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration constants
//! - Error types
//! - Identifiers (PageRrn, RecordAddr)
//! - The fixed-width composite key

pub mod config;
pub mod error;
mod key;
mod page_rrn;
mod record_addr;

pub use error::{Error, Result};
pub use key::IndexKey;
pub use page_rrn::PageRrn;
pub use record_addr::RecordAddr;
