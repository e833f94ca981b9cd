//! Page type and layout.
//!
//! This module contains [`Page`] - the raw 64-byte data container
//! exchanged between the B-tree engine and the index file.

#[allow(clippy::module_inception)]
mod page;

pub use page::Page;
