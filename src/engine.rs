//! Engine: the public face of rosterdb.
//!
//! An [`Engine`] owns both file handles for the session — the B-tree
//! index and the append-only record file — and wires them together:
//! inserts append the payload and index its address, searches resolve
//! an address back into a [`StudentRecord`], and listing walks the tree
//! in key order. No process-wide state; everything hangs off this
//! value.

use std::path::Path;

use crate::common::{IndexKey, Result};
use crate::index::btree::{BTree, InsertOutcome};
use crate::records::StudentRecord;
use crate::storage::RecordFile;

/// The record store and its index, operated as one unit.
///
/// Single-threaded by design: one process owns both files for their
/// lifetime, and no operation is safe for concurrent callers.
pub struct Engine {
    index: BTree,
    records: RecordFile,
}

impl Engine {
    /// Create a new, empty database (index file + record file).
    pub fn create<P: AsRef<Path>>(index_path: P, record_path: P) -> Result<Self> {
        Ok(Self {
            index: BTree::create(index_path)?,
            records: RecordFile::create(record_path)?,
        })
    }

    /// Open an existing database.
    pub fn open<P: AsRef<Path>>(index_path: P, record_path: P) -> Result<Self> {
        Ok(Self {
            index: BTree::open(index_path)?,
            records: RecordFile::open(record_path)?,
        })
    }

    /// Open an existing database, creating it if absent.
    pub fn open_or_create<P: AsRef<Path>>(index_path: P, record_path: P) -> Result<Self> {
        Ok(Self {
            index: BTree::open_or_create(index_path)?,
            records: RecordFile::open_or_create(record_path)?,
        })
    }

    /// Insert a record, indexing it under its composite key.
    ///
    /// The key is probed in the tree *before* the payload touches the
    /// record file; a rejected duplicate therefore never leaves an
    /// orphaned record behind. The insert counter advances on every
    /// attempt, duplicates included — callers use it to drive a fixture
    /// cursor, so a rejected attempt still consumes an entry.
    pub fn insert(&mut self, record: &StudentRecord) -> Result<InsertOutcome> {
        let key = record.key()?;

        if self.index.search(&key)?.is_some() {
            self.bump_insert_count()?;
            return Ok(InsertOutcome::Duplicate);
        }

        // No duplicate on the path: commit the payload, then place the
        // key with its real address. Single-writer, so nothing can have
        // inserted the key in between.
        let payload = record.encode()?;
        let addr = self.records.append(&payload)?;
        let outcome = self.index.insert(&key, addr)?;

        self.bump_insert_count()?;
        Ok(outcome)
    }

    /// Look up one enrollment by student identifier and course code.
    ///
    /// Advances the search counter whether or not the key is found.
    pub fn search(&mut self, student_id: &str, course_code: &str) -> Result<Option<StudentRecord>> {
        let key = IndexKey::new(student_id, course_code)?;
        let hit = self.index.search(&key)?;
        self.bump_search_count()?;

        match hit {
            Some(hit) => {
                let payload = self.records.fetch(hit.addr)?;
                Ok(Some(StudentRecord::decode(&payload)?))
            }
            None => Ok(None),
        }
    }

    /// All records in ascending key order.
    pub fn list(&mut self) -> Result<Vec<StudentRecord>> {
        let entries = self.index.scan()?;
        let mut out = Vec::with_capacity(entries.len());
        for (_, addr) in entries {
            let payload = self.records.fetch(addr)?;
            out.push(StudentRecord::decode(&payload)?);
        }
        Ok(out)
    }

    /// Number of insert attempts over the index's lifetime, duplicates
    /// included.
    pub fn insert_count(&mut self) -> Result<u32> {
        Ok(self.index.read_header()?.insert_count)
    }

    /// Number of search operations over the index's lifetime.
    pub fn search_count(&mut self) -> Result<u32> {
        Ok(self.index.read_header()?.search_count)
    }

    /// Number of payloads in the record file.
    pub fn record_count(&self) -> u32 {
        self.records.record_count()
    }

    /// The underlying index, for integrity checks.
    pub fn btree(&mut self) -> &mut BTree {
        &mut self.index
    }

    fn bump_insert_count(&mut self) -> Result<()> {
        let mut header = self.index.read_header()?;
        header.insert_count += 1;
        self.index.write_header(&header)
    }

    fn bump_search_count(&mut self) -> Result<()> {
        let mut header = self.index.read_header()?;
        header.search_count += 1;
        self.index.write_header(&header)
    }
}
