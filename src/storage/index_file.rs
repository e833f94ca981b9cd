//! Index file - low-level I/O for the header and B-tree pages.
//!
//! The [`IndexFile`] handles all direct file operations on the index:
//! - Reading and writing the [`IndexHeader`] at offset 0
//! - Reading and writing fixed-size pages
//! - Allocating new pages at the end of the file

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::common::config::{HEADER_SIZE, PAGE_SIZE};
use crate::common::{Error, PageRrn, Result};
use crate::storage::index_header::IndexHeader;
use crate::storage::page::Page;

/// Manages disk I/O for a single index file.
///
/// # File Layout
/// The header occupies the first 12 bytes; pages follow as a contiguous
/// array of fixed-size records:
/// ```text
/// ┌────────┬─────────┬─────────┬─────────┬─────────┐
/// │ Header │ Page 0  │ Page 1  │  ...    │ Page N  │
/// │ (12B)  │ (64B)   │ (64B)   │         │ (64B)   │
/// └────────┴─────────┴─────────┴─────────┴─────────┘
/// ```
/// Page N is located at file offset `HEADER_SIZE + N × PAGE_SIZE`.
///
/// Pages are never moved, reused, or freed — the file only grows. With
/// no deletion in the design there is nothing to put on a free list.
///
/// # Thread Safety
/// `IndexFile` is **single-threaded**; exactly one process owns the
/// file for its lifetime. The handle is opened once and held for the
/// session.
///
/// # Durability
/// Page and header writes are individually followed by `fsync()`. There
/// is no write-ahead log: a crash between the page writes of one split
/// leaves the index in an undefined state.
pub struct IndexFile {
    file: File,
    /// Number of pages in the file.
    page_count: u32,
}

impl IndexFile {
    /// Create a new index file with an empty-tree header.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)?;

        let mut index = Self {
            file,
            page_count: 0,
        };
        index.write_header(&IndexHeader::new())?;
        Ok(index)
    }

    /// Open an existing index file.
    ///
    /// # Errors
    /// Returns [`Error::InvalidHeader`] if the file is shorter than the
    /// header or its page region is not a whole number of pages.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(&path)?;

        let file_size = file.metadata()?.len();
        if file_size < HEADER_SIZE as u64 {
            return Err(Error::InvalidHeader);
        }
        let page_region = file_size - HEADER_SIZE as u64;
        if page_region % PAGE_SIZE as u64 != 0 {
            return Err(Error::InvalidHeader);
        }
        let page_count = (page_region / PAGE_SIZE as u64) as u32;

        Ok(Self { file, page_count })
    }

    /// Open an existing index file, or create if it doesn't exist.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// Read the header from offset 0.
    pub fn read_header(&mut self) -> Result<IndexHeader> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut buf = [0u8; HEADER_SIZE];
        self.file.read_exact(&mut buf)?;
        Ok(IndexHeader::from_bytes(&buf))
    }

    /// Write the header at offset 0 and fsync.
    pub fn write_header(&mut self, header: &IndexHeader) -> Result<()> {
        let mut buf = [0u8; HEADER_SIZE];
        header.write_to(&mut buf);
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&buf)?;
        self.file.sync_all()?;
        Ok(())
    }

    /// Read a page from disk and verify its checksum.
    ///
    /// # Errors
    /// Returns [`Error::PageNotFound`] if the page was never allocated,
    /// [`Error::CorruptPage`] if the checksum does not match.
    pub fn read_page(&mut self, rrn: PageRrn) -> Result<Page> {
        let offset = self.page_offset(rrn)?;
        self.file.seek(SeekFrom::Start(offset))?;

        let mut page = Page::new();
        self.file.read_exact(page.as_mut_slice())?;

        if !page.verify_checksum() {
            return Err(Error::CorruptPage(rrn.0));
        }
        Ok(page)
    }

    /// Write a page to disk, stamping its checksum.
    ///
    /// The page must have been previously allocated with
    /// [`IndexFile::allocate_page`].
    pub fn write_page(&mut self, rrn: PageRrn, page: &mut Page) -> Result<()> {
        let offset = self.page_offset(rrn)?;
        page.update_checksum();

        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(page.as_slice())?;
        self.file.sync_all()?;
        Ok(())
    }

    /// Allocate a new page at the end of the file.
    ///
    /// Returns the RRN of the newly allocated page, computed from the
    /// file size: `(file_size - HEADER_SIZE) / PAGE_SIZE`. The page is
    /// extended as a valid zeroed (checksummed) page.
    pub fn allocate_page(&mut self) -> Result<PageRrn> {
        let rrn = PageRrn::new(self.page_count as i32);

        let offset = HEADER_SIZE as u64 + (self.page_count as u64) * (PAGE_SIZE as u64);
        self.file.seek(SeekFrom::Start(offset))?;

        let mut zeroed = Page::new();
        zeroed.update_checksum();
        self.file.write_all(zeroed.as_slice())?;
        self.file.sync_all()?;

        self.page_count += 1;
        Ok(rrn)
    }

    /// Get the number of pages in the index file.
    #[inline]
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    fn page_offset(&self, rrn: PageRrn) -> Result<u64> {
        if rrn.is_nil() || rrn.0 < 0 || rrn.0 as u32 >= self.page_count {
            return Err(Error::PageNotFound(rrn.0));
        }
        Ok(HEADER_SIZE as u64 + (rrn.0 as u64) * (PAGE_SIZE as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_writes_empty_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.db");

        let mut index = IndexFile::create(&path).unwrap();
        assert_eq!(index.page_count(), 0);

        let header = index.read_header().unwrap();
        assert!(header.root_page.is_nil());
        assert_eq!(header.insert_count, 0);
        assert_eq!(header.search_count, 0);
    }

    #[test]
    fn test_create_existing_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.db");

        IndexFile::create(&path).unwrap();
        assert!(IndexFile::create(&path).is_err());
    }

    #[test]
    fn test_open_nonexistent_fails() {
        let dir = tempdir().unwrap();
        assert!(IndexFile::open(dir.path().join("missing.db")).is_err());
    }

    #[test]
    fn test_open_truncated_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.db");
        std::fs::write(&path, [0u8; 5]).unwrap();

        match IndexFile::open(&path) {
            Err(Error::InvalidHeader) => {}
            other => panic!("expected InvalidHeader, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_open_misaligned_page_region_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.db");
        // Header plus half a page.
        std::fs::write(&path, vec![0u8; HEADER_SIZE + PAGE_SIZE / 2]).unwrap();

        assert!(matches!(IndexFile::open(&path), Err(Error::InvalidHeader)));
    }

    #[test]
    fn test_allocate_write_read_page() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.db");

        let mut index = IndexFile::create(&path).unwrap();
        let rrn = index.allocate_page().unwrap();
        assert_eq!(rrn, PageRrn::new(0));
        assert_eq!(index.page_count(), 1);

        let mut page = Page::new();
        page.as_mut_slice()[0] = 0xAB;
        page.as_mut_slice()[30] = 0xCD;
        index.write_page(rrn, &mut page).unwrap();

        let read = index.read_page(rrn).unwrap();
        assert_eq!(read.as_slice()[0], 0xAB);
        assert_eq!(read.as_slice()[30], 0xCD);
    }

    #[test]
    fn test_read_unallocated_page_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.db");

        let mut index = IndexFile::create(&path).unwrap();
        assert!(matches!(
            index.read_page(PageRrn::new(0)),
            Err(Error::PageNotFound(0))
        ));
        assert!(matches!(
            index.read_page(PageRrn::NIL),
            Err(Error::PageNotFound(-1))
        ));
    }

    #[test]
    fn test_corrupt_page_detected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.db");

        let mut index = IndexFile::create(&path).unwrap();
        let rrn = index.allocate_page().unwrap();
        let mut page = Page::new();
        page.as_mut_slice()[3] = 0x77;
        index.write_page(rrn, &mut page).unwrap();
        drop(index);

        // Flip a byte in the stored page body.
        let mut raw = std::fs::read(&path).unwrap();
        raw[HEADER_SIZE + 3] ^= 0xFF;
        std::fs::write(&path, &raw).unwrap();

        let mut index = IndexFile::open(&path).unwrap();
        assert!(matches!(
            index.read_page(rrn),
            Err(Error::CorruptPage(0))
        ));
    }

    #[test]
    fn test_persistence_across_sessions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.db");

        {
            let mut index = IndexFile::create(&path).unwrap();
            let rrn = index.allocate_page().unwrap();
            let mut page = Page::new();
            page.as_mut_slice()[0] = 0x42;
            index.write_page(rrn, &mut page).unwrap();

            let mut header = index.read_header().unwrap();
            header.root_page = rrn;
            header.insert_count = 1;
            index.write_header(&header).unwrap();
        }

        {
            let mut index = IndexFile::open(&path).unwrap();
            assert_eq!(index.page_count(), 1);

            let header = index.read_header().unwrap();
            assert_eq!(header.root_page, PageRrn::new(0));
            assert_eq!(header.insert_count, 1);

            let page = index.read_page(PageRrn::new(0)).unwrap();
            assert_eq!(page.as_slice()[0], 0x42);
        }
    }

    #[test]
    fn test_allocate_rrn_tracks_file_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.db");

        let mut index = IndexFile::create(&path).unwrap();
        for i in 0..5 {
            let rrn = index.allocate_page().unwrap();
            assert_eq!(rrn.0, i);
        }

        drop(index);
        let size = std::fs::metadata(&path).unwrap().len();
        assert_eq!(size, (HEADER_SIZE + 5 * PAGE_SIZE) as u64);

        // Reopen: page count is recomputed from the file size.
        let index = IndexFile::open(&path).unwrap();
        assert_eq!(index.page_count(), 5);
    }
}
