//! Record file - append-only storage for variable-length payloads.
//!
//! The index treats this store as opaque: it maps a [`RecordAddr`] to a
//! payload and back, nothing more. Payload encoding lives with the
//! domain type ([`StudentRecord`]), not here.
//!
//! [`StudentRecord`]: crate::records::StudentRecord

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::common::{Error, RecordAddr, Result};

/// Upper bound on a single payload length.
///
/// A length prefix above this is treated as corruption rather than an
/// allocation request.
const MAX_PAYLOAD_LEN: u32 = 1 << 20;

/// Append-only file of length-prefixed records.
///
/// # File Layout
/// ```text
/// ┌──────────┬─────────────┬──────────┬─────────────┬───
/// │ len: u32 │ payload ... │ len: u32 │ payload ... │ ...
/// └──────────┴─────────────┴──────────┴─────────────┴───
/// ```
/// A record's address is the byte offset of its length prefix. Records
/// are never rewritten or deleted; `append` always extends the file.
pub struct RecordFile {
    file: File,
    /// End-of-file offset, where the next record lands.
    end_offset: u64,
    /// Number of records in the file, recovered by a prefix scan at open.
    record_count: u32,
}

impl RecordFile {
    /// Create a new, empty record file.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)?;

        Ok(Self {
            file,
            end_offset: 0,
            record_count: 0,
        })
    }

    /// Open an existing record file, scanning the length prefixes to
    /// recover the record count.
    ///
    /// # Errors
    /// Returns [`Error::MalformedRecord`] if a prefix points past the
    /// end of the file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(&path)?;
        let file_size = file.metadata()?.len();

        let mut store = Self {
            file,
            end_offset: file_size,
            record_count: 0,
        };
        store.record_count = store.scan_count(file_size)?;
        Ok(store)
    }

    /// Open an existing record file, or create if it doesn't exist.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// Append a payload and return its address.
    pub fn append(&mut self, payload: &[u8]) -> Result<RecordAddr> {
        if payload.len() as u64 > MAX_PAYLOAD_LEN as u64 {
            return Err(Error::MalformedRecord("payload exceeds maximum length"));
        }

        let addr = RecordAddr::new(self.end_offset as i64);
        let len = payload.len() as u32;

        self.file.seek(SeekFrom::Start(self.end_offset))?;
        self.file.write_all(&len.to_le_bytes())?;
        self.file.write_all(payload)?;
        self.file.sync_all()?;

        self.end_offset += 4 + payload.len() as u64;
        self.record_count += 1;
        Ok(addr)
    }

    /// Fetch the payload stored at `addr`.
    ///
    /// # Errors
    /// Returns [`Error::MalformedRecord`] if the address does not point
    /// at a plausible length prefix.
    pub fn fetch(&mut self, addr: RecordAddr) -> Result<Vec<u8>> {
        if addr.is_nil() || addr.0 < 0 || addr.0 as u64 >= self.end_offset {
            return Err(Error::MalformedRecord("record address out of bounds"));
        }

        self.file.seek(SeekFrom::Start(addr.0 as u64))?;
        let mut len_buf = [0u8; 4];
        self.file.read_exact(&mut len_buf)?;
        let len = u32::from_le_bytes(len_buf);

        if len > MAX_PAYLOAD_LEN || addr.0 as u64 + 4 + len as u64 > self.end_offset {
            return Err(Error::MalformedRecord("length prefix out of bounds"));
        }

        let mut payload = vec![0u8; len as usize];
        self.file.read_exact(&mut payload)?;
        Ok(payload)
    }

    /// Number of records appended to this file over its lifetime.
    #[inline]
    pub fn record_count(&self) -> u32 {
        self.record_count
    }

    /// Walk the length prefixes from offset 0 to `file_size`.
    fn scan_count(&mut self, file_size: u64) -> Result<u32> {
        let mut offset = 0u64;
        let mut count = 0u32;

        while offset < file_size {
            if offset + 4 > file_size {
                return Err(Error::MalformedRecord("truncated length prefix"));
            }
            self.file.seek(SeekFrom::Start(offset))?;
            let mut len_buf = [0u8; 4];
            self.file.read_exact(&mut len_buf)?;
            let len = u32::from_le_bytes(len_buf);

            if len > MAX_PAYLOAD_LEN || offset + 4 + len as u64 > file_size {
                return Err(Error::MalformedRecord("length prefix out of bounds"));
            }
            offset += 4 + len as u64;
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_append_and_fetch() {
        let dir = tempdir().unwrap();
        let mut store = RecordFile::create(dir.path().join("records.db")).unwrap();

        let a = store.append(b"hello").unwrap();
        let b = store.append(b"world, but longer").unwrap();
        assert_eq!(store.record_count(), 2);

        assert_eq!(store.fetch(a).unwrap(), b"hello");
        assert_eq!(store.fetch(b).unwrap(), b"world, but longer");
    }

    #[test]
    fn test_addresses_are_byte_offsets() {
        let dir = tempdir().unwrap();
        let mut store = RecordFile::create(dir.path().join("records.db")).unwrap();

        let a = store.append(b"abc").unwrap();
        let b = store.append(b"de").unwrap();
        assert_eq!(a, RecordAddr::new(0));
        assert_eq!(b, RecordAddr::new(4 + 3));
    }

    #[test]
    fn test_count_recovered_on_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.db");

        let addr;
        {
            let mut store = RecordFile::create(&path).unwrap();
            store.append(b"one").unwrap();
            addr = store.append(b"two").unwrap();
            store.append(b"three").unwrap();
        }

        let mut store = RecordFile::open(&path).unwrap();
        assert_eq!(store.record_count(), 3);
        assert_eq!(store.fetch(addr).unwrap(), b"two");
    }

    #[test]
    fn test_fetch_bad_address_fails() {
        let dir = tempdir().unwrap();
        let mut store = RecordFile::create(dir.path().join("records.db")).unwrap();
        store.append(b"only").unwrap();

        assert!(store.fetch(RecordAddr::NIL).is_err());
        assert!(store.fetch(RecordAddr::new(1000)).is_err());
        // Offset 2 lands mid-prefix; the resulting length is absurd.
        assert!(store.fetch(RecordAddr::new(2)).is_err());
    }

    #[test]
    fn test_open_truncated_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.db");
        // Length prefix claims 100 bytes, file holds none of them.
        std::fs::write(&path, 100u32.to_le_bytes()).unwrap();

        assert!(matches!(
            RecordFile::open(&path),
            Err(Error::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_empty_payload_roundtrip() {
        let dir = tempdir().unwrap();
        let mut store = RecordFile::create(dir.path().join("records.db")).unwrap();

        let addr = store.append(b"").unwrap();
        assert_eq!(store.fetch(addr).unwrap(), b"");
        assert_eq!(store.record_count(), 1);
    }
}
