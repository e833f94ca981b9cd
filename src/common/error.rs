//! Error types for rosterdb.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
/// This is a common Rust pattern (see `std::io::Result`).
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in rosterdb.
///
/// Storage errors are fail-fast: they are surfaced to the caller rather
/// than aborting the process, but nothing retries. A duplicate key is
/// deliberately *not* an error — it is a normal [`InsertOutcome`] value,
/// because rejecting a duplicate leaves the index and the record file
/// fully intact.
///
/// [`InsertOutcome`]: crate::index::btree::InsertOutcome
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from disk operations.
    ///
    /// Short reads from either file surface here as `UnexpectedEof`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Requested page does not exist in the index file.
    #[error("page {0} not found in index file")]
    PageNotFound(i32),

    /// A page read back from disk failed checksum verification.
    #[error("page {0} failed checksum verification")]
    CorruptPage(i32),

    /// The index file is shorter than its header, or its page region is
    /// not a whole number of pages.
    #[error("index file header is missing or malformed")]
    InvalidHeader,

    /// A record payload could not be decoded.
    #[error("malformed record: {0}")]
    MalformedRecord(&'static str),

    /// A key component has the wrong width or contains bytes outside the
    /// ASCII-alphanumeric alphabet. Keys are never truncated or padded.
    #[error("{field} must be {expected} ASCII alphanumeric bytes, got {value:?}")]
    KeyFormat {
        field: &'static str,
        expected: usize,
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PageNotFound(42);
        assert_eq!(format!("{}", err), "page 42 not found in index file");

        let err = Error::CorruptPage(7);
        assert_eq!(format!("{}", err), "page 7 failed checksum verification");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        match err {
            Error::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_key_format_display() {
        let err = Error::KeyFormat {
            field: "student id",
            expected: 3,
            value: "NO".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "student id must be 3 ASCII alphanumeric bytes, got \"NO\""
        );
    }
}
