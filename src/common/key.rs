//! Fixed-width composite index key.
//!
//! A key is the student identifier concatenated with the course code,
//! 6 bytes total. Keys compare byte-wise lexicographically; uniqueness
//! in the tree is enforced over this exact byte sequence — no case
//! folding, no trimming.

use std::fmt;

use crate::common::config::{COURSE_CODE_LEN, KEY_LEN, STUDENT_ID_LEN};
use crate::common::{Error, Result};

/// Composite key: 3-byte student identifier + 3-byte course code.
///
/// Both components must be exactly their fixed width and consist of
/// ASCII alphanumeric bytes. Anything else is rejected with
/// [`Error::KeyFormat`] — never silently truncated or padded, so a key
/// can never contain the page sentinel byte.
///
/// The derived `Ord` is the total order used throughout the tree:
/// byte-wise lexicographic comparison of the 6-byte sequence.
///
/// # Example
/// ```
/// use rosterdb::IndexKey;
///
/// let a = IndexKey::new("001", "MAT").unwrap();
/// let b = IndexKey::new("002", "MAT").unwrap();
/// assert!(a < b);
/// assert!(IndexKey::new("0001", "MAT").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexKey([u8; KEY_LEN]);

impl IndexKey {
    /// Build a key from its two components.
    ///
    /// # Errors
    /// Returns [`Error::KeyFormat`] if either component is not exactly
    /// its fixed width or contains a non-alphanumeric byte.
    pub fn new(student_id: &str, course_code: &str) -> Result<Self> {
        check_component("student id", student_id, STUDENT_ID_LEN)?;
        check_component("course code", course_code, COURSE_CODE_LEN)?;

        let mut bytes = [0u8; KEY_LEN];
        bytes[..STUDENT_ID_LEN].copy_from_slice(student_id.as_bytes());
        bytes[STUDENT_ID_LEN..].copy_from_slice(course_code.as_bytes());
        Ok(Self(bytes))
    }

    /// Reconstruct a key from its raw on-disk bytes.
    ///
    /// Used when reading populated page slots; the bytes were validated
    /// when the key was first built.
    #[inline]
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw key bytes as stored in a page slot.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// The student identifier component.
    pub fn student_id(&self) -> &str {
        // Components are validated ASCII on construction.
        std::str::from_utf8(&self.0[..STUDENT_ID_LEN]).unwrap_or("???")
    }

    /// The course code component.
    pub fn course_code(&self) -> &str {
        std::str::from_utf8(&self.0[STUDENT_ID_LEN..]).unwrap_or("???")
    }
}

fn check_component(field: &'static str, value: &str, expected: usize) -> Result<()> {
    let ok = value.len() == expected && value.bytes().all(|b| b.is_ascii_alphanumeric());
    if ok {
        Ok(())
    } else {
        Err(Error::KeyFormat {
            field,
            expected,
            value: value.to_string(),
        })
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.student_id(), self.course_code())
    }
}
