//! Student record: the domain payload stored in the record file.
//!
//! The index only ever sees the 6-byte key and an opaque record
//! address; this module owns the payload encoding on the other side of
//! that boundary.

use crate::common::config::{COURSE_CODE_LEN, STUDENT_ID_LEN};
use crate::common::{Error, IndexKey, Result};

/// One student's enrollment in one course.
///
/// # Payload Layout (little-endian)
/// ```text
/// Offset  Size          Field
/// ------  ----          -----
/// 0       3             student_id (ASCII alphanumeric)
/// 3       3             course_code (ASCII alphanumeric)
/// 6       1             name_len (u8)
/// 7       name_len      name (UTF-8)
/// ...     1             course_len (u8)
/// ...     course_len    course_name (UTF-8)
/// ...     4             grade (f32)
/// ...     4             attendance (f32)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub student_id: String,
    pub course_code: String,
    pub name: String,
    pub course_name: String,
    pub grade: f32,
    pub attendance: f32,
}

impl StudentRecord {
    /// The composite index key for this record.
    ///
    /// # Errors
    /// Returns [`Error::KeyFormat`] if either identifier has the wrong
    /// width or alphabet.
    pub fn key(&self) -> Result<IndexKey> {
        IndexKey::new(&self.student_id, &self.course_code)
    }

    /// Serialize into a record-file payload.
    ///
    /// # Errors
    /// Returns [`Error::KeyFormat`] for invalid identifiers and
    /// [`Error::MalformedRecord`] if a name exceeds 255 bytes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        // Validating the key here keeps bad identifiers out of the
        // record file, not just out of the index.
        self.key()?;

        let name = self.name.as_bytes();
        let course_name = self.course_name.as_bytes();
        if name.len() > u8::MAX as usize {
            return Err(Error::MalformedRecord("student name longer than 255 bytes"));
        }
        if course_name.len() > u8::MAX as usize {
            return Err(Error::MalformedRecord("course name longer than 255 bytes"));
        }

        let mut buf = Vec::with_capacity(
            STUDENT_ID_LEN + COURSE_CODE_LEN + 2 + name.len() + course_name.len() + 8,
        );
        buf.extend_from_slice(self.student_id.as_bytes());
        buf.extend_from_slice(self.course_code.as_bytes());
        buf.push(name.len() as u8);
        buf.extend_from_slice(name);
        buf.push(course_name.len() as u8);
        buf.extend_from_slice(course_name);
        buf.extend_from_slice(&self.grade.to_le_bytes());
        buf.extend_from_slice(&self.attendance.to_le_bytes());
        Ok(buf)
    }

    /// Deserialize from a record-file payload.
    ///
    /// # Errors
    /// Returns [`Error::MalformedRecord`] if the payload is truncated,
    /// has trailing bytes, or holds non-UTF-8 text.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let mut cursor = Cursor {
            data: payload,
            at: 0,
        };

        let student_id = cursor.take_str(STUDENT_ID_LEN, "student id truncated")?;
        let course_code = cursor.take_str(COURSE_CODE_LEN, "course code truncated")?;

        let name_len = cursor.take_byte("name length missing")? as usize;
        let name = cursor.take_str(name_len, "name truncated")?;
        let course_len = cursor.take_byte("course name length missing")? as usize;
        let course_name = cursor.take_str(course_len, "course name truncated")?;

        let grade = f32::from_le_bytes(cursor.take_array("grade truncated")?);
        let attendance = f32::from_le_bytes(cursor.take_array("attendance truncated")?);

        if cursor.at != payload.len() {
            return Err(Error::MalformedRecord("trailing bytes after record"));
        }

        Ok(Self {
            student_id,
            course_code,
            name,
            course_name,
            grade,
            attendance,
        })
    }
}

struct Cursor<'a> {
    data: &'a [u8],
    at: usize,
}

impl Cursor<'_> {
    fn take(&mut self, n: usize, reason: &'static str) -> Result<&[u8]> {
        if self.at + n > self.data.len() {
            return Err(Error::MalformedRecord(reason));
        }
        let slice = &self.data[self.at..self.at + n];
        self.at += n;
        Ok(slice)
    }

    fn take_byte(&mut self, reason: &'static str) -> Result<u8> {
        Ok(self.take(1, reason)?[0])
    }

    fn take_str(&mut self, n: usize, reason: &'static str) -> Result<String> {
        let bytes = self.take(n, reason)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| Error::MalformedRecord("invalid UTF-8 in record text"))
    }

    fn take_array<const N: usize>(&mut self, reason: &'static str) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N, reason)?);
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StudentRecord {
        StudentRecord {
            student_id: "001".to_string(),
            course_code: "MAT".to_string(),
            name: "Ana Souza".to_string(),
            course_name: "Mathematics".to_string(),
            grade: 8.5,
            attendance: 0.93,
        }
    }

    #[test]
    fn test_encode_decode() {
        let record = sample();
        let payload = record.encode().unwrap();
        let back = StudentRecord::decode(&payload).unwrap();
        assert_eq!(record, back);
    }

    #[test]
    fn test_key_is_id_plus_course() {
        let key = sample().key().unwrap();
        assert_eq!(key.as_bytes(), b"001MAT");
    }

    #[test]
    fn test_encode_rejects_bad_identifiers() {
        let mut record = sample();
        record.student_id = "1".to_string();
        assert!(matches!(record.encode(), Err(Error::KeyFormat { .. })));

        let mut record = sample();
        record.course_code = "MATH".to_string();
        assert!(record.encode().is_err());
    }

    #[test]
    fn test_encode_rejects_oversized_name() {
        let mut record = sample();
        record.name = "x".repeat(256);
        assert!(matches!(
            record.encode(),
            Err(Error::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_decode_rejects_truncation() {
        let payload = sample().encode().unwrap();
        for cut in [0, 5, 8, payload.len() - 1] {
            assert!(StudentRecord::decode(&payload[..cut]).is_err());
        }
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let mut payload = sample().encode().unwrap();
        payload.push(0);
        assert!(matches!(
            StudentRecord::decode(&payload),
            Err(Error::MalformedRecord("trailing bytes after record"))
        ));
    }

    #[test]
    fn test_empty_names_are_valid() {
        let mut record = sample();
        record.name.clear();
        record.course_name.clear();
        let payload = record.encode().unwrap();
        assert_eq!(StudentRecord::decode(&payload).unwrap(), record);
    }
}
