// Fixed-layout row codec.
//
// A row is serialized into exactly ROW_SIZE bytes inside a leaf cell:
// the id as a little-endian u32, then two NUL-terminated string fields of
// fixed width. The slot always carries the full declared width; bytes past
// a string's terminator are zeroed.

/// Maximum number of bytes in a username, excluding the NUL terminator.
pub const COLUMN_USERNAME_SIZE: usize = 32;
/// Maximum number of bytes in an email, excluding the NUL terminator.
pub const COLUMN_EMAIL_SIZE: usize = 255;

pub const ID_SIZE: usize = 4;
pub const USERNAME_SIZE: usize = COLUMN_USERNAME_SIZE + 1;
pub const EMAIL_SIZE: usize = COLUMN_EMAIL_SIZE + 1;

pub const ID_OFFSET: usize = 0;
pub const USERNAME_OFFSET: usize = ID_OFFSET + ID_SIZE;
pub const EMAIL_OFFSET: usize = USERNAME_OFFSET + USERNAME_SIZE;

/// Serialized size of one row: 4 + 33 + 256 bytes.
pub const ROW_SIZE: usize = ID_SIZE + USERNAME_SIZE + EMAIL_SIZE;

/// One row of the users table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: u32,
    pub username: String,
    pub email: String,
}

impl Row {
    pub fn new(id: u32, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
        }
    }

    /// Write the on-disk form of this row into `dst`, which must be at
    /// least ROW_SIZE bytes. Strings longer than their column are truncated
    /// by the bounded copy; each field keeps a NUL terminator.
    pub fn serialize(&self, dst: &mut [u8]) {
        dst[..ROW_SIZE].fill(0);
        dst[ID_OFFSET..ID_OFFSET + ID_SIZE].copy_from_slice(&self.id.to_le_bytes());
        copy_str(
            &mut dst[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE],
            &self.username,
        );
        copy_str(&mut dst[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE], &self.email);
    }

    /// Read a row back from its on-disk form.
    pub fn deserialize(src: &[u8]) -> Self {
        let id = u32::from_le_bytes([
            src[ID_OFFSET],
            src[ID_OFFSET + 1],
            src[ID_OFFSET + 2],
            src[ID_OFFSET + 3],
        ]);
        let username = read_str(&src[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE]);
        let email = read_str(&src[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE]);
        Self { id, username, email }
    }
}

/// Bounded copy into a fixed-width field, always leaving room for a NUL.
fn copy_str(dst: &mut [u8], s: &str) {
    let n = s.len().min(dst.len() - 1);
    dst[..n].copy_from_slice(&s.as_bytes()[..n]);
}

/// Read a string field up to its first NUL.
fn read_str(src: &[u8]) -> String {
    let end = src.iter().position(|&b| b == 0).unwrap_or(src.len());
    String::from_utf8_lossy(&src[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_constants() {
        assert_eq!(ROW_SIZE, 293);
        assert_eq!(USERNAME_OFFSET, 4);
        assert_eq!(EMAIL_OFFSET, 37);
    }

    #[test]
    fn test_round_trip() {
        let row = Row::new(42, "alice", "alice@example.com");
        let mut buf = [0u8; ROW_SIZE];
        row.serialize(&mut buf);
        assert_eq!(Row::deserialize(&buf), row);
    }

    #[test]
    fn test_id_is_little_endian() {
        let row = Row::new(0x01020304, "u", "e");
        let mut buf = [0u8; ROW_SIZE];
        row.serialize(&mut buf);
        assert_eq!(&buf[..4], &[0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_fields_are_nul_terminated() {
        let row = Row::new(1, "a".repeat(COLUMN_USERNAME_SIZE), "b".repeat(COLUMN_EMAIL_SIZE));
        let mut buf = [0u8; ROW_SIZE];
        row.serialize(&mut buf);
        assert_eq!(buf[USERNAME_OFFSET + COLUMN_USERNAME_SIZE], 0);
        assert_eq!(buf[EMAIL_OFFSET + COLUMN_EMAIL_SIZE], 0);
        let back = Row::deserialize(&buf);
        assert_eq!(back.username.len(), COLUMN_USERNAME_SIZE);
        assert_eq!(back.email.len(), COLUMN_EMAIL_SIZE);
    }

    #[test]
    fn test_overlong_strings_are_truncated() {
        let row = Row::new(1, "x".repeat(100), "y".repeat(300));
        let mut buf = [0u8; ROW_SIZE];
        row.serialize(&mut buf);
        let back = Row::deserialize(&buf);
        assert_eq!(back.username, "x".repeat(COLUMN_USERNAME_SIZE));
        assert_eq!(back.email, "y".repeat(COLUMN_EMAIL_SIZE));
    }

    #[test]
    fn test_slot_tail_is_zeroed() {
        let mut buf = [0xAAu8; ROW_SIZE];
        Row::new(7, "ab", "cd").serialize(&mut buf);
        assert!(buf[USERNAME_OFFSET + 2..USERNAME_OFFSET + USERNAME_SIZE]
            .iter()
            .all(|&b| b == 0));
        assert!(buf[EMAIL_OFFSET + 2..].iter().all(|&b| b == 0));
    }
}
