//! Byte cursor with bounded reads.

use crate::charset;
use crate::error::{ByteError, ByteResult};

/// A cursor over a received byte buffer.
///
/// All reads are bounds-checked and advance the cursor by exactly the
/// declared width. A failed read leaves the position untouched.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Creates a new cursor at the start of `data`.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Creates a cursor starting at `offset`.
    pub const fn with_offset(data: &'a [u8], offset: usize) -> ByteResult<Self> {
        if offset > data.len() {
            return Err(ByteError::InvalidOffset {
                offset,
                len: data.len(),
            });
        }
        Ok(Self { data, pos: offset })
    }

    /// Returns the current byte position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of bytes left to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Reads `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> ByteResult<&'a [u8]> {
        let available = self.remaining();
        if n > available {
            return Err(ByteError::Truncated {
                requested: n,
                available,
            });
        }
        let start = self.pos;
        self.pos += n;
        Ok(&self.data[start..self.pos])
    }

    fn read_array<const N: usize>(&mut self) -> ByteResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> ByteResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> ByteResult<i8> {
        Ok(i8::from_le_bytes(self.read_array()?))
    }

    /// Reads a little-endian `u16`.
    pub fn read_u16(&mut self) -> ByteResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Reads a little-endian `i16`.
    pub fn read_i16(&mut self) -> ByteResult<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    /// Reads a little-endian `u32`.
    pub fn read_u32(&mut self) -> ByteResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Reads a little-endian `i32`.
    pub fn read_i32(&mut self) -> ByteResult<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    /// Reads a little-endian IEEE-754 `f32`.
    pub fn read_f32(&mut self) -> ByteResult<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    /// Reads an unsigned little-endian integer of `width` bytes (1, 2, 4 or 8).
    pub fn read_unsigned(&mut self, width: usize) -> ByteResult<u64> {
        match width {
            1 => self.read_u8().map(u64::from),
            2 => self.read_u16().map(u64::from),
            4 => self.read_u32().map(u64::from),
            8 => Ok(u64::from_le_bytes(self.read_array()?)),
            _ => Err(ByteError::InvalidWidth { width }),
        }
    }

    /// Reads a fixed character array of `n` bytes.
    ///
    /// The text ends at the first NUL; anything after it is ignored.
    pub fn read_char_array(&mut self, n: usize) -> ByteResult<String> {
        self.read_bytes(n).map(charset::decode_char_array)
    }

    /// Reads the element bytes of a variable-length array whose count has
    /// already been read.
    pub fn read_variable_array(&mut self, count: usize, element_width: usize) -> ByteResult<&'a [u8]> {
        let len = count.checked_mul(element_width).ok_or(ByteError::Truncated {
            requested: usize::MAX,
            available: self.remaining(),
        })?;
        self.read_bytes(len)
    }

    /// Skips `n` padding bytes and returns how many of them were non-zero.
    ///
    /// Whether non-zero padding is acceptable is a policy decision for the
    /// caller; the cursor only reports it.
    pub fn skip_padding(&mut self, n: usize) -> ByteResult<usize> {
        let skipped = self.read_bytes(n)?;
        Ok(skipped.iter().filter(|&&byte| byte != 0).count())
    }

    /// Reads a nested structure that occupies exactly `width` bytes.
    ///
    /// `read` sees a cursor limited to the structure. The outer cursor
    /// advances by `width` no matter how much of it `read` consumed, and
    /// not at all if `read` fails.
    pub fn read_structure<T, E, F>(&mut self, width: usize, read: F) -> Result<T, E>
    where
        E: From<ByteError>,
        F: FnOnce(&mut ByteCursor<'a>) -> Result<T, E>,
    {
        let start = self.pos;
        let bytes = self.read_bytes(width)?;
        let mut inner = ByteCursor::new(bytes);
        read(&mut inner).map_err(|err| {
            self.pos = start;
            err
        })
    }

    /// Reads `count` consecutive structures of `width` bytes each.
    pub fn read_structures<T, E, F>(&mut self, count: usize, width: usize, mut read: F) -> Result<Vec<T>, E>
    where
        E: From<ByteError>,
        F: FnMut(&mut ByteCursor<'a>) -> Result<T, E>,
    {
        let needed = count.saturating_mul(width);
        if needed > self.remaining() {
            return Err(ByteError::Truncated {
                requested: needed,
                available: self.remaining(),
            }
            .into());
        }
        let start = self.pos;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            match self.read_structure(width, &mut read) {
                Ok(item) => items.push(item),
                Err(err) => {
                    self.pos = start;
                    return Err(err);
                }
            }
        }
        Ok(items)
    }

    /// Returns every remaining byte without consuming it.
    #[must_use]
    pub fn peek_rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Consumes and returns every remaining byte.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let start = self.pos;
        self.pos = self.data.len();
        &self.data[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cursor() {
        let cursor = ByteCursor::new(&[]);
        assert!(cursor.is_empty());
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn read_from_empty_fails() {
        let mut cursor = ByteCursor::new(&[]);
        let err = cursor.read_u8().unwrap_err();
        assert_eq!(
            err,
            ByteError::Truncated {
                requested: 1,
                available: 0
            }
        );
    }

    #[test]
    fn failed_read_keeps_position() {
        let mut cursor = ByteCursor::new(&[1, 2, 3]);
        cursor.read_u8().unwrap();
        assert!(cursor.read_u32().is_err());
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read_u16().unwrap(), 0x0302);
    }

    #[test]
    fn little_endian_integers() {
        let mut cursor = ByteCursor::new(&[0x78, 0x56, 0x34, 0x12, 0xFE, 0xFF, 0x0A, 0x00]);
        assert_eq!(cursor.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(cursor.read_i16().unwrap(), -2);
        assert_eq!(cursor.read_u16().unwrap(), 10);
        assert!(cursor.is_empty());
    }

    #[test]
    fn read_float() {
        let bytes = 1.5f32.to_le_bytes();
        let mut cursor = ByteCursor::new(&bytes);
        assert!((cursor.read_f32().unwrap() - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn with_offset_starts_mid_buffer() {
        let mut cursor = ByteCursor::with_offset(&[9, 9, 9, 7], 3).unwrap();
        assert_eq!(cursor.read_u8().unwrap(), 7);
        assert!(ByteCursor::with_offset(&[0], 2).is_err());
    }

    #[test]
    fn read_unsigned_widths() {
        let mut cursor = ByteCursor::new(&[1, 2, 0, 3, 0, 0, 0]);
        assert_eq!(cursor.read_unsigned(1).unwrap(), 1);
        assert_eq!(cursor.read_unsigned(2).unwrap(), 2);
        assert_eq!(cursor.read_unsigned(4).unwrap(), 3);
        assert_eq!(
            cursor.read_unsigned(3).unwrap_err(),
            ByteError::InvalidWidth { width: 3 }
        );
    }

    #[test]
    fn char_array_truncates_at_nul_and_ignores_padding() {
        let mut cursor = ByteCursor::new(b"ABC\0\x55\x66rest");
        assert_eq!(cursor.read_char_array(6).unwrap(), "ABC");
        assert_eq!(cursor.position(), 6);
    }

    #[test]
    fn variable_array_reads_count_times_width() {
        let mut cursor = ByteCursor::new(&[0x0A, 0x00, 0x14, 0x00, 0xFF]);
        let elements = cursor.read_variable_array(2, 2).unwrap();
        assert_eq!(elements, &[0x0A, 0x00, 0x14, 0x00]);
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn skip_padding_reports_nonzero_bytes() {
        let mut cursor = ByteCursor::new(&[0, 7, 0, 9]);
        assert_eq!(cursor.skip_padding(4).unwrap(), 2);
        assert!(cursor.is_empty());
    }

    #[test]
    fn structure_advances_by_declared_width() {
        let mut cursor = ByteCursor::new(&[1, 2, 3, 4, 5]);
        let first = cursor
            .read_structure::<_, ByteError, _>(4, |inner| inner.read_u8())
            .unwrap();
        assert_eq!(first, 1);
        assert_eq!(cursor.read_u8().unwrap(), 5);
    }

    #[test]
    fn structure_cannot_read_past_its_width() {
        let mut cursor = ByteCursor::new(&[1, 2, 3, 4]);
        let err = cursor
            .read_structure::<_, ByteError, _>(2, |inner| inner.read_u32())
            .unwrap_err();
        assert!(matches!(err, ByteError::Truncated { requested: 4, available: 2 }));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn failed_structure_in_sequence_rewinds_whole_read() {
        let mut cursor = ByteCursor::new(&[1, 0, 2, 0, 3, 0]);
        let err = cursor
            .read_structures::<_, ByteError, _>(3, 2, |inner| {
                let value = inner.read_u16()?;
                if value == 3 {
                    inner.read_u8()
                } else {
                    Ok(0)
                }
            })
            .unwrap_err();
        assert!(matches!(err, ByteError::Truncated { .. }));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn structures_checks_total_length_up_front() {
        let mut cursor = ByteCursor::new(&[1, 0, 2, 0, 3]);
        let err = cursor
            .read_structures::<_, ByteError, _>(3, 2, |inner| inner.read_u16())
            .unwrap_err();
        assert!(matches!(err, ByteError::Truncated { requested: 6, .. }));
        assert_eq!(cursor.position(), 0);

        let items = cursor
            .read_structures::<_, ByteError, _>(2, 2, |inner| inner.read_u16())
            .unwrap();
        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn peek_rest_leaves_position() {
        let mut cursor = ByteCursor::new(&[1, 2, 3]);
        cursor.read_u8().unwrap();
        assert_eq!(cursor.peek_rest(), &[2, 3]);
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn read_rest_drains() {
        let mut cursor = ByteCursor::new(&[1, 2, 3]);
        cursor.read_u8().unwrap();
        assert_eq!(cursor.read_rest(), &[2, 3]);
        assert!(cursor.is_empty());
    }
}
