//! Growable byte writer for encoding wire data.

use crate::charset;
use crate::error::{ByteError, ByteResult};

/// A growable little-endian writer.
///
/// Writes are accumulated in an internal buffer. Call [`finish`](Self::finish)
/// to take the bytes.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    bytes: Vec<u8>,
}

impl ByteWriter {
    /// Creates a new empty `ByteWriter`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `ByteWriter` with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
        }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the bytes written so far.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u16(&mut self, value: u16) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i16(&mut self, value: i16) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes an unsigned integer into `width` bytes (1, 2, 4 or 8).
    ///
    /// # Errors
    ///
    /// Returns [`ByteError::ValueOutOfRange`] if `value` doesn't fit in `width`
    /// bytes and [`ByteError::InvalidWidth`] for any other width.
    pub fn write_unsigned(&mut self, value: u64, width: usize) -> ByteResult<()> {
        if !matches!(width, 1 | 2 | 4 | 8) {
            return Err(ByteError::InvalidWidth { width });
        }
        if width < 8 && value >= 1u64 << (width * 8) {
            return Err(ByteError::ValueOutOfRange { value, width });
        }
        self.bytes.extend_from_slice(&value.to_le_bytes()[..width]);
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Writes `n` zero bytes for reserved or alignment fields.
    pub fn write_zero_bytes(&mut self, n: usize) {
        self.bytes.resize(self.bytes.len() + n, 0);
    }

    /// Writes `text` into a fixed field of `width` bytes, NUL-padded.
    ///
    /// When `terminated` is set the last byte is reserved for a NUL, so at
    /// most `width - 1` characters fit. Oversized text is an error, never
    /// silently truncated.
    pub fn write_char_array(&mut self, text: &str, width: usize, terminated: bool) -> ByteResult<()> {
        let encoded = charset::encode_str(text)?;
        let capacity = width.saturating_sub(usize::from(terminated));
        if encoded.len() > capacity {
            return Err(ByteError::StringTooLong {
                length: encoded.len(),
                capacity,
            });
        }
        self.bytes.extend_from_slice(&encoded);
        self.write_zero_bytes(width - encoded.len());
        Ok(())
    }

    /// Writes `text` followed by one NUL, for fields whose width follows
    /// their content. Returns the number of bytes written.
    pub fn write_dynamic_chars(&mut self, text: &str, max_width: usize) -> ByteResult<usize> {
        let encoded = charset::encode_str(text)?;
        let capacity = max_width.saturating_sub(1);
        if encoded.len() > capacity {
            return Err(ByteError::StringTooLong {
                length: encoded.len(),
                capacity,
            });
        }
        self.bytes.extend_from_slice(&encoded);
        self.write_u8(0);
        Ok(encoded.len() + 1)
    }

    /// Writes a nested structure declared `width` bytes wide.
    ///
    /// Any bytes `write` leaves unwritten are zero-filled.
    pub fn write_structure<E, F>(&mut self, width: usize, write: F) -> Result<(), E>
    where
        E: From<ByteError>,
        F: FnOnce(&mut Self) -> Result<(), E>,
    {
        let start = self.bytes.len();
        write(self)?;
        let written = self.bytes.len() - start;
        if written > width {
            self.bytes.truncate(start);
            return Err(ByteError::StructureOverflow { written, width }.into());
        }
        self.write_zero_bytes(width - written);
        Ok(())
    }

    /// Writes every item as a `element_width`-byte structure.
    ///
    /// With a `capacity` the remaining slots are filled with zeroed elements;
    /// without one (fully dynamic arrays) nothing follows the last item.
    pub fn write_array<T, E, F>(
        &mut self,
        items: &[T],
        capacity: Option<usize>,
        element_width: usize,
        mut write_one: F,
    ) -> Result<(), E>
    where
        E: From<ByteError>,
        F: FnMut(&mut Self, &T) -> Result<(), E>,
    {
        if let Some(capacity) = capacity {
            if items.len() > capacity {
                return Err(ByteError::ArrayTooLong {
                    count: items.len(),
                    capacity,
                }
                .into());
            }
        }
        for item in items {
            self.write_structure(element_width, |writer| write_one(writer, item))?;
        }
        if let Some(capacity) = capacity {
            self.write_zero_bytes((capacity - items.len()) * element_width);
        }
        Ok(())
    }

    /// Overwrites a previously written byte.
    pub fn set_u8(&mut self, offset: usize, value: u8) -> ByteResult<()> {
        let len = self.bytes.len();
        let slot = self
            .bytes
            .get_mut(offset)
            .ok_or(ByteError::InvalidOffset { offset, len })?;
        *slot = value;
        Ok(())
    }

    /// Pads with zeros until the length is a multiple of `align`.
    ///
    /// Returns the number of padding bytes written.
    pub fn pad_to_alignment(&mut self, align: usize) -> usize {
        if align == 0 {
            return 0;
        }
        let pad = (align - self.bytes.len() % align) % align;
        self.write_zero_bytes(pad);
        pad
    }

    /// Finishes writing and returns the byte buffer.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_writer() {
        let writer = ByteWriter::new();
        assert!(writer.is_empty());
        assert!(writer.finish().is_empty());
    }

    #[test]
    fn integers_are_little_endian() {
        let mut writer = ByteWriter::new();
        writer.write_u16(0xBEEF);
        writer.write_u32(0x1234_5678);
        writer.write_i16(-2);
        assert_eq!(
            writer.finish(),
            vec![0xEF, 0xBE, 0x78, 0x56, 0x34, 0x12, 0xFE, 0xFF]
        );
    }

    #[test]
    fn write_unsigned_checks_width() {
        let mut writer = ByteWriter::new();
        writer.write_unsigned(255, 1).unwrap();
        assert_eq!(
            writer.write_unsigned(256, 1).unwrap_err(),
            ByteError::ValueOutOfRange { value: 256, width: 1 }
        );
        writer.write_unsigned(0x0102, 2).unwrap();
        assert_eq!(
            writer.write_unsigned(1, 3).unwrap_err(),
            ByteError::InvalidWidth { width: 3 }
        );
        assert_eq!(writer.finish(), vec![0xFF, 0x02, 0x01]);
    }

    #[test]
    fn char_array_pads_with_nul() {
        let mut writer = ByteWriter::new();
        writer.write_char_array("ABC", 4, true).unwrap();
        assert_eq!(writer.finish(), b"ABC\0".to_vec());
    }

    #[test]
    fn terminated_char_array_reserves_last_byte() {
        let mut writer = ByteWriter::new();
        writer.write_char_array(&"x".repeat(23), 24, true).unwrap();
        let err = writer.write_char_array(&"x".repeat(24), 24, true).unwrap_err();
        assert_eq!(
            err,
            ByteError::StringTooLong {
                length: 24,
                capacity: 23
            }
        );
        assert_eq!(writer.len(), 24);
    }

    #[test]
    fn unterminated_char_array_uses_full_width() {
        let mut writer = ByteWriter::new();
        writer.write_char_array("0.7F", 4, false).unwrap();
        assert_eq!(writer.finish(), b"0.7F".to_vec());
    }

    #[test]
    fn dynamic_chars_append_single_nul() {
        let mut writer = ByteWriter::new();
        assert_eq!(writer.write_dynamic_chars("hi", 240).unwrap(), 3);
        assert_eq!(writer.finish(), b"hi\0".to_vec());
    }

    #[test]
    fn structure_zero_fills_to_width() {
        let mut writer = ByteWriter::new();
        writer
            .write_structure::<ByteError, _>(4, |inner| {
                inner.write_u8(7);
                Ok(())
            })
            .unwrap();
        assert_eq!(writer.finish(), vec![7, 0, 0, 0]);
    }

    #[test]
    fn structure_overflow_is_rolled_back() {
        let mut writer = ByteWriter::new();
        writer.write_u8(1);
        let err = writer
            .write_structure::<ByteError, _>(2, |inner| {
                inner.write_u32(0);
                Ok(())
            })
            .unwrap_err();
        assert_eq!(err, ByteError::StructureOverflow { written: 4, width: 2 });
        assert_eq!(writer.finish(), vec![1]);
    }

    #[test]
    fn array_pads_remaining_slots() {
        let mut writer = ByteWriter::new();
        writer
            .write_array::<u16, ByteError, _>(&[10, 20], Some(4), 2, |inner, value| {
                inner.write_u16(*value);
                Ok(())
            })
            .unwrap();
        assert_eq!(writer.finish(), vec![10, 0, 20, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn dynamic_array_writes_only_items() {
        let mut writer = ByteWriter::new();
        writer
            .write_array::<u16, ByteError, _>(&[10, 20], None, 2, |inner, value| {
                inner.write_u16(*value);
                Ok(())
            })
            .unwrap();
        assert_eq!(writer.finish(), vec![10, 0, 20, 0]);
    }

    #[test]
    fn array_over_capacity_fails() {
        let mut writer = ByteWriter::new();
        let err = writer
            .write_array::<u8, ByteError, _>(&[1, 2, 3], Some(2), 1, |inner, value| {
                inner.write_u8(*value);
                Ok(())
            })
            .unwrap_err();
        assert_eq!(err, ByteError::ArrayTooLong { count: 3, capacity: 2 });
    }

    #[test]
    fn pad_to_alignment() {
        let mut writer = ByteWriter::new();
        writer.write_bytes(&[1, 2, 3, 4, 5]);
        assert_eq!(writer.pad_to_alignment(4), 3);
        assert_eq!(writer.pad_to_alignment(4), 0);
        assert_eq!(writer.len(), 8);
    }

    #[test]
    fn set_u8_patches_in_place() {
        let mut writer = ByteWriter::new();
        writer.write_zero_bytes(3);
        writer.set_u8(1, 9).unwrap();
        assert!(writer.set_u8(3, 1).is_err());
        assert_eq!(writer.finish(), vec![0, 9, 0]);
    }
}
