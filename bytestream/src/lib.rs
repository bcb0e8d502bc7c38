//! Byte-level reading and writing primitives for the InSim codec.
//!
//! This crate provides [`ByteCursor`] and [`ByteWriter`] for little-endian
//! encoding and decoding, plus the single-byte [`charset`] used for every
//! character field on the wire.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are bounds-checked.
//! - **No protocol knowledge** - This crate knows nothing about headers, type tags or messages.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use bytestream::{ByteCursor, ByteWriter};
//!
//! let mut writer = ByteWriter::new();
//! writer.write_u8(5);
//! writer.write_char_array("ABC", 4, true).unwrap();
//! writer.write_u16(300);
//!
//! let bytes = writer.finish();
//!
//! let mut cursor = ByteCursor::new(&bytes);
//! assert_eq!(cursor.read_u8().unwrap(), 5);
//! assert_eq!(cursor.read_char_array(4).unwrap(), "ABC");
//! assert_eq!(cursor.read_u16().unwrap(), 300);
//! ```

pub mod charset;
mod cursor;
mod error;
mod writer;

pub use cursor::ByteCursor;
pub use error::{ByteError, ByteResult};
pub use writer::ByteWriter;

/// Rounds `len` up to the next multiple of four.
#[must_use]
pub const fn align4(len: usize) -> usize {
    (len + 3) & !3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_roundtrip() {
        let writer = ByteWriter::new();
        let bytes = writer.finish();
        assert!(bytes.is_empty());

        let cursor = ByteCursor::new(&bytes);
        assert!(cursor.is_empty());
    }

    #[test]
    fn align4_rounds_up() {
        assert_eq!(align4(0), 0);
        assert_eq!(align4(1), 4);
        assert_eq!(align4(4), 4);
        assert_eq!(align4(13), 16);
        assert_eq!(align4(252), 252);
    }

    #[test]
    fn mixed_roundtrip() {
        let mut writer = ByteWriter::new();
        writer.write_u8(0xAB);
        writer.write_i32(-7);
        writer.write_char_array("Fern Bay", 16, true).unwrap();
        writer.write_zero_bytes(2);
        writer.write_f32(0.25);
        let bytes = writer.finish();
        assert_eq!(bytes.len(), 1 + 4 + 16 + 2 + 4);

        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(cursor.read_u8().unwrap(), 0xAB);
        assert_eq!(cursor.read_i32().unwrap(), -7);
        assert_eq!(cursor.read_char_array(16).unwrap(), "Fern Bay");
        assert_eq!(cursor.skip_padding(2).unwrap(), 0);
        assert!((cursor.read_f32().unwrap() - 0.25).abs() < f32::EPSILON);
        assert!(cursor.is_empty());
    }
}
