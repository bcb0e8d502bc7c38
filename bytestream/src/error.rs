//! Error types for byte-level operations.

use thiserror::Error;

/// Result type for byte-level operations.
pub type ByteResult<T> = Result<T, ByteError>;

/// Errors that can occur while reading or writing wire bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ByteError {
    /// Attempted to read past the end of the buffer.
    #[error("attempted to read {requested} bytes but only {available} bytes available")]
    Truncated {
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// Encoded string does not fit the fixed-width field.
    #[error("string of {length} bytes does not fit in {capacity} usable bytes")]
    StringTooLong {
        /// Encoded length of the string.
        length: usize,
        /// Usable capacity (field width minus any mandatory terminator).
        capacity: usize,
    },

    /// Character outside the wire code page.
    #[error("character {ch:?} cannot be encoded in the wire code page")]
    UnmappableChar {
        /// The offending character.
        ch: char,
    },

    /// Array has more elements than its declared capacity.
    #[error("array of {count} elements exceeds capacity {capacity}")]
    ArrayTooLong {
        /// Number of elements supplied.
        count: usize,
        /// Declared capacity.
        capacity: usize,
    },

    /// A nested structure wrote more bytes than its declared width.
    #[error("structure wrote {written} bytes but is declared {width} bytes wide")]
    StructureOverflow {
        /// Bytes actually written.
        written: usize,
        /// Declared width.
        width: usize,
    },

    /// Value exceeds the range representable by the byte width.
    #[error("value {value} cannot be represented in {width} bytes")]
    ValueOutOfRange {
        /// The value that was out of range.
        value: u64,
        /// Byte width of the field.
        width: usize,
    },

    /// Unsupported integer width.
    #[error("invalid integer width {width}, expected 1, 2, 4 or 8")]
    InvalidWidth {
        /// The width requested.
        width: usize,
    },

    /// Offset lies outside the buffer.
    #[error("offset {offset} is outside a buffer of {len} bytes")]
    InvalidOffset {
        /// The requested offset.
        offset: usize,
        /// Buffer length.
        len: usize,
    },
}
