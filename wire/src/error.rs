//! Error types for wire format operations.

use std::fmt;

use bytestream::ByteError;
use thiserror::Error;

use crate::limits::SizeEncoding;

/// Result type for wire format operations.
pub type WireResult<T> = Result<T, DecodeError>;

/// Errors raised while decoding inbound frames.
///
/// A decode error condemns one frame only; the stream carries on with the
/// next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// Frame is too short for what it must contain.
    #[error("frame truncated: {actual} bytes, need at least {required}")]
    Truncated { actual: usize, required: usize },

    /// The size byte disagrees with the frame length.
    #[error("length mismatch: header declares {declared} bytes but frame has {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    /// The size byte is not a multiple of four.
    #[error("unaligned packet size: {size}")]
    UnalignedSize { size: usize },

    /// No message is registered for this type tag.
    #[error("unknown type tag: {type_tag}")]
    UnknownTypeTag { type_tag: u8 },

    /// Frame was handed to a decoder for another message type.
    #[error("type tag mismatch: expected {expected}, found {found}")]
    TypeTagMismatch { expected: u8, found: u8 },

    /// Frame size differs from the message's fixed size.
    #[error("{schema}: packet is {actual} bytes, schema requires {expected}")]
    SizeMismatch {
        schema: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The element count is inconsistent with the schema or the frame size.
    #[error("{schema}: element count {count} invalid for {size} byte packet (max {max})")]
    InvalidCount {
        schema: &'static str,
        count: usize,
        max: usize,
        size: usize,
    },

    /// Reserved bytes were non-zero under a strict padding policy.
    #[error("{count} non-zero reserved bytes in field {field}")]
    NonZeroPadding { field: &'static str, count: usize },

    /// Limits exceeded.
    #[error("{kind} limit exceeded: {actual} > {limit}")]
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// Byte-level read failure inside a frame.
    #[error("byte stream error: {0}")]
    Byte(#[from] ByteError),
}

/// Specific wire limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    PacketBytes,
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PacketBytes => "packet bytes",
        };
        write!(f, "{name}")
    }
}

/// Errors raised while finishing an outgoing packet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum EncodeError {
    /// Written body does not produce the size the schema requires.
    #[error("{schema}: encoded {actual} bytes, schema requires {expected}")]
    SizeMismatch {
        schema: &'static str,
        expected: usize,
        actual: usize,
    },

    /// More elements than the schema allows.
    #[error("{schema}: {count} elements exceeds maximum {max}")]
    CountExceeded {
        schema: &'static str,
        count: usize,
        max: usize,
    },

    /// Writer was created for another message type.
    #[error("type tag mismatch: writer has {writer}, schema {schema} has {expected}")]
    TypeTagMismatch {
        schema: &'static str,
        expected: u8,
        writer: u8,
    },

    /// Packet exceeds the configured maximum size.
    #[error("packet of {actual} bytes exceeds limit of {limit}")]
    TooLarge { limit: usize, actual: usize },

    /// The size cannot be expressed in the header's size byte.
    #[error("size {size} cannot be encoded as {encoding:?}")]
    UnencodableSize { size: usize, encoding: SizeEncoding },

    /// Byte-level write failure.
    #[error("byte stream error: {0}")]
    Byte(#[from] ByteError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_display_length_mismatch() {
        let err = DecodeError::LengthMismatch {
            declared: 20,
            actual: 16,
        };
        let msg = err.to_string();
        assert!(msg.contains("20"));
        assert!(msg.contains("16"));
    }

    #[test]
    fn decode_error_display_limits_exceeded() {
        let err = DecodeError::LimitsExceeded {
            kind: LimitKind::PacketBytes,
            limit: 252,
            actual: 256,
        };
        let msg = err.to_string();
        assert!(msg.contains("packet bytes"));
        assert!(msg.contains("256"));
    }

    #[test]
    fn byte_errors_convert() {
        let err: DecodeError = ByteError::Truncated {
            requested: 4,
            available: 1,
        }
        .into();
        assert!(matches!(err, DecodeError::Byte(_)));
        assert!(err.to_string().contains("byte stream"));
    }

    #[test]
    fn encode_error_display() {
        let err = EncodeError::SizeMismatch {
            schema: "IS_TINY",
            expected: 4,
            actual: 8,
        };
        let msg = err.to_string();
        assert!(msg.contains("IS_TINY"));
        assert!(msg.contains("requires 4"));
    }
}
