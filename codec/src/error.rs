//! Error types for codec operations.

use schema::ValidationError;
use thiserror::Error;
use wire::{DecodeError, EncodeError};

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors from the encode and decode entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CodecError {
    /// The outgoing message breaks its schema; nothing was encoded.
    #[error("invalid message: {0}")]
    Invalid(#[from] ValidationError),

    /// The message passed validation but could not be laid out.
    #[error("encode failed: {0}")]
    Encode(#[from] EncodeError),

    /// Inbound bytes could not be decoded.
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),
}
