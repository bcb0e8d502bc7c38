//! Correlation errors.

use codec::{CodecError, ReplyKey};
use schema::ValidationError;
use thiserror::Error;
use wire::RequestId;

/// Errors returned synchronously when a request cannot be issued.
///
/// Nothing was sent and no id stays reserved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IssueError {
    /// Every id for this reply type is held by a waiting request.
    #[error("no free request id for replies keyed {key} (max {max})")]
    CorrelationExhausted { key: ReplyKey, max: u8 },

    /// The instruction does not produce replies with this key.
    #[error("instruction {type_tag} does not produce replies keyed {key}")]
    NotRequestable { type_tag: u8, key: ReplyKey },

    /// The instruction breaks its schema.
    #[error("invalid instruction: {0}")]
    Invalid(#[from] ValidationError),

    /// The instruction passed validation but could not be encoded.
    #[error("encode failed: {0}")]
    Encode(#[source] CodecError),

    /// Deadlines need a Tokio runtime on the calling thread.
    #[error("no tokio runtime to arm the request deadline")]
    NoRuntime,
}

impl From<CodecError> for IssueError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Invalid(err) => Self::Invalid(err),
            other => Self::Encode(other),
        }
    }
}

/// Failures delivered to a request's own receiver instead of a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RequestError {
    /// The deadline passed with the request still waiting.
    #[error("request {request_id} for {key} timed out")]
    TimedOut { key: ReplyKey, request_id: RequestId },

    /// The connection closed, or the request was withdrawn, before it completed.
    #[error("request {request_id} for {key} cancelled")]
    Cancelled { key: ReplyKey, request_id: RequestId },
}
