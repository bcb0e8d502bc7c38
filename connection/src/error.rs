//! Connection errors.

use std::io;

use codec::CodecError;
use correlation::IssueError;
use thiserror::Error;
use wire::DecodeError;

/// Result type for connection operations.
pub type ConnectionResult<T> = Result<T, ConnectionError>;

/// Errors raised at the connection boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConnectionError {
    /// An outgoing message could not be encoded; nothing was sent.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A request could not be issued; nothing was sent.
    #[error(transparent)]
    Issue(#[from] IssueError),

    /// An inbound frame was dropped.
    #[error("dropped inbound frame: {0}")]
    Decode(#[from] DecodeError),

    /// The transport refused the frame.
    #[error("transport error: {0}")]
    Io(#[from] io::Error),

    /// The connection has been closed.
    #[error("connection closed")]
    Closed,
}
