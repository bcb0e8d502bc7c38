//! Request/response correlation for the InSim client core.
//!
//! An instruction that makes the host reply is issued through the
//! [`Engine`]. The engine picks a request id that no waiting request for
//! the same reply type holds, builds and encodes the instruction with it,
//! and arms a deadline. Each decoded inbound packet is then offered to
//! [`Engine::dispatch`], which hands matching replies to the request's
//! receiver.
//!
//! # Design Principles
//!
//! - **One table, one lock** - Issue, fulfilment, timeout and cancellation all serialize on the pending table.
//! - **First transition wins** - A request leaves `Waiting` exactly once; later events find nothing to do.
//! - **Never block the reader** - Replies are handed to channels; completion predicates run outside the table lock.
//! - **Ids from construction** - Instructions are built with their request id, never patched afterwards.

mod config;
mod engine;
mod error;
mod reply;
mod table;

pub use config::{EngineConfig, DEFAULT_TIMEOUT, MAX_REQUEST_ID};
pub use engine::{Dispatch, EncodedInstruction, Engine, PendingState};
pub use error::{IssueError, RequestError};
pub use reply::{Completion, PendingReply, ReplyResult, ReplySink, ReplyStream};
