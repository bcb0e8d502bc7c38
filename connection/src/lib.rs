//! Connection boundary for the InSim client core.
//!
//! A [`Connection`] sits between a byte transport and the codec: outgoing
//! messages are validated and encoded before they reach the [`Transport`],
//! and inbound frames are decoded, offered to the correlation engine and
//! broadcast to listeners. Framing of a stream transport happens in
//! [`Connection::pump`].
//!
//! # Design Principles
//!
//! - **Drop, don't die** - A malformed frame is logged and skipped; the stream carries on.
//! - **Listeners see everything** - Packets claimed by a request are still broadcast.
//! - **Close cancels** - Tearing down a connection fails every waiting request exactly once.

mod config;
mod connection;
mod error;
mod transport;

pub use config::{ConnectionConfig, DEFAULT_LISTENER_CAPACITY};
pub use connection::Connection;
pub use error::{ConnectionError, ConnectionResult};
pub use transport::{write_frames, Transport};
