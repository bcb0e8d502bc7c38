//! Routing between the transport, the codec and the correlation engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use codec::{decode_frame, encode, InSimPacket, IsTiny, ReplyPlan, Requestable, Sendable};
use correlation::{Dispatch, EncodedInstruction, Engine, PendingReply, ReplyStream};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};
use wire::{FrameAssembler, RequestId};

use crate::config::ConnectionConfig;
use crate::error::{ConnectionError, ConnectionResult};
use crate::transport::Transport;

/// Read buffer for [`Connection::pump`].
const READ_CHUNK: usize = 1024;

/// One session with a host.
///
/// Inbound frames are decoded, offered to the correlation engine and then
/// broadcast to every listener, whether or not a request claimed them.
pub struct Connection<T> {
    transport: T,
    engine: Engine,
    config: ConnectionConfig,
    listeners: broadcast::Sender<InSimPacket>,
    closed: AtomicBool,
}

impl<T: Transport> Connection<T> {
    pub fn new(transport: T, config: ConnectionConfig) -> Self {
        let (listeners, _) = broadcast::channel(config.listener_capacity.max(1));
        Self {
            transport,
            engine: Engine::new(config.engine, config.limits),
            config,
            listeners,
            closed: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    #[must_use]
    pub const fn engine(&self) -> &Engine {
        &self.engine
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Receives every decoded inbound packet from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<InSimPacket> {
        self.listeners.subscribe()
    }

    /// Validates, encodes and sends a message that expects no reply.
    pub fn send<M: Sendable>(&self, message: &M) -> ConnectionResult<()> {
        self.ensure_open()?;
        let bytes = encode(message, &self.config.limits)?;
        self.transport.send(&bytes)?;
        trace!(type_tag = M::TYPE_TAG, len = bytes.len(), "sent");
        Ok(())
    }

    /// Sends an instruction and returns its single-packet reply.
    ///
    /// `build` receives the request id the instruction must carry.
    pub fn request_one<M, F>(
        &self,
        plan: ReplyPlan,
        timeout: Option<Duration>,
        build: F,
    ) -> ConnectionResult<PendingReply>
    where
        M: Requestable,
        F: FnOnce(RequestId) -> M,
    {
        self.ensure_open()?;
        let (instruction, reply) = self.engine.request_one(plan, timeout, build)?;
        self.send_instruction(&instruction)?;
        Ok(reply)
    }

    /// Sends an instruction and streams every packet of its reply.
    pub fn request_stream<M, F>(
        &self,
        plan: ReplyPlan,
        timeout: Option<Duration>,
        build: F,
    ) -> ConnectionResult<ReplyStream>
    where
        M: Requestable,
        F: FnOnce(RequestId) -> M,
    {
        self.ensure_open()?;
        let (instruction, stream) = self.engine.request_stream(plan, timeout, build)?;
        self.send_instruction(&instruction)?;
        Ok(stream)
    }

    /// Handles one complete inbound frame.
    ///
    /// A frame that fails to decode is logged and dropped; the error is
    /// returned for the caller's information only.
    pub fn on_frame(&self, frame: &[u8]) -> ConnectionResult<Dispatch> {
        let packet = match decode_frame(frame, &self.config.limits) {
            Ok(packet) => packet,
            Err(err) => {
                warn!(error = %err, len = frame.len(), "dropping malformed frame");
                return Err(err.into());
            }
        };

        if self.config.keep_alive && packet.is_keep_alive() && !self.is_closed() {
            trace!("answering keep-alive");
            if let Err(err) = self.send(&IsTiny::keep_alive()) {
                warn!(error = %err, "keep-alive reply failed");
            }
        }

        let dispatch = self.engine.dispatch(&packet);
        // No listeners is fine.
        let _ = self.listeners.send(packet);
        Ok(dispatch)
    }

    /// Tears the session down, cancelling every waiting request.
    pub fn on_close(&self) -> usize {
        if self.closed.swap(true, Ordering::AcqRel) {
            return 0;
        }
        let cancelled = self.engine.cancel_all();
        debug!(cancelled, "connection closed");
        cancelled
    }

    /// Reads `reader` to the end, handling each frame as it completes.
    ///
    /// A bad size byte discards the buffered bytes and reading carries on.
    /// The connection is closed when the reader ends, cleanly or not.
    pub async fn pump<R>(&self, mut reader: R) -> ConnectionResult<()>
    where
        R: AsyncRead + Unpin,
    {
        let mut assembler = FrameAssembler::new(self.config.limits);
        let mut buf = [0u8; READ_CHUNK];
        let result = loop {
            let n = match reader.read(&mut buf).await {
                Ok(0) => break Ok(()),
                Ok(n) => n,
                Err(err) => break Err(ConnectionError::Io(err)),
            };
            assembler.push(buf.get(..n).unwrap_or_default());
            while let Some(frame) = assembler.next_frame() {
                match frame {
                    Ok(frame) => {
                        // Decode failures are already logged.
                        let _ = self.on_frame(&frame);
                    }
                    Err(err) => warn!(error = %err, "framing lost, discarding buffered bytes"),
                }
            }
        };
        if assembler.buffered() > 0 {
            debug!(buffered = assembler.buffered(), "stream ended mid-frame");
        }
        self.on_close();
        result
    }

    fn ensure_open(&self) -> ConnectionResult<()> {
        if self.is_closed() {
            Err(ConnectionError::Closed)
        } else {
            Ok(())
        }
    }

    fn send_instruction(&self, instruction: &EncodedInstruction) -> ConnectionResult<()> {
        if let Err(err) = self.transport.send(&instruction.bytes) {
            self.engine.cancel(instruction.key, instruction.request_id);
            return Err(err.into());
        }
        trace!(
            key = %instruction.key,
            request_id = instruction.request_id.get(),
            "instruction sent"
        );
        Ok(())
    }
}

impl<T> std::fmt::Debug for Connection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("config", &self.config)
            .field("engine", &self.engine)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}
