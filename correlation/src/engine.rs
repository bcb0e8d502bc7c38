//! The pending-request table and its state machine.
//!
//! Every request moves from `Waiting` to exactly one of `Fulfilled`,
//! `TimedOut` or `Cancelled`. All transitions happen under one lock, so the
//! first event to take it decides the outcome and any later one finds no
//! entry and does nothing.
//!
//! Completion predicates run outside that lock, under a per-request lock
//! that keeps replies to one request in order. A predicate may call back
//! into the engine, except to dispatch to its own request.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use codec::{InSimPacket, ReplyKey, ReplyPlan, Requestable};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace};
use wire::{Limits, RequestId};

use crate::config::EngineConfig;
use crate::error::{IssueError, RequestError};
use crate::reply::{Completion, PendingReply, ReplySink, ReplyStream};
use crate::table::Slots;

/// Lifecycle state of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PendingState {
    Waiting,
    Fulfilled,
    TimedOut,
    Cancelled,
}

/// Outcome of offering an inbound packet to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// No waiting request claims the packet.
    Unmatched,
    /// The packet was delivered to a request, now in `state`.
    Delivered {
        request_id: RequestId,
        state: PendingState,
    },
}

impl Dispatch {
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

/// An encoded instruction carrying the id its reply will echo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedInstruction {
    pub request_id: RequestId,
    pub key: ReplyKey,
    pub bytes: Vec<u8>,
}

/// A waiting request.
struct Entry {
    /// Distinguishes this request from later ones reusing its id.
    serial: u64,
    key: ReplyKey,
    completion: Arc<Mutex<Completion>>,
    sink: ReplySink,
    timer: Option<JoinHandle<()>>,
}

impl Entry {
    fn finish(mut self, failure: Option<RequestError>) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        if let Some(failure) = failure {
            self.sink.deliver(Err(failure));
        }
    }
}

#[derive(Default)]
struct Table {
    /// Pending requests by reply type tag.
    slots: HashMap<u8, Slots<Entry>>,
    next_serial: u64,
}

struct Inner {
    config: EngineConfig,
    limits: Limits,
    table: Mutex<Table>,
}

/// Matches outgoing instructions with their replies.
///
/// Cloning is cheap; clones share one pending table.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.inner.config)
            .field("pending", &self.pending_count())
            .finish()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default(), Limits::default())
    }
}

impl Engine {
    /// Creates an engine encoding instructions under `limits`.
    #[must_use]
    pub fn new(config: EngineConfig, limits: Limits) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                limits,
                table: Mutex::new(Table::default()),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Registers a request and encodes its instruction.
    ///
    /// The smallest id not held by a waiting request for `key.type_tag` is
    /// passed to `build`, so the instruction carries it from construction.
    /// The instruction is validated and encoded before this returns; on any
    /// failure the id is released and nothing needs to be sent.
    ///
    /// Replies and failures go to `sink`. The deadline is `timeout`, or the
    /// configured default, measured from now.
    pub fn issue<M, F>(
        &self,
        key: ReplyKey,
        completion: Completion,
        timeout: Option<Duration>,
        sink: ReplySink,
        build: F,
    ) -> Result<EncodedInstruction, IssueError>
    where
        M: Requestable,
        F: FnOnce(RequestId) -> M,
    {
        let handle = Handle::try_current().map_err(|_| IssueError::NoRuntime)?;
        let timeout = timeout.unwrap_or(self.inner.config.default_timeout);

        let (id, serial) = self.reserve(key, completion, sink)?;
        let request_id = RequestId(id);

        let message = build(request_id);
        let encoded = match message.reply_plan() {
            Some(plan) if plan.key == key => {
                codec::encode(&message, &self.inner.limits).map_err(IssueError::from)
            }
            _ => Err(IssueError::NotRequestable {
                type_tag: M::TYPE_TAG,
                key,
            }),
        };
        let bytes = match encoded {
            Ok(bytes) => bytes,
            Err(err) => {
                self.inner.release(key.type_tag, id, serial);
                return Err(err);
            }
        };

        let weak = Arc::downgrade(&self.inner);
        let timer = handle.spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(inner) = Weak::upgrade(&weak) {
                inner.expire(key.type_tag, id, serial);
            }
        });
        self.inner.attach_timer(key.type_tag, id, serial, timer);

        debug!(
            type_tag = key.type_tag,
            request_id = id,
            ?timeout,
            "request issued"
        );
        Ok(EncodedInstruction {
            request_id,
            key,
            bytes,
        })
    }

    /// Issues a request whose reply is one packet.
    pub fn request_one<M, F>(
        &self,
        plan: ReplyPlan,
        timeout: Option<Duration>,
        build: F,
    ) -> Result<(EncodedInstruction, PendingReply), IssueError>
    where
        M: Requestable,
        F: FnOnce(RequestId) -> M,
    {
        let (tx, rx) = oneshot::channel();
        let instruction = self.issue(
            plan.key,
            Completion::from_plan(&plan),
            timeout,
            ReplySink::single(tx),
            build,
        )?;
        let reply = PendingReply::new(plan.key, instruction.request_id, rx);
        Ok((instruction, reply))
    }

    /// Issues a request whose every reply packet is streamed to the caller.
    pub fn request_stream<M, F>(
        &self,
        plan: ReplyPlan,
        timeout: Option<Duration>,
        build: F,
    ) -> Result<(EncodedInstruction, ReplyStream), IssueError>
    where
        M: Requestable,
        F: FnOnce(RequestId) -> M,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let instruction = self.issue(
            plan.key,
            Completion::from_plan(&plan),
            timeout,
            ReplySink::stream(tx),
            build,
        )?;
        let stream = ReplyStream::new(plan.key, instruction.request_id, rx);
        Ok((instruction, stream))
    }

    /// Offers an inbound packet to the waiting requests.
    ///
    /// A packet matches when its type tag and request id name a waiting
    /// request and its sub-type agrees with the request's key. A packet
    /// with request id 0 matches by type alone when exactly one request of
    /// that type is waiting. Unmatched packets are left to the caller.
    pub fn dispatch(&self, packet: &InSimPacket) -> Dispatch {
        let type_tag = packet.type_tag();
        let Some((id, serial, completion)) = self.claim(packet) else {
            return Dispatch::Unmatched;
        };

        // Held until delivery so a later packet cannot overtake this one.
        let mut completion = completion.lock();
        let complete = completion.is_complete(packet);

        let mut table = self.inner.table.lock();
        let Some(slots) = table.slots.get_mut(&type_tag) else {
            return Dispatch::Unmatched;
        };
        let Some(entry) = slots.get_mut(id).filter(|entry| entry.serial == serial) else {
            trace!(type_tag, request_id = id, "request left while its reply was inspected");
            return Dispatch::Unmatched;
        };
        entry.sink.deliver(Ok(packet.clone()));
        let request_id = RequestId(id);
        if !complete {
            trace!(type_tag, request_id = id, "partial reply delivered");
            return Dispatch::Delivered {
                request_id,
                state: PendingState::Waiting,
            };
        }

        if let Some(entry) = slots.try_remove(id) {
            entry.finish(None);
        }
        debug!(type_tag, request_id = id, "request fulfilled");
        Dispatch::Delivered {
            request_id,
            state: PendingState::Fulfilled,
        }
    }

    /// Finds the waiting request `packet` answers.
    fn claim(&self, packet: &InSimPacket) -> Option<(u8, u64, Arc<Mutex<Completion>>)> {
        let type_tag = packet.type_tag();
        let table = self.inner.table.lock();
        let slots = table.slots.get(&type_tag)?;
        let id = match packet.request_id() {
            RequestId::NONE => slots.sole_id()?,
            RequestId(id) => id,
        };
        let entry = slots.get(id)?;
        if !entry.key.matches(packet) {
            trace!(type_tag, request_id = id, key = %entry.key, "sub-type mismatch");
            return None;
        }
        Some((id, entry.serial, Arc::clone(&entry.completion)))
    }

    /// Withdraws one waiting request, delivering a cancellation.
    ///
    /// Used when its instruction could not be sent. Returns false if the
    /// request had already completed.
    pub fn cancel(&self, key: ReplyKey, request_id: RequestId) -> bool {
        let entry = {
            let mut table = self.inner.table.lock();
            table
                .slots
                .get_mut(&key.type_tag)
                .and_then(|slots| slots.try_remove(request_id.get()))
        };
        match entry {
            Some(entry) => {
                debug!(type_tag = key.type_tag, request_id = request_id.get(), "request cancelled");
                let key = entry.key;
                entry.finish(Some(RequestError::Cancelled { key, request_id }));
                true
            }
            None => false,
        }
    }

    /// Cancels every waiting request. Returns how many there were.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<(u8, Entry)> = {
            let mut table = self.inner.table.lock();
            table
                .slots
                .drain()
                .flat_map(|(_, mut slots)| slots.drain().collect::<Vec<_>>())
                .collect()
        };
        let count = drained.len();
        for (id, entry) in drained {
            let key = entry.key;
            entry.finish(Some(RequestError::Cancelled {
                key,
                request_id: RequestId(id),
            }));
        }
        if count > 0 {
            debug!(count, "cancelled all pending requests");
        }
        count
    }

    /// Number of waiting requests.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner
            .table
            .lock()
            .slots
            .values()
            .map(Slots::len)
            .sum()
    }

    /// State of the request `request_id` for `key`: `Waiting` while it is
    /// in the table, `None` once it has left.
    #[must_use]
    pub fn state(&self, key: ReplyKey, request_id: RequestId) -> Option<PendingState> {
        let table = self.inner.table.lock();
        let entry = table.slots.get(&key.type_tag)?.get(request_id.get())?;
        (entry.key == key).then_some(PendingState::Waiting)
    }

    fn reserve(
        &self,
        key: ReplyKey,
        completion: Completion,
        sink: ReplySink,
    ) -> Result<(u8, u64), IssueError> {
        let max = self.inner.config.max_request_id;
        let mut table = self.inner.table.lock();
        let serial = table.next_serial;
        let slots = table.slots.entry(key.type_tag).or_insert_with(Slots::new);
        let id = slots
            .free_id(max)
            .ok_or(IssueError::CorrelationExhausted { key, max })?;
        slots.insert(
            id,
            Entry {
                serial,
                key,
                completion: Arc::new(Mutex::new(completion)),
                sink,
                timer: None,
            },
        );
        table.next_serial = serial.wrapping_add(1);
        Ok((id, serial))
    }
}

impl Inner {
    /// Removes the entry for `id` if it is still request `serial`.
    fn take(&self, type_tag: u8, id: u8, serial: u64) -> Option<Entry> {
        let mut table = self.table.lock();
        let slots = table.slots.get_mut(&type_tag)?;
        if slots.get(id)?.serial != serial {
            return None;
        }
        slots.try_remove(id)
    }

    /// Drops a reservation whose instruction never left.
    fn release(&self, type_tag: u8, id: u8, serial: u64) {
        if let Some(entry) = self.take(type_tag, id, serial) {
            trace!(type_tag, request_id = id, "request id released");
            entry.finish(None);
        }
    }

    fn attach_timer(&self, type_tag: u8, id: u8, serial: u64, timer: JoinHandle<()>) {
        let mut table = self.table.lock();
        let entry = table
            .slots
            .get_mut(&type_tag)
            .and_then(|slots| slots.get_mut(id))
            .filter(|entry| entry.serial == serial);
        match entry {
            Some(entry) => entry.timer = Some(timer),
            // Completed before the timer was attached.
            None => timer.abort(),
        }
    }

    /// Deadline path: times the request out if it is still waiting.
    fn expire(&self, type_tag: u8, id: u8, serial: u64) -> bool {
        let Some(mut entry) = self.take(type_tag, id, serial) else {
            return false;
        };
        debug!(type_tag, request_id = id, "request timed out");
        entry.timer = None;
        let key = entry.key;
        entry.finish(Some(RequestError::TimedOut {
            key,
            request_id: RequestId(id),
        }));
        true
    }
}
