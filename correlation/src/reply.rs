//! Completion policies and the receiving ends of a request.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use codec::{InSimPacket, ReplyKey, ReplyPlan, ReplyShape, SequenceTracker};
use tokio::sync::{mpsc, oneshot};
use wire::RequestId;

use crate::error::RequestError;

/// A reply packet, or the reason none will come.
pub type ReplyResult = Result<InSimPacket, RequestError>;

/// Decides when a request has received its whole reply.
pub enum Completion {
    /// The first matching packet completes the request.
    Single,
    /// Every matching packet is delivered; the request completes once the
    /// predicate returns true for one of them.
    ///
    /// The predicate runs without the engine's table lock and may query or
    /// cancel requests. Dispatching to its own request from inside it
    /// deadlocks.
    Terminal(Box<dyn FnMut(&InSimPacket) -> bool + Send>),
}

impl Completion {
    pub fn terminal(predicate: impl FnMut(&InSimPacket) -> bool + Send + 'static) -> Self {
        Self::Terminal(Box::new(predicate))
    }

    /// The policy a reply plan calls for.
    #[must_use]
    pub fn from_plan(plan: &ReplyPlan) -> Self {
        match plan.shape {
            ReplyShape::Single => Self::Single,
            ReplyShape::Sequence(end) => {
                let mut tracker = SequenceTracker::new(end);
                Self::terminal(move |packet| tracker.observe(packet))
            }
        }
    }

    /// Returns true if `packet` completes the request.
    pub(crate) fn is_complete(&mut self, packet: &InSimPacket) -> bool {
        match self {
            Self::Single => true,
            Self::Terminal(predicate) => predicate(packet),
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("Single"),
            Self::Terminal(_) => f.write_str("Terminal(..)"),
        }
    }
}

/// Where the engine delivers a request's replies and failures.
///
/// Both kinds hand results to another task without blocking.
#[derive(Debug)]
pub enum ReplySink {
    /// Receives the first delivery only.
    Single(Option<oneshot::Sender<ReplyResult>>),
    /// Receives every delivery; closed when the request leaves the table.
    Stream(mpsc::UnboundedSender<ReplyResult>),
}

impl ReplySink {
    #[must_use]
    pub const fn single(tx: oneshot::Sender<ReplyResult>) -> Self {
        Self::Single(Some(tx))
    }

    #[must_use]
    pub const fn stream(tx: mpsc::UnboundedSender<ReplyResult>) -> Self {
        Self::Stream(tx)
    }

    /// Hands `result` to the receiver. A receiver that has gone away is not
    /// an error; the request still runs to completion.
    pub(crate) fn deliver(&mut self, result: ReplyResult) {
        match self {
            Self::Single(tx) => {
                if let Some(tx) = tx.take() {
                    let _ = tx.send(result);
                }
            }
            Self::Stream(tx) => {
                let _ = tx.send(result);
            }
        }
    }
}

/// Resolves to the reply of a single-packet request.
#[derive(Debug)]
pub struct PendingReply {
    key: ReplyKey,
    request_id: RequestId,
    rx: oneshot::Receiver<ReplyResult>,
}

impl PendingReply {
    pub(crate) const fn new(
        key: ReplyKey,
        request_id: RequestId,
        rx: oneshot::Receiver<ReplyResult>,
    ) -> Self {
        Self {
            key,
            request_id,
            rx,
        }
    }

    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    #[must_use]
    pub const fn key(&self) -> ReplyKey {
        self.key
    }
}

impl Future for PendingReply {
    type Output = ReplyResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let (key, request_id) = (self.key, self.request_id);
        Pin::new(&mut self.rx).poll(cx).map(|received| {
            // A dropped sender means the engine itself is gone.
            received.unwrap_or(Err(RequestError::Cancelled { key, request_id }))
        })
    }
}

/// Receives every packet of a multi-packet reply.
///
/// Yields `None` once the request has completed and every packet has been
/// taken.
#[derive(Debug)]
pub struct ReplyStream {
    key: ReplyKey,
    request_id: RequestId,
    rx: mpsc::UnboundedReceiver<ReplyResult>,
}

impl ReplyStream {
    pub(crate) const fn new(
        key: ReplyKey,
        request_id: RequestId,
        rx: mpsc::UnboundedReceiver<ReplyResult>,
    ) -> Self {
        Self {
            key,
            request_id,
            rx,
        }
    }

    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    #[must_use]
    pub const fn key(&self) -> ReplyKey {
        self.key
    }

    /// Next reply packet, or the failure that ended the request.
    pub async fn next(&mut self) -> Option<ReplyResult> {
        self.rx.recv().await
    }

    /// Waits for the whole reply.
    ///
    /// Packets received before a timeout or cancellation are discarded.
    pub async fn collect(mut self) -> Result<Vec<InSimPacket>, RequestError> {
        let mut packets = Vec::new();
        while let Some(result) = self.next().await {
            packets.push(result?);
        }
        Ok(packets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec::{tags, IsTiny, SequenceEnd, TinyType};

    fn tiny(kind: TinyType) -> InSimPacket {
        InSimPacket::from(IsTiny::new(RequestId(1), kind))
    }

    #[test]
    fn single_completes_immediately() {
        let mut completion = Completion::from_plan(&ReplyPlan::single(ReplyKey::new(tags::ISP_VER)));
        assert!(completion.is_complete(&tiny(TinyType::Reply)));
        assert_eq!(format!("{completion:?}"), "Single");
    }

    #[test]
    fn terminal_runs_predicate() {
        let mut seen = 0;
        let mut completion = Completion::terminal(move |_| {
            seen += 1;
            seen == 2
        });
        assert!(!completion.is_complete(&tiny(TinyType::None)));
        assert!(completion.is_complete(&tiny(TinyType::None)));
        assert_eq!(format!("{completion:?}"), "Terminal(..)");
    }

    #[test]
    fn sequence_plan_becomes_terminal() {
        let plan = ReplyPlan::sequence(ReplyKey::new(tags::ISP_NCN), SequenceEnd::ConnectionTotal);
        assert!(matches!(Completion::from_plan(&plan), Completion::Terminal(_)));
    }

    #[test]
    fn single_sink_delivers_once() {
        let (tx, mut rx) = oneshot::channel();
        let mut sink = ReplySink::single(tx);
        sink.deliver(Ok(tiny(TinyType::Reply)));
        sink.deliver(Ok(tiny(TinyType::None)));
        assert_eq!(rx.try_recv().unwrap(), Ok(tiny(TinyType::Reply)));
    }

    #[test]
    fn delivery_to_dropped_receiver_is_ignored() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let mut sink = ReplySink::stream(tx);
        sink.deliver(Ok(tiny(TinyType::Reply)));
    }

    #[tokio::test]
    async fn pending_reply_cancelled_when_sender_dropped() {
        let (tx, rx) = oneshot::channel();
        let reply = PendingReply::new(ReplyKey::new(tags::ISP_VER), RequestId(3), rx);
        drop(tx);
        assert_eq!(
            reply.await,
            Err(RequestError::Cancelled {
                key: ReplyKey::new(tags::ISP_VER),
                request_id: RequestId(3),
            })
        );
    }

    #[tokio::test]
    async fn stream_collects_until_closed() {
        let (tx, rx) = mpsc::unbounded_channel();
        let stream = ReplyStream::new(ReplyKey::new(tags::ISP_TINY), RequestId(1), rx);
        tx.send(Ok(tiny(TinyType::None))).unwrap();
        tx.send(Ok(tiny(TinyType::Reply))).unwrap();
        drop(tx);
        assert_eq!(stream.collect().await.unwrap().len(), 2);
    }
}
