//! The packet envelope and its capability traits.
//!
//! Every message implements [`Packet`]: its type tag, schema, and body
//! layout. Capabilities are layered on top as separate traits:
//!
//! - [`Sendable`] messages may be built by callers and encoded; they expose
//!   their populated fields for validation.
//! - [`InfoOnly`] messages only ever arrive from the host.
//! - [`Requestable`] instructions make the host answer with a correlated
//!   reply, described by a [`ReplyPlan`].

use std::fmt;

use schema::{FieldValue, MessageSchema};
use wire::{EncodeError, PacketWriter, RequestId, WireResult};

use crate::envelope::InSimPacket;
use crate::messages::CciFlag;
use crate::reader::BodyReader;

/// A message with a fixed type tag and schema.
pub trait Packet: Sized + Clone + PartialEq + fmt::Debug {
    const TYPE_TAG: u8;

    fn schema() -> &'static MessageSchema;

    fn request_id(&self) -> RequestId;

    /// Number of dynamic elements the body carries (0 for fixed layouts).
    fn element_count(&self) -> usize {
        0
    }

    /// Writes every field after the header, in schema order.
    fn write_body(&self, writer: &mut PacketWriter) -> Result<(), EncodeError>;

    /// Reads every field after the header, in schema order.
    fn read_body(reader: &mut BodyReader<'_>) -> WireResult<Self>;
}

/// A message callers may send.
pub trait Sendable: Packet {
    /// One value per schema field, in schema order.
    fn field_values(&self) -> Vec<FieldValue<'_>>;
}

/// A message that is only ever received.
pub trait InfoOnly: Packet {}

/// An instruction that makes the host reply.
///
/// Instructions are built from the request id the correlation engine
/// hands out, so the id is part of the value from construction on.
pub trait Requestable: Sendable {
    /// What the reply looks like, or `None` if this instruction produces
    /// no reply this crate can decode.
    fn reply_plan(&self) -> Option<ReplyPlan>;
}

/// Identifies the packets that answer a request.
///
/// Tiny and small envelopes share one type tag between many logical
/// messages, so their replies also name the sub-type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplyKey {
    pub type_tag: u8,
    pub sub_type: Option<u8>,
}

impl ReplyKey {
    #[must_use]
    pub const fn new(type_tag: u8) -> Self {
        Self {
            type_tag,
            sub_type: None,
        }
    }

    #[must_use]
    pub const fn with_sub_type(type_tag: u8, sub_type: u8) -> Self {
        Self {
            type_tag,
            sub_type: Some(sub_type),
        }
    }

    /// True if `packet` has this key's type tag and, when one is set,
    /// its sub-type. Request ids are not considered.
    #[must_use]
    pub fn matches(&self, packet: &InSimPacket) -> bool {
        packet.type_tag() == self.type_tag
            && (self.sub_type.is_none() || packet.sub_type() == self.sub_type)
    }
}

impl fmt::Display for ReplyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sub_type {
            Some(sub_type) => write!(f, "{}/{}", self.type_tag, sub_type),
            None => write!(f, "{}", self.type_tag),
        }
    }
}

/// How a multi-packet reply signals its last packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceEnd {
    /// The final car of the final packet carries the `Last` flag.
    LastCarFlag,
    /// One packet per connection; every packet repeats the total.
    ConnectionTotal,
}

/// Whether a reply is one packet or a bounded sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyShape {
    Single,
    Sequence(SequenceEnd),
}

/// The reply an instruction expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyPlan {
    pub key: ReplyKey,
    pub shape: ReplyShape,
}

impl ReplyPlan {
    #[must_use]
    pub const fn single(key: ReplyKey) -> Self {
        Self {
            key,
            shape: ReplyShape::Single,
        }
    }

    #[must_use]
    pub const fn sequence(key: ReplyKey, end: SequenceEnd) -> Self {
        Self {
            key,
            shape: ReplyShape::Sequence(end),
        }
    }
}

/// Tracks a multi-packet reply and reports its final packet.
#[derive(Debug, Clone)]
pub struct SequenceTracker {
    end: SequenceEnd,
    received: usize,
}

impl SequenceTracker {
    #[must_use]
    pub const fn new(end: SequenceEnd) -> Self {
        Self { end, received: 0 }
    }

    /// Packets observed so far.
    #[must_use]
    pub const fn received(&self) -> usize {
        self.received
    }

    /// Records one reply packet and returns true if it ends the sequence.
    pub fn observe(&mut self, packet: &InSimPacket) -> bool {
        self.received += 1;
        match (self.end, packet) {
            (SequenceEnd::LastCarFlag, InSimPacket::Mci(mci)) => mci
                .info
                .last()
                .map_or(true, |car| car.info.contains(CciFlag::Last)),
            (SequenceEnd::ConnectionTotal, InSimPacket::Ncn(ncn)) => {
                self.received >= usize::from(ncn.total)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{tags, CompCar, IsMci, IsNcn, IsTiny, TinyType};
    use schema::Flags;

    #[test]
    fn key_matches_sub_type() {
        let reply = InSimPacket::from(IsTiny::new(RequestId(3), TinyType::Reply));
        assert!(ReplyKey::with_sub_type(tags::ISP_TINY, TinyType::Reply.to_wire()).matches(&reply));
        assert!(!ReplyKey::with_sub_type(tags::ISP_TINY, TinyType::None.to_wire()).matches(&reply));
        assert!(ReplyKey::new(tags::ISP_TINY).matches(&reply));
        assert!(!ReplyKey::new(tags::ISP_SMALL).matches(&reply));
    }

    #[test]
    fn key_display() {
        assert_eq!(ReplyKey::new(2).to_string(), "2");
        assert_eq!(ReplyKey::with_sub_type(4, 6).to_string(), "4/6");
    }

    fn mci(last: bool) -> InSimPacket {
        let mut car = CompCar::default();
        if last {
            car.info = Flags::from([CciFlag::Last]);
        }
        InSimPacket::from(IsMci {
            request_id: RequestId(1),
            info: vec![CompCar::default(), car],
        })
    }

    #[test]
    fn last_car_flag_ends_sequence() {
        let mut tracker = SequenceTracker::new(SequenceEnd::LastCarFlag);
        assert!(!tracker.observe(&mci(false)));
        assert!(tracker.observe(&mci(true)));
        assert_eq!(tracker.received(), 2);
    }

    #[test]
    fn connection_total_ends_sequence() {
        let ncn = |ucid| {
            InSimPacket::from(IsNcn {
                request_id: RequestId(1),
                ucid,
                total: 3,
                ..IsNcn::default()
            })
        };
        let mut tracker = SequenceTracker::new(SequenceEnd::ConnectionTotal);
        assert!(!tracker.observe(&ncn(0)));
        assert!(!tracker.observe(&ncn(1)));
        assert!(tracker.observe(&ncn(2)));
    }
}
