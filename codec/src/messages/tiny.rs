//! The tiny envelope: a type tag plus a one-byte sub-type.

use schema::{FieldDescriptor, FieldValue, MessageSchema, SizeRule};
use wire::{EncodeError, PacketWriter, RequestId, WireResult};

use super::tags::{ISP_MCI, ISP_NCN, ISP_NLP, ISP_SMALL, ISP_TINY, ISP_VER};
use super::SmallType;
use crate::packet::{Packet, ReplyKey, ReplyPlan, Requestable, Sendable, SequenceEnd};
use crate::reader::BodyReader;

pub(crate) static IS_TINY: MessageSchema = MessageSchema::new(
    "IS_TINY",
    ISP_TINY,
    SizeRule::Fixed(4),
    &[FieldDescriptor::byte("SubT")],
);

/// Tiny sub-types.
///
/// Most are requests (`Ver`, `Ping`, `Ncn`, ...) or host notifications
/// (`Reply`, `Vtc`, `Mpe`, ...). Sub-types this crate does not know decode
/// to [`TinyType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TinyType {
    /// Keep-alive.
    #[default]
    None,
    Ver,
    Close,
    Ping,
    Reply,
    Vtc,
    Scp,
    Sst,
    Gth,
    Mpe,
    Ism,
    Ren,
    Clr,
    Ncn,
    Npl,
    Res,
    Nlp,
    Mci,
    Reo,
    Rst,
    Axi,
    Axc,
    Rip,
    Nci,
    Alc,
    Axm,
    Slc,
    Mal,
    Plh,
    Ipb,
    Other(u8),
}

impl TinyType {
    #[must_use]
    pub const fn from_wire(raw: u8) -> Self {
        match raw {
            0 => Self::None,
            1 => Self::Ver,
            2 => Self::Close,
            3 => Self::Ping,
            4 => Self::Reply,
            5 => Self::Vtc,
            6 => Self::Scp,
            7 => Self::Sst,
            8 => Self::Gth,
            9 => Self::Mpe,
            10 => Self::Ism,
            11 => Self::Ren,
            12 => Self::Clr,
            13 => Self::Ncn,
            14 => Self::Npl,
            15 => Self::Res,
            16 => Self::Nlp,
            17 => Self::Mci,
            18 => Self::Reo,
            19 => Self::Rst,
            20 => Self::Axi,
            21 => Self::Axc,
            22 => Self::Rip,
            23 => Self::Nci,
            24 => Self::Alc,
            25 => Self::Axm,
            26 => Self::Slc,
            27 => Self::Mal,
            28 => Self::Plh,
            29 => Self::Ipb,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn to_wire(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Ver => 1,
            Self::Close => 2,
            Self::Ping => 3,
            Self::Reply => 4,
            Self::Vtc => 5,
            Self::Scp => 6,
            Self::Sst => 7,
            Self::Gth => 8,
            Self::Mpe => 9,
            Self::Ism => 10,
            Self::Ren => 11,
            Self::Clr => 12,
            Self::Ncn => 13,
            Self::Npl => 14,
            Self::Res => 15,
            Self::Nlp => 16,
            Self::Mci => 17,
            Self::Reo => 18,
            Self::Rst => 19,
            Self::Axi => 20,
            Self::Axc => 21,
            Self::Rip => 22,
            Self::Nci => 23,
            Self::Alc => 24,
            Self::Axm => 25,
            Self::Slc => 26,
            Self::Mal => 27,
            Self::Plh => 28,
            Self::Ipb => 29,
            Self::Other(raw) => raw,
        }
    }

    /// The reply this request produces, for replies this crate decodes.
    #[must_use]
    pub const fn reply_plan(self) -> Option<ReplyPlan> {
        let plan = match self {
            Self::Ping => ReplyPlan::single(ReplyKey::with_sub_type(ISP_TINY, Self::Reply.to_wire())),
            Self::Ver => ReplyPlan::single(ReplyKey::new(ISP_VER)),
            Self::Gth => ReplyPlan::single(ReplyKey::with_sub_type(ISP_SMALL, SmallType::RTP)),
            Self::Alc => ReplyPlan::single(ReplyKey::with_sub_type(ISP_SMALL, SmallType::ALC)),
            Self::Nlp => ReplyPlan::single(ReplyKey::new(ISP_NLP)),
            Self::Ncn => ReplyPlan::sequence(ReplyKey::new(ISP_NCN), SequenceEnd::ConnectionTotal),
            Self::Mci => ReplyPlan::sequence(ReplyKey::new(ISP_MCI), SequenceEnd::LastCarFlag),
            _ => return None,
        };
        Some(plan)
    }
}

/// General purpose 4-byte packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IsTiny {
    pub request_id: RequestId,
    pub kind: TinyType,
}

impl IsTiny {
    #[must_use]
    pub const fn new(request_id: RequestId, kind: TinyType) -> Self {
        Self { request_id, kind }
    }

    /// The unsolicited keep-alive packet.
    #[must_use]
    pub const fn keep_alive() -> Self {
        Self::new(RequestId::NONE, TinyType::None)
    }

    #[must_use]
    pub const fn is_keep_alive(&self) -> bool {
        self.request_id.is_none() && matches!(self.kind, TinyType::None)
    }
}

impl Packet for IsTiny {
    const TYPE_TAG: u8 = ISP_TINY;

    fn schema() -> &'static MessageSchema {
        &IS_TINY
    }

    fn request_id(&self) -> RequestId {
        self.request_id
    }

    fn write_body(&self, writer: &mut PacketWriter) -> Result<(), EncodeError> {
        writer.write_u8(self.kind.to_wire());
        Ok(())
    }

    fn read_body(reader: &mut BodyReader<'_>) -> WireResult<Self> {
        Ok(Self {
            request_id: reader.header().request_id,
            kind: TinyType::from_wire(reader.read_u8()?),
        })
    }
}

impl Sendable for IsTiny {
    fn field_values(&self) -> Vec<FieldValue<'_>> {
        vec![FieldValue::Unsigned(self.kind.to_wire().into())]
    }
}

impl Requestable for IsTiny {
    fn reply_plan(&self) -> Option<ReplyPlan> {
        self.kind.reply_plan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_types_roundtrip() {
        for raw in 0..=u8::MAX {
            assert_eq!(TinyType::from_wire(raw).to_wire(), raw);
        }
        assert_eq!(TinyType::from_wire(29), TinyType::Ipb);
        assert_eq!(TinyType::from_wire(30), TinyType::Other(30));
    }

    #[test]
    fn request_replies() {
        let ping = TinyType::Ping.reply_plan().unwrap();
        assert_eq!(ping.key, ReplyKey::with_sub_type(ISP_TINY, 4));
        assert_eq!(
            TinyType::Mci.reply_plan().map(|plan| plan.shape),
            Some(crate::ReplyShape::Sequence(SequenceEnd::LastCarFlag))
        );
        assert!(TinyType::Close.reply_plan().is_none());
        assert!(TinyType::None.reply_plan().is_none());
    }

    #[test]
    fn keep_alive() {
        assert!(IsTiny::keep_alive().is_keep_alive());
        assert!(!IsTiny::new(RequestId(1), TinyType::None).is_keep_alive());
    }
}
