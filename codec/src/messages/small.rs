//! The small envelope: a sub-type and one 32-bit value.

use schema::{FieldDescriptor, FieldValue, MessageSchema, SizeRule};
use wire::{EncodeError, PacketWriter, RequestId, WireResult};

use super::tags::ISP_SMALL;
use crate::packet::{Packet, Sendable};
use crate::reader::BodyReader;

pub(crate) static IS_SMALL: MessageSchema = MessageSchema::new(
    "IS_SMALL",
    ISP_SMALL,
    SizeRule::Fixed(8),
    &[FieldDescriptor::byte("SubT"), FieldDescriptor::dword("UVal")],
);

/// Small sub-types, each with the meaning of its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SmallType {
    None(u32),
    /// Start sending positions; interval in hundredths of a second.
    Ssp(u32),
    /// Start sending gauges; interval in hundredths of a second.
    Ssg(u32),
    /// Vote action.
    Vta(u32),
    /// Time stop (non-zero) or carry on.
    Tms(u32),
    /// Number of steps to advance while stopped.
    Stp(u32),
    /// Time in hundredths of a second since the race started.
    Rtp(u32),
    /// Node/lap and car info interval in milliseconds.
    Nli(u32),
    /// Bitmask of allowed cars.
    Alc(u32),
    /// Local car switches.
    Lcs(u32),
    /// Local car lights.
    Lcl(u32),
    /// Request AI info for a player id.
    Aii(u32),
    Other { sub_type: u8, value: u32 },
}

impl SmallType {
    pub const SSP: u8 = 1;
    pub const RTP: u8 = 6;
    pub const ALC: u8 = 8;

    #[must_use]
    pub const fn from_wire(sub_type: u8, value: u32) -> Self {
        match sub_type {
            0 => Self::None(value),
            1 => Self::Ssp(value),
            2 => Self::Ssg(value),
            3 => Self::Vta(value),
            4 => Self::Tms(value),
            5 => Self::Stp(value),
            6 => Self::Rtp(value),
            7 => Self::Nli(value),
            8 => Self::Alc(value),
            9 => Self::Lcs(value),
            10 => Self::Lcl(value),
            11 => Self::Aii(value),
            sub_type => Self::Other { sub_type, value },
        }
    }

    #[must_use]
    pub const fn sub_type(self) -> u8 {
        match self {
            Self::None(_) => 0,
            Self::Ssp(_) => 1,
            Self::Ssg(_) => 2,
            Self::Vta(_) => 3,
            Self::Tms(_) => 4,
            Self::Stp(_) => 5,
            Self::Rtp(_) => 6,
            Self::Nli(_) => 7,
            Self::Alc(_) => 8,
            Self::Lcs(_) => 9,
            Self::Lcl(_) => 10,
            Self::Aii(_) => 11,
            Self::Other { sub_type, .. } => sub_type,
        }
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            Self::None(value)
            | Self::Ssp(value)
            | Self::Ssg(value)
            | Self::Vta(value)
            | Self::Tms(value)
            | Self::Stp(value)
            | Self::Rtp(value)
            | Self::Nli(value)
            | Self::Alc(value)
            | Self::Lcs(value)
            | Self::Lcl(value)
            | Self::Aii(value)
            | Self::Other { value, .. } => value,
        }
    }
}

impl Default for SmallType {
    fn default() -> Self {
        Self::None(0)
    }
}

/// General purpose 8-byte packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IsSmall {
    pub request_id: RequestId,
    pub kind: SmallType,
}

impl IsSmall {
    #[must_use]
    pub const fn new(request_id: RequestId, kind: SmallType) -> Self {
        Self { request_id, kind }
    }
}

impl Packet for IsSmall {
    const TYPE_TAG: u8 = ISP_SMALL;

    fn schema() -> &'static MessageSchema {
        &IS_SMALL
    }

    fn request_id(&self) -> RequestId {
        self.request_id
    }

    fn write_body(&self, writer: &mut PacketWriter) -> Result<(), EncodeError> {
        writer.write_u8(self.kind.sub_type());
        writer.write_u32(self.kind.value());
        Ok(())
    }

    fn read_body(reader: &mut BodyReader<'_>) -> WireResult<Self> {
        let sub_type = reader.read_u8()?;
        let value = reader.read_u32()?;
        Ok(Self {
            request_id: reader.header().request_id,
            kind: SmallType::from_wire(sub_type, value),
        })
    }
}

impl Sendable for IsSmall {
    fn field_values(&self) -> Vec<FieldValue<'_>> {
        vec![
            FieldValue::Unsigned(self.kind.sub_type().into()),
            FieldValue::Unsigned(self.kind.value().into()),
        ]
    }
}
