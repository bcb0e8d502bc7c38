//! The decoded-packet sum type and the encode/decode entry points.

use schema::{validate, SizeRule};
use wire::{decode_header, DecodeError, Limits, PacketHeader, PacketWriter, RequestId, WireResult};

use crate::error::CodecResult;
use crate::messages::{
    IsBtn, IsCnl, IsIsi, IsMci, IsMsx, IsMst, IsNcn, IsNlp, IsSmall, IsSsh, IsTiny, IsVer,
};
use crate::packet::{Packet, Sendable};
use crate::reader::BodyReader;

macro_rules! packets {
    ($($variant:ident($message:ident),)+) => {
        /// Any packet this crate can decode, keyed on its type tag.
        #[derive(Debug, Clone, PartialEq, Eq)]
        #[non_exhaustive]
        pub enum InSimPacket {
            $($variant($message),)+
        }

        impl InSimPacket {
            #[must_use]
            pub fn type_tag(&self) -> u8 {
                match self {
                    $(Self::$variant(_) => $message::TYPE_TAG,)+
                }
            }

            #[must_use]
            pub fn request_id(&self) -> RequestId {
                match self {
                    $(Self::$variant(packet) => packet.request_id(),)+
                }
            }

            /// Schema name, e.g. `IS_VER`.
            #[must_use]
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => $message::schema().name,)+
                }
            }

            /// Encodes without validation, as the host would send it.
            pub fn write(&self, limits: &Limits) -> CodecResult<Vec<u8>> {
                match self {
                    $(Self::$variant(packet) => write_packet(packet, limits),)+
                }
            }
        }

        $(
            impl From<$message> for InSimPacket {
                fn from(packet: $message) -> Self {
                    Self::$variant(packet)
                }
            }
        )+

        /// Decodes one complete frame, dispatching on its type tag.
        pub fn decode_frame(frame: &[u8], limits: &Limits) -> WireResult<InSimPacket> {
            let header = decode_header(frame, limits)?;
            match header.type_tag {
                $($message::TYPE_TAG => decode_body::<$message>(frame, header, limits).map(InSimPacket::$variant),)+
                type_tag => Err(DecodeError::UnknownTypeTag { type_tag }),
            }
        }
    };
}

packets! {
    Isi(IsIsi),
    Ver(IsVer),
    Tiny(IsTiny),
    Small(IsSmall),
    Mst(IsMst),
    Msx(IsMsx),
    Ncn(IsNcn),
    Cnl(IsCnl),
    Nlp(IsNlp),
    Mci(IsMci),
    Btn(IsBtn),
    Ssh(IsSsh),
}

impl InSimPacket {
    /// Sub-type discriminator of the tiny and small envelopes.
    #[must_use]
    pub const fn sub_type(&self) -> Option<u8> {
        match self {
            Self::Tiny(tiny) => Some(tiny.kind.to_wire()),
            Self::Small(small) => Some(small.kind.sub_type()),
            _ => None,
        }
    }

    /// True for the unsolicited keep-alive the host sends periodically.
    #[must_use]
    pub const fn is_keep_alive(&self) -> bool {
        matches!(self, Self::Tiny(tiny) if tiny.is_keep_alive())
    }
}

/// Decodes a frame expected to carry `type_tag`.
pub fn decode(type_tag: u8, frame: &[u8], limits: &Limits) -> WireResult<InSimPacket> {
    let header = decode_header(frame, limits)?;
    if header.type_tag != type_tag {
        return Err(DecodeError::TypeTagMismatch {
            expected: type_tag,
            found: header.type_tag,
        });
    }
    decode_frame(frame, limits)
}

/// Decodes a frame as one specific message type.
pub fn decode_as<M: Packet>(frame: &[u8], limits: &Limits) -> WireResult<M> {
    let header = decode_header(frame, limits)?;
    if header.type_tag != M::TYPE_TAG {
        return Err(DecodeError::TypeTagMismatch {
            expected: M::TYPE_TAG,
            found: header.type_tag,
        });
    }
    decode_body(frame, header, limits)
}

fn decode_body<M: Packet>(frame: &[u8], header: PacketHeader, limits: &Limits) -> WireResult<M> {
    let schema = M::schema();
    if let SizeRule::Fixed(expected) = schema.size {
        if header.size != expected {
            return Err(DecodeError::SizeMismatch {
                schema: schema.name,
                expected,
                actual: header.size,
            });
        }
    }
    let mut reader = BodyReader::new(frame, header, schema, limits.padding)?;
    let message = M::read_body(&mut reader)?;
    reader.finish()?;
    Ok(message)
}

/// Validates and encodes an outgoing message.
///
/// A message that breaks its schema is rejected before any byte is written.
pub fn encode<M: Sendable>(message: &M, limits: &Limits) -> CodecResult<Vec<u8>> {
    validate(M::schema(), &message.field_values())?;
    write_packet(message, limits)
}

/// Encodes any message without validation.
///
/// Layout errors are still reported. Used for messages only the host sends,
/// e.g. when replaying or simulating a host.
pub fn write_packet<M: Packet>(message: &M, limits: &Limits) -> CodecResult<Vec<u8>> {
    let schema = M::schema();
    let mut writer = PacketWriter::with_capacity(M::TYPE_TAG, message.request_id(), schema.max_size());
    writer.set_element_count(message.element_count());
    message.write_body(&mut writer)?;
    Ok(writer.finish(schema, limits)?)
}
