//! Session initialisation and version reporting.

use schema::{BitFlag, FieldDescriptor, FieldValue, Flags, MessageSchema, SizeRule};
use wire::{EncodeError, PacketWriter, RequestId, WireResult};

use super::tags::{ISP_ISI, ISP_VER};
use crate::packet::{InfoOnly, Packet, ReplyKey, ReplyPlan, Requestable, Sendable};
use crate::reader::BodyReader;

pub(crate) static IS_ISI: MessageSchema = MessageSchema::new(
    "IS_ISI",
    ISP_ISI,
    SizeRule::Fixed(44),
    &[
        FieldDescriptor::reserved("Zero", 1),
        FieldDescriptor::word("UDPPort"),
        FieldDescriptor::word("Flags"),
        FieldDescriptor::byte("InSimVer"),
        FieldDescriptor::byte("Prefix").max(127),
        FieldDescriptor::word("Interval"),
        FieldDescriptor::chars("Admin", 16),
        FieldDescriptor::chars("IName", 16),
    ],
);

pub(crate) static IS_VER: MessageSchema = MessageSchema::new(
    "IS_VER",
    ISP_VER,
    SizeRule::Fixed(20),
    &[
        FieldDescriptor::reserved("Zero", 1),
        FieldDescriptor::chars("Version", 8).unterminated(),
        FieldDescriptor::chars("Product", 6).unterminated(),
        FieldDescriptor::byte("InSimVer"),
        FieldDescriptor::reserved("Spare", 1),
    ],
);

/// Options requested in [`IsIsi`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsiFlag {
    /// Guest-side program; button requests are local.
    Local,
    /// Keep colour codes in message text.
    MsgCols,
    /// Send node/lap packets at the interval.
    Nlp,
    /// Send multi-car info packets at the interval.
    Mci,
    Con,
    Obh,
    Hlv,
    AxmLoad,
    AxmEdit,
    ReqJoin,
}

impl BitFlag for IsiFlag {
    type Repr = u16;
    const ALL: &'static [Self] = &[
        Self::Local,
        Self::MsgCols,
        Self::Nlp,
        Self::Mci,
        Self::Con,
        Self::Obh,
        Self::Hlv,
        Self::AxmLoad,
        Self::AxmEdit,
        Self::ReqJoin,
    ];

    fn bit(self) -> u32 {
        match self {
            Self::Local => 2,
            Self::MsgCols => 3,
            Self::Nlp => 4,
            Self::Mci => 5,
            Self::Con => 6,
            Self::Obh => 7,
            Self::Hlv => 8,
            Self::AxmLoad => 9,
            Self::AxmEdit => 10,
            Self::ReqJoin => 11,
        }
    }
}

/// InSim init: the first packet a client sends.
///
/// A non-zero request id asks the host to answer with [`IsVer`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IsIsi {
    pub request_id: RequestId,
    pub udp_port: u16,
    pub flags: Flags<IsiFlag>,
    pub insim_version: u8,
    /// Special message prefix character, 0 for none.
    pub prefix: u8,
    /// Milliseconds between node/lap or car info packets.
    pub interval: u16,
    pub admin: String,
    pub name: String,
}

impl Packet for IsIsi {
    const TYPE_TAG: u8 = ISP_ISI;

    fn schema() -> &'static MessageSchema {
        &IS_ISI
    }

    fn request_id(&self) -> RequestId {
        self.request_id
    }

    fn write_body(&self, writer: &mut PacketWriter) -> Result<(), EncodeError> {
        writer.write_zero_bytes(1);
        writer.write_u16(self.udp_port);
        writer.write_u16(self.flags.to_wire());
        writer.write_u8(self.insim_version);
        writer.write_u8(self.prefix);
        writer.write_u16(self.interval);
        writer.write_char_array(&self.admin, 16, true)?;
        writer.write_char_array(&self.name, 16, true)?;
        Ok(())
    }

    fn read_body(reader: &mut BodyReader<'_>) -> WireResult<Self> {
        let request_id = reader.header().request_id;
        reader.skip_reserved("Zero", 1)?;
        Ok(Self {
            request_id,
            udp_port: reader.read_u16()?,
            flags: Flags::from_wire(reader.read_u16()?),
            insim_version: reader.read_u8()?,
            prefix: reader.read_u8()?,
            interval: reader.read_u16()?,
            admin: reader.read_char_array(16)?,
            name: reader.read_char_array(16)?,
        })
    }
}

impl Sendable for IsIsi {
    fn field_values(&self) -> Vec<FieldValue<'_>> {
        vec![
            FieldValue::Reserved,
            FieldValue::Unsigned(self.udp_port.into()),
            FieldValue::Unsigned(self.flags.to_wire().into()),
            FieldValue::Unsigned(self.insim_version.into()),
            FieldValue::Unsigned(self.prefix.into()),
            FieldValue::Unsigned(self.interval.into()),
            FieldValue::Text(&self.admin),
            FieldValue::Text(&self.name),
        ]
    }
}

impl Requestable for IsIsi {
    fn reply_plan(&self) -> Option<ReplyPlan> {
        Some(ReplyPlan::single(ReplyKey::new(ISP_VER)))
    }
}

/// Version information sent by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IsVer {
    pub request_id: RequestId,
    /// e.g. "0.7F".
    pub version: String,
    /// e.g. "S3".
    pub product: String,
    pub insim_version: u8,
}

impl Packet for IsVer {
    const TYPE_TAG: u8 = ISP_VER;

    fn schema() -> &'static MessageSchema {
        &IS_VER
    }

    fn request_id(&self) -> RequestId {
        self.request_id
    }

    fn write_body(&self, writer: &mut PacketWriter) -> Result<(), EncodeError> {
        writer.write_zero_bytes(1);
        writer.write_char_array(&self.version, 8, false)?;
        writer.write_char_array(&self.product, 6, false)?;
        writer.write_u8(self.insim_version);
        writer.write_zero_bytes(1);
        Ok(())
    }

    fn read_body(reader: &mut BodyReader<'_>) -> WireResult<Self> {
        let request_id = reader.header().request_id;
        reader.skip_reserved("Zero", 1)?;
        let version = reader.read_char_array(8)?;
        let product = reader.read_char_array(6)?;
        let insim_version = reader.read_u8()?;
        reader.skip_reserved("Spare", 1)?;
        Ok(Self {
            request_id,
            version,
            product,
            insim_version,
        })
    }
}

impl InfoOnly for IsVer {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isi_flags_fit_the_wire_field() {
        let all = Flags::<IsiFlag>::all();
        assert_eq!(all.to_wire(), 0x0FFC);
        assert_eq!(Flags::<IsiFlag>::undefined_bits(0x0001), 0x0001);
    }

    #[test]
    fn isi_requests_version() {
        let isi = IsIsi {
            request_id: RequestId(1),
            ..IsIsi::default()
        };
        let plan = isi.reply_plan().unwrap();
        assert_eq!(plan.key, ReplyKey::new(ISP_VER));
    }

    #[test]
    fn isi_values_follow_schema() {
        assert_eq!(IsIsi::default().field_values().len(), IS_ISI.fields.len());
    }
}
