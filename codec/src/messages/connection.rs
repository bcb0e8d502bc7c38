//! Connection join and leave reports.

use schema::{FieldDescriptor, MessageSchema, SizeRule};
use wire::{EncodeError, PacketWriter, RequestId, WireResult};

use super::tags::{ISP_CNL, ISP_NCN};
use crate::packet::{InfoOnly, Packet};
use crate::reader::BodyReader;

pub(crate) static IS_NCN: MessageSchema = MessageSchema::new(
    "IS_NCN",
    ISP_NCN,
    SizeRule::Fixed(56),
    &[
        FieldDescriptor::byte("UCID"),
        FieldDescriptor::chars("UName", 24),
        FieldDescriptor::chars("PName", 24),
        FieldDescriptor::byte("Admin"),
        FieldDescriptor::byte("Total"),
        FieldDescriptor::byte("Flags"),
        FieldDescriptor::reserved("Sp3", 1),
    ],
);

pub(crate) static IS_CNL: MessageSchema = MessageSchema::new(
    "IS_CNL",
    ISP_CNL,
    SizeRule::Fixed(8),
    &[
        FieldDescriptor::byte("UCID"),
        FieldDescriptor::byte("Reason"),
        FieldDescriptor::byte("Total"),
        FieldDescriptor::reserved("Sp2", 1),
        FieldDescriptor::reserved("Sp3", 1),
    ],
);

/// New connection.
///
/// Sent when a guest joins, and once per connection in answer to a
/// connection list request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IsNcn {
    pub request_id: RequestId,
    /// Connection id; 0 is the host.
    pub ucid: u8,
    pub user_name: String,
    pub player_name: String,
    /// Non-zero for an admin connection.
    pub admin: u8,
    /// Number of connections including the host.
    pub total: u8,
    pub flags: u8,
}

impl Packet for IsNcn {
    const TYPE_TAG: u8 = ISP_NCN;

    fn schema() -> &'static MessageSchema {
        &IS_NCN
    }

    fn request_id(&self) -> RequestId {
        self.request_id
    }

    fn write_body(&self, writer: &mut PacketWriter) -> Result<(), EncodeError> {
        writer.write_u8(self.ucid);
        writer.write_char_array(&self.user_name, 24, true)?;
        writer.write_char_array(&self.player_name, 24, true)?;
        writer.write_u8(self.admin);
        writer.write_u8(self.total);
        writer.write_u8(self.flags);
        writer.write_zero_bytes(1);
        Ok(())
    }

    fn read_body(reader: &mut BodyReader<'_>) -> WireResult<Self> {
        let ncn = Self {
            request_id: reader.header().request_id,
            ucid: reader.read_u8()?,
            user_name: reader.read_char_array(24)?,
            player_name: reader.read_char_array(24)?,
            admin: reader.read_u8()?,
            total: reader.read_u8()?,
            flags: reader.read_u8()?,
        };
        reader.skip_reserved("Sp3", 1)?;
        Ok(ncn)
    }
}

impl InfoOnly for IsNcn {}

/// Connection left.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IsCnl {
    pub request_id: RequestId,
    pub ucid: u8,
    /// Leave reason code.
    pub reason: u8,
    /// Number of connections including the host, after the leave.
    pub total: u8,
}

impl Packet for IsCnl {
    const TYPE_TAG: u8 = ISP_CNL;

    fn schema() -> &'static MessageSchema {
        &IS_CNL
    }

    fn request_id(&self) -> RequestId {
        self.request_id
    }

    fn write_body(&self, writer: &mut PacketWriter) -> Result<(), EncodeError> {
        writer.write_u8(self.ucid);
        writer.write_u8(self.reason);
        writer.write_u8(self.total);
        writer.write_zero_bytes(2);
        Ok(())
    }

    fn read_body(reader: &mut BodyReader<'_>) -> WireResult<Self> {
        let cnl = Self {
            request_id: reader.header().request_id,
            ucid: reader.read_u8()?,
            reason: reader.read_u8()?,
            total: reader.read_u8()?,
        };
        reader.skip_reserved("Sp2", 1)?;
        reader.skip_reserved("Sp3", 1)?;
        Ok(cnl)
    }
}

impl InfoOnly for IsCnl {}
