//! Chat messages and commands typed into the host.

use schema::{FieldDescriptor, FieldValue, MessageSchema, SizeRule};
use wire::{EncodeError, PacketWriter, RequestId, WireResult};

use super::tags::{ISP_MST, ISP_MSX};
use crate::packet::{Packet, Sendable};
use crate::reader::BodyReader;

pub(crate) static IS_MST: MessageSchema = MessageSchema::new(
    "IS_MST",
    ISP_MST,
    SizeRule::Fixed(68),
    &[
        FieldDescriptor::reserved("Zero", 1),
        FieldDescriptor::chars("Msg", 64),
    ],
);

pub(crate) static IS_MSX: MessageSchema = MessageSchema::new(
    "IS_MSX",
    ISP_MSX,
    SizeRule::Fixed(100),
    &[
        FieldDescriptor::reserved("Zero", 1),
        FieldDescriptor::chars("Msg", 96),
    ],
);

/// Message or command typed as if by the local user (up to 63 characters).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IsMst {
    pub request_id: RequestId,
    pub message: String,
}

impl IsMst {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::NONE,
            message: message.into(),
        }
    }
}

impl Packet for IsMst {
    const TYPE_TAG: u8 = ISP_MST;

    fn schema() -> &'static MessageSchema {
        &IS_MST
    }

    fn request_id(&self) -> RequestId {
        self.request_id
    }

    fn write_body(&self, writer: &mut PacketWriter) -> Result<(), EncodeError> {
        writer.write_zero_bytes(1);
        writer.write_char_array(&self.message, 64, true)?;
        Ok(())
    }

    fn read_body(reader: &mut BodyReader<'_>) -> WireResult<Self> {
        let request_id = reader.header().request_id;
        reader.skip_reserved("Zero", 1)?;
        Ok(Self {
            request_id,
            message: reader.read_char_array(64)?,
        })
    }
}

impl Sendable for IsMst {
    fn field_values(&self) -> Vec<FieldValue<'_>> {
        vec![FieldValue::Reserved, FieldValue::Text(&self.message)]
    }
}

/// Extended message (up to 95 characters), not a command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IsMsx {
    pub request_id: RequestId,
    pub message: String,
}

impl IsMsx {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::NONE,
            message: message.into(),
        }
    }
}

impl Packet for IsMsx {
    const TYPE_TAG: u8 = ISP_MSX;

    fn schema() -> &'static MessageSchema {
        &IS_MSX
    }

    fn request_id(&self) -> RequestId {
        self.request_id
    }

    fn write_body(&self, writer: &mut PacketWriter) -> Result<(), EncodeError> {
        writer.write_zero_bytes(1);
        writer.write_char_array(&self.message, 96, true)?;
        Ok(())
    }

    fn read_body(reader: &mut BodyReader<'_>) -> WireResult<Self> {
        let request_id = reader.header().request_id;
        reader.skip_reserved("Zero", 1)?;
        Ok(Self {
            request_id,
            message: reader.read_char_array(96)?,
        })
    }
}

impl Sendable for IsMsx {
    fn field_values(&self) -> Vec<FieldValue<'_>> {
        vec![FieldValue::Reserved, FieldValue::Text(&self.message)]
    }
}
