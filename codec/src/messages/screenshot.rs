//! Screenshot requests.

use schema::{FieldDescriptor, FieldValue, MessageSchema, SizeRule};
use wire::{EncodeError, PacketWriter, RequestId, WireResult};

use super::tags::ISP_SSH;
use crate::packet::{Packet, ReplyKey, ReplyPlan, Requestable, Sendable};
use crate::reader::BodyReader;

pub(crate) static IS_SSH: MessageSchema = MessageSchema::new(
    "IS_SSH",
    ISP_SSH,
    SizeRule::Fixed(40),
    &[
        FieldDescriptor::byte("Error"),
        FieldDescriptor::reserved("Sp0", 1),
        FieldDescriptor::reserved("Sp1", 1),
        FieldDescriptor::reserved("Sp2", 1),
        FieldDescriptor::chars("Name", 32),
    ],
);

/// Screenshot instruction, answered by an `IS_SSH` carrying the result.
///
/// An empty name lets the host pick one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IsSsh {
    pub request_id: RequestId,
    /// 0 on success; only meaningful in the reply.
    pub error: u8,
    pub name: String,
}

impl Packet for IsSsh {
    const TYPE_TAG: u8 = ISP_SSH;

    fn schema() -> &'static MessageSchema {
        &IS_SSH
    }

    fn request_id(&self) -> RequestId {
        self.request_id
    }

    fn write_body(&self, writer: &mut PacketWriter) -> Result<(), EncodeError> {
        writer.write_u8(self.error);
        writer.write_zero_bytes(3);
        writer.write_char_array(&self.name, 32, true)?;
        Ok(())
    }

    fn read_body(reader: &mut BodyReader<'_>) -> WireResult<Self> {
        let request_id = reader.header().request_id;
        let error = reader.read_u8()?;
        reader.skip_reserved("Sp0", 1)?;
        reader.skip_reserved("Sp1", 1)?;
        reader.skip_reserved("Sp2", 1)?;
        Ok(Self {
            request_id,
            error,
            name: reader.read_char_array(32)?,
        })
    }
}

impl Sendable for IsSsh {
    fn field_values(&self) -> Vec<FieldValue<'_>> {
        vec![
            FieldValue::Unsigned(self.error.into()),
            FieldValue::Reserved,
            FieldValue::Reserved,
            FieldValue::Reserved,
            FieldValue::Text(&self.name),
        ]
    }
}

impl Requestable for IsSsh {
    fn reply_plan(&self) -> Option<ReplyPlan> {
        Some(ReplyPlan::single(ReplyKey::new(ISP_SSH)))
    }
}
