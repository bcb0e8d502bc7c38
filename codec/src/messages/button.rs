//! Buttons shown on a connection's screen.

use schema::{FieldDescriptor, FieldValue, MessageSchema, SizeRule};
use wire::{EncodeError, PacketWriter, RequestId, WireResult};

use super::tags::ISP_BTN;
use crate::packet::{Packet, Sendable};
use crate::reader::BodyReader;

/// Bytes available for button text, including its terminating NUL.
pub const BUTTON_MAX_TEXT: usize = 240;

pub(crate) static IS_BTN: MessageSchema = MessageSchema::new(
    "IS_BTN",
    ISP_BTN,
    SizeRule::Variable {
        base: 12,
        element_width: 1,
        max_count: BUTTON_MAX_TEXT,
    },
    &[
        FieldDescriptor::byte("UCID"),
        FieldDescriptor::byte("ClickID").max(239),
        FieldDescriptor::byte("Inst"),
        FieldDescriptor::byte("BStyle"),
        FieldDescriptor::byte("TypeIn"),
        FieldDescriptor::byte("L").max(200),
        FieldDescriptor::byte("T").max(200),
        FieldDescriptor::byte("W").max(200),
        FieldDescriptor::byte("H").max(200),
        FieldDescriptor::dynamic_chars("Text", BUTTON_MAX_TEXT),
    ],
);

/// Button definition.
///
/// The packet grows with the text: the text and its NUL are written, then
/// the packet is padded to a multiple of four. At most 239 characters fit,
/// and every button carries at least the NUL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IsBtn {
    /// Must be non-zero for the host to accept the button.
    pub request_id: RequestId,
    pub ucid: u8,
    pub click_id: u8,
    pub inst: u8,
    pub style: u8,
    /// Maximum characters to type in; 0 for a plain button.
    pub type_in: u8,
    pub left: u8,
    pub top: u8,
    pub width: u8,
    pub height: u8,
    pub text: String,
}

impl Packet for IsBtn {
    const TYPE_TAG: u8 = ISP_BTN;

    fn schema() -> &'static MessageSchema {
        &IS_BTN
    }

    fn request_id(&self) -> RequestId {
        self.request_id
    }

    fn element_count(&self) -> usize {
        self.text.chars().count() + 1
    }

    fn write_body(&self, writer: &mut PacketWriter) -> Result<(), EncodeError> {
        writer.write_u8(self.ucid);
        writer.write_u8(self.click_id);
        writer.write_u8(self.inst);
        writer.write_u8(self.style);
        writer.write_u8(self.type_in);
        writer.write_u8(self.left);
        writer.write_u8(self.top);
        writer.write_u8(self.width);
        writer.write_u8(self.height);
        let written = writer.write_dynamic_chars(&self.text, BUTTON_MAX_TEXT)?;
        writer.set_element_count(written);
        Ok(())
    }

    fn read_body(reader: &mut BodyReader<'_>) -> WireResult<Self> {
        let mut btn = Self {
            request_id: reader.header().request_id,
            ucid: reader.read_u8()?,
            click_id: reader.read_u8()?,
            inst: reader.read_u8()?,
            style: reader.read_u8()?,
            type_in: reader.read_u8()?,
            left: reader.read_u8()?,
            top: reader.read_u8()?,
            width: reader.read_u8()?,
            height: reader.read_u8()?,
            text: String::new(),
        };
        // The text runs to its NUL; the frame must be the smallest aligned
        // size that holds it, so a frame with no NUL is never accepted.
        let region = reader.peek_rest();
        let count = region
            .iter()
            .position(|&byte| byte == 0)
            .map_or(region.len() + 1, |nul| nul + 1);
        reader.expect_count(count)?;
        let text = reader.read_bytes(count)?;
        btn.text = bytestream::charset::decode_char_array(text);
        Ok(btn)
    }
}

impl Sendable for IsBtn {
    fn field_values(&self) -> Vec<FieldValue<'_>> {
        vec![
            FieldValue::Unsigned(self.ucid.into()),
            FieldValue::Unsigned(self.click_id.into()),
            FieldValue::Unsigned(self.inst.into()),
            FieldValue::Unsigned(self.style.into()),
            FieldValue::Unsigned(self.type_in.into()),
            FieldValue::Unsigned(self.left.into()),
            FieldValue::Unsigned(self.top.into()),
            FieldValue::Unsigned(self.width.into()),
            FieldValue::Unsigned(self.height.into()),
            FieldValue::Text(&self.text),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_follows_text() {
        let btn = IsBtn {
            text: "Go".into(),
            ..IsBtn::default()
        };
        assert_eq!(btn.element_count(), 3);
        assert_eq!(IS_BTN.size_for(btn.element_count()), Some(16));
        assert_eq!(IS_BTN.size_for(0), Some(12));
        assert_eq!(IS_BTN.max_size(), 252);
    }

    fn btn_frame(size: u8, text: &[u8]) -> Vec<u8> {
        let mut frame = vec![size, ISP_BTN, 1, 0, 1, 0, 0, 0, 10, 10, 10, 10];
        frame.extend_from_slice(text);
        frame.resize(usize::from(size), 0);
        frame
    }

    fn decode(frame: &[u8]) -> WireResult<crate::InSimPacket> {
        crate::decode_frame(frame, &wire::Limits::default())
    }

    #[test]
    fn frame_without_text_rejected() {
        let err = decode(&btn_frame(12, b"")).unwrap_err();
        assert!(matches!(err, wire::DecodeError::InvalidCount { .. }));
    }

    #[test]
    fn unterminated_text_rejected() {
        let err = decode(&btn_frame(252, &[b'x'; 240])).unwrap_err();
        assert!(matches!(err, wire::DecodeError::InvalidCount { .. }));
    }

    #[test]
    fn oversized_frame_for_text_rejected() {
        let err = decode(&btn_frame(20, b"ab\0")).unwrap_err();
        assert!(matches!(err, wire::DecodeError::InvalidCount { .. }));
    }

    #[test]
    fn accepted_frames_reencode_identically() {
        let limits = wire::Limits::default();
        let mut longest = vec![b'x'; 239];
        longest.push(0);
        for frame in [btn_frame(16, b"ab\0"), btn_frame(16, b"\0"), btn_frame(252, &longest)] {
            let packet = decode(&frame).unwrap();
            assert_eq!(packet.write(&limits).unwrap(), frame);
        }
    }
}
