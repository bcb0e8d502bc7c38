//! Outgoing packet construction.

use std::ops::{Deref, DerefMut};

use bytestream::ByteWriter;
use schema::MessageSchema;

use crate::error::EncodeError;
use crate::header::{RequestId, HEADER_SIZE};
use crate::limits::Limits;

/// Builds one outgoing packet.
///
/// The header region is reserved up front and filled by
/// [`finish`](Self::finish) once the body length is known. Body writes go
/// through the [`ByteWriter`] this type dereferences to.
#[derive(Debug)]
pub struct PacketWriter {
    body: ByteWriter,
    type_tag: u8,
    request_id: RequestId,
    element_count: usize,
}

impl PacketWriter {
    #[must_use]
    pub fn new(type_tag: u8, request_id: RequestId) -> Self {
        Self::with_capacity(type_tag, request_id, 32)
    }

    #[must_use]
    pub fn with_capacity(type_tag: u8, request_id: RequestId, capacity: usize) -> Self {
        let mut body = ByteWriter::with_capacity(capacity.max(HEADER_SIZE));
        body.write_zero_bytes(HEADER_SIZE);
        Self {
            body,
            type_tag,
            request_id,
            element_count: 0,
        }
    }

    #[must_use]
    pub const fn type_tag(&self) -> u8 {
        self.type_tag
    }

    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Records how many dynamic elements the body carries.
    pub fn set_element_count(&mut self, count: usize) {
        self.element_count = count;
    }

    /// Pads, checks the length against `schema` and `limits`, and writes
    /// the header.
    pub fn finish(self, schema: &MessageSchema, limits: &Limits) -> Result<Vec<u8>, EncodeError> {
        let Self {
            mut body,
            type_tag,
            request_id,
            element_count,
        } = self;

        if type_tag != schema.type_tag {
            return Err(EncodeError::TypeTagMismatch {
                schema: schema.name,
                expected: schema.type_tag,
                writer: type_tag,
            });
        }

        body.pad_to_alignment(4);
        let size = body.len();

        let expected = schema
            .size_for(element_count)
            .ok_or(EncodeError::CountExceeded {
                schema: schema.name,
                count: element_count,
                max: schema.max_count(),
            })?;
        if size != expected {
            return Err(EncodeError::SizeMismatch {
                schema: schema.name,
                expected,
                actual: size,
            });
        }
        if size > limits.max_packet_bytes {
            return Err(EncodeError::TooLarge {
                limit: limits.max_packet_bytes,
                actual: size,
            });
        }
        let size_byte = limits
            .size_encoding
            .encode(size)
            .ok_or(EncodeError::UnencodableSize {
                size,
                encoding: limits.size_encoding,
            })?;

        body.set_u8(0, size_byte)?;
        body.set_u8(1, type_tag)?;
        body.set_u8(2, request_id.get())?;
        Ok(body.finish())
    }
}

impl Deref for PacketWriter {
    type Target = ByteWriter;

    fn deref(&self) -> &ByteWriter {
        &self.body
    }
}

impl DerefMut for PacketWriter {
    fn deref_mut(&mut self) -> &mut ByteWriter {
        &mut self.body
    }
}
