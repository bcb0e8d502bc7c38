//! Body reader used by message decoders.

use std::ops::{Deref, DerefMut};

use bytestream::ByteCursor;
use schema::MessageSchema;
use tracing::trace;
use wire::{DecodeError, PacketHeader, PaddingPolicy, WireResult, HEADER_SIZE};

/// Cursor over one frame's body, aware of the message being decoded.
///
/// Dereferences to [`ByteCursor`] for primitive reads and adds the checks
/// that need the schema: element counts against the frame size and the
/// padding policy for reserved bytes.
#[derive(Debug, Clone)]
pub struct BodyReader<'a> {
    cursor: ByteCursor<'a>,
    header: PacketHeader,
    schema: &'static MessageSchema,
    padding: PaddingPolicy,
}

impl<'a> BodyReader<'a> {
    /// Creates a reader positioned just after the header of `frame`.
    pub fn new(
        frame: &'a [u8],
        header: PacketHeader,
        schema: &'static MessageSchema,
        padding: PaddingPolicy,
    ) -> WireResult<Self> {
        Ok(Self {
            cursor: ByteCursor::with_offset(frame, HEADER_SIZE)?,
            header,
            schema,
            padding,
        })
    }

    #[must_use]
    pub const fn header(&self) -> &PacketHeader {
        &self.header
    }

    /// Skips reserved bytes, applying the padding policy.
    pub fn skip_reserved(&mut self, field: &'static str, n: usize) -> WireResult<()> {
        let nonzero = self.cursor.skip_padding(n)?;
        self.check_padding(field, nonzero)
    }

    /// Checks that `count` elements explain the frame size.
    pub fn expect_count(&self, count: usize) -> WireResult<()> {
        if self.schema.size_for(count) == Some(self.header.size) {
            Ok(())
        } else {
            Err(DecodeError::InvalidCount {
                schema: self.schema.name,
                count,
                max: self.schema.max_count(),
                size: self.header.size,
            })
        }
    }

    /// Reads `count` structures of `width` bytes, each through its own
    /// nested reader.
    pub fn read_structures<T, F>(&mut self, count: usize, width: usize, mut read: F) -> WireResult<Vec<T>>
    where
        F: FnMut(&mut BodyReader<'a>) -> WireResult<T>,
    {
        let header = self.header;
        let schema = self.schema;
        let padding = self.padding;
        self.cursor.read_structures(count, width, |cursor: &mut ByteCursor<'a>| {
            let mut nested = BodyReader {
                cursor: cursor.clone(),
                header,
                schema,
                padding,
            };
            read(&mut nested)
        })
    }

    /// Consumes the alignment padding that ends the body.
    pub fn finish(mut self) -> WireResult<()> {
        let rest = self.cursor.remaining();
        self.skip_reserved("<alignment>", rest)
    }

    fn check_padding(&self, field: &'static str, nonzero: usize) -> WireResult<()> {
        if nonzero == 0 {
            return Ok(());
        }
        match self.padding {
            PaddingPolicy::Strict => Err(DecodeError::NonZeroPadding {
                field,
                count: nonzero,
            }),
            PaddingPolicy::Tolerate => {
                trace!(
                    schema = self.schema.name,
                    field,
                    nonzero,
                    "tolerating non-zero reserved bytes"
                );
                Ok(())
            }
        }
    }
}

impl<'a> Deref for BodyReader<'a> {
    type Target = ByteCursor<'a>;

    fn deref(&self) -> &ByteCursor<'a> {
        &self.cursor
    }
}

impl<'a> DerefMut for BodyReader<'a> {
    fn deref_mut(&mut self) -> &mut ByteCursor<'a> {
        &mut self.cursor
    }
}
