//! Packet header types.

use std::fmt;

use crate::error::{DecodeError, WireResult};
use crate::limits::Limits;

pub use schema::HEADER_SIZE;

/// Correlation token carried in every header.
///
/// Zero marks an unsolicited packet; 1..=255 tie a reply to its request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestId(pub u8);

impl RequestId {
    /// No correlation requested.
    pub const NONE: Self = Self(0);

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl From<u8> for RequestId {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decoded packet header.
///
/// `size` is always the packet length in bytes, whatever the size byte
/// encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PacketHeader {
    pub size: usize,
    pub type_tag: u8,
    pub request_id: RequestId,
}

impl PacketHeader {
    #[must_use]
    pub const fn new(size: usize, type_tag: u8, request_id: RequestId) -> Self {
        Self {
            size,
            type_tag,
            request_id,
        }
    }

    /// Bytes following the header.
    #[must_use]
    pub const fn body_len(&self) -> usize {
        self.size.saturating_sub(HEADER_SIZE)
    }
}

/// Packet length announced by a frame's first byte.
///
/// Rejects lengths that are unaligned, too small for a header or above
/// the configured maximum.
pub fn frame_len(size_byte: u8, limits: &Limits) -> WireResult<usize> {
    let size = limits.size_encoding.decode(size_byte);
    if size > limits.max_packet_bytes {
        return Err(DecodeError::LimitsExceeded {
            kind: crate::LimitKind::PacketBytes,
            limit: limits.max_packet_bytes,
            actual: size,
        });
    }
    if size % 4 != 0 {
        return Err(DecodeError::UnalignedSize { size });
    }
    if size < HEADER_SIZE {
        return Err(DecodeError::Truncated {
            actual: size,
            required: HEADER_SIZE,
        });
    }
    Ok(size)
}

/// Decodes and checks the header of one complete frame.
pub fn decode_header(frame: &[u8], limits: &Limits) -> WireResult<PacketHeader> {
    let &[size_byte, type_tag, request_id, ..] = frame else {
        return Err(DecodeError::Truncated {
            actual: frame.len(),
            required: HEADER_SIZE,
        });
    };

    let size = frame_len(size_byte, limits)?;
    if size != frame.len() {
        return Err(DecodeError::LengthMismatch {
            declared: size,
            actual: frame.len(),
        });
    }

    Ok(PacketHeader {
        size,
        type_tag,
        request_id: RequestId(request_id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_tiny_header() {
        let frame = [4, 3, 7, 1];
        let header = decode_header(&frame, &Limits::default()).unwrap();
        assert_eq!(header, PacketHeader::new(4, 3, RequestId(7)));
        assert_eq!(header.body_len(), 1);
    }

    #[test]
    fn short_frame_is_truncated() {
        let err = decode_header(&[4, 3], &Limits::default()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Truncated {
                actual: 2,
                required: 3
            }
        ));
    }

    #[test]
    fn size_must_match_frame() {
        let err = decode_header(&[8, 3, 0, 0], &Limits::default()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::LengthMismatch {
                declared: 8,
                actual: 4
            }
        ));
    }

    #[test]
    fn unaligned_size_rejected() {
        let err = decode_header(&[5, 3, 0, 0, 0], &Limits::default()).unwrap_err();
        assert!(matches!(err, DecodeError::UnalignedSize { size: 5 }));
    }

    #[test]
    fn oversize_rejected() {
        let err = frame_len(200, &Limits::for_testing()).unwrap_err();
        assert!(matches!(err, DecodeError::LimitsExceeded { actual: 200, .. }));
    }

    #[test]
    fn zero_size_rejected() {
        assert!(matches!(
            frame_len(0, &Limits::default()).unwrap_err(),
            DecodeError::Truncated { actual: 0, .. }
        ));
    }

    #[test]
    fn quarter_size_header() {
        let mut frame = vec![0u8; 512];
        frame[0] = 128;
        frame[1] = 38;
        let header = decode_header(&frame, &Limits::large_packets()).unwrap();
        assert_eq!(header.size, 512);
        assert!(header.request_id.is_none());
    }
}
