//! Configurable limits and decode policies.

/// Largest packet in the standard header encoding.
pub const MAX_PACKET_BYTES: usize = 252;

/// Largest packet when the size byte counts 4-byte units.
pub const MAX_LARGE_PACKET_BYTES: usize = 1020;

/// How the header's size byte expresses the packet length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SizeEncoding {
    /// The size byte is the length in bytes.
    #[default]
    Bytes,
    /// The size byte is the length divided by four.
    Quarter,
}

impl SizeEncoding {
    /// Packet length for a size byte.
    #[must_use]
    pub const fn decode(self, raw: u8) -> usize {
        match self {
            Self::Bytes => raw as usize,
            Self::Quarter => raw as usize * 4,
        }
    }

    /// Size byte for a packet length, if representable.
    #[must_use]
    pub const fn encode(self, size: usize) -> Option<u8> {
        let raw = match self {
            Self::Bytes => size,
            Self::Quarter => {
                if size % 4 != 0 {
                    return None;
                }
                size / 4
            }
        };
        if raw > u8::MAX as usize {
            None
        } else {
            Some(raw as u8)
        }
    }
}

/// What to do with non-zero reserved bytes on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaddingPolicy {
    /// Accept and log them; peers are not required to zero padding.
    #[default]
    Tolerate,
    /// Reject the frame.
    Strict,
}

/// Wire-level limits for packet encoding and decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Limits {
    /// Maximum packet size in bytes.
    pub max_packet_bytes: usize,

    /// Interpretation of the header size byte.
    pub size_encoding: SizeEncoding,

    /// Handling of non-zero reserved bytes.
    pub padding: PaddingPolicy,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_packet_bytes: MAX_PACKET_BYTES,
            size_encoding: SizeEncoding::Bytes,
            padding: PaddingPolicy::Tolerate,
        }
    }
}

impl Limits {
    /// Limits for hosts negotiated into large packets.
    #[must_use]
    pub const fn large_packets() -> Self {
        Self {
            max_packet_bytes: MAX_LARGE_PACKET_BYTES,
            size_encoding: SizeEncoding::Quarter,
            padding: PaddingPolicy::Tolerate,
        }
    }

    /// Default limits that reject non-zero padding.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            max_packet_bytes: MAX_PACKET_BYTES,
            size_encoding: SizeEncoding::Bytes,
            padding: PaddingPolicy::Strict,
        }
    }

    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_packet_bytes: 128,
            size_encoding: SizeEncoding::Bytes,
            padding: PaddingPolicy::Strict,
        }
    }

    /// Returns a copy with a different padding policy.
    #[must_use]
    pub const fn with_padding(mut self, padding: PaddingPolicy) -> Self {
        self.padding = padding;
        self
    }
}
