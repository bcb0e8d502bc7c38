//! Packet headers, framing and packet assembly for the InSim codec.
//!
//! This crate handles the envelope every message shares: the 3-byte header
//! (size, type tag, request id), size-byte encodings, limit enforcement,
//! stream framing, and the [`PacketWriter`] that turns a written body into
//! a finished packet. It does not know about individual messages.
//!
//! # Design Principles
//!
//! - **Aligned sizes** - Every packet is a multiple of 4 bytes; the writer pads, the decoder checks.
//! - **Bounded decoding** - Size bytes are validated against limits before any body is read.
//! - **Frame isolation** - A bad frame is an error value for that frame alone.

mod error;
mod frame;
mod header;
mod limits;
mod writer;

pub use error::{DecodeError, EncodeError, LimitKind, WireResult};
pub use frame::{FrameAssembler, Frames};
pub use header::{decode_header, frame_len, PacketHeader, RequestId, HEADER_SIZE};
pub use limits::{Limits, PaddingPolicy, SizeEncoding, MAX_LARGE_PACKET_BYTES, MAX_PACKET_BYTES};
pub use writer::PacketWriter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = HEADER_SIZE;
        let _ = RequestId::NONE;
        let _ = Limits::default();
        let _ = PaddingPolicy::Strict;
        let _ = SizeEncoding::Quarter;
        let _ = FrameAssembler::new(Limits::default());
        let _: WireResult<()> = Ok(());
    }

    #[test]
    fn header_size_constant_correct() {
        assert_eq!(HEADER_SIZE, 3);
        assert_eq!(MAX_PACKET_BYTES % 4, 0);
        assert_eq!(MAX_LARGE_PACKET_BYTES, 255 * 4);
    }
}
