//! Message definitions and encode/decode entry points for the InSim codec.
//!
//! This crate ties together bytestream, wire, and schema: every message
//! declares a static schema and implements [`Packet`], and the entry points
//! here turn messages into frames and frames into [`InSimPacket`]s.
//!
//! # Features
//!
//! - Capability traits: [`Sendable`], [`InfoOnly`], [`Requestable`]
//! - Tiny and small envelopes as sum types keyed on their sub-type
//! - Count-prefixed structure arrays and content-sized text
//! - Reply descriptions for correlating requests with their answers
//!
//! # Design Principles
//!
//! - **Validate outbound, decode inbound** - Caller mistakes are validation errors; peer mistakes are decode errors.
//! - **Canonical output** - Encoding a decoded canonical frame reproduces it byte for byte.
//! - **One frame, one result** - A bad frame never affects the next one.
//!
//! # Example
//!
//! ```
//! use codec::{decode_frame, encode, InSimPacket, IsTiny, TinyType};
//! use wire::{Limits, RequestId};
//!
//! let ping = IsTiny::new(RequestId(1), TinyType::Ping);
//! let bytes = encode(&ping, &Limits::default()).unwrap();
//! assert_eq!(bytes, [4, 3, 1, 3]);
//!
//! let decoded = decode_frame(&bytes, &Limits::default()).unwrap();
//! assert_eq!(decoded, InSimPacket::Tiny(ping));
//! ```

mod envelope;
mod error;
mod messages;
mod packet;
mod reader;

pub use envelope::{decode, decode_as, decode_frame, encode, write_packet, InSimPacket};
pub use error::{CodecError, CodecResult};
pub use messages::{
    schema_for, schemas, tags, CciFlag, CompCar, IsBtn, IsCnl, IsIsi, IsMci, IsMsx, IsMst, IsNcn,
    IsNlp, IsSmall, IsSsh, IsTiny, IsVer, IsiFlag, NodeLap, SmallType, TinyType, BUTTON_MAX_TEXT,
    MCI_MAX_CARS, NLP_MAX_PLAYERS,
};
pub use packet::{
    InfoOnly, Packet, ReplyKey, ReplyPlan, ReplyShape, Requestable, Sendable, SequenceEnd,
    SequenceTracker,
};
pub use reader::BodyReader;
pub use wire::Limits as WireLimits;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = WireLimits::default();
        let _ = ReplyKey::new(tags::ISP_VER);
        let _ = TinyType::Ping;
        let _: CodecResult<()> = Ok(());
    }

    #[test]
    fn capabilities_by_message() {
        fn sendable<M: Sendable>() {}
        fn info_only<M: InfoOnly>() {}
        fn requestable<M: Requestable>() {}

        sendable::<IsMst>();
        sendable::<IsBtn>();
        info_only::<IsVer>();
        info_only::<IsMci>();
        requestable::<IsTiny>();
        requestable::<IsIsi>();
        requestable::<IsSsh>();
    }

    #[test]
    fn every_sendable_lists_every_field() {
        fn count<M: Sendable + Default>() -> (usize, usize) {
            (M::default().field_values().len(), M::schema().fields.len())
        }
        for (values, fields) in [
            count::<IsIsi>(),
            count::<IsTiny>(),
            count::<IsSmall>(),
            count::<IsMst>(),
            count::<IsMsx>(),
            count::<IsBtn>(),
            count::<IsSsh>(),
        ] {
            assert_eq!(values, fields);
        }
    }
}
