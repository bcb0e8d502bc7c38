//! Message definitions.
//!
//! Each message owns a static schema and implements [`Packet`](crate::Packet)
//! plus the capability traits that apply to it.

mod button;
mod chat;
mod connection;
mod init;
mod screenshot;
mod small;
mod telemetry;
mod tiny;

pub use button::{IsBtn, BUTTON_MAX_TEXT};
pub use chat::{IsMst, IsMsx};
pub use connection::{IsCnl, IsNcn};
pub use init::{IsIsi, IsVer, IsiFlag};
pub use screenshot::IsSsh;
pub use small::{IsSmall, SmallType};
pub use telemetry::{CciFlag, CompCar, IsMci, IsNlp, NodeLap, MCI_MAX_CARS, NLP_MAX_PLAYERS};
pub use tiny::{IsTiny, TinyType};

use schema::MessageSchema;

/// Packet type tags.
pub mod tags {
    pub const ISP_ISI: u8 = 1;
    pub const ISP_VER: u8 = 2;
    pub const ISP_TINY: u8 = 3;
    pub const ISP_SMALL: u8 = 4;
    pub const ISP_MST: u8 = 13;
    pub const ISP_NCN: u8 = 18;
    pub const ISP_CNL: u8 = 19;
    pub const ISP_NLP: u8 = 37;
    pub const ISP_MCI: u8 = 38;
    pub const ISP_MSX: u8 = 39;
    pub const ISP_BTN: u8 = 45;
    pub const ISP_SSH: u8 = 49;
}

/// Every message schema this crate decodes.
#[must_use]
pub fn schemas() -> [&'static MessageSchema; 12] {
    [
        &init::IS_ISI,
        &init::IS_VER,
        &tiny::IS_TINY,
        &small::IS_SMALL,
        &chat::IS_MST,
        &chat::IS_MSX,
        &connection::IS_NCN,
        &connection::IS_CNL,
        &telemetry::IS_NLP,
        &telemetry::IS_MCI,
        &button::IS_BTN,
        &screenshot::IS_SSH,
    ]
}

/// Looks up a schema by type tag.
#[must_use]
pub fn schema_for(type_tag: u8) -> Option<&'static MessageSchema> {
    schemas().into_iter().find(|schema| schema.type_tag == type_tag)
}
