//! Periodic position reports: node/lap and multi-car info.

use schema::{BitFlag, FieldDescriptor, Flags, MessageSchema, SizeRule};
use wire::{EncodeError, PacketWriter, RequestId, WireResult};

use super::tags::{ISP_MCI, ISP_NLP};
use crate::packet::{InfoOnly, Packet};
use crate::reader::BodyReader;

/// Players per node/lap packet.
pub const NLP_MAX_PLAYERS: usize = 40;

/// Cars per multi-car info packet.
pub const MCI_MAX_CARS: usize = 8;

const NODE_LAP_WIDTH: usize = 6;
const COMP_CAR_WIDTH: usize = 28;

pub(crate) static IS_NLP: MessageSchema = MessageSchema::new(
    "IS_NLP",
    ISP_NLP,
    SizeRule::Variable {
        base: 4,
        element_width: NODE_LAP_WIDTH,
        max_count: NLP_MAX_PLAYERS,
    },
    &[
        FieldDescriptor::byte("NumP").max(NLP_MAX_PLAYERS as u64),
        FieldDescriptor::structure("Info", NODE_LAP_WIDTH).dynamic_array(NLP_MAX_PLAYERS),
    ],
);

pub(crate) static IS_MCI: MessageSchema = MessageSchema::new(
    "IS_MCI",
    ISP_MCI,
    SizeRule::Variable {
        base: 4,
        element_width: COMP_CAR_WIDTH,
        max_count: MCI_MAX_CARS,
    },
    &[
        FieldDescriptor::byte("NumC").max(MCI_MAX_CARS as u64),
        FieldDescriptor::structure("Info", COMP_CAR_WIDTH).dynamic_array(MCI_MAX_CARS),
    ],
);

/// Position of one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeLap {
    pub node: u16,
    pub lap: u16,
    pub plid: u8,
    pub position: u8,
}

impl NodeLap {
    fn write(&self, writer: &mut bytestream::ByteWriter) -> Result<(), EncodeError> {
        writer.write_u16(self.node);
        writer.write_u16(self.lap);
        writer.write_u8(self.plid);
        writer.write_u8(self.position);
        Ok(())
    }

    fn read(reader: &mut BodyReader<'_>) -> WireResult<Self> {
        Ok(Self {
            node: reader.read_u16()?,
            lap: reader.read_u16()?,
            plid: reader.read_u8()?,
            position: reader.read_u8()?,
        })
    }
}

/// Node and lap of every player.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IsNlp {
    pub request_id: RequestId,
    pub info: Vec<NodeLap>,
}

impl Packet for IsNlp {
    const TYPE_TAG: u8 = ISP_NLP;

    fn schema() -> &'static MessageSchema {
        &IS_NLP
    }

    fn request_id(&self) -> RequestId {
        self.request_id
    }

    fn element_count(&self) -> usize {
        self.info.len()
    }

    fn write_body(&self, writer: &mut PacketWriter) -> Result<(), EncodeError> {
        let count = u8::try_from(self.info.len()).map_err(|_| EncodeError::CountExceeded {
            schema: IS_NLP.name,
            count: self.info.len(),
            max: NLP_MAX_PLAYERS,
        })?;
        writer.write_u8(count);
        writer.write_array(&self.info, None, NODE_LAP_WIDTH, |w, node| node.write(w))?;
        writer.set_element_count(self.info.len());
        Ok(())
    }

    fn read_body(reader: &mut BodyReader<'_>) -> WireResult<Self> {
        let request_id = reader.header().request_id;
        let count = usize::from(reader.read_u8()?);
        reader.expect_count(count)?;
        Ok(Self {
            request_id,
            info: reader.read_structures(count, NODE_LAP_WIDTH, NodeLap::read)?,
        })
    }
}

impl InfoOnly for IsNlp {}

/// Per-car flags in [`CompCar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CciFlag {
    /// Car is being shown a blue flag.
    Blue,
    /// Car is causing a yellow flag.
    Yellow,
    /// Car is lagging.
    Lag,
    /// First car in this set of packets.
    First,
    /// Last car in this set of packets.
    Last,
}

impl BitFlag for CciFlag {
    type Repr = u8;
    const ALL: &'static [Self] = &[Self::Blue, Self::Yellow, Self::Lag, Self::First, Self::Last];

    fn bit(self) -> u32 {
        match self {
            Self::Blue => 0,
            Self::Yellow => 1,
            Self::Lag => 5,
            Self::First => 6,
            Self::Last => 7,
        }
    }
}

/// Detailed state of one car.
///
/// Positions are in 1/65536 metre; speed in 32768 = 100 m/s; angles in
/// 32768 = 180 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompCar {
    pub node: u16,
    pub lap: u16,
    pub plid: u8,
    pub position: u8,
    pub info: Flags<CciFlag>,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub speed: u16,
    pub direction: u16,
    pub heading: u16,
    pub ang_vel: i16,
}

impl CompCar {
    fn write(&self, writer: &mut bytestream::ByteWriter) -> Result<(), EncodeError> {
        writer.write_u16(self.node);
        writer.write_u16(self.lap);
        writer.write_u8(self.plid);
        writer.write_u8(self.position);
        writer.write_u8(self.info.to_wire());
        writer.write_zero_bytes(1);
        writer.write_i32(self.x);
        writer.write_i32(self.y);
        writer.write_i32(self.z);
        writer.write_u16(self.speed);
        writer.write_u16(self.direction);
        writer.write_u16(self.heading);
        writer.write_i16(self.ang_vel);
        Ok(())
    }

    fn read(reader: &mut BodyReader<'_>) -> WireResult<Self> {
        let node = reader.read_u16()?;
        let lap = reader.read_u16()?;
        let plid = reader.read_u8()?;
        let position = reader.read_u8()?;
        let info = Flags::from_wire(reader.read_u8()?);
        reader.skip_reserved("Sp3", 1)?;
        Ok(Self {
            node,
            lap,
            plid,
            position,
            info,
            x: reader.read_i32()?,
            y: reader.read_i32()?,
            z: reader.read_i32()?,
            speed: reader.read_u16()?,
            direction: reader.read_u16()?,
            heading: reader.read_u16()?,
            ang_vel: reader.read_i16()?,
        })
    }
}

/// Detailed car information, sent in sets of packets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IsMci {
    pub request_id: RequestId,
    pub info: Vec<CompCar>,
}

impl Packet for IsMci {
    const TYPE_TAG: u8 = ISP_MCI;

    fn schema() -> &'static MessageSchema {
        &IS_MCI
    }

    fn request_id(&self) -> RequestId {
        self.request_id
    }

    fn element_count(&self) -> usize {
        self.info.len()
    }

    fn write_body(&self, writer: &mut PacketWriter) -> Result<(), EncodeError> {
        let count = u8::try_from(self.info.len()).map_err(|_| EncodeError::CountExceeded {
            schema: IS_MCI.name,
            count: self.info.len(),
            max: MCI_MAX_CARS,
        })?;
        writer.write_u8(count);
        writer.write_array(&self.info, None, COMP_CAR_WIDTH, |w, car| car.write(w))?;
        writer.set_element_count(self.info.len());
        Ok(())
    }

    fn read_body(reader: &mut BodyReader<'_>) -> WireResult<Self> {
        let request_id = reader.header().request_id;
        let count = usize::from(reader.read_u8()?);
        reader.expect_count(count)?;
        Ok(Self {
            request_id,
            info: reader.read_structures(count, COMP_CAR_WIDTH, CompCar::read)?,
        })
    }
}

impl InfoOnly for IsMci {}
