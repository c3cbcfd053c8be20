//! Edge list (physics mesh edges)
//!
//! ## Layout
//!
//! Header: `i32 4`, `i32 edge_count`, `i32 id`, `i32 0`, followed by
//! `edge_count` records of 64 bytes:
//!
//! | Offset | Size | Field                          |
//! |--------|------|--------------------------------|
//! | 0x00   | 12   | start vector (3 x f32)         |
//! | 0x0C   | 4    | f32 `1.0`                      |
//! | 0x10   | 12   | end vector (3 x f32)           |
//! | 0x1C   | 4    | f32 `1.0`                      |
//! | 0x20   | 16   | zero                           |
//! | 0x30   | 4    | opaque i32                     |
//! | 0x34   | 3    | opaque bytes                   |
//! | 0x37   | 1    | `0`                            |
//! | 0x38   | 8    | zero                           |

use tracing::debug;

use crate::cursor::{BinaryReader, BinaryWriter};
use crate::error::Result;
use crate::format::{to_field, Decode, Encode};

const VERSION: i32 = 4;

/// One edge between two points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Edge {
    pub start: [f32; 3],
    pub end: [f32; 3],
    /// Opaque value at 0x30, replayed verbatim on encode
    pub unknown: i32,
    /// Opaque bytes at 0x34, replayed verbatim on encode
    pub flags: [u8; 3],
}

impl Edge {
    pub const RECORD_SIZE: usize = 64;

    fn decode_point(reader: &mut BinaryReader<'_>) -> Result<[f32; 3]> {
        let point = [reader.read_f32()?, reader.read_f32()?, reader.read_f32()?];
        reader.assert_f32(1.0)?;
        Ok(point)
    }

    fn encode_point(writer: &mut BinaryWriter, point: &[f32; 3]) {
        for &v in point {
            writer.write_f32(v);
        }
        writer.write_f32(1.0);
    }
}

impl Decode for Edge {
    fn decode(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let start = Self::decode_point(reader)?;
        let end = Self::decode_point(reader)?;
        reader.assert_zero_region(16)?;
        let unknown = reader.read_i32()?;
        let flags = reader.read_array::<3>()?;
        reader.assert_u8(0)?;
        reader.assert_zero_region(8)?;

        Ok(Edge {
            start,
            end,
            unknown,
            flags,
        })
    }
}

impl Encode for Edge {
    fn encode(&self, writer: &mut BinaryWriter) -> Result<()> {
        Self::encode_point(writer, &self.start);
        Self::encode_point(writer, &self.end);
        writer.write_zeros(16);
        writer.write_i32(self.unknown);
        writer.write_bytes(&self.flags);
        writer.write_u8(0);
        writer.write_zeros(8);
        Ok(())
    }
}

/// A decoded edge list
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EdgeList {
    pub id: i32,
    pub edges: Vec<Edge>,
}

impl Decode for EdgeList {
    fn decode(reader: &mut BinaryReader<'_>) -> Result<Self> {
        reader.assert_i32(VERSION)?;
        let edge_count = reader.read_count()?;
        let id = reader.read_i32()?;
        reader.assert_i32(0)?;

        debug!(edge_count, id, "decoding edge list");

        reader.ensure_records(edge_count, Edge::RECORD_SIZE)?;
        let mut edges = Vec::with_capacity(edge_count);
        for _ in 0..edge_count {
            edges.push(Edge::decode(reader)?);
        }

        Ok(EdgeList { id, edges })
    }
}

impl Encode for EdgeList {
    fn encode(&self, writer: &mut BinaryWriter) -> Result<()> {
        let edge_count: i32 = to_field("edge count", self.edges.len())?;
        writer.write_i32(VERSION);
        writer.write_i32(edge_count);
        writer.write_i32(self.id);
        writer.write_i32(0);
        for edge in &self.edges {
            edge.encode(writer)?;
        }
        Ok(())
    }
}
