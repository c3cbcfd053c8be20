//! DDS texture header
//!
//! Only the header is handled; pixel data and its interpretation are left to
//! the caller. When the pixel format's FourCC is `DX10`, a 20-byte extension
//! header follows the base header. Any other FourCC means there is no
//! extension and nothing more is read.

use std::fmt;

use tracing::debug;

use crate::cursor::{BinaryReader, BinaryWriter};
use crate::error::Result;
use crate::format::{Decode, Encode};

/// DDS magic: `DDS `
pub const MAGIC: &[u8; 4] = b"DDS ";

/// FourCC announcing the DX10 extension header
pub const FOURCC_DX10: FourCC = FourCC(*b"DX10");

const HEADER_SIZE: i32 = 124;
const PIXEL_FORMAT_SIZE: i32 = 32;

/// Four-character code
#[derive(Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FourCC(pub [u8; 4]);

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC(\"{}\")", self.0.escape_ascii())
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.escape_ascii())
    }
}

/// The 32-byte pixel format block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PixelFormat {
    pub flags: u32,
    pub four_cc: FourCC,
    pub rgb_bit_count: i32,
    pub r_bit_mask: u32,
    pub g_bit_mask: u32,
    pub b_bit_mask: u32,
    pub a_bit_mask: u32,
}

impl Decode for PixelFormat {
    fn decode(reader: &mut BinaryReader<'_>) -> Result<Self> {
        reader.assert_i32(PIXEL_FORMAT_SIZE)?;
        Ok(PixelFormat {
            flags: reader.read_u32()?,
            four_cc: FourCC(reader.read_fourcc()?),
            rgb_bit_count: reader.read_i32()?,
            r_bit_mask: reader.read_u32()?,
            g_bit_mask: reader.read_u32()?,
            b_bit_mask: reader.read_u32()?,
            a_bit_mask: reader.read_u32()?,
        })
    }
}

impl Encode for PixelFormat {
    fn encode(&self, writer: &mut BinaryWriter) -> Result<()> {
        writer.write_i32(PIXEL_FORMAT_SIZE);
        writer.write_u32(self.flags);
        writer.write_bytes(&self.four_cc.0);
        writer.write_i32(self.rgb_bit_count);
        writer.write_u32(self.r_bit_mask);
        writer.write_u32(self.g_bit_mask);
        writer.write_u32(self.b_bit_mask);
        writer.write_u32(self.a_bit_mask);
        Ok(())
    }
}

/// DX10 extension header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Dx10Header {
    pub dxgi_format: u32,
    pub resource_dimension: u32,
    pub misc_flag: u32,
    pub array_size: u32,
    pub misc_flags2: u32,
}

impl Dx10Header {
    pub const RECORD_SIZE: usize = 20;
}

impl Decode for Dx10Header {
    fn decode(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Dx10Header {
            dxgi_format: reader.read_u32()?,
            resource_dimension: reader.read_u32()?,
            misc_flag: reader.read_u32()?,
            array_size: reader.read_u32()?,
            misc_flags2: reader.read_u32()?,
        })
    }
}

impl Encode for Dx10Header {
    fn encode(&self, writer: &mut BinaryWriter) -> Result<()> {
        writer.write_u32(self.dxgi_format);
        writer.write_u32(self.resource_dimension);
        writer.write_u32(self.misc_flag);
        writer.write_u32(self.array_size);
        writer.write_u32(self.misc_flags2);
        Ok(())
    }
}

/// A decoded DDS header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DdsHeader {
    pub flags: i32,
    pub height: i32,
    pub width: i32,
    pub pitch_or_linear_size: i32,
    pub depth: i32,
    pub mip_map_count: i32,
    pub pixel_format: PixelFormat,
    pub caps: i32,
    pub caps2: i32,
    /// Present only when the pixel format FourCC is `DX10`
    pub dx10: Option<Dx10Header>,
}

impl DdsHeader {
    /// Size of the base header including the magic
    pub const RECORD_SIZE: usize = 128;

    /// Check if data starts with the DDS magic
    pub fn is_dds(data: &[u8]) -> bool {
        data.starts_with(MAGIC)
    }

    /// Encoded size including the DX10 extension if present
    pub fn size(&self) -> usize {
        Self::RECORD_SIZE + self.dx10.map_or(0, |_| Dx10Header::RECORD_SIZE)
    }
}

impl Decode for DdsHeader {
    fn decode(reader: &mut BinaryReader<'_>) -> Result<Self> {
        reader.assert_bytes(MAGIC)?;
        reader.assert_i32(HEADER_SIZE)?;
        let flags = reader.read_i32()?;
        let height = reader.read_i32()?;
        let width = reader.read_i32()?;
        let pitch_or_linear_size = reader.read_i32()?;
        let depth = reader.read_i32()?;
        let mip_map_count = reader.read_i32()?;
        reader.skip(44)?;
        let pixel_format = PixelFormat::decode(reader)?;
        let caps = reader.read_i32()?;
        let caps2 = reader.read_i32()?;
        reader.skip(12)?;

        let dx10 = if pixel_format.four_cc == FOURCC_DX10 {
            Some(Dx10Header::decode(reader)?)
        } else {
            None
        };

        debug!(
            width,
            height,
            mip_map_count,
            four_cc = %pixel_format.four_cc,
            dx10 = dx10.is_some(),
            "decoded dds header"
        );

        Ok(DdsHeader {
            flags,
            height,
            width,
            pitch_or_linear_size,
            depth,
            mip_map_count,
            pixel_format,
            caps,
            caps2,
            dx10,
        })
    }
}

impl Encode for DdsHeader {
    fn encode(&self, writer: &mut BinaryWriter) -> Result<()> {
        writer.write_bytes(MAGIC);
        writer.write_i32(HEADER_SIZE);
        writer.write_i32(self.flags);
        writer.write_i32(self.height);
        writer.write_i32(self.width);
        writer.write_i32(self.pitch_or_linear_size);
        writer.write_i32(self.depth);
        writer.write_i32(self.mip_map_count);
        writer.write_zeros(44);
        self.pixel_format.encode(writer)?;
        writer.write_i32(self.caps);
        writer.write_i32(self.caps2);
        writer.write_zeros(12);
        if let Some(dx10) = &self.dx10 {
            dx10.encode(writer)?;
        }
        Ok(())
    }
}
