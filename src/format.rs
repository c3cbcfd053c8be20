//! Decode/encode capabilities and top-level entry points
//!
//! Each format implements [`Decode`], and [`Encode`] where writing is
//! supported. A format that cannot be written still implements [`Encode`]
//! but returns [`Error::NotImplemented`].

use crate::cursor::{BinaryReader, BinaryWriter};
use crate::error::{Error, Result};
use crate::primitive::Endian;

/// Options for a top-level decode
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Initial byte order of the reader
    pub endian: Endian,
    /// Fail if the reader's saved-position stack is not empty afterwards
    pub check_balance: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            endian: Endian::Little,
            check_balance: true,
        }
    }
}

/// A structure that can be decoded from a [`BinaryReader`]
pub trait Decode: Sized {
    fn decode(reader: &mut BinaryReader<'_>) -> Result<Self>;

    /// Decode from a byte slice with default options
    fn from_bytes(data: &[u8]) -> Result<Self> {
        decode_bytes(data)
    }
}

/// A structure that can be encoded into a [`BinaryWriter`]
pub trait Encode {
    fn encode(&self, writer: &mut BinaryWriter) -> Result<()>;

    /// Encode into a new little-endian buffer
    fn to_bytes(&self) -> Result<Vec<u8>> {
        encode_to_vec(self)
    }
}

/// Decode a `T` from the start of `data`
pub fn decode_bytes<T: Decode>(data: &[u8]) -> Result<T> {
    decode_bytes_with(data, &DecodeOptions::default())
}

pub fn decode_bytes_with<T: Decode>(data: &[u8], options: &DecodeOptions) -> Result<T> {
    let mut reader = BinaryReader::with_endian(data, options.endian);
    let value = T::decode(&mut reader)?;
    if options.check_balance && reader.depth() != 0 {
        return Err(Error::UnbalancedCursor {
            depth: reader.depth(),
        });
    }
    Ok(value)
}

pub fn encode_to_vec<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut writer = BinaryWriter::new();
    value.encode(&mut writer)?;
    Ok(writer.into_inner())
}

/// Narrow a length or offset to its on-disk integer type
pub(crate) fn to_field<T: TryFrom<usize>>(field: &'static str, value: usize) -> Result<T> {
    T::try_from(value).map_err(|_| Error::FieldOverflow { field, value })
}
