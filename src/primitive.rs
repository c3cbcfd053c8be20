//! Fixed-width primitive helpers shared by the reader, writer and record decoder

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::fmt;

/// Byte order used by a [`BinaryReader`](crate::BinaryReader) or
/// [`BinaryWriter`](crate::BinaryWriter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Endian {
    #[default]
    Little,
    Big,
}

impl Endian {
    /// Decode a primitive from the front of `buf`.
    ///
    /// `buf` must hold at least `T::SIZE` bytes.
    pub fn decode<T: Primitive>(self, buf: &[u8]) -> T {
        match self {
            Endian::Little => T::decode::<LittleEndian>(buf),
            Endian::Big => T::decode::<BigEndian>(buf),
        }
    }

    /// Encode a primitive into the front of `buf`.
    ///
    /// `buf` must hold at least `T::SIZE` bytes.
    pub fn encode<T: Primitive>(self, value: T, buf: &mut [u8]) {
        match self {
            Endian::Little => value.encode::<LittleEndian>(buf),
            Endian::Big => value.encode::<BigEndian>(buf),
        }
    }
}

/// A fixed-width numeric type that can be read from or written to a byte buffer
pub trait Primitive: Copy + PartialEq + fmt::Debug {
    /// Width in bytes
    const SIZE: usize;

    fn decode<B: ByteOrder>(buf: &[u8]) -> Self;

    fn encode<B: ByteOrder>(self, buf: &mut [u8]);

    /// Render the value for diagnostics (hex for integers)
    fn describe(self) -> String;
}

impl Primitive for u8 {
    const SIZE: usize = 1;

    fn decode<B: ByteOrder>(buf: &[u8]) -> Self {
        buf[0]
    }

    fn encode<B: ByteOrder>(self, buf: &mut [u8]) {
        buf[0] = self;
    }

    fn describe(self) -> String {
        format!("{:#04x}", self)
    }
}

impl Primitive for i8 {
    const SIZE: usize = 1;

    fn decode<B: ByteOrder>(buf: &[u8]) -> Self {
        buf[0] as i8
    }

    fn encode<B: ByteOrder>(self, buf: &mut [u8]) {
        buf[0] = self as u8;
    }

    fn describe(self) -> String {
        format!("{:#04x}", self)
    }
}

macro_rules! impl_integer {
    ($($ty:ty => $size:expr, $read:ident, $write:ident;)*) => {
        $(
            impl Primitive for $ty {
                const SIZE: usize = $size;

                fn decode<B: ByteOrder>(buf: &[u8]) -> Self {
                    B::$read(buf)
                }

                fn encode<B: ByteOrder>(self, buf: &mut [u8]) {
                    B::$write(buf, self)
                }

                fn describe(self) -> String {
                    format!("{:#x}", self)
                }
            }
        )*
    };
}

impl_integer! {
    u16 => 2, read_u16, write_u16;
    i16 => 2, read_i16, write_i16;
    u32 => 4, read_u32, write_u32;
    i32 => 4, read_i32, write_i32;
    u64 => 8, read_u64, write_u64;
    i64 => 8, read_i64, write_i64;
}

macro_rules! impl_float {
    ($($ty:ty => $size:expr, $read:ident, $write:ident;)*) => {
        $(
            impl Primitive for $ty {
                const SIZE: usize = $size;

                fn decode<B: ByteOrder>(buf: &[u8]) -> Self {
                    B::$read(buf)
                }

                fn encode<B: ByteOrder>(self, buf: &mut [u8]) {
                    B::$write(buf, self)
                }

                fn describe(self) -> String {
                    format!("{:?}", self)
                }
            }
        )*
    };
}

impl_float! {
    f32 => 4, read_f32, write_f32;
    f64 => 8, read_f64, write_f64;
}

/// Render a byte run for diagnostics, e.g. `"BND\0"`
pub(crate) fn describe_bytes(bytes: &[u8]) -> String {
    format!("\"{}\"", bytes.escape_ascii())
}
