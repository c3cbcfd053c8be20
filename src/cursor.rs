//! Positioned byte cursors
//!
//! [`BinaryReader`] is the decode side: a borrowed byte buffer, a current
//! position, an [`Endian`] flag and a stack of saved positions used by
//! [`step_in`](BinaryReader::step_in) / [`step_out`](BinaryReader::step_out)
//! to visit sub-structures at absolute offsets without losing the caller's
//! place. [`BinaryWriter`] is the append-only encode side.
//!
//! A reader is owned by exactly one decode pass. Decoding independent
//! regions in parallel means creating one reader per region over the same
//! `&[u8]`.

use encoding_rs::{SHIFT_JIS, UTF_16LE};

use crate::error::{Error, Result};
use crate::primitive::{Endian, Primitive};

/// Text encodings found in the supported formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Ascii,
    /// Japanese multi-byte encoding used for param row names
    ShiftJis,
    Utf16Le,
}

impl TextEncoding {
    /// Width of one code unit in bytes
    pub fn unit_size(self) -> usize {
        match self {
            TextEncoding::Utf16Le => 2,
            TextEncoding::Ascii | TextEncoding::ShiftJis => 1,
        }
    }

    /// Decode bytes, replacing invalid sequences
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Ascii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { char::from(b) } else { char::REPLACEMENT_CHARACTER })
                .collect(),
            TextEncoding::ShiftJis => SHIFT_JIS.decode_without_bom_handling(bytes).0.into_owned(),
            TextEncoding::Utf16Le => UTF_16LE.decode_without_bom_handling(bytes).0.into_owned(),
        }
    }

    /// Encode text without a terminator
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Ascii => text.as_bytes().to_vec(),
            TextEncoding::ShiftJis => SHIFT_JIS.encode(text).0.into_owned(),
            // encoding_rs only encodes to UTF-8 for the UTF-16 labels
            TextEncoding::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
        }
    }
}

/// How far a text read extends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextLength {
    /// Exactly this many code units; the result is cut at the first NUL
    Fixed(usize),
    /// Up to and including the next NUL code unit
    NullTerminated,
}

/// Decode cursor over a borrowed byte buffer
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
    endian: Endian,
    saved_positions: Vec<usize>,
}

impl<'a> BinaryReader<'a> {
    /// Create a little-endian reader positioned at 0
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_endian(data, Endian::Little)
    }

    pub fn with_endian(data: &'a [u8], endian: Endian) -> Self {
        Self {
            data,
            position: 0,
            endian,
            saved_positions: Vec::new(),
        }
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the current position and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Number of saved positions on the stack
    pub fn depth(&self) -> usize {
        self.saved_positions.len()
    }

    /// The whole underlying buffer
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    fn check(&self, offset: usize, size: usize) -> Result<()> {
        match offset.checked_add(size) {
            Some(end) if end <= self.data.len() => Ok(()),
            _ => Err(Error::OutOfBounds {
                offset,
                size,
                len: self.data.len(),
            }),
        }
    }

    /// Move to an absolute offset
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        self.check(offset, 0)?;
        self.position = offset;
        Ok(())
    }

    /// Advance past `n` bytes without reading them
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.check(self.position, n)?;
        self.position += n;
        Ok(())
    }

    /// Read one fixed-width value honoring the endianness flag
    pub fn read<T: Primitive>(&mut self) -> Result<T> {
        self.check(self.position, T::SIZE)?;
        let value = self.endian.decode::<T>(&self.data[self.position..]);
        self.position += T::SIZE;
        Ok(value)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.read()
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.read()
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.read()
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.read()
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.read()
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.read()
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.read()
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.read()
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.read()
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.read()
    }

    /// Read an `i32` element count, rejecting negative values
    pub fn read_count(&mut self) -> Result<usize> {
        let offset = self.position;
        let count = self.read_i32()?;
        match usize::try_from(count) {
            Ok(count) => Ok(count),
            Err(_) => {
                self.position = offset;
                Err(Error::FormatValidation {
                    offset,
                    expected: "non-negative count".to_string(),
                    actual: count.to_string(),
                })
            }
        }
    }

    /// Fail unless `count` records of `record_size` bytes fit between the
    /// current position and the end of the buffer
    pub fn ensure_records(&self, count: usize, record_size: usize) -> Result<()> {
        let size = count.checked_mul(record_size).unwrap_or(usize::MAX);
        self.check(self.position, size)
    }

    /// Read `n` bytes, borrowing them from the buffer
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.check(self.position, n)?;
        let bytes = &self.data[self.position..self.position + n];
        self.position += n;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read a four-character code
    pub fn read_fourcc(&mut self) -> Result<[u8; 4]> {
        self.read_array()
    }

    /// Read text of a fixed or NUL-terminated length
    pub fn read_text(&mut self, encoding: TextEncoding, length: TextLength) -> Result<String> {
        let unit = encoding.unit_size();
        match length {
            TextLength::Fixed(count) => {
                let size = count.checked_mul(unit).ok_or(Error::OutOfBounds {
                    offset: self.position,
                    size: usize::MAX,
                    len: self.data.len(),
                })?;
                let bytes = self.read_bytes(size)?;
                let end = bytes
                    .chunks_exact(unit)
                    .position(|c| c.iter().all(|&b| b == 0))
                    .map(|p| p * unit)
                    .unwrap_or(bytes.len());
                Ok(encoding.decode(&bytes[..end]))
            }
            TextLength::NullTerminated => {
                let start = self.position;
                let terminator = self.data[start..]
                    .chunks_exact(unit)
                    .position(|c| c.iter().all(|&b| b == 0))
                    .ok_or(Error::OutOfBounds {
                        offset: start,
                        size: self.remaining() + unit,
                        len: self.data.len(),
                    })?;
                let end = start + terminator * unit;
                self.position = end + unit;
                Ok(encoding.decode(&self.data[start..end]))
            }
        }
    }

    /// Copy `size` bytes from an absolute offset; the position is untouched
    pub fn get_bytes(&self, offset: usize, size: usize) -> Result<Vec<u8>> {
        self.check(offset, size)?;
        Ok(self.data[offset..offset + size].to_vec())
    }

    /// Save the current position and jump to `offset`
    pub fn step_in(&mut self, offset: usize) -> Result<()> {
        self.check(offset, 0)?;
        self.saved_positions.push(self.position);
        self.position = offset;
        Ok(())
    }

    /// Return to the position saved by the matching [`step_in`](Self::step_in)
    pub fn step_out(&mut self) -> Result<()> {
        self.position = self.saved_positions.pop().ok_or(Error::StackImbalance)?;
        Ok(())
    }

    /// Run `f` at `offset`, restoring the position afterwards even if `f` fails
    pub fn with_offset<T, F>(&mut self, offset: usize, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        self.step_in(offset)?;
        let result = f(self);
        let restored = self.step_out();
        let value = result?;
        restored?;
        Ok(value)
    }
}

/// Append-only encode cursor
#[derive(Debug, Clone, Default)]
pub struct BinaryWriter {
    data: Vec<u8>,
    endian: Endian,
}

impl BinaryWriter {
    /// Create an empty little-endian writer
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endian(endian: Endian) -> Self {
        Self {
            data: Vec::new(),
            endian,
        }
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Bytes written so far
    pub fn position(&self) -> usize {
        self.data.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    pub fn write<T: Primitive>(&mut self, value: T) {
        let start = self.data.len();
        self.data.resize(start + T::SIZE, 0);
        self.endian.encode(value, &mut self.data[start..]);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.write(value)
    }

    pub fn write_i8(&mut self, value: i8) {
        self.write(value)
    }

    pub fn write_u16(&mut self, value: u16) {
        self.write(value)
    }

    pub fn write_i16(&mut self, value: i16) {
        self.write(value)
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write(value)
    }

    pub fn write_i32(&mut self, value: i32) {
        self.write(value)
    }

    pub fn write_u64(&mut self, value: u64) {
        self.write(value)
    }

    pub fn write_i64(&mut self, value: i64) {
        self.write(value)
    }

    pub fn write_f32(&mut self, value: f32) {
        self.write(value)
    }

    pub fn write_f64(&mut self, value: f64) {
        self.write(value)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Write `n` zero bytes (reserved or padding regions)
    pub fn write_zeros(&mut self, n: usize) {
        self.data.resize(self.data.len() + n, 0);
    }
}
