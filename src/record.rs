//! Schema-driven record decoding

use std::fmt;

use tracing::trace;

use crate::cursor::{BinaryReader, TextEncoding, TextLength};
use crate::error::{Error, Result};
use crate::schema::{FieldDescriptor, FieldTag, Schema};

/// A decoded field value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Value {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Bytes(Vec<u8>),
}

impl Value {
    /// Integer value widened to `i64`; `None` for floats, text, bytes and
    /// `u64` values above `i64::MAX`
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::U8(v) => Some(v.into()),
            Value::I8(v) => Some(v.into()),
            Value::U16(v) => Some(v.into()),
            Value::I16(v) => Some(v.into()),
            Value::U32(v) => Some(v.into()),
            Value::I32(v) => Some(v.into()),
            Value::U64(v) => i64::try_from(v).ok(),
            Value::I64(v) => Some(v),
            _ => None,
        }
    }

    /// Any numeric value as `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::F32(v) => Some(v.into()),
            Value::F64(v) => Some(v),
            Value::U64(v) => Some(v as f64),
            _ => self.as_i64().map(|v| v as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::U8(v) => write!(f, "{}", v),
            Value::I8(v) => write!(f, "{}", v),
            Value::U16(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::U32(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::Str(s) => f.write_str(s),
            Value::Bytes(b) => {
                for byte in b {
                    write!(f, "{:02X}", byte)?;
                }
                Ok(())
            }
        }
    }
}

/// One named, typed value of a record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cell {
    pub tag: FieldTag,
    pub name: String,
    pub value: Value,
}

/// A decoded record: one cell per schema field, in schema order
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Row {
    pub id: i64,
    pub name: Option<String>,
    pub cells: Vec<Cell>,
}

impl Row {
    /// First cell with the given name
    pub fn cell(&self, name: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.cell(name).map(|c| &c.value)
    }
}

/// Decode one record at `base_offset` using `schema`.
///
/// The reader's position and saved-position stack are the same after the
/// call as before it, whether decoding succeeds or fails.
pub fn decode_record(
    reader: &mut BinaryReader<'_>,
    base_offset: usize,
    schema: &Schema,
) -> Result<Vec<Cell>> {
    reader.with_offset(base_offset, |r| {
        let mut cells = Vec::with_capacity(schema.len());
        for field in schema {
            cells.push(decode_cell(r, field)?);
        }
        Ok(cells)
    })
}

fn decode_cell(reader: &mut BinaryReader<'_>, field: &FieldDescriptor) -> Result<Cell> {
    let offset = reader.position();
    let value = decode_value(reader, &field.tag)?;
    trace!(offset, tag = %field.tag, name = %field.name, "decoded cell");
    Ok(Cell {
        tag: field.tag.clone(),
        name: field.name.clone(),
        value,
    })
}

fn decode_value(reader: &mut BinaryReader<'_>, tag: &FieldTag) -> Result<Value> {
    Ok(match tag {
        FieldTag::U8 => Value::U8(reader.read()?),
        FieldTag::S8 => Value::I8(reader.read()?),
        FieldTag::U16 => Value::U16(reader.read()?),
        FieldTag::S16 => Value::I16(reader.read()?),
        FieldTag::U32 => Value::U32(reader.read()?),
        FieldTag::S32 => Value::I32(reader.read()?),
        FieldTag::U64 => Value::U64(reader.read()?),
        FieldTag::S64 => Value::I64(reader.read()?),
        FieldTag::F32 => Value::F32(reader.read()?),
        FieldTag::F64 => Value::F64(reader.read()?),
        FieldTag::FixStr(n) => {
            Value::Str(reader.read_text(TextEncoding::ShiftJis, TextLength::Fixed(*n))?)
        }
        FieldTag::FixStrW(n) => {
            Value::Str(reader.read_text(TextEncoding::Utf16Le, TextLength::Fixed(*n))?)
        }
        FieldTag::Dummy8(n) => Value::Bytes(reader.read_bytes(*n)?.to_vec()),
        FieldTag::Unknown(tag) => {
            return Err(Error::UnsupportedFieldType { tag: tag.clone() });
        }
    })
}
