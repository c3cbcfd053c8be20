//! Param tables
//!
//! A param file is a table of rows whose cell layout is not stored in the
//! file. The header gives the row count and, per row, an id, the absolute
//! offset of the row's data and the offset of its name. Cell values are
//! decoded on demand by applying an externally supplied [`Schema`] at each
//! row's data offset.
//!
//! ## Header layout (little-endian)
//!
//! | Offset | Type   | Field                                  |
//! |--------|--------|----------------------------------------|
//! | 0x00   | i32    | type name offset                       |
//! | 0x04   | i16    | unknown                                |
//! | 0x06   | i16    | unknown                                |
//! | 0x08   | u16    | row count                              |
//! | 0x0A   | u16    | `0`                                    |
//! | 0x0C   | i32    | `0`                                    |
//! | 0x10   | i32    | type name offset again                 |
//! | 0x14   | 6×i32  | `0`                                    |
//! | 0x2C   | i32    | `0x00078500`                           |
//! | 0x30   | i64    | data section start                     |
//! | 0x38   | 2×i32  | `0`                                    |
//! | 0x40   |        | row headers: i64 id, i64 data offset, i64 name offset |
//!
//! The type name is NUL-terminated ASCII; row names are NUL-terminated
//! Shift-JIS, and a name offset of `0` means the row is unnamed.
//!
//! Writing param files is not supported.

use tracing::{debug, trace};

use crate::cursor::{BinaryReader, BinaryWriter, TextEncoding, TextLength};
use crate::error::{Error, Result};
use crate::format::{Decode, Encode};
use crate::record::{decode_record, Row};
use crate::schema::Schema;

const FORMAT_CONSTANT: i32 = 0x0007_8500;

/// Header entry of one param row
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParamRow {
    /// Row id; ids are not guaranteed to be unique within a table
    pub id: i64,
    /// Absolute offset of the row's cell data
    pub data_offset: usize,
    pub name: Option<String>,
}

impl ParamRow {
    pub const RECORD_SIZE: usize = 24;

    /// Decode this row's cells from the param file bytes
    pub fn decode_cells(&self, data: &[u8], schema: &Schema) -> Result<Row> {
        let mut reader = BinaryReader::new(data);
        self.decode_with(&mut reader, schema)
    }

    fn decode_with(&self, reader: &mut BinaryReader<'_>, schema: &Schema) -> Result<Row> {
        trace!(id = self.id, offset = self.data_offset, "decoding param row");
        Ok(Row {
            id: self.id,
            name: self.name.clone(),
            cells: decode_record(reader, self.data_offset, schema)?,
        })
    }
}

/// A decoded param table header and row index
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Param {
    /// Type name identifying the row layout, e.g. `EQUIP_PARAM_WEAPON_ST`
    pub param_type: String,
    pub unknown1: i16,
    pub unknown2: i16,
    pub data_start: i64,
    pub rows: Vec<ParamRow>,
}

impl Param {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows carrying `id`, in file order
    pub fn rows_by_id(&self, id: i64) -> impl Iterator<Item = &ParamRow> {
        self.rows.iter().filter(move |r| r.id == id)
    }

    /// Decode the cells of every row with `schema`
    pub fn decode_rows(&self, data: &[u8], schema: &Schema) -> Result<Vec<Row>> {
        let mut reader = BinaryReader::new(data);
        self.rows
            .iter()
            .map(|row| row.decode_with(&mut reader, schema))
            .collect()
    }

    /// Decode the cells of the row at `index`, `None` if there is no such row
    pub fn decode_row(&self, data: &[u8], index: usize, schema: &Schema) -> Result<Option<Row>> {
        self.rows
            .get(index)
            .map(|row| row.decode_cells(data, schema))
            .transpose()
    }
}

/// Convert a stored signed offset read from the header field at `field_offset`
fn to_offset(value: i64, field_offset: usize) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::FormatValidation {
        offset: field_offset,
        expected: "non-negative offset".to_string(),
        actual: value.to_string(),
    })
}

impl Decode for Param {
    fn decode(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let name_offset = reader.read_i32()?;
        let unknown1 = reader.read_i16()?;
        let unknown2 = reader.read_i16()?;
        let row_count = reader.read_u16()?;
        reader.assert_u16(0)?;
        reader.assert_i32(0)?;
        reader.assert_i32(name_offset)?;
        reader.assert_zero_region(24)?;
        reader.assert_i32(FORMAT_CONSTANT)?;
        let data_start = reader.read_i64()?;
        reader.assert_i32(0)?;
        reader.assert_i32(0)?;

        debug!(row_count, name_offset, data_start, "decoding param");

        reader.ensure_records(row_count.into(), ParamRow::RECORD_SIZE)?;
        let mut rows = Vec::with_capacity(row_count.into());
        for _ in 0..row_count {
            let id = reader.read_i64()?;
            let field = reader.position();
            let data_offset = to_offset(reader.read_i64()?, field)?;
            let field = reader.position();
            let name = match reader.read_i64()? {
                0 => None,
                offset => Some(reader.with_offset(to_offset(offset, field)?, |r| {
                    r.read_text(TextEncoding::ShiftJis, TextLength::NullTerminated)
                })?),
            };
            rows.push(ParamRow {
                id,
                data_offset,
                name,
            });
        }

        let param_type = reader.with_offset(to_offset(name_offset.into(), 0)?, |r| {
            r.read_text(TextEncoding::Ascii, TextLength::NullTerminated)
        })?;

        debug!(param_type = %param_type, rows = rows.len(), "decoded param");

        Ok(Param {
            param_type,
            unknown1,
            unknown2,
            data_start,
            rows,
        })
    }
}

impl Encode for Param {
    fn encode(&self, _writer: &mut BinaryWriter) -> Result<()> {
        Err(Error::NotImplemented("param encoding"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;

    struct TestRow<'a> {
        id: i64,
        name: Option<&'a [u8]>,
        data: &'a [u8],
    }

    /// Build a param file: header, row headers, row data, then strings
    fn build(param_type: &str, rows: &[TestRow<'_>]) -> Vec<u8> {
        let header_end = 0x40 + rows.len() * ParamRow::RECORD_SIZE;
        let data_size: usize = rows.iter().map(|r| r.data.len()).sum();
        let mut strings_offset = header_end + data_size;
        let type_offset = strings_offset;
        strings_offset += param_type.len() + 1;

        let mut writer = BinaryWriter::new();
        writer.write_i32(type_offset as i32);
        writer.write_i16(3);
        writer.write_i16(-2);
        writer.write_u16(rows.len() as u16);
        writer.write_u16(0);
        writer.write_i32(0);
        writer.write_i32(type_offset as i32);
        writer.write_zeros(24);
        writer.write_i32(FORMAT_CONSTANT);
        writer.write_i64(header_end as i64);
        writer.write_zeros(8);

        let mut data_offset = header_end;
        let mut name_offset = strings_offset;
        for row in rows {
            writer.write_i64(row.id);
            writer.write_i64(data_offset as i64);
            match row.name {
                Some(name) => {
                    writer.write_i64(name_offset as i64);
                    name_offset += name.len() + 1;
                }
                None => writer.write_i64(0),
            }
            data_offset += row.data.len();
        }
        for row in rows {
            writer.write_bytes(row.data);
        }
        writer.write_bytes(param_type.as_bytes());
        writer.write_u8(0);
        for name in rows.iter().filter_map(|r| r.name) {
            writer.write_bytes(name);
            writer.write_u8(0);
        }
        writer.into_inner()
    }

    fn sample() -> Vec<u8> {
        build(
            "NPC_PARAM_ST",
            &[
                TestRow {
                    id: 1000,
                    // "あ" in Shift-JIS
                    name: Some(&[0x82, 0xA0]),
                    data: &[50, 10],
                },
                TestRow {
                    id: 1001,
                    name: None,
                    data: &[80, 0],
                },
                TestRow {
                    id: 1000,
                    name: Some(b"Knight"),
                    data: &[255, 7],
                },
            ],
        )
    }

    #[test]
    fn test_decode_header() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let data = sample();
        let param = Param::from_bytes(&data).unwrap();
        assert_eq!(param.param_type, "NPC_PARAM_ST");
        assert_eq!(param.unknown1, 3);
        assert_eq!(param.unknown2, -2);
        assert_eq!(param.data_start, 0x40 + 3 * 24);
        assert_eq!(param.len(), 3);
        assert_eq!(param.rows[0].name.as_deref(), Some("あ"));
        assert_eq!(param.rows[1].name, None);
        assert_eq!(param.rows[2].name.as_deref(), Some("Knight"));
        assert_eq!(param.rows[1].data_offset, 0x40 + 3 * 24 + 2);
    }

    #[test]
    fn test_decode_rows_with_schema() {
        let data = sample();
        let param = Param::from_bytes(&data).unwrap();
        let schema = Schema::compile("u8 HP\nu8 MP\n\n").unwrap();

        let rows = param.decode_rows(&data, &schema).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].id, 1000);
        assert_eq!(rows[0].get("HP"), Some(&Value::U8(50)));
        assert_eq!(rows[0].get("MP"), Some(&Value::U8(10)));
        assert_eq!(rows[2].get("HP"), Some(&Value::U8(255)));
        assert_eq!(rows[2].name.as_deref(), Some("Knight"));

        let row = param.decode_row(&data, 1, &schema).unwrap().unwrap();
        assert_eq!(row.get("HP"), Some(&Value::U8(80)));
        assert!(param.decode_row(&data, 3, &schema).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_ids() {
        let data = sample();
        let param = Param::from_bytes(&data).unwrap();
        let matches: Vec<_> = param.rows_by_id(1000).collect();
        assert_eq!(matches.len(), 2);
        assert_eq!(param.rows_by_id(5).count(), 0);
    }

    #[test]
    fn test_unsupported_field_in_schema() {
        let data = sample();
        let param = Param::from_bytes(&data).unwrap();
        let schema = Schema::compile("u8 HP\nangle Facing").unwrap();
        assert!(matches!(
            param.decode_rows(&data, &schema),
            Err(Error::UnsupportedFieldType { .. })
        ));
    }

    #[test]
    fn test_bad_format_constant() {
        let mut data = sample();
        data[0x2C] = 0x01;
        assert!(matches!(
            Param::from_bytes(&data),
            Err(Error::FormatValidation { offset: 0x2C, .. })
        ));
    }

    #[test]
    fn test_mismatched_name_offset_copy() {
        let mut data = sample();
        data[0x10] = data[0x10].wrapping_add(1);
        assert!(matches!(
            Param::from_bytes(&data),
            Err(Error::FormatValidation { offset: 0x10, .. })
        ));
    }

    #[test]
    fn test_negative_row_offset() {
        let mut data = sample();
        data[0x48..0x50].copy_from_slice(&(-1i64).to_le_bytes());
        match Param::from_bytes(&data) {
            Err(Error::FormatValidation { offset, actual, .. }) => {
                assert_eq!(offset, 0x48);
                assert_eq!(actual, "-1");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_negative_name_offset() {
        let mut data = sample();
        // Name offset of the third row header
        let field = 0x40 + 2 * ParamRow::RECORD_SIZE + 16;
        data[field..field + 8].copy_from_slice(&(-8i64).to_le_bytes());
        assert!(matches!(
            Param::from_bytes(&data),
            Err(Error::FormatValidation { offset, .. }) if offset == field
        ));
    }

    #[test]
    fn test_row_table_truncated() {
        let data = sample();
        assert!(matches!(
            Param::from_bytes(&data[..0x40 + ParamRow::RECORD_SIZE]),
            Err(Error::OutOfBounds { offset: 0x40, size: 72, .. })
        ));
    }

    #[test]
    fn test_encode_not_implemented() {
        let data = sample();
        let param = Param::from_bytes(&data).unwrap();
        assert!(matches!(
            param.to_bytes(),
            Err(Error::NotImplemented(_))
        ));
    }
}
