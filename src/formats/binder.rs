//! Binder (`BND\0`) container
//!
//! ## Layout
//!
//! - 40-byte header: magic `BND\0`, `0xF7FF`, `0xD3`, an opaque `i32`, the
//!   entry count, `0`, `0x30800`, then three zero `i32`s
//! - `entry_count` table entries of 12 bytes: absolute payload offset,
//!   payload size, entry id
//! - payloads, fetched by absolute offset

use tracing::{debug, trace};

use crate::cursor::{BinaryReader, BinaryWriter};
use crate::error::Result;
use crate::format::{to_field, Decode, Encode};

/// Binder magic: `BND\0`
pub const MAGIC: &[u8; 4] = b"BND\0";

const HEADER_SIZE: usize = 40;

/// One file stored in a binder
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BinderEntry {
    pub id: i32,
    /// Payload bytes, owned by the entry
    pub data: Vec<u8>,
}

impl BinderEntry {
    pub const RECORD_SIZE: usize = 12;

    pub fn new(id: i32, data: Vec<u8>) -> Self {
        Self { id, data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A decoded binder container
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Binder {
    /// Header field at 0x0C with no known meaning, kept for re-encoding
    pub unknown: i32,
    pub entries: Vec<BinderEntry>,
}

impl Binder {
    /// Check if data starts with the binder magic
    pub fn is_binder(data: &[u8]) -> bool {
        data.starts_with(MAGIC)
    }

    /// First entry with the given id
    pub fn entry(&self, id: i32) -> Option<&BinderEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Decode for Binder {
    fn decode(reader: &mut BinaryReader<'_>) -> Result<Self> {
        reader.assert_bytes(MAGIC)?;
        reader.assert_i32(0xF7FF)?;
        reader.assert_i32(0xD3)?;
        let unknown = reader.read_i32()?;
        let entry_count = reader.read_count()?;
        reader.assert_i32(0)?;
        reader.assert_i32(0x30800)?;
        reader.assert_i32(0)?;
        reader.assert_i32(0)?;
        reader.assert_i32(0)?;

        debug!(entry_count, unknown, "decoding binder");

        reader.ensure_records(entry_count, BinderEntry::RECORD_SIZE)?;
        let mut entries = Vec::with_capacity(entry_count);
        for _ in 0..entry_count {
            let offset = reader.read_u32()? as usize;
            let size = reader.read_u32()? as usize;
            let id = reader.read_i32()?;
            trace!(id, offset, size, "binder entry");
            entries.push(BinderEntry {
                id,
                data: reader.get_bytes(offset, size)?,
            });
        }

        Ok(Binder { unknown, entries })
    }
}

impl Encode for Binder {
    fn encode(&self, writer: &mut BinaryWriter) -> Result<()> {
        let base = writer.position();
        let entry_count: i32 = to_field("entry count", self.entries.len())?;

        // Payloads follow the entry table back to back
        let mut offset = base + HEADER_SIZE + self.entries.len() * BinderEntry::RECORD_SIZE;
        let mut table = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let payload_offset: u32 = to_field("payload offset", offset)?;
            let size: u32 = to_field("payload size", entry.data.len())?;
            table.push((payload_offset, size, entry.id));
            offset += entry.data.len();
        }

        writer.write_bytes(MAGIC);
        writer.write_i32(0xF7FF);
        writer.write_i32(0xD3);
        writer.write_i32(self.unknown);
        writer.write_i32(entry_count);
        writer.write_i32(0);
        writer.write_i32(0x30800);
        writer.write_zeros(12);

        for (payload_offset, size, id) in table {
            writer.write_u32(payload_offset);
            writer.write_u32(size);
            writer.write_i32(id);
        }

        for entry in &self.entries {
            writer.write_bytes(&entry.data);
        }

        debug!(entry_count = self.entries.len(), size = writer.position() - base, "encoded binder");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn header(entry_count: i32) -> Vec<u8> {
        let mut data = MAGIC.to_vec();
        for v in [0xF7FF, 0xD3, 0, entry_count, 0, 0x30800, 0, 0, 0] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        data
    }

    #[test]
    fn test_decode_single_entry() {
        let mut data = header(1);
        assert_eq!(data.len(), HEADER_SIZE);
        for v in [52i32, 4, 7] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        data.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);

        let binder = Binder::from_bytes(&data).unwrap();
        assert_eq!(binder.len(), 1);
        assert_eq!(binder.entries[0].id, 7);
        assert_eq!(binder.entries[0].data, vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(binder.entry(7).map(BinderEntry::len), Some(4));
    }

    #[test]
    fn test_payload_offset_is_absolute() {
        // Payload offset 44 lands inside the entry table itself
        let mut data = header(1);
        for v in [44i32, 4, 7] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        data.extend_from_slice(&[1, 2, 3, 4]);

        let binder = Binder::from_bytes(&data).unwrap();
        assert_eq!(binder.entries[0].id, 7);
        assert_eq!(binder.entries[0].data, data[44..48].to_vec());
    }

    #[test]
    fn test_wrong_magic() {
        let mut data = header(0);
        data[2] = b'E';
        match Binder::from_bytes(&data) {
            Err(Error::FormatValidation { offset, .. }) => assert_eq!(offset, 0),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_constant() {
        let mut data = header(0);
        data[24] = 0x01;
        match Binder::from_bytes(&data) {
            Err(Error::FormatValidation { offset, expected, actual }) => {
                assert_eq!(offset, 24);
                assert_eq!(expected, "0x30800");
                assert_eq!(actual, "0x30801");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_huge_entry_count() {
        let data = header(i32::MAX);
        assert!(matches!(
            Binder::from_bytes(&data),
            Err(Error::OutOfBounds { offset: HEADER_SIZE, .. })
        ));
    }

    #[test]
    fn test_entry_table_truncated() {
        let mut data = header(2);
        for v in [64i32, 0, 1] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        assert!(matches!(
            Binder::from_bytes(&data),
            Err(Error::OutOfBounds { offset: HEADER_SIZE, size: 24, .. })
        ));
    }

    #[test]
    fn test_negative_entry_count() {
        let data = header(-1);
        match Binder::from_bytes(&data) {
            Err(Error::FormatValidation { offset, actual, .. }) => {
                assert_eq!(offset, 0x10);
                assert_eq!(actual, "-1");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_payload_out_of_bounds() {
        let mut data = header(1);
        for v in [52i32, 100, 1] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        assert!(matches!(
            Binder::from_bytes(&data),
            Err(Error::OutOfBounds { offset: 52, size: 100, .. })
        ));
    }

    #[test]
    fn test_encode_round_trip() {
        let binder = Binder {
            unknown: 0x1234,
            entries: vec![
                BinderEntry::new(1, b"first".to_vec()),
                BinderEntry::new(2, Vec::new()),
                BinderEntry::new(30, vec![0xFF; 9]),
            ],
        };
        let bytes = binder.to_bytes().unwrap();
        assert!(Binder::is_binder(&bytes));
        assert_eq!(bytes.len(), HEADER_SIZE + 3 * BinderEntry::RECORD_SIZE + 5 + 9);

        let decoded = Binder::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, binder);
        assert_eq!(decoded.to_bytes().unwrap(), bytes);
    }
}
