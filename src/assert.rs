//! Assertion layer
//!
//! Each `assert_*` reads one value and compares it to an expected literal.
//! A run of these at the start of a structure is the format's signature
//! check, done field by field so a failure names the exact offset that
//! diverged. On mismatch the reader is rewound to the start of the field.

use crate::cursor::BinaryReader;
use crate::error::{Error, Result};
use crate::primitive::{describe_bytes, Primitive};

impl<'a> BinaryReader<'a> {
    /// Read a `T` and fail with [`Error::FormatValidation`] unless it equals `expected`
    pub fn assert_value<T: Primitive>(&mut self, expected: T) -> Result<()> {
        let offset = self.position();
        let actual = self.read::<T>()?;
        if actual != expected {
            self.seek(offset)?;
            return Err(Error::FormatValidation {
                offset,
                expected: expected.describe(),
                actual: actual.describe(),
            });
        }
        Ok(())
    }

    pub fn assert_u8(&mut self, expected: u8) -> Result<()> {
        self.assert_value(expected)
    }

    pub fn assert_i8(&mut self, expected: i8) -> Result<()> {
        self.assert_value(expected)
    }

    pub fn assert_u16(&mut self, expected: u16) -> Result<()> {
        self.assert_value(expected)
    }

    pub fn assert_i16(&mut self, expected: i16) -> Result<()> {
        self.assert_value(expected)
    }

    pub fn assert_u32(&mut self, expected: u32) -> Result<()> {
        self.assert_value(expected)
    }

    pub fn assert_i32(&mut self, expected: i32) -> Result<()> {
        self.assert_value(expected)
    }

    pub fn assert_u64(&mut self, expected: u64) -> Result<()> {
        self.assert_value(expected)
    }

    pub fn assert_i64(&mut self, expected: i64) -> Result<()> {
        self.assert_value(expected)
    }

    pub fn assert_f32(&mut self, expected: f32) -> Result<()> {
        self.assert_value(expected)
    }

    /// Compare a raw byte run, e.g. a magic signature
    pub fn assert_bytes(&mut self, expected: &[u8]) -> Result<()> {
        let offset = self.position();
        let actual = self.read_bytes(expected.len())?;
        if actual != expected {
            self.seek(offset)?;
            return Err(Error::FormatValidation {
                offset,
                expected: describe_bytes(expected),
                actual: describe_bytes(actual),
            });
        }
        Ok(())
    }

    pub fn assert_ascii(&mut self, expected: &str) -> Result<()> {
        self.assert_bytes(expected.as_bytes())
    }

    /// Check that the next `len` bytes are all zero
    pub fn assert_zero_region(&mut self, len: usize) -> Result<()> {
        let start = self.position();
        let region = self.read_bytes(len)?;
        if let Some(index) = region.iter().position(|&b| b != 0) {
            let offset = start + index;
            let actual = region[index];
            self.seek(start)?;
            return Err(Error::FormatValidation {
                offset,
                expected: 0u8.describe(),
                actual: actual.describe(),
            });
        }
        Ok(())
    }
}
