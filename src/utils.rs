//! File-path helpers
//!
//! Thin wrappers that read a file into memory and hand the bytes to a
//! decoder, attaching the path to any error.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::format::{Decode, Encode};
use crate::formats::Param;
use crate::record::Row;
use crate::schema::Schema;

/// Read and decode a file
pub fn decode_file<T: Decode, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    T::from_bytes(&data).with_context(|| format!("Failed to decode {}", path.display()))
}

/// Encode a value and write it to a file
pub fn encode_file<T: Encode, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let path = path.as_ref();
    let data = value
        .to_bytes()
        .with_context(|| format!("Failed to encode {}", path.display()))?;
    fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))
}

/// Load a param file and decode every row with the schema stored in `schema_path`
pub fn load_param<P: AsRef<Path>, S: AsRef<Path>>(
    param_path: P,
    schema_path: S,
) -> Result<(Param, Vec<Row>)> {
    let param_path = param_path.as_ref();
    let schema_path = schema_path.as_ref();

    let text = fs::read_to_string(schema_path)
        .with_context(|| format!("Failed to read {}", schema_path.display()))?;
    let schema = Schema::compile(&text)
        .with_context(|| format!("Invalid schema {}", schema_path.display()))?;

    let data = fs::read(param_path)
        .with_context(|| format!("Failed to read {}", param_path.display()))?;
    let param = Param::from_bytes(&data)
        .with_context(|| format!("Failed to decode {}", param_path.display()))?;
    let rows = param
        .decode_rows(&data, &schema)
        .with_context(|| format!("Failed to decode rows of {}", param_path.display()))?;

    Ok((param, rows))
}
