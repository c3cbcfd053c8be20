//! Error types for gamebin

use thiserror::Error;

/// Main error type for gamebin operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An asserted constant did not match what was on disk
    #[error("Format validation failed at offset {offset:#x}: expected {expected}, found {actual}")]
    FormatValidation {
        offset: usize,
        expected: String,
        actual: String,
    },

    /// A read or absolute fetch ran past the end of the buffer
    #[error("Out of bounds: {size} bytes at offset {offset:#x} exceeds buffer length {len}")]
    OutOfBounds { offset: usize, size: usize, len: usize },

    /// `step_out` was called without a matching `step_in`
    #[error("Cursor stack imbalance: step_out with no saved position")]
    StackImbalance,

    /// A decode finished with saved positions still on the stack
    #[error("Cursor left {depth} saved position(s) on the stack after decode")]
    UnbalancedCursor { depth: usize },

    #[error("Schema parse error on line {line}: {content:?} has no field name")]
    SchemaParse { line: usize, content: String },

    #[error("Unsupported field type: {tag}")]
    UnsupportedFieldType { tag: String },

    /// A value to be encoded does not fit its on-disk field
    #[error("Field overflow: {field} value {value} does not fit")]
    FieldOverflow { field: &'static str, value: usize },

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),
}

/// Result type alias for gamebin operations
pub type Result<T> = std::result::Result<T, Error>;
