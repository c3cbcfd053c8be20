//! # gamebin
//!
//! A Rust library for decoding (and, where supported, encoding) binary game
//! asset containers and schema-driven record tables.
//!
//! ## Overview
//!
//! The core is format-agnostic:
//!
//! - [`BinaryReader`]: a positioned cursor with `step_in` / `step_out`
//!   navigation for visiting sub-structures at absolute offsets
//! - assertion methods (`assert_i32`, `assert_bytes`, `assert_zero_region`,
//!   ...) that validate magic and reserved fields one by one
//! - [`Schema`]: compiled from a small line-oriented text language
//! - [`decode_record`]: applies a schema at an offset to produce typed cells
//!
//! The [`formats`] module builds concrete formats on top of it: binder
//! containers, edge lists, DDS headers and param tables.
//!
//! ## Example - Binder
//!
//! ```rust,no_run
//! use gamebin::{Binder, Decode};
//!
//! fn main() -> anyhow::Result<()> {
//!     let data = std::fs::read("menu.bnd")?;
//!     let binder = Binder::from_bytes(&data)?;
//!
//!     for entry in &binder.entries {
//!         println!("{}: {} bytes", entry.id, entry.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Example - Param with an external schema
//!
//! ```rust,no_run
//! use gamebin::{Decode, Param, Schema};
//!
//! fn main() -> anyhow::Result<()> {
//!     let data = std::fs::read("NpcParam.param")?;
//!     let schema = Schema::compile("u8 HP\nu8 MP\nfixstr[16] Icon")?;
//!
//!     let param = Param::from_bytes(&data)?;
//!     for row in param.decode_rows(&data, &schema)? {
//!         println!("{} {:?} HP={:?}", row.id, row.name, row.get("HP"));
//!     }
//!     Ok(())
//! }
//! ```

mod assert;
pub mod cursor;
pub mod error;
pub mod format;
pub mod formats;
pub mod primitive;
pub mod record;
pub mod schema;
pub mod utils;

pub use cursor::{BinaryReader, BinaryWriter, TextEncoding, TextLength};
pub use error::{Error, Result};
pub use format::{decode_bytes, decode_bytes_with, encode_to_vec, Decode, DecodeOptions, Encode};
pub use formats::{Binder, BinderEntry, DdsHeader, Dx10Header, Edge, EdgeList, FourCC, Param, ParamRow, PixelFormat};
pub use primitive::{Endian, Primitive};
pub use record::{decode_record, Cell, Row, Value};
pub use schema::{FieldDescriptor, FieldTag, Schema};
pub use utils::{decode_file, encode_file, load_param};
