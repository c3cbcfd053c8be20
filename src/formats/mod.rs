//! Concrete format adapters
//!
//! Each adapter is a linear sequence of assertions and reads over a
//! [`BinaryReader`](crate::BinaryReader):
//!
//! - [`binder`]: `BND\0` container of id-tagged payloads
//! - [`edge`]: physics mesh edge list, fully round-trippable
//! - [`dds`]: DDS texture header with optional DX10 extension
//! - [`param`]: param table whose row layout comes from a [`Schema`](crate::Schema)

pub mod binder;
pub mod dds;
pub mod edge;
pub mod param;

pub use binder::{Binder, BinderEntry};
pub use dds::{DdsHeader, Dx10Header, FourCC, PixelFormat};
pub use edge::{Edge, EdgeList};
pub use param::{Param, ParamRow};
