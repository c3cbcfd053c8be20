//! Textual record schemas
//!
//! A schema is a newline-separated list of `<type> <name>` lines:
//!
//! ```text
//! u8 HP
//! s16 Attack Power
//! fixstr[16] Icon Name
//! ```
//!
//! The first whitespace-delimited token is the type tag, the rest of the
//! line (trimmed) is the field name. Blank lines and lines starting with `#`
//! are skipped. Tags are not checked here; an unknown tag compiles to
//! [`FieldTag::Unknown`] and is rejected by
//! [`decode_record`](crate::record::decode_record).

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Type tag of a schema field
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldTag {
    U8,
    S8,
    U16,
    S16,
    U32,
    S32,
    U64,
    S64,
    F32,
    F64,
    /// Fixed-length Shift-JIS string of N bytes
    FixStr(usize),
    /// Fixed-length UTF-16LE string of N code units
    FixStrW(usize),
    /// N opaque bytes
    Dummy8(usize),
    Unknown(String),
}

impl FieldTag {
    /// Size of the field on disk, `None` for unknown tags
    pub fn byte_size(&self) -> Option<usize> {
        match self {
            FieldTag::U8 | FieldTag::S8 => Some(1),
            FieldTag::U16 | FieldTag::S16 => Some(2),
            FieldTag::U32 | FieldTag::S32 | FieldTag::F32 => Some(4),
            FieldTag::U64 | FieldTag::S64 | FieldTag::F64 => Some(8),
            FieldTag::FixStr(n) | FieldTag::Dummy8(n) => Some(*n),
            FieldTag::FixStrW(n) => n.checked_mul(2),
            FieldTag::Unknown(_) => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FieldTag::Unknown(_))
    }

    fn parse_sized(tag: &str) -> Option<FieldTag> {
        let (base, rest) = tag.split_once('[')?;
        let count = rest.strip_suffix(']')?.parse::<usize>().ok()?;
        match base {
            "fixstr" => Some(FieldTag::FixStr(count)),
            "fixstrW" => Some(FieldTag::FixStrW(count)),
            "dummy8" => Some(FieldTag::Dummy8(count)),
            _ => None,
        }
    }
}

impl From<&str> for FieldTag {
    fn from(tag: &str) -> Self {
        match tag {
            "u8" => FieldTag::U8,
            "s8" | "i8" => FieldTag::S8,
            "u16" => FieldTag::U16,
            "s16" | "i16" => FieldTag::S16,
            "u32" => FieldTag::U32,
            "s32" | "i32" => FieldTag::S32,
            "u64" => FieldTag::U64,
            "s64" | "i64" => FieldTag::S64,
            "f32" => FieldTag::F32,
            "f64" => FieldTag::F64,
            other => {
                FieldTag::parse_sized(other).unwrap_or_else(|| FieldTag::Unknown(other.to_string()))
            }
        }
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldTag::U8 => f.write_str("u8"),
            FieldTag::S8 => f.write_str("s8"),
            FieldTag::U16 => f.write_str("u16"),
            FieldTag::S16 => f.write_str("s16"),
            FieldTag::U32 => f.write_str("u32"),
            FieldTag::S32 => f.write_str("s32"),
            FieldTag::U64 => f.write_str("u64"),
            FieldTag::S64 => f.write_str("s64"),
            FieldTag::F32 => f.write_str("f32"),
            FieldTag::F64 => f.write_str("f64"),
            FieldTag::FixStr(n) => write!(f, "fixstr[{}]", n),
            FieldTag::FixStrW(n) => write!(f, "fixstrW[{}]", n),
            FieldTag::Dummy8(n) => write!(f, "dummy8[{}]", n),
            FieldTag::Unknown(tag) => f.write_str(tag),
        }
    }
}

/// One `(type, name)` pair of a schema
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldDescriptor {
    pub tag: FieldTag,
    pub name: String,
}

impl FieldDescriptor {
    pub fn new(tag: impl Into<FieldTag>, name: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            name: name.into(),
        }
    }
}

/// Ordered field list describing one record layout
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    /// Compile schema text into an ordered field list
    pub fn compile(text: &str) -> Result<Self> {
        let mut fields = Vec::new();

        for (index, physical) in text.split('\n').enumerate() {
            for segment in physical.split('\r') {
                let line = segment.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                let (tag, name) =
                    line.split_once(char::is_whitespace)
                        .ok_or_else(|| Error::SchemaParse {
                            line: index + 1,
                            content: line.to_string(),
                        })?;

                fields.push(FieldDescriptor::new(tag, name.trim()));
            }
        }

        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First field with the given name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Total record size in bytes, `None` if any tag is unknown
    pub fn byte_size(&self) -> Option<usize> {
        self.fields
            .iter()
            .try_fold(0usize, |acc, f| acc.checked_add(f.tag.byte_size()?))
    }
}

impl FromStr for Schema {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Schema::compile(s)
    }
}

impl<'s> IntoIterator for &'s Schema {
    type Item = &'s FieldDescriptor;
    type IntoIter = std::slice::Iter<'s, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_basic() {
        let schema = Schema::compile("u8 HP\nu8 MP\n\n").unwrap();
        assert_eq!(
            schema.fields(),
            &[
                FieldDescriptor::new(FieldTag::U8, "HP"),
                FieldDescriptor::new(FieldTag::U8, "MP"),
            ]
        );
    }

    #[test]
    fn test_compile_name_with_spaces_and_crlf() {
        let schema = Schema::compile("  s16   Attack Power  \r\n\r\n\tf32\tWeight\r\n").unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.fields()[0].tag, FieldTag::S16);
        assert_eq!(schema.fields()[0].name, "Attack Power");
        assert_eq!(schema.fields()[1].tag, FieldTag::F32);
        assert_eq!(schema.fields()[1].name, "Weight");
    }

    #[test]
    fn test_compile_missing_name() {
        let err = Schema::compile("u8 HP\n\nu8\n").unwrap_err();
        match err {
            Error::SchemaParse { line, content } => {
                assert_eq!(line, 3);
                assert_eq!(content, "u8");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_compile_keeps_unknown_tags() {
        let schema: Schema = "u8 HP\nangle Heading\nfixstr[x] Bad".parse().unwrap();
        assert_eq!(schema.fields()[1].tag, FieldTag::Unknown("angle".into()));
        assert_eq!(schema.fields()[2].tag, FieldTag::Unknown("fixstr[x]".into()));
        assert_eq!(schema.byte_size(), None);
    }

    #[test]
    fn test_compile_comments() {
        let schema = Schema::compile("# weapon row\nu32 Price\n   # trailing\n").unwrap();
        assert_eq!(schema.len(), 1);
        assert!(schema.field("Price").is_some());
        assert!(schema.field("weapon").is_none());
    }

    #[test]
    fn test_sized_tags() {
        assert_eq!(FieldTag::from("fixstr[16]"), FieldTag::FixStr(16));
        assert_eq!(FieldTag::from("fixstrW[8]"), FieldTag::FixStrW(8));
        assert_eq!(FieldTag::from("dummy8[3]"), FieldTag::Dummy8(3));
        assert_eq!(FieldTag::from("i32"), FieldTag::S32);
        assert_eq!(FieldTag::FixStrW(8).to_string(), "fixstrW[8]");
        assert_eq!(FieldTag::FixStrW(8).byte_size(), Some(16));
    }

    #[test]
    fn test_byte_size() {
        let schema = Schema::compile("u8 A\ns16 B\nf32 C\ndummy8[5] Pad\nu64 D").unwrap();
        assert_eq!(schema.byte_size(), Some(1 + 2 + 4 + 5 + 8));
        assert!(Schema::compile("").unwrap().is_empty());
    }
}
