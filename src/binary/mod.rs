//! Binary KeyValues encoding.
//!
//! A document is a depth-first run of entries, each `[type tag][name][payload]`.
//! Containers close with an [`BinaryType::End`] byte, and the document itself
//! ends with one more.
//!
//! Names are either inline NUL-terminated UTF-8 or, in string-table mode,
//! 4-byte little-endian indices into a name table that travels separately.
//!
//! ```rust
//! use keyvalues::{binary, KvObject};
//!
//! let tree = KvObject::with_children("Root", [KvObject::new("A", 1)]);
//!
//! let bytes = binary::to_vec(&tree).unwrap();
//! assert_eq!(binary::from_slice(&bytes).unwrap(), tree);
//!
//! let (bytes, table) = binary::to_vec_with_string_table(&tree).unwrap();
//! assert_eq!(table, ["Root", "A"]);
//! assert_eq!(binary::from_slice_with_string_table(&bytes, &table).unwrap(), tree);
//! ```

mod de;
mod ser;

pub use de::Deserializer;
pub use ser::{Serializer, StringTable};

use crate::{Error, KvObject, Result};
use std::io;

/// Type tags of the binary format.
///
/// `Int32`, `Color` and `Pointer` share one payload layout and all decode to
/// [`KvValue::Int32`](crate::KvValue::Int32).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum BinaryType {
    ChildObject = 0x00,
    String = 0x01,
    Int32 = 0x02,
    Float32 = 0x03,
    Pointer = 0x04,
    Color = 0x06,
    UInt64 = 0x07,
    End = 0x08,
    Int64 = 0x0A,
}

impl BinaryType {
    /// Maps a tag byte to its type, or `None` for bytes the format does not
    /// define (including the unsupported wide-string tag `0x05`).
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0x00 => BinaryType::ChildObject,
            0x01 => BinaryType::String,
            0x02 => BinaryType::Int32,
            0x03 => BinaryType::Float32,
            0x04 => BinaryType::Pointer,
            0x06 => BinaryType::Color,
            0x07 => BinaryType::UInt64,
            0x08 => BinaryType::End,
            0x0A => BinaryType::Int64,
            _ => return None,
        })
    }
}

/// Decodes a binary document with inline names.
///
/// # Errors
///
/// Returns an error if the input is truncated, contains an unknown type tag
/// or invalid UTF-8, or if the first entry is not a container.
pub fn from_slice(bytes: &[u8]) -> Result<KvObject> {
    Deserializer::new(bytes).parse_document()
}

/// Decodes a binary document whose names are indices into `string_table`.
///
/// # Errors
///
/// As [`from_slice`], plus [`Error::StringTableIndex`] for an index outside
/// the table.
pub fn from_slice_with_string_table<S: AsRef<str>>(
    bytes: &[u8],
    string_table: &[S],
) -> Result<KvObject> {
    let table: Vec<&str> = string_table.iter().map(AsRef::as_ref).collect();
    Deserializer::with_string_table(bytes, &table).parse_document()
}

/// Reads a whole binary document from `reader` and decodes it.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, otherwise as [`from_slice`].
pub fn from_reader<R: io::Read>(mut reader: R) -> Result<KvObject> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_slice(&bytes)
}

/// Reads a whole binary document from `reader` and decodes it against
/// `string_table`.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, otherwise as
/// [`from_slice_with_string_table`].
pub fn from_reader_with_string_table<R: io::Read, S: AsRef<str>>(
    mut reader: R,
    string_table: &[S],
) -> Result<KvObject> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_slice_with_string_table(&bytes, string_table)
}

/// Encodes `tree` with inline names.
///
/// # Errors
///
/// Encoding a tree built through the public API cannot fail today; the
/// `Result` leaves room for table overflow in string-table mode.
pub fn to_vec(tree: &KvObject) -> Result<Vec<u8>> {
    let mut serializer = Serializer::new();
    serializer.serialize_document(tree)?;
    Ok(serializer.into_inner())
}

/// Encodes `tree` in string-table mode, returning the bytes and the ordered
/// name table a decoder will need.
///
/// # Errors
///
/// Returns an error if the name table outgrows a 32-bit index.
pub fn to_vec_with_string_table(tree: &KvObject) -> Result<(Vec<u8>, Vec<String>)> {
    let mut serializer = Serializer::with_string_table();
    serializer.serialize_document(tree)?;
    let (bytes, table) = serializer.into_parts();
    Ok((bytes, table.map(StringTable::into_vec).unwrap_or_default()))
}

/// Encodes `tree` with inline names into `writer`.
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails.
pub fn to_writer<W: io::Write>(mut writer: W, tree: &KvObject) -> Result<()> {
    let bytes = to_vec(tree)?;
    writer
        .write_all(&bytes)
        .map_err(|e| Error::io(&e.to_string()))
}

/// Encodes `tree` in string-table mode into `writer`, returning the table.
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails.
pub fn to_writer_with_string_table<W: io::Write>(
    mut writer: W,
    tree: &KvObject,
) -> Result<Vec<String>> {
    let (bytes, table) = to_vec_with_string_table(tree)?;
    writer
        .write_all(&bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(table)
}
