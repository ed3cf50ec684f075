//! # keyvalues
//!
//! An in-memory model and codecs for KeyValues, the hierarchical
//! name/value format used by Valve's Source engine for configuration and
//! game data.
//!
//! ## What is KeyValues?
//!
//! A KeyValues document is a tree of named nodes. Each node is either a
//! container of uniquely-named children or a leaf carrying one scalar. The
//! same tree has two representations: a quoted, brace-delimited text format
//! and a compact tagged binary format.
//!
//! ## Key Features
//!
//! - **Ordered Tree Model**: children keep insertion order and overwrite in
//!   place on name collision
//! - **Typed Accessors**: read and write leaves as `bool`, integers, floats
//!   or strings, with parsing from text where needed
//! - **Text Codec**: tolerant parser and tab-indented printer with a nesting
//!   limit
//! - **Binary Codec**: inline names or a separate string table
//! - **Serde Compatible**: [`KvObject`] and [`KvValue`] implement
//!   `Serialize` and `Deserialize`
//!
//! ## Quick Start
//!
//! ```rust
//! use keyvalues::{from_str, to_string};
//!
//! let tree = from_str("\"Root\" { \"A\" \"1\" \"B\" { \"C\" \"2\" } }").unwrap();
//! assert_eq!(tree.name(), "Root");
//! assert_eq!(tree.get_child("A").unwrap().unwrap().as_i32().unwrap(), 1);
//!
//! let text = to_string(&tree).unwrap();
//! assert_eq!(
//!     text,
//!     "\"Root\"\n{\n\t\"A\"\t\"1\"\n\t\"B\"\n\t{\n\t\t\"C\"\t\"2\"\n\t}\n}\n"
//! );
//! ```
//!
//! ### Building Trees
//!
//! ```rust
//! use keyvalues::{binary, kv, KvValue};
//!
//! let mut tree = kv!("Settings" => {
//!     "volume" => 0.5f32,
//!     "player" => { "name" => "gordon" },
//! });
//!
//! tree.children_view().unwrap().add("fullscreen", true);
//!
//! let bytes = binary::to_vec(&tree).unwrap();
//! let back = binary::from_slice(&bytes).unwrap();
//! assert_eq!(back, tree);
//! assert_eq!(
//!     back.get_child("fullscreen").unwrap().unwrap().value(),
//!     &KvValue::Int32(1)
//! );
//! ```
//!
//! ## Equality
//!
//! `==` is strict: leaves must hold the same variant. [`KvObject::equals`]
//! with `strict = false` compares leaves by their canonical text, so a tree
//! read back from text (where every leaf is a string) still matches the
//! typed tree it was written from. Child order never matters for equality,
//! and the root's own name is ignored.
//!
//! See [`format`] for both wire layouts.

pub mod binary;
pub mod children;
pub mod error;
pub mod format;
pub mod macros;
pub mod map;
pub mod object;
pub mod options;
pub mod text;
pub mod value;

pub use children::KvChildren;
pub use error::{Error, Result};
pub use map::KvMap;
pub use object::{KvChildMut, KvObject};
pub use options::{TextOptions, DEFAULT_MAX_DEPTH};
pub use value::KvValue;

use std::io;

/// Serialize a tree to KeyValues text.
///
/// # Examples
///
/// ```rust
/// use keyvalues::{to_string, KvObject};
///
/// let tree = KvObject::with_children("Root", [KvObject::new("A", 1)]);
/// assert_eq!(to_string(&tree).unwrap(), "\"Root\"\n{\n\t\"A\"\t\"1\"\n}\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::DepthLimitExceeded`] if containers nest more than
/// [`DEFAULT_MAX_DEPTH`] deep.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(tree: &KvObject) -> Result<String> {
    to_string_with_options(tree, &TextOptions::default())
}

/// Serialize a tree to KeyValues text with custom options.
///
/// # Errors
///
/// Returns [`Error::DepthLimitExceeded`] if containers nest deeper than
/// `options.max_depth`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options(tree: &KvObject, options: &TextOptions) -> Result<String> {
    let mut serializer = text::Serializer::new(options.clone());
    serializer.serialize_document(tree)?;
    Ok(serializer.into_inner())
}

/// Serialize a tree to a writer as KeyValues text.
///
/// # Examples
///
/// ```rust
/// use keyvalues::{to_writer, KvObject};
///
/// let tree = KvObject::with_children("Root", [KvObject::new("A", "x")]);
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &tree).unwrap();
/// assert!(buffer.starts_with(b"\"Root\""));
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(writer: W, tree: &KvObject) -> Result<()>
where
    W: io::Write,
{
    to_writer_with_options(writer, tree, &TextOptions::default())
}

/// Serialize a tree to a writer as KeyValues text with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W>(mut writer: W, tree: &KvObject, options: &TextOptions) -> Result<()>
where
    W: io::Write,
{
    let text = to_string_with_options(tree, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Parse a tree from KeyValues text.
///
/// The first top-level entry names the returned root; entries after it are
/// added to the root as children.
///
/// # Examples
///
/// ```rust
/// use keyvalues::from_str;
///
/// let tree = from_str("\"Root\" { \"path\" \"C:\\\" }").unwrap();
/// assert_eq!(tree.get_child("path").unwrap().unwrap().as_string().unwrap(), "C:\\");
/// ```
///
/// # Errors
///
/// Returns [`Error::Syntax`] with the character index and surrounding
/// context for malformed input, [`Error::UnterminatedString`] if input ends
/// inside a string, or [`Error::RootNotContainer`] if the first entry is a
/// plain value.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(s: &str) -> Result<KvObject> {
    text::Deserializer::from_str(s).parse_document()
}

/// Parse a tree from an I/O stream of KeyValues text.
///
/// # Examples
///
/// ```rust
/// use keyvalues::from_reader;
/// use std::io::Cursor;
///
/// let tree = from_reader(Cursor::new(b"\"Root\" { \"A\" \"1\" }")).unwrap();
/// assert_eq!(tree.name(), "Root");
/// ```
///
/// # Errors
///
/// Returns an error if reading from the reader fails, the input is not valid
/// UTF-8, or the text is malformed.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R) -> Result<KvObject>
where
    R: io::Read,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Parse a tree from bytes of KeyValues text.
///
/// # Errors
///
/// Returns [`Error::InvalidUtf8`] if the bytes are not UTF-8, otherwise as
/// [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(v: &[u8]) -> Result<KvObject> {
    let s = std::str::from_utf8(v).map_err(|e| Error::InvalidUtf8 {
        offset: e.valid_up_to(),
    })?;
    from_str(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> KvObject {
        KvObject::with_children(
            "Root",
            [
                KvObject::new("name", "value"),
                KvObject::new("count", 3),
                KvObject::with_children("nested", [KvObject::new("flag", true)]),
            ],
        )
    }

    #[test]
    fn test_text_roundtrip_is_loosely_equal() {
        let tree = sample();
        let text = to_string(&tree).unwrap();
        let back = from_str(&text).unwrap();
        assert_eq!(back.name(), "Root");
        assert!(back.equals(&tree, false));
        assert!(!back.equals(&tree, true));
    }

    #[test]
    fn test_writer_and_reader() {
        let tree = sample();
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &tree).unwrap();
        let back = from_reader(buffer.as_slice()).unwrap();
        assert!(back.equals(&tree, false));
    }

    #[test]
    fn test_from_slice_rejects_invalid_utf8() {
        assert_eq!(
            from_slice(b"\"R\" { \"a\" \"\xff\" }").unwrap_err(),
            Error::InvalidUtf8 { offset: 11 }
        );
    }

    #[test]
    fn test_custom_depth_limit() {
        let tree = sample();
        let options = TextOptions::new().with_max_depth(1);
        assert!(matches!(
            to_string_with_options(&tree, &options),
            Err(Error::DepthLimitExceeded { limit: 1, .. })
        ));

        let mut buffer = Vec::new();
        assert!(to_writer_with_options(&mut buffer, &tree, &options).is_err());
        assert!(buffer.is_empty());
    }
}
