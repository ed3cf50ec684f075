//! Binary KeyValues encoding.

use super::BinaryType;
use crate::{Error, KvObject, KvValue, Result};
use indexmap::IndexSet;

/// Order-preserving, deduplicated name table built during one encode.
///
/// The first time a name is seen it is appended; later occurrences reuse
/// its index.
///
/// # Examples
///
/// ```rust
/// use keyvalues::binary::StringTable;
///
/// let mut table = StringTable::new();
/// assert_eq!(table.intern("a").unwrap(), 0);
/// assert_eq!(table.intern("b").unwrap(), 1);
/// assert_eq!(table.intern("a").unwrap(), 0);
/// assert_eq!(table.into_vec(), ["a", "b"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StringTable(IndexSet<String>);

impl StringTable {
    #[must_use]
    pub fn new() -> Self {
        StringTable(IndexSet::new())
    }

    /// Returns the index of `name`, appending it if it is new.
    ///
    /// # Errors
    ///
    /// Fails once the table holds more names than an `i32` index can reach.
    pub fn intern(&mut self, name: &str) -> Result<i32> {
        let index = match self.0.get_index_of(name) {
            Some(index) => index,
            None => self.0.insert_full(name.to_string()).0,
        };
        i32::try_from(index)
            .map_err(|_| Error::custom(format!("string table index {} overflows i32", index)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The names in index order.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0.into_iter().collect()
    }
}

/// Encoder producing one binary document.
pub struct Serializer {
    output: Vec<u8>,
    string_table: Option<StringTable>,
}

impl Serializer {
    /// Creates an encoder that writes every name inline as a
    /// NUL-terminated string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyvalues::binary::Serializer;
    /// use keyvalues::KvObject;
    ///
    /// let tree = KvObject::with_children("R", [KvObject::new("k", "v")]);
    /// let mut serializer = Serializer::new();
    /// serializer.serialize_document(&tree).unwrap();
    ///
    /// assert_eq!(
    ///     serializer.into_inner(),
    ///     [0x00, b'R', 0, 0x01, b'k', 0, b'v', 0, 0x08, 0x08]
    /// );
    /// ```
    pub fn new() -> Self {
        Serializer {
            output: Vec::with_capacity(256),
            string_table: None,
        }
    }

    /// Creates an encoder that writes each name as a 4-byte little-endian
    /// index into a [`StringTable`] built during the encode.
    ///
    /// String values are still written inline. Retrieve the table with
    /// [`into_parts`](Self::into_parts); the bytes cannot be decoded
    /// without it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyvalues::binary::Serializer;
    /// use keyvalues::KvObject;
    ///
    /// let tree = KvObject::with_children("R", [KvObject::new("k", "v")]);
    /// let mut serializer = Serializer::with_string_table();
    /// serializer.serialize_document(&tree).unwrap();
    ///
    /// let (bytes, table) = serializer.into_parts();
    /// assert_eq!(bytes, [0x00, 0, 0, 0, 0, 0x01, 1, 0, 0, 0, b'v', 0, 0x08, 0x08]);
    /// assert_eq!(table.unwrap().into_vec(), ["R", "k"]);
    /// ```
    pub fn with_string_table() -> Self {
        Serializer {
            output: Vec::with_capacity(256),
            string_table: Some(StringTable::new()),
        }
    }

    /// Consumes the encoder, returning the bytes written so far.
    ///
    /// In table mode the name table is discarded; use
    /// [`into_parts`](Self::into_parts) to keep it.
    pub fn into_inner(self) -> Vec<u8> {
        self.output
    }

    /// Consumes the encoder, returning the bytes written so far and the
    /// name table.
    ///
    /// The table is `Some` only for an encoder made with
    /// [`with_string_table`](Self::with_string_table). Its names are in
    /// index order, first occurrence first.
    pub fn into_parts(self) -> (Vec<u8>, Option<StringTable>) {
        (self.output, self.string_table)
    }

    /// Writes `root` as a complete document, including the trailing End.
    ///
    /// # Errors
    ///
    /// Fails only if the name table overflows.
    pub fn serialize_document(&mut self, root: &KvObject) -> Result<()> {
        self.serialize_entry(root)?;
        self.output.push(BinaryType::End as u8);
        tracing::debug!(
            name = root.name(),
            bytes = self.output.len(),
            names = self.string_table.as_ref().map(StringTable::len),
            "encoded binary KeyValues document"
        );
        Ok(())
    }

    fn serialize_entry(&mut self, node: &KvObject) -> Result<()> {
        self.output.push(binary_type(node.value()) as u8);
        self.write_name(node.name())?;

        match node.value() {
            KvValue::Children(children) => {
                for child in children {
                    self.serialize_entry(child)?;
                }
                self.output.push(BinaryType::End as u8);
            }
            KvValue::String(s) => self.write_cstring(s),
            KvValue::Int32(v) => self.output.extend_from_slice(&v.to_le_bytes()),
            KvValue::UInt64(v) => self.output.extend_from_slice(&v.to_le_bytes()),
            KvValue::Int64(v) => self.output.extend_from_slice(&v.to_le_bytes()),
            KvValue::Float32(v) => self.output.extend_from_slice(&v.to_le_bytes()),
        }
        Ok(())
    }

    fn write_name(&mut self, name: &str) -> Result<()> {
        match &mut self.string_table {
            Some(table) => {
                let index = table.intern(name)?;
                self.output.extend_from_slice(&index.to_le_bytes());
            }
            None => self.write_cstring(name),
        }
        Ok(())
    }

    fn write_cstring(&mut self, s: &str) {
        self.output.extend_from_slice(s.as_bytes());
        self.output.push(0);
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

fn binary_type(value: &KvValue) -> BinaryType {
    match value {
        KvValue::Children(_) => BinaryType::ChildObject,
        KvValue::String(_) => BinaryType::String,
        KvValue::Int32(_) => BinaryType::Int32,
        KvValue::UInt64(_) => BinaryType::UInt64,
        KvValue::Int64(_) => BinaryType::Int64,
        KvValue::Float32(_) => BinaryType::Float32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_layout() {
        let tree = KvObject::with_children(
            "R",
            [
                KvObject::new("s", "v"),
                KvObject::new("i", 1),
                KvObject::with_children("c", [KvObject::new("f", 1.0f32)]),
            ],
        );
        let mut serializer = Serializer::new();
        serializer.serialize_document(&tree).unwrap();

        let mut expected = vec![0x00, b'R', 0];
        expected.extend_from_slice(&[0x01, b's', 0, b'v', 0]);
        expected.extend_from_slice(&[0x02, b'i', 0, 1, 0, 0, 0]);
        expected.extend_from_slice(&[0x00, b'c', 0]);
        expected.extend_from_slice(&[0x03, b'f', 0]);
        expected.extend_from_slice(&1.0f32.to_le_bytes());
        expected.extend_from_slice(&[0x08, 0x08, 0x08]);
        assert_eq!(serializer.into_inner(), expected);
    }

    #[test]
    fn test_table_layout() {
        let tree = KvObject::with_children(
            "R",
            [
                KvObject::with_children("x", [KvObject::new("R", 5u64)]),
                KvObject::new("y", 6i64),
            ],
        );
        let mut serializer = Serializer::with_string_table();
        serializer.serialize_document(&tree).unwrap();
        let (bytes, table) = serializer.into_parts();

        assert_eq!(table.unwrap().into_vec(), ["R", "x", "y"]);

        let mut expected = vec![0x00, 0, 0, 0, 0];
        expected.extend_from_slice(&[0x00, 1, 0, 0, 0]);
        expected.extend_from_slice(&[0x07, 0, 0, 0, 0]);
        expected.extend_from_slice(&5u64.to_le_bytes());
        expected.push(0x08);
        expected.extend_from_slice(&[0x0A, 2, 0, 0, 0]);
        expected.extend_from_slice(&6i64.to_le_bytes());
        expected.extend_from_slice(&[0x08, 0x08]);
        assert_eq!(bytes, expected);
    }
}
