//! Binary KeyValues decoding.

use super::BinaryType;
use crate::{Error, KvObject, KvValue, Result};

/// Decoder over one binary document held in memory.
///
/// Created via [`Deserializer::new`] for inline names or
/// [`Deserializer::with_string_table`] for table-indexed names.
pub struct Deserializer<'a> {
    input: &'a [u8],
    position: usize,
    string_table: Option<&'a [&'a str]>,
}

impl<'a> Deserializer<'a> {
    /// Creates a decoder for documents whose names are written inline as
    /// NUL-terminated strings.
    ///
    /// Decoding starts at the first byte of `input`. Bytes after the
    /// document's closing End tag are left unread; see
    /// [`position`](Self::position).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyvalues::binary::Deserializer;
    ///
    /// let bytes = [0x00, b'R', 0, 0x01, b'k', 0, b'v', 0, 0x08, 0x08];
    /// let mut deserializer = Deserializer::new(&bytes);
    /// let root = deserializer.parse_document().unwrap();
    ///
    /// assert_eq!(root.name(), "R");
    /// assert_eq!(root.get_child("k").unwrap().unwrap().as_string().unwrap(), "v");
    /// assert_eq!(deserializer.position(), bytes.len());
    /// ```
    pub fn new(input: &'a [u8]) -> Self {
        Deserializer {
            input,
            position: 0,
            string_table: None,
        }
    }

    /// Creates a decoder for documents whose names are indices into
    /// `string_table`.
    ///
    /// In table mode every name slot is read as a 4-byte little-endian
    /// index, whatever the entry's type tag says. String values stay inline.
    /// An index outside the table fails the decode with
    /// [`Error::StringTableIndex`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyvalues::binary::Deserializer;
    ///
    /// let table = ["R", "k"];
    /// let bytes = [0x00, 0, 0, 0, 0, 0x01, 1, 0, 0, 0, b'v', 0, 0x08, 0x08];
    /// let root = Deserializer::with_string_table(&bytes, &table)
    ///     .parse_document()
    ///     .unwrap();
    ///
    /// assert_eq!(root.name(), "R");
    /// assert_eq!(root.get_child("k").unwrap().unwrap().as_string().unwrap(), "v");
    /// ```
    pub fn with_string_table(input: &'a [u8], string_table: &'a [&'a str]) -> Self {
        Deserializer {
            input,
            position: 0,
            string_table: Some(string_table),
        }
    }

    /// Current byte offset into the input.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Decodes the whole document, unwrapping its first entry into the
    /// returned root.
    ///
    /// # Errors
    ///
    /// Any malformed input aborts the decode; no partial tree is returned.
    pub fn parse_document(&mut self) -> Result<KvObject> {
        let root = self.parse_block(true)?;
        tracing::debug!(
            name = root.name(),
            bytes = self.position,
            table = self.string_table.is_some(),
            "decoded binary KeyValues document"
        );
        Ok(root)
    }

    fn parse_block(&mut self, top_level: bool) -> Result<KvObject> {
        let mut block = KvObject::new_container("");
        let mut awaiting_root = top_level;

        loop {
            let tag_offset = self.position;
            let byte = self.read_u8("type tag")?;
            let tag = BinaryType::from_byte(byte).ok_or(Error::UnknownType {
                tag: byte,
                offset: tag_offset,
            })?;
            if tag == BinaryType::End {
                break;
            }

            let name = self.read_name()?;
            let value = match tag {
                BinaryType::ChildObject => {
                    tracing::trace!(name = %name, offset = tag_offset, "entering child object");
                    self.parse_block(false)?.into_value()
                }
                BinaryType::String => KvValue::String(self.read_cstring()?),
                BinaryType::Int32 | BinaryType::Color | BinaryType::Pointer => {
                    KvValue::Int32(i32::from_le_bytes(self.read_array("int32")?))
                }
                BinaryType::UInt64 => KvValue::UInt64(u64::from_le_bytes(self.read_array("uint64")?)),
                BinaryType::Int64 => KvValue::Int64(i64::from_le_bytes(self.read_array("int64")?)),
                BinaryType::Float32 => {
                    KvValue::Float32(f32::from_le_bytes(self.read_array("float32")?))
                }
                BinaryType::End => unreachable!("End is handled before the name is read"),
            };

            let entry = KvObject::new(name, value);
            if awaiting_root {
                awaiting_root = false;
                if !entry.has_children() {
                    return Err(Error::RootNotContainer { name: entry.name });
                }
                block = entry;
            } else {
                block.set_child(entry)?;
            }
        }

        Ok(block)
    }

    fn read_name(&mut self) -> Result<String> {
        match self.string_table {
            Some(table) => {
                let offset = self.position;
                let index = i32::from_le_bytes(self.read_array("string table index")?);
                usize::try_from(index)
                    .ok()
                    .and_then(|i| table.get(i))
                    .map(|name| (*name).to_string())
                    .ok_or(Error::StringTableIndex {
                        index,
                        offset,
                        len: table.len(),
                    })
            }
            None => self.read_cstring(),
        }
    }

    fn read_u8(&mut self, expected: &str) -> Result<u8> {
        let byte = *self
            .input
            .get(self.position)
            .ok_or_else(|| Error::unexpected_eof(self.position, expected))?;
        self.position += 1;
        Ok(byte)
    }

    fn read_array<const N: usize>(&mut self, expected: &str) -> Result<[u8; N]> {
        let end = self.position + N;
        let bytes = self
            .input
            .get(self.position..end)
            .ok_or_else(|| Error::unexpected_eof(self.position, expected))?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.position = end;
        Ok(out)
    }

    fn read_cstring(&mut self) -> Result<String> {
        let start = self.position;
        let len = self.input[start..]
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::unexpected_eof(self.input.len(), "string terminator"))?;
        let text = std::str::from_utf8(&self.input[start..start + len])
            .map_err(|e| Error::InvalidUtf8 {
                offset: start + e.valid_up_to(),
            })?
            .to_string();
        self.position = start + len + 1;
        Ok(text)
    }
}
