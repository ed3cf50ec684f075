//! KeyValues Format Reference
//!
//! This module documents both wire representations as implemented by this
//! library. It contains no code.
//!
//! # Tree Model
//!
//! A document is a tree of named nodes. A node is either a container holding
//! an ordered set of uniquely-named children, or a leaf holding one scalar:
//! string, 32-bit signed integer, 64-bit signed or unsigned integer, or
//! 32-bit float.
//!
//! Unsigned 32-bit values have no scalar kind of their own. They are stored
//! as decimal text, and [`KvObject::as_u32`](crate::KvObject::as_u32) also
//! accepts a signed 32-bit integer reinterpreted bit for bit.
//!
//! # Text Format
//!
//! ```text
//! "Root"
//! {
//! 	"A"	"1"
//! 	"B"
//! 	{
//! 		"C"	"2"
//! 	}
//! }
//! ```
//!
//! **Tokens**: quoted strings, `{` and `}`. Whitespace between tokens is
//! ignored. An entry is a quoted key followed by either a quoted value or a
//! braced block of entries.
//!
//! **Strings**:
//!
//! | Input | Result |
//! |-------|--------|
//! | `\"` | `"` |
//! | `\\` | `\` |
//! | `\` + anything else | the backslash, then that character read normally |
//! | `\"` where the next non-whitespace after the quote is `}` | `\`, and the quote ends the string |
//!
//! The last rule lets documents written by tools that do not escape a
//! trailing backslash (`"C:\"`) read back correctly. The serializer relies
//! on it: a backslash that ends a string is written unescaped.
//!
//! **Closing**: `}` closes the current block. End of input closes every
//! block still open.
//!
//! **Errors**: any other character where a key or value is expected is a
//! syntax error carrying the character index, five characters of context on
//! either side and the name of the block being parsed.
//!
//! Text values are always read as strings; typed accessors parse them on
//! demand.
//!
//! # Binary Format
//!
//! Entries are written depth first as `[tag: u8][name][payload]`:
//!
//! | Tag | Byte | Payload |
//! |-----|------|---------|
//! | ChildObject | `0x00` | nested entries, closed by End |
//! | String | `0x01` | NUL-terminated UTF-8 |
//! | Int32 | `0x02` | `i32` little-endian |
//! | Float32 | `0x03` | `f32` little-endian |
//! | Pointer | `0x04` | `i32` little-endian |
//! | Color | `0x06` | `i32` little-endian |
//! | UInt64 | `0x07` | `u64` little-endian |
//! | End | `0x08` | none, and no name |
//! | Int64 | `0x0A` | `i64` little-endian |
//!
//! Int32, Pointer and Color decode to the same in-memory integer. The
//! document ends with one End byte after the root entry.
//!
//! **Names** are NUL-terminated UTF-8, or in string-table mode a 4-byte
//! little-endian index into a table of names supplied alongside the bytes.
//! The encoder builds that table in first-seen order without duplicates.
//!
//! # Top-Level Unwrap
//!
//! Both decoders start from an unnamed empty root. The first entry they read
//! at the outermost level gives the root its name and children, so
//! `"Root" { ... }` decodes to a node named `Root`. A first entry that is a
//! scalar is rejected. Any entries after the first block are added to the
//! root as children, overwriting same-named ones.
//!
//! # Limits
//!
//! - Text serialization refuses containers nested more than 100 deep
//!   (configurable through [`TextOptions`](crate::TextOptions)).
//! - Binary decoding has no depth limit.
//! - Wide strings (`0x05`) are not supported.
