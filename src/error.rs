//! Error types for KeyValues decoding, encoding and tree manipulation.
//!
//! This module provides a single [`Error`] enum shared by both codecs and the
//! tree model, with enough context attached to locate the problem.
//!
//! ## Error Categories
//!
//! - **Malformed input**: unexpected characters or bytes, unterminated strings,
//!   unknown binary type tags, premature end of input
//! - **Structural misuse**: child operations on a leaf node
//! - **Type coercion**: typed accessors or mutators against an incompatible stored value
//! - **Root shape**: a document whose first entry is not a container
//! - **Depth guard**: text serialization nested deeper than the configured limit
//!
//! ## Error Context
//!
//! Binary decode errors carry the byte offset they occurred at. Text decode
//! errors carry the character index, a window of the surrounding text and the
//! name of the object that was being parsed.
//!
//! ## Examples
//!
//! ```rust
//! use keyvalues::{from_str, Error};
//!
//! let result = from_str("\"Root\" { \"A\" ! }");
//! assert!(matches!(result, Err(Error::Syntax { .. })));
//!
//! if let Err(err) = result {
//!     assert!(err.to_string().contains("Root"));
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors produced by this crate.
///
/// Each variant carries the context needed to locate the problem.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Unexpected character in KeyValues text
    #[error("Syntax error at index {index} while parsing object '{object}': {msg}\n{context}")]
    Syntax {
        index: usize,
        object: String,
        msg: String,
        context: String,
    },

    /// A quoted string ran into the end of the input
    #[error("Unterminated string starting at index {index} while parsing object '{object}'")]
    UnterminatedString { index: usize, object: String },

    /// Binary type tag that has no meaning in the format
    #[error("Unknown type tag 0x{tag:02x} at offset {offset}")]
    UnknownType { tag: u8, offset: usize },

    /// Binary input ended in the middle of an entry
    #[error("Unexpected end of input at offset {offset}, expected {expected}")]
    UnexpectedEof { offset: usize, expected: String },

    /// A binary string was not valid UTF-8
    #[error("Invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// A table-indexed name pointed outside the supplied string table
    #[error("String table index {index} at offset {offset} is out of range (table has {len} entries)")]
    StringTableIndex { index: i32, offset: usize, len: usize },

    /// Child operation on a node that holds a scalar
    #[error("'{name}' is not a container")]
    NotAContainer { name: String },

    /// Typed access against an incompatible stored value
    #[error("Type mismatch on '{name}': requested {expected}, stored value is {found}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Stored text could not be parsed as the requested number type
    #[error("Cannot parse '{value}' as {expected}")]
    InvalidNumber {
        value: String,
        expected: &'static str,
    },

    /// The first entry of a document was a scalar
    #[error("Root entry '{name}' is not a container")]
    RootNotContainer { name: String },

    /// Text serialization went deeper than the configured limit
    #[error("Nesting depth exceeds {limit} levels at '{path}'")]
    DepthLimitExceeded { path: String, limit: usize },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error with the text surrounding `index`.
    ///
    /// The context shows up to five characters on either side of the
    /// offending position, separated by a `|` marker.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyvalues::Error;
    ///
    /// let err = Error::syntax("\"A\" ! \"B\"", 4, "Root", "unexpected '!'");
    /// assert!(err.to_string().contains("\"A\" |! \"B\""));
    /// ```
    pub fn syntax(input: &str, index: usize, object: &str, msg: &str) -> Self {
        Error::Syntax {
            index,
            object: object.to_string(),
            msg: msg.to_string(),
            context: context_window(input, index, 5),
        }
    }

    /// Creates an unexpected end-of-input error for binary decoding.
    pub fn unexpected_eof(offset: usize, expected: &str) -> Self {
        Error::UnexpectedEof {
            offset,
            expected: expected.to_string(),
        }
    }

    /// Creates a type mismatch error for a typed accessor or mutator.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyvalues::Error;
    ///
    /// let err = Error::type_mismatch("Port", "int32", "float32");
    /// assert!(err.to_string().contains("requested int32"));
    /// ```
    pub fn type_mismatch(name: &str, expected: &'static str, found: &'static str) -> Self {
        Error::TypeMismatch {
            name: name.to_string(),
            expected,
            found,
        }
    }

    /// Creates a structural misuse error for a child operation on a leaf.
    pub fn not_a_container(name: &str) -> Self {
        Error::NotAContainer {
            name: name.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader and writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

fn context_window(input: &str, index: usize, radius: usize) -> String {
    let index = index.min(input.len());
    let before: String = {
        let mut chars: Vec<char> = input[..index].chars().rev().take(radius).collect();
        chars.reverse();
        chars.into_iter().collect()
    };
    let after: String = input[index..].chars().take(radius).collect();
    format!("{}|{}", before, after)
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_window_clamps_at_edges() {
        assert_eq!(context_window("abc", 1, 5), "a|bc");
        assert_eq!(context_window("abcdefghijkl", 6, 5), "bcdef|ghijk");
        assert_eq!(context_window("abc", 3, 5), "abc|");
    }

    #[test]
    fn test_context_window_multibyte() {
        assert_eq!(context_window("äöü!x", "äöü".len(), 2), "öü|!x");
    }

    #[test]
    fn test_syntax_error_mentions_object() {
        let err = Error::syntax("\"A\" x", 4, "Settings", "unexpected 'x'");
        let msg = err.to_string();
        assert!(msg.contains("Settings"));
        assert!(msg.contains("index 4"));
    }
}
