//! KeyValues text parsing.
//!
//! Whitespace between tokens is ignored. Every token is either a quoted
//! string, `{` or `}`; end of input closes any levels still open.

use crate::{Error, KvObject, KvValue, Result};

/// The KeyValues text parser.
///
/// Parses one document into a [`KvObject`]. Created via
/// [`Deserializer::from_str`].
pub struct Deserializer<'de> {
    input: &'de str,
    position: usize,
}

impl<'de> Deserializer<'de> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'de str) -> Self {
        Deserializer { input, position: 0 }
    }

    /// Byte index of the next character to be read.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Parses the whole input, unwrapping its first entry into the returned
    /// root.
    ///
    /// # Errors
    ///
    /// Any malformed input aborts the parse; no partial tree is returned.
    pub fn parse_document(&mut self) -> Result<KvObject> {
        let root = self.parse_block("", true)?;
        tracing::debug!(
            name = root.name(),
            chars = self.position,
            "parsed KeyValues text document"
        );
        Ok(root)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    /// Skips whitespace and returns the next character without consuming it.
    fn peek_significant(&mut self) -> Option<char> {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.next_char();
            } else {
                return Some(ch);
            }
        }
        None
    }

    /// The first non-whitespace character at or after byte index `from`,
    /// without moving the cursor.
    fn peek_significant_from(&self, from: usize) -> Option<char> {
        self.input.get(from..)?.chars().find(|ch| !ch.is_whitespace())
    }

    fn unexpected(&self, ch: char, object: &str) -> Error {
        Error::syntax(
            self.input,
            self.position,
            object,
            &format!("unexpected character '{}'", ch),
        )
    }

    /// Parses entries up to the matching `}` (or end of input).
    ///
    /// At the top level the first entry is unwrapped: its name and children
    /// become the block itself.
    fn parse_block(&mut self, name: &str, top_level: bool) -> Result<KvObject> {
        let mut block = KvObject::new_container(name);
        let mut awaiting_root = top_level;

        loop {
            match self.peek_significant() {
                None => break,
                Some('}') => {
                    self.next_char();
                    break;
                }
                Some('"') => {}
                Some(other) => return Err(self.unexpected(other, block.name())),
            }

            let key = self.parse_quoted(block.name())?;
            if awaiting_root {
                block.name = key.clone();
            }

            let value = match self.peek_significant() {
                Some('{') => {
                    self.next_char();
                    tracing::trace!(name = %key, "entering object");
                    self.parse_block(&key, false)?.into_value()
                }
                Some('"') => KvValue::String(self.parse_quoted(block.name())?),
                Some('}') => {
                    // A key with no value is dropped. The '}' is left in place,
                    // so it closes this level and the enclosing one.
                    tracing::debug!(key = %key, "dropping key without value");
                    break;
                }
                None => break,
                Some(other) => return Err(self.unexpected(other, block.name())),
            };

            let entry = KvObject::new(key, value);
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

    /// Reads one quoted string. The cursor must be on the opening quote.
    fn parse_quoted(&mut self, object: &str) -> Result<String> {
        let start = self.position;
        match self.next_char() {
            Some('"') => {}
            Some(other) => {
                self.position = start;
                return Err(self.unexpected(other, object));
            }
            None => {
                return Err(Error::UnterminatedString {
                    index: start,
                    object: object.to_string(),
                })
            }
        }

        let mut result = String::new();
        while let Some(ch) = self.next_char() {
            match ch {
                '"' => return Ok(result),
                '\\' => match self.peek_char() {
                    Some('"') => {
                        // `\"` right before a closing brace is a truncated
                        // string: keep the backslash, the quote terminates.
                        if self.peek_significant_from(self.position + 1) == Some('}') {
                            tracing::debug!(
                                index = self.position,
                                object,
                                "abrupt end of string before '}}'"
                            );
                            result.push('\\');
                        } else {
                            self.next_char();
                            result.push('"');
                        }
                    }
                    Some('\\') => {
                        self.next_char();
                        result.push('\\');
                    }
                    _ => result.push('\\'),
                },
                other => result.push(other),
            }
        }

        Err(Error::UnterminatedString {
            index: start,
            object: object.to_string(),
        })
    }
}
