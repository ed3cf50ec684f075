//! KeyValues text serialization.
//!
//! Output is tab-indented, one token per line for containers and one
//! tab-separated pair per line for leaves:
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

use crate::{Error, KvObject, KvValue, Result, TextOptions};

/// The KeyValues text serializer.
///
/// Created via [`Serializer::new`]; call [`Serializer::serialize_document`]
/// and take the text with [`Serializer::into_inner`].
pub struct Serializer {
    output: String,
    options: TextOptions,
    indent_level: usize,
    path: Vec<String>,
}

impl Serializer {
    pub fn new(options: TextOptions) -> Self {
        Serializer {
            output: String::with_capacity(256),
            options,
            indent_level: 0,
            path: Vec::new(),
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Writes `root` and everything below it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DepthLimitExceeded`] if containers nest deeper than
    /// [`TextOptions::max_depth`].
    pub fn serialize_document(&mut self, root: &KvObject) -> Result<()> {
        self.write_object(root)?;
        tracing::debug!(
            name = root.name(),
            chars = self.output.len(),
            "serialized KeyValues text document"
        );
        Ok(())
    }

    fn write_object(&mut self, node: &KvObject) -> Result<()> {
        match node.value() {
            KvValue::Children(children) => {
                self.path.push(node.name().to_string());
                if self.path.len() > self.options.max_depth {
                    return Err(Error::DepthLimitExceeded {
                        path: self.path.join("/"),
                        limit: self.options.max_depth,
                    });
                }

                self.write_indent();
                self.write_quoted(node.name());
                self.output.push('\n');
                self.write_indent();
                self.output.push_str("{\n");
                self.indent_level += 1;

                for child in children {
                    self.write_object(child)?;
                }

                self.indent_level -= 1;
                self.write_indent();
                self.output.push_str("}\n");
                self.path.pop();
            }
            scalar => {
                self.write_indent();
                self.write_quoted(node.name());
                self.output.push('\t');
                self.write_quoted(&scalar.to_string());
                self.output.push('\n');
            }
        }
        Ok(())
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push('\t');
        }
    }

    /// Quotes `s`, escaping `"` and `\`. A backslash that ends the string is
    /// written bare; the parser reads `\"` before `}` back as that
    /// backslash.
    fn write_quoted(&mut self, s: &str) {
        self.output.push('"');
        let mut chars = s.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '"' => self.output.push_str("\\\""),
                '\\' if chars.peek().is_none() => self.output.push('\\'),
                '\\' => self.output.push_str("\\\\"),
                _ => self.output.push(ch),
            }
        }
        self.output.push('"');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(node: &KvObject) -> String {
        let mut serializer = Serializer::new(TextOptions::default());
        serializer.serialize_document(node).unwrap();
        serializer.into_inner()
    }

    #[test]
    fn test_layout() {
        let tree = KvObject::with_children(
            "Root",
            [
                KvObject::new("A", "1"),
                KvObject::with_children("B", [KvObject::new("C", 2)]),
            ],
        );
        assert_eq!(
            render(&tree),
            "\"Root\"\n{\n\t\"A\"\t\"1\"\n\t\"B\"\n\t{\n\t\t\"C\"\t\"2\"\n\t}\n}\n"
        );
    }

    #[test]
    fn test_scalars_use_canonical_text() {
        let tree = KvObject::with_children(
            "R",
            [
                KvObject::new("f", 0.1f32),
                KvObject::new("u", u64::MAX),
                KvObject::new("l", -1i64),
            ],
        );
        let text = render(&tree);
        assert!(text.contains("\"f\"\t\"0.1\"\n"));
        assert!(text.contains("\"u\"\t\"18446744073709551615\"\n"));
        assert!(text.contains("\"l\"\t\"-1\"\n"));
    }

    #[test]
    fn test_quoting() {
        let mut serializer = Serializer::new(TextOptions::default());
        serializer.write_quoted("a\"b\\c\\");
        assert_eq!(serializer.into_inner(), "\"a\\\"b\\\\c\\\"");
    }

    #[test]
    fn test_depth_limit_names_path() {
        let tree = KvObject::with_child("a", KvObject::with_child("b", KvObject::new_container("c")));
        let mut serializer = Serializer::new(TextOptions::new().with_max_depth(2));
        assert_eq!(
            serializer.serialize_document(&tree).unwrap_err(),
            Error::DepthLimitExceeded {
                path: "a/b/c".to_string(),
                limit: 2
            }
        );

        let mut serializer = Serializer::new(TextOptions::new().with_max_depth(3));
        assert!(serializer.serialize_document(&tree).is_ok());
    }
}
