//! Text KeyValues encoding.
//!
//! Most users should use the functions in the crate root
//! ([`from_str`](crate::from_str), [`to_string`](crate::to_string)); this
//! module exposes the parser and printer for direct use.
//!
//! ```rust
//! use keyvalues::text::{Deserializer, Serializer};
//! use keyvalues::TextOptions;
//!
//! let mut parser = Deserializer::from_str("\"Root\" { \"A\" \"1\" }");
//! let tree = parser.parse_document().unwrap();
//!
//! let mut printer = Serializer::new(TextOptions::default());
//! printer.serialize_document(&tree).unwrap();
//! assert_eq!(printer.into_inner(), "\"Root\"\n{\n\t\"A\"\t\"1\"\n}\n");
//! ```

mod de;
mod ser;

pub use de::Deserializer;
pub use ser::Serializer;
