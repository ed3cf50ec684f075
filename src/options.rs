//! Configuration options for text serialization.
//!
//! ## Examples
//!
//! ```rust
//! use keyvalues::{to_string_with_options, KvObject, TextOptions};
//!
//! let tree = KvObject::with_children("Root", [KvObject::new("A", "1")]);
//!
//! let options = TextOptions::new().with_max_depth(8);
//! let text = to_string_with_options(&tree, &options).unwrap();
//! assert!(text.starts_with("\"Root\"\n{\n"));
//! ```

/// Nesting limit applied by [`TextOptions::default`].
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Configuration options for text serialization.
///
/// # Examples
///
/// ```rust
/// use keyvalues::{TextOptions, DEFAULT_MAX_DEPTH};
///
/// let options = TextOptions::new();
/// assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
///
/// let shallow = TextOptions::new().with_max_depth(4);
/// assert_eq!(shallow.max_depth, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextOptions {
    /// Deepest container nesting the serializer will write, counting the
    /// root as depth 1.
    pub max_depth: usize,
}

impl Default for TextOptions {
    fn default() -> Self {
        TextOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl TextOptions {
    /// Creates default options (depth limit of 100).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the nesting limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
