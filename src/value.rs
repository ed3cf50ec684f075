//! Value representation for KeyValues nodes.
//!
//! This module provides the [`KvValue`] enum, the payload of every
//! [`KvObject`](crate::KvObject). A value is either an ordered set of child
//! nodes or exactly one typed scalar.
//!
//! ## Scalar Kinds
//!
//! | Variant | Binary tags | Notes |
//! |---------|-------------|-------|
//! | `String` | String | also the storage for unsigned 32-bit values |
//! | `Int32` | Int32, Color, Pointer | three wire tags share one in-memory type |
//! | `UInt64` | UInt64 | |
//! | `Int64` | Int64 | |
//! | `Float32` | Float32 | |
//!
//! ## Creating Values
//!
//! ```rust
//! use keyvalues::KvValue;
//!
//! let text = KvValue::from("hello");
//! let number = KvValue::from(42);
//! let flag = KvValue::from(true);
//! let unsigned = KvValue::from(7u32);
//!
//! assert!(text.is_string());
//! assert_eq!(number, KvValue::Int32(42));
//! assert_eq!(flag, KvValue::Int32(1));
//! assert_eq!(unsigned, KvValue::String("7".to_string()));
//! ```
//!
//! ## Equality
//!
//! `KvValue` equality is strict: both sides must be the same variant and
//! format to the same text. Use [`KvValue::loose_eq`] to compare scalars by
//! their text alone.

use crate::{KvMap, KvObject};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// The payload of a KeyValues node.
///
/// # Examples
///
/// ```rust
/// use keyvalues::{KvMap, KvValue};
///
/// let leaf = KvValue::Float32(1.5);
/// let container = KvValue::Children(KvMap::new());
///
/// assert!(!leaf.is_children());
/// assert!(container.is_children());
/// assert_eq!(leaf.type_name(), "float32");
/// ```
#[derive(Clone, Debug)]
pub enum KvValue {
    Children(KvMap),
    String(String),
    Int32(i32),
    UInt64(u64),
    Int64(i64),
    Float32(f32),
}

impl KvValue {
    /// Returns `true` if the value holds child nodes.
    #[inline]
    #[must_use]
    pub const fn is_children(&self) -> bool {
        matches!(self, KvValue::Children(_))
    }

    /// Returns `true` if the value is textual.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, KvValue::String(_))
    }

    /// Human-readable name of the variant, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            KvValue::Children(_) => "children",
            KvValue::String(_) => "string",
            KvValue::Int32(_) => "int32",
            KvValue::UInt64(_) => "uint64",
            KvValue::Int64(_) => "int64",
            KvValue::Float32(_) => "float32",
        }
    }

    /// If the value is a string, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            KvValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value holds children, returns them.
    #[inline]
    #[must_use]
    pub fn as_children(&self) -> Option<&KvMap> {
        match self {
            KvValue::Children(map) => Some(map),
            _ => None,
        }
    }

    /// Mutable access to the children, if any.
    #[inline]
    pub fn as_children_mut(&mut self) -> Option<&mut KvMap> {
        match self {
            KvValue::Children(map) => Some(map),
            _ => None,
        }
    }

    /// Canonical text of a scalar, or `None` for children.
    ///
    /// Numbers use invariant decimal formatting; floats use the shortest
    /// representation that parses back to the same value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyvalues::KvValue;
    ///
    /// assert_eq!(KvValue::Int32(-5).to_text().as_deref(), Some("-5"));
    /// assert_eq!(KvValue::Float32(0.25).to_text().as_deref(), Some("0.25"));
    /// assert_eq!(KvValue::Children(Default::default()).to_text(), None);
    /// ```
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            KvValue::Children(_) => None,
            KvValue::String(s) => Some(s.clone()),
            KvValue::Int32(v) => Some(v.to_string()),
            KvValue::UInt64(v) => Some(v.to_string()),
            KvValue::Int64(v) => Some(v.to_string()),
            KvValue::Float32(v) => Some(v.to_string()),
        }
    }

    /// Compares two values ignoring the scalar variant.
    ///
    /// Scalars are equal when their canonical text matches. Children are
    /// compared structurally, again ignoring scalar variants.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyvalues::KvValue;
    ///
    /// assert!(KvValue::Int32(1).loose_eq(&KvValue::from("1")));
    /// assert_ne!(KvValue::Int32(1), KvValue::from("1"));
    /// ```
    #[must_use]
    pub fn loose_eq(&self, other: &KvValue) -> bool {
        self.equals(other, false)
    }

    pub(crate) fn equals(&self, other: &KvValue, strict: bool) -> bool {
        match (self, other) {
            (KvValue::Children(a), KvValue::Children(b)) => {
                a.len() == b.len()
                    && a.iter().all(|child| {
                        b.get(child.name())
                            .map_or(false, |theirs| child.value().equals(theirs.value(), strict))
                    })
            }
            (KvValue::Children(_), _) | (_, KvValue::Children(_)) => false,
            (a, b) => {
                if strict && std::mem::discriminant(a) != std::mem::discriminant(b) {
                    return false;
                }
                a.to_text() == b.to_text()
            }
        }
    }
}

impl Default for KvValue {
    fn default() -> Self {
        KvValue::Children(KvMap::new())
    }
}

impl PartialEq for KvValue {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, true)
    }
}

impl Eq for KvValue {}

impl Hash for KvValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            KvValue::Children(map) => {
                state.write_u8(0);
                state.write_usize(map.len());
                // Children are unordered for equality, so combine their
                // hashes commutatively.
                let combined = map.iter().fold(0u64, |acc, child| {
                    let mut hasher = std::collections::hash_map::DefaultHasher::new();
                    child.name().hash(&mut hasher);
                    child.value().hash(&mut hasher);
                    acc.wrapping_add(hasher.finish())
                });
                state.write_u64(combined);
            }
            scalar => {
                state.write_u8(1);
                scalar.to_text().hash(state);
            }
        }
    }
}

impl fmt::Display for KvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KvValue::Children(map) => write!(f, "{{{} children}}", map.len()),
            KvValue::String(s) => f.write_str(s),
            KvValue::Int32(v) => write!(f, "{}", v),
            KvValue::UInt64(v) => write!(f, "{}", v),
            KvValue::Int64(v) => write!(f, "{}", v),
            KvValue::Float32(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for KvValue {
    fn from(value: bool) -> Self {
        KvValue::Int32(i32::from(value))
    }
}

impl From<i32> for KvValue {
    fn from(value: i32) -> Self {
        KvValue::Int32(value)
    }
}

/// Unsigned 32-bit values are stored as decimal text.
impl From<u32> for KvValue {
    fn from(value: u32) -> Self {
        KvValue::String(value.to_string())
    }
}

impl From<u64> for KvValue {
    fn from(value: u64) -> Self {
        KvValue::UInt64(value)
    }
}

impl From<i64> for KvValue {
    fn from(value: i64) -> Self {
        KvValue::Int64(value)
    }
}

impl From<f32> for KvValue {
    fn from(value: f32) -> Self {
        KvValue::Float32(value)
    }
}

impl From<String> for KvValue {
    fn from(value: String) -> Self {
        KvValue::String(value)
    }
}

impl From<&str> for KvValue {
    fn from(value: &str) -> Self {
        KvValue::String(value.to_string())
    }
}

impl From<KvMap> for KvValue {
    fn from(value: KvMap) -> Self {
        KvValue::Children(value)
    }
}

impl From<Vec<KvObject>> for KvValue {
    fn from(value: Vec<KvObject>) -> Self {
        KvValue::Children(value.into_iter().collect())
    }
}

impl Serialize for KvValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            KvValue::Children(map) => {
                use serde::ser::SerializeMap;
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for child in map.iter() {
                    out.serialize_entry(child.name(), child.value())?;
                }
                out.end()
            }
            KvValue::String(s) => serializer.serialize_str(s),
            KvValue::Int32(v) => serializer.serialize_i32(*v),
            KvValue::UInt64(v) => serializer.serialize_u64(*v),
            KvValue::Int64(v) => serializer.serialize_i64(*v),
            KvValue::Float32(v) => serializer.serialize_f32(*v),
        }
    }
}

impl<'de> Deserialize<'de> for KvValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct KvValueVisitor;

        impl<'de> Visitor<'de> for KvValueVisitor {
            type Value = KvValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a KeyValues scalar or a map of children")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(KvValue::from(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(match i32::try_from(value) {
                    Ok(v) => KvValue::Int32(v),
                    Err(_) => KvValue::Int64(value),
                })
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(match i32::try_from(value) {
                    Ok(v) => KvValue::Int32(v),
                    Err(_) => KvValue::UInt64(value),
                })
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(KvValue::Float32(value as f32))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(KvValue::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(KvValue::String(value))
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = KvMap::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, KvValue>()? {
                    map.insert(KvObject::new(name, value));
                }
                Ok(KvValue::Children(map))
            }
        }

        deserializer.deserialize_any(KvValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_text_formats_numbers_invariantly() {
        assert_eq!(KvValue::Int64(-9_000_000_000).to_text().unwrap(), "-9000000000");
        assert_eq!(KvValue::UInt64(u64::MAX).to_text().unwrap(), "18446744073709551615");
        assert_eq!(KvValue::Float32(1.0).to_text().unwrap(), "1");
        assert_eq!(KvValue::Float32(-0.5).to_text().unwrap(), "-0.5");
    }

    #[test]
    fn test_strict_eq_requires_same_variant() {
        assert_eq!(KvValue::Int32(7), KvValue::Int32(7));
        assert_ne!(KvValue::Int32(7), KvValue::Int64(7));
        assert!(KvValue::Int32(7).loose_eq(&KvValue::Int64(7)));
    }

    #[test]
    fn test_nan_equals_itself() {
        let nan = KvValue::Float32(f32::NAN);
        assert_eq!(nan, nan.clone());
    }

    #[test]
    fn test_children_never_equal_scalars() {
        let children = KvValue::default();
        assert!(!children.loose_eq(&KvValue::from("")));
        assert!(!KvValue::from("").loose_eq(&children));
    }

    #[test]
    fn test_bool_and_u32_conversions() {
        assert_eq!(KvValue::from(false), KvValue::Int32(0));
        assert_eq!(KvValue::from(u32::MAX), KvValue::String("4294967295".into()));
    }
}
