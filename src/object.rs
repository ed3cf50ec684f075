//! The KeyValues tree node.
//!
//! A [`KvObject`] is a name plus a [`KvValue`]: either an ordered set of
//! uniquely-named children or a single typed scalar. Both codecs produce and
//! consume trees of `KvObject`s.
//!
//! ## Building Trees
//!
//! ```rust
//! use keyvalues::KvObject;
//!
//! let mut root = KvObject::new_container("Root");
//! root.set_child(KvObject::new("A", "1")).unwrap();
//! root.get_or_insert_child("B")
//!     .unwrap()
//!     .set_child(KvObject::new("C", 2))
//!     .unwrap();
//!
//! assert_eq!(root.get_child("A").unwrap().unwrap().as_i32().unwrap(), 1);
//! assert!(root.has_child("B").unwrap());
//! ```
//!
//! ## Typed Access
//!
//! Values read from text documents are always strings. Typed accessors parse
//! them on demand, and typed mutators keep them textual:
//!
//! ```rust
//! use keyvalues::{KvObject, KvValue};
//!
//! let mut port = KvObject::new("Port", "27015");
//! assert_eq!(port.as_i32().unwrap(), 27015);
//!
//! port.set_i32(27016, false).unwrap();
//! assert_eq!(port.value(), &KvValue::from("27016"));
//! ```

use crate::{Error, KvChildren, KvMap, KvValue, Result};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::str::FromStr;

/// A named node in a KeyValues tree.
///
/// Cloning is a deep copy: the clone shares nothing with the source.
///
/// Equality (`==`) is strict: containers must hold equal children (matched
/// by name, in any order) and leaves must hold the same scalar variant with
/// the same text. The node's own name is not compared. See
/// [`KvObject::equals`] for the variant-insensitive form.
#[derive(Clone, Debug)]
pub struct KvObject {
    pub(crate) name: String,
    pub(crate) value: KvValue,
}

impl KvObject {
    /// Creates a node holding `value`.
    ///
    /// `bool` is stored as `Int32` 0/1 and `u32` as its decimal text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyvalues::{KvObject, KvValue};
    ///
    /// assert_eq!(KvObject::new("a", 5u64).value(), &KvValue::UInt64(5));
    /// assert_eq!(KvObject::new("b", true).value(), &KvValue::Int32(1));
    /// ```
    pub fn new(name: impl Into<String>, value: impl Into<KvValue>) -> Self {
        KvObject {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Creates a container with no children.
    pub fn new_container(name: impl Into<String>) -> Self {
        KvObject {
            name: name.into(),
            value: KvValue::Children(KvMap::new()),
        }
    }

    /// Creates a container from `children`.
    ///
    /// Children sharing a name collapse into one, keeping the first position
    /// and the last value.
    pub fn with_children(
        name: impl Into<String>,
        children: impl IntoIterator<Item = KvObject>,
    ) -> Self {
        KvObject {
            name: name.into(),
            value: KvValue::Children(children.into_iter().collect()),
        }
    }

    /// Creates a container holding exactly one child.
    pub fn with_child(name: impl Into<String>, child: KvObject) -> Self {
        Self::with_children(name, std::iter::once(child))
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> &KvValue {
        &self.value
    }

    /// Consumes the node, returning its value.
    #[must_use]
    pub fn into_value(self) -> KvValue {
        self.value
    }

    /// Returns `true` if this node is a container.
    #[inline]
    #[must_use]
    pub const fn has_children(&self) -> bool {
        self.value.is_children()
    }

    /// The children of a container.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAContainer`] on a leaf.
    pub fn children(&self) -> Result<&KvMap> {
        self.value
            .as_children()
            .ok_or_else(|| Error::not_a_container(&self.name))
    }

    /// The children of a container, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAContainer`] on a leaf.
    pub fn children_mut(&mut self) -> Result<&mut KvMap> {
        match &mut self.value {
            KvValue::Children(map) => Ok(map),
            _ => Err(Error::not_a_container(&self.name)),
        }
    }

    /// Inserts or overwrites a child.
    ///
    /// If a child named `child.name()` exists its value is replaced and its
    /// position kept; otherwise the child is appended.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAContainer`] on a leaf.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyvalues::KvObject;
    ///
    /// let mut root = KvObject::new_container("Root");
    /// root.set_child(KvObject::new("A", "1")).unwrap();
    /// root.set_child(KvObject::new("B", "x")).unwrap();
    /// root.set_child(KvObject::new("A", "2")).unwrap();
    ///
    /// let names: Vec<_> = root.children().unwrap().names().collect();
    /// assert_eq!(names, ["A", "B"]);
    /// assert_eq!(root.get_child("A").unwrap().unwrap().as_string().unwrap(), "2");
    /// ```
    pub fn set_child(&mut self, child: KvObject) -> Result<()> {
        self.children_mut()?.insert(child);
        Ok(())
    }

    /// Looks up a child by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAContainer`] on a leaf.
    pub fn get_child(&self, name: &str) -> Result<Option<&KvObject>> {
        Ok(self.children()?.get(name))
    }

    /// Looks up a child by name, mutably.
    ///
    /// The child comes back as a [`KvChildMut`], which can change its value
    /// but not its name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAContainer`] on a leaf.
    pub fn get_child_mut(&mut self, name: &str) -> Result<Option<KvChildMut<'_>>> {
        Ok(self.children_mut()?.get_mut(name))
    }

    /// Returns `true` if a child with this name exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAContainer`] on a leaf.
    pub fn has_child(&self, name: &str) -> Result<bool> {
        Ok(self.children()?.contains_key(name))
    }

    /// Removes the named child, returning whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAContainer`] on a leaf.
    pub fn remove_child(&mut self, name: &str) -> Result<bool> {
        Ok(self.children_mut()?.remove(name).is_some())
    }

    /// Removes every child of a container.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAContainer`] on a leaf.
    pub fn remove_all_children(&mut self) -> Result<()> {
        self.children_mut()?.clear();
        Ok(())
    }

    /// Returns the named child, creating and attaching an empty container
    /// child first if none exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAContainer`] on a leaf.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyvalues::KvObject;
    ///
    /// let mut root = KvObject::new_container("Root");
    /// root.get_or_insert_child("Video")
    ///     .unwrap()
    ///     .set_child(KvObject::new("Width", 1920))
    ///     .unwrap();
    ///
    /// let video = root.get_child("Video").unwrap().unwrap();
    /// assert_eq!(video.get_child("Width").unwrap().unwrap().as_i32().unwrap(), 1920);
    /// ```
    pub fn get_or_insert_child(&mut self, name: &str) -> Result<KvChildMut<'_>> {
        Ok(self.children_mut()?.get_or_insert(name))
    }

    /// A dictionary-like live view over this container's children.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAContainer`] on a leaf.
    pub fn children_view(&mut self) -> Result<KvChildren<'_>> {
        match &mut self.value {
            KvValue::Children(map) => Ok(KvChildren::new(map)),
            _ => Err(Error::not_a_container(&self.name)),
        }
    }

    fn get_parsed<T: FromStr>(&self, expected: &'static str) -> Result<Option<T>> {
        match &self.value {
            KvValue::String(s) => s
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|_| Error::InvalidNumber {
                    value: s.clone(),
                    expected,
                }),
            _ => Ok(None),
        }
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::type_mismatch(&self.name, expected, self.value.type_name())
    }

    /// Reads the value as a boolean (`as_i32() != 0`).
    pub fn as_bool(&self) -> Result<bool> {
        Ok(self.as_i32()? != 0)
    }

    /// Reads the value as `i32`, parsing stored text.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidNumber`] if stored text does not parse,
    /// [`Error::TypeMismatch`] for any other stored variant.
    pub fn as_i32(&self) -> Result<i32> {
        if let Some(v) = self.get_parsed("int32")? {
            return Ok(v);
        }
        match self.value {
            KvValue::Int32(v) => Ok(v),
            _ => Err(self.mismatch("int32")),
        }
    }

    /// Reads the value as `u32`.
    ///
    /// Unsigned 32-bit values live in the tree as decimal text; a stored
    /// `Int32` is reinterpreted bit for bit.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyvalues::KvObject;
    ///
    /// assert_eq!(KvObject::new("a", "4294967295").as_u32().unwrap(), u32::MAX);
    /// assert_eq!(KvObject::new("b", -1).as_u32().unwrap(), u32::MAX);
    /// ```
    pub fn as_u32(&self) -> Result<u32> {
        if let Some(v) = self.get_parsed("uint32")? {
            return Ok(v);
        }
        match self.value {
            KvValue::Int32(v) => Ok(v as u32),
            _ => Err(self.mismatch("uint32")),
        }
    }

    /// Reads the value as `i64`, parsing stored text.
    pub fn as_i64(&self) -> Result<i64> {
        if let Some(v) = self.get_parsed("int64")? {
            return Ok(v);
        }
        match self.value {
            KvValue::Int64(v) => Ok(v),
            _ => Err(self.mismatch("int64")),
        }
    }

    /// Reads the value as `u64`, parsing stored text.
    pub fn as_u64(&self) -> Result<u64> {
        if let Some(v) = self.get_parsed("uint64")? {
            return Ok(v);
        }
        match self.value {
            KvValue::UInt64(v) => Ok(v),
            _ => Err(self.mismatch("uint64")),
        }
    }

    /// Reads the value as `f32`, parsing stored text.
    pub fn as_f32(&self) -> Result<f32> {
        if let Some(v) = self.get_parsed("float32")? {
            return Ok(v);
        }
        match self.value {
            KvValue::Float32(v) => Ok(v),
            _ => Err(self.mismatch("float32")),
        }
    }

    /// Reads any scalar as its canonical text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] on a container.
    pub fn as_string(&self) -> Result<String> {
        self.value.to_text().ok_or_else(|| self.mismatch("string"))
    }

    /// Like [`KvObject::as_string`], but `None` for containers.
    #[must_use]
    pub fn try_as_string(&self) -> Option<String> {
        self.value.to_text()
    }

    fn set_scalar(
        &mut self,
        value: KvValue,
        same_variant: bool,
        allow_type_change: bool,
    ) -> Result<()> {
        if self.value.is_children() {
            return Err(self.mismatch(value.type_name()));
        }
        if self.value.is_string() {
            self.value = KvValue::String(value.to_string());
            return Ok(());
        }
        if same_variant || allow_type_change {
            self.value = value;
            return Ok(());
        }
        Err(self.mismatch(value.type_name()))
    }

    /// Stores a boolean as `Int32` 0/1 (or `"0"`/`"1"` on a textual value).
    pub fn set_bool(&mut self, value: bool, allow_type_change: bool) -> Result<()> {
        self.set_i32(i32::from(value), allow_type_change)
    }

    /// Stores an `i32`.
    ///
    /// A textual value stays textual; an `Int32` is replaced; anything else
    /// is a [`Error::TypeMismatch`] unless `allow_type_change` is set.
    /// Containers always refuse.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyvalues::{KvObject, KvValue};
    ///
    /// let mut node = KvObject::new("n", 1.5f32);
    /// assert!(node.set_i32(3, false).is_err());
    /// node.set_i32(3, true).unwrap();
    /// assert_eq!(node.value(), &KvValue::Int32(3));
    /// ```
    pub fn set_i32(&mut self, value: i32, allow_type_change: bool) -> Result<()> {
        let same = matches!(self.value, KvValue::Int32(_));
        self.set_scalar(KvValue::Int32(value), same, allow_type_change)
    }

    /// Stores a `u32`.
    ///
    /// On an `Int32` the bits are stored reinterpreted as signed; otherwise
    /// the value is stored as decimal text.
    pub fn set_u32(&mut self, value: u32, allow_type_change: bool) -> Result<()> {
        if let KvValue::Int32(_) = self.value {
            self.value = KvValue::Int32(value as i32);
            return Ok(());
        }
        self.set_scalar(KvValue::from(value), false, allow_type_change)
    }

    /// Stores an `i64`.
    pub fn set_i64(&mut self, value: i64, allow_type_change: bool) -> Result<()> {
        let same = matches!(self.value, KvValue::Int64(_));
        self.set_scalar(KvValue::Int64(value), same, allow_type_change)
    }

    /// Stores a `u64`.
    pub fn set_u64(&mut self, value: u64, allow_type_change: bool) -> Result<()> {
        let same = matches!(self.value, KvValue::UInt64(_));
        self.set_scalar(KvValue::UInt64(value), same, allow_type_change)
    }

    /// Stores an `f32`.
    pub fn set_f32(&mut self, value: f32, allow_type_change: bool) -> Result<()> {
        let same = matches!(self.value, KvValue::Float32(_));
        self.set_scalar(KvValue::Float32(value), same, allow_type_change)
    }

    /// Stores a string.
    pub fn set_string(&mut self, value: impl Into<String>, allow_type_change: bool) -> Result<()> {
        self.set_scalar(KvValue::String(value.into()), false, allow_type_change)
    }

    /// Structural equality, optionally requiring identical scalar variants.
    ///
    /// With `strict == false`, leaves compare by canonical text only, so
    /// `Int32(1)` equals `"1"`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyvalues::KvObject;
    ///
    /// let a = KvObject::with_children("R", [KvObject::new("x", 1)]);
    /// let b = KvObject::with_children("R", [KvObject::new("x", "1")]);
    /// assert!(a.equals(&b, false));
    /// assert!(!a.equals(&b, true));
    /// ```
    #[must_use]
    pub fn equals(&self, other: &KvObject, strict: bool) -> bool {
        std::ptr::eq(self, other) || self.value.equals(&other.value, strict)
    }
}

/// Mutable handle to a node stored inside a container.
///
/// A child's name is the key its parent stores it under, so the handle
/// allows every mutation except renaming. Read access goes through
/// `Deref<Target = KvObject>`; it does not implement `DerefMut`.
///
/// ```compile_fail
/// use keyvalues::KvObject;
///
/// let mut root = KvObject::with_children("R", [KvObject::new("A", 1)]);
/// *root.get_child_mut("A").unwrap().unwrap() = KvObject::new("Z", 2);
/// ```
///
/// # Examples
///
/// ```rust
/// use keyvalues::{KvObject, KvValue};
///
/// let mut root = KvObject::with_children("R", [KvObject::new("A", 1)]);
/// let mut a = root.get_child_mut("A").unwrap().unwrap();
/// assert_eq!(a.set_value("one"), KvValue::Int32(1));
/// assert_eq!(a.name(), "A");
/// assert_eq!(root.get_child("A").unwrap().unwrap().as_string().unwrap(), "one");
/// ```
#[derive(Debug)]
pub struct KvChildMut<'a> {
    node: &'a mut KvObject,
}

impl<'a> KvChildMut<'a> {
    pub(crate) fn new(node: &'a mut KvObject) -> Self {
        KvChildMut { node }
    }

    pub fn value_mut(&mut self) -> &mut KvValue {
        &mut self.node.value
    }

    /// Converts the handle into a reference to the value for the full
    /// borrow.
    pub fn into_value_mut(self) -> &'a mut KvValue {
        let node = self.node;
        &mut node.value
    }

    /// Replaces the value, returning the previous one.
    pub fn set_value(&mut self, value: impl Into<KvValue>) -> KvValue {
        std::mem::replace(&mut self.node.value, value.into())
    }

    /// See [`KvObject::children_mut`].
    pub fn children_mut(&mut self) -> Result<&mut KvMap> {
        self.node.children_mut()
    }

    /// See [`KvObject::set_child`].
    pub fn set_child(&mut self, child: KvObject) -> Result<()> {
        self.node.set_child(child)
    }

    /// See [`KvObject::get_child_mut`].
    pub fn get_child_mut(&mut self, name: &str) -> Result<Option<KvChildMut<'_>>> {
        self.node.get_child_mut(name)
    }

    /// See [`KvObject::get_or_insert_child`].
    pub fn get_or_insert_child(&mut self, name: &str) -> Result<KvChildMut<'_>> {
        self.node.get_or_insert_child(name)
    }

    pub fn remove_child(&mut self, name: &str) -> Result<bool> {
        self.node.remove_child(name)
    }

    pub fn remove_all_children(&mut self) -> Result<()> {
        self.node.remove_all_children()
    }

    /// See [`KvObject::children_view`].
    pub fn children_view(&mut self) -> Result<KvChildren<'_>> {
        self.node.children_view()
    }

    pub fn set_bool(&mut self, value: bool, allow_type_change: bool) -> Result<()> {
        self.node.set_bool(value, allow_type_change)
    }

    pub fn set_i32(&mut self, value: i32, allow_type_change: bool) -> Result<()> {
        self.node.set_i32(value, allow_type_change)
    }

    pub fn set_u32(&mut self, value: u32, allow_type_change: bool) -> Result<()> {
        self.node.set_u32(value, allow_type_change)
    }

    pub fn set_i64(&mut self, value: i64, allow_type_change: bool) -> Result<()> {
        self.node.set_i64(value, allow_type_change)
    }

    pub fn set_u64(&mut self, value: u64, allow_type_change: bool) -> Result<()> {
        self.node.set_u64(value, allow_type_change)
    }

    pub fn set_f32(&mut self, value: f32, allow_type_change: bool) -> Result<()> {
        self.node.set_f32(value, allow_type_change)
    }

    pub fn set_string(&mut self, value: impl Into<String>, allow_type_change: bool) -> Result<()> {
        self.node.set_string(value, allow_type_change)
    }
}

impl Deref for KvChildMut<'_> {
    type Target = KvObject;

    fn deref(&self) -> &KvObject {
        &*self.node
    }
}

impl PartialEq for KvObject {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, true)
    }
}

impl Eq for KvObject {}

impl Hash for KvObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl Serialize for KvObject {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.value)?;
        map.end()
    }
}

/// Deserializes from a map, applying the same top-level unwrap as the
/// codecs: the first entry names the node, later entries become children.
impl<'de> Deserialize<'de> for KvObject {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct KvObjectVisitor;

        impl<'de> Visitor<'de> for KvObjectVisitor {
            type Value = KvObject;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map with a named root entry")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let (name, value) = access
                    .next_entry::<String, KvValue>()?
                    .ok_or_else(|| de::Error::custom("empty map has no root entry"))?;
                let mut root = KvObject::new(name, value);
                while let Some((name, value)) = access.next_entry::<String, KvValue>()? {
                    root.set_child(KvObject::new(name, value))
                        .map_err(de::Error::custom)?;
                }
                Ok(root)
            }
        }

        deserializer.deserialize_map(KvObjectVisitor)
    }
}
