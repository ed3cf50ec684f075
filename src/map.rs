//! Ordered child storage for KeyValues containers.
//!
//! This module provides [`KvMap`], a wrapper around [`IndexMap`] keyed by the
//! child's name. It keeps two promises of the format:
//!
//! - **Insertion order**: children iterate in the order they were first added,
//!   which is also the order both codecs write them in
//! - **Unique names**: inserting a node whose name already exists replaces that
//!   child's value where it stands instead of adding a duplicate
//!
//! ## Examples
//!
//! ```rust
//! use keyvalues::{KvMap, KvObject};
//!
//! let mut map = KvMap::new();
//! map.insert(KvObject::new("first", 1));
//! map.insert(KvObject::new("second", 2));
//! map.insert(KvObject::new("first", 3));
//!
//! let names: Vec<_> = map.names().collect();
//! assert_eq!(names, vec!["first", "second"]);
//! assert_eq!(map.get("first").unwrap().as_i32().unwrap(), 3);
//! ```

use crate::{KvChildMut, KvObject, KvValue};
use indexmap::IndexMap;

/// An ordered, name-unique collection of child nodes.
///
/// The map key always equals the stored node's name.
#[derive(Debug, Clone, Default)]
pub struct KvMap(IndexMap<String, KvObject>);

impl KvMap {
    /// Creates an empty `KvMap`.
    #[must_use]
    pub fn new() -> Self {
        KvMap(IndexMap::new())
    }

    /// Creates an empty `KvMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        KvMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a child node.
    ///
    /// If a child with the same name exists, its value is replaced in place
    /// (keeping its position) and the previous value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyvalues::{KvMap, KvObject, KvValue};
    ///
    /// let mut map = KvMap::new();
    /// assert!(map.insert(KvObject::new("key", "a")).is_none());
    /// assert_eq!(map.insert(KvObject::new("key", "b")), Some(KvValue::from("a")));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, node: KvObject) -> Option<KvValue> {
        match self.0.get_mut(node.name()) {
            Some(existing) => Some(std::mem::replace(&mut existing.value, node.value)),
            None => {
                self.0.insert(node.name.clone(), node);
                None
            }
        }
    }

    /// Returns the child with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&KvObject> {
        self.0.get(name)
    }

    /// Returns the child with the given name, mutably.
    ///
    /// The handle cannot rename the child, so keys and names stay in step.
    pub fn get_mut(&mut self, name: &str) -> Option<KvChildMut<'_>> {
        self.0.get_mut(name).map(KvChildMut::new)
    }

    /// Returns the named child, appending an empty container first if there
    /// is none.
    pub fn get_or_insert(&mut self, name: &str) -> KvChildMut<'_> {
        KvChildMut::new(
            self.0
                .entry(name.to_string())
                .or_insert_with(|| KvObject::new_container(name)),
        )
    }

    /// Returns `true` if a child with this name exists.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Removes the named child, keeping the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<KvObject> {
        self.0.shift_remove(name)
    }

    /// Removes every child.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns the number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the child names, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    /// Returns an iterator over the children, in insertion order.
    pub fn iter(&self) -> indexmap::map::Values<'_, String, KvObject> {
        self.0.values()
    }

    /// Returns a mutable iterator over the children, in insertion order.
    ///
    /// Each child comes wrapped in a [`KvChildMut`], which cannot rename it.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = KvChildMut<'_>> + '_ {
        self.0.values_mut().map(KvChildMut::new)
    }
}

impl<'a> IntoIterator for &'a KvMap {
    type Item = &'a KvObject;
    type IntoIter = indexmap::map::Values<'a, String, KvObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for KvMap {
    type Item = KvObject;
    type IntoIter = indexmap::map::IntoValues<String, KvObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_values()
    }
}

/// Collects nodes with [`KvMap::insert`] semantics: a repeated name
/// overwrites the earlier value at the earlier position.
impl FromIterator<KvObject> for KvMap {
    fn from_iter<T: IntoIterator<Item = KvObject>>(iter: T) -> Self {
        let mut map = KvMap::new();
        for node in iter {
            map.insert(node);
        }
        map
    }
}
