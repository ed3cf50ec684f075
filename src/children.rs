//! Dictionary-style view over a container's children.
//!
//! [`KvChildren`] borrows a container and exposes its children as
//! name → value pairs. It holds no state of its own: every call reads or
//! writes the underlying node directly.
//!
//! ```rust
//! use keyvalues::{KvObject, KvValue};
//!
//! let mut root = KvObject::new_container("Root");
//! {
//!     let mut view = root.children_view().unwrap();
//!     view.add("A", "1");
//!     view.add("B", 2);
//!     view.add("A", "3");
//!     assert_eq!(view.len(), 2);
//! }
//! assert_eq!(root.get_child("A").unwrap().unwrap().value(), &KvValue::from("3"));
//! ```

use crate::{KvChildMut, KvMap, KvObject, KvValue};

/// A live name → value view over one container's children.
pub struct KvChildren<'a> {
    map: &'a mut KvMap,
}

impl<'a> KvChildren<'a> {
    pub(crate) fn new(map: &'a mut KvMap) -> Self {
        KvChildren { map }
    }

    /// Adds a child, overwriting the value of an existing child with the
    /// same name.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<KvValue>) {
        self.map.insert(KvObject::new(name, value));
    }

    /// Removes the named child, returning whether anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.map.remove(name).is_some()
    }

    /// Returns the value of the named child.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&KvValue> {
        self.map.get(name).map(KvObject::value)
    }

    /// Returns the value of the named child, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut KvValue> {
        self.map.get_mut(name).map(KvChildMut::into_value_mut)
    }

    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Returns `true` if the named child holds `value`.
    ///
    /// This is a shallow check: scalars must be the same variant with the
    /// same value, and container values never match. It is weaker than
    /// comparing whole nodes with `==`, which walks subtrees.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyvalues::{KvObject, KvValue};
    ///
    /// let mut root = KvObject::with_children("R", [
    ///     KvObject::new("a", 1),
    ///     KvObject::new_container("b"),
    /// ]);
    /// let view = root.children_view().unwrap();
    /// assert!(view.contains("a", &KvValue::Int32(1)));
    /// assert!(!view.contains("a", &KvValue::from("1")));
    /// assert!(!view.contains("b", &KvValue::default()));
    /// ```
    #[must_use]
    pub fn contains(&self, name: &str, value: &KvValue) -> bool {
        match self.get(name) {
            Some(KvValue::Children(_)) | None => false,
            Some(stored) => stored == value,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Removes every child.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.map.names()
    }

    pub fn values(&self) -> impl Iterator<Item = &KvValue> + '_ {
        self.map.iter().map(KvObject::value)
    }

    /// Iterates name → value pairs in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.map.iter(),
        }
    }
}

/// Iterator over a [`KvChildren`] view.
pub struct Iter<'b> {
    inner: indexmap::map::Values<'b, String, KvObject>,
}

impl<'b> Iterator for Iter<'b> {
    type Item = (&'b str, &'b KvValue);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|child| (child.name(), child.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'b> IntoIterator for &'b KvChildren<'_> {
    type Item = (&'b str, &'b KvValue);
    type IntoIter = Iter<'b>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> KvObject {
        KvObject::with_children(
            "Root",
            [
                KvObject::new("A", "1"),
                KvObject::new("B", 2),
                KvObject::new("C", 3u64),
            ],
        )
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let mut root = root();
        let view = root.children_view().unwrap();
        let pairs: Vec<_> = view.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("A", &KvValue::from("1")),
                ("B", &KvValue::Int32(2)),
                ("C", &KvValue::UInt64(3)),
            ]
        );
        assert_eq!(view.iter().len(), 3);
    }

    #[test]
    fn test_mutations_reach_node() {
        let mut root = root();
        {
            let mut view = root.children_view().unwrap();
            assert!(view.remove("B"));
            assert!(!view.remove("B"));
            view.add("D", 4i64);
            *view.get_mut("A").unwrap() = KvValue::from("changed");
        }
        let names: Vec<_> = root.children().unwrap().names().collect();
        assert_eq!(names, vec!["A", "C", "D"]);
        assert_eq!(root.get_child("A").unwrap().unwrap().as_string().unwrap(), "changed");
    }

    #[test]
    fn test_node_mutations_visible_in_new_view() {
        let mut root = root();
        root.set_child(KvObject::new("E", "5")).unwrap();
        let view = root.children_view().unwrap();
        assert!(view.contains_key("E"));
        assert_eq!(view.get("E"), Some(&KvValue::from("5")));
        assert_eq!(view.keys().last(), Some("E"));
    }

    #[test]
    fn test_clear() {
        let mut root = root();
        root.children_view().unwrap().clear();
        assert!(root.children().unwrap().is_empty());
    }
}
