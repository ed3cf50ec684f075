/// Builds a [`KvObject`](crate::KvObject) tree.
///
/// `name => { ... }` makes a container, `name => value` a leaf holding
/// anything convertible into [`KvValue`](crate::KvValue). Negative numbers
/// and other multi-token values go in parentheses.
///
/// ```rust
/// use keyvalues::{kv, KvObject};
///
/// let tree = kv!("Root" => {
///     "A" => "1",
///     "B" => {
///         "C" => 2,
///         "D" => (-3i64),
///     },
/// });
///
/// let expected = KvObject::with_children("Root", [
///     KvObject::new("A", "1"),
///     KvObject::with_children("B", [KvObject::new("C", 2), KvObject::new("D", -3i64)]),
/// ]);
/// assert_eq!(tree, expected);
/// ```
#[macro_export]
macro_rules! kv {
    ($name:expr => { $($key:tt => $value:tt),* $(,)? }) => {{
        let children: ::std::vec::Vec<$crate::KvObject> =
            ::std::vec![$($crate::kv!($key => $value)),*];
        $crate::KvObject::with_children($name, children)
    }};

    ($name:expr => $value:expr) => {
        $crate::KvObject::new($name, $value)
    };
}

#[cfg(test)]
mod tests {
    use crate::{KvObject, KvValue};

    #[test]
    fn test_kv_macro_leaf() {
        assert_eq!(kv!("a" => "x").value(), &KvValue::from("x"));
        assert_eq!(kv!("a" => 5u64).value(), &KvValue::UInt64(5));
    }

    #[test]
    fn test_kv_macro_empty_container() {
        let node = kv!("a" => {});
        assert_eq!(node, KvObject::new_container("a"));
        assert!(node.children().unwrap().is_empty());
    }

    #[test]
    fn test_kv_macro_nested() {
        let node = kv!("R" => { "x" => { "y" => 1.5f32 }, "z" => true });
        let x = node.get_child("x").unwrap().unwrap();
        assert_eq!(x.get_child("y").unwrap().unwrap().value(), &KvValue::Float32(1.5));
        assert_eq!(node.get_child("z").unwrap().unwrap().value(), &KvValue::Int32(1));
    }
}
