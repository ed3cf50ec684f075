use keyvalues::{binary, from_str, kv, to_string, Error, KvObject, KvValue};

const SAMPLE: &str = "\"Root\"\n{\n\t\"A\" \"1\"\n\t\"B\"\n\t{\n\t\t\"C\" \"2\"\n\t}\n}";

fn sample() -> KvObject {
    from_str(SAMPLE).unwrap()
}

#[test]
fn test_decode_sample_document() {
    let root = sample();
    assert_eq!(root.name(), "Root");

    let a = root.get_child("A").unwrap().unwrap();
    assert_eq!(a.value(), &KvValue::String("1".to_string()));

    let b = root.get_child("B").unwrap().unwrap();
    assert!(b.has_children());
    let c = b.get_child("C").unwrap().unwrap();
    assert_eq!(c.value(), &KvValue::String("2".to_string()));

    let names: Vec<_> = root.children().unwrap().names().collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn test_text_reserialize_roundtrip() {
    let root = sample();
    let text = to_string(&root).unwrap();
    println!("Reserialized:\n{}", text);
    let back = from_str(&text).unwrap();
    assert_eq!(back, root);
    assert_eq!(back.name(), "Root");
}

#[test]
fn test_binary_roundtrip_without_table() {
    let root = sample();
    let bytes = binary::to_vec(&root).unwrap();
    let back = binary::from_slice(&bytes).unwrap();
    assert!(back.equals(&root, true));
    assert_eq!(back.name(), "Root");
}

#[test]
fn test_binary_roundtrip_with_table() {
    let root = sample();
    let (bytes, table) = binary::to_vec_with_string_table(&root).unwrap();
    assert_eq!(table, vec!["Root", "A", "B", "C"]);

    let back = binary::from_slice_with_string_table(&bytes, &table).unwrap();
    assert_eq!(back, root);
    assert_eq!(back.name(), "Root");
}

#[test]
fn test_set_child_twice_keeps_one_entry() {
    let mut root = KvObject::new_container("Root");
    root.set_child(KvObject::new("A", "1")).unwrap();
    root.set_child(KvObject::new("B", "x")).unwrap();
    root.set_child(KvObject::new("A", "2")).unwrap();

    let children = root.children().unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children.names().collect::<Vec<_>>(), vec!["A", "B"]);
    assert_eq!(
        root.get_child("A").unwrap().unwrap().as_string().unwrap(),
        "2"
    );
}

fn nested(depth: usize) -> KvObject {
    let mut node = KvObject::new_container(format!("level{}", depth));
    for level in (1..depth).rev() {
        node = KvObject::with_child(format!("level{}", level), node);
    }
    node
}

#[test]
fn test_depth_guard() {
    assert!(to_string(&nested(100)).is_ok());

    match to_string(&nested(101)) {
        Err(Error::DepthLimitExceeded { path, limit }) => {
            assert_eq!(limit, 100);
            assert!(path.starts_with("level1/level2/"));
            assert!(path.ends_with("/level101"));
        }
        other => panic!("expected depth error, got {:?}", other),
    }
}

#[test]
fn test_binary_has_no_depth_limit() {
    let tree = nested(150);
    let bytes = binary::to_vec(&tree).unwrap();
    assert_eq!(binary::from_slice(&bytes).unwrap(), tree);
}

#[test]
fn test_typed_leaves_through_both_codecs() {
    let tree = kv!("Game" => {
        "title" => "Half-Life",
        "year" => 1998,
        "players" => 32u64,
        "offset" => (-7i64),
        "gravity" => 800.5f32,
        "multiplayer" => true,
        "max_u32" => (u32::MAX),
    });

    let back = binary::from_slice(&binary::to_vec(&tree).unwrap()).unwrap();
    assert_eq!(back, tree);

    let back = from_str(&to_string(&tree).unwrap()).unwrap();
    assert_ne!(back, tree);
    assert!(back.equals(&tree, false));
    assert_eq!(back.get_child("year").unwrap().unwrap().as_i32().unwrap(), 1998);
    assert_eq!(back.get_child("players").unwrap().unwrap().as_u64().unwrap(), 32);
    assert_eq!(back.get_child("offset").unwrap().unwrap().as_i64().unwrap(), -7);
    assert_eq!(back.get_child("gravity").unwrap().unwrap().as_f32().unwrap(), 800.5);
    assert!(back.get_child("multiplayer").unwrap().unwrap().as_bool().unwrap());
    assert_eq!(
        back.get_child("max_u32").unwrap().unwrap().as_u32().unwrap(),
        u32::MAX
    );
}

#[test]
fn test_children_view_is_live() {
    let mut root = sample();
    {
        let mut view = root.children_view().unwrap();
        view.add("D", 4);
        assert!(view.remove("A"));
        assert!(view.contains("D", &KvValue::Int32(4)));
    }
    assert!(!root.has_child("A").unwrap());
    assert_eq!(root.get_child("D").unwrap().unwrap().as_i32().unwrap(), 4);

    root.set_child(KvObject::new("E", "e")).unwrap();
    let view = root.children_view().unwrap();
    let keys: Vec<_> = view.keys().collect();
    assert_eq!(keys, vec!["B", "D", "E"]);
}

#[test]
fn test_clone_is_independent() {
    let original = sample();
    let mut copy = original.clone();
    assert_eq!(copy, original);

    copy.get_child_mut("B")
        .unwrap()
        .unwrap()
        .set_child(KvObject::new("C", "changed"))
        .unwrap();
    copy.remove_child("A").unwrap();

    assert_ne!(copy, original);
    assert!(original.has_child("A").unwrap());
    let c = original
        .get_child("B")
        .unwrap()
        .unwrap()
        .get_child("C")
        .unwrap()
        .unwrap();
    assert_eq!(c.as_string().unwrap(), "2");
}

#[test]
fn test_mutable_handles_keep_names_unique() {
    let mut root = sample();

    {
        let mut a = root.get_child_mut("A").unwrap().unwrap();
        a.set_value(KvObject::new("Z", "from A").into_value());
        assert_eq!(a.name(), "A");
    }
    {
        let mut b = root.get_or_insert_child("B").unwrap();
        b.set_child(KvObject::new("D", 4)).unwrap();
        assert_eq!(b.name(), "B");
    }
    for mut child in root.children_mut().unwrap().iter_mut() {
        if let KvValue::String(text) = child.value_mut() {
            text.push('!');
        }
    }
    assert_eq!(root.get_child("A").unwrap().unwrap().as_string().unwrap(), "from A!");
    if let Some(mut b) = root.children_mut().unwrap().get_mut("B") {
        b.get_or_insert_child("C").unwrap().set_i32(3, true).unwrap();
    }
    *root.children_view().unwrap().get_mut("A").unwrap() = KvValue::from("via view");

    let names: Vec<_> = root.children().unwrap().names().collect();
    assert_eq!(names, vec!["A", "B"]);
    for (key, child) in root.children().unwrap().names().zip(root.children().unwrap()) {
        assert_eq!(key, child.name());
    }

    root.set_child(KvObject::new("Z", "new")).unwrap();
    assert_eq!(root.children().unwrap().len(), 3);
    assert_eq!(root.get_child("A").unwrap().unwrap().as_string().unwrap(), "via view");

    assert!(from_str(&to_string(&root).unwrap()).unwrap().equals(&root, false));
    assert_eq!(binary::from_slice(&binary::to_vec(&root).unwrap()).unwrap(), root);
}

#[test]
fn test_equality_ignores_child_order_and_root_name() {
    let a = KvObject::with_children("X", [KvObject::new("p", "1"), KvObject::new("q", "2")]);
    let b = KvObject::with_children("Y", [KvObject::new("q", "2"), KvObject::new("p", "1")]);
    assert_eq!(a, b);
    assert_eq!(b, a);
    assert_eq!(a, a.clone());
}

#[test]
fn test_leaf_rejects_child_operations() {
    let mut leaf = KvObject::new("leaf", "v");
    assert_eq!(
        leaf.set_child(KvObject::new("x", 1)).unwrap_err(),
        Error::NotAContainer {
            name: "leaf".to_string()
        }
    );
    assert!(leaf.get_child("x").is_err());
    assert!(leaf.children_view().is_err());
}

#[test]
fn test_serde_json_bridge() {
    let tree = kv!("Root" => {
        "name" => "value",
        "count" => 3,
        "inner" => { "ratio" => 0.5f32 },
    });

    let json = serde_json::to_string(&tree).unwrap();
    assert_eq!(
        json,
        r#"{"Root":{"name":"value","count":3,"inner":{"ratio":0.5}}}"#
    );

    let back: KvObject = serde_json::from_str(&json).unwrap();
    assert_eq!(back.name(), "Root");
    assert_eq!(back, tree);
}

#[test]
fn test_serde_json_trailing_entries_become_children() {
    let back: KvObject = serde_json::from_str(r#"{"Root":{"a":"1"},"b":2}"#).unwrap();
    assert_eq!(back.name(), "Root");
    let names: Vec<_> = back.children().unwrap().names().collect();
    assert_eq!(names, vec!["a", "b"]);
}
