use textgram::{value, Atom, Number, Value, ValueMap};

#[test]
fn test_value_macro_scalars() {
    assert_eq!(value!(null), Value::Atom(Atom::Null));
    assert_eq!(value!(false), Value::Atom(Atom::Bool(false)));
    assert_eq!(value!(3.5), Value::Atom(Atom::Number(Number::Float(3.5))));
    assert_eq!(value!(-123), Value::Atom(Atom::Number(Number::Integer(-123))));
    assert_eq!(value!("text"), Value::from("text"));
}

#[test]
fn test_value_macro_keeps_key_order() {
    let doc = value!({
        "zeta": 1,
        "alpha": { "inner": [true, null] },
        "mid": []
    });
    let keys: Vec<&String> = doc.as_map().unwrap().keys().collect();
    assert_eq!(keys, ["zeta", "alpha", "mid"]);
    assert_eq!(
        doc.pointer(&["alpha", "inner"]),
        Some(&Value::List(vec![Value::from(true), value!(null)]))
    );
    assert_eq!(doc.pointer(&["mid"]).and_then(Value::as_list).map(Vec::len), Some(0));
}

#[test]
fn test_infer_scalars() {
    assert_eq!(Value::infer("null"), value!(null));
    assert_eq!(Value::infer("False"), Value::from(false));
    assert_eq!(Value::infer("-42").as_i64(), Some(-42));
    assert_eq!(Value::infer("1.5e3"), Value::from(1500.0));
    assert_eq!(Value::infer("007").as_str(), Some("007"));
    assert_eq!(Value::infer("1.2.3").as_str(), Some("1.2.3"));
    assert_eq!(Value::infer("localhost").as_str(), Some("localhost"));
}

#[test]
fn test_infer_big_integers_and_dates() {
    let big = Value::infer("123456789012345678901234567890");
    assert!(matches!(big, Value::Atom(Atom::BigInt(_))));
    assert_eq!(big.to_string(), "123456789012345678901234567890");

    let date = Value::infer("2024-01-15T10:30:00Z");
    assert!(date.as_atom().is_some_and(Atom::is_date));
}

#[test]
fn test_literal_never_interprets() {
    assert_eq!(Value::literal("true").as_str(), Some("true"));
    assert_eq!(Value::literal("12").as_str(), Some("12"));
}

#[test]
fn test_pointer_misses() {
    let doc = value!({ "a": { "b": 1 } });
    assert_eq!(doc.pointer(&[]), Some(&doc));
    assert_eq!(doc.pointer(&["a", "c"]), None);
    assert_eq!(doc.pointer(&["a", "b", "c"]), None);
}

#[test]
fn test_value_map_insert_replaces() {
    let mut map = ValueMap::new();
    assert_eq!(map.insert("k".to_string(), Value::from(1)), None);
    assert_eq!(map.insert("k".to_string(), Value::from(2)), Some(Value::from(1)));
    assert_eq!(map.len(), 1);
    assert!(map.contains_key("k"));
}

#[test]
fn test_value_serializes_to_json() {
    let doc = value!({ "n": 1, "list": ["x", 2.5], "none": null });
    assert_eq!(
        serde_json::to_string(&doc).unwrap(),
        r#"{"n":1,"list":["x",2.5],"none":null}"#
    );
}
