//! Tests for the JSON projection and the round-trippable serialized form.

use tidepool::{Collection, Key, Value};

use super::helpers::*;

// ===== JSON PROJECTION =====

#[test]
fn test_json_dense_map_is_array() {
    let json = ints(&[3, 2, 1]).to_json_string().unwrap();
    assert_eq!(json, "[3,2,1]");
}

#[test]
fn test_json_sparse_or_keyed_map_is_object() {
    let keyed = Collection::from_pairs([
        (Key::from("name"), Value::from("alice")),
        (Key::Int(0), Value::Int(1)),
    ]);
    let parsed: serde_json::Value = serde_json::from_str(&keyed.to_json_string().unwrap()).unwrap();

    assert_eq!(parsed["name"], "alice");
    assert_eq!(parsed["0"], 1);

    // Dense integer keys out of order still serialize as an object.
    let sparse = Collection::from_pairs([(Key::Int(1), Value::Int(1))]);
    let parsed: serde_json::Value =
        serde_json::from_str(&sparse.to_json_string().unwrap()).unwrap();
    assert!(parsed.is_object());
}

#[test]
fn test_json_round_trip_matches_projection() {
    let collection = Collection::from_pairs([
        (Key::from("a"), Value::Int(1)),
        (Key::from("b"), Value::List(vec![Value::Int(2), Value::Bool(true)])),
    ]);

    let parsed: serde_json::Value =
        serde_json::from_str(&collection.to_json_string().unwrap()).unwrap();
    assert_eq!(parsed, collection.to_json());
}

#[test]
fn test_json_nested_shapes() {
    let chunked = ints(&[1, 2, 3]).chunk(2, false).unwrap();
    assert_eq!(chunked.to_json_string().unwrap(), "[[1,2],[3]]");

    let grouped = ints(&[1, 2, 3]).chunk(2, true).unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&grouped.to_json_string().unwrap()).unwrap();
    // Preserved keys make the second group sparse, so it projects as an object.
    assert_eq!(parsed[0], serde_json::json!([1, 2]));
    assert_eq!(parsed[1], serde_json::json!({"2": 3}));
}

#[test]
fn test_json_empty_collection() {
    assert_eq!(Collection::default().to_json_string().unwrap(), "[]");
}

// ===== SERIALIZED ROUND-TRIP =====

#[test]
fn test_serialized_round_trip_preserves_everything() {
    let collection = Collection::from_pairs([
        (Key::from("Name"), Value::from("alice")),
        (Key::Int(5), Value::Float(2.5)),
        (Key::from("flags"), Value::List(vec![Value::Bool(true), Value::Null])),
        (
            Key::Int(0),
            Value::Map(record(&[("nested", Value::Int(1))])),
        ),
    ]);

    let serialized = collection.to_serialized().unwrap();
    let restored = Collection::from_serialized(&serialized).unwrap();

    // Key types, value types, and entry order all survive.
    assert_eq!(restored, collection);
    assert_eq!(keys_of(&restored), keys_of(&collection));
}

#[test]
fn test_serialized_distinguishes_int_and_text_keys() {
    let collection = Collection::from_pairs([
        (Key::Int(1), Value::from("int-keyed")),
        (Key::from("1"), Value::from("text-keyed")),
    ]);

    let restored =
        Collection::from_serialized(&collection.to_serialized().unwrap()).unwrap();

    assert_eq!(
        restored.as_map().get(&Key::Int(1)),
        Some(&Value::Text("int-keyed".to_string()))
    );
    assert_eq!(
        restored.as_map().get(&Key::from("1")),
        Some(&Value::Text("text-keyed".to_string()))
    );
}

#[test]
fn test_serialized_round_trip_after_transformation_chain() {
    let collection = ints(&[4, 3, 2, 1])
        .reverse()
        .chunk(3, true)
        .unwrap()
        .push(Value::from("tail"));

    let restored =
        Collection::from_serialized(&collection.to_serialized().unwrap()).unwrap();
    assert_eq!(restored, collection);
}

#[test]
fn test_from_serialized_rejects_malformed_input() {
    let err = Collection::from_serialized("not json at all").unwrap_err();
    assert!(err.is_deserialization_error());

    let err = Collection::from_serialized(r#"{"shape": "wrong"}"#).unwrap_err();
    assert!(err.is_deserialization_error());
}

#[test]
fn test_from_serialized_rejects_duplicate_keys() {
    let duplicated = r#"[[{"Int":0},{"Int":1}],[{"Int":0},{"Int":2}]]"#;
    let err = Collection::from_serialized(duplicated).unwrap_err();
    assert!(err.is_deserialization_error());
}
