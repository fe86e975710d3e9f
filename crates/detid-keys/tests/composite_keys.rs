//! Integration test: composite keys over dynamic JSON records.
//!
//! Mirrors how `detid key` drives the builder: records are JSON objects,
//! selectors look fields up by name, and both key kinds must be stable
//! across field insertion order.

use detid_keys::{combine, AttributeValue, KeySchema, TextKeyBuilder, ToAttribute, UuidKeyBuilder};
use proptest::prelude::*;
use serde_json::{json, Value};
use uuid::Uuid;

fn schema(names: &[&str]) -> KeySchema<Value> {
    names.iter().fold(KeySchema::new("Record"), |schema, name| {
        let field = name.to_string();
        schema.select(name.to_string(), move |record: &Value| {
            record.get(&field).map_or(AttributeValue::Null, ToAttribute::to_attribute)
        })
    })
}

#[test]
fn test_field_order_in_record_does_not_matter() {
    let a: Value = serde_json::from_str(r#"{"id": 1, "name": "x"}"#).unwrap();
    let b: Value = serde_json::from_str(r#"{"name": "x", "id": 1}"#).unwrap();
    let schema = schema(&["id", "name"]);
    assert_eq!(
        TextKeyBuilder::new().build(&a, &schema).unwrap(),
        TextKeyBuilder::new().build(&b, &schema).unwrap()
    );
    assert_eq!(
        UuidKeyBuilder::new().build(&a, &schema).unwrap(),
        UuidKeyBuilder::new().build(&b, &schema).unwrap()
    );
}

#[test]
fn test_missing_field_is_null() {
    let record = json!({"id": 1});
    let key = TextKeyBuilder::new().build(&record, &schema(&["id", "name"])).unwrap();
    assert_eq!(key, "{Record:{id:1}}{Record:{name:null}}");
}

#[test]
fn test_nested_object_is_rejected() {
    let record = json!({"id": 1, "owner": {"name": "x"}});
    let err = UuidKeyBuilder::new().build(&record, &schema(&["owner"])).unwrap_err();
    assert!(err.to_string().contains("owner"));
    assert!(err.to_string().contains("JSON object"));
}

#[test]
fn test_binary_multi_instance_unwinds() {
    let records = [json!({"id": 1}), json!({"id": 2})];
    let schema = schema(&["id"]);
    let builder = UuidKeyBuilder::new();
    let first = builder.build(&records[0], &schema).unwrap();
    let second = builder.build(&records[1], &schema).unwrap();
    let many = builder.build_many(records.iter().map(Some), &schema).unwrap();
    assert_eq!(many, combine::fold([first, second]));
    assert_eq!(combine::separate(many, second), first);
}

#[test]
fn test_string_zero_is_not_null() {
    let schema = schema(&["v"]);
    let builder = UuidKeyBuilder::new();
    let null = builder.build(&json!({"v": null}), &schema).unwrap();
    let zero = builder.build(&json!({"v": "0"}), &schema).unwrap();
    let number = builder.build(&json!({"v": 0}), &schema).unwrap();
    assert_eq!(null, Uuid::nil());
    assert_ne!(zero, null);
    assert_ne!(zero, number);
}

proptest! {
    #[test]
    fn keys_are_deterministic(id in any::<i64>(), name in ".{0,16}") {
        let record = json!({"id": id, "name": name});
        let schema = schema(&["id", "name"]);
        let text = TextKeyBuilder::new();
        let binary = UuidKeyBuilder::new();
        prop_assert_eq!(
            text.build(&record, &schema).unwrap(),
            text.build(&record.clone(), &schema).unwrap()
        );
        prop_assert_eq!(
            binary.build(&record, &schema).unwrap(),
            binary.build(&record.clone(), &schema).unwrap()
        );
    }

    #[test]
    fn distinct_ids_give_distinct_text_keys(a in any::<i64>(), b in any::<i64>()) {
        prop_assume!(a != b);
        let schema = schema(&["id"]);
        let text = TextKeyBuilder::new();
        prop_assert_ne!(
            text.build(&json!({"id": a}), &schema).unwrap(),
            text.build(&json!({"id": b}), &schema).unwrap()
        );
    }
}
