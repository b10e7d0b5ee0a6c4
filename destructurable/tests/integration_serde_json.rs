//! Tests for rendering destructured trees as JSON.

#![cfg(feature = "json")]

use destructurable::{DestructuringPolicy, Entity, MaskingOptions, StructuredValue};
use serde_json::json;

#[derive(Clone, Entity)]
struct EmployeeAddRequest {
    pub first_name: String,
    pub passport: String,
    pub phones: Vec<String>,
    pub manager_id: Option<u64>,
}

fn request() -> EmployeeAddRequest {
    EmployeeAddRequest {
        first_name: "Ann".into(),
        passport: "123456".into(),
        phones: vec!["555-0100".into()],
        manager_id: None,
    }
}

fn policy() -> DestructuringPolicy {
    DestructuringPolicy::builder()
        .entity::<EmployeeAddRequest>(|e| {
            e.field("passport")
                .mask_with(MaskingOptions::new().with_mask_length(6))
                .alias("passport_number");
            e.field("phones").mask();
        })
        .build()
        .unwrap()
}

#[test]
fn type_tag_is_emitted_first() {
    let json = serde_json::to_string(&policy().destructure(&request())).unwrap();
    assert!(json.starts_with(r#"{"$type":"EmployeeAddRequest","#));
}

#[test]
fn serialize_matches_to_json() {
    let tree = policy().destructure(&request());
    let expected = json!({
        "$type": "EmployeeAddRequest",
        "first_name": "Ann",
        "passport_number": "******",
        "phones": ["**********"],
        "manager_id": null,
    });
    assert_eq!(tree.to_json(), expected);
    assert_eq!(serde_json::to_value(&tree).unwrap(), expected);
}

#[test]
fn untagged_structures_have_no_type_key() {
    let policy = DestructuringPolicy::builder()
        .omit_type_tag(true)
        .ignore_null_fields(true)
        .build()
        .unwrap();
    assert_eq!(
        policy.destructure(&request()).to_json(),
        json!({ "first_name": "Ann", "passport": "123456", "phones": ["555-0100"] })
    );
}

#[test]
fn snapshots_serialize_as_text() {
    let policy = DestructuringPolicy::builder()
        .entity::<EmployeeAddRequest>(|e| {
            e.field("phones").as_scalar(false);
        })
        .build()
        .unwrap();
    let tree = policy.destructure(&request());
    assert_eq!(tree.to_json()["phones"], json!("[555-0100]"));
}

#[test]
fn non_finite_floats_become_null() {
    let tree = DestructuringPolicy::default().destructure(&f64::NAN);
    assert_eq!(tree.to_json(), serde_json::Value::Null);
    assert_eq!(StructuredValue::NULL.to_json(), serde_json::Value::Null);
}
