use dealer_console_core::{FieldValue, Record};
use serde_json::json;

#[test]
fn test_record_from_json_keeps_field_kinds() -> anyhow::Result<()> {
    let record = Record::from_json(json!({
        "id": 12,
        "name": "Sale 12",
        "price": 1500.25,
        "paid": false,
        "note": null,
        "tags": ["a", "b"]
    }))?;

    assert_eq!(record.get("id"), &FieldValue::Number(12.0));
    assert_eq!(record.get("paid"), &FieldValue::Bool(false));
    assert!(record.get("note").is_absent());
    assert!(!record.has("note"));
    assert_eq!(record.get("tags").display(), r#"["a","b"]"#);
    assert!(record.get("missing").is_absent());

    let back = record.to_json();
    assert_eq!(back["id"], json!(12));
    assert_eq!(back["price"], json!(1500.25));

    assert!(Record::from_json(json!([1, 2])).is_err());
    Ok(())
}

#[test]
fn test_setting_absent_removes_field() {
    let mut record = Record::new().with("name", "Car").with("color", "red");
    record.set("color", FieldValue::Absent);
    assert_eq!(record.len(), 1);
    assert!(!record.has("color"));

    record.set("name", "");
    assert!(!record.has("name"));
    assert_eq!(record.len(), 1);
}

#[test]
fn test_display_and_numbers() {
    assert_eq!(FieldValue::from(2024).display(), "2024");
    assert_eq!(FieldValue::from(7.5).display(), "7.5");
    assert_eq!(FieldValue::from(true).display(), "true");
    assert_eq!(FieldValue::Absent.display(), "");
    assert_eq!(FieldValue::from(" 42 ").as_number(), Some(42.0));
    assert_eq!(FieldValue::from("42a").as_number(), None);
}

#[test]
fn test_loose_equality() {
    assert!(FieldValue::from(3).loosely_equals(&FieldValue::from("3")));
    assert!(FieldValue::from("3.0").loosely_equals(&FieldValue::from(3)));
    assert!(FieldValue::from("Kia").loosely_equals(&FieldValue::from("Kia")));
    assert!(!FieldValue::from("Kia").loosely_equals(&FieldValue::from("kia")));
    assert!(!FieldValue::Absent.loosely_equals(&FieldValue::Absent));
    assert!(!FieldValue::from("").loosely_equals(&FieldValue::from("")));
}

#[test]
/// REQ-REC-001
fn test_record_req_rec_001_deserialized_record_matches_from_json() -> anyhow::Result<()> {
    let value = json!({"id": 1, "x": null, "name": "Car"});
    let loaded: Record = serde_json::from_value(value.clone())?;
    let built = Record::from_json(value)?;

    assert_eq!(loaded, built);
    assert_eq!(loaded.len(), 2);
    assert!(loaded.fields().all(|(_, v)| !v.is_absent()));

    let bytes = br#"{"id": "a", "image": null}"#;
    let parsed: Record = serde_json::from_slice(bytes)?;
    assert_eq!(parsed.len(), 1);
    assert!(serde_json::from_value::<Record>(json!([1])).is_err());
    Ok(())
}

