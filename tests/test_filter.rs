mod common;
use common::{records, texts};
use dealer_console_core::filter::{apply_filters, derive_options, FilterField, FilterState};
use dealer_console_core::{ConsoleError, FieldValue, Record};
use serde_json::json;

fn inventory() -> Vec<Record> {
    records(vec![
        json!({"id": 1, "brand": "Toyota", "fuel": "Petrol", "color": "Red"}),
        json!({"id": 2, "brand": "Honda", "fuel": "Diesel", "color": "Red"}),
        json!({"id": 3, "brand": "Toyota", "fuel": "Diesel", "color": "Blue"}),
        json!({"id": 4, "brand": "BMW", "fuel": "Petrol", "color": ""}),
        json!({"id": 5, "brand": "Toyota", "fuel": "Petrol"}),
    ])
}

fn declaration() -> Vec<FilterField> {
    vec![
        FilterField::new("brand", "Brand"),
        FilterField::new("fuel", "Fuel"),
        FilterField::new("color", "Color"),
    ]
}

#[test]
fn test_derive_options_distinct_sorted_non_empty() {
    let options = derive_options(&inventory(), &declaration());
    assert_eq!(options.len(), 3);

    let brand = &options[0];
    assert_eq!(brand.field, "brand");
    assert_eq!(brand.label, "Brand");
    let labels: Vec<&str> = brand.options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["BMW", "Honda", "Toyota"]);
    assert!(brand
        .options
        .iter()
        .all(|o| o.value == FieldValue::from(o.label.as_str())));

    let colors: Vec<&str> = options[2].options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(colors, vec!["Blue", "Red"]);
}

#[test]
/// REQ-FLT-003
fn test_filter_req_flt_003_options_ignore_filter_state() -> anyhow::Result<()> {
    let data = inventory();
    let options = derive_options(&data, &declaration());
    let mut state = FilterState::new();
    state.select("brand", FieldValue::from("Honda"), &options)?;

    // Options come from the whole snapshot, not from the projection.
    let projection = apply_filters(&data, &state);
    assert_eq!(projection.len(), 1);
    let again = derive_options(&data, &declaration());
    assert_eq!(again, options);
    assert_eq!(again[1].options.len(), 2);
    Ok(())
}

#[test]
fn test_derive_options_keeps_number_and_text_apart() {
    let data = records(vec![
        json!({"year": 2020}),
        json!({"year": "2020"}),
        json!({"year": 2019}),
        json!({"year": 2020}),
    ]);
    let options = derive_options(&data, &[FilterField::new("year", "Year")]);
    let values: Vec<FieldValue> = options[0].options.iter().map(|o| o.value.clone()).collect();
    assert_eq!(
        values,
        vec![
            FieldValue::from(2019),
            FieldValue::from(2020),
            FieldValue::from("2020")
        ]
    );
}

#[test]
fn test_empty_state_returns_full_snapshot() {
    let data = inventory();
    let state = FilterState::new();
    assert!(!state.is_active());
    assert_eq!(apply_filters(&data, &state), data);
}

#[test]
/// REQ-FLT-001
fn test_filter_req_flt_001_reset_restores_full_snapshot() -> anyhow::Result<()> {
    let data = inventory();
    let options = derive_options(&data, &declaration());
    let mut state = FilterState::new();
    state.select("brand", FieldValue::from("Toyota"), &options)?;
    state.select("fuel", FieldValue::from("Petrol"), &options)?;
    assert!(state.is_active());

    state.reset();
    assert!(!state.is_active());
    assert_eq!(apply_filters(&data, &state), data);
    Ok(())
}

#[test]
/// REQ-FLT-002
fn test_filter_req_flt_002_conjunctive_filters_equal_intersection() -> anyhow::Result<()> {
    let data = inventory();
    let options = derive_options(&data, &declaration());

    let mut brand_only = FilterState::new();
    brand_only.select("brand", FieldValue::from("Toyota"), &options)?;
    let mut fuel_only = FilterState::new();
    fuel_only.select("fuel", FieldValue::from("Petrol"), &options)?;
    let mut both = brand_only.clone();
    both.select("fuel", FieldValue::from("Petrol"), &options)?;

    let by_brand = apply_filters(&data, &brand_only);
    let by_fuel = apply_filters(&data, &fuel_only);
    let intersection: Vec<Record> = by_brand
        .into_iter()
        .filter(|r| by_fuel.contains(r))
        .collect();

    let combined = apply_filters(&data, &both);
    assert_eq!(combined, intersection);
    assert_eq!(texts(&combined, "id"), vec!["1", "5"]);
    Ok(())
}

#[test]
fn test_select_rejects_values_outside_option_set() {
    let data = inventory();
    let options = derive_options(&data, &declaration());
    let mut state = FilterState::new();

    let err = state
        .select("brand", FieldValue::from("Tesla"), &options)
        .unwrap_err();
    assert!(matches!(err, ConsoleError::InvalidFilter { .. }));

    let err = state
        .select("price", FieldValue::from("10"), &options)
        .unwrap_err();
    assert!(matches!(err, ConsoleError::InvalidFilter { .. }));
    assert!(!state.is_active());
}

#[test]
fn test_select_empty_value_clears_field() -> anyhow::Result<()> {
    let options = derive_options(&inventory(), &declaration());
    let mut state = FilterState::new();
    state.select("brand", FieldValue::from("BMW"), &options)?;
    state.select("brand", FieldValue::from(""), &options)?;
    assert!(state.get("brand").is_none());
    Ok(())
}

#[test]
fn test_retain_valid_drops_vanished_values() -> anyhow::Result<()> {
    let options = derive_options(&inventory(), &declaration());
    let mut state = FilterState::new();
    state.select("brand", FieldValue::from("BMW"), &options)?;
    state.select("fuel", FieldValue::from("Diesel"), &options)?;

    let shrunk = records(vec![json!({"brand": "Toyota", "fuel": "Diesel"})]);
    let new_options = derive_options(&shrunk, &declaration());
    let dropped = state.retain_valid(&new_options);

    assert_eq!(dropped, vec!["brand".to_string()]);
    assert_eq!(state.get("fuel"), Some(&FieldValue::from("Diesel")));
    Ok(())
}
