//! Normalization rules applied between extraction and upload

use incident_sync::core::catalog::tables::{BOOLEAN_FLAGS, CASE_FOREIGN_KEY};
use incident_sync::core::normalize::{
    coerce_flag, nest_children, normalize_entity_row, normalize_incident, normalize_incidents,
    strip_null_placeholders,
};
use incident_sync::domain::{RawIncident, RawRow};
use serde_json::{json, Value};
use test_case::test_case;

fn row(value: Value) -> RawRow {
    serde_json::from_value(value).unwrap()
}

fn rows(value: Value) -> Vec<RawRow> {
    serde_json::from_value(value).unwrap()
}

#[test_case(Some(json!("yes")), true ; "affirmative token")]
#[test_case(Some(json!("no")), false ; "negative token")]
#[test_case(Some(json!("Yes")), false ; "token match is exact")]
#[test_case(Some(json!("")), false ; "empty string")]
#[test_case(Some(json!(true)), true ; "already coerced true")]
#[test_case(Some(json!(false)), false ; "already coerced false")]
#[test_case(Some(json!(1)), false ; "numeric one")]
#[test_case(Some(Value::Null), false ; "null column")]
#[test_case(None, false ; "absent column")]
fn test_coerce_flag(raw: Option<Value>, expected: bool) {
    assert_eq!(coerce_flag(raw.as_ref()), expected);
}

#[test_case(json!([3, null, 5]), json!([3, 5]) ; "placeholder in the middle")]
#[test_case(json!([null]), json!([]) ; "single placeholder for no children")]
#[test_case(json!([]), json!([]) ; "empty collection")]
#[test_case(json!(["a", null, "b", null]), json!(["a", "b"]) ; "string ids")]
fn test_strip_null_placeholders(raw: Value, expected: Value) {
    let values = serde_json::from_value(raw).unwrap();
    assert_eq!(Value::Array(strip_null_placeholders(values)), expected);
}

#[test]
fn test_normalize_incident_coerces_every_flag() {
    let raw = RawIncident::new(row(json!({
        "id": 1,
        "client_safe": "yes",
        "gbv_related_case": "no",
        "status": "open"
    })))
    .with_collection("nature_of_violences", vec![json!(3), Value::Null, json!(5)]);

    let record = normalize_incident(raw, &BOOLEAN_FLAGS);

    assert_eq!(record.flag("client_safe"), Some(true));
    assert_eq!(record.flag("gbv_related_case"), Some(false));
    for flag in BOOLEAN_FLAGS {
        assert!(record.flag(flag).is_some(), "{flag} not coerced");
    }
    assert_eq!(record.fields["status"], json!("open"));
    assert_eq!(record.collection("nature_of_violences"), &[json!(3), json!(5)]);
}

#[test]
fn test_normalize_is_idempotent() {
    let raw = RawIncident::new(row(json!({ "id": 1, "client_safe": "yes" })))
        .with_collection("survivor_statuses", vec![Value::Null]);

    let once = normalize_incident(raw, &BOOLEAN_FLAGS);
    let again = normalize_incident(
        RawIncident {
            row: once.fields.clone(),
            collections: once.collections.clone(),
        },
        &BOOLEAN_FLAGS,
    );

    assert_eq!(once, again);
}

#[test]
fn test_survivors_attach_by_case_id() {
    let incidents = vec![
        RawIncident::new(row(json!({ "id": 1 }))),
        RawIncident::new(row(json!({ "id": "2" }))),
    ];
    let survivors = rows(json!([
        { "case_id": 2, "gender": "F" },
        { "case_id": 1, "gender": "M" },
        { "case_id": 2, "gender": "M" },
        { "case_id": 99, "gender": "F" }
    ]));

    let records = normalize_incidents(incidents, survivors, &BOOLEAN_FLAGS, CASE_FOREIGN_KEY);

    assert_eq!(records[0].survivors.len(), 1);
    assert_eq!(records[1].survivors.len(), 2);
    assert_eq!(records[1].survivors[0]["gender"], json!("F"));
}

#[test]
fn test_entity_rows_lose_null_array_entries_only() {
    let normalized = normalize_entity_row(row(json!({
        "id": 4,
        "name": null,
        "tags": [null, "x"]
    })));

    assert_eq!(normalized["name"], Value::Null);
    assert_eq!(normalized["tags"], json!(["x"]));
}

#[test]
fn test_counties_nest_sub_counties() {
    let counties = rows(json!([
        { "id": 47, "name": "Nairobi" },
        { "id": 1, "name": "Mombasa" }
    ]));
    let sub_counties = rows(json!([
        { "id": 10, "name": "Westlands", "county_id": 47 },
        { "id": 11, "name": "Langata", "county_id": "47" },
        { "id": 12, "name": "Orphan", "county_id": 3 }
    ]));

    let nested = nest_children(counties, sub_counties, "county_id", "subcounties");

    assert_eq!(nested[0]["subcounties"].as_array().unwrap().len(), 2);
    assert_eq!(nested[1]["subcounties"], json!([]));
}
