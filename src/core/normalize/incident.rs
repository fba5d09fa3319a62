//! Incident normalization

use super::hierarchy::{group_by_key, join_key};
use crate::core::catalog::tables::AFFIRMATIVE_TOKEN;
use crate::domain::{IncidentRecord, RawIncident, RawRow};
use serde_json::Value;

/// Drop `null` entries from a child collection
pub fn strip_null_placeholders(values: Vec<Value>) -> Vec<Value> {
    values.into_iter().filter(|v| !v.is_null()).collect()
}

/// Coerce a raw flag value into a boolean
///
/// Only the affirmative token and `true` itself map to `true`; everything
/// else, including an absent column, is `false`. Accepting `true` makes the
/// coercion idempotent.
///
/// # Examples
///
/// ```
/// use incident_sync::core::normalize::coerce_flag;
/// use serde_json::json;
///
/// assert!(coerce_flag(Some(&json!("yes"))));
/// assert!(!coerce_flag(Some(&json!("no"))));
/// assert!(!coerce_flag(None));
/// ```
pub fn coerce_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => s == AFFIRMATIVE_TOKEN,
        Some(Value::Bool(b)) => *b,
        _ => false,
    }
}

/// Normalize one incident without survivors attached
pub fn normalize_incident(raw: RawIncident, flags: &[&str]) -> IncidentRecord {
    let RawIncident {
        mut row,
        collections,
    } = raw;

    for flag in flags {
        let coerced = coerce_flag(row.get(*flag));
        row.insert((*flag).to_string(), Value::Bool(coerced));
    }

    IncidentRecord {
        fields: row,
        collections: collections
            .into_iter()
            .map(|(name, values)| (name, strip_null_placeholders(values)))
            .collect(),
        survivors: Vec::new(),
    }
}

/// Attach survivor rows to the incident whose `id` equals their `foreign_key`
///
/// Survivors with no matching incident are dropped.
pub fn attach_survivors(records: &mut [IncidentRecord], survivors: Vec<RawRow>, foreign_key: &str) {
    let mut by_case = group_by_key(survivors, foreign_key);
    for record in records.iter_mut() {
        if let Some(matched) = record
            .fields
            .get("id")
            .and_then(join_key)
            .and_then(|id| by_case.remove(&id))
        {
            record.survivors.extend(matched);
        }
    }
}

/// Normalize a page of incidents and attach their survivors
pub fn normalize_incidents(
    raw: Vec<RawIncident>,
    survivors: Vec<RawRow>,
    flags: &[&str],
    foreign_key: &str,
) -> Vec<IncidentRecord> {
    let mut records: Vec<IncidentRecord> = raw
        .into_iter()
        .map(|incident| normalize_incident(incident, flags))
        .collect();
    attach_survivors(&mut records, survivors, foreign_key);
    records
}

/// Strip nulls from any array-valued column of a generic entity row
pub fn normalize_entity_row(mut row: RawRow) -> RawRow {
    for value in row.values_mut() {
        if let Value::Array(items) = value {
            let stripped = strip_null_placeholders(std::mem::take(items));
            *items = stripped;
        }
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> RawRow {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_strip_null_placeholders() {
        assert_eq!(
            strip_null_placeholders(vec![json!(3), Value::Null, json!(5)]),
            vec![json!(3), json!(5)]
        );
        assert!(strip_null_placeholders(vec![Value::Null]).is_empty());
    }

    #[test]
    fn test_coerce_flag_values() {
        assert!(coerce_flag(Some(&json!("yes"))));
        assert!(coerce_flag(Some(&json!(true))));
        assert!(!coerce_flag(Some(&json!("Yes"))));
        assert!(!coerce_flag(Some(&json!("no"))));
        assert!(!coerce_flag(Some(&json!(1))));
        assert!(!coerce_flag(Some(&Value::Null)));
        assert!(!coerce_flag(None));
    }

    #[test]
    fn test_normalize_incident_sets_absent_flags() {
        let raw = RawIncident::new(row(json!({ "id": 7, "client_safe": "yes" })))
            .with_collection("nature_of_violences", vec![json!(3), Value::Null, json!(5)]);

        let record = normalize_incident(raw, &["client_safe", "client_referred"]);
        assert_eq!(record.flag("client_safe"), Some(true));
        assert_eq!(record.flag("client_referred"), Some(false));
        assert_eq!(
            record.collection("nature_of_violences"),
            &[json!(3), json!(5)]
        );
    }

    #[test]
    fn test_attach_survivors_by_case_id() {
        let mut records = vec![
            normalize_incident(RawIncident::new(row(json!({ "id": 1 }))), &[]),
            normalize_incident(RawIncident::new(row(json!({ "id": 2 }))), &[]),
        ];
        let survivors = vec![
            row(json!({ "case_id": 2, "gender": "F" })),
            row(json!({ "case_id": "2", "gender": "M" })),
            row(json!({ "case_id": 9, "gender": "F" })),
        ];

        attach_survivors(&mut records, survivors, "case_id");
        assert!(records[0].survivors.is_empty());
        assert_eq!(records[1].survivors.len(), 2);
    }

    #[test]
    fn test_normalize_entity_row_strips_array_nulls() {
        let normalized = normalize_entity_row(row(json!({
            "id": 1,
            "tags": [Value::Null, "a"],
            "name": Value::Null
        })));
        assert_eq!(normalized["tags"], json!(["a"]));
        assert_eq!(normalized["name"], Value::Null);
    }
}
