//! In-memory joins by foreign key

use crate::domain::RawRow;
use serde_json::Value;
use std::collections::HashMap;

/// Comparable form of a key column
///
/// Integer and string keys compare equal when their text matches, so a
/// `bigint` id joins with a `varchar` foreign key.
pub fn join_key(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Group rows by the value of `key`, keeping their order
///
/// Rows without a usable key are dropped.
pub fn group_by_key(rows: Vec<RawRow>, key: &str) -> HashMap<String, Vec<RawRow>> {
    let mut groups: HashMap<String, Vec<RawRow>> = HashMap::new();
    for row in rows {
        if let Some(k) = row.get(key).and_then(join_key) {
            groups.entry(k).or_default().push(row);
        }
    }
    groups
}

/// Collect `value_column` of child rows under their parent key
///
/// A child with a `null` value still registers as an entry so that the
/// placeholder-stripping step sees the same shape a grouped join produces.
pub fn collect_child_values(
    rows: Vec<RawRow>,
    foreign_key: &str,
    value_column: &str,
) -> HashMap<String, Vec<Value>> {
    let mut values: HashMap<String, Vec<Value>> = HashMap::new();
    for mut row in rows {
        if let Some(k) = row.get(foreign_key).and_then(join_key) {
            let value = row.remove(value_column).unwrap_or(Value::Null);
            values.entry(k).or_default().push(value);
        }
    }
    values
}

/// Nest child rows under their parent as an array named `nest_key`
///
/// Every parent gets the key, empty when nothing matched. Children whose
/// foreign key matches no parent are dropped.
pub fn nest_children(
    parents: Vec<RawRow>,
    children: Vec<RawRow>,
    foreign_key: &str,
    nest_key: &str,
) -> Vec<RawRow> {
    let mut by_parent = group_by_key(children, foreign_key);
    parents
        .into_iter()
        .map(|mut parent| {
            let nested = parent
                .get("id")
                .and_then(join_key)
                .and_then(|id| by_parent.remove(&id))
                .unwrap_or_default();
            parent.insert(
                nest_key.to_string(),
                Value::Array(nested.into_iter().map(Value::Object).collect()),
            );
            parent
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(value: Value) -> Vec<RawRow> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_join_key_normalizes_numbers_and_strings() {
        assert_eq!(join_key(&json!(12)), Some("12".to_string()));
        assert_eq!(join_key(&json!(" 12 ")), Some("12".to_string()));
        assert_eq!(join_key(&Value::Null), None);
    }

    #[test]
    fn test_nest_children() {
        let counties = rows(json!([
            { "id": 1, "name": "Nairobi" },
            { "id": 2, "name": "Mombasa" }
        ]));
        let sub_counties = rows(json!([
            { "id": 10, "name": "Westlands", "county_id": 1 },
            { "id": 11, "name": "Langata", "county_id": 1 },
            { "id": 12, "name": "Orphan", "county_id": 99 }
        ]));

        let nested = nest_children(counties, sub_counties, "county_id", "subcounties");
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0]["subcounties"].as_array().unwrap().len(), 2);
        assert_eq!(nested[0]["subcounties"][1]["name"], json!("Langata"));
        assert_eq!(nested[1]["subcounties"], json!([]));
    }

    #[test]
    fn test_collect_child_values_keeps_null_entries() {
        let children = rows(json!([
            { "case_id": 1, "nature_of_violence_id": 3 },
            { "case_id": 1, "nature_of_violence_id": null },
            { "case_id": 1, "nature_of_violence_id": 5 },
            { "case_id": 2, "nature_of_violence_id": 4 }
        ]));

        let values = collect_child_values(children, "case_id", "nature_of_violence_id");
        assert_eq!(values["1"], vec![json!(3), Value::Null, json!(5)]);
        assert_eq!(values["2"], vec![json!(4)]);
    }
}
