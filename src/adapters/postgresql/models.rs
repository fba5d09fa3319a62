//! Row decoding
//!
//! Converts `tokio_postgres` rows into JSON objects keyed by output column
//! name, choosing the Rust type to decode from the column's PostgreSQL type.

use crate::domain::{RawRow, Result, SyncError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Number, Value};
use tokio_postgres::types::Type;
use tokio_postgres::Row;

/// Decode every column of a row
///
/// # Errors
///
/// Returns [`SyncError::QueryFailure`] if a column has a type this decoder
/// does not support or its value cannot be read.
pub fn row_to_json(row: &Row) -> Result<RawRow> {
    let mut object = RawRow::new();
    for (index, column) in row.columns().iter().enumerate() {
        let value = column_to_json(row, index, column.type_()).map_err(|e| {
            SyncError::QueryFailure(format!(
                "Failed to decode column '{}' ({}): {}",
                column.name(),
                column.type_(),
                e
            ))
        })?;
        object.insert(column.name().to_string(), value);
    }
    Ok(object)
}

fn column_to_json(
    row: &Row,
    index: usize,
    pg_type: &Type,
) -> std::result::Result<Value, Box<dyn std::error::Error + Sync + Send>> {
    let value = match *pg_type {
        Type::BOOL => row.try_get::<_, Option<bool>>(index)?.map(Value::Bool),
        Type::INT2 => row
            .try_get::<_, Option<i16>>(index)?
            .map(|i| Value::from(i64::from(i))),
        Type::INT4 => row
            .try_get::<_, Option<i32>>(index)?
            .map(|i| Value::from(i64::from(i))),
        Type::INT8 => row.try_get::<_, Option<i64>>(index)?.map(Value::from),
        Type::FLOAT4 => row
            .try_get::<_, Option<f32>>(index)?
            .map(|f| float_to_json(f64::from(f))),
        Type::FLOAT8 => row.try_get::<_, Option<f64>>(index)?.map(float_to_json),
        Type::NUMERIC => row
            .try_get::<_, Option<Decimal>>(index)?
            .map(decimal_to_json),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => {
            row.try_get::<_, Option<String>>(index)?.map(Value::String)
        }
        Type::TIMESTAMP => row
            .try_get::<_, Option<NaiveDateTime>>(index)?
            .map(|ts| timestamp_to_json(DateTime::<Utc>::from_naive_utc_and_offset(ts, Utc))),
        Type::TIMESTAMPTZ => row
            .try_get::<_, Option<DateTime<Utc>>>(index)?
            .map(timestamp_to_json),
        Type::DATE => row
            .try_get::<_, Option<NaiveDate>>(index)?
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string())),
        Type::TIME => row
            .try_get::<_, Option<NaiveTime>>(index)?
            .map(|t| Value::String(t.to_string())),
        Type::JSON | Type::JSONB => row.try_get::<_, Option<Value>>(index)?,
        Type::UUID => row
            .try_get::<_, Option<uuid::Uuid>>(index)?
            .map(|u| Value::String(u.to_string())),
        Type::INT4_ARRAY => row
            .try_get::<_, Option<Vec<Option<i32>>>>(index)?
            .map(|items| {
                Value::Array(
                    items
                        .into_iter()
                        .map(|i| i.map_or(Value::Null, |i| Value::from(i64::from(i))))
                        .collect(),
                )
            }),
        Type::INT8_ARRAY => row
            .try_get::<_, Option<Vec<Option<i64>>>>(index)?
            .map(|items| {
                Value::Array(
                    items
                        .into_iter()
                        .map(|i| i.map_or(Value::Null, Value::from))
                        .collect(),
                )
            }),
        Type::TEXT_ARRAY | Type::VARCHAR_ARRAY => row
            .try_get::<_, Option<Vec<Option<String>>>>(index)?
            .map(|items| {
                Value::Array(
                    items
                        .into_iter()
                        .map(|s| s.map_or(Value::Null, Value::String))
                        .collect(),
                )
            }),
        _ => return Err(format!("unsupported column type {pg_type}").into()),
    };

    Ok(value.unwrap_or(Value::Null))
}

fn float_to_json(f: f64) -> Value {
    Number::from_f64(f).map_or(Value::Null, Value::Number)
}

/// Decimals become JSON numbers when they fit in an f64, strings otherwise
fn decimal_to_json(decimal: Decimal) -> Value {
    match decimal.to_f64().and_then(Number::from_f64) {
        Some(number) => Value::Number(number),
        None => Value::String(decimal.to_string()),
    }
}

fn timestamp_to_json(ts: DateTime<Utc>) -> Value {
    Value::String(ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn test_decimal_to_json() {
        let lat = Decimal::from_str("-1.25").unwrap();
        assert_eq!(decimal_to_json(lat), serde_json::json!(-1.25));
    }

    #[test]
    fn test_float_nan_is_null() {
        assert_eq!(float_to_json(f64::NAN), Value::Null);
        assert_eq!(float_to_json(36.8219), serde_json::json!(36.8219));
    }

    #[test]
    fn test_timestamp_to_json() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(
            timestamp_to_json(ts),
            Value::String("2024-03-01T09:30:00.000Z".to_string())
        );
    }
}
