//! Column-driven JSON encoding for `SELECT *` results.
//!
//! Tables behind the read endpoints are passed through without per-table
//! structs, so every value is encoded from its runtime storage class:
//! integers stay integers, reals and decimals become floats, text stays text.
//! Date-time text in the engine's `YYYY-MM-DD HH:MM:SS` form is rewritten to
//! ISO-8601 when the column is declared as a date-time.

use chrono::NaiveDateTime;
use serde_json::{Map, Number, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// Encode one row as a JSON object keyed by column name.
pub fn row_to_json(row: &SqliteRow) -> Result<Value, sqlx::Error> {
    let mut object = Map::with_capacity(row.len());
    for column in row.columns() {
        let idx = column.ordinal();
        let raw = row.try_get_raw(idx)?;
        let value = if raw.is_null() {
            Value::Null
        } else {
            let storage = raw.type_info();
            match storage.name() {
                "INTEGER" | "INT" | "INT8" | "BIGINT" | "BOOLEAN" => {
                    Value::from(row.try_get_unchecked::<i64, _>(idx)?)
                }
                "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => {
                    float_value(row.try_get_unchecked::<f64, _>(idx)?)
                }
                "BLOB" => {
                    let bytes = row.try_get_unchecked::<Vec<u8>, _>(idx)?;
                    Value::String(String::from_utf8_lossy(&bytes).into_owned())
                }
                _ => text_value(
                    column.type_info().name(),
                    row.try_get_unchecked::<String, _>(idx)?,
                ),
            }
        };
        object.insert(column.name().to_string(), value);
    }
    Ok(Value::Object(object))
}

/// NaN and infinities have no JSON form.
fn float_value(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

fn text_value(declared: &str, text: String) -> Value {
    if matches!(declared, "DATETIME" | "TIMESTAMP") {
        if let Some(iso) = iso_datetime(&text) {
            return Value::String(iso);
        }
    }
    Value::String(text)
}

fn iso_datetime(text: &str) -> Option<String> {
    let parsed = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f").ok()?;
    Some(parsed.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
}
