//! Dynamically shaped result rows.
//!
//! The songs table is consumed read-only and its shape is not known at
//! compile time; columns are discovered from each query result.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use sqlx::{postgres::PgRow, Column, Row, TypeInfo, ValueRef};
use time::format_description::well_known::Rfc3339;
use tracing::debug;

/// One result row as an ordered field-name/value mapping.
///
/// Serializes as a JSON object whose keys keep the query's column order.
#[derive(Debug, Clone, PartialEq)]
pub struct DynRow(pub Vec<(String, Value)>);

impl DynRow {
    pub fn from_pg_row(row: &PgRow) -> Self {
        let fields = row
            .columns()
            .iter()
            .map(|col| {
                let value = decode_cell(row, col.ordinal(), col.type_info().name());
                (col.name().to_string(), value)
            })
            .collect();
        DynRow(fields)
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for DynRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

fn decode_cell(row: &PgRow, idx: usize, ty: &str) -> Value {
    match row.try_get_raw(idx) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(_) => {}
        Err(_) => return Value::Null,
    }

    match ty {
        "BOOL" => row
            .try_get::<bool, _>(idx)
            .map(Value::Bool)
            .unwrap_or(Value::Null),
        "INT2" => row
            .try_get::<i16, _>(idx)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "INT4" => row
            .try_get::<i32, _>(idx)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "INT8" => row
            .try_get::<i64, _>(idx)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "FLOAT4" => row
            .try_get::<f32, _>(idx)
            .map(|v| Value::from(v as f64))
            .unwrap_or(Value::Null),
        "FLOAT8" => row
            .try_get::<f64, _>(idx)
            .map(Value::from)
            .unwrap_or(Value::Null),
        // NUMERIC keeps full precision by rendering as a string.
        "NUMERIC" => row
            .try_get::<sqlx::types::Decimal, _>(idx)
            .map(|v| Value::String(v.to_string()))
            .unwrap_or(Value::Null),
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" => row
            .try_get::<String, _>(idx)
            .map(Value::String)
            .unwrap_or(Value::Null),
        "UUID" => row
            .try_get::<uuid::Uuid, _>(idx)
            .map(|v| Value::String(v.to_string()))
            .unwrap_or(Value::Null),
        "TIMESTAMPTZ" => row
            .try_get::<time::OffsetDateTime, _>(idx)
            .ok()
            .and_then(|v| v.format(&Rfc3339).ok())
            .map(Value::String)
            .unwrap_or(Value::Null),
        "TIMESTAMP" => row
            .try_get::<time::PrimitiveDateTime, _>(idx)
            .ok()
            .and_then(|v| v.assume_utc().format(&Rfc3339).ok())
            .map(Value::String)
            .unwrap_or(Value::Null),
        "DATE" => row
            .try_get::<time::Date, _>(idx)
            .map(|v| Value::String(v.to_string()))
            .unwrap_or(Value::Null),
        "TIME" => row
            .try_get::<time::Time, _>(idx)
            .map(|v| Value::String(v.to_string()))
            .unwrap_or(Value::Null),
        "JSON" | "JSONB" => row.try_get::<Value, _>(idx).unwrap_or(Value::Null),
        other => {
            // Last resort: many one-off Postgres types decode as text.
            match row.try_get::<String, _>(idx) {
                Ok(v) => Value::String(v),
                Err(_) => {
                    debug!(column_type = other, "undecodable column type");
                    Value::Null
                }
            }
        }
    }
}
