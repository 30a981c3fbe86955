//! Conversions between `serde_json::Value` and GraphQL const values.
//!
//! Runtime data (resolver results, argument maps, enum member values,
//! default values) lives in `serde_json::Value`; the schema AST and the
//! execution engine speak `async_graphql::Value`. These conversions are
//! total in the engine-to-JSON direction and fail only for JSON-side
//! values with no GraphQL representation.

use async_graphql::indexmap::IndexMap;
use async_graphql::{Name, Number, Value};
use serde_json::Value as JsonValue;

use crate::error::SchemaError;

/// Converts a JSON value to a GraphQL const value, for default values in
/// the schema AST and for resolver output.
///
/// # Errors
///
/// Returns [`SchemaError::UnrepresentableValue`] for numbers outside the
/// GraphQL value space (non-finite floats).
pub fn json_to_const_value(value: &JsonValue) -> Result<Value, SchemaError> {
    match value {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Boolean(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| SchemaError::UnrepresentableValue {
                        value: n.to_string(),
                    })
            } else {
                Err(SchemaError::UnrepresentableValue {
                    value: n.to_string(),
                })
            }
        }
        JsonValue::String(s) => Ok(Value::String(s.clone())),
        JsonValue::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(json_to_const_value(item)?);
            }
            Ok(Value::List(values))
        }
        JsonValue::Object(fields) => {
            let mut map = IndexMap::new();
            for (key, val) in fields {
                map.insert(Name::new(key), json_to_const_value(val)?);
            }
            Ok(Value::Object(map))
        }
    }
}

/// Converts a GraphQL const value to its untyped JSON representation.
///
/// Enum values become their name string, mirroring how query literals
/// are read without type information.
pub fn const_value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::Number(n) => JsonValue::Number(n.clone()),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Enum(name) => JsonValue::String(name.to_string()),
        Value::List(items) => JsonValue::Array(items.iter().map(const_value_to_json).collect()),
        Value::Object(fields) => JsonValue::Object(
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), const_value_to_json(v)))
                .collect(),
        ),
        Value::Binary(bytes) => {
            JsonValue::Array(bytes.iter().map(|b| JsonValue::from(*b)).collect())
        }
    }
}
