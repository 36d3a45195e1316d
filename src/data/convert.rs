// Value conversion and coercion helpers
// Author: Gabriel Demetrios Lafis

use serde_json::{Map, Value as JsonValue};

use crate::utils::{format_date, parse_date, PipelineError, PipelineResult};

use super::{Record, Value};

/// Convert a JSON value to a pipeline value
pub fn json_to_value(json: &JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Boolean(*b),
        JsonValue::Number(n) => {
            if n.is_i64() {
                Value::Integer(n.as_i64().unwrap())
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        },
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Array(items) => {
            let values: Vec<Value> = items.iter().map(json_to_value).collect();
            Value::Array(values)
        },
        JsonValue::Object(fields) => {
            let mut record = Record::new();
            for (name, value) in fields {
                record.set(name, json_to_value(value));
            }
            Value::Record(record)
        },
    }
}

/// Convert a pipeline value to a JSON value
///
/// Absent converts to JSON null when it cannot be omitted; record
/// serialization omits absent fields before reaching this point.
pub fn value_to_json(value: &Value) -> PipelineResult<JsonValue> {
    match value {
        Value::Absent => Ok(JsonValue::Null),
        Value::Null => Ok(JsonValue::Null),
        Value::Boolean(b) => Ok(JsonValue::Bool(*b)),
        Value::Integer(i) => Ok(JsonValue::Number((*i).into())),
        Value::Float(f) => {
            match serde_json::Number::from_f64(*f) {
                Some(number) => Ok(JsonValue::Number(number)),
                None => Ok(JsonValue::Null),
            }
        },
        Value::String(s) => Ok(JsonValue::String(s.clone())),
        Value::Date(d) => Ok(JsonValue::String(d.format("%Y-%m-%dT%H:%M:%S").to_string())),
        Value::Array(items) => {
            let mut array = Vec::new();
            for item in items {
                array.push(value_to_json(item)?);
            }
            Ok(JsonValue::Array(array))
        },
        Value::Record(record) => {
            let mut object = Map::new();
            for (name, field) in record.iter() {
                if !field.is_absent() {
                    object.insert(name.clone(), value_to_json(field)?);
                }
            }
            Ok(JsonValue::Object(object))
        },
        Value::Series(_) | Value::Frame(_) => Err(PipelineError::TypeMismatch(
            format!("cannot serialize a nested {} to JSON", value.type_name())
        )),
    }
}

/// Parse a string value into an integer value
///
/// Absent passes through, the empty string becomes absent, and a
/// non-string input is a type mismatch.
pub fn parse_int_value(value: &Value) -> PipelineResult<Value> {
    match value {
        Value::Absent => Ok(Value::Absent),
        Value::String(s) if s.trim().is_empty() => Ok(Value::Absent),
        Value::String(s) => {
            s.trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|err| PipelineError::ParseError(
                    format!("cannot parse '{}' as an integer: {}", s, err)
                ))
        },
        other => Err(PipelineError::TypeMismatch(
            format!("parse_ints expects string values, got {}", other.type_name())
        )),
    }
}

/// Parse a string value into a float value
pub fn parse_float_value(value: &Value) -> PipelineResult<Value> {
    match value {
        Value::Absent => Ok(Value::Absent),
        Value::String(s) if s.trim().is_empty() => Ok(Value::Absent),
        Value::String(s) => {
            s.trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|err| PipelineError::ParseError(
                    format!("cannot parse '{}' as a float: {}", s, err)
                ))
        },
        other => Err(PipelineError::TypeMismatch(
            format!("parse_floats expects string values, got {}", other.type_name())
        )),
    }
}

/// Parse a string value into a date value using an explicit format
pub fn parse_date_value(value: &Value, format: &str) -> PipelineResult<Value> {
    match value {
        Value::Absent => Ok(Value::Absent),
        Value::String(s) if s.trim().is_empty() => Ok(Value::Absent),
        Value::String(s) => parse_date(s.trim(), format).map(Value::Date),
        other => Err(PipelineError::TypeMismatch(
            format!("parse_dates expects string values, got {}", other.type_name())
        )),
    }
}

/// Format a value into a string value
///
/// Absent and null pass through unchanged. Dates require an explicit
/// format string; everything else uses its plain rendering.
pub fn format_string_value(value: &Value, format: Option<&str>) -> PipelineResult<Value> {
    match value {
        Value::Absent => Ok(Value::Absent),
        Value::Null => Ok(Value::Null),
        Value::Date(d) => {
            match format {
                Some(fmt) => Ok(Value::String(format_date(d, fmt))),
                None => Err(PipelineError::InvalidArgument(
                    "formatting a date requires an explicit format string".to_string()
                )),
            }
        },
        other => Ok(Value::String(other.display_string())),
    }
}
