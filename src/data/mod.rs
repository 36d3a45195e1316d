// Data module for the dynamic value model
// Author: Gabriel Demetrios Lafis

mod convert;
mod record;

pub use convert::*;
pub use record::*;

use std::cmp::Ordering;

use chrono::NaiveDateTime;

use crate::frame::DataFrame;
use crate::series::Series;

/// Represents a dynamic value carried by a pipeline
///
/// `Absent` is the sentinel for a missing value and is filtered by the
/// value materializers; `Null` is an explicit data value and is not.
#[derive(Debug, Clone)]
pub enum Value {
    Absent,
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Date(NaiveDateTime),
    Array(Vec<Value>),
    Record(Record),
    Series(Series),
    Frame(DataFrame),
}

impl Value {
    /// Check whether this value is the absent sentinel
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Get the name of this value's type
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Array(_) => "array",
            Value::Record(_) => "record",
            Value::Series(_) => "series",
            Value::Frame(_) => "frame",
        }
    }

    /// Get this value as a float, if it is numeric
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Render this value as a plain display string
    ///
    /// Used for CSV cells and pivot column names. Absent and null render
    /// as the empty string.
    pub fn display_string(&self) -> String {
        match self {
            Value::Absent => String::new(),
            Value::Null => String::new(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::Date(d) => d.format("%Y-%m-%d %H:%M:%S").to_string(),
            Value::Array(_) => "[array]".to_string(),
            Value::Record(_) => "[record]".to_string(),
            Value::Series(_) => "[series]".to_string(),
            Value::Frame(_) => "[frame]".to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Absent, Value::Absent) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Integer(a), Value::Float(b)) => (*a as f64) == *b,
            (Value::Float(a), Value::Integer(b)) => *a == (*b as f64),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Series(a), Value::Series(b)) => a.same_pipeline(b),
            (Value::Frame(a), Value::Frame(b)) => a.same_pipeline(b),
            _ => false,
        }
    }
}

/// Rank of a value's type class, used to order values of unlike types
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Absent => 0,
        Value::Null => 1,
        Value::Boolean(_) => 2,
        Value::Integer(_) => 3,
        Value::Float(_) => 3,
        Value::String(_) => 4,
        Value::Date(_) => 5,
        Value::Array(_) => 6,
        Value::Record(_) => 7,
        Value::Series(_) => 8,
        Value::Frame(_) => 9,
    }
}

/// Compare two values for ordering
///
/// Absent orders before null, null before everything else. Integers and
/// floats compare numerically across types. Values of unlike types order
/// by type class so that sorting mixed data stays deterministic.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Boolean(x), Value::Boolean(y)) => x.cmp(y),
        (Value::Integer(x), Value::Integer(y)) => x.cmp(y),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Value::Integer(x), Value::Float(y)) => {
            (*x as f64).partial_cmp(y).unwrap_or(Ordering::Equal)
        },
        (Value::Float(x), Value::Integer(y)) => {
            x.partial_cmp(&(*y as f64)).unwrap_or(Ordering::Equal)
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Date(x), Value::Date(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
