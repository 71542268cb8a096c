//! Loosely-typed input accepted from format adapters.
//!
//! Adapters hand the core whatever their source format produced: labels as one
//! string or as a list of arbitrary scalars, and onset/offset arrays that may be
//! nested one level (a single row or a single column). The types here carry that
//! input unchanged until reconciliation resolves it into typed columns.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SequenceError};

/// A single onset or offset value supplied to [`Segment::from_keyword`](crate::Segment::from_keyword).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    /// An integral value, as used for sample indices.
    Int(i64),
    /// An integral value above `i64::MAX`.
    UInt(u64),
    /// A floating-point value, as used for seconds.
    Float(f64),
}

impl Number {
    /// Name of the numeric kind, used in error messages.
    pub const fn kind(self) -> &'static str {
        match self {
            Self::Int(_) | Self::UInt(_) => "integer",
            Self::Float(_) => "floating-point",
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Labels as supplied by an adapter.
///
/// A single string is exploded into one label per character; a list is
/// converted element-wise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, expecting = "labels as a string or a list of label values")]
pub enum Labels {
    /// One undifferentiated string, e.g. `"abc"` for three syllables.
    Text(String),
    /// One item per segment. Strings, numbers and booleans are accepted.
    Items(Vec<Value>),
}

impl Labels {
    /// Resolves the labels into one string per segment.
    pub fn normalize(&self) -> Result<Vec<String>> {
        match self {
            Self::Text(text) => Ok(text.chars().map(String::from).collect()),
            Self::Items(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::String(s) => Ok(s.clone()),
                    Value::Number(n) => Ok(n.to_string()),
                    Value::Bool(b) => Ok(b.to_string()),
                    other => Err(SequenceError::LabelConversion {
                        index,
                        found: value_kind(other),
                    }),
                })
                .collect(),
        }
    }
}

impl From<&str> for Labels {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Labels {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<String>> for Labels {
    fn from(items: Vec<String>) -> Self {
        Self::Items(items.into_iter().map(Value::String).collect())
    }
}

impl From<Vec<&str>> for Labels {
    fn from(items: Vec<&str>) -> Self {
        Self::Items(items.into_iter().map(Value::from).collect())
    }
}

impl From<Vec<Value>> for Labels {
    fn from(items: Vec<Value>) -> Self {
        Self::Items(items)
    }
}

/// An onset or offset array as supplied by an adapter.
///
/// The array is held as JSON so that shape and element kind can be checked,
/// and reported, during reconciliation rather than at the adapter boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArrayInput(Value);

impl ArrayInput {
    /// Collapses the array to one dimension.
    ///
    /// Accepts a flat array, a single row (`[[a, b, c]]`) or a single column
    /// (`[[a], [b], [c]]`).
    fn flatten(&self, field: &'static str) -> Result<Vec<&Value>> {
        let shape_error = || SequenceError::Shape {
            field,
            shape: describe_shape(&self.0),
        };

        let Value::Array(items) = &self.0 else {
            return Err(shape_error());
        };

        if items.iter().all(|item| !item.is_array()) {
            return Ok(items.iter().collect());
        }

        let rows: Vec<&Vec<Value>> = items.iter().filter_map(Value::as_array).collect();
        if rows.len() != items.len() {
            return Err(shape_error());
        }

        match rows.as_slice() {
            [row] if row.iter().all(|v| !v.is_array()) => Ok(row.iter().collect()),
            _ if rows.iter().all(|row| row.len() == 1 && !row[0].is_array()) => {
                Ok(rows.iter().map(|row| &row[0]).collect())
            }
            _ => Err(shape_error()),
        }
    }

    /// Resolves the array into sample indices.
    ///
    /// Any floating-point element gives the whole array a floating-point kind,
    /// which is rejected for sample units.
    pub(crate) fn to_samples(&self, field: &'static str) -> Result<Vec<u64>> {
        let numbers = numeric_elements(self.flatten(field)?, field, "integer")?;
        if numbers.iter().any(|n| n.is_f64()) {
            return Err(SequenceError::TypeMismatch {
                field,
                expected: "integer",
                found: "floating-point".to_string(),
            });
        }

        numbers
            .iter()
            .enumerate()
            .map(|(index, n)| {
                n.as_u64().ok_or_else(|| SequenceError::OutOfRange {
                    field,
                    index: Some(index),
                    value: n.to_string(),
                })
            })
            .collect()
    }

    /// Resolves the array into seconds.
    ///
    /// An array made only of integers has integer kind and is rejected; a
    /// mix of integers and floats is promoted to floating-point.
    pub(crate) fn to_seconds(&self, field: &'static str) -> Result<Vec<f64>> {
        let numbers = numeric_elements(self.flatten(field)?, field, "floating-point")?;
        if !numbers.is_empty() && !numbers.iter().any(|n| n.is_f64()) {
            return Err(SequenceError::TypeMismatch {
                field,
                expected: "floating-point",
                found: "integer".to_string(),
            });
        }

        numbers
            .iter()
            .enumerate()
            .map(|(index, n)| {
                n.as_f64()
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .ok_or_else(|| SequenceError::OutOfRange {
                        field,
                        index: Some(index),
                        value: n.to_string(),
                    })
            })
            .collect()
    }
}

impl From<Value> for ArrayInput {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for ArrayInput {
    fn from(values: Vec<T>) -> Self {
        Self(Value::from(values))
    }
}

impl<T: Clone + Into<Value>> From<&[T]> for ArrayInput {
    fn from(values: &[T]) -> Self {
        Self(Value::from(values))
    }
}

fn numeric_elements<'a>(
    elements: Vec<&'a Value>,
    field: &'static str,
    expected: &'static str,
) -> Result<Vec<&'a serde_json::Number>> {
    elements
        .into_iter()
        .map(|element| match element {
            Value::Number(n) => Ok(n),
            other => Err(SequenceError::TypeMismatch {
                field,
                expected,
                found: value_kind(other).to_string(),
            }),
        })
        .collect()
}

/// Name of a JSON value's kind, used in error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "floating-point",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Describes the shape of a value by following its first elements, e.g. `(2, 3)`.
fn describe_shape(value: &Value) -> String {
    let mut dims = Vec::new();
    let mut current = value;
    while let Value::Array(items) = current {
        dims.push(items.len().to_string());
        match items.first() {
            Some(first) => current = first,
            None => break,
        }
    }
    match dims.as_slice() {
        [] => format!("() ({})", value_kind(value)),
        [single] => format!("({single},)"),
        _ => format!("({})", dims.join(", ")),
    }
}
