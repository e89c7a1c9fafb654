//! Parameter values carried by filter trees.
//!
//! Command text renders placeholders, never literal values, so a [`Value`]
//! only travels alongside the generated text for the caller to bind. Equality
//! is content-based; floats compare by bit pattern so a `Value` can sit inside
//! hashable request structures without `NaN` surprises.

use serde::Serialize;

/// A scalar (or scalar list) parameter value.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer (covers all integer column widths).
    Int(i64),
    /// 64-bit float.
    Double(f64),
    /// Text value.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// A list of values, used by `IN` and `BETWEEN` operations.
    List(Vec<Value>),
}

impl Value {
    /// Number of placeholders this value occupies in generated text.
    ///
    /// Scalars occupy one; a list occupies one per element. `NULL` occupies
    /// one as well since it is still bound positionally.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Value::List(items) => items.len(),
            _ => 1,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}
