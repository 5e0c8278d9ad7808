use serde::{Deserialize, Serialize};
use std::fmt;

/// A runtime value bound into a rewritten query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SqlValue {
    Int(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Json(serde_json::Value),
    Null,
}

impl SqlValue {
    /// The textual form used for identifier slots (columns, tables, lock
    /// modes). Only text values have one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Int(v) => write!(f, "{}", v),
            SqlValue::Float(v) => write!(f, "{}", v),
            SqlValue::Text(v) => write!(f, "{}", v),
            SqlValue::Boolean(v) => write!(f, "{}", v),
            SqlValue::Json(v) => write!(f, "{}", v),
            SqlValue::Null => write!(f, "NULL"),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v as i64)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Boolean(v)
    }
}

impl From<serde_json::Value> for SqlValue {
    fn from(v: serde_json::Value) -> Self {
        SqlValue::Json(v)
    }
}

/// What a template slot resolved to. The sentinels are recognized by tag:
/// `Absent` drops the slot's contribution, `IsNull` rewrites the enclosing
/// comparison to an `IS NULL` test.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Value(SqlValue),
    Absent,
    IsNull,
}

impl Slot {
    pub fn value(v: impl Into<SqlValue>) -> Self {
        Slot::Value(v.into())
    }
}

impl From<SqlValue> for Slot {
    fn from(v: SqlValue) -> Self {
        Slot::Value(v)
    }
}

impl From<i64> for Slot {
    fn from(v: i64) -> Self {
        Slot::Value(SqlValue::Int(v))
    }
}

impl From<i32> for Slot {
    fn from(v: i32) -> Self {
        Slot::Value(SqlValue::Int(v as i64))
    }
}

impl From<f64> for Slot {
    fn from(v: f64) -> Self {
        Slot::Value(SqlValue::Float(v))
    }
}

impl From<&str> for Slot {
    fn from(v: &str) -> Self {
        Slot::Value(SqlValue::Text(v.to_string()))
    }
}

impl From<String> for Slot {
    fn from(v: String) -> Self {
        Slot::Value(SqlValue::Text(v))
    }
}

impl From<bool> for Slot {
    fn from(v: bool) -> Self {
        Slot::Value(SqlValue::Boolean(v))
    }
}

/// Builds the slot mapping for [`rewrite`](crate::rewrite).
///
/// ```
/// use sqlweave::{slots, Slot};
///
/// let values = slots! {
///     "a" => Slot::Absent,
///     "b" => 2,
/// };
/// assert_eq!(values.len(), 2);
/// ```
#[macro_export]
macro_rules! slots {
    () => {
        std::collections::HashMap::<String, $crate::Slot>::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut map = std::collections::HashMap::<String, $crate::Slot>::new();
        $(
            map.insert($name.to_string(), $crate::Slot::from($value));
        )+
        map
    }};
}
