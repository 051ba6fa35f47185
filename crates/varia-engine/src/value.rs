//! Variable context handed to guard evaluation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A variable value visible to guards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean flag.
    Bool(bool),
    /// Whole number.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// Text.
    Text(String),
}

impl Value {
    /// Whether the value counts as true when used as a bare guard.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Text(s) => !s.is_empty(),
        }
    }

    /// Numeric view of the value, if it is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Named variables, ordered by name.
pub type Variables = BTreeMap<String, Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(Value::Bool(true).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(Value::Float(0.5).is_truthy());
        assert!(!Value::Text(String::new()).is_truthy());
    }

    #[test]
    fn numbers_widen_to_float() {
        assert_eq!(Value::Int(3).as_number(), Some(3.0));
        assert_eq!(Value::Text("3".into()).as_number(), None);
    }

    #[test]
    fn deserialize_untagged() {
        let vars: Variables =
            serde_json::from_str(r#"{"gold": 12, "name": "Ada", "brave": true, "mood": 0.5}"#)
                .unwrap();
        assert_eq!(vars["gold"], Value::Int(12));
        assert_eq!(vars["name"], Value::from("Ada"));
        assert_eq!(vars["brave"], Value::Bool(true));
        assert_eq!(vars["mood"], Value::Float(0.5));
    }

    #[test]
    fn display() {
        assert_eq!(Value::from("Ada").to_string(), "\"Ada\"");
        assert_eq!(Value::from(7).to_string(), "7");
    }
}
