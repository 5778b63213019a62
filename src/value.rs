//! Case input values.
//!
//! A prompt case carries an ordered sequence of heterogeneous inputs: whole
//! numbers, lists of numbers, and short words (such as an indexing
//! convention). `Value` is the closed set of those shapes. Values are
//! hashable so the failure-mode collector can bucket cases by input tuples.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single case input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A scalar operand or index.
    Int(i64),
    /// A list of numbers.
    List(Vec<i64>),
    /// A word, e.g. the indexing convention of an index-based task.
    Text(String),
}

impl Value {
    /// Scalar accessor.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// List accessor.
    pub fn as_list(&self) -> Option<&[i64]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Text accessor.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::List(items) => write!(f, "{}", format_list(items)),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<Vec<i64>> for Value {
    fn from(items: Vec<i64>) -> Self {
        Value::List(items)
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

/// Format a number list as `[1, 2, 3]`.
pub fn format_list(items: &[i64]) -> String {
    let parts: Vec<String> = items.iter().map(|n| n.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

/// Format a whole input sequence as `[[10, 20, 30], 1, 3, 'one']`.
///
/// Text values are quoted so the sequence reads as a literal; used by the
/// interpreter wrap, which embeds the raw inputs next to the instruction.
pub fn format_inputs(inputs: &[Value]) -> String {
    let parts: Vec<String> = inputs
        .iter()
        .map(|v| match v {
            Value::Text(s) => format!("'{}'", s),
            other => other.to_string(),
        })
        .collect();
    format!("[{}]", parts.join(", "))
}
