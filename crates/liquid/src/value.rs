//! Value semantics for the template data model.
//!
//! The engine evaluates everything against `serde_json::Value`, the same
//! model the JSON data sources in this family of engines use. This module
//! holds the Liquid-flavored coercions: truthiness, output stringification,
//! uniform sizing and comparison.

use crate::expr::BinaryOperator;
use serde_json::Value;

/// Liquid truthiness: only `nil` and `false` are falsy. Empty strings,
/// zero and empty arrays are truthy.
pub fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

/// Renders a value the way output markup prints it.
pub fn to_output_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // Arrays concatenate their elements, as Liquid prints them.
        Value::Array(items) => items.iter().map(to_output_string).collect(),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Uniform size: array length, string character count, or map key count.
pub fn size_of(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::String(s) => s.chars().count(),
        Value::Object(map) => map.len(),
        _ => 0,
    }
}

/// Evaluates a comparison or membership operator. `and`/`or` are handled
/// by the renderer for short-circuiting and are not accepted here.
pub fn apply_comparison(op: BinaryOperator, left: &Value, right: &Value) -> bool {
    match op {
        BinaryOperator::Equals => values_equal(left, right),
        BinaryOperator::NotEquals => !values_equal(left, right),
        BinaryOperator::LessThan => numeric_cmp(left, right, |o| o == std::cmp::Ordering::Less),
        BinaryOperator::LessThanOrEqual => {
            numeric_cmp(left, right, |o| o != std::cmp::Ordering::Greater)
        }
        BinaryOperator::GreaterThan => {
            numeric_cmp(left, right, |o| o == std::cmp::Ordering::Greater)
        }
        BinaryOperator::GreaterThanOrEqual => {
            numeric_cmp(left, right, |o| o != std::cmp::Ordering::Less)
        }
        BinaryOperator::Contains => contains(left, right),
        BinaryOperator::And | BinaryOperator::Or => false,
    }
}

/// Equality with cross-width numeric coercion (`1 == 1.0`).
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        _ => left == right,
    }
}

fn numeric_cmp<F>(left: &Value, right: &Value, check: F) -> bool
where
    F: Fn(std::cmp::Ordering) -> bool,
{
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).map(&check).unwrap_or(false),
            _ => false,
        },
        (Value::String(a), Value::String(b)) => check(a.cmp(b)),
        _ => false,
    }
}

/// `contains`: substring test on strings, membership test on arrays.
pub fn contains(haystack: &Value, needle: &Value) -> bool {
    match haystack {
        Value::String(s) => match needle {
            Value::String(n) => s.contains(n.as_str()),
            other => s.contains(&to_output_string(other)),
        },
        Value::Array(items) => items.iter().any(|item| values_equal(item, needle)),
        _ => false,
    }
}

/// Numeric coercion for arithmetic filters: numbers pass through, numeric
/// strings parse, everything else is zero.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    }
}

/// True when the value is an integer-valued number and arithmetic on it
/// should stay integral.
pub fn is_integral(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64(),
        Value::String(s) => s.trim().parse::<i64>().is_ok(),
        _ => false,
    }
}
