//! The filter registry and the generic built-in filters.
//!
//! Filters are plain function pointers over `serde_json::Value`, looked up
//! by name at render time. The dialect layer registers its storefront
//! filters (`money`, `handleize`, ...) on top of these.

use crate::context::RenderContext;
use crate::error::LiquidError;
use crate::value::{is_integral, size_of, to_number, to_output_string};
use itertools::Itertools;
use serde_json::{Map, Number, Value, json};
use std::collections::HashMap;

/// Evaluated arguments for one filter call.
#[derive(Debug, Clone, Default)]
pub struct FilterArgs {
    pub positional: Vec<Value>,
    pub named: Map<String, Value>,
}

impl FilterArgs {
    pub fn first(&self) -> Option<&Value> {
        self.positional.first()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }
}

/// The signature for a filter implementation.
pub type Filter = fn(Value, &FilterArgs, &RenderContext) -> Result<Value, LiquidError>;

/// A registry holding all available filters for the render engine.
#[derive(Clone)]
pub struct FilterRegistry {
    filters: HashMap<String, Filter>,
}

impl FilterRegistry {
    /// Creates a new, empty filter registry.
    pub fn new() -> Self {
        Self {
            filters: HashMap::new(),
        }
    }

    /// Registers a filter under a name.
    pub fn register(&mut self, name: &str, filter: Filter) {
        self.filters.insert(name.to_string(), filter);
    }

    /// Finds a filter by name.
    pub fn get(&self, name: &str) -> Option<&Filter> {
        self.filters.get(name)
    }
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for FilterRegistry {
    /// Creates a registry populated with the generic built-ins.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("default", default_filter);
        registry.register("upcase", upcase);
        registry.register("downcase", downcase);
        registry.register("capitalize", capitalize);
        registry.register("strip", strip);
        registry.register("escape", escape);
        registry.register("append", append);
        registry.register("prepend", prepend);
        registry.register("replace", replace);
        registry.register("split", split);
        registry.register("join", join);
        registry.register("first", first);
        registry.register("last", last);
        registry.register("size", size);
        registry.register("truncate", truncate);
        registry.register("truncatewords", truncatewords);
        registry.register("plus", plus);
        registry.register("minus", minus);
        registry.register("times", times);
        registry.register("divided_by", divided_by);
        registry.register("modulo", modulo);
        registry.register("date", date);
        registry.register("json", json_filter);
        registry
    }
}

// --- String Coercion Helpers ---

fn as_string(value: &Value) -> String {
    to_output_string(value)
}

// --- Built-in Filter Implementations ---

fn default_filter(input: Value, args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    let empty = match &input {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Bool(false) => true,
        _ => false,
    };
    if empty {
        Ok(args.first().cloned().unwrap_or(Value::Null))
    } else {
        Ok(input)
    }
}

fn upcase(input: Value, _args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    Ok(json!(as_string(&input).to_uppercase()))
}

fn downcase(input: Value, _args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    Ok(json!(as_string(&input).to_lowercase()))
}

fn capitalize(input: Value, _args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    let s = as_string(&input);
    let mut chars = s.chars();
    let capitalized = match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    };
    Ok(json!(capitalized))
}

fn strip(input: Value, _args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    Ok(json!(as_string(&input).trim()))
}

fn escape(input: Value, _args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    let s = as_string(&input);
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Ok(json!(out))
}

fn append(input: Value, args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    let suffix = args.first().map(as_string).unwrap_or_default();
    Ok(json!(format!("{}{}", as_string(&input), suffix)))
}

fn prepend(input: Value, args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    let prefix = args.first().map(as_string).unwrap_or_default();
    Ok(json!(format!("{}{}", prefix, as_string(&input))))
}

fn replace(input: Value, args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    let from = args.get(0).map(as_string).unwrap_or_default();
    let to = args.get(1).map(as_string).unwrap_or_default();
    Ok(json!(as_string(&input).replace(&from, &to)))
}

fn split(input: Value, args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    let separator = args.first().map(as_string).unwrap_or_default();
    let s = as_string(&input);
    if separator.is_empty() {
        let parts: Vec<Value> = s.chars().map(|c| json!(c.to_string())).collect();
        return Ok(Value::Array(parts));
    }
    let parts: Vec<Value> = s.split(&separator).map(|p| json!(p)).collect();
    Ok(Value::Array(parts))
}

fn join(input: Value, args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    let separator = args.first().map(as_string).unwrap_or_else(|| " ".to_string());
    match input {
        Value::Array(items) => {
            let joined = items.iter().map(as_string).join(&separator);
            Ok(json!(joined))
        }
        other => Ok(other),
    }
}

fn first(input: Value, _args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    match input {
        Value::Array(items) => Ok(items.into_iter().next().unwrap_or(Value::Null)),
        _ => Ok(Value::Null),
    }
}

fn last(input: Value, _args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    match input {
        Value::Array(items) => Ok(items.into_iter().next_back().unwrap_or(Value::Null)),
        _ => Ok(Value::Null),
    }
}

fn size(input: Value, _args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    Ok(Value::Number(size_of(&input).into()))
}

fn truncate(input: Value, args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    let max = args.first().map(to_number).unwrap_or(50.0) as usize;
    let ellipsis = args
        .get(1)
        .map(as_string)
        .unwrap_or_else(|| "...".to_string());
    let s = as_string(&input);
    if s.chars().count() <= max {
        return Ok(json!(s));
    }
    let keep = max.saturating_sub(ellipsis.chars().count());
    let truncated: String = s.chars().take(keep).collect();
    Ok(json!(format!("{truncated}{ellipsis}")))
}

fn truncatewords(input: Value, args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    let max = args.first().map(to_number).unwrap_or(15.0) as usize;
    let ellipsis = args
        .get(1)
        .map(as_string)
        .unwrap_or_else(|| "...".to_string());
    let s = as_string(&input);
    let words: Vec<&str> = s.split_whitespace().collect();
    if words.len() <= max {
        return Ok(json!(s));
    }
    Ok(json!(format!("{}{}", words[..max].join(" "), ellipsis)))
}

// --- Arithmetic Filters ---

fn arithmetic<F>(input: Value, args: &FilterArgs, op: F) -> Result<Value, LiquidError>
where
    F: Fn(f64, f64) -> f64,
{
    let rhs = args.first().cloned().unwrap_or(Value::Null);
    let result = op(to_number(&input), to_number(&rhs));
    // Integer operands keep integer results, as Liquid arithmetic does.
    if is_integral(&input) && is_integral(&rhs) {
        Ok(Value::Number((result.trunc() as i64).into()))
    } else {
        Ok(Number::from_f64(result)
            .map(Value::Number)
            .unwrap_or(Value::Null))
    }
}

fn plus(input: Value, args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    arithmetic(input, args, |a, b| a + b)
}

fn minus(input: Value, args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    arithmetic(input, args, |a, b| a - b)
}

fn times(input: Value, args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    arithmetic(input, args, |a, b| a * b)
}

fn divided_by(input: Value, args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    let divisor = args.first().map(to_number).unwrap_or(0.0);
    if divisor == 0.0 {
        return Err(LiquidError::Filter {
            name: "divided_by".to_string(),
            message: "division by zero".to_string(),
        });
    }
    arithmetic(input, args, |a, b| a / b)
}

fn modulo(input: Value, args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    let divisor = args.first().map(to_number).unwrap_or(0.0);
    if divisor == 0.0 {
        return Err(LiquidError::Filter {
            name: "modulo".to_string(),
            message: "modulo by zero".to_string(),
        });
    }
    arithmetic(input, args, |a, b| a % b)
}

/// Passthrough-grade `date`: the preview has no locale machinery, so the
/// raw value renders unchanged.
fn date(input: Value, _args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    Ok(input)
}

/// Debug filter for theme authors: dumps the value as JSON.
fn json_filter(input: Value, _args: &FilterArgs, _ctx: &RenderContext) -> Result<Value, LiquidError> {
    Ok(json!(serde_json::to_string(&input).unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use std::sync::Arc;

    fn ctx() -> RenderContext {
        RenderContext::new(Arc::new(Parser::new()), Map::new())
    }

    fn call(name: &str, input: Value, positional: Vec<Value>) -> Value {
        let registry = FilterRegistry::default();
        let filter = registry.get(name).unwrap();
        let args = FilterArgs {
            positional,
            named: Map::new(),
        };
        filter(input, &args, &ctx()).unwrap()
    }

    #[test]
    fn test_default_filter() {
        assert_eq!(call("default", Value::Null, vec![json!("x")]), json!("x"));
        assert_eq!(call("default", json!(""), vec![json!("x")]), json!("x"));
        assert_eq!(call("default", json!("y"), vec![json!("x")]), json!("y"));
        assert_eq!(call("default", json!(0), vec![json!("x")]), json!(0));
    }

    #[test]
    fn test_string_filters() {
        assert_eq!(call("upcase", json!("abc"), vec![]), json!("ABC"));
        assert_eq!(call("capitalize", json!("hello world"), vec![]), json!("Hello world"));
        assert_eq!(
            call("append", json!("base"), vec![json!(".css")]),
            json!("base.css")
        );
        assert_eq!(
            call("replace", json!("a-b-c"), vec![json!("-"), json!("+")]),
            json!("a+b+c")
        );
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            call("escape", json!("<a href=\"x\">&</a>"), vec![]),
            json!("&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;")
        );
    }

    #[test]
    fn test_split_and_join() {
        assert_eq!(
            call("split", json!("a,b,c"), vec![json!(",")]),
            json!(["a", "b", "c"])
        );
        assert_eq!(
            call("join", json!(["a", "b"]), vec![json!(" / ")]),
            json!("a / b")
        );
    }

    #[test]
    fn test_size_is_uniform() {
        assert_eq!(call("size", json!([1, 2]), vec![]), json!(2));
        assert_eq!(call("size", json!("abcd"), vec![]), json!(4));
        assert_eq!(call("size", json!({"a": 1, "b": 2, "c": 3}), vec![]), json!(3));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(
            call("truncate", json!("Ground control to Major Tom."), vec![json!(20)]),
            json!("Ground control to...")
        );
        assert_eq!(call("truncate", json!("short"), vec![json!(20)]), json!("short"));
    }

    #[test]
    fn test_arithmetic_preserves_integers() {
        assert_eq!(call("plus", json!(2), vec![json!(3)]), json!(5));
        assert_eq!(call("times", json!(2.5), vec![json!(2)]), json!(5.0));
        assert_eq!(call("divided_by", json!(7), vec![json!(2)]), json!(3));
        assert_eq!(call("modulo", json!(7), vec![json!(4)]), json!(3));
    }

    #[test]
    fn test_divided_by_zero_errors() {
        let registry = FilterRegistry::default();
        let filter = registry.get("divided_by").unwrap();
        let args = FilterArgs {
            positional: vec![json!(0)],
            named: Map::new(),
        };
        assert!(filter(json!(10), &args, &ctx()).is_err());
    }

    #[test]
    fn test_first_and_last() {
        assert_eq!(call("first", json!([1, 2, 3]), vec![]), json!(1));
        assert_eq!(call("last", json!([1, 2, 3]), vec![]), json!(3));
        assert_eq!(call("first", json!("nope"), vec![]), Value::Null);
    }
}
