/*
 * ==========================================================================
 * HBARS - Templates with Claws!
 * ==========================================================================
 *
 * File:     value.rs
 * Purpose:  The structural render value. Everything the evaluator touches
 *           flows through this type: the context stack, helper parameters,
 *           hash options and private data frames.
 *
 * Host data enters through serde: any `Serialize` value is converted once,
 * up front, and the evaluator only ever performs the small capability set
 * below (key lookup, iteration, length, truthiness, stringification).
 *
 * License:
 * This file is part of the hbars template engine.
 *
 * hbars is dual-licensed under the terms of:
 *   - The MIT license
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// A template render value.
///
/// `Safe` carries a string that is already escaped (or known not to need
/// escaping) and bypasses HTML escaping on output. `Null` doubles as the
/// "undefined" result of a failed lookup: it renders as the empty string
/// and is falsy.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),

    /// A pre-escaped ("safe") string, never HTML-escaped on output.
    Safe(String),

    Array(Vec<Value>),

    /// Keys are kept in ascending order so `each` over a map is
    /// deterministic.
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Returns a stable type name string (useful for errors).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Safe(_) => "safe string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Handlebars truthiness: null, false, empty string, empty array,
    /// empty object and numeric zero are falsy. The `includeZero` exemption
    /// lives in the `if`/`unless` helpers, not here.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) | Value::Safe(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(fields) => !fields.is_empty(),
        }
    }

    /// Field/key lookup. Objects look up by key, arrays by numeric index.
    /// `None` means "undefined", which the evaluator renders as empty.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(fields) => fields.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Sequence/map length; scalars have no length.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Array(items) => Some(items.len()),
            Value::Object(fields) => Some(fields.len()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Safe(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Output stringification. Arrays concatenate their elements, null and
    /// undefined render as the empty string, whole floats drop the decimal
    /// point.
    pub fn stringify(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Str(s) | Value::Safe(s) => s.clone(),
            Value::Array(items) => {
                let mut out = String::new();
                for item in items {
                    out.push_str(&item.stringify());
                }
                out
            }
            Value::Object(_) => "[object]".to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stringify())
    }
}

/// Formats a number the way templates expect: `1.0` renders as `1`.
fn format_number(n: f64) -> String {
    if n == n.trunc() && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Converts any serializable host value into a render `Value`.
pub fn to_value<T: Serialize>(data: T) -> Result<Value> {
    let json = serde_json::to_value(data)
        .map_err(|e| Error::data(format!("Input data is not serializable: {}", e)))?;
    Ok(from_json(json))
}

fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::Str(s),
        serde_json::Value::Array(items) => {
            Value::Array(items.into_iter().map(from_json).collect())
        }
        serde_json::Value::Object(fields) => Value::Object(
            fields.into_iter().map(|(k, v)| (k, from_json(v))).collect(),
        ),
    }
}

/// HTML-escapes `&`, `<`, `>`, `"`, `'` and backtick.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '`' => out.push_str("&#x60;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stringify_scalars() {
        let tests: Vec<(Value, &str)> = vec![
            (Value::Str("foo".into()), "foo"),
            (Value::Bool(true), "true"),
            (Value::Bool(false), "false"),
            (Value::Number(25.0), "25"),
            (Value::Number(25.75), "25.75"),
            (Value::Null, ""),
            (
                Value::Array(vec![Value::Str("foo".into()), Value::Str("bar".into())]),
                "foobar",
            ),
            (
                Value::Array(vec![Value::Bool(true), Value::Bool(false)]),
                "truefalse",
            ),
        ];

        for (input, expected) in tests {
            assert_eq!(input.stringify(), expected);
        }
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Array(vec![]).is_truthy());
        assert!(!Value::Object(Default::default()).is_truthy());
        assert!(Value::Number(-1.5).is_truthy());
        assert!(Value::Str("x".into()).is_truthy());
    }

    #[test]
    fn escaping() {
        assert_eq!(escape_html("bar<"), "bar&lt;");
        assert_eq!(escape_html("a&b"), "a&amp;b");
        assert_eq!(escape_html(r#"<a href="x">'y'`z`</a>"#).contains('<'), false);
    }

    #[test]
    fn serde_bridge() {
        let v = to_value(serde_json::json!({"a": [1, "two", null], "b": true})).unwrap();
        assert_eq!(
            v.lookup("a").and_then(|a| a.lookup("1")),
            Some(&Value::Str("two".into()))
        );
        assert_eq!(v.lookup("b"), Some(&Value::Bool(true)));
        assert_eq!(v.lookup("missing"), None);
    }
}
