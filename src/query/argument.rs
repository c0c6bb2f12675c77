//! Field argument values and their GraphQL literal syntax.

use std::fmt::{self, Write as _};

use indexmap::IndexMap;

/// A field argument value.
///
/// Every variant renders to valid GraphQL literal syntax through its
/// [`Display`](fmt::Display) implementation, including nested lists and
/// input objects.
///
/// Strings beginning with `$` convert to [`ArgumentValue::Variable`]; use
/// [`ArgumentValue::string`] to pass such a string as a literal.
///
/// # Example
///
/// ```rust
/// use rcsb_query::query::ArgumentValue;
///
/// assert_eq!(ArgumentValue::from("4HHB").to_string(), r#""4HHB""#);
/// assert_eq!(ArgumentValue::from("$id").to_string(), "$id");
/// assert_eq!(ArgumentValue::from(vec!["1A", "2B"]).to_string(), r#"["1A", "2B"]"#);
/// assert_eq!(ArgumentValue::enum_value("ASC").to_string(), "ASC");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum ArgumentValue {
    /// `null`.
    Null,
    /// `true` / `false`.
    Bool(bool),
    /// An integer literal.
    Int(i64),
    /// A float literal. Non-finite values render as `null`.
    Float(f64),
    /// A quoted string literal.
    String(String),
    /// An unquoted enum value.
    Enum(String),
    /// A variable reference, stored without its `$` prefix.
    Variable(String),
    /// A list literal.
    List(Vec<ArgumentValue>),
    /// An input object literal, in insertion order.
    Object(IndexMap<String, ArgumentValue>),
}

impl ArgumentValue {
    /// Creates a variable reference. A leading `$` is accepted and stripped.
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.strip_prefix('$') {
            Some(stripped) => Self::Variable(stripped.to_string()),
            None => Self::Variable(name),
        }
    }

    /// Creates a string literal without variable detection.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Creates an enum literal.
    #[must_use]
    pub fn enum_value(value: impl Into<String>) -> Self {
        Self::Enum(value.into())
    }

    /// Returns the variable name if this is a variable reference.
    #[must_use]
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Self::Variable(name) => Some(name.as_str()),
            _ => None,
        }
    }

    fn write_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
        if !value.is_finite() {
            return f.write_str("null");
        }
        let mut text = String::new();
        write!(text, "{value}")?;
        if !text.contains(['.', 'e', 'E']) {
            text.push_str(".0");
        }
        f.write_str(&text)
    }
}

impl fmt::Display for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => Self::write_float(f, *x),
            // JSON string escapes are a subset of GraphQL string escapes
            Self::String(s) => f.write_str(&serde_json::Value::from(s.as_str()).to_string()),
            Self::Enum(e) => f.write_str(e),
            Self::Variable(name) => write!(f, "${name}"),
            Self::List(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char(']')
            }
            Self::Object(fields) => {
                f.write_char('{')?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_char('}')
            }
        }
    }
}

impl From<&str> for ArgumentValue {
    fn from(value: &str) -> Self {
        value.strip_prefix('$').map_or_else(
            || Self::String(value.to_string()),
            |name| Self::Variable(name.to_string()),
        )
    }
}

impl From<String> for ArgumentValue {
    fn from(value: String) -> Self {
        if value.starts_with('$') {
            Self::variable(value)
        } else {
            Self::String(value)
        }
    }
}

impl From<&String> for ArgumentValue {
    fn from(value: &String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<bool> for ArgumentValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for ArgumentValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for ArgumentValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for ArgumentValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ArgumentValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for ArgumentValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Self>> From<Vec<T>> for ArgumentValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Self>> FromIterator<(K, V)> for ArgumentValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Object(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<serde_json::Value> for ArgumentValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Float(n.as_f64().unwrap_or(f64::NAN)), Self::Int),
            Value::String(s) => Self::from(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => map.into_iter().collect(),
        }
    }
}
