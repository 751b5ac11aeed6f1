//! Query parameter values and their canonical wire form.
//!
//! [`normalize`] turns a caller-supplied [`QueryValue`] into the canonical value for a
//! recognized key (`single`, `limit`, `offset`, `page`, `meta`, `status`, `sort`, `q`, `filter`,
//! `fields`). Unrecognized keys pass through unchanged. Every normalizer is idempotent.
use derive_more::From;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Value of a single query parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, From)]
#[serde(untagged)]
pub enum QueryValue {
    /// Sent as `1` or `0`.
    Bool(bool),
    /// Integer value.
    Integer(i64),
    /// Plain string value.
    String(String),
    /// Sent comma-joined.
    List(Vec<String>),
    /// Sent in bracket notation, `filter[field][operator]=value`.
    Filter(Filter),
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(str::to_owned).collect())
    }
}

impl From<&[&str]> for QueryValue {
    fn from(value: &[&str]) -> Self {
        Self::List(value.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for QueryValue {
    fn from(value: [&str; N]) -> Self {
        Self::List(value.iter().map(|s| (*s).to_owned()).collect())
    }
}

/// A `filter` expression: `{field: {operator: value}}`, possibly nested further.
///
/// ```
/// # use directus::Filter;
/// let filter = Filter::new()
///     .condition("status", "eq", "published")
///     .condition("price", "lt", 100);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(Map<String, Value>);

impl Filter {
    /// An empty filter.
    pub fn new() -> Filter {
        Filter::default()
    }

    /// Add `operator: value` under `field`. A second condition with the same field and operator
    /// replaces the first.
    pub fn condition(
        mut self,
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Filter {
        let operator = operator.into();
        let value = value.into();
        let entry = self
            .0
            .entry(field.into())
            .or_insert_with(|| Value::Object(Map::new()));
        match entry {
            Value::Object(operators) => {
                operators.insert(operator, value);
            }
            other => {
                let mut operators = Map::new();
                operators.insert(operator, value);
                *other = Value::Object(operators);
            }
        }
        self
    }

    /// The conditions, keyed by field.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Whether no condition was added.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Value> for Filter {
    type Error = Value;

    /// Only JSON objects are filters; anything else is handed back.
    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Filter(map)),
            other => Err(other),
        }
    }
}

/// Normalize `value` into the canonical form for query parameter `key`.
pub fn normalize(key: &str, value: QueryValue) -> QueryValue {
    match key {
        "single" => flag(value),
        "limit" | "offset" | "page" => integer(value),
        "meta" | "status" => join_or_wildcard(value),
        "sort" | "fields" => join(value),
        // `q` and `filter` are passed through as given.
        _ => value,
    }
}

fn flag(value: QueryValue) -> QueryValue {
    match value {
        QueryValue::Integer(n) => QueryValue::Bool(n != 0),
        QueryValue::String(s) => match s.as_str() {
            "1" | "true" => QueryValue::Bool(true),
            "0" | "false" | "" => QueryValue::Bool(false),
            _ => QueryValue::String(s),
        },
        other => other,
    }
}

fn integer(value: QueryValue) -> QueryValue {
    match value {
        QueryValue::String(s) => match s.trim().parse::<i64>() {
            Ok(n) => QueryValue::Integer(n),
            Err(_) => QueryValue::String(s),
        },
        other => other,
    }
}

fn join(value: QueryValue) -> QueryValue {
    match value {
        QueryValue::List(items) => QueryValue::String(items.join(",")),
        other => other,
    }
}

fn join_or_wildcard(value: QueryValue) -> QueryValue {
    match join(value) {
        QueryValue::String(s) if s.is_empty() => QueryValue::String("*".to_owned()),
        other => other,
    }
}

/// Render `key = value` as decoded query pairs.
///
/// Filters expand to bracket notation (`filter[title][eq]=x`); every other value renders to a
/// single pair.
pub(crate) fn to_pairs(key: &str, value: &QueryValue) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    match value {
        QueryValue::Bool(b) => pairs.push((key.to_owned(), bool_str(*b).to_owned())),
        QueryValue::Integer(n) => pairs.push((key.to_owned(), n.to_string())),
        QueryValue::String(s) => pairs.push((key.to_owned(), s.clone())),
        QueryValue::List(items) => pairs.push((key.to_owned(), items.join(","))),
        QueryValue::Filter(filter) => {
            for (field, nested) in filter.as_map() {
                flatten(format!("{key}[{field}]"), nested, &mut pairs);
            }
        }
    }
    pairs
}

fn flatten(prefix: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                flatten(format!("{prefix}[{key}]"), nested, pairs);
            }
        }
        Value::Array(items) => {
            let joined = items.iter().map(scalar).collect::<Vec<_>>().join(",");
            pairs.push((prefix, joined));
        }
        scalar_value => pairs.push((prefix, scalar(scalar_value))),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => bool_str(*b).to_owned(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}
