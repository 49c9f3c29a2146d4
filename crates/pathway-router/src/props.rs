// File: src/props.rs
// Purpose: Props tree handed back by route callbacks, and its flattening into dotted keys

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::error::RouterError;

/// Integral floats below this magnitude convert to `i64` exactly
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Values a props tree may hold
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
    Map(Props),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{}", n),
            // Remove .0 for integral floats
            Value::Float(n) if n.fract() == 0.0 && n.abs() < I64_BOUND => write!(f, "{}", *n as i64),
            Value::Float(n) if n.fract() == 0.0 => write!(f, "{:.0}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => Ok(()),
            Value::Map(_) => f.write_str("[Object]"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<Props> for Value {
    fn from(props: Props) -> Self {
        Value::Map(props)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Value::Integer)
                .unwrap_or_else(|| Value::Float(n.as_f64().unwrap_or(f64::NAN))),
            serde_json::Value::String(s) => Value::String(s),
            // Arrays flatten by index: {"tags": ["a"]} -> "tags.0"
            serde_json::Value::Array(items) => Value::Map(Props(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(idx, item)| (idx.to_string(), item.into()))
                    .collect(),
            )),
            serde_json::Value::Object(map) => Value::Map(map.into()),
        }
    }
}

/// A nested, string-keyed props tree, kept in insertion order
///
/// ```
/// use pathway_router::Props;
///
/// let props = Props::new()
///     .with("id", "42")
///     .with("nested", Props::new().with("object", "errors"));
/// assert_eq!(props.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props(IndexMap<String, Value>);

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Props(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Props {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().collect()
    }
}

/// Single-level mapping from dotted key path to leaf value, in traversal order
pub type FlatProps = IndexMap<String, Value>;

static PROP_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_$-]+$").expect("prop name pattern is valid")
});

/// Returns true when `key` may appear in a props tree
pub fn is_valid_prop_name(key: &str) -> bool {
    PROP_NAME.is_match(key)
}

/// Flattens a props tree into dotted keys
///
/// All-or-nothing: the first key (in insertion order, depth first) outside
/// `[A-Za-z0-9_$-]+` aborts with [`RouterError::InvalidProp`] and no partial
/// map is returned.
///
/// ```
/// use pathway_router::{flatten, Props, Value};
///
/// let props = Props::new().with("a", Props::new().with("b", 1)).with("c", 2);
/// let flat = flatten(&props).unwrap();
/// assert_eq!(flat.get("a.b"), Some(&Value::Integer(1)));
/// assert_eq!(flat.get("c"), Some(&Value::Integer(2)));
/// ```
pub fn flatten(props: &Props) -> Result<FlatProps, RouterError> {
    fn descend(props: &Props, prefix: &str, out: &mut FlatProps) -> Result<(), RouterError> {
        for (key, value) in props.iter() {
            if !is_valid_prop_name(key) {
                return Err(RouterError::InvalidProp { key: key.clone() });
            }

            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };

            match value {
                Value::Map(nested) => descend(nested, &path, out)?,
                leaf => {
                    out.insert(path, leaf.clone());
                }
            }
        }
        Ok(())
    }

    let mut flattened = FlatProps::new();
    descend(props, "", &mut flattened)?;
    Ok(flattened)
}
