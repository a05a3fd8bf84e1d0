//! Filter trees supplied by callers and their dot-path flattened form.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};
use std::fmt;

/// A single filter value that is never decomposed further.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Text used when the scalar is one element of a joined list. Null joins as empty.
    pub(crate) fn element_text(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            other => other.to_string(),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Number(n) => Value::Number(n.clone()),
            Scalar::String(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n.into())
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// Array elements that are themselves structured are kept as their JSON text.
impl From<Value> for Scalar {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => Scalar::Null,
            Value::Bool(b) => Scalar::Bool(b),
            Value::Number(n) => Scalar::Number(n),
            Value::String(s) => Scalar::String(s),
            other => Scalar::String(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(_) | Value::Object(_) => Err(serde::de::Error::custom("expected a scalar")),
            v => Ok(Scalar::from(v)),
        }
    }
}

/// A flattened filter value: a scalar or a list of scalars.
#[derive(Clone, Debug, PartialEq)]
pub enum Leaf {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

impl Leaf {
    pub fn is_null(&self) -> bool {
        matches!(self, Leaf::Scalar(Scalar::Null))
    }
}

impl From<Scalar> for Leaf {
    fn from(s: Scalar) -> Self {
        Leaf::Scalar(s)
    }
}

impl<'de> Deserialize<'de> for Leaf {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => Ok(Leaf::List(items.into_iter().map(Scalar::from).collect())),
            Value::Object(_) => Err(serde::de::Error::custom("expected a scalar or an array of scalars")),
            v => Ok(Leaf::Scalar(Scalar::from(v))),
        }
    }
}

/// One node of a caller's filter tree. Nested maps denote dotted sub-field access.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
    Map(FilterTree),
}

impl From<Value> for FilterValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Object(map) => FilterValue::Map(FilterTree::from(map)),
            Value::Array(items) => FilterValue::List(items.into_iter().map(Scalar::from).collect()),
            v => FilterValue::Scalar(Scalar::from(v)),
        }
    }
}

impl From<Leaf> for FilterValue {
    fn from(leaf: Leaf) -> Self {
        match leaf {
            Leaf::Scalar(s) => FilterValue::Scalar(s),
            Leaf::List(items) => FilterValue::List(items),
        }
    }
}

/// Ordered key/value filter map. Inserting an existing key replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterTree {
    entries: Vec<(String, FilterValue)>,
}

impl FilterTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<FilterValue> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Map<String, Value>> for FilterTree {
    fn from(map: Map<String, Value>) -> Self {
        FilterTree {
            entries: map.into_iter().map(|(k, v)| (k, FilterValue::from(v))).collect(),
        }
    }
}

impl From<FlatFilter> for FilterTree {
    fn from(flat: FlatFilter) -> Self {
        FilterTree {
            entries: flat.entries.into_iter().map(|(k, v)| (k, FilterValue::from(v))).collect(),
        }
    }
}

impl<'de> Deserialize<'de> for FilterTree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Object(map)) => Ok(FilterTree::from(map)),
            None | Some(Value::Null) => Ok(FilterTree::default()),
            Some(_) => Err(serde::de::Error::custom("filter must be an object")),
        }
    }
}

impl From<FilterTree> for FilterValue {
    fn from(tree: FilterTree) -> Self {
        FilterValue::Map(tree)
    }
}

impl From<Scalar> for FilterValue {
    fn from(s: Scalar) -> Self {
        FilterValue::Scalar(s)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Scalar(s.into())
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Scalar(n.into())
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Scalar(b.into())
    }
}

/// Dot-path keyed, single level filter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlatFilter {
    entries: Vec<(String, Leaf)>,
}

impl FlatFilter {
    fn insert(&mut self, key: String, value: Leaf) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Leaf> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Leaf)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Flatten nested maps into `outer.inner` keys. Lists and scalars are leaves.
pub fn flatten(tree: &FilterTree) -> FlatFilter {
    let mut out = FlatFilter::default();
    flatten_into(tree, None, &mut out);
    out
}

fn flatten_into(tree: &FilterTree, prefix: Option<&str>, out: &mut FlatFilter) {
    for (key, value) in tree.iter() {
        let path = match prefix {
            Some(p) => format!("{}.{}", p, key),
            None => key.to_string(),
        };
        match value {
            FilterValue::Map(inner) => flatten_into(inner, Some(&path), out),
            FilterValue::List(items) => out.insert(path, Leaf::List(items.clone())),
            FilterValue::Scalar(s) => out.insert(path, Leaf::Scalar(s.clone())),
        }
    }
}
