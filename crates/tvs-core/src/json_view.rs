//! Read-only navigation over a parsed JSON tree.
//!
//! Backend responses are loosely typed and deeply nested, so instead of a
//! full set of serde structs the resolver walks them through [`JsonView`].
//! Every accessor is fallible: indexing the wrong container kind or a
//! missing key is a [`ScrapeError::SchemaMismatch`], asking a scalar for
//! the wrong type is a [`ScrapeError::TypeMismatch`].

use serde_json::Value;

use crate::error::{Result, ScrapeError};

/// Parse response text into an owned tree.
pub fn parse(text: &str) -> Result<Value> {
    serde_json::from_str(text)
        .map_err(|e| ScrapeError::SchemaMismatch(format!("response is not valid JSON: {}", e)))
}

/// Borrowed view of one node of a JSON tree.
#[derive(Debug, Clone, Copy)]
pub struct JsonView<'a> {
    node: &'a Value,
}

impl<'a> JsonView<'a> {
    pub fn new(node: &'a Value) -> Self {
        Self { node }
    }

    pub fn value(&self) -> &'a Value {
        self.node
    }

    /// Name of the node's tag, used in error messages.
    pub fn kind(&self) -> &'static str {
        kind_of(self.node)
    }

    pub fn is_null(&self) -> bool {
        self.node.is_null()
    }

    /// Member `key` of an object node.
    pub fn get(&self, key: &str) -> Result<JsonView<'a>> {
        match self.node {
            Value::Object(map) => map
                .get(key)
                .map(JsonView::new)
                .ok_or_else(|| ScrapeError::SchemaMismatch(format!("key `{}` not found", key))),
            other => Err(ScrapeError::SchemaMismatch(format!(
                "cannot index {} by key `{}`",
                kind_of(other),
                key
            ))),
        }
    }

    /// Element `i` of an array node.
    pub fn index(&self, i: usize) -> Result<JsonView<'a>> {
        match self.node {
            Value::Array(items) => items.get(i).map(JsonView::new).ok_or_else(|| {
                ScrapeError::SchemaMismatch(format!(
                    "index {} out of bounds (len {})",
                    i,
                    items.len()
                ))
            }),
            other => Err(ScrapeError::SchemaMismatch(format!(
                "cannot index {} by position {}",
                kind_of(other),
                i
            ))),
        }
    }

    /// Successive [`get`](Self::get) calls; the error names the full dotted path.
    pub fn path(&self, keys: &[&str]) -> Result<JsonView<'a>> {
        let mut current = *self;
        for (depth, key) in keys.iter().enumerate() {
            current = current.get(key).map_err(|e| match e {
                ScrapeError::SchemaMismatch(msg) => ScrapeError::SchemaMismatch(format!(
                    "{} (at `{}`)",
                    msg,
                    keys[..=depth].join(".")
                )),
                other => other,
            })?;
        }
        Ok(current)
    }

    pub fn as_str(&self) -> Result<&'a str> {
        self.node.as_str().ok_or_else(|| self.type_mismatch("string"))
    }

    /// Integral number that fits in `i64`.
    pub fn as_int(&self) -> Result<i64> {
        self.node.as_i64().ok_or_else(|| self.type_mismatch("integer"))
    }

    pub fn as_double(&self) -> Result<f64> {
        self.node.as_f64().ok_or_else(|| self.type_mismatch("number"))
    }

    pub fn as_bool(&self) -> Result<bool> {
        self.node.as_bool().ok_or_else(|| self.type_mismatch("boolean"))
    }

    /// Number of members (object), elements (array), or 1 for a scalar.
    pub fn len(&self) -> usize {
        match self.node {
            Value::Object(map) => map.len(),
            Value::Array(items) => items.len(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Object values, array elements, or the scalar itself once.
    pub fn iter(&self) -> Iter<'a> {
        match self.node {
            Value::Array(items) => Iter::Array(items.iter()),
            Value::Object(map) => Iter::Object(map.values()),
            scalar => Iter::Single(Some(scalar)),
        }
    }

    fn type_mismatch(&self, expected: &'static str) -> ScrapeError {
        ScrapeError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }
}

impl<'a> IntoIterator for JsonView<'a> {
    type Item = JsonView<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`JsonView::iter`].
pub enum Iter<'a> {
    Array(std::slice::Iter<'a, Value>),
    Object(serde_json::map::Values<'a>),
    /// Scalars iterate as a one-element sequence so "one or many" reads the same.
    Single(Option<&'a Value>),
}

impl<'a> Iterator for Iter<'a> {
    type Item = JsonView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Iter::Array(it) => it.next().map(JsonView::new),
            Iter::Object(it) => it.next().map(JsonView::new),
            Iter::Single(slot) => slot.take().map(JsonView::new),
        }
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
