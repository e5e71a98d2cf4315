//! Tree-shaped document values.
//!
//! A [`Document`] is an ordered-irrelevant mapping from field name to
//! [`Value`], the unit of storage and transfer for every write operation in
//! this crate family. Structural equality ignores insertion order.

use std::collections::BTreeMap;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::{HarborError, Result, Value, value};

/// A schema-less document: field name to [`Value`] mapping.
///
/// # Example
/// ```rust
/// use harbordb_common::{Value, document};
///
/// let doc = document! {
///     "name": "HarborDB",
///     "count": 1,
/// };
/// assert_eq!(doc["name"], Value::String("HarborDB".into()));
/// assert_eq!(doc.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document(BTreeMap<String, Value>);

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Set a field, returning the previous value if the field existed.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Get a field by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Remove a field, returning its value if it existed.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Check whether a field is present.
    pub fn contains_key(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over fields.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Iterate over field names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Convert to JSON representation.
    pub fn to_json(&self) -> serde_json::Value {
        let json_obj: serde_json::Map<String, serde_json::Value> = self
            .0
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        serde_json::Value::Object(json_obj)
    }

    /// Convert from JSON representation. Fails unless the JSON value is an
    /// object.
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        match Value::from_json(json) {
            Value::Document(doc) => Ok(doc),
            other => Err(HarborError::TypeError {
                expected: "document".into(),
                actual: other.type_name().into(),
            }),
        }
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<String, Value>> for Document {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl Index<&str> for Document {
    type Output = Value;

    fn index(&self, field: &str) -> &Self::Output {
        self.0.get(field).unwrap_or(&value::NULL)
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let items: Vec<String> = self
            .0
            .iter()
            .map(|(k, v)| format!("\"{}\": {}", k, v))
            .collect();
        write!(f, "{{{}}}", items.join(", "))
    }
}

/// Build a [`Document`] from field literals.
///
/// # Example
/// ```rust
/// use harbordb_common::document;
///
/// let doc = document! {
///     "name": "HarborDB",
///     "count": 1,
///     "info": document! { "x": 203, "y": 102 },
/// };
/// assert_eq!(doc["info"]["x"].as_i32(), Some(203));
/// ```
#[macro_export]
macro_rules! document {
    () => {
        $crate::Document::new()
    };
    ($($field:literal : $value:expr),+ $(,)?) => {{
        let mut doc = $crate::Document::new();
        $( doc.insert($field, $value); )+
        doc
    }};
}

// Tests
