use std::{
    ops::Index,
    sync::{OnceLock, atomic::AtomicU32},
};

use rand::{TryRngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};

use crate::{Document, HarborError, Result};

/// Universal value type for HarborDB documents
///
/// Variants
/// * Primitive types: Null, Bool, Int32, Int64, Float64, String
/// * Date/Time: DateTime
/// * Identifiers: ObjectId
/// * Collection types: Array, Document (nested)
///
/// A value tree is finite by construction: the encoder refuses to build one
/// from a cyclic record graph, and nothing in this crate aliases subtrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    // Primitive types
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float64(f64),
    String(String),

    // Date/Time
    DateTime(chrono::DateTime<chrono::FixedOffset>),

    // Identifiers
    ObjectId(ObjectId),

    // Collection types
    Array(Vec<Value>),
    Document(Document),
}

pub(crate) static NULL: Value = Value::Null;

impl Value {
    /// Get the type name as a string
    ///
    /// # Example
    /// ```rust
    /// use harbordb_common::Value;
    ///
    /// let val = Value::Int32(42);
    /// assert_eq!(val.type_name(), "int32");
    ///
    /// let val = Value::String("Hello".to_string());
    /// assert_eq!(val.type_name(), "string");
    /// ```
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Float64(_) => "float64",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::ObjectId(_) => "objectid",
            Value::Array(_) => "array",
            Value::Document(_) => "document",
        }
    }

    /// Convert Value to JSON representation
    ///
    /// # Example
    /// ```rust
    /// use harbordb_common::Value;
    ///
    /// let val = Value::Int32(42);
    /// assert_eq!(val.to_json(), serde_json::json!(42));
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int32(i) => serde_json::Value::Number((*i).into()),
            Value::Int64(i) => serde_json::Value::Number((*i).into()),
            Value::Float64(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
            Value::ObjectId(oid) => serde_json::Value::String(oid.to_string()),
            Value::Array(arr) => {
                let json_arr: Vec<serde_json::Value> = arr.iter().map(|v| v.to_json()).collect();
                serde_json::Value::Array(json_arr)
            }
            Value::Document(doc) => doc.to_json(),
        }
    }

    /// Convert from JSON representation
    ///
    /// Integers that fit `i32` become [`Value::Int32`], larger integers
    /// become [`Value::Int64`], and every JSON float becomes
    /// [`Value::Float64`]. JSON objects become nested documents.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    if i >= i32::MIN as i64 && i <= i32::MAX as i64 {
                        Value::Int32(i as i32)
                    } else {
                        Value::Int64(i)
                    }
                } else if let Some(f) = n.as_f64() {
                    Value::Float64(f)
                } else {
                    Value::Null
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => {
                let doc: Document = map
                    .into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect();
                Value::Document(doc)
            }
        }
    }

    /// Extract the array from Value::Array, returning None if not an array
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Extract the string from Value::String, returning None if not a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extract the integer from Value::Int64, returning None if not an int
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract the integer from Value::Int32, returning None if not an int
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract the float from Value::Float64, returning None if not a float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(f) => Some(*f),
            _ => None,
        }
    }

    /// Extract the boolean from Value::Bool, returning None if not a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract the document from Value::Document, returning None if not a document
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }

    /// Extract the id from Value::ObjectId, returning None if not an id
    pub fn as_object_id(&self) -> Option<&ObjectId> {
        match self {
            Value::ObjectId(oid) => Some(oid),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Self::Output {
        match self {
            Value::Document(doc) => doc.get(key).unwrap_or(&NULL),
            _ => panic!("Cannot index non-document value with string key"),
        }
    }
}

impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Self::Output {
        match self {
            Value::Array(arr) => arr.get(index).unwrap_or(&NULL),
            _ => panic!("Cannot index non-array value with usize"),
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        if value >= i32::MIN as i64 && value <= i32::MAX as i64 {
            Value::Int32(value as i32)
        } else {
            Value::Int64(value)
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float64(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<chrono::DateTime<chrono::FixedOffset>> for Value {
    fn from(value: chrono::DateTime<chrono::FixedOffset>) -> Self {
        Value::DateTime(value)
    }
}

impl From<ObjectId> for Value {
    fn from(value: ObjectId) -> Self {
        Value::ObjectId(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Value::Document(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int32(i) => write!(f, "{}", i),
            Value::Int64(i) => write!(f, "{}", i),
            Value::Float64(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::ObjectId(oid) => write!(f, "{}", oid),
            Value::Array(arr) => {
                let items: Vec<String> = arr.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Value::Document(doc) => write!(f, "{}", doc),
        }
    }
}

/// 12-byte document identifier.
///
/// Layout: 4-byte big-endian timestamp, 5 process-unique random bytes,
/// 3-byte counter seeded from a random value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Generate a new ObjectId
    ///
    /// # Example
    /// ```rust
    /// use harbordb_common::ObjectId;
    ///
    /// let oid = ObjectId::new();
    /// println!("Generated ObjectId: {}", oid);
    /// ```
    pub fn new() -> Self {
        static PROCESS_BYTES: OnceLock<[u8; 5]> = OnceLock::new();
        static COUNTER: OnceLock<AtomicU32> = OnceLock::new();

        let mut bytes = [0u8; 12];

        // 4-byte timestamp (big-endian)
        let timestamp = chrono::Utc::now().timestamp() as u32;
        bytes[0..4].copy_from_slice(&timestamp.to_be_bytes());

        // 5 random bytes, generated once per process
        let process_bytes = PROCESS_BYTES.get_or_init(|| {
            let mut rng = OsRng;
            let mut random_bytes = [0u8; 5];

            if rng.try_fill_bytes(&mut random_bytes).is_err() {
                // Fallback for if RNG fails (unlikely)
                let pid = std::process::id();
                random_bytes[0] = (pid >> 24) as u8;
                random_bytes[1] = (pid >> 16) as u8;
                random_bytes[2] = (pid >> 8) as u8;
                random_bytes[3] = pid as u8;
                random_bytes[4] = 0x5a;
            }
            random_bytes
        });
        bytes[4..9].copy_from_slice(process_bytes);

        // 3-byte counter
        let counter_atomic = COUNTER.get_or_init(|| {
            let mut rng = OsRng;
            let mut random_bytes = [0u8; 4];

            if rng.try_fill_bytes(&mut random_bytes).is_ok() {
                AtomicU32::new(u32::from_be_bytes(random_bytes) & 0xFFFFFF)
            } else {
                AtomicU32::new((std::process::id() ^ 0xDEADBEEF) & 0xFFFFFF)
            }
        });

        let counter = counter_atomic.fetch_add(1, std::sync::atomic::Ordering::SeqCst) & 0xFFFFFF;
        bytes[9] = ((counter >> 16) & 0xFF) as u8;
        bytes[10] = ((counter >> 8) & 0xFF) as u8;
        bytes[11] = (counter & 0xFF) as u8;

        Self(bytes)
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        if s.len() != 24 {
            return Err(HarborError::Parse("Invalid ObjectId hex string".into()));
        }
        let decoded =
            hex::decode(s).map_err(|_| HarborError::Parse("Invalid ObjectId hex string".into()))?;
        let mut bytes = [0u8; 12];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for ObjectId {
    type Err = HarborError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

// Tests
