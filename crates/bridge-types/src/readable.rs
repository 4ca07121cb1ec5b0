//! Read-only container views.
//!
//! A [`ReadableMap`] or [`ReadableArray`] is what a writable container
//! becomes once it is sealed and handed off. Both are immutable and share
//! their storage through an `Arc`, so cloning is cheap and concurrent reads
//! from many threads are always safe.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::{BridgeError, BridgeResult};
use crate::kind::ValueType;
use crate::value::Value;

fn unexpected(expected: ValueType, actual: &Value) -> BridgeError {
    BridgeError::UnexpectedType {
        expected,
        actual: actual.value_type(),
    }
}

// ---------------------------------------------------------------------------
// ReadableMap
// ---------------------------------------------------------------------------

/// Immutable, insertion-ordered map of sealed values.
#[derive(Clone, Default, PartialEq)]
pub struct ReadableMap {
    entries: Arc<IndexMap<String, Value>>,
}

impl ReadableMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seal a set of ordered entries.
    pub fn from_entries(entries: IndexMap<String, Value>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns `true` if the key is present and holds null.
    pub fn is_null(&self, key: &str) -> bool {
        matches!(self.entries.get(key), Some(Value::Null))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    fn lookup(&self, key: &str) -> BridgeResult<&Value> {
        self.entries
            .get(key)
            .ok_or_else(|| BridgeError::NoSuchKey(key.to_owned()))
    }

    pub fn get_type(&self, key: &str) -> BridgeResult<ValueType> {
        Ok(self.lookup(key)?.value_type())
    }

    pub fn get_boolean(&self, key: &str) -> BridgeResult<bool> {
        let value = self.lookup(key)?;
        value
            .as_bool()
            .ok_or_else(|| unexpected(ValueType::Boolean, value))
    }

    pub fn get_int(&self, key: &str) -> BridgeResult<i32> {
        let value = self.lookup(key)?;
        value.as_i32().ok_or_else(|| unexpected(ValueType::Int, value))
    }

    /// Read a number as a double. Int entries widen.
    pub fn get_double(&self, key: &str) -> BridgeResult<f64> {
        let value = self.lookup(key)?;
        value
            .as_f64()
            .ok_or_else(|| unexpected(ValueType::Double, value))
    }

    pub fn get_string(&self, key: &str) -> BridgeResult<&str> {
        let value = self.lookup(key)?;
        value
            .as_str()
            .ok_or_else(|| unexpected(ValueType::String, value))
    }

    pub fn get_map(&self, key: &str) -> BridgeResult<&ReadableMap> {
        let value = self.lookup(key)?;
        value.as_map().ok_or_else(|| unexpected(ValueType::Map, value))
    }

    pub fn get_array(&self, key: &str) -> BridgeResult<&ReadableArray> {
        let value = self.lookup(key)?;
        value
            .as_array()
            .ok_or_else(|| unexpected(ValueType::Array, value))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Convert into a JSON object, preserving entry order where the JSON
    /// map implementation does.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.iter()
                .map(|(k, v)| (k.to_owned(), v.to_json()))
                .collect(),
        )
    }
}

impl FromIterator<(String, Value)> for ReadableMap {
    /// Later duplicates overwrite earlier ones in place.
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self::from_entries(iter.into_iter().collect())
    }
}

impl fmt::Debug for ReadableMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl Serialize for ReadableMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.entries.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// ReadableArray
// ---------------------------------------------------------------------------

/// Immutable sequence of sealed values.
#[derive(Clone, Default, PartialEq)]
pub struct ReadableArray {
    items: Arc<Vec<Value>>,
}

impl ReadableArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seal a list of values.
    pub fn from_values(items: Vec<Value>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    fn lookup(&self, index: usize) -> BridgeResult<&Value> {
        self.items.get(index).ok_or(BridgeError::IndexOutOfBounds {
            index,
            len: self.items.len(),
        })
    }

    pub fn is_null(&self, index: usize) -> bool {
        matches!(self.items.get(index), Some(Value::Null))
    }

    pub fn get_type(&self, index: usize) -> BridgeResult<ValueType> {
        Ok(self.lookup(index)?.value_type())
    }

    pub fn get_boolean(&self, index: usize) -> BridgeResult<bool> {
        let value = self.lookup(index)?;
        value
            .as_bool()
            .ok_or_else(|| unexpected(ValueType::Boolean, value))
    }

    pub fn get_int(&self, index: usize) -> BridgeResult<i32> {
        let value = self.lookup(index)?;
        value.as_i32().ok_or_else(|| unexpected(ValueType::Int, value))
    }

    pub fn get_double(&self, index: usize) -> BridgeResult<f64> {
        let value = self.lookup(index)?;
        value
            .as_f64()
            .ok_or_else(|| unexpected(ValueType::Double, value))
    }

    pub fn get_string(&self, index: usize) -> BridgeResult<&str> {
        let value = self.lookup(index)?;
        value
            .as_str()
            .ok_or_else(|| unexpected(ValueType::String, value))
    }

    pub fn get_map(&self, index: usize) -> BridgeResult<&ReadableMap> {
        let value = self.lookup(index)?;
        value.as_map().ok_or_else(|| unexpected(ValueType::Map, value))
    }

    pub fn get_array(&self, index: usize) -> BridgeResult<&ReadableArray> {
        let value = self.lookup(index)?;
        value
            .as_array()
            .ok_or_else(|| unexpected(ValueType::Array, value))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.items.iter().map(Value::to_json).collect())
    }
}

impl FromIterator<Value> for ReadableArray {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from_values(iter.into_iter().collect())
    }
}

impl fmt::Debug for ReadableArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl Serialize for ReadableArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for v in self.items.iter() {
            seq.serialize_element(v)?;
        }
        seq.end()
    }
}
