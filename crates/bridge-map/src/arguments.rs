//! Container factory.
//!
//! [`Arguments`] owns a handle to the storage engine and is the single place
//! containers are created from. It also converts JSON documents into
//! containers.

use std::sync::Arc;

use bridge_store::{EngineConfig, InMemoryEngine, StorageEngine};
use bridge_types::{BridgeError, BridgeResult, ReadableMap, Value};
use serde_json::Value as Json;

use crate::array::WritableArray;
use crate::map::WritableMap;

/// Factory for containers backed by one storage engine.
#[derive(Clone, Debug)]
pub struct Arguments {
    engine: Arc<dyn StorageEngine>,
}

impl Arguments {
    /// Create a factory over an existing engine.
    pub fn new(engine: Arc<dyn StorageEngine>) -> Self {
        Self { engine }
    }

    /// Factory over a fresh in-memory engine with the default configuration.
    pub fn in_memory() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Factory over a fresh in-memory engine.
    pub fn with_config(config: EngineConfig) -> Self {
        Self::new(Arc::new(InMemoryEngine::with_config(config)))
    }

    pub fn engine(&self) -> &Arc<dyn StorageEngine> {
        &self.engine
    }

    pub fn create_map(&self) -> BridgeResult<WritableMap> {
        WritableMap::new(Arc::clone(&self.engine))
    }

    pub fn create_array(&self) -> BridgeResult<WritableArray> {
        WritableArray::new(Arc::clone(&self.engine))
    }

    /// A writable copy of a sealed map.
    pub fn copy_readable(&self, source: &ReadableMap) -> BridgeResult<WritableMap> {
        let mut map = self.create_map()?;
        map.merge(source)?;
        Ok(map)
    }

    /// Build a map from a JSON object.
    ///
    /// Integers that fit in 32 bits become ints; every other number becomes
    /// a double. Fails with `TypeMismatch` if `json` is not an object and
    /// with `InvalidArgument` if it nests deeper than the engine's
    /// `max_depth`.
    pub fn map_from_json(&self, json: &Json) -> BridgeResult<WritableMap> {
        match json {
            Json::Object(object) => self.build_map(object, 1),
            other => Err(BridgeError::type_mismatch("object", json_kind(other))),
        }
    }

    /// Build an array from a JSON array.
    pub fn array_from_json(&self, json: &Json) -> BridgeResult<WritableArray> {
        match json {
            Json::Array(items) => self.build_array(items, 1),
            other => Err(BridgeError::type_mismatch("array", json_kind(other))),
        }
    }

    fn check_depth(&self, depth: usize) -> BridgeResult<()> {
        let max = self.engine.config().max_depth;
        if depth > max {
            return Err(BridgeError::InvalidArgument(format!(
                "document nests deeper than the maximum depth of {max}"
            )));
        }
        Ok(())
    }

    fn build_map(
        &self,
        object: &serde_json::Map<String, Json>,
        depth: usize,
    ) -> BridgeResult<WritableMap> {
        self.check_depth(depth)?;
        let mut map = self.create_map()?;
        for (key, value) in object {
            match value {
                Json::Object(inner) => map.put_map(key, self.build_map(inner, depth + 1)?)?,
                Json::Array(items) => map.put_array(key, self.build_array(items, depth + 1)?)?,
                scalar => map.put(key, scalar_value(scalar))?,
            }
        }
        Ok(map)
    }

    fn build_array(&self, items: &[Json], depth: usize) -> BridgeResult<WritableArray> {
        self.check_depth(depth)?;
        let mut array = self.create_array()?;
        for value in items {
            match value {
                Json::Object(inner) => array.push_map(self.build_map(inner, depth + 1)?)?,
                Json::Array(nested) => array.push_array(self.build_array(nested, depth + 1)?)?,
                scalar => array.push(scalar_value(scalar))?,
            }
        }
        Ok(array)
    }
}

fn scalar_value(json: &Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Boolean(*b),
        Json::Number(n) => match n.as_i64().and_then(|i| i32::try_from(i).ok()) {
            Some(i) => Value::Int(i),
            None => Value::Double(n.as_f64().unwrap_or(f64::NAN)),
        },
        Json::String(s) => Value::String(s.clone()),
        // Composites are handled by the callers.
        Json::Object(_) | Json::Array(_) => Value::Null,
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_types::ValueType;
    use serde_json::json;

    #[test]
    fn create_containers_share_engine() {
        let a = Arguments::in_memory();
        let m = a.create_map().unwrap();
        let arr = a.create_array().unwrap();
        assert_eq!(m.engine_id(), arr.engine_id());
        assert_eq!(m.engine_id(), a.engine().id());
    }

    #[test]
    fn cloned_factory_shares_engine() {
        let a = Arguments::in_memory();
        let b = a.clone();
        let mut root = a.create_map().unwrap();
        root.put_map("child", b.create_map().unwrap()).unwrap();
        assert_eq!(root.len().unwrap(), 1);
    }

    #[test]
    fn map_from_json_object() {
        let a = Arguments::in_memory();
        let doc = json!({
            "name": "Jo",
            "age": 30,
            "score": 1.5,
            "active": true,
            "nothing": null,
            "big": 5_000_000_000_i64,
            "whole": 2.0,
            "tags": ["a", {"nested": 1}, [null]],
            "inner": {"x": -1}
        });
        let r = a.map_from_json(&doc).unwrap().seal().unwrap();

        assert_eq!(r.get_string("name").unwrap(), "Jo");
        assert_eq!(r.get_int("age").unwrap(), 30);
        assert_eq!(r.get_double("score").unwrap(), 1.5);
        assert!(r.get_boolean("active").unwrap());
        assert!(r.is_null("nothing"));
        assert_eq!(r.get_type("big").unwrap(), ValueType::Double);
        assert_eq!(r.get_type("whole").unwrap(), ValueType::Double);

        let tags = r.get_array("tags").unwrap();
        assert_eq!(tags.get_string(0).unwrap(), "a");
        assert_eq!(tags.get_map(1).unwrap().get_int("nested").unwrap(), 1);
        assert!(tags.get_array(2).unwrap().is_null(0));
        assert_eq!(r.get_map("inner").unwrap().get_int("x").unwrap(), -1);
    }

    #[test]
    fn map_from_json_preserves_entry_order() {
        let a = Arguments::in_memory();
        let doc = json!({"z": 1, "a": 2, "m": 3});
        let r = a.map_from_json(&doc).unwrap().seal().unwrap();
        assert_eq!(r.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }

    #[test]
    fn json_roundtrip_through_sealed_map() {
        let a = Arguments::in_memory();
        let doc = json!({"a": 1, "b": [true, null, "s"], "c": {"d": 0.5}});
        let r = a.map_from_json(&doc).unwrap().seal().unwrap();
        assert_eq!(r.to_json(), doc);
    }

    #[test]
    fn map_from_json_rejects_non_object() {
        let a = Arguments::in_memory();
        let err = a.map_from_json(&json!([1, 2])).unwrap_err();
        assert_eq!(err, BridgeError::type_mismatch("object", "array"));
        let err = a.array_from_json(&json!({"a": 1})).unwrap_err();
        assert_eq!(err, BridgeError::type_mismatch("array", "object"));
    }

    #[test]
    fn array_from_json() {
        let a = Arguments::in_memory();
        let r = a
            .array_from_json(&json!([1, "two", {"three": 3}]))
            .unwrap()
            .seal()
            .unwrap();
        assert_eq!(r.len(), 3);
        assert_eq!(r.get_map(2).unwrap().get_int("three").unwrap(), 3);
    }

    #[test]
    fn depth_limit_applies_and_leaks_nothing() {
        let a = Arguments::with_config(EngineConfig {
            max_depth: 2,
            ..Default::default()
        });
        assert!(a.map_from_json(&json!({"a": {"b": 1}})).is_ok());

        let err = a.map_from_json(&json!({"a": {"b": {"c": 1}}})).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArgument(_)));
        assert_eq!(a.engine().live_nodes(), 0);
    }

    #[test]
    fn empty_json_key_follows_policy() {
        let doc = json!({"": 1});
        let strict = Arguments::in_memory();
        assert!(matches!(
            strict.map_from_json(&doc),
            Err(BridgeError::InvalidArgument(_))
        ));
        let lenient = Arguments::with_config(EngineConfig::lenient());
        assert!(lenient.map_from_json(&doc).is_ok());
    }

    #[test]
    fn copy_readable_makes_independent_copy() {
        let a = Arguments::in_memory();
        let source = a.map_from_json(&json!({"k": 1})).unwrap().seal().unwrap();
        let mut copy = a.copy_readable(&source).unwrap();
        copy.put_int("k", 2).unwrap();
        assert_eq!(copy.seal().unwrap().get_int("k").unwrap(), 2);
        assert_eq!(source.get_int("k").unwrap(), 1);
    }
}
