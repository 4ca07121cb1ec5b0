use std::fmt;
use std::sync::Arc;

use bridge_store::{ContainerKind, Position, StorageEngine};
use bridge_types::{BridgeError, BridgeResult, EngineId, NodeId, ReadableMap, Value};
use tracing::debug;

use crate::array::WritableArray;

/// Reject children allocated by another engine instance.
pub(crate) fn ensure_same_engine(
    engine: &dyn StorageEngine,
    child: EngineId,
    kind: ContainerKind,
) -> BridgeResult<()> {
    if engine.id() != child {
        return Err(BridgeError::type_mismatch(
            format!("{kind} from engine {}", engine.id().short_id()),
            format!("{kind} from engine {}", child.short_id()),
        ));
    }
    Ok(())
}

/// A write-only map under construction.
///
/// Every `put*` inserts or overwrites the entry at `key`; an overwritten key
/// keeps its original position. Failed calls leave the map unchanged.
///
/// Dropping a map that was never sealed or moved into a parent frees its
/// storage.
pub struct WritableMap {
    engine: Arc<dyn StorageEngine>,
    node: NodeId,
}

impl WritableMap {
    /// Allocate an empty map in `engine`.
    pub fn new(engine: Arc<dyn StorageEngine>) -> BridgeResult<Self> {
        let node = engine.allocate(ContainerKind::Map)?;
        Ok(Self { engine, node })
    }

    /// The engine node backing this map.
    pub fn node_id(&self) -> NodeId {
        self.node
    }

    /// The engine this map was allocated in.
    pub fn engine_id(&self) -> EngineId {
        self.engine.id()
    }

    fn insert(&mut self, key: &str, value: Value) -> BridgeResult<()> {
        self.engine.insert(self.node, Position::Key(key), value)
    }

    pub fn put_null(&mut self, key: &str) -> BridgeResult<()> {
        self.insert(key, Value::Null)
    }

    pub fn put_boolean(&mut self, key: &str, value: bool) -> BridgeResult<()> {
        self.insert(key, Value::Boolean(value))
    }

    pub fn put_int(&mut self, key: &str, value: i32) -> BridgeResult<()> {
        self.insert(key, Value::Int(value))
    }

    pub fn put_double(&mut self, key: &str, value: f64) -> BridgeResult<()> {
        self.insert(key, Value::Double(value))
    }

    pub fn put_string(&mut self, key: &str, value: impl Into<String>) -> BridgeResult<()> {
        self.insert(key, Value::String(value.into()))
    }

    /// Put any value. `None` is stored as null.
    pub fn put(&mut self, key: &str, value: impl Into<Value>) -> BridgeResult<()> {
        self.insert(key, value.into())
    }

    /// Move `value` into this map under `key`.
    ///
    /// The child is consumed even if the call fails; on failure its storage
    /// is released. Fails with `TypeMismatch` if the child was allocated by
    /// another engine and with `InvalidArgument` if the result would nest
    /// deeper than the engine's `max_depth`.
    pub fn put_map(&mut self, key: &str, value: WritableMap) -> BridgeResult<()> {
        ensure_same_engine(self.engine.as_ref(), value.engine_id(), ContainerKind::Map)?;
        self.engine
            .attach(self.node, Position::Key(key), value.node_id())
    }

    /// Move `value` into this map under `key`. Same contract as
    /// [`put_map`](Self::put_map).
    pub fn put_array(&mut self, key: &str, value: WritableArray) -> BridgeResult<()> {
        ensure_same_engine(
            self.engine.as_ref(),
            value.engine_id(),
            ContainerKind::Array,
        )?;
        self.engine
            .attach(self.node, Position::Key(key), value.node_id())
    }

    /// Copy every entry of `source` into this map, overwriting colliding
    /// keys. `source` is only borrowed and stays fully usable.
    pub fn merge(&mut self, source: &ReadableMap) -> BridgeResult<()> {
        self.engine.merge(self.node, source)
    }

    /// Merge from a dynamically typed value, which must be a sealed map.
    pub fn merge_value(&mut self, source: &Value) -> BridgeResult<()> {
        match source {
            Value::Map(map) => self.merge(map),
            other => Err(BridgeError::type_mismatch(
                "map",
                other.value_type().to_string(),
            )),
        }
    }

    pub fn len(&self) -> BridgeResult<usize> {
        self.engine.len(self.node)
    }

    pub fn is_empty(&self) -> BridgeResult<bool> {
        Ok(self.len()? == 0)
    }

    pub fn contains_key(&self, key: &str) -> BridgeResult<bool> {
        self.engine.contains_key(self.node, key)
    }

    /// Seal the map for hand-off, consuming the handle.
    pub fn seal(self) -> BridgeResult<ReadableMap> {
        let sealed = self.engine.seal_map(self.node)?;
        debug!(node = %self.node, entries = sealed.len(), "map handed off");
        Ok(sealed)
    }
}

impl Drop for WritableMap {
    fn drop(&mut self) {
        self.engine.release(self.node);
    }
}

impl fmt::Debug for WritableMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WritableMap")
            .field("engine", &self.engine.id())
            .field("node", &self.node)
            .finish()
    }
}
