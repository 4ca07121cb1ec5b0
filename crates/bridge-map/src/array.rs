use std::fmt;
use std::sync::Arc;

use bridge_store::{ContainerKind, Position, StorageEngine};
use bridge_types::{BridgeResult, EngineId, NodeId, ReadableArray, Value};
use tracing::debug;

use crate::map::{ensure_same_engine, WritableMap};

/// A write-only array under construction.
///
/// The array counterpart of [`WritableMap`]: values are appended with
/// `push*`, nested containers are consumed by [`push_map`](Self::push_map)
/// and [`push_array`](Self::push_array).
pub struct WritableArray {
    engine: Arc<dyn StorageEngine>,
    node: NodeId,
}

impl WritableArray {
    /// Allocate an empty array in `engine`.
    pub fn new(engine: Arc<dyn StorageEngine>) -> BridgeResult<Self> {
        let node = engine.allocate(ContainerKind::Array)?;
        Ok(Self { engine, node })
    }

    pub fn node_id(&self) -> NodeId {
        self.node
    }

    pub fn engine_id(&self) -> EngineId {
        self.engine.id()
    }

    fn append(&mut self, value: Value) -> BridgeResult<()> {
        self.engine.insert(self.node, Position::Append, value)
    }

    pub fn push_null(&mut self) -> BridgeResult<()> {
        self.append(Value::Null)
    }

    pub fn push_boolean(&mut self, value: bool) -> BridgeResult<()> {
        self.append(Value::Boolean(value))
    }

    pub fn push_int(&mut self, value: i32) -> BridgeResult<()> {
        self.append(Value::Int(value))
    }

    pub fn push_double(&mut self, value: f64) -> BridgeResult<()> {
        self.append(Value::Double(value))
    }

    pub fn push_string(&mut self, value: impl Into<String>) -> BridgeResult<()> {
        self.append(Value::String(value.into()))
    }

    /// Push any value. `None` is stored as null.
    pub fn push(&mut self, value: impl Into<Value>) -> BridgeResult<()> {
        self.append(value.into())
    }

    /// Move `value` to the end of this array, consuming it.
    pub fn push_map(&mut self, value: WritableMap) -> BridgeResult<()> {
        ensure_same_engine(self.engine.as_ref(), value.engine_id(), ContainerKind::Map)?;
        self.engine
            .attach(self.node, Position::Append, value.node_id())
    }

    /// Move `value` to the end of this array, consuming it.
    pub fn push_array(&mut self, value: WritableArray) -> BridgeResult<()> {
        ensure_same_engine(
            self.engine.as_ref(),
            value.engine_id(),
            ContainerKind::Array,
        )?;
        self.engine
            .attach(self.node, Position::Append, value.node_id())
    }

    pub fn len(&self) -> BridgeResult<usize> {
        self.engine.len(self.node)
    }

    pub fn is_empty(&self) -> BridgeResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Seal the array for hand-off, consuming the handle.
    pub fn seal(self) -> BridgeResult<ReadableArray> {
        let sealed = self.engine.seal_array(self.node)?;
        debug!(node = %self.node, items = sealed.len(), "array handed off");
        Ok(sealed)
    }
}

impl Drop for WritableArray {
    fn drop(&mut self) {
        self.engine.release(self.node);
    }
}

impl fmt::Debug for WritableArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WritableArray")
            .field("engine", &self.engine.id())
            .field("node", &self.node)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::Arguments;
    use bridge_types::{BridgeError, ValueType};

    #[test]
    fn push_every_kind() {
        let a = Arguments::in_memory();
        let mut arr = a.create_array().unwrap();
        arr.push_null().unwrap();
        arr.push_boolean(true).unwrap();
        arr.push_int(3).unwrap();
        arr.push_double(4.5).unwrap();
        arr.push_string("five").unwrap();
        arr.push(None::<i32>).unwrap();
        assert_eq!(arr.len().unwrap(), 6);

        let r = arr.seal().unwrap();
        let types: Vec<ValueType> = r.iter().map(Value::value_type).collect();
        assert_eq!(
            types,
            vec![
                ValueType::Null,
                ValueType::Boolean,
                ValueType::Int,
                ValueType::Double,
                ValueType::String,
                ValueType::Null,
            ]
        );
    }

    #[test]
    fn nested_containers_keep_order() {
        let a = Arguments::in_memory();
        let mut outer = a.create_array().unwrap();
        let mut inner = a.create_array().unwrap();
        inner.push_int(1).unwrap();
        let mut obj = a.create_map().unwrap();
        obj.put_string("k", "v").unwrap();

        outer.push_array(inner).unwrap();
        outer.push_map(obj).unwrap();

        let r = outer.seal().unwrap();
        assert_eq!(r.get_array(0).unwrap().get_int(0).unwrap(), 1);
        assert_eq!(r.get_map(1).unwrap().get_string("k").unwrap(), "v");
    }

    #[test]
    fn foreign_child_is_a_type_mismatch() {
        let mut arr = Arguments::in_memory().create_array().unwrap();
        let foreign = Arguments::in_memory().create_array().unwrap();
        let err = arr.push_array(foreign).unwrap_err();
        assert!(matches!(err, BridgeError::TypeMismatch { .. }));
        assert!(arr.is_empty().unwrap());
    }

    #[test]
    fn consumed_array_id_is_rejected() {
        let a = Arguments::in_memory();
        let mut outer = a.create_array().unwrap();
        let inner = a.create_array().unwrap();
        let inner_node = inner.node_id();
        outer.push_array(inner).unwrap();
        assert_eq!(
            a.engine().insert(inner_node, Position::Append, Value::Null),
            Err(BridgeError::UseAfterConsume(inner_node))
        );
    }
}
