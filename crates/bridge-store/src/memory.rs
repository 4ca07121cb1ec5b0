use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use bridge_types::{
    BridgeError, BridgeResult, EngineId, KeyPolicy, NodeId, ReadableArray, ReadableMap, Value,
};
use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::config::EngineConfig;
use crate::traits::{ContainerKind, Position, StorageEngine};

/// A slot holds either a sealed value or a child node still owned by the
/// engine.
#[derive(Debug)]
enum Slot {
    Value(Value),
    Child(NodeId),
}

#[derive(Debug)]
enum Body {
    Map(IndexMap<String, Slot>),
    Array(Vec<Slot>),
}

impl Body {
    fn kind(&self) -> ContainerKind {
        match self {
            Self::Map(_) => ContainerKind::Map,
            Self::Array(_) => ContainerKind::Array,
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Map(entries) => entries.len(),
            Self::Array(items) => items.len(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Building,
    Attached { parent: NodeId },
}

#[derive(Debug)]
struct Node {
    body: Body,
    state: State,
    /// Levels in this node's subtree, counting the node itself.
    height: usize,
}

fn kind_mismatch(expected: ContainerKind, found: ContainerKind) -> BridgeError {
    BridgeError::type_mismatch(expected.to_string(), found.to_string())
}

/// Node table guarded by the engine lock.
#[derive(Debug, Default)]
struct NodeTable {
    nodes: HashMap<NodeId, Node>,
    /// Allocation watermark: every id below it has been handed out.
    next: u64,
}

impl NodeTable {
    fn allocate(&mut self, kind: ContainerKind) -> NodeId {
        let id = NodeId::from_raw(self.next);
        self.next += 1;
        let body = match kind {
            ContainerKind::Map => Body::Map(IndexMap::new()),
            ContainerKind::Array => Body::Array(Vec::new()),
        };
        self.nodes.insert(
            id,
            Node {
                body,
                state: State::Building,
                height: 1,
            },
        );
        id
    }

    fn building(&self, id: NodeId) -> BridgeResult<&Node> {
        match self.nodes.get(&id) {
            Some(node) if node.state == State::Building => Ok(node),
            Some(_) => Err(BridgeError::UseAfterConsume(id)),
            None if id.as_u64() < self.next => Err(BridgeError::UseAfterConsume(id)),
            None => Err(BridgeError::UnknownNode(id)),
        }
    }

    fn building_mut(&mut self, id: NodeId) -> BridgeResult<&mut Node> {
        self.building(id)?;
        self.nodes.get_mut(&id).ok_or(BridgeError::UnknownNode(id))
    }

    fn check_position(node: &Node, at: Position<'_>, policy: KeyPolicy) -> BridgeResult<()> {
        match (&node.body, at) {
            (Body::Map(_), Position::Key(key)) => policy.validate(key),
            (Body::Array(_), Position::Append) => Ok(()),
            (body, at) => Err(kind_mismatch(body.kind(), at.kind())),
        }
    }

    /// Store a slot in a building node. A replaced child subtree is freed.
    fn place(&mut self, id: NodeId, at: Position<'_>, slot: Slot) -> BridgeResult<()> {
        let node = self.building_mut(id)?;
        let replaced = match (&mut node.body, at) {
            (Body::Map(entries), Position::Key(key)) => entries.insert(key.to_owned(), slot),
            (Body::Array(items), Position::Append) => {
                items.push(slot);
                None
            }
            (body, at) => return Err(kind_mismatch(body.kind(), at.kind())),
        };
        if let Some(Slot::Child(old)) = replaced {
            let freed = self.free_subtree(old);
            trace!(node = %id, child = %old, freed, "replaced nested container");
        }
        Ok(())
    }

    /// Remove a node and everything below it. Returns the number of nodes
    /// removed.
    fn free_subtree(&mut self, root: NodeId) -> usize {
        let mut stack = vec![root];
        let mut freed = 0;
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.remove(&id) else {
                continue;
            };
            freed += 1;
            let children: Box<dyn Iterator<Item = &Slot>> = match &node.body {
                Body::Map(entries) => Box::new(entries.values()),
                Body::Array(items) => Box::new(items.iter()),
            };
            stack.extend(children.filter_map(|slot| match slot {
                Slot::Child(child) => Some(*child),
                Slot::Value(_) => None,
            }));
        }
        freed
    }

    /// Remove a node and its subtree, converting it into a sealed value.
    fn take(&mut self, id: NodeId) -> Value {
        let Some(node) = self.nodes.remove(&id) else {
            warn!(node = %id, "missing nested container while sealing");
            return Value::Null;
        };
        match node.body {
            Body::Map(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, slot)| (key, self.take_slot(slot)))
                    .collect(),
            ),
            Body::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|slot| self.take_slot(slot))
                    .collect(),
            ),
        }
    }

    fn take_slot(&mut self, slot: Slot) -> Value {
        match slot {
            Slot::Value(value) => value,
            Slot::Child(child) => self.take(child),
        }
    }

    fn seal(&mut self, id: NodeId, expected: ContainerKind) -> BridgeResult<Value> {
        let found = self.building(id)?.body.kind();
        if found != expected {
            return Err(kind_mismatch(expected, found));
        }
        Ok(self.take(id))
    }
}

/// In-memory, `HashMap`-based storage engine.
///
/// Intended for embedding and tests. Nodes are held in memory behind a
/// `RwLock`; sealed snapshots are moved out of the table, so a fully sealed
/// engine holds no nodes.
pub struct InMemoryEngine {
    id: EngineId,
    config: EngineConfig,
    table: RwLock<NodeTable>,
}

impl InMemoryEngine {
    /// Create an engine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let id = EngineId::new();
        debug!(engine = %id.short_id(), ?config, "storage engine created");
        Self {
            id,
            config,
            table: RwLock::new(NodeTable::default()),
        }
    }

    fn read(&self) -> BridgeResult<RwLockReadGuard<'_, NodeTable>> {
        self.table
            .read()
            .map_err(|e| BridgeError::Poisoned(e.to_string()))
    }

    fn write(&self) -> BridgeResult<RwLockWriteGuard<'_, NodeTable>> {
        self.table
            .write()
            .map_err(|e| BridgeError::Poisoned(e.to_string()))
    }
}

impl Default for InMemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageEngine for InMemoryEngine {
    fn id(&self) -> EngineId {
        self.id
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn allocate(&self, kind: ContainerKind) -> BridgeResult<NodeId> {
        let id = self.write()?.allocate(kind);
        trace!(node = %id, %kind, "allocated container");
        Ok(id)
    }

    fn insert(&self, node: NodeId, at: Position<'_>, value: Value) -> BridgeResult<()> {
        let mut table = self.write()?;
        NodeTable::check_position(table.building(node)?, at, self.config.key_policy)?;
        table.place(node, at, Slot::Value(value))
    }

    fn attach(&self, parent: NodeId, at: Position<'_>, child: NodeId) -> BridgeResult<()> {
        if parent == child {
            return Err(BridgeError::InvalidArgument(format!(
                "{child} cannot be inserted into itself"
            )));
        }
        let mut table = self.write()?;
        NodeTable::check_position(table.building(parent)?, at, self.config.key_policy)?;
        let height = table.building(child)?.height + 1;
        if height > self.config.max_depth {
            return Err(BridgeError::InvalidArgument(format!(
                "nesting {child} under {parent} exceeds the maximum depth of {}",
                self.config.max_depth
            )));
        }

        table.place(parent, at, Slot::Child(child))?;
        if let Some(node) = table.nodes.get_mut(&parent) {
            node.height = node.height.max(height);
        }
        if let Some(node) = table.nodes.get_mut(&child) {
            node.state = State::Attached { parent };
        }
        debug!(%parent, %child, height, "nested container consumed");
        Ok(())
    }

    fn merge(&self, node: NodeId, source: &ReadableMap) -> BridgeResult<()> {
        let mut table = self.write()?;
        let found = table.building(node)?.body.kind();
        if found != ContainerKind::Map {
            return Err(kind_mismatch(ContainerKind::Map, found));
        }
        for key in source.keys() {
            self.config.key_policy.validate(key)?;
        }
        for (key, value) in source.iter() {
            table.place(node, Position::Key(key), Slot::Value(value.clone()))?;
        }
        debug!(%node, merged = source.len(), "merged sealed map");
        Ok(())
    }

    fn len(&self, node: NodeId) -> BridgeResult<usize> {
        Ok(self.read()?.building(node)?.body.len())
    }

    fn contains_key(&self, node: NodeId, key: &str) -> BridgeResult<bool> {
        match &self.read()?.building(node)?.body {
            Body::Map(entries) => Ok(entries.contains_key(key)),
            Body::Array(_) => Err(kind_mismatch(ContainerKind::Map, ContainerKind::Array)),
        }
    }

    fn seal_map(&self, node: NodeId) -> BridgeResult<ReadableMap> {
        let sealed = self.write()?.seal(node, ContainerKind::Map)?;
        debug!(%node, "sealed map");
        match sealed {
            Value::Map(map) => Ok(map),
            other => Err(BridgeError::type_mismatch(
                "map",
                other.value_type().to_string(),
            )),
        }
    }

    fn seal_array(&self, node: NodeId) -> BridgeResult<ReadableArray> {
        let sealed = self.write()?.seal(node, ContainerKind::Array)?;
        debug!(%node, "sealed array");
        match sealed {
            Value::Array(array) => Ok(array),
            other => Err(BridgeError::type_mismatch(
                "array",
                other.value_type().to_string(),
            )),
        }
    }

    fn release(&self, node: NodeId) {
        let mut table = match self.table.write() {
            Ok(table) => table,
            Err(e) => {
                warn!(%node, error = %e, "engine lock poisoned; leaking container");
                return;
            }
        };
        match table.nodes.get(&node).map(|n| n.state) {
            Some(State::Building) => {
                let freed = table.free_subtree(node);
                trace!(%node, freed, "released unsealed container");
            }
            Some(State::Attached { parent }) => {
                trace!(%node, %parent, "container owned by parent; release skipped");
            }
            None => {}
        }
    }

    fn live_nodes(&self) -> usize {
        self.read().map(|table| table.nodes.len()).unwrap_or(0)
    }
}

impl std::fmt::Debug for InMemoryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryEngine")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("live_nodes", &self.live_nodes())
            .finish()
    }
}
