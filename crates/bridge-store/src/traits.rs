use std::fmt;

use bridge_types::{BridgeResult, EngineId, NodeId, ReadableArray, ReadableMap, Value};

use crate::config::EngineConfig;

/// Shape of a container node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Map,
    Array,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Map => write!(f, "map"),
            Self::Array => write!(f, "array"),
        }
    }
}

/// Where a value goes inside a node: under a key (maps) or at the end
/// (arrays).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position<'a> {
    Key(&'a str),
    Append,
}

impl Position<'_> {
    /// The container kind this position addresses.
    pub fn kind(&self) -> ContainerKind {
        match self {
            Self::Key(_) => ContainerKind::Map,
            Self::Append => ContainerKind::Array,
        }
    }
}

/// Backing store for writable containers.
///
/// All implementations must satisfy these invariants:
/// - A node accepts operations only while it is building. Once attached to a
///   parent or sealed, every operation on its id fails with
///   `UseAfterConsume`; ids the engine never allocated fail with
///   `UnknownNode`.
/// - Keyed inserts overwrite in place: the key keeps its position and the
///   entry count does not grow.
/// - Replacing or releasing a slot that owns a child frees the child's whole
///   subtree.
/// - Operations validate everything before mutating.
///
/// Engines are shared between threads; a single node must still only be
/// driven by its one owning handle.
pub trait StorageEngine: Send + Sync + fmt::Debug {
    /// Identity of this engine instance.
    fn id(&self) -> EngineId;

    /// The configuration this engine was built with.
    fn config(&self) -> &EngineConfig;

    /// Allocate a new, empty, building node.
    fn allocate(&self, kind: ContainerKind) -> BridgeResult<NodeId>;

    /// Insert a sealed value into a building node.
    ///
    /// Fails with `TypeMismatch` if the position does not match the node's
    /// kind, and with `InvalidArgument` if the key policy rejects the key.
    fn insert(&self, node: NodeId, at: Position<'_>, value: Value) -> BridgeResult<()>;

    /// Move a building child node into a building parent node, consuming
    /// the child. Rejects nesting deeper than [`EngineConfig::max_depth`].
    fn attach(&self, parent: NodeId, at: Position<'_>, child: NodeId) -> BridgeResult<()>;

    /// Copy every entry of a sealed map into a building map node, in source
    /// order, overwriting colliding keys. The source is not consumed.
    fn merge(&self, node: NodeId, source: &ReadableMap) -> BridgeResult<()>;

    /// Number of entries in a building node.
    fn len(&self, node: NodeId) -> BridgeResult<usize>;

    /// Whether a building map node has an entry for `key`.
    fn contains_key(&self, node: NodeId, key: &str) -> BridgeResult<bool>;

    /// Detach a building map node and its subtree into an immutable map.
    fn seal_map(&self, node: NodeId) -> BridgeResult<ReadableMap>;

    /// Detach a building array node and its subtree into an immutable array.
    fn seal_array(&self, node: NodeId) -> BridgeResult<ReadableArray>;

    /// Free a building node and its subtree.
    ///
    /// Releasing a consumed, attached, or unknown node is a no-op, so handles
    /// may release unconditionally when dropped.
    fn release(&self, node: NodeId);

    /// Number of nodes currently held (building or attached).
    fn live_nodes(&self) -> usize;
}
