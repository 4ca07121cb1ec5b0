use std::fmt;

use serde::{Deserialize, Serialize};

/// Engine-local identifier of a container node.
///
/// Ids are allocated monotonically by an engine and never reused, so an id
/// below the engine's allocation watermark that is no longer live always
/// refers to a consumed container.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Create a node id from its raw value.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw numeric value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Identity of a storage engine instance (UUID v7).
///
/// Containers remember the engine that allocated them; moving a container
/// into a parent owned by another engine is a type mismatch.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EngineId(uuid::Uuid);

impl EngineId {
    /// Generate a fresh engine id.
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Short representation (first 8 characters of the UUID).
    pub fn short_id(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for EngineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EngineId({})", self.short_id())
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_ids_order_by_allocation() {
        let a = NodeId::from_raw(1);
        let b = NodeId::from_raw(2);
        assert!(a < b);
        assert_eq!(b.as_u64(), 2);
    }

    #[test]
    fn node_id_display() {
        assert_eq!(NodeId::from_raw(3).to_string(), "node#3");
        assert_eq!(format!("{:?}", NodeId::from_raw(3)), "NodeId(3)");
    }

    #[test]
    fn engine_ids_are_unique() {
        assert_ne!(EngineId::new(), EngineId::new());
    }

    #[test]
    fn engine_short_id_is_8_chars() {
        assert_eq!(EngineId::new().short_id().len(), 8);
    }

    #[test]
    fn engine_id_serde_roundtrip() {
        let id = EngineId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: EngineId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }
}
