//! Storage engine for bridge containers.
//!
//! Writable containers are thin handles; the entries themselves live in a
//! storage engine that is constructed explicitly and shared by every
//! container it allocates. Nothing here is process-global.
//!
//! # Storage Backends
//!
//! All backends implement the [`StorageEngine`] trait:
//!
//! - [`InMemoryEngine`] -- `HashMap`-based node table behind a `RwLock`
//!
//! # Design Rules
//!
//! 1. A node is either building (owned by exactly one handle) or attached
//!    (owned by its parent). Only building nodes accept operations.
//! 2. Attaching or sealing consumes a node; every later operation on its id
//!    fails with `UseAfterConsume`.
//! 3. Node ids are never reused.
//! 4. Every operation validates fully before mutating: it either applies
//!    completely or leaves the table untouched.
//! 5. Sealing detaches a whole subtree into an immutable snapshot and frees
//!    its nodes.

pub mod config;
pub mod memory;
pub mod traits;

pub use config::EngineConfig;
pub use memory::InMemoryEngine;
pub use traits::{ContainerKind, Position, StorageEngine};
