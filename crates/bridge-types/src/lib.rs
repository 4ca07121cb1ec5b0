//! Foundation types for bridge containers.
//!
//! This crate provides the value model and the read-only container contract
//! shared by every other bridge crate. Writable containers live in
//! `bridge-map`; the storage engine behind them lives in `bridge-store`.
//!
//! # Key Types
//!
//! - [`Value`]: Closed set of storable values (null, boolean, int, double, string, map, array)
//! - [`ValueType`]: Type tag of a [`Value`]
//! - [`ReadableMap`]: Immutable, ordered, sealed map
//! - [`ReadableArray`]: Immutable, sealed array
//! - [`NodeId`]: Engine-local handle of a container under construction
//! - [`EngineId`]: Identity of a storage engine instance
//! - [`KeyPolicy`]: Key validation policy
//! - [`BridgeError`]: Error taxonomy for all container operations

pub mod error;
pub mod id;
pub mod key;
pub mod kind;
pub mod readable;
pub mod value;

pub use error::{BridgeError, BridgeResult};
pub use id::{EngineId, NodeId};
pub use key::KeyPolicy;
pub use kind::ValueType;
pub use readable::{ReadableArray, ReadableMap};
pub use value::Value;
