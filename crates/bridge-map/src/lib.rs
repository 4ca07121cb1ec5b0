//! Write-once bridge containers.
//!
//! A [`WritableMap`] or [`WritableArray`] is a move-only handle to a node in
//! a storage engine. Containers are filled with typed `put*` / `push*`
//! calls, nested by moving child handles into a parent, and finally sealed
//! into an immutable [`ReadableMap`] / [`ReadableArray`] for hand-off.
//!
//! ```
//! use bridge_map::Arguments;
//!
//! # fn main() -> bridge_map::BridgeResult<()> {
//! let args = Arguments::in_memory();
//! let mut user = args.create_map()?;
//! user.put_string("name", "Jo")?;
//! user.put_int("age", 30)?;
//!
//! let mut root = args.create_map()?;
//! root.put_map("user", user)?; // `user` is consumed here
//!
//! let sealed = root.seal()?;
//! assert_eq!(sealed.get_map("user")?.get_string("name")?, "Jo");
//! # Ok(())
//! # }
//! ```
//!
//! # Ownership
//!
//! Child handles are taken by value, so reusing a consumed child is a
//! compile error. Handles are `Send` but not `Clone`: one owner builds a
//! container, then hands off the sealed snapshot.

pub mod arguments;
pub mod array;
pub mod map;

pub use arguments::Arguments;
pub use array::WritableArray;
pub use map::WritableMap;

// Re-export the read side and the engine contract for convenience.
pub use bridge_store::{EngineConfig, InMemoryEngine, StorageEngine};
pub use bridge_types::{
    BridgeError, BridgeResult, KeyPolicy, ReadableArray, ReadableMap, Value, ValueType,
};
