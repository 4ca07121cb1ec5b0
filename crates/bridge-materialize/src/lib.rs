//! Object-to-container materialization.
//!
//! Copies the fields of a plain Rust value into a fresh
//! [`WritableMap`](bridge_map::WritableMap). Only a closed set of declared
//! field types is copied:
//!
//! | Declared type | Entry |
//! |---------------|-------|
//! | `String` / `Option<String>` | string (null when `None`) |
//! | `i32` / `Option<i32>` | int (null when `None`) |
//! | `f64` / `Option<f64>` | double (null when `None`) |
//! | `bool` / `Option<bool>` | boolean (null when `None`) |
//! | anything else | skipped, no entry |
//!
//! # Entry Points
//!
//! - [`from_object`]: explicit schema: the type lists its fields through
//!   [`DeclaredFields`], usually via [`declare_fields!`]
//! - [`from_serialize`]: opt-in reflection over any `serde::Serialize`
//!   struct; `None` fields are omitted instead of becoming null entries
//!
//! Only the value's own fields are visited. Embedded structs are not
//! expanded; their fields never appear in the result.
//!
//! ```
//! use bridge_map::Arguments;
//! use bridge_materialize::{declare_fields, from_object};
//!
//! struct Person {
//!     name: String,
//!     age: Option<i32>,
//!     tags: Vec<String>,
//! }
//!
//! declare_fields!(Person { name, age, tags });
//!
//! let person = Person { name: "Jo".into(), age: None, tags: vec![] };
//! let map = from_object(&Arguments::in_memory(), &person).unwrap().seal().unwrap();
//! assert_eq!(map.get_string("name").unwrap(), "Jo");
//! assert!(map.is_null("age"));
//! assert!(!map.has_key("tags"));
//! ```

pub mod descriptor;
pub mod error;
pub mod materializer;
pub mod reflect;

pub use descriptor::{DeclaredFields, FieldDescriptor, FieldKind, FieldValue, TypeTag};
pub use error::MaterializeError;
pub use materializer::{from_object, ObjectMaterializer};
pub use reflect::from_serialize;
