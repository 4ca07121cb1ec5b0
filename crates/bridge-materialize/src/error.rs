use std::fmt::Display;

use bridge_types::BridgeError;
use thiserror::Error;

/// Errors from materializing a value into a map.
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// The top-level value does not serialize as a struct.
    #[error("expected a struct, found {0}")]
    NotAStruct(&'static str),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// Raised by a `Serialize` implementation.
    #[error("{0}")]
    Custom(String),
}

impl serde::ser::Error for MaterializeError {
    fn custom<T: Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}
