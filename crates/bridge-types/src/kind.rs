use std::fmt;

use serde::{Deserialize, Serialize};

/// The type tag of a stored value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Null,
    Boolean,
    /// 32-bit signed integer.
    Int,
    /// 64-bit floating point.
    Double,
    String,
    /// Nested map.
    Map,
    /// Nested array.
    Array,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean => write!(f, "boolean"),
            Self::Int => write!(f, "int"),
            Self::Double => write!(f, "double"),
            Self::String => write!(f, "string"),
            Self::Map => write!(f, "map"),
            Self::Array => write!(f, "array"),
        }
    }
}
