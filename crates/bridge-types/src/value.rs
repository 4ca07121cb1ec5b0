use serde::ser::{Serialize, Serializer};

use crate::kind::ValueType;
use crate::readable::{ReadableArray, ReadableMap};

/// A single stored value.
///
/// The set of kinds is closed: five primitives plus the two composite kinds.
/// Composite values are sealed snapshots and therefore immutable.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i32),
    Double(f64),
    String(String),
    Map(ReadableMap),
    Array(ReadableArray),
}

impl Value {
    /// The type tag of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Null => ValueType::Null,
            Self::Boolean(_) => ValueType::Boolean,
            Self::Int(_) => ValueType::Int,
            Self::Double(_) => ValueType::Double,
            Self::String(_) => ValueType::String,
            Self::Map(_) => ValueType::Map,
            Self::Array(_) => ValueType::Array,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The value as a double. Ints widen losslessly.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(f64::from(*i)),
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ReadableMap> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ReadableArray> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Convert into a JSON value.
    ///
    /// Non-finite doubles have no JSON representation and become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::from(*i),
            Self::Double(d) => serde_json::Number::from_f64(*d)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Map(m) => m.to_json(),
            Self::Array(a) => a.to_json(),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i32(*i),
            Self::Double(d) => serializer.serialize_f64(*d),
            Self::String(s) => serializer.serialize_str(s),
            Self::Map(m) => m.serialize(serializer),
            Self::Array(a) => a.serialize(serializer),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<ReadableMap> for Value {
    fn from(m: ReadableMap) -> Self {
        Self::Map(m)
    }
}

impl From<ReadableArray> for Value {
    fn from(a: ReadableArray) -> Self {
        Self::Array(a)
    }
}

/// `None` is stored as [`Value::Null`].
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_types() {
        assert_eq!(Value::Null.value_type(), ValueType::Null);
        assert_eq!(Value::from(true).value_type(), ValueType::Boolean);
        assert_eq!(Value::from(1).value_type(), ValueType::Int);
        assert_eq!(Value::from(1.5).value_type(), ValueType::Double);
        assert_eq!(Value::from("x").value_type(), ValueType::String);
        assert_eq!(Value::from(ReadableMap::new()).value_type(), ValueType::Map);
        assert_eq!(
            Value::from(ReadableArray::new()).value_type(),
            ValueType::Array
        );
    }

    #[test]
    fn none_becomes_null() {
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(Some(3)), Value::Int(3));
    }

    #[test]
    fn int_widens_to_double() {
        assert_eq!(Value::Int(7).as_f64(), Some(7.0));
        assert_eq!(Value::Double(7.5).as_i32(), None);
    }

    #[test]
    fn json_conversion() {
        assert_eq!(Value::Int(3).to_json(), serde_json::json!(3));
        assert_eq!(Value::Double(1.5).to_json(), serde_json::json!(1.5));
        assert_eq!(Value::from("hi").to_json(), serde_json::json!("hi"));
        assert_eq!(Value::Null.to_json(), serde_json::Value::Null);
    }

    #[test]
    fn non_finite_double_is_json_null() {
        assert_eq!(Value::Double(f64::NAN).to_json(), serde_json::Value::Null);
        assert_eq!(
            Value::Double(f64::INFINITY).to_json(),
            serde_json::Value::Null
        );
    }

    #[test]
    fn serialize_matches_to_json() {
        let v = Value::from("serialized");
        let via_serde = serde_json::to_value(&v).unwrap();
        assert_eq!(via_serde, v.to_json());
    }
}
