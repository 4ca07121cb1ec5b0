//! Field descriptors and the declared-type dispatch table.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

use bridge_types::Value;

/// Declared type of a field, as seen by the materializer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    String,
    Integer,
    Double,
    Boolean,
    Unsupported,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "integer"),
            Self::Double => write!(f, "double"),
            Self::Boolean => write!(f, "boolean"),
            Self::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Declared type tag plus current runtime value of one field.
///
/// `None` payloads are null values of a supported declared type.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    String(Option<String>),
    Integer(Option<i32>),
    Double(Option<f64>),
    Boolean(Option<bool>),
    Unsupported,
}

impl FieldValue {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Self::String(_) => TypeTag::String,
            Self::Integer(_) => TypeTag::Integer,
            Self::Double(_) => TypeTag::Double,
            Self::Boolean(_) => TypeTag::Boolean,
            Self::Unsupported => TypeTag::Unsupported,
        }
    }

    /// The entry this field produces, or `None` if it is skipped.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::String(v) => Some(v.into()),
            Self::Integer(v) => Some(v.into()),
            Self::Double(v) => Some(v.into()),
            Self::Boolean(v) => Some(v.into()),
            Self::Unsupported => None,
        }
    }
}

/// One field of a source object.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub value: FieldValue,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Types that list their own fields, in declaration order.
///
/// Implement by hand or with [`declare_fields!`](crate::declare_fields).
pub trait DeclaredFields {
    fn declared_fields(&self) -> Vec<FieldDescriptor>;
}

/// Maps a declared field type onto a [`FieldValue`].
///
/// The default method reports the type as unsupported, so opting a type out
/// of materialization is an empty impl:
///
/// ```
/// use bridge_materialize::{FieldKind, FieldValue};
///
/// struct Address { city: String }
/// impl FieldKind for Address {}
///
/// let a = Address { city: "Oslo".into() };
/// assert_eq!(a.field_value(), FieldValue::Unsupported);
/// ```
pub trait FieldKind {
    fn field_value(&self) -> FieldValue {
        FieldValue::Unsupported
    }
}

impl FieldKind for String {
    fn field_value(&self) -> FieldValue {
        FieldValue::String(Some(self.clone()))
    }
}

impl FieldKind for &str {
    fn field_value(&self) -> FieldValue {
        FieldValue::String(Some((*self).to_owned()))
    }
}

impl FieldKind for Option<String> {
    fn field_value(&self) -> FieldValue {
        FieldValue::String(self.clone())
    }
}

macro_rules! supported_field_kinds {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FieldKind for $ty {
                fn field_value(&self) -> FieldValue {
                    FieldValue::$variant(Some(*self))
                }
            }

            impl FieldKind for Option<$ty> {
                fn field_value(&self) -> FieldValue {
                    FieldValue::$variant(*self)
                }
            }
        )*
    };
}

supported_field_kinds!(i32 => Integer, f64 => Double, bool => Boolean);

macro_rules! unsupported_field_kinds {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FieldKind for $ty {}
            impl FieldKind for Option<$ty> {}
        )*
    };
}

unsupported_field_kinds!(
    i8, i16, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, char, (),
);

impl<T> FieldKind for Vec<T> {}
impl<T> FieldKind for Option<Vec<T>> {}
impl<T> FieldKind for VecDeque<T> {}
impl<T> FieldKind for BTreeSet<T> {}
impl<T, S> FieldKind for HashSet<T, S> {}
impl<K, V> FieldKind for BTreeMap<K, V> {}
impl<K, V, S> FieldKind for HashMap<K, V, S> {}
impl<T: ?Sized> FieldKind for Box<T> {}

/// Implement [`DeclaredFields`] for a struct by listing its fields in
/// declaration order. Each field's type must implement [`FieldKind`].
///
/// ```
/// use bridge_materialize::{declare_fields, DeclaredFields, TypeTag};
///
/// struct Point { x: f64, y: f64, label: Option<String> }
/// declare_fields!(Point { x, y, label });
///
/// let p = Point { x: 1.0, y: 2.0, label: None };
/// let tags: Vec<TypeTag> = p.declared_fields().iter().map(|f| f.value.type_tag()).collect();
/// assert_eq!(tags, vec![TypeTag::Double, TypeTag::Double, TypeTag::String]);
/// ```
#[macro_export]
macro_rules! declare_fields {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::DeclaredFields for $ty {
            fn declared_fields(&self) -> ::std::vec::Vec<$crate::FieldDescriptor> {
                ::std::vec![
                    $(
                        $crate::FieldDescriptor::new(
                            ::std::stringify!($field),
                            $crate::FieldKind::field_value(&self.$field),
                        ),
                    )*
                ]
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Mixed {
        name: String,
        nickname: Option<String>,
        age: i32,
        rank: Option<i32>,
        score: f64,
        active: Option<bool>,
        big: i64,
        ratio: f32,
        tags: Vec<String>,
        lookup: HashMap<String, i32>,
    }

    declare_fields!(Mixed {
        name, nickname, age, rank, score, active, big, ratio, tags, lookup,
    });

    fn mixed() -> Mixed {
        Mixed {
            name: "Jo".into(),
            nickname: None,
            age: 30,
            rank: None,
            score: 1.5,
            active: Some(true),
            big: 1 << 40,
            ratio: 0.5,
            tags: vec!["a".into()],
            lookup: HashMap::new(),
        }
    }

    #[test]
    fn declared_fields_follow_declaration_order() {
        let names: Vec<String> = mixed()
            .declared_fields()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "name", "nickname", "age", "rank", "score", "active", "big", "ratio", "tags",
                "lookup",
            ]
        );
    }

    #[test]
    fn declared_type_drives_the_tag() {
        let tags: Vec<TypeTag> = mixed()
            .declared_fields()
            .iter()
            .map(|f| f.value.type_tag())
            .collect();
        assert_eq!(
            tags,
            vec![
                TypeTag::String,
                TypeTag::String,
                TypeTag::Integer,
                TypeTag::Integer,
                TypeTag::Double,
                TypeTag::Boolean,
                TypeTag::Unsupported,
                TypeTag::Unsupported,
                TypeTag::Unsupported,
                TypeTag::Unsupported,
            ]
        );
    }

    #[test]
    fn null_of_supported_type_keeps_its_tag() {
        let fields = mixed().declared_fields();
        assert_eq!(fields[1].value, FieldValue::String(None));
        assert_eq!(fields[3].value, FieldValue::Integer(None));
    }

    #[test]
    fn into_value() {
        assert_eq!(FieldValue::Integer(Some(3)).into_value(), Some(Value::Int(3)));
        assert_eq!(FieldValue::Double(None).into_value(), Some(Value::Null));
        assert_eq!(FieldValue::Unsupported.into_value(), None);
    }

    #[test]
    fn str_fields_are_strings() {
        assert_eq!("x".field_value(), FieldValue::String(Some("x".into())));
    }
}
