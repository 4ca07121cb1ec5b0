//! Reflection over `serde::Serialize` structs.
//!
//! The value is driven through two serializers: `StructCollector` accepts
//! only a struct at the top level and writes each field, and `FieldProbe`
//! classifies a single field value into the closed set of supported kinds.
//!
//! Serde exposes runtime shapes, not declared types, so this adapter maps:
//!
//! | serde kind | Entry |
//! |------------|-------|
//! | `str` | string |
//! | `i32` | int |
//! | `f64` | double |
//! | `bool` | boolean |
//! | `some(v)` | classification of `v` |
//! | `none` | skipped |
//! | anything else | skipped |
//!
//! The declared type behind a `None` is not visible to a serializer, so
//! every `None` field is omitted rather than risk an entry for an
//! unsupported type. Use [`from_object`](crate::from_object) when null
//! entries are wanted.
//!
//! `#[serde(flatten)]` makes a struct serialize as a map, which is rejected.

use bridge_map::{Arguments, WritableMap};
use serde::ser::{
    Impossible, Serialize, SerializeMap, SerializeSeq, SerializeStruct, SerializeStructVariant,
    SerializeTuple, SerializeTupleStruct, SerializeTupleVariant, Serializer,
};

use crate::descriptor::{FieldDescriptor, FieldValue};
use crate::error::MaterializeError;
use crate::materializer::write_field;

/// Build a new map from the fields of a serializable struct.
pub fn from_serialize<T>(arguments: &Arguments, object: &T) -> Result<WritableMap, MaterializeError>
where
    T: Serialize + ?Sized,
{
    object.serialize(StructCollector { arguments })
}

// ---------------------------------------------------------------------------
// StructCollector
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
struct StructCollector<'a> {
    arguments: &'a Arguments,
}

type Rejected = Impossible<WritableMap, MaterializeError>;

fn not_a_struct(found: &'static str) -> Result<Rejected, MaterializeError> {
    Err(MaterializeError::NotAStruct(found))
}

impl<'a> Serializer for StructCollector<'a> {
    type Ok = WritableMap;
    type Error = MaterializeError;
    type SerializeSeq = Rejected;
    type SerializeTuple = Rejected;
    type SerializeTupleStruct = Rejected;
    type SerializeTupleVariant = Rejected;
    type SerializeMap = Rejected;
    type SerializeStruct = FieldWriter;
    type SerializeStructVariant = Rejected;

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<FieldWriter, Self::Error> {
        Ok(FieldWriter {
            map: self.arguments.create_map()?,
        })
    }

    /// A field-less struct yields an empty map.
    fn serialize_unit_struct(self, _name: &'static str) -> Result<WritableMap, Self::Error> {
        Ok(self.arguments.create_map()?)
    }

    /// Transparent wrappers around a struct are looked through.
    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<WritableMap, Self::Error> {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<WritableMap, Self::Error> {
        Err(MaterializeError::NotAStruct("boolean"))
    }

    fn serialize_i8(self, _v: i8) -> Result<WritableMap, Self::Error> {
        Err(MaterializeError::NotAStruct("integer"))
    }

    fn serialize_i16(self, _v: i16) -> Result<WritableMap, Self::Error> {
        Err(MaterializeError::NotAStruct("integer"))
    }

    fn serialize_i32(self, _v: i32) -> Result<WritableMap, Self::Error> {
        Err(MaterializeError::NotAStruct("integer"))
    }

    fn serialize_i64(self, _v: i64) -> Result<WritableMap, Self::Error> {
        Err(MaterializeError::NotAStruct("integer"))
    }

    fn serialize_u8(self, _v: u8) -> Result<WritableMap, Self::Error> {
        Err(MaterializeError::NotAStruct("integer"))
    }

    fn serialize_u16(self, _v: u16) -> Result<WritableMap, Self::Error> {
        Err(MaterializeError::NotAStruct("integer"))
    }

    fn serialize_u32(self, _v: u32) -> Result<WritableMap, Self::Error> {
        Err(MaterializeError::NotAStruct("integer"))
    }

    fn serialize_u64(self, _v: u64) -> Result<WritableMap, Self::Error> {
        Err(MaterializeError::NotAStruct("integer"))
    }

    fn serialize_f32(self, _v: f32) -> Result<WritableMap, Self::Error> {
        Err(MaterializeError::NotAStruct("float"))
    }

    fn serialize_f64(self, _v: f64) -> Result<WritableMap, Self::Error> {
        Err(MaterializeError::NotAStruct("float"))
    }

    fn serialize_char(self, _v: char) -> Result<WritableMap, Self::Error> {
        Err(MaterializeError::NotAStruct("char"))
    }

    fn serialize_str(self, _v: &str) -> Result<WritableMap, Self::Error> {
        Err(MaterializeError::NotAStruct("string"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<WritableMap, Self::Error> {
        Err(MaterializeError::NotAStruct("bytes"))
    }

    fn serialize_none(self) -> Result<WritableMap, Self::Error> {
        Err(MaterializeError::NotAStruct("none"))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _value: &T) -> Result<WritableMap, Self::Error> {
        Err(MaterializeError::NotAStruct("option"))
    }

    fn serialize_unit(self) -> Result<WritableMap, Self::Error> {
        Err(MaterializeError::NotAStruct("unit"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<WritableMap, Self::Error> {
        Err(MaterializeError::NotAStruct("enum"))
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<WritableMap, Self::Error> {
        Err(MaterializeError::NotAStruct("enum"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Rejected, Self::Error> {
        not_a_struct("sequence")
    }

    fn serialize_tuple(self, _len: usize) -> Result<Rejected, Self::Error> {
        not_a_struct("tuple")
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Rejected, Self::Error> {
        not_a_struct("tuple struct")
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Rejected, Self::Error> {
        not_a_struct("enum")
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Rejected, Self::Error> {
        not_a_struct("map")
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Rejected, Self::Error> {
        not_a_struct("enum")
    }
}

struct FieldWriter {
    map: WritableMap,
}

impl SerializeStruct for FieldWriter {
    type Ok = WritableMap;
    type Error = MaterializeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        let value = value.serialize(FieldProbe)?;
        write_field(&mut self.map, FieldDescriptor::new(key, value))?;
        Ok(())
    }

    fn end(self) -> Result<WritableMap, Self::Error> {
        Ok(self.map)
    }
}

// ---------------------------------------------------------------------------
// FieldProbe
// ---------------------------------------------------------------------------

const UNSUPPORTED: FieldValue = FieldValue::Unsupported;

struct FieldProbe;

/// Swallows the contents of an unsupported composite without visiting them.
struct Skip;

impl Serializer for FieldProbe {
    type Ok = FieldValue;
    type Error = MaterializeError;
    type SerializeSeq = Skip;
    type SerializeTuple = Skip;
    type SerializeTupleStruct = Skip;
    type SerializeTupleVariant = Skip;
    type SerializeMap = Skip;
    type SerializeStruct = Skip;
    type SerializeStructVariant = Skip;

    fn serialize_bool(self, v: bool) -> Result<FieldValue, Self::Error> {
        Ok(FieldValue::Boolean(Some(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<FieldValue, Self::Error> {
        Ok(FieldValue::Integer(Some(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<FieldValue, Self::Error> {
        Ok(FieldValue::Double(Some(v)))
    }

    fn serialize_str(self, v: &str) -> Result<FieldValue, Self::Error> {
        Ok(FieldValue::String(Some(v.to_owned())))
    }

    fn serialize_none(self) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<FieldValue, Self::Error> {
        value.serialize(self)
    }

    fn serialize_i8(self, _v: i8) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }

    fn serialize_i16(self, _v: i16) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }

    fn serialize_i64(self, _v: i64) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }

    fn serialize_u8(self, _v: u8) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }

    fn serialize_u16(self, _v: u16) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }

    fn serialize_u32(self, _v: u32) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }

    fn serialize_u64(self, _v: u64) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }

    fn serialize_f32(self, _v: f32) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }

    fn serialize_char(self, _v: char) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }

    fn serialize_unit(self) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }

    /// The declared type is the newtype, not what it wraps.
    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _value: &T,
    ) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Skip, Self::Error> {
        Ok(Skip)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Skip, Self::Error> {
        Ok(Skip)
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Skip, Self::Error> {
        Ok(Skip)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Skip, Self::Error> {
        Ok(Skip)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Skip, Self::Error> {
        Ok(Skip)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Skip, Self::Error> {
        Ok(Skip)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Skip, Self::Error> {
        Ok(Skip)
    }
}

impl SerializeSeq for Skip {
    type Ok = FieldValue;
    type Error = MaterializeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, _value: &T) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }
}

impl SerializeTuple for Skip {
    type Ok = FieldValue;
    type Error = MaterializeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, _value: &T) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }
}

impl SerializeTupleStruct for Skip {
    type Ok = FieldValue;
    type Error = MaterializeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _value: &T) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }
}

impl SerializeTupleVariant for Skip {
    type Ok = FieldValue;
    type Error = MaterializeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _value: &T) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }
}

impl SerializeMap for Skip {
    type Ok = FieldValue;
    type Error = MaterializeError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, _key: &T) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, _value: &T) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }
}

impl SerializeStruct for Skip {
    type Ok = FieldValue;
    type Error = MaterializeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        _value: &T,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }
}

impl SerializeStructVariant for Skip {
    type Ok = FieldValue;
    type Error = MaterializeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        _value: &T,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<FieldValue, Self::Error> {
        Ok(UNSUPPORTED)
    }
}
