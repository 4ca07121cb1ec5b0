use bridge_map::{Arguments, WritableMap};
use bridge_types::BridgeResult;
use serde::Serialize;
use tracing::trace;

use crate::descriptor::{DeclaredFields, FieldDescriptor};
use crate::error::MaterializeError;
use crate::reflect;

/// Write one field into `map`. Returns `false` if the field was skipped.
///
/// Null values of a supported declared type become null entries.
pub(crate) fn write_field(map: &mut WritableMap, field: FieldDescriptor) -> BridgeResult<bool> {
    let FieldDescriptor { name, value } = field;
    match value.into_value() {
        Some(value) => {
            map.put(&name, value)?;
            Ok(true)
        }
        None => {
            trace!(field = %name, "skipping field of unsupported declared type");
            Ok(false)
        }
    }
}

/// Build a new map from the declared fields of `object`.
///
/// Keys are the field names of supported fields, in declaration order.
pub fn from_object<T>(arguments: &Arguments, object: &T) -> BridgeResult<WritableMap>
where
    T: DeclaredFields + ?Sized,
{
    let mut map = arguments.create_map()?;
    for field in object.declared_fields() {
        write_field(&mut map, field)?;
    }
    Ok(map)
}

/// Materializer bound to one container factory.
#[derive(Clone, Debug)]
pub struct ObjectMaterializer {
    arguments: Arguments,
}

impl ObjectMaterializer {
    pub fn new(arguments: Arguments) -> Self {
        Self { arguments }
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Build a map from the declared fields of `object`. See [`from_object`].
    pub fn materialize<T: DeclaredFields + ?Sized>(&self, object: &T) -> BridgeResult<WritableMap> {
        from_object(&self.arguments, object)
    }

    /// Build a map from a serializable struct. See
    /// [`from_serialize`](crate::from_serialize).
    pub fn materialize_serialize<T: Serialize + ?Sized>(
        &self,
        object: &T,
    ) -> Result<WritableMap, MaterializeError> {
        reflect::from_serialize(&self.arguments, object)
    }
}
