//! Fields: how a named slot of an object is read for dump and written back
//! for load and update.

use std::sync::Arc;

use indexmap::IndexMap;
use marzipan_foundation::{Context, Item, ValidationError, Value};

use crate::core::{IntoHandle, TypeHandle};

/// Closure computing a field's attribute or key name from the object and
/// context at operation time.
pub type NameFn = dyn Fn(&Item, Option<&Context>) -> String + Send + Sync;

/// Closure extracting a dump value from the object.
pub type AccessorFn = dyn Fn(&Item, Option<&Context>) -> Result<Item, ValidationError> + Send + Sync;

/// A literal or computed name for attribute and key access.
#[derive(Clone)]
pub enum NameSource {
    /// A fixed name.
    Literal(String),
    /// A name computed from the object and context.
    Computed(Arc<NameFn>),
}

impl NameSource {
    fn resolve(&self, object: &Item, context: Option<&Context>) -> String {
        match self {
            Self::Literal(name) => name.clone(),
            Self::Computed(f) => f(object, context),
        }
    }
}

/// How a field reaches into the application object.
#[derive(Clone)]
pub enum Access {
    /// A record attribute. `None` uses the field name.
    Attribute(Option<NameSource>),
    /// A mapping entry. `None` uses the field name.
    Key(Option<NameSource>),
    /// A named accessor called on the object; no load destination.
    Method(String, Arc<AccessorFn>),
    /// A free function of the object; no load destination.
    Function(Arc<AccessorFn>),
    /// A fixed item; no load destination.
    Constant(Item),
}

/// One named slot of an object: a type plus an access rule.
#[derive(Clone)]
pub struct Field {
    ty: TypeHandle,
    access: Access,
}

impl Field {
    /// A field stored on a record attribute named after the field.
    pub fn attribute(ty: impl IntoHandle) -> Self {
        Self {
            ty: ty.into_handle(),
            access: Access::Attribute(None),
        }
    }

    /// A field stored on a differently named record attribute.
    pub fn attribute_as(ty: impl IntoHandle, attribute: impl Into<String>) -> Self {
        Self {
            ty: ty.into_handle(),
            access: Access::Attribute(Some(NameSource::Literal(attribute.into()))),
        }
    }

    /// A field stored on an attribute whose name is computed per operation.
    pub fn attribute_computed(
        ty: impl IntoHandle,
        name: impl Fn(&Item, Option<&Context>) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            ty: ty.into_handle(),
            access: Access::Attribute(Some(NameSource::Computed(Arc::new(name)))),
        }
    }

    /// A field stored under a mapping key named after the field.
    pub fn key(ty: impl IntoHandle) -> Self {
        Self {
            ty: ty.into_handle(),
            access: Access::Key(None),
        }
    }

    /// A field stored under a differently named mapping key.
    pub fn key_as(ty: impl IntoHandle, key: impl Into<String>) -> Self {
        Self {
            ty: ty.into_handle(),
            access: Access::Key(Some(NameSource::Literal(key.into()))),
        }
    }

    /// A field stored under a key whose name is computed per operation.
    pub fn key_computed(
        ty: impl IntoHandle,
        name: impl Fn(&Item, Option<&Context>) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            ty: ty.into_handle(),
            access: Access::Key(Some(NameSource::Computed(Arc::new(name)))),
        }
    }

    /// A field computed by a named accessor of the object. The name is kept
    /// for diagnostics; the closure is the method body.
    pub fn method(
        ty: impl IntoHandle,
        name: impl Into<String>,
        accessor: impl Fn(&Item, Option<&Context>) -> Result<Item, ValidationError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            ty: ty.into_handle(),
            access: Access::Method(name.into(), Arc::new(accessor)),
        }
    }

    /// A field computed by a free function of the object.
    pub fn function(
        ty: impl IntoHandle,
        accessor: impl Fn(&Item, Option<&Context>) -> Result<Item, ValidationError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            ty: ty.into_handle(),
            access: Access::Function(Arc::new(accessor)),
        }
    }

    /// A field that always dumps a fixed item.
    pub fn constant(ty: impl IntoHandle, value: impl Into<Item>) -> Self {
        Self {
            ty: ty.into_handle(),
            access: Access::Constant(value.into()),
        }
    }

    /// The field's type.
    #[must_use]
    pub fn ty(&self) -> &TypeHandle {
        &self.ty
    }

    /// Returns true if loading can write this field back onto an object.
    #[must_use]
    pub fn has_destination(&self) -> bool {
        matches!(self.access, Access::Attribute(_) | Access::Key(_))
    }

    /// Extracts the raw value this field dumps, before the type sees it.
    /// Absent attributes and keys read as `Missing`.
    pub fn read(
        &self,
        name: &str,
        object: &Item,
        context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        match &self.access {
            Access::Attribute(source) => {
                let attribute = source
                    .as_ref()
                    .map_or_else(|| name.to_owned(), |s| s.resolve(object, context));
                Ok(object
                    .as_record()
                    .and_then(|record| record.get(&attribute).cloned())
                    .unwrap_or(Item::Missing))
            }
            Access::Key(source) => {
                let key = source
                    .as_ref()
                    .map_or_else(|| name.to_owned(), |s| s.resolve(object, context));
                Ok(object
                    .as_map()
                    .and_then(|map| map.get(&key).cloned())
                    .unwrap_or(Item::Missing))
            }
            Access::Method(_, accessor) | Access::Function(accessor) => accessor(object, context),
            Access::Constant(item) => Ok(item.clone()),
        }
    }

    /// Serializes the field's value out of the object. `Ok(None)` means the
    /// surrounding object omits the field.
    pub fn dump(
        &self,
        name: &str,
        object: &Item,
        context: Option<&Context>,
    ) -> Result<Option<Value>, ValidationError> {
        let value = self.read(name, object, context)?;
        self.ty.dump(&value, context)
    }

    /// Deserializes the field's value from the external mapping.
    ///
    /// Addressable fields read the entry named after the field and let the
    /// type decide whether absence is an error. Computed fields contribute
    /// a value only when the entry is present; constants never read.
    pub fn load(
        &self,
        name: &str,
        data: &IndexMap<String, Value>,
        context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        match &self.access {
            Access::Attribute(_) | Access::Key(_) => self.ty.load(data.get(name), context),
            Access::Method(..) | Access::Function(_) => match data.get(name) {
                Some(value) => self.ty.load(Some(value), context),
                None => Ok(Item::Missing),
            },
            Access::Constant(_) => Ok(Item::Missing),
        }
    }

    /// Writes a loaded value back onto the object. Fields without a load
    /// destination ignore the value.
    pub fn set_value(
        &self,
        name: &str,
        object: &mut Item,
        value: Item,
        context: Option<&Context>,
    ) {
        match &self.access {
            Access::Attribute(source) => {
                let attribute = source
                    .as_ref()
                    .map_or_else(|| name.to_owned(), |s| s.resolve(object, context));
                if let Some(record) = object.as_record_mut() {
                    record.set(attribute, value);
                }
            }
            Access::Key(source) => {
                let key = source
                    .as_ref()
                    .map_or_else(|| name.to_owned(), |s| s.resolve(object, context));
                if let Item::Map(map) = object {
                    map.insert(key, value);
                }
            }
            Access::Method(..) | Access::Function(_) | Access::Constant(_) => {}
        }
    }
}
