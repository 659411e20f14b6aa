//! Named, lazily resolved type references for cyclic schemas.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, Weak};

use marzipan_foundation::{Context, ErrorTree, Item, ValidationError, Value};
use thiserror::Error;

use crate::core::{IntoHandle, Type, TypeHandle};
use crate::object::Object;
use crate::validate::Validate;

/// Registration failure.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The name is already taken.
    #[error("type {0:?} is already registered")]
    Duplicate(String),
}

struct RegistryInner {
    types: RwLock<HashMap<String, TypeHandle>>,
}

/// Storage for named types with proxy-based forward references.
///
/// `get` hands out a [`TypeRef`] immediately, before the name is
/// registered; the proxy resolves on first use. This is what makes
/// mutually referential schemas constructible: each side can reference the
/// other by name, as long as both are registered before any operation
/// runs.
///
/// The registry owns the named types; proxies borrow through a weak
/// handle.
#[derive(Clone)]
pub struct TypeRegistry {
    inner: Arc<RegistryInner>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                types: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Registers a type under a name, returning its handle.
    pub fn add(
        &self,
        name: impl Into<String>,
        ty: impl IntoHandle,
    ) -> Result<TypeHandle, RegistryError> {
        let name = name.into();
        let handle = ty.into_handle();
        let mut types = self
            .inner
            .types
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if types.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        types.insert(name, handle.clone());
        Ok(handle)
    }

    /// Returns a proxy for the named type. The lookup happens on the
    /// proxy's first use, not here.
    #[must_use]
    pub fn get(&self, name: impl Into<String>) -> TypeRef {
        TypeRef {
            registry: Arc::downgrade(&self.inner),
            name: name.into(),
            slot: OnceLock::new(),
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A proxy that resolves to a registered type on first use and forwards
/// every operation afterwards.
///
/// Resolution failures (name not yet registered, registry gone) surface as
/// a [`ValidationError`] on the operation that exercised the reference and
/// are not cached, so registering the name later heals the proxy.
pub struct TypeRef {
    registry: Weak<RegistryInner>,
    name: String,
    slot: OnceLock<TypeHandle>,
}

impl TypeRef {
    fn unresolved(&self) -> ValidationError {
        ValidationError::leaf(format!("Type {:?} is not registered", self.name))
    }

    /// Resolves the proxy, publishing the target once. Races do at most a
    /// redundant lookup.
    fn target(&self) -> Result<&TypeHandle, ValidationError> {
        if self.slot.get().is_none() {
            let registry = self.registry.upgrade().ok_or_else(|| self.unresolved())?;
            let types = registry
                .types
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            let handle = types.get(&self.name).cloned().ok_or_else(|| self.unresolved())?;
            let _ = self.slot.set(handle);
        }
        self.slot.get().ok_or_else(|| self.unresolved())
    }
}

impl Type for TypeRef {
    fn name(&self) -> Option<&str> {
        self.target().ok().and_then(|ty| ty.name())
    }

    fn description(&self) -> Option<&str> {
        self.target().ok().and_then(|ty| ty.description())
    }

    fn validators(&self) -> &[Arc<dyn Validate>] {
        self.target().map_or(&[], |ty| ty.validators())
    }

    fn load_raw(
        &self,
        data: Option<&Value>,
        context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        self.target()?.load_raw(data, context)
    }

    fn load(
        &self,
        data: Option<&Value>,
        context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        self.target()?.load(data, context)
    }

    fn dump(
        &self,
        value: &Item,
        context: Option<&Context>,
    ) -> Result<Option<Value>, ValidationError> {
        self.target()?.dump(value, context)
    }

    fn validate(&self, data: Option<&Value>, context: Option<&Context>) -> Option<ErrorTree> {
        match self.target() {
            Ok(ty) => ty.validate(data, context),
            Err(err) => Some(err.into_tree()),
        }
    }

    fn as_object(&self) -> Option<&Object> {
        self.target().ok().and_then(|ty| ty.as_object())
    }
}
