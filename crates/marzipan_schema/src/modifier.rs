//! Modifier types: wrappers that alter one semantic axis of an inner type.
//!
//! Modifiers forward names, descriptions, and validator chains to the type
//! they wrap, so a wrapped type keeps its diagnostics and its checks.

use std::sync::Arc;

use marzipan_foundation::{Context, Item, ValidationError, Value};

use crate::core::{run_validators, IntoHandle, Type, TypeHandle};
use crate::validate::{Messages, Validate};

/// A type that always dumps a fixed literal and only loads that literal.
///
/// Loading verifies the external value equals the literal and yields
/// `Missing`, keeping tag fields out of constructor mappings; the tag
/// reappears on dump.
pub struct Constant {
    value: Value,
    inner: TypeHandle,
    messages: Messages,
}

impl Constant {
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[
        ("value", "Value should be {expected}"),
        ("required", "Value is required"),
    ];

    /// Creates a constant over [`Any`](crate::scalar::Any).
    pub fn new(value: impl Into<Value>) -> Self {
        Self::with_inner(value, crate::scalar::Any::new())
    }

    /// Creates a constant with an explicit inner type.
    pub fn with_inner(value: impl Into<Value>, inner: impl IntoHandle) -> Self {
        Self {
            value: value.into(),
            inner: inner.into_handle(),
            messages: Messages::new(Self::DEFAULTS),
        }
    }

    /// Overrides an error message template (`value` or `required`).
    #[must_use]
    pub fn with_error_message(mut self, key: &'static str, template: impl Into<String>) -> Self {
        self.messages.set(key, template);
        self
    }
}

impl Type for Constant {
    fn name(&self) -> Option<&str> {
        self.inner.name()
    }

    fn description(&self) -> Option<&str> {
        self.inner.description()
    }

    fn validators(&self) -> &[Arc<dyn Validate>] {
        self.inner.validators()
    }

    fn load_raw(
        &self,
        data: Option<&Value>,
        _context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        match data {
            None | Some(Value::Null) => Err(self.messages.fail("required")),
            Some(value) if *value == self.value => Ok(Item::Missing),
            Some(_) => Err(self
                .messages
                .fail_with("value", &[("expected", self.value.to_string())])),
        }
    }

    // There is no loaded value to validate.
    fn load(
        &self,
        data: Option<&Value>,
        context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        self.load_raw(data, context)
    }

    fn dump(
        &self,
        _value: &Item,
        _context: Option<&Context>,
    ) -> Result<Option<Value>, ValidationError> {
        Ok(Some(self.value.clone()))
    }
}

enum LoadDefault {
    Item(Item),
    Thunk(Arc<dyn Fn() -> Item + Send + Sync>),
}

enum DumpDefault {
    Value(Value),
    Thunk(Arc<dyn Fn() -> Value + Send + Sync>),
}

/// A wrapper that makes a value optional.
///
/// When the value is absent (missing or null, on either side), the
/// configured default for that side is produced instead of delegating to
/// the inner type. Both defaults are null unless configured, so loading an
/// absent value and dumping it back yields an explicit null.
pub struct Optional {
    inner: TypeHandle,
    load_default: LoadDefault,
    dump_default: DumpDefault,
    validators: Vec<Arc<dyn Validate>>,
}

impl Optional {
    /// Wraps an inner type. Defaults are null on both sides.
    pub fn new(inner: impl IntoHandle) -> Self {
        Self {
            inner: inner.into_handle(),
            load_default: LoadDefault::Item(Item::Null),
            dump_default: DumpDefault::Value(Value::Null),
            validators: Vec::new(),
        }
    }

    /// Uses a fixed load-side default.
    #[must_use]
    pub fn load_default(mut self, default: impl Into<Item>) -> Self {
        self.load_default = LoadDefault::Item(default.into());
        self
    }

    /// Uses a generator producing a fresh load-side default per invocation.
    #[must_use]
    pub fn load_default_with(mut self, default: impl Fn() -> Item + Send + Sync + 'static) -> Self {
        self.load_default = LoadDefault::Thunk(Arc::new(default));
        self
    }

    /// Uses a fixed dump-side default.
    #[must_use]
    pub fn dump_default(mut self, default: impl Into<Value>) -> Self {
        self.dump_default = DumpDefault::Value(default.into());
        self
    }

    /// Uses a generator producing a fresh dump-side default per invocation.
    #[must_use]
    pub fn dump_default_with(
        mut self,
        default: impl Fn() -> Value + Send + Sync + 'static,
    ) -> Self {
        self.dump_default = DumpDefault::Thunk(Arc::new(default));
        self
    }

    /// Appends a validator run on present values only; defaults bypass it.
    #[must_use]
    pub fn with_validator(mut self, validator: impl Validate + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    fn make_load_default(&self) -> Item {
        match &self.load_default {
            LoadDefault::Item(item) => item.clone(),
            LoadDefault::Thunk(thunk) => thunk(),
        }
    }

    fn make_dump_default(&self) -> Value {
        match &self.dump_default {
            DumpDefault::Value(value) => value.clone(),
            DumpDefault::Thunk(thunk) => thunk(),
        }
    }
}

impl Type for Optional {
    fn name(&self) -> Option<&str> {
        self.inner.name()
    }

    fn description(&self) -> Option<&str> {
        self.inner.description()
    }

    fn validators(&self) -> &[Arc<dyn Validate>] {
        &self.validators
    }

    fn load_raw(
        &self,
        data: Option<&Value>,
        context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        match data {
            None | Some(Value::Null) => Ok(self.make_load_default()),
            Some(_) => self.inner.load(data, context),
        }
    }

    // Defaults bypass validators; present values run the optional's own
    // validators after the inner type's.
    fn load(
        &self,
        data: Option<&Value>,
        context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        match data {
            None | Some(Value::Null) => Ok(self.make_load_default()),
            Some(_) => {
                let item = self.inner.load(data, context)?;
                run_validators(&self.validators, &item, context)?;
                Ok(item)
            }
        }
    }

    fn dump(
        &self,
        value: &Item,
        context: Option<&Context>,
    ) -> Result<Option<Value>, ValidationError> {
        if value.is_absent() {
            Ok(Some(self.make_dump_default()))
        } else {
            self.inner.dump(value, context)
        }
    }
}

/// A wrapper that suppresses the dump direction.
///
/// `load` delegates to the inner type; `dump` yields nothing, so the
/// surrounding object omits the field.
pub struct LoadOnly {
    inner: TypeHandle,
}

impl LoadOnly {
    /// Wraps an inner type.
    pub fn new(inner: impl IntoHandle) -> Self {
        Self {
            inner: inner.into_handle(),
        }
    }
}

impl Type for LoadOnly {
    fn name(&self) -> Option<&str> {
        self.inner.name()
    }

    fn description(&self) -> Option<&str> {
        self.inner.description()
    }

    fn validators(&self) -> &[Arc<dyn Validate>] {
        self.inner.validators()
    }

    fn load_raw(
        &self,
        data: Option<&Value>,
        context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        self.inner.load(data, context)
    }

    fn load(
        &self,
        data: Option<&Value>,
        context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        self.inner.load(data, context)
    }

    fn dump(
        &self,
        _value: &Item,
        _context: Option<&Context>,
    ) -> Result<Option<Value>, ValidationError> {
        Ok(None)
    }
}

/// A wrapper that suppresses the load direction.
///
/// `dump` delegates to the inner type; `load` yields `Missing` regardless
/// of input and never contributes an error.
pub struct DumpOnly {
    inner: TypeHandle,
}

impl DumpOnly {
    /// Wraps an inner type.
    pub fn new(inner: impl IntoHandle) -> Self {
        Self {
            inner: inner.into_handle(),
        }
    }
}

impl Type for DumpOnly {
    fn name(&self) -> Option<&str> {
        self.inner.name()
    }

    fn description(&self) -> Option<&str> {
        self.inner.description()
    }

    fn validators(&self) -> &[Arc<dyn Validate>] {
        self.inner.validators()
    }

    fn load_raw(
        &self,
        _data: Option<&Value>,
        _context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        Ok(Item::Missing)
    }

    // There is no loaded value to validate.
    fn load(
        &self,
        data: Option<&Value>,
        context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        self.load_raw(data, context)
    }

    fn dump(
        &self,
        value: &Item,
        context: Option<&Context>,
    ) -> Result<Option<Value>, ValidationError> {
        self.inner.dump(value, context)
    }
}

type TransformFn = dyn Fn(&Value, Option<&Context>) -> Value + Send + Sync;

/// A wrapper that retrofits custom coercions without a new type.
///
/// `pre_load` rewrites the external value before the inner load;
/// `post_dump` rewrites the external value after the inner dump.
pub struct Transform {
    inner: TypeHandle,
    pre_load: Option<Arc<TransformFn>>,
    post_dump: Option<Arc<TransformFn>>,
}

impl Transform {
    /// Wraps an inner type with identity transforms.
    pub fn new(inner: impl IntoHandle) -> Self {
        Self {
            inner: inner.into_handle(),
            pre_load: None,
            post_dump: None,
        }
    }

    /// Rewrites the external value before the inner load sees it.
    #[must_use]
    pub fn pre_load(
        mut self,
        f: impl Fn(&Value, Option<&Context>) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.pre_load = Some(Arc::new(f));
        self
    }

    /// Rewrites the external value the inner dump produced.
    #[must_use]
    pub fn post_dump(
        mut self,
        f: impl Fn(&Value, Option<&Context>) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.post_dump = Some(Arc::new(f));
        self
    }
}

impl Type for Transform {
    fn name(&self) -> Option<&str> {
        self.inner.name()
    }

    fn description(&self) -> Option<&str> {
        self.inner.description()
    }

    fn validators(&self) -> &[Arc<dyn Validate>] {
        self.inner.validators()
    }

    fn load_raw(
        &self,
        data: Option<&Value>,
        context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        match (data, &self.pre_load) {
            (Some(value), Some(pre_load)) => {
                let rewritten = pre_load(value, context);
                self.inner.load(Some(&rewritten), context)
            }
            _ => self.inner.load(data, context),
        }
    }

    fn load(
        &self,
        data: Option<&Value>,
        context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        self.load_raw(data, context)
    }

    fn dump(
        &self,
        value: &Item,
        context: Option<&Context>,
    ) -> Result<Option<Value>, ValidationError> {
        let dumped = self.inner.dump(value, context)?;
        match (dumped, &self.post_dump) {
            (Some(value), Some(post_dump)) => Ok(Some(post_dump(&value, context))),
            (dumped, _) => Ok(dumped),
        }
    }
}
