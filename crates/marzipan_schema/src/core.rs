//! The type interface: bidirectional codec + validator.

use std::sync::Arc;

use marzipan_foundation::{Context, ErrorBuilder, ErrorTree, Item, ValidationError, Value};

use crate::object::Object;
use crate::validate::{Messages, Validate};

/// Shared-ownership handle to a type descriptor.
///
/// The same descriptor may be referenced from many parents (a `List` and an
/// `Object` field can share one `Str`), so composition always goes through
/// handles.
pub type TypeHandle = Arc<dyn Type>;

/// A bidirectional codec with attached validators.
///
/// `load` maps external to internal, `dump` maps internal to external,
/// `validate` reports the error shape without producing a value. Descriptors
/// are constructed once and treated as read-only afterwards; all operations
/// are reentrant on a fully constructed schema graph.
pub trait Type: Send + Sync {
    /// Diagnostic name, if any.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Human-readable description, if any.
    fn description(&self) -> Option<&str> {
        None
    }

    /// Validators run on the loaded item, in order.
    fn validators(&self) -> &[Arc<dyn Validate>] {
        &[]
    }

    /// Structural decoding: the override point beneath [`Type::load`].
    ///
    /// `None` means the external value is absent; `Value::Null` is treated
    /// as absent by every type that detects required values.
    fn load_raw(
        &self,
        data: Option<&Value>,
        context: Option<&Context>,
    ) -> Result<Item, ValidationError>;

    /// Deserializes an external value.
    ///
    /// Runs [`Type::load_raw`] first, then every validator against the
    /// loaded item, merging all validator errors into one report. A
    /// structural failure prevents any validator from running.
    fn load(
        &self,
        data: Option<&Value>,
        context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        let item = self.load_raw(data, context)?;
        run_validators(self.validators(), &item, context)?;
        Ok(item)
    }

    /// Serializes an internal item.
    ///
    /// `Ok(None)` means the value is suppressed in this direction and the
    /// surrounding container should omit it. Validators never run on dump.
    fn dump(
        &self,
        value: &Item,
        context: Option<&Context>,
    ) -> Result<Option<Value>, ValidationError>;

    /// Runs `load` and returns the error shape instead of the item.
    fn validate(&self, data: Option<&Value>, context: Option<&Context>) -> Option<ErrorTree> {
        match self.load(data, context) {
            Ok(_) => None,
            Err(err) => Some(err.into_tree()),
        }
    }

    /// Downcast hook for base composition across registry proxies.
    fn as_object(&self) -> Option<&Object> {
        None
    }
}

/// By-value conversion into a [`TypeHandle`].
pub trait IntoHandle {
    /// Wraps the type into a shared handle.
    fn into_handle(self) -> TypeHandle;
}

impl<T: Type + 'static> IntoHandle for T {
    fn into_handle(self) -> TypeHandle {
        Arc::new(self)
    }
}

impl IntoHandle for TypeHandle {
    fn into_handle(self) -> TypeHandle {
        self
    }
}

/// Wraps a type into a shared handle.
pub fn handle(ty: impl IntoHandle) -> TypeHandle {
    ty.into_handle()
}

/// Common per-type metadata: name, description, validators, messages.
#[derive(Clone)]
pub struct Meta {
    name: Option<String>,
    description: Option<String>,
    validators: Vec<Arc<dyn Validate>>,
    messages: Messages,
}

impl Meta {
    /// Creates metadata with the given default error message templates.
    #[must_use]
    pub fn new(default_messages: &[(&'static str, &'static str)]) -> Self {
        Self {
            name: None,
            description: None,
            validators: Vec::new(),
            messages: Messages::new(default_messages),
        }
    }

    /// The diagnostic name, if set.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The description, if set.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The validator list.
    #[must_use]
    pub fn validators(&self) -> &[Arc<dyn Validate>] {
        &self.validators
    }

    /// The error message table.
    #[must_use]
    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Sets the diagnostic name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Sets the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// Appends a validator.
    pub fn push_validator(&mut self, validator: Arc<dyn Validate>) {
        self.validators.push(validator);
    }

    /// Overrides an error message template.
    pub fn set_message(&mut self, key: &'static str, template: impl Into<String>) {
        self.messages.set(key, template);
    }
}

impl std::fmt::Debug for Meta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Meta")
            .field("name", &self.name)
            .field("validators", &self.validators.len())
            .finish()
    }
}

/// Generates the builder methods every concrete type shares: `with_name`,
/// `with_description`, `with_validator`, `with_error_message`. Expects the
/// type to have a `meta: Meta` field.
macro_rules! meta_builders {
    ($ty:ty) => {
        impl $ty {
            /// Sets the diagnostic name.
            #[must_use]
            pub fn with_name(mut self, name: impl Into<String>) -> Self {
                self.meta.set_name(name);
                self
            }

            /// Sets the description.
            #[must_use]
            pub fn with_description(mut self, description: impl Into<String>) -> Self {
                self.meta.set_description(description);
                self
            }

            /// Appends a validator, run on loaded values after structural
            /// decoding.
            #[must_use]
            pub fn with_validator(
                mut self,
                validator: impl $crate::validate::Validate + 'static,
            ) -> Self {
                self.meta.push_validator(std::sync::Arc::new(validator));
                self
            }

            /// Overrides an error message template.
            #[must_use]
            pub fn with_error_message(
                mut self,
                key: &'static str,
                template: impl Into<String>,
            ) -> Self {
                self.meta.set_message(key, template);
                self
            }
        }
    };
}

/// Generates the metadata methods of the [`Type`] trait from a `meta` field.
macro_rules! forward_meta {
    () => {
        fn name(&self) -> Option<&str> {
            self.meta.name()
        }

        fn description(&self) -> Option<&str> {
            self.meta.description()
        }

        fn validators(&self) -> &[std::sync::Arc<dyn $crate::validate::Validate>] {
            self.meta.validators()
        }
    };
}

pub(crate) use forward_meta;
pub(crate) use meta_builders;

/// Rejects absent values on the load side. `None` and `Value::Null` are
/// equivalent here.
pub(crate) fn require<'a>(
    data: Option<&'a Value>,
    messages: &Messages,
) -> Result<&'a Value, ValidationError> {
    match data {
        None | Some(Value::Null) => Err(messages.fail("required")),
        Some(value) => Ok(value),
    }
}

/// Rejects absent items on the dump side.
pub(crate) fn require_present<'a>(
    value: &'a Item,
    messages: &Messages,
) -> Result<&'a Item, ValidationError> {
    if value.is_absent() {
        Err(messages.fail("required"))
    } else {
        Ok(value)
    }
}

/// Runs validators against a loaded item, merging every failure into a
/// single report.
pub(crate) fn run_validators(
    validators: &[Arc<dyn Validate>],
    item: &Item,
    context: Option<&Context>,
) -> Result<(), ValidationError> {
    let mut builder = ErrorBuilder::new();
    for validator in validators {
        if let Err(err) = validator.check(item, context) {
            builder.add_errors(err.into_tree());
        }
    }
    builder.finish()
}
