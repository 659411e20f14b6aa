//! Container codecs: homogeneous lists, fixed-arity tuples, and mappings.
//!
//! Containers never short-circuit: one load call reports every element
//! error it can, keyed by index or mapping key.

use indexmap::IndexMap;
use marzipan_foundation::{Context, ErrorBuilder, Item, ValidationError, Value};

use crate::core::{
    forward_meta, meta_builders, require, require_present, IntoHandle, Meta, Type, TypeHandle,
};

/// Homogeneous sequence type.
///
/// Strings are rejected even though they are iterable.
pub struct List {
    meta: Meta,
    item_type: TypeHandle,
}

impl List {
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[
        ("invalid", "Value should be list"),
        ("required", "Value is required"),
    ];

    /// Creates a list of the given element type.
    pub fn of(item_type: impl IntoHandle) -> Self {
        Self {
            meta: Meta::new(Self::DEFAULTS),
            item_type: item_type.into_handle(),
        }
    }

    /// The element type.
    #[must_use]
    pub fn item_type(&self) -> &TypeHandle {
        &self.item_type
    }
}

meta_builders!(List);

impl Type for List {
    forward_meta!();

    fn load_raw(
        &self,
        data: Option<&Value>,
        context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        let value = require(data, self.meta.messages())?;
        let elements = value
            .as_seq()
            .ok_or_else(|| self.meta.messages().fail("invalid"))?;

        let mut builder = ErrorBuilder::new();
        let mut items = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            match self.item_type.load(Some(element), context) {
                Ok(item) => items.push(item),
                Err(err) => builder.add_nested(index.to_string(), err.into_tree()),
            }
        }
        builder.finish()?;
        Ok(Item::Seq(items))
    }

    fn dump(
        &self,
        value: &Item,
        context: Option<&Context>,
    ) -> Result<Option<Value>, ValidationError> {
        let item = require_present(value, self.meta.messages())?;
        let elements = match item {
            Item::Seq(elements) => elements,
            _ => return Err(self.meta.messages().fail("invalid")),
        };

        let mut builder = ErrorBuilder::new();
        let mut out = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            match self.item_type.dump(element, context) {
                Ok(Some(dumped)) => out.push(dumped),
                Ok(None) => {}
                Err(err) => builder.add_nested(index.to_string(), err.into_tree()),
            }
        }
        builder.finish()?;
        Ok(Some(Value::Seq(out)))
    }
}

/// Heterogeneous fixed-arity sequence type.
pub struct Tuple {
    meta: Meta,
    item_types: Vec<TypeHandle>,
}

impl Tuple {
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[
        ("invalid", "Value should be list"),
        ("invalid_length", "Value length should be {expected}"),
        ("required", "Value is required"),
    ];

    /// Creates a tuple from element types, one per position.
    #[must_use]
    pub fn of(item_types: Vec<TypeHandle>) -> Self {
        Self {
            meta: Meta::new(Self::DEFAULTS),
            item_types,
        }
    }

    fn check_arity(&self, actual: usize) -> Result<(), ValidationError> {
        if actual == self.item_types.len() {
            Ok(())
        } else {
            Err(self.meta.messages().fail_with(
                "invalid_length",
                &[("expected", self.item_types.len().to_string())],
            ))
        }
    }
}

meta_builders!(Tuple);

impl Type for Tuple {
    forward_meta!();

    fn load_raw(
        &self,
        data: Option<&Value>,
        context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        let value = require(data, self.meta.messages())?;
        let elements = value
            .as_seq()
            .ok_or_else(|| self.meta.messages().fail("invalid"))?;
        self.check_arity(elements.len())?;

        let mut builder = ErrorBuilder::new();
        let mut items = Vec::with_capacity(elements.len());
        for (index, (ty, element)) in self.item_types.iter().zip(elements).enumerate() {
            match ty.load(Some(element), context) {
                Ok(item) => items.push(item),
                Err(err) => builder.add_nested(index.to_string(), err.into_tree()),
            }
        }
        builder.finish()?;
        Ok(Item::Tuple(items))
    }

    fn dump(
        &self,
        value: &Item,
        context: Option<&Context>,
    ) -> Result<Option<Value>, ValidationError> {
        let item = require_present(value, self.meta.messages())?;
        let elements = item
            .as_seq()
            .ok_or_else(|| self.meta.messages().fail("invalid"))?;
        self.check_arity(elements.len())?;

        let mut builder = ErrorBuilder::new();
        let mut out = Vec::with_capacity(elements.len());
        for (index, (ty, element)) in self.item_types.iter().zip(elements).enumerate() {
            match ty.dump(element, context) {
                Ok(Some(dumped)) => out.push(dumped),
                Ok(None) => {}
                Err(err) => builder.add_nested(index.to_string(), err.into_tree()),
            }
        }
        builder.finish()?;
        Ok(Some(Value::Seq(out)))
    }
}

enum ValueTypes {
    /// One type for every value; any key is accepted.
    Uniform(TypeHandle),
    /// A fixed key set; all listed keys are required on load, extras are
    /// rejected.
    Fixed(IndexMap<String, TypeHandle>),
}

/// String-keyed mapping type.
///
/// Comes in two flavors: a uniform-value mapping (any keys, one value type,
/// keys optionally validated by a key type) and a fixed-key mapping (a
/// schema of key to type).
pub struct Dict {
    meta: Meta,
    value_types: ValueTypes,
    key_type: Option<TypeHandle>,
}

impl Dict {
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[
        ("invalid", "Value should be dict"),
        ("unknown", "Unknown field"),
        ("required", "Value is required"),
    ];

    /// Creates a mapping accepting any keys and any values.
    #[must_use]
    pub fn new() -> Self {
        Self::of(crate::scalar::Any::new())
    }

    /// Creates a uniform mapping: any keys, one value type.
    pub fn of(value_type: impl IntoHandle) -> Self {
        Self {
            meta: Meta::new(Self::DEFAULTS),
            value_types: ValueTypes::Uniform(value_type.into_handle()),
            key_type: None,
        }
    }

    /// Creates a fixed-key mapping from key/type pairs.
    pub fn fixed<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, TypeHandle)>,
        K: Into<String>,
    {
        Self {
            meta: Meta::new(Self::DEFAULTS),
            value_types: ValueTypes::Fixed(
                entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            ),
            key_type: None,
        }
    }

    /// Validates keys of a uniform mapping through the given type.
    #[must_use]
    pub fn with_key_type(mut self, key_type: impl IntoHandle) -> Self {
        self.key_type = Some(key_type.into_handle());
        self
    }

    fn check_key(
        &self,
        key: &str,
        builder: &mut ErrorBuilder,
        context: Option<&Context>,
    ) {
        if let Some(key_type) = &self.key_type {
            let key_value = Value::String(key.to_owned());
            if let Err(err) = key_type.load(Some(&key_value), context) {
                builder.add_nested(key.to_owned(), err.into_tree());
            }
        }
    }
}

impl Default for Dict {
    fn default() -> Self {
        Self::new()
    }
}

meta_builders!(Dict);

impl Type for Dict {
    forward_meta!();

    fn load_raw(
        &self,
        data: Option<&Value>,
        context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        let value = require(data, self.meta.messages())?;
        let map = value
            .as_map()
            .ok_or_else(|| self.meta.messages().fail("invalid"))?;

        let mut builder = ErrorBuilder::new();
        let mut result: IndexMap<String, Item> = IndexMap::new();
        match &self.value_types {
            ValueTypes::Uniform(value_type) => {
                for (key, element) in map {
                    self.check_key(key, &mut builder, context);
                    match value_type.load(Some(element), context) {
                        Ok(item) => {
                            result.insert(key.clone(), item);
                        }
                        Err(err) => builder.add_nested(key.clone(), err.into_tree()),
                    }
                }
            }
            ValueTypes::Fixed(types) => {
                for (key, value_type) in types {
                    match value_type.load(map.get(key), context) {
                        Ok(item) => {
                            result.insert(key.clone(), item);
                        }
                        Err(err) => builder.add_nested(key.clone(), err.into_tree()),
                    }
                }
                for key in map.keys() {
                    if !types.contains_key(key) {
                        builder.add_error(key, self.meta.messages().render("unknown", &[]));
                    }
                }
            }
        }
        builder.finish()?;
        Ok(Item::Map(result))
    }

    fn dump(
        &self,
        value: &Item,
        context: Option<&Context>,
    ) -> Result<Option<Value>, ValidationError> {
        let item = require_present(value, self.meta.messages())?;
        let map = item
            .as_map()
            .ok_or_else(|| self.meta.messages().fail("invalid"))?;

        let mut builder = ErrorBuilder::new();
        let mut out: IndexMap<String, Value> = IndexMap::new();
        for (key, element) in map {
            let value_type = match &self.value_types {
                ValueTypes::Uniform(value_type) => value_type,
                ValueTypes::Fixed(types) => match types.get(key) {
                    Some(value_type) => value_type,
                    // Entries outside the fixed schema are dropped on dump.
                    None => continue,
                },
            };
            match value_type.dump(element, context) {
                Ok(Some(dumped)) => {
                    out.insert(key.clone(), dumped);
                }
                Ok(None) => {}
                Err(err) => builder.add_nested(key.clone(), err.into_tree()),
            }
        }
        builder.finish()?;
        Ok(Some(Value::Map(out)))
    }
}
