//! Polymorphic dispatch across alternative types.

use std::sync::Arc;

use indexmap::IndexMap;
use marzipan_foundation::{Context, Item, ValidationError, Value};

use crate::core::{forward_meta, meta_builders, require, Meta, Type, TypeHandle};

/// Closure choosing a tag from the external value on load.
pub type LoadHintFn = dyn Fn(&Value, Option<&Context>) -> Option<String> + Send + Sync;

/// Closure choosing a tag from the internal item on dump.
pub type DumpHintFn = dyn Fn(&Item, Option<&Context>) -> Option<String> + Send + Sync;

enum Variants {
    Tagged {
        types: IndexMap<String, TypeHandle>,
        load_hint: Arc<LoadHintFn>,
        dump_hint: Arc<DumpHintFn>,
    },
    Ordered(Vec<TypeHandle>),
}

/// A type dispatching among alternatives.
///
/// The tagged form consults user-supplied hints and reports the chosen
/// variant's precise errors. The ordered form tries alternatives in order
/// and reports only a generic error when all fail — the documented
/// tradeoff for hint-free dispatch. On dump, the ordered form picks the
/// first alternative whose dump succeeds.
pub struct OneOf {
    meta: Meta,
    variants: Variants,
}

impl OneOf {
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[
        ("invalid", "Invalid data"),
        ("unknown_tag", "Unknown value type {tag}"),
        ("required", "Value is required"),
    ];

    /// Creates the tagged form from tag/type pairs and the two hints.
    pub fn tagged<I, K>(
        types: I,
        load_hint: impl Fn(&Value, Option<&Context>) -> Option<String> + Send + Sync + 'static,
        dump_hint: impl Fn(&Item, Option<&Context>) -> Option<String> + Send + Sync + 'static,
    ) -> Self
    where
        I: IntoIterator<Item = (K, TypeHandle)>,
        K: Into<String>,
    {
        Self {
            meta: Meta::new(Self::DEFAULTS),
            variants: Variants::Tagged {
                types: types.into_iter().map(|(k, v)| (k.into(), v)).collect(),
                load_hint: Arc::new(load_hint),
                dump_hint: Arc::new(dump_hint),
            },
        }
    }

    /// Creates the ordered form: alternatives tried first to last.
    #[must_use]
    pub fn ordered(types: Vec<TypeHandle>) -> Self {
        Self {
            meta: Meta::new(Self::DEFAULTS),
            variants: Variants::Ordered(types),
        }
    }

    fn pick<'a>(
        &'a self,
        types: &'a IndexMap<String, TypeHandle>,
        tag: Option<String>,
    ) -> Result<&'a TypeHandle, ValidationError> {
        let tag = tag.ok_or_else(|| self.meta.messages().fail("invalid"))?;
        types.get(&tag).ok_or_else(|| {
            self.meta
                .messages()
                .fail_with("unknown_tag", &[("tag", tag.clone())])
        })
    }
}

meta_builders!(OneOf);

impl Type for OneOf {
    forward_meta!();

    fn load_raw(
        &self,
        data: Option<&Value>,
        context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        let value = require(data, self.meta.messages())?;
        match &self.variants {
            Variants::Tagged {
                types, load_hint, ..
            } => {
                let ty = self.pick(types, load_hint(value, context))?;
                ty.load(Some(value), context)
            }
            Variants::Ordered(types) => {
                for ty in types {
                    if let Ok(item) = ty.load(Some(value), context) {
                        return Ok(item);
                    }
                }
                Err(self.meta.messages().fail("invalid"))
            }
        }
    }

    fn dump(
        &self,
        value: &Item,
        context: Option<&Context>,
    ) -> Result<Option<Value>, ValidationError> {
        match &self.variants {
            Variants::Tagged {
                types, dump_hint, ..
            } => {
                let ty = self.pick(types, dump_hint(value, context))?;
                ty.dump(value, context)
            }
            Variants::Ordered(types) => {
                for ty in types {
                    if let Ok(dumped) = ty.dump(value, context) {
                        return Ok(dumped);
                    }
                }
                Err(self.meta.messages().fail("invalid"))
            }
        }
    }
}

/// Builds a load hint reading a string field of the external mapping.
pub fn dict_value_hint(key: impl Into<String>) -> impl Fn(&Value, Option<&Context>) -> Option<String> {
    let key = key.into();
    move |value, _context| {
        value
            .as_map()
            .and_then(|map| map.get(&key))
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
    }
}

/// Builds a load hint reading a string field and remapping it through a
/// translation table.
pub fn dict_value_hint_mapped<I, K, V>(
    key: impl Into<String>,
    mapping: I,
) -> impl Fn(&Value, Option<&Context>) -> Option<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let key = key.into();
    let mapping: IndexMap<String, String> = mapping
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    move |value, _context| {
        let raw = value
            .as_map()
            .and_then(|map| map.get(&key))
            .and_then(Value::as_str)?;
        mapping.get(raw).cloned()
    }
}

/// Builds a dump hint dispatching on a record's schema-name stamp, the
/// internal analog of tagging.
pub fn type_name_hint() -> impl Fn(&Item, Option<&Context>) -> Option<String> {
    |item, _context| {
        item.as_record()
            .and_then(|record| record.schema())
            .map(ToOwned::to_owned)
    }
}
