//! The record codec: named fields, inheritance composition, constructor
//! dispatch, partial update, and whole-object validation.

use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use marzipan_foundation::{
    Context, ErrorBuilder, ErrorTree, Item, Record, ValidationError, Value,
};

use crate::core::{
    forward_meta, meta_builders, require, require_present, run_validators, IntoHandle, Meta, Type,
    TypeHandle,
};
use crate::field::Field;

/// User-supplied constructor: named field items in, application object out.
pub type Constructor =
    Arc<dyn Fn(IndexMap<String, Item>) -> Result<Item, ValidationError> + Send + Sync>;

/// Access kind used for fields declared by bare type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldKind {
    /// Wrap bare types as attribute fields.
    #[default]
    Attribute,
    /// Wrap bare types as key fields.
    Key,
}

/// A field declaration before resolution: a full field, a bare type, or a
/// constant shortcut.
pub enum FieldDecl {
    /// An explicit field.
    Field(Field),
    /// A bare type, wrapped by the object's default field kind.
    Type(TypeHandle),
    /// A literal constant.
    Constant(Item),
}

/// By-value conversion into a [`FieldDecl`].
pub trait IntoFieldDecl {
    /// Converts into a field declaration.
    fn into_field_decl(self) -> FieldDecl;
}

impl IntoFieldDecl for Field {
    fn into_field_decl(self) -> FieldDecl {
        FieldDecl::Field(self)
    }
}

impl IntoFieldDecl for FieldDecl {
    fn into_field_decl(self) -> FieldDecl {
        self
    }
}

impl<T: Type + 'static> IntoFieldDecl for T {
    fn into_field_decl(self) -> FieldDecl {
        FieldDecl::Type(Arc::new(self))
    }
}

impl IntoFieldDecl for TypeHandle {
    fn into_field_decl(self) -> FieldDecl {
        FieldDecl::Type(self)
    }
}

struct Resolved {
    fields: IndexMap<String, Field>,
    constructor: Constructor,
    allow_extra_fields: bool,
    immutable: bool,
}

/// An object type: serializes to a mapping of field names to dumped field
/// values, deserializes through per-field loads and a constructor.
///
/// Field and option resolution is lazy: the first operation materializes
/// the resolved field set (inherited fields first in base-declaration
/// order, own fields appended, later declarations overriding earlier ones)
/// and caches it. Laziness is what lets registry forward references work.
pub struct Object {
    meta: Meta,
    bases: Vec<TypeHandle>,
    own_fields: Vec<(String, FieldDecl)>,
    constructor: Option<Constructor>,
    default_field_kind: Option<FieldKind>,
    allow_extra_fields: Option<bool>,
    immutable: Option<bool>,
    only: Option<Vec<String>>,
    exclude: Vec<String>,
    resolved: OnceLock<Resolved>,
}

impl Object {
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[
        ("invalid", "Value should be mapping"),
        ("required", "Value is required"),
        ("unknown", "Unknown field"),
    ];

    /// Creates an empty object type.
    #[must_use]
    pub fn new() -> Self {
        Self {
            meta: Meta::new(Self::DEFAULTS),
            bases: Vec::new(),
            own_fields: Vec::new(),
            constructor: None,
            default_field_kind: None,
            allow_extra_fields: None,
            immutable: None,
            only: None,
            exclude: Vec::new(),
            resolved: OnceLock::new(),
        }
    }

    /// Appends a base object type. Fields of later bases override earlier
    /// ones; unset options inherit from the first base that sets them.
    #[must_use]
    pub fn base(mut self, base: impl IntoHandle) -> Self {
        self.bases.push(base.into_handle());
        self
    }

    /// Declares a field: a [`Field`], a bare type, or a declaration.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, decl: impl IntoFieldDecl) -> Self {
        self.own_fields.push((name.into(), decl.into_field_decl()));
        self
    }

    /// Declares a literal constant field.
    #[must_use]
    pub fn constant_field(mut self, name: impl Into<String>, value: impl Into<Item>) -> Self {
        self.own_fields
            .push((name.into(), FieldDecl::Constant(value.into())));
        self
    }

    /// Sets the constructor invoked with the loaded field mapping.
    #[must_use]
    pub fn with_constructor(
        mut self,
        constructor: impl Fn(IndexMap<String, Item>) -> Result<Item, ValidationError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.constructor = Some(Arc::new(constructor));
        self
    }

    /// Sets how bare-type field declarations are wrapped.
    #[must_use]
    pub fn default_field_kind(mut self, kind: FieldKind) -> Self {
        self.default_field_kind = Some(kind);
        self
    }

    /// Accepts (true) or rejects (false) mapping keys not in the schema.
    #[must_use]
    pub fn allow_extra_fields(mut self, allow: bool) -> Self {
        self.allow_extra_fields = Some(allow);
        self
    }

    /// Makes partial updates construct a new value instead of mutating.
    #[must_use]
    pub fn immutable(mut self, immutable: bool) -> Self {
        self.immutable = Some(immutable);
        self
    }

    /// Keeps only the named inherited fields. Own fields are never
    /// filtered.
    #[must_use]
    pub fn only<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Drops the named inherited fields. Own fields are never filtered.
    #[must_use]
    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(names.into_iter().map(Into::into));
        self
    }

    fn find_constructor(&self) -> Option<Constructor> {
        if let Some(constructor) = &self.constructor {
            return Some(constructor.clone());
        }
        self.bases
            .iter()
            .filter_map(|base| base.as_object())
            .find_map(Object::find_constructor)
    }

    fn find_allow_extra_fields(&self) -> Option<bool> {
        self.allow_extra_fields.or_else(|| {
            self.bases
                .iter()
                .filter_map(|base| base.as_object())
                .find_map(Object::find_allow_extra_fields)
        })
    }

    fn find_immutable(&self) -> Option<bool> {
        self.immutable.or_else(|| {
            self.bases
                .iter()
                .filter_map(|base| base.as_object())
                .find_map(Object::find_immutable)
        })
    }

    fn find_default_field_kind(&self) -> Option<FieldKind> {
        self.default_field_kind.or_else(|| {
            self.bases
                .iter()
                .filter_map(|base| base.as_object())
                .find_map(Object::find_default_field_kind)
        })
    }

    fn resolve(&self) -> Result<Resolved, ValidationError> {
        let mut fields: IndexMap<String, Field> = IndexMap::new();
        for base in &self.bases {
            let object = base.as_object().ok_or_else(|| {
                ValidationError::leaf(match base.name() {
                    Some(name) => format!("Base type {name:?} is not an object type"),
                    None => "Base type is not an object type".to_owned(),
                })
            })?;
            let base_resolved = object.resolved()?;
            for (name, field) in &base_resolved.fields {
                if let Some(only) = &self.only {
                    if !only.contains(name) {
                        continue;
                    }
                }
                if self.exclude.contains(name) {
                    continue;
                }
                fields.insert(name.clone(), field.clone());
            }
        }

        let kind = self.find_default_field_kind().unwrap_or_default();
        for (name, decl) in &self.own_fields {
            let field = match decl {
                FieldDecl::Field(field) => field.clone(),
                FieldDecl::Type(ty) => match kind {
                    FieldKind::Attribute => Field::attribute(ty.clone()),
                    FieldKind::Key => Field::key(ty.clone()),
                },
                FieldDecl::Constant(item) => {
                    Field::constant(crate::scalar::Any::new(), item.clone())
                }
            };
            fields.insert(name.clone(), field);
        }

        let constructor = self
            .find_constructor()
            .unwrap_or_else(|| default_constructor(self.meta.name().map(ToOwned::to_owned)));

        Ok(Resolved {
            fields,
            constructor,
            allow_extra_fields: self.find_allow_extra_fields().unwrap_or(false),
            immutable: self.find_immutable().unwrap_or(false),
        })
    }

    /// Publishes the resolved field set once. Resolution failures are not
    /// cached, so a schema completed later (registry forward references)
    /// resolves on the next operation. Races do at most redundant work.
    fn resolved(&self) -> Result<&Resolved, ValidationError> {
        if self.resolved.get().is_none() {
            let resolved = self.resolve()?;
            let _ = self.resolved.set(resolved);
        }
        self.resolved
            .get()
            .ok_or_else(|| ValidationError::leaf("object resolution failed"))
    }

    /// The resolved field names, in dump order.
    pub fn field_names(&self) -> Result<Vec<String>, ValidationError> {
        Ok(self.resolved()?.fields.keys().cloned().collect())
    }

    /// Loads present fields from `data`, builds the merged view of `target`
    /// with those updates applied, and runs whole-object validators on it.
    fn merged_update(
        &self,
        target: &Item,
        data: Option<&Value>,
        context: Option<&Context>,
    ) -> Result<(IndexMap<String, Item>, Item), ValidationError> {
        let resolved = self.resolved()?;
        let value = require(data, self.meta.messages())?;
        let map = value
            .as_map()
            .ok_or_else(|| self.meta.messages().fail("invalid"))?;

        let mut builder = ErrorBuilder::new();
        let mut updates: IndexMap<String, Item> = IndexMap::new();
        for (name, field) in &resolved.fields {
            if !map.contains_key(name) {
                continue;
            }
            match field.load(name, map, context) {
                Ok(item) if !item.is_missing() => {
                    updates.insert(name.clone(), item);
                }
                Ok(_) => {}
                Err(err) => builder.add_nested(name.clone(), err.into_tree()),
            }
        }
        if !resolved.allow_extra_fields {
            for key in map.keys() {
                if !resolved.fields.contains_key(key) {
                    builder.add_error(key, self.meta.messages().render("unknown", &[]));
                }
            }
        }
        builder.finish()?;

        let mut merged = target.clone();
        for (name, item) in &updates {
            if let Some(field) = resolved.fields.get(name) {
                field.set_value(name, &mut merged, item.clone(), context);
            }
        }
        run_validators(self.meta.validators(), &merged, context)?;
        Ok((updates, merged))
    }

    fn collect_attrs(
        resolved: &Resolved,
        object: &Item,
        context: Option<&Context>,
    ) -> Result<IndexMap<String, Item>, ValidationError> {
        let mut attrs = IndexMap::new();
        for (name, field) in &resolved.fields {
            if !field.has_destination() {
                continue;
            }
            let item = field.read(name, object, context)?;
            if !item.is_missing() {
                attrs.insert(name.clone(), item);
            }
        }
        Ok(attrs)
    }

    /// Partially updates `target` from the present fields of `data`.
    ///
    /// Absent fields are untouched; whole-object validators run against the
    /// merged view before anything is written. Returns `Ok(None)` after
    /// mutating in place, or `Ok(Some(new))` when the object is immutable
    /// and a fresh value was constructed instead.
    pub fn load_into(
        &self,
        target: &mut Item,
        data: Option<&Value>,
        context: Option<&Context>,
    ) -> Result<Option<Item>, ValidationError> {
        let (updates, merged) = self.merged_update(target, data, context)?;
        let resolved = self.resolved()?;
        if resolved.immutable {
            let attrs = Self::collect_attrs(resolved, &merged, context)?;
            return (resolved.constructor)(attrs).map(Some);
        }
        for (name, item) in updates {
            if let Some(field) = resolved.fields.get(&name) {
                field.set_value(&name, target, item, context);
            }
        }
        Ok(None)
    }

    /// Non-mutating partial update: constructs a new value from `target`
    /// with the present fields of `data` applied.
    pub fn load_updated(
        &self,
        target: &Item,
        data: Option<&Value>,
        context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        let (_updates, merged) = self.merged_update(target, data, context)?;
        let resolved = self.resolved()?;
        let attrs = Self::collect_attrs(resolved, &merged, context)?;
        (resolved.constructor)(attrs)
    }

    /// Validates a partial update without mutating or constructing.
    #[must_use]
    pub fn validate_for(
        &self,
        target: &Item,
        data: Option<&Value>,
        context: Option<&Context>,
    ) -> Option<ErrorTree> {
        match self.merged_update(target, data, context) {
            Ok(_) => None,
            Err(err) => Some(err.into_tree()),
        }
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

meta_builders!(Object);

fn default_constructor(schema: Option<String>) -> Constructor {
    Arc::new(move |attrs| {
        let mut record = Record::from_attrs(attrs);
        if let Some(name) = &schema {
            record = record.with_schema(name.clone());
        }
        Ok(Item::Record(record))
    })
}

impl Type for Object {
    forward_meta!();

    fn load_raw(
        &self,
        data: Option<&Value>,
        context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        let resolved = self.resolved()?;
        let value = require(data, self.meta.messages())?;
        let map = value
            .as_map()
            .ok_or_else(|| self.meta.messages().fail("invalid"))?;

        let mut builder = ErrorBuilder::new();
        let mut result: IndexMap<String, Item> = IndexMap::new();
        for (name, field) in &resolved.fields {
            match field.load(name, map, context) {
                Ok(item) if !item.is_missing() => {
                    result.insert(name.clone(), item);
                }
                Ok(_) => {}
                Err(err) => builder.add_nested(name.clone(), err.into_tree()),
            }
        }
        if !resolved.allow_extra_fields {
            for key in map.keys() {
                if !resolved.fields.contains_key(key) {
                    builder.add_error(key, self.meta.messages().render("unknown", &[]));
                }
            }
        }
        builder.finish()?;

        (resolved.constructor)(result)
    }

    fn dump(
        &self,
        value: &Item,
        context: Option<&Context>,
    ) -> Result<Option<Value>, ValidationError> {
        let resolved = self.resolved()?;
        require_present(value, self.meta.messages())?;

        let mut builder = ErrorBuilder::new();
        let mut out: IndexMap<String, Value> = IndexMap::new();
        for (name, field) in &resolved.fields {
            match field.dump(name, value, context) {
                Ok(Some(dumped)) => {
                    out.insert(name.clone(), dumped);
                }
                Ok(None) => {}
                Err(err) => builder.add_nested(name.clone(), err.into_tree()),
            }
        }
        builder.finish()?;
        Ok(Some(Value::Map(out)))
    }

    fn as_object(&self) -> Option<&Object> {
        Some(self)
    }
}
