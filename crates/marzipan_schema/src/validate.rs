//! Validators: predicates over loaded items.
//!
//! A validator inspects an already-loaded item and fails with a
//! [`ValidationError`] when the value is unacceptable. Validators may take
//! the operation context into account; the one-argument/two-argument duality
//! is resolved once at construction (context-prebaking), never per call.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use marzipan_foundation::{Context, Item, ValidationError};

use crate::core::{IntoHandle, Type, TypeHandle};

/// A predicate over a loaded item.
///
/// Implementors report failure via [`ValidationError`]; the return value on
/// success carries no information. Closures of shape
/// `Fn(&Item, Option<&Context>) -> Result<(), ValidationError>` implement
/// this trait directly.
pub trait Validate: Send + Sync {
    /// Checks the item, failing with a leaf or nested error.
    fn check(&self, value: &Item, context: Option<&Context>) -> Result<(), ValidationError>;
}

impl<F> Validate for F
where
    F: Fn(&Item, Option<&Context>) -> Result<(), ValidationError> + Send + Sync,
{
    fn check(&self, value: &Item, context: Option<&Context>) -> Result<(), ValidationError> {
        self(value, context)
    }
}

/// Per-validator error message templates with `{param}` interpolation.
///
/// Every validator (and type) ships a default table; individual keys can be
/// overridden at construction.
#[derive(Clone, Debug)]
pub struct Messages {
    templates: IndexMap<&'static str, String>,
}

impl Messages {
    /// Creates a table from default key/template pairs.
    #[must_use]
    pub fn new(defaults: &[(&'static str, &'static str)]) -> Self {
        Self {
            templates: defaults
                .iter()
                .map(|(key, template)| (*key, (*template).to_owned()))
                .collect(),
        }
    }

    /// Overrides one template.
    pub fn set(&mut self, key: &'static str, template: impl Into<String>) {
        self.templates.insert(key, template.into());
    }

    /// Renders a template, substituting `{name}` placeholders.
    ///
    /// # Panics
    ///
    /// Panics when `key` has no template; asking for an unknown message key
    /// is a programming error in the validator, not a data error.
    #[must_use]
    pub fn render(&self, key: &'static str, params: &[(&str, String)]) -> String {
        let template = self
            .templates
            .get(key)
            .unwrap_or_else(|| panic!("error message {key:?} does not exist"));
        let mut message = template.clone();
        for (name, value) in params {
            message = message.replace(&format!("{{{name}}}"), value);
        }
        message
    }

    /// Fails with the rendered template for `key`.
    ///
    /// # Panics
    ///
    /// Panics when `key` has no template (see [`Messages::render`]).
    pub fn fail(&self, key: &'static str) -> ValidationError {
        ValidationError::leaf(self.render(key, &[]))
    }

    /// Fails with the rendered template for `key` and parameters.
    ///
    /// # Panics
    ///
    /// Panics when `key` has no template (see [`Messages::render`]).
    pub fn fail_with(&self, key: &'static str, params: &[(&str, String)]) -> ValidationError {
        ValidationError::leaf(self.render(key, params))
    }
}

/// Validator that succeeds when a predicate returns true.
pub struct Predicate {
    predicate: Arc<dyn Fn(&Item, Option<&Context>) -> bool + Send + Sync>,
    messages: Messages,
}

impl Predicate {
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[("invalid", "Invalid data")];

    /// Wraps a value-only predicate. The context is prebaked away here.
    pub fn new(predicate: impl Fn(&Item) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Arc::new(move |item, _context| predicate(item)),
            messages: Messages::new(Self::DEFAULTS),
        }
    }

    /// Wraps a context-aware predicate.
    pub fn with_context(
        predicate: impl Fn(&Item, Option<&Context>) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            predicate: Arc::new(predicate),
            messages: Messages::new(Self::DEFAULTS),
        }
    }

    /// Overrides the failure message. `{data}` interpolates the value.
    #[must_use]
    pub fn with_error(mut self, template: impl Into<String>) -> Self {
        self.messages.set("invalid", template);
        self
    }
}

impl Validate for Predicate {
    fn check(&self, value: &Item, context: Option<&Context>) -> Result<(), ValidationError> {
        if (self.predicate)(value, context) {
            Ok(())
        } else {
            Err(self
                .messages
                .fail_with("invalid", &[("data", value.to_string())]))
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// Validator that checks a value against an inclusive range.
///
/// Bounds are items; comparison uses the item partial order, so integer
/// bounds also constrain floats. Values that do not compare with the bounds
/// are left to other validators.
#[derive(Debug)]
pub struct Range {
    min: Option<Item>,
    max: Option<Item>,
    messages: Messages,
}

impl Range {
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[
        ("min", "Value should be at least {min}"),
        ("max", "Value should be at most {max}"),
        ("range", "Value should be at least {min} and at most {max}"),
    ];

    /// Requires `value >= min`.
    pub fn at_least(min: impl Into<Item>) -> Self {
        Self {
            min: Some(min.into()),
            max: None,
            messages: Messages::new(Self::DEFAULTS),
        }
    }

    /// Requires `value <= max`.
    pub fn at_most(max: impl Into<Item>) -> Self {
        Self {
            min: None,
            max: Some(max.into()),
            messages: Messages::new(Self::DEFAULTS),
        }
    }

    /// Requires `min <= value <= max`.
    pub fn between(min: impl Into<Item>, max: impl Into<Item>) -> Self {
        Self {
            min: Some(min.into()),
            max: Some(max.into()),
            messages: Messages::new(Self::DEFAULTS),
        }
    }

    /// Overrides one failure message (`min`, `max`, or `range`).
    #[must_use]
    pub fn with_error_message(mut self, key: &'static str, template: impl Into<String>) -> Self {
        self.messages.set(key, template);
        self
    }

    fn params(&self, value: &Item) -> Vec<(&'static str, String)> {
        let mut params = vec![("data", value.to_string())];
        if let Some(min) = &self.min {
            params.push(("min", min.to_string()));
        }
        if let Some(max) = &self.max {
            params.push(("max", max.to_string()));
        }
        params
    }
}

impl Validate for Range {
    fn check(&self, value: &Item, _context: Option<&Context>) -> Result<(), ValidationError> {
        let below = self.min.as_ref().is_some_and(|min| {
            matches!(value.partial_cmp(min), Some(std::cmp::Ordering::Less))
        });
        let above = self.max.as_ref().is_some_and(|max| {
            matches!(value.partial_cmp(max), Some(std::cmp::Ordering::Greater))
        });
        if !below && !above {
            return Ok(());
        }
        let key = match (&self.min, &self.max) {
            (Some(_), Some(_)) => "range",
            (Some(_), None) => "min",
            _ => "max",
        };
        Err(self.messages.fail_with(key, &self.params(value)))
    }
}

/// Validator that checks a value's length.
///
/// Applies to strings (character count), sequences, tuples, mappings, and
/// records; other values are left to other validators.
#[derive(Debug)]
pub struct Length {
    exact: Option<usize>,
    min: Option<usize>,
    max: Option<usize>,
    messages: Messages,
}

impl Length {
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[
        ("exact", "Length should be {exact}"),
        ("min", "Length should be at least {min}"),
        ("max", "Length should be at most {max}"),
        ("range", "Length should be at least {min} and at most {max}"),
    ];

    /// Requires an exact length.
    #[must_use]
    pub fn exact(exact: usize) -> Self {
        Self {
            exact: Some(exact),
            min: None,
            max: None,
            messages: Messages::new(Self::DEFAULTS),
        }
    }

    /// Requires `len >= min`.
    #[must_use]
    pub fn at_least(min: usize) -> Self {
        Self {
            exact: None,
            min: Some(min),
            max: None,
            messages: Messages::new(Self::DEFAULTS),
        }
    }

    /// Requires `len <= max`.
    #[must_use]
    pub fn at_most(max: usize) -> Self {
        Self {
            exact: None,
            min: None,
            max: Some(max),
            messages: Messages::new(Self::DEFAULTS),
        }
    }

    /// Requires `min <= len <= max`.
    #[must_use]
    pub fn between(min: usize, max: usize) -> Self {
        Self {
            exact: None,
            min: Some(min),
            max: Some(max),
            messages: Messages::new(Self::DEFAULTS),
        }
    }

    /// Overrides one failure message (`exact`, `min`, `max`, or `range`).
    #[must_use]
    pub fn with_error_message(mut self, key: &'static str, template: impl Into<String>) -> Self {
        self.messages.set(key, template);
        self
    }
}

impl Validate for Length {
    fn check(&self, value: &Item, _context: Option<&Context>) -> Result<(), ValidationError> {
        let Some(length) = value.len() else {
            return Ok(());
        };
        let fail = |key: &'static str| {
            let mut params = vec![("data", value.to_string()), ("length", length.to_string())];
            if let Some(exact) = self.exact {
                params.push(("exact", exact.to_string()));
            }
            if let Some(min) = self.min {
                params.push(("min", min.to_string()));
            }
            if let Some(max) = self.max {
                params.push(("max", max.to_string()));
            }
            Err(self.messages.fail_with(key, &params))
        };
        if let Some(exact) = self.exact {
            if length != exact {
                return fail("exact");
            }
            return Ok(());
        }
        match (self.min, self.max) {
            (Some(min), Some(max)) if length < min || length > max => fail("range"),
            (Some(min), None) if length < min => fail("min"),
            (None, Some(max)) if length > max => fail("max"),
            _ => Ok(()),
        }
    }
}

/// Validator that succeeds when the value is one of the given choices.
#[derive(Debug)]
pub struct AnyOf {
    choices: Vec<Item>,
    messages: Messages,
}

impl AnyOf {
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[("invalid", "Invalid choice")];

    /// Creates the validator from allowed values.
    pub fn new<I, T>(choices: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Item>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
            messages: Messages::new(Self::DEFAULTS),
        }
    }

    /// Overrides the failure message.
    #[must_use]
    pub fn with_error(mut self, template: impl Into<String>) -> Self {
        self.messages.set("invalid", template);
        self
    }
}

impl Validate for AnyOf {
    fn check(&self, value: &Item, _context: Option<&Context>) -> Result<(), ValidationError> {
        if self.choices.contains(value) {
            Ok(())
        } else {
            Err(self
                .messages
                .fail_with("invalid", &[("data", value.to_string())]))
        }
    }
}

/// Validator that succeeds when the value is not one of the given values.
#[derive(Debug)]
pub struct NoneOf {
    values: Vec<Item>,
    messages: Messages,
}

impl NoneOf {
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[("invalid", "Invalid data")];

    /// Creates the validator from forbidden values.
    pub fn new<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Item>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            messages: Messages::new(Self::DEFAULTS),
        }
    }

    /// Overrides the failure message.
    #[must_use]
    pub fn with_error(mut self, template: impl Into<String>) -> Self {
        self.messages.set("invalid", template);
        self
    }
}

impl Validate for NoneOf {
    fn check(&self, value: &Item, _context: Option<&Context>) -> Result<(), ValidationError> {
        if self.values.contains(value) {
            Err(self
                .messages
                .fail_with("invalid", &[("data", value.to_string())]))
        } else {
            Ok(())
        }
    }
}

/// Validator that succeeds when a string matches a regular expression.
#[derive(Debug)]
pub struct Regexp {
    regexp: regex::Regex,
    messages: Messages,
}

impl Regexp {
    const DEFAULTS: &'static [(&'static str, &'static str)] =
        &[("invalid", "String does not match expected pattern")];

    /// Compiles the pattern.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regexp: regex::Regex::new(pattern)?,
            messages: Messages::new(Self::DEFAULTS),
        })
    }

    /// Overrides the failure message. `{regexp}` interpolates the pattern.
    #[must_use]
    pub fn with_error(mut self, template: impl Into<String>) -> Self {
        self.messages.set("invalid", template);
        self
    }
}

impl Validate for Regexp {
    fn check(&self, value: &Item, _context: Option<&Context>) -> Result<(), ValidationError> {
        let matched = value.as_str().is_some_and(|s| self.regexp.is_match(s));
        if matched {
            Ok(())
        } else {
            Err(self.messages.fail_with(
                "invalid",
                &[
                    ("data", value.to_string()),
                    ("regexp", self.regexp.as_str().to_owned()),
                ],
            ))
        }
    }
}

/// A type derived from a base by prepending a validator.
pub(crate) struct Derived {
    name: Option<String>,
    inner: TypeHandle,
    validators: Vec<Arc<dyn Validate>>,
}

impl Type for Derived {
    fn name(&self) -> Option<&str> {
        self.name.as_deref().or_else(|| self.inner.name())
    }

    fn description(&self) -> Option<&str> {
        self.inner.description()
    }

    fn validators(&self) -> &[Arc<dyn Validate>] {
        &self.validators
    }

    fn load_raw(
        &self,
        data: Option<&marzipan_foundation::Value>,
        context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        self.inner.load_raw(data, context)
    }

    fn dump(
        &self,
        value: &Item,
        context: Option<&Context>,
    ) -> Result<Option<marzipan_foundation::Value>, ValidationError> {
        self.inner.dump(value, context)
    }

    fn as_object(&self) -> Option<&crate::object::Object> {
        self.inner.as_object()
    }
}

/// Derives a new type from `base` with `validator` prepended to its
/// validator chain. The validator still runs after structural decoding.
///
/// ```
/// use marzipan_schema::scalar::Str;
/// use marzipan_schema::validate::{validated_type, Regexp};
/// use marzipan_schema::Type;
///
/// let ipv4 = Regexp::new(r"^\d{1,3}(\.\d{1,3}){3}$").unwrap();
/// let ip = validated_type(Str::new(), Some("IPv4"), ipv4);
/// assert_eq!(ip.name(), Some("IPv4"));
/// ```
pub fn validated_type(
    base: impl IntoHandle,
    name: Option<&str>,
    validator: impl Validate + 'static,
) -> TypeHandle {
    let inner = base.into_handle();
    let mut validators: Vec<Arc<dyn Validate>> = vec![Arc::new(validator)];
    validators.extend(inner.validators().iter().cloned());
    Arc::new(Derived {
        name: name.map(ToOwned::to_owned),
        inner,
        validators,
    })
}

/// Anchored, pragmatic email shape: one `@`, a dot in the domain.
const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// An email string type, derived from [`Str`](crate::scalar::Str) the
/// idiomatic way: a validated type over a regular expression.
#[must_use]
pub fn email() -> TypeHandle {
    let regexp = Regexp::new(EMAIL_PATTERN)
        .unwrap_or_else(|_| unreachable!("the email pattern is a valid regex"))
        .with_error("Invalid email");
    validated_type(crate::scalar::Str::new(), Some("Email"), regexp)
}
