//! Scalar codecs: passthrough, strings, numbers, booleans, dates and times.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use marzipan_foundation::{Context, Item, ValidationError, Value};

use crate::core::{forward_meta, meta_builders, require, require_present, Meta, Type};

/// Passthrough type: accepts and emits anything, structurally converted.
pub struct Any {
    meta: Meta,
}

impl Any {
    /// Creates the type.
    #[must_use]
    pub fn new() -> Self {
        Self {
            meta: Meta::new(&[]),
        }
    }
}

impl Default for Any {
    fn default() -> Self {
        Self::new()
    }
}

meta_builders!(Any);

impl Type for Any {
    forward_meta!();

    fn load_raw(
        &self,
        data: Option<&Value>,
        _context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        Ok(data.map_or(Item::Missing, Item::from_value))
    }

    fn dump(
        &self,
        value: &Item,
        _context: Option<&Context>,
    ) -> Result<Option<Value>, ValidationError> {
        Ok(value.to_value())
    }
}

/// String type. Rejects everything that is not a string, including
/// stringified booleans and numbers.
pub struct Str {
    meta: Meta,
}

impl Str {
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[
        ("invalid", "Value should be string"),
        ("required", "Value is required"),
    ];

    /// Creates the type.
    #[must_use]
    pub fn new() -> Self {
        Self {
            meta: Meta::new(Self::DEFAULTS),
        }
    }
}

impl Default for Str {
    fn default() -> Self {
        Self::new()
    }
}

meta_builders!(Str);

impl Type for Str {
    forward_meta!();

    fn load_raw(
        &self,
        data: Option<&Value>,
        _context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        let value = require(data, self.meta.messages())?;
        match value {
            Value::String(s) => Ok(Item::String(s.clone())),
            _ => Err(self.meta.messages().fail("invalid")),
        }
    }

    fn dump(
        &self,
        value: &Item,
        _context: Option<&Context>,
    ) -> Result<Option<Value>, ValidationError> {
        let item = require_present(value, self.meta.messages())?;
        match item {
            Item::String(s) => Ok(Some(Value::String(s.clone()))),
            _ => Err(self.meta.messages().fail("invalid")),
        }
    }
}

/// Integer type. Floats, digit strings, and booleans are rejected.
pub struct Int {
    meta: Meta,
}

impl Int {
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[
        ("invalid", "Value should be integer"),
        ("required", "Value is required"),
    ];

    /// Creates the type.
    #[must_use]
    pub fn new() -> Self {
        Self {
            meta: Meta::new(Self::DEFAULTS),
        }
    }
}

impl Default for Int {
    fn default() -> Self {
        Self::new()
    }
}

meta_builders!(Int);

impl Type for Int {
    forward_meta!();

    fn load_raw(
        &self,
        data: Option<&Value>,
        _context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        let value = require(data, self.meta.messages())?;
        match value {
            Value::Int(n) => Ok(Item::Int(*n)),
            _ => Err(self.meta.messages().fail("invalid")),
        }
    }

    fn dump(
        &self,
        value: &Item,
        _context: Option<&Context>,
    ) -> Result<Option<Value>, ValidationError> {
        let item = require_present(value, self.meta.messages())?;
        match item {
            Item::Int(n) => Ok(Some(Value::Int(*n))),
            _ => Err(self.meta.messages().fail("invalid")),
        }
    }
}

/// Float type. Integers widen on load; strings and booleans are rejected.
pub struct Float {
    meta: Meta,
}

impl Float {
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[
        ("invalid", "Value should be float"),
        ("required", "Value is required"),
    ];

    /// Creates the type.
    #[must_use]
    pub fn new() -> Self {
        Self {
            meta: Meta::new(Self::DEFAULTS),
        }
    }
}

impl Default for Float {
    fn default() -> Self {
        Self::new()
    }
}

meta_builders!(Float);

impl Type for Float {
    forward_meta!();

    fn load_raw(
        &self,
        data: Option<&Value>,
        _context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        let value = require(data, self.meta.messages())?;
        match value.as_number() {
            Some(n) => Ok(Item::Float(n)),
            None => Err(self.meta.messages().fail("invalid")),
        }
    }

    fn dump(
        &self,
        value: &Item,
        _context: Option<&Context>,
    ) -> Result<Option<Value>, ValidationError> {
        let item = require_present(value, self.meta.messages())?;
        match item.as_number() {
            Some(n) => Ok(Some(Value::Float(n))),
            None => Err(self.meta.messages().fail("invalid")),
        }
    }
}

/// Boolean type.
pub struct Bool {
    meta: Meta,
}

impl Bool {
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[
        ("invalid", "Value should be boolean"),
        ("required", "Value is required"),
    ];

    /// Creates the type.
    #[must_use]
    pub fn new() -> Self {
        Self {
            meta: Meta::new(Self::DEFAULTS),
        }
    }
}

impl Default for Bool {
    fn default() -> Self {
        Self::new()
    }
}

meta_builders!(Bool);

impl Type for Bool {
    forward_meta!();

    fn load_raw(
        &self,
        data: Option<&Value>,
        _context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        let value = require(data, self.meta.messages())?;
        match value {
            Value::Bool(b) => Ok(Item::Bool(*b)),
            _ => Err(self.meta.messages().fail("invalid")),
        }
    }

    fn dump(
        &self,
        value: &Item,
        _context: Option<&Context>,
    ) -> Result<Option<Value>, ValidationError> {
        let item = require_present(value, self.meta.messages())?;
        match item {
            Item::Bool(b) => Ok(Some(Value::Bool(*b))),
            _ => Err(self.meta.messages().fail("invalid")),
        }
    }
}

const DATE_DEFAULTS: &[(&str, &str)] = &[
    ("invalid", "Invalid date value"),
    ("invalid_type", "Value should be string"),
    ("invalid_format", "Value should match date format"),
    ("required", "Value is required"),
];

/// Calendar date type, serialized as a formatted string (ISO-8601 by
/// default).
pub struct Date {
    meta: Meta,
    format: String,
}

impl Date {
    /// ISO-8601 date format.
    pub const ISO: &'static str = "%Y-%m-%d";

    /// Creates the type with the ISO format.
    #[must_use]
    pub fn new() -> Self {
        Self {
            meta: Meta::new(DATE_DEFAULTS),
            format: Self::ISO.to_owned(),
        }
    }

    /// Uses a custom chrono format string.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }
}

impl Default for Date {
    fn default() -> Self {
        Self::new()
    }
}

meta_builders!(Date);

impl Type for Date {
    forward_meta!();

    fn load_raw(
        &self,
        data: Option<&Value>,
        _context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        let value = require(data, self.meta.messages())?;
        let text = value
            .as_str()
            .ok_or_else(|| self.meta.messages().fail("invalid_type"))?;
        NaiveDate::parse_from_str(text, &self.format)
            .map(Item::Date)
            .map_err(|_| {
                self.meta.messages().fail_with(
                    "invalid_format",
                    &[("data", text.to_owned()), ("format", self.format.clone())],
                )
            })
    }

    fn dump(
        &self,
        value: &Item,
        _context: Option<&Context>,
    ) -> Result<Option<Value>, ValidationError> {
        let item = require_present(value, self.meta.messages())?;
        match item {
            Item::Date(d) => Ok(Some(Value::String(d.format(&self.format).to_string()))),
            _ => Err(self.meta.messages().fail("invalid")),
        }
    }
}

const TIME_DEFAULTS: &[(&str, &str)] = &[
    ("invalid", "Invalid time value"),
    ("invalid_type", "Value should be string"),
    ("invalid_format", "Value should match time format"),
    ("required", "Value is required"),
];

/// Time-of-day type, serialized as a formatted string (ISO-8601 by default).
pub struct Time {
    meta: Meta,
    format: String,
}

impl Time {
    /// ISO-8601 time format.
    pub const ISO: &'static str = "%H:%M:%S";

    /// Creates the type with the ISO format.
    #[must_use]
    pub fn new() -> Self {
        Self {
            meta: Meta::new(TIME_DEFAULTS),
            format: Self::ISO.to_owned(),
        }
    }

    /// Uses a custom chrono format string.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

meta_builders!(Time);

impl Type for Time {
    forward_meta!();

    fn load_raw(
        &self,
        data: Option<&Value>,
        _context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        let value = require(data, self.meta.messages())?;
        let text = value
            .as_str()
            .ok_or_else(|| self.meta.messages().fail("invalid_type"))?;
        NaiveTime::parse_from_str(text, &self.format)
            .map(Item::Time)
            .map_err(|_| {
                self.meta.messages().fail_with(
                    "invalid_format",
                    &[("data", text.to_owned()), ("format", self.format.clone())],
                )
            })
    }

    fn dump(
        &self,
        value: &Item,
        _context: Option<&Context>,
    ) -> Result<Option<Value>, ValidationError> {
        let item = require_present(value, self.meta.messages())?;
        match item {
            Item::Time(t) => Ok(Some(Value::String(t.format(&self.format).to_string()))),
            _ => Err(self.meta.messages().fail("invalid")),
        }
    }
}

const DATETIME_DEFAULTS: &[(&str, &str)] = &[
    ("invalid", "Invalid datetime value"),
    ("invalid_type", "Value should be string"),
    ("invalid_format", "Value should match datetime format"),
    ("required", "Value is required"),
];

/// Combined date and time type, serialized as a formatted string (ISO-8601
/// by default).
pub struct DateTime {
    meta: Meta,
    format: String,
}

impl DateTime {
    /// ISO-8601 datetime format.
    pub const ISO: &'static str = "%Y-%m-%dT%H:%M:%S";

    /// Creates the type with the ISO format.
    #[must_use]
    pub fn new() -> Self {
        Self {
            meta: Meta::new(DATETIME_DEFAULTS),
            format: Self::ISO.to_owned(),
        }
    }

    /// Uses a custom chrono format string.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }
}

impl Default for DateTime {
    fn default() -> Self {
        Self::new()
    }
}

meta_builders!(DateTime);

impl Type for DateTime {
    forward_meta!();

    fn load_raw(
        &self,
        data: Option<&Value>,
        _context: Option<&Context>,
    ) -> Result<Item, ValidationError> {
        let value = require(data, self.meta.messages())?;
        let text = value
            .as_str()
            .ok_or_else(|| self.meta.messages().fail("invalid_type"))?;
        NaiveDateTime::parse_from_str(text, &self.format)
            .map(Item::DateTime)
            .map_err(|_| {
                self.meta.messages().fail_with(
                    "invalid_format",
                    &[("data", text.to_owned()), ("format", self.format.clone())],
                )
            })
    }

    fn dump(
        &self,
        value: &Item,
        _context: Option<&Context>,
    ) -> Result<Option<Value>, ValidationError> {
        let item = require_present(value, self.meta.messages())?;
        match item {
            Item::DateTime(dt) => Ok(Some(Value::String(dt.format(&self.format).to_string()))),
            _ => Err(self.meta.messages().fail("invalid")),
        }
    }
}
