//! Internal values: what `load` produces and `dump` consumes.

use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;

/// An application-side value.
///
/// Everything a loader can produce lives in this sum, including the
/// [`Item::Missing`] sentinel for "no value present". `Missing` is never a
/// validation target and never reaches a produced external tree; dumpers
/// translate it into an omitted key instead.
#[derive(Clone, Debug, PartialEq)]
pub enum Item {
    /// No value present. Distinct from `Null`.
    Missing,
    /// Explicit null.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Time of day.
    Time(NaiveTime),
    /// Date and time.
    DateTime(NaiveDateTime),
    /// Ordered sequence.
    Seq(Vec<Item>),
    /// Fixed-arity sequence.
    Tuple(Vec<Item>),
    /// String-keyed mapping. Insertion order is preserved.
    Map(IndexMap<String, Item>),
    /// Attribute-bearing application object.
    Record(Record),
}

impl Item {
    /// Returns true if this item is the missing sentinel.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Returns true if this item is missing or null.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Missing | Self::Null)
    }

    /// Attempts to extract a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a float.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a number as f64 (converts int to float).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a date.
    #[must_use]
    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Attempts to extract a time.
    #[must_use]
    pub const fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Self::Time(t) => Some(*t),
            _ => None,
        }
    }

    /// Attempts to extract a datetime.
    #[must_use]
    pub const fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Attempts to extract a sequence reference (from `Seq` or `Tuple`).
    #[must_use]
    pub const fn as_seq(&self) -> Option<&Vec<Item>> {
        match self {
            Self::Seq(items) | Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Attempts to extract a mapping reference.
    #[must_use]
    pub const fn as_map(&self) -> Option<&IndexMap<String, Item>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Attempts to extract a record reference.
    #[must_use]
    pub const fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Attempts to extract a mutable record reference.
    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Length of a string, sequence, tuple, mapping, or record.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::String(s) => Some(s.chars().count()),
            Self::Seq(items) | Self::Tuple(items) => Some(items.len()),
            Self::Map(map) => Some(map.len()),
            Self::Record(record) => Some(record.len()),
            _ => None,
        }
    }

    /// Builds a sequence item from an iterator.
    pub fn seq<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Item>,
    {
        Self::Seq(items.into_iter().map(Into::into).collect())
    }

    /// Structurally converts an external value, without any schema.
    #[must_use]
    pub fn from_value(value: &crate::value::Value) -> Self {
        use crate::value::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Int(n) => Self::Int(*n),
            Value::Float(n) => Self::Float(*n),
            Value::String(s) => Self::String(s.clone()),
            Value::Seq(items) => Self::Seq(items.iter().map(Self::from_value).collect()),
            Value::Map(map) => Self::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from_value(v)))
                    .collect(),
            ),
        }
    }

    /// Structurally converts to an external value, without any schema.
    ///
    /// `Missing` converts to `None` (the caller omits it); dates and times
    /// render as ISO-8601 strings; tuples flatten into sequences; records
    /// flatten into mappings, dropping missing attributes.
    #[must_use]
    pub fn to_value(&self) -> Option<crate::value::Value> {
        use crate::value::Value;
        match self {
            Self::Missing => None,
            Self::Null => Some(Value::Null),
            Self::Bool(b) => Some(Value::Bool(*b)),
            Self::Int(n) => Some(Value::Int(*n)),
            Self::Float(n) => Some(Value::Float(*n)),
            Self::String(s) => Some(Value::String(s.clone())),
            Self::Date(d) => Some(Value::String(d.format("%Y-%m-%d").to_string())),
            Self::Time(t) => Some(Value::String(t.format("%H:%M:%S").to_string())),
            Self::DateTime(dt) => Some(Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string())),
            Self::Seq(items) | Self::Tuple(items) => Some(Value::Seq(
                items.iter().filter_map(Self::to_value).collect(),
            )),
            Self::Map(map) => Some(Value::Map(
                map.iter()
                    .filter_map(|(k, v)| v.to_value().map(|v| (k.clone(), v)))
                    .collect(),
            )),
            Self::Record(record) => Some(Value::Map(
                record
                    .iter()
                    .filter_map(|(k, v)| v.to_value().map(|v| (k.to_owned(), v)))
                    .collect(),
            )),
        }
    }
}

impl PartialOrd for Item {
    #[allow(clippy::cast_precision_loss)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.partial_cmp(b),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            // Cross-type numeric comparison intentionally loses precision for large i64
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::String(a), Self::String(b)) => a.partial_cmp(b),
            (Self::Bool(a), Self::Bool(b)) => a.partial_cmp(b),
            (Self::Date(a), Self::Date(b)) => a.partial_cmp(b),
            (Self::Time(a), Self::Time(b)) => a.partial_cmp(b),
            (Self::DateTime(a), Self::DateTime(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "<missing>"),
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::Time(t) => write!(f, "{t}"),
            Self::DateTime(dt) => write!(f, "{dt}"),
            Self::Seq(items) | Self::Tuple(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                write!(f, "}}")
            }
            Self::Record(record) => write!(f, "{record}"),
        }
    }
}

impl From<bool> for Item {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Item {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Item {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Item {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Item {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Item {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<NaiveDate> for Item {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveTime> for Item {
    fn from(t: NaiveTime) -> Self {
        Self::Time(t)
    }
}

impl From<NaiveDateTime> for Item {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl From<Record> for Item {
    fn from(record: Record) -> Self {
        Self::Record(record)
    }
}

impl<T: Into<Item>> From<Vec<T>> for Item {
    fn from(items: Vec<T>) -> Self {
        Self::Seq(items.into_iter().map(Into::into).collect())
    }
}

/// An attribute-bearing application object.
///
/// This is what the default object constructor builds: an ordered mapping of
/// attribute names to items, optionally stamped with the name of the schema
/// that constructed it. Polymorphic dump hints can dispatch on that stamp.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    schema: Option<String>,
    attrs: IndexMap<String, Item>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record from attribute pairs.
    pub fn from_attrs<I, K, T>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<Item>,
    {
        Self {
            schema: None,
            attrs: attrs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Stamps the record with the name of the schema that built it.
    #[must_use]
    pub fn with_schema(mut self, name: impl Into<String>) -> Self {
        self.schema = Some(name.into());
        self
    }

    /// The schema name stamp, if any.
    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Returns true if the record has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Looks up an attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Item> {
        self.attrs.get(name)
    }

    /// Looks up an attribute, yielding `Missing` when absent.
    #[must_use]
    pub fn attr(&self, name: &str) -> Item {
        self.attrs.get(name).cloned().unwrap_or(Item::Missing)
    }

    /// Sets an attribute, preserving its position when it already exists.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Item>) {
        self.attrs.insert(name.into(), value.into());
    }

    /// Removes an attribute.
    pub fn remove(&mut self, name: &str) -> Option<Item> {
        self.attrs.shift_remove(name)
    }

    /// Iterates attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Item)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{schema}")?;
        }
        write!(f, "{{")?;
        for (i, (k, v)) in self.attrs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{k}: {v}")?;
        }
        write!(f, "}}")
    }
}
