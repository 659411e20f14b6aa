//! Path-addressable validation errors and the accumulating builder.
//!
//! Errors form a tree: leaves carry human-readable messages, nested nodes
//! map path segments (field names or stringified indices) to subtrees. When
//! a node has both its own errors and per-field errors, the node's own
//! errors live under the [`SCHEMA_KEY`] segment.

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

/// Segment under which whole-object errors are stored when a node also has
/// per-field errors.
pub const SCHEMA_KEY: &str = "_schema";

/// A tree of validation error messages.
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorTree {
    /// A single message.
    Leaf(String),
    /// Several messages at the same position.
    List(Vec<String>),
    /// Messages nested under path segments.
    Nested(IndexMap<String, ErrorTree>),
}

impl ErrorTree {
    /// Creates a leaf from a message.
    pub fn leaf(message: impl Into<String>) -> Self {
        Self::Leaf(message.into())
    }

    /// Creates a nested tree with a single child.
    pub fn at(segment: impl Into<String>, child: ErrorTree) -> Self {
        let mut map = IndexMap::new();
        map.insert(segment.into(), child);
        Self::Nested(map)
    }

    /// Creates a nested tree from segment/child pairs.
    pub fn nested<I, K>(children: I) -> Self
    where
        I: IntoIterator<Item = (K, ErrorTree)>,
        K: Into<String>,
    {
        Self::Nested(children.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Looks up a child subtree by segment.
    #[must_use]
    pub fn get(&self, segment: &str) -> Option<&ErrorTree> {
        match self {
            Self::Nested(map) => map.get(segment),
            _ => None,
        }
    }

    /// Deeply merges two error trees.
    ///
    /// Leaves concatenate into lists; when a leaf/list meets a nested tree,
    /// the flat side moves under the nested tree's [`SCHEMA_KEY`] segment;
    /// nested trees merge key-wise.
    #[must_use]
    pub fn merge(self, other: ErrorTree) -> ErrorTree {
        match (self, other) {
            (Self::List(a), b) if a.is_empty() => b,
            (a, Self::List(b)) if b.is_empty() => a,
            (Self::Leaf(a), Self::Leaf(b)) => Self::List(vec![a, b]),
            (Self::Leaf(a), Self::List(mut b)) => {
                b.insert(0, a);
                Self::List(b)
            }
            (Self::List(mut a), Self::Leaf(b)) => {
                a.push(b);
                Self::List(a)
            }
            (Self::List(mut a), Self::List(b)) => {
                a.extend(b);
                Self::List(a)
            }
            (flat @ (Self::Leaf(_) | Self::List(_)), Self::Nested(map)) => {
                Self::Nested(merge_into_schema(map, flat, true))
            }
            (Self::Nested(map), flat @ (Self::Leaf(_) | Self::List(_))) => {
                Self::Nested(merge_into_schema(map, flat, false))
            }
            (Self::Nested(mut a), Self::Nested(b)) => {
                for (k, v) in b {
                    // Merge in place so existing keys keep their position.
                    if let Some(slot) = a.get_mut(&k) {
                        let existing = std::mem::replace(slot, Self::List(Vec::new()));
                        *slot = existing.merge(v);
                    } else {
                        a.insert(k, v);
                    }
                }
                Self::Nested(a)
            }
        }
    }

    /// Converts the tree into a `serde_json::Value` for UI piping.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Leaf(msg) => serde_json::Value::String(msg.clone()),
            Self::List(msgs) => serde_json::Value::Array(
                msgs.iter()
                    .map(|m| serde_json::Value::String(m.clone()))
                    .collect(),
            ),
            Self::Nested(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

/// Merges a flat (leaf/list) tree into a nested map's `_schema` slot.
/// `flat_first` controls merge order so message ordering stays stable.
fn merge_into_schema(
    mut map: IndexMap<String, ErrorTree>,
    flat: ErrorTree,
    flat_first: bool,
) -> IndexMap<String, ErrorTree> {
    let merged = match map.shift_remove(SCHEMA_KEY) {
        Some(existing) => {
            if flat_first {
                flat.merge(existing)
            } else {
                existing.merge(flat)
            }
        }
        None => flat,
    };
    map.insert(SCHEMA_KEY.to_owned(), merged);
    map
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(msg) => write!(f, "{msg:?}"),
            Self::List(msgs) => {
                write!(f, "[")?;
                for (i, msg) in msgs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{msg:?}")?;
                }
                write!(f, "]")
            }
            Self::Nested(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Failure report of `load` and `validate`.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("invalid data: {0}")]
pub struct ValidationError(pub ErrorTree);

impl ValidationError {
    /// Creates an error from a single message.
    pub fn leaf(message: impl Into<String>) -> Self {
        Self(ErrorTree::leaf(message))
    }

    /// Creates an error nested under a path segment.
    pub fn at(segment: impl Into<String>, child: ErrorTree) -> Self {
        Self(ErrorTree::at(segment, child))
    }

    /// Borrows the error tree.
    #[must_use]
    pub fn tree(&self) -> &ErrorTree {
        &self.0
    }

    /// Consumes the error, yielding its tree.
    #[must_use]
    pub fn into_tree(self) -> ErrorTree {
        self.0
    }
}

impl From<ErrorTree> for ValidationError {
    fn from(tree: ErrorTree) -> Self {
        Self(tree)
    }
}

/// Splits a path like `"items[3].name"` into segments `items`, `3`, `name`.
#[must_use]
pub fn parse_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    for ch in path.chars() {
        match ch {
            '.' | '[' => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
            ']' => {}
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Accumulates errors across many positions, then reports them all at once.
///
/// ```
/// use marzipan_foundation::error::ErrorBuilder;
///
/// let mut builder = ErrorBuilder::new();
/// builder.add_error("foo.bar", "Should be less than bam");
/// builder.add_error("items[3].name", "Value is required");
/// assert!(builder.finish().is_err());
/// ```
#[derive(Debug, Default)]
pub struct ErrorBuilder {
    errors: Option<ErrorTree>,
}

impl ErrorBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no errors have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_none()
    }

    /// Adds a message at a dotted/bracketed path.
    pub fn add_error(&mut self, path: &str, message: impl Into<String>) {
        let mut tree = ErrorTree::leaf(message);
        for segment in parse_path(path).into_iter().rev() {
            tree = ErrorTree::at(segment, tree);
        }
        self.add_errors(tree);
    }

    /// Merges a whole tree into the accumulated errors.
    pub fn add_errors(&mut self, tree: ErrorTree) {
        self.errors = Some(match self.errors.take() {
            Some(existing) => existing.merge(tree),
            None => tree,
        });
    }

    /// Merges a subtree under a single segment.
    pub fn add_nested(&mut self, segment: impl Into<String>, tree: ErrorTree) {
        self.add_errors(ErrorTree::at(segment, tree));
    }

    /// Succeeds when no errors were added; fails with the accumulated tree
    /// otherwise.
    pub fn finish(self) -> Result<(), ValidationError> {
        match self.errors {
            Some(tree) => Err(ValidationError(tree)),
            None => Ok(()),
        }
    }

    /// Consumes the builder, yielding the accumulated tree if any.
    #[must_use]
    pub fn into_errors(self) -> Option<ErrorTree> {
        self.errors
    }
}
