//! Value universes, error model, and context plumbing for marzipan.
//!
//! This crate provides:
//! - [`Value`] - The external, JSON-like tree universe
//! - [`Item`] - The internal application-value universe, including the
//!   [`Item::Missing`] sentinel and [`Record`] objects
//! - [`ValidationError`] / [`ErrorTree`] / [`ErrorBuilder`] - Structured,
//!   path-addressable validation errors
//! - [`Context`] - The opaque value threaded through every operation
//! - serde_json conversions for the external universe

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod context;
pub mod error;
pub mod item;
pub mod json;
pub mod value;

// Re-export primary types at crate root for convenience
pub use context::Context;
pub use error::{ErrorBuilder, ErrorTree, ValidationError, SCHEMA_KEY};
pub use item::{Item, Record};
pub use value::Value;
