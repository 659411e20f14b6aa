//! Marzipan - bidirectional serialization and validation kernel
//!
//! This crate re-exports all layers of the marzipan system for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: marzipan_schema     — types, fields, objects, dispatch, registry
//! Layer 0: marzipan_foundation — value universes, error model, context
//! ```

pub use marzipan_foundation as foundation;
pub use marzipan_schema as schema;
