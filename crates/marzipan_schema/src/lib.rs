//! Type combinators for marzipan: the schema algebra.
//!
//! This crate provides:
//! - [`Type`] / [`TypeHandle`] - The codec interface and its shared handle
//! - Scalar types ([`scalar`]) and containers ([`container`])
//! - Modifier wrappers ([`modifier`]): `Constant`, `Optional`, `LoadOnly`,
//!   `DumpOnly`, `Transform`
//! - [`Field`] - How object slots are read for dump and written on load
//! - [`Object`] - The record codec with inheritance and partial update
//! - [`OneOf`] - Polymorphic dispatch across alternatives
//! - [`TypeRegistry`] - Forward references for cyclic schemas
//! - Validators ([`validate`]) and the [`validated_type`] derivation helper

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Validation errors carry whole trees; passing them by value is the point.
#![allow(clippy::result_large_err)]
#![allow(clippy::missing_errors_doc)]

pub mod container;
pub mod core;
pub mod field;
pub mod modifier;
pub mod object;
pub mod one_of;
pub mod registry;
pub mod scalar;
pub mod validate;

pub use container::{Dict, List, Tuple};
pub use self::core::{handle, IntoHandle, Type, TypeHandle};
pub use field::{Access, Field, NameSource};
pub use modifier::{Constant, DumpOnly, LoadOnly, Optional, Transform};
pub use object::{Constructor, FieldKind, Object};
pub use one_of::{dict_value_hint, dict_value_hint_mapped, type_name_hint, OneOf};
pub use registry::{RegistryError, TypeRef, TypeRegistry};
pub use scalar::{Any, Bool, Date, DateTime, Float, Int, Str, Time};
pub use validate::{
    email, validated_type, AnyOf, Length, Messages, NoneOf, Predicate, Range, Regexp, Validate,
};
