//! Integration tests for modifier types.

use marzipan_foundation::{ErrorTree, Item, Value};
use marzipan_schema::{
    AnyOf, Constant, DumpOnly, LoadOnly, Object, Optional, Str, Transform, Type,
};

// =============================================================================
// Constant
// =============================================================================

#[test]
fn constant_checks_load_and_stamps_dump() {
    let ty = Constant::new("v1");
    assert_eq!(ty.load(Some(&Value::from("v1")), None).unwrap(), Item::Missing);
    assert_eq!(
        ty.load(Some(&Value::from("v2")), None)
            .unwrap_err()
            .into_tree(),
        ErrorTree::leaf("Value should be \"v1\"")
    );
    assert_eq!(ty.dump(&Item::Missing, None).unwrap(), Some(Value::from("v1")));
}

#[test]
fn constant_accepts_non_string_literals() {
    let ty = Constant::new(Value::Int(3));
    assert!(ty.load(Some(&Value::Int(3)), None).is_ok());
    assert!(ty.load(Some(&Value::Int(4)), None).is_err());
}

// =============================================================================
// Optional
// =============================================================================

#[test]
fn optional_fills_defaults_per_side() {
    let ty = Optional::new(Str::new())
        .load_default("fallback")
        .dump_default("unset");
    assert_eq!(ty.load(None, None).unwrap(), Item::from("fallback"));
    assert_eq!(
        ty.dump(&Item::Missing, None).unwrap(),
        Some(Value::from("unset"))
    );
}

#[test]
fn optional_delegates_when_present() {
    let ty = Optional::new(Str::new().with_validator(AnyOf::new(["admin", "customer"])));
    assert!(ty.load(Some(&Value::from("admin")), None).is_ok());
    assert_eq!(
        ty.load(Some(&Value::from("guest")), None)
            .unwrap_err()
            .into_tree(),
        ErrorTree::leaf("Invalid choice")
    );
}

#[test]
fn optional_defaults_to_null() {
    let ty = Optional::new(Str::new());
    assert_eq!(ty.load(None, None).unwrap(), Item::Null);
    assert_eq!(ty.dump(&Item::Missing, None).unwrap(), Some(Value::Null));
}

// =============================================================================
// LoadOnly / DumpOnly
// =============================================================================

#[test]
fn load_only_field_never_dumped() {
    let ty = Object::new()
        .field("email", Str::new())
        .field("password", LoadOnly::new(Str::new()));
    let data = Value::map([
        ("email", Value::from("a@b")),
        ("password", Value::from("hunter2")),
    ]);
    let item = ty.load(Some(&data), None).unwrap();
    // The password loads...
    assert_eq!(
        item.as_record().unwrap().attr("password"),
        Item::from("hunter2")
    );
    // ...but never appears in output.
    let dumped = ty.dump(&item, None).unwrap().unwrap();
    assert!(!dumped.as_map().unwrap().contains_key("password"));
}

#[test]
fn dump_only_field_never_loaded_and_never_errors() {
    let ty = Object::new()
        .field("email", Str::new())
        .field("created_at", DumpOnly::new(Str::new()));
    // A nonsense value under a dump-only field contributes no error.
    let data = Value::map([
        ("email", Value::from("a@b")),
        ("created_at", Value::Int(12345)),
    ]);
    let item = ty.load(Some(&data), None).unwrap();
    assert_eq!(item.as_record().unwrap().get("created_at"), None);
}

// =============================================================================
// Transform
// =============================================================================

#[test]
fn transform_retrofits_coercions() {
    // Wire format spells booleans "yes"/"no".
    let ty = Transform::new(marzipan_schema::Bool::new())
        .pre_load(|value, _| match value.as_str() {
            Some("yes") => Value::Bool(true),
            Some("no") => Value::Bool(false),
            _ => value.clone(),
        })
        .post_dump(|value, _| match value.as_bool() {
            Some(true) => Value::from("yes"),
            Some(false) => Value::from("no"),
            None => value.clone(),
        });
    assert_eq!(
        ty.load(Some(&Value::from("yes")), None).unwrap(),
        Item::Bool(true)
    );
    assert_eq!(
        ty.dump(&Item::Bool(false), None).unwrap(),
        Some(Value::from("no"))
    );
}

// =============================================================================
// Metadata forwarding
// =============================================================================

#[test]
fn wrappers_keep_inner_diagnostics() {
    let inner = Str::new().with_name("Password").with_description("secret");
    let wrapped = LoadOnly::new(inner);
    assert_eq!(wrapped.name(), Some("Password"));
    assert_eq!(wrapped.description(), Some("secret"));
}
