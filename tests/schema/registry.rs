//! Integration tests for the type registry and its proxies.

use marzipan_foundation::{ErrorTree, Value};
use marzipan_schema::{Int, List, Object, RegistryError, Str, Type, TypeRegistry};

#[test]
fn proxy_resolves_after_registration() {
    let registry = TypeRegistry::new();
    let proxy = registry.get("Num");
    registry.add("Num", Int::new()).unwrap();
    assert!(proxy.load(Some(&Value::Int(1)), None).is_ok());
}

#[test]
fn exercising_unregistered_reference_fails_lazily() {
    let registry = TypeRegistry::new();
    // Building a schema against the proxy is fine...
    let ty = List::of(registry.get("Num"));
    // ...only the first operation that crosses the reference fails.
    let tree = ty
        .load(Some(&Value::seq([1i64])), None)
        .unwrap_err()
        .into_tree();
    assert_eq!(
        tree.get("0"),
        Some(&ErrorTree::leaf("Type \"Num\" is not registered"))
    );
    // Registering afterwards heals the same schema.
    registry.add("Num", Int::new()).unwrap();
    assert!(ty.load(Some(&Value::seq([1i64])), None).is_ok());
}

#[test]
fn duplicate_registration_is_an_error() {
    let registry = TypeRegistry::new();
    registry.add("T", Int::new()).unwrap();
    assert!(matches!(
        registry.add("T", Str::new()),
        Err(RegistryError::Duplicate(_))
    ));
}

#[test]
fn proxy_works_as_object_base() {
    let registry = TypeRegistry::new();
    registry
        .add(
            "Entity",
            Object::new().field("id", Int::new()).field("tag", Str::new()),
        )
        .unwrap();
    let ty = Object::new()
        .base(registry.get("Entity"))
        .exclude(["tag"])
        .field("name", Str::new());
    assert_eq!(ty.field_names().unwrap(), vec!["id", "name"]);
}

#[test]
fn registered_handle_is_usable_directly() {
    let registry = TypeRegistry::new();
    let handle = registry.add("Num", Int::new()).unwrap();
    assert!(handle.load(Some(&Value::Int(1)), None).is_ok());
}
