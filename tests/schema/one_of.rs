//! Integration tests for polymorphic dispatch.

use marzipan_foundation::{ErrorTree, Item, Value};
use marzipan_schema::{
    dict_value_hint, dict_value_hint_mapped, handle, type_name_hint, Constant, Int, Object, OneOf,
    Str, Type,
};

fn vehicle_types() -> OneOf {
    let car = Object::new()
        .with_name("Car")
        .field("type", Constant::new("car"))
        .field("wheels", Int::new());
    let boat = Object::new()
        .with_name("Boat")
        .field("type", Constant::new("boat"))
        .field("sails", Int::new());
    OneOf::tagged(
        [
            ("car".to_owned(), handle(car)),
            ("boat".to_owned(), handle(boat)),
        ],
        dict_value_hint("type"),
        type_name_hint(),
    )
}

// =============================================================================
// Tagged form
// =============================================================================

#[test]
fn tagged_load_and_dump_round_trip() {
    let ty = vehicle_types();
    let data = Value::map([("type", Value::from("boat")), ("sails", Value::Int(2))]);
    let item = ty.load(Some(&data), None).unwrap();
    assert_eq!(item.as_record().unwrap().schema(), Some("Boat"));
    assert_eq!(ty.dump(&item, None).unwrap(), Some(data));
}

#[test]
fn tagged_unknown_tag_is_reported() {
    let ty = vehicle_types();
    let data = Value::map([("type", Value::from("plane"))]);
    assert_eq!(
        ty.load(Some(&data), None).unwrap_err().into_tree(),
        ErrorTree::leaf("Unknown value type plane")
    );
}

#[test]
fn tagged_variant_errors_keep_field_paths() {
    let ty = vehicle_types();
    let data = Value::map([("type", Value::from("car")), ("wheels", Value::from("four"))]);
    let tree = ty.load(Some(&data), None).unwrap_err().into_tree();
    assert_eq!(
        tree.get("wheels"),
        Some(&ErrorTree::leaf("Value should be integer"))
    );
}

#[test]
fn remapped_hint_translates_external_tags() {
    let car = Object::new()
        .with_name("Car")
        .field("type", Constant::new("c"))
        .field("wheels", Int::new());
    let ty = OneOf::tagged(
        [("Car".to_owned(), handle(car))],
        dict_value_hint_mapped("type", [("c", "Car")]),
        type_name_hint(),
    );
    let data = Value::map([("type", Value::from("c")), ("wheels", Value::Int(4))]);
    assert!(ty.load(Some(&data), None).is_ok());
}

// =============================================================================
// Ordered form
// =============================================================================

#[test]
fn ordered_first_success_wins_on_load() {
    let ty = OneOf::ordered(vec![handle(Int::new()), handle(Str::new())]);
    assert_eq!(ty.load(Some(&Value::Int(1)), None).unwrap(), Item::Int(1));
    assert_eq!(
        ty.load(Some(&Value::from("s")), None).unwrap(),
        Item::from("s")
    );
}

#[test]
fn ordered_failure_is_generic_by_design() {
    let ty = OneOf::ordered(vec![handle(Int::new()), handle(Str::new())]);
    assert_eq!(
        ty.load(Some(&Value::seq([1i64])), None)
            .unwrap_err()
            .into_tree(),
        ErrorTree::leaf("Invalid data")
    );
}

#[test]
fn ordered_dump_takes_first_accepting_branch() {
    // Both branches accept integers on dump; the first one wins.
    let ty = OneOf::ordered(vec![
        handle(marzipan_schema::Float::new()),
        handle(Int::new()),
    ]);
    assert_eq!(
        ty.dump(&Item::Int(3), None).unwrap(),
        Some(Value::Float(3.0))
    );
}
