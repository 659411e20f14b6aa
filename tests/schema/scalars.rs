//! Integration tests for scalar codecs.

use marzipan_foundation::{ErrorTree, Item, Value};
use marzipan_schema::{Any, Bool, Date, DateTime, Float, Int, Str, Time, Type};

fn load_tree(ty: &impl Type, data: &Value) -> ErrorTree {
    ty.load(Some(data), None).unwrap_err().into_tree()
}

// =============================================================================
// Acceptance and rejection tables
// =============================================================================

#[test]
fn str_table() {
    let ty = Str::new();
    assert!(ty.load(Some(&Value::from("hello")), None).is_ok());
    for bad in [
        Value::Int(1),
        Value::Float(1.5),
        Value::Bool(true),
        Value::seq(["a"]),
    ] {
        assert_eq!(load_tree(&ty, &bad), ErrorTree::leaf("Value should be string"));
    }
}

#[test]
fn int_table() {
    let ty = Int::new();
    assert!(ty.load(Some(&Value::Int(42)), None).is_ok());
    for bad in [Value::Float(42.0), Value::from("42"), Value::Bool(true)] {
        assert_eq!(
            load_tree(&ty, &bad),
            ErrorTree::leaf("Value should be integer")
        );
    }
}

#[test]
fn float_table() {
    let ty = Float::new();
    assert_eq!(
        ty.load(Some(&Value::Int(2)), None).unwrap(),
        Item::Float(2.0)
    );
    assert!(ty.load(Some(&Value::Float(2.5)), None).is_ok());
    for bad in [Value::from("2.5"), Value::Bool(false)] {
        assert_eq!(load_tree(&ty, &bad), ErrorTree::leaf("Value should be float"));
    }
}

#[test]
fn bool_table() {
    let ty = Bool::new();
    assert!(ty.load(Some(&Value::Bool(false)), None).is_ok());
    assert_eq!(
        load_tree(&ty, &Value::Int(0)),
        ErrorTree::leaf("Value should be boolean")
    );
}

#[test]
fn any_accepts_everything() {
    let ty = Any::new();
    for value in [
        Value::Null,
        Value::Bool(true),
        Value::Int(1),
        Value::from("x"),
        Value::seq([1i64]),
        Value::map([("k", 1i64)]),
    ] {
        assert!(ty.load(Some(&value), None).is_ok());
    }
}

// =============================================================================
// Required detection
// =============================================================================

#[test]
fn null_is_equivalent_to_absent_on_load() {
    let types: Vec<Box<dyn Type>> = vec![
        Box::new(Str::new()),
        Box::new(Int::new()),
        Box::new(Float::new()),
        Box::new(Bool::new()),
        Box::new(Date::new()),
    ];
    for ty in &types {
        assert_eq!(
            ty.load(None, None).unwrap_err().into_tree(),
            ErrorTree::leaf("Value is required")
        );
        assert_eq!(
            ty.load(Some(&Value::Null), None).unwrap_err().into_tree(),
            ErrorTree::leaf("Value is required")
        );
    }
}

#[test]
fn missing_is_required_error_on_dump() {
    assert_eq!(
        Str::new().dump(&Item::Missing, None).unwrap_err().into_tree(),
        ErrorTree::leaf("Value is required")
    );
}

// =============================================================================
// Date and time family
// =============================================================================

#[test]
fn date_time_family_round_trips() {
    let date = Date::new();
    let item = date.load(Some(&Value::from("1997-06-27")), None).unwrap();
    assert_eq!(
        date.dump(&item, None).unwrap(),
        Some(Value::from("1997-06-27"))
    );

    let time = Time::new();
    let item = time.load(Some(&Value::from("08:30:00")), None).unwrap();
    assert_eq!(time.dump(&item, None).unwrap(), Some(Value::from("08:30:00")));

    let datetime = DateTime::new();
    let item = datetime
        .load(Some(&Value::from("1997-06-27T08:30:00")), None)
        .unwrap();
    assert_eq!(
        datetime.dump(&item, None).unwrap(),
        Some(Value::from("1997-06-27T08:30:00"))
    );
}

#[test]
fn date_rejects_non_string_and_bad_format() {
    let ty = Date::new();
    assert_eq!(
        load_tree(&ty, &Value::Int(19970627)),
        ErrorTree::leaf("Value should be string")
    );
    assert_eq!(
        load_tree(&ty, &Value::from("06/27/1997")),
        ErrorTree::leaf("Value should match date format")
    );
}

// =============================================================================
// validate mirrors load
// =============================================================================

#[test]
fn validate_is_none_iff_load_succeeds() {
    let ty = Int::new();
    for value in [Value::Int(1), Value::from("x"), Value::Null] {
        let loaded = ty.load(Some(&value), None);
        let validated = ty.validate(Some(&value), None);
        assert_eq!(loaded.is_ok(), validated.is_none());
        if let Err(err) = loaded {
            assert_eq!(validated, Some(err.into_tree()));
        }
    }
}
