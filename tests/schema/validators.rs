//! Integration tests for validators and derived types.

use marzipan_foundation::{Context, ErrorTree, Item, Value};
use marzipan_schema::{
    email, validated_type, AnyOf, Int, Length, NoneOf, Predicate, Range, Regexp, Str, Type,
    Validate,
};

// =============================================================================
// Stock validators
// =============================================================================

#[test]
fn range_over_loaded_integers() {
    let ty = Int::new().with_validator(Range::between(0i64, 120i64));
    assert!(ty.load(Some(&Value::Int(38)), None).is_ok());
    assert_eq!(
        ty.load(Some(&Value::Int(-1)), None).unwrap_err().into_tree(),
        ErrorTree::leaf("Value should be at least 0 and at most 120")
    );
}

#[test]
fn length_over_loaded_strings() {
    let ty = Str::new().with_validator(Length::at_least(3));
    assert!(ty.load(Some(&Value::from("abc")), None).is_ok());
    assert_eq!(
        ty.load(Some(&Value::from("ab")), None).unwrap_err().into_tree(),
        ErrorTree::leaf("Length should be at least 3")
    );
}

#[test]
fn any_of_and_none_of() {
    let role = Str::new().with_validator(AnyOf::new(["admin", "customer"]));
    assert!(role.load(Some(&Value::from("admin")), None).is_ok());
    assert!(role.load(Some(&Value::from("guest")), None).is_err());

    let name = Str::new().with_validator(NoneOf::new(["root"]));
    assert!(name.load(Some(&Value::from("user")), None).is_ok());
    assert!(name.load(Some(&Value::from("root")), None).is_err());
}

#[test]
fn regexp_validator() {
    let ty = Str::new().with_validator(Regexp::new(r"^[a-z]+$").unwrap());
    assert!(ty.load(Some(&Value::from("lower")), None).is_ok());
    assert_eq!(
        ty.load(Some(&Value::from("UPPER")), None)
            .unwrap_err()
            .into_tree(),
        ErrorTree::leaf("String does not match expected pattern")
    );
}

#[test]
fn multiple_validator_failures_merge() {
    let ty = Str::new()
        .with_validator(Length::at_least(10))
        .with_validator(Regexp::new(r"^\d+$").unwrap());
    let tree = ty
        .load(Some(&Value::from("abc")), None)
        .unwrap_err()
        .into_tree();
    assert_eq!(
        tree,
        ErrorTree::List(vec![
            "Length should be at least 10".to_owned(),
            "String does not match expected pattern".to_owned(),
        ])
    );
}

#[test]
fn closure_validators_work_directly() {
    let ty = Int::new().with_validator(
        |item: &Item, _: Option<&Context>| -> Result<(), marzipan_foundation::ValidationError> {
            if item.as_int().is_some_and(|n| n % 2 == 0) {
                Ok(())
            } else {
                Err(marzipan_foundation::ValidationError::leaf("Should be even"))
            }
        },
    );
    assert!(ty.load(Some(&Value::Int(4)), None).is_ok());
    assert!(ty.load(Some(&Value::Int(5)), None).is_err());
}

#[test]
fn context_aware_predicate() {
    let max = Context::new(10i64);
    let validator = Predicate::with_context(|item, context| {
        let limit = context.and_then(Context::get::<i64>).copied().unwrap_or(i64::MAX);
        item.as_int().is_some_and(|n| n <= limit)
    });
    assert!(validator.check(&Item::Int(5), Some(&max)).is_ok());
    assert!(validator.check(&Item::Int(50), Some(&max)).is_err());
    // Without a context the prebaked fallback applies.
    assert!(validator.check(&Item::Int(50), None).is_ok());
}

// =============================================================================
// Derived types
// =============================================================================

#[test]
fn validated_type_prepends_and_keeps_structure() {
    let positive = validated_type(
        Int::new().with_validator(Range::at_most(1000i64)),
        Some("Positive"),
        Range::at_least(1i64),
    );
    assert_eq!(positive.name(), Some("Positive"));
    assert!(positive.load(Some(&Value::Int(5)), None).is_ok());
    // Both the prepended and the original validator apply.
    assert!(positive.load(Some(&Value::Int(0)), None).is_err());
    assert!(positive.load(Some(&Value::Int(2000)), None).is_err());
    // Structural errors still come first.
    assert_eq!(
        positive
            .load(Some(&Value::from("5")), None)
            .unwrap_err()
            .into_tree(),
        ErrorTree::leaf("Value should be integer")
    );
}

#[test]
fn email_is_a_validated_string() {
    let ty = email();
    assert!(ty.load(Some(&Value::from("john@doe.org")), None).is_ok());
    assert_eq!(
        ty.load(Some(&Value::from("john")), None)
            .unwrap_err()
            .into_tree(),
        ErrorTree::leaf("Invalid email")
    );
    assert_eq!(
        ty.load(Some(&Value::Int(5)), None).unwrap_err().into_tree(),
        ErrorTree::leaf("Value should be string")
    );
}
