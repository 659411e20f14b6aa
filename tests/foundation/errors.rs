//! Integration tests for the error model.
//!
//! Tests error trees, deep merging, path parsing, and the accumulating
//! builder.

use marzipan_foundation::error::parse_path;
use marzipan_foundation::{ErrorBuilder, ErrorTree, ValidationError, SCHEMA_KEY};

// =============================================================================
// Error trees
// =============================================================================

#[test]
fn leaf_and_nested_shapes() {
    let tree = ErrorTree::at("items", ErrorTree::at("3", ErrorTree::leaf("bad")));
    assert_eq!(
        tree.get("items").and_then(|t| t.get("3")),
        Some(&ErrorTree::leaf("bad"))
    );
}

#[test]
fn merge_concatenates_same_position() {
    let merged = ErrorTree::leaf("a").merge(ErrorTree::leaf("b"));
    assert_eq!(merged, ErrorTree::List(vec!["a".into(), "b".into()]));
}

#[test]
fn merge_moves_flat_errors_under_schema_key() {
    let nested = ErrorTree::at("field", ErrorTree::leaf("field error"));
    let merged = nested.merge(ErrorTree::leaf("object error"));
    assert_eq!(
        merged.get(SCHEMA_KEY),
        Some(&ErrorTree::leaf("object error"))
    );
    assert_eq!(merged.get("field"), Some(&ErrorTree::leaf("field error")));
}

#[test]
fn merge_is_recursive() {
    let a = ErrorTree::at("foo", ErrorTree::at("bar", ErrorTree::leaf("e1")));
    let b = ErrorTree::at("foo", ErrorTree::at("baz", ErrorTree::leaf("e2")));
    let merged = a.merge(b);
    let foo = merged.get("foo").unwrap();
    assert!(foo.get("bar").is_some());
    assert!(foo.get("baz").is_some());
}

#[test]
fn tree_to_json_matches_contract() {
    let tree = ErrorTree::nested([
        ("age", ErrorTree::leaf("Value is required")),
        (
            "tags",
            ErrorTree::at("0", ErrorTree::List(vec!["e1".into(), "e2".into()])),
        ),
    ]);
    assert_eq!(
        tree.to_json(),
        serde_json::json!({
            "age": "Value is required",
            "tags": {"0": ["e1", "e2"]},
        })
    );
}

// =============================================================================
// Path parsing
// =============================================================================

#[test]
fn paths_split_on_dots_and_brackets() {
    assert_eq!(parse_path("foo"), vec!["foo"]);
    assert_eq!(parse_path("foo.bar"), vec!["foo", "bar"]);
    assert_eq!(parse_path("items[3].name"), vec!["items", "3", "name"]);
}

// =============================================================================
// Builder
// =============================================================================

#[test]
fn builder_accumulates_and_merges() {
    let mut builder = ErrorBuilder::new();
    builder.add_error("foo.bar", "Should be less than bam");
    builder.add_error("foo.quux", "Should be less than bam");
    builder.add_error("items[0].name", "Value is required");
    let err = builder.finish().unwrap_err();
    let tree = err.into_tree();
    let foo = tree.get("foo").unwrap();
    assert!(foo.get("bar").is_some());
    assert!(foo.get("quux").is_some());
    assert_eq!(
        tree.get("items").and_then(|t| t.get("0")).and_then(|t| t.get("name")),
        Some(&ErrorTree::leaf("Value is required"))
    );
}

#[test]
fn builder_without_errors_is_silent() {
    assert!(ErrorBuilder::new().finish().is_ok());
}

#[test]
fn validation_error_displays_its_tree() {
    let err = ValidationError::at("age", ErrorTree::leaf("Value is required"));
    let text = err.to_string();
    assert!(text.contains("age"));
    assert!(text.contains("Value is required"));
}

#[test]
fn error_propagates_with_question_mark() {
    fn inner() -> Result<(), ValidationError> {
        Err(ValidationError::leaf("boom"))
    }

    fn outer() -> Result<(), ValidationError> {
        inner()?;
        Ok(())
    }

    assert!(outer().is_err());
}
