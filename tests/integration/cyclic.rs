//! The cyclic-schema scenario: Person and Book referencing each other
//! through the registry.

use marzipan_foundation::{Item, Value};
use marzipan_schema::{Int, List, Object, Str, Type, TypeRegistry};

/// Person has books (each without its author), Book has an author (without
/// their books).
fn register_person_and_book(registry: &TypeRegistry) {
    registry
        .add(
            "Person",
            Object::new()
                .with_name("Person")
                .field("name", Str::new())
                .field(
                    "books",
                    List::of(
                        Object::new()
                            .base(registry.get("Book"))
                            .exclude(["author"]),
                    ),
                ),
        )
        .unwrap();

    registry
        .add(
            "Book",
            Object::new()
                .with_name("Book")
                .field("title", Str::new())
                .field(
                    "author",
                    Object::new()
                        .base(registry.get("Person"))
                        .exclude(["books"]),
                ),
        )
        .unwrap();
}

#[test]
fn person_with_book_round_trips() {
    let registry = TypeRegistry::new();
    register_person_and_book(&registry);

    let person_type = registry.get("Person");
    let data = Value::map([
        ("name", Value::from("J. K. Rowling")),
        (
            "books",
            Value::seq([Value::map([("title", Value::from("Harry Potter"))])]),
        ),
    ]);

    let person = person_type.load(Some(&data), None).unwrap();
    let record = person.as_record().unwrap();
    assert_eq!(record.attr("name"), Item::from("J. K. Rowling"));
    let books = record.attr("books");
    let books = books.as_seq().unwrap();
    assert_eq!(
        books[0].as_record().unwrap().attr("title"),
        Item::from("Harry Potter")
    );

    assert_eq!(person_type.dump(&person, None).unwrap(), Some(data));
}

#[test]
fn book_side_of_the_cycle_works_too() {
    let registry = TypeRegistry::new();
    register_person_and_book(&registry);

    let book_type = registry.get("Book");
    let data = Value::map([
        ("title", Value::from("Harry Potter")),
        (
            "author",
            Value::map([("name", Value::from("J. K. Rowling"))]),
        ),
    ]);
    let book = book_type.load(Some(&data), None).unwrap();
    assert_eq!(book_type.dump(&book, None).unwrap(), Some(data));
}

#[test]
fn missing_half_of_cycle_fails_only_when_crossed() {
    let registry = TypeRegistry::new();
    // Only Person is registered; its books reference the absent Book type.
    registry
        .add(
            "Person",
            Object::new()
                .with_name("Person")
                .field("name", Str::new())
                .field(
                    "books",
                    List::of(
                        Object::new()
                            .base(registry.get("Book"))
                            .exclude(["author"]),
                    ),
                ),
        )
        .unwrap();

    let person_type = registry.get("Person");

    // Data that never exercises the books reference loads with a books
    // error only; the name field is untouched by the dangling reference.
    let data = Value::map([
        ("name", Value::from("someone")),
        ("books", Value::seq([Value::map([("title", Value::from("x"))])])),
    ]);
    let tree = person_type.load(Some(&data), None).unwrap_err().into_tree();
    assert!(tree.get("books").is_some());
    assert!(tree.get("name").is_none());

    // Completing the cycle afterwards makes the same schema work.
    registry
        .add("Book", Object::new().field("title", Str::new()))
        .unwrap();
    assert!(person_type.load(Some(&data), None).is_ok());
}

#[test]
fn registry_handles_self_reference() {
    let registry = TypeRegistry::new();
    registry
        .add(
            "Node",
            Object::new()
                .with_name("Node")
                .field("value", Int::new())
                .field(
                    "children",
                    List::of(registry.get("Node")),
                ),
        )
        .unwrap();

    let node_type = registry.get("Node");
    let data = Value::map([
        ("value", Value::Int(1)),
        (
            "children",
            Value::seq([Value::map([
                ("value", Value::Int(2)),
                ("children", Value::seq(Vec::<Value>::new())),
            ])]),
        ),
    ]);
    let node = node_type.load(Some(&data), None).unwrap();
    assert_eq!(node_type.dump(&node, None).unwrap(), Some(data));
}
