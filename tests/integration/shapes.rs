//! The polymorphic-shapes scenario: a tagged union of geometric shapes
//! sharing a common base, dispatched by a type field.

use marzipan_foundation::{Item, Value};
use marzipan_schema::{
    dict_value_hint, handle, type_name_hint, Constant, Float, List, Object, OneOf, Str, Type,
};

fn point_type() -> Object {
    Object::new()
        .with_name("Point")
        .field("x", Float::new())
        .field("y", Float::new())
}

fn shape_types() -> OneOf {
    let base = Object::new().field("name", marzipan_schema::Optional::new(Str::new()));

    let circle = Object::new()
        .with_name("circle")
        .base(base)
        .field("type", Constant::new("circle"))
        .field("center", point_type())
        .field("radius", Float::new());

    let base = Object::new().field("name", marzipan_schema::Optional::new(Str::new()));
    let rectangle = Object::new()
        .with_name("rectangle")
        .base(base)
        .field("type", Constant::new("rectangle"))
        .field("left_top", point_type())
        .field("right_bottom", point_type());

    OneOf::tagged(
        [
            ("circle".to_owned(), handle(circle)),
            ("rectangle".to_owned(), handle(rectangle)),
        ],
        dict_value_hint("type"),
        type_name_hint(),
    )
}

fn circle_data() -> Value {
    Value::map([
        ("type", Value::from("circle")),
        ("name", Value::Null),
        (
            "center",
            Value::map([("x", Value::Float(5.0)), ("y", Value::Float(8.0))]),
        ),
        ("radius", Value::Float(4.0)),
    ])
}

#[test]
fn list_of_shapes_loads_concrete_variants() {
    let shapes = List::of(shape_types());
    let data = Value::seq([circle_data()]);
    let item = shapes.load(Some(&data), None).unwrap();
    let loaded = item.as_seq().unwrap();
    assert_eq!(loaded.len(), 1);

    let circle = loaded[0].as_record().unwrap();
    assert_eq!(circle.schema(), Some("circle"));
    assert_eq!(circle.attr("radius"), Item::Float(4.0));
    let center = circle.attr("center");
    let center = center.as_record().unwrap();
    assert_eq!(center.attr("x"), Item::Float(5.0));
    assert_eq!(center.attr("y"), Item::Float(8.0));
}

#[test]
fn shapes_round_trip_through_dump() {
    let shapes = List::of(shape_types());
    let data = Value::seq([circle_data()]);
    let item = shapes.load(Some(&data), None).unwrap();
    let dumped = shapes.dump(&item, None).unwrap().unwrap();
    // Dumping the loaded list reproduces the external form, tag included.
    assert_eq!(dumped, data);
    // And loading the dumped form yields the same internal list.
    assert_eq!(shapes.load(Some(&dumped), None).unwrap(), item);
}

#[test]
fn mixed_shape_lists_dispatch_per_element() {
    let shapes = List::of(shape_types());
    let data = Value::seq([
        circle_data(),
        Value::map([
            ("type", Value::from("rectangle")),
            ("name", Value::from("box")),
            (
                "left_top",
                Value::map([("x", Value::Float(0.0)), ("y", Value::Float(10.0))]),
            ),
            (
                "right_bottom",
                Value::map([("x", Value::Float(10.0)), ("y", Value::Float(0.0))]),
            ),
        ]),
    ]);
    let item = shapes.load(Some(&data), None).unwrap();
    let loaded = item.as_seq().unwrap();
    assert_eq!(loaded[0].as_record().unwrap().schema(), Some("circle"));
    assert_eq!(loaded[1].as_record().unwrap().schema(), Some("rectangle"));
}

#[test]
fn wrong_tag_inside_list_keeps_its_index() {
    let shapes = List::of(shape_types());
    let data = Value::seq([Value::map([("type", Value::from("hexagon"))])]);
    let tree = shapes.load(Some(&data), None).unwrap_err().into_tree();
    assert_eq!(
        tree.to_json(),
        serde_json::json!({"0": "Unknown value type hexagon"})
    );
}
