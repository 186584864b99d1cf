use super::*;

fn shape_of(interner: &TypeInterner, id: TypeId) -> ArrayShape {
    match interner.lookup(id) {
        Some(TypeData::Array(shape_id)) => ArrayShape::clone(&interner.array_shape(shape_id)),
        other => panic!("expected an array, got {other:?}"),
    }
}

#[test]
fn test_union_normalization() {
    let interner = TypeInterner::new();

    assert_eq!(interner.union(vec![]), TypeId::NEVER);
    assert_eq!(interner.union(vec![TypeId::STRING]), TypeId::STRING);
    assert_eq!(
        interner.union(vec![TypeId::STRING, TypeId::MIXED]),
        TypeId::MIXED
    );
    assert_eq!(
        interner.union(vec![TypeId::STRING, TypeId::NEVER]),
        TypeId::STRING
    );
    assert_eq!(
        interner.union(vec![TypeId::INT, TypeId::INT]),
        TypeId::INT
    );
}

#[test]
fn test_union_flattens_and_keeps_first_occurrence_order() {
    let interner = TypeInterner::new();

    let inner = interner.union(vec![TypeId::INT, TypeId::STRING]);
    let outer = interner.union(vec![TypeId::NULL, inner, TypeId::INT]);
    match interner.lookup(outer) {
        Some(TypeData::Union(list)) => {
            assert_eq!(
                &*interner.type_list(list),
                &[TypeId::NULL, TypeId::INT, TypeId::STRING]
            );
        }
        other => panic!("expected a union, got {other:?}"),
    }
}

#[test]
fn test_intersection_normalization() {
    let interner = TypeInterner::new();

    assert_eq!(interner.intersection(vec![]), TypeId::NEVER);
    assert_eq!(interner.intersection(vec![TypeId::MIXED]), TypeId::MIXED);
    assert_eq!(
        interner.intersection(vec![TypeId::CALLABLE, TypeId::MIXED]),
        TypeId::CALLABLE
    );
    assert_eq!(
        interner.intersection(vec![TypeId::CALLABLE, TypeId::NEVER]),
        TypeId::NEVER
    );

    let nested = interner.intersection(vec![TypeId::CALLABLE, TypeId::STRING]);
    let flat = interner.intersection(vec![nested, TypeId::STRING]);
    assert_eq!(flat, nested);
}

#[test]
#[should_panic(expected = "union requires at least two members")]
fn test_union_raw_rejects_single_member() {
    let interner = TypeInterner::new();
    interner.union_raw(&[TypeId::INT]);
}

#[test]
#[should_panic(expected = "intersection requires at least two members")]
fn test_intersection_raw_rejects_empty() {
    let interner = TypeInterner::new();
    interner.intersection_raw(&[]);
}

#[test]
fn test_nullable_is_union_with_null() {
    let interner = TypeInterner::new();
    assert_eq!(
        interner.nullable(TypeId::INT),
        interner.union(vec![TypeId::NULL, TypeId::INT])
    );
    assert_eq!(interner.nullable(TypeId::NULL), TypeId::NULL);
}

#[test]
fn test_literal_values() {
    let interner = TypeInterner::new();

    assert_eq!(interner.literal_value(true), TypeId::TRUE);
    assert_eq!(interner.literal_value(false), TypeId::FALSE);
    assert_eq!(interner.literal_value(5i64), interner.literal_int(5));
    assert_eq!(interner.literal_value("a"), interner.literal_string("a"));
    assert_eq!(interner.literal_value(-0.0), interner.literal_float(0.0));
    assert_ne!(interner.literal_int(1), interner.literal_float(1.0));
    assert_ne!(interner.literal_int(1), interner.literal_string("1"));
}

#[test]
fn test_int_range_normalization() {
    let interner = TypeInterner::new();

    assert_eq!(interner.int_range(None, None), TypeId::INT);
    assert_eq!(interner.int_range(Some(5), Some(5)), interner.literal_int(5));
    assert_eq!(interner.int_range(Some(6), Some(5)), TypeId::NEVER);
    assert_eq!(
        interner.lookup(interner.int_range(Some(0), None)),
        Some(TypeData::IntRange {
            min: Some(0),
            max: None
        })
    );
}

#[test]
fn test_class_string_defaults_to_atom() {
    let interner = TypeInterner::new();
    let foo = interner.named_object("Foo", vec![]);

    assert_eq!(interner.class_string(None), TypeId::CLASS_STRING);
    assert_eq!(interner.class_string(Some(TypeId::OBJECT)), TypeId::CLASS_STRING);
    assert_eq!(
        interner.lookup(interner.class_string(Some(foo))),
        Some(TypeData::ClassString(foo))
    );
}

#[test]
fn test_default_array_is_reserved() {
    let interner = TypeInterner::new();

    assert_eq!(interner.array(TypeId::ARRAY_KEY, TypeId::MIXED), TypeId::ARRAY);
    assert_eq!(
        interner.array_from_shape(ArrayShape::default_array()),
        TypeId::ARRAY
    );
    assert_eq!(interner.iterable(TypeId::MIXED, TypeId::MIXED), TypeId::ITERABLE);
    assert_eq!(interner.callable(vec![], TypeId::MIXED), TypeId::CALLABLE);
    assert_eq!(interner.closure(vec![], TypeId::MIXED), TypeId::CLOSURE);
    assert_ne!(interner.closure(vec![], TypeId::VOID), TypeId::CLOSURE);
}

#[test]
fn test_list_and_non_empty_list() {
    let interner = TypeInterner::new();

    let list = shape_of(&interner, interner.list(TypeId::INT));
    assert!(list.list && !list.non_empty && !list.sealed);
    assert_eq!(list.key, TypeId::INT);

    let non_empty = interner.non_empty_list(TypeId::INT);
    assert!(shape_of(&interner, non_empty).non_empty);
    assert_eq!(interner.non_empty(interner.list(TypeId::INT)), non_empty);
    // Idempotent.
    assert_eq!(interner.non_empty(non_empty), non_empty);
}

#[test]
fn test_non_empty_on_other_types() {
    let interner = TypeInterner::new();

    assert_eq!(interner.non_empty(TypeId::STRING), TypeId::NON_EMPTY_STRING);
    assert_eq!(interner.non_empty(TypeId::INT), TypeId::INT);
    assert_eq!(
        interner.non_empty(TypeId::ARRAY),
        interner.non_empty_array(TypeId::ARRAY_KEY, TypeId::MIXED)
    );

    let nullable_list = interner.nullable(interner.list(TypeId::INT));
    assert_eq!(
        interner.non_empty(nullable_list),
        interner.nullable(interner.non_empty_list(TypeId::INT))
    );
}

#[test]
fn test_array_shape_assigns_sequential_keys() {
    let interner = TypeInterner::new();
    let name = interner.array_key("name");

    let id = interner.array_shape_type(vec![
        ShapeField::positional(TypeId::INT),
        ShapeField::keyed(name, TypeId::STRING),
        ShapeField::positional(TypeId::FLOAT),
        ShapeField::keyed(ArrayKey::Int(7), TypeId::BOOL),
        ShapeField::positional(TypeId::NULL).optional(),
    ]);
    let shape = shape_of(&interner, id);

    let keys: Vec<ArrayKey> = shape.elements.iter().map(|e| e.key).collect();
    assert_eq!(
        keys,
        vec![
            ArrayKey::Int(0),
            name,
            ArrayKey::Int(1),
            ArrayKey::Int(7),
            ArrayKey::Int(8)
        ]
    );
    assert!(shape.sealed);
    assert_eq!(shape.key, TypeId::NEVER);
    assert_eq!(shape.value, TypeId::NEVER);
    assert!(shape.elements[4].optional);
}

#[test]
fn test_array_shape_duplicate_key_keeps_position() {
    let interner = TypeInterner::new();

    let id = interner.array_shape_type(vec![
        ShapeField::keyed(ArrayKey::Int(0), TypeId::INT),
        ShapeField::keyed(ArrayKey::Int(1), TypeId::INT),
        ShapeField::keyed(ArrayKey::Int(0), TypeId::STRING),
    ]);
    let shape = shape_of(&interner, id);
    assert_eq!(shape.elements.len(), 2);
    assert_eq!(shape.elements[0].key, ArrayKey::Int(0));
    assert_eq!(shape.elements[0].type_id, TypeId::STRING);
}

#[test]
fn test_array_key_normalizes_integer_strings() {
    let interner = TypeInterner::new();

    assert_eq!(interner.array_key("12"), ArrayKey::Int(12));
    assert_eq!(interner.array_key("-3"), ArrayKey::Int(-3));
    assert!(matches!(interner.array_key("012"), ArrayKey::String(_)));
    assert!(matches!(interner.array_key("-0"), ArrayKey::String(_)));
    assert!(matches!(interner.array_key("1.0"), ArrayKey::String(_)));
    assert!(matches!(interner.array_key(""), ArrayKey::String(_)));
    assert_eq!(parse_int_key("9223372036854775807"), Some(i64::MAX));
    assert_eq!(parse_int_key("9223372036854775808"), None);
}

#[test]
fn test_sealed_shapes_with_same_elements_are_equal() {
    let interner = TypeInterner::new();

    let a = interner.array_shape_type(vec![ShapeField::positional(TypeId::INT)]);
    let b = interner.array_shape_type(vec![ShapeField::keyed(ArrayKey::Int(0), TypeId::INT)]);
    assert_eq!(a, b);
    assert_ne!(a, interner.list_shape(vec![ShapeField::positional(TypeId::INT)]));
}

#[test]
fn test_list_shape_with_non_sequential_keys_is_an_array_shape() {
    let interner = TypeInterner::new();
    let fields = || {
        vec![
            ShapeField::keyed(interner.array_key("name"), TypeId::INT),
            ShapeField::keyed(ArrayKey::Int(7), TypeId::INT),
        ]
    };

    let list = interner.list_shape(fields());
    assert_eq!(list, interner.array_shape_type(fields()));
    let Some(TypeData::Array(id)) = interner.lookup(list) else {
        panic!("expected an array");
    };
    assert!(!interner.array_shape(id).list);

    let gap = interner.list_shape_unsealed(
        vec![ShapeField::keyed(ArrayKey::Int(1), TypeId::INT)],
        TypeId::STRING,
    );
    let Some(TypeData::Array(id)) = interner.lookup(gap) else {
        panic!("expected an array");
    };
    assert!(!interner.array_shape(id).list);

    let sequential = interner.list_shape(vec![
        ShapeField::keyed(ArrayKey::Int(1), TypeId::STRING),
        ShapeField::keyed(ArrayKey::Int(0), TypeId::INT),
    ]);
    let Some(TypeData::Array(id)) = interner.lookup(sequential) else {
        panic!("expected an array");
    };
    assert!(interner.array_shape(id).list);
}

#[test]
fn test_object_shape_is_unordered() {
    let interner = TypeInterner::new();
    let name = interner.intern_string("name");
    let age = interner.intern_string("age");
    let prop = |name, type_id| ObjectProperty {
        name,
        type_id,
        optional: false,
    };

    let a = interner.object_shape_type(vec![prop(name, TypeId::STRING), prop(age, TypeId::INT)]);
    let b = interner.object_shape_type(vec![prop(age, TypeId::INT), prop(name, TypeId::STRING)]);
    assert_eq!(a, b);

    let duplicate = interner.object_shape_type(vec![
        prop(name, TypeId::INT),
        prop(age, TypeId::INT),
        prop(name, TypeId::STRING),
    ]);
    assert_eq!(duplicate, a);
}

#[test]
fn test_template_and_conditional_constructors() {
    let interner = TypeInterner::new();

    let t = interner.class_template("T", "Box");
    match interner.lookup(t) {
        Some(TypeData::Template(info)) => {
            assert_eq!(interner.resolve_atom(info.name), "T");
            assert_eq!(
                info.anchor,
                TemplateAnchor::AtClass(interner.intern_string("Box"))
            );
        }
        other => panic!("expected a template, got {other:?}"),
    }

    let cond = interner.conditional(
        ConditionalSubject::Type(t),
        TypeId::INT,
        TypeId::STRING,
        TypeId::FLOAT,
    );
    assert_eq!(
        cond,
        interner.conditional(
            ConditionalSubject::Type(t),
            TypeId::INT,
            TypeId::STRING,
            TypeId::FLOAT,
        )
    );
}

#[test]
fn test_int_mask_of_members() {
    let interner = TypeInterner::new();
    let one = interner.literal_int(1);
    let two = interner.literal_int(2);

    let mask = interner.int_mask_of(vec![one, two]);
    assert_eq!(
        interner.lookup(mask),
        Some(TypeData::IntMask(interner.union(vec![one, two])))
    );
}
