use super::*;
use crate::type_factory::ShapeField;

fn fmt(interner: &TypeInterner, type_id: TypeId) -> String {
    stringify(interner, type_id)
}

#[test]
fn test_atoms_use_phpdoc_names() {
    let interner = TypeInterner::new();

    assert_eq!(fmt(&interner, TypeId::INT), "int");
    assert_eq!(fmt(&interner, TypeId::ARRAY_KEY), "array-key");
    assert_eq!(fmt(&interner, TypeId::NON_EMPTY_STRING), "non-empty-string");
    assert_eq!(fmt(&interner, TypeId::CLASS_STRING), "class-string");
    assert_eq!(fmt(&interner, TypeId::ARRAY), "array");
    assert_eq!(fmt(&interner, TypeId::ITERABLE), "iterable");
    assert_eq!(fmt(&interner, TypeId::CALLABLE), "callable");
    assert_eq!(fmt(&interner, TypeId::CLOSURE), "Closure");
}

#[test]
fn test_literals() {
    let interner = TypeInterner::new();

    assert_eq!(fmt(&interner, interner.literal_int(-3)), "-3");
    assert_eq!(fmt(&interner, interner.literal_float(1.5)), "1.5");
    assert_eq!(fmt(&interner, interner.literal_float(2.0)), "2.0");
    assert_eq!(fmt(&interner, interner.literal_string("abc")), "'abc'");
    assert_eq!(fmt(&interner, interner.literal_string("it's")), r"'it\'s'");
}

#[test]
fn test_int_ranges_and_masks() {
    let interner = TypeInterner::new();
    let foo = interner.named_object("Foo", vec![]);

    assert_eq!(fmt(&interner, interner.int_range(Some(-9), None)), "int<-9, max>");
    assert_eq!(fmt(&interner, interner.int_range(None, Some(5))), "int<min, 5>");
    assert_eq!(
        fmt(
            &interner,
            interner.int_mask_of(vec![interner.literal_int(1), interner.literal_int(2)])
        ),
        "int-mask<1, 2>"
    );
    assert_eq!(
        fmt(&interner, interner.int_mask_of(vec![interner.literal_int(4)])),
        "int-mask<4>"
    );
    assert_eq!(
        fmt(&interner, interner.int_mask(interner.class_constant(foo, "FLAGS"))),
        "int-mask-of<Foo::FLAGS>"
    );
    assert_eq!(
        fmt(&interner, interner.class_string(Some(foo))),
        "class-string<Foo>"
    );
}

#[test]
fn test_generic_arrays() {
    let interner = TypeInterner::new();

    assert_eq!(
        fmt(&interner, interner.array(TypeId::INT, TypeId::STRING)),
        "array<int, string>"
    );
    assert_eq!(
        fmt(&interner, interner.non_empty_array(TypeId::ARRAY_KEY, TypeId::MIXED)),
        "non-empty-array<array-key, mixed>"
    );
    assert_eq!(fmt(&interner, interner.list(TypeId::INT)), "list<int>");
    assert_eq!(
        fmt(&interner, interner.non_empty_list(TypeId::INT)),
        "non-empty-list<int>"
    );
    assert_eq!(
        fmt(&interner, interner.iterable(TypeId::INT, TypeId::STRING)),
        "iterable<int, string>"
    );
}

#[test]
fn test_array_shapes() {
    let interner = TypeInterner::new();
    let name = interner.array_key("name");
    let spaced = interner.array_key("first name");

    assert_eq!(
        fmt(
            &interner,
            interner.array_shape_type(vec![
                ShapeField::positional(interner.literal_string("b")),
                ShapeField::positional(TypeId::INT).optional(),
            ])
        ),
        "array{0: 'b', 1?: int}"
    );
    assert_eq!(
        fmt(
            &interner,
            interner.array_shape_type(vec![
                ShapeField::keyed(name, TypeId::STRING),
                ShapeField::keyed(spaced, TypeId::INT),
            ])
        ),
        "array{name: string, 'first name': int}"
    );
    assert_eq!(fmt(&interner, interner.array_shape_type(vec![])), "array{}");
}

#[test]
fn test_unsealed_shapes() {
    let interner = TypeInterner::new();
    let a = interner.array_key("a");
    let fields = || vec![ShapeField::keyed(a, TypeId::INT)];

    assert_eq!(
        fmt(
            &interner,
            interner.array_shape_unsealed(fields(), TypeId::ARRAY_KEY, TypeId::MIXED)
        ),
        "array{a: int, ...}"
    );
    assert_eq!(
        fmt(
            &interner,
            interner.array_shape_unsealed(fields(), TypeId::STRING, TypeId::INT)
        ),
        "array{a: int, ...<string, int>}"
    );
    assert_eq!(
        fmt(
            &interner,
            interner.list_shape_unsealed(vec![ShapeField::positional(TypeId::INT)], TypeId::STRING)
        ),
        "list{0: int, ...<string>}"
    );
    assert_eq!(
        fmt(
            &interner,
            interner.non_empty(interner.array_shape_unsealed(
                fields(),
                TypeId::ARRAY_KEY,
                TypeId::MIXED
            ))
        ),
        "non-empty-array{a: int, ...}"
    );
}

#[test]
fn test_objects_and_late_bound_references() {
    let interner = TypeInterner::new();
    let foo = interner.intern_string("Foo");

    assert_eq!(
        fmt(&interner, interner.named_object("Foo", vec![TypeId::INT])),
        "Foo<int>"
    );
    assert_eq!(fmt(&interner, interner.static_type(foo, vec![])), "static<Foo>");
    assert_eq!(fmt(&interner, interner.self_type(vec![])), "self");
    assert_eq!(
        fmt(&interner, interner.parent_type(vec![TypeId::INT])),
        "parent<int>"
    );

    let shape = interner.object_shape_type(vec![
        ObjectProperty {
            name: interner.intern_string("a"),
            type_id: TypeId::INT,
            optional: false,
        },
        ObjectProperty {
            name: interner.intern_string("b"),
            type_id: TypeId::STRING,
            optional: true,
        },
    ]);
    assert_eq!(fmt(&interner, shape), "object{a: int, b?: string}");
}

#[test]
fn test_signatures() {
    let interner = TypeInterner::new();

    assert_eq!(
        fmt(
            &interner,
            interner.closure(
                vec![Param::new(TypeId::INT), Param::new(TypeId::STRING).with_default()],
                TypeId::VOID
            )
        ),
        "Closure(int, string=): void"
    );
    assert_eq!(
        fmt(
            &interner,
            interner.callable(
                vec![Param::new(TypeId::INT).by_reference().variadic()],
                TypeId::MIXED
            )
        ),
        "callable(int&...): mixed"
    );
    assert_eq!(
        fmt(&interner, interner.callable(vec![], TypeId::VOID)),
        "callable(): void"
    );
}

#[test]
fn test_symbolic_types() {
    let interner = TypeInterner::new();
    let foo = interner.named_object("Foo", vec![]);
    let map = interner.class_constant(foo, "MAP");

    assert_eq!(fmt(&interner, interner.constant("PHP_EOL")), "PHP_EOL");
    assert_eq!(fmt(&interner, map), "Foo::MAP");
    assert_eq!(fmt(&interner, interner.key_of(map)), "key-of<Foo::MAP>");
    assert_eq!(fmt(&interner, interner.value_of(map)), "value-of<Foo::MAP>");
}

#[test]
fn test_templates_show_their_anchor() {
    let interner = TypeInterner::new();
    let t = interner.intern_string("T");
    let foo = interner.intern_string("Foo");

    assert_eq!(fmt(&interner, interner.class_template("T", "Foo")), "T@Foo");
    assert_eq!(
        fmt(
            &interner,
            interner.template(
                t,
                TemplateAnchor::AtMethod {
                    class: foo,
                    method: interner.intern_string("bar"),
                },
                vec![],
            )
        ),
        "T@Foo::bar"
    );
    assert_eq!(
        fmt(
            &interner,
            interner.template(
                t,
                TemplateAnchor::AtFunction(interner.intern_string("map")),
                vec![TypeId::INT],
            )
        ),
        "T@map<int>"
    );
}

#[test]
fn test_conditionals() {
    let interner = TypeInterner::new();
    let by_argument = interner.conditional(
        ConditionalSubject::Argument(interner.intern_string("x")),
        TypeId::INT,
        TypeId::STRING,
        TypeId::FLOAT,
    );
    let by_type = interner.conditional(
        ConditionalSubject::Type(interner.class_template("T", "Foo")),
        TypeId::NULL,
        TypeId::NEVER,
        TypeId::INT,
    );

    assert_eq!(fmt(&interner, by_argument), "($x is int ? string : float)");
    assert_eq!(fmt(&interner, by_type), "(T@Foo is null ? never : int)");
}

#[test]
fn test_unions_and_intersections() {
    let interner = TypeInterner::new();
    let a = interner.named_object("A", vec![]);
    let b = interner.named_object("B", vec![]);
    let c = interner.named_object("C", vec![]);

    assert_eq!(fmt(&interner, interner.nullable(TypeId::INT)), "null|int");
    assert_eq!(
        fmt(&interner, interner.union(vec![TypeId::INT, TypeId::CALLABLE])),
        "int|callable"
    );
    assert_eq!(
        fmt(
            &interner,
            interner.union(vec![TypeId::INT, interner.callable(vec![Param::new(TypeId::INT)], TypeId::VOID)])
        ),
        "int|(callable(int): void)"
    );
    assert_eq!(fmt(&interner, interner.intersection(vec![a, b])), "A&B");
    assert_eq!(
        fmt(
            &interner,
            interner.intersection(vec![interner.union(vec![a, b]), c])
        ),
        "(A|B)&C"
    );
    assert_eq!(
        fmt(
            &interner,
            interner.union(vec![interner.intersection(vec![a, b]), TypeId::NULL])
        ),
        "(A&B)|null"
    );
}

#[test]
fn test_deep_nesting_is_elided() {
    let interner = TypeInterner::new();
    let mut ty = TypeId::INT;
    for _ in 0..40 {
        ty = interner.list(ty);
    }

    let text = fmt(&interner, ty);
    assert!(text.starts_with("list<list<"));
    assert!(text.contains("..."));
    assert!(!text.contains("int"));
}
