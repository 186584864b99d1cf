use super::*;
use crate::types::LiteralValue;

#[test]
fn test_interner_intrinsics() {
    let interner = TypeInterner::new();

    for kind in IntrinsicKind::ALL {
        assert_eq!(
            interner.lookup(kind.to_type_id()),
            Some(TypeData::Intrinsic(kind))
        );
    }
    assert!(interner.is_empty());
}

#[test]
fn test_reserved_defaults_round_trip() {
    let interner = TypeInterner::new();

    assert_eq!(
        interner.intern(TypeData::Array(ArrayShapeId::DEFAULT)),
        TypeId::ARRAY
    );
    assert_eq!(
        interner.intern(TypeData::Iterable {
            key: TypeId::MIXED,
            value: TypeId::MIXED,
        }),
        TypeId::ITERABLE
    );
    assert_eq!(
        interner.lookup(TypeId::CALLABLE),
        Some(TypeData::Callable(CallableShapeId::DEFAULT))
    );
    assert_eq!(
        interner.lookup(TypeId::CLOSURE),
        Some(TypeData::Closure(CallableShapeId::DEFAULT))
    );
    assert!(interner.is_empty());
}

#[test]
fn test_interner_deduplication() {
    let interner = TypeInterner::new();

    let atom = interner.intern_string("hello");
    let id1 = interner.intern(TypeData::Literal(LiteralValue::String(atom)));
    let id2 = interner.intern(TypeData::Literal(LiteralValue::String(atom)));
    let id3 = interner.intern(TypeData::Literal(LiteralValue::Int(3)));

    assert_eq!(id1, id2);
    assert_ne!(id1, id3);
    assert!(!id1.is_reserved());
    assert_eq!(interner.len(), 2);
}

#[test]
fn test_lookup_unknown_id() {
    let interner = TypeInterner::new();
    assert_eq!(interner.lookup(TypeId(TypeId::FIRST_USER + 4096)), None);
    // Reserved but unassigned.
    assert_eq!(interner.lookup(TypeId(30)), None);
}

#[test]
fn test_type_lists_are_shared() {
    let interner = TypeInterner::new();

    let a = interner.intern_type_list(&[TypeId::INT, TypeId::STRING]);
    let b = interner.intern_type_list(&[TypeId::INT, TypeId::STRING]);
    let c = interner.intern_type_list(&[TypeId::STRING, TypeId::INT]);

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.intern_type_list(&[]), TypeListId::EMPTY);
    assert!(interner.type_list(TypeListId::EMPTY).is_empty());
    assert_eq!(&*interner.type_list(a), &[TypeId::INT, TypeId::STRING]);
}

#[test]
fn test_shape_interners_seeded_with_defaults() {
    let interner = TypeInterner::new();

    assert_eq!(
        interner.intern_array_shape(ArrayShape::default_array()),
        ArrayShapeId::DEFAULT
    );
    assert_eq!(
        interner.intern_callable_shape(CallableShape::unconstrained()),
        CallableShapeId::DEFAULT
    );
    assert_eq!(*interner.array_shape(ArrayShapeId::DEFAULT), ArrayShape::default_array());
    assert!(interner.object_shape(ObjectShapeId(0)).properties.is_empty());
}

#[test]
fn test_strings_resolve() {
    let interner = TypeInterner::new();
    let atom = interner.intern_string("Foo\\Bar");
    assert_eq!(interner.resolve_atom(atom), "Foo\\Bar");
    let shared: Arc<str> = interner.resolve_atom_ref(atom);
    assert_eq!(&*shared, "Foo\\Bar");
    assert_eq!(interner.intern_string("Foo\\Bar"), atom);
}

#[test]
fn test_concurrent_interning_agrees() {
    use rayon::prelude::*;

    let interner = TypeInterner::new();
    let ids: Vec<TypeId> = (0..256i64)
        .into_par_iter()
        .map(|i| interner.intern(TypeData::Literal(LiteralValue::Int(i % 16))))
        .collect();

    for (i, id) in ids.iter().enumerate() {
        let expected = interner.intern(TypeData::Literal(LiteralValue::Int(i as i64 % 16)));
        assert_eq!(*id, expected);
    }
    assert_eq!(interner.len(), 16);
}
