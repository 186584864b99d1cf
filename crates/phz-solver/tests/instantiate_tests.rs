use super::*;
use crate::types::Param;

fn at_class(interner: &TypeInterner, class: &str) -> TemplateAnchor {
    TemplateAnchor::AtClass(interner.intern_string(class))
}

fn box_templates(interner: &TypeInterner) -> Vec<TemplateReflection> {
    vec![
        TemplateReflection::new(interner.intern_string("T"), 0),
        TemplateReflection::new(interner.intern_string("U"), 1)
            .with_constraint(interner.named_object("Countable", vec![])),
    ]
}

#[test]
fn test_list_of_template_resolves_to_list_of_argument() {
    let interner = TypeInterner::new();
    let t = interner.class_template("T", "C");
    let templates = [TemplateReflection::new(interner.intern_string("T"), 0)];
    let mut arguments = TemplateArguments::new();
    arguments.insert_named(interner.intern_string("T"), TypeId::INT);

    let resolved = resolve_templates(
        &interner,
        at_class(&interner, "C"),
        &templates,
        &arguments,
        interner.list(t),
    );
    assert_eq!(resolved, interner.list(TypeId::INT));
}

#[test]
fn test_name_wins_over_position() {
    let interner = TypeInterner::new();
    let templates = box_templates(&interner);
    let t = interner.class_template("T", "Box");

    let mut arguments = TemplateArguments::from_args(&[TypeId::FLOAT]);
    arguments.insert_named(interner.intern_string("T"), TypeId::STRING);

    assert_eq!(
        resolve_templates(&interner, at_class(&interner, "Box"), &templates, &arguments, t),
        TypeId::STRING
    );
}

#[test]
fn test_position_used_when_name_missing() {
    let interner = TypeInterner::new();
    let templates = box_templates(&interner);
    let u = interner.class_template("U", "Box");

    let arguments = TemplateArguments::from_args(&[TypeId::FLOAT, TypeId::BOOL]);
    assert_eq!(
        resolve_templates(&interner, at_class(&interner, "Box"), &templates, &arguments, u),
        TypeId::BOOL
    );
}

#[test]
fn test_constraint_used_when_no_argument() {
    let interner = TypeInterner::new();
    let templates = box_templates(&interner);
    let t = interner.class_template("T", "Box");
    let u = interner.class_template("U", "Box");
    let arguments = TemplateArguments::new();

    assert_eq!(
        resolve_templates(&interner, at_class(&interner, "Box"), &templates, &arguments, t),
        TypeId::MIXED
    );
    assert_eq!(
        resolve_templates(&interner, at_class(&interner, "Box"), &templates, &arguments, u),
        interner.named_object("Countable", vec![])
    );
}

#[test]
fn test_undeclared_templates_are_untouched() {
    let interner = TypeInterner::new();
    let templates = box_templates(&interner);
    let v = interner.class_template("V", "Box");
    let ty = interner.array(TypeId::STRING, v);
    let arguments = TemplateArguments::from_args(&[TypeId::INT]);

    assert_eq!(resolve_templates(&interner, at_class(&interner, "Box"), &templates, &arguments, ty), ty);
}

#[test]
fn test_no_declared_templates_is_identity() {
    let interner = TypeInterner::new();
    let t = interner.class_template("T", "Box");
    let ty = interner.nullable(t);
    let arguments = TemplateArguments::from_args(&[TypeId::INT]);

    assert_eq!(resolve_templates(&interner, at_class(&interner, "Box"), &[], &arguments, ty), ty);
}

#[test]
fn test_substitution_is_simultaneous() {
    let interner = TypeInterner::new();
    let templates = box_templates(&interner);
    let t = interner.class_template("T", "Box");
    let u = interner.class_template("U", "Box");

    // T := U, U := int; the substituted U is not resolved again.
    let arguments = TemplateArguments::from_args(&[u, TypeId::INT]);
    let ty = interner.iterable(t, u);
    assert_eq!(
        resolve_templates(&interner, at_class(&interner, "Box"), &templates, &arguments, ty),
        interner.iterable(u, TypeId::INT)
    );
}

#[test]
fn test_anchor_restricts_substitution() {
    let interner = TypeInterner::new();
    let templates = [TemplateReflection::new(interner.intern_string("T"), 0)];
    let arguments = TemplateArguments::from_args(&[TypeId::INT]);

    let class_t = interner.class_template("T", "Box");
    let function_t = interner.template(
        interner.intern_string("T"),
        TemplateAnchor::AtFunction(interner.intern_string("map")),
        vec![],
    );
    let ty = interner.union(vec![class_t, function_t]);

    let mut resolver =
        TemplateResolver::new(&interner, at_class(&interner, "Box"), &templates, &arguments);
    assert_eq!(
        resolver.replace(ty),
        interner.union(vec![TypeId::INT, function_t])
    );
}

#[test]
fn test_method_template_shadowing_class_template_is_kept() {
    let interner = TypeInterner::new();
    let templates = [TemplateReflection::new(interner.intern_string("T"), 0)];
    let arguments = TemplateArguments::from_args(&[TypeId::INT]);
    let method_t = interner.template(
        interner.intern_string("T"),
        TemplateAnchor::AtMethod {
            class: interner.intern_string("Box"),
            method: interner.intern_string("map"),
        },
        vec![],
    );
    let class_t = interner.class_template("T", "Box");

    let box_anchor = at_class(&interner, "Box");
    let method_list = interner.list(method_t);
    assert_eq!(
        resolve_templates(&interner, box_anchor, &templates, &arguments, method_list),
        method_list
    );
    assert_eq!(
        resolve_templates(
            &interner,
            box_anchor,
            &templates,
            &arguments,
            interner.iterable(class_t, method_t)
        ),
        interner.iterable(TypeId::INT, method_t)
    );
}

#[test]
fn test_class_template_of_another_class_is_kept() {
    let interner = TypeInterner::new();
    let templates = [TemplateReflection::new(interner.intern_string("T"), 0)];
    let arguments = TemplateArguments::from_args(&[TypeId::INT]);
    let other_t = interner.class_template("T", "Other");

    assert_eq!(
        resolve_templates(&interner, at_class(&interner, "Box"), &templates, &arguments, other_t),
        other_t
    );
}

#[test]
fn test_arguments_of_foreign_templates_are_substituted() {
    let interner = TypeInterner::new();
    let templates = [TemplateReflection::new(interner.intern_string("T"), 0)];
    let arguments = TemplateArguments::from_args(&[TypeId::INT]);
    let t = interner.class_template("T", "Box");
    let wrap = interner.intern_string("W");
    let anchor = TemplateAnchor::AtFunction(interner.intern_string("wrap"));

    let ty = interner.template(wrap, anchor, vec![t]);
    assert_eq!(
        resolve_templates(&interner, at_class(&interner, "Box"), &templates, &arguments, ty),
        interner.template(wrap, anchor, vec![TypeId::INT])
    );
}

#[test]
fn test_resolution_is_deterministic() {
    let interner = TypeInterner::new();
    let templates = box_templates(&interner);
    let t = interner.class_template("T", "Box");
    let u = interner.class_template("U", "Box");
    let ty = interner.closure(vec![Param::new(t)], interner.list(u));
    let arguments = TemplateArguments::from_args(&[TypeId::STRING]);

    let first = resolve_templates(&interner, at_class(&interner, "Box"), &templates, &arguments, ty);
    let second = resolve_templates(&interner, at_class(&interner, "Box"), &templates, &arguments, ty);
    assert_eq!(first, second);
    assert!(!contains_templates(&interner, first));
}

#[test]
fn test_template_arguments_keep_insertion_order_and_overwrite() {
    let interner = TypeInterner::new();
    let name = interner.intern_string("T");
    let mut arguments = TemplateArguments::new();
    assert!(arguments.is_empty());

    arguments.insert_named(name, TypeId::INT);
    arguments.insert(TemplateArgKey::Position(0), TypeId::FLOAT);
    arguments.insert_named(name, TypeId::STRING);

    assert_eq!(arguments.len(), 2);
    assert_eq!(arguments.get(TemplateArgKey::Name(name)), Some(TypeId::STRING));
    assert_eq!(arguments.get(TemplateArgKey::Position(1)), None);
}
