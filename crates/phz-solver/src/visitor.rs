//! Visitor protocol over the closed set of type variants.
//!
//! [`TypeVisitor`] has one required method per variant and no defaults:
//! adding a variant to [`TypeData`] is a compile error in every visitor until
//! it handles the new case. Each method receives the visited [`TypeId`] plus
//! the already-destructured fields of the variant, so visitors never need to
//! look the type up again.
//!
//! [`TypeVisitor::visit_type`] performs the dispatch; `TypeInterner::accept`
//! is the same entry point spelled from the value side.

use crate::intern::TypeInterner;
use crate::types::{
    ArrayShape, ConditionalSubject, ConditionalType, IntrinsicKind, LiteralValue, ObjectProperty,
    Param, TemplateAnchor, TemplateInfo, TypeData, TypeId,
};
use phz_common::interner::Atom;
use rustc_hash::FxHashSet;

/// Double-dispatch visitor over [`TypeData`].
pub trait TypeVisitor: Sized {
    type Output;

    fn visit_intrinsic(&mut self, id: TypeId, kind: IntrinsicKind) -> Self::Output;
    fn visit_literal(&mut self, id: TypeId, value: LiteralValue) -> Self::Output;
    fn visit_int_range(&mut self, id: TypeId, min: Option<i64>, max: Option<i64>) -> Self::Output;
    fn visit_int_mask(&mut self, id: TypeId, inner: TypeId) -> Self::Output;
    fn visit_class_string(&mut self, id: TypeId, object: TypeId) -> Self::Output;
    fn visit_array(&mut self, id: TypeId, shape: &ArrayShape) -> Self::Output;
    fn visit_iterable(&mut self, id: TypeId, key: TypeId, value: TypeId) -> Self::Output;
    fn visit_named_object(&mut self, id: TypeId, class: Atom, args: &[TypeId]) -> Self::Output;
    fn visit_static(&mut self, id: TypeId, class: Atom, args: &[TypeId]) -> Self::Output;
    fn visit_self(&mut self, id: TypeId, args: &[TypeId]) -> Self::Output;
    fn visit_parent(&mut self, id: TypeId, args: &[TypeId]) -> Self::Output;
    fn visit_object_shape(&mut self, id: TypeId, properties: &[ObjectProperty]) -> Self::Output;
    fn visit_callable(&mut self, id: TypeId, params: &[Param], return_type: TypeId)
    -> Self::Output;
    fn visit_closure(&mut self, id: TypeId, params: &[Param], return_type: TypeId) -> Self::Output;
    fn visit_constant(&mut self, id: TypeId, name: Atom) -> Self::Output;
    fn visit_class_constant(&mut self, id: TypeId, class: TypeId, name: Atom) -> Self::Output;
    fn visit_key_of(&mut self, id: TypeId, inner: TypeId) -> Self::Output;
    fn visit_value_of(&mut self, id: TypeId, inner: TypeId) -> Self::Output;
    fn visit_template(
        &mut self,
        id: TypeId,
        name: Atom,
        anchor: TemplateAnchor,
        args: &[TypeId],
    ) -> Self::Output;
    fn visit_conditional(&mut self, id: TypeId, conditional: &ConditionalType) -> Self::Output;
    fn visit_union(&mut self, id: TypeId, members: &[TypeId]) -> Self::Output;
    fn visit_intersection(&mut self, id: TypeId, members: &[TypeId]) -> Self::Output;

    /// Dispatch to the method matching the variant behind `type_id`.
    ///
    /// Ids unknown to `interner` are visited as `never`.
    fn visit_type(&mut self, interner: &TypeInterner, type_id: TypeId) -> Self::Output {
        let Some(data) = interner.lookup(type_id) else {
            debug_assert!(false, "visited a type id unknown to this interner: {type_id:?}");
            return self.visit_intrinsic(type_id, IntrinsicKind::Never);
        };

        match data {
            TypeData::Intrinsic(kind) => self.visit_intrinsic(type_id, kind),
            TypeData::Literal(value) => self.visit_literal(type_id, value),
            TypeData::IntRange { min, max } => self.visit_int_range(type_id, min, max),
            TypeData::IntMask(inner) => self.visit_int_mask(type_id, inner),
            TypeData::ClassString(object) => self.visit_class_string(type_id, object),
            TypeData::Array(shape_id) => {
                let shape = interner.array_shape(shape_id);
                self.visit_array(type_id, &shape)
            }
            TypeData::Iterable { key, value } => self.visit_iterable(type_id, key, value),
            TypeData::NamedObject { class, args } => {
                let args = interner.type_list(args);
                self.visit_named_object(type_id, class, &args)
            }
            TypeData::Static { class, args } => {
                let args = interner.type_list(args);
                self.visit_static(type_id, class, &args)
            }
            TypeData::SelfRef(args) => {
                let args = interner.type_list(args);
                self.visit_self(type_id, &args)
            }
            TypeData::ParentRef(args) => {
                let args = interner.type_list(args);
                self.visit_parent(type_id, &args)
            }
            TypeData::ObjectShape(shape_id) => {
                let shape = interner.object_shape(shape_id);
                self.visit_object_shape(type_id, &shape.properties)
            }
            TypeData::Callable(shape_id) => {
                let shape = interner.callable_shape(shape_id);
                self.visit_callable(type_id, &shape.params, shape.return_type)
            }
            TypeData::Closure(shape_id) => {
                let shape = interner.callable_shape(shape_id);
                self.visit_closure(type_id, &shape.params, shape.return_type)
            }
            TypeData::Constant(name) => self.visit_constant(type_id, name),
            TypeData::ClassConstant { class, name } => {
                self.visit_class_constant(type_id, class, name)
            }
            TypeData::KeyOf(inner) => self.visit_key_of(type_id, inner),
            TypeData::ValueOf(inner) => self.visit_value_of(type_id, inner),
            TypeData::Template(TemplateInfo { name, anchor, args }) => {
                let args = interner.type_list(args);
                self.visit_template(type_id, name, anchor, &args)
            }
            TypeData::Conditional(cond_id) => {
                let conditional = interner.conditional_type(cond_id);
                self.visit_conditional(type_id, &conditional)
            }
            TypeData::Union(list) => {
                let members = interner.type_list(list);
                self.visit_union(type_id, &members)
            }
            TypeData::Intersection(list) => {
                let members = interner.type_list(list);
                self.visit_intersection(type_id, &members)
            }
        }
    }
}

impl TypeInterner {
    /// Dispatch `visitor` on `type_id`.
    pub fn accept<V: TypeVisitor>(&self, type_id: TypeId, visitor: &mut V) -> V::Output {
        visitor.visit_type(self, type_id)
    }
}

// =============================================================================
// TypeKindVisitor
// =============================================================================

/// Broad classification of a type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Never,
    Mixed,
    /// Scalar and resource atoms, int ranges, masks and class-strings.
    Scalar,
    Literal,
    Array,
    Iterable,
    /// Named objects, object shapes and the `object` atom.
    Object,
    Callable,
    /// `static`, `self` and `parent` before resolution.
    LateBound,
    Template,
    /// Constants, key-of/value-of and conditionals.
    Symbolic,
    Union,
    Intersection,
}

/// Visitor that classifies a type into a [`TypeKind`].
pub struct TypeKindVisitor;

impl TypeVisitor for TypeKindVisitor {
    type Output = TypeKind;

    fn visit_intrinsic(&mut self, _id: TypeId, kind: IntrinsicKind) -> TypeKind {
        match kind {
            IntrinsicKind::Never => TypeKind::Never,
            IntrinsicKind::Mixed => TypeKind::Mixed,
            IntrinsicKind::Object => TypeKind::Object,
            _ => TypeKind::Scalar,
        }
    }

    fn visit_literal(&mut self, _id: TypeId, _value: LiteralValue) -> TypeKind {
        TypeKind::Literal
    }

    fn visit_int_range(&mut self, _id: TypeId, _min: Option<i64>, _max: Option<i64>) -> TypeKind {
        TypeKind::Scalar
    }

    fn visit_int_mask(&mut self, _id: TypeId, _inner: TypeId) -> TypeKind {
        TypeKind::Scalar
    }

    fn visit_class_string(&mut self, _id: TypeId, _object: TypeId) -> TypeKind {
        TypeKind::Scalar
    }

    fn visit_array(&mut self, _id: TypeId, _shape: &ArrayShape) -> TypeKind {
        TypeKind::Array
    }

    fn visit_iterable(&mut self, _id: TypeId, _key: TypeId, _value: TypeId) -> TypeKind {
        TypeKind::Iterable
    }

    fn visit_named_object(&mut self, _id: TypeId, _class: Atom, _args: &[TypeId]) -> TypeKind {
        TypeKind::Object
    }

    fn visit_static(&mut self, _id: TypeId, _class: Atom, _args: &[TypeId]) -> TypeKind {
        TypeKind::LateBound
    }

    fn visit_self(&mut self, _id: TypeId, _args: &[TypeId]) -> TypeKind {
        TypeKind::LateBound
    }

    fn visit_parent(&mut self, _id: TypeId, _args: &[TypeId]) -> TypeKind {
        TypeKind::LateBound
    }

    fn visit_object_shape(&mut self, _id: TypeId, _properties: &[ObjectProperty]) -> TypeKind {
        TypeKind::Object
    }

    fn visit_callable(&mut self, _id: TypeId, _params: &[Param], _ret: TypeId) -> TypeKind {
        TypeKind::Callable
    }

    fn visit_closure(&mut self, _id: TypeId, _params: &[Param], _ret: TypeId) -> TypeKind {
        TypeKind::Callable
    }

    fn visit_constant(&mut self, _id: TypeId, _name: Atom) -> TypeKind {
        TypeKind::Symbolic
    }

    fn visit_class_constant(&mut self, _id: TypeId, _class: TypeId, _name: Atom) -> TypeKind {
        TypeKind::Symbolic
    }

    fn visit_key_of(&mut self, _id: TypeId, _inner: TypeId) -> TypeKind {
        TypeKind::Symbolic
    }

    fn visit_value_of(&mut self, _id: TypeId, _inner: TypeId) -> TypeKind {
        TypeKind::Symbolic
    }

    fn visit_template(
        &mut self,
        _id: TypeId,
        _name: Atom,
        _anchor: TemplateAnchor,
        _args: &[TypeId],
    ) -> TypeKind {
        TypeKind::Template
    }

    fn visit_conditional(&mut self, _id: TypeId, _conditional: &ConditionalType) -> TypeKind {
        TypeKind::Symbolic
    }

    fn visit_union(&mut self, _id: TypeId, _members: &[TypeId]) -> TypeKind {
        TypeKind::Union
    }

    fn visit_intersection(&mut self, _id: TypeId, _members: &[TypeId]) -> TypeKind {
        TypeKind::Intersection
    }
}

pub fn type_kind(interner: &TypeInterner, type_id: TypeId) -> TypeKind {
    interner.accept(type_id, &mut TypeKindVisitor)
}

// =============================================================================
// TemplateCollector
// =============================================================================

/// Collects every distinct template reachable from a type, in first-seen
/// order.
pub struct TemplateCollector<'a> {
    interner: &'a TypeInterner,
    seen: FxHashSet<TypeId>,
    templates: Vec<TemplateInfo>,
}

impl<'a> TemplateCollector<'a> {
    pub fn new(interner: &'a TypeInterner) -> Self {
        TemplateCollector {
            interner,
            seen: FxHashSet::default(),
            templates: Vec::new(),
        }
    }

    pub fn collect(&mut self, type_id: TypeId) {
        // Interned types form a DAG; shared subtrees are walked once.
        if type_id.is_atom() || !self.seen.insert(type_id) {
            return;
        }
        let interner = self.interner;
        interner.accept(type_id, self);
    }

    pub fn into_templates(self) -> Vec<TemplateInfo> {
        self.templates
    }

    fn collect_all(&mut self, types: &[TypeId]) {
        for &type_id in types {
            self.collect(type_id);
        }
    }

    fn collect_params(&mut self, params: &[Param], return_type: TypeId) {
        for param in params {
            self.collect(param.type_id);
        }
        self.collect(return_type);
    }
}

impl TypeVisitor for TemplateCollector<'_> {
    type Output = ();

    fn visit_intrinsic(&mut self, _id: TypeId, _kind: IntrinsicKind) {}

    fn visit_literal(&mut self, _id: TypeId, _value: LiteralValue) {}

    fn visit_int_range(&mut self, _id: TypeId, _min: Option<i64>, _max: Option<i64>) {}

    fn visit_int_mask(&mut self, _id: TypeId, inner: TypeId) {
        self.collect(inner);
    }

    fn visit_class_string(&mut self, _id: TypeId, object: TypeId) {
        self.collect(object);
    }

    fn visit_array(&mut self, _id: TypeId, shape: &ArrayShape) {
        self.collect(shape.key);
        self.collect(shape.value);
        for element in &shape.elements {
            self.collect(element.type_id);
        }
    }

    fn visit_iterable(&mut self, _id: TypeId, key: TypeId, value: TypeId) {
        self.collect(key);
        self.collect(value);
    }

    fn visit_named_object(&mut self, _id: TypeId, _class: Atom, args: &[TypeId]) {
        self.collect_all(args);
    }

    fn visit_static(&mut self, _id: TypeId, _class: Atom, args: &[TypeId]) {
        self.collect_all(args);
    }

    fn visit_self(&mut self, _id: TypeId, args: &[TypeId]) {
        self.collect_all(args);
    }

    fn visit_parent(&mut self, _id: TypeId, args: &[TypeId]) {
        self.collect_all(args);
    }

    fn visit_object_shape(&mut self, _id: TypeId, properties: &[ObjectProperty]) {
        for prop in properties {
            self.collect(prop.type_id);
        }
    }

    fn visit_callable(&mut self, _id: TypeId, params: &[Param], return_type: TypeId) {
        self.collect_params(params, return_type);
    }

    fn visit_closure(&mut self, _id: TypeId, params: &[Param], return_type: TypeId) {
        self.collect_params(params, return_type);
    }

    fn visit_constant(&mut self, _id: TypeId, _name: Atom) {}

    fn visit_class_constant(&mut self, _id: TypeId, class: TypeId, _name: Atom) {
        self.collect(class);
    }

    fn visit_key_of(&mut self, _id: TypeId, inner: TypeId) {
        self.collect(inner);
    }

    fn visit_value_of(&mut self, _id: TypeId, inner: TypeId) {
        self.collect(inner);
    }

    fn visit_template(&mut self, id: TypeId, _name: Atom, _anchor: TemplateAnchor, args: &[TypeId]) {
        if let Some(TypeData::Template(info)) = self.interner.lookup(id) {
            self.templates.push(info);
        }
        self.collect_all(args);
    }

    fn visit_conditional(&mut self, _id: TypeId, conditional: &ConditionalType) {
        if let ConditionalSubject::Type(subject) = conditional.subject {
            self.collect(subject);
        }
        self.collect(conditional.if_type);
        self.collect(conditional.then_type);
        self.collect(conditional.else_type);
    }

    fn visit_union(&mut self, _id: TypeId, members: &[TypeId]) {
        self.collect_all(members);
    }

    fn visit_intersection(&mut self, _id: TypeId, members: &[TypeId]) {
        self.collect_all(members);
    }
}

/// Every distinct template occurring in `type_id`.
pub fn collect_templates(interner: &TypeInterner, type_id: TypeId) -> Vec<TemplateInfo> {
    let mut collector = TemplateCollector::new(interner);
    collector.collect(type_id);
    collector.into_templates()
}

pub fn contains_templates(interner: &TypeInterner, type_id: TypeId) -> bool {
    !collect_templates(interner, type_id).is_empty()
}

#[cfg(test)]
#[path = "../tests/visitor_tests.rs"]
mod tests;
