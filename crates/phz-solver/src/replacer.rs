//! Recursive structural replacement.
//!
//! [`TypeReplacer`] is the base of every transformation pass. Its default
//! methods rebuild compound types from their replaced children and return
//! atomic types unchanged; a pass overrides only the variants it cares
//! about. Rebuilding goes through the normalizing constructors, and a node
//! whose children are all unchanged is returned as the same id.

use crate::intern::TypeInterner;
use crate::types::{
    ArrayShape, ConditionalSubject, ConditionalType, IntrinsicKind, LiteralValue, ObjectProperty,
    Param, TemplateAnchor, TypeId,
};
use crate::visitor::TypeVisitor;
use phz_common::interner::Atom;

/// A structural rewrite over types.
pub trait TypeReplacer<'a>: Sized {
    fn interner(&self) -> &'a TypeInterner;

    /// Replace `type_id` and everything below it.
    fn replace(&mut self, type_id: TypeId) -> TypeId {
        let interner = self.interner();
        interner.accept(type_id, &mut ReplaceDispatch(self))
    }

    fn replace_all(&mut self, types: &[TypeId]) -> Vec<TypeId> {
        types.iter().map(|&type_id| self.replace(type_id)).collect()
    }

    fn replace_intrinsic(&mut self, id: TypeId, _kind: IntrinsicKind) -> TypeId {
        id
    }

    fn replace_literal(&mut self, id: TypeId, _value: LiteralValue) -> TypeId {
        id
    }

    fn replace_int_range(&mut self, id: TypeId, _min: Option<i64>, _max: Option<i64>) -> TypeId {
        id
    }

    fn replace_int_mask(&mut self, id: TypeId, inner: TypeId) -> TypeId {
        let new_inner = self.replace(inner);
        if new_inner == inner {
            return id;
        }
        self.interner().int_mask(new_inner)
    }

    fn replace_class_string(&mut self, id: TypeId, object: TypeId) -> TypeId {
        let new_object = self.replace(object);
        if new_object == object {
            return id;
        }
        self.interner().class_string(Some(new_object))
    }

    fn replace_array(&mut self, id: TypeId, shape: &ArrayShape) -> TypeId {
        let mut rebuilt = shape.clone();
        rebuilt.key = self.replace(shape.key);
        rebuilt.value = self.replace(shape.value);
        for element in &mut rebuilt.elements {
            element.type_id = self.replace(element.type_id);
        }
        if rebuilt == *shape {
            return id;
        }
        self.interner().array_from_shape(rebuilt)
    }

    fn replace_iterable(&mut self, id: TypeId, key: TypeId, value: TypeId) -> TypeId {
        let new_key = self.replace(key);
        let new_value = self.replace(value);
        if new_key == key && new_value == value {
            return id;
        }
        self.interner().iterable(new_key, new_value)
    }

    fn replace_named_object(&mut self, id: TypeId, class: Atom, args: &[TypeId]) -> TypeId {
        let new_args = self.replace_all(args);
        if new_args == args {
            return id;
        }
        self.interner().named_object_atom(class, new_args)
    }

    fn replace_static(&mut self, id: TypeId, class: Atom, args: &[TypeId]) -> TypeId {
        let new_args = self.replace_all(args);
        if new_args == args {
            return id;
        }
        self.interner().static_type(class, new_args)
    }

    fn replace_self(&mut self, id: TypeId, args: &[TypeId]) -> TypeId {
        let new_args = self.replace_all(args);
        if new_args == args {
            return id;
        }
        self.interner().self_type(new_args)
    }

    fn replace_parent(&mut self, id: TypeId, args: &[TypeId]) -> TypeId {
        let new_args = self.replace_all(args);
        if new_args == args {
            return id;
        }
        self.interner().parent_type(new_args)
    }

    fn replace_object_shape(&mut self, id: TypeId, properties: &[ObjectProperty]) -> TypeId {
        let rebuilt: Vec<ObjectProperty> = properties
            .iter()
            .map(|prop| ObjectProperty {
                type_id: self.replace(prop.type_id),
                ..*prop
            })
            .collect();
        if rebuilt == properties {
            return id;
        }
        self.interner().object_shape_type(rebuilt)
    }

    fn replace_callable(&mut self, id: TypeId, params: &[Param], return_type: TypeId) -> TypeId {
        let (new_params, new_return) = replace_signature(self, params, return_type);
        if new_params == params && new_return == return_type {
            return id;
        }
        self.interner().callable(new_params, new_return)
    }

    fn replace_closure(&mut self, id: TypeId, params: &[Param], return_type: TypeId) -> TypeId {
        let (new_params, new_return) = replace_signature(self, params, return_type);
        if new_params == params && new_return == return_type {
            return id;
        }
        self.interner().closure(new_params, new_return)
    }

    fn replace_constant(&mut self, id: TypeId, _name: Atom) -> TypeId {
        id
    }

    fn replace_class_constant(&mut self, id: TypeId, class: TypeId, name: Atom) -> TypeId {
        let new_class = self.replace(class);
        if new_class == class {
            return id;
        }
        self.interner().class_constant_atom(new_class, name)
    }

    fn replace_key_of(&mut self, id: TypeId, inner: TypeId) -> TypeId {
        let new_inner = self.replace(inner);
        if new_inner == inner {
            return id;
        }
        self.interner().key_of(new_inner)
    }

    fn replace_value_of(&mut self, id: TypeId, inner: TypeId) -> TypeId {
        let new_inner = self.replace(inner);
        if new_inner == inner {
            return id;
        }
        self.interner().value_of(new_inner)
    }

    fn replace_template(
        &mut self,
        id: TypeId,
        name: Atom,
        anchor: TemplateAnchor,
        args: &[TypeId],
    ) -> TypeId {
        let new_args = self.replace_all(args);
        if new_args == args {
            return id;
        }
        self.interner().template(name, anchor, new_args)
    }

    fn replace_conditional(&mut self, id: TypeId, conditional: &ConditionalType) -> TypeId {
        let subject = match conditional.subject {
            ConditionalSubject::Type(subject) => ConditionalSubject::Type(self.replace(subject)),
            argument @ ConditionalSubject::Argument(_) => argument,
        };
        let rebuilt = ConditionalType {
            subject,
            if_type: self.replace(conditional.if_type),
            then_type: self.replace(conditional.then_type),
            else_type: self.replace(conditional.else_type),
        };
        if rebuilt == *conditional {
            return id;
        }
        self.interner().conditional(
            rebuilt.subject,
            rebuilt.if_type,
            rebuilt.then_type,
            rebuilt.else_type,
        )
    }

    fn replace_union(&mut self, id: TypeId, members: &[TypeId]) -> TypeId {
        let new_members = self.replace_all(members);
        if new_members == members {
            return id;
        }
        self.interner().union(new_members)
    }

    fn replace_intersection(&mut self, id: TypeId, members: &[TypeId]) -> TypeId {
        let new_members = self.replace_all(members);
        if new_members == members {
            return id;
        }
        self.interner().intersection(new_members)
    }
}

fn replace_signature<'a, R: TypeReplacer<'a>>(
    replacer: &mut R,
    params: &[Param],
    return_type: TypeId,
) -> (Vec<Param>, TypeId) {
    let params = params
        .iter()
        .map(|param| Param {
            type_id: replacer.replace(param.type_id),
            ..*param
        })
        .collect();
    (params, replacer.replace(return_type))
}

/// Routes visitor callbacks to the replacer's `replace_*` methods.
struct ReplaceDispatch<'r, R>(&'r mut R);

impl<'a, R: TypeReplacer<'a>> TypeVisitor for ReplaceDispatch<'_, R> {
    type Output = TypeId;

    fn visit_intrinsic(&mut self, id: TypeId, kind: IntrinsicKind) -> TypeId {
        self.0.replace_intrinsic(id, kind)
    }

    fn visit_literal(&mut self, id: TypeId, value: LiteralValue) -> TypeId {
        self.0.replace_literal(id, value)
    }

    fn visit_int_range(&mut self, id: TypeId, min: Option<i64>, max: Option<i64>) -> TypeId {
        self.0.replace_int_range(id, min, max)
    }

    fn visit_int_mask(&mut self, id: TypeId, inner: TypeId) -> TypeId {
        self.0.replace_int_mask(id, inner)
    }

    fn visit_class_string(&mut self, id: TypeId, object: TypeId) -> TypeId {
        self.0.replace_class_string(id, object)
    }

    fn visit_array(&mut self, id: TypeId, shape: &ArrayShape) -> TypeId {
        self.0.replace_array(id, shape)
    }

    fn visit_iterable(&mut self, id: TypeId, key: TypeId, value: TypeId) -> TypeId {
        self.0.replace_iterable(id, key, value)
    }

    fn visit_named_object(&mut self, id: TypeId, class: Atom, args: &[TypeId]) -> TypeId {
        self.0.replace_named_object(id, class, args)
    }

    fn visit_static(&mut self, id: TypeId, class: Atom, args: &[TypeId]) -> TypeId {
        self.0.replace_static(id, class, args)
    }

    fn visit_self(&mut self, id: TypeId, args: &[TypeId]) -> TypeId {
        self.0.replace_self(id, args)
    }

    fn visit_parent(&mut self, id: TypeId, args: &[TypeId]) -> TypeId {
        self.0.replace_parent(id, args)
    }

    fn visit_object_shape(&mut self, id: TypeId, properties: &[ObjectProperty]) -> TypeId {
        self.0.replace_object_shape(id, properties)
    }

    fn visit_callable(&mut self, id: TypeId, params: &[Param], return_type: TypeId) -> TypeId {
        self.0.replace_callable(id, params, return_type)
    }

    fn visit_closure(&mut self, id: TypeId, params: &[Param], return_type: TypeId) -> TypeId {
        self.0.replace_closure(id, params, return_type)
    }

    fn visit_constant(&mut self, id: TypeId, name: Atom) -> TypeId {
        self.0.replace_constant(id, name)
    }

    fn visit_class_constant(&mut self, id: TypeId, class: TypeId, name: Atom) -> TypeId {
        self.0.replace_class_constant(id, class, name)
    }

    fn visit_key_of(&mut self, id: TypeId, inner: TypeId) -> TypeId {
        self.0.replace_key_of(id, inner)
    }

    fn visit_value_of(&mut self, id: TypeId, inner: TypeId) -> TypeId {
        self.0.replace_value_of(id, inner)
    }

    fn visit_template(
        &mut self,
        id: TypeId,
        name: Atom,
        anchor: TemplateAnchor,
        args: &[TypeId],
    ) -> TypeId {
        self.0.replace_template(id, name, anchor, args)
    }

    fn visit_conditional(&mut self, id: TypeId, conditional: &ConditionalType) -> TypeId {
        self.0.replace_conditional(id, conditional)
    }

    fn visit_union(&mut self, id: TypeId, members: &[TypeId]) -> TypeId {
        self.0.replace_union(id, members)
    }

    fn visit_intersection(&mut self, id: TypeId, members: &[TypeId]) -> TypeId {
        self.0.replace_intersection(id, members)
    }
}

/// A replacer that overrides nothing.
///
/// Used where a pass turns out to be a no-op, e.g. resolving templates of a
/// declaration that declares none.
pub struct IdentityReplacer<'a> {
    interner: &'a TypeInterner,
}

impl<'a> IdentityReplacer<'a> {
    pub fn new(interner: &'a TypeInterner) -> Self {
        IdentityReplacer { interner }
    }
}

impl<'a> TypeReplacer<'a> for IdentityReplacer<'a> {
    fn interner(&self) -> &'a TypeInterner {
        self.interner
    }
}

#[cfg(test)]
#[path = "../tests/replacer_tests.rs"]
mod tests;
