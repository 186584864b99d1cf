//! Template substitution.
//!
//! Given the templates a declaration introduces and the arguments supplied
//! for them, [`TemplateResolver`] replaces every matching template node:
//!
//! 1. by the argument supplied under the template's name,
//! 2. else by the argument supplied at the template's declared position,
//! 3. else by the template's upper-bound constraint (`mixed` if none).
//!
//! Only templates declared at the resolver's anchor match: a method template
//! `T@Box::map` is a different variable from the class template `T@Box`.
//! Substitution is simultaneous: a substituted argument is not itself
//! searched for further templates.

use crate::intern::TypeInterner;
use crate::replacer::{IdentityReplacer, TypeReplacer};
use crate::types::{TemplateAnchor, TypeId};
use crate::variance::Variance;
use crate::visitor::contains_templates;
use indexmap::IndexMap;
use phz_common::interner::Atom;
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use tracing::trace;

/// A template parameter as declared (`@template T of Foo`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TemplateReflection {
    pub name: Atom,
    pub position: u32,
    pub constraint: Option<TypeId>,
    pub variance: Variance,
}

impl TemplateReflection {
    pub fn new(name: Atom, position: u32) -> Self {
        TemplateReflection {
            name,
            position,
            constraint: None,
            variance: Variance::Invariant,
        }
    }

    pub fn with_constraint(mut self, constraint: TypeId) -> Self {
        self.constraint = Some(constraint);
        self
    }

    pub fn with_variance(mut self, variance: Variance) -> Self {
        self.variance = variance;
        self
    }

    /// The constraint, or `mixed` when none was declared.
    #[inline]
    pub fn upper_bound(&self) -> TypeId {
        self.constraint.unwrap_or(TypeId::MIXED)
    }
}

/// How a supplied argument is addressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TemplateArgKey {
    Name(Atom),
    Position(u32),
}

/// Supplied template arguments, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplateArguments {
    args: IndexMap<TemplateArgKey, TypeId, FxBuildHasher>,
}

impl TemplateArguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positional arguments, as written in `Foo<int, string>`.
    pub fn from_args(args: &[TypeId]) -> Self {
        let mut result = Self::new();
        for (position, &arg) in args.iter().enumerate() {
            result.insert(TemplateArgKey::Position(position as u32), arg);
        }
        result
    }

    pub fn insert(&mut self, key: TemplateArgKey, type_id: TypeId) {
        self.args.insert(key, type_id);
    }

    pub fn insert_named(&mut self, name: Atom, type_id: TypeId) {
        self.insert(TemplateArgKey::Name(name), type_id);
    }

    pub fn get(&self, key: TemplateArgKey) -> Option<TypeId> {
        self.args.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

/// Replacer that substitutes declared templates.
pub struct TemplateResolver<'a> {
    interner: &'a TypeInterner,
    templates: &'a [TemplateReflection],
    arguments: &'a TemplateArguments,
    anchor: TemplateAnchor,
}

impl<'a> TemplateResolver<'a> {
    /// `templates` are the ones declared at `anchor`.
    pub fn new(
        interner: &'a TypeInterner,
        anchor: TemplateAnchor,
        templates: &'a [TemplateReflection],
        arguments: &'a TemplateArguments,
    ) -> Self {
        TemplateResolver {
            interner,
            templates,
            arguments,
            anchor,
        }
    }

    /// The type a declared template resolves to.
    pub fn resolve_template(&self, template: &TemplateReflection) -> TypeId {
        self.arguments
            .get(TemplateArgKey::Name(template.name))
            .or_else(|| {
                self.arguments
                    .get(TemplateArgKey::Position(template.position))
            })
            .unwrap_or_else(|| template.upper_bound())
    }
}

impl<'a> TypeReplacer<'a> for TemplateResolver<'a> {
    fn interner(&self) -> &'a TypeInterner {
        self.interner
    }

    fn replace_template(
        &mut self,
        id: TypeId,
        name: Atom,
        anchor: TemplateAnchor,
        args: &[TypeId],
    ) -> TypeId {
        let declared = self
            .templates
            .iter()
            .find(|t| t.name == name)
            .filter(|_| anchor == self.anchor);
        let Some(template) = declared else {
            // Not ours; its arguments may still mention ours.
            let new_args = self.replace_all(args);
            if new_args == args {
                return id;
            }
            return self.interner.template(name, anchor, new_args);
        };
        let resolved = self.resolve_template(template);
        trace!(
            template = %self.interner.resolve_atom_ref(name),
            resolved = resolved.0,
            "template resolved"
        );
        resolved
    }
}

/// Substitute the `templates` declared at `anchor` in `type_id` using
/// `arguments`.
///
/// With no declared templates this is the identity pass.
pub fn resolve_templates(
    interner: &TypeInterner,
    anchor: TemplateAnchor,
    templates: &[TemplateReflection],
    arguments: &TemplateArguments,
    type_id: TypeId,
) -> TypeId {
    if templates.is_empty() || !contains_templates(interner, type_id) {
        return IdentityReplacer::new(interner).replace(type_id);
    }
    TemplateResolver::new(interner, anchor, templates, arguments).replace(type_id)
}

#[cfg(test)]
#[path = "../tests/instantiate_tests.rs"]
mod tests;
