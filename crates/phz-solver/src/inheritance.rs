//! Class ancestry facts.
//!
//! The algebra carries no class hierarchy. Whatever knows about classes
//! (reflection metadata, a test fixture) supplies it through
//! [`ClassHierarchy`]. [`InheritanceGraph`] is a concurrent in-memory
//! implementation.

use crate::instantiate::{TemplateArguments, TemplateReflection, resolve_templates};
use crate::intern::TypeInterner;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::types::{TemplateAnchor, TypeId};
use crate::variance::Variance;
use dashmap::DashMap;
use phz_common::interner::Atom;
use smallvec::SmallVec;
use tracing::{debug, trace};

/// Ancestry facts consulted by the subtype engine.
///
/// Class names are compared as interned atoms; callers canonicalize case
/// before interning.
pub trait ClassHierarchy: Sync {
    /// `child` extends or implements `ancestor`, directly or transitively.
    /// A class is not its own subclass.
    fn is_subclass_of(&self, child: Atom, ancestor: Atom) -> bool;

    /// `name` refers to a known class, interface or enum.
    fn class_exists(&self, name: Atom) -> bool;

    /// Declared variance of each template of `class`, by position.
    fn template_variances(&self, class: Atom) -> Option<Vec<Variance>>;

    /// Arguments of `ancestor` as seen from `class<args>`.
    ///
    /// For `class IntList implements Collection<int>`,
    /// `upcast_arguments(IntList, [], Collection)` is `Some([int])`.
    fn upcast_arguments(
        &self,
        interner: &TypeInterner,
        class: Atom,
        args: &[TypeId],
        ancestor: Atom,
    ) -> Option<Vec<TypeId>>;
}

/// A hierarchy that knows no classes.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHierarchy;

impl ClassHierarchy for NoopHierarchy {
    fn is_subclass_of(&self, _child: Atom, _ancestor: Atom) -> bool {
        false
    }

    fn class_exists(&self, _name: Atom) -> bool {
        false
    }

    fn template_variances(&self, _class: Atom) -> Option<Vec<Variance>> {
        None
    }

    fn upcast_arguments(
        &self,
        _interner: &TypeInterner,
        _class: Atom,
        _args: &[TypeId],
        _ancestor: Atom,
    ) -> Option<Vec<TypeId>> {
        None
    }
}

#[derive(Clone, Debug, Default)]
struct ClassNode {
    templates: Vec<TemplateReflection>,
    /// Direct parents with the arguments passed to them, which may mention
    /// this class's templates.
    parents: SmallVec<[(Atom, Vec<TypeId>); 2]>,
}

/// Concurrent class graph.
///
/// Declaring and linking classes can happen from several threads; lookups
/// never block each other.
#[derive(Debug, Default)]
pub struct InheritanceGraph {
    classes: DashMap<Atom, ClassNode>,
}

impl InheritanceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `class` with its templates. Re-declaring replaces the
    /// templates and keeps known parents.
    pub fn declare_class(&self, class: Atom, templates: Vec<TemplateReflection>) {
        self.classes.entry(class).or_default().templates = templates;
    }

    /// Record `child extends/implements parent<parent_args>`.
    ///
    /// Both classes become known. Adding the same edge twice replaces its
    /// arguments.
    pub fn add_inheritance(&self, child: Atom, parent: Atom, parent_args: Vec<TypeId>) {
        self.classes.entry(parent).or_default();
        let mut node = self.classes.entry(child).or_default();
        if let Some(edge) = node.parents.iter_mut().find(|(name, _)| *name == parent) {
            edge.1 = parent_args;
        } else {
            node.parents.push((parent, parent_args));
        }
        trace!(child = child.0, parent = parent.0, "inheritance edge added");
    }

    /// Number of known classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn parents_of(&self, class: Atom) -> SmallVec<[(Atom, Vec<TypeId>); 2]> {
        self.classes
            .get(&class)
            .map(|node| node.parents.clone())
            .unwrap_or_default()
    }

    fn templates_of(&self, class: Atom) -> Vec<TemplateReflection> {
        self.classes
            .get(&class)
            .map(|node| node.templates.clone())
            .unwrap_or_default()
    }

    fn derives(&self, guard: &mut RecursionGuard<Atom>, class: Atom, ancestor: Atom) -> bool {
        match guard.enter(class) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => return false,
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                debug!(class = class.0, "ancestry walk exceeded its limits");
                return false;
            }
        }
        let found = self
            .parents_of(class)
            .iter()
            .any(|(parent, _)| *parent == ancestor || self.derives(guard, *parent, ancestor));
        guard.leave(class);
        found
    }

    /// Depth-first search for a path `class -> ... -> ancestor`, mapping the
    /// arguments through every edge on the way.
    fn upcast(
        &self,
        interner: &TypeInterner,
        guard: &mut RecursionGuard<Atom>,
        class: Atom,
        args: &[TypeId],
        ancestor: Atom,
    ) -> Option<Vec<TypeId>> {
        if class == ancestor {
            return Some(args.to_vec());
        }
        if !guard.enter(class).is_entered() {
            return None;
        }

        let templates = self.templates_of(class);
        let anchor = TemplateAnchor::AtClass(class);
        let arguments = TemplateArguments::from_args(args);
        let mut result = None;
        for (parent, parent_args) in self.parents_of(class) {
            let mapped: Vec<TypeId> = parent_args
                .iter()
                .map(|&arg| resolve_templates(interner, anchor, &templates, &arguments, arg))
                .collect();
            result = self.upcast(interner, guard, parent, &mapped, ancestor);
            if result.is_some() {
                break;
            }
        }

        guard.leave(class);
        result
    }
}

impl ClassHierarchy for InheritanceGraph {
    fn is_subclass_of(&self, child: Atom, ancestor: Atom) -> bool {
        if child == ancestor {
            return false;
        }
        let mut guard = RecursionGuard::with_profile(RecursionProfile::Ancestry);
        self.derives(&mut guard, child, ancestor)
    }

    fn class_exists(&self, name: Atom) -> bool {
        self.classes.contains_key(&name)
    }

    fn template_variances(&self, class: Atom) -> Option<Vec<Variance>> {
        let node = self.classes.get(&class)?;
        let mut templates = node.templates.clone();
        templates.sort_by_key(|template| template.position);
        Some(templates.iter().map(|template| template.variance).collect())
    }

    fn upcast_arguments(
        &self,
        interner: &TypeInterner,
        class: Atom,
        args: &[TypeId],
        ancestor: Atom,
    ) -> Option<Vec<TypeId>> {
        let mut guard = RecursionGuard::with_profile(RecursionProfile::Ancestry);
        self.upcast(interner, &mut guard, class, args, ancestor)
    }
}

#[cfg(test)]
#[path = "../tests/inheritance_tests.rs"]
mod tests;
