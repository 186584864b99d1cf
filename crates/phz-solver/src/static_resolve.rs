//! Resolution of late-bound class references.
//!
//! [`StaticResolver`] rewrites `static` to a concrete class once the
//! receiving class is known. [`ScopedResolver`] additionally resolves `self`
//! and `parent` against an explicit [`ClassScope`]; there is no ambient
//! class context anywhere, so resolution can run concurrently for unrelated
//! declarations.

use crate::errors::ResolveError;
use crate::intern::TypeInterner;
use crate::replacer::TypeReplacer;
use crate::types::TypeId;
use phz_common::interner::Atom;
use tracing::debug;

/// Rewrites every `static` node to the named object of one class.
pub struct StaticResolver<'a> {
    interner: &'a TypeInterner,
    class: Atom,
}

impl<'a> StaticResolver<'a> {
    pub fn new(interner: &'a TypeInterner, class: Atom) -> Self {
        StaticResolver { interner, class }
    }
}

impl<'a> TypeReplacer<'a> for StaticResolver<'a> {
    fn interner(&self) -> &'a TypeInterner {
        self.interner
    }

    fn replace_static(&mut self, _id: TypeId, _class: Atom, args: &[TypeId]) -> TypeId {
        let args = self.replace_all(args);
        self.interner.named_object_atom(self.class, args)
    }
}

/// Resolve `static` in `type_id` to `class`.
pub fn resolve_static(interner: &TypeInterner, class: Atom, type_id: TypeId) -> TypeId {
    StaticResolver::new(interner, class).replace(type_id)
}

/// The class context a declaration is resolved in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassScope {
    /// Class that declares the member (`self`).
    pub self_class: Atom,
    /// Direct parent of `self_class`, if any.
    pub parent_class: Option<Atom>,
    /// Class the member is accessed through, when known.
    pub called_class: Option<Atom>,
    /// `self_class` is `final`, so `static` cannot differ from `self`.
    pub is_final: bool,
}

impl ClassScope {
    pub fn new(self_class: Atom) -> Self {
        ClassScope {
            self_class,
            parent_class: None,
            called_class: None,
            is_final: false,
        }
    }

    pub fn with_parent(mut self, parent: Atom) -> Self {
        self.parent_class = Some(parent);
        self
    }

    pub fn with_called_class(mut self, called: Atom) -> Self {
        self.called_class = Some(called);
        self
    }

    pub fn final_class(mut self) -> Self {
        self.is_final = true;
        self
    }
}

/// Resolves `self`, `parent` and `static` against a [`ClassScope`].
///
/// The replacer interface is infallible, so the first failure is recorded
/// and reported by [`resolve`](Self::resolve).
pub struct ScopedResolver<'a> {
    interner: &'a TypeInterner,
    scope: Option<ClassScope>,
    error: Option<ResolveError>,
}

impl<'a> ScopedResolver<'a> {
    pub fn new(interner: &'a TypeInterner, scope: Option<ClassScope>) -> Self {
        ScopedResolver {
            interner,
            scope,
            error: None,
        }
    }

    /// Resolve `type_id`, reporting the first failure.
    pub fn resolve(mut self, type_id: TypeId) -> Result<TypeId, ResolveError> {
        let resolved = self.replace(type_id);
        self.finish(resolved)
    }

    fn finish(self, resolved: TypeId) -> Result<TypeId, ResolveError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(resolved),
        }
    }

    fn fail(&mut self, id: TypeId, error: ResolveError) -> TypeId {
        debug!(%error, "late-bound reference left unresolved");
        self.error.get_or_insert(error);
        id
    }

    fn scope_for(&mut self, keyword: &'static str) -> Option<ClassScope> {
        if self.scope.is_none() && self.error.is_none() {
            self.error = Some(ResolveError::OutsideClassScope { keyword });
            debug!(keyword, "late-bound reference outside of class scope");
        }
        self.scope
    }
}

impl<'a> TypeReplacer<'a> for ScopedResolver<'a> {
    fn interner(&self) -> &'a TypeInterner {
        self.interner
    }

    fn replace_self(&mut self, id: TypeId, args: &[TypeId]) -> TypeId {
        let Some(scope) = self.scope_for("self") else {
            return id;
        };
        let args = self.replace_all(args);
        self.interner.named_object_atom(scope.self_class, args)
    }

    fn replace_parent(&mut self, id: TypeId, args: &[TypeId]) -> TypeId {
        let Some(scope) = self.scope_for("parent") else {
            return id;
        };
        let Some(parent) = scope.parent_class else {
            let class = self.interner.resolve_atom(scope.self_class);
            return self.fail(id, ResolveError::NoParentClass { class });
        };
        let args = self.replace_all(args);
        self.interner.named_object_atom(parent, args)
    }

    fn replace_static(&mut self, id: TypeId, _class: Atom, args: &[TypeId]) -> TypeId {
        let Some(scope) = self.scope_for("static") else {
            return id;
        };
        let args = self.replace_all(args);
        match scope.called_class {
            Some(called) => self.interner.named_object_atom(called, args),
            None if scope.is_final => self.interner.named_object_atom(scope.self_class, args),
            // Still late-bound, but anchored to the declaring class.
            None => self.interner.static_type(scope.self_class, args),
        }
    }
}

/// Resolve `self`, `parent` and `static` in `type_id`.
///
/// `scope` is `None` for free functions; any late-bound reference is then an
/// [`OutsideClassScope`](ResolveError::OutsideClassScope) error.
pub fn resolve_in_scope(
    interner: &TypeInterner,
    scope: Option<ClassScope>,
    type_id: TypeId,
) -> Result<TypeId, ResolveError> {
    ScopedResolver::new(interner, scope).resolve(type_id)
}

#[cfg(test)]
#[path = "../tests/static_resolve_tests.rs"]
mod tests;
