//! `callable(...)` and `Closure(...)` signatures.

use crate::subtype::SubtypeChecker;
use crate::types::{CallableShapeId, Param, TypeData, TypeId, TypeListId};

impl<'a> SubtypeChecker<'a> {
    /// `callable` targets accept callables and closures; a bare `Closure`
    /// object is only known to fit the unconstrained signature.
    pub(crate) fn check_callable_target(&mut self, source_data: TypeData, target: CallableShapeId) -> bool {
        match source_data {
            TypeData::Callable(source) | TypeData::Closure(source) => {
                self.check_signature(source, target)
            }
            TypeData::NamedObject { class, args } => {
                target == CallableShapeId::DEFAULT
                    && args == TypeListId::EMPTY
                    && class == self.interner.intern_string("Closure")
            }
            _ => false,
        }
    }

    /// `Closure` targets accept closures only. The plain `Closure` class
    /// fits the unconstrained signature.
    pub(crate) fn check_closure_target(&mut self, source_data: TypeData, target: CallableShapeId) -> bool {
        match source_data {
            TypeData::Closure(source) => self.check_signature(source, target),
            TypeData::NamedObject { class, args } => {
                target == CallableShapeId::DEFAULT
                    && args == TypeListId::EMPTY
                    && class == self.interner.intern_string("Closure")
            }
            _ => false,
        }
    }

    /// Signature compatibility: covariant return, contravariant parameters.
    ///
    /// ## Rules:
    /// - the unconstrained target accepts every signature; the unconstrained
    ///   subject fits only the unconstrained target
    /// - a `void` target return accepts any subject return
    /// - a subject may declare fewer parameters than the target
    /// - extra subject parameters must be optional
    /// - a target parameter the caller may omit (default, variadic) must be
    ///   omittable in the subject as well
    /// - by-reference flags must agree
    ///
    /// ## Examples:
    /// ```text
    /// Closure(mixed): int       <: callable(int): int|string  ✅
    /// Closure(int): int         <: callable(mixed): int       ❌
    /// Closure(int, int=): void  <: callable(int): void        ✅
    /// Closure(int, int): void   <: callable(int): void        ❌
    /// ```
    pub(crate) fn check_signature(&mut self, source: CallableShapeId, target: CallableShapeId) -> bool {
        if target == CallableShapeId::DEFAULT || source == target {
            return true;
        }
        if source == CallableShapeId::DEFAULT {
            return false;
        }
        let source = self.interner.callable_shape(source);
        let target = self.interner.callable_shape(target);

        if target.return_type != TypeId::VOID && !self.check_subtype(source.return_type, target.return_type) {
            return false;
        }

        for (position, target_param) in target.params.iter().enumerate() {
            let Some(source_param) = param_at(&source.params, position) else {
                // The subject ignores trailing arguments.
                break;
            };
            if !self.check_param(source_param, target_param) {
                return false;
            }
        }

        let target_variadic = target.params.last().filter(|param| param.is_variadic());
        for source_param in source.params.iter().skip(target.params.len()) {
            if !source_param.is_optional() {
                return false;
            }
            if let Some(target_param) = target_variadic
                && !self.check_subtype(target_param.type_id, source_param.type_id)
            {
                return false;
            }
        }
        true
    }

    fn check_param(&mut self, source: &Param, target: &Param) -> bool {
        if target.is_variadic() && !source.is_variadic() {
            return false;
        }
        if target.is_optional() && !source.is_optional() {
            return false;
        }
        if target.is_by_reference() != source.is_by_reference() {
            return false;
        }
        self.check_subtype(target.type_id, source.type_id)
    }
}

/// The parameter receiving argument `position`, following a trailing
/// variadic.
fn param_at(params: &[Param], position: usize) -> Option<&Param> {
    params
        .get(position)
        .or_else(|| params.last().filter(|param| param.is_variadic()))
}
