//! Structural subtype checking.
//!
//! `is_subtype(x, y)` answers "may a value of type `x` flow where `y` is
//! expected?". The relation is pure and total: it depends only on the two
//! types, the [`SubtypePolicy`] and the ancestry facts supplied through
//! [`ClassHierarchy`].
//!
//! ## Algorithm
//!
//! 1. Identity, `never` as subject and `mixed` as target short-circuit.
//! 2. Compound subjects and targets are decomposed:
//!    - `A|B <: T` iff every member fits
//!    - `bool`, `array-key`, `scalar`, `numeric` subjects expand to unions
//!    - `S <: A&B` iff `S` fits every member
//!    - `A&B <: T` iff some member fits
//!    - `S <: A|B` iff `S` fits some member (aliases likewise)
//! 3. Otherwise dispatch on the target's variant into `subtype_rules`.
//!
//! Anything no rule accepts is not a subtype.

use crate::caches::query_trace;
use crate::caches::{RelationCache, RelationCacheKey};
use crate::inheritance::{ClassHierarchy, NoopHierarchy};
use crate::intern::TypeInterner;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::types::{IntrinsicKind, TypeData, TypeId};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Tunable parts of the relation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtypePolicy {
    /// Compare generic arguments of named objects by their declared
    /// variance. When off every position is invariant.
    pub use_declared_variance: bool,
    /// Accept `int` where `float` is expected.
    pub int_to_float_coercion: bool,
}

impl Default for SubtypePolicy {
    fn default() -> Self {
        SubtypePolicy {
            use_declared_variance: true,
            int_to_float_coercion: false,
        }
    }
}

impl SubtypePolicy {
    /// Bits that distinguish cached results computed under different
    /// policies.
    pub fn flags(&self) -> u8 {
        (self.use_declared_variance as u8) | ((self.int_to_float_coercion as u8) << 1)
    }
}

/// Subtype checker for one top-level query at a time.
///
/// Holds the recursion guard for the query in progress; create one per
/// thread.
pub struct SubtypeChecker<'a> {
    pub(crate) interner: &'a TypeInterner,
    pub(crate) hierarchy: &'a dyn ClassHierarchy,
    pub(crate) policy: SubtypePolicy,
    cache: Option<&'a RelationCache>,
    guard: RecursionGuard<(TypeId, TypeId)>,
}

impl<'a> SubtypeChecker<'a> {
    pub fn new(interner: &'a TypeInterner, hierarchy: &'a dyn ClassHierarchy) -> Self {
        SubtypeChecker {
            interner,
            hierarchy,
            policy: SubtypePolicy::default(),
            cache: None,
            guard: RecursionGuard::with_profile(RecursionProfile::SubtypeCheck),
        }
    }

    pub fn with_policy(mut self, policy: SubtypePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Memoize top-level answers in `cache`.
    pub fn with_cache(mut self, cache: &'a RelationCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn policy(&self) -> SubtypePolicy {
        self.policy
    }

    /// Is `source` a subtype of `target`?
    pub fn is_subtype_of(&mut self, source: TypeId, target: TypeId) -> bool {
        let trace_enabled = query_trace::enabled();
        let query_id = trace_enabled.then(query_trace::next_query_id);
        let flags = self.policy.flags();
        if let Some(query_id) = query_id {
            query_trace::relation_start(query_id, "is_subtype_of", source, target, flags);
        }

        let key = RelationCacheKey::new(source, target, flags);
        if let Some(cached) = self.cache.and_then(|cache| cache.get(key)) {
            if let Some(query_id) = query_id {
                query_trace::relation_end(query_id, "is_subtype_of", cached, true);
            }
            return cached;
        }

        self.guard.reset();
        let result = self.check_subtype(source, target);
        let exceeded = self.guard.is_exceeded();

        // A result cut short by the limits depends on evaluation order.
        if let Some(cache) = self.cache
            && !exceeded
        {
            cache.insert(key, result);
        }
        if let Some(query_id) = query_id {
            query_trace::relation_end(query_id, "is_subtype_of", result, false);
        }
        result
    }

    /// Recursive entry point used by the rules.
    pub(crate) fn check_subtype(&mut self, source: TypeId, target: TypeId) -> bool {
        if source == target || source == TypeId::NEVER || target == TypeId::MIXED {
            return true;
        }
        if source == TypeId::MIXED {
            return false;
        }

        match self.guard.enter((source, target)) {
            RecursionResult::Entered => {
                let result = self.check_subtype_inner(source, target);
                self.guard.leave((source, target));
                trace!(source = source.0, target = target.0, result, "subtype");
                result
            }
            // Interned types are finite; a revisit can only come from a
            // hierarchy that feeds a type back into itself. Coinductive.
            RecursionResult::Cycle => true,
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                debug!(
                    source = source.0,
                    target = target.0,
                    depth = self.guard.depth(),
                    iterations = self.guard.iterations(),
                    "subtype check exceeded its limits"
                );
                false
            }
        }
    }

    fn check_subtype_inner(&mut self, source: TypeId, target: TypeId) -> bool {
        let interner = self.interner;
        let (Some(source_data), Some(target_data)) =
            (interner.lookup(source), interner.lookup(target))
        else {
            return false;
        };

        if let TypeData::Union(members) = source_data {
            return self.check_union_source(&interner.type_list(members), target);
        }
        if let Some(expansion) = alias_expansion(source) {
            return expansion
                .iter()
                .all(|&member| self.check_subtype(member, target));
        }
        if let TypeData::Intersection(members) = target_data {
            return self.check_intersection_target(source, &interner.type_list(members));
        }
        if let TypeData::Intersection(members) = source_data {
            if self.check_intersection_source(&interner.type_list(members), target) {
                return true;
            }
            // `A&B <: (A&B)|C` needs the target side decomposed as well.
            if !matches!(target_data, TypeData::Union(_)) && alias_expansion(target).is_none() {
                return false;
            }
        }
        if let TypeData::Union(members) = target_data {
            return self.check_union_target(source, &interner.type_list(members));
        }
        if let Some(expansion) = alias_expansion(target) {
            return expansion
                .iter()
                .any(|&member| self.check_subtype(source, member));
        }

        match target_data {
            TypeData::Intrinsic(kind) => self.check_intrinsic_target(source, source_data, kind),
            TypeData::Literal(_) => false,
            TypeData::IntRange { min, max } => self.check_int_range_target(source_data, min, max),
            TypeData::IntMask(inner) => self.check_int_mask_target(source_data, inner),
            TypeData::ClassString(object) => self.check_class_string_target(source_data, object),
            TypeData::Array(shape) => {
                let shape = interner.array_shape(shape);
                self.check_array_target(source_data, &shape)
            }
            TypeData::Iterable { key, value } => self.check_iterable_target(source_data, key, value),
            TypeData::NamedObject { class, args } => {
                let args = interner.type_list(args);
                self.check_named_object_target(source_data, class, &args)
            }
            TypeData::ObjectShape(shape) => {
                let shape = interner.object_shape(shape);
                self.check_object_shape_target(source_data, &shape)
            }
            TypeData::Callable(shape) => self.check_callable_target(source_data, shape),
            TypeData::Closure(shape) => self.check_closure_target(source_data, shape),
            // Symbolic until resolved: related by identity only.
            TypeData::Static { .. }
            | TypeData::SelfRef(_)
            | TypeData::ParentRef(_)
            | TypeData::Constant(_)
            | TypeData::ClassConstant { .. }
            | TypeData::KeyOf(_)
            | TypeData::ValueOf(_)
            | TypeData::Template(_)
            | TypeData::Conditional(_) => false,
            TypeData::Union(_) | TypeData::Intersection(_) => false,
        }
    }
}

/// Union equivalent of an alias atom.
pub(crate) fn alias_expansion(type_id: TypeId) -> Option<&'static [TypeId]> {
    match IntrinsicKind::from_type_id(type_id)? {
        IntrinsicKind::Bool => Some(&[TypeId::TRUE, TypeId::FALSE]),
        IntrinsicKind::ArrayKey => Some(&[TypeId::INT, TypeId::STRING]),
        IntrinsicKind::Scalar => Some(&[TypeId::BOOL, TypeId::INT, TypeId::FLOAT, TypeId::STRING]),
        IntrinsicKind::Numeric => Some(&[TypeId::INT, TypeId::FLOAT, TypeId::NUMERIC_STRING]),
        _ => None,
    }
}

/// `source <: target` with no class hierarchy and the default policy.
pub fn is_subtype(interner: &TypeInterner, source: TypeId, target: TypeId) -> bool {
    SubtypeChecker::new(interner, &NoopHierarchy).is_subtype_of(source, target)
}

/// `source <: target` against `hierarchy` with the default policy.
pub fn is_subtype_with(
    interner: &TypeInterner,
    hierarchy: &dyn ClassHierarchy,
    source: TypeId,
    target: TypeId,
) -> bool {
    SubtypeChecker::new(interner, hierarchy).is_subtype_of(source, target)
}

#[cfg(test)]
#[path = "../tests/subtype_tests.rs"]
mod tests;
