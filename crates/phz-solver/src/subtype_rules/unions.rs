//! Union and intersection decomposition.
//!
//! - Union source: every member must fit the target.
//! - Union target: the source must fit at least one member.
//! - Intersection target: the source must fit every member.
//! - Intersection source: at least one member must fit the target.

use crate::subtype::SubtypeChecker;
use crate::types::TypeId;

impl<'a> SubtypeChecker<'a> {
    /// `(A | B | C) <: T` if `A <: T` and `B <: T` and `C <: T`.
    pub(crate) fn check_union_source(&mut self, members: &[TypeId], target: TypeId) -> bool {
        members
            .iter()
            .all(|&member| self.check_subtype(member, target))
    }

    /// `S <: (A | B | C)` if `S <: A` or `S <: B` or `S <: C`.
    pub(crate) fn check_union_target(&mut self, source: TypeId, members: &[TypeId]) -> bool {
        members
            .iter()
            .any(|&member| self.check_subtype(source, member))
    }

    /// `S <: (A & B)` if `S <: A` and `S <: B`.
    pub(crate) fn check_intersection_target(&mut self, source: TypeId, members: &[TypeId]) -> bool {
        members
            .iter()
            .all(|&member| self.check_subtype(source, member))
    }

    /// `(A & B) <: T` if `A <: T` or `B <: T`.
    ///
    /// Incomplete for targets only the combination satisfies, such as
    /// `Countable&Traversable <: object{...}`; those report `false`.
    pub(crate) fn check_intersection_source(&mut self, members: &[TypeId], target: TypeId) -> bool {
        members
            .iter()
            .any(|&member| self.check_subtype(member, target))
    }
}
