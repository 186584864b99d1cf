//! Atom targets: `int`, `float`, the string family, `class-string`, `object`.
//!
//! The alias atoms (`bool`, `array-key`, `scalar`, `numeric`) never reach
//! this module; the dispatcher expands them first.

use crate::subtype::SubtypeChecker;
use crate::types::{IntrinsicKind, LiteralValue, TypeData, TypeId};

use super::literals::{is_numeric_string, is_truthy_string};

impl<'a> SubtypeChecker<'a> {
    /// Check a non-alias subject against an atom target.
    ///
    /// Identity, `never` and `mixed` have already been handled, so only
    /// proper subtypes are left to decide.
    ///
    /// ## Examples:
    /// ```text
    /// int<0, max>      <: int               ✅
    /// 'abc'            <: truthy-string     ✅
    /// '0'              <: truthy-string     ❌
    /// numeric-string   <: non-empty-string  ✅
    /// numeric-string   <: truthy-string     ❌
    /// class-string<Foo> <: class-string     ✅
    /// Closure(): void  <: object            ✅
    /// ```
    pub(crate) fn check_intrinsic_target(
        &mut self,
        source: TypeId,
        source_data: TypeData,
        target: IntrinsicKind,
    ) -> bool {
        match target {
            IntrinsicKind::Int => is_int_family(source, source_data),
            IntrinsicKind::LiteralInt => matches!(source_data, TypeData::Literal(LiteralValue::Int(_))),
            IntrinsicKind::Float => {
                matches!(source_data, TypeData::Literal(LiteralValue::Float(_)))
                    || (self.policy.int_to_float_coercion && is_int_family(source, source_data))
            }
            IntrinsicKind::String => self.is_string_family(source, source_data),
            IntrinsicKind::NonEmptyString => match source_data {
                TypeData::Literal(LiteralValue::String(atom)) => {
                    !self.interner.resolve_atom_ref(atom).is_empty()
                }
                TypeData::ClassString(_) => true,
                _ => matches!(
                    source,
                    TypeId::TRUTHY_STRING | TypeId::NUMERIC_STRING | TypeId::CLASS_STRING
                ),
            },
            IntrinsicKind::TruthyString => match source_data {
                TypeData::Literal(LiteralValue::String(atom)) => {
                    is_truthy_string(&self.interner.resolve_atom_ref(atom))
                }
                TypeData::ClassString(_) => true,
                _ => source == TypeId::CLASS_STRING,
            },
            IntrinsicKind::NumericString => match source_data {
                TypeData::Literal(LiteralValue::String(atom)) => {
                    is_numeric_string(&self.interner.resolve_atom_ref(atom))
                }
                _ => false,
            },
            IntrinsicKind::LiteralString => {
                matches!(source_data, TypeData::Literal(LiteralValue::String(_)))
            }
            IntrinsicKind::ClassString => match source_data {
                TypeData::ClassString(_) => true,
                TypeData::Literal(LiteralValue::String(atom)) => self.hierarchy.class_exists(atom),
                _ => false,
            },
            IntrinsicKind::Object => matches!(
                source_data,
                TypeData::NamedObject { .. } | TypeData::ObjectShape(_) | TypeData::Closure(_)
            ),
            // The remaining atoms have no proper subtypes besides `never`.
            IntrinsicKind::Never
            | IntrinsicKind::Void
            | IntrinsicKind::Null
            | IntrinsicKind::False
            | IntrinsicKind::True
            | IntrinsicKind::Mixed
            | IntrinsicKind::Resource
            | IntrinsicKind::ClosedResource
            | IntrinsicKind::Bool
            | IntrinsicKind::Scalar
            | IntrinsicKind::Numeric
            | IntrinsicKind::ArrayKey => false,
        }
    }

    /// Every member of the string family is a `string`.
    fn is_string_family(&self, source: TypeId, source_data: TypeData) -> bool {
        match source_data {
            TypeData::Literal(LiteralValue::String(_)) | TypeData::ClassString(_) => true,
            _ => matches!(
                source,
                TypeId::LITERAL_STRING
                    | TypeId::NON_EMPTY_STRING
                    | TypeId::TRUTHY_STRING
                    | TypeId::NUMERIC_STRING
                    | TypeId::CLASS_STRING
            ),
        }
    }
}

fn is_int_family(source: TypeId, source_data: TypeData) -> bool {
    matches!(source, TypeId::INT | TypeId::LITERAL_INT)
        || matches!(
            source_data,
            TypeData::Literal(LiteralValue::Int(_)) | TypeData::IntRange { .. } | TypeData::IntMask(_)
        )
}
