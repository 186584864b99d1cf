//! Integer ranges, bit masks and `class-string<T>`.

use crate::intern::TypeInterner;
use crate::subtype::SubtypeChecker;
use crate::types::{LiteralValue, TypeData, TypeId};

impl<'a> SubtypeChecker<'a> {
    /// Interval containment, `None` meaning unbounded on that side.
    ///
    /// ## Examples:
    /// ```text
    /// 1             <: int<0, 1>        ✅
    /// int<-9, 10>   <: int<-100, max>   ✅
    /// int<min, 10>  <: int<-100, max>   ❌
    /// int-mask<1, 2> <: int<0, 3>       ✅
    /// ```
    pub(crate) fn check_int_range_target(
        &self,
        source_data: TypeData,
        min: Option<i64>,
        max: Option<i64>,
    ) -> bool {
        let (source_min, source_max) = match source_data {
            TypeData::Literal(LiteralValue::Int(value)) => (Some(value), Some(value)),
            TypeData::IntRange { min, max } => (min, max),
            TypeData::IntMask(inner) => match mask_bounds(self.interner, inner) {
                Some((low, high)) => (Some(low), Some(high)),
                None => return false,
            },
            _ => return false,
        };

        let lower_ok = match (min, source_min) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(bound), Some(value)) => bound <= value,
        };
        let upper_ok = match (max, source_max) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(bound), Some(value)) => value <= bound,
        };
        lower_ok && upper_ok
    }

    /// A literal fits `int-mask<...>` when it is the OR of some subset of the
    /// mask's flags (the empty subset gives `0`).
    pub(crate) fn check_int_mask_target(&self, source_data: TypeData, inner: TypeId) -> bool {
        let Some(flags) = mask_flags(self.interner, inner) else {
            return false;
        };
        match source_data {
            TypeData::Literal(LiteralValue::Int(value)) => is_flag_combination(value, &flags),
            TypeData::IntMask(source_inner) => match mask_flags(self.interner, source_inner) {
                Some(source_flags) => source_flags
                    .iter()
                    .all(|&flag| is_flag_combination(flag, &flags)),
                None => false,
            },
            _ => false,
        }
    }

    /// `class-string<T>` accepts `class-string<S>` for `S <: T`, and literal
    /// strings naming a known class that is a `T`.
    pub(crate) fn check_class_string_target(&mut self, source_data: TypeData, object: TypeId) -> bool {
        match source_data {
            TypeData::ClassString(source_object) => self.check_subtype(source_object, object),
            TypeData::Literal(LiteralValue::String(class)) => {
                if !self.hierarchy.class_exists(class) {
                    return false;
                }
                let named = self.interner.named_object_atom(class, Vec::new());
                self.check_subtype(named, object)
            }
            _ => false,
        }
    }
}

/// The literal int flags of a mask, or `None` when they are not all known.
fn mask_flags(interner: &TypeInterner, inner: TypeId) -> Option<Vec<i64>> {
    match interner.lookup(inner)? {
        TypeData::Literal(LiteralValue::Int(value)) => Some(vec![value]),
        TypeData::Union(members) => interner
            .type_list(members)
            .iter()
            .map(|&member| match interner.lookup(member)? {
                TypeData::Literal(LiteralValue::Int(value)) => Some(value),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

/// Smallest and largest value a mask can produce. Only defined for
/// non-negative flags.
fn mask_bounds(interner: &TypeInterner, inner: TypeId) -> Option<(i64, i64)> {
    let flags = mask_flags(interner, inner)?;
    if flags.iter().any(|&flag| flag < 0) {
        return None;
    }
    Some((0, flags.iter().fold(0, |acc, &flag| acc | flag)))
}

fn is_flag_combination(value: i64, flags: &[i64]) -> bool {
    let covered = flags
        .iter()
        .filter(|&&flag| flag & !value == 0)
        .fold(0, |acc, &flag| acc | flag);
    covered == value
}

/// PHP truthiness of a string: everything except `""` and `"0"`.
pub(crate) fn is_truthy_string(value: &str) -> bool {
    !value.is_empty() && value != "0"
}

/// PHP 8 `is_numeric` for strings: optional surrounding whitespace, an
/// optional sign, digits with an optional fraction, an optional exponent.
pub(crate) fn is_numeric_string(value: &str) -> bool {
    let trimmed = value.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c'));
    let bytes = trimmed.as_bytes();
    let mut pos = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }
    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = pos - int_start;

    let mut frac_digits = 0;
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        let frac_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        frac_digits = pos - frac_start;
    }
    if int_digits == 0 && frac_digits == 0 {
        return false;
    }

    if pos < bytes.len() && matches!(bytes[pos], b'e' | b'E') {
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        let exp_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos == exp_start {
            return false;
        }
    }
    pos == bytes.len()
}

