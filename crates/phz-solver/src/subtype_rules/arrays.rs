//! Arrays, lists, array shapes and `iterable`.
//!
//! Shapes are compared by key value, never by declaration position:
//! `array{1: 'a', 0: 'b'}` is a list because its keys are exactly `0..2`.

use crate::subtype::SubtypeChecker;
use crate::types::{ArrayShape, TypeData, TypeId};
use tracing::trace;

impl<'a> SubtypeChecker<'a> {
    /// Check a subject against an array target.
    ///
    /// ## Rules:
    /// - a `list` target requires a list subject, or a sealed shape whose
    ///   keys are exactly `0..n`
    /// - a `non-empty` target requires a subject guaranteed to have an entry
    /// - every target element must be matched by the subject element with the
    ///   same key; required target elements need required subject elements
    /// - subject elements the target does not name must fit the target's
    ///   catch-all key and value, and are rejected by a sealed target
    /// - an unsealed subject is rejected by a sealed target
    ///
    /// ## Examples:
    /// ```text
    /// list<int>                 <: list<mixed>         ✅
    /// list<string>              <: list<non-empty-string> ❌
    /// array{1: 'a', 0: 'b'}     <: list<string>        ✅
    /// array{a: int, b: int}     <: array{a: int}       ❌ (sealed)
    /// array{a: int, b: int}     <: array<string, int>  ✅
    /// ```
    pub(crate) fn check_array_target(&mut self, source_data: TypeData, target: &ArrayShape) -> bool {
        let TypeData::Array(source_id) = source_data else {
            return false;
        };
        let source = self.interner.array_shape(source_id);

        if target.list && !source.list && !(source.sealed && source.has_sequential_keys()) {
            trace!("array subject is not a list");
            return false;
        }
        if target.non_empty && !source.is_guaranteed_non_empty() {
            return false;
        }
        if target.sealed && !source.sealed {
            return false;
        }

        for element in &target.elements {
            match source.element(element.key) {
                Some(found) => {
                    if found.optional && !element.optional {
                        return false;
                    }
                    if !self.check_subtype(found.type_id, element.type_id) {
                        return false;
                    }
                }
                None if !element.optional => return false,
                None => {
                    // The subject's catch-all may still produce this key.
                    if !source.sealed {
                        let key = self.interner.array_key_type(element.key);
                        if self.check_subtype(key, source.key)
                            && !self.check_subtype(source.value, element.type_id)
                        {
                            return false;
                        }
                    }
                }
            }
        }

        for element in &source.elements {
            if target.element(element.key).is_some() {
                continue;
            }
            if target.sealed {
                return false;
            }
            let key = self.interner.array_key_type(element.key);
            if !self.check_subtype(key, target.key) || !self.check_subtype(element.type_id, target.value)
            {
                return false;
            }
        }

        if !source.sealed {
            return self.check_subtype(source.key, target.key)
                && self.check_subtype(source.value, target.value);
        }
        true
    }

    /// `iterable<K, V>` accepts arrays and iterables whose keys and values
    /// fit, and `Traversable` objects whose arguments fit.
    pub(crate) fn check_iterable_target(&mut self, source_data: TypeData, key: TypeId, value: TypeId) -> bool {
        match source_data {
            TypeData::Array(source_id) => {
                let source = self.interner.array_shape(source_id);
                for element in &source.elements {
                    let element_key = self.interner.array_key_type(element.key);
                    if !self.check_subtype(element_key, key) || !self.check_subtype(element.type_id, value) {
                        return false;
                    }
                }
                source.sealed
                    || (self.check_subtype(source.key, key) && self.check_subtype(source.value, value))
            }
            TypeData::Iterable {
                key: source_key,
                value: source_value,
            } => self.check_subtype(source_key, key) && self.check_subtype(source_value, value),
            TypeData::NamedObject { class, args } => {
                let traversable = self.interner.intern_string("Traversable");
                let args = self.interner.type_list(args);
                let traversable_args = if class == traversable {
                    args.to_vec()
                } else if self.hierarchy.is_subclass_of(class, traversable) {
                    self.hierarchy
                        .upcast_arguments(self.interner, class, &args, traversable)
                        .unwrap_or_default()
                } else {
                    return false;
                };

                let (source_key, source_value) = match traversable_args.as_slice() {
                    [] => (TypeId::MIXED, TypeId::MIXED),
                    [value] => (TypeId::MIXED, *value),
                    [key, value, ..] => (*key, *value),
                };
                self.check_subtype(source_key, key) && self.check_subtype(source_value, value)
            }
            _ => false,
        }
    }
}
