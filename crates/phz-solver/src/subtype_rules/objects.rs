//! Named objects and object shapes.

use crate::subtype::SubtypeChecker;
use crate::types::{ObjectShape, TypeData, TypeId};
use crate::variance::Variance;
use phz_common::interner::Atom;
use tracing::trace;

impl<'a> SubtypeChecker<'a> {
    /// `C<A...> <: D<B...>` when `C` is `D` or descends from it, and the
    /// arguments of `C` seen as a `D` fit `B...` at every position.
    ///
    /// ## Examples:
    /// ```text
    /// IntList            <: Collection<int>     ✅ (IntList implements Collection<int>)
    /// Box<int>           <: Box<int|string>     ✅ only when Box's template is covariant
    /// Box<int>           <: Box                 ✅
    /// Closure(int): void <: Closure             ✅
    /// ```
    pub(crate) fn check_named_object_target(
        &mut self,
        source_data: TypeData,
        class: Atom,
        target_args: &[TypeId],
    ) -> bool {
        match source_data {
            TypeData::NamedObject {
                class: source_class,
                args,
            } => {
                let source_args = self.interner.type_list(args);
                if source_class == class {
                    return self.check_type_arguments(class, &source_args, target_args);
                }
                if !self.hierarchy.is_subclass_of(source_class, class) {
                    return false;
                }
                if target_args.is_empty() {
                    return true;
                }
                match self
                    .hierarchy
                    .upcast_arguments(self.interner, source_class, &source_args, class)
                {
                    Some(upcast) => self.check_type_arguments(class, &upcast, target_args),
                    None => {
                        trace!(
                            source_class = source_class.0,
                            class = class.0,
                            "no upcast arguments for generic ancestor"
                        );
                        false
                    }
                }
            }
            TypeData::Closure(_) => {
                target_args.is_empty() && class == self.interner.intern_string("Closure")
            }
            _ => false,
        }
    }

    /// Compare generic arguments position by position.
    ///
    /// Missing subject arguments are `mixed`. A position without declared
    /// variance, or any position when declared variance is disabled by the
    /// policy, is invariant.
    fn check_type_arguments(&mut self, class: Atom, source_args: &[TypeId], target_args: &[TypeId]) -> bool {
        if target_args.is_empty() {
            return true;
        }
        let variances = if self.policy.use_declared_variance {
            self.hierarchy.template_variances(class).unwrap_or_default()
        } else {
            Vec::new()
        };

        for (position, &target) in target_args.iter().enumerate() {
            let source = source_args.get(position).copied().unwrap_or(TypeId::MIXED);
            let variance = variances.get(position).copied().unwrap_or_default();
            let fits = match variance {
                Variance::Covariant => self.check_subtype(source, target),
                Variance::Contravariant => self.check_subtype(target, source),
                Variance::Bivariant => {
                    self.check_subtype(source, target) || self.check_subtype(target, source)
                }
                Variance::Invariant => {
                    source == target
                        || (self.check_subtype(source, target) && self.check_subtype(target, source))
                }
            };
            if !fits {
                return false;
            }
        }
        true
    }

    /// Width and depth subtyping over properties.
    ///
    /// ## Rules:
    /// - every required target property must be present and required
    /// - present properties must fit covariantly
    /// - extra subject properties are allowed
    /// - named objects only fit the empty shape, as their properties are not
    ///   known here
    pub(crate) fn check_object_shape_target(&mut self, source_data: TypeData, target: &ObjectShape) -> bool {
        match source_data {
            TypeData::ObjectShape(source_id) => {
                let source = self.interner.object_shape(source_id);
                target.properties.iter().all(|property| {
                    match source.property(property.name) {
                        Some(found) => {
                            (property.optional || !found.optional)
                                && self.check_subtype(found.type_id, property.type_id)
                        }
                        None => property.optional,
                    }
                })
            }
            TypeData::NamedObject { .. } | TypeData::Closure(_) => target.properties.is_empty(),
            _ => false,
        }
    }
}
