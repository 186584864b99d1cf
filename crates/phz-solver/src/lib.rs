//! PHP Type Algebra Solver
//!
//! A closed algebra of PHP/PHPDoc types with two core operations over it:
//!
//! - **Recursive transformation**: [`TypeReplacer`] rebuilds a type with any
//!   subset of variants overridden; template and `static` resolution are
//!   replacers.
//! - **Structural subtyping**: [`SubtypeChecker`] decides whether one type
//!   may flow where another is expected.
//!
//! Key properties:
//! - O(1) type equality via interning (`TypeId` comparison)
//! - Canonical forms built by the constructors in `type_factory`
//! - Coinductive cycle handling and bounded recursion in the subtype engine
//! - Class ancestry supplied from outside through [`ClassHierarchy`]
pub mod caches;
mod errors;
mod format;
pub mod inheritance;
mod instantiate;
mod intern;
mod lower;
pub mod recursion;
mod replacer;
mod static_resolve;
mod subtype;
mod subtype_rules;
mod type_factory;
pub mod types;
pub mod variance;
pub mod visitor;

pub use caches::{RelationCache, RelationCacheKey, RelationCacheStats};
pub use errors::{LowerError, ResolveError};
pub use format::{TypeFormatter, stringify};
pub use inheritance::{ClassHierarchy, InheritanceGraph, NoopHierarchy};
pub use instantiate::{
    TemplateArgKey, TemplateArguments, TemplateReflection, TemplateResolver, resolve_templates,
};
pub use intern::TypeInterner;
pub use lower::{DeclaredType, NativeType, TypeLowering, int_range_from_tokens};
pub use replacer::{IdentityReplacer, TypeReplacer};
pub use static_resolve::{
    ClassScope, ScopedResolver, StaticResolver, resolve_in_scope, resolve_static,
};
pub use subtype::{SubtypeChecker, SubtypePolicy, is_subtype, is_subtype_with};
pub use type_factory::ShapeField;
pub use types::{
    ArrayKey, ArrayShape, CallableShape, ConditionalSubject, ConditionalType, IntrinsicKind,
    LiteralValue, ObjectProperty, ObjectShape, Param, ParamFlags, Scalar, ShapeElement,
    TemplateAnchor, TemplateInfo, TypeData, TypeId,
};
pub use variance::Variance;
pub use visitor::{
    TemplateCollector, TypeKind, TypeKindVisitor, TypeVisitor, collect_templates,
    contains_templates, type_kind,
};
