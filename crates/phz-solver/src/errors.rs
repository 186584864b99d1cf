//! Error types for the fallible edges of the solver.
//!
//! The algebra itself never fails: every constructor builds a well-formed
//! type. Errors only arise when foreign input is mapped into the algebra
//! ([`LowerError`]) or when late-bound names are resolved without the class
//! context they need ([`ResolveError`]).

use thiserror::Error;

/// A type name or shape that cannot be mapped into the algebra.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LowerError {
    #[error("unsupported type `{0}`")]
    UnsupportedType(String),

    #[error("`{name}` expects {expected} type argument(s), found {found}")]
    InvalidArgumentCount {
        name: String,
        expected: String,
        found: usize,
    },

    #[error("invalid int range bound `{0}`")]
    InvalidIntRangeBound(String),
}

/// Failure to resolve `self`, `parent` or `static`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("`{keyword}` used outside of class scope")]
    OutsideClassScope { keyword: &'static str },

    #[error("`parent` used in class `{class}` which has no parent")]
    NoParentClass { class: String },
}
