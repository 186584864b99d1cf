//! Declared variance of template parameters.

use serde::{Deserialize, Serialize};

/// How a generic argument position relates subtyping of the argument to
/// subtyping of the whole type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variance {
    /// Arguments must be mutual subtypes.
    #[default]
    Invariant,
    /// `A <: B` implies `C<A> <: C<B>`.
    Covariant,
    /// `A <: B` implies `C<B> <: C<A>`.
    Contravariant,
    /// Either direction suffices.
    Bivariant,
}
