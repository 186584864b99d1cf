//! Subtype rules, one module per target family.
//!
//! Every module adds `check_*` methods to
//! [`SubtypeChecker`](crate::subtype::SubtypeChecker); the dispatcher in
//! `subtype.rs` decides which one runs.

mod arrays;
mod callables;
mod intrinsics;
mod literals;
mod objects;
mod unions;
