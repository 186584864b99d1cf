//! Centralized limits and thresholds for the phz type system.
//!
//! Recursion limits for individual solver passes are exposed as named presets
//! in `phz_solver::recursion::RecursionProfile`; the raw numbers live here so
//! that every crate agrees on them.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum depth for subtype checking.
///
/// Types are finite trees, so every check terminates on its own. The limit
/// only protects the call stack against pathologically nested input such as
///
/// ```php
/// /** @param list<list<list<list<...>>>> $deep */
/// ```
///
/// When the limit is hit the relation is reported as "not a subtype".
pub const MAX_SUBTYPE_DEPTH: u32 = 100;

/// Maximum number of pairwise checks a single top-level subtype query may
/// perform before giving up.
///
/// Wide unions against wide unions are quadratic; this bounds the worst case.
pub const MAX_SUBTYPE_ITERATIONS: u32 = 100_000;

/// Maximum depth followed when walking declared class ancestry.
///
/// Guards against malformed hierarchies supplied by the metadata layer
/// (e.g. `class A extends B` / `class B extends A`).
pub const MAX_ANCESTRY_DEPTH: u32 = 64;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Default number of entries kept by a `RelationCache` before least recently
/// used entries are evicted.
pub const DEFAULT_RELATION_CACHE_CAPACITY: usize = 16_384;

/// Number of inline type-list slots before spilling to the heap.
///
/// Most PHP unions are `T|null` or a handful of literals.
pub const TYPE_LIST_INLINE: usize = 8;
