//! Recursion guard for cycle detection, depth limiting and iteration
//! bounding in recursive type computations.
//!
//! `RecursionGuard` combines three safety mechanisms:
//! 1. **Cycle detection** via a visiting set (`FxHashSet<K>`)
//! 2. **Depth limiting** to protect the call stack
//! 3. **Iteration bounding** to cap the total work of one query
//!
//! Limits come from named [`RecursionProfile`] presets backed by
//! `phz_common::limits`, so call sites state intent instead of numbers:
//!
//! ```ignore
//! let guard = RecursionGuard::with_profile(RecursionProfile::SubtypeCheck);
//! ```
//!
//! In debug builds, dropping a guard with active entries panics, as does
//! leaving a key that was never entered.

use phz_common::limits;
use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Named recursion limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Subtype checking over `(source, target)` pairs.
    ///
    /// depth = `MAX_SUBTYPE_DEPTH`, iterations = `MAX_SUBTYPE_ITERATIONS`
    SubtypeCheck,

    /// Walking declared class ancestry.
    ///
    /// depth = `MAX_ANCESTRY_DEPTH`, iterations = 10,000
    Ancestry,

    /// Custom limits for one-off or test scenarios.
    Custom { max_depth: u32, max_iterations: u32 },
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::SubtypeCheck => limits::MAX_SUBTYPE_DEPTH,
            Self::Ancestry => limits::MAX_ANCESTRY_DEPTH,
            Self::Custom { max_depth, .. } => max_depth,
        }
    }

    pub const fn max_iterations(self) -> u32 {
        match self {
            Self::SubtypeCheck => limits::MAX_SUBTYPE_ITERATIONS,
            Self::Ancestry => 10_000,
            Self::Custom { max_iterations, .. } => max_iterations,
        }
    }
}

/// Result of attempting to enter a recursive computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    /// Proceed with the computation.
    Entered,
    /// This key is already being visited.
    Cycle,
    DepthExceeded,
    IterationExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }

    #[inline]
    pub fn is_cycle(self) -> bool {
        matches!(self, Self::Cycle)
    }

    /// Depth or iteration limit hit.
    #[inline]
    pub fn is_exceeded(self) -> bool {
        matches!(self, Self::DepthExceeded | Self::IterationExceeded)
    }
}

/// Tracks recursion state for one top-level query.
///
/// ```ignore
/// match guard.enter(key) {
///     RecursionResult::Entered => {
///         let result = do_work();
///         guard.leave(key);
///         result
///     }
///     RecursionResult::Cycle => assume_related(),
///     RecursionResult::DepthExceeded
///     | RecursionResult::IterationExceeded => give_up(),
/// }
/// ```
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    visiting: FxHashSet<K>,
    depth: u32,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
    exceeded: bool,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    /// Prefer [`with_profile`](Self::with_profile) outside of tests.
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            depth: 0,
            iterations: 0,
            max_depth,
            max_iterations,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    /// Try to enter the computation for `key`.
    ///
    /// On [`RecursionResult::Entered`] the caller **must** call
    /// [`leave`](Self::leave) with the same key when done.
    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);

        if self.iterations > self.max_iterations {
            self.exceeded = true;
            return RecursionResult::IterationExceeded;
        }
        if self.depth >= self.max_depth {
            self.exceeded = true;
            return RecursionResult::DepthExceeded;
        }
        if !self.visiting.insert(key) {
            return RecursionResult::Cycle;
        }
        self.depth += 1;
        RecursionResult::Entered
    }

    pub fn leave(&mut self, key: K) {
        let was_present = self.visiting.remove(&key);
        debug_assert!(
            was_present,
            "RecursionGuard::leave() called with a key that is not in the visiting set"
        );
        self.depth = self.depth.saturating_sub(1);
    }

    /// Run `f` inside a guarded scope, or report why entry was denied.
    pub fn scope<T>(&mut self, key: K, f: impl FnOnce() -> T) -> Result<T, RecursionResult> {
        match self.enter(key) {
            RecursionResult::Entered => {
                let result = f();
                self.leave(key);
                Ok(result)
            }
            denied => Err(denied),
        }
    }

    #[inline]
    pub fn is_visiting(&self, key: &K) -> bool {
        self.visiting.contains(key)
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Sticky until [`reset`](Self::reset).
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }

    /// Clear all state, keeping the limits.
    pub fn reset(&mut self) {
        self.visiting.clear();
        self.depth = 0;
        self.iterations = 0;
        self.exceeded = false;
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Copy> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!(
                "RecursionGuard dropped with {} active entries still in the visiting set",
                self.visiting.len(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_follow_shared_limits() {
        let p = RecursionProfile::SubtypeCheck;
        assert_eq!(p.max_depth(), limits::MAX_SUBTYPE_DEPTH);
        assert_eq!(p.max_iterations(), limits::MAX_SUBTYPE_ITERATIONS);
        assert_eq!(
            RecursionProfile::Ancestry.max_depth(),
            limits::MAX_ANCESTRY_DEPTH
        );
        let custom = RecursionProfile::Custom {
            max_depth: 7,
            max_iterations: 42,
        };
        assert_eq!(custom.max_depth(), 7);
        assert_eq!(custom.max_iterations(), 42);
    }

    #[test]
    fn enter_and_leave_track_depth() {
        let mut guard = RecursionGuard::new(10, 100);
        assert_eq!(guard.enter(1u32), RecursionResult::Entered);
        assert_eq!(guard.enter(2u32), RecursionResult::Entered);
        assert_eq!(guard.depth(), 2);
        assert!(guard.is_visiting(&1));

        guard.leave(2);
        guard.leave(1);
        assert_eq!(guard.depth(), 0);
        assert_eq!(guard.iterations(), 2);
        assert!(!guard.is_visiting(&1));
    }

    #[test]
    fn same_pair_is_a_cycle_but_reversed_pair_is_not() {
        let mut guard = RecursionGuard::new(10, 100);
        assert_eq!(guard.enter((1u32, 2u32)), RecursionResult::Entered);
        assert_eq!(guard.enter((1u32, 2u32)), RecursionResult::Cycle);
        assert_eq!(guard.enter((2u32, 1u32)), RecursionResult::Entered);
        assert!(!guard.is_exceeded());

        guard.leave((2, 1));
        guard.leave((1, 2));
    }

    #[test]
    fn depth_limit_is_sticky() {
        let mut guard = RecursionGuard::new(1, 100);
        assert_eq!(guard.enter(1u32), RecursionResult::Entered);
        assert_eq!(guard.enter(2u32), RecursionResult::DepthExceeded);
        guard.leave(1);
        assert!(guard.is_exceeded());

        guard.reset();
        assert!(!guard.is_exceeded());
        assert_eq!(guard.enter(2u32), RecursionResult::Entered);
        guard.leave(2);
    }

    #[test]
    fn iteration_limit_counts_denied_attempts() {
        let mut guard = RecursionGuard::new(100, 2);
        assert_eq!(guard.enter(1u32), RecursionResult::Entered);
        assert_eq!(guard.enter(1u32), RecursionResult::Cycle);
        assert_eq!(guard.enter(3u32), RecursionResult::IterationExceeded);
        assert!(RecursionResult::IterationExceeded.is_exceeded());
        guard.leave(1);
    }

    #[test]
    fn scope_runs_closure_and_leaves() {
        let mut guard = RecursionGuard::new(10, 100);
        assert_eq!(guard.scope(1u32, || 42), Ok(42));
        assert_eq!(guard.depth(), 0);

        let mut blocked = RecursionGuard::new(0, 100);
        assert_eq!(
            blocked.scope(1u32, || 42),
            Err(RecursionResult::DepthExceeded)
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "not in the visiting set")]
    fn leave_without_enter_panics_in_debug() {
        let mut guard = RecursionGuard::<u32>::new(10, 100);
        guard.leave(1);
    }
}
