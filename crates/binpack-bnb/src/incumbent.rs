// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Incumbent management for branch-and-bound.
//!
//! Two layers live here:
//!
//! - `SharedIncumbent`, a concurrent container for the best packing found so
//!   far. It exposes a fast, lock-free upper bound (bin count) via an atomic
//!   and stores the actual `Solution` behind a `Mutex` as the source of
//!   truth. The atomic is a heuristic to short-circuit obviously worse
//!   candidates without locking; the bound it carries only ever decreases.
//!   The sentinel `u64::MAX` means "no incumbent yet".
//! - `IncumbentStore`, a minimal interface the solver uses to read and
//!   update the best known bin count during search. `NoSharedIncumbent` is
//!   the local (single-threaded) implementation; `SharedIncumbentAdapter`
//!   wraps a borrowed `SharedIncumbent` to coordinate bounds across parallel
//!   workers.

use binpack_model::solution::Solution;
use std::sync::{Mutex, atomic::AtomicU64, atomic::Ordering};

/// A concurrent holder for the best (incumbent) packing found during search.
///
/// Concurrency and memory ordering:
/// - The upper bound is loaded/stored with `Ordering::Relaxed`. This is
///   sufficient because it serves as a heuristic to short-circuit work. All
///   correctness-sensitive state (the packing and its bin count) is
///   synchronized via the `Mutex`.
#[derive(Debug, Default)]
pub struct SharedIncumbent {
    /// Bin count of the incumbent packing stored as `u64` for atomic access.
    /// `u64::MAX` means no packing has been installed yet.
    upper_bound: AtomicU64,

    /// The incumbent packing, protected by a mutex for safe concurrent
    /// access.
    solution: Mutex<Option<Solution>>,
}

impl SharedIncumbent {
    /// Creates a new shared incumbent with no packing installed.
    #[inline]
    pub fn new() -> Self {
        SharedIncumbent {
            upper_bound: AtomicU64::new(u64::MAX),
            solution: Mutex::new(None),
        }
    }

    /// Returns the current upper bound on the optimal bin count, or
    /// `u64::MAX` when nothing is installed.
    #[inline]
    pub fn upper_bound(&self) -> u64 {
        self.upper_bound.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of the current incumbent packing, if any.
    #[inline]
    pub fn snapshot(&self) -> Option<Solution> {
        let guard = self.solution.lock().unwrap_or_else(|e| e.into_inner());
        guard.clone()
    }

    /// Attempts to install the given candidate packing as the new incumbent.
    /// Returns `true` if the candidate was installed, `false` otherwise.
    /// Only strictly better (fewer bins) candidates are installed, so the
    /// published bound decreases monotonically.
    #[inline]
    pub fn try_install(&self, candidate: &Solution) -> bool {
        let candidate_bins = candidate.bin_count() as u64;
        let current_upper_bound = self.upper_bound();

        // We are minimizing, so fewer bins is better.
        if candidate_bins >= current_upper_bound {
            return false;
        }

        let mut guard = self.solution.lock().unwrap_or_else(|e| e.into_inner());
        // Another thread might have installed a packing while we were waiting
        // for the lock. Compare against the actual solution in the Mutex, not
        // the atomic hint we read earlier.
        if let Some(current) = guard.as_ref() {
            if candidate_bins >= current.bin_count() as u64 {
                return false;
            }
        }

        *guard = Some(candidate.clone());
        self.upper_bound.store(candidate_bins, Ordering::Relaxed);

        true
    }
}

impl std::fmt::Display for SharedIncumbent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Incumbent(upper_bound: {})", self.upper_bound())
    }
}

/// Trait for managing incumbent packings in a branch-and-bound solver.
/// This abstracts over local (single-threaded) and shared (multi-worker)
/// incumbents, letting the same search loop run standalone or as part of a
/// parallel solve where workers share and update the best-known bin count.
pub trait IncumbentStore {
    /// Returns the initial upper bound on the bin count.
    fn initial_upper_bound(&self) -> u64;
    /// Synchronizes the current local best with the shared incumbent.
    fn tighten(&self, current_local_best: u64) -> u64;
    /// Notifies the backing that a new packing has been found.
    fn on_solution_found(&self, solution: &Solution);
}

/// An `IncumbentStore` implementation that does not share the incumbent
/// between solver instances. Use this for single-threaded or isolated
/// solving scenarios.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSharedIncumbent;

impl NoSharedIncumbent {
    /// Creates a new `NoSharedIncumbent` instance.
    #[inline(always)]
    pub fn new() -> Self {
        Self
    }
}

impl IncumbentStore for NoSharedIncumbent {
    #[inline(always)]
    fn initial_upper_bound(&self) -> u64 {
        u64::MAX
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: u64) -> u64 {
        current_local_best
    }

    #[inline(always)]
    fn on_solution_found(&self, _: &Solution) {}
}

/// An `IncumbentStore` implementation that shares the incumbent between
/// solver instances using a `SharedIncumbent`.
#[repr(transparent)]
#[derive(Debug, Clone)]
pub struct SharedIncumbentAdapter<'a> {
    inner: &'a SharedIncumbent,
}

impl<'a> SharedIncumbentAdapter<'a> {
    /// Creates a new `SharedIncumbentAdapter` that wraps the given
    /// `SharedIncumbent`.
    #[inline(always)]
    pub fn new(inner: &'a SharedIncumbent) -> Self {
        Self { inner }
    }
}

impl IncumbentStore for SharedIncumbentAdapter<'_> {
    #[inline(always)]
    fn initial_upper_bound(&self) -> u64 {
        self.inner.upper_bound()
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: u64) -> u64 {
        self.inner.upper_bound().min(current_local_best)
    }

    #[inline(always)]
    fn on_solution_found(&self, solution: &Solution) {
        self.inner.try_install(solution);
    }
}
