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

//! Branch-and-bound solver for one-dimensional bin packing.
//!
//! This module implements a stateful search engine that explores packings
//! depth-first while pruning suboptimal branches using bounds and an
//! incumbent. Items are branched in descending size order. At every node the
//! children are "place the item into one of the open bins with enough room"
//! plus exactly one "open a fresh bin" move; empty bins are interchangeable,
//! so a single fresh-bin child covers them all, and open bins with equal
//! free space lead to permutations of the same completions, so only the
//! first of each free-space value is branched on.
//!
//! The `BnbSolver` manages reusable internal structures, supports warm
//! starts via an incumbent, and accepts fixed placements when solving
//! carved-out subtrees (the parallel driver uses this to hand each worker a
//! root child). A search session object encapsulates per-run state,
//! statistics, and timing. Exhausting the tree certifies that the best
//! packing on record is optimal; a monitor-triggered abort surrenders that
//! certificate but keeps the packing.

use crate::{
    bound::{completion_lower_bound, lower_bound},
    fixed::FixedPlacement,
    incumbent::{IncumbentStore, NoSharedIncumbent, SharedIncumbent, SharedIncumbentAdapter},
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    result::{BnbSolverOutcome, TerminationReason},
    state::SearchState,
    stats::BnbSolverStatistics,
};
use binpack_model::{
    index::{BinIndex, ItemIndex},
    instance::Instance,
    num::SizeInt,
    solution::Solution,
};
use smallvec::SmallVec;

/// A branching decision: where the current item goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Place the item into an already-open bin.
    Place {
        item_index: ItemIndex,
        bin_index: BinIndex,
    },
    /// Open a fresh bin holding the item.
    Open { item_index: ItemIndex },
}

impl Decision {
    /// Returns the item this decision places.
    #[inline]
    pub fn item_index(&self) -> ItemIndex {
        match self {
            Decision::Place { item_index, .. } | Decision::Open { item_index } => *item_index,
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Place {
                item_index,
                bin_index,
            } => write!(f, "Place(item: {}, bin: {})", item_index, bin_index),
            Decision::Open { item_index } => write!(f, "Open(item: {})", item_index),
        }
    }
}

/// An exact branch-and-bound solver for bin packing.
///
/// This is just the execution engine; observation and cooperative
/// termination are delegated to a `TreeSearchMonitor`, and incumbent sharing
/// to an `IncumbentStore`. The solver keeps its scratch buffers (branching
/// order and widened sizes) across solves to avoid reallocation.
#[derive(Debug, Clone, Default)]
pub struct BnbSolver {
    order: Vec<ItemIndex>,
    sizes: Vec<u64>,
}

impl BnbSolver {
    /// Create a new solver instance.
    #[inline]
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            sizes: Vec::new(),
        }
    }

    /// Create a new solver instance with preallocated storage for the given
    /// number of items.
    ///
    /// # Note
    ///
    /// When you invoke the solver it will internally ensure that the scratch
    /// buffers have sufficient capacity for the given instance. Constructing
    /// the solver with preallocated storage only moves the cost of the
    /// memory allocations to construction time.
    #[inline]
    pub fn preallocated(num_items: usize) -> Self {
        Self {
            order: Vec::with_capacity(num_items),
            sizes: Vec::with_capacity(num_items),
        }
    }

    /// Solve the given instance under the provided `TreeSearchMonitor`.
    /// This variant does not use a shared incumbent and thus acts as a
    /// standalone, single-threaded solver.
    #[inline]
    pub fn solve<T, S>(&mut self, instance: &Instance<T>, monitor: S) -> BnbSolverOutcome
    where
        T: SizeInt,
        S: TreeSearchMonitor,
    {
        let backing = NoSharedIncumbent::new();
        self.solve_internal(instance, &[], monitor, backing)
    }

    /// Solve the given instance using the provided `TreeSearchMonitor` and
    /// `SharedIncumbent`. The branch-and-bound algorithm will use the
    /// incumbent to prune branches that cannot improve upon the shared best
    /// packing, and publishes its own improvements there.
    #[inline]
    pub fn solve_with_incumbent<T, S>(
        &mut self,
        instance: &Instance<T>,
        monitor: S,
        incumbent: &SharedIncumbent,
    ) -> BnbSolverOutcome
    where
        T: SizeInt,
        S: TreeSearchMonitor,
    {
        let backing = SharedIncumbentAdapter::new(incumbent);
        self.solve_internal(instance, &[], monitor, backing)
    }

    /// Solve the given instance with some items pre-placed. This variant
    /// does not use a shared incumbent.
    #[inline]
    pub fn solve_with_fixed<T, S>(
        &mut self,
        instance: &Instance<T>,
        monitor: S,
        fixed: &[FixedPlacement],
    ) -> BnbSolverOutcome
    where
        T: SizeInt,
        S: TreeSearchMonitor,
    {
        let backing = NoSharedIncumbent::new();
        self.solve_internal(instance, fixed, monitor, backing)
    }

    /// Solve the given instance with some items pre-placed, sharing the best
    /// known packing through the given `SharedIncumbent`.
    #[inline]
    pub fn solve_with_fixed_and_incumbent<T, S>(
        &mut self,
        instance: &Instance<T>,
        monitor: S,
        fixed: &[FixedPlacement],
        incumbent: &SharedIncumbent,
    ) -> BnbSolverOutcome
    where
        T: SizeInt,
        S: TreeSearchMonitor,
    {
        let backing = SharedIncumbentAdapter::new(incumbent);
        self.solve_internal(instance, fixed, monitor, backing)
    }

    /// Internal solve method that takes an `IncumbentStore`, which is
    /// usually either a `NoSharedIncumbent` or a `SharedIncumbentAdapter`.
    #[inline(always)]
    fn solve_internal<T, S, I>(
        &mut self,
        instance: &Instance<T>,
        fixed: &[FixedPlacement],
        mut monitor: S,
        backing: I,
    ) -> BnbSolverOutcome
    where
        T: SizeInt,
        S: TreeSearchMonitor,
        I: IncumbentStore,
    {
        let session = BnbSolverSearchSession::new(self, instance, fixed, &mut monitor, backing);
        let outcome = session.run();
        self.reset();
        outcome
    }

    /// Reset the scratch buffers, clearing any per-run state.
    ///
    /// # Note
    ///
    /// This does not deallocate any memory, but only resets the logical
    /// state.
    #[inline]
    fn reset(&mut self) {
        self.order.clear();
        self.sizes.clear();
    }
}

/// A search session for the exact solver. This struct encapsulates the state
/// and logic of a single search run.
struct BnbSolverSearchSession<'a, T, S, I>
where
    T: SizeInt,
    I: IncumbentStore,
{
    solver: &'a mut BnbSolver,
    instance: &'a Instance<T>,
    fixed: &'a [FixedPlacement],
    monitor: &'a mut S,
    incumbent: I,
    state: SearchState,
    capacity: u64,
    best_bins: u64,
    best_solution: Option<Solution>,
    stats: BnbSolverStatistics,
    start_time: std::time::Instant,
}

impl<T, S, I> std::fmt::Display for BnbSolverSearchSession<'_, T, S, I>
where
    T: SizeInt,
    S: TreeSearchMonitor,
    I: IncumbentStore,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let solution_str = match &self.best_solution {
            Some(solution) => format!("Solution(bins: {})", solution.bin_count()),
            None => "No packing found".to_string(),
        };
        write!(
            f,
            "SearchSession(best_bins: {}, best_solution: {}, stats: {})",
            self.best_bins, solution_str, self.stats
        )
    }
}

impl<'a, T, S, I> BnbSolverSearchSession<'a, T, S, I>
where
    T: SizeInt,
    S: TreeSearchMonitor,
    I: IncumbentStore,
{
    /// Create a new search session.
    #[inline]
    fn new(
        solver: &'a mut BnbSolver,
        instance: &'a Instance<T>,
        fixed: &'a [FixedPlacement],
        monitor: &'a mut S,
        incumbent_backing: I,
    ) -> Self {
        let state = SearchState::new(
            instance.num_items(),
            instance.total_size(),
            instance.capacity_u64(),
        );
        let best_bins = incumbent_backing.initial_upper_bound();

        Self {
            solver,
            instance,
            fixed,
            monitor,
            incumbent: incumbent_backing,
            state,
            capacity: instance.capacity_u64(),
            best_bins,
            best_solution: None,
            stats: BnbSolverStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Run the search session.
    #[inline]
    fn run(mut self) -> BnbSolverOutcome {
        self.monitor.on_enter_search(&self.stats);

        self.stats.set_root_lower_bound(lower_bound(self.instance));
        self.prepare_scratch();

        if let Err(reason) = self.apply_fixed_placements() {
            self.stats.set_total_time(self.start_time.elapsed());
            self.monitor.on_exit_search(&self.stats);
            return BnbSolverOutcome::aborted(None, reason, self.stats);
        }

        let termination_reason = match self.explore(0) {
            Ok(()) => TerminationReason::Exhausted,
            Err(reason) => TerminationReason::Aborted(reason),
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        self.finalize_result(termination_reason)
    }

    /// Finalize the solver result based on the best packing found and the
    /// termination reason.
    #[inline]
    fn finalize_result(self, reason: TerminationReason) -> BnbSolverOutcome {
        match reason {
            TerminationReason::Exhausted => match self.best_solution {
                Some(solution) => BnbSolverOutcome::optimal(solution, self.stats),
                // A warm-started search that never improves on its seed
                // exhausts the tree without a packing of its own.
                None => BnbSolverOutcome::exhausted(self.stats),
            },
            TerminationReason::Aborted(reason) => {
                BnbSolverOutcome::aborted(self.best_solution, reason, self.stats)
            }
        }
    }

    /// Fill the solver's scratch buffers: the descending branching order and
    /// the widened item sizes.
    #[inline]
    fn prepare_scratch(&mut self) {
        self.solver.order = crate::ffd::decreasing_order(self.instance);
        self.solver.sizes.clear();
        self.solver.sizes.extend(
            (0..self.instance.num_items()).map(|item| self.instance.size_u64(ItemIndex::new(item))),
        );
    }

    /// Apply the fixed placements to the search state. Placements must
    /// reference bins densely: an already-open bin, or the next fresh index.
    #[inline]
    fn apply_fixed_placements(&mut self) -> Result<(), String> {
        for placement in self.fixed {
            let item = placement.item_index;
            let bin = placement.bin_index;

            if item.get() >= self.state.num_items() {
                return Err(format!("fixed placement references unknown {}", item));
            }
            if self.state.is_item_assigned(item) {
                return Err(format!("fixed placement repeats {}", item));
            }

            let size = self.solver.sizes[item.get()];
            if bin.get() == self.state.bins_open() {
                self.state.open_new_bin(item, size);
            } else if bin.get() < self.state.bins_open() {
                if self.state.free_space(bin) < size {
                    return Err(format!(
                        "fixed placement overfills {}: {} does not fit",
                        bin, item
                    ));
                }
                self.state.place_in_open_bin(item, bin, size);
            } else {
                return Err(format!(
                    "fixed placement references {} before it is open",
                    bin
                ));
            }
        }
        Ok(())
    }

    /// Explore the subtree rooted at the current state. `cursor` is the
    /// position in the branching order from which the next unassigned item
    /// is taken. Returns `Err` with the termination message when a monitor
    /// aborts the search.
    fn explore(&mut self, cursor: usize) -> Result<(), String> {
        self.stats.on_node_explored();
        self.stats
            .on_depth_update(self.state.num_assigned_items() as u64);
        self.monitor.on_step(&self.state, &self.stats);

        if let SearchCommand::Terminate(reason) =
            self.monitor.search_command(&self.state, &self.stats)
        {
            return Err(reason);
        }

        // Pick up bound improvements from concurrent workers.
        self.best_bins = self.incumbent.tighten(self.best_bins);

        let Some(cursor) = self.next_unassigned(cursor) else {
            self.handle_complete_solution();
            return Ok(());
        };

        let node_bound = self.node_lower_bound(cursor);
        self.monitor
            .on_lower_bound_computed(&self.state, node_bound, &self.stats);
        if node_bound as u64 >= self.best_bins {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
            return Ok(());
        }

        let item = self.solver.order[cursor];
        let size = self.solver.sizes[item.get()];

        // Candidate open bins, keeping only the first of each free-space
        // value: bins with equal free space are interchangeable.
        let mut seen_free: SmallVec<[u64; 16]> = SmallVec::new();
        let mut candidates: SmallVec<[BinIndex; 16]> = SmallVec::new();
        for bin in 0..self.state.bins_open() {
            let bin = BinIndex::new(bin);
            let free = self.state.free_space(bin);
            if free < size {
                continue;
            }
            if seen_free.contains(&free) {
                self.stats.on_pruning_dominance();
                self.monitor
                    .on_prune(&self.state, PruneReason::BinDominated, &self.stats);
                continue;
            }
            seen_free.push(free);
            candidates.push(bin);
        }

        // All empty bins are interchangeable: one fresh-bin child.
        self.monitor
            .on_decisions_enqueued(&self.state, candidates.len() + 1, &self.stats);

        for bin in candidates {
            self.stats.on_decision_generated();
            self.state.place_in_open_bin(item, bin, size);
            self.monitor.on_descend(
                &self.state,
                Decision::Place {
                    item_index: item,
                    bin_index: bin,
                },
                &self.stats,
            );

            let descent = self.explore(cursor + 1);

            self.state.remove_from_open_bin(item, size);
            self.stats.on_backtrack();
            self.monitor.on_backtrack(&self.state, &self.stats);
            descent?;
        }

        self.stats.on_decision_generated();
        self.state.open_new_bin(item, size);
        self.monitor.on_descend(
            &self.state,
            Decision::Open { item_index: item },
            &self.stats,
        );

        let descent = self.explore(cursor + 1);

        self.state.close_newest_bin(item, size);
        self.stats.on_backtrack();
        self.monitor.on_backtrack(&self.state, &self.stats);
        descent
    }

    /// Returns the position of the next unassigned item in the branching
    /// order at or after `cursor`, or `None` when everything is placed.
    #[inline(always)]
    fn next_unassigned(&self, mut cursor: usize) -> Option<usize> {
        while cursor < self.solver.order.len() {
            if !self.state.is_item_assigned(self.solver.order[cursor]) {
                return Some(cursor);
            }
            cursor += 1;
        }
        None
    }

    /// Computes the completion lower bound for the current state: open bins
    /// plus the larger of the volume argument and the number of remaining
    /// items that can neither share a bin with another big item nor enter
    /// any open bin.
    #[inline(always)]
    fn node_lower_bound(&self, cursor: usize) -> usize {
        let max_free = self
            .state
            .fills()
            .iter()
            .map(|&fill| self.capacity - fill)
            .max()
            .unwrap_or(0);

        let mut stranded = 0usize;
        let mut position = cursor;
        while position < self.solver.order.len() {
            let item = self.solver.order[position];
            position += 1;
            if self.state.is_item_assigned(item) {
                continue;
            }
            let size = self.solver.sizes[item.get()];
            // Half-capacity test written subtraction-first so u64 sizes past
            // 2^63 cannot wrap.
            if size > self.capacity - size && size > max_free {
                stranded += 1;
            }
        }

        completion_lower_bound(
            self.capacity,
            self.state.bins_open(),
            self.state.open_free_total(),
            self.state.remaining_total(),
            stranded,
        )
    }

    /// Handle a complete packing found at the current state.
    #[inline(always)]
    fn handle_complete_solution(&mut self) {
        let bins = self.state.bins_open() as u64;
        if bins >= self.best_bins {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
            return;
        }

        debug_assert!(
            self.state.num_assigned_items() == self.state.num_items(),
            "called `BnbSolverSearchSession::handle_complete_solution` with {}/{} items assigned",
            self.state.num_assigned_items(),
            self.state.num_items()
        );

        let Ok(solution) = Solution::try_from(&self.state) else {
            return;
        };

        self.best_bins = bins;
        self.incumbent.on_solution_found(&solution);
        self.stats.on_solution_found();
        self.monitor.on_solution_found(&solution, &self.stats);
        self.best_solution = Some(solution);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffd::FirstFitDecreasing;
    use crate::monitor::no_op::NoOperationMonitor;
    use crate::monitor::node_limit::NodeLimitMonitor;
    use crate::result::SolverResult;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    type Size = u32;

    fn instance(sizes: &[Size], capacity: Size) -> Instance<Size> {
        Instance::new(sizes.to_vec(), capacity).expect("test instance should be valid")
    }

    fn solve_optimal(sizes: &[Size], capacity: Size) -> Solution {
        let inst = instance(sizes, capacity);
        let outcome = BnbSolver::new().solve(&inst, NoOperationMonitor::new());
        assert!(
            outcome.termination_reason().is_exhausted(),
            "search should exhaust on small instances"
        );
        match outcome.into_parts().0 {
            SolverResult::Optimal(solution) => solution,
            other => panic!("expected Optimal, got {other}"),
        }
    }

    #[test]
    fn test_perfect_pairs() {
        let solution = solve_optimal(&[5, 5, 5, 5], 10);
        assert_eq!(solution.bin_count(), 2);
        assert!(solution.verify(&instance(&[5, 5, 5, 5], 10)));
    }

    #[test]
    fn test_unit_items() {
        let solution = solve_optimal(&[1; 10], 3);
        assert_eq!(solution.bin_count(), 4);
    }

    #[test]
    fn test_each_item_needs_its_own_bin() {
        let solution = solve_optimal(&[4, 4, 4], 4);
        assert_eq!(solution.bin_count(), 3);
    }

    #[test]
    fn test_mixed_sizes() {
        // The sizes sum to 45 and four bins hold at most 44, so the optimum
        // is 5, e.g. [10] [9] [8] [7] [6,5].
        let solution = solve_optimal(&[10, 9, 8, 7, 6, 5], 11);
        assert_eq!(solution.bin_count(), 5);
        assert!(solution.verify(&instance(&[10, 9, 8, 7, 6, 5], 11)));
    }

    #[test]
    fn test_single_item() {
        let solution = solve_optimal(&[7], 10);
        assert_eq!(solution.bin_count(), 1);
    }

    #[test]
    fn test_near_max_u64_sizes() {
        // Bound and fit arithmetic must not wrap for sizes past 2^63.
        let inst = Instance::<u64>::new(vec![u64::MAX - 1, 1], u64::MAX)
            .expect("test instance should be valid");
        let outcome = BnbSolver::new().solve(&inst, NoOperationMonitor::new());

        assert!(outcome.termination_reason().is_exhausted());
        match outcome.result() {
            SolverResult::Optimal(solution) => {
                assert_eq!(solution.bin_count(), 1);
                assert!(solution.verify(&inst));
            }
            other => panic!("expected Optimal, got {other}"),
        }
    }

    #[test]
    fn test_beats_ffd_where_ffd_is_suboptimal() {
        // FFD packs this into 4 bins; the optimum is 3:
        // [5,5] [4,3,3] [4,3,3].
        let sizes: [Size; 8] = [5, 5, 4, 4, 3, 3, 3, 3];
        let inst = instance(&sizes, 10);

        let heuristic = FirstFitDecreasing::pack(&inst);
        let exact = solve_optimal(&sizes, 10);

        assert_eq!(heuristic.bin_count(), 4);
        assert_eq!(exact.bin_count(), 3);
    }

    #[test]
    fn test_warm_started_search_that_cannot_improve_is_unknown() {
        // Seed the shared incumbent with an already optimal packing; the
        // search exhausts without finding anything strictly better.
        let inst = instance(&[5, 5, 5, 5], 10);
        let shared = SharedIncumbent::new();
        assert!(shared.try_install(&FirstFitDecreasing::pack(&inst)));
        assert_eq!(shared.upper_bound(), 2);

        let outcome =
            BnbSolver::new().solve_with_incumbent(&inst, NoOperationMonitor::new(), &shared);

        assert!(outcome.termination_reason().is_exhausted());
        assert!(matches!(outcome.result(), SolverResult::Unknown));
        // The shared incumbent still holds the optimal packing.
        assert_eq!(shared.snapshot().unwrap().bin_count(), 2);
    }

    #[test]
    fn test_warm_started_search_improves_a_weak_seed() {
        // The FFD seed uses 4 bins; the search improves it to 3.
        let sizes: [Size; 8] = [5, 5, 4, 4, 3, 3, 3, 3];
        let inst = instance(&sizes, 10);
        let shared = SharedIncumbent::new();
        assert!(shared.try_install(&FirstFitDecreasing::pack(&inst)));

        let outcome =
            BnbSolver::new().solve_with_incumbent(&inst, NoOperationMonitor::new(), &shared);

        assert!(outcome.termination_reason().is_exhausted());
        match outcome.result() {
            SolverResult::Optimal(solution) => assert_eq!(solution.bin_count(), 3),
            other => panic!("expected Optimal, got {other}"),
        }
        assert_eq!(shared.upper_bound(), 3);
    }

    #[test]
    fn test_node_limit_aborts_search() {
        let inst = instance(&[10, 9, 8, 7, 6, 5, 4, 3, 2, 1], 11);
        let outcome = BnbSolver::new().solve(&inst, NodeLimitMonitor::new(1));

        match outcome.termination_reason() {
            TerminationReason::Aborted(reason) => assert_eq!(reason, "node limit reached"),
            TerminationReason::Exhausted => panic!("expected Aborted"),
        }
        assert!(outcome.statistics().nodes_explored <= 2);
    }

    #[test]
    fn test_solve_with_fixed_placements() {
        // Pin items 0 and 1 together; the optimum is still two bins.
        let inst = instance(&[5, 5, 5, 5], 10);
        let fixed = [
            FixedPlacement::new(BinIndex::new(0), ItemIndex::new(0)),
            FixedPlacement::new(BinIndex::new(0), ItemIndex::new(1)),
        ];

        let outcome = BnbSolver::new().solve_with_fixed(&inst, NoOperationMonitor::new(), &fixed);

        assert!(outcome.termination_reason().is_exhausted());
        match outcome.result() {
            SolverResult::Optimal(solution) => {
                assert_eq!(solution.bin_count(), 2);
                assert_eq!(
                    solution.bin_for_item(ItemIndex::new(0)),
                    solution.bin_for_item(ItemIndex::new(1))
                );
            }
            other => panic!("expected Optimal, got {other}"),
        }
    }

    #[test]
    fn test_invalid_fixed_placement_aborts() {
        let inst = instance(&[5, 5], 10);
        // References bin 3 before bins 0..3 are open.
        let fixed = [FixedPlacement::new(BinIndex::new(3), ItemIndex::new(0))];

        let outcome = BnbSolver::new().solve_with_fixed(&inst, NoOperationMonitor::new(), &fixed);

        assert!(matches!(outcome.result(), SolverResult::Unknown));
        assert!(!outcome.termination_reason().is_exhausted());
    }

    #[test]
    fn test_statistics_are_populated() {
        let inst = instance(&[10, 9, 8, 7, 6, 5], 11);
        let outcome = BnbSolver::new().solve(&inst, NoOperationMonitor::new());

        let stats = outcome.statistics();
        assert!(stats.nodes_explored > 0);
        assert!(stats.decisions_generated > 0);
        assert!(stats.solutions_found > 0);
        assert_eq!(stats.root_lower_bound, 5);
    }

    #[test]
    fn test_matches_brute_force_on_random_instances() {
        fn brute_force_opt(sizes: &[u32], capacity: u32) -> usize {
            fn go(sizes: &[u32], capacity: u32, fills: &mut Vec<u32>, best: &mut usize) {
                if fills.len() >= *best {
                    return;
                }
                let Some((&size, rest)) = sizes.split_first() else {
                    *best = fills.len();
                    return;
                };
                for bin in 0..fills.len() {
                    if fills[bin] + size <= capacity {
                        fills[bin] += size;
                        go(rest, capacity, fills, best);
                        fills[bin] -= size;
                    }
                }
                fills.push(size);
                go(rest, capacity, fills, best);
                fills.pop();
            }

            let mut best = sizes.len();
            let mut fills = Vec::new();
            go(sizes, capacity, &mut fills, &mut best);
            best.max(1)
        }

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..25 {
            let capacity: u32 = 12;
            let count = rng.random_range(1..=8);
            let sizes: Vec<u32> = (0..count).map(|_| rng.random_range(1..=12)).collect();

            let expected = brute_force_opt(&sizes, capacity);
            let solution = solve_optimal(&sizes, capacity);
            assert_eq!(
                solution.bin_count(),
                expected,
                "solver disagrees with brute force on {:?}/{}",
                sizes,
                capacity
            );
            assert!(solution.verify(&instance(&sizes, capacity)));
        }
    }

    #[test]
    fn test_solver_is_reusable_across_solves() {
        let mut solver = BnbSolver::preallocated(8);

        let first = instance(&[5, 5, 5, 5], 10);
        let second = instance(&[4, 4, 4], 4);

        let outcome_first = solver.solve(&first, NoOperationMonitor::new());
        let outcome_second = solver.solve(&second, NoOperationMonitor::new());

        assert_eq!(outcome_first.result().solution().unwrap().bin_count(), 2);
        assert_eq!(outcome_second.result().solution().unwrap().bin_count(), 3);
    }
}
