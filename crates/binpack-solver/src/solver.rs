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

//! # Orchestrated Bin Packing Solver
//!
//! The `solve` entry point validates the input, packs it with the
//! first-fit-decreasing heuristic, and refines the result with exact
//! branch-and-bound search under the configured budgets.
//!
//! ## Pipeline
//!
//! 1. Build a validated `Instance` (propagating `InvalidInstance`).
//! 2. Pack with FFD and install the packing into a `SharedIncumbent`.
//! 3. Compare the heuristic bin count against the instance lower bound; a
//!    match certifies the heuristic packing without any search.
//! 4. Otherwise run the exact search: a single worker explores the whole
//!    tree, or `num_workers` scoped threads explore disjoint subtrees carved
//!    out by fixed root prefixes, all pruning against the shared incumbent.
//! 5. The answer is the incumbent snapshot; it is certified optimal exactly
//!    when every worker exhausted its subtree.
//!
//! Budgets surface as an uncertified answer, never as an error: the packing
//! returned is the best one found before the budget fired. Both budgets are
//! solve-wide: a single deadline and a single explored-node counter cover
//! every worker and every subtree prefix of the run.

use crate::options::SolveOptions;
use binpack_bnb::{
    bnb::BnbSolver,
    bound::lower_bound,
    ffd::FirstFitDecreasing,
    fixed::FixedPlacement,
    incumbent::SharedIncumbent,
    monitor::{
        composite::CompositeTreeSearchMonitor, node_limit::SharedNodeLimitMonitor,
        time_limit::DeadlineMonitor,
    },
    stats::BnbSolverStatistics,
};
use binpack_model::{
    index::BinIndex,
    instance::{Instance, InvalidInstance},
    num::SizeInt,
    solution::Solution,
};
use std::sync::atomic::AtomicU64;
use std::time::Instant;

/// How deep the root prefix enumeration may go when carving subtrees for
/// parallel workers. The prefix count grows roughly with the number of
/// distinct fills per level, so a shallow cap is plenty.
const MAX_SPLIT_DEPTH: usize = 12;

/// The answer of a solve run: the best packing found, whether its
/// optimality is proven, and the accumulated search statistics.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    solution: Solution,
    certified_optimal: bool,
    statistics: BnbSolverStatistics,
}

impl SolveOutcome {
    /// Returns the best packing found.
    #[inline]
    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    /// Returns the number of bins the packing uses.
    #[inline]
    pub fn bin_count(&self) -> usize {
        self.solution.bin_count()
    }

    /// `true` when the packing is proven optimal: either the heuristic
    /// matched the instance lower bound, or the exact search exhausted the
    /// tree on every worker.
    #[inline]
    pub fn certified_optimal(&self) -> bool {
        self.certified_optimal
    }

    /// Returns the accumulated statistics of the run.
    #[inline]
    pub fn statistics(&self) -> &BnbSolverStatistics {
        &self.statistics
    }

    /// Consumes the outcome and returns the packing.
    #[inline]
    pub fn into_solution(self) -> Solution {
        self.solution
    }
}

impl std::fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolveOutcome(bins: {}, certified_optimal: {})",
            self.bin_count(),
            self.certified_optimal
        )
    }
}

/// Packs the given items into the minimum number of bins of the given
/// capacity, as far as the configured budgets allow.
///
/// # Errors
///
/// Returns `InvalidInstance` when the input violates the instance rules:
/// zero capacity, no items, zero-size items, or an item larger than the
/// capacity.
pub fn solve<T>(
    sizes: &[T],
    capacity: T,
    options: &SolveOptions,
) -> Result<SolveOutcome, InvalidInstance>
where
    T: SizeInt,
{
    let instance = Instance::new(sizes.to_vec(), capacity)?;
    Ok(solve_instance(&instance, options))
}

/// Like [`solve`], but for an already validated instance.
pub fn solve_instance<T>(instance: &Instance<T>, options: &SolveOptions) -> SolveOutcome
where
    T: SizeInt,
{
    let start_time = Instant::now();

    let warm_start = FirstFitDecreasing::pack(instance);
    let root_lower_bound = lower_bound(instance);

    // The heuristic meeting the lower bound certifies it outright.
    if !options.use_exact_search() || warm_start.bin_count() == root_lower_bound {
        let certified = warm_start.bin_count() == root_lower_bound;
        let mut statistics = BnbSolverStatistics::default();
        statistics.set_root_lower_bound(root_lower_bound);
        statistics.set_total_time(start_time.elapsed());
        return SolveOutcome {
            solution: warm_start,
            certified_optimal: certified,
            statistics,
        };
    }

    let incumbent = SharedIncumbent::new();
    incumbent.try_install(&warm_start);

    let budget = SearchBudget::new(options, start_time);

    let (exhausted, mut statistics) = match options.num_workers() {
        1 => run_single_worker(instance, &budget, &incumbent),
        workers => run_parallel_workers(instance, &budget, &incumbent, workers),
    };

    statistics.set_total_time(start_time.elapsed());

    // The incumbent holds at least the warm start.
    let solution = match incumbent.snapshot() {
        Some(solution) => solution,
        None => warm_start,
    };

    SolveOutcome {
        solution,
        certified_optimal: exhausted,
        statistics,
    }
}

/// The solve-wide search budgets: one wall-clock deadline and one explored
/// node counter, shared by every subtree search of the run. Workers build
/// their monitor stacks against this, so running many searches (across
/// prefixes or threads) never multiplies the configured limits.
struct SearchBudget {
    deadline: Option<Instant>,
    nodes_explored: AtomicU64,
    node_limit: Option<u64>,
}

impl SearchBudget {
    fn new(options: &SolveOptions, start_time: Instant) -> Self {
        Self {
            deadline: options.time_limit().map(|limit| start_time + limit),
            nodes_explored: AtomicU64::new(0),
            node_limit: options.node_limit(),
        }
    }

    /// Builds a monitor stack drawing on the shared budgets.
    fn monitors(&self) -> CompositeTreeSearchMonitor<'_> {
        let mut monitor = CompositeTreeSearchMonitor::new();
        if let Some(deadline) = self.deadline {
            monitor.add_monitor(DeadlineMonitor::new(deadline));
        }
        if let Some(limit) = self.node_limit {
            monitor.add_monitor(SharedNodeLimitMonitor::new(&self.nodes_explored, limit));
        }
        monitor
    }
}

fn run_single_worker<T>(
    instance: &Instance<T>,
    budget: &SearchBudget,
    incumbent: &SharedIncumbent,
) -> (bool, BnbSolverStatistics)
where
    T: SizeInt,
{
    let mut solver = BnbSolver::preallocated(instance.num_items());
    let outcome = solver.solve_with_incumbent(instance, budget.monitors(), incumbent);
    let (_, termination_reason, statistics) = outcome.into_parts();
    (termination_reason.is_exhausted(), statistics)
}

fn run_parallel_workers<T>(
    instance: &Instance<T>,
    budget: &SearchBudget,
    incumbent: &SharedIncumbent,
    num_workers: usize,
) -> (bool, BnbSolverStatistics)
where
    T: SizeInt,
{
    let prefixes = enumerate_prefixes(instance, num_workers);

    // Round-robin the prefixes across the workers.
    let mut chunks: Vec<Vec<Vec<FixedPlacement>>> = vec![Vec::new(); num_workers];
    for (index, prefix) in prefixes.into_iter().enumerate() {
        chunks[index % num_workers].push(prefix);
    }

    let mut exhausted_all = true;
    let mut statistics = BnbSolverStatistics::default();

    std::thread::scope(|scope| {
        let mut handles = Vec::with_capacity(num_workers);

        for chunk in chunks {
            if chunk.is_empty() {
                continue;
            }
            let handle = scope.spawn(move || {
                let mut solver = BnbSolver::preallocated(instance.num_items());
                let mut worker_stats = BnbSolverStatistics::default();
                let mut worker_exhausted = true;

                for prefix in &chunk {
                    let outcome = solver.solve_with_fixed_and_incumbent(
                        instance,
                        budget.monitors(),
                        prefix,
                        incumbent,
                    );
                    let (_, termination_reason, stats) = outcome.into_parts();
                    worker_exhausted &= termination_reason.is_exhausted();
                    worker_stats.merge(&stats);
                }

                (worker_exhausted, worker_stats)
            });
            handles.push(handle);
        }

        for handle in handles {
            let (worker_exhausted, worker_stats) =
                handle.join().expect("search worker thread panicked");
            exhausted_all &= worker_exhausted;
            statistics.merge(&worker_stats);
        }
    });

    (exhausted_all, statistics)
}

/// Enumerates fixed-placement prefixes whose subtrees partition the search
/// space, by expanding the first items of the branching order with the same
/// child rules the search uses (open bins deduplicated by free space, one
/// fresh bin). Expansion stops once at least `target` prefixes exist or the
/// depth cap is hit.
fn enumerate_prefixes<T>(instance: &Instance<T>, target: usize) -> Vec<Vec<FixedPlacement>>
where
    T: SizeInt,
{
    let order = binpack_bnb::ffd::decreasing_order(instance);
    let capacity = instance.capacity_u64();

    // Each frontier entry carries its placements plus the bin fills they
    // imply, in opening order.
    let mut frontier: Vec<(Vec<FixedPlacement>, Vec<u64>)> = vec![(Vec::new(), Vec::new())];

    for (depth, &item) in order.iter().enumerate() {
        if frontier.len() >= target || depth >= MAX_SPLIT_DEPTH {
            break;
        }
        let size = instance.size_u64(item);

        let mut next = Vec::with_capacity(frontier.len() * 2);
        for (prefix, fills) in frontier {
            let mut seen_free: Vec<u64> = Vec::with_capacity(fills.len());
            for (bin, &fill) in fills.iter().enumerate() {
                let free = capacity - fill;
                if free < size || seen_free.contains(&free) {
                    continue;
                }
                seen_free.push(free);

                let mut child_prefix = prefix.clone();
                child_prefix.push(FixedPlacement::new(BinIndex::new(bin), item));
                let mut child_fills = fills.clone();
                child_fills[bin] += size;
                next.push((child_prefix, child_fills));
            }

            let mut child_prefix = prefix;
            child_prefix.push(FixedPlacement::new(BinIndex::new(fills.len()), item));
            let mut child_fills = fills;
            child_fills.push(size);
            next.push((child_prefix, child_fills));
        }
        frontier = next;
    }

    frontier.into_iter().map(|(prefix, _)| prefix).collect()
}
