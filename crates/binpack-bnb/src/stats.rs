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

use std::time::Duration;

/// Statistics collected during the execution of the branch-and-bound packer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BnbSolverStatistics {
    /// Total nodes visited.
    pub nodes_explored: u64,
    /// Total leaf nodes reached or dead-ends hit.
    pub backtracks: u64,
    /// Total distinct branching choices generated.
    pub decisions_generated: u64,
    /// The deepest level reached in the tree.
    pub max_depth: u64,
    /// Pruned because the node's lower bound met or exceeded the incumbent.
    pub prunings_bound: u64,
    /// Pruned because an equivalent open bin was already branched on
    /// (equal-free-space dominance and fresh-bin symmetry).
    pub prunings_dominance: u64,
    /// Total improving packings found during the search.
    pub solutions_found: u64,
    /// Total time spent in the solver.
    pub time_total: Duration,
    /// The lower bound at the root node. Used to measure the optimality gap.
    pub root_lower_bound: usize,
}

impl Default for BnbSolverStatistics {
    fn default() -> Self {
        Self {
            nodes_explored: 0,
            backtracks: 0,
            decisions_generated: 0,
            max_depth: 0,
            prunings_bound: 0,
            prunings_dominance: 0,
            solutions_found: 0,
            time_total: Duration::ZERO,
            root_lower_bound: 0,
        }
    }
}

impl BnbSolverStatistics {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_decision_generated(&mut self) {
        self.decisions_generated = self.decisions_generated.saturating_add(1);
    }

    /// Records a pruning event caused by the bin-count bound (either local or
    /// against the shared incumbent).
    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    /// Records a pruning event caused by bin equivalence: a second fresh bin
    /// or an open bin with the same free space as one already tried.
    #[inline]
    pub fn on_pruning_dominance(&mut self) {
        self.prunings_dominance = self.prunings_dominance.saturating_add(1);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    #[inline]
    pub fn set_root_lower_bound(&mut self, bound: usize) {
        self.root_lower_bound = bound;
    }

    /// Folds another run's counters into this one. Used to aggregate the
    /// per-worker statistics of a parallel search; `max_depth` and
    /// `root_lower_bound` take the maximum, `time_total` the wall-clock
    /// maximum since workers run concurrently.
    pub fn merge(&mut self, other: &BnbSolverStatistics) {
        self.nodes_explored = self.nodes_explored.saturating_add(other.nodes_explored);
        self.backtracks = self.backtracks.saturating_add(other.backtracks);
        self.decisions_generated = self
            .decisions_generated
            .saturating_add(other.decisions_generated);
        self.max_depth = self.max_depth.max(other.max_depth);
        self.prunings_bound = self.prunings_bound.saturating_add(other.prunings_bound);
        self.prunings_dominance = self
            .prunings_dominance
            .saturating_add(other.prunings_dominance);
        self.solutions_found = self.solutions_found.saturating_add(other.solutions_found);
        self.time_total = self.time_total.max(other.time_total);
        self.root_lower_bound = self.root_lower_bound.max(other.root_lower_bound);
    }
}

impl std::fmt::Display for BnbSolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Binpack-BnB Solver Statistics:")?;
        writeln!(f, "  Nodes explored:       {}", self.nodes_explored)?;
        writeln!(f, "  Backtracks:           {}", self.backtracks)?;
        writeln!(f, "  Max depth reached:    {}", self.max_depth)?;
        writeln!(f, "  Decisions generated:  {}", self.decisions_generated)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Prunings (dominance): {}", self.prunings_dominance)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "  Root Lower Bound:     {}", self.root_lower_bound)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_all_zero() {
        let stats = BnbSolverStatistics::default();
        assert_eq!(stats.nodes_explored, 0);
        assert_eq!(stats.backtracks, 0);
        assert_eq!(stats.decisions_generated, 0);
        assert_eq!(stats.max_depth, 0);
        assert_eq!(stats.prunings_bound, 0);
        assert_eq!(stats.prunings_dominance, 0);
        assert_eq!(stats.solutions_found, 0);
        assert_eq!(stats.time_total, Duration::ZERO);
        assert_eq!(stats.root_lower_bound, 0);
    }

    #[test]
    fn test_bump_methods_increment() {
        let mut stats = BnbSolverStatistics::default();

        stats.on_node_explored();
        stats.on_node_explored();
        stats.on_backtrack();
        stats.on_decision_generated();
        stats.on_pruning_bound();
        stats.on_pruning_dominance();
        stats.on_solution_found();

        assert_eq!(stats.nodes_explored, 2);
        assert_eq!(stats.backtracks, 1);
        assert_eq!(stats.decisions_generated, 1);
        assert_eq!(stats.prunings_bound, 1);
        assert_eq!(stats.prunings_dominance, 1);
        assert_eq!(stats.solutions_found, 1);
    }

    #[test]
    fn test_depth_update_keeps_maximum() {
        let mut stats = BnbSolverStatistics::default();
        stats.on_depth_update(3);
        stats.on_depth_update(7);
        stats.on_depth_update(5);
        assert_eq!(stats.max_depth, 7);
    }

    #[test]
    fn test_merge_sums_counters_and_maxes_depth() {
        let mut left = BnbSolverStatistics {
            nodes_explored: 10,
            backtracks: 4,
            decisions_generated: 20,
            max_depth: 5,
            prunings_bound: 3,
            prunings_dominance: 2,
            solutions_found: 1,
            time_total: Duration::from_millis(30),
            root_lower_bound: 4,
        };
        let right = BnbSolverStatistics {
            nodes_explored: 6,
            backtracks: 2,
            decisions_generated: 12,
            max_depth: 8,
            prunings_bound: 1,
            prunings_dominance: 5,
            solutions_found: 2,
            time_total: Duration::from_millis(50),
            root_lower_bound: 4,
        };

        left.merge(&right);

        assert_eq!(left.nodes_explored, 16);
        assert_eq!(left.backtracks, 6);
        assert_eq!(left.decisions_generated, 32);
        assert_eq!(left.max_depth, 8);
        assert_eq!(left.prunings_bound, 4);
        assert_eq!(left.prunings_dominance, 7);
        assert_eq!(left.solutions_found, 3);
        assert_eq!(left.time_total, Duration::from_millis(50));
        assert_eq!(left.root_lower_bound, 4);
    }

    #[test]
    fn test_display_contains_all_counters() {
        let mut stats = BnbSolverStatistics::default();
        stats.set_root_lower_bound(3);
        stats.set_total_time(Duration::from_millis(12));

        let text = format!("{}", stats);
        assert!(text.contains("Binpack-BnB Solver Statistics:"));
        assert!(text.contains("Nodes explored:"));
        assert!(text.contains("Root Lower Bound:     3"));
    }
}
