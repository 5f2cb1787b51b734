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

//! Node limit monitors for tree search.
//!
//! `NodeLimitMonitor` terminates the search once the number of explored
//! nodes reaches a configured budget. The check reads the solver statistics
//! directly, so it costs a single comparison per command.
//!
//! `SharedNodeLimitMonitor` draws the budget from an external atomic counter
//! instead of the per-search statistics, so several searches (concurrent or
//! consecutive) can spend one common node budget.

use crate::{
    bnb::Decision,
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    state::SearchState,
    stats::BnbSolverStatistics,
};
use binpack_model::solution::Solution;
use std::sync::atomic::{AtomicU64, Ordering};

/// A tree search monitor that enforces a budget on the number of explored
/// nodes. If the budget is reached, the monitor will signal to terminate the
/// search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeLimitMonitor {
    node_limit: u64,
}

impl NodeLimitMonitor {
    /// Creates a new `NodeLimitMonitor` with the specified node budget.
    #[inline]
    pub fn new(node_limit: u64) -> Self {
        Self { node_limit }
    }

    /// Returns the configured node budget.
    #[inline]
    pub fn node_limit(&self) -> u64 {
        self.node_limit
    }
}

impl TreeSearchMonitor for NodeLimitMonitor {
    fn name(&self) -> &str {
        "NodeLimitMonitor"
    }

    fn on_enter_search(&mut self, _statistics: &BnbSolverStatistics) {}

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {}

    fn search_command(
        &mut self,
        _state: &SearchState,
        statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        if statistics.nodes_explored >= self.node_limit {
            SearchCommand::Terminate("node limit reached".into())
        } else {
            SearchCommand::Continue
        }
    }

    fn on_step(&mut self, _state: &SearchState, _statistics: &BnbSolverStatistics) {}

    fn on_lower_bound_computed(
        &mut self,
        _state: &SearchState,
        _lower_bound: usize,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    fn on_prune(
        &mut self,
        _state: &SearchState,
        _reason: PruneReason,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    fn on_decisions_enqueued(
        &mut self,
        _state: &SearchState,
        _count: usize,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    fn on_descend(
        &mut self,
        _state: &SearchState,
        _decision: Decision,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    fn on_backtrack(&mut self, _state: &SearchState, _statistics: &BnbSolverStatistics) {}

    fn on_solution_found(&mut self, _solution: &Solution, _statistics: &BnbSolverStatistics) {}
}

/// A tree search monitor that enforces a node budget shared between several
/// searches. Every `search_command` call counts one node against the shared
/// counter, so the budget covers the union of all searches ticking it,
/// whether they run concurrently or back to back.
#[derive(Debug)]
pub struct SharedNodeLimitMonitor<'a> {
    nodes_explored: &'a AtomicU64,
    node_limit: u64,
}

impl<'a> SharedNodeLimitMonitor<'a> {
    /// Creates a new `SharedNodeLimitMonitor` ticking the given counter.
    #[inline]
    pub fn new(nodes_explored: &'a AtomicU64, node_limit: u64) -> Self {
        Self {
            nodes_explored,
            node_limit,
        }
    }

    /// Returns the configured node budget.
    #[inline]
    pub fn node_limit(&self) -> u64 {
        self.node_limit
    }
}

impl TreeSearchMonitor for SharedNodeLimitMonitor<'_> {
    fn name(&self) -> &str {
        "SharedNodeLimitMonitor"
    }

    fn on_enter_search(&mut self, _statistics: &BnbSolverStatistics) {}

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {}

    fn search_command(
        &mut self,
        _state: &SearchState,
        _statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        if self.nodes_explored.fetch_add(1, Ordering::Relaxed) >= self.node_limit {
            SearchCommand::Terminate("node limit reached".into())
        } else {
            SearchCommand::Continue
        }
    }

    fn on_step(&mut self, _state: &SearchState, _statistics: &BnbSolverStatistics) {}

    fn on_lower_bound_computed(
        &mut self,
        _state: &SearchState,
        _lower_bound: usize,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    fn on_prune(
        &mut self,
        _state: &SearchState,
        _reason: PruneReason,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    fn on_decisions_enqueued(
        &mut self,
        _state: &SearchState,
        _count: usize,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    fn on_descend(
        &mut self,
        _state: &SearchState,
        _decision: Decision,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    fn on_backtrack(&mut self, _state: &SearchState, _statistics: &BnbSolverStatistics) {}

    fn on_solution_found(&mut self, _solution: &Solution, _statistics: &BnbSolverStatistics) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continues_below_budget() {
        let mut monitor = NodeLimitMonitor::new(100);
        let mut stats = BnbSolverStatistics::default();
        stats.nodes_explored = 99;

        let state = SearchState::new(1, 1, 1);
        assert_eq!(
            monitor.search_command(&state, &stats),
            SearchCommand::Continue
        );
    }

    #[test]
    fn test_terminates_at_budget() {
        let mut monitor = NodeLimitMonitor::new(100);
        let mut stats = BnbSolverStatistics::default();
        stats.nodes_explored = 100;

        let state = SearchState::new(1, 1, 1);
        match monitor.search_command(&state, &stats) {
            SearchCommand::Terminate(reason) => assert_eq!(reason, "node limit reached"),
            SearchCommand::Continue => panic!("expected Terminate"),
        }
    }

    #[test]
    fn test_zero_budget_terminates_immediately() {
        let mut monitor = NodeLimitMonitor::new(0);
        let stats = BnbSolverStatistics::default();
        let state = SearchState::new(1, 1, 1);
        assert!(matches!(
            monitor.search_command(&state, &stats),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn test_shared_budget_spans_monitors() {
        // Two monitors over the same counter model two subtree searches
        // drawing down one budget of three nodes.
        let counter = AtomicU64::new(0);
        let mut first = SharedNodeLimitMonitor::new(&counter, 3);
        let mut second = SharedNodeLimitMonitor::new(&counter, 3);

        let stats = BnbSolverStatistics::default();
        let state = SearchState::new(1, 1, 1);

        assert_eq!(first.search_command(&state, &stats), SearchCommand::Continue);
        assert_eq!(second.search_command(&state, &stats), SearchCommand::Continue);
        assert_eq!(first.search_command(&state, &stats), SearchCommand::Continue);

        // The fourth node anywhere exceeds the shared budget.
        match second.search_command(&state, &stats) {
            SearchCommand::Terminate(reason) => assert_eq!(reason, "node limit reached"),
            SearchCommand::Continue => panic!("expected Terminate"),
        }
        assert!(matches!(
            first.search_command(&state, &stats),
            SearchCommand::Terminate(_)
        ));
    }
}
