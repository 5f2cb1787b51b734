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

//! Time limit monitors for tree search.
//!
//! `TimeLimitMonitor` implements `TreeSearchMonitor` and enforces a
//! wall-clock time budget for the search. It resets its clock at the start,
//! checks elapsed time at masked node intervals to minimize overhead, and
//! signals termination when the configured limit is reached. Once expired it
//! keeps signaling termination without consulting the clock again.
//!
//! `DeadlineMonitor` enforces a fixed wall-clock deadline instead of a
//! per-search duration. Its clock is never reset by `on_enter_search`, so a
//! driver that runs one search per subtree can hand every search the same
//! deadline and have them share a single time budget.
//!
//! Construct with `new(limit)` or `with_clock_check_mask(limit, mask)` to
//! tune how frequently the clock is checked versus search throughput.

use crate::{
    bnb::Decision,
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    state::SearchState,
    stats::BnbSolverStatistics,
};
use binpack_model::solution::Solution;
use std::time::{Duration, Instant};

/// A tree search monitor that enforces a time limit on the search process.
/// If the time limit is exceeded, the monitor will signal to terminate the
/// search. It uses a node mask to limit clock checks, reducing overhead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLimitMonitor {
    start_time: Instant,
    time_limit: Duration,
    clock_check_mask: u64,
    expired: bool,
}

impl TimeLimitMonitor {
    /// Default mask for clock checks to avoid excessive time checks.
    /// This mask checks the clock every 16384 nodes.
    const DEFAULT_CLOCK_CHECK_MASK: u64 = 0x3FFF;

    /// Creates a new `TimeLimitMonitor` with the specified time limit.
    pub fn new(time_limit: Duration) -> Self {
        Self {
            start_time: Instant::now(),
            time_limit,
            clock_check_mask: Self::DEFAULT_CLOCK_CHECK_MASK,
            expired: false,
        }
    }

    /// Creates a new `TimeLimitMonitor` with the specified time limit and
    /// clock check mask.
    pub fn with_clock_check_mask(time_limit: Duration, mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            time_limit,
            clock_check_mask: mask,
            expired: false,
        }
    }

    /// Returns the configured time limit.
    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

impl TreeSearchMonitor for TimeLimitMonitor {
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _statistics: &BnbSolverStatistics) {
        self.start_time = Instant::now();
        self.expired = false;
    }

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {}

    fn search_command(
        &mut self,
        _state: &SearchState,
        statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        if !self.expired {
            if (statistics.nodes_explored & self.clock_check_mask) != 0 {
                return SearchCommand::Continue;
            }
            if self.start_time.elapsed() < self.time_limit {
                return SearchCommand::Continue;
            }
            self.expired = true;
        }
        SearchCommand::Terminate("time limit reached".into())
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

/// A tree search monitor that terminates the search once a fixed wall-clock
/// deadline has passed. Unlike `TimeLimitMonitor` the deadline survives
/// `on_enter_search`, so consecutive searches driven through the same
/// monitor draw down one shared time budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineMonitor {
    deadline: Instant,
    clock_check_mask: u64,
    expired: bool,
}

impl DeadlineMonitor {
    /// Creates a new `DeadlineMonitor` with the specified deadline.
    pub fn new(deadline: Instant) -> Self {
        Self {
            deadline,
            clock_check_mask: TimeLimitMonitor::DEFAULT_CLOCK_CHECK_MASK,
            expired: false,
        }
    }

    /// Creates a new `DeadlineMonitor` with the specified deadline and clock
    /// check mask.
    pub fn with_clock_check_mask(deadline: Instant, mask: u64) -> Self {
        Self {
            deadline,
            clock_check_mask: mask,
            expired: false,
        }
    }

    /// Returns the configured deadline.
    #[inline]
    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

impl TreeSearchMonitor for DeadlineMonitor {
    fn name(&self) -> &str {
        "DeadlineMonitor"
    }

    fn on_enter_search(&mut self, _statistics: &BnbSolverStatistics) {}

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {}

    fn search_command(
        &mut self,
        _state: &SearchState,
        statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        if !self.expired {
            if (statistics.nodes_explored & self.clock_check_mask) != 0 {
                return SearchCommand::Continue;
            }
            if Instant::now() < self.deadline {
                return SearchCommand::Continue;
            }
            self.expired = true;
        }
        SearchCommand::Terminate("time limit reached".into())
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
    fn test_continues_within_budget() {
        let mut monitor = TimeLimitMonitor::with_clock_check_mask(Duration::from_secs(3600), 0);
        let stats = BnbSolverStatistics::default();
        monitor.on_enter_search(&stats);

        let state = SearchState::new(1, 1, 1);
        assert_eq!(
            monitor.search_command(&state, &stats),
            SearchCommand::Continue
        );
    }

    #[test]
    fn test_terminates_after_budget() {
        // Mask 0 forces a clock check on every call.
        let mut monitor = TimeLimitMonitor::with_clock_check_mask(Duration::ZERO, 0);
        let stats = BnbSolverStatistics::default();
        monitor.on_enter_search(&stats);

        let state = SearchState::new(1, 1, 1);
        match monitor.search_command(&state, &stats) {
            SearchCommand::Terminate(reason) => assert_eq!(reason, "time limit reached"),
            SearchCommand::Continue => panic!("expected Terminate"),
        }

        // Stays expired on subsequent calls even at masked-off node counts.
        let mut stats = stats;
        stats.nodes_explored = 7;
        assert!(matches!(
            monitor.search_command(&state, &stats),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn test_mask_skips_clock_checks() {
        let mut monitor = TimeLimitMonitor::with_clock_check_mask(Duration::ZERO, 0x3FFF);
        let mut stats = BnbSolverStatistics::default();
        monitor.on_enter_search(&stats);

        // Node count not on the mask boundary: no clock check, keeps going
        // even though the budget is already spent.
        stats.nodes_explored = 5;
        let state = SearchState::new(1, 1, 1);
        assert_eq!(
            monitor.search_command(&state, &stats),
            SearchCommand::Continue
        );
    }

    #[test]
    fn test_enter_search_resets_expiry() {
        let mut monitor = TimeLimitMonitor::with_clock_check_mask(Duration::ZERO, 0);
        let stats = BnbSolverStatistics::default();
        let state = SearchState::new(1, 1, 1);

        monitor.on_enter_search(&stats);
        assert!(matches!(
            monitor.search_command(&state, &stats),
            SearchCommand::Terminate(_)
        ));

        // A fresh search with a fresh clock starts unexpired; with a zero
        // budget it expires again on the first check, but through the clock
        // path rather than the sticky flag.
        monitor.on_enter_search(&stats);
        assert!(!monitor.expired);
    }

    #[test]
    fn test_deadline_in_the_future_continues() {
        let deadline = Instant::now() + Duration::from_secs(3600);
        let mut monitor = DeadlineMonitor::with_clock_check_mask(deadline, 0);
        let stats = BnbSolverStatistics::default();
        monitor.on_enter_search(&stats);

        let state = SearchState::new(1, 1, 1);
        assert_eq!(
            monitor.search_command(&state, &stats),
            SearchCommand::Continue
        );
    }

    #[test]
    fn test_deadline_survives_enter_search() {
        // An elapsed deadline stays elapsed across searches; this is what
        // lets consecutive subtree searches share one time budget.
        let mut monitor = DeadlineMonitor::with_clock_check_mask(Instant::now(), 0);
        let stats = BnbSolverStatistics::default();
        let state = SearchState::new(1, 1, 1);

        monitor.on_enter_search(&stats);
        match monitor.search_command(&state, &stats) {
            SearchCommand::Terminate(reason) => assert_eq!(reason, "time limit reached"),
            SearchCommand::Continue => panic!("expected Terminate"),
        }

        monitor.on_enter_search(&stats);
        assert!(matches!(
            monitor.search_command(&state, &stats),
            SearchCommand::Terminate(_)
        ));
    }
}
