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

use crate::stats::BnbSolverStatistics;
use binpack_model::solution::Solution;

/// Result classification of a search run.
///
/// A valid instance is never infeasible (one bin per item always packs), so
/// the variants distinguish only how strong the claim about the returned
/// packing is. `Unknown` occurs when a warm-started search exhausts the tree
/// without ever improving on the incumbent it was seeded with; the caller
/// holding that incumbent resolves the final answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult {
    /// We have found a packing and proven its optimality.
    Optimal(Solution),
    /// We have found a packing, but not proven its optimality.
    Feasible(Solution),
    /// The solver terminated without producing a packing of its own.
    Unknown,
}

impl SolverResult {
    /// Returns the packing carried by this result, if any.
    #[inline]
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolverResult::Optimal(solution) | SolverResult::Feasible(solution) => Some(solution),
            SolverResult::Unknown => None,
        }
    }
}

impl std::fmt::Display for SolverResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Optimal(solution) => {
                write!(f, "Optimal(bins={})", solution.bin_count())
            }
            SolverResult::Feasible(solution) => {
                write!(f, "Feasible(bins={})", solution.bin_count())
            }
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Why the search stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The search tree was exhausted; any packing on record is optimal.
    Exhausted,
    /// The solver aborted due to a search limit (time, nodes, etc.).
    /// The string contains information about the reason for abortion.
    Aborted(String),
}

impl TerminationReason {
    /// `true` when the full tree was explored, which certifies optimality of
    /// the best packing known at termination.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, TerminationReason::Exhausted)
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::Exhausted => write!(f, "Exhausted"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// Result of the solver after termination.
#[derive(Debug, Clone)]
pub struct BnbSolverOutcome {
    result: SolverResult,
    termination_reason: TerminationReason,
    statistics: BnbSolverStatistics,
}

impl BnbSolverOutcome {
    /// The tree was exhausted and the given packing is the best found:
    /// optimality is proven.
    #[inline]
    pub fn optimal(solution: Solution, statistics: BnbSolverStatistics) -> Self {
        Self {
            result: SolverResult::Optimal(solution),
            termination_reason: TerminationReason::Exhausted,
            statistics,
        }
    }

    /// The tree was exhausted but the search never improved on the incumbent
    /// it was seeded with. The seeding caller resolves the final answer from
    /// its incumbent snapshot.
    #[inline]
    pub fn exhausted(statistics: BnbSolverStatistics) -> Self {
        Self {
            result: SolverResult::Unknown,
            termination_reason: TerminationReason::Exhausted,
            statistics,
        }
    }

    /// A budget fired before the tree was exhausted.
    #[inline]
    pub fn aborted<R>(
        solution: Option<Solution>,
        reason: R,
        statistics: BnbSolverStatistics,
    ) -> Self
    where
        R: Into<String>,
    {
        let termination_reason = TerminationReason::Aborted(reason.into());

        let result = match solution {
            Some(solution) => SolverResult::Feasible(solution),
            None => SolverResult::Unknown,
        };

        Self {
            result,
            termination_reason,
            statistics,
        }
    }

    /// Returns the solver result.
    #[inline]
    pub fn result(&self) -> &SolverResult {
        &self.result
    }

    /// Returns the termination reason.
    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    /// Returns the solver statistics.
    #[inline]
    pub fn statistics(&self) -> &BnbSolverStatistics {
        &self.statistics
    }

    /// Consumes the outcome and returns its parts.
    #[inline]
    pub fn into_parts(self) -> (SolverResult, TerminationReason, BnbSolverStatistics) {
        (self.result, self.termination_reason, self.statistics)
    }
}
