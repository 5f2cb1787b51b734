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

//! Configuration for a solve run.

use std::time::Duration;

/// Options controlling a solve run. Construct with the builder methods:
///
/// ```rust
/// use binpack_solver::options::SolveOptions;
/// use std::time::Duration;
///
/// let options = SolveOptions::new()
///     .with_time_limit(Duration::from_secs(30))
///     .with_num_workers(4);
/// ```
///
/// Defaults: no time limit, no node limit, exact search enabled, one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOptions {
    time_limit: Option<Duration>,
    node_limit: Option<u64>,
    use_exact_search: bool,
    num_workers: usize,
}

impl Default for SolveOptions {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SolveOptions {
    #[inline]
    pub fn new() -> Self {
        Self {
            time_limit: None,
            node_limit: None,
            use_exact_search: true,
            num_workers: 1,
        }
    }

    /// Sets a wall-clock budget for the exact search. When it fires the best
    /// packing found so far is returned without an optimality certificate.
    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Sets a node budget for the exact search. The budget is shared by all
    /// search workers: explored nodes count against one solve-wide total.
    #[inline]
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// Enables or disables the exact search. With exact search disabled the
    /// solver returns the heuristic packing, certified only when it already
    /// matches the instance lower bound.
    #[inline]
    pub fn with_exact_search(mut self, enabled: bool) -> Self {
        self.use_exact_search = enabled;
        self
    }

    /// Sets the number of worker threads for the exact search. Values below
    /// one are treated as one.
    #[inline]
    pub fn with_num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    /// Returns the configured time limit.
    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    #[inline]
    pub fn has_time_limit(&self) -> bool {
        self.time_limit.is_some()
    }

    /// Returns the configured solve-wide node limit.
    #[inline]
    pub fn node_limit(&self) -> Option<u64> {
        self.node_limit
    }

    #[inline]
    pub fn has_node_limit(&self) -> bool {
        self.node_limit.is_some()
    }

    /// `true` when the exact search runs after the heuristic warm start.
    #[inline]
    pub fn use_exact_search(&self) -> bool {
        self.use_exact_search
    }

    /// Returns the effective worker count, never less than one.
    #[inline]
    pub fn num_workers(&self) -> usize {
        self.num_workers.max(1)
    }
}

impl std::fmt::Display for SolveOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let time_limit = match self.time_limit {
            Some(limit) => format!("{:?}", limit),
            None => "unbounded".to_string(),
        };
        let node_limit = match self.node_limit {
            Some(limit) => limit.to_string(),
            None => "unbounded".to_string(),
        };
        write!(
            f,
            "SolveOptions(time_limit: {}, node_limit: {}, exact_search: {}, workers: {})",
            time_limit,
            node_limit,
            self.use_exact_search,
            self.num_workers()
        )
    }
}
