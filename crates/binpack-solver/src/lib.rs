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

//! # Binpack Solver
//!
//! High-level orchestration for exact bin packing. This crate wires the
//! engine pieces together behind a single entry point: validate the input,
//! warm-start with the first-fit-decreasing heuristic, and refine with
//! branch-and-bound search under configurable time and node budgets,
//! optionally across several worker threads sharing one incumbent.
//!
//! ## Modules
//!
//! - `solver`: the `solve` entry point, the `SolveOutcome` answer type, and
//!   the parallel subtree driver.
//! - `options`: `SolveOptions` with budgets, worker count, and the exact
//!   search toggle.
//! - `generate`: deterministic random instance generation for tests and
//!   benchmarks.
//!
//! ## Usage
//!
//! ```rust
//! use binpack_solver::{options::SolveOptions, solver::solve};
//!
//! let sizes: [u32; 4] = [5, 5, 5, 5];
//! let outcome = solve(&sizes, 10, &SolveOptions::default()).unwrap();
//!
//! assert_eq!(outcome.bin_count(), 2);
//! assert!(outcome.certified_optimal());
//! ```

pub mod generate;
pub mod options;
pub mod solver;
