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

//! Exact solving engine for one-dimensional bin packing.
//!
//! The crate is organized around a depth-first branch-and-bound search over
//! partial packings. Items are branched in descending size order; at every
//! node the candidate moves are "place the item into one of the open bins
//! that still has room" plus exactly one "open a fresh bin" move, since all
//! empty bins are interchangeable. Subtrees are cut by an admissible lower
//! bound on the bins any completion must use, measured against the incumbent
//! (the best packing known so far, warm-started by first-fit-decreasing).
//!
//! Components:
//! - `ffd`: the deterministic first-fit-decreasing heuristic packer.
//! - `bound`: root and per-node lower bounds on the optimal bin count.
//! - `state`: the mutable partial-packing state with push/pop discipline.
//! - `bnb`: the solver and its per-run search session.
//! - `incumbent`: local and shared (atomic) incumbent stores.
//! - `monitor`: observation and cooperative termination (time/node budgets).
//! - `stats` / `result`: run telemetry and the outcome surface.

pub mod bnb;
pub mod bound;
pub mod ffd;
pub mod fixed;
pub mod incumbent;
pub mod monitor;
pub mod result;
pub mod state;
pub mod stats;
