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

//! Milepost search: the parallel branch-and-bound engine
//!
//! High-level crate that implements an exact, parallel TSP solver. Worker
//! threads pull partial tours from a shared lock-free queue, extend them
//! depth-first, prune against a shared global best, and spill
//! newly-opened subtrees back to the queue while the remaining depth is
//! large.
//!
//! Core flow
//! - Build a validated `milepost_model::Graph<T>`.
//! - Configure a `solver::TspSolver` through its builder (thread count,
//!   spill threshold).
//! - Run `solve` (or `solve_with_monitor` to observe the search) and read
//!   the `result::SolveOutcome`.
//!
//! Design highlights
//! - All shared state hangs off the solve invocation: the queue, the
//!   monotone `bound::SharedBound`, and the `stats::SearchCounters` are
//!   borrowed by scoped worker threads; no globals.
//! - Each worker owns a scratch tour and a local best; tours cross
//!   threads only by value through the queue.
//! - Termination is by queue exhaustion, guarded by a counted-worker
//!   protocol so that a worker never exits while another may still
//!   publish work.
//!
//! Module map
//! - `bound`: the shared, monotonically tightening best-cost cell.
//! - `engine`: per-worker search session (branch-and-bound, spill, loop).
//! - `error`: configuration errors.
//! - `monitor`: search observers (silent, stdout tracing).
//! - `num`: the numeric bound for distances.
//! - `result`: the outcome value of a solve.
//! - `solver`: the user-facing solver with seeding, workers and reduction.
//! - `stats`: shared counters and the aggregate run statistics.
//! - `verbosity`: the CLI-facing verbosity bit mask.

pub mod bound;
mod engine;
pub mod error;
pub mod monitor;
pub mod num;
pub mod result;
pub mod solver;
pub mod stats;
pub mod verbosity;
