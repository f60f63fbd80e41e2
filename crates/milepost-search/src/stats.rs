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

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Shared counters maintained by all workers during a solve.
///
/// The counters never influence the search result, so they are updated
/// with relaxed atomics; totals are exact once the workers have joined.
#[derive(Debug)]
pub struct SearchCounters {
    /// Complete tours evaluated (leaves closed and costed).
    verified: AtomicU64,
    /// Times a worker recorded a strictly shorter tour locally.
    found: AtomicU64,
    /// Pruning hits, indexed by the tour length at the pruning point.
    bound: Vec<AtomicU64>,
    /// Tasks taken from the work queue.
    dequeued: AtomicU64,
    /// Tasks published back to the queue by the spill phase.
    spilled: AtomicU64,
}

impl SearchCounters {
    /// Creates zeroed counters for a graph of the given size.
    pub fn new(num_cities: usize) -> Self {
        Self {
            verified: AtomicU64::new(0),
            found: AtomicU64::new(0),
            bound: (0..num_cities).map(|_| AtomicU64::new(0)).collect(),
            dequeued: AtomicU64::new(0),
            spilled: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn on_verified(&self) {
        self.verified.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn on_found(&self) {
        self.found.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a pruning hit at the given tour length.
    #[inline]
    pub fn on_bound(&self, level: usize) {
        debug_assert!(
            level < self.bound.len(),
            "called `SearchCounters::on_bound` with level out of bounds: the len is {} but the level is {}",
            self.bound.len(),
            level
        );
        self.bound[level].fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn on_dequeued(&self) {
        self.dequeued.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn on_spilled(&self, children: u64) {
        self.spilled.fetch_add(children, Ordering::Relaxed);
    }

    /// Returns the number of complete tours evaluated.
    #[inline]
    pub fn verified(&self) -> u64 {
        self.verified.load(Ordering::Relaxed)
    }

    /// Returns the number of locally recorded improvements.
    #[inline]
    pub fn found(&self) -> u64 {
        self.found.load(Ordering::Relaxed)
    }

    /// Returns the pruning hits per tour length.
    pub fn bound_per_level(&self) -> Vec<u64> {
        self.bound
            .iter()
            .map(|counter| counter.load(Ordering::Relaxed))
            .collect()
    }

    /// Returns the total pruning hits over all levels.
    pub fn bound_total(&self) -> u64 {
        self.bound
            .iter()
            .map(|counter| counter.load(Ordering::Relaxed))
            .sum()
    }

    /// Returns the number of tasks taken from the queue.
    #[inline]
    pub fn dequeued(&self) -> u64 {
        self.dequeued.load(Ordering::Relaxed)
    }

    /// Returns the number of tasks published by spilling.
    #[inline]
    pub fn spilled(&self) -> u64 {
        self.spilled.load(Ordering::Relaxed)
    }
}

impl std::fmt::Display for SearchCounters {
    /// Renders the counters block.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "verified: {}", self.verified())?;
        writeln!(f, "found shorter: {}", self.found())?;
        write!(f, "bound (per level):")?;
        for hits in self.bound_per_level() {
            write!(f, " {}", hits)?;
        }
        writeln!(f)
    }
}

/// Aggregate statistics of one finished solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveStatistics {
    /// Number of worker threads used.
    pub threads: usize,
    /// Tasks taken from the work queue.
    pub tasks_dequeued: u64,
    /// Tasks published back to the queue by spilling.
    pub tasks_spilled: u64,
    /// Complete tours evaluated.
    pub tours_verified: u64,
    /// Strictly shorter tours recorded by some worker.
    pub improvements_found: u64,
    /// Subtrees pruned against the shared bound, over all levels.
    pub prunings_bound: u64,
    /// Pruning hits indexed by the tour length at the pruning point.
    pub prunings_per_level: Vec<u64>,
    /// Total wall-clock time of the solve.
    pub time_total: Duration,
}

impl SolveStatistics {
    /// Collects the final totals from the shared counters.
    pub(crate) fn collect(
        counters: &SearchCounters,
        threads: usize,
        time_total: Duration,
    ) -> Self {
        Self {
            threads,
            tasks_dequeued: counters.dequeued(),
            tasks_spilled: counters.spilled(),
            tours_verified: counters.verified(),
            improvements_found: counters.found(),
            prunings_bound: counters.bound_total(),
            prunings_per_level: counters.bound_per_level(),
            time_total,
        }
    }
}

impl std::fmt::Display for SolveStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Milepost Solver Statistics:")?;
        writeln!(f, "  Worker threads:       {}", self.threads)?;
        writeln!(f, "  Tasks dequeued:       {}", self.tasks_dequeued)?;
        writeln!(f, "  Tasks spilled:        {}", self.tasks_spilled)?;
        writeln!(f, "  Tours verified:       {}", self.tours_verified)?;
        writeln!(f, "  Improvements found:   {}", self.improvements_found)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}
