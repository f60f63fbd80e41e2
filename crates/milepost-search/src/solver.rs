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

//! The user-facing solver: configuration, dispatch, and reduction.
//!
//! `TspSolver` owns nothing but its configuration; every solve creates
//! its shared state (work queue, shared bound, counters) on the stack
//! and lends it to scoped worker threads, so two solves never interfere
//! and the solver needs no global state.
//!
//! A solve proceeds in four steps:
//! 1. Seed: the identity tour initializes the shared bound, and the
//!    `N-1` length-2 prefixes `[0, i]` are enqueued.
//! 2. Search: workers drain the queue, spilling coarse subtrees back to
//!    it and solving deep ones locally (see `engine`).
//! 3. Join: `solve` returns only after every worker has terminated.
//! 4. Reduce: the tour matching the final bound is selected from the
//!    workers' personal bests (or the seed tour, if no worker improved
//!    on it).

use crate::{
    bound::SharedBound,
    engine::{SearchContext, SearchWorker},
    error::SolverConfigError,
    monitor::search_monitor::{SearchMonitor, SilentMonitor},
    num::CostNumeric,
    result::SolveOutcome,
    stats::{SearchCounters, SolveStatistics},
};
use milepost_model::{
    graph::Graph,
    index::{CityIndex, START_CITY},
    solution::TourSolution,
    tour::Tour,
};
use milepost_queue::WorkQueue;
use std::sync::atomic::AtomicUsize;

/// The default number of worker threads.
pub const DEFAULT_NUM_THREADS: usize = 2;

/// The default spill threshold: a task whose remaining depth exceeds
/// this value is expanded into the queue instead of being solved
/// locally.
pub const DEFAULT_SPILL_THRESHOLD: usize = 8;

/// A parallel exact TSP solver.
///
/// # Examples
///
/// ```rust
/// use milepost_model::graph::GraphBuilder;
/// use milepost_model::index::CityIndex;
/// use milepost_search::solver::TspSolver;
///
/// let mut builder = GraphBuilder::<i64>::new(3);
/// builder.set_symmetric_distance(CityIndex::new(0), CityIndex::new(1), 1);
/// builder.set_symmetric_distance(CityIndex::new(1), CityIndex::new(2), 2);
/// builder.set_symmetric_distance(CityIndex::new(0), CityIndex::new(2), 2);
/// let graph = builder.build().unwrap();
///
/// let solver = TspSolver::builder().build().unwrap();
/// let outcome = solver.solve(&graph);
/// assert_eq!(outcome.solution().cost(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TspSolver {
    num_threads: usize,
    spill_threshold: usize,
}

impl TspSolver {
    /// Returns a builder with the default configuration.
    #[inline]
    pub fn builder() -> TspSolverBuilder {
        TspSolverBuilder::new()
    }

    /// Returns the configured number of worker threads.
    #[inline]
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Returns the configured spill threshold.
    #[inline]
    pub fn spill_threshold(&self) -> usize {
        self.spill_threshold
    }

    /// Solves the given graph to proven optimality.
    #[inline]
    pub fn solve<T>(&self, graph: &Graph<T>) -> SolveOutcome<T>
    where
        T: CostNumeric,
    {
        self.solve_with_monitor(graph, &SilentMonitor)
    }

    /// Solves the given graph, reporting search events to the monitor.
    pub fn solve_with_monitor<T, M>(&self, graph: &Graph<T>, monitor: &M) -> SolveOutcome<T>
    where
        T: CostNumeric,
        M: SearchMonitor<T>,
    {
        let start_time = std::time::Instant::now();
        let num_cities = graph.size();

        log::info!(
            "starting {} worker threads on {} cities",
            self.num_threads,
            num_cities
        );

        // The identity tour provides the initial upper bound.
        let mut seed = Tour::new(graph);
        for index in 0..num_cities {
            seed.push(CityIndex::new(index));
        }
        seed.push(START_CITY);

        let bound = SharedBound::new();
        bound.tighten(seed.distance().into());

        let counters = SearchCounters::new(num_cities);
        let queue: WorkQueue<Box<Tour<'_, T>>> = WorkQueue::new();

        // Seed the queue with the length-2 prefixes [0, i].
        let mut root = Tour::new(graph);
        root.push(START_CITY);
        for index in 1..num_cities {
            let mut task = Box::new(root.clone());
            task.push(CityIndex::new(index));
            queue.enqueue(task);
        }
        log::debug!("seeded {} initial tasks", num_cities - 1);

        // Every worker starts counted; see the termination protocol on
        // `SearchWorker::run`.
        let active = AtomicUsize::new(self.num_threads);

        let mut local_bests = Vec::with_capacity(self.num_threads);
        std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.num_threads);
            for _ in 0..self.num_threads {
                let context = SearchContext {
                    graph,
                    queue: &queue,
                    bound: &bound,
                    counters: &counters,
                    active: &active,
                    spill_threshold: self.spill_threshold,
                };
                handles.push(scope.spawn(move || SearchWorker::new(context, monitor).run()));
            }

            for (index, handle) in handles.into_iter().enumerate() {
                let local_best = handle.join().expect("worker thread panicked");
                match &local_best {
                    Some(tour) => {
                        log::debug!("worker {} joined with local best {}", index, tour.distance())
                    }
                    None => log::debug!("worker {} joined without improvements", index),
                }
                local_bests.push(local_best);
            }
        });

        let statistics =
            SolveStatistics::collect(&counters, self.num_threads, start_time.elapsed());

        // Reduction: pick any tour matching the final bound. The worker
        // that performed the last successful tightening holds one; if the
        // bound was never tightened below the seed, the seed itself is
        // optimal.
        let final_bound = bound.load();
        let winner = local_bests
            .iter()
            .flatten()
            .chain(std::iter::once(&seed))
            .find(|tour| {
                let cost: i64 = tour.distance().into();
                cost == final_bound
            })
            .expect("no tour matches the final bound");

        log::info!("solved: {} in {:.2?}", winner, statistics.time_total);
        SolveOutcome::new(TourSolution::from(winner), statistics)
    }
}

impl Default for TspSolver {
    fn default() -> Self {
        Self {
            num_threads: DEFAULT_NUM_THREADS,
            spill_threshold: DEFAULT_SPILL_THRESHOLD,
        }
    }
}

impl std::fmt::Display for TspSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TspSolver(threads: {}, spill_threshold: {})",
            self.num_threads, self.spill_threshold
        )
    }
}

/// A builder for `TspSolver` instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TspSolverBuilder {
    num_threads: usize,
    spill_threshold: usize,
}

impl Default for TspSolverBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TspSolverBuilder {
    /// Creates a builder with the default configuration.
    #[inline]
    pub fn new() -> Self {
        Self {
            num_threads: DEFAULT_NUM_THREADS,
            spill_threshold: DEFAULT_SPILL_THRESHOLD,
        }
    }

    /// Sets the number of worker threads.
    #[inline]
    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Sets the spill threshold.
    #[inline]
    pub fn with_spill_threshold(mut self, spill_threshold: usize) -> Self {
        self.spill_threshold = spill_threshold;
        self
    }

    /// Validates the configuration and builds the solver.
    pub fn build(self) -> Result<TspSolver, SolverConfigError> {
        if self.num_threads == 0 {
            return Err(SolverConfigError::ZeroThreads);
        }
        Ok(TspSolver {
            num_threads: self.num_threads,
            spill_threshold: self.spill_threshold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use milepost_model::graph::GraphBuilder;

    type IntegerType = i64;

    fn ci(i: usize) -> CityIndex {
        CityIndex::new(i)
    }

    fn solver(threads: usize) -> TspSolver {
        TspSolver::builder().with_threads(threads).build().unwrap()
    }

    /// S1: N=4 with a unique optimum of cost 4 along [0, 1, 2, 3, 0].
    fn square_graph() -> Graph<IntegerType> {
        let mut builder = GraphBuilder::new(4);
        builder.set_symmetric_distance(ci(0), ci(1), 1);
        builder.set_symmetric_distance(ci(0), ci(2), 2);
        builder.set_symmetric_distance(ci(0), ci(3), 1);
        builder.set_symmetric_distance(ci(1), ci(2), 1);
        builder.set_symmetric_distance(ci(1), ci(3), 2);
        builder.set_symmetric_distance(ci(2), ci(3), 1);
        builder.build().unwrap()
    }

    /// S2: N=4 with every distance 1, so every Hamiltonian cycle costs 4.
    fn uniform_graph() -> Graph<IntegerType> {
        let mut builder = GraphBuilder::new(4);
        for a in 0..4 {
            for b in (a + 1)..4 {
                builder.set_symmetric_distance(ci(a), ci(b), 1);
            }
        }
        builder.build().unwrap()
    }

    /// S3: a pentagon with unit rim edges and expensive chords.
    fn pentagon_graph() -> Graph<IntegerType> {
        let mut builder = GraphBuilder::new(5);
        for a in 0..5 {
            for b in (a + 1)..5 {
                builder.set_symmetric_distance(ci(a), ci(b), 10);
            }
        }
        for i in 0..5 {
            builder.set_symmetric_distance(ci(i), ci((i + 1) % 5), 1);
        }
        builder.build().unwrap()
    }

    /// S4: N=10 with d(i, j) = |i - j|.
    fn line_graph() -> Graph<IntegerType> {
        let mut builder = GraphBuilder::new(10);
        for a in 0..10 {
            for b in (a + 1)..10 {
                builder.set_symmetric_distance(ci(a), ci(b), (b - a) as IntegerType);
            }
        }
        builder.build().unwrap()
    }

    fn random_graph(n: usize, seed: u64) -> Graph<IntegerType> {
        use rand::prelude::*;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut builder = GraphBuilder::new(n);
        for a in 0..n {
            for b in (a + 1)..n {
                builder.set_symmetric_distance(ci(a), ci(b), rng.gen_range(1..100));
            }
        }
        builder.build().unwrap()
    }

    /// Sequential reference: minimum cycle cost over all permutations.
    fn brute_force_cost(graph: &Graph<IntegerType>) -> IntegerType {
        fn recurse(
            graph: &Graph<IntegerType>,
            remaining: &mut Vec<usize>,
            last: usize,
            cost_so_far: IntegerType,
            best: &mut IntegerType,
        ) {
            if remaining.is_empty() {
                let closed = cost_so_far + graph.distance(ci(last), ci(0));
                if closed < *best {
                    *best = closed;
                }
                return;
            }
            for index in 0..remaining.len() {
                let city = remaining.swap_remove(index);
                recurse(
                    graph,
                    remaining,
                    city,
                    cost_so_far + graph.distance(ci(last), ci(city)),
                    best,
                );
                remaining.push(city);
                let len = remaining.len();
                remaining.swap(index, len - 1);
            }
        }

        let mut remaining: Vec<usize> = (1..graph.size()).collect();
        let mut best = IntegerType::MAX;
        recurse(graph, &mut remaining, 0, 0, &mut best);
        best
    }

    /// Checks that a reported order is a closed Hamiltonian cycle over
    /// city 0.
    fn assert_valid_cycle(order: &[CityIndex], n: usize) {
        assert_eq!(order.len(), n + 1);
        assert_eq!(order[0], ci(0));
        assert_eq!(order[n], ci(0));
        let mut seen = vec![false; n];
        for city in &order[..n] {
            assert!(!seen[city.get()], "city {} visited twice", city.get());
            seen[city.get()] = true;
        }
    }

    #[test]
    fn test_builder_rejects_zero_threads() {
        assert_eq!(
            TspSolver::builder().with_threads(0).build(),
            Err(SolverConfigError::ZeroThreads)
        );
    }

    #[test]
    fn test_builder_defaults() {
        let solver = TspSolver::builder().build().unwrap();
        assert_eq!(solver.num_threads(), DEFAULT_NUM_THREADS);
        assert_eq!(solver.spill_threshold(), DEFAULT_SPILL_THRESHOLD);
    }

    #[test]
    fn test_s1_square_graph_unique_optimum() {
        let graph = square_graph();
        let outcome = solver(2).solve(&graph);

        assert_eq!(outcome.solution().cost(), 4);
        assert_valid_cycle(outcome.solution().order(), 4);

        // The unique optimal cycle, up to direction of travel.
        let forward = [ci(0), ci(1), ci(2), ci(3), ci(0)];
        let backward = [ci(0), ci(3), ci(2), ci(1), ci(0)];
        let order = outcome.solution().order();
        assert!(
            order == forward || order == backward,
            "unexpected optimal tour {:?}",
            order
        );
    }

    #[test]
    fn test_s2_uniform_graph_every_cycle_optimal() {
        let graph = uniform_graph();
        let outcome = solver(2).solve(&graph);

        assert_eq!(outcome.solution().cost(), 4);
        assert_valid_cycle(outcome.solution().order(), 4);
        assert!(
            outcome.statistics().improvements_found >= 1,
            "at least one worker must record a tour"
        );
    }

    #[test]
    fn test_s3_pentagon_rim_is_optimal() {
        let graph = pentagon_graph();
        let outcome = solver(2).solve(&graph);

        assert_eq!(outcome.solution().cost(), 5);
        assert_valid_cycle(outcome.solution().order(), 5);

        let forward = [ci(0), ci(1), ci(2), ci(3), ci(4), ci(0)];
        let backward = [ci(0), ci(4), ci(3), ci(2), ci(1), ci(0)];
        let order = outcome.solution().order();
        assert!(
            order == forward || order == backward,
            "unexpected optimal tour {:?}",
            order
        );
    }

    #[test]
    fn test_s4_line_graph_identity_cost() {
        let graph = line_graph();
        let outcome = solver(4).solve(&graph);

        assert_eq!(outcome.solution().cost(), 18);
        assert_valid_cycle(outcome.solution().order(), 10);
    }

    #[test]
    fn test_two_cities_boundary() {
        let mut builder = GraphBuilder::new(2);
        builder.set_symmetric_distance(ci(0), ci(1), 7);
        let graph = builder.build().unwrap();

        let outcome = solver(2).solve(&graph);
        assert_eq!(outcome.solution().cost(), 14);
        assert_eq!(outcome.solution().order(), [ci(0), ci(1), ci(0)]);
    }

    #[test]
    fn test_zero_weight_graph_reduces_to_seed() {
        // Every edge weight zero: the bound can never be tightened below
        // the seed, and pruning fires immediately everywhere.
        let graph = GraphBuilder::<IntegerType>::new(4).build().unwrap();
        let outcome = solver(2).solve(&graph);
        assert_eq!(outcome.solution().cost(), 0);
        assert_valid_cycle(outcome.solution().order(), 4);
    }

    #[test]
    fn test_single_thread_matches_multi_thread() {
        let graph = random_graph(9, 11);
        let sequential = solver(1).solve(&graph);
        let parallel = solver(4).solve(&graph);
        assert_eq!(sequential.solution().cost(), parallel.solution().cost());
    }

    #[test]
    fn test_no_spilling_when_threshold_covers_depth() {
        // With SPILL_THRESHOLD >= N-1, every seeded task is solved
        // locally and the result must still be optimal.
        let graph = square_graph();
        let no_spill_solver = TspSolver::builder()
            .with_threads(2)
            .with_spill_threshold(16)
            .build()
            .unwrap();

        let outcome = no_spill_solver.solve(&graph);
        assert_eq!(outcome.solution().cost(), 4);
        assert_eq!(outcome.statistics().tasks_spilled, 0);
        // Only the seeded tasks pass through the queue.
        assert_eq!(outcome.statistics().tasks_dequeued, 3);
    }

    #[test]
    fn test_aggressive_spilling_stays_optimal() {
        let graph = random_graph(8, 23);
        let expected = brute_force_cost(&graph);

        let spilling_solver = TspSolver::builder()
            .with_threads(4)
            .with_spill_threshold(1)
            .build()
            .unwrap();

        let outcome = spilling_solver.solve(&graph);
        assert_eq!(outcome.solution().cost(), expected);
        assert!(
            outcome.statistics().tasks_spilled > 0,
            "threshold 1 on 8 cities must spill"
        );
    }

    #[test]
    fn test_random_graphs_match_brute_force() {
        for seed in 0..6u64 {
            let n = 5 + (seed as usize % 3);
            let graph = random_graph(n, seed);
            let expected = brute_force_cost(&graph);

            let outcome = solver(4).solve(&graph);
            assert_eq!(
                outcome.solution().cost(),
                expected,
                "seed {} (n = {}): solver disagrees with brute force",
                seed,
                n
            );
            assert_valid_cycle(outcome.solution().order(), n);
        }
    }

    #[test]
    fn test_reported_cost_deterministic_across_runs_and_threads() {
        let graph = random_graph(8, 42);
        let reference = solver(1).solve(&graph).solution().cost();

        for threads in [1, 2, 4, 8] {
            for _ in 0..3 {
                let outcome = solver(threads).solve(&graph);
                assert_eq!(
                    outcome.solution().cost(),
                    reference,
                    "cost must not depend on thread count or scheduling"
                );
            }
        }
    }

    #[test]
    fn test_statistics_are_populated() {
        let graph = square_graph();
        let outcome = solver(2).solve(&graph);
        let statistics = outcome.statistics();

        assert_eq!(statistics.threads, 2);
        // The three seeded tasks pass through the queue at minimum.
        assert!(statistics.tasks_dequeued >= 3);
        assert!(statistics.tours_verified >= 1);
        assert!(statistics.improvements_found >= 1);
    }

    #[test]
    fn test_solution_cost_matches_recomputed_edge_sum() {
        let graph = random_graph(7, 5);
        let outcome = solver(2).solve(&graph);

        let order = outcome.solution().order();
        let mut recomputed = 0;
        for pair in order.windows(2) {
            recomputed += graph.distance(pair[0], pair[1]);
        }
        assert_eq!(outcome.solution().cost(), recomputed);
    }
}
