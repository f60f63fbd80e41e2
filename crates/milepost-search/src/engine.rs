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

use crate::{
    bound::SharedBound, monitor::search_monitor::SearchMonitor, num::CostNumeric,
    stats::SearchCounters,
};
use milepost_model::{
    graph::Graph,
    index::{CityIndex, START_CITY},
    tour::Tour,
};
use milepost_queue::WorkQueue;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// How long an idle worker sleeps between polls of the queue.
const POLL_SLEEP: Duration = Duration::from_micros(50);

/// The shared state one worker borrows for the duration of a solve.
pub(crate) struct SearchContext<'a, 'g, T> {
    pub graph: &'g Graph<T>,
    pub queue: &'a WorkQueue<Box<Tour<'g, T>>>,
    pub bound: &'a SharedBound,
    pub counters: &'a SearchCounters,
    /// Count of workers that may still publish new work. Initialized to
    /// the worker count by the dispatcher; see `SearchWorker::run`.
    pub active: &'a AtomicUsize,
    pub spill_threshold: usize,
}

/// A single worker's search session: a scratch tour, a personal best,
/// and the loop that drains the shared queue.
pub(crate) struct SearchWorker<'a, 'g, T, M> {
    context: SearchContext<'a, 'g, T>,
    monitor: &'a M,
    current: Tour<'g, T>,
    /// The best complete tour this worker has recorded, closed over the
    /// start city. `None` until the worker improves on everything it has
    /// seen so far.
    local_best: Option<Tour<'g, T>>,
    /// The lowest shared bound this worker has observed; the cell is
    /// monotone, so a larger observation is a programming error.
    observed_bound: i64,
}

impl<'a, 'g, T, M> SearchWorker<'a, 'g, T, M>
where
    T: CostNumeric,
    M: SearchMonitor<T>,
{
    pub(crate) fn new(context: SearchContext<'a, 'g, T>, monitor: &'a M) -> Self {
        Self {
            current: Tour::new(context.graph),
            local_best: None,
            observed_bound: i64::MAX,
            context,
            monitor,
        }
    }

    /// Runs the worker until the queue is exhausted and no other worker
    /// can publish new work. Returns the worker's personal best.
    ///
    /// Termination protocol: `active` counts workers that may still
    /// produce work. Every worker starts counted; it decrements when it
    /// observes an empty queue and re-increments before its next dequeue
    /// attempt, so a worker always holds a count before it can take a
    /// task or publish spilled children. A worker exits only when its own
    /// decrement brings the count to zero *and* one confirming dequeue
    /// still finds the queue empty: at that point every spill that will
    /// ever happen has been fully enqueued before its producer left the
    /// count, so the confirming miss is conclusive.
    pub(crate) fn run(mut self) -> Option<Tour<'g, T>> {
        let mut counted = true;
        loop {
            if !counted {
                self.context.active.fetch_add(1, Ordering::AcqRel);
                counted = true;
            }
            match self.context.queue.try_dequeue() {
                Some(task) => self.process(task),
                None => {
                    counted = false;
                    if self.context.active.fetch_sub(1, Ordering::AcqRel) == 1 {
                        match self.context.queue.try_dequeue() {
                            Some(task) => {
                                self.context.active.fetch_add(1, Ordering::AcqRel);
                                counted = true;
                                self.process(task);
                            }
                            None => break,
                        }
                    } else {
                        // Other workers are still busy and may spill.
                        std::thread::sleep(POLL_SLEEP);
                    }
                }
            }
        }
        self.local_best
    }

    /// Handles one dequeued task: adopt it as the scratch tour, then
    /// either spill its children back to the queue or solve it locally.
    fn process(&mut self, task: Box<Tour<'g, T>>) {
        self.context.counters.on_dequeued();
        self.current.copy_from(&task);
        drop(task);

        let remaining = self.context.graph.size() - self.current.len();
        if remaining > self.context.spill_threshold {
            self.spill();
        } else {
            self.branch_and_bound();
        }
    }

    /// Expands the scratch tour one level and publishes every child to
    /// the queue. Deliberately performs no bound test: all pruning
    /// happens in `branch_and_bound`.
    fn spill(&mut self) {
        self.monitor.on_analyse(&self.current);

        // A complete tour can never satisfy the spill condition.
        assert!(
            !self.current.is_complete(),
            "complete tour of length {} reached the spill phase",
            self.current.len()
        );

        let mut children = 0u64;
        for index in 1..self.context.graph.size() {
            let city = CityIndex::new(index);
            if !self.current.contains(city) {
                let mut child = Box::new(self.current.clone());
                child.push(city);
                self.context.queue.enqueue(child);
                children += 1;
            }
        }
        self.context.counters.on_spilled(children);
    }

    /// Depth-first branch-and-bound over the scratch tour.
    fn branch_and_bound(&mut self) {
        self.monitor.on_analyse(&self.current);

        if self.current.is_complete() {
            self.close_and_record();
            return;
        }

        // The single bounding test, against a fresh load of the shared
        // bound. Relies on non-negative edge weights.
        let best = self.context.bound.load();
        assert!(
            best <= self.observed_bound,
            "shared bound increased from {} to {}",
            self.observed_bound,
            best
        );
        self.observed_bound = best;
        let distance: i64 = self.current.distance().into();
        if distance >= best {
            self.monitor.on_bound(&self.current);
            self.context.counters.on_bound(self.current.len());
            return;
        }

        for index in 1..self.context.graph.size() {
            let city = CityIndex::new(index);
            if !self.current.contains(city) {
                self.current.push(city);
                self.branch_and_bound();
                self.current.pop();
            }
        }
    }

    /// The cost this worker would have to beat to record a new personal
    /// best.
    #[inline]
    fn local_cost(&self) -> i64 {
        self.local_best
            .as_ref()
            .map(|tour| tour.distance().into())
            .unwrap_or(i64::MAX)
    }

    /// Leaf rule: close the cycle, evaluate it, tighten the shared bound
    /// and the personal best on strict improvement, then reopen the tour
    /// pointwise unchanged.
    fn close_and_record(&mut self) {
        self.current.push(START_CITY);
        self.context.counters.on_verified();

        let cost: i64 = self.current.distance().into();
        if cost < self.local_cost() {
            self.context.bound.tighten(cost);
            self.monitor.on_shorter(&self.current);
            if let Some(best) = self.local_best.as_mut() {
                best.copy_from(&self.current);
            } else {
                self.local_best = Some(self.current.clone());
            }
            self.context.counters.on_found();
        }

        self.current.pop();
    }
}
