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

//! # Partial Tours
//!
//! `Tour<T>` is the mutable, single-owner working value of the search: an
//! ordered sequence of distinct cities, a membership bitset for O(1)
//! containment checks, and a running edge-weight sum maintained
//! incrementally on every `push`/`pop` so the solver never recomputes
//! distances from scratch.
//!
//! A tour of length `N` (all cities visited) is *complete*; pushing the
//! start city once more *closes* the cycle, turning the running sum into
//! the tour cost. Closing is the only case in which a city may appear
//! twice. Popping the closing city restores the open tour exactly.
//!
//! Tours borrow their `Graph` immutably, which lets every worker thread
//! share one instance without synchronization.

use crate::{graph::Graph, index::CityIndex};
use fixedbitset::FixedBitSet;
use milepost_core::num::constants::Zero;
use milepost_core::num::ops::saturating_arithmetic::{SaturatingAddVal, SaturatingSubVal};
use num_traits::{PrimInt, Signed};

/// A partial tour over a borrowed graph.
#[derive(Debug, Clone)]
pub struct Tour<'g, T> {
    graph: &'g Graph<T>,
    order: Vec<CityIndex>,
    visited: FixedBitSet,
    distance: T,
}

impl<'g, T> Tour<'g, T>
where
    T: PrimInt + Signed + Zero + SaturatingAddVal + SaturatingSubVal,
{
    /// Creates an empty tour over the given graph.
    #[inline]
    pub fn new(graph: &'g Graph<T>) -> Self {
        Self {
            graph,
            order: Vec::with_capacity(graph.size() + 1),
            visited: FixedBitSet::with_capacity(graph.size()),
            distance: T::ZERO,
        }
    }

    /// Returns the graph this tour runs over.
    #[inline]
    pub fn graph(&self) -> &'g Graph<T> {
        self.graph
    }

    /// Returns the number of cities currently on the tour,
    /// counting the closing city if present.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no city has been pushed yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the number of cities in the underlying graph.
    #[inline]
    pub fn num_cities(&self) -> usize {
        self.graph.size()
    }

    /// Returns `true` if every city has been visited and the cycle
    /// has not yet been closed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.order.len() == self.graph.size()
    }

    /// Returns `true` if the cycle has been closed by re-pushing the
    /// start city.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.order.len() == self.graph.size() + 1
    }

    /// Returns `true` if the given city is on the tour.
    #[inline]
    pub fn contains(&self, city: CityIndex) -> bool {
        debug_assert!(
            city.get() < self.num_cities(),
            "called `Tour::contains` with city index out of bounds: the size is {} but the index is {}",
            self.num_cities(),
            city.get()
        );
        self.visited.contains(city.get())
    }

    /// Returns the most recently pushed city.
    #[inline]
    pub fn last(&self) -> Option<CityIndex> {
        self.order.last().copied()
    }

    /// Returns the cities on the tour in visiting order.
    #[inline]
    pub fn cities(&self) -> &[CityIndex] {
        &self.order
    }

    /// Returns the sum of edge weights traversed so far, including the
    /// closing edge if the cycle has been closed.
    #[inline]
    pub fn distance(&self) -> T {
        self.distance
    }

    /// Appends a city to the tour, extending the running distance by the
    /// connecting edge.
    ///
    /// A visited city may only be re-pushed to close a complete tour, and
    /// only if it is the tour's first city.
    ///
    /// # Panics
    ///
    /// Panics if the city index is out of bounds. In debug builds, also
    /// panics if the tour is already closed or if the push would repeat a
    /// city without closing the cycle.
    #[inline]
    pub fn push(&mut self, city: CityIndex) {
        assert!(
            city.get() < self.num_cities(),
            "called `Tour::push` with city index out of bounds: the size is {} but the index is {}",
            self.num_cities(),
            city.get()
        );
        debug_assert!(
            !self.is_closed(),
            "called `Tour::push` on a closed tour"
        );
        debug_assert!(
            !self.contains(city) || (self.is_complete() && self.order[0] == city),
            "called `Tour::push` with visited city {} that does not close the tour",
            city.get()
        );

        if let Some(&last) = self.order.last() {
            // `city` is bounds-asserted above; `last` already lives on
            // the tour.
            let edge = unsafe { self.graph.distance_unchecked(last, city) };
            self.distance = self.distance.saturating_add_val(edge);
        }
        self.visited.insert(city.get());
        self.order.push(city);
    }

    /// Removes and returns the most recently pushed city, shrinking the
    /// running distance by the edge that led to it.
    ///
    /// Popping the closing city leaves the start city visited; popping any
    /// other city clears its membership.
    #[inline]
    pub fn pop(&mut self) -> Option<CityIndex> {
        let city = self.order.pop()?;
        if let Some(&last) = self.order.last() {
            // Both cities entered the tour through `push`, hence both
            // indices are in bounds.
            let edge = unsafe { self.graph.distance_unchecked(last, city) };
            self.distance = self.distance.saturating_sub_val(edge);
        }
        // The start city occurs twice on a closed tour; keep it marked
        // visited while its first occurrence remains.
        let closes_over_start = !self.order.is_empty() && self.order[0] == city;
        if !closes_over_start {
            self.visited.set(city.get(), false);
        }
        Some(city)
    }

    /// Makes this tour an exact copy of another tour over the same graph.
    ///
    /// Reuses this tour's allocations.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the tours run over different graphs.
    #[inline]
    pub fn copy_from(&mut self, other: &Tour<'g, T>) {
        debug_assert!(
            std::ptr::eq(self.graph, other.graph),
            "called `Tour::copy_from` with a tour over a different graph"
        );
        self.order.clone_from(&other.order);
        self.visited.clone_from(&other.visited);
        self.distance = other.distance;
    }
}

impl<'g, T> std::fmt::Display for Tour<'g, T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, city) in self.order.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", city.get())?;
        }
        write!(f, " ({})", self.distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::index::START_CITY;

    fn ci(i: usize) -> CityIndex {
        CityIndex::new(i)
    }

    /// The S1 fixture: optimal cost 4 via [0, 1, 2, 3, 0].
    fn square_graph() -> Graph<i64> {
        let mut builder = GraphBuilder::<i64>::new(4);
        builder.set_symmetric_distance(ci(0), ci(1), 1);
        builder.set_symmetric_distance(ci(0), ci(2), 2);
        builder.set_symmetric_distance(ci(0), ci(3), 1);
        builder.set_symmetric_distance(ci(1), ci(2), 1);
        builder.set_symmetric_distance(ci(1), ci(3), 2);
        builder.set_symmetric_distance(ci(2), ci(3), 1);
        builder.build().unwrap()
    }

    #[test]
    fn test_empty_tour() {
        let graph = square_graph();
        let tour = Tour::new(&graph);
        assert!(tour.is_empty());
        assert_eq!(tour.len(), 0);
        assert_eq!(tour.num_cities(), 4);
        assert_eq!(tour.distance(), 0);
        assert!(!tour.is_complete());
        assert!(!tour.is_closed());
    }

    #[test]
    fn test_push_accumulates_distance() {
        let graph = square_graph();
        let mut tour = Tour::new(&graph);
        tour.push(START_CITY);
        assert_eq!(tour.distance(), 0);
        tour.push(ci(1));
        assert_eq!(tour.distance(), 1);
        tour.push(ci(2));
        assert_eq!(tour.distance(), 2);
        tour.push(ci(3));
        assert_eq!(tour.distance(), 3);
        assert!(tour.is_complete());
    }

    #[test]
    fn test_close_and_reopen_is_exact() {
        let graph = square_graph();
        let mut tour = Tour::new(&graph);
        for i in 0..4 {
            tour.push(ci(i));
        }
        let open_distance = tour.distance();
        let open_order: Vec<_> = tour.cities().to_vec();

        // Close the cycle over the start city.
        tour.push(START_CITY);
        assert!(tour.is_closed());
        assert_eq!(tour.distance(), 4);
        assert!(tour.contains(START_CITY));

        // Reopen: the tour must be pointwise unchanged.
        assert_eq!(tour.pop(), Some(START_CITY));
        assert!(tour.is_complete());
        assert!(!tour.is_closed());
        assert_eq!(tour.distance(), open_distance);
        assert_eq!(tour.cities(), open_order.as_slice());
        assert!(tour.contains(START_CITY), "start stays visited after reopening");
    }

    #[test]
    fn test_pop_clears_membership() {
        let graph = square_graph();
        let mut tour = Tour::new(&graph);
        tour.push(START_CITY);
        tour.push(ci(2));
        assert!(tour.contains(ci(2)));

        assert_eq!(tour.pop(), Some(ci(2)));
        assert!(!tour.contains(ci(2)));
        assert_eq!(tour.distance(), 0);
        assert_eq!(tour.len(), 1);
    }

    #[test]
    fn test_pop_everything_returns_to_empty() {
        let graph = square_graph();
        let mut tour = Tour::new(&graph);
        tour.push(START_CITY);
        tour.push(ci(3));
        tour.pop();
        tour.pop();
        assert!(tour.is_empty());
        assert!(!tour.contains(START_CITY));
        assert_eq!(tour.distance(), 0);
        assert_eq!(tour.pop(), None);
    }

    #[test]
    fn test_copy_from_matches_source() {
        let graph = square_graph();
        let mut source = Tour::new(&graph);
        source.push(START_CITY);
        source.push(ci(1));
        source.push(ci(2));

        let mut copy = Tour::new(&graph);
        copy.push(START_CITY);
        copy.push(ci(3));
        copy.copy_from(&source);

        assert_eq!(copy.cities(), source.cities());
        assert_eq!(copy.distance(), source.distance());
        assert!(copy.contains(ci(1)));
        assert!(copy.contains(ci(2)));
        assert!(!copy.contains(ci(3)));
    }

    #[test]
    fn test_display_format() {
        let graph = square_graph();
        let mut tour = Tour::new(&graph);
        for i in 0..4 {
            tour.push(ci(i));
        }
        tour.push(START_CITY);
        assert_eq!(format!("{}", tour), "0 1 2 3 0 (4)");
    }

    #[test]
    fn test_incremental_distance_matches_recomputation() {
        use rand::prelude::*;

        let mut rng = StdRng::seed_from_u64(7);
        let n = 8;
        let mut builder = GraphBuilder::<i64>::new(n);
        for a in 0..n {
            for b in (a + 1)..n {
                builder.set_symmetric_distance(ci(a), ci(b), rng.gen_range(1..100));
            }
        }
        let graph = builder.build().unwrap();

        let mut tour = Tour::new(&graph);
        let mut perm: Vec<usize> = (1..n).collect();
        perm.shuffle(&mut rng);

        tour.push(START_CITY);
        for &i in &perm {
            tour.push(ci(i));
        }
        tour.push(START_CITY);

        let mut expected = 0i64;
        let order = tour.cities();
        for pair in order.windows(2) {
            expected += graph.distance(pair[0], pair[1]);
        }
        assert_eq!(tour.distance(), expected);
    }
}
