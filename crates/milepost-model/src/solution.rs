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

use crate::index::CityIndex;
use crate::tour::Tour;
use milepost_core::num::constants::Zero;
use milepost_core::num::ops::saturating_arithmetic::{SaturatingAddVal, SaturatingSubVal};
use num_traits::{PrimInt, Signed};

/// The final solution of a solve: a closed Hamiltonian cycle starting and
/// ending at city 0, together with its total weight.
///
/// Unlike `Tour`, a solution owns its data and carries no graph borrow,
/// so it can outlive the solve that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourSolution<T> {
    cost: T,
    order: Vec<CityIndex>,
}

impl<T> TourSolution<T>
where
    T: PrimInt + Signed,
{
    /// Constructs a new `TourSolution`.
    ///
    /// # Panics
    ///
    /// Panics if the order does not describe a closed cycle (first and
    /// last city differ) or is shorter than three entries.
    pub fn new(cost: T, order: Vec<CityIndex>) -> Self {
        assert!(
            order.len() >= 3,
            "called TourSolution::new with {} cities, a closed cycle needs at least 3 entries",
            order.len()
        );
        assert_eq!(
            order.first(),
            order.last(),
            "called TourSolution::new with an unclosed cycle"
        );

        Self { cost, order }
    }

    /// Returns the total weight of the cycle.
    #[inline]
    pub fn cost(&self) -> T {
        self.cost
    }

    /// Returns the cities in visiting order, including the closing
    /// repetition of the start city.
    #[inline]
    pub fn order(&self) -> &[CityIndex] {
        &self.order
    }

    /// Returns the number of distinct cities on the cycle.
    #[inline]
    pub fn num_cities(&self) -> usize {
        self.order.len() - 1
    }
}

impl<'g, T> From<&Tour<'g, T>> for TourSolution<T>
where
    T: PrimInt + Signed + Zero + SaturatingAddVal + SaturatingSubVal,
{
    /// Snapshots a closed tour into an owned solution.
    ///
    /// # Panics
    ///
    /// Panics if the tour is not closed.
    fn from(tour: &Tour<'g, T>) -> Self {
        assert!(
            tour.is_closed(),
            "called `TourSolution::from` with an unclosed tour of length {}",
            tour.len()
        );
        Self::new(tour.distance(), tour.cities().to_vec())
    }
}

impl<T> std::fmt::Display for TourSolution<T>
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
        write!(f, " ({})", self.cost)
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

    #[test]
    fn test_new_and_accessors() {
        let solution = TourSolution::new(7i64, vec![ci(0), ci(2), ci(1), ci(0)]);
        assert_eq!(solution.cost(), 7);
        assert_eq!(solution.num_cities(), 3);
        assert_eq!(solution.order().first(), solution.order().last());
    }

    #[test]
    #[should_panic(expected = "unclosed cycle")]
    fn test_unclosed_cycle_is_rejected() {
        let _ = TourSolution::new(7i64, vec![ci(0), ci(2), ci(1)]);
    }

    #[test]
    fn test_from_closed_tour() {
        let mut builder = GraphBuilder::<i64>::new(3);
        builder.set_symmetric_distance(ci(0), ci(1), 2);
        builder.set_symmetric_distance(ci(1), ci(2), 3);
        builder.set_symmetric_distance(ci(0), ci(2), 4);
        let graph = builder.build().unwrap();

        let mut tour = Tour::new(&graph);
        tour.push(START_CITY);
        tour.push(ci(1));
        tour.push(ci(2));
        tour.push(START_CITY);

        let solution = TourSolution::from(&tour);
        assert_eq!(solution.cost(), 9);
        assert_eq!(solution.num_cities(), 3);
        assert_eq!(format!("{}", solution), "0 1 2 0 (9)");
    }
}
