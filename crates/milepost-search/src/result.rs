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

use crate::{num::CostNumeric, stats::SolveStatistics};
use milepost_model::solution::TourSolution;

/// The complete outcome of a solve: the proven-optimal tour plus the
/// run statistics.
///
/// A solve over a validated complete graph always terminates with an
/// optimal tour, so there is no infeasible or unknown variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutcome<T> {
    solution: TourSolution<T>,
    statistics: SolveStatistics,
}

impl<T> SolveOutcome<T>
where
    T: CostNumeric,
{
    /// Creates a new `SolveOutcome`.
    #[inline]
    pub(crate) fn new(solution: TourSolution<T>, statistics: SolveStatistics) -> Self {
        Self {
            solution,
            statistics,
        }
    }

    /// Returns the optimal tour.
    #[inline]
    pub fn solution(&self) -> &TourSolution<T> {
        &self.solution
    }

    /// Returns the run statistics.
    #[inline]
    pub fn statistics(&self) -> &SolveStatistics {
        &self.statistics
    }
}

impl<T> std::fmt::Display for SolveOutcome<T>
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolveOutcome(solution: {}, threads: {})",
            self.solution, self.statistics.threads
        )
    }
}
