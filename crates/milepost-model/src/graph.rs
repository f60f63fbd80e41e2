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

//! # Distance Graph
//!
//! The immutable input of a solve: a complete weighted graph over `N`
//! cities, stored as a flat row-major `N×N` matrix behind typed accessors.
//! Construction goes through `GraphBuilder`, which validates the instance
//! (at least two cities, non-negative weights, zero diagonal) so the solver
//! never has to re-check these properties on its hot path.
//!
//! Symmetry is assumed by the problem statement but not enforced: the
//! branch-and-bound algorithm is correct for any non-negative matrix.

use crate::index::CityIndex;
use num_traits::{PrimInt, Signed};

/// The error type for graph construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphBuildError {
    /// The instance has fewer than two cities.
    TooFewCities(usize),
    /// A distance entry is negative.
    NegativeWeight { from: CityIndex, to: CityIndex },
    /// A diagonal entry is not zero.
    NonzeroDiagonal(CityIndex),
}

impl std::fmt::Display for GraphBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewCities(n) => {
                write!(f, "A graph needs at least 2 cities, got {}", n)
            }
            Self::NegativeWeight { from, to } => {
                write!(f, "Negative distance from {} to {}", from, to)
            }
            Self::NonzeroDiagonal(city) => {
                write!(f, "Nonzero self-distance at {}", city)
            }
        }
    }
}

impl std::error::Error for GraphBuildError {}

/// A complete weighted graph over `N` cities.
///
/// Immutable for the lifetime of a solve; shared read-only between all
/// worker threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph<T> {
    size: usize,
    /// Row-major `size × size` distance matrix.
    /// `distances[from * size + to]` is the weight of the edge `from -> to`.
    distances: Vec<T>,
}

impl<T> Graph<T>
where
    T: PrimInt + Signed,
{
    /// Returns the number of cities in this graph.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the distance from one city to another.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if either index is out of bounds.
    #[inline]
    pub fn distance(&self, from: CityIndex, to: CityIndex) -> T {
        debug_assert!(
            from.get() < self.size,
            "called `Graph::distance` with from index out of bounds: the size is {} but the index is {}",
            self.size,
            from.get()
        );
        debug_assert!(
            to.get() < self.size,
            "called `Graph::distance` with to index out of bounds: the size is {} but the index is {}",
            self.size,
            to.get()
        );

        self.distances[from.get() * self.size + to.get()]
    }

    /// Returns the distance from one city to another without bounds checks.
    ///
    /// # Safety
    ///
    /// The caller must ensure that both indices are valid for this graph.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use milepost_model::graph::GraphBuilder;
    /// use milepost_model::index::CityIndex;
    ///
    /// let mut builder = GraphBuilder::<i64>::new(2);
    /// builder.set_symmetric_distance(CityIndex::new(0), CityIndex::new(1), 3);
    /// let graph = builder.build().unwrap();
    ///
    /// // Both indices are in bounds for this graph.
    /// let d = unsafe { graph.distance_unchecked(CityIndex::new(0), CityIndex::new(1)) };
    /// assert_eq!(d, 3);
    /// ```
    #[inline(always)]
    pub unsafe fn distance_unchecked(&self, from: CityIndex, to: CityIndex) -> T {
        debug_assert!(from.get() < self.size && to.get() < self.size);
        unsafe { *self.distances.get_unchecked(from.get() * self.size + to.get()) }
    }
}

impl<T> std::fmt::Display for Graph<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Graph ({} cities)", self.size)?;
        for from in 0..self.size {
            write!(f, "  ")?;
            for to in 0..self.size {
                let d = self.distances[from * self.size + to];
                write!(f, "{:>6} ", d)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A builder for `Graph` instances.
///
/// All distances start at zero; set the off-diagonal entries and call
/// `build`, which validates the instance.
///
/// # Examples
///
/// ```rust
/// use milepost_model::graph::GraphBuilder;
/// use milepost_model::index::CityIndex;
///
/// let mut builder = GraphBuilder::<i64>::new(3);
/// builder.set_symmetric_distance(CityIndex::new(0), CityIndex::new(1), 4);
/// builder.set_symmetric_distance(CityIndex::new(0), CityIndex::new(2), 2);
/// builder.set_symmetric_distance(CityIndex::new(1), CityIndex::new(2), 5);
/// let graph = builder.build().unwrap();
/// assert_eq!(graph.distance(CityIndex::new(1), CityIndex::new(0)), 4);
/// ```
#[derive(Debug, Clone)]
pub struct GraphBuilder<T> {
    size: usize,
    distances: Vec<T>,
}

impl<T> GraphBuilder<T>
where
    T: PrimInt + Signed,
{
    /// Creates a builder for a graph with the given number of cities.
    /// All distances are initialized to zero.
    #[inline]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            distances: vec![T::zero(); size * size],
        }
    }

    /// Sets the directed distance from one city to another.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn set_distance(&mut self, from: CityIndex, to: CityIndex, weight: T) -> &mut Self {
        assert!(
            from.get() < self.size && to.get() < self.size,
            "called `GraphBuilder::set_distance` with index out of bounds: the size is {} but the indices are {} and {}",
            self.size,
            from.get(),
            to.get()
        );
        self.distances[from.get() * self.size + to.get()] = weight;
        self
    }

    /// Sets the distance between two cities in both directions.
    #[inline]
    pub fn set_symmetric_distance(&mut self, a: CityIndex, b: CityIndex, weight: T) -> &mut Self {
        self.set_distance(a, b, weight);
        self.set_distance(b, a, weight)
    }

    /// Validates the instance and builds the immutable `Graph`.
    pub fn build(self) -> Result<Graph<T>, GraphBuildError> {
        if self.size < 2 {
            return Err(GraphBuildError::TooFewCities(self.size));
        }

        for from in 0..self.size {
            for to in 0..self.size {
                let d = self.distances[from * self.size + to];
                if d < T::zero() {
                    return Err(GraphBuildError::NegativeWeight {
                        from: CityIndex::new(from),
                        to: CityIndex::new(to),
                    });
                }
                if from == to && !d.is_zero() {
                    return Err(GraphBuildError::NonzeroDiagonal(CityIndex::new(from)));
                }
            }
        }

        Ok(Graph {
            size: self.size,
            distances: self.distances,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ci(i: usize) -> CityIndex {
        CityIndex::new(i)
    }

    #[test]
    fn test_build_and_access() {
        let mut builder = GraphBuilder::<i64>::new(4);
        builder.set_symmetric_distance(ci(0), ci(1), 1);
        builder.set_symmetric_distance(ci(0), ci(2), 2);
        builder.set_symmetric_distance(ci(0), ci(3), 1);
        builder.set_symmetric_distance(ci(1), ci(2), 1);
        builder.set_symmetric_distance(ci(1), ci(3), 2);
        builder.set_symmetric_distance(ci(2), ci(3), 1);

        let graph = builder.build().unwrap();
        assert_eq!(graph.size(), 4);
        assert_eq!(graph.distance(ci(0), ci(1)), 1);
        assert_eq!(graph.distance(ci(1), ci(0)), 1);
        assert_eq!(graph.distance(ci(2), ci(3)), 1);
        assert_eq!(graph.distance(ci(3), ci(3)), 0);
    }

    #[test]
    fn test_too_few_cities_is_rejected() {
        assert_eq!(
            GraphBuilder::<i64>::new(1).build(),
            Err(GraphBuildError::TooFewCities(1))
        );
        assert_eq!(
            GraphBuilder::<i64>::new(0).build(),
            Err(GraphBuildError::TooFewCities(0))
        );
    }

    #[test]
    fn test_negative_weight_is_rejected() {
        let mut builder = GraphBuilder::<i64>::new(2);
        builder.set_distance(ci(0), ci(1), -3);
        assert_eq!(
            builder.build(),
            Err(GraphBuildError::NegativeWeight {
                from: ci(0),
                to: ci(1)
            })
        );
    }

    #[test]
    fn test_nonzero_diagonal_is_rejected() {
        let mut builder = GraphBuilder::<i64>::new(2);
        builder.set_distance(ci(1), ci(1), 7);
        assert_eq!(builder.build(), Err(GraphBuildError::NonzeroDiagonal(ci(1))));
    }

    #[test]
    fn test_asymmetric_distances_are_allowed() {
        let mut builder = GraphBuilder::<i64>::new(2);
        builder.set_distance(ci(0), ci(1), 3);
        builder.set_distance(ci(1), ci(0), 5);
        let graph = builder.build().unwrap();
        assert_eq!(graph.distance(ci(0), ci(1)), 3);
        assert_eq!(graph.distance(ci(1), ci(0)), 5);
    }

    #[test]
    fn test_display_contains_all_rows() {
        let graph = GraphBuilder::<i64>::new(2).build().unwrap();
        let rendered = format!("{}", graph);
        assert!(rendered.contains("Graph (2 cities)"));
        assert_eq!(rendered.lines().count(), 3);
    }
}
