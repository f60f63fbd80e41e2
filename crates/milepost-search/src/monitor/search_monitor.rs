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

use crate::num::CostNumeric;
use milepost_model::tour::Tour;

/// Trait for observing the search from the outside.
///
/// Implementations are shared by reference between all worker threads,
/// so the callbacks take `&self` and must be safe to call concurrently.
pub trait SearchMonitor<T>: Send + Sync
where
    T: CostNumeric,
{
    /// Called for every partial tour a worker takes up for expansion.
    fn on_analyse(&self, tour: &Tour<'_, T>);

    /// Called when a worker records a strictly shorter complete tour.
    /// The tour is closed at this point.
    fn on_shorter(&self, tour: &Tour<'_, T>);

    /// Called when a subtree is pruned against the shared bound.
    fn on_bound(&self, tour: &Tour<'_, T>);

    /// Returns the name of the monitor.
    fn name(&self) -> &str;
}

impl<T> std::fmt::Debug for dyn SearchMonitor<T>
where
    T: CostNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}

/// A monitor that observes nothing.
///
/// The callbacks compile down to nothing, so the silent path carries no
/// monitoring overhead in the hot search loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SilentMonitor;

impl SilentMonitor {
    /// Creates a new `SilentMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self
    }
}

impl<T> SearchMonitor<T> for SilentMonitor
where
    T: CostNumeric,
{
    #[inline(always)]
    fn on_analyse(&self, _: &Tour<'_, T>) {}

    #[inline(always)]
    fn on_shorter(&self, _: &Tour<'_, T>) {}

    #[inline(always)]
    fn on_bound(&self, _: &Tour<'_, T>) {}

    fn name(&self) -> &str {
        "SilentMonitor"
    }
}
