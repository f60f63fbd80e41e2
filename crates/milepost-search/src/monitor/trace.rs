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

use crate::{monitor::search_monitor::SearchMonitor, num::CostNumeric, verbosity::Verbosity};
use milepost_model::tour::Tour;

/// A monitor that traces search events to stdout, gated by the
/// verbosity mask.
///
/// Each enabled event prints one line:
/// - `analysing <tour>` for every tour taken up for expansion,
/// - `shorter: <tour>` for every strictly shorter tour recorded,
/// - `bound <tour>` for every subtree pruned against the shared bound.
///
/// `println!` serializes on the stdout lock, so lines from different
/// workers never interleave within one line, but their relative order is
/// scheduling-dependent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceMonitor {
    verbosity: Verbosity,
}

impl TraceMonitor {
    /// Creates a trace monitor printing the events enabled in the given
    /// verbosity mask.
    #[inline]
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// Returns the verbosity mask of this monitor.
    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }
}

impl std::fmt::Display for TraceMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TraceMonitor({})", self.verbosity)
    }
}

impl<T> SearchMonitor<T> for TraceMonitor
where
    T: CostNumeric,
{
    fn on_analyse(&self, tour: &Tour<'_, T>) {
        if self.verbosity.contains(Verbosity::ANALYSE) {
            println!("analysing {}", tour);
        }
    }

    fn on_shorter(&self, tour: &Tour<'_, T>) {
        if self.verbosity.contains(Verbosity::SHORTER) {
            println!("shorter: {}", tour);
        }
    }

    fn on_bound(&self, tour: &Tour<'_, T>) {
        if self.verbosity.contains(Verbosity::BOUND) {
            println!("bound {}", tour);
        }
    }

    fn name(&self) -> &str {
        "TraceMonitor"
    }
}
