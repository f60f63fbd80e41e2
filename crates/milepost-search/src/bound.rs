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

//! # Shared Best Cost (Global Upper Bound)
//!
//! A concurrent cell holding the cost of the best complete tour found so
//! far. It exposes a fast, lock-free read via an atomic and is updated
//! exclusively through a monotone compare-and-set loop, so the value can
//! only ever decrease for the duration of a solve. Designed for exact
//! search where multiple worker threads propose improvements and prune
//! against the current bound.
//!
//! ## Motivation
//!
//! - Cheap pruning reads: workers reload the bound on every bounding
//!   test; a plain atomic load keeps that test branch-cheap.
//! - Monotonicity by construction: `tighten` refuses to ever raise the
//!   value, even under arbitrary interleavings, because each CAS is
//!   conditioned on the freshly observed current value.
//! - Simple sentinel: `i64::MAX` means "no tour recorded yet"; seeding
//!   from any valid tour merely tightens it first.
//!
//! ## Concurrency
//!
//! Acquire/release on a single cell. Workers may observe stale (larger)
//! values between reads, which merely weakens pruning — never
//! correctness. The tour matching the final bound is kept worker-locally
//! and selected after all workers have joined, so this cell never needs
//! to store a tour.

use std::sync::atomic::{AtomicI64, Ordering};

/// A concurrent holder for the best (lowest) tour cost found during
/// search.
#[derive(Debug)]
pub struct SharedBound {
    /// Cost of the best complete tour, `i64::MAX` while none exists.
    upper_bound: AtomicI64,
}

impl Default for SharedBound {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SharedBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedBound(upper_bound: {})", self.load())
    }
}

impl SharedBound {
    /// Creates a new shared bound with no tour recorded.
    /// The initial value is `i64::MAX`.
    #[inline]
    pub fn new() -> Self {
        Self {
            upper_bound: AtomicI64::new(i64::MAX),
        }
    }

    /// Returns the current upper bound.
    #[inline]
    pub fn load(&self) -> i64 {
        self.upper_bound.load(Ordering::Acquire)
    }

    /// Attempts to lower the bound to `candidate`.
    ///
    /// Loops a compare-and-set while the observed value is larger than
    /// the candidate; exits as soon as either the CAS succeeds or another
    /// thread has installed an equal or better bound. Returns `true` if
    /// this call installed the candidate.
    #[inline]
    pub fn tighten(&self, candidate: i64) -> bool {
        let mut current = self.upper_bound.load(Ordering::Acquire);
        while current > candidate {
            match self.upper_bound.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
        false
    }
}
