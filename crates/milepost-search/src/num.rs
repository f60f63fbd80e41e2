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

use milepost_core::num::constants::Zero;
use milepost_core::num::ops::saturating_arithmetic::{SaturatingAddVal, SaturatingSubVal};
use num_traits::{PrimInt, Signed};

/// A trait alias for numeric types that can be used as edge weights by
/// the solver. These are the signed integer types `i8`, `i16`, `i32` and
/// `i64`: the shared best-cost cell is an `i64` atomic, so every weight
/// type must convert into `i64` losslessly.
///
/// # Note
///
/// `i128` is intentionally excluded: it does not fit the shared atomic
/// cell, and is significantly slower on many platforms anyway.
pub trait CostNumeric:
    PrimInt
    + Signed
    + Into<i64>
    + Zero
    + SaturatingAddVal
    + SaturatingSubVal
    + std::fmt::Debug
    + std::fmt::Display
    + Send
    + Sync
{
}

impl<T> CostNumeric for T where
    T: PrimInt
        + Signed
        + Into<i64>
        + Zero
        + SaturatingAddVal
        + SaturatingSubVal
        + std::fmt::Debug
        + std::fmt::Display
        + Send
        + Sync
{
}
