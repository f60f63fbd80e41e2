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

/// A bit mask selecting which diagnostic traces the solver prints.
///
/// The flags compose with `|`:
///
/// ```rust
/// use milepost_search::verbosity::Verbosity;
///
/// let verbosity = Verbosity::SHORTER | Verbosity::COUNTERS;
/// assert!(verbosity.contains(Verbosity::SHORTER));
/// assert!(!verbosity.contains(Verbosity::BOUND));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Verbosity(u32);

impl Verbosity {
    /// No diagnostic output.
    pub const NONE: Verbosity = Verbosity(0);
    /// Print the graph before solving.
    pub const GRAPH: Verbosity = Verbosity(1);
    /// Trace every strictly shorter tour as it is recorded.
    pub const SHORTER: Verbosity = Verbosity(2);
    /// Trace every subtree pruned against the shared bound.
    pub const BOUND: Verbosity = Verbosity(4);
    /// Trace every partial tour taken up for expansion.
    pub const ANALYSE: Verbosity = Verbosity(8);
    /// Print the counters block after solving.
    pub const COUNTERS: Verbosity = Verbosity(16);

    /// Creates a verbosity mask from raw bits, ignoring undefined bits.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Verbosity(bits & 0b11111)
    }

    /// Returns the raw bits of this mask.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if every flag in `other` is set in `self`.
    #[inline]
    pub const fn contains(self, other: Verbosity) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Verbosity {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Verbosity(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Verbosity {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::fmt::Display for Verbosity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Verbosity({:#07b})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_contains_nothing_but_none() {
        assert!(Verbosity::NONE.contains(Verbosity::NONE));
        assert!(!Verbosity::NONE.contains(Verbosity::GRAPH));
        assert!(!Verbosity::NONE.contains(Verbosity::COUNTERS));
    }

    #[test]
    fn test_composition_with_bitor() {
        let verbosity = Verbosity::SHORTER | Verbosity::BOUND;
        assert!(verbosity.contains(Verbosity::SHORTER));
        assert!(verbosity.contains(Verbosity::BOUND));
        assert!(!verbosity.contains(Verbosity::ANALYSE));
        assert!(verbosity.contains(Verbosity::SHORTER | Verbosity::BOUND));
    }

    #[test]
    fn test_from_bits_masks_undefined_bits() {
        let verbosity = Verbosity::from_bits(0xFF);
        assert_eq!(verbosity.bits(), 0b11111);
        assert!(verbosity.contains(Verbosity::GRAPH));
        assert!(verbosity.contains(Verbosity::COUNTERS));
    }

    #[test]
    fn test_bits_roundtrip() {
        let verbosity = Verbosity::from_bits(10);
        assert_eq!(verbosity.bits(), 10);
        assert!(verbosity.contains(Verbosity::SHORTER));
        assert!(verbosity.contains(Verbosity::ANALYSE));
    }
}
