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

//! # Stamped Atomic Reference
//!
//! A 128-bit word pairing a raw pointer with a 64-bit stamp, with atomic
//! load, store, and compare-and-set on the pair. The stamp's sole purpose
//! is ABA defence: between observing an expected pointer and attempting a
//! CAS on it, the same address may be recycled for another node; the
//! stamp distinguishes such reuses, because every successful CAS on a
//! cell increments its stamp by exactly one.
//!
//! ## Memory ordering
//!
//! Loads are acquire and stores/successful CAS are release, so a node
//! published through a stamped cell is fully visible to the thread that
//! subsequently observes the pointer. (Relaxed orderings are not enough
//! here: the pointed-to node's fields must be synchronized along with the
//! pointer itself.)
//!
//! ## Platform requirements
//!
//! The pair is packed into a single `AtomicU128`; `portable-atomic`
//! lowers it to the platform's double-word CAS (`cmpxchg16b` on x86_64,
//! `casp` on aarch64) and falls back to a non-lock-free implementation
//! only on targets without one.

use portable_atomic::{AtomicU128, Ordering};
use std::marker::PhantomData;

#[inline(always)]
fn pack<T>(ptr: *mut T, stamp: u64) -> u128 {
    ((stamp as u128) << 64) | (ptr as usize as u64 as u128)
}

#[inline(always)]
fn unpack<T>(word: u128) -> (*mut T, u64) {
    let ptr = word as u64 as usize as *mut T;
    let stamp = (word >> 64) as u64;
    (ptr, stamp)
}

/// An atomic (pointer, stamp) pair.
///
/// Like `std::sync::atomic::AtomicPtr`, this type only stores a raw
/// pointer; it does not own the pointee, and dereferencing a loaded
/// pointer is up to the caller.
pub struct StampedRef<T> {
    cell: AtomicU128,
    _marker: PhantomData<*mut T>,
}

// Same contract as `AtomicPtr<T>`: the cell itself is just a word; any
// access to the pointee requires unsafe code at the use site.
unsafe impl<T> Send for StampedRef<T> {}
unsafe impl<T> Sync for StampedRef<T> {}

impl<T> StampedRef<T> {
    /// Creates a new stamped reference holding the given pair.
    #[inline]
    pub fn new(ptr: *mut T, stamp: u64) -> Self {
        Self {
            cell: AtomicU128::new(pack(ptr, stamp)),
            _marker: PhantomData,
        }
    }

    /// Creates a stamped null reference with stamp zero.
    #[inline]
    pub fn null() -> Self {
        Self::new(std::ptr::null_mut(), 0)
    }

    /// Atomically loads the (pointer, stamp) pair.
    #[inline]
    pub fn load(&self) -> (*mut T, u64) {
        unpack(self.cell.load(Ordering::Acquire))
    }

    /// Atomically stores the given (pointer, stamp) pair.
    #[inline]
    pub fn store(&self, ptr: *mut T, stamp: u64) {
        self.cell.store(pack(ptr, stamp), Ordering::Release);
    }

    /// Atomically replaces the pair with (`new_ptr`, `new_stamp`) if it
    /// currently equals (`current_ptr`, `current_stamp`).
    ///
    /// Returns `true` on success. Callers must uphold the stamping
    /// discipline: `new_stamp` is `current_stamp + 1`, so that any
    /// observed (pointer, stamp) pair is unique over the cell's lifetime.
    #[inline]
    pub fn compare_and_set(
        &self,
        current_ptr: *mut T,
        new_ptr: *mut T,
        current_stamp: u64,
        new_stamp: u64,
    ) -> bool {
        self.cell
            .compare_exchange(
                pack(current_ptr, current_stamp),
                pack(new_ptr, new_stamp),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

impl<T> std::fmt::Debug for StampedRef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (ptr, stamp) = self.load();
        write!(f, "StampedRef(ptr: {:p}, stamp: {})", ptr, stamp)
    }
}
