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

//! # Lock-Free FIFO Work Queue
//!
//! A Michael–Scott unbounded queue over stamped references. `enqueue`
//! takes ownership of a value and links it as the tail; `try_dequeue`
//! transfers ownership of the oldest value to the caller or reports the
//! queue as currently empty. Both operations are lock-free and never
//! block; emptiness is a signalling value, not an error.
//!
//! ## Structure
//!
//! The queue always holds at least one node: a sentinel whose value slot
//! has been consumed. `head` points at the sentinel, the first real
//! element lives in `sentinel.next`, and `tail` points at the last node
//! or its immediate predecessor (the "lagging tail" window). Both
//! `enqueue` and `try_dequeue` help a lagging tail forward.
//!
//! ## Memory reclamation
//!
//! Unlinking a sentinel must not free it: racing threads may still hold
//! its address and read its `next` cell. Instead, the dequeuer *retires*
//! the node onto an internal Treiber stack (reusing the node's `next`
//! cell as the stack link, which is safe because every queue path
//! re-validates its snapshot against the stamped `head`/`tail` before
//! acting on it). Retired nodes stay allocated until the queue is
//! dropped, so no pointer observed by a racing thread ever dangles, and
//! the stamp rules out ABA on the recycled links.

use crate::stamped::StampedRef;
use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::marker::PhantomData;

struct Node<V> {
    value: UnsafeCell<Option<V>>,
    next: StampedRef<Node<V>>,
}

impl<V> Node<V> {
    #[inline]
    fn new(value: Option<V>) -> Self {
        Self {
            value: UnsafeCell::new(value),
            next: StampedRef::null(),
        }
    }
}

/// An unbounded lock-free FIFO queue.
pub struct WorkQueue<V> {
    head: CachePadded<StampedRef<Node<V>>>,
    tail: CachePadded<StampedRef<Node<V>>>,
    /// Treiber stack of retired sentinels, freed when the queue drops.
    retired: StampedRef<Node<V>>,
    _marker: PhantomData<V>,
}

unsafe impl<V: Send> Send for WorkQueue<V> {}
unsafe impl<V: Send> Sync for WorkQueue<V> {}

impl<V> Default for WorkQueue<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> WorkQueue<V> {
    /// Creates an empty queue.
    #[inline]
    pub fn new() -> Self {
        let sentinel = Box::into_raw(Box::new(Node::new(None)));
        Self {
            head: CachePadded::new(StampedRef::new(sentinel, 0)),
            tail: CachePadded::new(StampedRef::new(sentinel, 0)),
            retired: StampedRef::null(),
            _marker: PhantomData,
        }
    }

    /// Appends a value at the tail of the queue.
    ///
    /// Takes ownership of `value`; the value is visible to subsequent
    /// dequeuers once this call returns. Lock-free: completes in a finite
    /// number of steps regardless of contention.
    pub fn enqueue(&self, value: V) {
        let node = Box::into_raw(Box::new(Node::new(Some(value))));

        loop {
            let (tail, tail_stamp) = self.tail.load();
            let (next, next_stamp) = unsafe { (*tail).next.load() };

            // Snapshot validation: `tail` must not have moved between the
            // two loads, or `next` belongs to a superseded node.
            let (tail_check, tail_stamp_check) = self.tail.load();
            if tail != tail_check || tail_stamp != tail_stamp_check {
                continue;
            }

            if next.is_null() {
                if unsafe {
                    (*tail)
                        .next
                        .compare_and_set(next, node, next_stamp, next_stamp.wrapping_add(1))
                } {
                    // Linked; swinging the tail is best-effort, a
                    // competing thread may already have helped.
                    self.tail
                        .compare_and_set(tail, node, tail_stamp, tail_stamp.wrapping_add(1));
                    return;
                }
            } else {
                // Tail is lagging behind the true last node; help it.
                self.tail
                    .compare_and_set(tail, next, tail_stamp, tail_stamp.wrapping_add(1));
            }
        }
    }

    /// Removes and returns the oldest value, or `None` if the queue is
    /// currently observed empty.
    ///
    /// Lock-free and non-blocking; emptiness drives the caller's
    /// termination logic and is not an error.
    pub fn try_dequeue(&self) -> Option<V> {
        loop {
            let (head, head_stamp) = self.head.load();
            let (tail, tail_stamp) = self.tail.load();
            let (next, _) = unsafe { (*head).next.load() };

            let (head_check, head_stamp_check) = self.head.load();
            if head != head_check || head_stamp != head_stamp_check {
                continue;
            }

            if head == tail {
                if next.is_null() {
                    return None;
                }
                // Non-null next behind a caught-up tail: the tail lags,
                // help it forward and retry.
                self.tail
                    .compare_and_set(tail, next, tail_stamp, tail_stamp.wrapping_add(1));
                continue;
            }

            // head != tail implies the sentinel has a successor: the
            // successor was linked before tail moved past it, and it
            // cannot be unlinked while `head` is still the sentinel.
            debug_assert!(!next.is_null());

            if self
                .head
                .compare_and_set(head, next, head_stamp, head_stamp.wrapping_add(1))
            {
                // We unlinked `head`; `next` is the new sentinel and only
                // this thread may consume its value slot.
                let value = unsafe { (*(*next).value.get()).take() };
                debug_assert!(
                    value.is_some(),
                    "called `WorkQueue::try_dequeue` on a node whose value was already consumed"
                );
                unsafe { self.retire(head) };
                return value;
            }
        }
    }

    /// Pushes an unlinked sentinel onto the retired stack.
    ///
    /// # Safety
    ///
    /// `node` must have been unlinked from the queue by this thread's
    /// successful head CAS, so no other thread will retire it again.
    unsafe fn retire(&self, node: *mut Node<V>) {
        loop {
            let (top, top_stamp) = self.retired.load();
            let (_, link_stamp) = unsafe { (*node).next.load() };
            unsafe { (*node).next.store(top, link_stamp.wrapping_add(1)) };
            if self
                .retired
                .compare_and_set(top, node, top_stamp, top_stamp.wrapping_add(1))
            {
                return;
            }
        }
    }
}

impl<V> Drop for WorkQueue<V> {
    fn drop(&mut self) {
        // Retired sentinels: value slots already consumed.
        let (mut current, _) = self.retired.load();
        while !current.is_null() {
            let node = unsafe { Box::from_raw(current) };
            current = node.next.load().0;
        }

        // Live chain: the sentinel plus any values never dequeued.
        let (mut current, _) = self.head.load();
        while !current.is_null() {
            let node = unsafe { Box::from_raw(current) };
            current = node.next.load().0;
        }
    }
}

impl<V> std::fmt::Debug for WorkQueue<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (_, head_stamp) = self.head.load();
        let (_, tail_stamp) = self.tail.load();
        write!(
            f,
            "WorkQueue(head_stamp: {}, tail_stamp: {})",
            head_stamp, tail_stamp
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_empty_queue_returns_none() {
        let queue: WorkQueue<u32> = WorkQueue::new();
        assert_eq!(queue.try_dequeue(), None);
        assert_eq!(queue.try_dequeue(), None);
    }

    #[test]
    fn test_fifo_order_single_thread() {
        let queue = WorkQueue::new();
        for i in 0..100u32 {
            queue.enqueue(i);
        }
        for i in 0..100u32 {
            assert_eq!(queue.try_dequeue(), Some(i));
        }
        assert_eq!(queue.try_dequeue(), None);
    }

    #[test]
    fn test_interleaved_enqueue_dequeue() {
        let queue = WorkQueue::new();
        queue.enqueue(1u32);
        queue.enqueue(2);
        assert_eq!(queue.try_dequeue(), Some(1));
        queue.enqueue(3);
        assert_eq!(queue.try_dequeue(), Some(2));
        assert_eq!(queue.try_dequeue(), Some(3));
        assert_eq!(queue.try_dequeue(), None);
        queue.enqueue(4);
        assert_eq!(queue.try_dequeue(), Some(4));
    }

    #[test]
    fn test_boxed_values_transfer_ownership() {
        let queue = WorkQueue::new();
        queue.enqueue(Box::new(String::from("alpha")));
        queue.enqueue(Box::new(String::from("beta")));
        assert_eq!(*queue.try_dequeue().unwrap(), "alpha");
        assert_eq!(*queue.try_dequeue().unwrap(), "beta");
    }

    /// A value that counts its drops, for leak accounting.
    struct Counted<'a>(&'a AtomicUsize);

    impl<'a> Drop for Counted<'a> {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_drop_releases_every_value_exactly_once() {
        let drops = AtomicUsize::new(0);
        {
            let queue = WorkQueue::new();
            for _ in 0..10 {
                queue.enqueue(Counted(&drops));
            }
            // Consume four values; six remain in the queue.
            for _ in 0..4 {
                let value = queue.try_dequeue().unwrap();
                drop(value);
            }
            assert_eq!(drops.load(Ordering::Relaxed), 4);
        }
        // Dropping the queue frees the remaining six, no more, no less.
        assert_eq!(drops.load(Ordering::Relaxed), 10);
    }

    #[test]
    fn test_concurrent_producers_consumers_preserve_multiset_and_order() {
        // M producers each enqueue K distinguishable values while M
        // consumers drain; the dequeued multiset must equal the enqueued
        // one, and each producer's values must come out in order.
        const PRODUCERS: usize = 4;
        const CONSUMERS: usize = 4;
        const PER_PRODUCER: usize = 2500;

        let queue: WorkQueue<(usize, usize)> = WorkQueue::new();
        let drained: std::sync::Mutex<Vec<Vec<(usize, usize)>>> =
            std::sync::Mutex::new(Vec::new());
        let produced_done = AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for producer in 0..PRODUCERS {
                let queue = &queue;
                let produced_done = &produced_done;
                scope.spawn(move || {
                    for seq in 0..PER_PRODUCER {
                        queue.enqueue((producer, seq));
                    }
                    produced_done.fetch_add(1, Ordering::Release);
                });
            }

            for _ in 0..CONSUMERS {
                let queue = &queue;
                let drained = &drained;
                let produced_done = &produced_done;
                scope.spawn(move || {
                    let mut local = Vec::new();
                    loop {
                        match queue.try_dequeue() {
                            Some(item) => local.push(item),
                            None => {
                                if produced_done.load(Ordering::Acquire) == PRODUCERS {
                                    // One more look: a producer may have
                                    // published between our miss and the
                                    // counter read.
                                    match queue.try_dequeue() {
                                        Some(item) => local.push(item),
                                        None => break,
                                    }
                                } else {
                                    std::hint::spin_loop();
                                }
                            }
                        }
                    }
                    drained.lock().unwrap().push(local);
                });
            }
        });

        let drained = drained.into_inner().unwrap();
        let total: usize = drained.iter().map(Vec::len).sum();
        assert_eq!(total, PRODUCERS * PER_PRODUCER);

        // Multiset equality: every (producer, seq) pair seen exactly once.
        let mut seen = vec![vec![false; PER_PRODUCER]; PRODUCERS];
        for (producer, seq) in drained.iter().flatten() {
            assert!(!seen[*producer][*seq], "value dequeued twice");
            seen[*producer][*seq] = true;
        }

        // Per-producer FIFO: within one consumer, sequence numbers of a
        // given producer must be increasing (FIFO linearization carries
        // over to any single observer).
        for local in &drained {
            let mut last_seen: HashMap<usize, usize> = HashMap::new();
            for (producer, seq) in local {
                if let Some(previous) = last_seen.insert(*producer, *seq) {
                    assert!(
                        previous < *seq,
                        "producer {} order violated: {} before {}",
                        producer,
                        previous,
                        seq
                    );
                }
            }
        }
    }

    #[test]
    fn test_concurrent_stress_mixed_operations() {
        const THREADS: usize = 8;
        const OPS: usize = 5000;

        let queue: WorkQueue<usize> = WorkQueue::new();
        let dequeued = AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for thread in 0..THREADS {
                let queue = &queue;
                let dequeued = &dequeued;
                scope.spawn(move || {
                    for op in 0..OPS {
                        if (thread + op) % 2 == 0 {
                            queue.enqueue(thread * OPS + op);
                        } else if queue.try_dequeue().is_some() {
                            dequeued.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }
        });

        // Drain the rest; totals must match.
        let mut remaining = 0usize;
        while queue.try_dequeue().is_some() {
            remaining += 1;
        }
        let enqueued_total = THREADS * OPS / 2;
        assert_eq!(dequeued.load(Ordering::Relaxed) + remaining, enqueued_total);
    }
}
