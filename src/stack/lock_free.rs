//! Lock-Free Stack Implementation
//!
//! A Treiber stack: a singly linked list whose head pointer is only ever changed through
//! compare-and-swap. Popped nodes are reclaimed through `crossbeam-epoch`, so a node is
//! freed only after every thread that could still hold a snapshot of it has unpinned.
//!
//! ## Memory Ordering
//!
//! - `push`: `Release` on the successful CAS publishes the node's value and link
//! - `pop`: `Acquire` on the head load makes the node's contents visible before they are read
//! - `len`: `Relaxed`, the counter is only an approximation while operations are in flight

use core::fmt;
use core::mem::{self, ManuallyDrop};
use core::ptr;
use core::sync::atomic::{AtomicIsize, Ordering};

use crossbeam_epoch::{self as epoch, Atomic, Owned, Shared};

use crate::metrics::{AtomicMetrics, MetricsCollector, PerformanceMetrics};
use crate::util::CachePadded;

/// A node in the lock-free stack
struct Node<T> {
    value: ManuallyDrop<T>,
    next: *const Node<T>,
}

/// A lock-free LIFO stack based on Treiber's algorithm
///
/// `push` never fails and `pop` returns `None` on an empty stack; there is no error type.
/// Both retry their CAS until they win, so an individual thread may retry indefinitely
/// under sustained contention, but every failed attempt means another thread succeeded.
///
/// # Examples
///
/// ```rust
/// use conkit::LockFreeStack;
///
/// let stack = LockFreeStack::new();
///
/// stack.push(1);
/// stack.push(2);
///
/// assert_eq!(stack.pop(), Some(2));
/// assert_eq!(stack.pop(), Some(1));
/// assert_eq!(stack.pop(), None);
/// ```
pub struct LockFreeStack<T> {
    head: CachePadded<Atomic<Node<T>>>,
    /// Updated after the head CAS, so it may briefly run behind the list or dip below zero.
    size: CachePadded<AtomicIsize>,
    metrics: AtomicMetrics,
}

// Values only ever move between threads whole; no `T` is shared.
unsafe impl<T: Send> Send for LockFreeStack<T> {}
unsafe impl<T: Send> Sync for LockFreeStack<T> {}

impl<T> LockFreeStack<T> {
    /// Create a new empty lock-free stack
    ///
    /// # Examples
    ///
    /// ```rust
    /// use conkit::LockFreeStack;
    ///
    /// let stack: LockFreeStack<i32> = LockFreeStack::new();
    /// assert!(stack.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            head: CachePadded::new(Atomic::null()),
            size: CachePadded::new(AtomicIsize::new(0)),
            metrics: AtomicMetrics::default(),
        }
    }

    /// Push a value onto the stack
    ///
    /// Snapshots the head, links the new node in front of it and swings the head to the new
    /// node. A failed swing retakes the snapshot and tries again.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use conkit::LockFreeStack;
    ///
    /// let stack = LockFreeStack::new();
    /// stack.push(42);
    /// assert_eq!(stack.len(), 1);
    /// ```
    pub fn push(&self, value: T) {
        let start = self.metrics.start();
        let mut node = Owned::new(Node {
            value: ManuallyDrop::new(value),
            next: ptr::null(),
        });

        let guard = epoch::pin();
        loop {
            let head = self.head.load(Ordering::Relaxed, &guard);
            node.next = head.as_raw();

            match self
                .head
                .compare_exchange(head, node, Ordering::Release, Ordering::Relaxed, &guard)
            {
                Ok(_) => {
                    self.size.fetch_add(1, Ordering::Relaxed);
                    self.metrics.record_success(start);
                    return;
                }
                Err(err) => {
                    node = err.new;
                    self.metrics.record_contention();
                }
            }
        }
    }

    /// Pop the value on top of the stack
    ///
    /// # Returns
    ///
    /// * `Some(value)` if the stack was not empty
    /// * `None` if the stack was empty
    ///
    /// # Examples
    ///
    /// ```rust
    /// use conkit::LockFreeStack;
    ///
    /// let stack = LockFreeStack::new();
    /// stack.push(42);
    ///
    /// assert_eq!(stack.pop(), Some(42));
    /// assert_eq!(stack.pop(), None);
    /// ```
    pub fn pop(&self) -> Option<T> {
        let start = self.metrics.start();
        let guard = epoch::pin();

        loop {
            let head = self.head.load(Ordering::Acquire, &guard);

            // SAFETY: `head` was loaded under `guard`, so it cannot have been freed yet.
            let Some(node) = (unsafe { head.as_ref() }) else {
                self.metrics.record_failure();
                return None;
            };
            let next = Shared::from(node.next);

            if self
                .head
                .compare_exchange(head, next, Ordering::Acquire, Ordering::Relaxed, &guard)
                .is_ok()
            {
                self.size.fetch_sub(1, Ordering::Relaxed);

                // SAFETY: the CAS detached `head`, so this thread is the only one that will
                // ever take its value. The deferred destroy below does not drop it again.
                let value = ManuallyDrop::into_inner(unsafe { ptr::read(&node.value) });

                // SAFETY: `head` is unreachable from the stack and is not touched again here.
                unsafe { guard.defer_destroy(head) };

                self.metrics.record_success(start);
                return Some(value);
            }

            self.metrics.record_contention();
        }
    }

    /// Get the number of elements in the stack
    ///
    /// Reads the auxiliary counter, so this is O(1). While pushes and pops are in flight the
    /// result may briefly disagree with the list; it is exact once the stack is quiescent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use conkit::LockFreeStack;
    ///
    /// let stack = LockFreeStack::new();
    /// stack.push(1);
    /// stack.push(2);
    /// assert_eq!(stack.len(), 2);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.size.load(Ordering::Relaxed).max(0) as usize
    }

    /// Check if the stack is empty, with the same consistency as [`len`](Self::len)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for LockFreeStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for LockFreeStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockFreeStack")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl<T> FromIterator<T> for LockFreeStack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut stack = Self::new();
        stack.extend(iter);
        stack
    }
}

impl<T> Extend<T> for LockFreeStack<T> {
    /// Pushes in iteration order, leaving the last element on top.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> Drop for LockFreeStack<T> {
    fn drop(&mut self) {
        let mut current = mem::take(&mut *self.head);
        let mut reclaimed = 0usize;

        // SAFETY: `&mut self` rules out concurrent access, and every non-null node was
        // allocated by `push` and is still owned by the list.
        while let Some(node) = unsafe { current.try_into_owned() }.map(Owned::into_box) {
            let node = *node;
            drop(ManuallyDrop::into_inner(node.value));
            current = Atomic::from(node.next);
            reclaimed += 1;
        }

        log::trace!("lock-free stack dropped with {reclaimed} remaining nodes");
    }
}

impl<T> MetricsCollector for LockFreeStack<T> {
    fn metrics(&self) -> PerformanceMetrics {
        self.metrics.snapshot()
    }

    fn reset_metrics(&self) {
        self.metrics.reset();
    }

    fn set_metrics_enabled(&self, enabled: bool) {
        self.metrics.set_enabled(enabled);
    }

    fn is_metrics_enabled(&self) -> bool {
        self.metrics.is_enabled()
    }
}
