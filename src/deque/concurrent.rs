//! Concurrent Deque Implementation
//!
//! A doubly linked double-ended queue guarded by a single `parking_lot::RwLock`. Read-only
//! operations share the lock; every mutation takes it exclusively, so no two mutations
//! interleave and readers never observe a half-relinked list. Guards are released on every
//! exit path by `Drop`.
//!
//! ## Element handles
//!
//! Nodes live in a slot arena. An [`ElementRef`] names a node by its owning deque, slot and
//! slot generation. [`ConcurrentDeque::remove`] validates all three before touching any link,
//! so a handle that is stale, was minted by another deque, or outlived a `clear` is rejected
//! with [`Error::NotFound`] instead of being followed.
//!
//! ## Performance Characteristics
//!
//! - **push/pop/front/back**: O(1)
//! - **get**: O(min(i, len - i)), walking from the closer end
//! - **remove**: O(1) validation and unlink
//! - **rotate(n)**: O(min(n, len - n)) boundary moves after normalizing `n`
//! - **reverse**: `len / 2` value swaps
//!
//! ## Example
//!
//! ```rust
//! use conkit::ConcurrentDeque;
//!
//! let deque = ConcurrentDeque::new();
//! deque.push_back([1, 2, 3, 4, 5]);
//!
//! deque.rotate(2);
//! assert_eq!(deque.to_vec(), vec![4, 5, 1, 2, 3]);
//!
//! deque.rotate(-3);
//! assert_eq!(deque.to_vec(), vec![2, 3, 4, 5, 1]);
//! ```

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::arena::Key;
use super::iter::Iter;
use super::list::List;
use crate::metrics::{AtomicMetrics, MetricsCollector, PerformanceMetrics};
use crate::{Error, Result};

static NEXT_DEQUE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque handle to one element of a [`ConcurrentDeque`]
///
/// A handle keeps naming the same node while it stays linked. [`rotate`] moves nodes, so
/// the handle follows its value; [`reverse`] swaps values between nodes, so the handle then
/// observes whichever value moved into its node. Removing the element, or clearing the deque,
/// retires the handle for good.
///
/// [`rotate`]: ConcurrentDeque::rotate
/// [`reverse`]: ConcurrentDeque::reverse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef {
    owner: u64,
    key: Key,
}

/// A double-ended queue safe for concurrent use through a reader/writer lock
///
/// # Type Parameters
///
/// * `T` - The type of elements stored in the deque. Accessors that hand out elements
///   without removing them (`front`, `get`, `to_vec`, iteration) clone and need `T: Clone`.
///
/// # Examples
///
/// ```rust
/// use conkit::ConcurrentDeque;
///
/// let deque = ConcurrentDeque::new();
/// deque.push_back(["a", "b", "c"]);
///
/// assert_eq!(deque.get(0), Some("a"));
/// assert_eq!(deque.get(5), None);
/// assert_eq!(deque.pop_back(), Ok("c"));
/// ```
pub struct ConcurrentDeque<T> {
    id: u64,
    inner: RwLock<List<T>>,
    metrics: AtomicMetrics,
}

impl<T> ConcurrentDeque<T> {
    /// Create a new empty deque
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new empty deque whose node arena can hold `capacity` elements before growing
    ///
    /// Capacity is a sizing hint only; the deque is unbounded. Whenever the deque drains to
    /// empty, arena storage beyond this capacity is released.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id: NEXT_DEQUE_ID.fetch_add(1, Ordering::Relaxed),
            inner: RwLock::new(List::with_capacity(capacity)),
            metrics: AtomicMetrics::default(),
        }
    }

    // Recursive so a thread already holding a read guard (an `Iter`) can take another one
    // while a writer is queued.
    fn read(&self) -> RwLockReadGuard<'_, List<T>> {
        match self.inner.try_read_recursive() {
            Some(guard) => guard,
            None => {
                self.metrics.record_contention();
                self.inner.read_recursive()
            }
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, List<T>> {
        match self.inner.try_write() {
            Some(guard) => guard,
            None => {
                self.metrics.record_contention();
                self.inner.write()
            }
        }
    }

    fn element_ref(&self, key: Key) -> ElementRef {
        ElementRef {
            owner: self.id,
            key,
        }
    }

    fn record<R>(&self, start: Option<std::time::Instant>, result: Result<R>) -> Result<R> {
        match &result {
            Ok(_) => self.metrics.record_success(start),
            Err(_) => self.metrics.record_failure(),
        }
        result
    }

    /// Number of elements in the deque
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if the deque is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert values at the front, keeping their order
    ///
    /// The first value ends up closest to the front.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use conkit::ConcurrentDeque;
    ///
    /// let deque = ConcurrentDeque::new();
    /// deque.push_back(["x"]);
    /// deque.push_front(["a", "b", "c"]);
    /// assert_eq!(deque.to_vec(), vec!["a", "b", "c", "x"]);
    /// ```
    pub fn push_front<I>(&self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut list = self.write();
        let mut anchor: Option<usize> = None;

        for value in values {
            let key = match anchor {
                Some(index) => list.insert_after(index, value),
                None => list.push_front(value),
            };
            anchor = Some(key.index);
        }
    }

    /// Append values at the back in iteration order
    pub fn push_back<I>(&self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut list = self.write();
        for value in values {
            list.push_back(value);
        }
    }

    /// Insert a single value at the front and return a handle to it
    pub fn push_front_ref(&self, value: T) -> ElementRef {
        let key = self.write().push_front(value);
        self.element_ref(key)
    }

    /// Append a single value at the back and return a handle to it
    pub fn push_back_ref(&self, value: T) -> ElementRef {
        let key = self.write().push_back(value);
        self.element_ref(key)
    }

    /// Remove and return the front element
    ///
    /// # Errors
    ///
    /// [`Error::EmptyQueue`] when the deque has no elements.
    pub fn pop_front(&self) -> Result<T> {
        let start = self.metrics.start();
        let result = {
            let mut list = self.write();
            match list.head() {
                Some(head) => list.unlink(head),
                None => Err(Error::EmptyQueue),
            }
        };
        self.record(start, result)
    }

    /// Remove and return the back element
    ///
    /// # Errors
    ///
    /// [`Error::EmptyQueue`] when the deque has no elements.
    pub fn pop_back(&self) -> Result<T> {
        let start = self.metrics.start();
        let result = {
            let mut list = self.write();
            match list.tail() {
                Some(tail) => list.unlink(tail),
                None => Err(Error::EmptyQueue),
            }
        };
        self.record(start, result)
    }

    /// Remove the element named by `element`
    ///
    /// # Errors
    ///
    /// * [`Error::NilElement`] when no handle is given
    /// * [`Error::EmptyQueue`] when the deque has no elements
    /// * [`Error::NotFound`] when the handle belongs to another deque, or its element was
    ///   already removed or cleared
    ///
    /// # Examples
    ///
    /// ```rust
    /// use conkit::{ConcurrentDeque, Error};
    ///
    /// let deque = ConcurrentDeque::new();
    /// deque.push_back([1, 2, 3]);
    ///
    /// let two = deque.find_ref(|v| *v == 2);
    /// assert_eq!(deque.remove(two), Ok(2));
    /// assert_eq!(deque.remove(two), Err(Error::NotFound));
    /// assert_eq!(deque.remove(None), Err(Error::NilElement));
    /// assert_eq!(deque.to_vec(), vec![1, 3]);
    /// ```
    pub fn remove(&self, element: impl Into<Option<ElementRef>>) -> Result<T> {
        let start = self.metrics.start();
        let result = match element.into() {
            None => Err(Error::NilElement),
            Some(element) => {
                let mut list = self.write();
                if list.len() == 0 {
                    Err(Error::EmptyQueue)
                } else if element.owner != self.id || !list.contains(element.key) {
                    log::debug!(
                        "rejecting element reference {:?} for deque {}",
                        element,
                        self.id
                    );
                    Err(Error::NotFound)
                } else {
                    list.unlink(element.key.index)
                }
            }
        };
        self.record(start, result)
    }

    /// Whether `element` still names a linked element of this deque
    pub fn contains_ref(&self, element: &ElementRef) -> bool {
        element.owner == self.id && self.read().contains(element.key)
    }

    /// Handle to the front element
    pub fn front_ref(&self) -> Option<ElementRef> {
        let list = self.read();
        let key = list.key(list.head()?)?;
        Some(self.element_ref(key))
    }

    /// Handle to the back element
    pub fn back_ref(&self) -> Option<ElementRef> {
        let list = self.read();
        let key = list.key(list.tail()?)?;
        Some(self.element_ref(key))
    }

    /// Handle to the element at `index`, walking from the closer end
    pub fn get_ref(&self, index: usize) -> Option<ElementRef> {
        let list = self.read();
        let key = list.key(list.index_at(index)?)?;
        Some(self.element_ref(key))
    }

    /// Handle to the first element, front to back, that satisfies `predicate`
    pub fn find_ref<F>(&self, mut predicate: F) -> Option<ElementRef>
    where
        F: FnMut(&T) -> bool,
    {
        let list = self.read();
        let mut cursor = list.head();
        while let Some(index) = cursor {
            let node = list.node(index)?;
            if predicate(&node.value) {
                return list.key(index).map(|key| self.element_ref(key));
            }
            cursor = node.next;
        }
        None
    }

    /// Handles to every element, front to back
    pub fn refs(&self) -> Vec<ElementRef> {
        let list = self.read();
        let mut refs = Vec::with_capacity(list.len());
        let mut cursor = list.head();
        while let Some(index) = cursor {
            let Some(key) = list.key(index) else { break };
            refs.push(self.element_ref(key));
            cursor = list.node(index).and_then(|node| node.next);
        }
        refs
    }

    /// Remove every element, returning how many were removed
    ///
    /// All outstanding handles are retired and surplus node storage is released.
    pub fn clear(&self) -> usize {
        let removed = self.write().clear();
        log::trace!("cleared {removed} elements from deque {}", self.id);
        removed
    }

    /// Reverse element order in place
    ///
    /// Values are swapped pairwise from both ends inward; nodes are not relinked, so a handle
    /// keeps its position and now observes the value moved into it.
    pub fn reverse(&self) {
        let mut list = self.write();
        if list.len() > 1 {
            list.reverse();
        }
    }

    /// Rotate by `n` places
    ///
    /// Positive `n` moves the last `n` elements to the front; negative `n` moves the first
    /// `|n|` elements to the back. `n` is taken modulo the length, and whichever of the two
    /// equivalent directions needs fewer boundary moves is used.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use conkit::ConcurrentDeque;
    ///
    /// let deque: ConcurrentDeque<i32> = (1..=5).collect();
    /// deque.rotate(-1);
    /// assert_eq!(deque.to_vec(), vec![2, 3, 4, 5, 1]);
    /// deque.rotate(1);
    /// assert_eq!(deque.to_vec(), vec![1, 2, 3, 4, 5]);
    /// ```
    pub fn rotate(&self, n: isize) {
        let mut list = self.write();
        let len = list.len();
        if len <= 1 {
            return;
        }

        // `len` fits in isize: the arena is a Vec of non-zero-sized slots.
        let toward_back = n.rem_euclid(len as isize) as usize;
        if toward_back == 0 {
            return;
        }

        let toward_front = len - toward_back;
        if toward_back <= toward_front {
            log::trace!("rotating deque {}: {toward_back} back-to-front moves", self.id);
            for _ in 0..toward_back {
                list.move_back_to_front();
            }
        } else {
            log::trace!("rotating deque {}: {toward_front} front-to-back moves", self.id);
            for _ in 0..toward_front {
                list.move_front_to_back();
            }
        }
    }

    /// Count elements for which `eq(element, target)` holds
    ///
    /// # Examples
    ///
    /// ```rust
    /// use conkit::ConcurrentDeque;
    ///
    /// let deque = ConcurrentDeque::new();
    /// deque.push_back([1, 2, 3, 2, 4, 2, 5]);
    /// assert_eq!(deque.count(&2, |a, b| a == b), 3);
    /// ```
    pub fn count<F>(&self, target: &T, eq: F) -> usize
    where
        F: Fn(&T, &T) -> bool,
    {
        self.read().values().filter(|value| eq(*value, target)).count()
    }

    /// Consume the deque, returning its elements front to back
    ///
    /// # Errors
    ///
    /// [`Error::InvariantViolation`] if the internal links are found inconsistent. The
    /// elements not yet reached are dropped.
    pub fn into_vec(self) -> Result<Vec<T>> {
        let (values, err) = self.inner.into_inner().into_values();
        match err {
            Some(err) => {
                log::debug!("deque {} drained {} elements before: {err}", self.id, values.len());
                Err(err)
            }
            None => Ok(values),
        }
    }
}

impl<T: Clone> ConcurrentDeque<T> {
    /// Clone of the front element
    ///
    /// # Errors
    ///
    /// [`Error::EmptyQueue`] when the deque has no elements.
    pub fn front(&self) -> Result<T> {
        let start = self.metrics.start();
        let result = {
            let list = self.read();
            list.head()
                .and_then(|head| list.node(head))
                .map(|node| node.value.clone())
                .ok_or(Error::EmptyQueue)
        };
        self.record(start, result)
    }

    /// Clone of the back element
    ///
    /// # Errors
    ///
    /// [`Error::EmptyQueue`] when the deque has no elements.
    pub fn back(&self) -> Result<T> {
        let start = self.metrics.start();
        let result = {
            let list = self.read();
            list.tail()
                .and_then(|tail| list.node(tail))
                .map(|node| node.value.clone())
                .ok_or(Error::EmptyQueue)
        };
        self.record(start, result)
    }

    /// Clone of the element at `index`, or `None` when out of range
    ///
    /// Walks from the front when `index < len / 2` and from the back otherwise. Positions
    /// are unsigned, so a negative position cannot be expressed; `len()` and anything past it
    /// is the out-of-range case.
    pub fn get(&self, index: usize) -> Option<T> {
        let list = self.read();
        let node = list.node(list.index_at(index)?)?;
        Some(node.value.clone())
    }

    /// Current value of the element named by `element`
    pub fn get_by_ref(&self, element: &ElementRef) -> Option<T> {
        if element.owner != self.id {
            return None;
        }
        let list = self.read();
        if !list.contains(element.key) {
            return None;
        }
        list.node(element.key.index).map(|node| node.value.clone())
    }

    /// Snapshot of all elements, front to back
    pub fn to_vec(&self) -> Vec<T> {
        let list = self.read();
        let mut values = Vec::with_capacity(list.len());
        values.extend(list.values().cloned());
        values
    }

    /// Iterate `(index, value)` pairs front to back
    ///
    /// The iterator holds the shared lock until it is dropped: mutations from any thread
    /// block until then, and calling a mutating method on this deque from the iterating
    /// thread deadlocks. Read-only methods (`len`, `get`, `count`, `to_vec`, ...) stay
    /// callable from inside the loop, even while a writer is waiting. Stop early by dropping
    /// the iterator.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use conkit::ConcurrentDeque;
    ///
    /// let deque = ConcurrentDeque::new();
    /// deque.push_back(["apple", "banana"]);
    ///
    /// let pairs: Vec<_> = deque.iter().collect();
    /// assert_eq!(pairs, vec![(0, "apple"), (1, "banana")]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::forward(self.read())
    }

    /// Iterate `(index, value)` pairs back to front, indices counting down from `len - 1`
    ///
    /// Holds the shared lock for its whole lifetime, like [`iter`](Self::iter).
    pub fn iter_rev(&self) -> Iter<'_, T> {
        Iter::backward(self.read())
    }
}

impl<T> Default for ConcurrentDeque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for ConcurrentDeque<T> {
    /// Deep copy under the shared lock. The copy has its own identity, so handles from the
    /// original are not valid for it.
    fn clone(&self) -> Self {
        let list = self.read();
        let clone = Self::with_capacity(list.len());
        {
            let mut target = clone.inner.write();
            for value in list.values() {
                target.push_back(value.clone());
            }
        }
        clone
    }
}

impl<T: fmt::Debug> fmt::Debug for ConcurrentDeque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = self.read();
        f.debug_struct("ConcurrentDeque")
            .field("len", &list.len())
            .field("values", &DebugValues(&list))
            .finish()
    }
}

struct DebugValues<'a, T>(&'a List<T>);

impl<T: fmt::Debug> fmt::Debug for DebugValues<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.values()).finish()
    }
}

impl<T> FromIterator<T> for ConcurrentDeque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let deque = Self::new();
        deque.push_back(iter);
        deque
    }
}

impl<T> Extend<T> for ConcurrentDeque<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.push_back(iter);
    }
}

impl<T> From<Vec<T>> for ConcurrentDeque<T> {
    fn from(values: Vec<T>) -> Self {
        let deque = Self::with_capacity(values.len());
        deque.push_back(values);
        deque
    }
}

impl<T> MetricsCollector for ConcurrentDeque<T> {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn deque_of(values: &[i32]) -> ConcurrentDeque<i32> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_basic_operations() {
        let deque: ConcurrentDeque<i32> = ConcurrentDeque::new();

        assert!(deque.is_empty());
        assert_eq!(deque.len(), 0);
        assert_eq!(deque.pop_front(), Err(Error::EmptyQueue));
        assert_eq!(deque.pop_back(), Err(Error::EmptyQueue));
        assert_eq!(deque.front(), Err(Error::EmptyQueue));
        assert_eq!(deque.back(), Err(Error::EmptyQueue));

        deque.push_front([1, 2, 3]);
        deque.push_back([4, 5]);
        assert_eq!(deque.len(), 5);
        assert_eq!(deque.to_vec(), vec![1, 2, 3, 4, 5]);

        assert_eq!(deque.pop_front(), Ok(1));
        assert_eq!(deque.pop_back(), Ok(5));
        assert_eq!(deque.front(), Ok(2));
        assert_eq!(deque.back(), Ok(4));
        assert_eq!(deque.len(), 3);
    }

    #[test]
    fn test_push_front_preserves_argument_order() {
        let deque = deque_of(&[9]);
        deque.push_front([1, 2, 3]);
        deque.push_front(Vec::new());
        deque.push_front([0]);
        assert_eq!(deque.to_vec(), vec![0, 1, 2, 3, 9]);
    }

    #[test]
    fn test_get() {
        let deque = ConcurrentDeque::new();
        assert_eq!(deque.get(0), None::<&str>);

        deque.push_back(["a", "b", "c"]);
        assert_eq!(deque.get(0), Some("a"));
        assert_eq!(deque.get(1), Some("b"));
        assert_eq!(deque.get(2), Some("c"));
        assert_eq!(deque.get(5), None);
        assert_eq!(deque.get(usize::MAX), None);
    }

    #[test]
    fn test_remove_by_reference() {
        let deque = deque_of(&[1, 2, 3]);
        let middle = deque.get_ref(1);
        assert_eq!(deque.remove(middle), Ok(2));
        assert_eq!(deque.to_vec(), vec![1, 3]);

        let handle = deque.push_back_ref(4);
        assert!(deque.contains_ref(&handle));
        assert_eq!(deque.remove(handle), Ok(4));
        assert!(!deque.contains_ref(&handle));
        assert_eq!(deque.remove(handle), Err(Error::NotFound));

        let front = deque.front_ref().unwrap();
        let back = deque.back_ref().unwrap();
        assert_eq!(deque.remove(front), Ok(1));
        assert_eq!(deque.remove(back), Ok(3));
        assert_eq!(deque.remove(back), Err(Error::EmptyQueue));
    }

    #[test]
    fn test_remove_error_precedence() {
        let deque: ConcurrentDeque<i32> = ConcurrentDeque::new();
        let other = deque_of(&[1]);
        let foreign = other.front_ref();

        assert_eq!(deque.remove(None), Err(Error::NilElement));
        assert_eq!(deque.remove(foreign), Err(Error::EmptyQueue));

        deque.push_back([1]);
        assert_eq!(deque.remove(foreign), Err(Error::NotFound));
        assert_eq!(deque.len(), 1);
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn test_stale_reference_after_slot_reuse() {
        let deque = deque_of(&[1, 5]);
        let stale = deque.front_ref().unwrap();
        assert_eq!(deque.pop_front(), Ok(1));

        // Reuses the freed slot under a newer generation.
        let fresh = deque.push_back_ref(2);
        assert_ne!(stale, fresh);
        assert_eq!(deque.remove(stale), Err(Error::NotFound));
        assert_eq!(deque.get_by_ref(&stale), None);
        assert_eq!(deque.get_by_ref(&fresh), Some(2));
    }

    #[test]
    fn test_clear_retires_references() {
        let deque = deque_of(&[1, 2, 3]);
        let refs = deque.refs();
        assert_eq!(refs.len(), 3);

        assert_eq!(deque.clear(), 3);
        assert_eq!(deque.clear(), 0);
        assert!(deque.is_empty());

        deque.push_back([4, 5, 6]);
        for element in refs {
            assert_eq!(deque.remove(element), Err(Error::NotFound));
        }
        assert_eq!(deque.len(), 3);
    }

    #[test]
    fn test_to_vec_on_empty_deque() {
        let deque: ConcurrentDeque<String> = ConcurrentDeque::new();
        assert!(deque.to_vec().is_empty());
    }

    #[test]
    fn test_reverse() {
        let deque = deque_of(&[1, 2, 3, 4, 5]);
        let first = deque.front_ref().unwrap();

        deque.reverse();
        assert_eq!(deque.to_vec(), vec![5, 4, 3, 2, 1]);
        // The node stayed at the front; its value was swapped.
        assert_eq!(deque.get_by_ref(&first), Some(5));

        let even = deque_of(&[1, 2, 3, 4]);
        even.reverse();
        assert_eq!(even.to_vec(), vec![4, 3, 2, 1]);

        let single = deque_of(&[7]);
        single.reverse();
        assert_eq!(single.to_vec(), vec![7]);
    }

    #[test]
    fn test_rotate() {
        let deque = deque_of(&[1, 2, 3, 4, 5]);

        deque.rotate(2);
        assert_eq!(deque.to_vec(), vec![4, 5, 1, 2, 3]);

        deque.rotate(-3);
        assert_eq!(deque.to_vec(), vec![2, 3, 4, 5, 1]);

        deque.rotate(5);
        deque.rotate(0);
        deque.rotate(-10);
        assert_eq!(deque.to_vec(), vec![2, 3, 4, 5, 1]);

        deque.rotate(12);
        assert_eq!(deque.to_vec(), vec![5, 1, 2, 3, 4]);

        deque.rotate(isize::MIN);
        deque.rotate(isize::MAX);
        assert_eq!(deque.len(), 5);
    }

    #[test]
    fn test_rotate_moves_handles_with_values() {
        let deque = deque_of(&[1, 2, 3, 4]);
        let three = deque.find_ref(|v| *v == 3).unwrap();

        deque.rotate(1);
        assert_eq!(deque.to_vec(), vec![4, 1, 2, 3]);
        assert_eq!(deque.get_by_ref(&three), Some(3));
        assert_eq!(deque.remove(three), Ok(3));
        assert_eq!(deque.to_vec(), vec![4, 1, 2]);
    }

    #[test]
    fn test_rotate_short_deques() {
        let empty: ConcurrentDeque<i32> = ConcurrentDeque::new();
        empty.rotate(3);
        assert!(empty.is_empty());

        let single = deque_of(&[1]);
        single.rotate(-7);
        assert_eq!(single.to_vec(), vec![1]);
    }

    #[test]
    fn test_count() {
        let deque = deque_of(&[1, 2, 3, 2, 4, 2, 5]);
        assert_eq!(deque.count(&2, |a, b| a == b), 3);
        assert_eq!(deque.count(&9, |a, b| a == b), 0);
        assert_eq!(deque.count(&3, |a, b| a >= b), 3);
    }

    #[test]
    fn test_iterators() {
        let deque = ConcurrentDeque::new();
        deque.push_back(["apple", "banana", "cherry", "date"]);

        let forward: Vec<_> = deque.iter().collect();
        assert_eq!(
            forward,
            vec![(0, "apple"), (1, "banana"), (2, "cherry"), (3, "date")]
        );

        let backward: Vec<_> = deque.iter_rev().collect();
        assert_eq!(
            backward,
            vec![(3, "date"), (2, "cherry"), (1, "banana"), (0, "apple")]
        );

        let first_two: Vec<_> = deque.iter().take(2).map(|(_, v)| v).collect();
        assert_eq!(first_two, vec!["apple", "banana"]);

        // Dropping the iterator released the lock.
        assert_eq!(deque.pop_front(), Ok("apple"));
        assert_eq!(deque.iter().len(), 3);
    }

    #[test]
    fn test_clone_has_fresh_identity() {
        let deque = deque_of(&[1, 2]);
        let copy = deque.clone();
        assert_eq!(copy.to_vec(), vec![1, 2]);

        let original_front = deque.front_ref();
        assert_eq!(copy.remove(original_front), Err(Error::NotFound));
        assert_eq!(deque.remove(original_front), Ok(1));
        assert_eq!(copy.len(), 2);
    }

    #[test]
    fn test_conversions() {
        let mut deque = ConcurrentDeque::from(vec![1, 2]);
        deque.extend([3, 4]);
        assert_eq!(deque.into_vec(), Ok(vec![1, 2, 3, 4]));

        let empty: ConcurrentDeque<i32> = ConcurrentDeque::new();
        assert_eq!(empty.into_vec(), Ok(Vec::new()));
    }

    #[test]
    fn test_stale_reference_after_drain_and_clear() {
        let deque = deque_of(&[1]);
        let drained = deque.front_ref().unwrap();
        assert_eq!(deque.pop_front(), Ok(1));

        // Same slot and generation as `drained`, minted after the storage was released.
        let fresh = deque.push_back_ref(2);
        assert_eq!(deque.remove(drained), Err(Error::NotFound));
        assert!(!deque.contains_ref(&drained));
        assert_eq!(deque.get_by_ref(&drained), None);

        assert_eq!(deque.clear(), 1);
        deque.push_back([3]);
        assert_eq!(deque.remove(fresh), Err(Error::NotFound));
        assert_eq!(deque.to_vec(), vec![3]);
    }

    #[test]
    fn test_debug_format() {
        let deque = deque_of(&[1, 2]);
        let debug_str = format!("{:?}", deque);
        assert!(debug_str.contains("ConcurrentDeque"));
        assert!(debug_str.contains("len: 2"));
        assert!(debug_str.contains("[1, 2]"));
    }

    #[test]
    fn test_metrics() {
        let deque = deque_of(&[1]);

        assert_eq!(deque.front(), Ok(1));
        assert_eq!(deque.pop_front(), Ok(1));
        assert_eq!(deque.pop_back(), Err(Error::EmptyQueue));
        assert_eq!(deque.remove(None), Err(Error::NilElement));

        let metrics = deque.metrics();
        assert_eq!(metrics.total_operations, 4);
        assert_eq!(metrics.successful_operations, 2);
        assert_eq!(metrics.failed_operations, 2);

        deque.set_metrics_enabled(false);
        assert!(!deque.is_metrics_enabled());
        let _ = deque.pop_front();
        assert_eq!(deque.metrics().total_operations, 4);

        deque.reset_metrics();
        assert_eq!(deque.metrics(), PerformanceMetrics::default());
    }
}
