//! Lock-holding iteration over a [`ConcurrentDeque`](super::ConcurrentDeque).

use core::fmt;

use parking_lot::RwLockReadGuard;

use super::list::List;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Iterator over `(index, value)` pairs of a deque
///
/// Created by [`ConcurrentDeque::iter`](super::ConcurrentDeque::iter) and
/// [`ConcurrentDeque::iter_rev`](super::ConcurrentDeque::iter_rev). It owns the deque's shared
/// lock for its whole lifetime, so the sequence it yields is a consistent view: no mutation
/// can run until the iterator is exhausted and dropped, or dropped early.
pub struct Iter<'a, T> {
    list: RwLockReadGuard<'a, List<T>>,
    cursor: Option<usize>,
    position: usize,
    remaining: usize,
    direction: Direction,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn forward(list: RwLockReadGuard<'a, List<T>>) -> Self {
        Self {
            cursor: list.head(),
            position: 0,
            remaining: list.len(),
            direction: Direction::Forward,
            list,
        }
    }

    pub(crate) fn backward(list: RwLockReadGuard<'a, List<T>>) -> Self {
        Self {
            cursor: list.tail(),
            position: list.len().saturating_sub(1),
            remaining: list.len(),
            direction: Direction::Backward,
            list,
        }
    }
}

impl<T: Clone> Iterator for Iter<'_, T> {
    type Item = (usize, T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.node(self.cursor?)?;
        let item = (self.position, node.value.clone());

        match self.direction {
            Direction::Forward => {
                self.cursor = node.next;
                self.position += 1;
            }
            Direction::Backward => {
                self.cursor = node.prev;
                self.position = self.position.saturating_sub(1);
            }
        }
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Clone> ExactSizeIterator for Iter<'_, T> {}

impl<T> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("direction", &self.direction)
            .field("position", &self.position)
            .field("remaining", &self.remaining)
            .finish()
    }
}
