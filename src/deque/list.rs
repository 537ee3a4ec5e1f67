//! Unsynchronized doubly linked list over the slot arena.
//!
//! `ConcurrentDeque` wraps this in its reader/writer lock; nothing here is thread-aware.
//! Total operations skip a missing link rather than follow it. Fallible operations validate
//! every link they are about to rewrite before touching any of them, so an inconsistency is
//! reported through `Error::InvariantViolation` and leaves the list as it was.

use super::arena::{Arena, Key, Node};
use crate::{Error, Result};

#[derive(Debug)]
pub(crate) struct List<T> {
    arena: Arena<T>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> List<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            head: None,
            tail: None,
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn head(&self) -> Option<usize> {
        self.head
    }

    #[inline]
    pub(crate) fn tail(&self) -> Option<usize> {
        self.tail
    }

    #[inline]
    pub(crate) fn node(&self, index: usize) -> Option<&Node<T>> {
        self.arena.get(index)
    }

    #[inline]
    pub(crate) fn key(&self, index: usize) -> Option<Key> {
        self.arena.key(index)
    }

    #[inline]
    pub(crate) fn contains(&self, key: Key) -> bool {
        self.arena.contains(key)
    }

    pub(crate) fn push_front(&mut self, value: T) -> Key {
        let old_head = self.head;
        let key = self.arena.insert(Node {
            value,
            prev: None,
            next: old_head,
        });

        match old_head.and_then(|index| self.arena.get_mut(index)) {
            Some(node) => node.prev = Some(key.index),
            None => self.tail = Some(key.index),
        }
        self.head = Some(key.index);
        self.len += 1;
        key
    }

    pub(crate) fn push_back(&mut self, value: T) -> Key {
        let old_tail = self.tail;
        let key = self.arena.insert(Node {
            value,
            prev: old_tail,
            next: None,
        });

        match old_tail.and_then(|index| self.arena.get_mut(index)) {
            Some(node) => node.next = Some(key.index),
            None => self.head = Some(key.index),
        }
        self.tail = Some(key.index);
        self.len += 1;
        key
    }

    /// Links `value` directly behind the node at `anchor`.
    pub(crate) fn insert_after(&mut self, anchor: usize, value: T) -> Key {
        let Some(next) = self.arena.get(anchor).map(|node| node.next) else {
            return self.push_back(value);
        };

        let key = self.arena.insert(Node {
            value,
            prev: Some(anchor),
            next,
        });

        if let Some(node) = self.arena.get_mut(anchor) {
            node.next = Some(key.index);
        }
        match next.and_then(|index| self.arena.get_mut(index)) {
            Some(node) => node.prev = Some(key.index),
            None => self.tail = Some(key.index),
        }
        self.len += 1;
        key
    }

    /// Detaches the node at `index` and returns its value.
    pub(crate) fn unlink(&mut self, index: usize) -> Result<T> {
        let (prev, next) = self
            .arena
            .get(index)
            .map(|node| (node.prev, node.next))
            .ok_or(Error::InvariantViolation("unlinking a vacant slot"))?;

        if prev.map_or(false, |p| self.arena.get(p).is_none())
            || next.map_or(false, |n| self.arena.get(n).is_none())
        {
            return Err(Error::InvariantViolation("node links to a vacant slot"));
        }
        if (prev.is_none() && self.head != Some(index))
            || (next.is_none() && self.tail != Some(index))
        {
            return Err(Error::InvariantViolation("boundary node is not an end of the list"));
        }

        match prev.and_then(|p| self.arena.get_mut(p)) {
            Some(node) => node.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.arena.get_mut(n)) {
            Some(node) => node.prev = prev,
            None => self.tail = prev,
        }

        let node = self
            .arena
            .remove(index)
            .ok_or(Error::InvariantViolation("unlinking a vacant slot"))?;
        self.len -= 1;
        if self.len == 0 {
            self.arena.reset();
        }
        Ok(node.value)
    }

    /// Slot index of the element at `position`, walking from whichever end is closer.
    pub(crate) fn index_at(&self, position: usize) -> Option<usize> {
        if position >= self.len {
            return None;
        }

        if position < self.len / 2 {
            let mut current = self.head?;
            for _ in 0..position {
                current = self.arena.get(current)?.next?;
            }
            Some(current)
        } else {
            let mut current = self.tail?;
            for _ in 0..(self.len - 1 - position) {
                current = self.arena.get(current)?.prev?;
            }
            Some(current)
        }
    }

    /// Moves the tail node to the front. O(1).
    pub(crate) fn move_back_to_front(&mut self) {
        let (Some(head), Some(tail)) = (self.head, self.tail) else {
            return;
        };
        if head == tail {
            return;
        }
        let Some(new_tail) = self.arena.get(tail).and_then(|node| node.prev) else {
            return;
        };

        if let Some(node) = self.arena.get_mut(new_tail) {
            node.next = None;
        }
        if let Some(node) = self.arena.get_mut(tail) {
            node.prev = None;
            node.next = Some(head);
        }
        if let Some(node) = self.arena.get_mut(head) {
            node.prev = Some(tail);
        }
        self.head = Some(tail);
        self.tail = Some(new_tail);
    }

    /// Moves the head node to the back. O(1).
    pub(crate) fn move_front_to_back(&mut self) {
        let (Some(head), Some(tail)) = (self.head, self.tail) else {
            return;
        };
        if head == tail {
            return;
        }
        let Some(new_head) = self.arena.get(head).and_then(|node| node.next) else {
            return;
        };

        if let Some(node) = self.arena.get_mut(new_head) {
            node.prev = None;
        }
        if let Some(node) = self.arena.get_mut(head) {
            node.next = None;
            node.prev = Some(tail);
        }
        if let Some(node) = self.arena.get_mut(tail) {
            node.next = Some(head);
        }
        self.head = Some(new_head);
        self.tail = Some(head);
    }

    /// Reverses element order by swapping values pairwise from both ends inward.
    /// Node identities stay in place.
    pub(crate) fn reverse(&mut self) {
        let (mut front, mut back) = (self.head, self.tail);

        for _ in 0..self.len / 2 {
            let (Some(f), Some(b)) = (front, back) else {
                break;
            };
            self.arena.swap_values(f, b);
            front = self.arena.get(f).and_then(|node| node.next);
            back = self.arena.get(b).and_then(|node| node.prev);
        }
    }

    /// Drops every node and releases the arena's surplus storage, retiring all outstanding
    /// keys. Returns how many were removed.
    pub(crate) fn clear(&mut self) -> usize {
        let removed = self.len;
        self.arena.reset();
        self.head = None;
        self.tail = None;
        self.len = 0;
        removed
    }

    /// Unlinks front to back, consuming the list.
    ///
    /// Stops at the first inconsistent link; values not reached are dropped with the list.
    pub(crate) fn into_values(mut self) -> (Vec<T>, Option<Error>) {
        let mut values = Vec::with_capacity(self.len);
        while let Some(head) = self.head {
            match self.unlink(head) {
                Ok(value) => values.push(value),
                Err(err) => return (values, Some(err)),
            }
        }
        (values, None)
    }

    /// Walks front to back.
    pub(crate) fn values(&self) -> Values<'_, T> {
        Values {
            list: self,
            cursor: self.head,
        }
    }
}

/// Borrowing front-to-back walk used by the snapshot operations.
pub(crate) struct Values<'a, T> {
    list: &'a List<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Values<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.list.node(self.cursor?)?;
        self.cursor = node.next;
        Some(&node.value)
    }
}
