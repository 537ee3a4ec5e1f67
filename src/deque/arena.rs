//! Slot arena backing the deque's nodes.
//!
//! Nodes are addressed by slot index. Every slot carries a generation that is bumped when its
//! node is removed, so a `Key` taken before the removal never matches the slot again, even
//! after the slot is reused through the free list.
//!
//! [`Arena::reset`] drops every slot and releases storage beyond the reserved capacity.
//! Slot generations restart from zero afterwards, so each reset also starts a new era and
//! keys from earlier eras never match.

use core::mem;

/// Slots kept allocated across a reset when no larger capacity was reserved.
const MIN_RETAINED_SLOTS: usize = 32;

/// Address of an occupied slot at a particular generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Key {
    pub(crate) index: usize,
    pub(crate) generation: u64,
    pub(crate) era: u64,
}

#[derive(Debug)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u64,
    node: Option<Node<T>>,
}

#[derive(Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    era: u64,
    reserved: usize,
}

impl<T> Arena<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            era: 0,
            reserved: capacity.max(MIN_RETAINED_SLOTS),
        }
    }

    pub(crate) fn insert(&mut self, node: Node<T>) -> Key {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.node = Some(node);
            return Key {
                index,
                generation: slot.generation,
                era: self.era,
            };
        }

        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        Key {
            index: self.slots.len() - 1,
            generation: 0,
            era: self.era,
        }
    }

    /// Vacates a slot, retiring its current generation.
    pub(crate) fn remove(&mut self, index: usize) -> Option<Node<T>> {
        let slot = self.slots.get_mut(index)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        Some(node)
    }

    /// Drops every node, gives back surplus storage and retires all keys handed out so far.
    pub(crate) fn reset(&mut self) {
        self.slots.clear();
        self.slots.shrink_to(self.reserved);
        self.free.clear();
        self.free.shrink_to(self.reserved);
        self.era = self.era.wrapping_add(1);
    }

    #[cfg(test)]
    pub(crate) fn slot_capacity(&self) -> usize {
        self.slots.capacity()
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<&Node<T>> {
        self.slots.get(index)?.node.as_ref()
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Node<T>> {
        self.slots.get_mut(index)?.node.as_mut()
    }

    /// Key for the node currently stored at `index`
    pub(crate) fn key(&self, index: usize) -> Option<Key> {
        let slot = self.slots.get(index)?;
        slot.node.as_ref().map(|_| Key {
            index,
            generation: slot.generation,
            era: self.era,
        })
    }

    /// Whether `key` still names a live node.
    pub(crate) fn contains(&self, key: Key) -> bool {
        key.era == self.era
            && self
                .slots
                .get(key.index)
                .map_or(false, |slot| slot.generation == key.generation && slot.node.is_some())
    }

    /// Exchanges the values of two live nodes, leaving their links untouched.
    pub(crate) fn swap_values(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        let (left, right) = self.slots.split_at_mut(high);

        if let (Some(Some(x)), Some(Some(y))) = (
            left.get_mut(low).map(|slot| slot.node.as_mut()),
            right.first_mut().map(|slot| slot.node.as_mut()),
        ) {
            mem::swap(&mut x.value, &mut y.value);
        }
    }
}
