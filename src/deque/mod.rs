//! Deque (double-ended queue) implementations
//!
//! ## Available Deques
//!
//! - [`ConcurrentDeque`]: doubly linked deque behind a reader/writer lock, with indexed
//!   access, rotation, reversal and removal through [`ElementRef`] handles
//!
//! ## Locking
//!
//! Every public method takes the deque's single lock for its full duration. Iterators are
//! the exception in length only: they hold the shared lock until dropped, trading iteration
//! concurrency for a consistent view. Keep them short-lived. Shared acquisitions are
//! recursive, so read-only calls made while an iterator is alive never queue behind a
//! waiting writer.

mod arena;
pub mod concurrent;
mod iter;
mod list;

pub use self::concurrent::{ConcurrentDeque, ElementRef};
pub use self::iter::Iter;


#[cfg(test)]
mod proptests;
