//! # conkit
//!
//! Two general-purpose containers for concurrent programs.
//!
//! ## Containers
//!
//! - **ConcurrentDeque**: doubly linked double-ended queue guarded by a single reader/writer
//!   lock, with indexed access, rotation, reversal and removal through stable element handles
//! - **LockFreeStack**: Treiber stack driven purely by compare-and-swap on the head pointer,
//!   with epoch-based reclamation of popped nodes
//!
//! ## Quick Start
//!
//! ```rust
//! use conkit::{ConcurrentDeque, LockFreeStack};
//!
//! let deque = ConcurrentDeque::new();
//! deque.push_back([1, 2, 3, 4, 5]);
//! deque.rotate(2);
//! assert_eq!(deque.to_vec(), vec![4, 5, 1, 2, 3]);
//!
//! let stack = LockFreeStack::new();
//! stack.push(1);
//! stack.push(2);
//! assert_eq!(stack.pop(), Some(2));
//! ```
//!
//! ## Thread Safety
//!
//! Both containers are `Send + Sync` for suitable element types and are meant to be shared
//! through an `Arc`. The deque serializes mutations and lets readers share the lock; the stack
//! never blocks and retries its CAS until it wins.

#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod deque;
pub mod metrics;
pub mod stack;

pub use crate::deque::{ConcurrentDeque, ElementRef};
pub use crate::stack::LockFreeStack;

/// Common utilities and helper types
pub mod util {
    use core::ops::{Deref, DerefMut};

    /// Cache line size for alignment purposes
    pub const CACHE_LINE_SIZE: usize = 64;

    /// Pads and aligns a value to a cache line so that neighbouring hot fields
    /// do not share one.
    #[repr(align(64))]
    #[derive(Default)]
    pub struct CachePadded<T> {
        value: T,
    }

    impl<T> CachePadded<T> {
        /// Create a new cache-padded value
        #[inline]
        pub const fn new(value: T) -> Self {
            Self { value }
        }

        /// Get the inner value
        #[inline]
        pub fn into_inner(self) -> T {
            self.value
        }
    }

    impl<T> Deref for CachePadded<T> {
        type Target = T;

        #[inline]
        fn deref(&self) -> &T {
            &self.value
        }
    }

    impl<T> DerefMut for CachePadded<T> {
        #[inline]
        fn deref_mut(&mut self) -> &mut T {
            &mut self.value
        }
    }

    impl<T: core::fmt::Debug> core::fmt::Debug for CachePadded<T> {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            core::fmt::Debug::fmt(&self.value, f)
        }
    }
}

/// Error types for deque operations
///
/// The stack has no error type: popping an empty stack is an ordinary `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The deque holds no elements
    #[error("queue is empty")]
    EmptyQueue,
    /// A removal was requested without an element handle
    #[error("element is nil")]
    NilElement,
    /// The element handle is stale or belongs to another deque
    #[error("element not found in deque")]
    NotFound,
    /// The deque's internal links are inconsistent
    #[error("internal invariant violated: {0}")]
    InvariantViolation(&'static str),
}

/// Result type for conkit operations
pub type Result<T> = core::result::Result<T, Error>;
