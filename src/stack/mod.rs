//! Stack Module
//!
//! Lock-free stack implementations for conkit.

pub mod lock_free;

pub use lock_free::LockFreeStack;

#[cfg(test)]
mod proptests;
