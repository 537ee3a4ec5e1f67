//! Property-based tests for the lock-free stack using proptest

use super::LockFreeStack;
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone)]
enum StackOp {
    Push(i32),
    Pop,
}

fn stack_op() -> impl Strategy<Value = StackOp> {
    prop_oneof![
        3 => any::<i32>().prop_map(StackOp::Push),
        2 => Just(StackOp::Pop),
    ]
}

proptest! {
    #[test]
    fn test_matches_vec_model(operations in prop::collection::vec(stack_op(), 0..200)) {
        let stack = LockFreeStack::new();
        let mut model = Vec::new();

        for op in operations {
            match op {
                StackOp::Push(value) => {
                    stack.push(value);
                    model.push(value);
                }
                StackOp::Pop => prop_assert_eq!(stack.pop(), model.pop()),
            }
            prop_assert_eq!(stack.len(), model.len());
            prop_assert_eq!(stack.is_empty(), model.is_empty());
        }
    }

    #[test]
    fn test_concurrent_pops_never_duplicate(
        num_threads in 2usize..6,
        per_thread in 1usize..200,
    ) {
        let total = num_threads * per_thread;
        let stack = Arc::new((0..total).collect::<LockFreeStack<usize>>());

        let handles: Vec<_> = (0..num_threads)
            .map(|_| {
                let stack = Arc::clone(&stack);
                thread::spawn(move || {
                    let mut popped = Vec::new();
                    while let Some(value) = stack.pop() {
                        popped.push(value);
                    }
                    popped
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for value in handle.join().unwrap() {
                prop_assert!(seen.insert(value));
            }
        }

        prop_assert_eq!(seen.len(), total);
        prop_assert!(stack.is_empty());
    }
}
