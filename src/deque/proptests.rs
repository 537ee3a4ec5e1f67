//! Property-based tests for the deque using proptest
//!
//! The deque is driven with random operation sequences and compared against `VecDeque`.

use super::ConcurrentDeque;
use crate::Error;
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum DequeOp {
    PushFront(Vec<i32>),
    PushBack(Vec<i32>),
    PopFront,
    PopBack,
    Get(usize),
    RemoveAt(usize),
    Rotate(isize),
    Reverse,
    Clear,
}

fn deque_op() -> impl Strategy<Value = DequeOp> {
    prop_oneof![
        4 => prop::collection::vec(any::<i32>(), 0..5).prop_map(DequeOp::PushFront),
        4 => prop::collection::vec(any::<i32>(), 0..5).prop_map(DequeOp::PushBack),
        2 => Just(DequeOp::PopFront),
        2 => Just(DequeOp::PopBack),
        2 => (0usize..20).prop_map(DequeOp::Get),
        2 => (0usize..20).prop_map(DequeOp::RemoveAt),
        2 => (-25isize..25).prop_map(DequeOp::Rotate),
        1 => Just(DequeOp::Reverse),
        1 => Just(DequeOp::Clear),
    ]
}

fn rotate_model(model: &mut VecDeque<i32>, n: isize) {
    if model.len() > 1 {
        let k = n.rem_euclid(model.len() as isize) as usize;
        model.rotate_right(k);
    }
}

proptest! {
    #[test]
    fn test_matches_vecdeque_model(operations in prop::collection::vec(deque_op(), 0..100)) {
        let deque = ConcurrentDeque::new();
        let mut model = VecDeque::new();

        for op in operations {
            match op {
                DequeOp::PushFront(values) => {
                    for &value in values.iter().rev() {
                        model.push_front(value);
                    }
                    deque.push_front(values);
                }
                DequeOp::PushBack(values) => {
                    model.extend(values.iter().copied());
                    deque.push_back(values);
                }
                DequeOp::PopFront => {
                    prop_assert_eq!(deque.pop_front().ok(), model.pop_front());
                }
                DequeOp::PopBack => {
                    prop_assert_eq!(deque.pop_back().ok(), model.pop_back());
                }
                DequeOp::Get(index) => {
                    prop_assert_eq!(deque.get(index), model.get(index).copied());
                }
                DequeOp::RemoveAt(index) => {
                    let element = deque.get_ref(index);
                    match model.remove(index) {
                        Some(expected) => prop_assert_eq!(deque.remove(element), Ok(expected)),
                        None => prop_assert!(deque.remove(element).is_err()),
                    }
                }
                DequeOp::Rotate(n) => {
                    deque.rotate(n);
                    rotate_model(&mut model, n);
                }
                DequeOp::Reverse => {
                    deque.reverse();
                    model.make_contiguous().reverse();
                }
                DequeOp::Clear => {
                    prop_assert_eq!(deque.clear(), model.len());
                    model.clear();
                }
            }

            prop_assert_eq!(deque.len(), model.len());
            prop_assert_eq!(deque.to_vec(), model.iter().copied().collect::<Vec<_>>());
        }

        let descending: Vec<_> = deque.iter_rev().collect();
        let expected: Vec<_> = model.iter().copied().enumerate().rev().collect();
        prop_assert_eq!(descending, expected);
    }

    #[test]
    fn test_rotate_round_trip(
        values in prop::collection::vec(any::<i32>(), 1..50),
        n in -1_000isize..1_000,
    ) {
        let deque: ConcurrentDeque<i32> = values.iter().copied().collect();
        deque.rotate(n);
        deque.rotate(-n);
        prop_assert_eq!(deque.to_vec(), values);
    }

    #[test]
    fn test_reverse_twice_is_identity(values in prop::collection::vec(any::<i32>(), 0..50)) {
        let deque: ConcurrentDeque<i32> = values.iter().copied().collect();
        deque.reverse();
        let mut reversed = values.clone();
        reversed.reverse();
        prop_assert_eq!(deque.to_vec(), reversed);

        deque.reverse();
        prop_assert_eq!(deque.to_vec(), values);
    }

    #[test]
    fn test_foreign_reference_is_rejected(
        values in prop::collection::vec(any::<i32>(), 1..30),
        index in any::<prop::sample::Index>(),
    ) {
        let deque: ConcurrentDeque<i32> = values.iter().copied().collect();
        let other: ConcurrentDeque<i32> = values.iter().copied().collect();
        let foreign = other.get_ref(index.index(values.len()));
        prop_assert!(foreign.is_some());

        prop_assert_eq!(deque.remove(foreign), Err(Error::NotFound));
        prop_assert_eq!(deque.len(), values.len());
        prop_assert_eq!(other.len(), values.len());
    }

    #[test]
    fn test_get_walks_from_either_end(
        values in prop::collection::vec(any::<i32>(), 0..40),
        index in 0usize..50,
    ) {
        let deque: ConcurrentDeque<i32> = values.iter().copied().collect();
        prop_assert_eq!(deque.get(index), values.get(index).copied());
        prop_assert_eq!(
            deque.get_ref(index).and_then(|element| deque.get_by_ref(&element)),
            values.get(index).copied()
        );
    }
}
