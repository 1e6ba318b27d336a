//! Property tests comparing LruMemo against a naive recency list

use std::cell::Cell;
use std::collections::{HashSet, VecDeque};

use lrumemo::{LruMemo, OrderedMemo};
use proptest::prelude::*;

/// Operations that can be performed on a cache
#[derive(Clone, Debug)]
enum Op {
    Get(u8),
    TryGet(u8),
    Remove(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..24u8).prop_map(Op::Get),
        2 => (0..24u8).prop_map(Op::TryGet),
        1 => (0..24u8).prop_map(Op::Remove),
    ]
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(op_strategy(), 0..200)
}

fn compute(key: &u8) -> u32 {
    u32::from(*key) * 3 + 1
}

fn fails(key: &u8) -> bool {
    key % 5 == 0
}

/// Reference LRU: front is least recent, back is most recent
struct Model {
    capacity: usize,
    order: VecDeque<u8>,
}

impl Model {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            order: VecDeque::new(),
        }
    }

    fn touch(&mut self, key: u8) -> bool {
        if let Some(pos) = self.order.iter().position(|k| *k == key) {
            self.order.remove(pos);
            self.order.push_back(key);
            true
        } else {
            false
        }
    }

    fn insert(&mut self, key: u8) {
        if self.order.len() == self.capacity {
            self.order.pop_front();
        }
        self.order.push_back(key);
    }

    fn remove(&mut self, key: u8) -> bool {
        match self.order.iter().position(|k| *k == key) {
            Some(pos) => {
                self.order.remove(pos);
                true
            }
            None => false,
        }
    }

    fn by_recency(&self) -> Vec<u8> {
        self.order.iter().rev().copied().collect()
    }
}

proptest! {
    /// Every observable matches the model after each operation
    #[test]
    fn prop_matches_reference_model(capacity in 1..8usize, ops in ops_strategy()) {
        let calls = Cell::new(0usize);
        let mut memo: LruMemo<u8, u32, _> = LruMemo::new(
            |key: &u8| {
                calls.set(calls.get() + 1);
                if fails(key) { Err(*key) } else { Ok(compute(key)) }
            },
            capacity,
        );
        let mut model = Model::new(capacity);

        for op in ops {
            match op {
                Op::Get(key) | Op::TryGet(key) => {
                    let before = calls.get();
                    let len_before = memo.len();
                    let resident = model.touch(key);
                    let result = memo.try_get(&key);

                    if resident {
                        prop_assert_eq!(calls.get(), before);
                        prop_assert_eq!(result, Ok(compute(&key)));
                    } else if fails(&key) {
                        prop_assert_eq!(calls.get(), before + 1);
                        prop_assert_eq!(result, Err(key));
                        prop_assert_eq!(memo.len(), len_before);
                    } else {
                        prop_assert_eq!(calls.get(), before + 1);
                        prop_assert_eq!(result, Ok(compute(&key)));
                        model.insert(key);
                    }
                }
                Op::Remove(key) => {
                    let expected = model.remove(key);
                    prop_assert_eq!(memo.remove(&key).is_some(), expected);
                }
            }

            prop_assert!(memo.len() <= memo.capacity());
            prop_assert_eq!(memo.len(), model.order.len());
            prop_assert_eq!(memo.keys_by_recency().copied().collect::<Vec<_>>(), model.by_recency());
            prop_assert_eq!(memo.least_recently_used().map(|(k, _)| *k), model.order.front().copied());
        }
    }

    /// Index keys and access-order keys are always the same set
    #[test]
    fn prop_index_and_order_agree(capacity in 1..8usize, ops in ops_strategy()) {
        let mut memo: OrderedMemo<u8, u32, _> = OrderedMemo::with_index(compute, capacity);

        for op in ops {
            match op {
                Op::Get(key) | Op::TryGet(key) => {
                    prop_assert_eq!(memo.get(&key), compute(&key));
                }
                Op::Remove(key) => {
                    memo.remove(&key);
                }
            }

            let indexed: HashSet<u8> = memo.iter().map(|(k, _)| *k).collect();
            let ordered: HashSet<u8> = memo.keys_by_recency().copied().collect();
            prop_assert_eq!(&indexed, &ordered);
            prop_assert_eq!(ordered.len(), memo.len());
            prop_assert_eq!(memo.is_full(), memo.len() == memo.capacity());
        }
    }

    /// Distinct keys accessed once each leave exactly the last `capacity` resident
    #[test]
    fn prop_retains_most_recent_keys(capacity in 1..16usize, extra in 1..32usize) {
        let mut memo: LruMemo<u32, u32, _> = LruMemo::new(|x: &u32| x + 100, capacity);
        let total = (capacity + extra) as u32;

        for key in 0..total {
            memo.get(&key);
        }

        let expected: Vec<u32> = ((total - capacity as u32)..total).rev().collect();
        prop_assert_eq!(memo.keys_by_recency().copied().collect::<Vec<_>>(), expected);
        prop_assert_eq!(memo.stats().evictions(), extra as u64);
        let oldest = total - capacity as u32;
        let oldest_value = oldest + 100;
        prop_assert_eq!(memo.least_recently_used(), Some((&oldest, &oldest_value)));
    }

    /// Reading keys never changes recency
    #[test]
    fn prop_introspection_is_read_only(capacity in 1..8usize, keys in proptest::collection::vec(0..16u8, 0..40)) {
        let mut memo: LruMemo<u8, u32, _> = LruMemo::new(compute, capacity);
        for key in &keys {
            memo.get(key);
        }

        let before: Vec<u8> = memo.keys_by_recency().copied().collect();
        for key in 0..16u8 {
            let _ = memo.peek(&key);
            let _ = memo.contains(&key);
        }
        let _ = memo.least_recently_used();
        let _ = memo.iter().count();

        prop_assert_eq!(memo.keys_by_recency().copied().collect::<Vec<_>>(), before);
    }
}

#[test]
fn test_promotion_scenario() {
    let mut memo: LruMemo<&str, usize, _> = LruMemo::new(|s: &&str| s.len(), 2);

    memo.get(&"A");
    memo.get(&"B");
    memo.get(&"A");
    memo.get(&"C");

    assert!(memo.contains(&"A"));
    assert!(!memo.contains(&"B"));
    assert!(memo.contains(&"C"));
}
