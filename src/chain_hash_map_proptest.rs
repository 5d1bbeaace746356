#![cfg(test)]

// Property tests for ChainHashMap kept inside the crate so they can check
// internal invariants and insertion order after every step.

use crate::chain_hash_map::ChainHashMap;
use crate::config::MapConfig;
use crate::error::MapError;
use crate::hash_strategy::{HashStrategy, ScalarKey};
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Clone, Debug)]
enum Op {
    Put(i64, i32),
    Get(i64),
    Update(usize, i32),
    Clear,
}

// Keys drawn from a small range so updates and collisions are frequent;
// `Update` picks an already inserted key by position.
fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        6 => (-40i64..200, any::<i32>()).prop_map(|(k, v)| Op::Put(k, v)),
        3 => (-40i64..200).prop_map(Op::Get),
        2 => (any::<usize>(), any::<i32>()).prop_map(|(i, v)| Op::Update(i, v)),
        1 => Just(Op::Clear),
    ];
    proptest::collection::vec(op, 1..150)
}

fn keys_in_order<K: ScalarKey + Copy, V>(m: &ChainHashMap<K, V>) -> Vec<K> {
    m.entries().map(|(k, _)| *k).collect()
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `get` agrees with the model for present and absent keys.
// - `put` returns the previous value exactly when the key existed.
// - `len` only grows on first insertion of a key.
// - Entry order equals first-insertion order, through every resize.
// - Table/order node counts, slot placement and cross-links stay consistent.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(ops in arb_ops()) {
        let mut sut: ChainHashMap<i64, i32> = ChainHashMap::new();
        let mut model: HashMap<i64, i32> = HashMap::new();
        let mut order: Vec<i64> = Vec::new();
        let mut last_size = sut.table_size();

        for op in ops {
            match op {
                Op::Put(k, v) => {
                    let prev = sut.put(k, v).expect("put");
                    let mprev = model.insert(k, v);
                    prop_assert_eq!(prev, mprev);
                    if mprev.is_none() {
                        order.push(k);
                    }
                }
                Op::Get(k) => {
                    let before = (sut.len(), sut.table_size());
                    prop_assert_eq!(sut.get(&k), model.get(&k));
                    prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
                    prop_assert_eq!((sut.len(), sut.table_size()), before);
                }
                Op::Update(i, v) => {
                    if !order.is_empty() {
                        let k = order[i % order.len()];
                        let prev = sut.put(k, v).expect("update");
                        prop_assert_eq!(prev, model.insert(k, v));
                    }
                }
                Op::Clear => {
                    sut.clear();
                    model.clear();
                    order.clear();
                    last_size = sut.table_size();
                    prop_assert_eq!(last_size, 15);
                }
            }

            // Post-conditions after each op
            sut.assert_consistent();
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            prop_assert_eq!(keys_in_order(&sut), order.clone());
            // Table size only grows, and only by doubling.
            let size = sut.table_size();
            prop_assert!(size == last_size || size == last_size * 2);
            last_size = size;
        }

        for (k, v) in &model {
            prop_assert_eq!(sut.get(k), Some(v));
        }
    }
}

// Key type whose every value lands in bucket 0, to stress chain walking.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Colliding(u16);

impl ScalarKey for Colliding {
    const STRATEGY: HashStrategy = HashStrategy::Modulo;
    fn scalar(&self) -> i128 {
        0
    }
}

// Property: same invariants under worst-case collisions, with small entry
// and bucket limits so allocation failures show up in the sequence. A failed
// put must leave the map unchanged apart from a successful resize.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions_and_limits(
        keys in proptest::collection::vec(0u16..64, 1..120),
        max_entries in 1usize..40,
    ) {
        let cfg = MapConfig::new()
            .with_initial_buckets(3)
            .with_max_buckets(24)
            .with_max_entries(max_entries);
        let mut sut: ChainHashMap<Colliding, u16> = ChainHashMap::with_config(cfg).expect("config");
        let mut model: HashMap<u16, u16> = HashMap::new();
        let mut order: Vec<Colliding> = Vec::new();

        for (step, k) in keys.into_iter().enumerate() {
            let v = step as u16;
            let len_before = sut.len();
            match sut.put(Colliding(k), v) {
                Ok(prev) => {
                    let mprev = model.insert(k, v);
                    prop_assert_eq!(prev, mprev);
                    if mprev.is_none() {
                        order.push(Colliding(k));
                    }
                }
                Err(MapError::BucketTable { .. }) => {
                    prop_assert_eq!(sut.table_size(), 24);
                    prop_assert_eq!(sut.len(), len_before);
                }
                Err(MapError::NodeLimit { limit }) => {
                    prop_assert_eq!(limit, max_entries);
                    prop_assert!(!model.contains_key(&k));
                    prop_assert_eq!(sut.len(), len_before);
                }
                Err(e) => prop_assert!(false, "unexpected error: {}", e),
            }

            sut.assert_consistent();
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(keys_in_order(&sut), order.clone());
        }

        for (k, v) in &model {
            prop_assert_eq!(sut.get(&Colliding(*k)), Some(v));
        }
    }
}
