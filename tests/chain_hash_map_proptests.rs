// ChainHashMap property tests through the public API.
//
// Property 1: model equivalence for integer keys.
//  - Model: std HashMap plus a Vec recording first-insertion order.
//  - Invariant: get/contains_key/len agree with the model after every put;
//               Debug output lists entries in first-insertion order.
//
// Property 2: float keys.
//  - Model: std HashMap keyed by canonical bit pattern (-0.0 folded into 0.0).
//  - Invariant: every inserted (non-NaN) key is found with its latest value.
use chain_hashmap::ChainHashMap;
use proptest::prelude::*;
use std::collections::HashMap;

fn expected_debug(order: &[i32], model: &HashMap<i32, u8>) -> String {
    let parts: Vec<String> = order
        .iter()
        .map(|k| format!("{}: {}", k, model[k]))
        .collect();
    format!("{{{}}}", parts.join(", "))
}

// Property 1: model equivalence and insertion order.
proptest! {
    #[test]
    fn prop_matches_model(puts in proptest::collection::vec((any::<i32>(), any::<u8>()), 1..200),
                          probes in proptest::collection::vec(any::<i32>(), 0..20)) {
        let mut m: ChainHashMap<i32, u8> = ChainHashMap::new();
        let mut model: HashMap<i32, u8> = HashMap::new();
        let mut order: Vec<i32> = Vec::new();

        for (k, v) in puts {
            let prev = m.put(k, v).unwrap();
            let mprev = model.insert(k, v);
            prop_assert_eq!(prev, mprev);
            if mprev.is_none() {
                order.push(k);
            }
            prop_assert_eq!(m.len(), model.len());
        }

        for (k, v) in &model {
            prop_assert_eq!(m.get(k), Some(v));
        }
        for k in probes {
            prop_assert_eq!(m.contains_key(&k), model.contains_key(&k));
        }
        prop_assert_eq!(format!("{:?}", m), expected_debug(&order, &model));
    }
}

// Property 2: float keys, including signed zeroes.
proptest! {
    #[test]
    fn prop_float_keys(puts in proptest::collection::vec(
        (prop_oneof![Just(0.0f64), Just(-0.0f64), -1.0e6f64..1.0e6], any::<u16>()), 1..120)) {
        let mut m: ChainHashMap<f64, u16> = ChainHashMap::new();
        let mut model: HashMap<u64, u16> = HashMap::new();
        let canon = |x: f64| if x == 0.0 { 0u64 } else { x.to_bits() };

        for (k, v) in &puts {
            m.put(*k, *v).unwrap();
            model.insert(canon(*k), *v);
        }
        prop_assert_eq!(m.len(), model.len());
        for (k, _) in &puts {
            prop_assert_eq!(m.get(k), model.get(&canon(*k)));
        }
    }
}
