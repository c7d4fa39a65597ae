#![cfg(test)]

// Property tests for OrderedMap kept inside the crate so every step can run
// the red-black validation walk.

use crate::cursor::Cursor;
use crate::ordering::{NaturalOrder, ReverseOrder};
use crate::tree_map::OrderedMap;
use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum OpT {
    Put(u16, i32),
    Remove(u16),
    Get(u16),
    Ends,
    CursorDropOdd,
    CloneAndMutate(u16),
    Clear,
}

fn arb_ops() -> impl Strategy<Value = Vec<OpT>> {
    // Small key space so puts replace and removes hit.
    let key = 0u16..64;
    let op = prop_oneof![
        8 => (key.clone(), any::<i32>()).prop_map(|(k, v)| OpT::Put(k, v)),
        5 => key.clone().prop_map(OpT::Remove),
        3 => key.clone().prop_map(OpT::Get),
        1 => Just(OpT::Ends),
        1 => Just(OpT::CursorDropOdd),
        1 => key.prop_map(OpT::CloneAndMutate),
        1 => Just(OpT::Clear),
    ];
    proptest::collection::vec(op, 1..200)
}

// State-machine equivalence against BTreeMap.
// Invariants exercised after every op:
// - put/remove/get agree with the model.
// - iteration is ascending and matches the model exactly.
// - the tree passes validate(): black root, no red-red edge, equal black
//   height, consistent parent links, search order, len == node count.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(ops in arb_ops()) {
        let mut sut: OrderedMap<u16, i32> = OrderedMap::new();
        let mut model: BTreeMap<u16, i32> = BTreeMap::new();

        for op in ops {
            match op {
                OpT::Put(k, v) => {
                    prop_assert_eq!(sut.put(k, v), model.insert(k, v));
                }
                OpT::Remove(k) => {
                    prop_assert_eq!(sut.remove(&k), model.remove(&k));
                }
                OpT::Get(k) => {
                    prop_assert_eq!(sut.get(&k), model.get(&k));
                    prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
                }
                OpT::Ends => {
                    prop_assert_eq!(sut.first_key(), model.keys().next());
                    prop_assert_eq!(sut.last_key(), model.keys().next_back());
                }
                OpT::CursorDropOdd => {
                    let mut seen = Vec::new();
                    {
                        let mut c = sut.value_cursor();
                        while let Some(&v) = c.next() {
                            seen.push(v);
                            if v % 2 != 0 {
                                prop_assert_eq!(c.remove_current(), Ok(v));
                            }
                        }
                    }
                    let expected: Vec<i32> = model.values().copied().collect();
                    prop_assert_eq!(seen, expected);
                    model.retain(|_, v| *v % 2 == 0);
                }
                OpT::CloneAndMutate(k) => {
                    let mut copy = sut.clone();
                    copy.remove(&k);
                    copy.put(k.wrapping_add(1000), 0);
                    copy.validate();
                }
                OpT::Clear => {
                    sut.clear();
                    model.clear();
                }
            }

            sut.validate();
            prop_assert_eq!(sut.len(), model.len());
            let got: Vec<(u16, i32)> = sut.iter().map(|(k, v)| (*k, *v)).collect();
            let want: Vec<(u16, i32)> = model.iter().map(|(k, v)| (*k, *v)).collect();
            prop_assert_eq!(got, want);
        }
    }
}

// A reversed comparator yields descending iteration and keeps the tree valid.
proptest! {
    #[test]
    fn prop_reverse_order(keys in proptest::collection::vec(any::<i16>(), 0..300)) {
        let mut sut: OrderedMap<i16, (), ReverseOrder<NaturalOrder>> = OrderedMap::default();
        for k in &keys {
            sut.put(*k, ());
        }
        sut.validate();
        let mut want = keys.clone();
        want.sort_unstable_by(|a, b| b.cmp(a));
        want.dedup();
        let got: Vec<i16> = sut.keys().copied().collect();
        prop_assert_eq!(got, want);
    }
}
