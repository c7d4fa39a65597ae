#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can call
// the chain consistency check.

use crate::chained_hash_map::ChainedHashMap;
use crate::cursor::{retain_values, Cursor};
use crate::hashing::{FnHashing, KeyHashing, StringHashing};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};

// Pool-indexed operations: indices shrink to earlier keys, the pool
// shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Remove(usize),
    Get(usize),
    PutNull(i32),
    RemoveNull,
    CursorDropOdd,
    Clear,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
            3 => idx.clone().prop_map(OpI::Remove),
            3 => idx.clone().prop_map(OpI::Get),
            1 => any::<i32>().prop_map(OpI::PutNull),
            1 => Just(OpI::RemoveNull),
            1 => Just(OpI::CursorDropOdd),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// State-machine equivalence against std::collections::HashMap, with the
// null key modelled as `None`.
// Invariants exercised after every op:
// - put/remove return the model's previous value.
// - get/contains_key agree with the model for every pool key.
// - len equals the number of keys contains_key reports.
// - every entry is linked exactly once in the bucket its hash selects.
fn run_state_machine<S>(
    mut sut: ChainedHashMap<String, i32, S>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    S: KeyHashing<String>,
{
    let mut model: HashMap<Option<String>, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = pool[i].clone();
                let prev = sut.put(k.clone(), v);
                prop_assert_eq!(prev, model.insert(Some(k), v));
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k), model.remove(&Some(k.clone())));
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(&Some(k.clone())));
            }
            OpI::PutNull(v) => {
                prop_assert_eq!(sut.put_null(v), model.insert(None, v));
            }
            OpI::RemoveNull => {
                prop_assert_eq!(sut.remove_null(), model.remove(&None));
            }
            OpI::CursorDropOdd => {
                let mut visited = 0usize;
                let removed = {
                    let mut c = sut.value_cursor();
                    let removed = retain_values(&mut c, |v| {
                        visited += 1;
                        v % 2 == 0
                    });
                    prop_assert!(!c.has_next());
                    removed
                };
                prop_assert_eq!(visited, model.len());
                prop_assert!(removed.iter().all(|v| v % 2 != 0));
                model.retain(|_, v| *v % 2 == 0);
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
            }
            OpI::Iterate => {
                let s: BTreeMap<Option<String>, i32> =
                    sut.iter().map(|(k, v)| (k.cloned(), *v)).collect();
                let m: BTreeMap<Option<String>, i32> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(s, m);
            }
        }

        sut.check_chains();
        prop_assert_eq!(sut.len(), model.len());
        let mut distinct = pool.clone();
        distinct.sort();
        distinct.dedup();
        let live = distinct.iter().filter(|k| sut.contains_key(*k)).count()
            + usize::from(sut.contains_null_key());
        prop_assert_eq!(sut.len(), live);
        prop_assert_eq!(sut.contains_null_key(), model.contains_key(&None));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        // Start tiny so most scenarios cross several rehashes.
        let sut: ChainedHashMap<String, i32, StringHashing> = ChainedHashMap::with_buckets(1, 0.75);
        run_state_machine(sut, pool, ops)?;
    }
}

fn const_hash(_k: &String) -> u32 {
    7
}
fn string_eq(a: &String, b: &String) -> bool {
    a == b
}

// Same invariants under worst-case collisions: every key shares a chain.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut = ChainedHashMap::with_buckets_and_hashing(3, 0.75, FnHashing::new(const_hash, string_eq));
        run_state_machine(sut, pool, ops)?;
    }
}

// Removing every k-th value through the cursor removes exactly those
// values and visits each entry once.
proptest! {
    #[test]
    fn prop_cursor_removal_visits_each_once(n in 0usize..300, step in 1usize..5) {
        let mut sut: ChainedHashMap<String, usize> = ChainedHashMap::with_buckets(2, 0.5);
        for i in 0..n {
            sut.put(format!("k{i}"), i);
        }
        let mut seen = vec![0u8; n];
        {
            let mut c = sut.value_cursor();
            while let Some(&v) = c.next() {
                seen[v] += 1;
                if v % step == 0 {
                    prop_assert_eq!(c.remove_current(), Ok(v));
                }
            }
        }
        prop_assert!(seen.iter().all(|&s| s == 1));
        for i in 0..n {
            prop_assert_eq!(sut.contains_key(format!("k{i}").as_str()), i % step != 0);
        }
        sut.check_chains();
    }
}
