#![cfg(test)]

// Property tests for SimpleHashtable kept inside the crate so the
// modification counter and bucket array can be asserted directly.

use crate::simple_hashtable::{bucket_index, SimpleHashtable};
use crate::TableError;
use core::hash::BuildHasher;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::hash::Hasher;

// Pool-indexed operations: indices shrink to earlier keys, op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Put(usize, Option<i32>),
    Remove(usize),
    Get(usize),
    ContainsValue(Option<i32>),
    CursorRemove(usize),
    Iterate,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let value = proptest::option::of(-4i32..4);
        let op = prop_oneof![
            6 => (idx.clone(), value.clone()).prop_map(|(i, v)| Op::Put(i, v)),
            2 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Get),
            1 => value.prop_map(Op::ContainsValue),
            2 => idx.clone().prop_map(Op::CursorRemove),
            1 => Just(Op::Iterate),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn expected_capacity(floor: usize, len: usize) -> usize {
    let mut c = floor;
    while len * 4 >= c * 3 {
        c *= 2;
    }
    c
}

fn check_structure<S>(t: &SimpleHashtable<String, Option<i32>, S>) -> Result<(), TestCaseError> {
    // Every entry sits in the bucket its stored hash selects, exactly once.
    let mut seen = 0;
    for (i, head) in t.buckets.iter().enumerate() {
        let mut cur = *head;
        while let Some(k) = cur {
            let e = &t.slots[k];
            prop_assert_eq!(bucket_index(e.hash, t.capacity()), i);
            seen += 1;
            cur = e.next;
        }
    }
    prop_assert_eq!(seen, t.len());
    prop_assert!(t.capacity().is_power_of_two());
    prop_assert!(t.len() * 4 < t.capacity() * 3 || t.is_empty());
    Ok(())
}

fn run_scenario<S>(
    mut sut: SimpleHashtable<String, Option<i32>, S>,
    pool: Vec<String>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher,
{
    let mut model: HashMap<String, Option<i32>> = HashMap::new();
    let floor = sut.capacity();
    let mut high_water = 0usize;

    for op in ops {
        let mods_before = sut.mod_count.get();
        match op {
            Op::Put(i, v) => {
                let k = pool[i].clone();
                let existed = model.contains_key(&k);
                let cap_before = sut.capacity();
                let prev = sut.put(k.clone(), v);
                prop_assert_eq!(prev, model.insert(k, v));
                if existed {
                    prop_assert_eq!(sut.mod_count.get(), mods_before);
                    prop_assert_eq!(sut.capacity(), cap_before);
                } else {
                    prop_assert!(sut.mod_count.get() > mods_before);
                }
            }
            Op::Remove(i) => {
                let k = &pool[i];
                let present = model.contains_key(k);
                prop_assert_eq!(sut.remove(k.as_str()), model.remove(k));
                // Absent removals leave the counter alone.
                let bumps = if present { 1 } else { 0 };
                prop_assert_eq!(sut.mod_count.get(), mods_before + bumps);
            }
            Op::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k.as_str()), model.get(k));
                prop_assert_eq!(sut.contains_key(k.as_str()), model.contains_key(k));
            }
            Op::ContainsValue(v) => {
                prop_assert_eq!(sut.contains_value(&v), model.values().any(|m| *m == v));
            }
            Op::CursorRemove(i) => {
                let target = &pool[i];
                let mut cursor = sut.cursor();
                let mut removed = None;
                while cursor.has_next(&sut).expect("no outside changes") {
                    let hit = cursor.next(&sut).expect("has_next said yes").key() == target;
                    if hit {
                        removed = Some(cursor.remove(&mut sut).expect("first remove after next"));
                        prop_assert_eq!(
                            cursor.remove(&mut sut),
                            Err(TableError::IllegalState("remove requires a preceding next"))
                        );
                    }
                }
                prop_assert!(matches!(cursor.next(&sut), Err(TableError::Exhausted)));
                let expected = model.remove(target).map(|v| (target.clone(), v));
                prop_assert_eq!(removed, expected);
                prop_assert!(!sut.contains_key(target.as_str()));
            }
            Op::Iterate => {
                let keys: Vec<String> = sut.iter().map(|e| e.key().clone()).collect();
                let unique: BTreeSet<String> = keys.iter().cloned().collect();
                prop_assert_eq!(keys.len(), sut.len());
                prop_assert_eq!(unique, model.keys().cloned().collect::<BTreeSet<_>>());
                let via_vec: Vec<String> = sut.to_vec().iter().map(|e| e.key().clone()).collect();
                prop_assert_eq!(via_vec, keys);
            }
            Op::Clear => {
                let cap = sut.capacity();
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), cap);
                prop_assert_eq!(sut.mod_count.get(), mods_before + 1);
            }
        }

        high_water = high_water.max(sut.len());
        prop_assert!(sut.mod_count.get() >= mods_before);
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        // Capacity is driven by the largest size ever reached; it never shrinks.
        prop_assert_eq!(sut.capacity(), expected_capacity(floor, high_water));
        check_structure(&sut)?;
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), floor in 1usize..=16) {
        let sut = SimpleHashtable::with_capacity(floor).unwrap();
        run_scenario(sut, pool, ops)?;
    }
}

// Collision variant: every key hashes to the same bucket.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario(), floor in 1usize..=16) {
        let sut = SimpleHashtable::with_capacity_and_hasher(floor, ConstBuildHasher).unwrap();
        run_scenario(sut, pool, ops)?;
    }
}

// Property: with every key colliding, iteration order equals first-insertion
// order of the surviving keys.
proptest! {
    #[test]
    fn prop_single_chain_preserves_append_order(keys in proptest::collection::vec("[a-z]{1,4}", 0..40)) {
        let mut sut: SimpleHashtable<String, usize, ConstBuildHasher> =
            SimpleHashtable::with_capacity_and_hasher(1, ConstBuildHasher).unwrap();
        let mut order: Vec<String> = Vec::new();
        for (i, k) in keys.into_iter().enumerate() {
            if !order.contains(&k) {
                order.push(k.clone());
            }
            sut.put(k, i);
        }
        let got: Vec<String> = sut.iter().map(|e| e.key().clone()).collect();
        prop_assert_eq!(got, order);
    }
}
