// SimpleHashtable property tests through the public API.
//
// Property 1: remove_if agrees with HashMap::retain.
//  - Model: std HashMap fed the same puts.
//  - Invariant: after remove_if(pred), keys/values equal the model after
//    retain(!pred); the returned count equals the size difference.
//
// Property 2: a cursor walk with interleaved removals visits every
// entry exactly once and removes exactly the chosen ones.
//
// Property 3: Display lists the entries in iteration order.
use proptest::prelude::*;
use simple_hashtable::{SimpleHashtable, TableEntry};
use std::collections::{BTreeMap, HashMap};

proptest! {
    #[test]
    fn prop_remove_if_matches_retain(
        puts in proptest::collection::vec((0u16..64, any::<i8>()), 0..120),
        modulus in 1u16..5,
        floor in 1usize..=8,
    ) {
        let mut sut: SimpleHashtable<u16, i8> = SimpleHashtable::with_capacity(floor).unwrap();
        let mut model: HashMap<u16, i8> = HashMap::new();
        for (k, v) in puts {
            prop_assert_eq!(sut.put(k, v), model.insert(k, v));
        }

        let before = model.len();
        model.retain(|k, _| k % modulus != 0);
        let removed = sut.remove_if(|e: &TableEntry<u16, i8>| e.key() % modulus == 0);

        prop_assert_eq!(removed, before - model.len());
        prop_assert_eq!(sut.len(), model.len());
        let got: BTreeMap<u16, i8> = sut.iter().map(|e| (*e.key(), *e.value())).collect();
        let want: BTreeMap<u16, i8> = model.into_iter().collect();
        prop_assert_eq!(got, want);
    }
}

proptest! {
    #[test]
    fn prop_cursor_walk_with_removals(
        keys in proptest::collection::btree_set("[a-z]{1,6}", 0..60),
        drop_mask in proptest::collection::vec(any::<bool>(), 60),
    ) {
        let mut sut: SimpleHashtable<String, usize> = SimpleHashtable::with_capacity(1).unwrap();
        for (i, k) in keys.iter().enumerate() {
            sut.put(k.clone(), i);
        }
        let total = sut.len();

        let mut c = sut.cursor();
        let mut visited = Vec::new();
        let mut dropped = Vec::new();
        while c.has_next(&sut).unwrap() {
            let key = c.next(&sut).unwrap().key().clone();
            if drop_mask[visited.len()] {
                let (k, _) = c.remove(&mut sut).unwrap();
                prop_assert_eq!(&k, &key);
                dropped.push(k);
            }
            visited.push(key);
        }

        prop_assert_eq!(visited.len(), total);
        let mut sorted = visited.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), total);
        prop_assert_eq!(sut.len(), total - dropped.len());
        for k in &dropped {
            prop_assert!(!sut.contains_key(k.as_str()));
        }
        for k in visited.iter().filter(|k| !dropped.contains(k)) {
            prop_assert!(sut.contains_key(k.as_str()));
        }
    }
}

proptest! {
    #[test]
    fn prop_display_follows_iteration(entries in proptest::collection::vec((0u32..1000, 0u32..10), 0..30)) {
        let table: SimpleHashtable<u32, u32> = entries.into_iter().collect();
        let parts: Vec<String> = table.iter().map(|e| e.to_string()).collect();
        prop_assert_eq!(table.to_string(), format!("[{}]", parts.join(", ")));
    }
}
