#![cfg(test)]

// Property tests for HashSymTable kept inside the crate so they can check
// bucket placement and inject bucket allocation failures.

use crate::binding::Chain;
use crate::growth::{self, PRIMES};
use crate::hash_table::{alloc_buckets, HashSymTable};
use crate::symtable::{AllocError, PutError, SymTable};
use proptest::prelude::*;
use std::cell::Cell;
use std::collections::{BTreeSet, HashMap};

thread_local! {
    static STARVED: Cell<bool> = const { Cell::new(false) };
}

/// Fails every growth request while `STARVED` is set.
fn flaky_buckets(len: usize) -> Result<Vec<Chain>, AllocError> {
    if len != PRIMES[0] && STARVED.with(Cell::get) {
        Err(AllocError)
    } else {
        alloc_buckets(len)
    }
}

#[derive(Clone, Debug)]
enum Op {
    Put(usize, i32),
    Replace(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    // Insert `n` fresh keys to push the load factor over the threshold.
    Bulk(u16, u8),
    Starve(bool),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Put(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Replace(i, v)),
            2 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Get),
            1 => "[a-z]{0,5}".prop_map(Op::Contains),
            1 => (1u16..600, any::<u8>()).prop_map(|(n, s)| Op::Bulk(n, s)),
            1 => any::<bool>().prop_map(Op::Starve),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..40).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn put_checked(
    sut: &mut HashSymTable<i32>,
    model: &mut HashMap<String, i32>,
    key: &str,
    v: i32,
) -> Result<(), TestCaseError> {
    let before = (sut.bucket_count(), sut.prime_index());
    let expect_growth = growth::exceeds_load_factor(sut.len(), sut.bucket_count())
        && before.1 + 1 < PRIMES.len()
        && !STARVED.with(Cell::get);
    let already = model.contains_key(key);
    match sut.put(key, v) {
        Ok(()) => {
            prop_assert!(!already, "put must fail on duplicate");
            model.insert(key.to_string(), v);
        }
        Err(PutError::DuplicateKey(back)) => {
            prop_assert!(already, "duplicate only when key exists");
            prop_assert_eq!(back, v);
        }
        Err(PutError::OutOfMemory(_)) => prop_assert!(false, "node allocation cannot fail here"),
    }
    if expect_growth {
        prop_assert_eq!(sut.prime_index(), before.1 + 1);
        prop_assert_eq!(sut.bucket_count(), PRIMES[before.1 + 1]);
    } else {
        prop_assert_eq!((sut.bucket_count(), sut.prime_index()), before);
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// - put/replace/remove/get/contains agree with the model.
// - Growth happens exactly when the policy says so and allocation succeeds;
//   a starved allocator leaves the bucket array as it was.
// - After every op, each binding hashes to the bucket holding it and the
//   chains hold exactly len() bindings.
proptest! {
    #![proptest_config(ProptestConfig { cases: 48, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        STARVED.with(|s| s.set(false));
        let mut sut = HashSymTable::with_bucket_allocator(flaky_buckets).unwrap();
        let mut model: HashMap<String, i32> = HashMap::new();

        for op in ops {
            match op {
                Op::Put(i, v) => put_checked(&mut sut, &mut model, &pool[i], v)?,
                Op::Replace(i, v) => {
                    let prev = sut.replace(&pool[i], v);
                    let expected = model.get_mut(&pool[i]).map(|slot| std::mem::replace(slot, v));
                    prop_assert_eq!(prev, expected);
                }
                Op::Remove(i) => {
                    prop_assert_eq!(sut.remove(&pool[i]), model.remove(&pool[i]));
                    prop_assert!(!sut.contains(&pool[i]));
                }
                Op::Get(i) => {
                    prop_assert_eq!(sut.get(&pool[i]), model.get(&pool[i]));
                }
                Op::Contains(s) => {
                    prop_assert_eq!(sut.contains(&s), model.contains_key(&s));
                }
                Op::Bulk(n, seed) => {
                    let start = model.len();
                    for j in 0..n as usize {
                        let k = format!("bulk{seed}-{}", start + j);
                        put_checked(&mut sut, &mut model, &k, j as i32)?;
                    }
                }
                Op::Starve(on) => STARVED.with(|s| s.set(on)),
                Op::Iterate => {
                    let s_keys: BTreeSet<&str> = sut.iter().map(|(k, _)| k).collect();
                    let m_keys: BTreeSet<&str> = model.keys().map(String::as_str).collect();
                    prop_assert_eq!(sut.iter().count(), sut.len());
                    prop_assert_eq!(s_keys, m_keys);
                }
            }

            sut.assert_consistent();
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
        }

        for (k, v) in &model {
            prop_assert_eq!(sut.get(k), Some(v));
        }
        STARVED.with(|s| s.set(false));
    }
}

// Property: the policy is a pure function that only ever steps to the next
// prime, and only when the load factor is exceeded.
proptest! {
    #[test]
    fn prop_plan_is_monotone(node_count in 0usize..400_000, prime_index in 0usize..PRIMES.len()) {
        let bucket_count = PRIMES[prime_index];
        match growth::plan(node_count, bucket_count, prime_index) {
            growth::Growth::Stay => {
                prop_assert!(!growth::exceeds_load_factor(node_count, bucket_count));
            }
            growth::Growth::Saturated => {
                prop_assert_eq!(prime_index, PRIMES.len() - 1);
                prop_assert!(growth::exceeds_load_factor(node_count, bucket_count));
            }
            growth::Growth::Grow { prime_index: next, bucket_count: count } => {
                prop_assert_eq!(next, prime_index + 1);
                prop_assert_eq!(count, PRIMES[next]);
                prop_assert!(node_count * 4 > bucket_count * 3);
            }
        }
    }
}
