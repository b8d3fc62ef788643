use std::{
    collections::{BTreeMap, BTreeSet},
    iter::once,
};

use crate::{hash, HashMap, Set, StructuralHash};

#[derive(Debug)]
pub(crate) enum Operation {
    Insert(u64),
    Remove(u64),
    Save,
    Union(usize),
    Dump,
}

/// Replays `ops` against two maps and a `BTreeMap` oracle. Every saved
/// version must still match the oracle it was saved with at the end.
pub(crate) fn test_hash_map(ops: impl IntoIterator<Item = Operation>) {
    let mut oracle = BTreeMap::<u64, u64>::new();
    let mut map1 = HashMap::empty();
    let mut map2 = HashMap::empty();
    let mut saved = Vec::<(HashMap<u64, u64>, BTreeMap<u64, u64>)>::new();
    for op in ops {
        match op {
            Operation::Insert(i) => {
                let k = i;
                let v = i + 1;
                assert_eq!(oracle.get(&k), map1.get(&k));
                let prev = map1.clone();
                oracle.insert(k, v);
                map1 = map1.put(k, v);
                map2 = map2.put(k, v);
                assert_eq!(prev.has_key(&k), prev.size() == map1.size());
                assert_eq!(map1, map2);
                assert_eq!(hash::calc(&map1), hash::calc(&map2));
                assert_eq!(oracle.get(&k), map1.get(&k));
                assert_eq!(oracle.contains_key(&k), map1.has_key(&k));
                assert_eq!(oracle.len(), map1.size());
            }
            Operation::Remove(i) => {
                assert_eq!(oracle.contains_key(&i), map1.has_key(&i));
                oracle.remove(&i);
                map1 = map1.remove(&i);
                map2 = map2.remove(&i);
                assert_eq!(map1, map2);
                assert_eq!(oracle.contains_key(&i), map1.has_key(&i));
                assert_eq!(oracle.len(), map1.size());
            }
            Operation::Dump => {
                assert_eq!(oracle.len(), map1.size());
                let v1: Vec<(u64, u64)> = oracle.iter().map(|(k, v)| (*k, *v)).collect();
                let mut v2: Vec<(u64, u64)> = map1.iter().map(|(k, v)| (*k, *v)).collect();
                v2.sort();
                assert_eq!(v1, v2);
                for (k, v) in v1 {
                    assert_eq!(Some(&v), map1.get(&k));
                }
                let rebuilt = HashMap::new(oracle.iter().map(|(k, v)| crate::pair(*k, *v)));
                assert_eq!(map1, rebuilt);
            }
            Operation::Union(map) => {
                let (prev, prev_oracle) = &saved[map];
                assert_eq!(prev.size(), prev_oracle.len());
                for (k, v) in prev.iter() {
                    map1 = map1.put(*k, *v);
                }
                map2 = prev.iter().fold(map2, |acc, (k, v)| acc.put(*k, *v));
                assert_eq!(map1, map2);
                for (k, v) in prev_oracle.iter() {
                    oracle.insert(*k, *v);
                }
                assert_eq!(oracle.len(), map1.size());
            }
            Operation::Save => {
                saved.push((map1.clone(), oracle.clone()));
            }
        }
    }
    for (map, oracle) in &saved {
        let expected: HashMap<u64, u64> = oracle.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(map, &expected);
    }
}

pub(crate) fn test_hash_map_collision(ops: impl IntoIterator<Item = Operation>) {
    let mut oracle = BTreeMap::<Collider, u64>::new();
    let mut map1 = HashMap::empty();
    let mut map2 = HashMap::empty();
    let mut saved = Vec::<(HashMap<Collider, u64>, BTreeMap<Collider, u64>)>::new();
    for op in ops {
        match op {
            Operation::Insert(i) => {
                let (k1, k2) = collider(i);
                let v = i + 1;
                assert_eq!(oracle.get(&k1), map1.get(&k1));
                assert_eq!(oracle.get(&k2), map1.get(&k2));
                oracle.insert(k1, v);
                oracle.insert(k2, v);
                map1 = map1.put(k1, v).put(k2, v);
                map2 = map2.put(k2, v).put(k1, v);
                assert_eq!(map1, map2);
                assert_eq!(oracle.get(&k1), map1.get(&k1));
                assert_eq!(oracle.get(&k2), map1.get(&k2));
                assert_eq!(oracle.len(), map1.size());
            }
            Operation::Remove(i) => {
                let (k1, k2) = collider(i);
                assert_eq!(oracle.contains_key(&k1), map1.has_key(&k1));
                assert_eq!(oracle.contains_key(&k2), map1.has_key(&k2));
                oracle.remove(&k2);
                map1 = map1.remove(&k2);
                assert_eq!(oracle.contains_key(&k1), map1.has_key(&k1));
                assert!(!map1.has_key(&k2));
                oracle.remove(&k1);
                map1 = map1.remove(&k1);
                map2 = map2.remove(&k1).remove(&k2);
                assert_eq!(map1, map2);
                assert!(!map1.has_key(&k1));
                assert_eq!(oracle.len(), map1.size());
            }
            Operation::Dump => {
                assert_eq!(oracle.len(), map1.size());
                let v1: Vec<(Collider, u64)> = oracle.iter().map(|(k, v)| (*k, *v)).collect();
                let mut v2: Vec<(Collider, u64)> = map1.iter().map(|(k, v)| (*k, *v)).collect();
                v2.sort();
                assert_eq!(v1, v2);
                for (k, v) in v1 {
                    assert_eq!(Some(&v), map1.get(&k));
                }
            }
            Operation::Union(map) => {
                let (prev, prev_oracle) = &saved[map];
                for (k, v) in prev.iter() {
                    map1 = map1.put(*k, *v);
                }
                map2 = prev.iter().fold(map2, |acc, (k, v)| acc.put(*k, *v));
                for (k, v) in prev_oracle.iter() {
                    oracle.insert(*k, *v);
                }
                assert_eq!(map1, map2);
                assert_eq!(oracle.len(), map1.size());
            }
            Operation::Save => {
                saved.push((map1.clone(), oracle.clone()));
            }
        }
    }
    for (map, oracle) in &saved {
        let expected: HashMap<Collider, u64> = oracle.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(map, &expected);
    }
}

/// Replays `ops` against two sets and a `BTreeSet` oracle. `Union` goes
/// through `Set::union` in both directions, which must agree.
pub(crate) fn test_hash_set(ops: impl IntoIterator<Item = Operation>) {
    let mut oracle = BTreeSet::<u64>::new();
    let mut set1 = Set::empty();
    let mut set2 = Set::empty();
    let mut saved = Vec::<(Set<u64>, BTreeSet<u64>)>::new();
    for op in ops {
        match op {
            Operation::Insert(i) => {
                assert_eq!(oracle.contains(&i), set1.contains(&i));
                let prev = set1.clone();
                assert_eq!(oracle.insert(i), !prev.contains(&i));
                set1 = set1.add(i);
                set2 = set2.add(i);
                assert_eq!(set1, set2);
                assert_eq!(hash::calc(&set1), hash::calc(&set2));
                assert_eq!(oracle.contains(&i), set1.contains(&i));
                assert_eq!(oracle.len(), set1.cardinality());
            }
            Operation::Remove(i) => {
                assert_eq!(oracle.contains(&i), set1.contains(&i));
                oracle.remove(&i);
                set1 = set1.remove(&i);
                set2 = set2.remove(&i);
                assert_eq!(set1, set2);
                assert_eq!(oracle.contains(&i), set1.contains(&i));
                assert_eq!(oracle.len(), set1.cardinality());
            }
            Operation::Dump => {
                assert_eq!(oracle.len(), set1.cardinality());
                let v1: Vec<u64> = oracle.iter().copied().collect();
                let mut v2: Vec<u64> = set1.iter().copied().collect();
                v2.sort();
                assert_eq!(v1, v2);
                for val in v1 {
                    assert_eq!(oracle.contains(&val), set1.contains(&val));
                }
                assert_eq!(set1, Set::new(oracle.iter().copied()));
            }
            Operation::Union(set) => {
                let (prev, prev_oracle) = &saved[set];
                let left = set1.union(prev);
                let right = prev.union(&set1);
                for i in prev_oracle.iter().copied() {
                    oracle.insert(i);
                }
                assert_eq!(left, right);
                assert!(left.superset_of(prev));
                assert!(left.superset_of(&set1));
                set1 = left;
                set2 = set2.union(prev);
                assert_eq!(set1, set2);
                assert_eq!(oracle.len(), set1.cardinality());
            }
            Operation::Save => {
                saved.push((set1.clone(), oracle.clone()));
            }
        }
    }
    for (set, oracle) in &saved {
        assert_eq!(set, &Set::new(oracle.iter().copied()));
    }
}

pub(crate) fn test_hash_set_collision(ops: impl IntoIterator<Item = Operation>) {
    let mut oracle = BTreeSet::<Collider>::new();
    let mut set1 = Set::empty();
    let mut set2 = Set::empty();
    let mut saved = Vec::<(Set<Collider>, BTreeSet<Collider>)>::new();

    for op in ops {
        match op {
            Operation::Insert(i) => {
                let (c1, c2) = collider(i);
                assert_eq!(oracle.contains(&c1), set1.contains(&c1));
                assert_eq!(oracle.contains(&c2), set1.contains(&c2));
                oracle.insert(c1);
                oracle.insert(c2);
                set1 = set1.add(c1).add(c2);
                set2 = set2.add(c2).add(c1);
                assert_eq!(set1, set2);
                assert_eq!(oracle.contains(&c1), set1.contains(&c1));
                assert_eq!(oracle.contains(&c2), set1.contains(&c2));
                assert_eq!(oracle.len(), set1.cardinality());
            }
            Operation::Remove(i) => {
                let (c1, c2) = collider(i);
                assert_eq!(oracle.contains(&c1), set1.contains(&c1));
                assert_eq!(oracle.contains(&c2), set1.contains(&c2));
                oracle.remove(&c1);
                set1 = set1.remove(&c1);
                assert_eq!(oracle.contains(&c2), set1.contains(&c2));
                oracle.remove(&c2);
                set1 = set1.remove(&c2);
                set2 = set2.remove(&c2).remove(&c1);
                assert_eq!(set1, set2);
                assert!(!set1.contains(&c1));
                assert!(!set1.contains(&c2));
                assert_eq!(oracle.len(), set1.cardinality());
            }
            Operation::Dump => {
                let v1: Vec<Collider> = oracle.iter().copied().collect();
                let mut v2: Vec<Collider> = set1.iter().copied().collect();
                v2.sort();
                assert_eq!(v1, v2);
                for val in v1 {
                    assert_eq!(oracle.contains(&val), set1.contains(&val));
                }
                assert_eq!(oracle.len(), set1.cardinality());
            }
            Operation::Union(set) => {
                let (prev, prev_oracle) = &saved[set];
                let left = set1.union(prev);
                let right = prev.union(&set1);
                for i in prev_oracle.iter().copied() {
                    oracle.insert(i);
                }
                assert_eq!(left, right);
                set1 = left;
                set2 = set2.union(prev);
                assert_eq!(set1, set2);
                assert_eq!(oracle.len(), set1.cardinality());
            }
            Operation::Save => {
                saved.push((set1.clone(), oracle.clone()));
            }
        }
    }
    for (set, oracle) in &saved {
        assert_eq!(set, &Set::new(oracle.iter().copied()));
    }
}

/// A value whose structural hash only covers the first field, so `(i, 0)`
/// and `(i, 1)` always collide.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub(crate) struct Collider(pub(crate) u64, pub(crate) u64);

impl StructuralHash for Collider {
    fn structural_hash(&self) -> u64 {
        hash::calc(&self.0)
    }
}

pub(crate) fn collider(i: u64) -> (Collider, Collider) {
    (Collider(i, 0), Collider(i, 1))
}

const N: usize = 1000;
pub(crate) fn insert_remove_sparse() -> impl Iterator<Item = Operation> {
    let to_insert: BTreeSet<u64> = (0..N).map(|_| rand::random::<u64>()).collect();
    let in_sequence: Vec<u64> = to_insert.into_iter().collect();
    let in_set: Vec<u64> = in_sequence[0..(N / 2)].to_vec();
    let not_in_set: Vec<u64> = in_sequence[(N / 2)..].to_vec();
    in_set
        .clone()
        .into_iter()
        .map(Operation::Insert)
        .chain(once(Operation::Save))
        .chain(once(Operation::Dump))
        .chain(not_in_set.into_iter().map(Operation::Remove))
        .chain(once(Operation::Dump))
        .chain(in_set.into_iter().map(Operation::Remove))
        .chain(once(Operation::Dump))
}

pub(crate) fn insert_remove_dense() -> impl Iterator<Item = Operation> {
    const K: u64 = N as u64;
    (0..K)
        .map(Operation::Insert)
        .chain(once(Operation::Save))
        .chain(once(Operation::Dump))
        .chain((0..K).map(Operation::Remove))
        .chain(once(Operation::Dump))
}

pub(crate) fn union_no_overlap() -> impl Iterator<Item = Operation> {
    let to_insert_1 = Vec::from_iter((0..N).map(|_| rand::random::<u64>()));
    let to_insert_2 = Vec::from_iter((0..N).map(|_| rand::random::<u64>()));
    to_insert_1
        .clone()
        .into_iter()
        .map(Operation::Insert)
        .chain(once(Operation::Save))
        .chain(to_insert_1.into_iter().map(Operation::Remove))
        .chain(once(Operation::Dump))
        .chain(to_insert_2.into_iter().map(Operation::Insert))
        .chain(once(Operation::Dump))
        .chain(once(Operation::Union(0)))
        .chain(once(Operation::Dump))
}

pub(crate) fn union_all_overlap() -> impl Iterator<Item = Operation> {
    let to_insert = Vec::from_iter((0..N).map(|_| rand::random::<u64>()));
    to_insert
        .clone()
        .into_iter()
        .map(Operation::Insert)
        .chain(once(Operation::Save))
        .chain(once(Operation::Dump))
        .chain(to_insert.into_iter().map(Operation::Insert))
        .chain(once(Operation::Dump))
        .chain(once(Operation::Union(0)))
        .chain(once(Operation::Dump))
}

pub(crate) fn union_partial_overlap() -> impl Iterator<Item = Operation> {
    let to_insert_1 = Vec::from_iter((0..N).map(|_| rand::random::<u64>()));
    let mut to_insert_2 = Vec::from_iter(to_insert_1[0..N / 2].iter().copied());
    to_insert_2.extend((0..N).map(|_| rand::random::<u64>()));
    to_insert_1
        .clone()
        .into_iter()
        .map(Operation::Insert)
        .chain(once(Operation::Save))
        .chain(to_insert_1.into_iter().map(Operation::Remove))
        .chain(once(Operation::Dump))
        .chain(to_insert_2.into_iter().map(Operation::Insert))
        .chain(once(Operation::Dump))
        .chain(once(Operation::Union(0)))
        .chain(once(Operation::Dump))
}
