//! Underlying node representation for the sets and maps.
//!
//! A hash-array-mapped trie over the 64-bit structural hash. Every level
//! consumes `BITS` bits of the hash. Nodes are shared between versions of a
//! collection through `Arc` and copied along the updated path only
//! (`Arc::make_mut`), so a derived collection never disturbs the one it was
//! built from.
//!
//! Items whose full hashes agree are kept side by side in a collision node
//! and told apart with `Eq`: the hash picks the bucket, equality
//! decides identity.
use std::{fmt, mem, slice, sync::Arc};

use crate::hash::StructuralHash;

const BITS: u32 = 5;
const ARITY: usize = 1 << BITS;

pub(crate) trait HashItem: Clone {
    type Key: StructuralHash + Eq;
    fn key(&self) -> &Self::Key;
    /// Contribution of this item to the digest of every node above it.
    /// `hash` is the structural hash of the key.
    fn summary(&self, hash: u64) -> u64;
}

#[derive(Clone)]
pub(crate) struct Chunk<T> {
    // XOR of the summaries of all items below this node.
    digest: u64,
    len: usize,
    children: [Child<T>; ARITY],
}

#[derive(Clone)]
enum Child<T> {
    Null,
    Leaf(u64, T),
    Collision(Arc<CollisionNode<T>>),
    Inner(Arc<Chunk<T>>),
}

impl<T> Default for Child<T> {
    fn default() -> Self {
        Child::Null
    }
}

#[derive(Clone)]
struct CollisionNode<T> {
    hash: u64,
    digest: u64,
    data: Vec<T>,
}

impl<T> Chunk<T> {
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn digest(&self) -> u64 {
        self.digest
    }

    /// Depth-first walk over every item. The order is unspecified.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            stack: vec![self.children.iter()],
            bucket: None,
            remaining: self.len,
        }
    }
}

impl<T: HashItem> Chunk<T> {
    pub(crate) fn get(&self, key: &T::Key, hash: u64, bits: u32) -> Option<&T> {
        match &self.children[mask(hash, bits)] {
            Child::Null => None,
            Child::Leaf(leaf_hash, candidate) => {
                (*leaf_hash == hash && candidate.key() == key).then_some(candidate)
            }
            Child::Collision(collision) => {
                if collision.hash != hash {
                    None
                } else {
                    collision.data.iter().find(|x| x.key() == key)
                }
            }
            Child::Inner(inner) => inner.get(key, hash, bits + BITS),
        }
    }

    /// Insert `elt`, replacing an item with an equal key. Returns the
    /// replaced item together with its summary.
    pub(crate) fn insert(
        &mut self,
        elt: T,
        hash: u64,
        summary: u64,
        bits: u32,
    ) -> Option<(T, u64)> {
        let slot = &mut self.children[mask(hash, bits)];
        let res = match slot {
            Child::Null => {
                *slot = Child::Leaf(hash, elt);
                None
            }
            Child::Leaf(leaf_hash, candidate) => {
                if *leaf_hash == hash && candidate.key() == elt.key() {
                    let prev_summary = candidate.summary(hash);
                    Some((mem::replace(candidate, elt), prev_summary))
                } else {
                    let (leaf_hash, prev) = take_leaf(slot);
                    let prev_summary = prev.summary(leaf_hash);
                    *slot = if leaf_hash == hash {
                        log::debug!("structural hash collision on {hash:#018x}");
                        Child::Collision(Arc::new(CollisionNode {
                            hash,
                            digest: prev_summary ^ summary,
                            data: vec![prev, elt],
                        }))
                    } else {
                        // The hashes part somewhere below this level.
                        let next_bits = bits + BITS;
                        let mut chunk = Chunk::default();
                        chunk.insert(prev, leaf_hash, prev_summary, next_bits);
                        chunk.insert(elt, hash, summary, next_bits);
                        Child::Inner(Arc::new(chunk))
                    };
                    None
                }
            }
            Child::Collision(collision) if collision.hash == hash => {
                let collision = Arc::make_mut(collision);
                match collision.data.iter().position(|x| x.key() == elt.key()) {
                    Some(index) => {
                        let prev_summary = collision.data[index].summary(hash);
                        collision.digest ^= prev_summary ^ summary;
                        Some((mem::replace(&mut collision.data[index], elt), prev_summary))
                    }
                    None => {
                        collision.data.push(elt);
                        collision.digest ^= summary;
                        log::debug!(
                            "structural hash collision on {hash:#018x}, {} items share it",
                            collision.data.len()
                        );
                        None
                    }
                }
            }
            Child::Collision(_) => {
                // Push the collision node one level down, then retry there.
                let collision = match mem::take(slot) {
                    Child::Collision(collision) => collision,
                    _ => unreachable!(),
                };
                log::debug!(
                    "splitting collision bucket {:#018x} ({} items) below {hash:#018x}",
                    collision.hash,
                    collision.data.len()
                );
                let next_bits = bits + BITS;
                let mut chunk = Chunk::default();
                chunk.add_collision(collision, next_bits);
                chunk.insert(elt, hash, summary, next_bits);
                *slot = Child::Inner(Arc::new(chunk));
                None
            }
            Child::Inner(inner) => Arc::make_mut(inner).insert(elt, hash, summary, bits + BITS),
        };
        match &res {
            Some((_, prev_summary)) => self.digest ^= prev_summary ^ summary,
            None => {
                self.digest ^= summary;
                self.len += 1;
            }
        }
        res
    }

    /// Remove the item whose key equals `key`. Returns it together with its
    /// summary.
    pub(crate) fn remove(&mut self, key: &T::Key, hash: u64, bits: u32) -> Option<(T, u64)> {
        let slot = &mut self.children[mask(hash, bits)];
        let res = match slot {
            Child::Null => None,
            Child::Leaf(leaf_hash, candidate) => {
                if *leaf_hash == hash && candidate.key() == key {
                    let summary = candidate.summary(hash);
                    let (_, leaf) = take_leaf(slot);
                    Some((leaf, summary))
                } else {
                    None
                }
            }
            Child::Collision(collision) => {
                if collision.hash != hash {
                    return None;
                }
                let index = collision.data.iter().position(|x| x.key() == key)?;
                let collision = Arc::make_mut(collision);
                let removed = collision.data.swap_remove(index);
                let summary = removed.summary(hash);
                collision.digest ^= summary;
                if collision.data.len() == 1 {
                    // A single survivor goes back to being a plain leaf.
                    if let Some(last) = collision.data.pop() {
                        *slot = Child::Leaf(hash, last);
                    }
                }
                Some((removed, summary))
            }
            Child::Inner(inner) => {
                let res = Arc::make_mut(inner).remove(key, hash, bits + BITS);
                if res.is_some() {
                    if let Some(promoted) = Arc::make_mut(inner).take_sole_terminal() {
                        *slot = promoted;
                    }
                }
                res
            }
        };
        if let Some((_, summary)) = &res {
            self.digest ^= summary;
            self.len -= 1;
        }
        res
    }

    fn add_collision(&mut self, collision: Arc<CollisionNode<T>>, bits: u32) {
        let i = mask(collision.hash, bits);
        debug_assert!(matches!(self.children[i], Child::Null));
        self.len += collision.data.len();
        self.digest ^= collision.digest;
        self.children[i] = Child::Collision(collision);
    }

    /// If this node holds a single leaf or collision node, move it out so the
    /// parent can hold it directly. Interior paths are never collapsed.
    fn take_sole_terminal(&mut self) -> Option<Child<T>> {
        let mut occupied = self
            .children
            .iter()
            .enumerate()
            .filter(|(_, child)| !matches!(child, Child::Null));
        let (i, child) = occupied.next()?;
        if occupied.next().is_some() || matches!(child, Child::Inner(_)) {
            return None;
        }
        Some(mem::take(&mut self.children[i]))
    }
}

#[inline(always)]
fn mask(hash: u64, bits: u32) -> usize {
    debug_assert!(bits < u64::BITS, "trie deeper than the hash: bits = {bits}");
    (hash >> bits) as usize % ARITY
}

fn take_leaf<T>(slot: &mut Child<T>) -> (u64, T) {
    match mem::take(slot) {
        Child::Leaf(hash, leaf) => (hash, leaf),
        _ => unreachable!(),
    }
}

pub(crate) struct Iter<'a, T> {
    stack: Vec<slice::Iter<'a, Child<T>>>,
    bucket: Option<slice::Iter<'a, T>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            if let Some(item) = self.bucket.as_mut().and_then(|bucket| bucket.next()) {
                self.remaining -= 1;
                return Some(item);
            }
            match self.stack.last_mut()?.next() {
                None => {
                    self.stack.pop();
                }
                Some(Child::Null) => {}
                Some(Child::Leaf(_, item)) => {
                    self.remaining -= 1;
                    return Some(item);
                }
                Some(Child::Collision(collision)) => self.bucket = Some(collision.data.iter()),
                Some(Child::Inner(inner)) => self.stack.push(inner.children.iter()),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            stack: self.stack.clone(),
            bucket: self.bucket.clone(),
            remaining: self.remaining,
        }
    }
}

// -- trait implementations --

impl<T> Default for Chunk<T> {
    fn default() -> Chunk<T> {
        Chunk {
            digest: 0,
            len: 0,
            children: std::array::from_fn(|_| Child::Null),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Chunk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chunk{{")?;
        write!(f, "len: {:?}, ", self.len)?;
        write!(f, "digest: {:#018x}, ", self.digest)?;
        write!(f, "children: [")?;
        let mut first = true;
        for (i, child) in self.children.iter().enumerate() {
            if matches!(child, Child::Null) {
                continue;
            }
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            match child {
                Child::Null => {}
                Child::Leaf(hash, leaf) => write!(f, "{i}: <{hash:#018x}, {leaf:?}>")?,
                Child::Collision(collision) => {
                    write!(f, "{i}: <{:#018x}, {:?}>", collision.hash, &collision.data)?
                }
                Child::Inner(inner) => write!(f, "{i}: {inner:?}")?,
            }
        }
        write!(f, "]}}")
    }
}
