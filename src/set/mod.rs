//! Persistent sets with members identified by their structural hash.
use std::{any::type_name, fmt, iter::FromIterator, sync::Arc};

use crate::{
    hash::{self, set_seed, StructuralHash},
    node::{self, Chunk, HashItem},
};


/// A finite collection that contains no duplicate members, modelled on the
/// mathematical concept of a set.
///
/// Every operation that would change the set returns a new one instead; the
/// receiver is left as it was. Versions share their unchanged parts, so
/// deriving a set costs time proportional to the change, not to the size.
///
/// Members are located by [`hash::calc`] and told apart with `Eq`, so two
/// unequal members that happen to share a hash are both kept. A member type
/// must be `Eq`: every member has to equal itself to be found again. Floats
/// are stored through `ordered_float::OrderedFloat` or `NotNan`:
///
/// ```compile_fail
/// let _ = extlib::Set::new([f64::NAN]);
/// ```
pub struct Set<T> {
    node: Arc<Chunk<Member<T>>>,
}

impl<T> Set<T> {
    /// The number of members, `|A|`.
    pub fn cardinality(&self) -> usize {
        self.node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cardinality() == 0
    }

    /// Iterate over the members. The order is unspecified.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter(self.node.iter())
    }
}

impl<T: StructuralHash + Eq + Clone> Set<T> {
    /// Create a set containing the given members. Of two equal members, the
    /// later one is kept.
    pub fn new(members: impl IntoIterator<Item = T>) -> Self {
        members.into_iter().collect()
    }

    pub fn empty() -> Self {
        Set::default()
    }

    /// A set with all members of this one plus `member`. An equal member
    /// already present is replaced.
    pub fn add(&self, member: T) -> Self {
        let mut res = self.clone();
        res.insert(member);
        res
    }

    /// A set with all members of this one except `member`. Removing an absent
    /// member yields an equal set.
    pub fn remove(&self, member: &T) -> Self {
        let mut res = self.clone();
        if self.contains(member) {
            res.delete(member);
        }
        res
    }

    /// `a ∈ A`
    pub fn contains(&self, member: &T) -> bool {
        self.node.get(member, hash::calc(member), 0).is_some()
    }

    /// Whether both sets hold the same members.
    pub fn equals(&self, other: &Set<T>) -> bool {
        if Arc::ptr_eq(&self.node, &other.node) {
            return true;
        }
        self.cardinality() == other.cardinality()
            && self.node.digest() == other.node.digest()
            && other.iter().all(|member| self.contains(member))
    }

    /// `A ⊇ B`
    pub fn superset_of(&self, other: &Set<T>) -> bool {
        other.cardinality() <= self.cardinality() && other.iter().all(|member| self.contains(member))
    }

    /// `A ⊆ B`
    pub fn subset_of(&self, other: &Set<T>) -> bool {
        other.superset_of(self)
    }

    /// All values that are a member of A, or B, or both.
    ///
    /// ```text
    /// A┌─────────────┐
    ///  │#############│
    ///  │####┌────────┼────┐
    ///  │####│########│####│  A ∪ B
    ///  └────┼────────┘####│
    ///       │#############│
    ///       └─────────────┘B
    /// ```
    ///
    /// Where both sets hold equal members, the one from `self` is kept.
    pub fn union(&self, other: &Set<T>) -> Self {
        if Arc::ptr_eq(&self.node, &other.node) {
            return self.clone();
        }
        if self.cardinality() >= other.cardinality() {
            log::trace!("union: adding {} members to a copy of self", other.cardinality());
            let mut res = self.clone();
            for member in other.iter() {
                if !self.contains(member) {
                    res.insert(member.clone());
                }
            }
            res
        } else {
            log::trace!("union: adding {} members to a copy of other", self.cardinality());
            let mut res = other.clone();
            for member in self.iter() {
                res.insert(member.clone());
            }
            res
        }
    }

    /// All values that are members of both A and B.
    ///
    /// ```text
    /// A┌─────────────┐
    ///  │             │
    ///  │    ┌────────┼────┐
    ///  │    │########│    │  A ∩ B
    ///  └────┼────────┘    │
    ///       │             │
    ///       └─────────────┘B
    /// ```
    ///
    /// Members are taken from `other`.
    pub fn intersection(&self, other: &Set<T>) -> Self {
        other.filter(|member| self.contains(member))
    }

    /// All values of A that are not members of B.
    ///
    /// ```text
    /// A┌─────────────┐
    ///  │#############│
    ///  │####┌────────┼────┐
    ///  │####│        │    │  A \ B or
    ///  └────┼────────┘    │  A - B
    ///       │             │
    ///       └─────────────┘B
    /// ```
    pub fn difference(&self, other: &Set<T>) -> Self {
        self.filter(|member| !other.contains(member))
    }

    /// All values which are members of one of the sets, but not both.
    ///
    /// ```text
    /// A┌─────────────┐
    ///  │#############│
    ///  │####┌────────┼────┐
    ///  │####│        │####│  A ∆ B
    ///  └────┼────────┘####│
    ///       │#############│
    ///       └─────────────┘B
    /// ```
    pub fn symmetric_difference(&self, other: &Set<T>) -> Self {
        self.union(other).difference(&self.intersection(other))
    }

    /// A set of the members for which `predicate` returns true. The predicate
    /// is called once per member and should depend on the member alone.
    pub fn filter(&self, mut predicate: impl FnMut(&T) -> bool) -> Self {
        let rejected: Vec<&T> = self.iter().filter(|member| !predicate(member)).collect();
        let mut res = self.clone();
        for member in rejected {
            res.delete(member);
        }
        res
    }

    fn insert(&mut self, member: T) -> Option<T> {
        let hash = hash::calc(&member);
        Arc::make_mut(&mut self.node)
            .insert(Member(member), hash, hash, 0)
            .map(|(prev, _)| prev.0)
    }

    fn delete(&mut self, member: &T) -> Option<T> {
        let hash = hash::calc(member);
        Arc::make_mut(&mut self.node)
            .remove(member, hash, 0)
            .map(|(prev, _)| prev.0)
    }
}

#[derive(Clone)]
struct Member<T>(T);

impl<T: fmt::Debug> fmt::Debug for Member<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: StructuralHash + Eq + Clone> HashItem for Member<T> {
    type Key = T;
    fn key(&self) -> &T {
        &self.0
    }
    fn summary(&self, hash: u64) -> u64 {
        hash
    }
}

/// Iterator over the members of a [`Set`].
pub struct Iter<'a, T>(node::Iter<'a, Member<T>>);

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.0.next().map(|member| &member.0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter(self.0.clone())
    }
}

impl<'a, T> IntoIterator for &'a Set<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: StructuralHash + Eq + Clone> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Set::default();
        for member in iter {
            set.insert(member);
        }
        set
    }
}

impl<T> Default for Set<T> {
    fn default() -> Self {
        Set {
            node: Default::default(),
        }
    }
}

impl<T> Clone for Set<T> {
    fn clone(&self) -> Self {
        Set {
            node: self.node.clone(),
        }
    }
}

impl<T: StructuralHash + Eq + Clone> PartialEq for Set<T> {
    fn eq(&self, other: &Set<T>) -> bool {
        self.equals(other)
    }
}

impl<T: StructuralHash + Eq + Clone> Eq for Set<T> {}

/// Sets hash like any unordered collection: the XOR of the member hashes
/// into a seed naming the member type. Node digests already hold that XOR.
impl<T> StructuralHash for Set<T> {
    fn structural_hash(&self) -> u64 {
        set_seed::<T>() ^ self.node.digest()
    }
}

impl<T: fmt::Debug> fmt::Debug for Set<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Renders `Set(<type>){a, b, c}` with the members sorted by their rendered
/// text, so the output does not depend on the layout of the trie.
impl<T: fmt::Debug> fmt::Display for Set<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut members: Vec<String> = self.iter().map(|member| format!("{member:?}")).collect();
        members.sort();
        write!(f, "Set({}){{{}}}", type_name::<T>(), members.join(", "))
    }
}
