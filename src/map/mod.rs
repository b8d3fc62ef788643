//! Persistent hash maps keyed by structural hash.
use std::{any::type_name, fmt, iter::FromIterator, sync::Arc};

use crate::{
    error::Error,
    hash::{self, map_seed, pair_hash, StructuralHash},
    node::{self, Chunk, HashItem},
    set::Set,
};


/// A key mapped to a value: the storage unit of a [`HashMap`], and the member
/// type of [`HashMap::entries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    key: K,
    value: V,
}

crate::hash_record!(impl<K, V> Entry<K, V> { key, value });

impl<K, V> Entry<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Entry { key, value }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// Shorthand for [`Entry::new`], for building maps from literals:
///
/// ```
/// use extlib::{pair, HashMap};
///
/// let ages = HashMap::new([pair("ada", 36), pair("alan", 41)]);
/// assert_eq!(ages.get(&"alan"), Some(&41));
/// ```
pub fn pair<K, V>(key: K, value: V) -> Entry<K, V> {
    Entry::new(key, value)
}

impl<K, V> HashItem for Entry<K, V>
where
    K: StructuralHash + Eq + Clone,
    V: StructuralHash + Clone,
{
    type Key = K;
    fn key(&self) -> &K {
        &self.key
    }
    fn summary(&self, hash: u64) -> u64 {
        pair_hash(hash, hash::calc(&self.value))
    }
}

/// A persistent map data-structure.
///
/// [`put`](HashMap::put) and [`remove`](HashMap::remove) return a new map and
/// leave the receiver unchanged. Keys are located by their structural hash
/// and compared with `Eq`; values must have a structural hash too, as
/// it feeds the hash of the map as a whole.
pub struct HashMap<K, V> {
    node: Arc<Chunk<Entry<K, V>>>,
}

impl<K, V> HashMap<K, V> {
    /// The number of entries currently in the map.
    pub fn size(&self) -> usize {
        self.node.len()
    }

    /// Whether or not the map is empty.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Iterate over the entries. The order is unspecified.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter(self.node.iter())
    }
}

impl<K, V> HashMap<K, V>
where
    K: StructuralHash + Eq + Clone,
    V: StructuralHash + Clone,
{
    /// Create a map from a sequence of entries. Later entries replace earlier
    /// ones with an equal key.
    pub fn new(entries: impl IntoIterator<Item = Entry<K, V>>) -> Self {
        entries.into_iter().collect()
    }

    pub fn empty() -> Self {
        HashMap::default()
    }

    /// A map with `key` mapped to `value`, replacing any previous mapping for
    /// an equal key.
    pub fn put(&self, key: K, value: V) -> Self {
        let mut res = self.clone();
        res.insert(Entry::new(key, value));
        res
    }

    /// A map without the mapping for `key`. Removing an absent key yields an
    /// equal map.
    pub fn remove(&self, key: &K) -> Self {
        let mut res = self.clone();
        if self.has_key(key) {
            let hash = hash::calc(key);
            Arc::make_mut(&mut res.node).remove(key, hash, 0);
        }
        res
    }

    /// Whether or not a mapping for `key` is in the map.
    pub fn has_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Look up the value mapped to `key`, if it is present.
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = hash::calc(key);
        Some(self.node.get(key, hash, 0)?.value())
    }

    /// Look up the value for `key`.
    ///
    /// # Panics
    /// Panics with [`Error::KeyNotFound`] if the key is absent. Use
    /// [`get`](HashMap::get) or [`try_get`](HashMap::try_get) to branch on
    /// presence instead.
    pub fn must_get(&self, key: &K) -> &V
    where
        K: fmt::Debug,
    {
        match self.try_get(key) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Look up the value for `key`, reporting absence as
    /// [`Error::KeyNotFound`].
    pub fn try_get(&self, key: &K) -> Result<&V, Error>
    where
        K: fmt::Debug,
    {
        self.get(key).ok_or_else(|| Error::key_not_found(key))
    }

    /// A snapshot of the keys.
    pub fn keys(&self) -> Set<K> {
        self.iter().map(|(key, _)| key.clone()).collect()
    }

    /// A snapshot of the distinct values. Values shared by several keys
    /// appear once.
    pub fn values(&self) -> Set<V>
    where
        V: Eq,
    {
        self.iter().map(|(_, value)| value.clone()).collect()
    }

    /// A snapshot of the entries.
    pub fn entries(&self) -> Set<Entry<K, V>>
    where
        V: Eq,
    {
        self.node.iter().cloned().collect()
    }

    /// Whether both maps hold the same keys, each mapped to equal values.
    pub fn equals(&self, other: &HashMap<K, V>) -> bool
    where
        V: PartialEq,
    {
        if Arc::ptr_eq(&self.node, &other.node) {
            return true;
        }
        self.size() == other.size()
            && self.node.digest() == other.node.digest()
            && other.iter().all(|(key, value)| self.get(key) == Some(value))
    }

    fn insert(&mut self, entry: Entry<K, V>) -> Option<V> {
        let hash = hash::calc(&entry.key);
        let summary = entry.summary(hash);
        Arc::make_mut(&mut self.node)
            .insert(entry, hash, summary, 0)
            .map(|(prev, _)| prev.value)
    }
}

/// Iterator over the entries of a [`HashMap`], as `(key, value)` pairs.
pub struct Iter<'a, K, V>(node::Iter<'a, Entry<K, V>>);

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.0.next().map(|entry| (&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a HashMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V> FromIterator<Entry<K, V>> for HashMap<K, V>
where
    K: StructuralHash + Eq + Clone,
    V: StructuralHash + Clone,
{
    fn from_iter<I: IntoIterator<Item = Entry<K, V>>>(iter: I) -> Self {
        let mut map = HashMap::default();
        for entry in iter {
            map.insert(entry);
        }
        map
    }
}

impl<K, V> FromIterator<(K, V)> for HashMap<K, V>
where
    K: StructuralHash + Eq + Clone,
    V: StructuralHash + Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter().map(|(key, value)| Entry::new(key, value)).collect()
    }
}

impl<K, V> Default for HashMap<K, V> {
    fn default() -> Self {
        HashMap {
            node: Default::default(),
        }
    }
}

impl<K, V> Clone for HashMap<K, V> {
    fn clone(&self) -> Self {
        HashMap {
            node: self.node.clone(),
        }
    }
}

impl<K, V> PartialEq for HashMap<K, V>
where
    K: StructuralHash + Eq + Clone,
    V: StructuralHash + PartialEq + Clone,
{
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl<K, V> Eq for HashMap<K, V>
where
    K: StructuralHash + Eq + Clone,
    V: StructuralHash + Eq + Clone,
{
}

/// Hashed like any other map: the node digests already hold the XOR of the
/// pair hashes.
impl<K, V> StructuralHash for HashMap<K, V> {
    fn structural_hash(&self) -> u64 {
        map_seed::<K, V>() ^ self.node.digest()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for HashMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Renders `HashMap(<key type>, <value type>){k: v, ..}` with the entries
/// sorted by their rendered text.
impl<K: fmt::Debug, V: fmt::Debug> fmt::Display for HashMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<String> = self
            .iter()
            .map(|(key, value)| format!("{key:?}: {value:?}"))
            .collect();
        entries.sort();
        write!(
            f,
            "HashMap({}, {}){{{}}}",
            type_name::<K>(),
            type_name::<V>(),
            entries.join(", ")
        )
    }
}
