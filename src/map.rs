use crate::hamt::Hamt;
use std::{borrow::Borrow, hash::Hash, sync::Arc};

/// Map data structure of HAMT.
///
/// Note that every method does not modify the original map but creates a new
/// one if necessary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Map<K, V> {
    size: usize,
    hamt: Arc<Hamt<K, V>>,
}

impl<K: Hash + Eq, V> Map<K, V> {
    /// Creates a new map.
    pub fn new() -> Self {
        Self {
            size: 0,
            hamt: Hamt::new().into(),
        }
    }

    /// Finds a value corresponding to a key.
    pub fn get<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        self.hamt.get(key)
    }

    /// Checks if a key is contained in a map.
    pub fn contains_key<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        self.get(key).is_some()
    }

    /// Returns a size of a map.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if a map is empty.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

impl<K: Clone + Hash + Eq, V: Clone> Map<K, V> {
    /// Inserts a key-value pair into a map, replacing a value of the same key
    /// if any.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let (hamt, ok) = self.hamt.insert(key, value);

        Self {
            size: self.size + (ok as usize),
            hamt: hamt.into(),
        }
    }

    /// Extends a map with an iterator of key-value pairs.
    #[must_use]
    pub fn extend(&self, iterator: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut map = self.clone();

        for (key, value) in iterator {
            map = map.insert(key, value);
        }

        map
    }
}

impl<K: Hash + Eq, V> Default for Map<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Hash + Eq, V: Clone> FromIterator<(K, V)> for Map<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iterator: I) -> Self {
        let mut size = 0;
        let mut hamt = Hamt::new();

        for (key, value) in iterator {
            size += hamt.insert_mut(key, value) as usize;
        }

        Self {
            size,
            hamt: hamt.into(),
        }
    }
}
