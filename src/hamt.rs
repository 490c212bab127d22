use crate::{array, bitmap::Bitmap, bucket::Bucket, key_value::KeyValue, utilities::hash_key};
use log::trace;
use std::{borrow::Borrow, hash::Hash, sync::Arc};

const MAX_LEVEL: usize = 64 / 5 - 1; // inclusive
const MAX_LAYER: usize = 1; // inclusive

#[derive(Clone, Debug, Eq, PartialEq)]
enum Node<K, V> {
    Hamt(Hamt<K, V>),
    Bucket(Bucket<K, V>),
}

/// Trie node whose slots either hold an entry or point to a child.
///
/// A slot is set in at most one of `child_map` and `entry_map`, and
/// `children` and `entries` are dense in slot order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Hamt<K, V> {
    child_map: Bitmap,
    entry_map: Bitmap,
    children: Vec<Arc<Node<K, V>>>,
    entries: Vec<KeyValue<K, V>>,
}

impl<K, V> Default for Hamt<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Hamt<K, V> {
    pub fn new() -> Self {
        Self {
            child_map: Bitmap::new(),
            entry_map: Bitmap::new(),
            children: vec![],
            entries: vec![],
        }
    }

    fn entry_index(hash: u64, level: usize) -> u8 {
        ((hash >> (level * 5)) & 0b11111) as u8
    }

    // Children of nodes at the last level are buckets.
    fn is_last_level(level: usize, layer: usize) -> bool {
        level == MAX_LEVEL && layer == MAX_LAYER
    }

    fn increment_level(
        key: &(impl Hash + ?Sized),
        hash: u64,
        level: usize,
        layer: usize,
    ) -> (u64, usize, usize) {
        if level < MAX_LEVEL {
            (hash, level + 1, layer)
        } else {
            let layer = layer + 1;

            (hash_key(key, layer), 0, layer)
        }
    }
}

impl<K: Hash + Eq, V> Hamt<K, V> {
    #[must_use]
    pub fn get<Q: Hash + Eq + ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        self.get_with_hash(key, hash_key(key, 0), 0, 0)
    }

    #[cfg(test)]
    pub fn get_at_level<Q: Hash + Eq + ?Sized>(
        &self,
        key: &Q,
        level: usize,
        layer: usize,
    ) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        self.get_with_hash(key, hash_key(key, layer), level, layer)
    }

    fn get_with_hash<Q: Hash + Eq + ?Sized>(
        &self,
        key: &Q,
        hash: u64,
        level: usize,
        layer: usize,
    ) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        let bit = Self::entry_index(hash, level);

        if self.child_map.get(bit) {
            match self.children[self.child_map.index(bit)].as_ref() {
                Node::Hamt(hamt) => {
                    let (hash, level, layer) = Self::increment_level(key, hash, level, layer);

                    hamt.get_with_hash(key, hash, level, layer)
                }
                Node::Bucket(bucket) => bucket.get(key),
            }
        } else if self.entry_map.get(bit) {
            let key_value = &self.entries[self.entry_map.index(bit)];

            if key_value.has_key(key) {
                Some(key_value.value())
            } else {
                None
            }
        } else {
            None
        }
    }
}

impl<K: Clone, V: Clone> Hamt<K, V> {
    fn set_child(&self, index: usize, child: Node<K, V>) -> Self {
        Self {
            child_map: self.child_map,
            entry_map: self.entry_map,
            children: array::replace(&self.children, index, child.into()),
            entries: self.entries.clone(),
        }
    }

    fn set_entry(&self, index: usize, entry: KeyValue<K, V>) -> Self {
        Self {
            child_map: self.child_map,
            entry_map: self.entry_map,
            children: self.children.clone(),
            entries: array::replace(&self.entries, index, entry),
        }
    }

    fn add_entry(&self, bit: u8, entry: KeyValue<K, V>) -> Self {
        Self {
            child_map: self.child_map,
            entry_map: self.entry_map.set(bit),
            children: self.children.clone(),
            entries: array::insert(&self.entries, self.entry_map.index(bit), entry),
        }
    }

    // Replaces the entry at a slot with a child.
    fn promote_entry(&self, bit: u8, child: Node<K, V>) -> Self {
        Self {
            child_map: self.child_map.set(bit),
            entry_map: self.entry_map.unset(bit),
            children: array::insert(&self.children, self.child_map.index(bit), child.into()),
            entries: array::remove(&self.entries, self.entry_map.index(bit)),
        }
    }
}

impl<K: Clone + Hash + Eq, V: Clone> Hamt<K, V> {
    /// Inserts a key-value pair and returns a new trie, and true if the key
    /// was not in it before.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> (Self, bool) {
        let hash = hash_key(&key, 0);

        self.insert_with_hash(key, hash, value, 0, 0)
    }

    #[cfg(test)]
    pub fn insert_at_level(&self, key: K, value: V, level: usize, layer: usize) -> (Self, bool) {
        let hash = hash_key(&key, layer);

        self.insert_with_hash(key, hash, value, level, layer)
    }

    fn insert_with_hash(
        &self,
        key: K,
        hash: u64,
        value: V,
        level: usize,
        layer: usize,
    ) -> (Self, bool) {
        let bit = Self::entry_index(hash, level);

        if self.child_map.get(bit) {
            let index = self.child_map.index(bit);
            let (child, ok) = match self.children[index].as_ref() {
                Node::Hamt(hamt) => {
                    let (hash, level, layer) = Self::increment_level(&key, hash, level, layer);
                    let (hamt, ok) = hamt.insert_with_hash(key, hash, value, level, layer);

                    (Node::Hamt(hamt), ok)
                }
                Node::Bucket(bucket) => {
                    let (bucket, ok) = bucket.insert(key, value);

                    (Node::Bucket(bucket), ok)
                }
            };

            (self.set_child(index, child), ok)
        } else if self.entry_map.get(bit) {
            let index = self.entry_map.index(bit);
            let key_value = &self.entries[index];

            if &key == key_value.key() {
                (self.set_entry(index, KeyValue::new(key, value)), false)
            } else {
                let child = Self::promote(key_value.clone(), key, hash, value, level, layer);

                (self.promote_entry(bit, child), true)
            }
        } else {
            (self.add_entry(bit, KeyValue::new(key, value)), true)
        }
    }

    /// Inserts a key-value pair in place, cloning only children shared with
    /// other tries.
    pub fn insert_mut(&mut self, key: K, value: V) -> bool {
        let hash = hash_key(&key, 0);

        self.insert_mut_with_hash(key, hash, value, 0, 0)
    }

    fn insert_mut_with_hash(
        &mut self,
        key: K,
        hash: u64,
        value: V,
        level: usize,
        layer: usize,
    ) -> bool {
        let bit = Self::entry_index(hash, level);

        if self.child_map.get(bit) {
            let index = self.child_map.index(bit);

            match Arc::make_mut(&mut self.children[index]) {
                Node::Hamt(hamt) => {
                    let (hash, level, layer) = Self::increment_level(&key, hash, level, layer);

                    hamt.insert_mut_with_hash(key, hash, value, level, layer)
                }
                Node::Bucket(bucket) => bucket.insert_mut(key, value),
            }
        } else if self.entry_map.get(bit) {
            let index = self.entry_map.index(bit);

            if &key == self.entries[index].key() {
                self.entries[index].set_value(value);

                false
            } else {
                let key_value = self.entries.remove(index);
                let child = Self::promote(key_value, key, hash, value, level, layer);

                self.children
                    .insert(self.child_map.index(bit), child.into());
                self.child_map = self.child_map.set(bit);
                self.entry_map = self.entry_map.unset(bit);

                true
            }
        } else {
            self.entries
                .insert(self.entry_map.index(bit), KeyValue::new(key, value));
            self.entry_map = self.entry_map.set(bit);

            true
        }
    }

    // Builds a child one level deeper holding an existing entry and a new one
    // with a distinct key in the same slot.
    fn promote(
        entry: KeyValue<K, V>,
        key: K,
        hash: u64,
        value: V,
        level: usize,
        layer: usize,
    ) -> Node<K, V> {
        let (old_key, old_value) = entry.into_pair();

        if Self::is_last_level(level, layer) {
            trace!("hash collision beyond level {level} of layer {layer}; creating a bucket");

            let mut bucket = Bucket::new(old_key, old_value);

            bucket.insert_mut(key, value);

            Node::Bucket(bucket)
        } else {
            let (hash, level, layer) = Self::increment_level(&key, hash, level, layer);
            let old_hash = hash_key(&old_key, layer);
            let mut hamt = Self::new();

            hamt.insert_mut_with_hash(old_key, old_hash, old_value, level, layer);
            hamt.insert_mut_with_hash(key, hash, value, level, layer);

            Node::Hamt(hamt)
        }
    }

    #[cfg(test)]
    fn entry_count(&self) -> usize {
        self.entries.len()
            + self
                .children
                .iter()
                .map(|child| match child.as_ref() {
                    Node::Hamt(hamt) => hamt.entry_count(),
                    Node::Bucket(bucket) => bucket.len(),
                })
                .sum::<usize>()
    }

    #[cfg(test)]
    fn is_normal(&self, level: usize, layer: usize) -> bool {
        let (_, next_level, next_layer) = Self::increment_level(&0, 0, level, layer);

        self.child_map.size() == self.children.len()
            && self.entry_map.size() == self.entries.len()
            && (0..32).all(|bit| !(self.child_map.get(bit) && self.entry_map.get(bit)))
            && self.children.iter().all(|child| match child.as_ref() {
                Node::Hamt(hamt) => {
                    !Self::is_last_level(level, layer)
                        && hamt.entry_count() >= 2
                        && hamt.is_normal(next_level, next_layer)
                }
                Node::Bucket(bucket) => Self::is_last_level(level, layer) && bucket.len() >= 2,
            })
    }
}
