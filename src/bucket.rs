use crate::{array, key_value::KeyValue};
use std::borrow::Borrow;

/// Leaf of keys whose hashes collide at every trie level.
#[derive(Clone, Debug)]
pub struct Bucket<K, V>(Vec<KeyValue<K, V>>);

impl<K, V> Bucket<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self(vec![KeyValue::new(key, value)])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn find_index<Q: PartialEq + ?Sized>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
    {
        self.0
            .iter()
            .position(|key_value| key_value.has_key(key))
    }

    pub fn get<Q: PartialEq + ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        self.find_index(key).map(|index| self.0[index].value())
    }
}

impl<K: Clone + Eq, V: Clone> Bucket<K, V> {
    pub fn insert(&self, key: K, value: V) -> (Self, bool) {
        match self.find_index(&key) {
            Some(index) => (
                Self(array::replace(&self.0, index, KeyValue::new(key, value))),
                false,
            ),
            None => (
                Self(array::insert(&self.0, self.0.len(), KeyValue::new(key, value))),
                true,
            ),
        }
    }

    pub fn insert_mut(&mut self, key: K, value: V) -> bool {
        match self.find_index(&key) {
            Some(index) => {
                self.0[index].set_value(value);
                false
            }
            None => {
                self.0.push(KeyValue::new(key, value));
                true
            }
        }
    }
}

// Entries keep their insertion order, so equality ignores it.
impl<K: PartialEq, V: PartialEq> PartialEq for Bucket<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .0
                .iter()
                .all(|key_value| other.get(key_value.key()) == Some(key_value.value()))
    }
}

impl<K: Eq, V: Eq> Eq for Bucket<K, V> {}
