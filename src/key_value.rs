use std::borrow::Borrow;

/// Entry stored inline in a trie node or a bucket.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyValue<K, V> {
    key: K,
    value: V,
}

impl<K, V> KeyValue<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn has_key<Q: PartialEq + ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        self.key.borrow() == key
    }

    pub fn set_value(&mut self, value: V) {
        self.value = value;
    }

    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}
