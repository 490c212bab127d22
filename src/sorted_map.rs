use crate::btree::{Insertion, Node};
use log::debug;
use std::{borrow::Borrow, cmp::Ordering, mem::replace};

#[derive(Clone, Debug)]
struct Root<K, V> {
    min: K,
    node: Node<K, V>,
}

/// Sorted map data structure of B-tree.
///
/// `T` is the minimum degree of the tree: every branch but the root holds
/// between `T` and `2T` keys.
///
/// Note that [`insert`](Self::insert) does not modify the original map but
/// creates a new one.
#[derive(Clone, Debug)]
pub struct SortedMap<K, V, const T: usize = 8> {
    root: Option<Root<K, V>>,
    size: usize,
    height: usize,
}

impl<K: Ord, V, const T: usize> SortedMap<K, V, T> {
    const VALID_DEGREE: () = assert!(T > 0, "minimum degree must be positive");

    /// Creates a new map.
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_DEGREE;

        Self {
            root: None,
            size: 0,
            height: 0,
        }
    }

    /// Finds a value corresponding to a key.
    pub fn get<Q: Ord + ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        let root = self.root.as_ref()?;

        match key.cmp(root.min.borrow()) {
            Ordering::Less => None,
            Ordering::Equal => Some(root.node.min()),
            Ordering::Greater => root.node.get(key),
        }
    }

    /// Checks if a key is contained in a map.
    pub fn contains_key<Q: Ord + ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        self.get(key).is_some()
    }

    /// Returns a pair of the minimum key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.root.as_ref().map(|root| (&root.min, root.node.min()))
    }

    /// Returns a size of a map.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if a map is empty.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns a number of branch levels.
    pub fn height(&self) -> usize {
        self.height
    }
}

impl<K: Ord + Clone, V: Clone, const T: usize> SortedMap<K, V, T> {
    /// Inserts a key-value pair into a map, replacing a value of the same key
    /// if any.
    ///
    /// Only the nodes on the path to the key are copied and the rest are
    /// shared with the original map.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        // Every node of the clone is shared, so every node on the path is
        // copied before it is rewritten.
        let mut map = self.clone();

        map.insert_mut(key, value);

        map
    }

    /// Inserts a key-value pair rewriting nodes in place.
    ///
    /// This is a non-persistent variant of [`insert`](Self::insert) for a
    /// single writer with a linear history, such as bulk loading. Nodes this
    /// map owns exclusively are overwritten, so other handles must not rely
    /// on observing any particular version of nodes they shared with it.
    /// Rust's ownership still forces nodes shared with live clones to be
    /// copied first.
    #[doc(alias = "mutate_set")]
    pub fn insert_mut(&mut self, key: K, value: V) {
        let Some(mut root) = self.root.take() else {
            self.root = Some(Root {
                min: key,
                node: Node::Leaf(value),
            });
            self.size = 1;

            return;
        };

        // A new minimum displaces the old one into the tree.
        let (key, value) = match key.cmp(&root.min) {
            Ordering::Less => {
                let value = root.node.replace_min(value);

                (replace(&mut root.min, key), value)
            }
            Ordering::Equal => {
                root.node.replace_min(value);
                self.root = Some(root);

                return;
            }
            Ordering::Greater => (key, value),
        };

        match root.node.insert::<T>(key, value) {
            Insertion::Replaced => {}
            Insertion::Inserted => self.size += 1,
            Insertion::Split(key, node) => {
                root.node = Node::grow(root.node, key, node);
                self.size += 1;
                self.height += 1;

                debug!("sorted map grew to height {}", self.height);
            }
        }

        self.root = Some(root);
    }

    #[cfg(test)]
    fn validate(&self) {
        match &self.root {
            None => assert_eq!(self.size, 0),
            Some(root) => {
                let (height, count) = root.node.validate::<T>(true, Some(&root.min), None);

                assert_eq!(height, self.height);
                assert_eq!(count + 1, self.size);
            }
        }
    }
}

impl<K: Ord, V, const T: usize> Default for SortedMap<K, V, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, V: Clone, const T: usize> FromIterator<(K, V)> for SortedMap<K, V, T> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iterator: I) -> Self {
        let mut map = Self::new();

        for (key, value) in iterator {
            map.insert_mut(key, value);
        }

        map
    }
}

#[cfg(test)]
mod tests {
    use super::SortedMap;
    use rand::{random, rng, seq::SliceRandom};
    use std::{collections::BTreeMap, thread::spawn};

    const ITERATION_COUNT: usize = 1 << 12;

    fn assert_content<const T: usize>(map: &SortedMap<i16, i16, T>, model: &BTreeMap<i16, i16>) {
        map.validate();

        assert_eq!(map.len(), model.len());

        for key in i16::MIN..=i16::MAX {
            assert_eq!(map.get(&key), model.get(&key));
        }
    }

    #[test]
    fn new() {
        SortedMap::<usize, usize>::new();
    }

    #[test]
    fn insert() {
        let map = SortedMap::<_, _>::new();

        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert_eq!(map.insert(0, 0).len(), 1);
        assert_eq!(map.insert(0, 0).insert(0, 1).len(), 1);
        assert_eq!(map.insert(0, 0).insert(0, 1).get(&0), Some(&1));
        assert_eq!(map.insert(0, 0).insert(1, 0).len(), 2);
    }

    #[test]
    fn get() {
        let map = SortedMap::<_, _>::new().insert(1, 10).insert(3, 30);

        assert_eq!(map.get(&0), None);
        assert_eq!(map.get(&1), Some(&10));
        assert_eq!(map.get(&2), None);
        assert_eq!(map.get(&3), Some(&30));
        assert_eq!(map.get(&4), None);
    }

    #[test]
    fn get_borrowed() {
        let map = SortedMap::<String, usize>::new().insert("foo".to_string(), 42);

        assert_eq!(map.get("foo"), Some(&42));
        assert_eq!(map.get("bar"), None);
    }

    #[test]
    fn insert_new_minimum() {
        let map = SortedMap::<_, _, 2>::new().insert(5, 50).insert(7, 70);
        let other = map.insert(3, 30);

        assert_eq!(other.first_key_value(), Some((&3, &30)));
        assert_eq!(other.get(&5), Some(&50));
        assert_eq!(other.get(&7), Some(&70));
        assert_eq!(map.first_key_value(), Some((&5, &50)));
        assert_eq!(map.get(&3), None);

        other.validate();
    }

    #[test]
    fn insert_many_in_order() {
        let mut map = SortedMap::<_, _, 2>::new();

        for index in 0..ITERATION_COUNT {
            map = map.insert(index, index);
            assert_eq!(map.len(), index + 1);
        }

        map.validate();

        for index in 0..ITERATION_COUNT {
            assert_eq!(map.get(&index), Some(&index));
        }
    }

    #[test]
    fn insert_many_in_reverse_order() {
        let mut map = SortedMap::<_, _, 2>::new();

        for index in (0..ITERATION_COUNT).rev() {
            map = map.insert(index, index);
        }

        map.validate();

        for index in 0..ITERATION_COUNT {
            assert_eq!(map.get(&index), Some(&index));
        }

        assert_eq!(map.first_key_value(), Some((&0, &0)));
    }

    #[test]
    fn insert_many_at_random() {
        let mut map = SortedMap::<i16, i16, 2>::new();
        let mut model = BTreeMap::new();

        for _ in 0..ITERATION_COUNT {
            let key = random();
            let value = random();

            map = map.insert(key, value);
            model.insert(key, value);
        }

        assert_content(&map, &model);
    }

    #[test]
    fn insert_mut_many_at_random() {
        let mut map = SortedMap::<i16, i16>::new();
        let mut model = BTreeMap::new();

        for _ in 0..ITERATION_COUNT {
            let key = random();
            let value = random();

            map.insert_mut(key, value);
            model.insert(key, value);
        }

        assert_content(&map, &model);
    }

    #[test]
    fn insert_mut_equals_insert() {
        let mut one = SortedMap::<i16, i16, 3>::new();
        let mut other = SortedMap::<i16, i16, 3>::new();

        for _ in 0..ITERATION_COUNT {
            let key = random();
            let value = random();

            one = one.insert(key, value);
            other.insert_mut(key, value);
        }

        let model = (i16::MIN..=i16::MAX)
            .filter_map(|key| one.get(&key).map(|value| (key, *value)))
            .collect();

        assert_content(&other, &model);
        assert_eq!(one.height(), other.height());
    }

    #[test]
    fn keep_old_versions() {
        let mut maps = vec![SortedMap::<usize, usize, 2>::new()];

        for index in 0..256 {
            let map = maps[index].insert(index, index);
            maps.push(map);
        }

        for (size, map) in maps.iter().enumerate() {
            assert_eq!(map.len(), size);
            assert_eq!(map.get(&size), None);

            for key in 0..size {
                assert_eq!(map.get(&key), Some(&key));
            }
        }
    }

    #[test]
    fn insert_mut_keeps_clones() {
        let mut map = SortedMap::<usize, usize, 2>::new();

        for index in 0..256 {
            map.insert_mut(index, index);
        }

        let old = map.clone();

        for index in 0..256 {
            map.insert_mut(index, 0);
        }

        for index in 0..256 {
            assert_eq!(old.get(&index), Some(&index));
            assert_eq!(map.get(&index), Some(&0));
        }
    }

    #[test]
    fn grow_height() {
        let mut map = SortedMap::<usize, usize, 2>::new();

        assert_eq!(map.height(), 0);

        map.insert_mut(0, 0);
        assert_eq!(map.height(), 0);

        map.insert_mut(1, 1);
        assert_eq!(map.height(), 1);

        for index in 2..ITERATION_COUNT {
            map.insert_mut(index, index);
        }

        assert!(map.height() > 2);
        map.validate();
    }

    #[test]
    fn order_independence() {
        for _ in 0..8 {
            let mut keys: Vec<i16> = (0..ITERATION_COUNT).map(|_| random()).collect();
            keys.sort();
            keys.dedup();

            let mut maps = vec![];

            for _ in 0..2 {
                keys.shuffle(&mut rng());

                maps.push(
                    keys.iter()
                        .fold(SortedMap::<i16, i16, 2>::new(), |map, key| {
                            map.insert(*key, key.wrapping_neg())
                        }),
                );
            }

            let model = keys.iter().map(|key| (*key, key.wrapping_neg())).collect();

            assert_content(&maps[0], &model);
            assert_content(&maps[1], &model);
        }
    }

    #[test]
    fn send_and_sync() {
        let map: SortedMap<usize, usize> = SortedMap::new();
        spawn(move || map);

        let map: SortedMap<String, String> = SortedMap::new();
        spawn(move || map);
    }

    #[test]
    fn collect() {
        let map: SortedMap<usize, usize> = (0..100).rev().map(|key| (key, key)).collect();

        assert_eq!(map.len(), 100);
        assert_eq!(map.first_key_value(), Some((&0, &0)));

        for key in 0..100 {
            assert_eq!(map.get(&key), Some(&key));
        }

        map.validate();
    }
}
