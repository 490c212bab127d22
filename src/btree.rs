use std::{borrow::Borrow, mem::replace, sync::Arc};

/// Node of a B-tree whose leaves carry one value each.
///
/// The value of a separator key `keys[i]` of a branch is the minimum value
/// of its child `i + 1`. Branches are shared between trees and cloned by
/// `Arc::make_mut` before being rewritten.
#[derive(Clone, Debug)]
pub enum Node<K, V> {
    Leaf(V),
    Branch(Arc<Branch<K, V>>),
}

#[derive(Clone, Debug)]
pub struct Branch<K, V> {
    keys: Vec<K>,
    children: Vec<Node<K, V>>,
}

/// Result of an insertion into a subtree.
pub enum Insertion<K, V> {
    Replaced,
    Inserted,
    /// The subtree overflowed and a separator key and a right sibling must
    /// be inserted into its parent.
    Split(K, Node<K, V>),
}

impl<K, V> Node<K, V> {
    /// Returns a branch of two subtrees of the same height.
    pub fn grow(left: Self, key: K, right: Self) -> Self {
        Self::Branch(
            Branch {
                keys: vec![key],
                children: vec![left, right],
            }
            .into(),
        )
    }

    pub fn min(&self) -> &V {
        match self {
            Self::Leaf(value) => value,
            Self::Branch(branch) => branch.children[0].min(),
        }
    }
}

impl<K: Ord, V> Node<K, V> {
    pub fn get<Q: Ord + ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        match self {
            Self::Leaf(_) => None,
            Self::Branch(branch) => match branch.search(key) {
                Ok(index) => Some(branch.children[index + 1].min()),
                Err(index) => branch.children[index].get(key),
            },
        }
    }
}

impl<K: Ord + Clone, V: Clone> Node<K, V> {
    /// Replaces the minimum value of a subtree and returns the old one.
    pub fn replace_min(&mut self, value: V) -> V {
        match self {
            Self::Leaf(old) => replace(old, value),
            Self::Branch(branch) => Arc::make_mut(branch).children[0].replace_min(value),
        }
    }

    /// Inserts a key greater than the minimum key of a subtree.
    pub fn insert<const T: usize>(&mut self, key: K, value: V) -> Insertion<K, V> {
        match self {
            Self::Leaf(_) => Insertion::Split(key, Self::Leaf(value)),
            Self::Branch(branch) => {
                let branch = Arc::make_mut(branch);

                match branch.search(&key) {
                    Ok(index) => {
                        branch.children[index + 1].replace_min(value);

                        Insertion::Replaced
                    }
                    Err(index) => match branch.children[index].insert::<T>(key, value) {
                        Insertion::Split(key, node) => {
                            branch.keys.insert(index, key);
                            branch.children.insert(index + 1, node);

                            if branch.keys.len() > 2 * T {
                                let (key, right) = branch.split::<T>();

                                Insertion::Split(key, Self::Branch(right.into()))
                            } else {
                                Insertion::Inserted
                            }
                        }
                        insertion => insertion,
                    },
                }
            }
        }
    }

    /// Checks invariants of a subtree whose keys lie strictly between bounds
    /// and returns its height and number of separator keys.
    #[cfg(test)]
    pub fn validate<const T: usize>(
        &self,
        is_root: bool,
        lower: Option<&K>,
        upper: Option<&K>,
    ) -> (usize, usize) {
        match self {
            Self::Leaf(_) => (0, 0),
            Self::Branch(branch) => {
                let keys = &branch.keys;

                assert_eq!(branch.children.len(), keys.len() + 1);
                assert!(keys.len() <= 2 * T);
                assert!(is_root || keys.len() >= T);
                assert!(keys.windows(2).all(|keys| keys[0] < keys[1]));
                assert!(lower.map_or(true, |lower| lower < &keys[0]));
                assert!(upper.map_or(true, |upper| keys[keys.len() - 1] < *upper));

                let mut height = None;
                let mut count = keys.len();

                for (index, child) in branch.children.iter().enumerate() {
                    let (child_height, child_count) = child.validate::<T>(
                        false,
                        if index == 0 {
                            lower
                        } else {
                            Some(&keys[index - 1])
                        },
                        keys.get(index).or(upper),
                    );

                    assert_eq!(*height.get_or_insert(child_height), child_height);
                    count += child_count;
                }

                (height.unwrap_or_default() + 1, count)
            }
        }
    }
}

impl<K, V> Branch<K, V> {
    // Returns the index of an equal key or of the first greater one.
    fn search<Q: Ord + ?Sized>(&self, key: &Q) -> Result<usize, usize>
    where
        K: Borrow<Q>,
    {
        self.keys.binary_search_by(|other| other.borrow().cmp(key))
    }

    // Splits a branch of `2T + 1` keys into two of `T` keys and the median.
    fn split<const T: usize>(&mut self) -> (K, Self) {
        let mut keys = self.keys.split_off(T);
        let key = keys.remove(0);
        let children = self.children.split_off(T + 1);

        (key, Self { keys, children })
    }
}
