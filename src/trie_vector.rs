use crate::{
    error::Error,
    vector::{check_index, Node, Vector, BITS, MAX_HEIGHT},
    Result,
};
use log::debug;
use std::sync::Arc;

/// Persistent vector of a 32-way trie growing at its root.
///
/// A trie of height `h` holds up to `32^(h + 1)` elements, and the height
/// grows up to 6.
#[derive(Clone, Debug)]
pub struct TrieVector<T> {
    root: Option<Arc<Node<T>>>,
    length: usize,
    height: u8,
}

impl<T> TrieVector<T> {
    pub fn new() -> Self {
        Self {
            root: None,
            length: 0,
            height: 0,
        }
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    fn capacity(height: u8) -> u64 {
        1 << (BITS * (height as usize + 1))
    }

    fn out_of_range(&self, index: usize) -> Error {
        Error::IndexOutOfRange {
            index,
            length: self.length,
        }
    }
}

impl<T: Clone> Vector<T> for TrieVector<T> {
    fn len(&self) -> usize {
        self.length
    }

    fn lookup(&self, index: usize) -> Result<&T> {
        check_index(index, self.length)?;

        self.root
            .as_ref()
            .and_then(|root| root.get(self.height, index))
            .ok_or_else(|| self.out_of_range(index))
    }

    fn set(&self, index: usize, value: T) -> Result<Self> {
        check_index(index, self.length)?;

        let root = self.root.as_ref().ok_or_else(|| self.out_of_range(index))?;

        Ok(Self {
            root: Some(root.set(self.height, index, value).into()),
            length: self.length,
            height: self.height,
        })
    }

    fn add(&self, value: T) -> Result<Self> {
        let Some(root) = &self.root else {
            return Ok(Self {
                root: Some(Node::singleton(0, value).into()),
                length: 1,
                height: 0,
            });
        };

        let (root, height) = if self.length as u64 == Self::capacity(self.height) {
            if self.height == MAX_HEIGHT {
                return Err(Error::CapacityExceeded {
                    capacity: Self::capacity(MAX_HEIGHT),
                });
            }

            debug!("trie vector grew to height {}", self.height + 1);

            (
                Arc::new(Node::Branch(vec![root.clone()])),
                self.height + 1,
            )
        } else {
            (root.clone(), self.height)
        };

        Ok(Self {
            root: Some(root.push(height, self.length, value).into()),
            length: self.length + 1,
            height,
        })
    }
}

impl<T> Default for TrieVector<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// # Panics
///
/// Panics if the elements exceed the capacity of 32^7.
impl<T: Clone> FromIterator<T> for TrieVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iterator: I) -> Self {
        iterator.into_iter().fold(Self::new(), |vector, value| {
            vector
                .add(value)
                .unwrap_or_else(|error| panic!("{error}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::BRANCHING;
    use rand::random;

    const ITERATION_COUNT: usize = 1 << 12;

    #[test]
    fn new() {
        let vector = TrieVector::<usize>::new();

        assert_eq!(vector.len(), 0);
        assert!(vector.is_empty());
    }

    #[test]
    fn add() {
        let mut vector = TrieVector::new();

        for index in 0..ITERATION_COUNT {
            vector = vector.add(index).unwrap();
            assert_eq!(vector.len(), index + 1);
        }

        for index in 0..ITERATION_COUNT {
            assert_eq!(vector.lookup(index), Ok(&index));
        }
    }

    #[test]
    fn grow_height() {
        let mut vector = TrieVector::new();

        for index in 0..BRANCHING {
            vector = vector.add(index).unwrap();
        }

        assert_eq!(vector.height(), 0);

        vector = vector.add(BRANCHING).unwrap();

        assert_eq!(vector.height(), 1);

        for index in BRANCHING + 1..BRANCHING * BRANCHING {
            vector = vector.add(index).unwrap();
        }

        assert_eq!(vector.height(), 1);
        assert_eq!(vector.add(0).unwrap().height(), 2);
    }

    #[test]
    fn set() {
        let vector: TrieVector<usize> = (0..ITERATION_COUNT).collect();
        let mut model = (0..ITERATION_COUNT).collect::<Vec<_>>();
        let mut other = vector.clone();

        for _ in 0..ITERATION_COUNT {
            let index = random::<u32>() as usize % ITERATION_COUNT;
            let value = random::<u32>() as usize;

            other = other.set(index, value).unwrap();
            model[index] = value;
        }

        for (index, value) in model.iter().enumerate() {
            assert_eq!(other.lookup(index), Ok(value));
            assert_eq!(vector.lookup(index), Ok(&index));
        }
    }

    #[test]
    fn share_untouched_children() {
        let vector: TrieVector<usize> = (0..ITERATION_COUNT).collect();
        let other = vector.set(0, 42).unwrap();

        let (Some(Node::Branch(children)), Some(Node::Branch(other_children))) = (
            vector.root.as_deref(),
            other.root.as_deref(),
        ) else {
            panic!("root is not a branch");
        };

        assert!(!Arc::ptr_eq(&children[0], &other_children[0]));
        assert!(children[1..]
            .iter()
            .zip(&other_children[1..])
            .all(|(one, other)| Arc::ptr_eq(one, other)));
    }

    #[test]
    fn fail_out_of_range() {
        let vector = TrieVector::new();
        let error = Error::IndexOutOfRange {
            index: 0,
            length: 0,
        };

        assert_eq!(vector.lookup(0), Err(error));
        assert_eq!(vector.set(0, 0).err(), Some(error));

        let vector = vector.add(0).unwrap();

        assert_eq!(
            vector.lookup(1),
            Err(Error::IndexOutOfRange {
                index: 1,
                length: 1
            })
        );
        assert!(vector.set(1, 0).is_err());
        assert_eq!(vector.add(1).unwrap().lookup(1), Ok(&1));
    }

    #[test]
    fn send_and_sync() {
        let vector: TrieVector<usize> = TrieVector::new();
        std::thread::spawn(move || vector);
    }
}
