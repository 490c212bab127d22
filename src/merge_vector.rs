use crate::{
    error::Error,
    vector::{check_index, Node, Vector, BITS, MAX_HEIGHT},
    Result,
};
use log::trace;
use std::sync::Arc;

const MAX_LEVEL: usize = MAX_HEIGHT as usize;
const CAPACITY: u64 = 1 << (BITS * (MAX_LEVEL + 1));

/// Persistent vector with amortized constant-time appends.
///
/// Elements are the concatenation of the nodes of levels 6 down to 0, where
/// the node at level `k` is a trie of height `k` holding full children of
/// height `k - 1`. Appending to a full level 0 carries it into level 1 and so
/// on, like an increment of a base-32 counter.
#[derive(Clone, Debug)]
pub struct MergeVector<T> {
    levels: [Option<Arc<Node<T>>>; MAX_LEVEL + 1],
    length: usize,
}

impl<T> MergeVector<T> {
    pub fn new() -> Self {
        Self {
            levels: Default::default(),
            length: 0,
        }
    }

    // An index is owned by the lowest level above which it agrees with the
    // length on every bit.
    fn level(&self, index: usize) -> usize {
        let same = index ^ self.length;

        (0..MAX_LEVEL)
            .find(|level| same.checked_shr((BITS * (level + 1)) as u32).unwrap_or(0) == 0)
            .unwrap_or(MAX_LEVEL)
    }

    fn out_of_range(&self, index: usize) -> Error {
        Error::IndexOutOfRange {
            index,
            length: self.length,
        }
    }
}

impl<T: Clone> Vector<T> for MergeVector<T> {
    fn len(&self) -> usize {
        self.length
    }

    fn lookup(&self, index: usize) -> Result<&T> {
        check_index(index, self.length)?;

        let level = self.level(index);

        self.levels[level]
            .as_ref()
            .and_then(|node| node.get(level as u8, index))
            .ok_or_else(|| self.out_of_range(index))
    }

    fn set(&self, index: usize, value: T) -> Result<Self> {
        check_index(index, self.length)?;

        let level = self.level(index);
        let node = self.levels[level]
            .as_ref()
            .ok_or_else(|| self.out_of_range(index))?;
        let mut levels = self.levels.clone();

        levels[level] = Some(node.set(level as u8, index, value).into());

        Ok(Self {
            levels,
            length: self.length,
        })
    }

    fn add(&self, value: T) -> Result<Self> {
        if self.length as u64 == CAPACITY {
            return Err(Error::CapacityExceeded { capacity: CAPACITY });
        }

        let mut levels = self.levels.clone();
        let mut node = match &levels[0] {
            Some(node) => node.push(0, self.length, value),
            None => Node::singleton(0, value),
        };
        let mut level = 0;

        while node.is_full() && level < MAX_LEVEL {
            levels[level] = None;
            level += 1;

            let child = Arc::new(node);

            node = match &levels[level] {
                Some(parent) => parent.append(child),
                None => Node::Branch(vec![child]),
            };

            if level >= 2 {
                trace!("merge vector carried into level {level}");
            }
        }

        levels[level] = Some(node.into());

        Ok(Self {
            levels,
            length: self.length + 1,
        })
    }
}

impl<T> Default for MergeVector<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// # Panics
///
/// Panics if the elements exceed the capacity of 32^7.
impl<T: Clone> FromIterator<T> for MergeVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iterator: I) -> Self {
        iterator.into_iter().fold(Self::new(), |vector, value| {
            vector
                .add(value)
                .unwrap_or_else(|error| panic!("{error}"))
        })
    }
}
