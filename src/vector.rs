use crate::{array, error::Error, Result};
use std::sync::Arc;

pub(crate) const BITS: usize = 5;
pub(crate) const BRANCHING: usize = 1 << BITS;
pub(crate) const MASK: usize = BRANCHING - 1;
/// Maximum height of 32-way tries, leaves being at height zero.
pub(crate) const MAX_HEIGHT: u8 = 6;

/// Persistent indexed sequence.
///
/// Every method returns a new vector and leaves the original one untouched.
pub trait Vector<T>: Sized {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an element at an index.
    fn lookup(&self, index: usize) -> Result<&T>;

    /// Replaces an element at an index less than the vector's length.
    #[must_use = "set returns a new vector"]
    fn set(&self, index: usize, value: T) -> Result<Self>;

    /// Appends an element.
    #[must_use = "add returns a new vector"]
    fn add(&self, value: T) -> Result<Self>;
}

pub(crate) fn check_index(index: usize, length: usize) -> Result<()> {
    if index < length {
        Ok(())
    } else {
        Err(Error::IndexOutOfRange { index, length })
    }
}

/// Node of a 32-way trie. Leaves are at height zero.
#[derive(Clone, Debug)]
pub(crate) enum Node<T> {
    Leaf(Vec<T>),
    Branch(Vec<Arc<Node<T>>>),
}

/// Which child at height `height` does a global index belong to?
pub(crate) fn extract_index(index: usize, height: u8) -> usize {
    (index >> (BITS * height as usize)) & MASK
}

impl<T> Node<T> {
    pub fn len(&self) -> usize {
        match self {
            Self::Leaf(values) => values.len(),
            Self::Branch(children) => children.len(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.len() == BRANCHING
    }

    pub fn get(&self, height: u8, index: usize) -> Option<&T> {
        match self {
            Self::Leaf(values) => values.get(index & MASK),
            Self::Branch(children) => children
                .get(extract_index(index, height))
                .and_then(|child| child.get(height - 1, index)),
        }
    }
}

impl<T: Clone> Node<T> {
    /// Returns a path of new nodes from height `height` down to a leaf of
    /// one element.
    pub fn singleton(height: u8, value: T) -> Self {
        let mut node = Self::Leaf(vec![value]);

        for _ in 0..height {
            node = Self::Branch(vec![node.into()]);
        }

        node
    }

    /// Returns a copy of this node with an element replaced, copying the
    /// nodes on the path to it.
    pub fn set(&self, height: u8, index: usize, value: T) -> Self {
        match self {
            Self::Leaf(values) => Self::Leaf(array::replace(values, index & MASK, value)),
            Self::Branch(children) => {
                let child = extract_index(index, height);

                Self::Branch(array::replace(
                    children,
                    child,
                    children[child].set(height - 1, index, value).into(),
                ))
            }
        }
    }

    /// Returns a copy of this node with an element appended at `index`,
    /// which is the length of this subtree.
    pub fn push(&self, height: u8, index: usize, value: T) -> Self {
        match self {
            Self::Leaf(values) => Self::Leaf(array::insert(values, values.len(), value)),
            Self::Branch(children) => {
                let child = extract_index(index, height);

                Self::Branch(if child < children.len() {
                    array::replace(
                        children,
                        child,
                        children[child].push(height - 1, index, value).into(),
                    )
                } else {
                    array::insert(
                        children,
                        children.len(),
                        Self::singleton(height - 1, value).into(),
                    )
                })
            }
        }
    }

    /// Returns a copy of this node with a child appended.
    pub fn append(&self, child: Arc<Self>) -> Self {
        match self {
            Self::Leaf(_) => unreachable!("leaves have no children"),
            Self::Branch(children) => Self::Branch(array::insert(children, children.len(), child)),
        }
    }
}
