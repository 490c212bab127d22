use crate::{
    array,
    error::Error,
    vector::{check_index, Vector},
    Result,
};
use std::sync::Arc;

const LEVEL_COUNT: usize = 4;
const MAX_LEVEL_BITS: u32 = 16;

type Level3<T> = Arc<Vec<T>>;
type Level2<T> = Arc<Vec<Level3<T>>>;
type Level1<T> = Arc<Vec<Level2<T>>>;

/// Bit widths of the four levels of a [`FixedVector`], top level first.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Shape([u32; LEVEL_COUNT]);

impl Shape {
    pub fn new(first: u32, second: u32, third: u32, fourth: u32) -> Result<Self> {
        let bits = [first, second, third, fourth];

        if bits.iter().any(|&bits| bits == 0 || bits > MAX_LEVEL_BITS) {
            return Err(Error::InvalidShape("level width must be 1 to 16 bits"));
        } else if bits.iter().sum::<u32>() >= usize::BITS {
            return Err(Error::InvalidShape("total width must fit in an index"));
        }

        Ok(Self(bits))
    }

    /// Returns a maximum number of elements.
    pub fn capacity(&self) -> usize {
        1 << self.0.iter().sum::<u32>()
    }

    // Splits an index into positions in arrays of each level.
    fn split(&self, index: usize) -> [usize; LEVEL_COUNT] {
        let [_, second, third, fourth] = self.0;
        let mask = |bits: u32| (1usize << bits) - 1;

        [
            index >> (second + third + fourth),
            (index >> (third + fourth)) & mask(second),
            (index >> fourth) & mask(third),
            index & mask(fourth),
        ]
    }
}

impl Default for Shape {
    fn default() -> Self {
        Self([9, 9, 7, 7])
    }
}

// Replaces an element or appends one at the end.
fn put<T: Clone>(xs: &[T], index: usize, x: T) -> Vec<T> {
    if index < xs.len() {
        array::replace(xs, index, x)
    } else {
        array::insert(xs, index, x)
    }
}

/// Persistent vector of four levels of nested arrays.
///
/// Arrays are allocated only as long as their contents, so the last arrays
/// of each level may be shorter than their full widths.
#[derive(Clone, Debug)]
pub struct FixedVector<T> {
    root: Arc<Vec<Level1<T>>>,
    length: usize,
    shape: Shape,
}

impl<T> FixedVector<T> {
    pub fn new() -> Self {
        Self::with_shape(Shape::default())
    }

    pub fn with_shape(shape: Shape) -> Self {
        Self {
            root: Default::default(),
            length: 0,
            shape,
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn capacity(&self) -> usize {
        self.shape.capacity()
    }
}

impl<T: Clone> Vector<T> for FixedVector<T> {
    fn len(&self) -> usize {
        self.length
    }

    fn lookup(&self, index: usize) -> Result<&T> {
        check_index(index, self.length)?;

        let [i0, i1, i2, i3] = self.shape.split(index);

        Ok(&self.root[i0][i1][i2][i3])
    }

    fn set(&self, index: usize, value: T) -> Result<Self> {
        check_index(index, self.length)?;

        let [i0, i1, i2, i3] = self.shape.split(index);
        let a1 = &self.root[i0];
        let a2 = &a1[i1];
        let a3 = &a2[i2];

        let a3 = array::replace(a3, i3, value);
        let a2 = array::replace(a2, i2, a3.into());
        let a1 = array::replace(a1, i1, a2.into());

        Ok(Self {
            root: array::replace(&self.root, i0, a1.into()).into(),
            length: self.length,
            shape: self.shape,
        })
    }

    fn add(&self, value: T) -> Result<Self> {
        let capacity = self.capacity();

        if self.length == capacity {
            return Err(Error::CapacityExceeded {
                capacity: capacity as u64,
            });
        }

        // Zero positions of lower levels mean new arrays at their levels.
        let [i0, i1, i2, i3] = self.shape.split(self.length);

        let a3 = if i3 == 0 {
            vec![value]
        } else {
            array::insert(&self.root[i0][i1][i2], i3, value)
        };
        let a2 = if i2 | i3 == 0 {
            vec![a3.into()]
        } else {
            put(&self.root[i0][i1], i2, a3.into())
        };
        let a1 = if i1 | i2 | i3 == 0 {
            vec![a2.into()]
        } else {
            put(&self.root[i0], i1, a2.into())
        };

        Ok(Self {
            root: put(&self.root, i0, a1.into()).into(),
            length: self.length + 1,
            shape: self.shape,
        })
    }
}

impl<T> Default for FixedVector<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// # Panics
///
/// Panics if the elements exceed the capacity of the default shape.
impl<T: Clone> FromIterator<T> for FixedVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iterator: I) -> Self {
        iterator.into_iter().fold(Self::new(), |vector, value| {
            vector
                .add(value)
                .unwrap_or_else(|error| panic!("{error}"))
        })
    }
}
