//! Value-copy primitives on arrays.
//!
//! Every function returns a fresh vector and leaves its input untouched, so
//! the tree engines use them to clone a node's array before changing it.

/// Returns a copy of `xs` with `x` inserted at `index`.
pub fn insert<T: Clone>(xs: &[T], index: usize, x: T) -> Vec<T> {
    let mut ys = Vec::with_capacity(xs.len() + 1);

    ys.extend_from_slice(&xs[..index]);
    ys.push(x);
    ys.extend_from_slice(&xs[index..]);

    ys
}

/// Returns a copy of `xs` without the element at `index`.
pub fn remove<T: Clone>(xs: &[T], index: usize) -> Vec<T> {
    let mut ys = Vec::with_capacity(xs.len() - 1);

    ys.extend_from_slice(&xs[..index]);
    ys.extend_from_slice(&xs[index + 1..]);

    ys
}

/// Returns a copy of `len` elements of `xs` starting at `index`.
pub fn slice<T: Clone>(xs: &[T], index: usize, len: usize) -> Vec<T> {
    xs[index..index + len].to_vec()
}

/// Returns a full copy of `xs`.
pub fn copy<T: Clone>(xs: &[T]) -> Vec<T> {
    slice(xs, 0, xs.len())
}

/// Returns a copy of `xs` whose element at `index` is `x`.
pub fn replace<T: Clone>(xs: &[T], index: usize, x: T) -> Vec<T> {
    let mut ys = copy(xs);

    ys[index] = x;

    ys
}
