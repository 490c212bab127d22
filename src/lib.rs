//! Persistent collections whose sub-trees can be shared over threads.
//!
//! Every update of a collection returns a new version and leaves the original
//! one intact. The versions share every node off the updated path, so old
//! versions stay cheap to keep around.
//!
//! - [`Map`] is a Hash-Array Mapped Trie (HAMT), a data structure adopted
//!   widely by functional programming languages like Scala and Clojure to
//!   implement immutable and memory-efficient associative arrays.
//! - [`SortedMap`] is a B-tree ordered by keys.
//! - [`FixedVector`], [`TrieVector`] and [`MergeVector`] are indexed vectors
//!   implementing [`Vector`] with different layouts of 32-way or fixed-width
//!   tries.

pub mod array;
mod bitmap;
mod btree;
mod bucket;
mod error;
mod fixed_vector;
mod hamt;
mod key_value;
mod map;
mod merge_vector;
mod sorted_map;
mod trie_vector;
mod utilities;
mod vector;

pub use error::{Error, Result};
pub use fixed_vector::{FixedVector, Shape};
pub use map::Map;
pub use merge_vector::MergeVector;
pub use sorted_map::SortedMap;
pub use trie_vector::TrieVector;
pub use vector::Vector;
