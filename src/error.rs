/// Error of collection operations.
///
/// Missing keys are not errors; maps return `None` for them.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// A vector index is not less than the vector's length.
    #[error("index {index} out of range for vector of length {length}")]
    IndexOutOfRange { index: usize, length: usize },
    /// A vector cannot hold any more elements.
    #[error("vector capacity of {capacity} elements exceeded")]
    CapacityExceeded { capacity: u64 },
    /// A fixed-depth vector shape is rejected.
    #[error("invalid vector shape: {0}")]
    InvalidShape(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
