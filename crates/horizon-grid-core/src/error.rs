//! Error types for Horizon Grid.

/// A specialized Result type for Horizon Grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// The error type for grid model operations.
///
/// Only conditions that abort the call are errors. A cell without a template
/// or formatter, a column type without a default prototype, and a row lacking
/// a column's data path are handled in place and never surface here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// An index passed to an insert/remove call is outside the collection.
    ///
    /// The collection is left exactly as it was before the call.
    #[error("Index {index} is out of range for a collection of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A structured configuration could not be interpreted.
    #[error("Invalid grid configuration: {0}")]
    InvalidConfig(String),
}

impl GridError {
    /// Create an out-of-range error.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
