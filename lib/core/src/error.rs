use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid rating vector dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid number of neighbors {k}: must be between 1 and {max}")]
    InvalidK { k: i64, max: usize },

    #[error("Invalid rating {value} at position {index}: ratings must be between 0 and 5")]
    InvalidRating { index: usize, value: f64 },

    #[error("Neighbor index {index} out of range for {users} users")]
    NeighborOutOfRange { index: usize, users: usize },

    #[error("Row {row} has {actual} ratings, expected {expected}")]
    RaggedRow { row: usize, expected: usize, actual: usize },

    #[error("Flat rating buffer has {actual} cells, expected {expected}")]
    BufferLength { expected: usize, actual: usize },

    #[error("Invalid rating {value} for user {user}, item {item}: ratings must be between 0 and 5")]
    InvalidCell { user: usize, item: usize, value: f64 },

    #[error("Rating matrix has no users or no items")]
    EmptyMatrix,

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// True for errors caused by caller-supplied values rather than the loaded data.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::DimensionMismatch { .. }
                | Error::InvalidK { .. }
                | Error::InvalidRating { .. }
                | Error::NeighborOutOfRange { .. }
                | Error::InvalidConfig(_)
        )
    }
}
