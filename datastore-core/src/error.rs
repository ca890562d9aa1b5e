use std::path::PathBuf;

use ndarray_npy::{ReadNpyError, ReadNpzError, WriteNpyError};
use thiserror::Error;

/// Custom error type for the datastore crates.
///
/// Every fallible operation in the workspace returns this type. Nothing is
/// retried or recovered internally: errors surface to the immediate caller.
#[derive(Error, Debug)]
pub enum DatastoreError {
    #[error("Index out of bounds: index {index} for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Dataset not found under {root:?}. You can use download=true to download it")]
    DatasetNotFound { root: PathBuf },

    #[error("Invalid partition '{0}': partition must either be 'train' or 'test'")]
    InvalidPartition(String),

    #[error("Transport error while fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(
        "n_splits={num_folds} cannot be greater than the number of members in each class \
         (least populated class has {min_class_count} members)"
    )]
    InsufficientSamplesPerClass {
        num_folds: usize,
        min_class_count: usize,
    },

    #[error("Shape mismatch: expected {expected}, got {actual} during operation {operation}")]
    ShapeMismatch {
        expected: String,
        actual: String,
        operation: String,
    },

    #[error("Unknown task '{0}'")]
    TaskNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read array: {0}")]
    ReadArray(#[from] ReadNpyError),

    #[error("Failed to read archive: {0}")]
    ReadArchive(#[from] ReadNpzError),

    #[error("Failed to write array: {0}")]
    WriteArray(#[from] WriteNpyError),
}

impl DatastoreError {
    /// Shorthand for a length check that failed inside `operation`.
    pub fn length_mismatch(expected: usize, actual: usize, operation: &str) -> Self {
        DatastoreError::ShapeMismatch {
            expected: format!("length {}", expected),
            actual: format!("length {}", actual),
            operation: operation.to_string(),
        }
    }
}
