//! Core types for `datastore`: the error type, partition and dtype enums,
//! label containers, random array creation and NumPy array storage.

pub mod creation;
pub mod error;
pub mod labels;
pub mod npy;
pub mod types;
pub mod utils;

pub use error::DatastoreError;
pub use labels::{Labels, Target, TaskLabels, TaskTargets};
pub use npy::DynArray;
pub use types::{DType, Partition};

// Re-export the array crate so downstream crates agree on its version.
pub use ndarray;
