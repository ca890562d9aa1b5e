use ndarray::{ArrayD, Axis};

use datastore_core::{DatastoreError, Labels, Target};

use super::traits::{Dataset, InMemoryDataset};

/// An in-memory dataset made of a feature array and aligned labels.
///
/// The first dimension of the feature array is the sample dimension. When an
/// item is fetched using `get(index)`, it returns the feature slice at
/// `index` together with its [`Target`].
#[derive(Debug, Clone)]
pub struct ArrayDataset {
    features: ArrayD<f32>,
    labels: Labels,
}

impl ArrayDataset {
    /// Creates a new `ArrayDataset`.
    ///
    /// # Errors
    ///
    /// Returns `DatastoreError::ShapeMismatch` if `features` is a scalar or
    /// if its first dimension does not match the number of labels.
    pub fn new(features: ArrayD<f32>, labels: impl Into<Labels>) -> Result<Self, DatastoreError> {
        let labels = labels.into();
        let Some(&num_samples) = features.shape().first() else {
            return Err(DatastoreError::ShapeMismatch {
                expected: "at least one dimension".to_string(),
                actual: "scalar array".to_string(),
                operation: "ArrayDataset::new".to_string(),
            });
        };
        if num_samples != labels.len() {
            return Err(DatastoreError::ShapeMismatch {
                expected: format!("First dimension of size {}", labels.len()),
                actual: format!("First dimension of size {}", num_samples),
                operation: "ArrayDataset::new".to_string(),
            });
        }
        Ok(Self { features, labels })
    }
}

impl Dataset for ArrayDataset {
    type Item = (ArrayD<f32>, Target);

    fn get(&self, index: usize) -> Result<Self::Item, DatastoreError> {
        let target = self
            .labels
            .target_at(index)
            .ok_or(DatastoreError::IndexOutOfBounds {
                index,
                len: self.len(),
            })?;
        let features = self.features.index_axis(Axis(0), index).to_owned();
        Ok((features, target))
    }

    fn len(&self) -> usize {
        self.labels.len()
    }
}

impl InMemoryDataset for ArrayDataset {
    type Features = ArrayD<f32>;

    fn load_data(&self) -> (&Self::Features, &Labels) {
        (&self.features, &self.labels)
    }
}

#[cfg(test)]
#[path = "array_dataset_test.rs"]
mod tests;
