use datastore_core::DatastoreError;

use super::traits::Dataset;

/// Subset of a dataset at specified indices.
///
/// A read-only view: it borrows the base dataset and keeps only the index
/// list, so no sample is copied. Construction does not validate the indices;
/// an index that is invalid for the base fails when it is accessed, the same
/// way the base would fail. Indices may repeat and need not be sorted.
#[derive(Debug)]
pub struct Subset<'a, D: Dataset> {
    dataset: &'a D,
    indices: Vec<usize>,
}

impl<'a, D: Dataset> Subset<'a, D> {
    /// Creates a view of `dataset` restricted to `indices`.
    pub fn new(dataset: &'a D, indices: Vec<usize>) -> Self {
        Self { dataset, indices }
    }

    /// The base dataset this view reads from.
    pub fn dataset(&self) -> &'a D {
        self.dataset
    }

    /// Indices into the base dataset, in view order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }
}

impl<'a, D: Dataset> Clone for Subset<'a, D> {
    fn clone(&self) -> Self {
        Self {
            dataset: self.dataset,
            indices: self.indices.clone(),
        }
    }
}

impl<'a, D: Dataset> Dataset for Subset<'a, D> {
    type Item = D::Item;

    /// Returns `base.get(indices[index])`.
    ///
    /// # Errors
    ///
    /// Returns `DatastoreError::IndexOutOfBounds` if `index` is outside the
    /// view, or whatever the base returns for the stored index.
    fn get(&self, index: usize) -> Result<Self::Item, DatastoreError> {
        let base_index = *self
            .indices
            .get(index)
            .ok_or(DatastoreError::IndexOutOfBounds {
                index,
                len: self.indices.len(),
            })?;
        self.dataset.get(base_index)
    }

    fn len(&self) -> usize {
        self.indices.len()
    }
}

#[cfg(test)]
#[path = "subset_test.rs"]
mod tests;
