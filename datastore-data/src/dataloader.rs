// dataloader.rs
//! # DataLoader
//!
//! Batches the items of a [`Dataset`] in the order produced by a
//! [`Sampler`], and drives the epoch hook of the dataset.
//!
//! ## Basic usage
//!
//! ```rust
//! use datastore_data::dataloader::DataLoader;
//! use datastore_data::datasets::RandomData;
//! use datastore_data::samplers::SequentialSampler;
//!
//! let dataset = RandomData::new(6, 2, Some(0)).unwrap();
//! let mut loader = DataLoader::new(dataset, 2, SequentialSampler::new(), false, None).unwrap();
//! for batch in &mut loader {
//!     let batch = batch.unwrap();
//!     assert_eq!(batch.len(), 2);
//! }
//! loader.next_epoch();
//! assert_eq!(loader.epoch(), 1);
//! ```

use log::trace;

use crate::datasets::Dataset;
use crate::samplers::Sampler;
use datastore_core::DatastoreError;

/// Custom collation function.
///
/// Receives the items of one batch and returns the batch handed to the
/// caller. Without one, batches are plain `Vec`s of items.
pub type CollateFn<D> = Box<
    dyn Fn(Vec<<D as Dataset>::Item>) -> Result<Vec<<D as Dataset>::Item>, DatastoreError>
        + Send
        + Sync,
>;

/// Generic batching loader.
///
/// The loader owns its dataset so that [`DataLoader::next_epoch`] can call
/// [`Dataset::on_epoch_end`]. Iterating yields the batches of the current
/// epoch; once exhausted, call `next_epoch` to start another one.
pub struct DataLoader<D: Dataset, S: Sampler> {
    dataset: D,
    batch_size: usize,
    sampler: S,
    drop_last: bool,
    collate_fn: Option<CollateFn<D>>,
    indices_iter: Box<dyn Iterator<Item = usize> + Send + Sync>,
    epoch: usize,
}

impl<D: Dataset, S: Sampler> DataLoader<D, S> {
    /// Creates a new DataLoader.
    ///
    /// # Arguments
    /// - `dataset`: The dataset to batch.
    /// - `batch_size`: Number of items per batch.
    /// - `sampler`: Produces the index order of every epoch.
    /// - `drop_last`: If true, an incomplete final batch is skipped.
    /// - `collate_fn`: Optional custom collation.
    ///
    /// # Errors
    ///
    /// Returns `DatastoreError::InvalidArgument` if `batch_size` is 0.
    pub fn new(
        dataset: D,
        batch_size: usize,
        sampler: S,
        drop_last: bool,
        collate_fn: Option<CollateFn<D>>,
    ) -> Result<Self, DatastoreError> {
        if batch_size == 0 {
            return Err(DatastoreError::InvalidArgument(
                "batch_size must be at least 1".to_string(),
            ));
        }
        let indices_iter = sampler.iter(dataset.len());
        Ok(Self {
            dataset,
            batch_size,
            sampler,
            drop_last,
            collate_fn,
            indices_iter,
            epoch: 0,
        })
    }

    /// Creates a DataLoader whose collation returns the items unchanged.
    pub fn with_default_collate(
        dataset: D,
        batch_size: usize,
        sampler: S,
        drop_last: bool,
    ) -> Result<Self, DatastoreError> {
        let collate_fn: CollateFn<D> = Box::new(|batch: Vec<<D as Dataset>::Item>| Ok(batch));
        Self::new(dataset, batch_size, sampler, drop_last, Some(collate_fn))
    }

    pub fn dataset(&self) -> &D {
        &self.dataset
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of completed epochs.
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    /// Number of batches one epoch yields.
    pub fn num_batches(&self) -> usize {
        let samples = self.sampler.len(self.dataset.len());
        if self.drop_last {
            samples / self.batch_size
        } else {
            samples.div_ceil(self.batch_size)
        }
    }

    /// Ends the current epoch: runs the dataset's epoch hook and draws the
    /// index order of the next epoch.
    pub fn next_epoch(&mut self) {
        self.dataset.on_epoch_end();
        self.epoch += 1;
        self.indices_iter = self.sampler.iter(self.dataset.len());
        trace!("DataLoader starting epoch {}", self.epoch);
    }

    /// Consumes the loader and returns its dataset.
    pub fn into_dataset(self) -> D {
        self.dataset
    }
}

impl<D: Dataset, S: Sampler> Iterator for DataLoader<D, S> {
    type Item = Result<Vec<<D as Dataset>::Item>, DatastoreError>;

    /// Returns the next batch of the current epoch.
    ///
    /// - `Some(Ok(batch))`: a batch ready to use.
    /// - `Some(Err(e))`: fetching an item or collating failed.
    /// - `None`: the epoch is exhausted.
    fn next(&mut self) -> Option<Self::Item> {
        let mut batch = Vec::with_capacity(self.batch_size);
        for idx in self.indices_iter.by_ref().take(self.batch_size) {
            match self.dataset.get(idx) {
                Ok(item) => batch.push(item),
                Err(e) => return Some(Err(e)),
            }
        }
        if batch.is_empty() || (self.drop_last && batch.len() < self.batch_size) {
            return None;
        }
        match self.collate_fn {
            Some(ref collate_fn) => Some(collate_fn(batch)),
            None => Some(Ok(batch)),
        }
    }
}

#[cfg(test)]
#[path = "dataloader_test.rs"]
mod tests;
