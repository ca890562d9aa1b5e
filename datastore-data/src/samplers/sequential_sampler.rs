// datastore-data/src/samplers/sequential_sampler.rs

use super::traits::Sampler;

/// Yields `0..dataset_len` in order.
///
/// The order never changes, so every epoch of a `DataLoader` driven by this
/// sampler visits the dataset identically; `DataLoader::next_epoch` only
/// re-reads the length, which picks up a dataset resized by its epoch hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialSampler;

impl SequentialSampler {
    pub fn new() -> Self {
        SequentialSampler
    }
}

impl Sampler for SequentialSampler {
    fn iter(&self, dataset_len: usize) -> Box<dyn Iterator<Item = usize> + Send + Sync> {
        Box::new(0..dataset_len)
    }

    fn len(&self, dataset_len: usize) -> usize {
        dataset_len
    }
}

#[cfg(test)]
#[path = "sequential_sampler_test.rs"]
mod tests;
