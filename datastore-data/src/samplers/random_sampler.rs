// datastore-data/src/samplers/random_sampler.rs

use std::sync::Mutex;

use datastore_core::creation::seeded_rng;
use datastore_core::DatastoreError;
use log::warn;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use super::traits::Sampler;

/// Draws `num_samples` indices from `0..dataset_len`.
///
/// With `replacement` an index can be drawn several times; without it the
/// result holds distinct indices in random order.
///
/// # Errors
///
/// Returns `DatastoreError::InvalidArgument` when drawing from an empty range,
/// or when `num_samples > dataset_len` without replacement.
pub fn draw_indices<R: Rng + ?Sized>(
    rng: &mut R,
    dataset_len: usize,
    num_samples: usize,
    replacement: bool,
) -> Result<Vec<usize>, DatastoreError> {
    if num_samples == 0 {
        return Ok(Vec::new());
    }
    if replacement {
        if dataset_len == 0 {
            return Err(DatastoreError::InvalidArgument(format!(
                "cannot draw {} samples from an empty dataset",
                num_samples
            )));
        }
        Ok((0..num_samples)
            .map(|_| rng.gen_range(0..dataset_len))
            .collect())
    } else {
        if num_samples > dataset_len {
            return Err(DatastoreError::InvalidArgument(format!(
                "cannot draw {} samples without replacement from {} items",
                num_samples, dataset_len
            )));
        }
        let mut indices: Vec<usize> = (0..dataset_len).collect();
        indices.shuffle(rng);
        indices.truncate(num_samples);
        Ok(indices)
    }
}

/// A sampler that randomly samples indices from a dataset.
///
/// Each call to `iter` draws a new permutation (or a new multiset with
/// replacement). A seeded sampler produces the same sequence of epochs on
/// every run.
#[derive(Debug)]
pub struct RandomSampler {
    replacement: bool,
    num_samples: Option<usize>,
    rng: Mutex<StdRng>,
}

impl RandomSampler {
    /// Creates a new `RandomSampler`.
    ///
    /// # Arguments
    ///
    /// * `replacement`: If `true`, an index can be selected multiple times.
    /// * `num_samples`: The total number of samples to draw. If `None`, it defaults to the dataset size.
    pub fn new(replacement: bool, num_samples: Option<usize>) -> Self {
        RandomSampler {
            replacement,
            num_samples,
            rng: Mutex::new(seeded_rng(None)),
        }
    }

    /// Reseeds the sampler so its epochs are reproducible.
    pub fn with_seed(self, seed: u64) -> Self {
        RandomSampler {
            rng: Mutex::new(seeded_rng(Some(seed))),
            ..self
        }
    }
}

impl Sampler for RandomSampler {
    fn iter(&self, dataset_len: usize) -> Box<dyn Iterator<Item = usize> + Send + Sync> {
        let num_samples = self.num_samples.unwrap_or(dataset_len);
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| {
            warn!("RandomSampler: rng mutex was poisoned. Recovering.");
            poisoned.into_inner()
        });
        match draw_indices(&mut *rng, dataset_len, num_samples, self.replacement) {
            Ok(indices) => Box::new(indices.into_iter()),
            Err(err) => {
                warn!("RandomSampler: {}. Returning empty iterator.", err);
                Box::new(std::iter::empty())
            }
        }
    }

    fn len(&self, dataset_len: usize) -> usize {
        self.num_samples.unwrap_or(dataset_len)
    }
}

#[cfg(test)]
#[path = "random_sampler_test.rs"]
mod tests;
