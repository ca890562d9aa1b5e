//! Bootstrap resampling.
//!
//! Every function here returns index views borrowing the input dataset; no
//! sample is copied.

use datastore_core::DatastoreError;
use log::debug;
use rand::Rng;

use crate::datasets::{Dataset, Subset};
use crate::samplers::draw_indices;

/// One bootstrap draw: the training multiset and its held-out complement.
#[derive(Debug, Clone)]
pub struct BootstrapSample<'a, D: Dataset> {
    pub train: Subset<'a, D>,
    pub valid: Subset<'a, D>,
}

/// Same draw as [`BootstrapSample`], reported as a train/test pair.
#[derive(Debug, Clone)]
pub struct LeaveOneOutSample<'a, D: Dataset> {
    pub train: Subset<'a, D>,
    pub test: Subset<'a, D>,
}

/// Training-set size for `train_proportion`, rounded up.
fn train_size(dataset_len: usize, train_proportion: f64) -> Result<usize, DatastoreError> {
    if !train_proportion.is_finite() || train_proportion < 0.0 {
        return Err(DatastoreError::InvalidArgument(format!(
            "train_proportion must be a finite non-negative number, got {}",
            train_proportion
        )));
    }
    let size = (dataset_len as f64 * train_proportion).ceil();
    // A `Vec<usize>` cannot hold more than `isize::MAX` bytes.
    let max_len = isize::MAX as usize / std::mem::size_of::<usize>();
    if size > max_len as f64 {
        return Err(DatastoreError::InvalidArgument(format!(
            "train_proportion {} asks for {} indices, more than can be allocated",
            train_proportion, size
        )));
    }
    Ok(size as usize)
}

/// Sorted indices of `0..dataset_len` that never occur in `train`.
fn complement(dataset_len: usize, train: &[usize]) -> Vec<usize> {
    let mut drawn = vec![false; dataset_len];
    for &index in train {
        drawn[index] = true;
    }
    (0..dataset_len).filter(|&index| !drawn[index]).collect()
}

/// Draws `num_bootstraps` (train, held-out) index pairs.
fn draw_pairs<R: Rng + ?Sized>(
    dataset_len: usize,
    num_bootstraps: usize,
    train_proportion: f64,
    rng: &mut R,
) -> Result<Vec<(Vec<usize>, Vec<usize>)>, DatastoreError> {
    // Lean towards a slightly larger training set.
    let num_train = train_size(dataset_len, train_proportion)?;
    debug!(
        "Drawing {} bootstrap samples of {} indices out of {}",
        num_bootstraps, num_train, dataset_len
    );
    (0..num_bootstraps)
        .map(|_| {
            let train = draw_indices(&mut *rng, dataset_len, num_train, true)?;
            let held_out = complement(dataset_len, &train);
            Ok((train, held_out))
        })
        .collect()
}

/// Creates bootstrap samples of `dataset`.
///
/// Each training view holds `ceil(len * train_proportion)` indices drawn with
/// replacement; each validation view holds, in ascending order and without
/// duplicates, every index the training draw missed.
///
/// # Errors
///
/// Returns `DatastoreError::InvalidArgument` if `train_proportion` is
/// negative or not finite, if the requested training size is too large to
/// allocate, or if the dataset is empty while a non-empty training set is
/// requested.
pub fn bootstrap<D: Dataset>(
    dataset: &D,
    num_bootstraps: usize,
    train_proportion: f64,
) -> Result<Vec<BootstrapSample<'_, D>>, DatastoreError> {
    bootstrap_with_rng(dataset, num_bootstraps, train_proportion, &mut rand::thread_rng())
}

/// [`bootstrap`] with a caller-supplied random number generator.
pub fn bootstrap_with_rng<'a, D: Dataset, R: Rng + ?Sized>(
    dataset: &'a D,
    num_bootstraps: usize,
    train_proportion: f64,
    rng: &mut R,
) -> Result<Vec<BootstrapSample<'a, D>>, DatastoreError> {
    let pairs = draw_pairs(dataset.len(), num_bootstraps, train_proportion, rng)?;
    Ok(pairs
        .into_iter()
        .map(|(train, valid)| BootstrapSample {
            train: Subset::new(dataset, train),
            valid: Subset::new(dataset, valid),
        })
        .collect())
}

/// Leave-one-out flavoured bootstrap.
///
/// The draws are exactly those of [`bootstrap`]; only the held-out view is
/// named `test` instead of `valid`.
pub fn leave_one_out_bootstrap<D: Dataset>(
    dataset: &D,
    num_bootstraps: usize,
    train_proportion: f64,
) -> Result<Vec<LeaveOneOutSample<'_, D>>, DatastoreError> {
    leave_one_out_bootstrap_with_rng(dataset, num_bootstraps, train_proportion, &mut rand::thread_rng())
}

/// [`leave_one_out_bootstrap`] with a caller-supplied random number generator.
pub fn leave_one_out_bootstrap_with_rng<'a, D: Dataset, R: Rng + ?Sized>(
    dataset: &'a D,
    num_bootstraps: usize,
    train_proportion: f64,
    rng: &mut R,
) -> Result<Vec<LeaveOneOutSample<'a, D>>, DatastoreError> {
    let pairs = draw_pairs(dataset.len(), num_bootstraps, train_proportion, rng)?;
    Ok(pairs
        .into_iter()
        .map(|(train, test)| LeaveOneOutSample {
            train: Subset::new(dataset, train),
            test: Subset::new(dataset, test),
        })
        .collect())
}

/// Draws a single view of `num_samples` indices, with or without replacement.
///
/// # Errors
///
/// Returns `DatastoreError::InvalidArgument` when sampling from an empty
/// dataset or, without replacement, when `num_samples > dataset.len()`.
pub fn sample<D: Dataset>(
    dataset: &D,
    num_samples: usize,
    replace: bool,
) -> Result<Subset<'_, D>, DatastoreError> {
    sample_with_rng(dataset, num_samples, replace, &mut rand::thread_rng())
}

/// [`sample`] with a caller-supplied random number generator.
pub fn sample_with_rng<'a, D: Dataset, R: Rng + ?Sized>(
    dataset: &'a D,
    num_samples: usize,
    replace: bool,
    rng: &mut R,
) -> Result<Subset<'a, D>, DatastoreError> {
    let indices = draw_indices(rng, dataset.len(), num_samples, replace)?;
    Ok(Subset::new(dataset, indices))
}

#[cfg(test)]
#[path = "bootstrap_test.rs"]
mod tests;
