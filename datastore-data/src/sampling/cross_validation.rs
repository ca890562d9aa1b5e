//! Stratified k-fold cross-validation.

use std::collections::HashMap;

use log::debug;
use ndarray::ArrayView1;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand::rngs::StdRng;

use datastore_core::DatastoreError;

use crate::datasets::{Dataset, InMemoryDataset, MultiTaskDataset, Subset};

/// One cross-validation fold: the training view and the held-out view.
#[derive(Debug, Clone)]
pub struct Split<'a, D: Dataset> {
    pub train: Subset<'a, D>,
    pub valid: Subset<'a, D>,
}

/// Stratified k-fold splitter.
///
/// Every fold holds out roughly `1 / num_folds` of each class, so class
/// proportions are preserved in both views. Without shuffling the fold
/// assignment depends on the labels alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StratifiedKFold {
    num_folds: usize,
    shuffle_seed: Option<u64>,
}

impl StratifiedKFold {
    /// # Errors
    ///
    /// Returns `DatastoreError::InvalidArgument` if `num_folds < 2`.
    pub fn new(num_folds: usize) -> Result<Self, DatastoreError> {
        if num_folds < 2 {
            return Err(DatastoreError::InvalidArgument(format!(
                "num_folds must be at least 2, got {}",
                num_folds
            )));
        }
        Ok(Self {
            num_folds,
            shuffle_seed: None,
        })
    }

    /// Shuffles the fold order within each class using `seed`.
    pub fn with_shuffle(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    pub fn num_folds(&self) -> usize {
        self.num_folds
    }

    /// Assigns every sample to the fold that holds it out.
    ///
    /// # Errors
    ///
    /// Returns `DatastoreError::InsufficientSamplesPerClass` when some class
    /// has fewer than `num_folds` members, or when `labels` is empty.
    pub fn test_folds(&self, labels: ArrayView1<'_, i64>) -> Result<Vec<usize>, DatastoreError> {
        // Classes are numbered in order of first appearance.
        let mut codes: HashMap<i64, usize> = HashMap::new();
        let encoded: Vec<usize> = labels
            .iter()
            .map(|label| {
                let next = codes.len();
                *codes.entry(*label).or_insert(next)
            })
            .collect();
        let num_classes = codes.len();

        let mut counts = vec![0usize; num_classes];
        for &class in &encoded {
            counts[class] += 1;
        }
        let min_class_count = counts.iter().copied().min().unwrap_or(0);
        if min_class_count < self.num_folds {
            return Err(DatastoreError::InsufficientSamplesPerClass {
                num_folds: self.num_folds,
                min_class_count,
            });
        }

        let mut sorted = encoded.clone();
        sorted.sort_unstable();
        // allocation[fold][class]: members of `class` held out by `fold`.
        let mut allocation = vec![vec![0usize; num_classes]; self.num_folds];
        for (position, &class) in sorted.iter().enumerate() {
            allocation[position % self.num_folds][class] += 1;
        }

        let mut rng = self.shuffle_seed.map(StdRng::seed_from_u64);
        let mut class_folds: Vec<std::vec::IntoIter<usize>> = (0..num_classes)
            .map(|class| {
                let mut folds: Vec<usize> = (0..self.num_folds)
                    .flat_map(|fold| std::iter::repeat(fold).take(allocation[fold][class]))
                    .collect();
                if let Some(rng) = rng.as_mut() {
                    folds.shuffle(rng);
                }
                folds.into_iter()
            })
            .collect();

        let mut assignment = Vec::with_capacity(encoded.len());
        for &class in &encoded {
            // Each class receives exactly one fold slot per member.
            let fold = class_folds[class].next().unwrap_or(0);
            assignment.push(fold);
        }
        debug!(
            "Stratified {} samples of {} classes into {} folds",
            encoded.len(),
            num_classes,
            self.num_folds
        );
        Ok(assignment)
    }

    /// Returns one `(train, held_out)` index pair per fold, both ascending.
    pub fn split_indices(
        &self,
        labels: ArrayView1<'_, i64>,
    ) -> Result<Vec<(Vec<usize>, Vec<usize>)>, DatastoreError> {
        let assignment = self.test_folds(labels)?;
        Ok((0..self.num_folds)
            .map(|fold| {
                (0..assignment.len()).partition(|&index| assignment[index] != fold)
            })
            .collect())
    }

    /// Builds the per-fold views of `dataset` from `labels`.
    pub fn split<'a, D: Dataset>(
        &self,
        dataset: &'a D,
        labels: ArrayView1<'_, i64>,
    ) -> Result<Vec<Split<'a, D>>, DatastoreError> {
        if labels.len() != dataset.len() {
            return Err(DatastoreError::length_mismatch(
                dataset.len(),
                labels.len(),
                "StratifiedKFold::split",
            ));
        }
        Ok(self
            .split_indices(labels)?
            .into_iter()
            .map(|(train, valid)| Split {
                train: Subset::new(dataset, train),
                valid: Subset::new(dataset, valid),
            })
            .collect())
    }
}

/// Stratified k-fold split of a single-task in-memory dataset.
///
/// No shuffling takes place, so the folds are fully determined by the
/// labels.
///
/// # Errors
///
/// * `InvalidArgument` if `num_folds < 2` or the labels are multi-task.
/// * `InsufficientSamplesPerClass` if a class has fewer than `num_folds`
///   members.
pub fn stratified_split<D: InMemoryDataset>(
    dataset: &D,
    num_folds: usize,
) -> Result<Vec<Split<'_, D>>, DatastoreError> {
    let (_, labels) = dataset.load_data();
    let labels = labels.stratification_view(None)?;
    StratifiedKFold::new(num_folds)?.split(dataset, labels)
}

/// Stratified k-fold split on the task `label_key` of a multitask dataset.
///
/// Only the chosen task drives the fold assignment; every task label stays
/// reachable through the views.
///
/// # Errors
///
/// Same as [`stratified_split`], plus `TaskNotFound` for an unknown key.
pub fn multitask_stratified_split<'a, D: MultiTaskDataset>(
    dataset: &'a D,
    num_folds: usize,
    label_key: &str,
) -> Result<Vec<Split<'a, D>>, DatastoreError> {
    let labels = dataset
        .task_labels()
        .get(label_key)
        .ok_or_else(|| DatastoreError::TaskNotFound(label_key.to_string()))?;
    StratifiedKFold::new(num_folds)?.split(dataset, labels.view())
}

#[cfg(test)]
#[path = "cross_validation_test.rs"]
mod tests;
