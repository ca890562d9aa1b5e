use ndarray::{Array1, Array2, Axis, Ix1, Ix2};

use datastore_core::creation::{randint, randn, seeded_rng};
use datastore_core::{DatastoreError, Labels, TaskLabels, TaskTargets};

use super::traits::{Dataset, InMemoryDataset, MultiTaskDataset};

/// Width of the shared feature matrix of [`MultiTaskRandomData`].
pub const MULTITASK_NUM_FEATURES: usize = 10;

fn check_num_classes(num_classes: usize) -> Result<(), DatastoreError> {
    if num_classes == 0 {
        return Err(DatastoreError::InvalidArgument(
            "num_classes must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Random supervised dataset, useful for quick iteration.
///
/// Holds `num_samples` standard normal values and as many labels drawn
/// uniformly from `[0, num_classes)`. With a seed, two constructions with
/// the same parameters produce identical data and labels.
#[derive(Debug, Clone)]
pub struct RandomData {
    data: Array1<f32>,
    labels: Labels,
}

impl RandomData {
    pub fn new(
        num_samples: usize,
        num_classes: usize,
        seed: Option<u64>,
    ) -> Result<Self, DatastoreError> {
        check_num_classes(num_classes)?;
        let mut rng = seeded_rng(seed);
        let data = randn(&[num_samples], &mut rng)
            .into_dimensionality::<Ix1>()
            .map_err(|e| DatastoreError::InvalidArgument(e.to_string()))?;
        let labels = randint(num_samples, num_classes as i64, &mut rng)?;
        Ok(Self {
            data,
            labels: Labels::Single(labels),
        })
    }
}

impl Dataset for RandomData {
    type Item = (f32, i64);

    fn get(&self, index: usize) -> Result<Self::Item, DatastoreError> {
        let value = self.data.get(index).copied();
        let label = self
            .labels
            .as_single()
            .and_then(|labels| labels.get(index))
            .copied();
        match (value, label) {
            (Some(value), Some(label)) => Ok((value, label)),
            _ => Err(DatastoreError::IndexOutOfBounds {
                index,
                len: self.data.len(),
            }),
        }
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

impl InMemoryDataset for RandomData {
    type Features = Array1<f32>;

    fn load_data(&self) -> (&Self::Features, &Labels) {
        (&self.data, &self.labels)
    }
}

/// Multitask variant of [`RandomData`].
///
/// A shared `(num_samples, MULTITASK_NUM_FEATURES)` feature matrix plus one
/// independently drawn label vector per task, registered as `"task0"`,
/// `"task1"`, ... in that order.
#[derive(Debug, Clone)]
pub struct MultiTaskRandomData {
    data: Array2<f32>,
    labels: Labels,
}

impl MultiTaskRandomData {
    pub fn new(
        num_samples: usize,
        num_classes: usize,
        num_tasks: usize,
        seed: Option<u64>,
    ) -> Result<Self, DatastoreError> {
        check_num_classes(num_classes)?;
        let mut rng = seeded_rng(seed);
        let data = randn(&[num_samples, MULTITASK_NUM_FEATURES], &mut rng)
            .into_dimensionality::<Ix2>()
            .map_err(|e| DatastoreError::InvalidArgument(e.to_string()))?;

        let mut tasks = TaskLabels::new();
        for task in 0..num_tasks {
            let labels = randint(num_samples, num_classes as i64, &mut rng)?;
            tasks.insert(format!("task{}", task), labels)?;
        }
        Ok(Self {
            data,
            labels: Labels::MultiTask(tasks),
        })
    }
}

impl Dataset for MultiTaskRandomData {
    type Item = (Array1<f32>, TaskTargets);

    fn get(&self, index: usize) -> Result<Self::Item, DatastoreError> {
        if index >= self.len() {
            return Err(DatastoreError::IndexOutOfBounds {
                index,
                len: self.len(),
            });
        }
        let features = self.data.index_axis(Axis(0), index).to_owned();
        let targets = self
            .task_labels()
            .targets_at(index)
            .unwrap_or_default();
        Ok((features, targets))
    }

    fn len(&self) -> usize {
        self.data.nrows()
    }
}

impl InMemoryDataset for MultiTaskRandomData {
    type Features = Array2<f32>;

    fn load_data(&self) -> (&Self::Features, &Labels) {
        (&self.data, &self.labels)
    }
}

impl MultiTaskDataset for MultiTaskRandomData {
    fn task_labels(&self) -> &TaskLabels {
        self.labels.task_labels()
    }
}

#[cfg(test)]
#[path = "random_test.rs"]
mod tests;
