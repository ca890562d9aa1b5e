use std::fmt;
use std::path::{Path, PathBuf};

use ndarray::{ArrayD, Axis, Ix2};

use datastore_core::{DatastoreError, Labels, Partition, TaskLabels, TaskTargets};

use super::remote::{self, ArchiveFormat, DatasetFolders, RemoteSources};
use super::transform::{self, Transform};
use super::traits::{Dataset, InMemoryDataset, MultiTaskDataset};

const NAME: &str = "P3B3";

const SOURCES: RemoteSources = RemoteSources {
    train_data: "https://raw.githubusercontent.com/yngtodd/unlp/master/p3b3/train-data.npy",
    train_labels: "https://raw.githubusercontent.com/yngtodd/unlp/master/p3b3/train-labels.npy",
    test_data: "https://raw.githubusercontent.com/yngtodd/unlp/master/p3b3/test-data.npy",
    test_labels: "https://raw.githubusercontent.com/yngtodd/unlp/master/p3b3/test-labels.npy",
    format: ArchiveFormat::Npy,
};

/// Task names, in label-file column order.
pub const TASKS: [&str; 4] = ["subsite", "laterality", "behavior", "grade"];

/// Which of the four P3B3 label columns become tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSelection {
    pub subsite: bool,
    pub laterality: bool,
    pub behavior: bool,
    pub grade: bool,
}

impl TaskSelection {
    fn flags(&self) -> [bool; 4] {
        [self.subsite, self.laterality, self.behavior, self.grade]
    }
}

impl Default for TaskSelection {
    fn default() -> Self {
        Self {
            subsite: true,
            laterality: true,
            behavior: true,
            grade: true,
        }
    }
}

/// P3B3 synthetic pathology-report dataset.
///
/// Each document comes with four labels (subsite, laterality, behavior,
/// grade) stored as the columns of an `(N, 4)` label file. The selected
/// columns are registered as tasks in column order.
pub struct P3b3 {
    folders: DatasetFolders,
    partition: Partition,
    data: ArrayD<f32>,
    targets: Labels,
    transform: Option<Transform<ArrayD<f32>>>,
    target_transform: Option<Transform<i64>>,
}

impl P3b3 {
    /// Loads `partition` from `root`, keeping the tasks enabled in `tasks`.
    ///
    /// # Errors
    ///
    /// Same as [`KuzushijiMnist::new`](super::KuzushijiMnist::new), plus
    /// `ShapeMismatch` when the label file is not `(N, 4)`.
    pub fn new<P: AsRef<Path>>(
        root: P,
        partition: Partition,
        tasks: TaskSelection,
        download: bool,
    ) -> Result<Self, DatastoreError> {
        let folders = DatasetFolders::new(root, NAME);
        let (data, labels) = remote::prepare(&folders, &SOURCES, partition, download)?;
        let targets = Self::get_targets(labels, tasks)?;
        Ok(Self {
            folders,
            partition,
            data,
            targets: Labels::MultiTask(targets),
            transform: None,
            target_transform: None,
        })
    }

    /// Splits the `(N, 4)` label matrix into the selected tasks.
    fn get_targets(labels: ArrayD<i64>, tasks: TaskSelection) -> Result<TaskLabels, DatastoreError> {
        let shape_error = |actual: String| DatastoreError::ShapeMismatch {
            expected: format!("(N, {}) label matrix", TASKS.len()),
            actual,
            operation: "P3b3::get_targets".to_string(),
        };
        let labels = labels
            .into_dimensionality::<Ix2>()
            .map_err(|e| shape_error(e.to_string()))?;
        if labels.ncols() < TASKS.len() {
            return Err(shape_error(format!("{:?}", labels.shape())));
        }

        let mut targets = TaskLabels::new();
        for (column, (name, selected)) in TASKS.iter().zip(tasks.flags()).enumerate() {
            if selected {
                targets.insert(*name, labels.column(column).to_owned())?;
            }
        }
        Ok(targets)
    }

    /// Sets a function applied to every document on access.
    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(ArrayD<f32>) -> ArrayD<f32> + Send + Sync + 'static,
    {
        self.transform = Some(Box::new(transform));
        self
    }

    /// Sets a function applied to the label of every task on access.
    pub fn with_target_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(i64) -> i64 + Send + Sync + 'static,
    {
        self.target_transform = Some(Box::new(transform));
        self
    }

    pub fn partition(&self) -> Partition {
        self.partition
    }

    pub fn raw_folder(&self) -> PathBuf {
        self.folders.raw_folder()
    }

    pub fn processed_folder(&self) -> PathBuf {
        self.folders.processed_folder()
    }
}

impl Dataset for P3b3 {
    type Item = (ArrayD<f32>, TaskTargets);

    fn get(&self, index: usize) -> Result<Self::Item, DatastoreError> {
        if index >= self.len() {
            return Err(DatastoreError::IndexOutOfBounds {
                index,
                len: self.len(),
            });
        }
        let document = self.data.index_axis(Axis(0), index).to_owned();
        let targets = self.task_labels().targets_at(index).unwrap_or_default();
        let targets = match &self.target_transform {
            Some(target_transform) => targets.map_labels(target_transform),
            None => targets,
        };
        Ok((transform::apply(&self.transform, document), targets))
    }

    fn len(&self) -> usize {
        self.data.shape().first().copied().unwrap_or(0)
    }
}

impl InMemoryDataset for P3b3 {
    type Features = ArrayD<f32>;

    fn load_data(&self) -> (&Self::Features, &Labels) {
        (&self.data, &self.targets)
    }
}

impl MultiTaskDataset for P3b3 {
    fn task_labels(&self) -> &TaskLabels {
        self.targets.task_labels()
    }
}

impl fmt::Display for P3b3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset {}", NAME)?;
        writeln!(f, "    Number of datapoints: {}", self.len())?;
        writeln!(f, "    Split: {}", self.partition)?;
        writeln!(f, "    Root Location: {}", self.folders.root().display())
    }
}

impl fmt::Debug for P3b3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("P3b3")
            .field("root", &self.folders.root())
            .field("partition", &self.partition)
            .field("shape", &self.data.shape())
            .field("tasks", &self.get_labels())
            .finish()
    }
}

#[cfg(test)]
#[path = "p3b3_test.rs"]
mod tests;
